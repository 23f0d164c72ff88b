use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct StatesParams {
    pub state: Option<String>,
}

#[derive(Debug, Serialize)]
struct StatesBody<'a> {
    states: Vec<&'a str>,
    meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
struct LgasBody<'a> {
    state: &'a str,
    lgas: Vec<&'a str>,
    meta: ResponseMeta,
}

/// Distinct states in the table, or the LGAs of `?state=` when given. An
/// unknown state yields an empty list.
pub(super) async fn list_states(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(params): Query<StatesParams>,
) -> Response {
    let table = state.resolver.table();
    let meta = ResponseMeta::new(req_id.0);

    match params.state.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(name) => Json(LgasBody {
            state: name,
            lgas: table.lgas_for_state(name),
            meta,
        })
        .into_response(),
        None => Json(StatesBody {
            states: table.states(),
            meta,
        })
        .into_response(),
    }
}

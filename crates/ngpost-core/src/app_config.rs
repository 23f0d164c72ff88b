use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Success-rate cut-offs used to derive a viability verdict.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViabilityThresholds {
    /// At or above this rate the geocoder fallback is `viable`.
    pub viable: f64,
    /// At or above this rate (and below `viable`) it is `conditional`.
    pub conditional: f64,
}

impl Default for ViabilityThresholds {
    fn default() -> Self {
        Self {
            viable: 0.8,
            conditional: 0.5,
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub postal_codes_path: Option<PathBuf>,
    pub geocoder_base_url: String,
    pub geocoder_user_agent: String,
    pub geocoder_timeout_secs: u64,
    pub geocoder_min_interval_ms: u64,
    pub viability: ViabilityThresholds,
    pub api_rate_limit_per_minute: usize,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("postal_codes_path", &self.postal_codes_path)
            .field("geocoder_base_url", &self.geocoder_base_url)
            .field("geocoder_user_agent", &self.geocoder_user_agent)
            .field("geocoder_timeout_secs", &self.geocoder_timeout_secs)
            .field("geocoder_min_interval_ms", &self.geocoder_min_interval_ms)
            .field("viability", &self.viability)
            .field("api_rate_limit_per_minute", &self.api_rate_limit_per_minute)
            .finish()
    }
}

use std::env;

/// Config holds all application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub switches_config: String,
    pub log_level: String,
    pub node_env: String,
    pub frontend_dir: String,
    pub eapi_protocol: String,
    pub eapi_insecure: bool,
    pub eapi_timeout_secs: u64,
    pub status_interval_secs: u64,
}

impl Config {
    /// Load configuration from environment variables with defaults
    pub fn load() -> Self {
        Self {
            port: get_env("PORT", "3001").parse().unwrap_or(3001),
            switches_config: get_env("SWITCHES_CONFIG", "config/switches.json"),
            log_level: get_env("LOG_LEVEL", "info"),
            node_env: get_env("NODE_ENV", "development"),
            frontend_dir: get_env("FRONTEND_DIR", "frontend/dist"),
            eapi_protocol: get_env("EAPI_PROTOCOL", "https"),
            eapi_insecure: parse_bool(&get_env("EAPI_INSECURE", "true")),
            eapi_timeout_secs: get_env("EAPI_TIMEOUT_SECS", "30").parse().unwrap_or(30),
            status_interval_secs: get_env("STATUS_INTERVAL_SECS", "60").parse().unwrap_or(60),
        }
    }

    pub fn listen_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }

    pub fn is_production(&self) -> bool {
        self.node_env.eq_ignore_ascii_case("production")
    }

    /// Default tracing filter when RUST_LOG is not set
    pub fn default_log_filter(&self) -> String {
        format!("arista_console={0},tower_http={0}", self.log_level)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3001,
            switches_config: "config/switches.json".to_string(),
            log_level: "info".to_string(),
            node_env: "development".to_string(),
            frontend_dir: "frontend/dist".to_string(),
            eapi_protocol: "https".to_string(),
            eapi_insecure: true,
            eapi_timeout_secs: 30,
            status_interval_secs: 60,
        }
    }
}

fn get_env(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_bool(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

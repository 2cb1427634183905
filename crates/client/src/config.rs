use std::time::Duration;

/// Base URL of the predictive service in local development.
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";

/// Path of the tune-thresholds endpoint.
pub const DEFAULT_ENDPOINT_PATH: &str = "/api/predictive/tune-thresholds";

/// Per-request timeout.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// How non-2xx responses are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusPolicy {
    /// Any non-2xx status is a failed fetch.
    #[default]
    Strict,
    /// The status is ignored and the body decoded as if it were a 2xx.
    Lenient,
}

/// Client configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Base URL of the predictive service (default: `http://127.0.0.1:5000`).
    pub api_url: String,
    /// Endpoint path appended to `api_url`.
    pub endpoint_path: String,
    /// Request timeout in seconds (default: `10`).
    pub request_timeout_secs: u64,
    pub status_policy: StatusPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            endpoint_path: DEFAULT_ENDPOINT_PATH.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            status_policy: StatusPolicy::Strict,
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                      | Default                           |
    /// |------------------------------|-----------------------------------|
    /// | `TUNER_API_URL`              | `http://127.0.0.1:5000`           |
    /// | `TUNER_ENDPOINT_PATH`        | `/api/predictive/tune-thresholds` |
    /// | `TUNER_REQUEST_TIMEOUT_SECS` | `10`                              |
    /// | `TUNER_ACCEPT_ERROR_STATUS`  | `false`                           |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) but reading through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(url) = lookup("TUNER_API_URL") {
            let url = url.trim().trim_end_matches('/').to_string();
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::Invalid {
                    var: "TUNER_API_URL",
                    value: url,
                    expected: "an http:// or https:// URL",
                });
            }
            config.api_url = url;
        }

        if let Some(path) = lookup("TUNER_ENDPOINT_PATH") {
            let path = path.trim();
            config.endpoint_path = if path.starts_with('/') {
                path.to_string()
            } else {
                format!("/{path}")
            };
        }

        if let Some(raw) = lookup("TUNER_REQUEST_TIMEOUT_SECS") {
            config.request_timeout_secs = match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    return Err(ConfigError::Invalid {
                        var: "TUNER_REQUEST_TIMEOUT_SECS",
                        value: raw,
                        expected: "a positive integer",
                    })
                }
            };
        }

        if let Some(raw) = lookup("TUNER_ACCEPT_ERROR_STATUS") {
            config.status_policy = if parse_flag("TUNER_ACCEPT_ERROR_STATUS", &raw)? {
                StatusPolicy::Lenient
            } else {
                StatusPolicy::Strict
            };
        }

        Ok(config)
    }

    /// Full URL the card fetches from.
    pub fn endpoint_url(&self) -> String {
        format!("{}{}", self.api_url, self.endpoint_path)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Parse a boolean environment flag (`1/true/yes/on`, `0/false/no/off`).
pub fn parse_flag(var: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::Invalid {
            var,
            value: raw.to_string(),
            expected: "a boolean (true/false)",
        }),
    }
}

/// Invalid configuration value.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} must be {expected}, got {value:?}")]
    Invalid {
        var: &'static str,
        value: String,
        expected: &'static str,
    },
}

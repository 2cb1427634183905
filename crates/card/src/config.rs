use tuner_client::config::parse_flag;
use tuner_client::{ClientConfig, ConfigError};

/// Card configuration loaded once at startup.
///
/// | Env Var             | Default | Description                           |
/// |---------------------|---------|---------------------------------------|
/// | `TUNER_SHOW_ERRORS` | `false` | Show the last refresh failure reason  |
///
/// plus everything read by [`ClientConfig::from_env`].
#[derive(Debug, Clone, PartialEq)]
pub struct CardConfig {
    pub client: ClientConfig,
    pub show_errors: bool,
}

impl CardConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let client = ClientConfig::from_lookup(&lookup)?;
        let show_errors = match lookup("TUNER_SHOW_ERRORS") {
            Some(raw) => parse_flag("TUNER_SHOW_ERRORS", &raw)?,
            None => false,
        };
        Ok(Self {
            client,
            show_errors,
        })
    }
}

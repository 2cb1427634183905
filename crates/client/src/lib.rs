//! HTTP client for the predictive service's threshold tuner.
//!
//! Wraps `GET /api/predictive/tune-thresholds` with [`reqwest`] and loads
//! the endpoint location from the environment so nothing is hard-coded
//! into the card.

pub mod api;
pub mod config;

pub use api::{TunerApi, TunerApiError};
pub use config::{ClientConfig, ConfigError, StatusPolicy};

//! REST client for the tune-thresholds endpoint.
//!
//! One `GET` per call, no body, no auth headers. Decoding of the body is
//! delegated to [`tuner_core::decode_envelope`].

use tuner_core::{decode_envelope, CoreError, ThresholdSnapshot, TuneEnvelope};

use crate::config::{ClientConfig, StatusPolicy};

/// Longest response body kept in [`TunerApiError::ApiError`].
const MAX_ERROR_BODY_LEN: usize = 512;

/// HTTP client for the threshold tuner.
#[derive(Debug, Clone)]
pub struct TunerApi {
    client: reqwest::Client,
    endpoint: String,
    status_policy: StatusPolicy,
}

/// Errors from the tuner REST layer.
#[derive(Debug, thiserror::Error)]
pub enum TunerApiError {
    /// The HTTP request itself failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The tuner returned a non-2xx status code.
    #[error("Tuner API error ({status}): {body}")]
    ApiError {
        status: u16,
        /// The service's `message`, or the raw body when it has none.
        body: String,
    },

    /// The body could not be decoded into a threshold envelope.
    #[error(transparent)]
    Decode(#[from] CoreError),
}

impl TunerApi {
    /// Build a client from configuration, applying its request timeout.
    pub fn new(config: &ClientConfig) -> Result<Self, TunerApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        Ok(Self::with_client(
            client,
            config.endpoint_url(),
            config.status_policy,
        ))
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(
        client: reqwest::Client,
        endpoint: String,
        status_policy: StatusPolicy,
    ) -> Self {
        Self {
            client,
            endpoint,
            status_policy,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Fetch and decode the full response envelope.
    pub async fn fetch_envelope(&self) -> Result<TuneEnvelope, TunerApiError> {
        let response = self.client.get(&self.endpoint).send().await?;
        let status = response.status();

        if !status.is_success() {
            match self.status_policy {
                StatusPolicy::Strict => return Err(Self::api_error(response).await),
                StatusPolicy::Lenient => {
                    tracing::warn!(
                        status = status.as_u16(),
                        endpoint = %self.endpoint,
                        "Tuner answered with error status, decoding body anyway",
                    );
                }
            }
        }

        let body = response.bytes().await?;
        Ok(decode_envelope(&body)?)
    }

    /// Fetch the current threshold snapshot.
    ///
    /// Returns `Ok(None)` when the tuner answered without `data`.
    pub async fn fetch_thresholds(&self) -> Result<Option<ThresholdSnapshot>, TunerApiError> {
        let envelope = self.fetch_envelope().await?;

        if envelope.data.is_none() {
            tracing::debug!(
                status = ?envelope.status,
                message = ?envelope.message,
                "Tuner returned no threshold data",
            );
        }

        Ok(envelope.data)
    }

    /// Turn a non-2xx response into [`TunerApiError::ApiError`], preferring
    /// the `message` the tuner puts in its error envelope.
    async fn api_error(response: reqwest::Response) -> TunerApiError {
        let status = response.status().as_u16();
        let raw = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());

        let body = decode_envelope(raw.as_bytes())
            .ok()
            .and_then(|envelope| envelope.message)
            .unwrap_or_else(|| truncate(raw, MAX_ERROR_BODY_LEN));

        TunerApiError::ApiError { status, body }
    }
}

fn truncate(mut text: String, max: usize) -> String {
    if text.len() > max {
        let mut end = max;
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        text.truncate(end);
        text.push('…');
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_keeps_short_bodies() {
        assert_eq!(truncate("bad gateway".into(), 512), "bad gateway");
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        let text = "é".repeat(10);
        let cut = truncate(text, 5);
        assert_eq!(cut, "éé…");
    }

    #[test]
    fn new_uses_configured_endpoint() {
        let api = TunerApi::new(&ClientConfig::default()).unwrap();
        assert_eq!(
            api.endpoint(),
            "http://127.0.0.1:5000/api/predictive/tune-thresholds"
        );
    }
}

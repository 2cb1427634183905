//! Where the card gets its thresholds from.

use async_trait::async_trait;
use tuner_client::{TunerApi, TunerApiError};
use tuner_core::ThresholdSnapshot;

/// An asynchronous provider of threshold snapshots.
///
/// `Ok(None)` means the provider answered but had no data.
#[async_trait]
pub trait ThresholdSource: Send + Sync + 'static {
    type Error: std::fmt::Display + Send;

    async fn fetch(&self) -> Result<Option<ThresholdSnapshot>, Self::Error>;
}

#[async_trait]
impl ThresholdSource for TunerApi {
    type Error = TunerApiError;

    async fn fetch(&self) -> Result<Option<ThresholdSnapshot>, TunerApiError> {
        self.fetch_thresholds().await
    }
}

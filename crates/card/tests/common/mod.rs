#![allow(dead_code)]

use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};
use tracing_subscriber::fmt::MakeWriter;

use tuner_card::source::ThresholdSource;
use tuner_core::ThresholdSnapshot;

pub type Outcome = Result<Option<ThresholdSnapshot>, String>;

/// The snapshot from the tuner's happy path.
pub fn tuned() -> ThresholdSnapshot {
    ThresholdSnapshot {
        avg_confidence: 0.91,
        avg_drift: 0.04,
        lower_threshold: 0.7,
        upper_threshold: 0.95,
        drift_alert_threshold: 0.15,
        timestamp: None,
    }
}

pub fn snapshot_with_confidence(avg_confidence: f64) -> ThresholdSnapshot {
    ThresholdSnapshot {
        avg_confidence,
        ..tuned()
    }
}

// ---------------------------------------------------------------------------
// ScriptedSource
// ---------------------------------------------------------------------------

/// A source whose every fetch blocks until the test answers it.
///
/// Each call hands a reply handle to the test through the `requests`
/// channel, so the test observes exactly how many fetches ran and decides
/// when and in which order they resolve.
pub struct ScriptedSource {
    requests: mpsc::UnboundedSender<oneshot::Sender<Outcome>>,
}

impl ScriptedSource {
    pub fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<oneshot::Sender<Outcome>>) {
        let (requests, rx) = mpsc::unbounded_channel();
        (Arc::new(Self { requests }), rx)
    }
}

#[async_trait]
impl ThresholdSource for ScriptedSource {
    type Error = String;

    async fn fetch(&self) -> Outcome {
        let (reply, answer) = oneshot::channel();
        self.requests
            .send(reply)
            .map_err(|_| "test harness gone".to_string())?;
        answer.await.map_err(|_| "reply dropped".to_string())?
    }
}

/// Wait for the next fetch the card issues.
pub async fn next_request(
    requests: &mut mpsc::UnboundedReceiver<oneshot::Sender<Outcome>>,
) -> oneshot::Sender<Outcome> {
    tokio::time::timeout(Duration::from_secs(2), requests.recv())
        .await
        .expect("card did not issue a fetch")
        .expect("source dropped")
}

/// Assert that no further fetch arrives within a short grace period.
pub async fn assert_no_request(requests: &mut mpsc::UnboundedReceiver<oneshot::Sender<Outcome>>) {
    let extra = tokio::time::timeout(Duration::from_millis(50), requests.recv()).await;
    assert!(extra.is_err(), "unexpected extra fetch");
}

// ---------------------------------------------------------------------------
// FixedSource
// ---------------------------------------------------------------------------

/// A source that answers immediately with the same outcome and counts calls.
pub struct FixedSource {
    outcome: Outcome,
    calls: AtomicUsize,
}

impl FixedSource {
    pub fn new(outcome: Outcome) -> Arc<Self> {
        Arc::new(Self {
            outcome,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ThresholdSource for FixedSource {
    type Error = String;

    async fn fetch(&self) -> Outcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcome.clone()
    }
}

// ---------------------------------------------------------------------------
// Log capture
// ---------------------------------------------------------------------------

/// In-memory log sink for asserting on emitted `tracing` events.
#[derive(Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    /// Install as the thread-default subscriber until the guard drops.
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let subscriber = tracing_subscriber::fmt()
            .with_writer(self.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }

    pub fn count(&self, needle: &str) -> usize {
        self.contents().matches(needle).count()
    }
}

impl Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogCapture {
    type Writer = LogCapture;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

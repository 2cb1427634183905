//! The adaptive threshold card.
//!
//! [`ThresholdCard`] owns the presentation state and drives fetches. Each
//! fetch runs as a background task on the current runtime and reports back
//! through an internal channel; the host loop awaits
//! [`next_message`](ThresholdCard::next_message) and feeds the result to
//! [`apply`](ThresholdCard::apply), then re-renders.
//!
//! Background tasks are tied to the mounted lifetime by a
//! [`CancellationToken`]: unmounting (or dropping) the card cancels it and
//! in-flight fetches exit without delivering anything.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tuner_core::{
    render_text, CardState, CardView, FetchTicket, Phase, Resolution, ThresholdSnapshot,
};

use crate::source::ThresholdSource;

/// Host-level presentation switches.
#[derive(Debug, Clone, Copy, Default)]
pub struct CardOptions {
    /// Render the reason of the last failed refresh under the fields.
    pub show_errors: bool,
}

/// Outcome of one background fetch, tagged with its ticket.
#[derive(Debug)]
pub struct FetchResolved {
    pub ticket: FetchTicket,
    pub outcome: Result<Option<ThresholdSnapshot>, String>,
}

pub struct ThresholdCard<S> {
    source: Arc<S>,
    options: CardOptions,
    state: CardState,
    tx: mpsc::UnboundedSender<FetchResolved>,
    rx: mpsc::UnboundedReceiver<FetchResolved>,
    /// `Some` while mounted.
    mounted: Option<CancellationToken>,
}

impl<S: ThresholdSource> ThresholdCard<S> {
    /// Create an unmounted card in the `Idle` state.
    pub fn new(source: Arc<S>, options: CardOptions) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            source,
            options,
            state: CardState::new(),
            tx,
            rx,
            mounted: None,
        }
    }

    /// Mount the card and issue the initial fetch.
    ///
    /// Returns `None` without fetching if the card is already mounted.
    /// Must be called from within a tokio runtime.
    pub fn mount(&mut self) -> Option<FetchTicket> {
        if self.mounted.is_some() {
            tracing::debug!("Card already mounted");
            return None;
        }
        let token = CancellationToken::new();
        self.mounted = Some(token.clone());
        tracing::debug!("Card mounted");
        Some(self.spawn_fetch(token))
    }

    /// Manual re-fetch. Always issues a new request while mounted, even if
    /// one is already in flight.
    pub fn refresh(&mut self) -> Option<FetchTicket> {
        let Some(token) = self.mounted.clone() else {
            tracing::warn!("Refresh requested on an unmounted card");
            return None;
        };
        Some(self.spawn_fetch(token))
    }

    fn spawn_fetch(&mut self, token: CancellationToken) -> FetchTicket {
        let ticket = self.state.begin_fetch();
        tracing::info!(ticket = ticket.sequence(), "Fetching adaptive thresholds");

        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {
                    tracing::debug!(ticket = ticket.sequence(), "Fetch abandoned, card unmounted");
                }
                outcome = source.fetch() => {
                    if token.is_cancelled() {
                        return;
                    }
                    let outcome = outcome.map_err(|e| e.to_string());
                    // The receiver lives as long as the card.
                    let _ = tx.send(FetchResolved { ticket, outcome });
                }
            }
        });

        ticket
    }

    /// Wait for the next background fetch to resolve.
    pub async fn next_message(&mut self) -> Option<FetchResolved> {
        self.rx.recv().await
    }

    /// Fold a fetch result into the card state.
    ///
    /// Results for superseded tickets are dropped and reported as
    /// [`Resolution::Stale`]. Messages only exist once the card is mounted,
    /// and unmounting consumes it.
    pub fn apply(&mut self, msg: FetchResolved) -> Resolution {
        let ticket = msg.ticket.sequence();
        let resolution = self.state.resolve(msg.ticket, msg.outcome, Utc::now());
        match resolution {
            Resolution::Succeeded => {
                tracing::info!(
                    ticket,
                    has_data = self.state.snapshot().is_some(),
                    "Threshold snapshot updated",
                );
            }
            Resolution::Failed => {
                tracing::error!(
                    ticket,
                    error = self.state.last_error().unwrap_or_default(),
                    "Threshold fetch failed",
                );
            }
            Resolution::Stale => {
                tracing::debug!(
                    ticket,
                    latest = self.state.fetches_issued(),
                    "Discarding stale threshold response",
                );
            }
        }
        resolution
    }

    pub fn view(&self) -> CardView {
        CardView::from_state(&self.state, self.options.show_errors)
    }

    /// The current panel as text.
    pub fn render(&self) -> String {
        render_text(&self.view())
    }

    /// Unmount the card. Outstanding fetches are abandoned and the state is
    /// discarded with the card.
    pub fn unmount(self) {
        // Cancellation happens in `Drop`.
        tracing::debug!(fetches = self.state.fetches_issued(), "Card unmounted");
    }
}

impl<S> ThresholdCard<S> {
    pub fn is_mounted(&self) -> bool {
        self.mounted.is_some()
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    pub fn snapshot(&self) -> Option<&ThresholdSnapshot> {
        self.state.snapshot()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.state.last_error()
    }

    pub fn last_success_at(&self) -> Option<DateTime<Utc>> {
        self.state.last_success_at()
    }

    pub fn fetches_issued(&self) -> u64 {
        self.state.fetches_issued()
    }
}

impl<S> Drop for ThresholdCard<S> {
    fn drop(&mut self) {
        if let Some(token) = self.mounted.take() {
            token.cancel();
        }
    }
}

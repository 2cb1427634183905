//! Fetch lifecycle state machine for the threshold card.
//!
//! `Idle -> Loading -> {Success, Failure}`, re-entrant: every fetch request
//! moves back to `Loading` without discarding the snapshot already held.
//!
//! Each fetch is identified by a [`FetchTicket`]. Only the resolution of the
//! most recently issued ticket is applied; anything older is reported as
//! [`Resolution::Stale`] and leaves the state untouched.

use chrono::{DateTime, Utc};

use crate::snapshot::ThresholdSnapshot;

/// Where the card is in its fetch lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Phase {
    /// No fetch has been issued yet.
    #[default]
    Idle,
    /// The latest issued fetch has not resolved.
    Loading,
    /// The latest fetch returned a well-formed response.
    Success,
    /// The latest fetch failed.
    Failure,
}

/// Sequence number handed out when a fetch is issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FetchTicket(u64);

impl FetchTicket {
    pub fn sequence(self) -> u64 {
        self.0
    }
}

/// Outcome of folding a fetch resolution into [`CardState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Succeeded,
    Failed,
    /// The ticket was superseded (or already resolved); state unchanged.
    Stale,
}

/// Presentation state owned by a single card.
#[derive(Debug, Clone, Default)]
pub struct CardState {
    phase: Phase,
    snapshot: Option<ThresholdSnapshot>,
    latest: u64,
    last_error: Option<String>,
    last_success_at: Option<DateTime<Utc>>,
}

impl CardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter `Loading` and issue a fresh ticket.
    ///
    /// The held snapshot is kept so the panel keeps showing it while the
    /// request is outstanding.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.latest += 1;
        self.phase = Phase::Loading;
        FetchTicket(self.latest)
    }

    /// Apply the outcome of the fetch identified by `ticket`.
    ///
    /// `Ok(data)` replaces the snapshot wholesale (`None` clears it).
    /// `Err(reason)` records the reason and keeps the last-known-good
    /// snapshot.
    pub fn resolve(
        &mut self,
        ticket: FetchTicket,
        outcome: Result<Option<ThresholdSnapshot>, String>,
        now: DateTime<Utc>,
    ) -> Resolution {
        if ticket.0 != self.latest || self.phase != Phase::Loading {
            return Resolution::Stale;
        }

        match outcome {
            Ok(data) => {
                self.snapshot = data;
                self.phase = Phase::Success;
                self.last_error = None;
                self.last_success_at = Some(now);
                Resolution::Succeeded
            }
            Err(reason) => {
                self.phase = Phase::Failure;
                self.last_error = Some(reason);
                Resolution::Failed
            }
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }

    pub fn snapshot(&self) -> Option<&ThresholdSnapshot> {
        self.snapshot.as_ref()
    }

    /// Reason of the most recent applied failure, cleared by the next success.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn last_success_at(&self) -> Option<DateTime<Utc>> {
        self.last_success_at
    }

    /// Number of fetches issued over the card's lifetime.
    pub fn fetches_issued(&self) -> u64 {
        self.latest
    }
}

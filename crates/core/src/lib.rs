//! Domain model and presentation logic for the adaptive threshold card.
//!
//! Everything in this crate is synchronous and free of I/O: decoding the
//! tuner's response envelope, the fetch lifecycle state machine, and the
//! view model that turns state into a text panel.

pub mod error;
pub mod snapshot;
pub mod state;
pub mod view;

pub use error::CoreError;
pub use snapshot::{decode_envelope, ThresholdSnapshot, TuneEnvelope};
pub use state::{CardState, FetchTicket, Phase, Resolution};
pub use view::{render_text, CardBody, CardView, FieldRow};

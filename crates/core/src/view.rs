//! View model and text rendering for the threshold card.
//!
//! [`CardView::from_state`] is a pure function of [`CardState`]; the panel
//! drawn by [`render_text`] is what the operator sees.

use crate::snapshot::ThresholdSnapshot;
use crate::state::CardState;

pub const TITLE: &str = "Adaptive Threshold Auto-Tuner";
pub const LOADING_TEXT: &str = "Recalculating thresholds…";
pub const EMPTY_TEXT: &str = "No recent threshold data yet.";
pub const ACTION_LABEL: &str = "[r] Re-Tune";

/// One labeled value in the card body.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldRow {
    pub label: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CardBody {
    Fields(Vec<FieldRow>),
    Empty(&'static str),
}

/// Everything the panel shows, already resolved to text.
#[derive(Debug, Clone, PartialEq)]
pub struct CardView {
    pub title: &'static str,
    /// Present while a fetch is outstanding, alongside any existing body.
    pub loading: Option<&'static str>,
    pub body: CardBody,
    /// Wall-clock time of the last applied success.
    pub updated_at: Option<String>,
    /// Only populated when the host opted into visible errors.
    pub error: Option<String>,
    /// The manual re-fetch control; always present.
    pub action: &'static str,
}

impl CardView {
    pub fn from_state(state: &CardState, show_errors: bool) -> Self {
        let body = match state.snapshot() {
            Some(snapshot) => CardBody::Fields(field_rows(snapshot)),
            None => CardBody::Empty(EMPTY_TEXT),
        };

        Self {
            title: TITLE,
            loading: state.is_loading().then_some(LOADING_TEXT),
            body,
            updated_at: state
                .last_success_at()
                .map(|at| format!("Last updated: {} UTC", at.format("%H:%M:%S"))),
            error: if show_errors {
                state
                    .last_error()
                    .map(|reason| format!("Last refresh failed: {reason}"))
            } else {
                None
            },
            action: ACTION_LABEL,
        }
    }

    /// Content lines in display order, without the surrounding frame.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::new();

        if let Some(loading) = self.loading {
            lines.push(loading.to_string());
        }

        match &self.body {
            CardBody::Fields(rows) => {
                let width = rows.iter().map(|r| r.label.len()).max().unwrap_or(0) + 1;
                for row in rows {
                    let label = format!("{}:", row.label);
                    lines.push(format!("{:<width$} {}", label, row.value));
                }
            }
            CardBody::Empty(message) => lines.push((*message).to_string()),
        }

        if let Some(updated_at) = &self.updated_at {
            lines.push(updated_at.clone());
        }
        if let Some(error) = &self.error {
            lines.push(error.clone());
        }

        lines.push(String::new());
        lines.push(self.action.to_string());
        lines
    }
}

/// Values are shown in their shortest round-trip decimal form, unrounded.
/// Negative zero shows as `0`.
fn field_rows(snapshot: &ThresholdSnapshot) -> Vec<FieldRow> {
    let mut rows = vec![
        row("Avg Confidence", snapshot.avg_confidence),
        row("Avg Drift", snapshot.avg_drift),
        row("Lower Threshold", snapshot.lower_threshold),
        row("Upper Threshold", snapshot.upper_threshold),
        row("Drift Alert Threshold", snapshot.drift_alert_threshold),
    ];
    if let Some(timestamp) = &snapshot.timestamp {
        rows.push(FieldRow {
            label: "Tuned At",
            value: timestamp.clone(),
        });
    }
    rows
}

fn row(label: &'static str, value: f64) -> FieldRow {
    let value = if value == 0.0 { 0.0 } else { value };
    FieldRow {
        label,
        value: value.to_string(),
    }
}

/// Draw the view as a boxed text panel, one `\n`-terminated line per row.
pub fn render_text(view: &CardView) -> String {
    let lines = view.lines();
    let title_len = view.title.chars().count();
    let inner = lines
        .iter()
        .map(|l| l.chars().count())
        .max()
        .unwrap_or(0)
        .max(title_len + 2);

    let mut out = String::new();
    out.push_str("┌─ ");
    out.push_str(view.title);
    out.push(' ');
    out.push_str(&"─".repeat(inner - 1 - title_len));
    out.push_str("┐\n");

    for line in &lines {
        let pad = inner - line.chars().count();
        out.push_str("│ ");
        out.push_str(line);
        out.push_str(&" ".repeat(pad));
        out.push_str(" │\n");
    }

    out.push('└');
    out.push_str(&"─".repeat(inner + 2));
    out.push_str("┘\n");
    out
}

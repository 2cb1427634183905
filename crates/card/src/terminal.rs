//! Terminal host for the card.
//!
//! Reads one command per input line and re-renders the panel on every
//! state change, driving both input and fetch resolutions from a single
//! `tokio::select!` loop.

use std::io::Write;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tuner_core::Resolution;

use crate::component::ThresholdCard;
use crate::source::ThresholdSource;

/// Clear screen and move the cursor home.
const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Operator commands accepted on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Activate the re-tune control.
    Retune,
    Quit,
}

impl Command {
    /// Parse a trimmed, case-insensitive input line. A bare Enter re-tunes.
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim().to_ascii_lowercase().as_str() {
            "" | "r" | "retune" | "re-tune" => Some(Self::Retune),
            "q" | "quit" | "exit" => Some(Self::Quit),
            _ => None,
        }
    }
}

/// Mount `card` and run until a quit command or end of input.
///
/// The card is left mounted; the caller decides when to unmount it.
pub async fn run<S, R, W>(
    card: &mut ThresholdCard<S>,
    input: R,
    out: &mut W,
    clear_screen: bool,
) -> std::io::Result<()>
where
    S: ThresholdSource,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    card.mount();
    draw(card, out, clear_screen)?;

    let mut lines = input.lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    tracing::info!("Input closed");
                    break;
                };
                match Command::parse(&line) {
                    Some(Command::Retune) => {
                        card.refresh();
                        draw(card, out, clear_screen)?;
                    }
                    Some(Command::Quit) => break,
                    None => {
                        tracing::warn!(
                            input = %line.trim(),
                            "Unknown command (r = re-tune, q = quit)",
                        );
                    }
                }
            }
            Some(msg) = card.next_message() => {
                if card.apply(msg) != Resolution::Stale {
                    draw(card, out, clear_screen)?;
                }
            }
        }
    }

    Ok(())
}

fn draw<S, W>(card: &ThresholdCard<S>, out: &mut W, clear_screen: bool) -> std::io::Result<()>
where
    S: ThresholdSource,
    W: Write,
{
    if clear_screen {
        out.write_all(CLEAR_SCREEN.as_bytes())?;
    }
    out.write_all(card.render().as_bytes())?;
    out.flush()
}

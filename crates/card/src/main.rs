//! `tuner-card` -- adaptive threshold card for the terminal.
//!
//! Fetches the tuner's latest threshold summary on start, renders it as a
//! panel on stdout, and re-fetches when the operator enters `r` (or just
//! presses Enter). `q` or end of input exits.
//!
//! # Environment variables
//!
//! | Variable                     | Required | Default                           |
//! |------------------------------|----------|-----------------------------------|
//! | `TUNER_API_URL`              | no       | `http://127.0.0.1:5000`           |
//! | `TUNER_ENDPOINT_PATH`        | no       | `/api/predictive/tune-thresholds` |
//! | `TUNER_REQUEST_TIMEOUT_SECS` | no       | `10`                              |
//! | `TUNER_ACCEPT_ERROR_STATUS`  | no       | `false`                           |
//! | `TUNER_SHOW_ERRORS`          | no       | `false`                           |

use std::io::IsTerminal;
use std::sync::Arc;

use tokio::io::BufReader;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tuner_card::component::{CardOptions, ThresholdCard};
use tuner_card::config::CardConfig;
use tuner_card::terminal;
use tuner_client::TunerApi;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    dotenvy::dotenv().ok();

    // Logs go to stderr so they never interleave with the panel.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tuner_card=info,tuner_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = CardConfig::from_env().unwrap_or_else(|e| {
        tracing::error!(error = %e, "Invalid configuration");
        std::process::exit(1);
    });

    let api = TunerApi::new(&config.client).unwrap_or_else(|e| {
        tracing::error!(error = %e, "Failed to build HTTP client");
        std::process::exit(1);
    });

    tracing::info!(
        endpoint = %api.endpoint(),
        timeout_secs = config.client.request_timeout_secs,
        status_policy = ?config.client.status_policy,
        "Starting tuner-card",
    );

    let mut card = ThresholdCard::new(
        Arc::new(api),
        CardOptions {
            show_errors: config.show_errors,
        },
    );

    let stdout = std::io::stdout();
    let clear_screen = stdout.is_terminal();
    let mut out = stdout.lock();
    let input = BufReader::new(tokio::io::stdin());

    if let Err(e) = terminal::run(&mut card, input, &mut out, clear_screen).await {
        tracing::error!(error = %e, "Terminal I/O failed");
        std::process::exit(1);
    }

    card.unmount();
}

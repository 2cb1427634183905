//! End-to-end: the card backed by a real [`TunerApi`] talking to a local
//! axum stand-in for the predictive service.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

use tuner_card::component::{CardOptions, ThresholdCard};
use tuner_client::{StatusPolicy, TunerApi};
use tuner_core::view::EMPTY_TEXT;
use tuner_core::{Phase, Resolution};

const PATH: &str = "/api/predictive/tune-thresholds";

async fn serve(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

fn card_for(addr: SocketAddr, policy: StatusPolicy) -> ThresholdCard<TunerApi> {
    let client = reqwest_client();
    let api = TunerApi::with_client(client, format!("http://{addr}{PATH}"), policy);
    ThresholdCard::new(Arc::new(api), CardOptions { show_errors: true })
}

fn reqwest_client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap()
}

async fn settle(card: &mut ThresholdCard<TunerApi>) -> Resolution {
    let msg = tokio::time::timeout(Duration::from_secs(5), card.next_message())
        .await
        .expect("fetch did not resolve")
        .expect("channel closed");
    card.apply(msg)
}

/// Tuner that succeeds until `healthy` is flipped off, then answers 500.
fn flaky_tuner(healthy: Arc<AtomicBool>) -> Router {
    Router::new().route(
        PATH,
        get(move || {
            let healthy = Arc::clone(&healthy);
            async move {
                if healthy.load(Ordering::SeqCst) {
                    Json(json!({
                        "status": "success",
                        "data": {
                            "avg_confidence": 0.91,
                            "avg_drift": 0.04,
                            "lower_threshold": 0.7,
                            "upper_threshold": 0.95,
                            "drift_alert_threshold": 0.15
                        }
                    }))
                    .into_response()
                } else {
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        Json(json!({"status": "error", "message": "Auto-tuning failed"})),
                    )
                        .into_response()
                }
            }
        }),
    )
}

#[tokio::test]
async fn card_renders_tuner_response_and_survives_outage() {
    let healthy = Arc::new(AtomicBool::new(true));
    let addr = serve(flaky_tuner(Arc::clone(&healthy))).await;
    let mut card = card_for(addr, StatusPolicy::Strict);

    card.mount();
    assert_eq!(settle(&mut card).await, Resolution::Succeeded);
    let text = card.render();
    for value in ["0.91", "0.04", "0.7", "0.95", "0.15"] {
        assert!(text.contains(value), "missing {value} in:\n{text}");
    }

    healthy.store(false, Ordering::SeqCst);
    card.refresh();
    assert_eq!(settle(&mut card).await, Resolution::Failed);

    // Last-known-good stays, the failure reason is surfaced.
    let text = card.render();
    assert!(text.contains("0.91"));
    assert!(text.contains("Auto-tuning failed"), "{text}");
    assert_eq!(card.phase(), Phase::Failure);
}

#[tokio::test]
async fn lenient_policy_treats_error_envelope_as_empty_success() {
    let addr = serve(flaky_tuner(Arc::new(AtomicBool::new(false)))).await;
    let mut card = card_for(addr, StatusPolicy::Lenient);

    card.mount();
    assert_eq!(settle(&mut card).await, Resolution::Succeeded);
    assert!(card.snapshot().is_none());
    assert!(card.render().contains(EMPTY_TEXT));
}

#[tokio::test]
async fn unreachable_tuner_shows_empty_state() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let mut card = card_for(addr, StatusPolicy::Strict);
    card.mount();
    assert_eq!(settle(&mut card).await, Resolution::Failed);

    let text = card.render();
    assert!(text.contains(EMPTY_TEXT));
    assert!(text.contains("HTTP request failed"));
    assert!(!card.is_loading());
}

#[tokio::test]
async fn falsy_data_after_success_clears_to_empty_state() {
    let drained = Arc::new(AtomicBool::new(false));
    let router = Router::new().route(
        PATH,
        get({
            let drained = Arc::clone(&drained);
            move || {
                let drained = Arc::clone(&drained);
                async move {
                    if drained.load(Ordering::SeqCst) {
                        Json(json!({"status": "success", "data": false}))
                    } else {
                        Json(json!({
                            "status": "success",
                            "data": {
                                "avg_confidence": 0.91,
                                "avg_drift": 0.04,
                                "lower_threshold": 0.7,
                                "upper_threshold": 0.95,
                                "drift_alert_threshold": 0.15
                            }
                        }))
                    }
                }
            }
        }),
    );
    let addr = serve(router).await;
    let mut card = card_for(addr, StatusPolicy::Strict);

    card.mount();
    assert_eq!(settle(&mut card).await, Resolution::Succeeded);
    assert!(card.snapshot().is_some());

    drained.store(true, Ordering::SeqCst);
    card.refresh();
    assert_eq!(settle(&mut card).await, Resolution::Succeeded);

    assert!(card.snapshot().is_none());
    assert_eq!(card.last_error(), None);
    let text = card.render();
    assert!(text.contains(EMPTY_TEXT), "{text}");
    assert!(!text.contains("0.91"));
    assert!(!text.contains("Last refresh failed"));
}

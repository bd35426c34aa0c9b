//! End-to-end checks against local axum servers standing in for the analysis
//! backend and the Gemini endpoint.

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::routing::get;
use axum::{Json, Router};
use marketlens_core::chat::{ChatSession, SendOutcome, SERVICE_ERROR_MESSAGE};
use marketlens_core::http::retry::{send_with_backoff, BackoffPolicy, RetryError};
use marketlens_core::http::{HttpRequest, ReqwestTransport};
use marketlens_core::llm::gemini::GeminiClient;
use marketlens_core::market::{BackendError, HttpMarketDataClient, MarketDataClient};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn transport() -> Arc<ReqwestTransport> {
    Arc::new(ReqwestTransport::new(Duration::from_secs(5)).unwrap())
}

fn fast_policy(max_attempts: u32) -> BackoffPolicy {
    BackoffPolicy::new(max_attempts, Duration::from_millis(10))
}

#[derive(Clone)]
struct Flaky {
    hits: Arc<AtomicUsize>,
    rate_limited: usize,
    failure: StatusCode,
}

async fn flaky(State(state): State<Flaky>) -> (StatusCode, String) {
    let n = state.hits.fetch_add(1, Ordering::SeqCst);
    if n < state.rate_limited {
        (state.failure, "slow down".to_string())
    } else {
        (StatusCode::OK, "done".to_string())
    }
}

#[tokio::test]
async fn retries_real_429s_until_success() {
    let hits = Arc::new(AtomicUsize::new(0));
    let app = Router::new().route("/work", get(flaky)).with_state(Flaky {
        hits: hits.clone(),
        rate_limited: 2,
        failure: StatusCode::TOO_MANY_REQUESTS,
    });
    let base = serve(app).await;

    let res = send_with_backoff(
        transport().as_ref(),
        &HttpRequest::get(format!("{base}/work")),
        &fast_policy(5),
    )
    .await
    .unwrap();

    assert_eq!(res.body, "done");
    assert_eq!(hits.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn server_error_is_not_retried() {
    let hits = Arc::new(AtomicUsize::new(0));
    let app = Router::new().route("/work", get(flaky)).with_state(Flaky {
        hits: hits.clone(),
        rate_limited: usize::MAX,
        failure: StatusCode::SERVICE_UNAVAILABLE,
    });
    let base = serve(app).await;

    let err = send_with_backoff(
        transport().as_ref(),
        &HttpRequest::get(format!("{base}/work")),
        &fast_policy(5),
    )
    .await
    .unwrap_err();

    let retry = err.downcast_ref::<RetryError>().unwrap();
    assert_eq!(retry.attempts(), 1);
    assert_eq!(retry.status().map(|s| s.as_u16()), Some(503));
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn market_client_reads_backend_payloads_and_errors() {
    let app = Router::new()
        .route(
            "/api/trending-stocks",
            get(|| async {
                Json(json!({
                    "success": true,
                    "message": "Trending stocks list.",
                    "results": [{
                        "ticker": "TCS",
                        "name": "Tata Consultancy Services Limited",
                        "current_price": 4100.0,
                        "today_change_percent": 1.2,
                        "volume_factor": 2.1,
                        "price_change_5d": 3.4,
                        "reason": "Volume spike"
                    }]
                }))
            }),
        )
        .route(
            "/api/full-analysis/:ticker",
            get(|| async {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({"error": "Failed to fetch price data for NOPE"})),
                )
            }),
        );
    let base = serve(app).await;
    let client = HttpMarketDataClient::new(transport(), &base);

    let trending = client.fetch_trending_stocks().await.unwrap();
    assert!(trending.success);
    assert_eq!(trending.results[0].ticker, "TCS");

    let err = client.fetch_full_analysis("nope").await.unwrap_err();
    let backend = err.downcast_ref::<BackendError>().unwrap();
    assert_eq!(backend.status, 500);
    assert_eq!(backend.message, "Failed to fetch price data for NOPE");
}

#[derive(Clone, Default)]
struct FakeGemini {
    hits: Arc<AtomicUsize>,
    seen: Arc<Mutex<Vec<(String, Option<String>, Value)>>>,
}

async fn fake_gemini(
    State(state): State<FakeGemini>,
    uri: Uri,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let n = state.hits.fetch_add(1, Ordering::SeqCst);
    let key = headers
        .get("x-goog-api-key")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    state
        .seen
        .lock()
        .unwrap()
        .push((uri.path().to_string(), key, body));

    if n == 0 {
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({"error": {"code": 429, "status": "RESOURCE_EXHAUSTED"}})),
        );
    }
    (
        StatusCode::OK,
        Json(json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "Nifty ended higher."}]},
                "finishReason": "STOP",
                "groundingMetadata": {
                    "groundingChunks": [{"web": {"uri": "https://news.example/nifty", "title": "news.example"}}]
                }
            }]
        })),
    )
}

#[tokio::test]
async fn chat_session_talks_to_gemini_endpoint() {
    let state = FakeGemini::default();
    // The model id contains a colon-suffixed action, so route everything to one handler.
    let app = Router::new()
        .fallback(fake_gemini)
        .with_state(state.clone());
    let base = serve(app).await;

    let client = GeminiClient::new(transport(), "test-key".to_string(), fast_policy(3))
        .with_base_url(&base);
    let mut session = ChatSession::new(Arc::new(client));

    let outcome = session.send("How did Nifty close?").await;
    assert!(matches!(outcome, SendOutcome::Answered), "{outcome:?}");

    let reply = session.last().unwrap();
    assert_eq!(reply.text, "Nifty ended higher.");
    assert_eq!(reply.sources[0].uri, "https://news.example/nifty");

    assert_eq!(state.hits.load(Ordering::SeqCst), 2);
    let seen = state.seen.lock().unwrap();
    let (path, key, body) = &seen[1];
    assert_eq!(path, "/v1beta/models/gemini-2.5-flash:generateContent");
    assert_eq!(key.as_deref(), Some("test-key"));
    assert_eq!(body["contents"][0]["parts"][0]["text"], "How did Nifty close?");
    assert!(body["tools"][0].get("google_search").is_some());
}

#[tokio::test]
async fn unreachable_gemini_yields_service_error_message() {
    // Nothing listens on port 9 locally; every attempt is a transport error.
    let client = GeminiClient::new(transport(), "k".to_string(), fast_policy(2))
        .with_base_url("http://127.0.0.1:9");
    let mut session = ChatSession::new(Arc::new(client));

    let outcome = session.send("hello").await;
    let err = outcome.error().unwrap();
    let retry = err.downcast_ref::<RetryError>().unwrap();
    assert_eq!(retry.attempts(), 2);
    assert_eq!(session.last().unwrap().text, SERVICE_ERROR_MESSAGE);
}

//! In-process stand-in for the OpenRouter chat completions endpoint

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::Value;

/// One request as the mock saw it
#[derive(Debug, Clone)]
pub struct Captured {
    pub authorization: Option<String>,
    pub title: Option<String>,
    pub referer: Option<String>,
    pub body: Value,
}

#[derive(Clone)]
struct MockState {
    status: StatusCode,
    reply: Value,
    delay: Duration,
    captured: Arc<Mutex<Vec<Captured>>>,
}

pub struct MockOpenRouter {
    pub url: String,
    captured: Arc<Mutex<Vec<Captured>>>,
}

impl MockOpenRouter {
    pub fn requests(&self) -> Vec<Captured> {
        self.captured.lock().unwrap().clone()
    }
}

async fn chat_completions(
    State(state): State<MockState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    state.captured.lock().unwrap().push(Captured {
        authorization: header("authorization"),
        title: header("x-title"),
        referer: header("http-referer"),
        body,
    });

    if !state.delay.is_zero() {
        tokio::time::sleep(state.delay).await;
    }
    (state.status, Json(state.reply.clone()))
}

/// Serve `reply` with `status` for every POST to /api/v1/chat/completions
pub fn spawn(status: StatusCode, reply: Value) -> MockOpenRouter {
    spawn_with_delay(status, reply, Duration::ZERO)
}

pub fn spawn_with_delay(status: StatusCode, reply: Value, delay: Duration) -> MockOpenRouter {
    let captured = Arc::new(Mutex::new(Vec::new()));
    let state = MockState {
        status,
        reply,
        delay,
        captured: captured.clone(),
    };

    let (tx, rx) = std::sync::mpsc::channel::<SocketAddr>();
    std::thread::spawn(move || {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async move {
            let app = Router::new()
                .route("/api/v1/chat/completions", post(chat_completions))
                .with_state(state);
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            tx.send(listener.local_addr().unwrap()).unwrap();
            axum::serve(listener, app).await.unwrap();
        });
    });

    let addr = rx.recv().unwrap();
    MockOpenRouter {
        url: format!("http://{}/api/v1/chat/completions", addr),
        captured,
    }
}

pub fn completion(text: &str) -> Value {
    serde_json::json!({
        "id": "gen-test",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "finish_reason": "stop",
            "message": {"role": "assistant", "content": text}
        }]
    })
}

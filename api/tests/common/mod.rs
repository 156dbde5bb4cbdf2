//! Shared fakes and request helpers for router tests.

#![allow(dead_code)]

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

use ai_llm_service::{
    AiLlmError, ChatModel, ChatRequest, Completion,
    error_handler::{Provider, ProviderError, ProviderErrorKind},
};
use api::{build_router, core::app_state::AppState};
use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, Response, StatusCode},
};
use git_raw_files::{FileSource, GitRawFilesError, GitRawFilesResult};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

pub const SECRET: &str = "test-extension-secret";
pub const KEY_HEADER: &str = "x-gitlore-extension-key";

/// Chat model that answers with a fixed script and counts calls.
pub struct FakeChat {
    reply: Result<String, ()>,
    calls: AtomicUsize,
    last: Mutex<Option<ChatRequest>>,
}

impl FakeChat {
    pub fn replying(text: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(text.into()),
            calls: AtomicUsize::new(0),
            last: Mutex::new(None),
        })
    }

    /// Every call fails with an empty-completion provider error.
    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            reply: Err(()),
            calls: AtomicUsize::new(0),
            last: Mutex::new(None),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<ChatRequest> {
        self.last.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatModel for FakeChat {
    async fn chat(&self, request: ChatRequest) -> Result<Completion, AiLlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last.lock().unwrap() = Some(request);
        match &self.reply {
            Ok(text) => Ok(Completion::new(text.clone())),
            Err(()) => Err(ProviderError::new(Provider::Gemini, ProviderErrorKind::EmptyCompletion).into()),
        }
    }
}

/// File source serving one fixed file, or failing with `NotFound`.
pub struct FakeFiles {
    content: Option<String>,
    calls: AtomicUsize,
    last: Mutex<Option<(String, String, String)>>,
}

impl FakeFiles {
    pub fn serving(content: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            content: Some(content.into()),
            calls: AtomicUsize::new(0),
            last: Mutex::new(None),
        })
    }

    pub fn missing() -> Arc<Self> {
        Arc::new(Self {
            content: None,
            calls: AtomicUsize::new(0),
            last: Mutex::new(None),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_location(&self) -> Option<(String, String, String)> {
        self.last.lock().unwrap().clone()
    }
}

#[async_trait]
impl FileSource for FakeFiles {
    async fn fetch_raw(&self, owner: &str, repo: &str, path: &str) -> GitRawFilesResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last.lock().unwrap() = Some((owner.into(), repo.into(), path.into()));
        self.content.clone().ok_or(GitRawFilesError::NotFound)
    }
}

pub fn app(chat: Arc<FakeChat>, files: Arc<FakeFiles>) -> Router {
    build_router(Arc::new(AppState::new(SECRET, chat, files)))
}

pub fn app_with_chat(chat: Arc<FakeChat>) -> Router {
    app(chat, FakeFiles::missing())
}

/// JSON POST carrying the extension key when `key` is given.
pub fn post_json(uri: &str, key: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(key) = key {
        builder = builder.header(KEY_HEADER, key);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub async fn send(app: Router, req: Request<Body>) -> Response<Body> {
    app.oneshot(req).await.unwrap()
}

/// Sends `req` and returns status plus decoded JSON body.
pub async fn send_json(app: Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = send(app, req).await;
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

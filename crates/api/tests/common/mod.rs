#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use jsonwebtoken::{encode, EncodingKey, Header};
use sqlx::PgPool;
use tower::ServiceExt;
use vidsqueeze_api::auth::session::{SessionClaims, SessionConfig, SessionKey, SessionVerifier};
use vidsqueeze_api::config::{ServerConfig, DEFAULT_MAX_UPLOAD_BYTES};
use vidsqueeze_api::router::build_app_router;
use vidsqueeze_api::state::AppState;
use vidsqueeze_cloud::genai::{GenAiError, TextGenerator};
use vidsqueeze_cloud::media::{
    DestroyOutcome, MediaError, MediaProvider, ResourceType, UploadFile, UploadOptions,
    UploadedAsset,
};
use vidsqueeze_core::access::AccessPolicy;

pub const SESSION_SECRET: &str = "test-session-secret-long-enough-for-hmac";

// ---------------------------------------------------------------------------
// Fakes
// ---------------------------------------------------------------------------

/// What the fake media service answers for an upload.
#[derive(Debug, Clone)]
pub enum UploadBehavior {
    Succeed { bytes: u64, duration: Option<f64> },
    TimeOut,
}

/// What the fake media service answers for a destroy.
#[derive(Debug, Clone)]
pub enum DestroyBehavior {
    Report(DestroyOutcome),
    Fail,
}

/// One upload the fake received.
#[derive(Debug, Clone)]
pub struct RecordedUpload {
    pub file_name: String,
    pub len: usize,
    pub folder: String,
    pub resource_type: ResourceType,
    pub has_transformation: bool,
}

/// In-memory media service.
pub struct FakeMedia {
    pub upload: UploadBehavior,
    pub destroy: DestroyBehavior,
    pub uploads: Mutex<Vec<RecordedUpload>>,
    pub destroyed: Mutex<Vec<String>>,
    counter: Mutex<u32>,
}

impl FakeMedia {
    pub fn new(upload: UploadBehavior, destroy: DestroyBehavior) -> Self {
        Self {
            upload,
            destroy,
            uploads: Mutex::new(Vec::new()),
            destroyed: Mutex::new(Vec::new()),
            counter: Mutex::new(0),
        }
    }

    pub fn ok() -> Self {
        Self::new(
            UploadBehavior::Succeed {
                bytes: 77414,
                duration: Some(38.0),
            },
            DestroyBehavior::Report(DestroyOutcome::Deleted),
        )
    }

    pub fn uploads(&self) -> Vec<RecordedUpload> {
        self.uploads.lock().unwrap().clone()
    }

    pub fn destroyed(&self) -> Vec<String> {
        self.destroyed.lock().unwrap().clone()
    }
}

#[async_trait]
impl MediaProvider for FakeMedia {
    async fn upload(
        &self,
        file: UploadFile,
        options: &UploadOptions,
    ) -> Result<UploadedAsset, MediaError> {
        self.uploads.lock().unwrap().push(RecordedUpload {
            file_name: file.file_name.clone(),
            len: file.bytes.len(),
            folder: options.folder.clone(),
            resource_type: options.resource_type,
            has_transformation: options.transformation.is_some(),
        });
        match &self.upload {
            UploadBehavior::Succeed { bytes, duration } => {
                let n = {
                    let mut counter = self.counter.lock().unwrap();
                    *counter += 1;
                    *counter
                };
                Ok(UploadedAsset {
                    public_id: format!("{}/asset-{n}", options.folder),
                    bytes: *bytes,
                    duration: *duration,
                })
            }
            UploadBehavior::TimeOut => Err(MediaError::Timeout),
        }
    }

    async fn destroy(
        &self,
        public_id: &str,
        _resource_type: ResourceType,
    ) -> Result<DestroyOutcome, MediaError> {
        self.destroyed.lock().unwrap().push(public_id.to_string());
        match &self.destroy {
            DestroyBehavior::Report(outcome) => Ok(outcome.clone()),
            DestroyBehavior::Fail => Err(MediaError::Api {
                status: 502,
                message: "bad gateway".into(),
            }),
        }
    }
}

/// What the fake text generator answers.
#[derive(Debug, Clone)]
pub enum TextBehavior {
    Reply(String),
    Overloaded,
    Fail,
}

pub struct FakeText {
    pub behavior: TextBehavior,
    pub prompts: Mutex<Vec<String>>,
}

impl FakeText {
    pub fn new(behavior: TextBehavior) -> Self {
        Self {
            behavior,
            prompts: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl TextGenerator for FakeText {
    async fn generate(&self, prompt: &str) -> Result<String, GenAiError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match &self.behavior {
            TextBehavior::Reply(text) => Ok(text.clone()),
            TextBehavior::Overloaded => Err(GenAiError::Overloaded),
            TextBehavior::Fail => Err(GenAiError::Api {
                status: 400,
                message: "API key not valid".into(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

/// Build a test `ServerConfig` with safe defaults and an HS256 session secret.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        static_dir: None,
        access: AccessPolicy::default(),
        session: SessionConfig {
            key: SessionKey::Hs256Secret(SESSION_SECRET.to_string()),
            authorized_parties: vec![],
        },
    }
}

pub fn test_state(
    pool: PgPool,
    media: Option<Arc<dyn MediaProvider>>,
    text: Option<Arc<dyn TextGenerator>>,
) -> AppState {
    let config = test_config();
    let sessions = SessionVerifier::new(&config.session).unwrap();
    AppState {
        pool,
        config: Arc::new(config),
        sessions: Arc::new(sessions),
        media,
        text,
    }
}

/// Full application router, same middleware stack as production.
pub fn build_test_app_with(
    pool: PgPool,
    media: Option<Arc<dyn MediaProvider>>,
    text: Option<Arc<dyn TextGenerator>>,
) -> Router {
    let state = test_state(pool, media, text);
    let config = test_config();
    build_app_router(state, &config)
}

/// Router with a succeeding media fake and a canned text reply.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with(
        pool,
        Some(Arc::new(FakeMedia::ok())),
        Some(Arc::new(FakeText::new(TextBehavior::Reply(
            "A short description.".into(),
        )))),
    )
}

// ---------------------------------------------------------------------------
// Sessions
// ---------------------------------------------------------------------------

/// Mint a session token the test verifier accepts.
pub fn session_token(user_id: &str) -> String {
    let now = chrono::Utc::now().timestamp();
    let claims = SessionClaims {
        sub: user_id.to_string(),
        sid: Some("sess_test".to_string()),
        exp: now + 600,
        iat: now,
        azp: None,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(SESSION_SECRET.as_bytes()),
    )
    .unwrap()
}

fn bearer() -> String {
    format!("Bearer {}", session_token("user_test"))
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

pub async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn get_authed(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .uri(uri)
        .header(AUTHORIZATION, bearer())
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json_authed(app: Router, uri: &str, body: serde_json::Value) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(AUTHORIZATION, bearer())
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn delete_authed(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .header(AUTHORIZATION, bearer())
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

const BOUNDARY: &str = "----vidsqueeze-test-boundary";

/// A file part of a multipart form.
pub struct FilePart<'a> {
    pub file_name: &'a str,
    pub content_type: &'a str,
    pub bytes: &'a [u8],
}

/// Encode a `multipart/form-data` body.
pub fn multipart_body(fields: &[(&str, &str)], file: Option<FilePart<'_>>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some(file) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                file.file_name, file.content_type
            )
            .as_bytes(),
        );
        body.extend_from_slice(file.bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub async fn post_multipart(app: Router, uri: &str, body: Vec<u8>, authed: bool) -> Response {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        );
    if authed {
        builder = builder.header(AUTHORIZATION, bearer());
    }
    send(app, builder.body(Body::from(body)).unwrap()).await
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

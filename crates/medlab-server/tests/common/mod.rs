#![allow(dead_code)]

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, Response, header},
};
use base64::{Engine, engine::general_purpose::STANDARD};
use medlab_auth::{AuthState, PasswordEncoding};
use medlab_server::{AppConfig, AppState, bootstrap, build_app};
use medlab_storage::DynStorage;
use serde_json::Value;
use tower::ServiceExt;

pub fn clinic_auth() -> AuthState {
    AuthState::clinic(PasswordEncoding::Noop).expect("auth state")
}

/// Router over `storage`, seeded with the sample patients.
pub async fn app_with(storage: DynStorage, auth: AuthState) -> Router {
    bootstrap::seed_patients(storage.as_ref())
        .await
        .expect("seed patients");
    build_app(&AppConfig::default(), AppState::new(storage, auth))
}

pub fn basic(username: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{username}:{password}")))
}

pub fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

pub fn head(uri: &str) -> Request<Body> {
    Request::head(uri).body(Body::empty()).unwrap()
}

pub fn get_as(uri: &str, authorization: &str) -> Request<Body> {
    Request::get(uri)
        .header(header::AUTHORIZATION, authorization)
        .body(Body::empty())
        .unwrap()
}

pub fn post_json(uri: &str, body: &Value, authorization: Option<&str>) -> Request<Body> {
    let mut builder = Request::post(uri).header(header::CONTENT_TYPE, "application/json");
    if let Some(authorization) = authorization {
        builder = builder.header(header::AUTHORIZATION, authorization);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

/// POST with a raw body, for payloads that are not valid JSON.
pub fn post_raw(uri: &str, body: &str, authorization: Option<&str>) -> Request<Body> {
    let mut builder = Request::post(uri).header(header::CONTENT_TYPE, "application/json");
    if let Some(authorization) = authorization {
        builder = builder.header(header::AUTHORIZATION, authorization);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub async fn send(app: &Router, req: Request<Body>) -> Response<Body> {
    app.clone().oneshot(req).await.expect("router is infallible")
}

pub async fn json_body(res: Response<Body>) -> Value {
    let bytes = to_bytes(res.into_body(), usize::MAX).await.expect("read body");
    serde_json::from_slice(&bytes).expect("json body")
}

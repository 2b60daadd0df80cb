use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, Response, StatusCode};
use axum::Router;

use crate::core::time::primitive_now_utc;
use crate::core::{config::Settings, security, state::AppState};
use crate::db::models::User;
use crate::db::types::UserRole;
use crate::db::DocumentStore;
use crate::repositories;

pub(crate) struct TestContext {
    pub(crate) state: AppState,
    pub(crate) app: Router,
}

fn set_test_env() {
    std::env::set_var("EDULINK_ENV", "test");
    std::env::set_var("SECRET_KEY", "test-secret");
}

/// Fresh settings, an empty store, and the full router. Each test gets its own
/// store so tests can run in parallel.
pub(crate) async fn setup_test_context() -> TestContext {
    set_test_env();

    let settings = Settings::load().expect("test settings");
    let state = AppState::new(settings, DocumentStore::new());
    let app = crate::api::router::router(state.clone());

    TestContext { state, app }
}

async fn insert_user(
    state: &AppState,
    id: &str,
    role: UserRole,
    class: Option<&str>,
    children: &[&str],
) -> User {
    let user = User {
        id: id.to_string(),
        full_name: format!("Test {id}"),
        role,
        class: class.map(|value| value.to_string()),
        children_ids: children.iter().map(|child| child.to_string()).collect(),
        is_active: true,
        created_at: primitive_now_utc(),
    };
    repositories::users::create(state.store(), user).await
}

pub(crate) async fn insert_student(state: &AppState, id: &str, class: &str) -> User {
    insert_user(state, id, UserRole::Student, Some(class), &[]).await
}

pub(crate) async fn insert_teacher(state: &AppState, id: &str) -> User {
    insert_user(state, id, UserRole::Teacher, None, &[]).await
}

pub(crate) async fn insert_parent(state: &AppState, id: &str, children: &[&str]) -> User {
    insert_user(state, id, UserRole::Parent, None, children).await
}

pub(crate) async fn insert_admin(state: &AppState, id: &str) -> User {
    insert_user(state, id, UserRole::Admin, None, &[]).await
}

pub(crate) fn bearer_for(state: &AppState, user_id: &str) -> String {
    let token =
        security::create_access_token(user_id, state.settings(), None).expect("access token");
    format!("Bearer {token}")
}

pub(crate) fn json_request(
    method: Method,
    uri: &str,
    bearer: Option<&str>,
    body: Option<serde_json::Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(bearer) = bearer {
        builder = builder.header(header::AUTHORIZATION, bearer);
    }

    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request"),
        None => builder.body(Body::empty()).expect("request"),
    }
}

pub(crate) async fn read_json(response: Response<Body>) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    serde_json::from_slice(&bytes).expect("json body")
}

pub(crate) async fn assert_status_and_json(
    response: Response<Body>,
    expected: StatusCode,
) -> serde_json::Value {
    assert_eq!(response.status(), expected);
    read_json(response).await
}

//! API routes

use crate::api::handlers::{
    create_entry, delete_entry, get_entry, list_entries, update_entry, AppState,
};
use crate::auth::handlers::{login, register};
use crate::auth::middleware::authenticate;
use axum::{
    middleware,
    response::Json,
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};

/// Build the API routes
pub fn build_api_routes(state: AppState) -> Router {
    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/health", get(health_check))
        .with_state(state.clone());

    // Protected routes (authentication required)
    let protected_routes = Router::new()
        .route("/api/entries", get(list_entries).post(create_entry))
        .route(
            "/api/entries/:id",
            get(get_entry).put(update_entry).delete(delete_entry),
        )
        .layer(middleware::from_fn_with_state(state.clone(), authenticate))
        .with_state(state);

    public_routes.merge(protected_routes)
}

/// Health check endpoint handler
async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().timestamp(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::TokenService;
    use crate::db::manager::DatabaseManager;
    use crate::db::repository::{AccountRepository, EntryRepository};
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn test_router() -> Router {
        let db = Arc::new(DatabaseManager::new_in_memory().unwrap());
        let state = AppState {
            account_repo: Arc::new(AccountRepository::new(db.clone())),
            entry_repo: Arc::new(EntryRepository::new(db)),
            token_service: Arc::new(TokenService::new(
                "test-secret",
                chrono::Duration::hours(24),
            )),
            bcrypt_cost: 4,
        };
        build_api_routes(state)
    }

    async fn call(
        router: &Router,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<serde_json::Value>,
    ) -> (StatusCode, serde_json::Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn register_and_login(router: &Router, email: &str, password: &str) -> String {
        let (status, _) = call(
            router,
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({"email": email, "password": password})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = call(
            router,
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({"email": email, "password": password})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        body["token"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_health_check() {
        let router = test_router();
        let (status, body) = call(&router, Method::GET, "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_register_returns_account_without_secrets() {
        let router = test_router();
        let (status, body) = call(
            &router,
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({"email": "a@x.com", "password": "secret1"})),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert!(body["id"].is_string());
        assert_eq!(body["email"], "a@x.com");
        assert!(body.get("password").is_none());
        assert!(body.get("password_hash").is_none());
    }

    #[tokio::test]
    async fn test_register_duplicate_email_conflict() {
        let router = test_router();
        let payload = json!({"email": "a@x.com", "password": "secret1"});

        let (status, _) = call(&router, Method::POST, "/api/auth/register", None, Some(payload.clone())).await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) =
            call(&router, Method::POST, "/api/auth/register", None, Some(payload)).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "DuplicateEmail");

        // Same address with different case is still a duplicate
        let (status, _) = call(
            &router,
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({"email": "A@X.COM ", "password": "secret2"})),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_register_validation() {
        let router = test_router();

        let (status, body) = call(
            &router,
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({"email": "not-an-email", "password": "secret1"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "ValidationError");

        let (status, _) = call(
            &router,
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({"email": "a@x.com", "password": "short"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let router = test_router();
        let (status, _) = call(
            &router,
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({"email": "a@x.com", "password": "secret1"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (unknown_status, unknown_body) = call(
            &router,
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({"email": "nobody@x.com", "password": "secret1"})),
        )
        .await;
        let (wrong_status, wrong_body) = call(
            &router,
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({"email": "a@x.com", "password": "wrong-password"})),
        )
        .await;

        assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
        assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
        // Identical error kind and message; only the trace ID differs
        assert_eq!(unknown_body["error"], wrong_body["error"]);
        assert_eq!(unknown_body["message"], wrong_body["message"]);
    }

    #[tokio::test]
    async fn test_login_then_create_and_list() {
        let router = test_router();
        let token = register_and_login(&router, "a@x.com", "secret1").await;

        let (status, created) = call(
            &router,
            Method::POST,
            "/api/entries",
            Some(&token),
            Some(json!({"title": "Day 1", "content": "notes"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert!(created["id"].is_string());
        assert_eq!(created["title"], "Day 1");
        assert_eq!(created["content"], "notes");

        let (status, listed) =
            call(&router, Method::GET, "/api/entries", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        let listed = listed.as_array().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0]["id"], created["id"]);
    }

    #[tokio::test]
    async fn test_missing_token_unauthorized() {
        let router = test_router();
        let (status, body) = call(&router, Method::GET, "/api/entries", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "AuthenticationError");
    }

    #[tokio::test]
    async fn test_invalid_token_forbidden() {
        let router = test_router();

        let (status, body) = call(
            &router,
            Method::GET,
            "/api/entries",
            Some("garbage-token"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"], "AuthorizationError");

        // A token signed with a different secret is rejected the same way
        let forged = TokenService::new("other-secret", chrono::Duration::hours(24))
            .issue("some-account")
            .unwrap();
        let (status, _) = call(
            &router,
            Method::GET,
            "/api/entries",
            Some(&forged.token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        // As is an expired one
        let expired = TokenService::new("test-secret", chrono::Duration::seconds(-30))
            .issue("some-account")
            .unwrap();
        let (status, _) = call(
            &router,
            Method::GET,
            "/api/entries",
            Some(&expired.token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_entry_validation() {
        let router = test_router();
        let token = register_and_login(&router, "a@x.com", "secret1").await;

        let (status, body) = call(
            &router,
            Method::POST,
            "/api/entries",
            Some(&token),
            Some(json!({"title": "x".repeat(101), "content": "notes"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "ValidationError");

        let (status, _) = call(
            &router,
            Method::POST,
            "/api/entries",
            Some(&token),
            Some(json!({"title": "Day 1", "content": ""})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_update_miss_reported_before_validation() {
        let router = test_router();
        let token_a = register_and_login(&router, "a@x.com", "secret1").await;
        let token_b = register_and_login(&router, "b@x.com", "secret2").await;

        let (_, created) = call(
            &router,
            Method::POST,
            "/api/entries",
            Some(&token_a),
            Some(json!({"title": "Day 1", "content": "notes"})),
        )
        .await;
        let id = created["id"].as_str().unwrap().to_string();

        let invalid_body = json!({"title": "", "content": ""});

        // An invalid body against a missing entry is a miss, not a 400
        let (status, body) = call(
            &router,
            Method::PUT,
            "/api/entries/no-such-entry",
            Some(&token_a),
            Some(invalid_body.clone()),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "NotFoundOrForbidden");

        // Same against another account's entry
        let (status, _) = call(
            &router,
            Method::PUT,
            &format!("/api/entries/{}", id),
            Some(&token_b),
            Some(invalid_body.clone()),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        // The owner with an invalid body still gets the validation error
        let (status, body) = call(
            &router,
            Method::PUT,
            &format!("/api/entries/{}", id),
            Some(&token_a),
            Some(invalid_body),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "ValidationError");
    }

    #[tokio::test]
    async fn test_update_and_delete_own_entry() {
        let router = test_router();
        let token = register_and_login(&router, "a@x.com", "secret1").await;

        let (_, created) = call(
            &router,
            Method::POST,
            "/api/entries",
            Some(&token),
            Some(json!({"title": "Day 1", "content": "notes"})),
        )
        .await;
        let id = created["id"].as_str().unwrap().to_string();

        let (status, updated) = call(
            &router,
            Method::PUT,
            &format!("/api/entries/{}", id),
            Some(&token),
            Some(json!({"title": "Day 1 (edited)", "content": "more notes"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["title"], "Day 1 (edited)");
        assert_eq!(updated["created_at"], created["created_at"]);

        let (status, _) = call(
            &router,
            Method::DELETE,
            &format!("/api/entries/{}", id),
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, body) = call(
            &router,
            Method::GET,
            &format!("/api/entries/{}", id),
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "NotFoundOrForbidden");
    }

    #[tokio::test]
    async fn test_cross_account_denial() {
        let router = test_router();
        let token_a = register_and_login(&router, "a@x.com", "secret1").await;
        let token_b = register_and_login(&router, "b@x.com", "secret2").await;

        let (_, created) = call(
            &router,
            Method::POST,
            "/api/entries",
            Some(&token_a),
            Some(json!({"title": "Day 1", "content": "notes"})),
        )
        .await;
        let id = created["id"].as_str().unwrap().to_string();

        // B's listing never includes A's entry
        let (_, listed) = call(&router, Method::GET, "/api/entries", Some(&token_b), None).await;
        assert!(listed.as_array().unwrap().is_empty());

        // B's update, get and delete all see the same 404 as a missing entry
        let (status, update_body) = call(
            &router,
            Method::PUT,
            &format!("/api/entries/{}", id),
            Some(&token_b),
            Some(json!({"title": "stolen", "content": "gone"})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, missing_body) = call(
            &router,
            Method::GET,
            "/api/entries/no-such-entry",
            Some(&token_b),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(update_body["error"], missing_body["error"]);
        assert_eq!(update_body["message"], missing_body["message"]);

        let (status, _) = call(
            &router,
            Method::DELETE,
            &format!("/api/entries/{}", id),
            Some(&token_b),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        // A's entry is unchanged in storage
        let (status, entry) = call(
            &router,
            Method::GET,
            &format!("/api/entries/{}", id),
            Some(&token_a),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(entry["title"], "Day 1");
        assert_eq!(entry["content"], "notes");
    }
}

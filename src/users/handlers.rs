use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use super::{
    dto::{AuthResponse, LoginRequest, MessageResponse, RegisterRequest, UpdateUserRequest, UserResponse},
    error::UserError,
};
use crate::{auth::jwt::AuthUser, state::AppState};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/user/register", post(register))
        .route("/user/login", post(login))
        .route("/user/me", get(get_me))
        .route(
            "/user/:id",
            get(get_user).put(update_user).delete(delete_user),
        )
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), UserError> {
    let (user, token) = state
        .users
        .register(&payload.email, &payload.password, &payload.name)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "User registered successfully",
            user: user.into(),
            token,
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, UserError> {
    let (user, token) = state.users.login(&payload.email, &payload.password).await?;
    Ok(Json(AuthResponse {
        message: "Login successful",
        user: user.into(),
        token,
    }))
}

#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UserResponse>, UserError> {
    let user = state.users.get_by_id(&id).await?;
    Ok(Json(UserResponse {
        message: None,
        user: user.into(),
    }))
}

#[instrument(skip(state, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, UserError> {
    let user = state
        .users
        .update(&id, &payload.email, &payload.name)
        .await?;
    Ok(Json(UserResponse {
        message: Some("User updated successfully"),
        user: user.into(),
    }))
}

#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, UserError> {
    state.users.delete(&id).await?;
    Ok(Json(MessageResponse {
        message: "User deleted successfully",
    }))
}

#[instrument(skip(state, claims))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
) -> Result<Json<UserResponse>, UserError> {
    let user = state.users.current(claims.sub).await?;
    Ok(Json(UserResponse {
        message: None,
        user: user.into(),
    }))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Method, Request},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::app::build_app;

    async fn call(app: Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        call_with_auth(app, method, uri, body, None).await
    }

    async fn call_with_auth(
        app: Router,
        method: Method,
        uri: &str,
        body: Option<Value>,
        bearer: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut req = Request::builder().method(method).uri(uri);
        if let Some(token) = bearer {
            req = req.header("authorization", format!("Bearer {token}"));
        }
        let req = match body {
            Some(b) => req
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(&b).unwrap())),
            None => req.body(Body::empty()),
        }
        .unwrap();

        let resp = app.oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    fn app() -> Router {
        build_app(AppState::fake())
    }

    async fn sign_up(app: &Router, email: &str) -> Value {
        let (status, body) = call(
            app.clone(),
            Method::POST,
            "/user/register",
            Some(json!({"email": email, "password": "password1", "name": "Ana"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        body
    }

    #[tokio::test]
    async fn register_responds_201_with_public_user_and_token() {
        let app = app();
        let body = sign_up(&app, "ana@example.com").await;
        assert_eq!(body["user"]["email"], "ana@example.com");
        assert_eq!(body["user"]["name"], "Ana");
        assert!(body["user"]["id"].is_string());
        assert!(body["user"].get("password").is_none());
        assert!(body["user"].get("password_hash").is_none());
        assert!(!body["token"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn register_error_statuses() {
        let app = app();
        sign_up(&app, "ana@example.com").await;

        let (status, body) = call(
            app.clone(),
            Method::POST,
            "/user/register",
            Some(json!({"email": "ana@example.com", "password": "password1", "name": "Ana"})),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "Email already exists");

        let (status, _) = call(
            app.clone(),
            Method::POST,
            "/user/register",
            Some(json!({"email": "not-an-email", "password": "password1", "name": "Ana"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = call(
            app,
            Method::POST,
            "/user/register",
            Some(json!({"email": "bob@example.com", "password": "short"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn login_statuses() {
        let app = app();
        sign_up(&app, "ana@example.com").await;

        let (status, body) = call(
            app.clone(),
            Method::POST,
            "/user/login",
            Some(json!({"email": "ana@example.com", "password": "password1"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["token"].is_string());

        let (bad_pw, bad_pw_body) = call(
            app.clone(),
            Method::POST,
            "/user/login",
            Some(json!({"email": "ana@example.com", "password": "nope-nope"})),
        )
        .await;
        let (unknown, unknown_body) = call(
            app,
            Method::POST,
            "/user/login",
            Some(json!({"email": "who@example.com", "password": "password1"})),
        )
        .await;
        assert_eq!(bad_pw, StatusCode::UNAUTHORIZED);
        assert_eq!(unknown, StatusCode::UNAUTHORIZED);
        assert_eq!(bad_pw_body, unknown_body);
    }

    #[tokio::test]
    async fn get_update_delete_by_id() {
        let app = app();
        let created = sign_up(&app, "ana@example.com").await;
        let uri = format!("/user/{}", created["user"]["id"].as_str().unwrap());

        let (status, body) = call(app.clone(), Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["user"]["email"], "ana@example.com");

        let (status, body) = call(
            app.clone(),
            Method::PUT,
            &uri,
            Some(json!({"email": "ana@example.com", "name": "Ana Maria"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["user"]["name"], "Ana Maria");

        let (status, body) = call(app.clone(), Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "User deleted successfully");

        let (status, _) = call(app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn malformed_id_is_400() {
        let (status, body) = call(app(), Method::GET, "/user/not-a-uuid", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid user id");
    }

    #[tokio::test]
    async fn me_requires_valid_bearer_token() {
        let app = app();
        let created = sign_up(&app, "ana@example.com").await;
        let token = created["token"].as_str().unwrap().to_string();

        let (status, body) =
            call_with_auth(app.clone(), Method::GET, "/user/me", None, Some(&token)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["user"]["id"], created["user"]["id"]);

        let (status, _) = call(app.clone(), Method::GET, "/user/me", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) =
            call_with_auth(app, Method::GET, "/user/me", None, Some("garbage")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}

use axum::{
    extract::{FromRef, State},
    http::{header, HeaderMap, StatusCode},
    routing::{get, post, put},
    Json, Router,
};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::{
        dto::{
            AuthResponse, ChangePasswordRequest, LoginRequest, MessageResponse, PublicUser,
            RefreshRequest, RegisterRequest, SuccessResponse, UpdateProfileRequest,
            UpdateProfileResponse,
        },
        repo::User,
        services::{
            cleared_cookie, cookie_value, hash_password, is_valid_email, session_cookie,
            verify_password, AuthUser, JwtKeys, ACCESS_COOKIE, REFRESH_COOKIE,
        },
    },
    state::AppState,
};

const MIN_PASSWORD_LEN: usize = 6;

type AuthError = (StatusCode, String);

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/force-logout", post(force_logout))
        .route("/refresh", post(refresh))
}

pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/update", put(update_profile))
        .route("/change-password", put(change_password))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/user", get(get_me))
}

fn server_error(e: impl std::fmt::Display, what: &str) -> AuthError {
    error!(error = %e, "{} failed", what);
    (StatusCode::INTERNAL_SERVER_ERROR, "Server error".into())
}

/// Signs a fresh token pair and the cookies that carry it.
fn issue_session(
    state: &AppState,
    user: User,
    message: &str,
) -> Result<(HeaderMap, Json<AuthResponse>), AuthError> {
    let keys = JwtKeys::from_ref(state);
    let access_token = keys
        .sign_access(user.id)
        .map_err(|e| server_error(e, "jwt sign access"))?;
    let refresh_token = keys
        .sign_refresh(user.id)
        .map_err(|e| server_error(e, "jwt sign refresh"))?;

    let secure = state.config.cookie_secure;
    let mut headers = HeaderMap::new();
    headers.append(
        header::SET_COOKIE,
        session_cookie(ACCESS_COOKIE, &access_token, keys.access_ttl, secure)?,
    );
    headers.append(
        header::SET_COOKIE,
        session_cookie(REFRESH_COOKIE, &refresh_token, keys.refresh_ttl, secure)?,
    );

    Ok((
        headers,
        Json(AuthResponse {
            message: message.into(),
            access_token,
            refresh_token,
            user: PublicUser {
                id: user.id,
                name: user.name,
                email: user.email,
            },
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(mut payload): Json<RegisterRequest>,
) -> Result<(HeaderMap, Json<AuthResponse>), AuthError> {
    payload.name = payload.name.trim().to_string();
    payload.email = payload.email.trim().to_lowercase();

    if payload.name.is_empty() || payload.email.is_empty() || payload.password.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Please fill in all fields".into()));
    }

    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err((StatusCode::BAD_REQUEST, "Invalid email".into()));
    }

    if payload.password.len() < MIN_PASSWORD_LEN {
        warn!("password too short");
        return Err((
            StatusCode::BAD_REQUEST,
            "Password must be at least 6 characters".into(),
        ));
    }

    match User::find_by_email(&state.db, &payload.email).await {
        Ok(Some(_)) => {
            warn!(email = %payload.email, "email already registered");
            return Err((StatusCode::CONFLICT, "User already exists".into()));
        }
        Ok(None) => {}
        Err(e) => return Err(server_error(e, "find_by_email")),
    }

    let hash = hash_password(&payload.password).map_err(|e| server_error(e, "hash_password"))?;

    let user = match User::create(&state.db, &payload.name, &payload.email, &hash).await {
        Ok(u) => u,
        Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
            return Err((StatusCode::CONFLICT, "User already exists".into()));
        }
        Err(e) => return Err(server_error(e, "create user")),
    };

    info!(user_id = %user.id, email = %user.email, "user registered");
    issue_session(&state, user, "User registered successfully")
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(mut payload): Json<LoginRequest>,
) -> Result<(HeaderMap, Json<AuthResponse>), AuthError> {
    payload.email = payload.email.trim().to_lowercase();

    if payload.email.is_empty() || payload.password.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Please fill in all fields".into()));
    }

    let user = match User::find_by_email(&state.db, &payload.email).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            warn!(email = %payload.email, "login unknown email");
            return Err((StatusCode::UNAUTHORIZED, "Invalid credentials".into()));
        }
        Err(e) => return Err(server_error(e, "find_by_email")),
    };

    let ok = verify_password(&payload.password, &user.password_hash)
        .map_err(|e| server_error(e, "verify_password"))?;

    if !ok {
        warn!(email = %payload.email, user_id = %user.id, "login invalid password");
        return Err((StatusCode::UNAUTHORIZED, "Invalid credentials".into()));
    }

    info!(user_id = %user.id, email = %user.email, "user logged in");
    issue_session(&state, user, "Logged in successfully")
}

fn clear_session(state: &AppState, message: &str) -> (HeaderMap, Json<MessageResponse>) {
    let secure = state.config.cookie_secure;
    let mut headers = HeaderMap::new();
    headers.append(header::SET_COOKIE, cleared_cookie(ACCESS_COOKIE, secure));
    headers.append(header::SET_COOKIE, cleared_cookie(REFRESH_COOKIE, secure));
    (
        headers,
        Json(MessageResponse {
            message: message.into(),
        }),
    )
}

#[instrument(skip(state))]
pub async fn logout(State(state): State<AppState>) -> (HeaderMap, Json<MessageResponse>) {
    clear_session(&state, "Logged out successfully")
}

/// Clears the session cookies whether or not the caller holds a valid token.
#[instrument(skip(state))]
pub async fn force_logout(State(state): State<AppState>) -> (HeaderMap, Json<MessageResponse>) {
    info!("forced session clear");
    clear_session(&state, "All sessions cleared")
}

/// Refresh token comes from the body, or from the refresh cookie.
fn refresh_token_from(headers: &HeaderMap, body: Option<RefreshRequest>) -> Option<String> {
    body.map(|b| b.refresh_token)
        .filter(|t| !t.is_empty())
        .or_else(|| cookie_value(headers, REFRESH_COOKIE))
}

async fn load_user(state: &AppState, user_id: Uuid) -> Result<User, AuthError> {
    match User::find_by_id(&state.db, user_id).await {
        Ok(Some(u)) => Ok(u),
        Ok(None) => {
            warn!(%user_id, "user not found");
            Err((StatusCode::UNAUTHORIZED, "User not found".into()))
        }
        Err(e) => Err(server_error(e, "find_by_id")),
    }
}

#[instrument(skip(state, headers, payload))]
pub async fn refresh(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Option<Json<RefreshRequest>>,
) -> Result<(HeaderMap, Json<AuthResponse>), AuthError> {
    let token = refresh_token_from(&headers, payload.map(|Json(p)| p))
        .ok_or((StatusCode::UNAUTHORIZED, "Refresh token required".to_string()))?;

    let claims = JwtKeys::from_ref(&state)
        .verify_refresh(&token)
        .map_err(|e| (StatusCode::UNAUTHORIZED, e.to_string()))?;

    let user = load_user(&state, claims.sub).await?;
    issue_session(&state, user, "Token refreshed")
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<PublicUser>, AuthError> {
    let user = load_user(&state, user_id).await?;
    Ok(Json(PublicUser {
        id: user.id,
        name: user.name,
        email: user.email,
    }))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

#[instrument(skip(state, payload))]
pub async fn update_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<UpdateProfileResponse>, AuthError> {
    let name = non_blank(payload.name);
    let email = non_blank(payload.email).map(|e| e.to_lowercase());

    if name.is_none() && email.is_none() {
        return Err((StatusCode::BAD_REQUEST, "Nothing to update".into()));
    }
    if let Some(email) = &email {
        if !is_valid_email(email) {
            warn!(%email, "invalid email");
            return Err((StatusCode::BAD_REQUEST, "Invalid email format".into()));
        }
    }

    let user = load_user(&state, user_id).await?;
    if let Some(email) = email.as_deref().filter(|e| *e != user.email) {
        match User::find_by_email(&state.db, email).await {
            Ok(Some(_)) => {
                warn!(%user_id, %email, "email already in use");
                return Err((StatusCode::CONFLICT, "Email is already in use".into()));
            }
            Ok(None) => {}
            Err(e) => return Err(server_error(e, "find_by_email")),
        }
    }

    let name = name.unwrap_or(user.name);
    let email = email.unwrap_or(user.email);
    let updated = match User::update_profile(&state.db, user_id, &name, &email).await {
        Ok(Some(u)) => u,
        Ok(None) => return Err((StatusCode::NOT_FOUND, "User not found".into())),
        Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
            return Err((StatusCode::CONFLICT, "Email is already in use".into()));
        }
        Err(e) => return Err(server_error(e, "update user")),
    };

    info!(%user_id, email = %updated.email, "profile updated");
    Ok(Json(UpdateProfileResponse {
        success: true,
        message: "Profile updated successfully".into(),
        user: PublicUser {
            id: updated.id,
            name: updated.name,
            email: updated.email,
        },
    }))
}

#[instrument(skip(state, payload))]
pub async fn change_password(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<Json<SuccessResponse>, AuthError> {
    if payload.current_password.is_empty() || payload.new_password.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            "Please provide both current and new password".into(),
        ));
    }
    if payload.new_password.len() < MIN_PASSWORD_LEN {
        return Err((
            StatusCode::BAD_REQUEST,
            "New password must be at least 6 characters long".into(),
        ));
    }

    let user = load_user(&state, user_id).await?;
    let ok = verify_password(&payload.current_password, &user.password_hash)
        .map_err(|e| server_error(e, "verify_password"))?;
    if !ok {
        warn!(%user_id, "change password with wrong current password");
        return Err((StatusCode::UNAUTHORIZED, "Current password is incorrect".into()));
    }

    let hash = hash_password(&payload.new_password).map_err(|e| server_error(e, "hash_password"))?;
    match User::update_password(&state.db, user_id, &hash).await {
        Ok(true) => {}
        Ok(false) => return Err((StatusCode::NOT_FOUND, "User not found".into())),
        Err(e) => return Err(server_error(e, "update password")),
    }

    info!(%user_id, "password changed");
    Ok(Json(SuccessResponse {
        success: true,
        message: "Password updated successfully".into(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::test_support::{app_with_user, call};
    use axum::http::{HeaderValue, Method};
    use serde_json::json;

    #[test]
    fn public_user_serialization() {
        let response = PublicUser {
            id: Uuid::new_v4(),
            name: "Jane".into(),
            email: "test@example.com".into(),
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("test@example.com"));
        assert!(json.contains("\"name\":\"Jane\""));
        assert!(!json.contains("password"));
    }

    #[test]
    fn refresh_token_prefers_body_then_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("refresh_token=from-cookie"));

        let body = RefreshRequest {
            refresh_token: "from-body".into(),
        };
        assert_eq!(
            refresh_token_from(&headers, Some(body)).as_deref(),
            Some("from-body")
        );
        assert_eq!(
            refresh_token_from(&headers, None).as_deref(),
            Some("from-cookie")
        );
        assert_eq!(refresh_token_from(&HeaderMap::new(), None), None);
    }

    // Validation runs before any database access, so the lazy pool is never touched.
    #[tokio::test]
    async fn register_rejects_short_password() {
        let app = crate::app::build_app(AppState::fake());
        let (status, body) = call(
            &app,
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({"name": "Jane", "email": "jane@example.com", "password": "12345"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, serde_json::Value::Null);
    }

    #[tokio::test]
    async fn register_rejects_missing_fields() {
        let app = crate::app::build_app(AppState::fake());
        let (status, _) = call(
            &app,
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({"email": "jane@example.com", "password": "123456"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn logout_clears_cookies() {
        let response = logout(State(AppState::fake())).await;
        let cookies: Vec<_> = response
            .0
            .get_all(header::SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap().to_string())
            .collect();
        assert_eq!(cookies.len(), 2);
        assert!(cookies.iter().all(|c| c.contains("Max-Age=0")));
        assert_eq!(response.1.message, "Logged out successfully");
    }

    #[tokio::test]
    async fn force_logout_clears_cookies_without_token() {
        let response = force_logout(State(AppState::fake())).await;
        let cookies: Vec<_> = response
            .0
            .get_all(header::SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap().to_string())
            .collect();
        assert_eq!(cookies.len(), 2);
        assert!(cookies.iter().any(|c| c.starts_with("token=;")));
        assert_eq!(response.1.message, "All sessions cleared");

        let app = crate::app::build_app(AppState::fake());
        let (status, body) = call(&app, Method::POST, "/api/auth/force-logout", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "All sessions cleared");
    }

    #[tokio::test]
    async fn account_routes_need_auth() {
        let app = crate::app::build_app(AppState::fake());
        let (status, _) = call(
            &app,
            Method::PUT,
            "/api/auth/update",
            None,
            Some(json!({"name": "Jane"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        let (status, _) = call(
            &app,
            Method::PUT,
            "/api/auth/change-password",
            None,
            Some(json!({"currentPassword": "123456", "newPassword": "abcdef"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    // Payload checks run before the user is loaded.
    #[tokio::test]
    async fn update_profile_validates_input() {
        let (app, _, _, token) = app_with_user();
        let t = Some(token.as_str());
        let (status, _) = call(&app, Method::PUT, "/api/auth/update", t, Some(json!({"name": "  "}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = call(
            &app,
            Method::PUT,
            "/api/auth/update",
            t,
            Some(json!({"email": "not-an-email"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn change_password_validates_input() {
        let (app, _, _, token) = app_with_user();
        let t = Some(token.as_str());
        let (status, _) = call(
            &app,
            Method::PUT,
            "/api/auth/change-password",
            t,
            Some(json!({"currentPassword": "123456"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = call(
            &app,
            Method::PUT,
            "/api/auth/change-password",
            t,
            Some(json!({"currentPassword": "123456", "newPassword": "abc"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn blank_profile_fields_are_ignored() {
        assert_eq!(non_blank(Some("  Jane ".into())).as_deref(), Some("Jane"));
        assert_eq!(non_blank(Some("   ".into())), None);
        assert_eq!(non_blank(None), None);
    }

    #[tokio::test]
    async fn refresh_without_token_is_unauthorized() {
        let app = crate::app::build_app(AppState::fake());
        let (status, _) = call(&app, Method::POST, "/api/auth/refresh", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}

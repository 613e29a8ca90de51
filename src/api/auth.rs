use axum::{
    Json,
    extract::{Request, State},
    http::{HeaderMap, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use cookie::{Cookie, SameSite, time::Duration as CookieDuration};
use std::sync::Arc;

use super::{
    ApiError, ApiResponse, AppState,
    types::{
        AccountDto, ConfirmCodeRequest, LoginRequest, MessageResponse,
        PasswordResetConfirmRequest, PasswordResetRequest, RegisterRequest,
    },
    validation,
};
use crate::db::{Account, CodeKind, NewAccount};
use crate::db::repositories::confirmation_code::CODE_TTL_MINUTES;
use crate::tokens::{SignedToken, TokenKind};

/// Ambient session cookie some clients still carry; cleared on logout.
const SESSION_COOKIE: &str = "sessionid";

// ============================================================================
// Middleware
// ============================================================================

/// Resolves the access-token cookie to an active account and stores it in
/// request extensions for the handlers downstream.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = cookie_value(request.headers(), &state.config.auth.access_cookie_name)
        .ok_or(ApiError::AuthenticationRequired)?;

    let claims = state
        .tokens
        .verify(&token, TokenKind::Access)
        .ok_or(ApiError::AuthenticationRequired)?;

    let account = state
        .store
        .users()
        .get_by_id(claims.sub)
        .await?
        .filter(|account| account.is_active)
        .ok_or(ApiError::AuthenticationRequired)?;

    tracing::Span::current().record("user_id", account.id);
    request.extensions_mut().insert(account);

    Ok(next.run(request).await)
}

fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    let raw = headers.get(header::COOKIE)?.to_str().ok()?;
    Cookie::split_parse(raw.to_string())
        .filter_map(Result::ok)
        .find(|c| c.name() == name)
        .map(|c| c.value().to_string())
}

// ============================================================================
// Cookie helpers
// ============================================================================

fn session_cookie(name: &str, value: &str, max_age_seconds: i64, secure: bool) -> String {
    Cookie::build((name.to_string(), value.to_string()))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(CookieDuration::seconds(max_age_seconds))
        .build()
        .to_string()
}

fn removal_cookie(name: &str) -> String {
    Cookie::build((name.to_string(), String::new()))
        .http_only(true)
        .path("/")
        .max_age(CookieDuration::ZERO)
        .build()
        .to_string()
}

fn set_session_cookies(
    state: &AppState,
    headers: &mut HeaderMap,
    access: &SignedToken,
    refresh: &SignedToken,
) -> Result<(), ApiError> {
    let auth = &state.config.auth;
    let secure = state.config.server.secure_cookies;

    let access_cookie = session_cookie(
        &auth.access_cookie_name,
        &access.token,
        auth.access_token_minutes * 60,
        secure,
    );
    let refresh_cookie = session_cookie(
        &auth.refresh_cookie_name,
        &refresh.token,
        auth.refresh_token_days * 24 * 3600,
        secure,
    );

    for value in [access_cookie, refresh_cookie] {
        headers.append(
            header::SET_COOKIE,
            value
                .parse()
                .map_err(|_| ApiError::internal("Invalid cookie header"))?,
        );
    }
    Ok(())
}

fn issue_session(state: &AppState, user_id: i32) -> Result<(SignedToken, SignedToken), ApiError> {
    let access = state
        .tokens
        .sign_access(user_id)
        .map_err(|e| ApiError::internal(format!("Token signing failed: {e}")))?;
    let refresh = state
        .tokens
        .sign_refresh(user_id)
        .map_err(|e| ApiError::internal(format!("Token signing failed: {e}")))?;
    Ok((access, refresh))
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/auth/register
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let mut errors = validation::FieldErrors::new();
    if payload.username.trim().is_empty() {
        errors.add("username", "Username is required");
    }
    if !validation::is_valid_email(&payload.email) {
        errors.add("email", "Invalid email address");
    }
    if !validation::is_valid_phone(&payload.phone) {
        errors.add("phone", "Phone must match +7 followed by 10 digits");
    }
    if !validation::is_valid_password(&payload.password) {
        errors.add(
            "password",
            format!(
                "Password must be at least {} characters",
                validation::MIN_PASSWORD_LEN
            ),
        );
    }
    errors.into_result()?;

    let users = state.store.users();
    let mut errors = validation::FieldErrors::new();
    if users.email_taken(&payload.email).await? {
        errors.add("email", "Email is already registered");
    }
    if users.phone_taken(&payload.phone).await? {
        errors.add("phone", "Phone is already registered");
    }
    errors.into_result()?;

    let account = users
        .create_inactive(
            NewAccount {
                username: payload.username,
                email: payload.email,
                phone: payload.phone,
                first_name: payload.first_name,
                last_name: payload.last_name,
                password: payload.password,
            },
            &state.config.security,
        )
        .await?;

    let code = state
        .store
        .confirmation_codes()
        .issue(account.id, CodeKind::Registration)
        .await?;

    state
        .mailer
        .send(
            &account.email,
            "Confirm your registration",
            &format!(
                "Your registration confirmation code is {code}. \
                 It is valid for {CODE_TTL_MINUTES} minutes."
            ),
        )
        .await
        .map_err(|e| ApiError::MailError(format!("{e:#}")))?;

    tracing::info!("Registered inactive account {}", account.id);

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(AccountDto::from(account))),
    ))
}

/// POST /api/auth/register/confirm
pub async fn confirm_registration(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ConfirmCodeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id = state
        .store
        .confirmation_codes()
        .consume(&payload.code, CodeKind::Registration)
        .await?
        .ok_or(ApiError::InvalidOrExpiredCode)?;

    state.store.users().activate(user_id).await?;

    let (access, refresh) = issue_session(&state, user_id)?;
    let mut headers = HeaderMap::new();
    set_session_cookies(&state, &mut headers, &access, &refresh)?;

    tracing::info!("Account {user_id} activated");

    Ok((
        headers,
        Json(ApiResponse::success(MessageResponse {
            message: "Registration confirmed".to_string(),
        })),
    ))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let account = state
        .store
        .users()
        .verify_credentials(&payload.email, &payload.password)
        .await?
        .filter(|account| account.is_active)
        .ok_or(ApiError::AuthenticationRequired)?;

    let (access, refresh) = issue_session(&state, account.id)?;
    let mut headers = HeaderMap::new();
    set_session_cookies(&state, &mut headers, &access, &refresh)?;

    Ok((headers, Json(ApiResponse::success(()))))
}

/// POST /api/auth/refresh
pub async fn refresh(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let token = cookie_value(&headers, &state.config.auth.refresh_cookie_name)
        .ok_or(ApiError::AuthenticationRequired)?;

    let claims = state
        .tokens
        .verify(&token, TokenKind::Refresh)
        .ok_or(ApiError::AuthenticationRequired)?;

    if state.store.tokens().is_revoked(&claims.jti).await? {
        return Err(ApiError::AuthenticationRequired);
    }

    let account = state
        .store
        .users()
        .get_by_id(claims.sub)
        .await?
        .filter(|account| account.is_active)
        .ok_or(ApiError::AuthenticationRequired)?;

    let (access, new_refresh) = issue_session(&state, account.id)?;
    let mut response_headers = HeaderMap::new();
    set_session_cookies(&state, &mut response_headers, &access, &new_refresh)?;

    Ok((response_headers, Json(ApiResponse::success(()))))
}

/// POST /api/auth/logout
///
/// Best-effort: an absent or invalid refresh cookie still clears the
/// cookies and succeeds.
pub async fn logout(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    if let Some(token) = cookie_value(&headers, &state.config.auth.refresh_cookie_name)
        && let Some(claims) = state.tokens.verify(&token, TokenKind::Refresh)
        && let Some(expires_at) = chrono::DateTime::from_timestamp(claims.exp, 0)
    {
        state.store.tokens().revoke(&claims.jti, expires_at).await?;
    }

    let mut response_headers = HeaderMap::new();
    for name in [
        state.config.auth.access_cookie_name.as_str(),
        state.config.auth.refresh_cookie_name.as_str(),
        SESSION_COOKIE,
    ] {
        response_headers.append(
            header::SET_COOKIE,
            removal_cookie(name)
                .parse()
                .map_err(|_| ApiError::internal("Invalid cookie header"))?,
        );
    }

    Ok((
        response_headers,
        Json(ApiResponse::success(MessageResponse {
            message: "Logged out".to_string(),
        })),
    ))
}

/// POST /api/auth/password-reset
pub async fn request_password_reset(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<PasswordResetRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let account = state
        .store
        .users()
        .get_by_email(&payload.email)
        .await?
        .ok_or_else(|| ApiError::NotFound("No account with this email".to_string()))?;

    let code = state
        .store
        .confirmation_codes()
        .issue(account.id, CodeKind::PasswordReset)
        .await?;

    state
        .mailer
        .send(
            &account.email,
            "Password reset",
            &format!(
                "Your password reset code is {code}. \
                 It is valid for {CODE_TTL_MINUTES} minutes."
            ),
        )
        .await
        .map_err(|e| ApiError::MailError(format!("{e:#}")))?;

    Ok(Json(ApiResponse::success(MessageResponse {
        message: "Password reset code sent".to_string(),
    })))
}

/// POST /api/auth/password-reset/confirm
pub async fn confirm_password_reset(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<PasswordResetConfirmRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if !validation::is_valid_password(&payload.new_password) {
        return Err(ApiError::validation(
            "new_password",
            format!(
                "Password must be at least {} characters",
                validation::MIN_PASSWORD_LEN
            ),
        ));
    }

    let user_id = state
        .store
        .confirmation_codes()
        .consume(&payload.code, CodeKind::PasswordReset)
        .await?
        .ok_or(ApiError::InvalidOrExpiredCode)?;

    state
        .store
        .users()
        .set_password(user_id, &payload.new_password, &state.config.security)
        .await?;

    tracing::info!("Password reset for account {user_id}");

    Ok(Json(ApiResponse::success(MessageResponse {
        message: "Password updated".to_string(),
    })))
}

/// GET /api/auth/me
pub async fn me(
    axum::Extension(account): axum::Extension<Account>,
) -> Json<ApiResponse<AccountDto>> {
    Json(ApiResponse::success(AccountDto::from(account)))
}

//! Auth handlers: register, login, logout, refetch.

use axum::Json;
use axum::extract::State;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use quill_auth::{Claims, IssuedToken, RegisterInput};
use quill_entity::account::AccountProfile;

use crate::dto::request::{LoginRequest, RegisterRequest};
use crate::dto::response::MessageResponse;
use crate::error::ApiError;
use crate::extractors::{SessionToken, ValidateJson};
use crate::state::AppState;

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    ValidateJson(req): ValidateJson<RegisterRequest>,
) -> Result<Json<AccountProfile>, ApiError> {
    let profile = state
        .sessions
        .register(RegisterInput {
            username: req.username,
            email: req.email,
            password: req.password,
        })
        .await?;

    Ok(Json(profile))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidateJson(req): ValidateJson<LoginRequest>,
) -> Result<(CookieJar, Json<AccountProfile>), ApiError> {
    let outcome = state.sessions.login(&req.email, &req.password).await?;

    let cookie = session_cookie(&state, &outcome.token);
    Ok((jar.add(cookie), Json(outcome.profile)))
}

/// GET /api/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    token: SessionToken,
    jar: CookieJar,
) -> (CookieJar, Json<MessageResponse>) {
    state.sessions.logout(token.as_deref());

    // `jar.remove` only expires cookies the request sent; this one is unconditional.
    let mut removal = Cookie::build((state.cookie_name().to_string(), ""))
        .path("/")
        .same_site(SameSite::None)
        .secure(true)
        .build();
    removal.make_removal();

    (
        jar.add(removal),
        Json(MessageResponse {
            message: "User logged out successfully!".to_string(),
        }),
    )
}

/// GET /api/auth/refetch
pub async fn refetch(
    State(state): State<AppState>,
    token: SessionToken,
) -> Result<Json<Claims>, ApiError> {
    let claims = state.sessions.refetch(token.as_deref())?;
    Ok(Json(claims))
}

fn session_cookie(state: &AppState, token: &IssuedToken) -> Cookie<'static> {
    let max_age = time::Duration::seconds(state.sessions.encoder().ttl().num_seconds());

    let mut builder = Cookie::build((state.cookie_name().to_string(), token.token.clone()))
        .http_only(true)
        .path("/")
        .max_age(max_age);

    if state.config.auth.cookie_secure {
        builder = builder.secure(true).same_site(SameSite::None);
    }

    builder.build()
}

//! Session cookie handling and the per-request authentication middleware.
//!
//! The cookie is a self-contained signed token over the user id; there is
//! no server-side session table. The middleware runs in front of every
//! route and resolves the cookie into `AuthUser` in the request extensions,
//! so handlers receive the principal explicitly instead of re-reading the
//! cookie themselves. Anything wrong with the cookie means anonymous,
//! never an error response.

use axum::{
    extract::{Extension, Request},
    http::{
        header::{InvalidHeaderValue, COOKIE},
        HeaderMap, HeaderValue,
    },
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::error;
use uuid::Uuid;

use super::guard::{check_secure_value, make_secure_value};
use super::store::User;
use super::AppContext;

pub const SESSION_COOKIE_NAME: &str = "user_id";

/// The authenticated principal for this request, or `None` for anonymous.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Option<User>);

impl AuthUser {
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.0.is_some()
    }
}

/// Resolve the session cookie before every handler runs.
pub async fn authenticate(
    ctx: Extension<Arc<AppContext>>,
    mut request: Request,
    next: Next,
) -> Response {
    let user = resolve_user(&ctx, request.headers()).await;
    request.extensions_mut().insert(AuthUser(user));

    next.run(request).await
}

async fn resolve_user(ctx: &AppContext, headers: &HeaderMap) -> Option<User> {
    let token = extract_session_cookie(headers)?;
    let payload = check_secure_value(&token, &ctx.signing_key)?;
    let user_id = Uuid::parse_str(&payload).ok()?;

    match ctx.store.find_user_by_id(user_id).await {
        Ok(user) => user,
        Err(err) => {
            // A store failure downgrades to anonymous rather than failing
            // the whole request
            error!("Failed to resolve session user: {err}");
            None
        }
    }
}

/// Build the login `Set-Cookie` value for a user id.
///
/// # Errors
/// Returns an error if the signed value is not a valid header value.
pub fn session_cookie(ctx: &AppContext, user_id: Uuid) -> Result<HeaderValue, InvalidHeaderValue> {
    let token = make_secure_value(&user_id.to_string(), &ctx.signing_key);
    HeaderValue::from_str(&format!(
        "{SESSION_COOKIE_NAME}={token}; Path=/; HttpOnly; SameSite=Lax"
    ))
}

/// Build the logout `Set-Cookie` value. Same path as login so the right
/// cookie gets destroyed.
///
/// # Errors
/// Returns an error if the header value is invalid (it is a constant, so
/// it never is in practice).
pub fn clear_session_cookie() -> Result<HeaderValue, InvalidHeaderValue> {
    HeaderValue::from_str(&format!(
        "{SESSION_COOKIE_NAME}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0"
    ))
}

fn extract_session_cookie(headers: &HeaderMap) -> Option<String> {
    let header = headers.get(COOKIE)?;
    let value = header.to_str().ok()?;
    for pair in value.split(';') {
        let trimmed = pair.trim();
        let mut parts = trimmed.splitn(2, '=');
        let key = parts.next()?.trim();
        let val = parts.next()?.trim();
        if key == SESSION_COOKIE_NAME && !val.is_empty() {
            return Some(val.to_string());
        }
    }
    None
}

//! Signup form and registration.

use axum::{
    extract::{Extension, Form},
    http::{header::SET_COOKIE, StatusCode},
    response::{IntoResponse, Redirect, Response},
};
use std::sync::Arc;
use tracing::error;

use super::{render_html, validate_signup, SignupForm};
use crate::vikio::{
    error::RequestError,
    guard::hash_password,
    session::session_cookie,
    store::{NewUser, StoreError},
    AppContext,
};

pub async fn signup_form(ctx: Extension<Arc<AppContext>>) -> Response {
    render_html(&ctx, "signup.html", &[])
}

pub async fn signup(ctx: Extension<Arc<AppContext>>, Form(form): Form<SignupForm>) -> Response {
    if let Err(err) = validate_signup(&form) {
        return signup_error(&ctx, &form, &err);
    }

    // The unique index is the real gate; this lookup just gives a friendly
    // message for the common case
    match ctx.store.find_user_by_name(&form.username).await {
        Ok(Some(_)) => return signup_error(&ctx, &form, &RequestError::Conflict),
        Ok(None) => {}
        Err(err) => {
            error!("Failed to look up username: {err}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    }

    // Hashed once here, immutable afterwards
    let password_hash = hash_password(&form.username, &form.password, None);

    let new_user = NewUser {
        name: form.username.clone(),
        password_hash,
        email: if form.email.is_empty() {
            None
        } else {
            Some(form.email.clone())
        },
    };

    match ctx.store.save_user(new_user).await {
        Ok(id) => {
            let mut response = Redirect::to("/").into_response();
            match session_cookie(&ctx, id) {
                Ok(cookie) => {
                    response.headers_mut().insert(SET_COOKIE, cookie);
                }
                Err(err) => error!("Failed to build session cookie: {err}"),
            }
            response
        }
        // Lost the race against a concurrent signup for the same name
        Err(StoreError::Conflict) => signup_error(&ctx, &form, &RequestError::Conflict),
        Err(err) => {
            error!("Failed to save user: {err}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Re-render the form with the error, keeping the harmless fields filled
/// in. Passwords are never echoed back.
fn signup_error(ctx: &AppContext, form: &SignupForm, err: &RequestError) -> Response {
    render_html(
        ctx,
        "signup.html",
        &[
            ("error", &err.to_string()),
            ("username", &form.username),
            ("email", &form.email),
        ],
    )
}

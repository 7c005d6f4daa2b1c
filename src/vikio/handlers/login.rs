//! Login and logout.

use axum::{
    extract::{Extension, Form},
    http::{header::SET_COOKIE, StatusCode},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::error;

use super::render_html;
use crate::vikio::{
    guard::verify_password,
    session::{clear_session_cookie, session_cookie},
    AppContext,
};

#[derive(Deserialize, Debug)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

pub async fn login_form(ctx: Extension<Arc<AppContext>>) -> Response {
    render_html(&ctx, "login.html", &[])
}

pub async fn login(ctx: Extension<Arc<AppContext>>, Form(form): Form<LoginForm>) -> Response {
    let user = match ctx.store.find_user_by_name(&form.username).await {
        Ok(user) => user,
        Err(err) => {
            error!("Failed to look up user: {err}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    // An unknown name and a wrong password get the same answer
    let Some(user) = user.filter(|u| verify_password(&u.name, &form.password, &u.password_hash))
    else {
        return render_html(
            &ctx,
            "login.html",
            &[("error", "Invalid Login"), ("username", &form.username)],
        );
    };

    let mut response = Redirect::to("/").into_response();
    match session_cookie(&ctx, user.id) {
        Ok(cookie) => {
            response.headers_mut().insert(SET_COOKIE, cookie);
        }
        Err(err) => error!("Failed to build session cookie: {err}"),
    }
    response
}

pub async fn logout() -> Response {
    // Clearing is unconditional; a missing cookie clears to the same state
    let mut response = Redirect::to("/").into_response();
    match clear_session_cookie() {
        Ok(cookie) => {
            response.headers_mut().insert(SET_COOKIE, cookie);
        }
        Err(err) => error!("Failed to build logout cookie: {err}"),
    }
    response
}

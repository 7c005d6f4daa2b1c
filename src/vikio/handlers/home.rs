use axum::{extract::Extension, response::Response};
use std::sync::Arc;

use super::render_html;
use crate::vikio::{session::AuthUser, AppContext};

/// Home page. Greets the logged-in user; anonymous visitors get the
/// signup/login links baked into the template.
pub async fn home(
    ctx: Extension<Arc<AppContext>>,
    Extension(user): Extension<AuthUser>,
) -> Response {
    let username = user.0.as_ref().map_or("", |u| u.name.as_str());

    render_html(&ctx, "main.html", &[("username", username)])
}

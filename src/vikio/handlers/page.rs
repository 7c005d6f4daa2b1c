//! Wiki page view and edit handlers.
//!
//! The handlers do the lookups and writes; which action to take comes from
//! the pure decision functions in [`crate::vikio::flow`]. Racing
//! submissions to the same title resolve last-write-wins in the store.

use axum::{
    extract::{Extension, Form, Path},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::error;

use super::{render_html, valid_title};
use crate::vikio::{
    flow::{edit_decision, view_decision, EditDecision, ViewDecision},
    session::AuthUser,
    store::WikiPage,
    AppContext,
};

#[derive(Deserialize, Debug)]
pub struct EditForm {
    #[serde(default)]
    pub content: String,
}

/// `GET /<title>`
pub async fn view(
    Path(title): Path<String>,
    ctx: Extension<Arc<AppContext>>,
    Extension(user): Extension<AuthUser>,
) -> Response {
    if !valid_title(&title) {
        return Redirect::to("/").into_response();
    }

    let page = match ctx.store.find_page_by_title(&title).await {
        Ok(page) => page,
        Err(err) => {
            error!("Failed to look up page: {err}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    match view_decision(user.is_authenticated(), page.is_some()) {
        ViewDecision::Render { editable } => {
            let Some(page) = page else {
                // Render is only decided when the page exists
                return StatusCode::INTERNAL_SERVER_ERROR.into_response();
            };
            render_page(&ctx, &page, editable)
        }
        ViewDecision::RedirectToEdit => Redirect::to(&format!("/_edit/{title}")).into_response(),
        ViewDecision::RedirectHome => Redirect::to("/").into_response(),
    }
}

/// `GET /_edit/<title>` — the form, pre-filled when the page exists.
pub async fn edit_form(
    Path(title): Path<String>,
    ctx: Extension<Arc<AppContext>>,
    Extension(user): Extension<AuthUser>,
) -> Response {
    if !valid_title(&title) {
        return Redirect::to("/").into_response();
    }

    if !user.is_authenticated() {
        return Redirect::to("/login").into_response();
    }

    let page = match ctx.store.find_page_by_title(&title).await {
        Ok(page) => page,
        Err(err) => {
            error!("Failed to look up page: {err}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let text = page.as_ref().map_or("", |p| p.text.as_str());

    render_html(&ctx, "edit.html", &[("title", &title), ("text", text)])
}

/// `POST /_edit/<title>` — create or full-replace, then view.
pub async fn edit_submit(
    Path(title): Path<String>,
    ctx: Extension<Arc<AppContext>>,
    Extension(user): Extension<AuthUser>,
    Form(form): Form<EditForm>,
) -> Response {
    if !valid_title(&title) {
        return Redirect::to("/").into_response();
    }

    if !user.is_authenticated() {
        return Redirect::to("/login").into_response();
    }

    let existing = match ctx.store.find_page_by_title(&title).await {
        Ok(page) => page,
        Err(err) => {
            error!("Failed to look up page: {err}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    // The empty check runs before any write, so an empty submission can
    // never clear an existing page
    match edit_decision(&form.content, existing.is_some()) {
        EditDecision::RejectEmpty => {
            let text = existing.as_ref().map_or("", |p| p.text.as_str());
            render_html(
                &ctx,
                "edit.html",
                &[
                    ("title", &title),
                    ("text", text),
                    ("error", "Content must not be empty."),
                ],
            )
        }
        EditDecision::Update | EditDecision::Create => {
            if let Err(err) = ctx.store.save_page(&title, &form.content).await {
                error!("Failed to save page: {err}");
                return StatusCode::INTERNAL_SERVER_ERROR.into_response();
            }
            Redirect::to(&format!("/{title}")).into_response()
        }
    }
}

fn render_page(ctx: &AppContext, page: &WikiPage, editable: bool) -> Response {
    let template = if editable {
        "page_editable.html"
    } else {
        "page.html"
    };
    let edit_url = format!("/_edit/{}", page.title);
    let modified = page.last_modified.format("%Y-%m-%d %H:%M UTC").to_string();

    render_html(
        ctx,
        template,
        &[
            ("title", &page.title),
            ("text", &page.text),
            ("edit_url", &edit_url),
            ("last_modified", &modified),
        ],
    )
}

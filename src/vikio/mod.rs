//! The wiki service: routing, shared context, and server startup.

use crate::cli::globals::GlobalArgs;
use anyhow::{Context, Result};
use axum::{
    body::Body,
    extract::{Extension, MatchedPath},
    http::{HeaderName, HeaderValue, Request},
    middleware,
    routing::get,
    Router,
};
use sqlx::postgres::PgPoolOptions;
use std::{path::Path, sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    request_id::PropagateRequestIdLayer, set_header::SetRequestHeaderLayer, trace::TraceLayer,
};
use tracing::{info, info_span, Span};
use ulid::Ulid;

pub mod error;
pub mod flow;
pub mod guard;
pub mod handlers;
pub mod render;
pub mod session;
pub mod store;

use guard::SigningKey;
use render::Renderer;
use store::{PgStore, Store};

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

/// Process-wide collaborators shared by every handler. Built once at
/// startup, read-only afterwards.
pub struct AppContext {
    pub store: Arc<dyn Store>,
    pub renderer: Renderer,
    pub signing_key: SigningKey,
}

/// Build the application router on top of a context.
///
/// The authentication middleware wraps every route, so handlers always
/// find an [`session::AuthUser`] in their extensions.
pub fn router(ctx: Arc<AppContext>) -> Router {
    Router::new()
        .route("/", get(handlers::home))
        .route("/health", get(handlers::health))
        .route("/signup", get(handlers::signup_form).post(handlers::signup))
        .route("/login", get(handlers::login_form).post(handlers::login))
        .route("/logout", get(handlers::logout))
        .route(
            "/_edit/:title",
            get(handlers::edit_form).post(handlers::edit_submit),
        )
        .route("/:title", get(handlers::view))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestHeaderLayer::if_not_present(
                    HeaderName::from_static("x-request-id"),
                    |_req: &_| HeaderValue::from_str(Ulid::new().to_string().as_str()).ok(),
                ))
                .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                    "x-request-id",
                )))
                .layer(TraceLayer::new_for_http().make_span_with(make_span))
                .layer(Extension(ctx))
                .layer(middleware::from_fn(session::authenticate)),
        )
}

/// Start the server
/// # Errors
/// Return error if failed to start the server
pub async fn new(port: u16, dsn: String, globals: &GlobalArgs) -> Result<()> {
    // Connect to database
    let pool = PgPoolOptions::new()
        .min_connections(1)
        .max_connections(5)
        .max_lifetime(Duration::from_secs(60 * 2))
        .test_before_acquire(true)
        .connect(&dsn)
        .await
        .context("Failed to connect to database")?;

    // Templates are loaded once; there is no runtime reloading
    let renderer = Renderer::from_dir(Path::new(&globals.template_dir))
        .context("Failed to load templates")?;

    let ctx = Arc::new(AppContext {
        store: Arc::new(PgStore::new(pool)),
        renderer,
        signing_key: SigningKey::new(globals.secret_key.clone()),
    });

    let app = router(ctx);

    let listener = TcpListener::bind(format!("::0:{port}")).await?;

    info!("Listening on [::]:{}", port);

    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}

fn make_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");
    let matched_path = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path(), MatchedPath::as_str);

    info_span!(
        "http.request",
        http.method = %request.method(),
        http.route = matched_path,
        request_id
    )
}

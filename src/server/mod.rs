//! HTTP server for post pages

use anyhow::Result;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::generator::Generator;
use crate::page::PageState;

/// Server state
#[derive(Clone)]
pub struct ServerState {
    pub generator: Arc<Generator>,
}

/// Build the router
///
/// `/post/:slug` renders posts; other paths are served from `public_dir`
/// when given, otherwise they are 404.
pub fn router(generator: Arc<Generator>, public_dir: Option<PathBuf>) -> Router {
    let state = ServerState { generator };

    let app = Router::new().route("/post/:slug", get(post_handler));
    let app = match public_dir {
        Some(dir) => app.fallback_service(ServeDir::new(dir)),
        None => app.fallback(not_found_handler),
    };

    app.layer(TraceLayer::new_for_http()).with_state(state)
}

/// Pre-render the known posts and start serving
pub async fn start(generator: Arc<Generator>, public_dir: PathBuf, ip: &str, port: u16) -> Result<()> {
    generator.prebuild().await?;

    let public_dir = public_dir.exists().then_some(public_dir);
    let app = router(generator, public_dir);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn post_handler(State(state): State<ServerState>, Path(slug): Path<String>) -> Response {
    match state.generator.serve(&slug).await {
        Ok(page) => {
            let status = StatusCode::from_u16(page.status).unwrap_or(StatusCode::OK);
            (status, Html(page.html)).into_response()
        }
        Err(e) => {
            tracing::error!("Failed to render {}: {:#}", slug, e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response()
        }
    }
}

async fn not_found_handler(State(state): State<ServerState>) -> Response {
    match state.generator.renderer().render(&PageState::NotFound) {
        Ok(html) => (StatusCode::NOT_FOUND, Html(html)).into_response(),
        Err(_) => (StatusCode::NOT_FOUND, "Not found").into_response(),
    }
}

//! ZoomBar server - announcement bars embeddable on third-party sites.
//!
//! This is the entry point for the web server. Route families:
//!
//! - `/api/get-announcement-bar`, `/api/load-bar-script`: the public
//!   embedding surface fetched cross-origin by host pages
//! - `/api/bars`, `/api/embed-snippet`, `/preview/...`: the owner-facing
//!   management surface

use axum::{routing::get, Router};
use std::sync::Arc;

use zoombar::{bind_addr, handlers, AppState};

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() {
    let state = Arc::new(AppState::new());
    let base_url = state.base_url.clone();

    let app = Router::new()
        // Embedding surface (permissive CORS, explicit preflight)
        .route(
            "/api/get-announcement-bar",
            get(handlers::get_announcement_bar).options(handlers::preflight),
        )
        .route(
            "/api/load-bar-script",
            get(handlers::load_bar_script).options(handlers::preflight),
        )
        // Owner-facing management surface
        .route("/api/embed-snippet", get(handlers::embed_snippet_handler))
        .route(
            "/api/bars",
            get(handlers::list_bars).post(handlers::create_bar),
        )
        .route(
            "/api/bars/{id}",
            axum::routing::put(handlers::update_bar).delete(handlers::delete_bar),
        )
        .route("/preview/{user_id}/{bar_id}", get(handlers::preview_bar))
        .with_state(state);

    let addr = bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| panic!("Failed to bind to {}: {}", addr, e));

    println!("ZoomBar server running at http://{}", addr);
    println!("Public base URL for generated scripts: {}", base_url);

    axum::serve(listener, app).await.expect("Server error");
}

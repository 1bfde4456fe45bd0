//! ZoomBar - dismissible announcement bars for third-party sites.
//!
//! A site owner configures a bar (message, colors, optional image, optional
//! countdown, optional CTA button) and pastes one bootstrap snippet into any
//! page. The snippet loads a generated widget script, which fetches the bar's
//! configuration cross-origin, renders a top banner with a live countdown and
//! removes itself on expiry or dismissal.
//!
//! Modules:
//!
//! - `models`: stored bar records and the widget-facing display shape
//! - `store`: sled persistence for bars
//! - `countdown`: pure countdown arithmetic and the per-tick reducer
//! - `layout`: direction-aware child ordering for the bar row
//! - `render`: server-side preview of a bar's first frame
//! - `templates`: widget script and embed snippet generation
//! - `handlers`: HTTP route handlers
//! - `url_check`: http(s)-only validation for owner-supplied URLs

use sled::Db;
use std::env;

pub mod countdown;
pub mod handlers;
pub mod layout;
pub mod models;
pub mod render;
pub mod store;
pub mod templates;
pub mod url_check;

// ============================================================================
// Configuration
// ============================================================================

pub const DB_PATH: &str = ".zoombar_db";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:3000";

/// Bind address for the listener (env `ZOOMBAR_BIND`).
pub fn bind_addr() -> String {
    env::var("ZOOMBAR_BIND").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string())
}

// ============================================================================
// Application State
// ============================================================================

#[derive(Clone)]
pub struct AppState {
    pub db: Db,
    /// Public origin baked into generated scripts and snippets (env
    /// `ZOOMBAR_BASE_URL`). Must be the externally reachable URL, since
    /// third-party pages fetch the config endpoint through it.
    pub base_url: String,
}

impl AppState {
    pub fn new() -> Self {
        let db_path = env::var("ZOOMBAR_DB").unwrap_or_else(|_| DB_PATH.to_string());
        let db = sled::open(db_path).expect("Failed to open database");
        let base_url =
            env::var("ZOOMBAR_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::with_db(db, base_url)
    }

    /// State over an existing database handle; tests pass a temporary db.
    pub fn with_db(db: Db, base_url: impl Into<String>) -> Self {
        AppState {
            db,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

// Re-export commonly used types
pub use countdown::{pad2, split_remaining, Countdown, DaysBox, Tick, TimeParts};
pub use layout::{layout_order, BarChild, Direction};
pub use models::{
    AnnouncementBar, ApiError, BarDisplay, BarPatch, LinkTarget, NewBarRequest, TimerPosition,
    TimerStyle,
};
pub use render::{compensated_padding, html_escape, render_bar, timer_digit_color};
pub use store::{delete_bar, generate_bar_id, get_bar, list_bars, put_bar};
pub use templates::{embed_snippet, error_script, widget_script};
pub use url_check::{check_http_url, UrlCheckError};

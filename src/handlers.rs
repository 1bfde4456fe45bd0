//! HTTP route handlers.
//!
//! Two route families with different audiences:
//!
//! - the public embedding surface (`/api/get-announcement-bar`,
//!   `/api/load-bar-script`), fetched cross-origin by arbitrary third-party
//!   pages and therefore served with permissive CORS headers on every
//!   response, errors included
//! - the owner-facing management surface (`/api/bars`, `/api/embed-snippet`,
//!   `/preview/...`), ordinary same-origin JSON/HTML
//!
//! The embedding surface never returns a body that could break a host page:
//! config errors come back as JSON `{"error": ...}`, script errors as a
//! syntactically valid console.error script.

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderName, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;

use crate::layout::Direction;
use crate::models::{AnnouncementBar, ApiError, BarDisplay, BarPatch, NewBarRequest};
use crate::render::{html_escape, preview_page, render_bar};
use crate::templates::{embed_snippet, error_script, widget_script};
use crate::url_check::check_http_url;
use crate::{store, AppState};

// ============================================================================
// CORS
// ============================================================================

/// The permissive header set every embedding-surface response carries.
/// Third-party embedding is the whole point, so the origin is `*`.
fn cors_headers() -> [(HeaderName, HeaderValue); 3] {
    [
        (
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ),
        (
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("GET, OPTIONS"),
        ),
        (
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("Content-Type"),
        ),
    ]
}

fn script_headers() -> [(HeaderName, HeaderValue); 4] {
    let [origin, methods, headers] = cors_headers();
    [
        (
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/javascript"),
        ),
        origin,
        methods,
        headers,
    ]
}

/// Empty 204 for preflight `OPTIONS` requests on the embedding surface.
pub async fn preflight() -> impl IntoResponse {
    (StatusCode::NO_CONTENT, cors_headers())
}

// ============================================================================
// Query Shapes
// ============================================================================

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BarQuery {
    #[serde(default)]
    pub bar_id: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
}

impl BarQuery {
    /// Both ids, or `None` if either is missing or empty.
    fn ids(&self) -> Option<(&str, &str)> {
        match (self.bar_id.as_deref(), self.user_id.as_deref()) {
            (Some(bar_id), Some(user_id)) if !bar_id.is_empty() && !user_id.is_empty() => {
                Some((bar_id, user_id))
            }
            _ => None,
        }
    }
}

#[derive(Deserialize)]
pub struct PreviewQuery {
    #[serde(default)]
    pub dir: Option<String>,
}

// ============================================================================
// Config Provider
// ============================================================================

/// `GET /api/get-announcement-bar?barId=&userId=` — the JSON the widget
/// consumes. Errors are JSON bodies with an `error` field so the widget can
/// log and abort without touching the host DOM.
pub async fn get_announcement_bar(
    State(state): State<Arc<AppState>>,
    Query(query): Query<BarQuery>,
) -> Response {
    let Some((bar_id, user_id)) = query.ids() else {
        return (
            StatusCode::BAD_REQUEST,
            cors_headers(),
            Json(ApiError::new("barId and userId query parameters are required")),
        )
            .into_response();
    };

    match store::get_bar(&state.db, user_id, bar_id) {
        Ok(Some(bar)) => {
            (StatusCode::OK, cors_headers(), Json(BarDisplay::from_bar(&bar))).into_response()
        }
        Ok(None) => (
            StatusCode::NOT_FOUND,
            cors_headers(),
            Json(ApiError::new("Announcement bar not found")),
        )
            .into_response(),
        Err(e) => {
            eprintln!("get-announcement-bar: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                cors_headers(),
                Json(ApiError::new("Internal server error")),
            )
                .into_response()
        }
    }
}

// ============================================================================
// Script Generator
// ============================================================================

/// `GET /api/load-bar-script?barId=&userId=` — the widget script with the ids
/// and base URL baked in. A malformed embed gets a valid script that only
/// logs, so the host page never sees a script error.
pub async fn load_bar_script(
    State(state): State<Arc<AppState>>,
    Query(query): Query<BarQuery>,
) -> Response {
    let Some((bar_id, user_id)) = query.ids() else {
        return (
            StatusCode::BAD_REQUEST,
            script_headers(),
            error_script("Bar ID or User ID missing in script URL."),
        )
            .into_response();
    };

    (
        StatusCode::OK,
        script_headers(),
        widget_script(bar_id, user_id, &state.base_url),
    )
        .into_response()
}

// ============================================================================
// Embed Snippet
// ============================================================================

/// `GET /api/embed-snippet?barId=&userId=` — the bootstrap snippet a site
/// owner pastes into their page, as copyable plain text.
pub async fn embed_snippet_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<BarQuery>,
) -> Response {
    let Some((bar_id, user_id)) = query.ids() else {
        return (
            StatusCode::BAD_REQUEST,
            "barId and userId query parameters are required",
        )
            .into_response();
    };

    (
        StatusCode::OK,
        [(
            header::CONTENT_TYPE,
            HeaderValue::from_static("text/plain; charset=utf-8"),
        )],
        embed_snippet(bar_id, user_id, &state.base_url),
    )
        .into_response()
}

// ============================================================================
// Bar Management
// ============================================================================

/// Reject records the widget could not render sensibly. Runs on both create
/// and update so a patch cannot sneak an invalid combination past the door.
fn validate_record(bar: &AnnouncementBar) -> Result<(), String> {
    if bar.message.trim().is_empty() {
        return Err("message must not be empty".to_string());
    }

    let cta_text = bar.cta_text.as_deref().unwrap_or("").trim();
    let cta_link = bar.cta_link.as_deref().unwrap_or("").trim();
    if cta_text.is_empty() != cta_link.is_empty() {
        return Err("ctaText and ctaLink must be set together".to_string());
    }
    if !cta_link.is_empty() {
        check_http_url(cta_link).map_err(|e| format!("ctaLink: {}", e))?;
    }

    if let Some(image_url) = bar.image_url.as_deref() {
        if !image_url.trim().is_empty() {
            check_http_url(image_url.trim()).map_err(|e| format!("imageUrl: {}", e))?;
        }
    }

    Ok(())
}

/// `POST /api/bars` — create a bar with a server-assigned id.
pub async fn create_bar(
    State(state): State<Arc<AppState>>,
    Json(body): Json<NewBarRequest>,
) -> Response {
    if body.user_id.trim().is_empty() {
        return bad_request("userId must not be empty");
    }

    let bar = AnnouncementBar {
        id: store::generate_bar_id(),
        user_id: body.user_id,
        title: body.title,
        message: body.message,
        background_color: body.background_color,
        text_color: body.text_color,
        image_url: body.image_url,
        expires_at: body.expires_at,
        timer_background_color: body.timer_background_color,
        timer_text_color: body.timer_text_color,
        timer_style: body.timer_style,
        timer_position: body.timer_position,
        font_size: body.font_size,
        cta_text: body.cta_text,
        cta_link: body.cta_link,
        cta_background_color: body.cta_background_color,
        cta_text_color: body.cta_text_color,
        cta_link_target: body.cta_link_target,
        clicks: 0,
        created_at: Utc::now(),
    };

    if let Err(e) = validate_record(&bar) {
        return bad_request(&e);
    }

    match store::put_bar(&state.db, &bar) {
        Ok(()) => (StatusCode::CREATED, Json(bar)).into_response(),
        Err(e) => internal_error("create bar", &e),
    }
}

/// `GET /api/bars?userId=` — all bars owned by a user, newest first.
pub async fn list_bars(
    State(state): State<Arc<AppState>>,
    Query(query): Query<BarQuery>,
) -> Response {
    let Some(user_id) = query.user_id.as_deref().filter(|u| !u.is_empty()) else {
        return bad_request("userId query parameter is required");
    };

    match store::list_bars(&state.db, user_id) {
        Ok(bars) => Json(bars).into_response(),
        Err(e) => internal_error("list bars", &e),
    }
}

/// `PUT /api/bars/{id}` — merge a partial update into the stored record.
pub async fn update_bar(
    State(state): State<Arc<AppState>>,
    Path(bar_id): Path<String>,
    Json(patch): Json<BarPatch>,
) -> Response {
    let existing = match store::get_bar(&state.db, &patch.user_id, &bar_id) {
        Ok(Some(bar)) => bar,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ApiError::new("Announcement bar not found")),
            )
                .into_response()
        }
        Err(e) => return internal_error("update bar", &e),
    };

    let merged = apply_patch(existing, patch);
    if let Err(e) = validate_record(&merged) {
        return bad_request(&e);
    }

    match store::put_bar(&state.db, &merged) {
        Ok(()) => Json(merged).into_response(),
        Err(e) => internal_error("update bar", &e),
    }
}

fn apply_patch(mut bar: AnnouncementBar, patch: BarPatch) -> AnnouncementBar {
    if let Some(title) = patch.title {
        bar.title = title;
    }
    if let Some(message) = patch.message {
        bar.message = message;
    }
    if let Some(v) = patch.background_color {
        bar.background_color = Some(v);
    }
    if let Some(v) = patch.text_color {
        bar.text_color = Some(v);
    }
    if let Some(v) = patch.image_url {
        bar.image_url = Some(v);
    }
    // Present-and-null clears the deadline; absent keeps it.
    if let Some(expires_at) = patch.expires_at {
        bar.expires_at = expires_at;
    }
    if let Some(v) = patch.timer_background_color {
        bar.timer_background_color = Some(v);
    }
    if let Some(v) = patch.timer_text_color {
        bar.timer_text_color = Some(v);
    }
    if let Some(v) = patch.timer_style {
        bar.timer_style = Some(v);
    }
    if let Some(v) = patch.timer_position {
        bar.timer_position = Some(v);
    }
    if let Some(v) = patch.font_size {
        bar.font_size = Some(v);
    }
    if let Some(v) = patch.cta_text {
        bar.cta_text = Some(v);
    }
    if let Some(v) = patch.cta_link {
        bar.cta_link = Some(v);
    }
    if let Some(v) = patch.cta_background_color {
        bar.cta_background_color = Some(v);
    }
    if let Some(v) = patch.cta_text_color {
        bar.cta_text_color = Some(v);
    }
    if let Some(v) = patch.cta_link_target {
        bar.cta_link_target = Some(v);
    }
    bar
}

/// `DELETE /api/bars/{id}?userId=`.
pub async fn delete_bar(
    State(state): State<Arc<AppState>>,
    Path(bar_id): Path<String>,
    Query(query): Query<BarQuery>,
) -> Response {
    let Some(user_id) = query.user_id.as_deref().filter(|u| !u.is_empty()) else {
        return bad_request("userId query parameter is required");
    };

    match store::delete_bar(&state.db, user_id, &bar_id) {
        Ok(true) => StatusCode::NO_CONTENT.into_response(),
        Ok(false) => (
            StatusCode::NOT_FOUND,
            Json(ApiError::new("Announcement bar not found")),
        )
            .into_response(),
        Err(e) => internal_error("delete bar", &e),
    }
}

fn bad_request(message: &str) -> Response {
    (StatusCode::BAD_REQUEST, Json(ApiError::new(message))).into_response()
}

fn internal_error(context: &str, detail: &str) -> Response {
    eprintln!("{}: {}", context, detail);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiError::new("Internal server error")),
    )
        .into_response()
}

// ============================================================================
// Preview
// ============================================================================

/// `GET /preview/{userId}/{barId}?dir=ltr|rtl` — the bar's first frame,
/// rendered server-side for the owner to eyeball.
pub async fn preview_bar(
    State(state): State<Arc<AppState>>,
    Path((user_id, bar_id)): Path<(String, String)>,
    Query(query): Query<PreviewQuery>,
) -> Response {
    let bar = match store::get_bar(&state.db, &user_id, &bar_id) {
        Ok(Some(bar)) => bar,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Html(preview_page("Not found", "<div class=\"preview-note\">No such announcement bar.</div>")),
            )
                .into_response()
        }
        Err(e) => {
            eprintln!("preview: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(preview_page("Error", "<div class=\"preview-note\">Storage error.</div>")),
            )
                .into_response();
        }
    };

    let direction = Direction::from_dir_attr(query.dir.as_deref().unwrap_or("ltr"));
    let display = BarDisplay::from_bar(&bar);
    let title = if bar.title.is_empty() {
        "Bar preview".to_string()
    } else {
        format!("Preview: {}", bar.title)
    };

    match render_bar(&display, direction, Utc::now()) {
        Some(bar_html) => Html(preview_page(&title, &bar_html)).into_response(),
        None => {
            // Same outcome a host page would see: nothing rendered.
            let note = format!(
                "<div class=\"preview-note\">Bar {} would not render (expired or empty message).</div>",
                html_escape(&bar_id)
            );
            Html(preview_page(&title, &note)).into_response()
        }
    }
}

#[cfg(test)]
#[path = "handlers_test.rs"]
mod handlers_test;

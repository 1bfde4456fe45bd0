//! Data structures for announcement bars.
//!
//! Two shapes matter: `AnnouncementBar` is the stored record owned by a user,
//! `BarDisplay` is the JSON the injected widget consumes. The display shape
//! always has every style field populated (defaults applied), so the widget
//! never has to guess at missing colors.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Style Defaults
// ============================================================================

pub const DEFAULT_BACKGROUND_COLOR: &str = "#333333";
pub const DEFAULT_TEXT_COLOR: &str = "#ffffff";
pub const DEFAULT_TIMER_BACKGROUND_COLOR: &str = "#FC4C1D";
pub const DEFAULT_TIMER_TEXT_COLOR: &str = "#FFFFFF";
pub const DEFAULT_CTA_BACKGROUND_COLOR: &str = "#FC4C1D";
pub const DEFAULT_CTA_TEXT_COLOR: &str = "#FFFFFF";
pub const DEFAULT_FONT_SIZE: u32 = 14;

// ============================================================================
// Enums
// ============================================================================

/// Visual treatment of the countdown unit boxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TimerStyle {
    /// Rounded-rect filled box.
    #[default]
    Square,
    /// Fully rounded box with equal width and height.
    Circle,
    /// No fill, border or padding; digits inherit the bar's text color.
    None,
}

/// Whether the countdown renders before or after the message block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TimerPosition {
    Left,
    #[default]
    Right,
}

/// Target attribute for the CTA anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum LinkTarget {
    #[default]
    #[serde(rename = "_self")]
    SameTab,
    #[serde(rename = "_blank")]
    NewTab,
}

impl LinkTarget {
    /// The literal `target` attribute value.
    pub fn as_attr(&self) -> &'static str {
        match self {
            LinkTarget::SameTab => "_self",
            LinkTarget::NewTab => "_blank",
        }
    }
}

// ============================================================================
// Stored Record
// ============================================================================

/// One configured announcement bar, as persisted for its owner.
///
/// Style fields are optional in storage; defaults are applied when building
/// the wire-facing [`BarDisplay`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnouncementBar {
    pub id: String,
    pub user_id: String,
    #[serde(default)]
    pub title: String,
    pub message: String,
    #[serde(default)]
    pub background_color: Option<String>,
    #[serde(default)]
    pub text_color: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub timer_background_color: Option<String>,
    #[serde(default)]
    pub timer_text_color: Option<String>,
    #[serde(default)]
    pub timer_style: Option<TimerStyle>,
    #[serde(default)]
    pub timer_position: Option<TimerPosition>,
    #[serde(default)]
    pub font_size: Option<u32>,
    #[serde(default)]
    pub cta_text: Option<String>,
    #[serde(default)]
    pub cta_link: Option<String>,
    #[serde(default)]
    pub cta_background_color: Option<String>,
    #[serde(default)]
    pub cta_text_color: Option<String>,
    #[serde(default)]
    pub cta_link_target: Option<LinkTarget>,
    #[serde(default)]
    pub clicks: u64,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Wire Shape
// ============================================================================

/// The configuration object served to the injected widget.
///
/// Immutable once served: the widget fetches it exactly once per page load
/// and never mutates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BarDisplay {
    pub message: String,
    #[serde(default = "default_background_color")]
    pub background_color: String,
    #[serde(default = "default_text_color")]
    pub text_color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default = "default_timer_background_color")]
    pub timer_background_color: String,
    #[serde(default = "default_timer_text_color")]
    pub timer_text_color: String,
    #[serde(default)]
    pub timer_style: TimerStyle,
    #[serde(default)]
    pub timer_position: TimerPosition,
    #[serde(default = "default_font_size")]
    pub font_size: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cta_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cta_link: Option<String>,
    #[serde(default = "default_cta_background_color")]
    pub cta_background_color: String,
    #[serde(default = "default_cta_text_color")]
    pub cta_text_color: String,
    #[serde(default)]
    pub cta_link_target: LinkTarget,
}

fn default_background_color() -> String {
    DEFAULT_BACKGROUND_COLOR.to_string()
}
fn default_text_color() -> String {
    DEFAULT_TEXT_COLOR.to_string()
}
fn default_timer_background_color() -> String {
    DEFAULT_TIMER_BACKGROUND_COLOR.to_string()
}
fn default_timer_text_color() -> String {
    DEFAULT_TIMER_TEXT_COLOR.to_string()
}
fn default_cta_background_color() -> String {
    DEFAULT_CTA_BACKGROUND_COLOR.to_string()
}
fn default_cta_text_color() -> String {
    DEFAULT_CTA_TEXT_COLOR.to_string()
}
fn default_font_size() -> u32 {
    DEFAULT_FONT_SIZE
}

/// Treat empty strings as absent (stored records may carry "" from editors).
fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .map(|s| s.to_string())
}

impl BarDisplay {
    /// Build the wire shape from a stored record, applying all defaults.
    pub fn from_bar(bar: &AnnouncementBar) -> Self {
        BarDisplay {
            message: bar.message.clone(),
            background_color: non_empty(&bar.background_color)
                .unwrap_or_else(default_background_color),
            text_color: non_empty(&bar.text_color).unwrap_or_else(default_text_color),
            image_url: non_empty(&bar.image_url),
            expires_at: bar.expires_at,
            timer_background_color: non_empty(&bar.timer_background_color)
                .unwrap_or_else(default_timer_background_color),
            timer_text_color: non_empty(&bar.timer_text_color)
                .unwrap_or_else(default_timer_text_color),
            timer_style: bar.timer_style.unwrap_or_default(),
            timer_position: bar.timer_position.unwrap_or_default(),
            font_size: bar.font_size.unwrap_or(DEFAULT_FONT_SIZE),
            cta_text: non_empty(&bar.cta_text),
            cta_link: non_empty(&bar.cta_link),
            cta_background_color: non_empty(&bar.cta_background_color)
                .unwrap_or_else(default_cta_background_color),
            cta_text_color: non_empty(&bar.cta_text_color)
                .unwrap_or_else(default_cta_text_color),
            cta_link_target: bar.cta_link_target.unwrap_or_default(),
        }
    }

    /// The CTA renders only when both text and link are present and non-empty.
    /// Enforced here even though the editing form validates upstream: the
    /// widget serves third-party pages and cannot trust upstream validation.
    pub fn cta(&self) -> Option<(&str, &str)> {
        match (self.cta_text.as_deref(), self.cta_link.as_deref()) {
            (Some(text), Some(link)) if !text.is_empty() && !link.is_empty() => {
                Some((text, link))
            }
            _ => None,
        }
    }

    /// A bar whose deadline is at or before `now` is never shown. Note the
    /// inclusive comparison: this is the fetch-time gate, distinct from the
    /// per-tick `remaining < 0` check in the countdown.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(at) => at <= now,
            None => false,
        }
    }
}

// ============================================================================
// Request / Error Shapes
// ============================================================================

/// Error body returned by the JSON API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        ApiError {
            error: message.into(),
        }
    }
}

/// Body of `POST /api/bars`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBarRequest {
    pub user_id: String,
    #[serde(default)]
    pub title: String,
    pub message: String,
    #[serde(default)]
    pub background_color: Option<String>,
    #[serde(default)]
    pub text_color: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub timer_background_color: Option<String>,
    #[serde(default)]
    pub timer_text_color: Option<String>,
    #[serde(default)]
    pub timer_style: Option<TimerStyle>,
    #[serde(default)]
    pub timer_position: Option<TimerPosition>,
    #[serde(default)]
    pub font_size: Option<u32>,
    #[serde(default)]
    pub cta_text: Option<String>,
    #[serde(default)]
    pub cta_link: Option<String>,
    #[serde(default)]
    pub cta_background_color: Option<String>,
    #[serde(default)]
    pub cta_text_color: Option<String>,
    #[serde(default)]
    pub cta_link_target: Option<LinkTarget>,
}

/// Body of `PUT /api/bars/{id}`. Absent fields keep their stored value.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BarPatch {
    pub user_id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub background_color: Option<String>,
    #[serde(default)]
    pub text_color: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub expires_at: Option<Option<DateTime<Utc>>>,
    #[serde(default)]
    pub timer_background_color: Option<String>,
    #[serde(default)]
    pub timer_text_color: Option<String>,
    #[serde(default)]
    pub timer_style: Option<TimerStyle>,
    #[serde(default)]
    pub timer_position: Option<TimerPosition>,
    #[serde(default)]
    pub font_size: Option<u32>,
    #[serde(default)]
    pub cta_text: Option<String>,
    #[serde(default)]
    pub cta_link: Option<String>,
    #[serde(default)]
    pub cta_background_color: Option<String>,
    #[serde(default)]
    pub cta_text_color: Option<String>,
    #[serde(default)]
    pub cta_link_target: Option<LinkTarget>,
}

/// Distinguishes "field absent" (keep stored value) from explicit `null`
/// (clear the deadline) for `expiresAt` patches.
fn double_option<'de, D>(
    de: D,
) -> Result<Option<Option<DateTime<Utc>>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<DateTime<Utc>>::deserialize(de).map(Some)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn bare_bar(message: &str) -> AnnouncementBar {
        AnnouncementBar {
            id: "b1".to_string(),
            user_id: "u1".to_string(),
            title: String::new(),
            message: message.to_string(),
            background_color: None,
            text_color: None,
            image_url: None,
            expires_at: None,
            timer_background_color: None,
            timer_text_color: None,
            timer_style: None,
            timer_position: None,
            font_size: None,
            cta_text: None,
            cta_link: None,
            cta_background_color: None,
            cta_text_color: None,
            cta_link_target: None,
            clicks: 0,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn display_applies_all_defaults() {
        let display = BarDisplay::from_bar(&bare_bar("hello"));
        assert_eq!(display.background_color, DEFAULT_BACKGROUND_COLOR);
        assert_eq!(display.text_color, DEFAULT_TEXT_COLOR);
        assert_eq!(display.timer_background_color, DEFAULT_TIMER_BACKGROUND_COLOR);
        assert_eq!(display.timer_text_color, DEFAULT_TIMER_TEXT_COLOR);
        assert_eq!(display.timer_style, TimerStyle::Square);
        assert_eq!(display.timer_position, TimerPosition::Right);
        assert_eq!(display.font_size, DEFAULT_FONT_SIZE);
        assert_eq!(display.cta_link_target, LinkTarget::SameTab);
    }

    #[test]
    fn empty_strings_are_treated_as_absent() {
        let mut bar = bare_bar("hello");
        bar.image_url = Some("   ".to_string());
        bar.cta_text = Some("Shop".to_string());
        bar.cta_link = Some(String::new());
        let display = BarDisplay::from_bar(&bar);
        assert_eq!(display.image_url, None);
        assert_eq!(display.cta_link, None);
    }

    #[test]
    fn cta_requires_both_fields() {
        let mut bar = bare_bar("Sale!");
        bar.cta_text = Some("Shop".to_string());
        // Link missing: no CTA even though text is set.
        assert_eq!(BarDisplay::from_bar(&bar).cta(), None);

        bar.cta_link = Some("https://example.com/sale".to_string());
        let display = BarDisplay::from_bar(&bar);
        assert_eq!(display.cta(), Some(("Shop", "https://example.com/sale")));
    }

    #[test]
    fn expiry_gate_is_inclusive() {
        let now = Utc::now();
        let mut bar = bare_bar("m");
        bar.expires_at = Some(now);
        assert!(BarDisplay::from_bar(&bar).is_expired_at(now));

        bar.expires_at = Some(now + Duration::seconds(1));
        assert!(!BarDisplay::from_bar(&bar).is_expired_at(now));

        bar.expires_at = None;
        assert!(!BarDisplay::from_bar(&bar).is_expired_at(now));
    }

    #[test]
    fn display_serializes_with_wire_names() {
        let mut bar = bare_bar("hi");
        bar.timer_style = Some(TimerStyle::Circle);
        bar.cta_link_target = Some(LinkTarget::NewTab);
        let json = serde_json::to_value(BarDisplay::from_bar(&bar)).unwrap();
        assert_eq!(json["timerStyle"], "circle");
        assert_eq!(json["ctaLinkTarget"], "_blank");
        assert_eq!(json["backgroundColor"], DEFAULT_BACKGROUND_COLOR);
        // Absent optionals are omitted entirely, not serialized as null.
        assert!(json.get("imageUrl").is_none());
        assert!(json.get("expiresAt").is_none());
    }

    #[test]
    fn display_parses_minimal_json() {
        let display: BarDisplay = serde_json::from_str(r#"{"message":"Sale!"}"#).unwrap();
        assert_eq!(display.message, "Sale!");
        assert_eq!(display.font_size, 14);
        assert_eq!(display.timer_style, TimerStyle::Square);
        assert!(display.expires_at.is_none());
    }

    #[test]
    fn patch_distinguishes_missing_from_null_expiry() {
        let patch: BarPatch = serde_json::from_str(r#"{"userId":"u1"}"#).unwrap();
        assert_eq!(patch.expires_at, None);

        let patch: BarPatch =
            serde_json::from_str(r#"{"userId":"u1","expiresAt":null}"#).unwrap();
        assert_eq!(patch.expires_at, Some(None));
    }
}

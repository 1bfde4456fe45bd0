//! Server-side preview rendering.
//!
//! Renders the exact first frame the injected widget would paint, using the
//! same pure pieces the widget script encodes: child order from
//! [`crate::layout`], initial digits from [`crate::countdown`], and the shared
//! style-resolution rules (timer digits inherit the bar text color when the
//! boxes have no fill, CTA only when both fields are present). Used by the
//! `/preview/{userId}/{barId}` page so owners can check a bar without
//! embedding it anywhere.

use chrono::{DateTime, Utc};

use crate::countdown::{pad2, split_remaining, TimeParts};
use crate::layout::{layout_order, BarChild, Direction};
use crate::models::{BarDisplay, TimerStyle};

// ============================================================================
// Escaping
// ============================================================================

/// Escape text for HTML body and attribute contexts.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

// ============================================================================
// Style Resolution
// ============================================================================

/// Fill color for a countdown unit box; `None` for the box-less style.
pub fn timer_box_fill(display: &BarDisplay) -> Option<&str> {
    match display.timer_style {
        TimerStyle::None => None,
        _ => Some(display.timer_background_color.as_str()),
    }
}

/// Digit color: the configured timer text color, except with no box to
/// contrast against, where digits take the bar's own text color.
pub fn timer_digit_color(display: &BarDisplay) -> &str {
    match display.timer_style {
        TimerStyle::None => display.text_color.as_str(),
        _ => display.timer_text_color.as_str(),
    }
}

/// Body padding after removing a bar of `bar_height`: subtract exactly what
/// was added, clamped so we never push the host's padding negative.
pub fn compensated_padding(current_padding: f64, bar_height: f64) -> f64 {
    (current_padding - bar_height).max(0.0)
}

// ============================================================================
// Bar Markup
// ============================================================================

fn unit_box(display: &BarDisplay, value: i64, label: &str) -> String {
    let (radius, size_css) = match display.timer_style {
        TimerStyle::Circle => ("50%", "min-width:50px;height:50px;"),
        _ => ("4px", "min-width:45px;"),
    };
    let fill_css = match timer_box_fill(display) {
        Some(color) => format!("background-color:{};padding:5px 8px;", color),
        None => "background-color:transparent;padding:0;".to_string(),
    };
    format!(
        r#"<div class="zb-unit" style="display:flex;flex-direction:column;align-items:center;justify-content:center;text-align:center;line-height:1.2;border-radius:{radius};{size_css}{fill_css}color:{color};"><span style="font-size:1.1em;font-weight:bold;">{value}</span><span style="font-size:0.7em;">{label}</span></div>"#,
        radius = radius,
        size_css = size_css,
        fill_css = fill_css,
        color = html_escape(timer_digit_color(display)),
        value = pad2(value),
        label = label,
    )
}

/// The countdown row for the preview's first frame. The days box appears only
/// while remaining days > 0, matching the widget's splice-in/splice-out rule.
fn countdown_row(display: &BarDisplay, parts: TimeParts) -> String {
    let mut boxes = String::new();
    if parts.days > 0 {
        boxes.push_str(&unit_box(display, parts.days, "days"));
    }
    boxes.push_str(&unit_box(display, parts.hours, "hours"));
    boxes.push_str(&unit_box(display, parts.minutes, "minutes"));
    boxes.push_str(&unit_box(display, parts.seconds, "seconds"));

    // Digits always read left-to-right, even inside an RTL document.
    format!(
        r#"<div class="zb-timer" style="display:flex;gap:5px;align-items:center;direction:ltr;">{}</div>"#,
        boxes
    )
}

fn message_block(display: &BarDisplay, direction: Direction) -> String {
    let justify = match direction {
        Direction::Rtl => "flex-end",
        Direction::Ltr => "flex-start",
    };
    let mut inner = String::new();

    if let Some(image_url) = &display.image_url {
        inner.push_str(&format!(
            r#"<img src="{}" alt="" style="height:32px;width:auto;max-height:32px;vertical-align:middle;border-radius:4px;">"#,
            html_escape(image_url)
        ));
    }

    inner.push_str(&format!(
        r#"<span style="font-size:{}px;">{}</span>"#,
        display.font_size,
        html_escape(&display.message)
    ));

    if let Some((text, link)) = display.cta() {
        inner.push_str(&format!(
            r#"<a href="{link}" target="{target}" style="background-color:{bg};color:{fg};padding:6px 12px;border-radius:4px;text-decoration:none;font-size:{size}px;font-weight:500;white-space:nowrap;">{text}</a>"#,
            link = html_escape(link),
            target = display.cta_link_target.as_attr(),
            bg = html_escape(&display.cta_background_color),
            fg = html_escape(&display.cta_text_color),
            size = display.font_size,
            text = html_escape(text),
        ));
    }

    format!(
        r#"<div class="zb-message" style="display:flex;align-items:center;gap:10px;flex-grow:1;justify-content:{};">{}</div>"#,
        justify, inner
    )
}

fn close_control(display: &BarDisplay) -> String {
    format!(
        r#"<button class="zb-close" aria-label="Dismiss" style="background:transparent;border:none;color:{};font-size:20px;cursor:pointer;padding:0 5px;line-height:1;opacity:0.7;">&times;</button>"#,
        html_escape(&display.text_color)
    )
}

/// Render the bar as static HTML at instant `now`.
///
/// Returns `None` when the bar would never render: expired at or before `now`
/// (no flash-then-remove) or an empty message.
pub fn render_bar(display: &BarDisplay, direction: Direction, now: DateTime<Utc>) -> Option<String> {
    if display.message.trim().is_empty() || display.is_expired_at(now) {
        return None;
    }

    let timer_html = display.expires_at.map(|at| {
        let remaining_ms = at.timestamp_millis() - now.timestamp_millis();
        countdown_row(display, split_remaining(remaining_ms))
    });

    let mut children = String::new();
    for child in layout_order(direction, display.timer_position) {
        match child {
            BarChild::Message => children.push_str(&message_block(display, direction)),
            BarChild::Timer => {
                // No deadline, no countdown markup at all.
                if let Some(html) = &timer_html {
                    children.push_str(html);
                }
            }
            BarChild::Close => children.push_str(&close_control(display)),
        }
    }

    let dir_attr = match direction {
        Direction::Rtl => "rtl",
        Direction::Ltr => "ltr",
    };
    Some(format!(
        r#"<div class="zb-bar" dir="{dir}" style="background-color:{bg};color:{fg};padding:10px 15px;width:100%;box-sizing:border-box;line-height:1.5;font-family:sans-serif;box-shadow:0 2px 8px rgba(0,0,0,0.2);display:flex;align-items:center;justify-content:space-between;gap:15px;">{children}</div>"#,
        dir = dir_attr,
        bg = html_escape(&display.background_color),
        fg = html_escape(&display.text_color),
        children = children,
    ))
}

/// Wrap preview content in a minimal page.
pub fn preview_page(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>
    body {{ margin: 0; font-family: sans-serif; background: #f5f5f5; }}
    .preview-note {{ padding: 2rem 1rem; color: #666; text-align: center; }}
</style>
</head>
<body>
{body}
<div class="preview-note">Preview only. Paste the embed snippet into a site to go live.</div>
</body>
</html>"#,
        title = html_escape(title),
        body = body,
    )
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use crate::models::{LinkTarget, TimerPosition};

    fn display(message: &str) -> BarDisplay {
        serde_json::from_value(serde_json::json!({ "message": message })).unwrap()
    }

    #[test]
    fn no_deadline_means_no_countdown_markup() {
        let html = render_bar(&display("Hi"), Direction::Ltr, Utc::now()).unwrap();
        assert!(!html.contains("zb-timer"));
        assert!(!html.contains("zb-unit"));
    }

    #[test]
    fn expired_bar_renders_nothing() {
        let now = Utc::now();
        let mut d = display("Old news");
        d.expires_at = Some(now - Duration::hours(1));
        assert_eq!(render_bar(&d, Direction::Ltr, now), None);
        // At exactly now: still nothing (inclusive gate).
        d.expires_at = Some(now);
        assert_eq!(render_bar(&d, Direction::Ltr, now), None);
    }

    #[test]
    fn empty_message_renders_nothing() {
        assert_eq!(render_bar(&display("  "), Direction::Ltr, Utc::now()), None);
    }

    #[test]
    fn initial_digits_for_example_deadline() {
        let now = Utc::now();
        let mut d = display("Sale!");
        d.expires_at = Some(now + Duration::milliseconds(90_061_000));
        let html = render_bar(&d, Direction::Ltr, now).unwrap();
        // 1d 1h 1m 1s, all zero-padded; days box present since days > 0.
        assert_eq!(html.matches(">01<").count(), 4);
        assert!(html.contains("days"));
    }

    #[test]
    fn days_box_absent_under_one_day() {
        let now = Utc::now();
        let mut d = display("Soon");
        d.expires_at = Some(now + Duration::hours(3));
        let html = render_bar(&d, Direction::Ltr, now).unwrap();
        assert!(!html.contains("days"));
        assert!(html.contains("hours"));
    }

    #[test]
    fn boxless_timer_inherits_bar_text_color() {
        let now = Utc::now();
        let mut d = display("Sale");
        d.text_color = "#112233".to_string();
        d.timer_style = TimerStyle::None;
        d.expires_at = Some(now + Duration::hours(2));
        let html = render_bar(&d, Direction::Ltr, now).unwrap();
        assert!(html.contains("color:#112233"));
        assert!(!html.contains(&format!("color:{}", d.timer_text_color)));
        assert!(html.contains("background-color:transparent"));
    }

    #[test]
    fn cta_skipped_when_link_empty() {
        let mut d = display("Sale");
        d.cta_text = Some("Shop".to_string());
        d.cta_link = Some(String::new());
        let html = render_bar(&d, Direction::Ltr, Utc::now()).unwrap();
        assert!(!html.contains("<a "));
    }

    #[test]
    fn cta_renders_with_target_and_colors() {
        let mut d = display("Sale");
        d.cta_text = Some("Shop".to_string());
        d.cta_link = Some("https://example.com/s".to_string());
        d.cta_link_target = LinkTarget::NewTab;
        let html = render_bar(&d, Direction::Ltr, Utc::now()).unwrap();
        assert!(html.contains(r#"target="_blank""#));
        assert!(html.contains("https://example.com/s"));
    }

    #[test]
    fn message_is_escaped() {
        let html = render_bar(
            &display("<script>alert(1)</script>"),
            Direction::Ltr,
            Utc::now(),
        )
        .unwrap();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn rtl_puts_close_first_and_right_aligns_message() {
        let mut d = display("Hi");
        d.expires_at = Some(Utc::now() + Duration::hours(1));
        d.timer_position = TimerPosition::Left;
        let html = render_bar(&d, Direction::Rtl, Utc::now()).unwrap();
        let close_at = html.find("zb-close").unwrap();
        let timer_at = html.find("zb-timer").unwrap();
        let message_at = html.find("zb-message").unwrap();
        assert!(close_at < timer_at && timer_at < message_at);
        assert!(html.contains("justify-content:flex-end"));
        // Digits stay LTR inside the RTL bar.
        assert!(html.contains("direction:ltr"));
    }

    #[test]
    fn padding_compensation_clamps_at_zero() {
        assert_eq!(compensated_padding(40.0, 25.0), 15.0);
        assert_eq!(compensated_padding(20.0, 25.0), 0.0);
        assert_eq!(compensated_padding(0.0, 10.0), 0.0);
    }
}

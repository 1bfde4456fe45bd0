//! The host embed snippet.
//!
//! The one artifact a site owner pastes into their page: an inline bootstrap
//! that appends an async `<script>` tag pointing at the script generator.

use super::widget::js_escape;

/// Build the bootstrap snippet for one bar.
pub fn embed_snippet(bar_id: &str, user_id: &str, base_url: &str) -> String {
    let script_url = format!(
        "{}/api/load-bar-script?barId={}&userId={}",
        base_url.trim_end_matches('/'),
        urlencoding::encode(bar_id),
        urlencoding::encode(user_id)
    );
    format!(
        r#"<script>
  (function() {{
    var zoomBarScript = document.createElement('script');
    zoomBarScript.src = '{}';
    zoomBarScript.async = true;
    document.head.appendChild(zoomBarScript);
  }})();
</script>"#,
        js_escape(&script_url)
    )
}

// ============================================================================
// Tests
// ============================================================================

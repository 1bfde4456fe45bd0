//! Sanity checks for owner-supplied URLs.
//!
//! Image and CTA links end up verbatim inside pages we do not control, so the
//! management API refuses anything that is not a well-formed absolute
//! http(s) URL. This blocks `javascript:` and `data:` payloads at the door;
//! rendering still escapes attribute values as a second layer.

use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlCheckError {
    /// URL is malformed or relative.
    Invalid(String),
    /// Parsed, but the scheme is not http or https.
    UnsupportedScheme(String),
}

impl std::fmt::Display for UrlCheckError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UrlCheckError::Invalid(msg) => write!(f, "Invalid URL: {}", msg),
            UrlCheckError::UnsupportedScheme(scheme) => {
                write!(f, "Unsupported URL scheme: {}", scheme)
            }
        }
    }
}

impl std::error::Error for UrlCheckError {}

/// Validate that `raw` is an absolute http(s) URL.
pub fn check_http_url(raw: &str) -> Result<Url, UrlCheckError> {
    let parsed = Url::parse(raw).map_err(|e| UrlCheckError::Invalid(e.to_string()))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(UrlCheckError::UnsupportedScheme(other.to_string())),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_http_and_https() {
        assert!(check_http_url("https://example.com/sale").is_ok());
        assert!(check_http_url("http://example.com/logo.png?v=2").is_ok());
    }

    #[test]
    fn rejects_script_schemes() {
        assert_eq!(
            check_http_url("javascript:alert(1)"),
            Err(UrlCheckError::UnsupportedScheme("javascript".to_string()))
        );
        assert!(matches!(
            check_http_url("data:text/html,<script>"),
            Err(UrlCheckError::UnsupportedScheme(_))
        ));
    }

    #[test]
    fn rejects_relative_and_garbage() {
        assert!(matches!(
            check_http_url("/images/logo.png"),
            Err(UrlCheckError::Invalid(_))
        ));
        assert!(matches!(
            check_http_url("not a url"),
            Err(UrlCheckError::Invalid(_))
        ));
    }
}

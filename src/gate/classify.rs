//! Path classification: which requests the gate inspects at all.

use axum::http::{uri::PathAndQuery, Uri};
use percent_encoding::percent_decode_str;
use url::Url;

/// Outcome of classifying a request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Static asset; forwarded without any auth checks.
    Bypass,
    /// Navigable document; subject to the password challenge.
    Guarded,
}

/// Classify a request path (without query string).
///
/// The path is first reduced to what a file server resolves it to: percent
/// escapes decoded, empty and `.` segments dropped. That path bypasses the
/// gate iff it contains a `.`, does not end in `.html`, and does not end in
/// `/`. Anything that cannot be reduced (bad UTF-8, `..`) is guarded.
#[must_use]
pub fn classify(path: &str) -> Classification {
    match served_path(path) {
        Some(path) if !path.ends_with('/') && path.contains('.') && !path.ends_with(".html") => {
            Classification::Bypass
        }
        _ => Classification::Guarded,
    }
}

/// Resolve `.` and `..` segments the way a browser does, so the gate and the
/// origin see the same path. Leading slash runs are collapsed first so
/// `//host/x` stays a path instead of becoming an authority.
///
/// Returns `None` if the result is not a valid request target.
#[must_use]
pub fn normalize(uri: &Uri) -> Option<Uri> {
    let raw = uri.path_and_query().map_or("/", |pq| pq.as_str());
    let relative = format!("/{}", raw.trim_start_matches(['/', '\\']));

    let resolved = Url::parse("http://gate/").ok()?.join(&relative).ok()?;
    let mut target = resolved.path().to_string();
    if let Some(query) = resolved.query() {
        target.push('?');
        target.push_str(query);
    }

    let mut parts = uri.clone().into_parts();
    parts.path_and_query = Some(PathAndQuery::try_from(target).ok()?);
    Uri::from_parts(parts).ok()
}

fn served_path(path: &str) -> Option<String> {
    let decoded = percent_decode_str(path).decode_utf8().ok()?;

    let mut segments = Vec::new();
    let mut directory = true;
    for segment in decoded.split('/') {
        match segment {
            "" | "." => directory = true,
            ".." => return None,
            name => {
                segments.push(name);
                directory = false;
            }
        }
    }

    let mut served = format!("/{}", segments.join("/"));
    if directory && !segments.is_empty() {
        served.push('/');
    }
    Some(served)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assets_bypass() {
        for path in [
            "/app.js",
            "/css/site.css",
            "/img/logo.png",
            "/fonts/noto.woff2",
            "/favicon.ico",
            "/feed.xml",
        ] {
            assert_eq!(classify(path), Classification::Bypass, "{path}");
        }
    }

    #[test]
    fn documents_are_guarded() {
        for path in ["/", "", "/docs", "/docs/", "/docs/page.html", "/index.html"] {
            assert_eq!(classify(path), Classification::Guarded, "{path}");
        }
    }

    #[test]
    fn dot_anywhere_in_path_counts() {
        // A dotted directory makes the whole path look like an asset.
        assert_eq!(classify("/v1.2/guide"), Classification::Bypass);
        assert_eq!(classify("/.well-known/security.txt"), Classification::Bypass);
    }

    #[test]
    fn html_suffix_is_case_sensitive() {
        assert_eq!(classify("/PAGE.HTML"), Classification::Bypass);
        assert_eq!(classify("/page.htm"), Classification::Bypass);
    }

    #[test]
    fn trailing_slash_is_guarded() {
        for path in ["/index.html/", "/docs/page.html/", "/v1.2/", "/app.js/"] {
            assert_eq!(classify(path), Classification::Guarded, "{path}");
        }
    }

    #[test]
    fn dot_segments_are_guarded() {
        for path in [
            "/./",
            "/./docs/",
            "/docs/page.html/.",
            "/./docs/page.html/.",
            "/docs/./page.html",
            "/docs//page.html",
            "/docs/../index.html",
        ] {
            assert_eq!(classify(path), Classification::Guarded, "{path}");
        }
        assert_eq!(classify("/./app.js"), Classification::Bypass);
    }

    #[test]
    fn percent_escapes_are_decoded() {
        for path in [
            "/docs/page%2Ehtml",
            "/docs/page%2ehtml",
            "/docs%2Fpage.html",
            "/docs/page.html%2F.",
            "/docs/page.html%2F",
            "/%FF.js",
        ] {
            assert_eq!(classify(path), Classification::Guarded, "{path}");
        }
        assert_eq!(classify("/app%2Ejs"), Classification::Bypass);
    }

    fn normalized(raw: &str) -> Option<String> {
        let uri = Uri::builder().path_and_query(raw).build().ok()?;
        normalize(&uri).map(|uri| uri.to_string())
    }

    #[test]
    fn normalize_resolves_dot_segments() {
        assert_eq!(normalized("/./").as_deref(), Some("/"));
        assert_eq!(normalized("/./docs/").as_deref(), Some("/docs/"));
        assert_eq!(
            normalized("/docs/page.html/.").as_deref(),
            Some("/docs/page.html/")
        );
        assert_eq!(
            normalized("/assets/../docs/page.html").as_deref(),
            Some("/docs/page.html")
        );
        assert_eq!(normalized("/%2e/docs/%2E%2E/").as_deref(), Some("/"));
        assert_eq!(normalized("/../../etc/passwd").as_deref(), Some("/etc/passwd"));
    }

    #[test]
    fn normalize_keeps_query_and_plain_paths() {
        assert_eq!(
            normalized("/search?q=a.b&page=2").as_deref(),
            Some("/search?q=a.b&page=2")
        );
        assert_eq!(normalized("/app.js").as_deref(), Some("/app.js"));
        assert_eq!(
            normalized("/docs/page%2Ehtml").as_deref(),
            Some("/docs/page%2Ehtml")
        );
    }

    #[test]
    fn normalize_never_yields_an_authority() {
        assert_eq!(normalized("//evil.example/x").as_deref(), Some("/evil.example/x"));
        assert_eq!(normalized("///x?a=1").as_deref(), Some("/x?a=1"));
    }
}

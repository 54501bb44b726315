//! Document location helpers
//!
//! Minimal URL handling for absolute `scheme://authority/path?query#fragment`
//! locations: origin extraction, reference resolution and splitting.

/// Components of an absolute URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlParts<'a> {
    pub origin: &'a str,
    pub path: &'a str,
    pub query: Option<&'a str>,
    pub fragment: Option<&'a str>,
}

/// Returns true if `url` carries its own scheme
pub fn is_absolute(url: &str) -> bool {
    match url.find("://") {
        Some(idx) => {
            idx > 0
                && url[..idx]
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '+' || c == '-' || c == '.')
        }
        None => false,
    }
}

/// `scheme://authority` of an absolute URL
pub fn origin(url: &str) -> Option<&str> {
    if !is_absolute(url) {
        return None;
    }
    let authority_start = url.find("://")? + 3;
    let end = url[authority_start..]
        .find(['/', '?', '#'])
        .map(|idx| authority_start + idx)
        .unwrap_or(url.len());
    Some(&url[..end])
}

/// Split an absolute URL into its components
pub fn split(url: &str) -> Option<UrlParts<'_>> {
    let origin = origin(url)?;
    let rest = &url[origin.len()..];

    let (rest, fragment) = match rest.find('#') {
        Some(idx) => (&rest[..idx], Some(&rest[idx + 1..])),
        None => (rest, None),
    };
    let (path, query) = match rest.find('?') {
        Some(idx) => (&rest[..idx], Some(&rest[idx + 1..])),
        None => (rest, None),
    };

    Some(UrlParts {
        origin,
        path,
        query,
        fragment,
    })
}

/// The absolute URL a push to `target` is expected to land on.
///
/// Absolute targets are taken as-is, anything else is appended to the origin of
/// `current`. Returns `None` when there is no target or `current` has no origin.
pub fn prospective_url(current: &str, target: Option<&str>) -> Option<String> {
    let target = target?;
    if is_absolute(target) {
        return Some(target.to_string());
    }
    origin(current).map(|origin| format!("{}{}", origin, target))
}

/// Resolve a URL reference against an absolute base URL
pub fn resolve(base: &str, reference: &str) -> String {
    if is_absolute(reference) {
        return reference.to_string();
    }

    let Some(parts) = split(base) else {
        return reference.to_string();
    };

    if let Some(authority) = reference.strip_prefix("//") {
        let scheme_end = parts.origin.find("://").unwrap_or(0);
        return format!("{}://{}", &parts.origin[..scheme_end], authority);
    }

    if reference.is_empty() {
        return strip_fragment(base).to_string();
    }

    if reference.starts_with('#') {
        return format!("{}{}", strip_fragment(base), reference);
    }

    if reference.starts_with('?') {
        return format!("{}{}{}", parts.origin, base_path(parts.path), reference);
    }

    let (ref_path, suffix) = match reference.find(['?', '#']) {
        Some(idx) => (&reference[..idx], &reference[idx..]),
        None => (reference, ""),
    };

    let merged = if ref_path.starts_with('/') {
        ref_path.to_string()
    } else {
        let path = base_path(parts.path);
        let dir = &path[..path.rfind('/').map(|idx| idx + 1).unwrap_or(0)];
        format!("{}{}", dir, ref_path)
    };

    format!("{}{}{}", parts.origin, remove_dot_segments(&merged), suffix)
}

fn base_path(path: &str) -> &str {
    if path.is_empty() { "/" } else { path }
}

fn strip_fragment(url: &str) -> &str {
    match url.find('#') {
        Some(idx) => &url[..idx],
        None => url,
    }
}

fn remove_dot_segments(path: &str) -> String {
    let mut output: Vec<&str> = Vec::new();
    let segments: Vec<&str> = path.split('/').collect();
    let last = segments.len().saturating_sub(1);

    for (idx, segment) in segments.iter().enumerate() {
        match *segment {
            "." => {
                if idx == last {
                    output.push("");
                }
            }
            ".." => {
                if output.len() > 1 {
                    output.pop();
                }
                if idx == last {
                    output.push("");
                }
            }
            other => output.push(other),
        }
    }

    let joined = output.join("/");
    if joined.starts_with('/') {
        joined
    } else {
        format!("/{}", joined)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://example.com/docs/guide/intro?lang=en#top";

    #[test]
    fn origin_extracts_scheme_and_authority() {
        assert_eq!(origin(BASE), Some("https://example.com"));
        assert_eq!(origin("http://localhost:8080"), Some("http://localhost:8080"));
        assert_eq!(origin("/relative"), None);
    }

    #[test]
    fn is_absolute_requires_scheme() {
        assert!(is_absolute("https://example.com"));
        assert!(!is_absolute("/a"));
        assert!(!is_absolute("a?next=https://example.com"));
    }

    #[test]
    fn split_returns_components() {
        let parts = split(BASE).unwrap();
        assert_eq!(parts.origin, "https://example.com");
        assert_eq!(parts.path, "/docs/guide/intro");
        assert_eq!(parts.query, Some("lang=en"));
        assert_eq!(parts.fragment, Some("top"));
    }

    #[test]
    fn prospective_url_appends_target_to_origin() {
        assert_eq!(
            prospective_url("https://example.com/a", Some("/b")),
            Some("https://example.com/b".to_string())
        );
        assert_eq!(
            prospective_url("https://example.com/a", Some("https://other.org/x")),
            Some("https://other.org/x".to_string())
        );
        assert_eq!(prospective_url("https://example.com/a", None), None);
    }

    #[test]
    fn resolve_handles_path_absolute_reference() {
        assert_eq!(resolve(BASE, "/b"), "https://example.com/b");
        assert_eq!(resolve(BASE, "/b?x=1#y"), "https://example.com/b?x=1#y");
    }

    #[test]
    fn resolve_handles_relative_paths() {
        assert_eq!(resolve(BASE, "setup"), "https://example.com/docs/guide/setup");
        assert_eq!(resolve(BASE, "../api"), "https://example.com/docs/api");
        assert_eq!(resolve(BASE, "./"), "https://example.com/docs/guide/");
        assert_eq!(resolve(BASE, "../../../x"), "https://example.com/x");
    }

    #[test]
    fn resolve_handles_query_and_fragment_only() {
        assert_eq!(resolve(BASE, "?lang=de"), "https://example.com/docs/guide/intro?lang=de");
        assert_eq!(resolve(BASE, "#!home"), "https://example.com/docs/guide/intro?lang=en#!home");
        assert_eq!(resolve(BASE, ""), "https://example.com/docs/guide/intro?lang=en");
    }

    #[test]
    fn resolve_handles_scheme_relative_reference() {
        assert_eq!(resolve(BASE, "//cdn.example.com/a"), "https://cdn.example.com/a");
    }
}

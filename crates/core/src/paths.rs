//! Path derivation from item links, and redirect detection.

use serde::Serialize;
use url::Url;

use crate::config::SiteConfig;

/// Paths derived from one item link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPaths {
    /// The link's own path, host stripped, slash-terminated
    pub path: String,
    /// The path of the directory-normalized link
    pub path_normalized: String,
    /// `path` with valid percent escapes decoded
    pub path_unescaped: String,
}

/// A published post or page whose canonical path must redirect
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Redirect {
    pub path: String,
    pub path_normalized: String,
    pub path_unescaped: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
}

/// Strip scheme and site hostname, then enforce one leading and one trailing slash
pub fn normalize_path(input: &str, hostname: &str) -> String {
    let rest = input
        .strip_prefix("https://")
        .or_else(|| input.strip_prefix("http://"))
        .unwrap_or(input);

    let rest = match rest.strip_prefix(hostname) {
        Some(after) if after.is_empty() || after.starts_with('/') => after,
        _ => rest,
    };

    let trimmed = rest.trim_start_matches('/').trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{trimmed}/")
    }
}

/// Rewrite a link into a form usable as a directory name
///
/// Returns `host/segment/…/` where:
/// - a trailing file name (last segment with an extension, no trailing slash) is dropped
/// - query pairs become `key/value` segments (`?p=12` → `p/12/`)
/// - segments are lowercased and `%` signs removed from escapes
///
/// Links that do not parse as URLs are treated as bare paths.
pub fn dirname_normalize(link: &str) -> String {
    let (host, path, query) = match Url::parse(link) {
        Ok(url) => (
            url.host_str().unwrap_or_default().to_string(),
            url.path().to_string(),
            url.query_pairs()
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect::<Vec<_>>(),
        ),
        Err(_) => (String::new(), link.to_string(), Vec::new()),
    };

    let mut segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    if !path.ends_with('/') && segments.last().is_some_and(|s| s.contains('.')) {
        segments.pop();
    }

    let mut normalized: Vec<String> = segments.into_iter().map(normalize_segment).collect();
    for (key, value) in &query {
        for part in [key, value] {
            let part = normalize_segment(&urlencoding::encode(part));
            if !part.is_empty() {
                normalized.push(part);
            }
        }
    }

    let mut out = host;
    for segment in normalized {
        out.push('/');
        out.push_str(&segment);
    }
    out.push('/');
    out
}

fn normalize_segment(segment: &str) -> String {
    segment.replace('%', "").to_lowercase()
}

/// Percent-decode a path, leaving malformed or non-UTF-8 escapes untouched
pub fn unescape_url_path(path: &str) -> String {
    let bytes = path.as_bytes();
    let mut out = String::with_capacity(path.len());
    let mut idx = 0;

    while idx < bytes.len() {
        let run_start = idx;
        let mut decoded = Vec::new();
        while idx + 3 <= bytes.len() && bytes[idx] == b'%' {
            match hex_pair(bytes[idx + 1], bytes[idx + 2]) {
                Some(byte) => {
                    decoded.push(byte);
                    idx += 3;
                }
                None => break,
            }
        }

        if decoded.is_empty() {
            let ch_len = path[idx..].chars().next().map_or(1, char::len_utf8);
            out.push_str(&path[idx..idx + ch_len]);
            idx += ch_len;
            continue;
        }

        push_decoded_run(&mut out, &decoded, &path[run_start..idx]);
    }

    out
}

/// Append a run of percent-decoded bytes, keeping the `%XX` text of each byte
/// that is not part of a valid UTF-8 sequence. `raw` holds three chars per byte.
fn push_decoded_run(out: &mut String, decoded: &[u8], raw: &str) {
    let mut pos = 0;
    while pos < decoded.len() {
        let rest = &decoded[pos..];
        let (valid, bad) = match std::str::from_utf8(rest) {
            Ok(_) => (rest.len(), 0),
            Err(e) => (
                e.valid_up_to(),
                e.error_len().unwrap_or(rest.len() - e.valid_up_to()),
            ),
        };
        if let Ok(text) = std::str::from_utf8(&rest[..valid]) {
            out.push_str(text);
        }
        pos += valid;
        out.push_str(&raw[pos * 3..(pos + bad) * 3]);
        pos += bad;
    }
}

fn hex_pair(high: u8, low: u8) -> Option<u8> {
    let high = (high as char).to_digit(16)?;
    let low = (low as char).to_digit(16)?;
    Some((high * 16 + low) as u8)
}

/// Derive all paths for a link
pub fn resolve_paths(link: &str, config: &SiteConfig) -> ResolvedPaths {
    let path = normalize_path(link, &config.hostname);
    let path_normalized = normalize_path(&dirname_normalize(link), &config.hostname);
    let path_unescaped = unescape_url_path(&path);
    ResolvedPaths {
        path,
        path_normalized,
        path_unescaped,
    }
}

/// Whether the canonical path differs from its normalized form or is a known legacy path
pub fn needs_redirect(paths: &ResolvedPaths, config: &SiteConfig) -> bool {
    paths.path != paths.path_normalized
        || config.redirect_target(&paths.path_normalized).is_some()
}

/// The redirect record for `paths`, if one is needed
///
/// The legacy table's target is authoritative whenever the normalized path is
/// listed, whether or not the canonical and normalized paths differ.
pub fn redirect_for(paths: &ResolvedPaths, config: &SiteConfig) -> Option<Redirect> {
    if !needs_redirect(paths, config) {
        return None;
    }

    Some(Redirect {
        path: paths.path.clone(),
        path_normalized: paths.path_normalized.clone(),
        path_unescaped: paths.path_unescaped.clone(),
        to: config
            .redirect_target(&paths.path_normalized)
            .map(str::to_string),
    })
}

/// Whether a path uses the `/p/<id>/` short-permalink form
pub fn is_short_permalink(path: &str) -> bool {
    path.starts_with("/p/")
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOST: &str = "renoirboulanger.com";

    #[test]
    fn test_normalize_path_strips_scheme_and_host() {
        assert_eq!(
            normalize_path("https://renoirboulanger.com/blog/2020/01/example/", HOST),
            "/blog/2020/01/example/"
        );
        assert_eq!(
            normalize_path("http://renoirboulanger.com/blog/2020/01/example", HOST),
            "/blog/2020/01/example/"
        );
    }

    #[test]
    fn test_normalize_path_collapses_slashes() {
        assert_eq!(normalize_path("blog/x//", HOST), "/blog/x/");
        assert_eq!(normalize_path("//blog/x", HOST), "/blog/x/");
        assert_eq!(normalize_path("https://renoirboulanger.com/", HOST), "/");
        assert_eq!(normalize_path("", HOST), "/");
    }

    #[test]
    fn test_normalize_path_keeps_foreign_hosts() {
        assert_eq!(
            normalize_path("https://example.org/a/", HOST),
            "/example.org/a/"
        );
        assert_eq!(
            normalize_path("https://renoirboulanger.community/a/", HOST),
            "/renoirboulanger.community/a/"
        );
    }

    #[test]
    fn test_normalize_path_is_idempotent() {
        for input in [
            "https://renoirboulanger.com/blog/2020/01/example/",
            "https://renoirboulanger.com/?p=12",
            "/already/normal/",
            "no/slashes",
            "",
        ] {
            let once = normalize_path(input, HOST);
            assert_eq!(normalize_path(&once, HOST), once, "input: {input}");
        }
    }

    #[test]
    fn test_dirname_normalize_plain_directory() {
        assert_eq!(
            dirname_normalize("https://renoirboulanger.com/blog/2020/01/example/"),
            "renoirboulanger.com/blog/2020/01/example/"
        );
    }

    #[test]
    fn test_dirname_normalize_query_becomes_segments() {
        assert_eq!(
            dirname_normalize("https://renoirboulanger.com/?p=6189"),
            "renoirboulanger.com/p/6189/"
        );
    }

    #[test]
    fn test_dirname_normalize_drops_file_name() {
        assert_eq!(
            dirname_normalize("https://renoirboulanger.com/files/index.php"),
            "renoirboulanger.com/files/"
        );
    }

    #[test]
    fn test_dirname_normalize_flattens_escapes() {
        assert_eq!(
            dirname_normalize("https://renoirboulanger.com/blog/le-%c2%abclub%c2%bb/"),
            "renoirboulanger.com/blog/le-c2abclubc2bb/"
        );
    }

    #[test]
    fn test_unescape_url_path() {
        assert_eq!(unescape_url_path("/le-%c2%abclub%c2%bb/"), "/le-«club»/");
        assert_eq!(unescape_url_path("/a%20b/"), "/a b/");
        assert_eq!(unescape_url_path("/plain/"), "/plain/");
    }

    #[test]
    fn test_unescape_url_path_leaves_malformed_untouched() {
        assert_eq!(unescape_url_path("/100%/"), "/100%/");
        assert_eq!(unescape_url_path("/%zz/"), "/%zz/");
        assert_eq!(unescape_url_path("/%c2/"), "/%c2/");
        assert_eq!(unescape_url_path("/end%4"), "/end%4");
    }

    #[test]
    fn test_unescape_url_path_keeps_only_bad_escapes_raw() {
        assert_eq!(unescape_url_path("/caf%c3%a9%ff/"), "/café%ff/");
        assert_eq!(unescape_url_path("/%ff%c3%a9/"), "/%ffé/");
        assert_eq!(unescape_url_path("/%c3%a9%c3/"), "/é%c3/");
        assert_eq!(unescape_url_path("/a%20"), "/a ");
    }

    #[test]
    fn test_resolve_paths_for_regular_post() {
        let paths = resolve_paths(
            "https://renoirboulanger.com/blog/2020/01/example/",
            &SiteConfig::default(),
        );
        assert_eq!(paths.path, "/blog/2020/01/example/");
        assert_eq!(paths.path_normalized, "/blog/2020/01/example/");
        assert_eq!(paths.path_unescaped, "/blog/2020/01/example/");
        assert!(!needs_redirect(&paths, &SiteConfig::default()));
    }

    #[test]
    fn test_resolve_paths_for_short_permalink() {
        let paths = resolve_paths("https://renoirboulanger.com/?p=6189", &SiteConfig::default());
        assert_eq!(paths.path, "/?p=6189/");
        assert_eq!(paths.path_normalized, "/p/6189/");
        assert!(is_short_permalink(&paths.path_normalized));
        assert!(needs_redirect(&paths, &SiteConfig::default()));
    }

    #[test]
    fn test_redirect_for_slash_mismatch_has_no_target() {
        let config = SiteConfig::default();
        let paths = resolve_paths("https://renoirboulanger.com/Blog/Mixed-Case/", &config);
        let redirect = redirect_for(&paths, &config).unwrap();
        assert_eq!(redirect.path, "/Blog/Mixed-Case/");
        assert_eq!(redirect.path_normalized, "/blog/mixed-case/");
        assert_eq!(redirect.to, None);
    }

    #[test]
    fn test_redirect_for_legacy_table_entry_without_mismatch() {
        let config = SiteConfig::default();
        let paths = resolve_paths("https://renoirboulanger.com/home/", &config);
        assert_eq!(paths.path, paths.path_normalized);
        let redirect = redirect_for(&paths, &config).unwrap();
        assert_eq!(redirect.to.as_deref(), Some("/blog/"));
    }

    #[test]
    fn test_redirect_for_legacy_table_entry_with_mismatch() {
        let config = SiteConfig::default();
        let paths = resolve_paths(
            "https://renoirboulanger.com/blog/2010/01/le-defi-%c2%abproject52%c2%bb-un-billet-par-semaine-minimum/",
            &config,
        );
        assert_ne!(paths.path, paths.path_normalized);
        assert_eq!(
            paths.path_unescaped,
            "/blog/2010/01/le-defi-«project52»-un-billet-par-semaine-minimum/"
        );
        let redirect = redirect_for(&paths, &config).unwrap();
        assert_eq!(
            redirect.to.as_deref(),
            Some("/blog/2010/01/le-defi-project52-pour-un-billet-de-blogue-par-semaine/")
        );
    }

    #[test]
    fn test_needs_redirect_is_deterministic() {
        let config = SiteConfig::default();
        let paths = ResolvedPaths {
            path: "/a/".to_string(),
            path_normalized: "/b/".to_string(),
            path_unescaped: "/a/".to_string(),
        };
        let first = needs_redirect(&paths, &config);
        for _ in 0..10 {
            assert_eq!(needs_redirect(&paths, &config), first);
        }
    }
}

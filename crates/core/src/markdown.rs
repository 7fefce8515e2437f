use regex::Regex;
use std::sync::OnceLock;

/// Convert an HTML fragment from a post body, excerpt, or comment to Markdown
///
/// WordPress content uses `<pre>` for short inline snippets and `<tt>` for
/// multi-line listings, the reverse of what HTML-to-Markdown conversion
/// assumes. Tags are swapped before conversion so that `<pre>`/`<code>` end
/// up in inline backticks and `<tt>` in a fenced block.
pub fn to_markdown(html: &str) -> String {
    if html.trim().is_empty() {
        return String::new();
    }

    let swapped = swap_code_tags(html);
    html2md::parse_html(&swapped).trim().to_string()
}

fn swap_code_tags(html: &str) -> String {
    static RE_PRE: OnceLock<Regex> = OnceLock::new();
    let re_pre = RE_PRE.get_or_init(|| Regex::new(r"(?i)<(/?)pre\b[^>]*>").unwrap());
    let html = re_pre.replace_all(html, "<${1}code>");

    static RE_TT: OnceLock<Regex> = OnceLock::new();
    let re_tt = RE_TT.get_or_init(|| Regex::new(r"(?i)<(/?)tt\b[^>]*>").unwrap());
    re_tt.replace_all(&html, "<${1}pre>").to_string()
}

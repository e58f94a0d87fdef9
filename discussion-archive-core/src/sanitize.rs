//! Title + date → file names for the backup tree and the wiki staging directory.
//!
//! Only the characters `/ \ : * ? " < > |` are removed. Control characters,
//! leading dots and `..` pass through untouched.

use std::sync::LazyLock;

use regex::Regex;

static UNSAFE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[/\\:*?"<>|]"#).expect("static pattern compiles"));

/// Strips path-unsafe characters, trims, and turns spaces into hyphens.
pub fn sanitize_title(title: &str) -> String {
    UNSAFE_CHARS
        .replace_all(title, "")
        .trim()
        .replace(' ', "-")
}

/// `{date}-{title}.md`
pub fn backup_file_name(title: &str, date: &str) -> String {
    format!("{date}-{}.md", sanitize_title(title))
}

/// `[{category}] {date}-{title}.md`
pub fn wiki_file_name(category: &str, title: &str, date: &str) -> String {
    format!("[{category}] {date}-{}.md", sanitize_title(title))
}

/// Relative link to a backup file as used in the dashboard, spaces as `%20`.
pub fn link_path(backup_dir: &str, category: &str, file_name: &str) -> String {
    format!("{backup_dir}/{category}/{file_name}").replace(' ', "%20")
}

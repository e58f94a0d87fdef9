//! Dashboard rendering: Markdown landing page plus a static HTML viewer.

use std::fs;
use std::path::PathBuf;

use tracing::info;

use crate::archive::CategoryIndex;
use crate::config::ArchiveConfig;
use crate::error::ArchiveError;

/// Entries shown per category before the rest fold into a `<details>` block.
pub const PREVIEW_LIMIT: usize = 5;

pub const NO_DATA_NOTICE: &str =
    "> **NO_DATA_STREAM**: no discussions were archived in this run.";

pub const FRONT_MATTER: &str = "---\nlayout: default\n---\n\n";

pub const README_FILE: &str = "README.md";
pub const INDEX_MD_FILE: &str = "index.md";
pub const INDEX_HTML_FILE: &str = "index.html";
pub const NOJEKYLL_FILE: &str = ".nojekyll";

const VIEWER_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{{TITLE}}</title>
<script src="https://cdn.jsdelivr.net/npm/marked/marked.min.js"></script>
<style>
body { max-width: 960px; margin: 0 auto; padding: 2rem; font-family: system-ui, sans-serif; line-height: 1.6; }
details { margin: 0.5rem 0 1rem; }
</style>
</head>
<body>
<main id="content">Loading {{SOURCE}}...</main>
<script>
fetch("{{SOURCE}}")
  .then(function (response) {
    if (!response.ok) { throw new Error("HTTP " + response.status); }
    return response.text();
  })
  .then(function (markdown) {
    markdown = markdown.replace(/^---\r?\n[\s\S]*?\r?\n---\r?\n+/, "");
    document.getElementById("content").innerHTML = marked.parse(markdown);
  })
  .catch(function (err) {
    document.getElementById("content").textContent = "Failed to load {{SOURCE}}: " + err;
  });
</script>
</body>
</html>
"##;

/// Static header lines identifying the repository.
pub fn render_header(owner: &str, name: &str, tagline: &str) -> String {
    let mut out = format!("# 🌐 {name} / {tagline}\n\n");
    out.push_str(&format!(
        "> **Status**: System Online | **Identity**: {owner}\n\n"
    ));
    out.push_str(&format!(
        "[[ 🧠 Wiki-Cortex ]](https://github.com/{owner}/{name}/wiki)  |  \
         [[ 💬 Input-Stream ]](https://github.com/{owner}/{name}/discussions)\n\n---\n"
    ));
    out
}

/// One category section. `lines` keep their input order.
pub fn render_section(category: &str, lines: &[String]) -> String {
    let mut out = format!(
        "### 📂 SECTION_{} ({})\n",
        category.to_uppercase(),
        lines.len()
    );
    let shown = lines.len().min(PREVIEW_LIMIT);
    out.push_str(&lines[..shown].join("\n"));
    out.push('\n');
    if lines.len() > PREVIEW_LIMIT {
        let rest = &lines[PREVIEW_LIMIT..];
        out.push_str(&format!(
            "\n<details>\n<summary>▶ EXPAND_DATA_STREAM ({})</summary>\n\n{}\n\n</details>\n",
            rest.len(),
            rest.join("\n")
        ));
    }
    out.push('\n');
    out
}

/// Full Markdown dashboard. Categories come out in the index's (lexicographic) order.
pub fn render_dashboard(owner: &str, name: &str, tagline: &str, index: &CategoryIndex) -> String {
    let mut out = render_header(owner, name, tagline);
    if index.is_empty() {
        out.push('\n');
        out.push_str(NO_DATA_NOTICE);
        out.push('\n');
        return out;
    }
    for (category, lines) in index {
        out.push_str(&render_section(category, lines));
    }
    out
}

/// HTML page that fetches `source` at load time and renders it client-side.
pub fn render_viewer_html(title: &str, source: &str) -> String {
    VIEWER_TEMPLATE
        .replace("{{TITLE}}", &escape_html(title))
        .replace("{{SOURCE}}", source)
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Paths of the files [`write_site`] produced.
#[derive(Debug, Clone)]
pub struct SiteFiles {
    pub readme: PathBuf,
    pub index_md: PathBuf,
    pub index_html: PathBuf,
    pub nojekyll: PathBuf,
}

/// Renders the dashboard and writes README.md, index.md, index.html and .nojekyll.
pub fn write_site(config: &ArchiveConfig, index: &CategoryIndex) -> Result<SiteFiles, ArchiveError> {
    let root = &config.output.dir;
    fs::create_dir_all(root).map_err(ArchiveError::io("create", root))?;

    let owner = &config.download.owner;
    let name = &config.download.name;
    let dashboard = render_dashboard(owner, name, &config.site.tagline, index);

    let files = SiteFiles {
        readme: root.join(README_FILE),
        index_md: root.join(INDEX_MD_FILE),
        index_html: root.join(INDEX_HTML_FILE),
        nojekyll: root.join(NOJEKYLL_FILE),
    };

    fs::write(&files.readme, &dashboard).map_err(ArchiveError::io("write", &files.readme))?;

    let index_md = if config.site.front_matter {
        format!("{FRONT_MATTER}{dashboard}")
    } else {
        dashboard
    };
    fs::write(&files.index_md, index_md).map_err(ArchiveError::io("write", &files.index_md))?;

    let title = format!("{name} / {}", config.site.tagline);
    fs::write(&files.index_html, render_viewer_html(&title, INDEX_MD_FILE))
        .map_err(ArchiveError::io("write", &files.index_html))?;

    fs::write(&files.nojekyll, "").map_err(ArchiveError::io("write", &files.nojekyll))?;

    info!(
        root = %root.display(),
        categories = index.len(),
        "Dashboard written"
    );
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(prefix: &str, n: usize) -> Vec<String> {
        (0..n).map(|i| format!("- [{prefix}{i}](x) — `d`")).collect()
    }

    fn count_headings(markdown: &str) -> usize {
        markdown.lines().filter(|l| l.starts_with("### ")).count()
    }

    #[test]
    fn empty_index_renders_only_notice() {
        let out = render_dashboard("o", "r", "T", &CategoryIndex::new());
        assert!(out.contains(NO_DATA_NOTICE));
        assert_eq!(count_headings(&out), 0);
    }

    #[test]
    fn header_links_wiki_and_discussions() {
        let out = render_header("swiftdd", "Synapse", "Thought Protocol");
        assert!(out.starts_with("# 🌐 Synapse / Thought Protocol\n"));
        assert!(out.contains("https://github.com/swiftdd/Synapse/wiki"));
        assert!(out.contains("https://github.com/swiftdd/Synapse/discussions"));
    }

    #[test]
    fn categories_are_sorted_with_counts() {
        let mut index = CategoryIndex::new();
        index.insert("Q&A".into(), lines("q", 2));
        index.insert("Announcements".into(), lines("a", 1));
        index.insert("General".into(), lines("g", 3));

        let out = render_dashboard("o", "r", "T", &index);
        let headings: Vec<&str> = out.lines().filter(|l| l.starts_with("### ")).collect();
        assert_eq!(
            headings,
            vec![
                "### 📂 SECTION_ANNOUNCEMENTS (1)",
                "### 📂 SECTION_GENERAL (3)",
                "### 📂 SECTION_Q&A (2)",
            ]
        );
        assert!(!out.contains(NO_DATA_NOTICE));
    }

    #[test]
    fn exactly_five_lines_has_no_details_block() {
        let out = render_section("Ideas", &lines("i", 5));
        assert!(!out.contains("<details>"));
        assert!(out.contains("- [i4](x)"));
    }

    #[test]
    fn overflow_goes_into_details_block() {
        let entries = lines("i", 8);
        let out = render_section("Ideas", &entries);
        let (visible, folded) = out.split_once("<details>").unwrap();

        for line in &entries[..5] {
            assert!(visible.contains(line.as_str()));
            assert!(!folded.contains(line.as_str()));
        }
        for line in &entries[5..] {
            assert!(folded.contains(line.as_str()));
            assert!(!visible.contains(line.as_str()));
        }
        assert!(folded.contains("<summary>▶ EXPAND_DATA_STREAM (3)</summary>"));
    }

    #[test]
    fn viewer_fetches_markdown_and_escapes_title() {
        let html = render_viewer_html("<b>Synapse</b>", "index.md");
        assert!(html.contains("<title>&lt;b&gt;Synapse&lt;/b&gt;</title>"));
        assert!(html.contains(r#"fetch("index.md")"#));
        assert!(html.contains("marked.parse"));
        assert!(!html.contains("{{"));
    }
}

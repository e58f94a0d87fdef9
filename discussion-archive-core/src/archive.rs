//! Archive writer: one backup file and one wiki staging file per discussion.
//!
//! Both target directories are wiped and recreated through [`ArchiveDirs`] at
//! the start of a run, before the fetch, so every run fully replaces the
//! previous archive.
//! Records are written in fetch order and the per-category link lists keep
//! that order (newest first).

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::config::OutputConfig;
use crate::contract::DiscussionRecord;
use crate::error::ArchiveError;
use crate::sanitize::{backup_file_name, link_path, wiki_file_name};

/// Category name → rendered dashboard lines, categories in lexicographic order.
pub type CategoryIndex = BTreeMap<String, Vec<String>>;

/// A directory that was emptied (or created) at acquisition time.
#[derive(Debug)]
pub struct FreshDir {
    path: PathBuf,
}

impl FreshDir {
    /// Removes `path` with all its contents if present, then recreates it empty.
    pub fn acquire(path: impl Into<PathBuf>) -> Result<Self, ArchiveError> {
        let path = path.into();
        if path.exists() {
            fs::remove_dir_all(&path).map_err(ArchiveError::io("remove", &path))?;
            debug!(path = %path.display(), "Removed previous directory contents");
        }
        fs::create_dir_all(&path).map_err(ArchiveError::io("create", &path))?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// What [`write_archive`] produced.
#[derive(Debug, Default)]
pub struct WrittenArchive {
    pub index: CategoryIndex,
    pub files_written: usize,
    /// Backup paths written more than once in this run (later record wins).
    pub collisions: Vec<PathBuf>,
}

pub fn backup_contents(record: &DiscussionRecord) -> String {
    format!(
        "# {}\n\n> System-Link: {}\n\n{}",
        record.title,
        record.url,
        record.body_or_empty()
    )
}

pub fn wiki_contents(record: &DiscussionRecord) -> String {
    format!(
        "# {}\n\n> **Nodes**: {} | **Timestamp**: {}\n\n---\n\n{}",
        record.title,
        record.category_name(),
        record.date(),
        record.body_or_empty()
    )
}

/// Dashboard line for one record.
pub fn summary_line(record: &DiscussionRecord, link: &str) -> String {
    format!("- [{}]({}) — `{}`", record.title, link, record.date())
}

/// The backup tree and the wiki staging directory, both freshly emptied.
#[derive(Debug)]
pub struct ArchiveDirs {
    pub backup: FreshDir,
    pub wiki: FreshDir,
}

impl ArchiveDirs {
    /// Discards whatever a previous run left in both trees.
    pub fn acquire(output: &OutputConfig) -> Result<Self, ArchiveError> {
        let backup = FreshDir::acquire(output.backup_root())?;
        let wiki = FreshDir::acquire(output.wiki_root())?;
        info!(
            backup = %backup.path().display(),
            wiki = %wiki.path().display(),
            "Reset archive directories"
        );
        Ok(Self { backup, wiki })
    }
}

/// Writes every record into the freshly acquired trees.
pub fn write_archive(
    output: &OutputConfig,
    dirs: &ArchiveDirs,
    records: &[DiscussionRecord],
) -> Result<WrittenArchive, ArchiveError> {
    let backup = &dirs.backup;
    let wiki = &dirs.wiki;
    info!(records = records.len(), "Writing archive");

    let mut written = WrittenArchive::default();
    let mut seen: HashSet<PathBuf> = HashSet::new();

    for record in records {
        let category = record.category_name();
        let date = record.date();

        let category_dir = backup.path().join(category);
        if !category_dir.exists() {
            fs::create_dir_all(&category_dir).map_err(ArchiveError::io("create", &category_dir))?;
        }

        let file_name = backup_file_name(&record.title, date);
        let backup_path = category_dir.join(&file_name);
        if !seen.insert(backup_path.clone()) {
            warn!(
                path = %backup_path.display(),
                title = %record.title,
                "File name collision, overwriting earlier discussion"
            );
            written.collisions.push(backup_path.clone());
        }
        fs::write(&backup_path, backup_contents(record))
            .map_err(ArchiveError::io("write", &backup_path))?;

        let wiki_path = wiki.path().join(wiki_file_name(category, &record.title, date));
        fs::write(&wiki_path, wiki_contents(record)).map_err(ArchiveError::io("write", &wiki_path))?;
        written.files_written += 2;

        let link = link_path(&output.backup_dir, category, &file_name);
        written
            .index
            .entry(category.to_string())
            .or_default()
            .push(summary_line(record, &link));
        debug!(%category, file = %file_name, "Archived discussion");
    }

    info!(
        categories = written.index.len(),
        files = written.files_written,
        collisions = written.collisions.len(),
        "Archive written"
    );
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::Category;

    fn record(title: &str, body: Option<&str>) -> DiscussionRecord {
        DiscussionRecord {
            title: title.into(),
            url: "https://github.com/o/r/discussions/7".into(),
            body: body.map(str::to_string),
            created_at: "2024-03-01T10:00:00Z".into(),
            category: Category {
                name: "Ideas".into(),
            },
        }
    }

    #[test]
    fn backup_contents_layout() {
        assert_eq!(
            backup_contents(&record("Hello", Some("body text"))),
            "# Hello\n\n> System-Link: https://github.com/o/r/discussions/7\n\nbody text"
        );
    }

    #[test]
    fn wiki_contents_layout_with_null_body() {
        assert_eq!(
            wiki_contents(&record("Hello", None)),
            "# Hello\n\n> **Nodes**: Ideas | **Timestamp**: 2024-03-01\n\n---\n\n"
        );
    }

    #[test]
    fn summary_line_layout() {
        assert_eq!(
            summary_line(&record("A/B: Test", None), "BACKUP/Ideas/2024-03-01-AB-Test.md"),
            "- [A/B: Test](BACKUP/Ideas/2024-03-01-AB-Test.md) — `2024-03-01`"
        );
    }

    #[test]
    fn fresh_dir_discards_previous_contents() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("BACKUP");
        fs::create_dir_all(dir.join("Old")).unwrap();
        fs::write(dir.join("Old/stale.md"), "stale").unwrap();

        let fresh = FreshDir::acquire(&dir).unwrap();
        assert_eq!(fresh.path(), dir.as_path());
        assert_eq!(fs::read_dir(&dir).unwrap().count(), 0);
    }
}

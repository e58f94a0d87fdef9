use std::fmt;
use std::path::PathBuf;

use tracing::{debug, info};

use crate::download::DownloadConfig;

/// Repository read when neither the config file nor the command line names one.
pub const DEFAULT_OWNER: &str = "swiftdd";
pub const DEFAULT_NAME: &str = "Synapse";

pub const DEFAULT_BACKUP_DIR: &str = "BACKUP";
pub const DEFAULT_WIKI_DIR: &str = "wiki_temp";
pub const DEFAULT_TAGLINE: &str = "Thought Protocol";

/// Everything one archive run needs. Built by the CLI, passed into the pipeline.
#[derive(Debug, Clone)]
pub struct ArchiveConfig {
    pub download: DownloadConfig,
    pub output: OutputConfig,
    pub site: SiteConfig,
}

impl ArchiveConfig {
    pub fn trace_loaded(&self) {
        info!(
            owner = %self.download.owner,
            name = %self.download.name,
            endpoint = %self.download.endpoint,
            token_set = self.download.token.is_some(),
            output_dir = %self.output.dir.display(),
            "Loaded ArchiveConfig"
        );
        debug!(?self, "ArchiveConfig loaded (full debug)");
    }
}

/// Where the archive lands. Directory names are relative to `dir`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    pub dir: PathBuf,
    pub backup_dir: String,
    pub wiki_dir: String,
}

impl OutputConfig {
    pub fn backup_root(&self) -> PathBuf {
        self.dir.join(&self.backup_dir)
    }

    pub fn wiki_root(&self) -> PathBuf {
        self.dir.join(&self.wiki_dir)
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            backup_dir: DEFAULT_BACKUP_DIR.to_string(),
            wiki_dir: DEFAULT_WIKI_DIR.to_string(),
        }
    }
}

/// Dashboard presentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteConfig {
    pub tagline: String,
    /// Prefix `index.md` with a `layout: default` front matter block.
    pub front_matter: bool,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            tagline: DEFAULT_TAGLINE.to_string(),
            front_matter: true,
        }
    }
}

/// Bearer credential. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct Token(String);

impl Token {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Token(***)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_debug_is_redacted() {
        let token = Token::new("ghp_secret");
        assert_eq!(format!("{token:?}"), "Token(***)");
        assert_eq!(token.expose(), "ghp_secret");
    }

    #[test]
    fn output_roots_join_dir() {
        let output = OutputConfig {
            dir: PathBuf::from("/srv/site"),
            ..OutputConfig::default()
        };
        assert_eq!(output.backup_root(), PathBuf::from("/srv/site/BACKUP"));
        assert_eq!(output.wiki_root(), PathBuf::from("/srv/site/wiki_temp"));
    }
}

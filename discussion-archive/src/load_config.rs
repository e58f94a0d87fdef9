/// `load_config` module: Loads a static YAML config, applies CLI overrides and
/// injects the API token from the environment, producing the core `ArchiveConfig`.
///
/// This is the only place where user-supplied YAML is parsed. Every key is optional
/// and unknown keys are rejected at every level. Owner and repository name fall
/// back to [`DEFAULT_OWNER`]/[`DEFAULT_NAME`] when neither the file nor the
/// command line sets them.
///
/// # Secrets
/// The bearer token is never read from the file. It comes from the first
/// non-empty variable in [`TOKEN_ENV_VARS`].
///
/// # Errors
/// All errors use `anyhow::Error` and surface at the CLI boundary.
use anyhow::Result;
use discussion_archive_core::config::{
    ArchiveConfig, OutputConfig, SiteConfig, Token, DEFAULT_BACKUP_DIR, DEFAULT_NAME,
    DEFAULT_OWNER, DEFAULT_TAGLINE, DEFAULT_WIKI_DIR,
};
use discussion_archive_core::download::{DownloadConfig, DEFAULT_ENDPOINT};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// Checked in order, first non-empty value wins.
pub const TOKEN_ENV_VARS: [&str; 2] = ["G_T", "GITHUB_TOKEN"];

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CliConfig {
    #[serde(default)]
    pub repository: RepositorySection,
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub output: OutputSection,
    #[serde(default)]
    pub site: SiteSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RepositorySection {
    pub owner: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputSection {
    pub dir: Option<PathBuf>,
    pub backup_dir: Option<String>,
    pub wiki_dir: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SiteSection {
    pub tagline: Option<String>,
    pub front_matter: Option<bool>,
}

/// Command-line values that take precedence over the file.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub owner: Option<String>,
    pub name: Option<String>,
    pub endpoint: Option<String>,
    pub output_dir: Option<PathBuf>,
}

/// Loads a static YAML config file (no secrets).
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<CliConfig> {
    let path_ref = path.as_ref();
    info!(config_path = ?path_ref, "Loading configuration from file");

    let config_content = match fs::read_to_string(path_ref) {
        Ok(content) => {
            info!(config_path = ?path_ref, "Config file read successfully");
            content
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to read config file");
            return Err(anyhow::anyhow!(
                "Failed to read config file {:?}: {}",
                path_ref,
                e
            ));
        }
    };

    // An empty file is a valid, all-defaults config.
    if config_content.trim().is_empty() {
        return Ok(CliConfig::default());
    }

    match serde_yaml::from_str(&config_content) {
        Ok(conf) => {
            info!(config_path = ?path_ref, "Parsed config YAML successfully");
            Ok(conf)
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to parse config YAML");
            Err(anyhow::anyhow!("Failed to parse config YAML: {e}"))
        }
    }
}

/// First non-empty token among [`TOKEN_ENV_VARS`].
pub fn token_from_env() -> Option<Token> {
    for var in TOKEN_ENV_VARS {
        match std::env::var(var) {
            Ok(value) if !value.trim().is_empty() => {
                info!(var, "API token found in env");
                return Some(Token::new(value.trim()));
            }
            _ => continue,
        }
    }
    warn!(
        vars = ?TOKEN_ENV_VARS,
        "No API token in environment, requests will be unauthenticated"
    );
    None
}

impl CliConfig {
    /// Merges overrides and the token into the core config.
    pub fn into_archive_config(self, overrides: Overrides, token: Option<Token>) -> ArchiveConfig {
        let owner = overrides
            .owner
            .or(self.repository.owner)
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_OWNER.to_string());
        let name = overrides
            .name
            .or(self.repository.name)
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_NAME.to_string());

        let download = DownloadConfig {
            endpoint: overrides
                .endpoint
                .or(self.endpoint)
                .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            owner,
            name,
            token,
        };

        let output = OutputConfig {
            dir: overrides
                .output_dir
                .or(self.output.dir)
                .unwrap_or_else(|| PathBuf::from(".")),
            backup_dir: self
                .output
                .backup_dir
                .unwrap_or_else(|| DEFAULT_BACKUP_DIR.to_string()),
            wiki_dir: self
                .output
                .wiki_dir
                .unwrap_or_else(|| DEFAULT_WIKI_DIR.to_string()),
        };

        let site = SiteConfig {
            tagline: self
                .site
                .tagline
                .unwrap_or_else(|| DEFAULT_TAGLINE.to_string()),
            front_matter: self.site.front_matter.unwrap_or(true),
        };

        ArchiveConfig {
            download,
            output,
            site,
        }
    }
}

/// File (optional) + overrides + environment → `ArchiveConfig`.
pub fn resolve_config(path: Option<&Path>, overrides: Overrides) -> Result<ArchiveConfig> {
    let file_config = match path {
        Some(path) => load_config(path)?,
        None => CliConfig::default(),
    };
    let config = file_config.into_archive_config(overrides, token_from_env());
    config.trace_loaded();
    Ok(config)
}

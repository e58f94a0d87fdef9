use std::path::{Path, PathBuf};

use thiserror::Error;

/// Fatal failures of the archive pipeline.
///
/// Fetch problems are not errors: they are reported through
/// [`crate::contract::FetchOutcome`]. Only the file system can abort a run.
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("failed to {action} {}: {source}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ArchiveError {
    /// Builds a `map_err` adapter that tags an io error with what was being done and where.
    pub fn io<'a>(action: &'static str, path: &'a Path) -> impl FnOnce(std::io::Error) -> Self + 'a {
        move |source| ArchiveError::Io {
            action,
            path: path.to_path_buf(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_display_names_action_and_path() {
        let err = ArchiveError::io("write", Path::new("BACKUP/Ideas/x.md"))(
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(err.to_string(), "failed to write BACKUP/Ideas/x.md: denied");
    }
}

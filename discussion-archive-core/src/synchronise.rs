//! High-level pipeline: fetch → write archive → render dashboard.
//!
//! # Major Types
//! - [`SynchroniseReport`]: what one run fetched and wrote, for the CLI summary and tests.
//!
//! # Error Handling
//! Fetch problems are never errors here. A failed or partial fetch is logged,
//! recorded in the report, and the run continues with whatever records exist
//! (possibly none, which renders the no-data dashboard). Only file-system
//! failures abort the run with an [`ArchiveError`].

use tracing::{error, info, warn};

use crate::archive::{write_archive, ArchiveDirs};
use crate::config::ArchiveConfig;
use crate::contract::{DiscussionSource, FetchOutcome, FetchStatus};
use crate::error::ArchiveError;
use crate::render::write_site;

#[derive(Debug)]
pub struct SynchroniseReport {
    pub fetch_status: FetchStatus,
    pub records_processed: usize,
    /// In lexicographic order.
    pub categories: Vec<CategoryReport>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryReport {
    pub name: String,
    pub count: usize,
}

pub async fn synchronise<S>(
    config: &ArchiveConfig,
    source: &S,
) -> Result<SynchroniseReport, ArchiveError>
where
    S: DiscussionSource + ?Sized,
{
    info!(
        owner = %config.download.owner,
        name = %config.download.name,
        "[SYNC] Starting archive run"
    );

    // Step 0: clear both trees before touching the network.
    let dirs = ArchiveDirs::acquire(&config.output)?;

    // Step 1: fetch
    let outcome = source.fetch_all().await;
    match &outcome {
        FetchOutcome::Complete(records) => {
            info!(records = records.len(), "[SYNC] Fetch complete");
        }
        FetchOutcome::Partial { records, errors } => {
            warn!(
                records = records.len(),
                ?errors,
                "[SYNC] Fetch ended early on an API error, archiving partial data"
            );
        }
        FetchOutcome::Failed { reason } => {
            error!(%reason, "[SYNC][ERROR] Fetch failed, archiving nothing");
        }
    }
    let records = outcome.records();
    let mut warnings = outcome.warnings();

    // Step 2: archive
    let written = write_archive(&config.output, &dirs, records)?;
    warnings.extend(written.collisions.iter().map(|path| {
        format!(
            "file name collision, earlier discussion overwritten: {}",
            path.display()
        )
    }));

    // Step 3: dashboard
    write_site(config, &written.index)?;

    let categories = written
        .index
        .iter()
        .map(|(name, lines)| CategoryReport {
            name: name.clone(),
            count: lines.len(),
        })
        .collect();

    info!(
        status = ?outcome.status(),
        records = records.len(),
        warnings = warnings.len(),
        "[SYNC] Archive run finished"
    );

    Ok(SynchroniseReport {
        fetch_status: outcome.status(),
        records_processed: records.len(),
        categories,
        warnings,
    })
}

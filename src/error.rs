use crate::datasource::{ChainError, SourceError};
use crate::engine::{EnrichError, ReportError};
use thiserror::Error;

/// Top-level failure of a snapshot run.
///
/// Any failure in data acquisition or enrichment aborts the whole run: the
/// output is a single atomic snapshot, and a partially-computed one is not
/// meaningful. The caller decides whether to re-invoke the pipeline.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Chain(#[from] ChainError),
    #[error(transparent)]
    Enrich(#[from] EnrichError),
    #[error(transparent)]
    Report(#[from] ReportError),
}

//! Media Pipeline Errors

use thiserror::Error;

/// Failures from the thumbnail and waveform derivation pipelines.
///
/// The editing core itself never surfaces errors; these belong to the media
/// side, where sources can be missing or undecodable and in-flight work can
/// be cancelled.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MediaError {
    /// The source could not be fetched or opened.
    #[error("media source unavailable: {0}")]
    SourceUnavailable(String),

    /// The source was fetched but could not be decoded.
    #[error("decode failed: {0}")]
    Decode(String),

    /// The request was cancelled by a newer one or by teardown.
    #[error("cancelled")]
    Cancelled,
}

//! Traits describing the facility-source interface and its error type.

use async_trait::async_trait;
use reqwest::Error as ReqwestError;

use crate::model::{FacilityRecord, SourceMeta};

#[derive(thiserror::Error, Debug)]
/// Errors that can occur while extracting from an upstream site.
pub enum SourceError {
    /// Network layer failed: connection error, timeout, or non-2xx status.
    #[error("network error: {0}")]
    Network(#[from] ReqwestError),
    /// Internal extraction error.
    #[error("internal error: {0}")]
    Internal(String),
}

#[async_trait]
/// Trait for site-specific facility extraction backends.
///
/// One call to [`FacilitySource::fetch_all`] performs a full extraction
/// cycle. Implementations must degrade gracefully: a field heuristic that
/// fails on a single record leaves that field absent rather than aborting
/// the cycle. No retry policy lives at this layer.
pub trait FacilitySource: Send + Sync {
    /// Metadata describing the municipal source handled by this backend.
    fn source(&self) -> &SourceMeta;

    /// Extract all facility records currently published by the source.
    ///
    /// # Errors
    ///
    /// Returns a [`SourceError`] when the listing page cannot be fetched.
    async fn fetch_all(&self) -> Result<Vec<FacilityRecord>, SourceError>;
}

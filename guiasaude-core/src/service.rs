//! High-level service facade exposed to the routing layer.

use std::sync::Arc;

use crate::cache::{ServiceUnavailable, SnapshotCache};
use crate::model::FacilityRecord;

/// Public entry point for filterable facility lookups.
pub struct DirectoryService {
    cache: Arc<SnapshotCache>,
}

impl DirectoryService {
    /// Create a new service bound to the provided snapshot cache.
    #[must_use]
    pub fn new(cache: Arc<SnapshotCache>) -> Self {
        Self { cache }
    }

    /// List facilities, optionally filtered by category slug and free text.
    ///
    /// `category` matches the category slug case-insensitively; a slug
    /// naming no known category matches nothing. `query` is a
    /// case-insensitive substring match over name, neighborhood, and
    /// address. Both filters combine with logical AND.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceUnavailable`] when the cache runs in strict mode
    /// and a needed refresh fails.
    pub async fn list_facilities(
        &self,
        category: Option<&str>,
        query: Option<&str>,
    ) -> Result<Vec<FacilityRecord>, ServiceUnavailable> {
        let records = self.cache.records().await?;

        let category = category.map(str::trim).filter(|slug| !slug.is_empty());
        let needle = query
            .map(|text| text.trim().to_lowercase())
            .filter(|text| !text.is_empty());

        Ok(records
            .iter()
            .filter(|facility| {
                category.is_none_or(|slug| facility.category.as_str().eq_ignore_ascii_case(slug))
            })
            .filter(|facility| {
                needle
                    .as_deref()
                    .is_none_or(|needle| haystack(facility).contains(needle))
            })
            .cloned()
            .collect())
    }
}

/// Searchable text of one record: name, neighborhood, and address.
fn haystack(facility: &FacilityRecord) -> String {
    let mut text = facility.name.clone();
    for part in [facility.neighborhood.as_deref(), facility.address.as_deref()]
        .into_iter()
        .flatten()
    {
        text.push(' ');
        text.push_str(part);
    }
    text.to_lowercase()
}

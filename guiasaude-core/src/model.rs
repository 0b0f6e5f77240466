//! Domain data structures for facilities and extraction snapshots.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Routing classification of a health facility.
pub enum Category {
    /// Primary care (Unidade Básica de Saúde).
    #[default]
    Ubs,
    /// Urgent care (Unidade de Pronto Atendimento).
    Upa,
    /// General or specialized hospital.
    Hospital,
    /// Mental-health center (Centro de Atenção Psicossocial).
    Caps,
}

impl Category {
    /// The lowercase slug used on the wire and in query filters.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Category::Ubs => "ubs",
            Category::Upa => "upa",
            Category::Hospital => "hospital",
            Category::Caps => "caps",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// One extracted health unit.
///
/// Records are created fresh on every extraction cycle and never mutated
/// afterwards; a whole snapshot is replaced at once.
pub struct FacilityRecord {
    /// Source-assigned identifier, unique within a snapshot.
    pub id: u32,
    /// Facility name as published by the municipality.
    pub name: String,
    /// Routing classification inferred from the page text.
    pub category: Category,
    /// Raw address block, when the page provided one.
    pub address: Option<String>,
    /// Neighborhood derived from the address, when resolvable.
    pub neighborhood: Option<String>,
    /// Raw operating-hours text.
    pub hours: Option<String>,
    /// Contact phone (currently never published upstream).
    pub phone: Option<String>,
    /// Contact e-mail.
    pub email: Option<String>,
    /// Detail-page URL for provenance, derivable from `id`.
    pub source_url: String,
}

#[derive(Debug, Clone)]
/// One immutable, timestamped set of extracted facility records.
pub struct Snapshot {
    /// Records captured by the extraction cycle, shared with readers.
    pub records: Arc<[FacilityRecord]>,
    /// Completion time of the refresh that produced this snapshot.
    pub captured_at: DateTime<Utc>,
}

impl Snapshot {
    /// Wrap freshly extracted records, stamped with the current time.
    #[must_use]
    pub fn new(records: Vec<FacilityRecord>) -> Self {
        Self {
            records: records.into(),
            captured_at: Utc::now(),
        }
    }

    /// Age of this snapshot relative to now.
    #[must_use]
    pub fn age(&self) -> chrono::TimeDelta {
        Utc::now().signed_duration_since(self.captured_at)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Metadata describing a municipal source site.
pub struct SourceMeta {
    /// Unique slug identifying the source.
    pub id: String,
    /// Human-friendly display name.
    pub name: String,
}

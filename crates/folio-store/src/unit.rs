//! Write units and the stored shape of a volume.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use folio_types::{SequenceKey, VolumeId};
use serde::{Deserialize, Serialize};

/// Value recorded as the structural metadata format.
pub const STRUCTURAL_METADATA_TYPE: &str = "METS";

/// One stored page, keyed within its volume by `sequence`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRow {
    pub sequence: SequenceKey,
    pub byte_count: u64,
    pub character_count: u64,
    pub contents: String,
    pub page_label: Option<String>,
}

/// Volume-level values written alongside the page rows.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeAggregates {
    pub byte_count: u64,
    pub character_count: u64,
    /// Raw structural metadata document.
    pub structural_metadata: String,
    pub structural_metadata_type: String,
    pub last_modified: DateTime<Utc>,
    pub checksum_validated: DateTime<Utc>,
}

impl VolumeAggregates {
    /// Aggregates stamped with `at` for both timestamps.
    pub fn new(byte_count: u64, character_count: u64, structural_metadata: String, at: DateTime<Utc>) -> Self {
        Self {
            byte_count,
            character_count,
            structural_metadata,
            structural_metadata_type: STRUCTURAL_METADATA_TYPE.to_string(),
            last_modified: at,
            checksum_validated: at,
        }
    }
}

/// Everything one ingestion attempt writes for a volume, applied atomically.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteUnit {
    pub volume_id: VolumeId,
    pub pages: Vec<PageRow>,
    pub aggregates: VolumeAggregates,
}

impl WriteUnit {
    pub fn new(volume_id: VolumeId, pages: Vec<PageRow>, aggregates: VolumeAggregates) -> Self {
        Self {
            volume_id,
            pages,
            aggregates,
        }
    }

    /// Number of rows written: one per page plus the aggregates row.
    pub fn row_count(&self) -> usize {
        self.pages.len() + 1
    }
}

/// A volume as held by a store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredVolume {
    pub volume_id: VolumeId,
    pub aggregates: Option<VolumeAggregates>,
    pub pages: BTreeMap<SequenceKey, PageRow>,
}

impl StoredVolume {
    pub fn new(volume_id: VolumeId) -> Self {
        Self {
            volume_id,
            aggregates: None,
            pages: BTreeMap::new(),
        }
    }

    /// Upsert the unit's rows. Rows not named by the unit are kept.
    pub fn apply(&mut self, unit: &WriteUnit) {
        for row in &unit.pages {
            self.pages.insert(row.sequence.clone(), row.clone());
        }
        self.aggregates = Some(unit.aggregates.clone());
    }

    pub fn sequence_keys(&self) -> BTreeSet<SequenceKey> {
        self.pages.keys().cloned().collect()
    }
}

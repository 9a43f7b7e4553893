//! In-memory structural record model of one volume.
//!
//! A [`VolumeRecord`] is created fresh for each processing attempt, filled
//! by the METS parser, completed by the archive validator, and dropped when
//! the attempt ends. It is never shared between volumes.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::identity::VolumeId;
use crate::sequence::SequenceKey;

/// One page of a volume.
///
/// Declared fields come from the structural metadata; `sequence` and
/// `character_count` are filled in once the page content has been measured.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRecord {
    /// Identifier of the file descriptor in the structural metadata.
    pub file_id: String,
    /// Physical filename; the join key against archive entries.
    pub filename: String,
    /// Declared checksum, compared case-sensitively.
    pub checksum: String,
    /// Name of the algorithm that produced `checksum` (e.g. `MD5`).
    pub checksum_type: String,
    /// Declared size, overwritten by the measured size on mismatch.
    pub byte_count: u64,
    /// 1-based physical position in the volume.
    pub order: u32,
    /// Human-readable page number label.
    pub label: Option<String>,
    /// Free-text feature tags, in declaration order.
    pub features: Vec<String>,
    pub sequence: Option<SequenceKey>,
    pub character_count: Option<u64>,
}

impl PageRecord {
    /// A page known only by its file identifier.
    pub fn new(file_id: impl Into<String>) -> Self {
        Self {
            file_id: file_id.into(),
            ..Default::default()
        }
    }

    pub fn add_feature(&mut self, feature: impl Into<String>) {
        self.features.push(feature.into());
    }
}

/// A volume and its pages, addressable by filename and by file identifier.
///
/// Pages live in a single arena; both indices point into it, so a page
/// reached through either index is the same instance. Inserting a page whose
/// filename or identifier is already indexed re-points that key to the new
/// page (last write wins).
#[derive(Clone, Debug)]
pub struct VolumeRecord {
    volume_id: VolumeId,
    raw_document: String,
    page_count: usize,
    pages: Vec<PageRecord>,
    by_filename: HashMap<String, usize>,
    by_id: HashMap<String, usize>,
}

impl VolumeRecord {
    pub fn new(volume_id: VolumeId) -> Self {
        Self {
            volume_id,
            raw_document: String::new(),
            page_count: 0,
            pages: Vec::new(),
            by_filename: HashMap::new(),
            by_id: HashMap::new(),
        }
    }

    pub fn volume_id(&self) -> &VolumeId {
        &self.volume_id
    }

    /// The source structural-metadata document, kept for archival.
    pub fn raw_document(&self) -> &str {
        &self.raw_document
    }

    pub fn set_raw_document(&mut self, document: String) {
        self.raw_document = document;
    }

    /// Page count as of the last [`Self::recompute_page_count`].
    pub fn page_count(&self) -> usize {
        self.page_count
    }

    /// Insert a page into both indices at once.
    pub fn add_page(&mut self, page: PageRecord) {
        let slot = self.pages.len();
        self.by_filename.insert(page.filename.clone(), slot);
        self.by_id.insert(page.file_id.clone(), slot);
        self.pages.push(page);
    }

    pub fn page_by_filename(&self, filename: &str) -> Option<&PageRecord> {
        self.by_filename.get(filename).map(|&slot| &self.pages[slot])
    }

    pub fn page_by_filename_mut(&mut self, filename: &str) -> Option<&mut PageRecord> {
        let slot = *self.by_filename.get(filename)?;
        self.pages.get_mut(slot)
    }

    pub fn page_by_id(&self, file_id: &str) -> Option<&PageRecord> {
        self.by_id.get(file_id).map(|&slot| &self.pages[slot])
    }

    pub fn page_by_id_mut(&mut self, file_id: &str) -> Option<&mut PageRecord> {
        let slot = *self.by_id.get(file_id)?;
        self.pages.get_mut(slot)
    }

    pub fn contains_id(&self, file_id: &str) -> bool {
        self.by_id.contains_key(file_id)
    }

    /// All known page filenames.
    pub fn filenames(&self) -> BTreeSet<&str> {
        self.by_filename.keys().map(String::as_str).collect()
    }

    /// Pages reachable through the filename index, in physical order.
    pub fn pages(&self) -> Vec<&PageRecord> {
        let mut slots: Vec<usize> = self.by_filename.values().copied().collect();
        slots.sort_unstable();
        slots.dedup();
        let mut pages: Vec<&PageRecord> = slots.into_iter().map(|s| &self.pages[s]).collect();
        pages.sort_by_key(|p| p.order);
        pages
    }

    /// Set the page count to the larger of the two index sizes.
    ///
    /// The indices can disagree only after malformed input re-used a
    /// filename or identifier; the larger count is reported in that case.
    pub fn recompute_page_count(&mut self) {
        self.page_count = self.by_filename.len().max(self.by_id.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(file_id: &str, filename: &str, order: u32) -> PageRecord {
        PageRecord {
            file_id: file_id.into(),
            filename: filename.into(),
            order,
            ..Default::default()
        }
    }

    fn volume() -> VolumeRecord {
        VolumeRecord::new(VolumeId::parse("mdp.001").unwrap())
    }

    #[test]
    fn add_page_indexes_both_keys() {
        let mut vol = volume();
        vol.add_page(page("TXT1", "p1.txt", 1));
        assert_eq!(vol.page_by_filename("p1.txt").unwrap().file_id, "TXT1");
        assert_eq!(vol.page_by_id("TXT1").unwrap().filename, "p1.txt");
        assert!(vol.page_by_filename("p2.txt").is_none());
        assert!(vol.page_by_id("TXT2").is_none());
    }

    #[test]
    fn both_indices_share_one_instance() {
        let mut vol = volume();
        vol.add_page(page("TXT1", "p1.txt", 0));
        vol.page_by_id_mut("TXT1").unwrap().order = 9;
        assert_eq!(vol.page_by_filename("p1.txt").unwrap().order, 9);

        vol.page_by_filename_mut("p1.txt").unwrap().byte_count = 42;
        assert_eq!(vol.page_by_id("TXT1").unwrap().byte_count, 42);
    }

    #[test]
    fn last_write_wins_per_key() {
        let mut vol = volume();
        vol.add_page(page("TXT1", "p1.txt", 1));
        vol.add_page(page("TXT2", "p1.txt", 2));
        assert_eq!(vol.page_by_filename("p1.txt").unwrap().file_id, "TXT2");
        // The old identifier still resolves to the first page.
        assert_eq!(vol.page_by_id("TXT1").unwrap().order, 1);

        vol.recompute_page_count();
        assert_eq!(vol.page_count(), 2);
        assert_eq!(vol.filenames().len(), 1);
    }

    #[test]
    fn filenames_are_a_set() {
        let mut vol = volume();
        vol.add_page(page("TXT2", "p2.txt", 2));
        vol.add_page(page("TXT1", "p1.txt", 1));
        let names: Vec<&str> = vol.filenames().into_iter().collect();
        assert_eq!(names, vec!["p1.txt", "p2.txt"]);
        assert!(vol.contains_id("TXT2"));
    }

    #[test]
    fn pages_are_in_physical_order() {
        let mut vol = volume();
        vol.add_page(page("TXT3", "p3.txt", 3));
        vol.add_page(page("TXT1", "p1.txt", 1));
        vol.add_page(page("TXT2", "p2.txt", 2));
        let orders: Vec<u32> = vol.pages().iter().map(|p| p.order).collect();
        assert_eq!(orders, vec![1, 2, 3]);
    }

    #[test]
    fn page_count_starts_at_zero() {
        let mut vol = volume();
        assert_eq!(vol.page_count(), 0);
        vol.add_page(page("TXT1", "p1.txt", 1));
        assert_eq!(vol.page_count(), 0);
        vol.recompute_page_count();
        assert_eq!(vol.page_count(), 1);
    }

    #[test]
    fn raw_document_is_kept() {
        let mut vol = volume();
        vol.set_raw_document("<mets/>".into());
        assert_eq!(vol.raw_document(), "<mets/>");
    }
}

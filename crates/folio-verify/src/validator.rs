use std::collections::BTreeSet;

use folio_types::{SequenceKey, VolumeId, VolumeRecord};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::archive::ArchiveReader;
use crate::checksum::ChecksumAlgorithm;
use crate::error::{VerifyError, VerifyResult};

/// Validation settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorOptions {
    /// Compare declared checksums against page content.
    pub verify_checksums: bool,
}

impl Default for ValidatorOptions {
    fn default() -> Self {
        Self {
            verify_checksums: true,
        }
    }
}

/// A page whose content has been matched, verified, and measured.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidatedPage {
    pub filename: String,
    pub sequence: SequenceKey,
    pub byte_count: u64,
    /// Length in UTF-16 code units; see [`text_length`].
    pub character_count: u64,
    /// Page text, decoded as UTF-8.
    pub contents: String,
    pub label: Option<String>,
}

/// Character length of page text, counted in UTF-16 code units so that a
/// supplementary-plane character counts as two. Stored counts from earlier
/// ingests were measured this way.
pub fn text_length(text: &str) -> u64 {
    text.encode_utf16().count() as u64
}

/// Outcome of a successful validation: every declared page was present,
/// with totals across all pages.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidatedVolume {
    pub volume_id: VolumeId,
    /// Sorted by sequence key.
    pub pages: Vec<ValidatedPage>,
    pub byte_count: u64,
    pub character_count: u64,
}

impl ValidatedVolume {
    pub fn sequence_keys(&self) -> BTreeSet<SequenceKey> {
        self.pages.iter().map(|p| p.sequence.clone()).collect()
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

/// Matches archive entries against a volume's page records.
#[derive(Clone, Debug, Default)]
pub struct ArchiveValidator {
    options: ValidatorOptions,
}

impl ArchiveValidator {
    pub fn new(options: ValidatorOptions) -> Self {
        Self { options }
    }

    /// Consume `archive` and validate it against `volume`.
    ///
    /// Matched pages get their sequence key, character count, and measured
    /// byte count written back onto the record. Entries naming no known page
    /// are skipped, but any difference between the set of matched filenames
    /// and the declared set fails the volume.
    pub fn validate<A>(&self, volume: &mut VolumeRecord, archive: &mut A) -> VerifyResult<ValidatedVolume>
    where
        A: ArchiveReader + ?Sized,
    {
        let volume_id = volume.volume_id().clone();
        let mut pages = Vec::new();
        let mut seen = BTreeSet::new();
        let mut unexpected = BTreeSet::new();
        let mut byte_count = 0u64;
        let mut character_count = 0u64;

        while let Some(entry) = archive.next_entry()? {
            let filename = entry.filename();
            if filename.is_empty() {
                continue;
            }
            let filename = filename.to_owned();

            if seen.contains(&filename) {
                warn!(volume = %volume_id, filename = %filename, entry = %entry.name, "duplicate archive entry; skipping");
                continue;
            }
            let Some(page) = volume.page_by_filename_mut(&filename) else {
                warn!(volume = %volume_id, filename = %filename, "archive entry has no page record; skipping");
                unexpected.insert(filename);
                continue;
            };

            if self.options.verify_checksums {
                match ChecksumAlgorithm::from_name(&page.checksum_type) {
                    Some(algorithm) => {
                        let actual = algorithm.hex_digest(&entry.data);
                        if actual != page.checksum {
                            error!(
                                volume = %volume_id,
                                filename = %filename,
                                expected = %page.checksum,
                                actual = %actual,
                                "checksum mismatch"
                            );
                            return Err(VerifyError::ChecksumMismatch {
                                volume: volume_id,
                                filename,
                                expected: page.checksum.clone(),
                                actual,
                            });
                        }
                        debug!(volume = %volume_id, filename = %filename, %algorithm, "checksum verified");
                    }
                    None => {
                        warn!(
                            volume = %volume_id,
                            filename = %filename,
                            algorithm = %page.checksum_type,
                            "unsupported checksum algorithm; not verified"
                        );
                    }
                }
            }

            let measured = entry.data.len() as u64;
            if measured != page.byte_count {
                warn!(
                    volume = %volume_id,
                    filename = %filename,
                    declared = page.byte_count,
                    measured,
                    "size mismatch; using measured size"
                );
                page.byte_count = measured;
            }
            byte_count += measured;

            let sequence = SequenceKey::from_order(page.order);
            page.sequence = Some(sequence.clone());

            let contents = String::from_utf8_lossy(&entry.data).into_owned();
            let chars = text_length(&contents);
            page.character_count = Some(chars);
            character_count += chars;

            pages.push(ValidatedPage {
                filename: filename.clone(),
                sequence,
                byte_count: measured,
                character_count: chars,
                contents,
                label: page.label.clone(),
            });
            seen.insert(filename);
        }

        if seen.is_empty() {
            let consistent_with_metadata = volume.filenames().is_empty();
            error!(volume = %volume_id, consistent_with_metadata, "no archive entry matched a page");
            return Err(VerifyError::EmptyArchive {
                volume: volume_id,
                consistent_with_metadata,
            });
        }

        let missing: BTreeSet<String> = volume
            .filenames()
            .into_iter()
            .filter(|name| !seen.contains(*name))
            .map(str::to_owned)
            .collect();
        if !missing.is_empty() || !unexpected.is_empty() {
            error!(
                volume = %volume_id,
                missing = missing.len(),
                unexpected = unexpected.len(),
                "archive does not match structural metadata"
            );
            return Err(VerifyError::MetadataMismatch {
                volume: volume_id,
                missing,
                unexpected,
            });
        }

        pages.sort_by(|a, b| a.sequence.cmp(&b.sequence));
        info!(
            volume = %volume_id,
            pages = pages.len(),
            bytes = byte_count,
            chars = character_count,
            "archive validated"
        );
        Ok(ValidatedVolume {
            volume_id,
            pages,
            byte_count,
            character_count,
        })
    }
}

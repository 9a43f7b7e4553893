use std::fs::File;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use folio_locate::VolumeLocator;
use folio_mets::{MetsParser, ParserOptions};
use folio_store::{PageRow, VolumeAggregates, WriteUnit};
use folio_types::{VolumeId, VolumeRecord};
use folio_verify::{ArchiveValidator, ValidatedVolume, ValidatorOptions, ZipStreamReader};
use tracing::debug;

use crate::config::IngestConfig;
use crate::error::{IngestError, IngestResult};

/// A volume that has been located, parsed, and validated.
#[derive(Clone, Debug)]
pub struct PreparedVolume {
    pub record: VolumeRecord,
    pub validated: ValidatedVolume,
}

impl PreparedVolume {
    /// The atomic write for this volume, stamped with `at`.
    pub fn write_unit(&self, at: DateTime<Utc>) -> WriteUnit {
        let pages = self
            .validated
            .pages
            .iter()
            .map(|page| PageRow {
                sequence: page.sequence.clone(),
                byte_count: page.byte_count,
                character_count: page.character_count,
                contents: page.contents.clone(),
                page_label: page.label.clone(),
            })
            .collect();
        let aggregates = VolumeAggregates::new(
            self.validated.byte_count,
            self.validated.character_count,
            self.record.raw_document().to_owned(),
            at,
        );
        WriteUnit::new(self.validated.volume_id.clone(), pages, aggregates)
    }
}

/// Runs the blocking front half of the pipeline: locate, parse, validate.
#[derive(Clone)]
pub struct VolumePreparer {
    locator: Arc<dyn VolumeLocator>,
    parser: MetsParser,
    validator: ArchiveValidator,
}

impl VolumePreparer {
    pub fn new(locator: Arc<dyn VolumeLocator>, config: &IngestConfig) -> Self {
        Self {
            locator,
            parser: MetsParser::new(ParserOptions {
                text_file_group: config.text_file_group.clone(),
            }),
            validator: ArchiveValidator::new(ValidatorOptions {
                verify_checksums: config.verify_checksums,
            }),
        }
    }

    /// Prepare one volume on the calling thread.
    pub fn prepare(&self, volume: &VolumeId) -> IngestResult<PreparedVolume> {
        let files = self.locator.locate(volume)?;
        let mut record = self.parser.parse_file(volume.clone(), &files.metadata)?;
        debug!(volume = %volume, pages = record.page_count(), "parsed METS");

        let archive = File::open(&files.archive).map_err(|source| IngestError::Io {
            path: files.archive.clone(),
            source,
        })?;
        let mut reader = ZipStreamReader::new(archive);
        let validated = self.validator.validate(&mut record, &mut reader)?;
        Ok(PreparedVolume { record, validated })
    }

    /// Prepare one volume on the blocking pool.
    pub async fn prepare_blocking(&self, volume: &VolumeId) -> IngestResult<PreparedVolume> {
        let this = self.clone();
        let volume = volume.clone();
        tokio::task::spawn_blocking(move || this.prepare(&volume))
            .await
            .map_err(|err| IngestError::Internal(err.to_string()))?
    }
}

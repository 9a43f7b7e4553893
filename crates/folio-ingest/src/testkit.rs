//! On-disk volume fixtures for pipeline tests.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use folio_locate::{PairtreeLocator, VolumeLocator};
use folio_mets::fixture::{FixturePage, MetsBuilder};
use folio_types::VolumeId;
use folio_verify::ChecksumAlgorithm;
use zip::write::SimpleFileOptions;

/// A volume to be written into a [`Pairtree`].
pub(crate) struct FixtureVolume {
    id: VolumeId,
    /// (filename, order, declared content)
    pages: Vec<(String, u32, String)>,
    /// Archive content that differs from what the METS declares.
    corrupted: Vec<(String, String)>,
    extras: Vec<(String, String)>,
}

impl FixtureVolume {
    pub(crate) fn new(id: &str) -> Self {
        Self {
            id: VolumeId::parse(id).unwrap(),
            pages: Vec::new(),
            corrupted: Vec::new(),
            extras: Vec::new(),
        }
    }

    pub(crate) fn page(mut self, filename: &str, order: u32, content: &str) -> Self {
        self.pages.push((filename.into(), order, content.into()));
        self
    }

    pub(crate) fn corrupt(mut self, filename: &str, content: &str) -> Self {
        self.corrupted.push((filename.into(), content.into()));
        self
    }

    pub(crate) fn extra_entry(mut self, filename: &str, content: &str) -> Self {
        self.extras.push((filename.into(), content.into()));
        self
    }

    fn mets(&self) -> String {
        let mut builder = MetsBuilder::new().image_group(true);
        for (i, (name, order, content)) in self.pages.iter().enumerate() {
            builder = builder.page(
                FixturePage::new(format!("TXT{:08}", i + 1), name.clone(), *order)
                    .size(content.len() as u64)
                    .checksum(ChecksumAlgorithm::Md5.hex_digest(content.as_bytes()), "MD5")
                    .order_label(order.to_string()),
            );
        }
        builder.build()
    }

    fn write_zip(&self, path: &Path, prefix: &str) {
        let mut zip = zip::ZipWriter::new(File::create(path).unwrap());
        let options = SimpleFileOptions::default();
        zip.add_directory(prefix, options).unwrap();
        for (name, _, content) in &self.pages {
            let content = self
                .corrupted
                .iter()
                .find(|(n, _)| n == name)
                .map_or(content, |(_, c)| c);
            zip.start_file(format!("{prefix}/{name}"), options).unwrap();
            zip.write_all(content.as_bytes()).unwrap();
        }
        for (name, content) in &self.extras {
            zip.start_file(format!("{prefix}/{name}"), options).unwrap();
            zip.write_all(content.as_bytes()).unwrap();
        }
        zip.finish().unwrap();
    }
}

/// A temporary pairtree root.
pub(crate) struct Pairtree {
    dir: tempfile::TempDir,
}

impl Pairtree {
    pub(crate) fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    pub(crate) fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Write the volume's METS document and archive; returns its id.
    pub(crate) fn add(&self, volume: &FixtureVolume) -> VolumeId {
        let leaf = self.root().join(PairtreeLocator::relative_dir(&volume.id));
        fs::create_dir_all(&leaf).unwrap();
        fs::write(
            leaf.join(PairtreeLocator::file_name(&volume.id, ".mets.xml")),
            volume.mets(),
        )
        .unwrap();
        let prefix = folio_types::pairtree::clean_id(volume.id.local_part());
        volume.write_zip(&leaf.join(PairtreeLocator::file_name(&volume.id, ".zip")), &prefix);
        volume.id.clone()
    }

    pub(crate) fn locator(&self) -> Arc<dyn VolumeLocator> {
        Arc::new(PairtreeLocator::new(vec![self.root().to_path_buf()]))
    }
}

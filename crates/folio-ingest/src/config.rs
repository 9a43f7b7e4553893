use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level configuration, usually read from `folio.toml`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FolioConfig {
    pub locator: LocatorConfig,
    pub ingest: IngestConfig,
    pub store: StoreConfig,
}

impl FolioConfig {
    /// Load from a TOML file. Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocatorConfig {
    /// Pairtree roots, searched in order.
    pub roots: Vec<PathBuf>,
    pub archive_suffix: String,
    pub metadata_suffix: String,
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self {
            roots: vec![PathBuf::from(".")],
            archive_suffix: ".zip".into(),
            metadata_suffix: ".mets.xml".into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Total write attempts per volume when failures are transient.
    pub max_attempts: u32,
    /// Fixed delay between write attempts.
    pub retry_delay_ms: u64,
    /// Volumes processed concurrently.
    pub workers: usize,
    /// `USE` value of the METS file group holding page text.
    pub text_file_group: String,
    pub verify_checksums: bool,
}

impl IngestConfig {
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            retry_delay_ms: 5000,
            workers: 1,
            text_file_group: "ocr".into(),
            verify_checksums: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub root: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("./folio-store"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = FolioConfig::default();
        assert_eq!(c.ingest.max_attempts, 3);
        assert_eq!(c.ingest.retry_delay(), Duration::from_secs(5));
        assert_eq!(c.ingest.workers, 1);
        assert_eq!(c.ingest.text_file_group, "ocr");
        assert!(c.ingest.verify_checksums);
        assert_eq!(c.locator.archive_suffix, ".zip");
        assert_eq!(c.locator.metadata_suffix, ".mets.xml");
        assert_eq!(c.store.root, PathBuf::from("./folio-store"));
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let c: FolioConfig = toml::from_str(
            r#"
            [locator]
            roots = ["/data/a", "/data/b"]

            [ingest]
            workers = 4
            "#,
        )
        .unwrap();
        assert_eq!(c.locator.roots, vec![PathBuf::from("/data/a"), PathBuf::from("/data/b")]);
        assert_eq!(c.locator.archive_suffix, ".zip");
        assert_eq!(c.ingest.workers, 4);
        assert_eq!(c.ingest.max_attempts, 3);
    }

    #[test]
    fn load_reports_path_on_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("folio.toml");
        std::fs::write(&path, "[ingest]\nworkers = \"many\"\n").unwrap();
        match FolioConfig::load(&path).unwrap_err() {
            ConfigError::Parse { path: p, .. } => assert_eq!(p, path),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(matches!(
            FolioConfig::load(&dir.path().join("missing.toml")),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("folio.toml");
        std::fs::write(&path, "[store]\nroot = \"/var/folio\"\n[ingest]\nretry_delay_ms = 10\n").unwrap();
        let c = FolioConfig::load(&path).unwrap();
        assert_eq!(c.store.root, PathBuf::from("/var/folio"));
        assert_eq!(c.ingest.retry_delay(), Duration::from_millis(10));
    }
}

use std::path::{Path, PathBuf};

use folio_types::pairtree::{clean_id, ppath};
use folio_types::VolumeId;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{LocateError, LocateResult};

const PAIRTREE_ROOT: &str = "pairtree_root";

/// The two input files of one volume.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeFiles {
    pub archive: PathBuf,
    pub metadata: PathBuf,
}

/// Resolves a volume id to its input files.
pub trait VolumeLocator: Send + Sync {
    /// Find both files. A missing file is [`LocateError::NotFound`].
    fn locate(&self, volume: &VolumeId) -> LocateResult<VolumeFiles>;
}

/// Locator over pairtree directories.
///
/// A volume `ns.local` lives at
/// `<root>/ns/pairtree_root/<ppath(clean)>/<clean>/<clean><suffix>`, where
/// `clean` is the pairtree encoding of `local`. Each file is resolved
/// independently: the first root that holds it wins.
#[derive(Clone, Debug)]
pub struct PairtreeLocator {
    roots: Vec<PathBuf>,
    archive_suffix: String,
    metadata_suffix: String,
}

impl PairtreeLocator {
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self {
            roots,
            archive_suffix: ".zip".into(),
            metadata_suffix: ".mets.xml".into(),
        }
    }

    pub fn with_suffixes(mut self, archive: impl Into<String>, metadata: impl Into<String>) -> Self {
        self.archive_suffix = archive.into();
        self.metadata_suffix = metadata.into();
        self
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Leaf directory of a volume, relative to a root.
    pub fn relative_dir(volume: &VolumeId) -> PathBuf {
        let clean = clean_id(volume.local_part());
        let mut path = PathBuf::from(volume.namespace());
        path.push(PAIRTREE_ROOT);
        for segment in ppath(&clean) {
            path.push(segment);
        }
        path.push(&clean);
        path
    }

    /// Filename of a volume's file with the given suffix.
    pub fn file_name(volume: &VolumeId, suffix: &str) -> String {
        format!("{}{suffix}", clean_id(volume.local_part()))
    }

    fn find(&self, volume: &VolumeId, kind: &'static str, suffix: &str) -> LocateResult<PathBuf> {
        let relative = Self::relative_dir(volume).join(Self::file_name(volume, suffix));
        for root in &self.roots {
            let candidate = root.join(&relative);
            if exists(&candidate)? {
                debug!(volume = %volume, kind, path = %candidate.display(), "found volume file");
                return Ok(candidate);
            }
        }
        warn!(volume = %volume, kind, relative = %relative.display(), "volume file not found");
        Err(LocateError::NotFound {
            volume: volume.clone(),
            kind,
            filename: Self::file_name(volume, suffix),
        })
    }
}

impl VolumeLocator for PairtreeLocator {
    fn locate(&self, volume: &VolumeId) -> LocateResult<VolumeFiles> {
        if self.roots.is_empty() {
            return Err(LocateError::NoRoots);
        }
        let archive = self.find(volume, "archive", &self.archive_suffix)?;
        let metadata = self.find(volume, "metadata", &self.metadata_suffix)?;
        Ok(VolumeFiles { archive, metadata })
    }
}

fn exists(path: &Path) -> LocateResult<bool> {
    match path.try_exists() {
        Ok(found) => Ok(found && path.is_file()),
        Err(source) => Err(LocateError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn vid(s: &str) -> VolumeId {
        VolumeId::parse(s).unwrap()
    }

    fn place(root: &Path, volume: &VolumeId, suffix: &str) -> PathBuf {
        let dir = root.join(PairtreeLocator::relative_dir(volume));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(PairtreeLocator::file_name(volume, suffix));
        fs::write(&path, b"x").unwrap();
        path
    }

    #[test]
    fn relative_dir_follows_pairtree_layout() {
        let dir = PairtreeLocator::relative_dir(&vid("loc.ark:/13960/t9w09kd5k"));
        assert_eq!(
            dir,
            PathBuf::from("loc/pairtree_root/ar/k+/=1/39/60/=t/9w/09/kd/5k/ark+=13960=t9w09kd5k")
        );
        assert_eq!(
            PairtreeLocator::file_name(&vid("loc.ark:/13960/t9w09kd5k"), ".zip"),
            "ark+=13960=t9w09kd5k.zip"
        );
    }

    #[test]
    fn local_part_dots_are_cleaned() {
        let dir = PairtreeLocator::relative_dir(&vid("mdp.39015.001"));
        assert!(dir.ends_with("39015,001"));
    }

    #[test]
    fn locates_in_single_root() {
        let root = tempfile::tempdir().unwrap();
        let id = vid("mdp.39015000000001");
        let archive = place(root.path(), &id, ".zip");
        let metadata = place(root.path(), &id, ".mets.xml");

        let files = PairtreeLocator::new(vec![root.path().to_path_buf()])
            .locate(&id)
            .unwrap();
        assert_eq!(files, VolumeFiles { archive, metadata });
    }

    #[test]
    fn files_may_sit_under_different_roots() {
        let a = tempfile::tempdir().unwrap();
        let b = tempfile::tempdir().unwrap();
        let id = vid("mdp.39015000000001");
        let metadata = place(a.path(), &id, ".mets.xml");
        let archive = place(b.path(), &id, ".zip");

        let locator = PairtreeLocator::new(vec![a.path().to_path_buf(), b.path().to_path_buf()]);
        let files = locator.locate(&id).unwrap();
        assert_eq!(files.archive, archive);
        assert_eq!(files.metadata, metadata);
    }

    #[test]
    fn first_root_wins() {
        let a = tempfile::tempdir().unwrap();
        let b = tempfile::tempdir().unwrap();
        let id = vid("mdp.1");
        let first = place(a.path(), &id, ".zip");
        place(b.path(), &id, ".zip");
        place(b.path(), &id, ".mets.xml");

        let files = PairtreeLocator::new(vec![a.path().to_path_buf(), b.path().to_path_buf()])
            .locate(&id)
            .unwrap();
        assert_eq!(files.archive, first);
    }

    #[test]
    fn missing_metadata_is_not_found() {
        let root = tempfile::tempdir().unwrap();
        let id = vid("mdp.1");
        place(root.path(), &id, ".zip");
        let err = PairtreeLocator::new(vec![root.path().to_path_buf()])
            .locate(&id)
            .unwrap_err();
        assert!(matches!(err, LocateError::NotFound { kind: "metadata", .. }));
    }

    #[test]
    fn custom_suffixes() {
        let root = tempfile::tempdir().unwrap();
        let id = vid("mdp.1");
        place(root.path(), &id, ".txt.zip");
        place(root.path(), &id, ".xml");
        let locator = PairtreeLocator::new(vec![root.path().to_path_buf()]).with_suffixes(".txt.zip", ".xml");
        assert!(locator.locate(&id).is_ok());
    }

    #[test]
    fn no_roots_is_an_error() {
        let err = PairtreeLocator::new(Vec::new()).locate(&vid("mdp.1")).unwrap_err();
        assert!(matches!(err, LocateError::NoRoots));
    }
}

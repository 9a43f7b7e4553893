use std::path::Path;

use folio_types::VolumeId;
use tracing::warn;

use crate::error::ConfigError;

/// Read a volume id list: one id per line. Blank lines and surrounding
/// whitespace are ignored; malformed ids are logged and skipped.
pub fn read_volume_ids(path: &Path) -> Result<Vec<VolumeId>, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_volume_ids(&text))
}

pub(crate) fn parse_volume_ids(text: &str) -> Vec<VolumeId> {
    text.lines()
        .enumerate()
        .filter_map(|(n, line)| {
            let line = line.trim();
            if line.is_empty() {
                return None;
            }
            match VolumeId::parse(line) {
                Ok(id) => Some(id),
                Err(err) => {
                    warn!(line = n + 1, %err, "skipping malformed volume id");
                    None
                }
            }
        })
        .collect()
}

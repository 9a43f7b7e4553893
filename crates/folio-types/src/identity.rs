use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Globally unique identifier of one digitized volume.
///
/// Identifiers take the form `<namespace>.<local id>`, where the namespace is
/// the short code of the contributing institution (`mdp`, `loc`, ...) and the
/// local id is opaque and may itself contain dots, slashes, or colons
/// (`loc.ark:/13960/t9w09kd5k`). The whole string is the persistence key.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VolumeId(String);

impl VolumeId {
    /// Parse and validate a volume identifier.
    pub fn parse(s: &str) -> Result<Self, TypeError> {
        if s.is_empty() {
            return Err(TypeError::InvalidVolumeId(s.into(), "empty"));
        }
        if s.chars().any(char::is_whitespace) {
            return Err(TypeError::InvalidVolumeId(s.into(), "contains whitespace"));
        }
        match s.split_once('.') {
            Some((ns, local)) if !ns.is_empty() && !local.is_empty() => Ok(Self(s.to_owned())),
            _ => Err(TypeError::InvalidVolumeId(
                s.into(),
                "expected <namespace>.<id>",
            )),
        }
    }

    /// The institution namespace (text before the first dot).
    pub fn namespace(&self) -> &str {
        self.split().0
    }

    /// The local identifier (text after the first dot).
    pub fn local_part(&self) -> &str {
        self.split().1
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn split(&self) -> (&str, &str) {
        // Validated at construction.
        self.0.split_once('.').unwrap_or((&self.0, ""))
    }
}

impl FromStr for VolumeId {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for VolumeId {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<VolumeId> for String {
    fn from(id: VolumeId) -> Self {
        id.0
    }
}

impl AsRef<str> for VolumeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for VolumeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VolumeId({})", self.0)
    }
}

impl fmt::Display for VolumeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple_id() {
        let id = VolumeId::parse("mdp.39015012345678").unwrap();
        assert_eq!(id.namespace(), "mdp");
        assert_eq!(id.local_part(), "39015012345678");
    }

    #[test]
    fn local_part_keeps_later_dots() {
        let id = VolumeId::parse("uc1.b.12345.v2").unwrap();
        assert_eq!(id.namespace(), "uc1");
        assert_eq!(id.local_part(), "b.12345.v2");
    }

    #[test]
    fn ark_style_id() {
        let id = VolumeId::parse("loc.ark:/13960/t9w09kd5k").unwrap();
        assert_eq!(id.namespace(), "loc");
        assert_eq!(id.local_part(), "ark:/13960/t9w09kd5k");
    }

    #[test]
    fn rejects_malformed_ids() {
        assert!(VolumeId::parse("").is_err());
        assert!(VolumeId::parse("nodot").is_err());
        assert!(VolumeId::parse(".leading").is_err());
        assert!(VolumeId::parse("trailing.").is_err());
        assert!(VolumeId::parse("mdp.has space").is_err());
    }

    #[test]
    fn display_is_raw_string() {
        let id: VolumeId = "mdp.001".parse().unwrap();
        assert_eq!(id.to_string(), "mdp.001");
        assert_eq!(format!("{id:?}"), "VolumeId(mdp.001)");
    }

    #[test]
    fn serde_roundtrip_as_string() {
        let id = VolumeId::parse("mdp.001").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"mdp.001\"");
        let back: VolumeId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
        assert!(serde_json::from_str::<VolumeId>("\"bad\"").is_err());
    }
}

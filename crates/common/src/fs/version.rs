use std::fmt;

use serde::{Deserialize, Serialize};

/// Name of the reserved link every links-node carries
pub const VERSION_LINK: &str = "version";

/// On-disk format version of a links-node.
///
/// Ordered oldest to newest. Anything we do not recognise reads as the
///  oldest version rather than failing.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum FileSystemVersion {
    #[default]
    #[serde(rename = "0.0.0")]
    V0_0_0,
    #[serde(rename = "1.0.0")]
    V1_0_0,
}

impl FileSystemVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileSystemVersion::V0_0_0 => "0.0.0",
            FileSystemVersion::V1_0_0 => "1.0.0",
        }
    }

    pub fn latest() -> Self {
        FileSystemVersion::V1_0_0
    }

    pub fn parse_lossy(value: &str) -> Self {
        match value.trim() {
            "1.0.0" => FileSystemVersion::V1_0_0,
            _ => FileSystemVersion::V0_0_0,
        }
    }
}

impl fmt::Display for FileSystemVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_lossy() {
        assert_eq!(
            FileSystemVersion::parse_lossy("1.0.0"),
            FileSystemVersion::V1_0_0
        );
        assert_eq!(
            FileSystemVersion::parse_lossy("0.0.0"),
            FileSystemVersion::V0_0_0
        );
        assert_eq!(
            FileSystemVersion::parse_lossy("9.9.9"),
            FileSystemVersion::V0_0_0
        );
        assert_eq!(FileSystemVersion::parse_lossy(""), FileSystemVersion::V0_0_0);
    }

    #[test]
    fn test_ordering_and_default() {
        assert!(FileSystemVersion::V0_0_0 < FileSystemVersion::V1_0_0);
        assert_eq!(FileSystemVersion::default(), FileSystemVersion::V0_0_0);
        assert_eq!(FileSystemVersion::latest().to_string(), "1.0.0");
    }
}

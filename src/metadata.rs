//! Scene metadata (`metadata.json`) loading and validation

use crate::error::{Error, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// One attribute's declared type tag, mapped to a fixed-width little-endian encoding.
///
/// `position` and `rgb` are not representable here — they're special-cased in
/// [`crate::attribute::Attribute`] since they decode from a Morton-interleaved
/// block rather than a plain little-endian element stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeType {
    UInt8,
    UInt16,
    UInt32,
    Int16,
    Float,
    Double,
}

impl AttributeType {
    /// Parse a metadata `type` tag string.
    pub fn parse(tag: &str) -> Result<Self> {
        match tag {
            "uint8" => Ok(Self::UInt8),
            "uint16" => Ok(Self::UInt16),
            "uint32" => Ok(Self::UInt32),
            "int16" => Ok(Self::Int16),
            "float" => Ok(Self::Float),
            "double" => Ok(Self::Double),
            other => Err(Error::SchemaMismatch(format!(
                "unknown attribute type tag: {other}"
            ))),
        }
    }

    /// Native element width in bytes.
    pub fn element_size(self) -> usize {
        match self {
            Self::UInt8 => 1,
            Self::UInt16 | Self::Int16 => 2,
            Self::UInt32 | Self::Float => 4,
            Self::Double => 8,
        }
    }
}

/// One raw entry of the `attributes` list in `metadata.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct AttributeEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub type_tag: String,
    pub size: usize,
}

/// Validated scene metadata.
#[derive(Debug, Clone, Deserialize)]
pub struct Metadata {
    pub version: String,
    pub encoding: String,
    pub points: u64,
    pub scale: [f64; 3],
    pub offset: [f64; 3],
    pub attributes: Vec<AttributeEntry>,
}

impl Metadata {
    /// Load and parse `<dir>/metadata.json` without validating version/encoding.
    pub fn load(dir: &Path) -> Result<Self> {
        let bytes = fs::read(dir.join("metadata.json"))?;
        let metadata: Metadata = serde_json::from_slice(&bytes)?;
        Ok(metadata)
    }

    /// Validate the format version and the encoding tag expected by a reader variant.
    pub fn validate(&self, expected_encoding: &'static str) -> Result<()> {
        if self.version != "2.0" {
            return Err(Error::UnsupportedVersion(self.version.clone()));
        }
        if self.encoding != expected_encoding {
            return Err(Error::UnsupportedEncoding {
                found: self.encoding.clone(),
                expected: expected_encoding,
            });
        }
        Ok(())
    }

    /// Sum of attribute sizes — the stride of one point in the DEFAULT encoding's
    /// interleaved record.
    pub fn bytes_per_point(&self) -> usize {
        self.attributes.iter().map(|a| a.size).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_type_tags() {
        assert_eq!(AttributeType::parse("uint8").unwrap(), AttributeType::UInt8);
        assert_eq!(AttributeType::parse("double").unwrap().element_size(), 8);
    }

    #[test]
    fn rejects_unknown_type_tag() {
        assert!(AttributeType::parse("quaternion").is_err());
    }

    #[test]
    fn validate_rejects_wrong_version() {
        let metadata = Metadata {
            version: "1.8".into(),
            encoding: "BROTLI".into(),
            points: 0,
            scale: [1.0, 1.0, 1.0],
            offset: [0.0, 0.0, 0.0],
            attributes: vec![],
        };
        assert!(matches!(
            metadata.validate("BROTLI"),
            Err(Error::UnsupportedVersion(_))
        ));
    }

    #[test]
    fn validate_rejects_wrong_encoding() {
        let metadata = Metadata {
            version: "2.0".into(),
            encoding: "DEFAULT".into(),
            points: 0,
            scale: [1.0, 1.0, 1.0],
            offset: [0.0, 0.0, 0.0],
            attributes: vec![],
        };
        assert!(matches!(
            metadata.validate("BROTLI"),
            Err(Error::UnsupportedEncoding { .. })
        ));
    }

    #[test]
    fn bytes_per_point_sums_attribute_sizes() {
        let metadata = Metadata {
            version: "2.0".into(),
            encoding: "DEFAULT".into(),
            points: 1,
            scale: [1.0, 1.0, 1.0],
            offset: [0.0, 0.0, 0.0],
            attributes: vec![
                AttributeEntry {
                    name: "position".into(),
                    type_tag: "position".into(),
                    size: 12,
                },
                AttributeEntry {
                    name: "classification".into(),
                    type_tag: "uint8".into(),
                    size: 1,
                },
            ],
        };
        assert_eq!(metadata.bytes_per_point(), 13);
    }
}

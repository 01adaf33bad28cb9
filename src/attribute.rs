//! Tagged attribute schema, built once from `metadata.json`'s `attributes` list
//!
//! Position and rgb decoding diverges from the generic little-endian path, so
//! rather than comparing attribute names by string on every node, the schema is
//! lowered once into this enum and the decode loop becomes a plain `match`.

use crate::error::Result;
use crate::metadata::{AttributeEntry, AttributeType};

/// One schema entry, lowered from its raw `metadata.json` form.
#[derive(Debug, Clone, PartialEq)]
pub enum Attribute {
    /// 16 bytes/point, Morton-interleaved; decodes to a `(points, 3)` column.
    Position,
    /// 8 bytes/point, Morton-interleaved; decodes to a `(points, 3)` column.
    Rgb,
    /// Plain little-endian element stream of `size` bytes/point.
    Generic {
        name: String,
        ty: AttributeType,
        size: usize,
    },
}

impl Attribute {
    /// Attribute name as it will appear as a column key.
    pub fn name(&self) -> &str {
        match self {
            Attribute::Position => "position",
            Attribute::Rgb => "rgb",
            Attribute::Generic { name, .. } => name,
        }
    }

    /// Build the ordered attribute schema from metadata's raw entries.
    pub fn schema_from(entries: &[AttributeEntry]) -> Result<Vec<Attribute>> {
        entries
            .iter()
            .map(|entry| match entry.name.as_str() {
                "position" => Ok(Attribute::Position),
                "rgb" => Ok(Attribute::Rgb),
                name => {
                    let ty = AttributeType::parse(&entry.type_tag)?;
                    Ok(Attribute::Generic {
                        name: name.to_string(),
                        ty,
                        size: entry.size,
                    })
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, type_tag: &str, size: usize) -> AttributeEntry {
        AttributeEntry {
            name: name.to_string(),
            type_tag: type_tag.to_string(),
            size,
        }
    }

    #[test]
    fn position_and_rgb_are_special_cased_regardless_of_declared_type() {
        let schema = Attribute::schema_from(&[
            entry("position", "position", 12),
            entry("rgb", "rgb", 3),
        ])
        .unwrap();
        assert_eq!(schema, vec![Attribute::Position, Attribute::Rgb]);
    }

    #[test]
    fn generic_attribute_carries_parsed_type_and_size() {
        let schema = Attribute::schema_from(&[entry("classification", "uint8", 1)]).unwrap();
        assert_eq!(
            schema,
            vec![Attribute::Generic {
                name: "classification".into(),
                ty: AttributeType::UInt8,
                size: 1
            }]
        );
    }

    #[test]
    fn unknown_type_tag_is_a_hard_error() {
        assert!(Attribute::schema_from(&[entry("weird", "quaternion", 16)]).is_err());
    }
}

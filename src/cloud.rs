//! Decoded point cloud: attribute name -> dense column
//!
//! Columns are preallocated once, sized by `metadata.points`, and filled
//! in-place as nodes decode. `position` and `rgb` are `(points, 3)`; every
//! other attribute is `(points,)` of its native element type — columns are
//! sized by component count, not uniformly by `points`.

use crate::attribute::Attribute;
use crate::metadata::AttributeType;
use indexmap::IndexMap;

/// One attribute's decoded column.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Position(Vec<[f64; 3]>),
    Rgb(Vec<[f64; 3]>),
    UInt8(Vec<u8>),
    UInt16(Vec<u16>),
    UInt32(Vec<u32>),
    Int16(Vec<i16>),
    Float(Vec<f32>),
    Double(Vec<f64>),
}

impl Column {
    /// Number of rows currently held (not the preallocated capacity).
    pub fn len(&self) -> usize {
        match self {
            Column::Position(v) | Column::Rgb(v) => v.len(),
            Column::UInt8(v) => v.len(),
            Column::UInt16(v) => v.len(),
            Column::UInt32(v) => v.len(),
            Column::Int16(v) => v.len(),
            Column::Float(v) => v.len(),
            Column::Double(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of scalar components per row (3 for position/rgb, 1 otherwise).
    pub fn components(&self) -> usize {
        match self {
            Column::Position(_) | Column::Rgb(_) => 3,
            _ => 1,
        }
    }

    fn zeroed(attribute: &Attribute, points: usize) -> Column {
        match attribute {
            Attribute::Position => Column::Position(vec![[0.0; 3]; points]),
            Attribute::Rgb => Column::Rgb(vec![[0.0; 3]; points]),
            Attribute::Generic { ty, .. } => match ty {
                AttributeType::UInt8 => Column::UInt8(vec![0; points]),
                AttributeType::UInt16 => Column::UInt16(vec![0; points]),
                AttributeType::UInt32 => Column::UInt32(vec![0; points]),
                AttributeType::Int16 => Column::Int16(vec![0; points]),
                AttributeType::Float => Column::Float(vec![0.0; points]),
                AttributeType::Double => Column::Double(vec![0.0; points]),
            },
        }
    }
}

/// A decoded point cloud: an ordered mapping from attribute name to column.
///
/// Iteration order matches the schema's declared order (via `IndexMap`), so
/// CLI output columns line up with `metadata.json`'s `attributes` list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cloud {
    pub columns: IndexMap<String, Column>,
}

impl Cloud {
    /// Preallocate one zeroed column per schema attribute, each sized by `points`.
    pub fn allocate(schema: &[Attribute], points: usize) -> Cloud {
        let mut columns = IndexMap::with_capacity(schema.len());
        for attribute in schema {
            columns.insert(attribute.name().to_string(), Column::zeroed(attribute, points));
        }
        Cloud { columns }
    }

    pub fn get(&self, name: &str) -> Option<&Column> {
        self.columns.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Column> {
        self.columns.get_mut(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocate_sizes_position_and_rgb_as_three_component_columns() {
        let schema = vec![Attribute::Position, Attribute::Rgb];
        let cloud = Cloud::allocate(&schema, 4);
        assert_eq!(cloud.get("position").unwrap().components(), 3);
        assert_eq!(cloud.get("position").unwrap().len(), 4);
        assert_eq!(cloud.get("rgb").unwrap().len(), 4);
    }

    #[test]
    fn allocate_sizes_generic_attribute_as_one_component_column() {
        let schema = vec![Attribute::Generic {
            name: "classification".into(),
            ty: AttributeType::UInt8,
            size: 1,
        }];
        let cloud = Cloud::allocate(&schema, 3);
        let col = cloud.get("classification").unwrap();
        assert_eq!(col.components(), 1);
        assert_eq!(col.len(), 3);
        assert!(matches!(col, Column::UInt8(_)));
    }

    #[test]
    fn columns_preserve_schema_order() {
        let schema = vec![
            Attribute::Position,
            Attribute::Rgb,
            Attribute::Generic {
                name: "classification".into(),
                ty: AttributeType::UInt8,
                size: 1,
            },
        ];
        let cloud = Cloud::allocate(&schema, 1);
        let names: Vec<&str> = cloud.columns.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["position", "rgb", "classification"]);
    }
}

//! Node decoding: slice, decompress, and scatter one node's attributes
//! into the preallocated columns at its row offset.

use crate::attribute::Attribute;
use crate::cloud::{Cloud, Column};
use crate::compression::Decompressor;
use crate::error::{Error, Result};
use crate::hierarchy::HierarchyNode;
use crate::metadata::AttributeType;
use crate::morton;

/// Decode one node's already-decompressed payload into per-attribute column
/// fragments, each exactly `node.num_points` rows long, in schema order.
pub fn decode_node(payload: &[u8], node: &HierarchyNode, schema: &[Attribute]) -> Result<Vec<Column>> {
    let num_points = node.num_points as usize;
    let mut cursor = 0usize;
    let mut fragments = Vec::with_capacity(schema.len());

    for attribute in schema {
        match attribute {
            Attribute::Position => {
                let needed = 16 * num_points;
                let slice = slice_or_mismatch(payload, cursor, needed, "position")?;
                let positions = morton::decode_positions(slice, num_points)
                    .ok_or_else(|| Error::SchemaMismatch("position payload shorter than 16 bytes/point".into()))?;
                let rows = positions
                    .values
                    .into_iter()
                    .map(|[x, y, z]| [x as f64, y as f64, z as f64])
                    .collect();
                fragments.push(Column::Position(rows));
                cursor += needed;
            }
            Attribute::Rgb => {
                let needed = 8 * num_points;
                let slice = slice_or_mismatch(payload, cursor, needed, "rgb")?;
                let colors = morton::decode_colors(slice, num_points)
                    .ok_or_else(|| Error::SchemaMismatch("rgb payload shorter than 8 bytes/point".into()))?;
                fragments.push(Column::Rgb(colors.values));
                cursor += needed;
            }
            Attribute::Generic { name, ty, size } => {
                let needed = size * num_points;
                let slice = slice_or_mismatch(payload, cursor, needed, name)?;
                fragments.push(decode_generic(slice, *ty, *size, name)?);
                cursor += needed;
            }
        }
    }

    Ok(fragments)
}

fn slice_or_mismatch<'a>(payload: &'a [u8], cursor: usize, needed: usize, attr: &str) -> Result<&'a [u8]> {
    payload.get(cursor..cursor + needed).ok_or_else(|| {
        Error::SchemaMismatch(format!(
            "attribute '{attr}' needs {needed} bytes at offset {cursor}, node payload is {} bytes",
            payload.len()
        ))
    })
}

fn decode_generic(slice: &[u8], ty: AttributeType, declared_size: usize, name: &str) -> Result<Column> {
    let elem_size = ty.element_size();
    if elem_size != declared_size {
        return Err(Error::SchemaMismatch(format!(
            "attribute '{name}' declares size {declared_size} but its type implies {elem_size}"
        )));
    }
    Ok(match ty {
        AttributeType::UInt8 => Column::UInt8(slice.to_vec()),
        AttributeType::UInt16 => Column::UInt16(
            slice
                .chunks_exact(2)
                .map(|c| u16::from_le_bytes(c.try_into().unwrap()))
                .collect(),
        ),
        AttributeType::UInt32 => Column::UInt32(
            slice
                .chunks_exact(4)
                .map(|c| u32::from_le_bytes(c.try_into().unwrap()))
                .collect(),
        ),
        AttributeType::Int16 => Column::Int16(
            slice
                .chunks_exact(2)
                .map(|c| i16::from_le_bytes(c.try_into().unwrap()))
                .collect(),
        ),
        AttributeType::Float => Column::Float(
            slice
                .chunks_exact(4)
                .map(|c| f32::from_le_bytes(c.try_into().unwrap()))
                .collect(),
        ),
        AttributeType::Double => Column::Double(
            slice
                .chunks_exact(8)
                .map(|c| f64::from_le_bytes(c.try_into().unwrap()))
                .collect(),
        ),
    })
}

/// Decode every node into the preallocated `cloud`, in hierarchy order.
///
/// Row offsets are computed up front from each node's `num_points`, so nodes
/// could in principle decode concurrently (see the `parallel` feature); the
/// scatter into `cloud` always happens sequentially, preserving hierarchy
/// order regardless of decode scheduling.
pub fn decode_all(
    nodes: &[HierarchyNode],
    octree: &[u8],
    schema: &[Attribute],
    decompressor: &dyn Decompressor,
    points: u64,
) -> Result<Cloud> {
    let mut cloud = Cloud::allocate(schema, points as usize);

    let fragments = decode_node_payloads(nodes, octree, schema, decompressor);

    let mut row_cursor = 0usize;
    for (node, fragment) in nodes.iter().zip(fragments) {
        let fragment = fragment?;
        scatter(&mut cloud, schema, fragment, row_cursor)?;
        row_cursor += node.num_points as usize;
    }

    if row_cursor as u64 != points {
        return Err(Error::PointCountMismatch {
            decoded: row_cursor as u64,
            declared: points,
        });
    }

    Ok(cloud)
}

#[cfg(feature = "parallel")]
fn decode_node_payloads(
    nodes: &[HierarchyNode],
    octree: &[u8],
    schema: &[Attribute],
    decompressor: &dyn Decompressor,
) -> Vec<Result<Vec<Column>>> {
    use rayon::prelude::*;
    nodes
        .par_iter()
        .map(|node| decode_one_node(node, octree, schema, decompressor))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn decode_node_payloads(
    nodes: &[HierarchyNode],
    octree: &[u8],
    schema: &[Attribute],
    decompressor: &dyn Decompressor,
) -> Vec<Result<Vec<Column>>> {
    nodes
        .iter()
        .map(|node| decode_one_node(node, octree, schema, decompressor))
        .collect()
}

fn decode_one_node(
    node: &HierarchyNode,
    octree: &[u8],
    schema: &[Attribute],
    decompressor: &dyn Decompressor,
) -> Result<Vec<Column>> {
    let start = node.byte_offset as usize;
    let end = start + node.byte_size as usize;
    let compressed = octree.get(start..end).ok_or_else(|| {
        Error::IoFailure(format!(
            "node byte range {start}..{end} exceeds octree.bin length {}",
            octree.len()
        ))
    })?;
    let payload = decompressor.decompress(compressed)?;
    decode_node(&payload, node, schema)
}

fn scatter(cloud: &mut Cloud, schema: &[Attribute], fragment: Vec<Column>, row_offset: usize) -> Result<()> {
    for (attribute, frag_col) in schema.iter().zip(fragment) {
        let column = cloud
            .get_mut(attribute.name())
            .expect("schema-derived column must exist for every attribute");
        write_fragment(column, frag_col, row_offset)?;
    }
    Ok(())
}

macro_rules! scatter_rows {
    ($col:expr, $frag:expr, $row_offset:expr) => {{
        let end = $row_offset + $frag.len();
        if end > $col.len() {
            return Err(Error::SchemaMismatch(
                "node write exceeds preallocated column length".into(),
            ));
        }
        $col[$row_offset..end].clone_from_slice(&$frag);
    }};
}

fn write_fragment(column: &mut Column, fragment: Column, row_offset: usize) -> Result<()> {
    match (column, fragment) {
        (Column::Position(col), Column::Position(frag)) => scatter_rows!(col, frag, row_offset),
        (Column::Rgb(col), Column::Rgb(frag)) => scatter_rows!(col, frag, row_offset),
        (Column::UInt8(col), Column::UInt8(frag)) => scatter_rows!(col, frag, row_offset),
        (Column::UInt16(col), Column::UInt16(frag)) => scatter_rows!(col, frag, row_offset),
        (Column::UInt32(col), Column::UInt32(frag)) => scatter_rows!(col, frag, row_offset),
        (Column::Int16(col), Column::Int16(frag)) => scatter_rows!(col, frag, row_offset),
        (Column::Float(col), Column::Float(frag)) => scatter_rows!(col, frag, row_offset),
        (Column::Double(col), Column::Double(frag)) => scatter_rows!(col, frag, row_offset),
        _ => unreachable!("column and fragment are built from the same schema entry"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compression::Identity;

    fn node(num_points: u32, byte_offset: u64, byte_size: u64) -> HierarchyNode {
        HierarchyNode {
            num_points,
            byte_offset,
            byte_size,
        }
    }

    #[test]
    fn decode_node_extra_attribute_after_position_and_rgb() {
        // position(16B) + rgb(8B) + classification(uint8,1B), 3 points.
        let schema = vec![
            Attribute::Position,
            Attribute::Rgb,
            Attribute::Generic {
                name: "classification".into(),
                ty: AttributeType::UInt8,
                size: 1,
            },
        ];
        let mut payload = vec![0u8; 3 * (16 + 8 + 1)];
        let classification_offset = 3 * (16 + 8);
        payload[classification_offset] = 10;
        payload[classification_offset + 1] = 20;
        payload[classification_offset + 2] = 30;

        let node = node(3, 0, payload.len() as u64);
        let fragments = decode_node(&payload, &node, &schema).unwrap();
        assert_eq!(fragments.len(), 3);
        match &fragments[2] {
            Column::UInt8(values) => assert_eq!(values, &vec![10, 20, 30]),
            other => panic!("expected UInt8 column, got {other:?}"),
        }
    }

    #[test]
    fn decode_node_unknown_type_tag_rejected_at_schema_build() {
        // Schema construction itself rejects unknown tags (attribute.rs); this
        // test documents that decode_node never sees one.
        assert!(crate::metadata::AttributeType::parse("weird").is_err());
    }

    #[test]
    fn decode_node_short_payload_is_schema_mismatch() {
        let schema = vec![Attribute::Position];
        let payload = vec![0u8; 8]; // shorter than 16 bytes/point
        let node = node(1, 0, 8);
        assert!(matches!(
            decode_node(&payload, &node, &schema),
            Err(Error::SchemaMismatch(_))
        ));
    }

    #[test]
    fn decode_all_advances_row_cursor_and_matches_points() {
        let schema = vec![Attribute::Generic {
            name: "classification".into(),
            ty: AttributeType::UInt8,
            size: 1,
        }];
        let octree = vec![7u8, 8u8, 9u8];
        let nodes = vec![node(2, 0, 2), node(1, 2, 1)];
        let cloud = decode_all(&nodes, &octree, &schema, &Identity, 3).unwrap();
        match cloud.get("classification").unwrap() {
            Column::UInt8(values) => assert_eq!(values, &vec![7, 8, 9]),
            other => panic!("unexpected column {other:?}"),
        }
    }

    #[test]
    fn decode_all_point_count_mismatch_is_an_error() {
        let schema = vec![Attribute::Generic {
            name: "classification".into(),
            ty: AttributeType::UInt8,
            size: 1,
        }];
        let octree = vec![1u8; 9];
        let nodes = vec![node(9, 0, 9)];
        let err = decode_all(&nodes, &octree, &schema, &Identity, 10).unwrap_err();
        assert!(matches!(err, Error::PointCountMismatch { decoded: 9, declared: 10 }));
    }
}

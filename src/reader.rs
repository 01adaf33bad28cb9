//! Potree reader variants: load files, run the hierarchy parse and node
//! decode, and assemble the final decoded cloud.

use crate::attribute::Attribute;
use crate::cloud::{Cloud, Column};
use crate::compression::{Brotli, Identity};
use crate::decode::decode_all;
use crate::error::{Error, Result};
use crate::hierarchy;
use crate::metadata::Metadata;
use std::fmt;
use std::fs;
use std::path::Path;

/// A capability shared by both Potree reader variants: decode a directory into
/// a [`Cloud`].
pub trait PointCloudReader {
    fn decode(&self, dir: &Path) -> Result<Cloud>;
}

/// Reader for Potree's BROTLI encoding.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrotliReader;

impl PointCloudReader for BrotliReader {
    fn decode(&self, dir: &Path) -> Result<Cloud> {
        let metadata = Metadata::load(dir)?;
        metadata.validate("BROTLI")?;

        let hierarchy_bytes = fs::read(dir.join("hierarchy.bin"))?;
        let octree_bytes = fs::read(dir.join("octree.bin"))?;

        let nodes = hierarchy::parse(&hierarchy_bytes)?;
        let schema = Attribute::schema_from(&metadata.attributes)?;

        let mut cloud = decode_all(&nodes, &octree_bytes, &schema, &Brotli, metadata.points)?;

        apply_affine_transform(&mut cloud, metadata.scale, metadata.offset);

        Ok(cloud)
    }
}

/// Reader for Potree's DEFAULT encoding.
///
/// Exposes positions only — the uncompressed interleaved stream's other
/// attributes are skipped, never decoded.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultReader;

impl PointCloudReader for DefaultReader {
    fn decode(&self, dir: &Path) -> Result<Cloud> {
        let metadata = Metadata::load(dir)?;
        metadata.validate("DEFAULT")?;

        let bytes_per_point = metadata.bytes_per_point();
        let bytes = fs::read(dir.join("octree.bin"))?;

        let num_points = metadata.points as usize;
        let mut positions = Vec::with_capacity(num_points);

        let mut cursor = 0usize;
        for _ in 0..num_points {
            let record = bytes.get(cursor..cursor + bytes_per_point).ok_or_else(|| {
                Error::SchemaMismatch(format!(
                    "octree.bin ends before {num_points} records of {bytes_per_point} bytes each"
                ))
            })?;
            let x = i32::from_le_bytes(record[0..4].try_into().unwrap());
            let y = i32::from_le_bytes(record[4..8].try_into().unwrap());
            let z = i32::from_le_bytes(record[8..12].try_into().unwrap());
            positions.push([
                x as f64 * metadata.scale[0] + metadata.offset[0],
                y as f64 * metadata.scale[1] + metadata.offset[1],
                z as f64 * metadata.scale[2] + metadata.offset[2],
            ]);
            cursor += bytes_per_point;
        }

        let mut cloud = Cloud::default();
        cloud.columns.insert("position".to_string(), Column::Position(positions));
        Ok(cloud)
    }
}

/// Replace the `position` column in place with `value * scale + offset`,
/// computed in double precision. `scale` is narrowed through `f32` before the
/// multiply — the BROTLI reader's source convention stores scale as a 32-bit
/// float and offset as a 64-bit float, so the narrowing must happen here even
/// though the rest of the computation is double precision.
fn apply_affine_transform(cloud: &mut Cloud, scale: [f64; 3], offset: [f64; 3]) {
    let scale = [scale[0] as f32 as f64, scale[1] as f32 as f64, scale[2] as f32 as f64];
    if let Some(Column::Position(values)) = cloud.get_mut("position") {
        for point in values.iter_mut() {
            for axis in 0..3 {
                point[axis] = point[axis] * scale[axis] + offset[axis];
            }
        }
    }
}

/// The two reader tags recognized by the factory, matching the exact
/// string values used by Potree's `PointCloudReaderType` enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReaderName {
    PotreeUncompressedPointCloudReader,
    PotreeBrotliCompressedPointCloudReader,
}

impl fmt::Display for ReaderName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ReaderName {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PotreeUncompressedPointCloudReader => "potree_uncompressed_point_cloud_reader",
            Self::PotreeBrotliCompressedPointCloudReader => "potree_brotli_compressed_point_cloud_reader",
        }
    }

    pub fn parse(tag: &str) -> Result<Self> {
        match tag {
            "potree_uncompressed_point_cloud_reader" => Ok(Self::PotreeUncompressedPointCloudReader),
            "potree_brotli_compressed_point_cloud_reader" => Ok(Self::PotreeBrotliCompressedPointCloudReader),
            other => Err(Error::UnknownReader(other.to_string())),
        }
    }

    /// Map a `metadata.json` `encoding` tag to the reader that understands it.
    pub fn from_encoding(encoding: &str) -> Result<Self> {
        match encoding {
            "DEFAULT" => Ok(Self::PotreeUncompressedPointCloudReader),
            "BROTLI" => Ok(Self::PotreeBrotliCompressedPointCloudReader),
            other => Err(Error::UnsupportedEncoding {
                found: other.to_string(),
                expected: "BROTLI or DEFAULT",
            }),
        }
    }
}

/// The configuration object the factory selects a reader from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReaderConfig {
    pub reader_name: ReaderName,
}

/// Select a concrete reader for the given configuration.
pub fn reader_for(config: ReaderConfig) -> Box<dyn PointCloudReader> {
    match config.reader_name {
        ReaderName::PotreeUncompressedPointCloudReader => Box::new(DefaultReader),
        ReaderName::PotreeBrotliCompressedPointCloudReader => Box::new(BrotliReader),
    }
}

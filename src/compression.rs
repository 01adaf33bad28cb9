//! Per-node payload decompression
//!
//! DEFAULT nodes are stored uncompressed; BROTLI nodes are compressed with
//! Brotli. Both are exposed behind one trait so the node decode loop is
//! agnostic to which variant invoked it.

use crate::error::{Error, Result};
use std::io::Cursor;

/// A per-node payload decompression strategy.
pub trait Decompressor: Send + Sync {
    /// Decompress one node's raw payload into its uncompressed attribute block.
    fn decompress(&self, src: &[u8]) -> Result<Vec<u8>>;
}

/// Passthrough decompressor for the DEFAULT encoding, which stores payloads
/// uncompressed.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl Decompressor for Identity {
    fn decompress(&self, src: &[u8]) -> Result<Vec<u8>> {
        Ok(src.to_vec())
    }
}

/// Brotli decompressor for the BROTLI encoding's per-node payloads.
#[derive(Debug, Clone, Copy, Default)]
pub struct Brotli;

impl Decompressor for Brotli {
    fn decompress(&self, src: &[u8]) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        let mut reader = Cursor::new(src);
        brotli::BrotliDecompress(&mut reader, &mut out)
            .map_err(|e| Error::DecompressionFailure(e.to_string()))?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_passes_bytes_through_unchanged() {
        let data = b"uncompressed node payload".to_vec();
        assert_eq!(Identity.decompress(&data).unwrap(), data);
    }

    #[test]
    fn brotli_roundtrip() {
        use brotli::CompressorWriter;
        use std::io::Write;

        let original = b"point cloud node payload, repeated for a compressible stream "
            .repeat(20);

        let mut compressed = Vec::new();
        {
            let mut writer = CompressorWriter::new(&mut compressed, 4096, 9, 22);
            writer.write_all(&original).unwrap();
        }

        let decompressed = Brotli.decompress(&compressed).unwrap();
        assert_eq!(decompressed, original);
    }

    #[test]
    fn brotli_rejects_garbage() {
        let garbage = vec![0xFFu8; 16];
        assert!(matches!(
            Brotli.decompress(&garbage),
            Err(Error::DecompressionFailure(_))
        ));
    }
}

//! # potree2-decoder
//!
//! A decoder for point clouds stored in the Potree 2.0 on-disk format.
//!
//! Two encodings are supported: an uncompressed interleaved layout
//! ("DEFAULT") and a Brotli-compressed layout that additionally encodes
//! positions and colors as bit-interleaved Morton codes ("BROTLI").
//!
//! ## Example
//!
//! ```no_run
//! use potree2_decoder::reader::{reader_for, ReaderConfig, ReaderName};
//! use std::path::Path;
//!
//! let config = ReaderConfig {
//!     reader_name: ReaderName::PotreeBrotliCompressedPointCloudReader,
//! };
//! let reader = reader_for(config);
//! let cloud = reader.decode(Path::new("my_cloud_dir")).unwrap();
//! let position = cloud.get("position").unwrap();
//! println!("decoded {} points", position.len());
//! ```

pub mod attribute;
pub mod cloud;
pub mod compression;
pub mod decode;
pub mod error;
pub mod hierarchy;
pub mod metadata;
pub mod morton;
pub mod reader;

pub use crate::cloud::{Cloud, Column};
pub use crate::error::{Error, Result};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

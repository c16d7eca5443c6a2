//! Core types for image metadata handling.
//!
//! This crate provides the primitives shared by every namespace and
//! container format:
//!
//! - [`ByteOrder`] - big/little endian codec with an invalid sentinel
//! - [`TypeId`] - the TIFF/BigTIFF primitive type set plus in-memory shapes
//! - [`Value`] - the tagged value union with failure-aware conversions
//! - [`Key`]/[`Datum`]/[`MetadataContainer`] - `Family.Group.Tag` storage
//! - [`BasicIo`]/[`FileIo`]/[`MemIo`] - seekable streams with atomic replace
//! - [`charset`] - the UTF-8/UCS-2/Latin-1/ASCII conversion matrix
//!
//! # Example
//!
//! ```
//! use pixmeta_core::{Key, Datum, Value, ExifData};
//!
//! let mut exif = ExifData::new();
//! let key = Key::parse("Exif.Image.Orientation").unwrap();
//! exif.add_pair(key.clone(), Value::Short(vec![6]));
//!
//! assert_eq!(exif.find_key(&key).unwrap().value.to_u32(0), Some(6));
//! ```

mod byte_order;
pub mod charset;
mod comment;
mod datetime;
mod error;
pub mod io;
mod metadata;
mod rational;
mod types;
mod value;

pub use byte_order::ByteOrder;
pub use comment::{CharsetId, CommentValue};
pub use datetime::{DateValue, TimeValue};
pub use error::{Error, Result};
pub use io::{BasicIo, FileIo, MemIo, OpenMode};
pub use metadata::{Datum, ExifData, Family, IptcData, Key, MetadataContainer, XmpData};
pub use rational::{f64_to_i64, f64_to_srational, f64_to_u32, SRational, URational};
pub use types::TypeId;
pub use value::{LangAltValue, Value, XmpArrayKind};

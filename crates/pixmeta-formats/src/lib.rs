//! Container handlers and the image factory.
//!
//! This crate ties the engine together: the [`tiff`] reader/writer,
//! the per-format handlers (JPEG, PNG, PSD, WebP, BMFF, JP2, TIFF,
//! EXV, and the geometry-only stubs), the [`Image`] aggregate that
//! owns a byte stream plus the three metadata containers, the
//! Exif/IPTC/XMP [`convert`] bridge, and [`preview`] extraction.
//!
//! # Quick start
//!
//! ```no_run
//! use pixmeta_formats::Image;
//! use pixmeta_core::{Key, Value};
//!
//! let mut image = Image::open("photo.jpg").unwrap();
//! image.read_metadata().unwrap();
//!
//! let key = Key::parse("Exif.Image.Orientation").unwrap();
//! image.exif_mut().set(key, Value::Short(vec![6]));
//! image.write_metadata().unwrap();
//! ```

pub mod convert;
pub mod preview;
pub mod tiff;

mod bmff;
mod exv;
mod image;
mod jp2;
mod jpeg;
mod png;
mod psd;
mod registry;
mod sidecar;
mod stubs;
mod tiff_image;
mod traits;
mod utils;
mod webp;

pub use bmff::BmffHandler;
pub use exv::ExvHandler;
pub use image::{Image, ImageState};
pub use jp2::Jp2Handler;
pub use jpeg::JpegHandler;
pub use png::PngHandler;
pub use psd::PsdHandler;
pub use registry::{handler_for, HANDLERS};
pub use sidecar::XmpSidecarHandler;
pub use stubs::{BmpHandler, CrwHandler, EpsHandler, GifHandler, TgaHandler};
pub use tiff_image::TiffHandler;
pub use traits::{AccessMode, ImageHandler};
pub use webp::WebpHandler;

pub use pixmeta_core::{Error, Result};

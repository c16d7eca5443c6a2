//! Error types for the XMP codec.

use thiserror::Error;

#[derive(Debug, Error)]
#[must_use]
pub enum Error {
    #[error("XML parse error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("invalid XMP packet: {0}")]
    InvalidPacket(String),

    #[error("invalid XMP key '{0}'")]
    InvalidKey(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

//! XMP sidecar (.xmp) files.
//!
//! A sidecar is a bare XMP packet stored next to the image. Reading
//! and writing go through the same codec as embedded packets.

use crate::{Error, Result, XmpParser, XmpSerializer};
use pixmeta_core::XmpData;
use std::path::Path;

/// Read and decode a sidecar file.
pub fn read_sidecar(path: &Path) -> Result<XmpData> {
    let text = std::fs::read_to_string(path)?;
    if !text.contains("adobe:ns:meta") && !text.contains("rdf:RDF") {
        return Err(Error::InvalidPacket(
            "sidecar does not contain an XMP packet".into(),
        ));
    }
    XmpParser::decode(&text)
}

/// Serialize and write a sidecar file.
pub fn write_sidecar(path: &Path, xmp: &XmpData) -> Result<()> {
    let packet = XmpSerializer::encode(xmp)?;
    std::fs::write(path, packet)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixmeta_core::{Family, Key, Value};

    #[test]
    fn sidecar_round_trip() {
        let dir = std::env::temp_dir().join("pixmeta-sidecar-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("image.xmp");

        let mut xmp = XmpData::new();
        xmp.add_pair(
            Key::new(Family::Xmp, "xmp", "CreatorTool"),
            Value::XmpText("pixmeta".into()),
        );
        write_sidecar(&path, &xmp).unwrap();

        let back = read_sidecar(&path).unwrap();
        assert_eq!(back.len(), 1);
        assert_eq!(
            back.iter().next().unwrap().value,
            Value::XmpText("pixmeta".into())
        );
        std::fs::remove_file(&path).ok();
    }
}

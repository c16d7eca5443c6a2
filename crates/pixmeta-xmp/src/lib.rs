//! XMP packet codec.
//!
//! Converts between XMP packets (UTF-8 XML between `<?xpacket?>`
//! processing instructions) and the `Xmp.prefix.name` datum model.
//! The container handlers own packet *transport* (finding and
//! splicing packets); this crate owns the XML.
//!
//! # Example
//!
//! ```
//! use pixmeta_xmp::{XmpParser, XmpSerializer};
//!
//! let packet = r#"<x:xmpmeta xmlns:x="adobe:ns:meta/">
//!   <rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#">
//!     <rdf:Description xmlns:xmp="http://ns.adobe.com/xap/1.0/" xmp:Rating="5"/>
//!   </rdf:RDF>
//! </x:xmpmeta>"#;
//!
//! let xmp = XmpParser::decode(packet).unwrap();
//! let key = pixmeta_core::Key::parse("Xmp.xmp.Rating").unwrap();
//! assert_eq!(xmp.find_key(&key).unwrap().value.to_u32(0), Some(5));
//! let _packet_again = XmpSerializer::encode(&xmp).unwrap();
//! ```

mod error;
mod parser;
mod sidecar;
mod writer;

pub use error::{Error, Result};
pub use parser::XmpParser;
pub use sidecar::{read_sidecar, write_sidecar};
pub use writer::XmpSerializer;

/// Well-known namespace URIs.
pub mod ns {
    pub const RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
    pub const X: &str = "adobe:ns:meta/";

    /// URI for a schema prefix.
    pub fn uri(prefix: &str) -> Option<&'static str> {
        match prefix {
            "dc" => Some("http://purl.org/dc/elements/1.1/"),
            "xmp" => Some("http://ns.adobe.com/xap/1.0/"),
            "xmpRights" => Some("http://ns.adobe.com/xap/1.0/rights/"),
            "xmpMM" => Some("http://ns.adobe.com/xap/1.0/mm/"),
            "xmpBJ" => Some("http://ns.adobe.com/xap/1.0/bj/"),
            "xmpGImg" => Some("http://ns.adobe.com/xap/1.0/g/img/"),
            "photoshop" => Some("http://ns.adobe.com/photoshop/1.0/"),
            "exif" => Some("http://ns.adobe.com/exif/1.0/"),
            "tiff" => Some("http://ns.adobe.com/tiff/1.0/"),
            "aux" => Some("http://ns.adobe.com/exif/1.0/aux/"),
            "crs" => Some("http://ns.adobe.com/camera-raw-settings/1.0/"),
            "Iptc4xmpCore" => Some("http://iptc.org/std/Iptc4xmpCore/1.0/xmlns/"),
            "Iptc4xmpExt" => Some("http://iptc.org/std/Iptc4xmpExt/2008-02-29/"),
            "stRef" => Some("http://ns.adobe.com/xap/1.0/sType/ResourceRef#"),
            "stEvt" => Some("http://ns.adobe.com/xap/1.0/sType/ResourceEvent#"),
            _ => None,
        }
    }
}

//! Maker-note signature dispatch.
//!
//! Tag 0x927c carries a vendor-private sub-format. Detection is by
//! byte signature at the start of the payload, tried in registry
//! order; the Make tag breaks ties for vendors that ship a bare IFD
//! with no signature at all. Unknown payloads get a best-effort bare
//! IFD parse; if that fails the note stays an opaque byte block.

use super::reader::IfdKind;
use pixmeta_core::ByteOrder;

/// How to read one vendor's note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MakerDispatch {
    /// The payload embeds a complete TIFF stream at `header_offset`;
    /// all offsets inside are relative to that header.
    NestedTiff { kind: IfdKind, header_offset: usize },
    /// A bare IFD at `ifd_offset` into the payload, value offsets
    /// absolute within the parent TIFF stream.
    AbsoluteIfd {
        kind: IfdKind,
        ifd_offset: usize,
        byte_order: Option<ByteOrder>,
    },
    /// Leave the payload as raw bytes.
    Opaque,
}

struct Signature {
    /// Bytes expected at payload offset 0; empty matches anything.
    magic: &'static [u8],
    /// Make-tag prefix fallback for signature-less vendors.
    make_prefix: &'static str,
    resolve: fn(&[u8]) -> MakerDispatch,
}

/// Registry, tried in order.
static REGISTRY: &[Signature] = &[
    Signature {
        magic: b"Nikon\0",
        make_prefix: "",
        resolve: resolve_nikon,
    },
    Signature {
        magic: b"SONY DSC \0\0\0",
        make_prefix: "",
        resolve: resolve_sony,
    },
    Signature {
        magic: b"",
        make_prefix: "Canon",
        resolve: resolve_canon,
    },
];

fn resolve_nikon(payload: &[u8]) -> MakerDispatch {
    // "Nikon\0" + u16 version + 0x00 0x00, then a complete TIFF
    // header; this is the type-3 note every DSLR since the D100 uses.
    if payload.len() > 10 + 8 {
        MakerDispatch::NestedTiff {
            kind: IfdKind::MakerNikon,
            header_offset: 10,
        }
    } else {
        MakerDispatch::Opaque
    }
}

fn resolve_sony(_payload: &[u8]) -> MakerDispatch {
    // 12 signature bytes, then an IFD in the parent's byte order.
    MakerDispatch::AbsoluteIfd {
        kind: IfdKind::MakerSony,
        ifd_offset: 12,
        byte_order: None,
    }
}

fn resolve_canon(_payload: &[u8]) -> MakerDispatch {
    // Canon notes have no header at all.
    MakerDispatch::AbsoluteIfd {
        kind: IfdKind::MakerCanon,
        ifd_offset: 0,
        byte_order: None,
    }
}

/// Pick the handler for a note payload.
pub fn dispatch(payload: &[u8], make: &str) -> MakerDispatch {
    if payload.is_empty() {
        return MakerDispatch::Opaque;
    }
    for sig in REGISTRY {
        let magic_ok = !sig.magic.is_empty() && payload.starts_with(sig.magic);
        let make_ok = !sig.make_prefix.is_empty()
            && make.trim_start().starts_with(sig.make_prefix);
        if magic_ok || make_ok {
            return (sig.resolve)(payload);
        }
    }
    // Unknown vendor: attempt a bare IFD in the parent byte order.
    // The caller treats a failed parse as non-fatal.
    MakerDispatch::AbsoluteIfd {
        kind: IfdKind::MakerCanon,
        ifd_offset: 0,
        byte_order: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nikon_signature_selects_nested_tiff() {
        let mut payload = b"Nikon\0\x02\x10\0\0".to_vec();
        payload.extend_from_slice(&[0x4d, 0x4d, 0x00, 0x2a, 0, 0, 0, 8, 0, 0]);
        assert_eq!(
            dispatch(&payload, "NIKON CORPORATION"),
            MakerDispatch::NestedTiff {
                kind: IfdKind::MakerNikon,
                header_offset: 10
            }
        );
    }

    #[test]
    fn sony_signature_skips_twelve_bytes() {
        let payload = b"SONY DSC \0\0\0rest".to_vec();
        assert_eq!(
            dispatch(&payload, "SONY"),
            MakerDispatch::AbsoluteIfd {
                kind: IfdKind::MakerSony,
                ifd_offset: 12,
                byte_order: None
            }
        );
    }

    #[test]
    fn canon_matches_on_make() {
        let payload = [0u8; 16];
        assert_eq!(
            dispatch(&payload, "Canon"),
            MakerDispatch::AbsoluteIfd {
                kind: IfdKind::MakerCanon,
                ifd_offset: 0,
                byte_order: None
            }
        );
    }

    #[test]
    fn truncated_nikon_is_opaque() {
        assert_eq!(dispatch(b"Nikon\0\x02", "NIKON"), MakerDispatch::Opaque);
    }
}

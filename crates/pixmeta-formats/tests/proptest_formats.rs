//! Property tests: parsers must never panic on hostile input, and
//! allocation stays bounded by the stream size.

use pixmeta_formats::tiff::TiffReader;
use pixmeta_formats::{handler_for, ImageState};
use proptest::prelude::*;

proptest! {
    #[test]
    fn tiff_reader_never_panics(data in prop::collection::vec(any::<u8>(), 0..2048)) {
        let _ = TiffReader::parse(&data);
    }

    #[test]
    fn tiff_reader_with_valid_header_never_panics(
        body in prop::collection::vec(any::<u8>(), 0..1024),
        big_endian in any::<bool>(),
    ) {
        let mut data = if big_endian {
            vec![0x4d, 0x4d, 0x00, 0x2a]
        } else {
            vec![0x49, 0x49, 0x2a, 0x00]
        };
        data.extend_from_slice(&8u32.to_le_bytes());
        data.extend_from_slice(&body);
        let _ = TiffReader::parse(&data);
    }

    #[test]
    fn iptc_decoder_never_panics(data in prop::collection::vec(any::<u8>(), 0..1024)) {
        let _ = pixmeta_iptc::IptcParser::decode(&data);
    }

    #[test]
    fn handlers_never_panic_on_sniffed_garbage(
        prefix in prop::sample::select(vec![
            vec![0xff, 0xd8, 0xff],
            vec![0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a],
            b"8BPS\x00\x01".to_vec(),
            b"RIFF\x00\x01\x00\x00WEBP".to_vec(),
            b"II\x2a\x00".to_vec(),
        ]),
        body in prop::collection::vec(any::<u8>(), 0..512),
    ) {
        let mut data = prefix;
        data.extend_from_slice(&body);
        if let Some(handler) = handler_for(&data) {
            let mut state = ImageState::default();
            let _ = handler.read_metadata(&data, &mut state);
        }
    }

    #[test]
    fn value_sizes_stay_bounded(data in prop::collection::vec(any::<u8>(), 0..4096)) {
        // No single decoded value may exceed the stream size; the
        // allocation guard runs before the bytes are copied.
        if let Ok(parsed) = TiffReader::parse(&data) {
            for datum in parsed.exif.iter() {
                prop_assert!(datum.value.size() <= data.len() + 16);
            }
        }
    }
}

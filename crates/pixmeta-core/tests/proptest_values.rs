//! Property-based tests for the primitive codec and value model.
//!
//! The codec law: for every byte order B and primitive type T,
//! read_T(write_T(v, B), B) == v.

use pixmeta_core::{ByteOrder, SRational, TypeId, URational, Value};
use proptest::prelude::*;

fn orders() -> impl Strategy<Value = ByteOrder> {
    prop_oneof![Just(ByteOrder::Little), Just(ByteOrder::Big)]
}

proptest! {
    #[test]
    fn u16_codec_round_trip(v in any::<u16>(), order in orders()) {
        let mut buf = Vec::new();
        order.write_u16(&mut buf, v);
        prop_assert_eq!(order.read_u16([buf[0], buf[1]]), v);
    }

    #[test]
    fn u32_codec_round_trip(v in any::<u32>(), order in orders()) {
        let mut buf = Vec::new();
        order.write_u32(&mut buf, v);
        prop_assert_eq!(order.read_u32([buf[0], buf[1], buf[2], buf[3]]), v);
    }

    #[test]
    fn u64_codec_round_trip(v in any::<u64>(), order in orders()) {
        let mut buf = Vec::new();
        order.write_u64(&mut buf, v);
        let mut arr = [0u8; 8];
        arr.copy_from_slice(&buf);
        prop_assert_eq!(order.read_u64(arr), v);
    }

    #[test]
    fn f64_codec_round_trip(v in any::<f64>().prop_filter("finite", |x| x.is_finite()), order in orders()) {
        let mut buf = Vec::new();
        order.write_f64(&mut buf, v);
        let mut arr = [0u8; 8];
        arr.copy_from_slice(&buf);
        prop_assert_eq!(order.read_f64(arr), v);
    }

    #[test]
    fn short_value_round_trip(vals in prop::collection::vec(any::<u16>(), 1..16), order in orders()) {
        let value = Value::Short(vals);
        let bytes = value.to_bytes(order);
        let back = Value::read(TypeId::UnsignedShort, &bytes, order).unwrap();
        prop_assert_eq!(back, value);
    }

    #[test]
    fn rational_value_round_trip(
        pairs in prop::collection::vec((any::<u32>(), any::<u32>()), 1..8),
        order in orders()
    ) {
        let value = Value::Rational(pairs.into_iter().map(|(n, d)| URational::new(n, d)).collect());
        let bytes = value.to_bytes(order);
        let back = Value::read(TypeId::UnsignedRational, &bytes, order).unwrap();
        prop_assert_eq!(back, value);
    }

    #[test]
    fn srational_value_round_trip(
        pairs in prop::collection::vec((any::<i32>(), any::<i32>()), 1..8),
        order in orders()
    ) {
        let value = Value::SRational(pairs.into_iter().map(|(n, d)| SRational::new(n, d)).collect());
        let bytes = value.to_bytes(order);
        let back = Value::read(TypeId::SignedRational, &bytes, order).unwrap();
        prop_assert_eq!(back, value);
    }

    #[test]
    fn long8_value_round_trip(vals in prop::collection::vec(any::<u64>(), 1..8), order in orders()) {
        let value = Value::Long8(vals);
        let bytes = value.to_bytes(order);
        let back = Value::read(TypeId::UnsignedLong8, &bytes, order).unwrap();
        prop_assert_eq!(back, value);
    }

    #[test]
    fn value_read_never_panics(
        type_raw in 1u16..20,
        data in prop::collection::vec(any::<u8>(), 0..256),
        order in orders()
    ) {
        if let Ok(type_id) = TypeId::from_u16(type_raw) {
            let _ = Value::read(type_id, &data, order);
        }
    }

    #[test]
    fn conversions_never_panic(
        num in any::<i32>(),
        den in any::<i32>(),
    ) {
        let value = Value::SRational(vec![SRational::new(num, den)]);
        let _ = value.to_i64(0);
        let _ = value.to_u32(0);
        let _ = value.to_f64(0);
        let _ = value.to_rational(0);
    }
}

mod conversion_laws {
    use super::*;

    #[test]
    fn ascii_identity() {
        let v = Value::Ascii("A photo caption".into());
        assert_eq!(v.to_string(), "A photo caption");
    }

    #[test]
    fn int_to_rational() {
        for n in [0u32, 1, 7, 65535] {
            let v = Value::Long(vec![n]);
            assert_eq!(v.to_rational(0), Some(SRational::new(n as i32, 1)));
        }
    }
}

//! Byte-exact wire format scenarios.

mod common;

use bitproto::codec;
use bitproto::value::Value;

#[test]
fn packs_five_sub_byte_fields_into_four_bytes() {
    let (ws, proto) = common::compile_ok(
        r#"
proto demo

message M {
    uint3 a = 1
    uint3 b = 2
    uint5 c = 3
    uint4 d = 4
    uint11 e = 5
    uint6 f = 6
}
"#,
    );
    let mid = ws.find_message_by_name(proto, "M").unwrap();
    let mut value = Value::zero_message(mid, &ws);
    {
        let mv = value.as_message_mut();
        *mv.field_mut(0) = Value::Uint(7);
        *mv.field_mut(1) = Value::Uint(7);
        *mv.field_mut(2) = Value::Uint(31);
        *mv.field_mut(3) = Value::Uint(15);
        *mv.field_mut(4) = Value::Uint(2047);
        *mv.field_mut(5) = Value::Uint(63);
    }

    let bytes = codec::encode_message(&ws, mid, &value);
    assert_eq!(bytes, vec![0xFF, 0xFF, 0xFF, 0xFF]);

    let decoded = codec::decode_message(&ws, mid, &bytes);
    let mv = decoded.as_message();
    assert_eq!(mv.field(0), &Value::Uint(7));
    assert_eq!(mv.field(1), &Value::Uint(7));
    assert_eq!(mv.field(2), &Value::Uint(31));
    assert_eq!(mv.field(3), &Value::Uint(15));
    assert_eq!(mv.field(4), &Value::Uint(2047));
    assert_eq!(mv.field(5), &Value::Uint(63));
}

#[test]
fn enum_value_round_trips_as_its_raw_backing_integer() {
    let (ws, proto) = common::compile_ok(
        r#"
proto demo

enum C : uint3 {
    U = 0
    R = 1
    G = 2
    B = 3
}

message E {
    C c = 1
}
"#,
    );
    let mid = ws.find_message_by_name(proto, "E").unwrap();
    let mut value = Value::zero_message(mid, &ws);
    *value.as_message_mut().field_mut(0) = Value::Enum(3);

    let bytes = codec::encode_message(&ws, mid, &value);
    assert_eq!(bytes, vec![0x03]);

    let decoded = codec::decode_message(&ws, mid, &bytes);
    assert_eq!(decoded.as_message().field(0), &Value::Enum(3));
}

#[test]
fn a_uint32_field_spans_a_byte_boundary_it_does_not_start_on() {
    let (ws, proto) = common::compile_ok(
        r#"
proto demo

message S {
    uint3 a = 1
    uint32 b = 2
}
"#,
    );
    let mid = ws.find_message_by_name(proto, "S").unwrap();
    let mut value = Value::zero_message(mid, &ws);
    {
        let mv = value.as_message_mut();
        *mv.field_mut(0) = Value::Uint(5);
        *mv.field_mut(1) = Value::Uint(0xDEADBEEF);
    }

    let bytes = codec::encode_message(&ws, mid, &value);
    assert_eq!(bytes.len(), 5);

    let decoded = codec::decode_message(&ws, mid, &bytes);
    let mv = decoded.as_message();
    assert_eq!(mv.field(0), &Value::Uint(5));
    assert_eq!(mv.field(1), &Value::Uint(0xDEADBEEF));
}

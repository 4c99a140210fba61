//! Sign-extension and array-of-signed-integer scenarios.

mod common;

use bitproto::codec;
use bitproto::value::Value;

#[test]
fn negative_and_zero_int24_array_elements_round_trip() {
    let (ws, proto) = common::compile_ok(
        r#"
proto demo

message N {
    int24[2] p = 1
}
"#,
    );
    let mid = ws.find_message_by_name(proto, "N").unwrap();
    let mut value = Value::zero_message(mid, &ws);
    *value.as_message_mut().field_mut(0) = Value::Array(vec![Value::Int(-11), Value::Int(0)]);

    let bytes = codec::encode_message(&ws, mid, &value);
    assert_eq!(bytes, vec![0xF5, 0xFF, 0xFF, 0x00, 0x00, 0x00]);

    let decoded = codec::decode_message(&ws, mid, &bytes);
    match decoded.as_message().field(0) {
        Value::Array(items) => {
            assert_eq!(items[0], Value::Int(-11));
            assert_eq!(items[1], Value::Int(0));
        }
        other => panic!("expected array, got {other:?}"),
    }
}

#[test]
fn a_negative_value_sets_every_bit_above_its_declared_width() {
    let (ws, proto) = common::compile_ok(
        r#"
proto demo

message M {
    int5 a = 1
}
"#,
    );
    let mid = ws.find_message_by_name(proto, "M").unwrap();
    let mut value = Value::zero_message(mid, &ws);
    *value.as_message_mut().field_mut(0) = Value::Int(-1);

    let bytes = codec::encode_message(&ws, mid, &value);
    // Five 1-bits at the low end of the single byte.
    assert_eq!(bytes, vec![0b0001_1111]);

    let decoded = codec::decode_message(&ws, mid, &bytes);
    assert_eq!(decoded.as_message().field(0), &Value::Int(-1));
}

#[test]
fn the_most_negative_value_at_a_width_round_trips() {
    let (ws, proto) = common::compile_ok(
        r#"
proto demo

message M {
    int8 a = 1
}
"#,
    );
    let mid = ws.find_message_by_name(proto, "M").unwrap();
    let mut value = Value::zero_message(mid, &ws);
    *value.as_message_mut().field_mut(0) = Value::Int(-128);

    let bytes = codec::encode_message(&ws, mid, &value);
    assert_eq!(bytes, vec![0x80]);

    let decoded = codec::decode_message(&ws, mid, &bytes);
    assert_eq!(decoded.as_message().field(0), &Value::Int(-128));
}

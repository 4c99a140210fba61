//! The extensibility protocol: length-prefixed skip/pad compatibility
//! between producer and consumer schema versions, and nested extensible
//! messages.

mod common;

use bitproto::codec;
use bitproto::value::Value;

#[test]
fn a_v1_consumer_reading_v2s_longer_output_ignores_the_trailing_field() {
    let (v2_ws, v2_proto) = common::compile_ok(
        r#"
proto demo

message P' {
    uint8 a = 1
    uint8 b = 2
}
"#,
    );
    let v2_mid = v2_ws.find_message_by_name(v2_proto, "P").unwrap();
    let mut v2_value = Value::zero_message(v2_mid, &v2_ws);
    {
        let mv = v2_value.as_message_mut();
        *mv.field_mut(0) = Value::Uint(0x12);
        *mv.field_mut(1) = Value::Uint(0x34);
    }
    let bytes = codec::encode_message(&v2_ws, v2_mid, &v2_value);
    assert_eq!(bytes, vec![0x10, 0x00, 0x12, 0x34]);

    let (v1_ws, v1_proto) = common::compile_ok(
        r#"
proto demo

message P' {
    uint8 a = 1
}
"#,
    );
    let v1_mid = v1_ws.find_message_by_name(v1_proto, "P").unwrap();
    let decoded = codec::decode_message(&v1_ws, v1_mid, &bytes);
    assert_eq!(decoded.as_message().field(0), &Value::Uint(0x12));
}

#[test]
fn a_v2_consumer_reading_v1s_shorter_output_zero_fills_the_new_field() {
    let (v1_ws, v1_proto) = common::compile_ok(
        r#"
proto demo

message P' {
    uint8 a = 1
}
"#,
    );
    let v1_mid = v1_ws.find_message_by_name(v1_proto, "P").unwrap();
    let mut v1_value = Value::zero_message(v1_mid, &v1_ws);
    *v1_value.as_message_mut().field_mut(0) = Value::Uint(0x12);
    let bytes = codec::encode_message(&v1_ws, v1_mid, &v1_value);
    assert_eq!(bytes, vec![0x08, 0x00, 0x12]);

    let (v2_ws, v2_proto) = common::compile_ok(
        r#"
proto demo

message P' {
    uint8 a = 1
    uint8 b = 2
}
"#,
    );
    let v2_mid = v2_ws.find_message_by_name(v2_proto, "P").unwrap();
    let decoded = codec::decode_message(&v2_ws, v2_mid, &bytes);
    let mv = decoded.as_message();
    assert_eq!(mv.field(0), &Value::Uint(0x12));
    assert_eq!(mv.field(1), &Value::Uint(0));
}

#[test]
fn an_extensible_message_nested_inside_a_plain_one_packs_contiguously() {
    let (ws, proto) = common::compile_ok(
        r#"
proto demo

message Middle' {
    bool x = 1
}

message Outer {
    Middle m = 1
    uint7 tail = 2
}
"#,
    );
    let mid = ws.find_message_by_name(proto, "Outer").unwrap();
    let middle_id = ws.find_message_by_name(proto, "Middle").unwrap();
    let mut value = Value::zero_message(mid, &ws);
    {
        let mv = value.as_message_mut();
        let mut middle = Value::zero_message(middle_id, &ws);
        *middle.as_message_mut().field_mut(0) = Value::Bool(true);
        *mv.field_mut(0) = middle;
        *mv.field_mut(1) = Value::Uint(127);
    }

    let bytes = codec::encode_message(&ws, mid, &value);
    assert_eq!(bytes, vec![0x01, 0x00, 0xFF]);

    let decoded = codec::decode_message(&ws, mid, &bytes);
    let mv = decoded.as_message();
    assert_eq!(mv.field(0).as_message().field(0), &Value::Bool(true));
    assert_eq!(mv.field(1), &Value::Uint(127));
}

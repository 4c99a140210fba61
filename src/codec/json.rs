//! Canonical JSON formatting (§4.2, observable side product): walks the
//! same descriptor graph the codec decodes against and writes compact
//! JSON into a caller-supplied `String`, returning the byte count written.
//! No intermediate per-field buffers — every write lands directly in the
//! caller's buffer via [`std::fmt::Write`].

use std::fmt::Write;

use crate::ir::{MessageId, Type, Workspace};
use crate::value::Value;

/// Formats `value` (shaped like message `id`) as JSON, appending to `out`.
/// Returns the number of bytes appended.
pub fn format_message(ws: &Workspace, id: MessageId, value: &Value, out: &mut String) -> usize {
    let start = out.len();
    write_value(&Type::Message(id), value, ws, out);
    out.len() - start
}

fn write_value(ty: &Type, value: &Value, ws: &Workspace, out: &mut String) {
    match ty {
        Type::Bool => {
            out.push_str(if matches!(value, Value::Bool(true)) { "true" } else { "false" });
        }
        Type::Byte => {
            if let Value::Byte(v) = value {
                let _ = write!(out, "{v}");
            }
        }
        Type::Uint(_) => {
            if let Value::Uint(v) = value {
                let _ = write!(out, "{v}");
            }
        }
        Type::Int(_) => {
            if let Value::Int(v) = value {
                let _ = write!(out, "{v}");
            }
        }
        // Enums round-trip as their raw numeric value (§9: no widening,
        // no name lookup at codec time).
        Type::Enum(_) => {
            if let Value::Enum(v) = value {
                let _ = write!(out, "{v}");
            }
        }
        Type::Alias(id) => write_value(&ws.alias_def(*id).target, value, ws, out),
        Type::Array(arr) => {
            out.push('[');
            for (i, item) in value.as_array().iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_value(&arr.element, item, ws, out);
            }
            out.push(']');
        }
        Type::Message(id) => {
            out.push('{');
            let def = ws.message_def(*id);
            let mv = value.as_message();
            for (i, field) in def.fields.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                let _ = write!(out, "\"{}\":", field.name);
                write_value(&field.ty, mv.field(i), ws, out);
            }
            out.push('}');
        }
    }
}

#[cfg(test)]
mod test {
    use std::path::Path;

    use super::*;
    use crate::analyze::analyze_file;
    use crate::diagnostic::Diagnostics;
    use crate::ir::MessageId;

    fn compile(src: &str, message: &str) -> (Workspace, MessageId) {
        let ast_file = bitproto_parser::parse(src).expect("source should parse");
        let mut ws = Workspace::new();
        let mut diags = Diagnostics::new();
        let proto_id = analyze_file(&ast_file, Path::new("test.bitproto"), Vec::new(), &mut ws, &mut diags);
        assert!(!diags.has_errors(), "unexpected compile errors: {:#?}", diags.iter().collect::<Vec<_>>());
        let mid = ws.find_message_by_name(proto_id, message).expect("message should resolve");
        (ws, mid)
    }

    #[test]
    fn formats_fields_in_declaration_order_not_wire_order() {
        let (ws, mid) = compile(
            r#"
proto demo

enum Color : uint2 {
    RED = 0
    GREEN = 1
}

message Point {
    int16 x = 2
    int16 y = 1
    Color tint = 3
}
"#,
            "Point",
        );
        let value = Value::zero(&Type::Message(mid), &ws);
        let mut out = String::new();
        format_message(&ws, mid, &value, &mut out);
        assert_eq!(out, r#"{"x":0,"y":0,"tint":0}"#);
    }

    #[test]
    fn formats_arrays_and_resolves_aliases_transparently() {
        let (ws, mid) = compile(
            r#"
proto demo

type Id = uint8

message Tag {
    Id[3] ids = 1
}
"#,
            "Tag",
        );
        let mut value = Value::zero(&Type::Message(mid), &ws);
        if let Value::Array(items) = value.as_message_mut().field_mut(0) {
            items[0] = Value::Uint(7);
            items[1] = Value::Uint(8);
            items[2] = Value::Uint(9);
        }
        let mut out = String::new();
        format_message(&ws, mid, &value, &mut out);
        assert_eq!(out, r#"{"ids":[7,8,9]}"#);
    }
}

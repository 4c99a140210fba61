//! The generic runtime value tree the codec encodes/decodes against.
//!
//! The schema IR (`ir::Type`) describes shapes; `Value` holds data of that
//! shape. A host program builds a `Value` to encode, or hands the codec a
//! zeroed `Value` (built via [`Value::zero`]) to decode into — mirroring
//! the spec's requirement that callers pre-zero both ends.

use crate::ir::{MessageId, Type, Workspace};

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Uint(u64),
    Int(i64),
    Byte(u8),
    /// An enum's numeric value. Not validated against the backing enum's
    /// declared members (§4.2: unknown enum values round-trip).
    Enum(i64),
    Array(Vec<Value>),
    Message(MessageValue),
}

/// Field values in declaration order, matching `MessageDef::fields`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MessageValue {
    pub fields: Vec<Value>,
}

impl MessageValue {
    pub fn field(&self, index: usize) -> &Value {
        &self.fields[index]
    }

    pub fn field_mut(&mut self, index: usize) -> &mut Value {
        &mut self.fields[index]
    }
}

impl Value {
    /// Builds a value of `ty`'s shape with every leaf at its zero value —
    /// the precondition the codec's decode path relies on for OR-based
    /// sub-byte deposits (§4.2).
    pub fn zero(ty: &Type, ws: &Workspace) -> Value {
        match ty {
            Type::Bool => Value::Bool(false),
            Type::Uint(_) => Value::Uint(0),
            Type::Int(_) => Value::Int(0),
            Type::Byte => Value::Byte(0),
            Type::Enum(_) => Value::Enum(0),
            Type::Alias(id) => Value::zero(&ws.alias_def(*id).target, ws),
            Type::Array(arr) => Value::Array(
                std::iter::repeat_with(|| Value::zero(&arr.element, ws))
                    .take(arr.cap as usize)
                    .collect(),
            ),
            Type::Message(id) => Value::zero_message(*id, ws),
        }
    }

    pub fn zero_message(id: MessageId, ws: &Workspace) -> Value {
        let def = ws.message_def(id);
        Value::Message(MessageValue {
            fields: def.fields.iter().map(|f| Value::zero(&f.ty, ws)).collect(),
        })
    }

    pub fn as_message(&self) -> &MessageValue {
        match self {
            Value::Message(m) => m,
            _ => panic!("value is not a message"),
        }
    }

    pub fn as_message_mut(&mut self) -> &mut MessageValue {
        match self {
            Value::Message(m) => m,
            _ => panic!("value is not a message"),
        }
    }

    pub fn as_array(&self) -> &[Value] {
        match self {
            Value::Array(items) => items,
            _ => panic!("value is not an array"),
        }
    }

    pub fn as_array_mut(&mut self) -> &mut Vec<Value> {
        match self {
            Value::Array(items) => items,
            _ => panic!("value is not an array"),
        }
    }
}

//! The descriptor-driven codec core (C6): bit-exact encode/decode of a
//! [`Value`] against an [`ir::Type`], plus JSON formatting. Every entry
//! point here is synchronous and single-threaded (§5): one call runs to
//! completion against a caller-owned buffer and `Value`, no shared state.
//!
//! The spec threads one `ctx` carrying a direction flag, bit cursor and
//! buffer pointer through every call. Rust's aliasing rules make an
//! encode-or-decode buffer awkward to share behind one flag, so this is
//! split into [`EncodeCtx`] (owns `&mut [u8]`) and [`DecodeCtx`] (owns
//! `&[u8]`) — the direction lives in which one you're holding rather than
//! in a boolean field, everything else (`i`, the bit cursor) matches.

pub mod copy_bits;
pub mod extend;
pub mod json;

use log::trace;

use copy_bits::copy_bits;

use crate::descriptor;
use crate::ir::{ArrayType, MessageId, Type, Workspace};
use crate::value::Value;

pub struct EncodeCtx<'a> {
    pub buf: &'a mut [u8],
    pub i: u32,
}

pub struct DecodeCtx<'a> {
    pub buf: &'a [u8],
    pub i: u32,
}

/// Encodes `value` — expected to be shaped like message `id` — into a
/// freshly allocated, zeroed buffer sized to its declared byte width.
/// Encoding always writes the full current schema's payload; extensible
/// prefixes reflect this process's own `nbits`/capacity, which is what
/// "producer" means from the encoding side (§4.3).
pub fn encode_message(ws: &Workspace, id: MessageId, value: &Value) -> Vec<u8> {
    let mut buf = vec![0u8; ws.message_def(id).byte_size() as usize];
    let mut ctx = EncodeCtx { buf: &mut buf, i: 0 };
    encode_message_fields(id, value, ws, &mut ctx);
    buf
}

/// Decodes a value shaped like message `id` out of `bytes`. `bytes` only
/// needs to hold as many bits as the entity actually encoded; an
/// extensible message whose producer wrote fewer fields than this schema
/// declares simply leaves the rest at their zero value.
pub fn decode_message(ws: &Workspace, id: MessageId, bytes: &[u8]) -> Value {
    let mut value = Value::zero_message(id, ws);
    let mut ctx = DecodeCtx { buf: bytes, i: 0 };
    decode_message_fields(id, &mut value, ws, &mut ctx);
    value
}

fn encode_value(ty: &Type, value: &Value, ws: &Workspace, ctx: &mut EncodeCtx) {
    match ty {
        Type::Bool => {
            let b = matches!(value, Value::Bool(true));
            debug_assert_eq!(descriptor::scalar_scratch_len(ty, ws), 1);
            encode_scalar(1, &[b as u8], ctx);
        }
        Type::Byte => {
            let v = match value {
                Value::Byte(v) => *v,
                other => unreachable!("expected Byte value, got {other:?}"),
            };
            debug_assert_eq!(descriptor::scalar_scratch_len(ty, ws), 1);
            encode_scalar(8, &[v], ctx);
        }
        Type::Uint(n) => {
            let v = match value {
                Value::Uint(v) => *v,
                other => unreachable!("expected Uint value, got {other:?}"),
            };
            debug_assert_eq!(descriptor::scalar_scratch_len(ty, ws), 8);
            encode_scalar(*n as u32, &v.to_le_bytes(), ctx);
        }
        Type::Int(n) => {
            let v = match value {
                Value::Int(v) => *v,
                other => unreachable!("expected Int value, got {other:?}"),
            };
            debug_assert_eq!(descriptor::scalar_scratch_len(ty, ws), 8);
            encode_scalar(*n as u32, &(v as u64).to_le_bytes(), ctx);
        }
        Type::Enum(id) => {
            let bits = ws.enum_def(*id).backing_bits as u32;
            let v = match value {
                Value::Enum(v) => *v,
                other => unreachable!("expected Enum value, got {other:?}"),
            };
            debug_assert_eq!(descriptor::scalar_scratch_len(ty, ws), 8);
            encode_scalar(bits, &(v as u64).to_le_bytes(), ctx);
        }
        Type::Alias(id) => encode_value(&ws.alias_def(*id).target, value, ws, ctx),
        Type::Array(arr) => encode_array(arr, value, ws, ctx),
        Type::Message(id) => encode_message_fields(*id, value, ws, ctx),
    }
}

fn encode_scalar(n: u32, scratch: &[u8], ctx: &mut EncodeCtx) {
    copy_bits(n, ctx.buf, scratch, ctx.i, 0);
    ctx.i += n;
}

fn encode_array(arr: &ArrayType, value: &Value, ws: &Workspace, ctx: &mut EncodeCtx) {
    if arr.extensible {
        extend::write_prefix(ctx.buf, ctx.i, arr.cap);
        ctx.i += extend::PREFIX_BITS;
    }
    trace!(
        "encoding array of {} element(s), fast-path eligible: {}",
        value.as_array().len(),
        descriptor::array_fast_path_eligible(&arr.element, ws)
    );
    for item in value.as_array() {
        encode_value(&arr.element, item, ws, ctx);
    }
}

fn encode_message_fields(id: MessageId, value: &Value, ws: &Workspace, ctx: &mut EncodeCtx) {
    let def = ws.message_def(id);
    if def.extensible {
        extend::write_prefix(ctx.buf, ctx.i, def.payload_bits() as u16);
        ctx.i += extend::PREFIX_BITS;
    }
    let mv = value.as_message();
    for (idx, field) in def.fields_in_wire_order_indexed() {
        encode_value(&field.ty, mv.field(idx), ws, ctx);
    }
}

fn decode_value(ty: &Type, value: &mut Value, ws: &Workspace, ctx: &mut DecodeCtx) {
    match ty {
        Type::Bool => {
            debug_assert_eq!(descriptor::scalar_scratch_len(ty, ws), 1);
            let mut scratch = [0u8; 1];
            copy_bits(1, &mut scratch, ctx.buf, 0, ctx.i);
            ctx.i += 1;
            *value = Value::Bool(scratch[0] != 0);
        }
        Type::Byte => {
            debug_assert_eq!(descriptor::scalar_scratch_len(ty, ws), 1);
            let mut scratch = [0u8; 1];
            copy_bits(8, &mut scratch, ctx.buf, 0, ctx.i);
            ctx.i += 8;
            *value = Value::Byte(scratch[0]);
        }
        Type::Uint(n) => {
            debug_assert_eq!(descriptor::scalar_scratch_len(ty, ws), 8);
            let bits = *n as u32;
            let mut scratch = [0u8; 8];
            copy_bits(bits, &mut scratch, ctx.buf, 0, ctx.i);
            ctx.i += bits;
            *value = Value::Uint(u64::from_le_bytes(scratch));
        }
        Type::Int(n) => {
            debug_assert_eq!(descriptor::scalar_scratch_len(ty, ws), 8);
            let bits = *n as u32;
            let mut scratch = [0u8; 8];
            copy_bits(bits, &mut scratch, ctx.buf, 0, ctx.i);
            ctx.i += bits;
            *value = Value::Int(sign_extend(u64::from_le_bytes(scratch), bits));
        }
        Type::Enum(id) => {
            debug_assert_eq!(descriptor::scalar_scratch_len(ty, ws), 8);
            let bits = ws.enum_def(*id).backing_bits as u32;
            let mut scratch = [0u8; 8];
            copy_bits(bits, &mut scratch, ctx.buf, 0, ctx.i);
            ctx.i += bits;
            *value = Value::Enum(u64::from_le_bytes(scratch) as i64);
        }
        Type::Alias(id) => decode_value(&ws.alias_def(*id).target, value, ws, ctx),
        Type::Array(arr) => decode_array(arr, value, ws, ctx),
        Type::Message(id) => decode_message_fields(*id, value, ws, ctx),
    }
}

/// Sign-extends a raw `n`-bit field, read into the low bits of `raw`, to a
/// full `i64` (§4.2). Unlike the spec's storage-width-`W` wording we always
/// extend to 64 bits rather than stopping at the smallest covering width —
/// `Value::Int` is an `i64` regardless of declared width, so this is the
/// canonical form that type already needs.
fn sign_extend(raw: u64, n: u32) -> i64 {
    if n >= 64 {
        return raw as i64;
    }
    let sign_bit = (raw >> (n - 1)) & 1;
    if sign_bit == 1 {
        (raw | !((1u64 << n) - 1)) as i64
    } else {
        raw as i64
    }
}

fn decode_array(arr: &ArrayType, value: &mut Value, ws: &Workspace, ctx: &mut DecodeCtx) {
    trace!(
        "decoding array of {} element(s), fast-path eligible: {}",
        value.as_array().len(),
        descriptor::array_fast_path_eligible(&arr.element, ws)
    );
    if arr.extensible {
        let ahead = extend::read_prefix(ctx.buf, ctx.i) as u32;
        ctx.i += extend::PREFIX_BITS;
        let guard = extend::SkipGuard::new(ctx.i, ahead * arr.element.nbits(ws));
        for item in value.as_array_mut().iter_mut() {
            if guard.producer_exhausted(ctx.i) {
                break;
            }
            decode_value(&arr.element, item, ws, ctx);
        }
        guard.finish(&mut ctx.i);
    } else {
        for item in value.as_array_mut().iter_mut() {
            decode_value(&arr.element, item, ws, ctx);
        }
    }
}

fn decode_message_fields(id: MessageId, value: &mut Value, ws: &Workspace, ctx: &mut DecodeCtx) {
    let def = ws.message_def(id);
    let order = def.fields_in_wire_order_indexed();
    if def.extensible {
        let ahead = extend::read_prefix(ctx.buf, ctx.i) as u32;
        ctx.i += extend::PREFIX_BITS;
        let guard = extend::SkipGuard::new(ctx.i, ahead);
        let mv = value.as_message_mut();
        for (idx, field) in order {
            if guard.producer_exhausted(ctx.i) {
                break;
            }
            decode_value(&field.ty, mv.field_mut(idx), ws, ctx);
        }
        guard.finish(&mut ctx.i);
    } else {
        let mv = value.as_message_mut();
        for (idx, field) in order {
            decode_value(&field.ty, mv.field_mut(idx), ws, ctx);
        }
    }
}

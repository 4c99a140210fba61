//! Runtime descriptor queries (§3.2): the resolved schema IR (`ir::Type`,
//! addressed through a [`Workspace`]) already *is* the descriptor graph the
//! codec drives itself from — no separate representation is built. What
//! lives here are derived classifications the codec and a future
//! straight-line lowering (§9: "both must be supported") need but that
//! don't belong on the IR itself.

use crate::ir::{Type, Workspace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseKind {
    Bool,
    Byte,
    Uint(u8),
    Int(u8),
    Composite,
}

/// Resolves through `Enum`/`Alias` indirection to the concrete base kind
/// backing `ty`.
pub fn base_kind(ty: &Type, ws: &Workspace) -> BaseKind {
    match ty {
        Type::Bool => BaseKind::Bool,
        Type::Byte => BaseKind::Byte,
        Type::Uint(n) => BaseKind::Uint(*n),
        Type::Int(n) => BaseKind::Int(*n),
        Type::Enum(id) => BaseKind::Uint(ws.enum_def(*id).backing_bits),
        Type::Alias(id) => base_kind(&ws.alias_def(*id).target, ws),
        Type::Array(_) | Type::Message(_) => BaseKind::Composite,
    }
}

/// One of the widths `copy_bits`'s aligned fast path reads/writes whole.
pub fn is_standard_width(n: u32) -> bool {
    matches!(n, 8 | 16 | 32 | 64)
}

/// Whether `element` qualifies for the array-of-base-integers optimization
/// (§4.2): a `Byte`/`Uint`/`Int`/`Enum` (or alias of one) at a standard
/// width. Purely advisory — the interpreter here always walks elements
/// individually, since a [`crate::value::Value`] tree has no flat memory
/// layout to exploit; this is the seam a straight-line lowering would use.
pub fn array_fast_path_eligible(element: &Type, ws: &Workspace) -> bool {
    match base_kind(element, ws) {
        BaseKind::Byte => true,
        BaseKind::Uint(n) | BaseKind::Int(n) => is_standard_width(n as u32),
        BaseKind::Bool | BaseKind::Composite => false,
    }
}

/// Number of bytes a scalar value's native little-endian scratch buffer
/// needs so that [`crate::codec::copy_bits::copy_bits`]'s aligned fast
/// paths never run out of room: the storage width in bytes for integer
/// kinds, one byte for `Bool`/`Byte`.
pub fn scalar_scratch_len(ty: &Type, ws: &Workspace) -> usize {
    match base_kind(ty, ws) {
        BaseKind::Bool | BaseKind::Byte => 1,
        BaseKind::Uint(_) | BaseKind::Int(_) => 8,
        BaseKind::Composite => unreachable!("scalar_scratch_len called on a composite type"),
    }
}

//! Name resolution (§4.1): scope chains and the dotted-path lookup algorithm.
//!
//! A reference is resolved by walking the nearest enclosing message scope
//! outward to the proto's top level, then — for a dotted path whose first
//! segment names an import alias — into the imported proto. A local
//! declaration always wins over an import alias of the same name; the
//! collision itself is flagged separately as a lint warning, not an error.

use bitproto_parser::ast::Ident;

use crate::ir::{ConstValue, EnumId, MessageId, AliasId, ProtoId, Workspace};

#[derive(Debug, Clone)]
pub enum Symbol {
    Message(MessageId),
    Enum(EnumId),
    Alias(AliasId),
    Const(ConstValue),
}

/// The lexical context a name is resolved in: the proto it's written in,
/// plus the chain of enclosing messages from innermost to outermost.
#[derive(Debug, Clone)]
pub struct ScopeChain {
    pub proto: ProtoId,
    pub messages: Vec<MessageId>,
}

impl ScopeChain {
    pub fn top_level(proto: ProtoId) -> Self {
        ScopeChain {
            proto,
            messages: Vec::new(),
        }
    }

    /// Returns the scope chain for a child scope nested one level deeper.
    pub fn nested(&self, message: MessageId) -> Self {
        let mut messages = Vec::with_capacity(self.messages.len() + 1);
        messages.push(message);
        messages.extend_from_slice(&self.messages);
        ScopeChain {
            proto: self.proto,
            messages,
        }
    }
}

fn lookup_nested(ws: &Workspace, message: MessageId, name: &str) -> Option<Symbol> {
    let m = ws.message_def(message);
    if let Some(id) = m
        .nested_messages
        .iter()
        .copied()
        .find(|id| ws.message_def(*id).name == name)
    {
        return Some(Symbol::Message(id));
    }
    if let Some(id) = m
        .nested_enums
        .iter()
        .copied()
        .find(|id| ws.enum_def(*id).name == name)
    {
        return Some(Symbol::Enum(id));
    }
    if let Some(id) = m
        .nested_aliases
        .iter()
        .copied()
        .find(|id| ws.alias_def(*id).name == name)
    {
        return Some(Symbol::Alias(id));
    }
    if let Some(c) = m.nested_consts.iter().find(|c| c.name == name) {
        return Some(Symbol::Const(c.value.clone()));
    }
    None
}

pub fn lookup_top_level(ws: &Workspace, proto: ProtoId, name: &str) -> Option<Symbol> {
    let p = ws.proto(proto);
    if let Some(id) = p
        .top_level_messages
        .iter()
        .copied()
        .find(|id| ws.message_def(*id).name == name)
    {
        return Some(Symbol::Message(id));
    }
    if let Some(id) = p
        .top_level_enums
        .iter()
        .copied()
        .find(|id| ws.enum_def(*id).name == name)
    {
        return Some(Symbol::Enum(id));
    }
    if let Some(id) = p
        .top_level_aliases
        .iter()
        .copied()
        .find(|id| ws.alias_def(*id).name == name)
    {
        return Some(Symbol::Alias(id));
    }
    if let Some(c) = p.consts.iter().find(|c| c.name == name) {
        return Some(Symbol::Const(c.value.clone()));
    }
    None
}

/// Resolves a bare (unqualified) name, walking the scope chain from the
/// innermost enclosing message outward to the proto's top level.
pub fn resolve_unqualified(ws: &Workspace, scope: &ScopeChain, name: &str) -> Option<Symbol> {
    for &message in &scope.messages {
        if let Some(sym) = lookup_nested(ws, message, name) {
            return Some(sym);
        }
    }
    lookup_top_level(ws, scope.proto, name)
}

/// True if `name` is the alias of an import visible from `proto`.
pub fn import_alias(ws: &Workspace, proto: ProtoId, name: &str) -> Option<ProtoId> {
    ws.proto(proto)
        .imports
        .iter()
        .find(|im| im.alias == name)
        .map(|im| im.proto)
}

/// Resolves a possibly-dotted reference (`Foo`, `Outer.Inner`, or
/// `alias.Outer.Inner`) from `scope`. Local declarations take priority over
/// an import alias sharing the first segment's name.
pub fn resolve_path(ws: &Workspace, scope: &ScopeChain, path: &[Ident]) -> Result<Symbol, String> {
    let first = path[0].as_str();
    let local_first = resolve_unqualified(ws, scope, first);

    let (mut current, mut rest) = if let Some(sym) = local_first {
        (sym, &path[1..])
    } else if let Some(target_proto) = import_alias(ws, scope.proto, first) {
        if path.len() < 2 {
            return Err(format!("`{first}` names an import, not a value"));
        }
        let sym = lookup_top_level(ws, target_proto, path[1].as_str())
            .ok_or_else(|| format!("`{}` is not declared in the imported proto", path[1].as_str()))?;
        (sym, &path[2..])
    } else {
        return Err(format!("unresolved name `{first}`"));
    };

    for seg in rest.iter() {
        current = match current {
            Symbol::Message(mid) => lookup_nested(ws, mid, seg.as_str())
                .ok_or_else(|| format!("`{}` has no member `{}`", ws.message_def(mid).name, seg.as_str()))?,
            _ => return Err(format!("`{}` cannot be qualified further", seg.as_str())),
        };
    }
    rest = &[];
    let _ = rest;
    Ok(current)
}

//! Semantic analysis (C4): turns one parsed [`ProtoFile`] into resolved IR
//! entries inside a shared [`Workspace`].
//!
//! Declarations are processed in two passes so that forward references
//! work: pass one declares every message/enum/alias (so any name used
//! anywhere else in the file already has an id), pass two fills in field
//! types, alias targets and constant values, which need the scope chain to
//! be fully populated first. Constants are the exception — they're folded
//! inline during pass two, in declaration order, so a constant may refer to
//! one declared earlier in the same scope but not to one declared later.

pub mod const_eval;
pub mod lint;
pub mod symbols;
pub mod types;

use std::collections::HashSet;
use std::path::Path;

use bitproto_parser::ast::{
    AliasDecl, EnumDecl, Literal, MessageDecl, MessageItem, OptionDecl, ProtoFile, Item,
};

use crate::diagnostic::{Diagnostic, DiagnosticKind, Diagnostics};
use crate::ir::{
    AliasDef, ConstDef, ConstValue, EnumDef, EnumId, EnumValue, Field, ImportedProto, MessageDef,
    MessageId, OptionValue, ProtoId, Type, Workspace,
};
use symbols::{resolve_unqualified, ScopeChain, Symbol};

/// Declares and defines one already-parsed proto file into `ws`, returning
/// its id. Every import this file refers to must already be resolved and
/// present in `ws` (that's C3's job, see [`crate::resolve`]), since field
/// and alias types may reference imported declarations.
pub fn analyze_file(
    ast_file: &ProtoFile,
    path: &Path,
    imports: Vec<ImportedProto>,
    ws: &mut Workspace,
    diags: &mut Diagnostics,
) -> ProtoId {
    let proto_id = ws.alloc_proto(ast_file.name.as_str().to_string(), path.to_path_buf());
    ws.proto_mut(proto_id).imports = imports;

    for item in &ast_file.items {
        declare_top_item(item, proto_id, ws, path, diags);
    }

    let scope = ScopeChain::top_level(proto_id);
    let mut midx = 0usize;
    let mut aidx = 0usize;
    for item in &ast_file.items {
        match item {
            Item::Message(m) => {
                let mid = ws.proto(proto_id).top_level_messages[midx];
                midx += 1;
                define_message(mid, m, &scope, ws, path, diags);
            }
            Item::Alias(a) => {
                let aid = ws.proto(proto_id).top_level_aliases[aidx];
                aidx += 1;
                define_alias(aid, a, &scope, ws, path, diags);
            }
            Item::Const(c) => {
                if let Some(v) = const_eval::eval(&c.expr, &scope, ws, diags, path, c.name.pos) {
                    ws.proto_mut(proto_id).consts.push(ConstDef {
                        name: c.name.as_str().to_string(),
                        value: v,
                    });
                }
            }
            Item::Option(o) => apply_proto_option(proto_id, o, &scope, ws, path, diags),
            Item::Enum(_) | Item::Import(_) => {}
        }
    }

    proto_id
}

fn declare_top_item(item: &Item, proto: ProtoId, ws: &mut Workspace, file: &Path, diags: &mut Diagnostics) {
    match item {
        Item::Message(m) => {
            let id = declare_message(m, proto, None, ws, file, diags);
            ws.proto_mut(proto).top_level_messages.push(id);
        }
        Item::Enum(e) => {
            let id = build_enum(e, proto, None, ws, file, diags);
            ws.proto_mut(proto).top_level_enums.push(id);
        }
        Item::Alias(a) => {
            let id = ws.alloc_alias(AliasDef {
                id: Default::default(),
                name: a.name.as_str().to_string(),
                proto,
                parent: None,
                target: Type::Bool,
            });
            ws.proto_mut(proto).top_level_aliases.push(id);
        }
        Item::Const(_) | Item::Option(_) | Item::Import(_) => {}
    }
}

fn declare_message_item(
    item: &MessageItem,
    proto: ProtoId,
    parent: MessageId,
    ws: &mut Workspace,
    file: &Path,
    diags: &mut Diagnostics,
) {
    match item {
        MessageItem::Message(m) => {
            let id = declare_message(m, proto, Some(parent), ws, file, diags);
            ws.message_def_mut(parent).nested_messages.push(id);
        }
        MessageItem::Enum(e) => {
            let id = build_enum(e, proto, Some(parent), ws, file, diags);
            ws.message_def_mut(parent).nested_enums.push(id);
        }
        MessageItem::Alias(a) => {
            let id = ws.alloc_alias(AliasDef {
                id: Default::default(),
                name: a.name.as_str().to_string(),
                proto,
                parent: Some(parent),
                target: Type::Bool,
            });
            ws.message_def_mut(parent).nested_aliases.push(id);
        }
        MessageItem::Field(_) | MessageItem::Const(_) | MessageItem::Option(_) => {}
    }
}

fn declare_message(
    m: &MessageDecl,
    proto: ProtoId,
    parent: Option<MessageId>,
    ws: &mut Workspace,
    file: &Path,
    diags: &mut Diagnostics,
) -> MessageId {
    let id = ws.alloc_message(MessageDef {
        id: Default::default(),
        name: m.name.as_str().to_string(),
        proto,
        parent,
        extensible: m.extensible,
        fields: Vec::new(),
        max_bytes: None,
        nbits: 0,
        nested_messages: Vec::new(),
        nested_enums: Vec::new(),
        nested_aliases: Vec::new(),
        nested_consts: Vec::new(),
    });
    for item in &m.items {
        declare_message_item(item, proto, id, ws, file, diags);
    }
    id
}

fn build_enum(
    e: &EnumDecl,
    proto: ProtoId,
    parent: Option<MessageId>,
    ws: &mut Workspace,
    file: &Path,
    diags: &mut Diagnostics,
) -> EnumId {
    let backing_bits = match &e.backing.kind {
        bitproto_parser::ast::TypeKind::Uint(n) => *n,
        _ => {
            diags.push(Diagnostic::error(
                file,
                e.backing.pos,
                DiagnosticKind::Type,
                "an enum's backing type must be an unsigned integer",
            ));
            8
        }
    };
    if e.backing.extensible {
        diags.push(Diagnostic::error(
            file,
            e.backing.pos,
            DiagnosticKind::Extensibility,
            "enums are not extensible",
        ));
    }

    let max_val: i64 = if backing_bits >= 63 { i64::MAX } else { (1i64 << backing_bits) - 1 };
    let mut values = Vec::with_capacity(e.values.len());
    let mut seen_names = HashSet::new();
    let mut seen_values = HashSet::new();
    for v in &e.values {
        if !(0..=max_val).contains(&v.value.value) {
            diags.push(Diagnostic::error(
                file,
                v.value.pos,
                DiagnosticKind::Type,
                format!(
                    "enum value {} is out of range for uint{}",
                    v.value.value, backing_bits
                ),
            ));
        }
        if !seen_names.insert(v.name.as_str()) {
            diags.push(Diagnostic::error(
                file,
                v.name.pos,
                DiagnosticKind::Name,
                format!("duplicate enum value name `{}`", v.name.as_str()),
            ));
        }
        if !seen_values.insert(v.value.value) {
            diags.push(Diagnostic::error(
                file,
                v.value.pos,
                DiagnosticKind::Type,
                format!("duplicate enum value {}", v.value.value),
            ));
        }
        values.push(EnumValue {
            name: v.name.as_str().to_string(),
            value: v.value.value,
        });
    }

    ws.alloc_enum(EnumDef {
        id: Default::default(),
        name: e.name.as_str().to_string(),
        proto,
        parent,
        backing_bits,
        values,
    })
}

fn define_message(
    mid: MessageId,
    m: &MessageDecl,
    scope: &ScopeChain,
    ws: &mut Workspace,
    file: &Path,
    diags: &mut Diagnostics,
) {
    let child_scope = scope.nested(mid);
    let mut midx = 0usize;
    let mut aidx = 0usize;
    let mut fields = Vec::new();
    let mut seen_numbers = HashSet::new();
    let mut seen_names = HashSet::new();
    let mut max_bytes: Option<u32> = None;

    for item in &m.items {
        match item {
            MessageItem::Field(f) => {
                let ty = types::resolve_type(&f.ty, &child_scope, ws, diags, file);
                let number_raw = f.number.value;
                let valid_number = (1..=255).contains(&number_raw);
                if !valid_number {
                    diags.push(Diagnostic::error(
                        file,
                        f.number.pos,
                        DiagnosticKind::Type,
                        format!("field number {number_raw} is out of range 1..255"),
                    ));
                }
                if !seen_numbers.insert(number_raw) {
                    diags.push(Diagnostic::error(
                        file,
                        f.number.pos,
                        DiagnosticKind::Type,
                        format!("duplicate field number {number_raw}"),
                    ));
                }
                if !seen_names.insert(f.name.as_str()) {
                    diags.push(Diagnostic::error(
                        file,
                        f.name.pos,
                        DiagnosticKind::Name,
                        format!("duplicate field name `{}`", f.name.as_str()),
                    ));
                }
                if let (Some(ty), true) = (ty, valid_number) {
                    fields.push(Field {
                        name: f.name.as_str().to_string(),
                        number: number_raw as u8,
                        ty,
                    });
                }
            }
            MessageItem::Message(child) => {
                let child_id = ws.message_def(mid).nested_messages[midx];
                midx += 1;
                define_message(child_id, child, &child_scope, ws, file, diags);
            }
            MessageItem::Alias(a) => {
                let child_id = ws.message_def(mid).nested_aliases[aidx];
                aidx += 1;
                define_alias(child_id, a, &child_scope, ws, file, diags);
            }
            MessageItem::Const(c) => {
                if let Some(v) = const_eval::eval(&c.expr, &child_scope, ws, diags, file, c.name.pos) {
                    ws.message_def_mut(mid).nested_consts.push(ConstDef {
                        name: c.name.as_str().to_string(),
                        value: v,
                    });
                }
            }
            MessageItem::Option(o) => {
                apply_message_option(o, &child_scope, ws, file, diags, &mut max_bytes);
            }
            MessageItem::Enum(_) => {}
        }
    }

    let nbits = {
        let payload_bits: u32 = fields.iter().map(|f| f.ty.nbits(ws)).sum();
        if m.extensible {
            payload_bits + 16
        } else {
            payload_bits
        }
    };
    if nbits > 65535 {
        diags.push(Diagnostic::error(
            file,
            bitproto_parser::ast::Pos { line: 0, column: 0 },
            DiagnosticKind::Type,
            format!("message `{}` is {nbits} bits wide, exceeding the 65535-bit limit", m.name.as_str()),
        ));
    }

    ws.message_def_mut(mid).fields = fields;
    ws.message_def_mut(mid).nbits = nbits;
    ws.message_def_mut(mid).max_bytes = max_bytes;

    if let Some(max_bytes) = max_bytes {
        let actual = ws.message_def(mid).byte_size();
        if actual > max_bytes {
            diags.push(Diagnostic::error(
                file,
                bitproto_parser::ast::Pos { line: 0, column: 0 },
                DiagnosticKind::Type,
                format!(
                    "message `{}` is {actual} bytes, exceeding its max_bytes option of {max_bytes}",
                    m.name.as_str()
                ),
            ));
        }
    }
}

fn define_alias(
    aid: crate::ir::AliasId,
    a: &AliasDecl,
    scope: &ScopeChain,
    ws: &mut Workspace,
    file: &Path,
    diags: &mut Diagnostics,
) {
    if let Some(target) = types::resolve_type(&a.target, scope, ws, diags, file) {
        if types::check_alias_target(&target, file, a.target.pos, diags) {
            ws.alias_def_mut(aid).target = target;
        }
    }
}

fn literal_to_option_value(
    lit: &Literal,
    scope: &ScopeChain,
    ws: &Workspace,
    file: &Path,
    pos: bitproto_parser::ast::Pos,
    diags: &mut Diagnostics,
) -> Option<OptionValue> {
    match lit {
        Literal::Int(v) => Some(OptionValue::Int(*v)),
        Literal::Bool(b) => Some(OptionValue::Bool(*b)),
        Literal::Str(s) => Some(OptionValue::Str(s.clone())),
        Literal::Ident(id) => match resolve_unqualified(ws, scope, id.as_str()) {
            Some(Symbol::Const(ConstValue::Int(v))) => Some(OptionValue::Int(v)),
            Some(Symbol::Const(ConstValue::Bool(b))) => Some(OptionValue::Bool(b)),
            Some(Symbol::Const(ConstValue::Str(s))) => Some(OptionValue::Str(s)),
            _ => {
                diags.push(Diagnostic::error(
                    file,
                    pos,
                    DiagnosticKind::Name,
                    format!("`{}` does not name a constant", id.as_str()),
                ));
                None
            }
        },
    }
}

fn apply_proto_option(
    proto: ProtoId,
    o: &OptionDecl,
    scope: &ScopeChain,
    ws: &mut Workspace,
    file: &Path,
    diags: &mut Diagnostics,
) {
    let key = o.name.iter().map(|i| i.as_str()).collect::<Vec<_>>().join(".");
    if let Some(value) = literal_to_option_value(&o.value, scope, ws, file, o.pos, diags) {
        ws.proto_mut(proto).options.insert(key, value);
    }
}

fn apply_message_option(
    o: &OptionDecl,
    scope: &ScopeChain,
    ws: &mut Workspace,
    file: &Path,
    diags: &mut Diagnostics,
    max_bytes: &mut Option<u32>,
) {
    if o.name.len() == 1 && o.name[0].as_str() == "max_bytes" {
        match literal_to_option_value(&o.value, scope, ws, file, o.pos, diags) {
            Some(OptionValue::Int(v)) if v >= 0 => *max_bytes = Some(v as u32),
            Some(_) => diags.push(Diagnostic::error(
                file,
                o.pos,
                DiagnosticKind::Type,
                "max_bytes must be a non-negative integer",
            )),
            None => {}
        }
    } else {
        let name = o.name.iter().map(|i| i.as_str()).collect::<Vec<_>>().join(".");
        diags.push(Diagnostic::error(
            file,
            o.pos,
            DiagnosticKind::Type,
            format!("unknown message option `{name}`"),
        ));
    }
}

//! Naming-convention and other non-fatal checks (§7: lints are warnings,
//! never errors). Run once a [`Workspace`] is fully resolved.

use crate::diagnostic::{Diagnostic, DiagnosticKind, Diagnostics};
use crate::ir::{EnumDef, MessageDef, ProtoId, Workspace};
use bitproto_parser::ast::Pos;

fn is_snake_case(s: &str) -> bool {
    !s.is_empty()
        && s.chars().next().unwrap().is_ascii_lowercase()
        && s.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

fn is_pascal_case(s: &str) -> bool {
    !s.is_empty()
        && s.chars().next().unwrap().is_ascii_uppercase()
        && s.chars().all(|c| c.is_ascii_alphanumeric())
}

fn is_upper_snake_case(s: &str) -> bool {
    !s.is_empty()
        && s.chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

fn warn(diags: &mut Diagnostics, file: &std::path::Path, name: &str, what: &str, convention: &str) {
    diags.push(Diagnostic::warning(
        file,
        Pos { line: 0, column: 0 },
        DiagnosticKind::Lint,
        format!("{what} `{name}` should be {convention}"),
    ));
}

fn lint_message(ws: &Workspace, m: &MessageDef, file: &std::path::Path, diags: &mut Diagnostics) {
    if !is_pascal_case(&m.name) {
        warn(diags, file, &m.name, "message", "PascalCase");
    }
    for f in &m.fields {
        if !is_snake_case(&f.name) {
            warn(diags, file, &f.name, "field", "snake_case");
        }
    }
    for c in &m.nested_consts {
        if !is_upper_snake_case(&c.name) {
            warn(diags, file, &c.name, "const", "UPPER_SNAKE_CASE");
        }
    }
    for &eid in &m.nested_enums {
        lint_enum(ws.enum_def(eid), file, diags);
    }
    for &mid in &m.nested_messages {
        lint_message(ws, ws.message_def(mid), file, diags);
    }
    for &aid in &m.nested_aliases {
        if !is_pascal_case(&ws.alias_def(aid).name) {
            warn(diags, file, &ws.alias_def(aid).name, "alias", "PascalCase");
        }
    }
}

fn lint_enum(e: &EnumDef, file: &std::path::Path, diags: &mut Diagnostics) {
    if !is_pascal_case(&e.name) {
        warn(diags, file, &e.name, "enum", "PascalCase");
    }
    for v in &e.values {
        if !is_upper_snake_case(&v.name) {
            warn(diags, file, &v.name, "enum value", "UPPER_SNAKE_CASE");
        }
    }
    if !e.values.iter().any(|v| v.value == 0) {
        diags.push(Diagnostic::warning(
            file,
            Pos { line: 0, column: 0 },
            DiagnosticKind::Lint,
            format!("enum `{}` does not define a zero value", e.name),
        ));
    }
}

/// Warns when a locally-declared name shadows a visible import alias:
/// resolution still favors the local name (§4.1), this only flags the
/// ambiguity for a human to notice.
fn lint_alias_collisions(ws: &Workspace, proto: ProtoId, diags: &mut Diagnostics) {
    let p = ws.proto(proto);
    let file = p.path.clone();
    for im in &p.imports {
        let collides = p.top_level_messages.iter().any(|id| ws.message_def(*id).name == im.alias)
            || p.top_level_enums.iter().any(|id| ws.enum_def(*id).name == im.alias)
            || p.top_level_aliases.iter().any(|id| ws.alias_def(*id).name == im.alias)
            || p.consts.iter().any(|c| c.name == im.alias);
        if collides {
            diags.push(Diagnostic::warning(
                &file,
                Pos { line: 0, column: 0 },
                DiagnosticKind::Lint,
                format!(
                    "top-level declaration `{}` shadows the import alias of the same name",
                    im.alias
                ),
            ));
        }
    }
}

pub fn lint_workspace(ws: &Workspace, diags: &mut Diagnostics) {
    for proto in &ws.protos {
        let file = proto.path.clone();
        if !is_snake_case(&proto.name) {
            warn(diags, &file, &proto.name, "proto", "snake_case");
        }
        for &mid in &proto.top_level_messages {
            lint_message(ws, ws.message_def(mid), &file, diags);
        }
        for &eid in &proto.top_level_enums {
            lint_enum(ws.enum_def(eid), &file, diags);
        }
        for &aid in &proto.top_level_aliases {
            if !is_pascal_case(&ws.alias_def(aid).name) {
                warn(diags, &file, &ws.alias_def(aid).name, "alias", "PascalCase");
            }
        }
        for c in &proto.consts {
            if !is_upper_snake_case(&c.name) {
                warn(diags, &file, &c.name, "const", "UPPER_SNAKE_CASE");
            }
        }
        lint_alias_collisions(ws, proto.id, diags);
    }
}

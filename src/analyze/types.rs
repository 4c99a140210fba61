//! Resolves a parsed [`TypeExpr`] into an [`ir::Type`] (C4): looks up named
//! references through the scope chain, evaluates array capacities, and
//! enforces the handful of type-level invariants from §3.1 that can be
//! checked locally (extensibility only on arrays/messages, alias targets
//! restricted to unnamed kinds).

use std::path::Path;

use bitproto_parser::ast::TypeKind;

use crate::analyze::const_eval;
use crate::analyze::symbols::{resolve_path, Symbol};
use crate::analyze::ScopeChain;
use crate::diagnostic::{Diagnostic, DiagnosticKind, Diagnostics};
use crate::ir::{ArrayType, Type, Workspace};

pub fn resolve_type(
    expr: &bitproto_parser::ast::TypeExpr,
    scope: &ScopeChain,
    ws: &Workspace,
    diags: &mut Diagnostics,
    file: &Path,
) -> Option<Type> {
    match &expr.kind {
        TypeKind::Bool => Some(Type::Bool),
        TypeKind::Byte => Some(Type::Byte),
        TypeKind::Uint(n) => Some(Type::Uint(*n)),
        TypeKind::Int(n) => Some(Type::Int(*n)),
        TypeKind::Named(path) => match resolve_path(ws, scope, path) {
            Ok(Symbol::Message(mid)) => {
                if expr.extensible && !ws.message_def(mid).extensible {
                    diags.push(Diagnostic::error(
                        file,
                        expr.pos,
                        DiagnosticKind::Extensibility,
                        format!(
                            "`{}` is referenced as extensible but its declaration isn't",
                            ws.message_def(mid).name
                        ),
                    ));
                }
                Some(Type::Message(mid))
            }
            Ok(Symbol::Enum(eid)) => {
                if expr.extensible {
                    diags.push(Diagnostic::error(
                        file,
                        expr.pos,
                        DiagnosticKind::Extensibility,
                        "enums are not extensible",
                    ));
                }
                Some(Type::Enum(eid))
            }
            Ok(Symbol::Alias(aid)) => {
                if expr.extensible {
                    diags.push(Diagnostic::error(
                        file,
                        expr.pos,
                        DiagnosticKind::Extensibility,
                        "an alias reference cannot itself be marked extensible",
                    ));
                }
                Some(Type::Alias(aid))
            }
            Ok(Symbol::Const(_)) => {
                diags.push(Diagnostic::error(
                    file,
                    expr.pos,
                    DiagnosticKind::Name,
                    "expected a type, found a constant",
                ));
                None
            }
            Err(msg) => {
                diags.push(Diagnostic::error(file, expr.pos, DiagnosticKind::Name, msg));
                None
            }
        },
        TypeKind::Array { element, cap } => {
            let element_ty = resolve_type(element, scope, ws, diags, file)?;
            let cap = const_eval::eval_int_in_range(
                cap,
                scope,
                ws,
                diags,
                file,
                expr.pos,
                1..=65535,
                "an array capacity",
            )? as u16;
            Some(Type::Array(Box::new(ArrayType {
                cap,
                element: element_ty,
                extensible: expr.extensible,
            })))
        }
    }
}

/// Alias targets are restricted to the unnamed value kinds (§3.1): `bool`,
/// `int`/`uint`, `byte` and arrays of those. Aliasing a message or enum is
/// rejected since an alias has no identity of its own to hang a definition
/// off of; aliasing another alias is rejected too — it isn't in §3.1's
/// allowed-target list, and forbidding it outright is what keeps `type A =
/// A` and longer alias-to-alias chains from ever reaching §4.1's
/// cycle-rejection rule in the first place, rather than needing a separate
/// visited-set walk to catch one. Returns `false` when `ty` was rejected, so
/// the caller can leave the alias's stored target untouched instead of
/// wiring up the very chain this function just flagged as invalid.
pub fn check_alias_target(ty: &Type, file: &Path, pos: bitproto_parser::ast::Pos, diags: &mut Diagnostics) -> bool {
    match ty {
        Type::Message(_) | Type::Enum(_) => {
            diags.push(Diagnostic::error(
                file,
                pos,
                DiagnosticKind::Type,
                "an alias cannot target a message or enum",
            ));
            false
        }
        Type::Alias(_) => {
            diags.push(Diagnostic::error(
                file,
                pos,
                DiagnosticKind::Type,
                "an alias cannot target another alias",
            ));
            false
        }
        Type::Array(arr) => check_alias_target(&arr.element, file, pos, diags),
        _ => true,
    }
}

//! Constant expression evaluation: `+ - * /`, parens and unary negation over
//! `i64`, plus bare bool/string/identifier literals. Division by zero is a
//! compile error, not a panic (§7, §8.1).

use std::path::Path;

use bitproto_parser::ast::{BinOp, ConstExpr, Pos};

use crate::analyze::symbols::{resolve_unqualified, Symbol};
use crate::analyze::ScopeChain;
use crate::diagnostic::{Diagnostic, DiagnosticKind, Diagnostics};
use crate::ir::{ConstValue, Workspace};

/// Evaluates a constant expression to a [`ConstValue`], reporting a
/// diagnostic and returning `None` on any failure (unresolved name, type
/// mismatch, division by zero) so callers can keep analyzing the rest of
/// the schema instead of aborting on the first bad constant.
pub fn eval(
    expr: &ConstExpr,
    scope: &ScopeChain,
    ws: &Workspace,
    diags: &mut Diagnostics,
    file: &Path,
    ctx_pos: Pos,
) -> Option<ConstValue> {
    let pos = |p: Pos| if p.line == 0 { ctx_pos } else { p };
    match expr {
        ConstExpr::Int(v) => Some(ConstValue::Int(*v)),
        ConstExpr::Bool(b) => Some(ConstValue::Bool(*b)),
        ConstExpr::Str(s) => Some(ConstValue::Str(s.clone())),
        ConstExpr::Ident(ident) => match resolve_unqualified(ws, scope, ident.as_str()) {
            Some(Symbol::Const(v)) => Some(v),
            Some(_) => {
                diags.push(Diagnostic::error(
                    file,
                    ident.pos,
                    DiagnosticKind::Name,
                    format!("`{}` is not a constant", ident.as_str()),
                ));
                None
            }
            None => {
                diags.push(Diagnostic::error(
                    file,
                    ident.pos,
                    DiagnosticKind::Name,
                    format!("unresolved name `{}`", ident.as_str()),
                ));
                None
            }
        },
        ConstExpr::Neg(inner, p) => match eval(inner, scope, ws, diags, file, ctx_pos)? {
            ConstValue::Int(v) => Some(ConstValue::Int(-v)),
            _ => {
                diags.push(Diagnostic::error(
                    file,
                    pos(*p),
                    DiagnosticKind::Type,
                    "cannot negate a non-integer constant",
                ));
                None
            }
        },
        ConstExpr::BinOp(op, lhs, rhs, p) => {
            let lv = eval(lhs, scope, ws, diags, file, ctx_pos)?;
            let rv = eval(rhs, scope, ws, diags, file, ctx_pos)?;
            match (lv, rv) {
                (ConstValue::Int(a), ConstValue::Int(b)) => match op {
                    BinOp::Add => Some(ConstValue::Int(a.wrapping_add(b))),
                    BinOp::Sub => Some(ConstValue::Int(a.wrapping_sub(b))),
                    BinOp::Mul => Some(ConstValue::Int(a.wrapping_mul(b))),
                    BinOp::Div => {
                        if b == 0 {
                            diags.push(Diagnostic::error(
                                file,
                                pos(*p),
                                DiagnosticKind::Type,
                                "division by zero in constant expression",
                            ));
                            None
                        } else {
                            Some(ConstValue::Int(a / b))
                        }
                    }
                },
                _ => {
                    diags.push(Diagnostic::error(
                        file,
                        pos(*p),
                        DiagnosticKind::Type,
                        "arithmetic on a constant expression requires integer operands",
                    ));
                    None
                }
            }
        }
    }
}

/// Evaluates a constant expression that is expected to produce an integer
/// within `range`, reporting a diagnostic for anything else. Used for array
/// capacities and enum/field numbers supplied via a `const`.
pub fn eval_int_in_range(
    expr: &ConstExpr,
    scope: &ScopeChain,
    ws: &Workspace,
    diags: &mut Diagnostics,
    file: &Path,
    ctx_pos: Pos,
    range: std::ops::RangeInclusive<i64>,
    what: &str,
) -> Option<i64> {
    match eval(expr, scope, ws, diags, file, ctx_pos)? {
        ConstValue::Int(v) if range.contains(&v) => Some(v),
        ConstValue::Int(v) => {
            diags.push(Diagnostic::error(
                file,
                ctx_pos,
                DiagnosticKind::Type,
                format!(
                    "{what} must be in {}..={}, got {}",
                    range.start(),
                    range.end(),
                    v
                ),
            ));
            None
        }
        _ => {
            diags.push(Diagnostic::error(
                file,
                ctx_pos,
                DiagnosticKind::Type,
                format!("{what} must be an integer constant"),
            ));
            None
        }
    }
}

//! Naming-convention lints: warnings, never compile errors.

mod common;

use bitproto::analyze::lint::lint_workspace;
use bitproto::diagnostic::Severity;

#[test]
fn a_snake_case_message_name_is_flagged_but_still_compiles() {
    let (ws, _proto, mut diags) = common::compile(
        r#"
proto demo

message not_pascal_case {
    bool Flag = 1
}
"#,
    );
    assert!(!diags.has_errors());
    lint_workspace(&ws, &mut diags);
    let warnings: Vec<_> = diags.iter().filter(|d| d.severity == Severity::Warning).collect();
    assert!(warnings.iter().any(|d| d.message.contains("not_pascal_case")));
    assert!(warnings.iter().any(|d| d.message.contains("Flag")));
}

#[test]
fn an_enum_with_no_zero_value_is_flagged() {
    let (ws, _proto, mut diags) = common::compile(
        r#"
proto demo

enum Status : uint2 {
    ONE = 1
    TWO = 2
}
"#,
    );
    assert!(!diags.has_errors());
    lint_workspace(&ws, &mut diags);
    assert!(diags
        .iter()
        .any(|d| d.severity == Severity::Warning && d.message.contains("does not define a zero value")));
}

#[test]
fn a_well_formed_schema_produces_no_lint_warnings() {
    let (ws, _proto, mut diags) = common::compile(
        r#"
proto demo

enum Color : uint2 {
    RED = 0
    GREEN = 1
    BLUE = 2
}

message Point {
    int16 x = 1
    int16 y = 2
    Color tint = 3
}
"#,
    );
    assert!(!diags.has_errors());
    lint_workspace(&ws, &mut diags);
    assert!(diags.iter().all(|d| d.severity != Severity::Warning), "unexpected warnings: {:#?}", diags.iter().collect::<Vec<_>>());
}

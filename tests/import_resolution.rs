//! Import resolution (C3): cycle detection and diamond-import reuse across
//! files actually read off disk, since `resolve::load_workspace` takes a
//! path rather than a source string.

use std::io::Write;

use bitproto::diagnostic::DiagnosticKind;
use bitproto::resolve::load_workspace;

fn temp_schema(name: &str, contents: &str) -> std::path::PathBuf {
    let path = std::env::temp_dir().join(name);
    let mut f = std::fs::File::create(&path).expect("create temp schema");
    f.write_all(contents.as_bytes()).expect("write temp schema");
    path
}

#[test]
fn a_mutual_import_cycle_is_a_compile_error_not_a_stack_overflow() {
    temp_schema(
        "bitproto_test_cycle_b.bitproto",
        r#"
proto b

import "bitproto_test_cycle_a.bitproto"
"#,
    );
    let a = temp_schema(
        "bitproto_test_cycle_a.bitproto",
        r#"
proto a

import "bitproto_test_cycle_b.bitproto"
"#,
    );

    let (_ws, diags, entry) = load_workspace(&a);
    assert!(diags.has_errors());
    assert!(diags
        .iter()
        .any(|d| d.kind == DiagnosticKind::Import && d.message.contains("cycle")));
    assert!(entry.is_some(), "the entry file itself still loads despite the cyclic import failing");
}

#[test]
fn a_diamond_import_loads_the_shared_file_once() {
    temp_schema(
        "bitproto_test_diamond_shared.bitproto",
        r#"
proto shared

message Point {
    int16 x = 1
    int16 y = 2
}
"#,
    );
    temp_schema(
        "bitproto_test_diamond_left.bitproto",
        r#"
proto left

import "bitproto_test_diamond_shared.bitproto"
"#,
    );
    temp_schema(
        "bitproto_test_diamond_right.bitproto",
        r#"
proto right

import "bitproto_test_diamond_shared.bitproto"
"#,
    );
    let entry_path = temp_schema(
        "bitproto_test_diamond_entry.bitproto",
        r#"
proto entry

import "bitproto_test_diamond_left.bitproto"
import "bitproto_test_diamond_right.bitproto"
"#,
    );

    let (_ws, diags, entry) = load_workspace(&entry_path);
    assert!(!diags.has_errors(), "unexpected diagnostics: {:#?}", diags.iter().collect::<Vec<_>>());
    assert!(entry.is_some());
}

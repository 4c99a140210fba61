use std::path::Path;

use bitproto::analyze::analyze_file;
use bitproto::diagnostic::Diagnostics;
use bitproto::ir::{ImportedProto, ProtoId, Workspace};

/// Parses and analyzes a single self-contained `.bitproto` source string,
/// with no import graph — every scenario test needs just one file.
pub fn compile(src: &str) -> (Workspace, ProtoId, Diagnostics) {
    let ast_file = bitproto_parser::parse(src).expect("source should parse");
    let mut ws = Workspace::new();
    let mut diags = Diagnostics::new();
    let imports: Vec<ImportedProto> = Vec::new();
    let proto_id = analyze_file(&ast_file, Path::new("test.bitproto"), imports, &mut ws, &mut diags);
    (ws, proto_id, diags)
}

/// Like [`compile`], but panics with every diagnostic printed if analysis
/// produced any compile error.
pub fn compile_ok(src: &str) -> (Workspace, ProtoId) {
    let (ws, proto_id, diags) = compile(src);
    let errors: Vec<String> = diags
        .iter()
        .filter(|d| d.is_error())
        .map(|d| d.to_string())
        .collect();
    assert!(errors.is_empty(), "unexpected compile errors: {errors:#?}");
    (ws, proto_id)
}

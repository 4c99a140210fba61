//! Import resolution (C3): loads a `.bitproto` file and, recursively,
//! everything it imports, before handing each off to [`crate::analyze`].
//!
//! Imports form a DAG; a file that (directly or transitively) imports
//! itself is a compile error rather than a stack overflow, tracked via the
//! `loading` stack below. A proto already fully loaded is reused rather
//! than re-parsed, so a diamond import only pays the parse cost once.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use bitproto_parser::ast::{Item, Pos};
use log::{debug, trace};

use crate::analyze::analyze_file;
use crate::diagnostic::{Diagnostic, DiagnosticKind, Diagnostics};
use crate::ir::{ImportedProto, ProtoId, Workspace};

struct Resolver<'a> {
    ws: &'a mut Workspace,
    diags: &'a mut Diagnostics,
    loaded: HashMap<PathBuf, ProtoId>,
    loading: Vec<PathBuf>,
}

impl<'a> Resolver<'a> {
    fn load(&mut self, path: &Path) -> Option<ProtoId> {
        let canon = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        if let Some(&id) = self.loaded.get(&canon) {
            trace!("reusing already-loaded proto `{}`", canon.display());
            return Some(id);
        }
        if self.loading.contains(&canon) {
            debug!("import cycle detected at `{}`", canon.display());
            self.diags.push(Diagnostic::error(
                path,
                Pos { line: 0, column: 0 },
                DiagnosticKind::Import,
                format!("import cycle detected at `{}`", path.display()),
            ));
            return None;
        }
        debug!("loading `{}`", canon.display());

        let source = match std::fs::read_to_string(path) {
            Ok(s) => s,
            Err(err) => {
                self.diags.push(Diagnostic::error(
                    path,
                    Pos { line: 0, column: 0 },
                    DiagnosticKind::Import,
                    format!("cannot read `{}`: {err}", path.display()),
                ));
                return None;
            }
        };
        let ast_file = match bitproto_parser::parse(&source) {
            Ok(f) => f,
            Err(err) => {
                self.diags.push(Diagnostic::error(
                    path,
                    Pos { line: 0, column: 0 },
                    DiagnosticKind::Syntactic,
                    err.to_string(),
                ));
                return None;
            }
        };

        self.loading.push(canon.clone());
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        let mut imports = Vec::new();
        for item in &ast_file.items {
            if let Item::Import(import) = item {
                let import_path = base_dir.join(&import.path);
                if let Some(proto_id) = self.load(&import_path) {
                    let alias = import
                        .alias
                        .map(|a| a.as_str().to_string())
                        .unwrap_or_else(|| default_alias(&import_path));
                    imports.push(ImportedProto {
                        alias,
                        proto: proto_id,
                    });
                }
            }
        }
        self.loading.pop();

        let proto_id = analyze_file(&ast_file, path, imports, self.ws, self.diags);
        self.loaded.insert(canon, proto_id);
        Some(proto_id)
    }
}

fn default_alias(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("import")
        .to_string()
}

/// Loads `entry` and its whole import graph into a fresh [`Workspace`].
/// Returns the entry proto's id alongside the workspace and any
/// diagnostics collected along the way; the caller decides whether
/// `diags.has_errors()` should stop further processing.
pub fn load_workspace(entry: &Path) -> (Workspace, Diagnostics, Option<ProtoId>) {
    let mut ws = Workspace::new();
    let mut diags = Diagnostics::new();
    let entry_id = {
        let mut resolver = Resolver {
            ws: &mut ws,
            diags: &mut diags,
            loaded: HashMap::new(),
            loading: Vec::new(),
        };
        resolver.load(entry)
    };
    (ws, diags, entry_id)
}

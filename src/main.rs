use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use colorful::Colorful;

use bitproto::codec;
use bitproto::ir::{MessageId, Workspace};
use bitproto::{analyze, error::Error as BitprotoError};

use crate::commands::{Cli, Command};
use crate::log::*;

mod commands;
mod log;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let level = if cli.verbose {
        Level::Debug
    } else if cli.quiet {
        Level::Warn
    } else {
        Level::Info
    };
    SimpleLogger::new().with_level(level).init().unwrap();

    match try_main(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{}", err);
            if level == Level::Debug {
                err.chain()
                    .skip(1)
                    .for_each(|cause| eprintln!("   {}", format!("- {}", cause).dark_gray()));
            }
            ExitCode::FAILURE
        }
    }
}

fn try_main(cli: Cli) -> Result<()> {
    match &cli.command {
        Command::Check { file } => run_check(file),
        Command::Layout { file, message } => run_layout(file, message),
        Command::Json { file, message, decode, encode } => run_json(file, message, *decode, *encode),
    }
}

/// Loads `path` and the whole of its import graph, reporting every
/// diagnostic to the logger. Returns the workspace plus the entry proto's
/// id on success; a schema with compile errors returns `Err` after the
/// diagnostics have already been printed.
fn load_and_report(path: &str) -> Result<(Workspace, bitproto::ir::ProtoId)> {
    let path_ref = Path::new(path);
    let (ws, mut diags, entry) = bitproto::load_workspace(path_ref);
    let entry = entry.ok_or_else(|| BitprotoError::Io {
        path: path_ref.to_path_buf(),
        source: std::io::Error::new(std::io::ErrorKind::NotFound, "could not load schema"),
    })?;

    analyze::lint::lint_workspace(&ws, &mut diags);

    let error_count = diags.iter().filter(|d| d.is_error()).count();
    for d in diags.iter() {
        match d.severity {
            bitproto::diagnostic::Severity::Error => error!("{d}"),
            bitproto::diagnostic::Severity::Warning => warn!("{d}"),
        }
    }
    if error_count > 0 {
        return Err(BitprotoError::CompileFailed {
            path: path_ref.to_path_buf(),
            count: error_count,
        }
        .into());
    }
    Ok((ws, entry))
}

fn run_check(file: &str) -> Result<()> {
    let (ws, entry) = load_and_report(file)?;
    let count = ws.proto(entry).top_level_messages.len()
        + ws.proto(entry).top_level_enums.len()
        + ws.proto(entry).top_level_aliases.len();
    info!(
        "{}",
        format!("{file} is valid ({count} top-level declaration(s))").bold()
    );
    Ok(())
}

fn find_message(ws: &Workspace, proto: bitproto::ir::ProtoId, name: &str) -> Result<MessageId> {
    ws.find_message_by_name(proto, name)
        .ok_or_else(|| BitprotoError::UnknownMessage(name.to_string()).into())
}

fn run_layout(file: &str, message: &str) -> Result<()> {
    let (ws, entry) = load_and_report(file)?;
    let mid = find_message(&ws, entry, message)?;
    let plan = bitproto::bitplan::plan_message(&ws, mid).context("could not plan layout")?;
    info!("layout for `{}` ({} bit(s) total):", message, plan.total_bits);
    for field in &plan.fields {
        println!("  {:<5} {:>5} bit(s)  {}", field.bit_offset, field.nbits, field.name);
    }
    Ok(())
}

fn run_json(file: &str, message: &str, decode: bool, encode: bool) -> Result<()> {
    let (ws, entry) = load_and_report(file)?;
    let mid = find_message(&ws, entry, message)?;

    let bytes = if encode && !decode {
        let zero = bitproto::value::Value::zero_message(mid, &ws);
        let bytes = codec::encode_message(&ws, mid, &zero);
        info!("`{}` encodes to {} byte(s): {:02x?}", message, bytes.len(), bytes);
        bytes
    } else {
        vec![0u8; ws.message_def(mid).byte_size() as usize]
    };

    let value = codec::decode_message(&ws, mid, &bytes);
    let mut out = String::new();
    codec::json::format_message(&ws, mid, &value, &mut out);
    println!("{out}");
    Ok(())
}

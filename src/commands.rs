use clap::{Parser, Subcommand};

/// Compile and inspect `.bitproto` schemas: fixed-size, bit-packed binary
/// message formats. `check` validates a schema and prints lint warnings;
/// `layout` prints one message's static bit-offset table; `json` round-trips
/// canonical JSON against a zero-filled buffer sized for one message.
#[derive(Parser, Debug)]
#[command(name = "bitproto", author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Print more information
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print errors and warnings
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Parse, resolve and analyze a schema file, printing lint warnings and
    /// failing on any compile error.
    Check {
        /// Path to the `.bitproto` file
        file: String,
    },
    /// Print the resolved bit-offset table for one message in a schema.
    Layout {
        /// Path to the `.bitproto` file
        file: String,
        /// Name of the message to lay out
        message: String,
    },
    /// Round-trip canonical JSON against a zero-filled buffer for one message.
    Json {
        /// Path to the `.bitproto` file
        file: String,
        /// Name of the message to format
        message: String,
        /// Print the decode of a freshly zero-filled buffer (the default)
        #[arg(long)]
        decode: bool,
        /// Encode a zero-valued message through the codec first, logging the
        /// produced bytes, then decode those bytes back for the JSON output
        #[arg(long)]
        encode: bool,
    },
}

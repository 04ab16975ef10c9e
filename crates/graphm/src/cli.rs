//! Clap CLI definitions for the `graphm` command.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use clap_complete::Shell;

/// graphm -- inspect Microsoft Graph payloads.
///
/// Decodes JSON payloads into typed Graph models, reports what was
/// recognised, and checks that re-encoding gives back the same document.
#[derive(Parser, Debug)]
#[command(
    name = "graphm",
    about = "Decode, inspect and round-trip Microsoft Graph payloads",
    version,
    propagate_version = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Global flags available to all subcommands.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Configuration file (default: nearest .graphm.yaml, or $GRAPHM_CONFIG).
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output in JSON format.
    #[arg(long, global = true)]
    pub json: bool,

    /// More logging on stderr (-v debug, -vv trace).
    #[arg(short = 'v', long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-essential output (errors only).
    #[arg(short = 'q', long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// All available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Decode one payload and describe the model it produced.
    Decode(DecodeArgs),

    /// Decode and re-encode payloads, reporting anything lost.
    Roundtrip(RoundtripArgs),

    /// Apply edits to a payload and print the result or a PATCH body.
    Edit(EditArgs),

    /// List registered model types.
    Types,

    /// Show or create the configuration file.
    Config(ConfigArgs),

    /// Generate shell completions.
    Completion(CompletionArgs),

    /// Print version information.
    Version,
}

/// How an input payload is matched to a model type.
#[derive(Args, Debug, Clone, Default)]
pub struct TypeArgs {
    /// Type used when the payload has no @odata.type (default from config).
    #[arg(short = 't', long = "type", value_name = "NAME")]
    pub type_name: Option<String>,

    /// Fail on discriminators that name no registered type.
    #[arg(long)]
    pub strict: bool,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Input file, or `-` for stdin.
    #[arg(default_value = "-")]
    pub input: String,

    #[command(flatten)]
    pub types: TypeArgs,
}

#[derive(Args, Debug)]
pub struct RoundtripArgs {
    /// Input file, or `-` for stdin.
    #[arg(default_value = "-")]
    pub input: String,

    /// Treat the input as one payload per line.
    #[arg(long)]
    pub jsonl: bool,

    #[command(flatten)]
    pub types: TypeArgs,
}

#[derive(Args, Debug)]
pub struct EditArgs {
    /// Input file, or `-` for stdin.
    #[arg(default_value = "-")]
    pub input: String,

    /// Set a property; the value is read as JSON, or as a string otherwise.
    #[arg(long = "set", value_name = "KEY=VALUE")]
    pub set: Vec<String>,

    /// Clear a property.
    #[arg(long = "unset", value_name = "KEY")]
    pub unset: Vec<String>,

    /// Print only changed properties (default from config `encode.changed-only`).
    #[arg(long)]
    pub changes: bool,

    #[command(flatten)]
    pub types: TypeArgs,
}

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the effective configuration.
    Show,

    /// Print the path of the configuration file in use.
    Path,

    /// Write a default .graphm.yaml in the current directory.
    Init {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

#[derive(Args, Debug)]
pub struct CompletionArgs {
    /// Target shell.
    #[arg(value_enum)]
    pub shell: Shell,
}

//! `graphm completion` -- generate shell completions.

use anyhow::Result;
use clap::CommandFactory;
use clap_complete::generate;

use crate::cli::{Cli, CompletionArgs};

/// Execute the `graphm completion` command.
pub fn run(args: &CompletionArgs) -> Result<()> {
    let mut cmd = Cli::command();
    generate(args.shell, &mut cmd, "graphm", &mut std::io::stdout());
    Ok(())
}

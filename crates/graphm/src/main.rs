//! `graphm` -- inspect and round-trip Microsoft Graph payloads.
//!
//! Parses CLI arguments with clap, loads the layered configuration, sets up
//! logging and dispatches to command handlers.

mod cli;
mod commands;
mod context;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use context::RuntimeContext;

fn main() {
    let cli = Cli::parse();

    let result = RuntimeContext::from_global_args(&cli.global).and_then(|ctx| {
        init_logging(&ctx);
        output::init_color(ctx.config.output.color);
        dispatch(&ctx, &cli)
    });

    // Handle errors: print message and exit with code 1
    if let Err(e) = result {
        if cli.global.json {
            let err_json = serde_json::json!({
                "error": format!("{:#}", e),
            });
            if let Ok(s) = serde_json::to_string_pretty(&err_json) {
                eprintln!("{s}");
            }
        } else {
            eprintln!("Error: {e:#}");
        }
        std::process::exit(1);
    }
}

/// Logs go to stderr; `RUST_LOG` overrides the configured level.
fn init_logging(ctx: &RuntimeContext) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(ctx.log_level()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn dispatch(ctx: &RuntimeContext, cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Some(Commands::Decode(args)) => commands::decode::run(ctx, args),
        Some(Commands::Roundtrip(args)) => commands::roundtrip::run(ctx, args),
        Some(Commands::Edit(args)) => commands::edit::run(ctx, args),
        Some(Commands::Types) => commands::types_cmd::run(ctx),
        Some(Commands::Config(args)) => commands::config_cmd::run(ctx, args),
        Some(Commands::Completion(args)) => commands::completion::run(args),
        Some(Commands::Version) => commands::version::run(ctx),
        None => {
            // No subcommand -- print help
            use clap::CommandFactory;
            Cli::command().print_help().ok();
            println!();
            Ok(())
        }
    }
}

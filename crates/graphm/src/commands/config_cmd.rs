//! `graphm config` -- show, locate or create the configuration file.

use anyhow::{Context, Result, bail};
use graph_config::{CONFIG_FILE_NAME, GraphConfig, save_config};
use serde_json::json;

use crate::cli::{ConfigArgs, ConfigCommands};
use crate::context::RuntimeContext;
use crate::output::{output_json, render_muted};

/// Execute the `graphm config` command.
pub fn run(ctx: &RuntimeContext, args: &ConfigArgs) -> Result<()> {
    match &args.command {
        ConfigCommands::Show => {
            if ctx.json {
                let value = serde_json::to_value(&ctx.config)?;
                output_json(&value, ctx.pretty())?;
            } else {
                print!("{}", ctx.config.to_yaml()?);
            }
        }

        ConfigCommands::Path => {
            let exists = ctx.config_path.as_ref().is_some_and(|p| p.is_file());
            if ctx.json {
                output_json(
                    &json!({
                        "path": ctx.config_path.as_ref().map(|p| p.display().to_string()),
                        "exists": exists,
                    }),
                    ctx.pretty(),
                )?;
            } else {
                match &ctx.config_path {
                    Some(path) if exists => println!("{}", path.display()),
                    Some(path) => println!(
                        "{} {}",
                        path.display(),
                        render_muted("(missing, using defaults)")
                    ),
                    None => println!("{}", render_muted("no config file, using defaults")),
                }
            }
        }

        ConfigCommands::Init { force } => {
            let path = std::env::current_dir()
                .context("cannot read current directory")?
                .join(CONFIG_FILE_NAME);
            if path.exists() && !force {
                bail!(
                    "{} already exists\nHint: pass --force to overwrite it",
                    path.display()
                );
            }
            save_config(&path, &GraphConfig::default())
                .with_context(|| format!("cannot write {}", path.display()))?;

            if ctx.json {
                output_json(&json!({"path": path.display().to_string()}), ctx.pretty())?;
            } else if !ctx.quiet {
                println!("Created {}", path.display());
            }
        }
    }

    Ok(())
}

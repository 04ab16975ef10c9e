//! Runtime context for command execution.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use graph_config::{GraphConfig, find_config_file, load_config};
use graph_models::registry::{self, TypeEntry};

use crate::cli::{GlobalArgs, TypeArgs};

/// State every command handler needs, built once in `main`.
#[derive(Debug)]
pub struct RuntimeContext {
    /// Effective configuration after file and environment layering.
    pub config: GraphConfig,

    /// The configuration file consulted, if any.
    pub config_path: Option<PathBuf>,

    pub json: bool,
    pub verbose: u8,
    pub quiet: bool,
}

impl RuntimeContext {
    /// Resolves the configuration file and loads it.
    ///
    /// `--config` wins over discovery. A discovered or named file that does
    /// not exist yields defaults.
    pub fn from_global_args(global: &GlobalArgs) -> Result<Self> {
        let config_path = match &global.config {
            Some(path) => Some(path.clone()),
            None => {
                let cwd = std::env::current_dir().context("cannot read current directory")?;
                find_config_file(&cwd)
            }
        };
        let config = load_config(config_path.as_deref()).with_context(|| match &config_path {
            Some(path) => format!("invalid configuration in {}", path.display()),
            None => "invalid configuration".to_string(),
        })?;

        Ok(Self {
            config,
            config_path,
            json: global.json,
            verbose: global.verbose,
            quiet: global.quiet,
        })
    }

    /// Log filter: `-q` and `-v` override the configured level.
    pub fn log_level(&self) -> &str {
        match (self.quiet, self.verbose) {
            (true, _) => "error",
            (false, 0) => &self.config.log.level,
            (false, 1) => "debug",
            (false, _) => "trace",
        }
    }

    /// The type used for payloads without a discriminator.
    pub fn fallback_type(&self, args: &TypeArgs) -> Result<&'static TypeEntry> {
        let name = args
            .type_name
            .as_deref()
            .unwrap_or(&self.config.decode.default_type);
        match registry::lookup(name) {
            Some(entry) => Ok(entry),
            None => bail!("unknown type '{name}' (see `graphm types`)"),
        }
    }

    pub fn strict(&self, args: &TypeArgs) -> bool {
        args.strict || self.config.decode.strict_discriminators
    }

    pub fn pretty(&self) -> bool {
        self.config.output.pretty
    }
}

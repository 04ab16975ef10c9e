//! Configuration for the `graphm` tool.
//!
//! Settings are read from a `.graphm.yaml` file, found by walking up from
//! the working directory, and can be overridden per key with
//! `GRAPHM_<SECTION>__<KEY>` environment variables.

pub mod config;
pub mod discovery;

pub use config::{
    ColorChoice, ConfigError, DecodeConfig, EncodeConfig, GraphConfig, LogConfig, OutputConfig,
    load_config, save_config,
};
pub use discovery::{CONFIG_ENV, CONFIG_FILE_NAME, find_config_file};

//! `graphm version` -- print the tool version and the model set it carries.

use anyhow::Result;
use graph_models::odata::GRAPH_API_VERSION;
use graph_models::registry;
use serde_json::{Value, json};

use crate::context::RuntimeContext;
use crate::output::{output_json, render_muted};

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn version_info() -> Value {
    let types = registry::types();
    json!({
        "version": VERSION,
        "graphApi": GRAPH_API_VERSION,
        "models": types.len(),
        "discriminators": types.iter().filter(|t| t.odata_type.is_some()).count(),
    })
}

/// Execute the `graphm version` command.
pub fn run(ctx: &RuntimeContext) -> Result<()> {
    let info = version_info();
    if ctx.json {
        return output_json(&info, ctx.pretty());
    }
    println!("graphm {VERSION}");
    println!(
        "{}",
        render_muted(&format!(
            "Graph {GRAPH_API_VERSION} models: {} types, {} discriminators",
            info["models"],
            info["discriminators"]
        ))
    );
    Ok(())
}

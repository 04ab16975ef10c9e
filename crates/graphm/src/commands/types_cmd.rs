//! `graphm types` -- list registered model types.

use anyhow::Result;
use graph_models::registry;
use serde_json::json;

use crate::context::RuntimeContext;
use crate::output::{output_json, render_accent, render_muted};

/// Execute the `graphm types` command.
pub fn run(ctx: &RuntimeContext) -> Result<()> {
    let types = registry::types();

    if ctx.json {
        let rows: Vec<_> = types
            .iter()
            .map(|t| json!({"name": t.name, "odataType": t.odata_type}))
            .collect();
        return output_json(&json!(rows), ctx.pretty());
    }

    let width = types.iter().map(|t| t.name.len()).max().unwrap_or(0);
    for entry in types {
        let padded = format!("{:width$}", entry.name);
        let odata = entry
            .odata_type
            .map_or_else(|| render_muted("(no discriminator)"), str::to_string);
        println!("{}  {}", render_accent(&padded), odata);
    }
    Ok(())
}

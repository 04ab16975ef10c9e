//! `graphm decode` -- decode one payload and describe the result.

use anyhow::{Context, Result};
use graph_core::json::to_json_value;
use graph_core::{
    ADDITIONAL_DATA_EDITS_KEY, ADDITIONAL_DATA_KEY, ODATA_TYPE_KEY, Parsable, StoreValue, accessor,
};
use graph_models::registry::parse_any;

use crate::cli::DecodeArgs;
use crate::context::RuntimeContext;
use crate::output::{output_json, read_json, render_accent, render_muted};

/// What decoding recognised in a payload.
#[derive(Debug, PartialEq)]
pub struct Summary {
    pub type_name: &'static str,
    pub odata_type: Option<String>,
    pub id: Option<String>,
    /// Typed, non-null properties.
    pub fields: usize,
    /// Properties kept as additional data.
    pub additional: Vec<String>,
}

impl Summary {
    pub fn of(model: &dyn Parsable) -> Self {
        let store = model.backing_store();
        let fields = store
            .enumerate()
            .into_iter()
            .filter(|(key, value)| {
                *key != ADDITIONAL_DATA_KEY
                    && *key != ADDITIONAL_DATA_EDITS_KEY
                    && *key != ODATA_TYPE_KEY
                    && !matches!(value, StoreValue::Null)
            })
            .count();
        Self {
            type_name: model.type_name(),
            odata_type: model.odata_type().map(str::to_owned),
            id: accessor::get_str(store, "id").map(str::to_owned),
            fields,
            additional: model
                .additional_data()
                .map(|data| data.keys().cloned().collect())
                .unwrap_or_default(),
        }
    }
}

/// Execute the `graphm decode` command.
pub fn run(ctx: &RuntimeContext, args: &DecodeArgs) -> Result<()> {
    let value = read_json(&args.input)?;
    let fallback = ctx.fallback_type(&args.types)?;
    let model = parse_any(&value, fallback.factory, ctx.strict(&args.types))
        .with_context(|| format!("cannot decode {}", args.input))?;

    if ctx.json {
        return output_json(&to_json_value(model.as_ref())?, ctx.pretty());
    }

    let summary = Summary::of(model.as_ref());
    let none = || render_muted("-");
    println!(
        "{}  {}",
        render_accent(summary.type_name),
        summary.odata_type.clone().unwrap_or_else(none)
    );
    println!("  id              {}", summary.id.clone().unwrap_or_else(none));
    println!("  fields          {}", summary.fields);
    if summary.additional.is_empty() {
        println!("  additionalData  {}", none());
    } else {
        println!("  additionalData  {}", summary.additional.join(", "));
    }
    Ok(())
}

//! `graphm edit` -- apply property edits to a decoded payload.
//!
//! Edits go through the model's own field decoders after decoding has
//! finished, so the backing store records them as changes. With
//! `--changes` (or `encode.changed-only`) the output is a PATCH body.

use anyhow::{Context, Result};
use graph_core::json::{to_changes_value, to_json_value};
use graph_core::parse::apply_field;
use graph_models::registry::parse_any;
use serde_json::Value;

use crate::cli::EditArgs;
use crate::context::RuntimeContext;
use crate::output::{output_json, read_json};

/// Splits `KEY=VALUE`; the value is JSON when it parses, a string otherwise.
pub fn parse_assignment(assignment: &str) -> Result<(&str, Value)> {
    let (key, raw) = assignment
        .split_once('=')
        .with_context(|| format!("expected KEY=VALUE, got '{assignment}'"))?;
    if key.is_empty() {
        anyhow::bail!("empty property name in '{assignment}'");
    }
    let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
    Ok((key, value))
}

/// Execute the `graphm edit` command.
pub fn run(ctx: &RuntimeContext, args: &EditArgs) -> Result<()> {
    let value = read_json(&args.input)?;
    let fallback = ctx.fallback_type(&args.types)?;
    let mut model = parse_any(&value, fallback.factory, ctx.strict(&args.types))
        .with_context(|| format!("cannot decode {}", args.input))?;

    for assignment in &args.set {
        let (key, value) = parse_assignment(assignment)?;
        apply_field(model.as_mut(), key, &value).with_context(|| format!("cannot set {key}"))?;
    }
    for key in &args.unset {
        apply_field(model.as_mut(), key, &Value::Null)
            .with_context(|| format!("cannot unset {key}"))?;
    }

    let output = if args.changes || ctx.config.encode.changed_only {
        to_changes_value(model.as_mut())?
    } else {
        to_json_value(model.as_ref())?
    };
    output_json(&output, ctx.pretty())
}

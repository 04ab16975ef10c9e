//! `graphm roundtrip` -- check that decode-then-encode keeps every value.
//!
//! Each payload is decoded with the registry, encoded again and compared
//! structurally with the input. Properties the encoder adds (such as the
//! discriminator a constructor sets) are reported but are not losses.

use anyhow::{Context, Result, bail};
use graph_core::diff::{Difference, json_diff};
use graph_core::json::to_json_value;
use graph_core::jsonl::read_jsonl_values;
use graph_core::{ParsableFactory, SerializationError};
use graph_models::registry::parse_any;
use serde_json::{Value, json};
use tracing::debug;

use crate::cli::RoundtripArgs;
use crate::context::RuntimeContext;
use crate::output::{
    ICON_FAIL, ICON_PASS, open_input, output_json, read_json, render_accent, render_fail,
    render_muted, render_pass, render_warn,
};

/// The result of checking one payload.
#[derive(Debug)]
pub struct Outcome {
    /// 1-based line for JSONL input.
    pub line: Option<usize>,
    pub result: Result<Checked, String>,
}

#[derive(Debug)]
pub struct Checked {
    pub type_name: &'static str,
    pub differences: Vec<Difference>,
}

impl Checked {
    pub fn losses(&self) -> impl Iterator<Item = &Difference> {
        self.differences.iter().filter(|d| d.is_loss())
    }

    pub fn is_lossless(&self) -> bool {
        self.losses().next().is_none()
    }
}

impl Outcome {
    fn is_ok(&self) -> bool {
        matches!(&self.result, Ok(checked) if checked.is_lossless())
    }
}

/// Decodes, re-encodes and compares one payload.
pub fn check(value: &Value, fallback: ParsableFactory, strict: bool) -> graph_core::Result<Checked> {
    let model = parse_any(value, fallback, strict)?;
    let encoded = to_json_value(model.as_ref())?;
    let differences = json_diff(value, &encoded);
    debug!(
        model = model.type_name(),
        differences = differences.len(),
        "round trip checked"
    );
    Ok(Checked {
        type_name: model.type_name(),
        differences,
    })
}

/// Execute the `graphm roundtrip` command.
pub fn run(ctx: &RuntimeContext, args: &RoundtripArgs) -> Result<()> {
    let fallback = ctx.fallback_type(&args.types)?.factory;
    let strict = ctx.strict(&args.types);

    let outcomes = if args.jsonl {
        let mut outcomes = Vec::new();
        for item in read_jsonl_values(open_input(&args.input)?) {
            let (line, result) = match item {
                Ok((line, value)) => {
                    let result = check(&value, fallback, strict).map_err(|e| e.to_string());
                    (line, result)
                }
                Err(SerializationError::Line { line, source }) => (line, Err(source.to_string())),
                Err(e) => return Err(e).with_context(|| format!("cannot read {}", args.input)),
            };
            outcomes.push(Outcome {
                line: Some(line),
                result,
            });
        }
        outcomes
    } else {
        let value = read_json(&args.input)?;
        let checked = check(&value, fallback, strict)
            .with_context(|| format!("cannot decode {}", args.input))?;
        vec![Outcome {
            line: None,
            result: Ok(checked),
        }]
    };

    if ctx.json {
        output_json(&report_json(&outcomes), ctx.pretty())?;
    } else {
        print_report(ctx, &outcomes);
    }

    let failed = outcomes.iter().filter(|o| !o.is_ok()).count();
    if failed > 0 {
        bail!("{failed} of {} payloads did not survive the round trip", outcomes.len());
    }
    Ok(())
}

fn report_json(outcomes: &[Outcome]) -> Value {
    let results: Vec<Value> = outcomes
        .iter()
        .map(|o| match &o.result {
            Ok(checked) => json!({
                "line": o.line,
                "type": checked.type_name,
                "lossless": checked.is_lossless(),
                "losses": checked.losses().map(ToString::to_string).collect::<Vec<_>>(),
                "added": checked
                    .differences
                    .iter()
                    .filter(|d| !d.is_loss())
                    .map(|d| d.path.clone())
                    .collect::<Vec<_>>(),
            }),
            Err(error) => json!({"line": o.line, "error": error}),
        })
        .collect();
    json!({
        "payloads": outcomes.len(),
        "failed": outcomes.iter().filter(|o| !o.is_ok()).count(),
        "results": results,
    })
}

fn print_report(ctx: &RuntimeContext, outcomes: &[Outcome]) {
    for outcome in outcomes {
        let label = match outcome.line {
            Some(line) => format!("line {line}"),
            None => "payload".to_string(),
        };
        match &outcome.result {
            Ok(checked) if checked.is_lossless() => {
                if !ctx.quiet {
                    println!(
                        "{} {}  {}",
                        render_pass(ICON_PASS),
                        label,
                        render_accent(checked.type_name)
                    );
                }
            }
            Ok(checked) => {
                println!(
                    "{} {}  {}",
                    render_fail(ICON_FAIL),
                    label,
                    render_accent(checked.type_name)
                );
                for loss in checked.losses() {
                    println!("    {}", render_warn(&loss.to_string()));
                }
            }
            Err(error) => {
                println!("{} {}  {}", render_fail(ICON_FAIL), label, render_fail(error));
            }
        }
    }
    if !ctx.quiet && outcomes.len() > 1 {
        let failed = outcomes.iter().filter(|o| !o.is_ok()).count();
        println!(
            "{}",
            render_muted(&format!("{} payloads, {failed} failed", outcomes.len()))
        );
    }
}

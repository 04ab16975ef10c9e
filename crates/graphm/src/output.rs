//! Output helpers: JSON printing, input reading and terminal styling.

use std::fs::File;
use std::io::{self, BufRead, BufReader, IsTerminal, Read, Write};
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result};
use graph_config::ColorChoice;
use owo_colors::OwoColorize;
use serde_json::Value;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// Opens a file, or stdin for `-`.
pub fn open_input(path: &str) -> Result<Box<dyn BufRead>> {
    if path == "-" {
        return Ok(Box::new(BufReader::new(io::stdin())));
    }
    let file = File::open(path).with_context(|| format!("cannot open {path}"))?;
    Ok(Box::new(BufReader::new(file)))
}

/// Reads a whole input and parses it as one JSON document.
pub fn read_json(path: &str) -> Result<Value> {
    let mut text = String::new();
    open_input(path)?
        .read_to_string(&mut text)
        .with_context(|| format!("cannot read {path}"))?;
    serde_json::from_str(&text).with_context(|| format!("{path} is not valid JSON"))
}

// ---------------------------------------------------------------------------
// JSON output
// ---------------------------------------------------------------------------

/// Print a JSON value to stdout.
pub fn output_json(value: &Value, pretty: bool) -> Result<()> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    // Ignore broken pipe errors (e.g., piped to `head`)
    let _ = writeln!(handle, "{text}");
    Ok(())
}

// ---------------------------------------------------------------------------
// Styling
// ---------------------------------------------------------------------------

static COLOR: AtomicBool = AtomicBool::new(false);

const PASS: (u8, u8, u8) = (0xc2, 0xd9, 0x4c);
const WARN: (u8, u8, u8) = (0xff, 0xb4, 0x54);
const FAIL: (u8, u8, u8) = (0xf0, 0x71, 0x78);
const MUTED: (u8, u8, u8) = (0x6c, 0x76, 0x80);
const ACCENT: (u8, u8, u8) = (0x59, 0xc2, 0xff);

pub const ICON_PASS: &str = "\u{2713}";
pub const ICON_FAIL: &str = "\u{2716}";

/// Decides once whether to colour stdout.
///
/// `auto` honours `NO_COLOR` and colours only a terminal.
pub fn init_color(choice: ColorChoice) {
    let enabled = match choice {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => std::env::var_os("NO_COLOR").is_none() && io::stdout().is_terminal(),
    };
    COLOR.store(enabled, Ordering::Relaxed);
}

fn color_str(s: &str, rgb: (u8, u8, u8)) -> String {
    if COLOR.load(Ordering::Relaxed) {
        s.truecolor(rgb.0, rgb.1, rgb.2).to_string()
    } else {
        s.to_string()
    }
}

pub fn render_pass(s: &str) -> String {
    color_str(s, PASS)
}

pub fn render_warn(s: &str) -> String {
    color_str(s, WARN)
}

pub fn render_fail(s: &str) -> String {
    color_str(s, FAIL)
}

pub fn render_muted(s: &str) -> String {
    color_str(s, MUTED)
}

/// Type names and other identifiers.
pub fn render_accent(s: &str) -> String {
    if COLOR.load(Ordering::Relaxed) {
        s.truecolor(ACCENT.0, ACCENT.1, ACCENT.2).bold().to_string()
    } else {
        s.to_string()
    }
}

//! JSON Lines support: one model per line.

use std::io::{self, BufRead, Write};

use serde_json::Value;

use crate::error::{Result, SerializationError};
use crate::json::{from_json_value, to_json_value};
use crate::parsable::{Parsable, ParsableFactory};

/// Writes each model as a single JSON line.
pub fn write_jsonl<W: Write>(writer: &mut W, models: &[&dyn Parsable]) -> Result<()> {
    for (index, model) in models.iter().enumerate() {
        let value = to_json_value(*model).map_err(|e| at_line(index + 1, e))?;
        serde_json::to_writer(&mut *writer, &value)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

/// Returns an iterator over the JSON value on each non-empty line.
pub fn read_jsonl_values<R: BufRead>(reader: R) -> JsonLines<R> {
    JsonLines {
        reader,
        line_number: 0,
        failed: false,
    }
}

/// Returns an iterator decoding one model per non-empty line.
pub fn read_jsonl<R: BufRead>(reader: R, factory: ParsableFactory) -> JsonlIter<R> {
    JsonlIter {
        lines: read_jsonl_values(reader),
        factory,
    }
}

/// Iterator over the values of a JSONL stream, paired with their 1-based
/// line numbers.
///
/// Unreadable lines (bad JSON or invalid UTF-8) yield a
/// [`SerializationError::Line`] and iteration continues. Any other I/O
/// error is yielded once and ends the iteration.
pub struct JsonLines<R> {
    reader: R,
    line_number: usize,
    failed: bool,
}

impl<R> JsonLines<R> {
    /// The number of the last line read, starting at 1.
    pub fn line_number(&self) -> usize {
        self.line_number
    }
}

impl<R: BufRead> Iterator for JsonLines<R> {
    type Item = Result<(usize, Value)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let mut buf = Vec::new();
        loop {
            buf.clear();
            match self.reader.read_until(b'\n', &mut buf) {
                Ok(0) => return None,
                Ok(_) => {
                    self.line_number += 1;
                    let line = self.line_number;
                    let text = match std::str::from_utf8(&buf) {
                        Ok(text) => text.trim(),
                        Err(e) => {
                            let err = io::Error::new(io::ErrorKind::InvalidData, e);
                            return Some(Err(at_line(line, err.into())));
                        }
                    };
                    if text.is_empty() {
                        continue;
                    }
                    return Some(
                        serde_json::from_str(text)
                            .map(|value| (line, value))
                            .map_err(|e| at_line(line, e.into())),
                    );
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.failed = true;
                    return Some(Err(SerializationError::Io(e)));
                }
            }
        }
    }
}

/// Iterator over JSONL-encoded models.
pub struct JsonlIter<R> {
    lines: JsonLines<R>,
    factory: ParsableFactory,
}

impl<R> JsonlIter<R> {
    /// The number of the last line read, starting at 1.
    pub fn line_number(&self) -> usize {
        self.lines.line_number()
    }
}

impl<R: BufRead> Iterator for JsonlIter<R> {
    type Item = Result<(usize, Box<dyn Parsable>)>;

    fn next(&mut self) -> Option<Self::Item> {
        let (line, value) = match self.lines.next()? {
            Ok(item) => item,
            Err(e) => return Some(Err(e)),
        };
        Some(
            from_json_value(&value, self.factory)
                .map(|model| (line, model))
                .map_err(|e| at_line(line, e)),
        )
    }
}

fn at_line(line: usize, source: SerializationError) -> SerializationError {
    SerializationError::Line {
        line,
        source: Box::new(source),
    }
}

//! Logfmt formatter
//!
//! `key=value` pairs separated by single spaces. Keys lose any character up
//! to and including space, `=`, `"` and U+FFFD; a key left empty drops its
//! pair. Values are quoted when they contain such characters, and composite
//! values (structs, sequences, maps, groups) fall back to their structural
//! text form. DEL and C1 controls pass through untouched.

use super::{level_name, FormatContext, Formatter};
use crate::core::event::{Event, FieldKey};
use crate::core::value::Value;
use chrono::SecondsFormat;

#[derive(Debug, Clone, Copy, Default)]
pub struct LogfmtFormatter;

impl LogfmtFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl Formatter for LogfmtFormatter {
    fn format(&self, event: &Event, ctx: &FormatContext<'_>, buf: &mut Vec<u8>) {
        let mut out = String::with_capacity(128);

        for (key, value) in event.iter() {
            let text = match key {
                FieldKey::Timestamp => match value {
                    Value::Time(t) => ctx.time_format.format(t),
                    _ => continue,
                },
                FieldKey::Level => match value {
                    Value::Level(level) => match level_name(*level, ctx.styles) {
                        Some(name) => name,
                        None => continue,
                    },
                    _ => continue,
                },
                FieldKey::Caller | FieldKey::Prefix | FieldKey::Message => value.to_string(),
                FieldKey::User(_) => value_text(value),
            };

            let name = sanitize_key(&key.name(ctx.keys));
            if name.is_empty() {
                continue;
            }
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(&name);
            out.push('=');
            write_value(&mut out, &text);
        }

        out.push('\n');
        buf.extend_from_slice(out.as_bytes());
    }

    fn name(&self) -> &str {
        "logfmt"
    }
}

/// Plain text of a user value. Scalars use their natural form, anything
/// else the structural text dump.
fn value_text(value: &Value) -> String {
    match value.resolve().as_ref() {
        Value::Null => "null".to_string(),
        Value::Bytes(bytes) => String::from_utf8_lossy(bytes).into_owned(),
        Value::Time(t) => t.to_rfc3339_opts(SecondsFormat::AutoSi, true),
        other => other.to_string(),
    }
}

fn is_reserved_char(c: char) -> bool {
    c <= ' ' || c == '=' || c == '"' || c == char::REPLACEMENT_CHARACTER
}

fn sanitize_key(key: &str) -> String {
    key.chars().filter(|c| !is_reserved_char(*c)).collect()
}

fn needs_quotes(s: &str) -> bool {
    s.chars().any(is_reserved_char)
}

fn write_value(out: &mut String, s: &str) {
    if !needs_quotes(s) {
        out.push_str(s);
        return;
    }

    out.push('"');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c < ' ' => {
                out.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

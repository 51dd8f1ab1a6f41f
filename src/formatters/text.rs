//! Human-readable text formatter
//!
//! `[TIMESTAMP ][LEVEL ][<CALLER> ][PREFIX: ]MESSAGE[ key=value]*`
//!
//! Values are written bare when every character lies in `-`..`~`, quoted and
//! escaped otherwise, and as an indented block when they span lines:
//!
//! ```text
//! ERRO failed
//!   stack=
//!   │ line one
//!   │ line two
//! ```

use super::{FormatContext, Formatter};
use crate::core::event::{Event, FieldKey};
use crate::core::styles::Style;
use crate::core::value::Value;
use unicode_general_category::{get_general_category, GeneralCategory};

const SEPARATOR: &str = "=";
const INDENT_SEPARATOR: &str = "  │ ";
const LOWER_HEX: &[u8; 16] = b"0123456789abcdef";

#[derive(Debug, Clone, Copy, Default)]
pub struct TextFormatter;

impl TextFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl Formatter for TextFormatter {
    fn format(&self, event: &Event, ctx: &FormatContext<'_>, buf: &mut Vec<u8>) {
        let mut out = String::with_capacity(128);
        let paint = |style: Style, text: &str| -> String {
            if ctx.colors {
                style.paint(text)
            } else {
                text.to_string()
            }
        };
        let styles = ctx.styles;
        let fields = event.fields();

        for (i, (key, value)) in fields.iter().enumerate() {
            match key {
                FieldKey::Timestamp => {
                    if let Value::Time(t) = value {
                        space(&mut out);
                        out.push_str(&paint(styles.timestamp, &ctx.time_format.format(t)));
                    }
                }
                FieldKey::Level => {
                    if let Value::Level(level) = value {
                        if let Some(level_style) = styles.level(*level) {
                            space(&mut out);
                            out.push_str(&paint(level_style.style, level_style.text()));
                        }
                    }
                }
                FieldKey::Caller => {
                    space(&mut out);
                    out.push_str(&paint(styles.caller, &format!("<{}>", value)));
                }
                FieldKey::Prefix => {
                    space(&mut out);
                    out.push_str(&paint(styles.prefix, &format!("{}:", value)));
                }
                FieldKey::Message => {
                    space(&mut out);
                    out.push_str(&paint(styles.message, &value.to_string()));
                }
                FieldKey::User(key) => {
                    let key = key.to_key_string();
                    if key.is_empty() {
                        continue;
                    }
                    let more = i + 1 < fields.len();
                    write_field(&mut out, ctx, &key, &value.to_string(), more);
                }
            }
        }

        out.push('\n');
        buf.extend_from_slice(out.as_bytes());
    }

    fn name(&self) -> &str {
        "text"
    }
}

/// Separate from whatever came before, unless nothing did.
fn space(out: &mut String) {
    if !out.is_empty() {
        out.push(' ');
    }
}

fn write_field(out: &mut String, ctx: &FormatContext<'_>, key: &str, val: &str, more: bool) {
    let styles = ctx.styles;
    let paint = |style: Style, text: &str| -> String {
        if ctx.colors {
            style.paint(text)
        } else {
            text.to_string()
        }
    };
    let key_style = styles.key_style(key);
    let value_style = styles.value_style(key);
    let sep = paint(styles.separator, SEPARATOR);

    if val.contains('\n') {
        out.push_str("\n  ");
        out.push_str(&paint(key_style, key));
        out.push_str(&sep);
        out.push('\n');

        let indent = paint(styles.separator, INDENT_SEPARATOR);
        let mut lines = val.split('\n').peekable();
        while let Some(line) = lines.next() {
            let last = lines.peek().is_none();
            if last && line.is_empty() {
                break;
            }
            out.push_str(&indent);
            let mut escaped = String::with_capacity(line.len());
            write_escaped(&mut escaped, line, false);
            out.push_str(&paint(value_style, &escaped));
            if !last || more {
                out.push('\n');
            }
        }
        if more {
            out.push(' ');
        }
        return;
    }

    space(out);
    out.push_str(&paint(key_style, key));
    out.push_str(&sep);
    if val.is_empty() {
        out.push_str(&paint(value_style, "\"\""));
    } else if needs_quoting(val) {
        let mut quoted = String::with_capacity(val.len() + 2);
        quoted.push('"');
        write_escaped(&mut quoted, val, true);
        quoted.push('"');
        out.push_str(&paint(value_style, &quoted));
    } else {
        out.push_str(&paint(value_style, val));
    }
}

/// Characters allowed in an unquoted value: `-` through `~`.
fn is_normal(c: char) -> bool {
    ('-'..='~').contains(&c)
}

pub(crate) fn needs_quoting(s: &str) -> bool {
    !s.chars().all(is_normal)
}

/// Printable in the sense of letters, marks, numbers, punctuation, symbols
/// and the ASCII space.
fn is_print(c: char) -> bool {
    if c == ' ' {
        return true;
    }
    !matches!(
        get_general_category(c),
        GeneralCategory::Control
            | GeneralCategory::Format
            | GeneralCategory::Surrogate
            | GeneralCategory::PrivateUse
            | GeneralCategory::Unassigned
            | GeneralCategory::SpaceSeparator
            | GeneralCategory::LineSeparator
            | GeneralCategory::ParagraphSeparator
    )
}

fn write_escaped(out: &mut String, s: &str, escape_quotes: bool) {
    if s.chars().all(|c| is_print(c) && c != '"') {
        out.push_str(s);
        return;
    }

    for c in s.chars() {
        if escape_quotes && c == '"' {
            out.push_str("\\\"");
            continue;
        }
        if is_print(c) {
            out.push(c);
            continue;
        }
        match c {
            '\u{07}' => out.push_str("\\a"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0C}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{0B}' => out.push_str("\\v"),
            c if (c as u32) < 0x20 => push_hex(out, "\\x", c as u32, 2),
            c if (c as u32) < 0x10000 => push_hex(out, "\\u", c as u32, 4),
            c => push_hex(out, "\\U", c as u32, 8),
        }
    }
}

fn push_hex(out: &mut String, prefix: &str, value: u32, digits: u32) {
    out.push_str(prefix);
    for shift in (0..digits).rev() {
        let nibble = (value >> (shift * 4)) & 0xF;
        out.push(LOWER_HEX[nibble as usize] as char);
    }
}

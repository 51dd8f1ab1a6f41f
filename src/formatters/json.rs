//! JSON formatter
//!
//! One object per line, keys in emission order. Keys are not deduplicated, so
//! a repeated field yields repeated members. Group values become nested
//! objects. A key or value that fails to encode is written as
//! `"invalid key"` / `"invalid value"` and the rest of the event is kept.

use super::{level_name, FormatContext, Formatter};
use crate::core::event::{Event, FieldKey};
use crate::core::value::{Field, Value};
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormatter;

impl JsonFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl Formatter for JsonFormatter {
    fn format(&self, event: &Event, ctx: &FormatContext<'_>, buf: &mut Vec<u8>) {
        let mut obj = ObjectWriter::start(&mut *buf);

        for (key, value) in event.iter() {
            match key {
                FieldKey::Timestamp => {
                    if let Value::Time(t) = value {
                        obj.key(&ctx.keys.timestamp);
                        match ctx.time_format.unix_value(t) {
                            Some(n) => obj.value(&n),
                            None => obj.value(&ctx.time_format.format(t)),
                        }
                    }
                }
                FieldKey::Level => {
                    if let Value::Level(level) = value {
                        if let Some(name) = level_name(*level, ctx.styles) {
                            obj.key(&ctx.keys.level);
                            obj.value(&name);
                        }
                    }
                }
                FieldKey::Caller | FieldKey::Prefix | FieldKey::Message => {
                    obj.key(&key.name(ctx.keys));
                    obj.value(&value.to_string());
                }
                FieldKey::User(user_key) => {
                    obj.user_key(user_key);
                    obj.user_value(value);
                }
            }
        }

        obj.end();
        buf.push(b'\n');
    }

    fn name(&self) -> &str {
        "json"
    }
}

/// Writes one `{...}` object member by member.
struct ObjectWriter<'a> {
    buf: &'a mut Vec<u8>,
    members: usize,
}

impl<'a> ObjectWriter<'a> {
    fn start(buf: &'a mut Vec<u8>) -> Self {
        buf.push(b'{');
        Self { buf, members: 0 }
    }

    fn end(self) {
        self.buf.push(b'}');
    }

    fn key(&mut self, key: &str) {
        if self.members > 0 {
            self.buf.push(b',');
        }
        self.members += 1;
        self.encode(&key, "\"invalid key\"");
        self.buf.push(b':');
    }

    fn user_key(&mut self, key: &Value) {
        match key.resolve().as_ref() {
            Value::Invalid(_) => {
                if self.members > 0 {
                    self.buf.push(b',');
                }
                self.members += 1;
                self.buf.extend_from_slice(b"\"invalid key\":");
            }
            other => self.key(&other.to_key_string()),
        }
    }

    fn value<T: Serialize + ?Sized>(&mut self, value: &T) {
        self.encode(value, "\"invalid value\"");
    }

    fn user_value(&mut self, value: &Value) {
        match value.resolve().as_ref() {
            Value::Group(fields) => self.group(fields),
            other => self.value(other),
        }
    }

    fn group(&mut self, fields: &[Field]) {
        let mut nested = ObjectWriter::start(&mut *self.buf);
        for field in fields {
            nested.key(&field.key);
            nested.user_value(&field.value);
        }
        nested.end();
    }

    fn encode<T: Serialize + ?Sized>(&mut self, value: &T, placeholder: &str) {
        let pos = self.buf.len();
        if serde_json::to_writer(&mut *self.buf, value).is_err() {
            self.buf.truncate(pos);
            self.buf.extend_from_slice(placeholder.as_bytes());
        }
    }
}

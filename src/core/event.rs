//! Field list assembly for a single log call
//!
//! An [`Event`] is the ordered list of key/value pairs a formatter renders.
//! Reserved fields come first in a fixed order (timestamp, level, caller,
//! prefix, message), followed by the logger's inherited fields and then the
//! call-site fields, exactly as given. Repeated keys are kept.

use super::level::Level;
use super::timestamp::Timestamp;
use super::value::Value;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Key of one event field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKey {
    Timestamp,
    Level,
    Caller,
    Prefix,
    Message,
    User(Value),
}

impl FieldKey {
    #[must_use]
    pub fn is_reserved(&self) -> bool {
        !matches!(self, FieldKey::User(_))
    }

    /// Name of this key as written in output.
    pub fn name(&self, keys: &ReservedKeys) -> String {
        match self {
            FieldKey::Timestamp => keys.timestamp.clone(),
            FieldKey::Level => keys.level.clone(),
            FieldKey::Caller => keys.caller.clone(),
            FieldKey::Prefix => keys.prefix.clone(),
            FieldKey::Message => keys.message.clone(),
            FieldKey::User(key) => key.to_key_string(),
        }
    }
}

/// Output names of the reserved fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReservedKeys {
    pub timestamp: String,
    pub level: String,
    pub caller: String,
    pub prefix: String,
    pub message: String,
}

impl Default for ReservedKeys {
    fn default() -> Self {
        Self {
            timestamp: "time".to_string(),
            level: "level".to_string(),
            caller: "caller".to_string(),
            prefix: "prefix".to_string(),
            message: "msg".to_string(),
        }
    }
}

fn global_keys() -> &'static RwLock<ReservedKeys> {
    static KEYS: OnceLock<RwLock<ReservedKeys>> = OnceLock::new();
    KEYS.get_or_init(|| RwLock::new(ReservedKeys::default()))
}

impl ReservedKeys {
    /// Keys new loggers start with.
    pub fn global() -> ReservedKeys {
        global_keys().read().clone()
    }

    /// Change the keys picked up by loggers created from now on. Existing
    /// loggers keep the keys they were built with.
    pub fn set_global(keys: ReservedKeys) {
        *global_keys().write() = keys;
    }
}

/// Inputs for building one event.
///
/// The timestamp and caller are supplied as closures so a gated call never
/// reads the clock or formats a location.
pub struct EventSpec<'a> {
    pub min_level: Level,
    pub level: Level,
    pub timestamp: Option<&'a dyn Fn() -> Timestamp>,
    pub caller: Option<&'a dyn Fn() -> String>,
    pub prefix: &'a str,
    pub message: &'a str,
    pub inherited: &'a [Value],
    pub call_site: Vec<Value>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Event {
    fields: Vec<(FieldKey, Value)>,
}

impl Event {
    /// Assemble the field list, or `None` when `level < min_level` or the
    /// level is [`Level::OFF`].
    pub fn build(spec: EventSpec<'_>) -> Option<Event> {
        if spec.level == Level::OFF || spec.level < spec.min_level {
            return None;
        }

        let mut fields = Vec::with_capacity(5 + (spec.inherited.len() + spec.call_site.len() + 2) / 2);

        if let Some(now) = spec.timestamp {
            fields.push((FieldKey::Timestamp, Value::Time(now())));
        }
        if spec.level != Level::NO_LEVEL {
            fields.push((FieldKey::Level, Value::Level(spec.level)));
        }
        if let Some(caller) = spec.caller {
            fields.push((FieldKey::Caller, Value::Str(caller())));
        }
        if !spec.prefix.is_empty() {
            fields.push((FieldKey::Prefix, Value::Str(spec.prefix.to_string())));
        }
        if !spec.message.is_empty() {
            fields.push((FieldKey::Message, Value::Str(spec.message.to_string())));
        }

        push_pairs(&mut fields, spec.inherited.iter().cloned());
        push_pairs(&mut fields, spec.call_site);

        Some(Event { fields })
    }

    /// An event from already ordered fields.
    pub fn from_fields(fields: Vec<(FieldKey, Value)>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[(FieldKey, Value)] {
        &self.fields
    }

    pub fn iter(&self) -> impl Iterator<Item = &(FieldKey, Value)> {
        self.fields.iter()
    }

    pub fn level(&self) -> Option<Level> {
        self.fields.iter().find_map(|(key, value)| match (key, value) {
            (FieldKey::Level, Value::Level(level)) => Some(*level),
            _ => None,
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Pair up one segment of alternating keys and values. A trailing key gets
/// [`Value::Missing`].
fn push_pairs<I>(fields: &mut Vec<(FieldKey, Value)>, segment: I)
where
    I: IntoIterator<Item = Value>,
{
    let mut iter = segment.into_iter();
    while let Some(key) = iter.next() {
        let value = iter.next().unwrap_or(Value::Missing);
        fields.push((FieldKey::User(key), value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone};
    use std::cell::Cell;

    fn spec<'a>(level: Level, inherited: &'a [Value], call_site: Vec<Value>) -> EventSpec<'a> {
        EventSpec {
            min_level: Level::INFO,
            level,
            timestamp: None,
            caller: None,
            prefix: "",
            message: "msg",
            inherited,
            call_site,
        }
    }

    fn user_keys(event: &Event) -> Vec<String> {
        event
            .iter()
            .filter_map(|(key, _)| match key {
                FieldKey::User(k) => Some(k.to_key_string()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_gated_event_is_none() {
        let called = Cell::new(false);
        let now = || {
            called.set(true);
            FixedOffset::east_opt(0).unwrap().with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
        };
        let mut s = spec(Level::DEBUG, &[], vec![]);
        s.timestamp = Some(&now);
        assert!(Event::build(s).is_none());
        assert!(!called.get());
    }

    #[test]
    fn test_reserved_fields_come_first_in_order() {
        let now = || FixedOffset::east_opt(0).unwrap().with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let caller = || "main.rs:10".to_string();
        let inherited = [Value::from("a"), Value::from(1)];
        let event = Event::build(EventSpec {
            min_level: Level::INFO,
            level: Level::WARN,
            timestamp: Some(&now),
            caller: Some(&caller),
            prefix: "svc",
            message: "hello",
            inherited: &inherited,
            call_site: vec![Value::from("b"), Value::from(2)],
        })
        .unwrap();

        let keys: Vec<&FieldKey> = event.iter().map(|(k, _)| k).collect();
        assert_eq!(keys[0], &FieldKey::Timestamp);
        assert_eq!(keys[1], &FieldKey::Level);
        assert_eq!(keys[2], &FieldKey::Caller);
        assert_eq!(keys[3], &FieldKey::Prefix);
        assert_eq!(keys[4], &FieldKey::Message);
        assert_eq!(user_keys(&event), vec!["a", "b"]);
        assert_eq!(event.level(), Some(Level::WARN));
    }

    #[test]
    fn test_segments_are_padded_independently() {
        let inherited = [Value::from("x")];
        let event = Event::build(spec(
            Level::INFO,
            &inherited,
            vec![Value::from("foo"), Value::from("bar"), Value::from("baz")],
        ))
        .unwrap();

        assert_eq!(user_keys(&event), vec!["x", "foo", "baz"]);
        let values: Vec<&Value> = event
            .iter()
            .filter(|(k, _)| !k.is_reserved())
            .map(|(_, v)| v)
            .collect();
        assert!(values[0].is_missing());
        assert_eq!(values[1], &Value::from("bar"));
        assert!(values[2].is_missing());
    }

    #[test]
    fn test_repeated_keys_are_kept() {
        let inherited = [Value::from("a"), Value::from(1)];
        let event = Event::build(spec(
            Level::INFO,
            &inherited,
            vec![Value::from("a"), Value::from(2)],
        ))
        .unwrap();
        assert_eq!(user_keys(&event), vec!["a", "a"]);
    }

    #[test]
    fn test_print_level_and_empty_message_are_omitted() {
        let mut s = spec(Level::NO_LEVEL, &[], vec![]);
        s.message = "";
        let event = Event::build(s).unwrap();
        assert!(event.is_empty());
        assert_eq!(event.level(), None);
    }

    #[test]
    fn test_off_suppresses_print() {
        let mut s = spec(Level::NO_LEVEL, &[], vec![]);
        s.min_level = Level::OFF;
        assert!(Event::build(s).is_none());
    }

    #[test]
    fn test_off_level_is_never_built() {
        let mut s = spec(Level::OFF, &[], vec![]);
        s.min_level = Level::OFF;
        assert!(Event::build(s).is_none());
        assert!(Event::build(spec(Level::OFF, &[], vec![])).is_none());
    }

    #[test]
    fn test_custom_levels_gate_by_value() {
        let mut s = spec(Level::new(500), &[], vec![]);
        s.min_level = Level::new(500);
        assert!(Event::build(s).is_some());

        let mut s = spec(Level::new(100), &[], vec![]);
        s.min_level = Level::new(500);
        assert!(Event::build(s).is_none());
    }

    #[test]
    fn test_reserved_key_names() {
        let keys = ReservedKeys::default();
        assert_eq!(FieldKey::Timestamp.name(&keys), "time");
        assert_eq!(FieldKey::Message.name(&keys), "msg");
        assert_eq!(FieldKey::User(Value::from(3)).name(&keys), "3");
    }
}

//! Property-based tests for rust_structured_logger using proptest

use proptest::prelude::*;
use rust_structured_logger::prelude::*;
use std::collections::BTreeMap;

fn level_strategy() -> impl Strategy<Value = Level> {
    prop_oneof![
        Just(Level::DEBUG),
        Just(Level::INFO),
        Just(Level::WARN),
        Just(Level::ERROR),
        Just(Level::FATAL),
        (-100i32..100).prop_map(Level::new),
    ]
}

fn logger_with(format: OutputFormat) -> (Logger, MemorySink) {
    let out = MemorySink::new();
    let logger = Logger::builder().output(out.sink()).formatter(format).build();
    (logger, out)
}

// ============================================================================
// Level Tests
// ============================================================================

proptest! {
    /// Named levels survive a round trip through their names
    #[test]
    fn test_level_str_roundtrip(level in prop_oneof![
        Just(Level::DEBUG),
        Just(Level::INFO),
        Just(Level::WARN),
        Just(Level::ERROR),
        Just(Level::FATAL),
    ]) {
        let (parsed, err) = Level::parse(&level.to_string().to_uppercase());
        prop_assert!(err.is_none());
        prop_assert_eq!(parsed, level);
    }

    /// Ordering is the ordering of the underlying integers
    #[test]
    fn test_level_ordering(a in any::<i32>(), b in any::<i32>()) {
        prop_assert_eq!(Level::new(a) < Level::new(b), a < b);
        prop_assert_eq!(Level::new(a) == Level::new(b), a == b);
    }

    /// Unknown names fall back to info and report an error
    #[test]
    fn test_level_parse_fallback(s in "[a-z]{6,12}") {
        let (level, err) = Level::parse(&s);
        prop_assert_eq!(level, Level::INFO);
        prop_assert!(err.is_some());
    }
}

// ============================================================================
// Gating Tests
// ============================================================================

proptest! {
    /// An event is written iff its level is at least the minimum
    #[test]
    fn test_gating(min in level_strategy(), level in level_strategy()) {
        let (logger, out) = logger_with(OutputFormat::Json);
        logger.set_level(min);
        logger.log(level, "m", kv![]);
        prop_assert_eq!(!out.contents().is_empty(), level >= min);
    }

    /// Print is written for every minimum except off
    #[test]
    fn test_print_ignores_real_levels(min in level_strategy()) {
        let (logger, out) = logger_with(OutputFormat::Logfmt);
        logger.set_level(min);
        logger.print("p", kv![]);
        prop_assert_eq!(out.contents(), "msg=p\n");
    }
}

// ============================================================================
// Field List Tests
// ============================================================================

proptest! {
    /// User fields keep their order, repeats included
    #[test]
    fn test_json_field_order(keys in prop::collection::vec("[a-c]", 1..8)) {
        let (logger, out) = logger_with(OutputFormat::Json);
        let keyvals: Vec<Value> = keys
            .iter()
            .enumerate()
            .flat_map(|(i, k)| [Value::from(k.as_str()), Value::from(i)])
            .collect();
        logger.info("m", keyvals);

        let expected: String = keys
            .iter()
            .enumerate()
            .map(|(i, k)| format!(",\"{}\":{}", k, i))
            .collect();
        prop_assert_eq!(
            out.contents(),
            format!("{{\"level\":\"info\",\"msg\":\"m\"{}}}\n", expected)
        );
    }

    /// A trailing key without a value gets exactly one marker
    #[test]
    fn test_odd_fields_padded(count in 0usize..7) {
        let (logger, out) = logger_with(OutputFormat::Logfmt);
        let keyvals: Vec<Value> = (0..count).map(|i| Value::from(format!("k{}", i))).collect();
        logger.info("m", keyvals);

        let contents = out.contents();
        let markers = contents.matches("\"missing value\"").count();
        prop_assert_eq!(markers, count % 2);
    }
}

// ============================================================================
// Renderer Tests
// ============================================================================

proptest! {
    /// Plain JSON values decode back to what was logged, and re-encoding the
    /// decoded members in order reproduces the line byte for byte
    #[test]
    fn test_json_round_trip(
        s in ".*",
        n in any::<i64>(),
        b in any::<bool>(),
        map in prop::collection::btree_map("[a-z]{1,5}", "[a-z ]{0,5}", 0..4),
    ) {
        let (logger, out) = logger_with(OutputFormat::Json);
        logger.info("m", kv!["s", s.as_str(), "n", n, "b", b, "map", map.clone()]);

        let line = out.contents();
        let parsed: serde_json::Value = serde_json::from_str(line.trim_end()).unwrap();
        let members: Vec<String> = ["level", "msg", "s", "n", "b", "map"]
            .iter()
            .map(|k| format!("\"{}\":{}", k, serde_json::to_string(&parsed[*k]).unwrap()))
            .collect();
        prop_assert_eq!(format!("{{{}}}\n", members.join(",")), line);

        prop_assert_eq!(&parsed["s"], &serde_json::Value::from(s));
        prop_assert_eq!(&parsed["n"], &serde_json::Value::from(n));
        prop_assert_eq!(&parsed["b"], &serde_json::Value::from(b));

        let decoded: BTreeMap<String, String> = serde_json::from_value(parsed["map"].clone()).unwrap();
        prop_assert_eq!(decoded, map);
    }

    /// Logfmt values are quoted exactly when they hold a space, `=` or `"`
    #[test]
    fn test_logfmt_quoting(value in "[a-z =\"]{1,10}") {
        let (logger, out) = logger_with(OutputFormat::Logfmt);
        logger.info("m", kv!["k", value.as_str()]);

        let contents = out.contents();
        let rendered = contents
            .trim_end()
            .strip_prefix("level=info msg=m k=")
            .unwrap()
            .to_string();
        let needs_quotes = value.contains(' ') || value.contains('=') || value.contains('"');
        prop_assert_eq!(rendered.starts_with('"'), needs_quotes);
        if !needs_quotes {
            prop_assert_eq!(rendered, value);
        }
    }

    /// Every text event is a single line unless a field value spans lines
    #[test]
    fn test_text_single_line(msg in "[ -~]{0,20}", value in "[ -~]{0,20}") {
        let (logger, out) = logger_with(OutputFormat::Text);
        logger.info(msg, kv!["k", value]);
        let contents = out.contents();
        prop_assert_eq!(contents.matches('\n').count(), 1);
        prop_assert!(contents.ends_with('\n'));
    }

    /// Text values made only of `-` through `~` are written bare
    #[test]
    fn test_text_bare_values(value in "[-.0-9A-Za-z_/:~]{1,12}") {
        let (logger, out) = logger_with(OutputFormat::Text);
        logger.info("m", kv!["k", value.as_str()]);
        prop_assert_eq!(out.contents(), format!("INFO m k={}\n", value));
    }
}

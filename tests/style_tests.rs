//! Styled text output
//!
//! `colored` decides on its own whether to emit escape codes, so these tests
//! force it on and rely on the logger's `colors` flag alone.

#![cfg(feature = "console")]

use rust_structured_logger::prelude::*;
use rust_structured_logger::{Color, LevelStyle, Style, Styles};

fn colored_logger() -> (Logger, MemorySink) {
    colored::control::set_override(true);
    let out = MemorySink::new();
    let logger = Logger::builder().output(out.sink()).colors(true).build();
    (logger, out)
}

/// Drop `ESC [ ... m` sequences.
fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\u{1b}' {
            for c in chars.by_ref() {
                if c == 'm' {
                    break;
                }
            }
        } else {
            out.push(c);
        }
    }
    out
}

#[test]
fn test_colors_wrap_but_do_not_change_text() {
    let (logger, out) = colored_logger();
    logger.set_prefix("svc");
    logger.warn("disk low", kv!["free", "2 GB", "mount", "/data"]);

    let contents = out.contents();
    assert!(contents.contains('\u{1b}'));
    assert_eq!(
        strip_ansi(&contents),
        "WARN svc: disk low free=\"2 GB\" mount=/data\n"
    );
}

#[test]
fn test_colors_off_writes_plain_text() {
    colored::control::set_override(true);
    let out = MemorySink::new();
    let logger = Logger::builder().output(out.sink()).colors(false).build();
    logger.error("boom", kv!["code", 7]);
    assert_eq!(out.contents(), "ERRO boom code=7\n");
}

#[test]
fn test_level_label_painted_with_its_style() {
    let (logger, out) = colored_logger();
    logger.info("hi", kv![]);

    let styles = Styles::default();
    let info = styles.level(Level::INFO).unwrap();
    assert!(out.contents().starts_with(&info.style.paint("INFO")));
}

#[test]
fn test_key_and_value_overrides() {
    let (logger, out) = colored_logger();
    let key_style = Style::new().fg(Color::Red).bold();
    let value_style = Style::new().fg(Color::Cyan);
    let mut styles = Styles::default();
    styles.keys.insert("user".to_string(), key_style);
    styles.values.insert("user".to_string(), value_style);
    logger.set_styles(styles);

    logger.info("login", kv!["user", "ada", "ip", "10.0.0.1"]);
    let contents = out.contents();
    assert!(contents.contains(&key_style.paint("user")));
    assert!(contents.contains(&value_style.paint("ada")));
    assert!(!contents.contains(&key_style.paint("ip")));
    assert_eq!(strip_ansi(&contents), "INFO login user=ada ip=10.0.0.1\n");
}

#[test]
fn test_custom_level_style_and_width() {
    let (logger, out) = colored_logger();
    let trace = Level::new(-8);
    let mut styles = Styles::default();
    styles.levels.insert(
        trace,
        LevelStyle::new("TRACE", Style::new().fg(Color::BrightBlack)).with_max_width(3),
    );
    logger.set_styles(styles);
    logger.set_level(trace);

    logger.log(trace, "deep", kv![]);
    assert_eq!(strip_ansi(&out.take()), "TRA deep\n");

    logger.set_colors(false);
    logger.log(trace, "deep", kv![]);
    assert_eq!(out.take(), "TRA deep\n");
}

#[test]
fn test_multiline_values_stay_aligned_with_colors() {
    let (logger, out) = colored_logger();
    logger.error("failed", kv!["stack", "a\nb"]);
    assert_eq!(
        strip_ansi(&out.contents()),
        "ERRO failed\n  stack=\n  │ a\n  │ b\n"
    );
}

//! Style tables for the text formatter
//!
//! Styling never changes which bytes are quoted or escaped: the text
//! formatter makes those decisions on plain text and paints afterwards.

use super::level::Level;
use std::collections::HashMap;

#[cfg(feature = "console")]
use colored::Colorize;

/// Foreground colors a [`Style`] can use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    BrightBlack,
    Rgb(u8, u8, u8),
}

#[cfg(feature = "console")]
impl From<Color> for colored::Color {
    fn from(color: Color) -> Self {
        match color {
            Color::Black => colored::Color::Black,
            Color::Red => colored::Color::Red,
            Color::Green => colored::Color::Green,
            Color::Yellow => colored::Color::Yellow,
            Color::Blue => colored::Color::Blue,
            Color::Magenta => colored::Color::Magenta,
            Color::Cyan => colored::Color::Cyan,
            Color::White => colored::Color::White,
            Color::BrightBlack => colored::Color::BrightBlack,
            Color::Rgb(r, g, b) => colored::Color::TrueColor { r, g, b },
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Style {
    pub fg: Option<Color>,
    pub bold: bool,
    pub dimmed: bool,
    pub italic: bool,
    pub underline: bool,
}

impl Style {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            fg: None,
            bold: false,
            dimmed: false,
            italic: false,
            underline: false,
        }
    }

    #[must_use]
    pub const fn fg(mut self, color: Color) -> Self {
        self.fg = Some(color);
        self
    }

    #[must_use]
    pub const fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    #[must_use]
    pub const fn dimmed(mut self) -> Self {
        self.dimmed = true;
        self
    }

    #[must_use]
    pub const fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    #[must_use]
    pub const fn underline(mut self) -> Self {
        self.underline = true;
        self
    }

    #[must_use]
    pub fn is_plain(&self) -> bool {
        *self == Style::new()
    }

    /// Wrap `text` in this style's escape codes.
    #[cfg(feature = "console")]
    pub fn paint(&self, text: &str) -> String {
        if text.is_empty() || self.is_plain() {
            return text.to_string();
        }
        let mut painted = text.normal();
        if let Some(color) = self.fg {
            painted = painted.color(colored::Color::from(color));
        }
        if self.bold {
            painted = painted.bold();
        }
        if self.dimmed {
            painted = painted.dimmed();
        }
        if self.italic {
            painted = painted.italic();
        }
        if self.underline {
            painted = painted.underline();
        }
        painted.to_string()
    }

    /// Without the `console` feature there is nothing to paint with.
    #[cfg(not(feature = "console"))]
    pub fn paint(&self, text: &str) -> String {
        text.to_string()
    }
}

/// Label and style of one level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelStyle {
    pub label: String,
    pub style: Style,
    /// Maximum label width in characters
    pub max_width: Option<usize>,
}

impl LevelStyle {
    pub fn new(label: impl Into<String>, style: Style) -> Self {
        Self {
            label: label.into(),
            style,
            max_width: None,
        }
    }

    #[must_use]
    pub fn with_max_width(mut self, width: usize) -> Self {
        self.max_width = Some(width);
        self
    }

    /// Label cut to `max_width`.
    pub fn text(&self) -> &str {
        match self.max_width {
            Some(width) => match self.label.char_indices().nth(width) {
                Some((idx, _)) => &self.label[..idx],
                None => &self.label,
            },
            None => &self.label,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Styles {
    pub timestamp: Style,
    pub caller: Style,
    pub prefix: Style,
    pub message: Style,
    pub key: Style,
    pub value: Style,
    pub separator: Style,
    pub levels: HashMap<Level, LevelStyle>,
    /// Key style overrides by key name
    pub keys: HashMap<String, Style>,
    /// Value style overrides by key name
    pub values: HashMap<String, Style>,
}

impl Default for Styles {
    fn default() -> Self {
        let level = |label: &str, r, g, b| {
            LevelStyle::new(label, Style::new().bold().fg(Color::Rgb(r, g, b))).with_max_width(4)
        };

        let mut levels = HashMap::new();
        levels.insert(Level::DEBUG, level("DEBUG", 95, 95, 255));
        levels.insert(Level::INFO, level("INFO", 95, 255, 215));
        levels.insert(Level::WARN, level("WARN", 215, 255, 135));
        levels.insert(Level::ERROR, level("ERROR", 255, 95, 135));
        levels.insert(Level::FATAL, level("FATAL", 175, 95, 215));

        Self {
            timestamp: Style::new(),
            caller: Style::new().dimmed(),
            prefix: Style::new().bold().dimmed(),
            message: Style::new(),
            key: Style::new().dimmed(),
            value: Style::new(),
            separator: Style::new().dimmed(),
            levels,
            keys: HashMap::new(),
            values: HashMap::new(),
        }
    }
}

impl Styles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn level(&self, level: Level) -> Option<&LevelStyle> {
        self.levels.get(&level)
    }

    pub fn key_style(&self, key: &str) -> Style {
        self.keys.get(key).copied().unwrap_or(self.key)
    }

    pub fn value_style(&self, key: &str) -> Style {
        self.values.get(key).copied().unwrap_or(self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_level_labels_are_capped() {
        let styles = Styles::default();
        let labels: Vec<&str> = Level::all()
            .iter()
            .filter_map(|l| styles.level(*l))
            .map(LevelStyle::text)
            .collect();
        assert_eq!(labels, vec!["DEBU", "INFO", "WARN", "ERRO", "FATA"]);
    }

    #[test]
    fn test_uncapped_custom_label() {
        let style = LevelStyle::new("FUNKY", Style::new());
        assert_eq!(style.text(), "FUNKY");
        assert_eq!(style.clone().with_max_width(2).text(), "FU");
        assert_eq!(LevelStyle::new("ÉTÉ", Style::new()).with_max_width(2).text(), "ÉT");
    }

    #[test]
    fn test_unknown_level_has_no_style() {
        assert!(Styles::default().level(Level::new(500)).is_none());
    }

    #[test]
    fn test_key_overrides() {
        let mut styles = Styles::default();
        styles.keys.insert("err".into(), Style::new().fg(Color::Red));
        assert_eq!(styles.key_style("err"), Style::new().fg(Color::Red));
        assert_eq!(styles.key_style("other"), styles.key);
        assert_eq!(styles.value_style("other"), styles.value);
    }

    #[test]
    fn test_plain_style_paints_nothing() {
        assert_eq!(Style::new().paint("text"), "text");
        assert_eq!(Style::new().bold().paint(""), "");
    }
}

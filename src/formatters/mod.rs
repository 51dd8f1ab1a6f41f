//! Event formatters
//!
//! Each formatter turns one [`Event`] into bytes. Formatting cannot fail as a
//! whole: a field that cannot be encoded is replaced by a placeholder and the
//! rest of the event is still written.

pub mod json;
pub mod logfmt;
pub mod text;

pub use json::JsonFormatter;
pub use logfmt::LogfmtFormatter;
pub use text::TextFormatter;

use crate::core::event::{Event, ReservedKeys};
use crate::core::styles::Styles;
use crate::core::timestamp::TimestampFormat;

/// Logger settings a formatter needs while rendering.
#[derive(Debug, Clone, Copy)]
pub struct FormatContext<'a> {
    pub keys: &'a ReservedKeys,
    pub styles: &'a Styles,
    pub colors: bool,
    pub time_format: &'a TimestampFormat,
}

pub trait Formatter: Send + Sync {
    /// Append the rendered event, including its trailing newline, to `buf`.
    fn format(&self, event: &Event, ctx: &FormatContext<'_>, buf: &mut Vec<u8>);

    fn name(&self) -> &str;
}

/// Level text for formats that carry it as a plain field: the level name for
/// named levels, the lowercased registered label for custom ones.
pub(crate) fn level_name(level: crate::core::Level, styles: &Styles) -> Option<String> {
    if level.is_named() {
        return Some(level.as_str().to_string());
    }
    styles.level(level).map(|style| style.label.to_lowercase())
}

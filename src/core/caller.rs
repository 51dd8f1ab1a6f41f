//! Source location of a log call
//!
//! Locations come from `#[track_caller]`. Wrapper functions that should be
//! skipped when reporting the caller are annotated `#[track_caller]` too.

use std::fmt;
use std::panic::Location;
use std::sync::Arc;

/// Source location of a log call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub file: &'static str,
    pub line: u32,
    pub column: u32,
}

impl Caller {
    /// Location of the nearest caller not marked `#[track_caller]`.
    #[track_caller]
    pub fn here() -> Self {
        Location::caller().into()
    }
}

impl From<&'static Location<'static>> for Caller {
    fn from(location: &'static Location<'static>) -> Self {
        Self {
            file: location.file(),
            line: location.line(),
            column: location.column(),
        }
    }
}

impl fmt::Display for Caller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// Renders a [`Caller`] for the caller field.
pub type CallerFormatter = Arc<dyn Fn(&Caller) -> String + Send + Sync>;

/// `dir/file.rs:line`, keeping the last two path segments.
pub fn short_caller_formatter() -> CallerFormatter {
    Arc::new(|caller: &Caller| format!("{}:{}", trim_caller_path(caller.file, 2), caller.line))
}

/// Full path and line.
pub fn long_caller_formatter() -> CallerFormatter {
    Arc::new(|caller: &Caller| caller.to_string())
}

/// Keep the last `n` segments of `path`. `n == 0` keeps everything.
fn trim_caller_path(path: &str, n: usize) -> &str {
    if n == 0 {
        return path;
    }
    let mut seen = 0;
    for (idx, ch) in path.char_indices().rev() {
        if ch == '/' || ch == '\\' {
            seen += 1;
            if seen == n {
                return &path[idx + 1..];
            }
        }
    }
    path
}

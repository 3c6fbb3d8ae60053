//! Severity levels and their canonical lowercase names.
//!
//! Captured events always carry the level as a lowercase name such as
//! `"info"` or `"warning"`, never as a number. The helpers here turn the
//! various ways a level can be spelled (method names, names in any case,
//! numeric codes) into that form.

use std::fmt;

/// A standard severity level with its numeric code.
///
/// Codes follow the conventional spacing of ten between levels, so that
/// custom levels can sit in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    /// Level 0, nothing set
    NotSet = 0,
    /// Level 10
    Debug = 10,
    /// Level 20
    Info = 20,
    /// Level 30
    Warning = 30,
    /// Level 40
    Error = 40,
    /// Level 50
    Critical = 50,
}

impl Level {
    /// Returns the numeric code of this level.
    pub fn code(self) -> i64 {
        self as i64
    }

    /// Returns the lowercase name of this level.
    pub fn name(self) -> &'static str {
        match self {
            Level::NotSet => "notset",
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warning => "warning",
            Level::Error => "error",
            Level::Critical => "critical",
        }
    }

    /// Looks up a standard level by numeric code.
    pub fn from_code(code: i64) -> Option<Level> {
        match code {
            0 => Some(Level::NotSet),
            10 => Some(Level::Debug),
            20 => Some(Level::Info),
            30 => Some(Level::Warning),
            40 => Some(Level::Error),
            50 => Some(Level::Critical),
            _ => None,
        }
    }

    /// Resolves the level implied by a logging method name.
    ///
    /// Aliases are folded first, so `"exception"` is [`Level::Error`] and
    /// `"warn"` is [`Level::Warning`]. Unknown names return `None`.
    pub fn from_method_name(method_name: &str) -> Option<Level> {
        match normalize_method_name(&method_name.to_ascii_lowercase()) {
            "notset" => Some(Level::NotSet),
            "debug" => Some(Level::Debug),
            "info" => Some(Level::Info),
            "warning" => Some(Level::Warning),
            "error" => Some(Level::Error),
            "critical" | "fatal" => Some(Level::Critical),
            _ => None,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<tracing::Level> for Level {
    fn from(level: tracing::Level) -> Self {
        match level {
            tracing::Level::TRACE | tracing::Level::DEBUG => Level::Debug,
            tracing::Level::INFO => Level::Info,
            tracing::Level::WARN => Level::Warning,
            tracing::Level::ERROR => Level::Error,
        }
    }
}

/// A level given either by name or by numeric code.
///
/// This is what the expected-event factories accept, so that test authors
/// can write `"INFO"`, `"info"`, `20` or [`Level::Info`] interchangeably.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LevelSpec {
    /// A level name, in any case
    Name(String),
    /// A numeric level code, standard or custom
    Code(i64),
}

impl From<&str> for LevelSpec {
    fn from(name: &str) -> Self {
        LevelSpec::Name(name.to_string())
    }
}

impl From<String> for LevelSpec {
    fn from(name: String) -> Self {
        LevelSpec::Name(name)
    }
}

impl From<i64> for LevelSpec {
    fn from(code: i64) -> Self {
        LevelSpec::Code(code)
    }
}

impl From<i32> for LevelSpec {
    fn from(code: i32) -> Self {
        LevelSpec::Code(i64::from(code))
    }
}

impl From<u8> for LevelSpec {
    fn from(code: u8) -> Self {
        LevelSpec::Code(i64::from(code))
    }
}

impl From<Level> for LevelSpec {
    fn from(level: Level) -> Self {
        LevelSpec::Code(level.code())
    }
}

/// Returns the lowercase level name for a level given by name or number.
///
/// Names are lowercased as-is. Standard numeric codes map to their name.
/// Unknown codes never fail; they produce the placeholder `"level <code>"`
/// so custom numeric levels still compare deterministically.
///
/// # Examples
///
/// ```
/// use logcap::level_to_name;
///
/// assert_eq!(level_to_name("WARNING"), "warning");
/// assert_eq!(level_to_name(40), "error");
/// assert_eq!(level_to_name(1234), "level 1234");
/// ```
pub fn level_to_name(level: impl Into<LevelSpec>) -> String {
    match level.into() {
        LevelSpec::Name(name) => name.to_lowercase(),
        LevelSpec::Code(code) => match Level::from_code(code) {
            Some(level) => level.name().to_string(),
            None => format!("level {code}"),
        },
    }
}

/// Folds logging method aliases into the level name they record at.
///
/// `exception` calls are a convenience for logging at error severity with
/// error details attached, and `warn` is shorthand for `warning`. Any other
/// method name is returned unchanged.
pub fn normalize_method_name(method_name: &str) -> &str {
    match method_name {
        "exception" => "error",
        "warn" => "warning",
        other => other,
    }
}

//! Event severity
//!
//! Five levels, ordered by severity. Backends gate on them through
//! [`Backend::is_enabled`](super::Backend::is_enabled); there is no `Trace`
//! level because a wrapped backend only answers for these five.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Severity of a [`LogEvent`](super::LogEvent); `Debug < Info < ... < Fatal`
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum LogLevel {
    /// Diagnostic detail, usually disabled in production
    Debug = 1,
    #[default]
    Info = 2,
    Warn = 3,
    Error = 4,
    /// The process cannot continue
    Fatal = 5,
}

impl LogLevel {
    /// All levels, from least to most severe
    pub const ALL: [LogLevel; 5] = [
        LogLevel::Debug,
        LogLevel::Info,
        LogLevel::Warn,
        LogLevel::Error,
        LogLevel::Fatal,
    ];

    /// Upper-case label used by the text backends
    pub fn to_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
            LogLevel::Fatal => "FATAL",
        }
    }

    #[cfg(feature = "console")]
    pub fn color_code(&self) -> colored::Color {
        use colored::Color::*;
        match self {
            LogLevel::Debug => Blue,
            LogLevel::Info => Green,
            LogLevel::Warn => Yellow,
            LogLevel::Error => Red,
            LogLevel::Fatal => BrightRed,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_str())
    }
}

/// Case-insensitive; `WARNING` is accepted for `Warn`
impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LogLevel::ALL
            .into_iter()
            .find(|level| level.to_str().eq_ignore_ascii_case(s))
            .or_else(|| s.eq_ignore_ascii_case("WARNING").then_some(LogLevel::Warn))
            .ok_or_else(|| format!("Invalid log level: '{}'", s))
    }
}

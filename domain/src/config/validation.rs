//! Configuration validation issues.
//!
//! Loaders check the merged configuration and report problems as a list of
//! [`ConfigIssue`]s instead of failing on the first one, so the binary can
//! print every warning and refuse to start only on errors.

use std::fmt;

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal: the configuration cannot work at all.
    Error,
    /// Non-fatal: the configuration works but may not behave as expected.
    Warning,
}

/// Identifies a specific configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigIssueCode {
    EmptyModelName,
    ZeroConcurrency,
    ZeroTimeout,
    /// `max_recovery_attempts = 0` is raised to 1.
    RecoveryAttemptsClamped,
    TemperatureOutOfRange,
    DuplicateSourceId,
    /// A source id spells the "no source" sentinel.
    ReservedSourceId,
    InvalidSourceId,
    MultipleCommunitySources,
    MissingCommunitySource,
    UnknownOutputFormat,
}

/// A detected issue in the configuration.
#[derive(Debug, Clone)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub code: ConfigIssueCode,
    pub message: String,
}

impl ConfigIssue {
    pub fn error(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
        }
    }

    pub fn warning(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{}: {}", level, self.message)
    }
}

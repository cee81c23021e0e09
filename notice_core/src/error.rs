//! Error types and the degradation tags carried by pipeline results.

use std::path::PathBuf;
use thiserror::Error;

use crate::death_type::DeathCategory;

/// Errors from the configuration surface. The per-event pipeline never returns these.
#[derive(Debug, Error)]
pub enum NoticeError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

/// A delivery failure reported by a sink.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SinkError {
    #[error("sink rejected message: {0}")]
    Rejected(String),

    #[error("sink unavailable: {0}")]
    Unavailable(String),

    #[error("sink timed out")]
    Timeout,
}

/// Why a stage fell back to its documented default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Degradation {
    #[error("victim reference unavailable")]
    VictimUnavailable,

    #[error("no damage recorded against victim")]
    AttributionUnavailable,

    #[error("no position or planet data")]
    LocationUndeterminable,

    #[error("location zones disabled")]
    ZonesDisabled,

    #[error("no templates for {0:?}, used Accident")]
    TemplateMissing(DeathCategory),

    #[error("no templates at all, used literal")]
    LiteralTemplate,

    #[error("pipeline panicked, sent plain death message")]
    PipelinePanicked,
}

/// A stage result: always a value, plus the reason if it is a fallback.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome<T> {
    pub value: T,
    pub diagnostic: Option<Degradation>,
}

impl<T> Outcome<T> {
    pub fn ok(value: T) -> Self {
        Self {
            value,
            diagnostic: None,
        }
    }

    pub fn degraded(value: T, diagnostic: Degradation) -> Self {
        Self {
            value,
            diagnostic: Some(diagnostic),
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.diagnostic.is_some()
    }

    pub fn into_value(self) -> T {
        self.value
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Outcome<U> {
        Outcome {
            value: f(self.value),
            diagnostic: self.diagnostic,
        }
    }
}

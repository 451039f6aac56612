//! Error handling for sipcheck
//!
//! One crate error type covers the grammar engine, configuration loading and
//! the server. A failed validation is not an error: it is reported through
//! [`crate::ValidationResult`]. These types describe why the engine itself
//! gave up.

use strum_macros::Display;
use thiserror::Error;

/// A grammar violation found by the SIP parser.
///
/// The `Display` output is the bare diagnostic. Callers that report it to a
/// user add their own prefix.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}{}{}", position_suffix(.position), context_suffix(.context))]
pub struct ParseError {
    pub message: String,
    pub position: Option<(usize, usize)>, // (line, column)
    pub context: Option<String>,
}

impl ParseError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            position: None,
            context: None,
        }
    }

    /// Attach a 1-based line/column position
    pub fn at(mut self, line: usize, column: usize) -> Self {
        self.position = Some((line, column));
        self
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}

fn position_suffix(position: &Option<(usize, usize)>) -> String {
    match position {
        Some((line, column)) => format!(" at line {}, column {}", line, column),
        None => String::new(),
    }
}

fn context_suffix(context: &Option<String>) -> String {
    match context {
        Some(context) => format!(" ({})", context),
        None => String::new(),
    }
}

/// Parser resources that are bounded by [`crate::limits::ParserLimits`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ResourceType {
    #[strum(serialize = "message size")]
    MessageSize,
    #[strum(serialize = "start line length")]
    StartLine,
    #[strum(serialize = "header count")]
    HeaderCount,
    #[strum(serialize = "header line length")]
    HeaderLine,
    #[strum(serialize = "body size")]
    BodySize,
}

/// Unified error type for sipcheck operations
#[derive(Debug, Error)]
pub enum SipCheckError {
    /// The input violates SIP grammar
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The input is larger than the configured parser limits allow
    #[error("{resource} {actual} exceeds limit {limit}")]
    Resource {
        resource: ResourceType,
        actual: usize,
        limit: usize,
    },

    /// Invalid configuration file or value
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl SipCheckError {
    /// Create a resource exhaustion error
    pub fn resource_error(resource: ResourceType, actual: usize, limit: usize) -> Self {
        SipCheckError::Resource {
            resource,
            actual,
            limit,
        }
    }

    pub fn config_error(reason: impl Into<String>) -> Self {
        SipCheckError::Config(reason.into())
    }

    /// Error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            SipCheckError::Parse(_) => "parsing",
            SipCheckError::Resource { .. } => "resource",
            SipCheckError::Config(_) => "config",
            SipCheckError::Io(_) => "io",
        }
    }
}

/// Result type for sipcheck operations
pub type SipCheckResult<T> = Result<T, SipCheckError>;

//! Boundary between the validation pipeline and a SIP grammar engine
//!
//! The pipeline only needs to know the message kind and header names of a
//! message that parsed, or why it did not. [`SipGrammar`] is that contract;
//! [`GrammarEngine`] is the implementation used outside of tests.

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};

use thiserror::Error;
use tracing::debug;

use crate::classify::MessageKind;
use crate::error::{ParseError, SipCheckError, SipCheckResult};
use crate::grammar::{GrammarEngine, HeaderField, SipMessage};

/// A message the grammar engine accepted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedMessage {
    kind: MessageKind,
    header_names: Vec<String>,
}

impl ParsedMessage {
    pub fn new(kind: MessageKind, header_names: Vec<String>) -> Self {
        Self { kind, header_names }
    }

    pub fn kind(&self) -> MessageKind {
        self.kind
    }

    /// Header names in source order, duplicates included
    pub fn header_names(&self) -> &[String] {
        &self.header_names
    }
}

impl From<SipMessage<'_>> for ParsedMessage {
    fn from(message: SipMessage<'_>) -> Self {
        Self {
            kind: message.kind(),
            header_names: message.header_names().map(str::to_string).collect(),
        }
    }
}

/// A standalone header the grammar engine accepted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedHeader {
    name: String,
    kind: String,
}

impl ParsedHeader {
    pub fn new(name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
        }
    }

    /// Canonical header name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Human-readable header kind
    pub fn kind(&self) -> &str {
        &self.kind
    }
}

impl From<HeaderField> for ParsedHeader {
    fn from(field: HeaderField) -> Self {
        Self {
            kind: field.kind.to_string(),
            name: field.name,
        }
    }
}

/// Why the grammar engine did not produce a result
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// The text violates SIP grammar
    #[error(transparent)]
    Parse(ParseError),

    /// Anything else, including engine panics
    #[error("{0}")]
    Unexpected(String),
}

impl From<SipCheckError> for GatewayError {
    fn from(err: SipCheckError) -> Self {
        match err {
            SipCheckError::Parse(parse) => GatewayError::Parse(parse),
            other => GatewayError::Unexpected(other.to_string()),
        }
    }
}

/// A SIP grammar engine as seen by the validation pipeline
pub trait SipGrammar: Send + Sync {
    fn parse_request(&self, text: &str) -> Result<ParsedMessage, GatewayError>;

    fn parse_response(&self, text: &str) -> Result<ParsedMessage, GatewayError>;

    fn parse_header(&self, text: &str) -> Result<ParsedHeader, GatewayError>;
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "grammar engine panicked".to_string()
    }
}

/// Run an engine call, turning a panic into [`GatewayError::Unexpected`]
fn guarded<T, R>(call: impl FnOnce() -> SipCheckResult<T>) -> Result<R, GatewayError>
where
    R: From<T>,
{
    match catch_unwind(AssertUnwindSafe(call)) {
        Ok(Ok(parsed)) => Ok(R::from(parsed)),
        Ok(Err(err)) => {
            debug!(category = err.category(), error = %err, "grammar engine rejected input");
            Err(err.into())
        }
        Err(payload) => {
            let message = panic_message(payload);
            debug!(category = "panic", error = %message, "grammar engine panicked");
            Err(GatewayError::Unexpected(message))
        }
    }
}

fn accepted(message: SipMessage<'_>) -> SipMessage<'_> {
    debug!(
        start_line = message.start_line(),
        status = ?message.status_code(),
        headers = message.headers().len(),
        body_len = message.body().map_or(0, str::len),
        "grammar engine accepted message"
    );
    message
}

impl SipGrammar for GrammarEngine {
    fn parse_request(&self, text: &str) -> Result<ParsedMessage, GatewayError> {
        guarded(|| GrammarEngine::parse_request(self, text).map(accepted))
    }

    fn parse_response(&self, text: &str) -> Result<ParsedMessage, GatewayError> {
        guarded(|| GrammarEngine::parse_response(self, text).map(accepted))
    }

    fn parse_header(&self, text: &str) -> Result<ParsedHeader, GatewayError> {
        guarded(|| GrammarEngine::parse_header(self, text))
    }
}

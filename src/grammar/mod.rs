//! RFC 3261 grammar engine
//!
//! A range-based parser for SIP messages and single headers. It checks the
//! start line, header syntax, the value grammar of the common headers and a
//! few message-level rules. It does not interpret what the headers mean.

pub mod header;
pub mod message;
pub mod names;
pub mod syntax;
pub mod types;
pub mod uri;
pub mod values;

pub use header::HeaderField;
pub use message::SipMessage;
pub use names::HeaderKind;

use crate::classify::MessageKind;
use crate::error::SipCheckResult;
use crate::limits::ParserLimits;

/// The production grammar engine
///
/// Holds only its limits, so one engine can be shared by any number of
/// threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct GrammarEngine {
    limits: ParserLimits,
}

impl GrammarEngine {
    pub fn new(limits: ParserLimits) -> Self {
        Self { limits }
    }

    /// Parse a request with CRLF line endings
    pub fn parse_request<'a>(&self, text: &'a str) -> SipCheckResult<SipMessage<'a>> {
        SipMessage::parse(text, MessageKind::Request, &self.limits)
    }

    /// Parse a response with CRLF line endings
    pub fn parse_response<'a>(&self, text: &'a str) -> SipCheckResult<SipMessage<'a>> {
        SipMessage::parse(text, MessageKind::Response, &self.limits)
    }

    /// Parse a single `name: value` header
    pub fn parse_header(&self, text: &str) -> SipCheckResult<HeaderField> {
        header::parse_single_header(text, &self.limits)
    }
}

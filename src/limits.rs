//! Parser limits for the grammar engine
//!
//! These bound the work done on a single submitted message. The defaults are
//! generous for hand-pasted traces while still rejecting absurd input early.

use serde::{Deserialize, Serialize};

use crate::error::{SipCheckError, SipCheckResult};

/// Maximum SIP message size we'll accept (64KB - 1)
pub const MAX_MESSAGE_SIZE: usize = 65535;

/// Maximum length of the request line or status line
pub const MAX_START_LINE_LENGTH: usize = 8192;

/// Maximum number of headers in a single message
pub const MAX_HEADERS: usize = 256;

/// Maximum length of a single header line (including folding)
pub const MAX_HEADER_LINE_LENGTH: usize = 8192;

/// Maximum size of the message body
pub const MAX_BODY_SIZE: usize = 65535;

/// Maximum CSeq number value
pub const MAX_CSEQ: u32 = 2_147_483_647; // 2^31 - 1

/// Upper bound of Max-Forwards (RFC 3261 Section 20.22 uses 0-255)
pub const MAX_FORWARDS_LIMIT: u32 = 255;

/// Runtime parser limits, loadable from the `[limits]` configuration section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserLimits {
    pub max_message_size: usize,
    pub max_start_line_length: usize,
    pub max_headers: usize,
    pub max_header_line_length: usize,
    pub max_body_size: usize,
    /// Reject messages that lack the headers RFC 3261 Section 8.1.1 requires
    pub require_mandatory_headers: bool,
}

impl Default for ParserLimits {
    fn default() -> Self {
        Self {
            max_message_size: MAX_MESSAGE_SIZE,
            max_start_line_length: MAX_START_LINE_LENGTH,
            max_headers: MAX_HEADERS,
            max_header_line_length: MAX_HEADER_LINE_LENGTH,
            max_body_size: MAX_BODY_SIZE,
            require_mandatory_headers: true,
        }
    }
}

impl ParserLimits {
    /// Limits that only check syntax, not header presence.
    ///
    /// The defaults reject messages missing the headers RFC 3261 Section 8.1.1
    /// requires (To, From, CSeq, Call-ID, Via, and Max-Forwards for requests).
    /// With these limits such a message is valid as long as it parses.
    pub fn lenient() -> Self {
        Self {
            require_mandatory_headers: false,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> SipCheckResult<()> {
        let sizes = [
            ("max_message_size", self.max_message_size),
            ("max_start_line_length", self.max_start_line_length),
            ("max_headers", self.max_headers),
            ("max_header_line_length", self.max_header_line_length),
            ("max_body_size", self.max_body_size),
        ];
        for (name, value) in sizes {
            if value == 0 {
                return Err(SipCheckError::config_error(format!(
                    "limits.{} must be greater than zero",
                    name
                )));
            }
        }
        Ok(())
    }
}

//! Request/response disambiguation

use strum_macros::{Display, EnumString};

use crate::normalize::CRLF;

/// The version token that opens every SIP status line
pub const SIP_VERSION: &str = "SIP/2.0";

/// Whether a SIP message is a request or a response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum MessageKind {
    Request,
    Response,
}

/// Decide which parse path a normalized message should take.
///
/// Only the first line is inspected: if it starts with `SIP/2.0` the text is
/// treated as a response, anything else as a request. A malformed status line
/// therefore ends up on the request path and fails there.
pub fn classify(normalized: &str) -> MessageKind {
    let first_line = normalized
        .split_once(CRLF)
        .map_or(normalized, |(line, _)| line)
        .trim();

    if first_line.starts_with(SIP_VERSION) {
        MessageKind::Response
    } else {
        MessageKind::Request
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_line_is_response() {
        assert_eq!(classify("SIP/2.0 200 OK\r\n"), MessageKind::Response);
        assert_eq!(classify("  SIP/2.0 180 Ringing\r\nVia: x\r\n"), MessageKind::Response);
    }

    #[test]
    fn test_everything_else_is_request() {
        assert_eq!(classify("INVITE sip:bob@biloxi.com SIP/2.0\r\n"), MessageKind::Request);
        assert_eq!(classify("Via: SIP/2.0/UDP host\r\n"), MessageKind::Request);
        assert_eq!(classify("sip/2.0 200 OK\r\n"), MessageKind::Request);
        assert_eq!(classify("garbage"), MessageKind::Request);
        assert_eq!(classify("\r\nSIP/2.0 200 OK\r\n"), MessageKind::Request);
    }

    #[test]
    fn test_only_first_line_counts() {
        assert_eq!(
            classify("OPTIONS sip:a@b SIP/2.0\r\nSIP/2.0 200 OK\r\n"),
            MessageKind::Request
        );
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(MessageKind::Request.to_string(), "Request");
        assert_eq!("response".parse::<MessageKind>().unwrap(), MessageKind::Response);
    }
}

//! SIP message parsing
//!
//! The message is split into start line, header block and body using ranges
//! into the submitted text. Header values are copied only after unfolding.

use std::collections::HashSet;

use crate::classify::{MessageKind, SIP_VERSION};
use crate::error::{ParseError, ResourceType, SipCheckError, SipCheckResult};
use crate::grammar::header::{parse_header_line, unfold, HeaderField};
use crate::grammar::names::HeaderKind;
use crate::grammar::syntax::is_token;
use crate::grammar::types::TextRange;
use crate::grammar::uri::parse_uri;
use crate::grammar::values::cseq_method;
use crate::limits::ParserLimits;
use crate::normalize::CRLF;

/// Headers RFC 3261 Section 8.1.1 requires in every request
const REQUEST_MANDATORY: &[(HeaderKind, &str)] = &[
    (HeaderKind::To, "To"),
    (HeaderKind::From, "From"),
    (HeaderKind::CSeq, "CSeq"),
    (HeaderKind::CallId, "Call-ID"),
    (HeaderKind::Via, "Via"),
    (HeaderKind::MaxForwards, "Max-Forwards"),
];

/// Headers every response must carry
const RESPONSE_MANDATORY: &[(HeaderKind, &str)] = &[
    (HeaderKind::To, "To"),
    (HeaderKind::From, "From"),
    (HeaderKind::CSeq, "CSeq"),
    (HeaderKind::CallId, "Call-ID"),
    (HeaderKind::Via, "Via"),
];

/// Headers that may appear at most once
const SINGLE_INSTANCE: &[HeaderKind] = &[
    HeaderKind::To,
    HeaderKind::From,
    HeaderKind::CallId,
    HeaderKind::CSeq,
    HeaderKind::MaxForwards,
    HeaderKind::ContentLength,
];

/// A SIP message that passed the grammar checks
#[derive(Debug, Clone)]
pub struct SipMessage<'a> {
    text: &'a str,
    kind: MessageKind,
    start_line: TextRange,
    method: Option<TextRange>,
    status_code: Option<u16>,
    headers: Vec<HeaderField>,
    body: Option<TextRange>,
}

impl<'a> SipMessage<'a> {
    /// Parse `text` as a message of the given kind.
    ///
    /// The text is expected to use CRLF line endings. Leading empty lines
    /// before the start line are skipped, as RFC 3261 Section 7.5 allows.
    pub fn parse(text: &'a str, kind: MessageKind, limits: &ParserLimits) -> SipCheckResult<Self> {
        if text.len() > limits.max_message_size {
            return Err(SipCheckError::resource_error(
                ResourceType::MessageSize,
                text.len(),
                limits.max_message_size,
            ));
        }

        let start = text.len() - text.trim_start_matches(CRLF).len();
        let first_line = start / CRLF.len() + 1;

        let start_line_end = text[start..]
            .find(CRLF)
            .map(|end| start + end)
            .ok_or_else(|| ParseError::new("No CRLF after start line").at(first_line, 1))?;
        let start_line = TextRange::new(start, start_line_end);

        if start_line.len() > limits.max_start_line_length {
            return Err(SipCheckError::resource_error(
                ResourceType::StartLine,
                start_line.len(),
                limits.max_start_line_length,
            ));
        }
        if start_line.is_empty() {
            return Err(ParseError::new("Missing start line").at(first_line, 1).into());
        }

        let mut message = SipMessage {
            text,
            kind,
            start_line,
            method: None,
            status_code: None,
            headers: Vec::new(),
            body: None,
        };

        match kind {
            MessageKind::Request => message.method = Some(parse_request_line(text, start_line, first_line)?),
            MessageKind::Response => message.status_code = Some(parse_status_line(text, start_line, first_line)?),
        }

        let body_start = message.parse_headers(start_line_end + CRLF.len(), first_line + 1, limits)?;

        if body_start < text.len() {
            let body = TextRange::new(body_start, text.len());
            if body.len() > limits.max_body_size {
                return Err(SipCheckError::resource_error(
                    ResourceType::BodySize,
                    body.len(),
                    limits.max_body_size,
                ));
            }
            message.body = Some(body);
        }

        if limits.require_mandatory_headers {
            message.validate_required_headers()?;
        }
        message.validate_cseq_method()?;

        Ok(message)
    }

    /// Parse the header block starting at `pos`, returning where the body begins
    fn parse_headers(&mut self, mut pos: usize, mut line_no: usize, limits: &ParserLimits) -> SipCheckResult<usize> {
        let text = self.text;
        let mut seen = HashSet::new();

        // (first line number, byte length including folds, lines)
        let mut pending: Option<(usize, usize, Vec<&str>)> = None;

        let body_start = loop {
            if pos >= text.len() {
                break text.len();
            }
            let (line, next) = match text[pos..].find(CRLF) {
                Some(end) => (&text[pos..pos + end], pos + end + CRLF.len()),
                None => (&text[pos..], text.len()),
            };

            if line.is_empty() {
                break next;
            }

            if line.starts_with([' ', '\t']) {
                // Folded continuation of the previous header
                match pending.as_mut() {
                    Some((_, len, lines)) => {
                        *len += CRLF.len() + line.len();
                        lines.push(line);
                    }
                    None => {
                        return Err(ParseError::new("Continuation line without a header")
                            .at(line_no, 1)
                            .into())
                    }
                }
            } else {
                if let Some(header) = pending.take() {
                    self.process_header(header, limits, &mut seen)?;
                }
                pending = Some((line_no, line.len(), vec![line]));
            }

            pos = next;
            line_no += 1;
        };

        if let Some(header) = pending.take() {
            self.process_header(header, limits, &mut seen)?;
        }

        Ok(body_start)
    }

    /// Process a single header (potentially folded)
    fn process_header(
        &mut self,
        (line_no, len, lines): (usize, usize, Vec<&str>),
        limits: &ParserLimits,
        seen: &mut HashSet<HeaderKind>,
    ) -> SipCheckResult<()> {
        if self.headers.len() + 1 > limits.max_headers {
            return Err(SipCheckError::resource_error(
                ResourceType::HeaderCount,
                self.headers.len() + 1,
                limits.max_headers,
            ));
        }
        if len > limits.max_header_line_length {
            return Err(SipCheckError::resource_error(
                ResourceType::HeaderLine,
                len,
                limits.max_header_line_length,
            ));
        }

        let field = parse_header_line(&unfold(lines), line_no)?;

        if SINGLE_INSTANCE.contains(&field.kind) && !seen.insert(field.kind) {
            return Err(ParseError::new(format!("Duplicate {} header", field.name))
                .at(line_no, 1)
                .into());
        }

        self.headers.push(field);
        Ok(())
    }

    fn validate_required_headers(&self) -> SipCheckResult<()> {
        let required = match self.kind {
            MessageKind::Request => REQUEST_MANDATORY,
            MessageKind::Response => RESPONSE_MANDATORY,
        };
        for (kind, name) in required {
            if self.header(*kind).is_none() {
                return Err(ParseError::new(format!("Missing required {} header", name)).into());
            }
        }
        Ok(())
    }

    /// A request's CSeq must name the request method (RFC 3261 Section 8.1.1.5)
    fn validate_cseq_method(&self) -> SipCheckResult<()> {
        let (Some(method), Some(cseq)) = (self.method(), self.header(HeaderKind::CSeq)) else {
            return Ok(());
        };
        let cseq_method = cseq_method(&cseq.value).map_err(|e| e.at(cseq.line, 1))?;
        if cseq_method != method {
            return Err(ParseError::new(format!(
                "CSeq method {} does not match request method {}",
                cseq_method, method
            ))
            .at(cseq.line, 1)
            .into());
        }
        Ok(())
    }

    pub fn kind(&self) -> MessageKind {
        self.kind
    }

    pub fn start_line(&self) -> &'a str {
        self.start_line.as_str(self.text)
    }

    /// Request method, `None` for responses
    pub fn method(&self) -> Option<&'a str> {
        self.method.map(|range| range.as_str(self.text))
    }

    /// Status code, `None` for requests
    pub fn status_code(&self) -> Option<u16> {
        self.status_code
    }

    /// All headers in source order
    pub fn headers(&self) -> &[HeaderField] {
        &self.headers
    }

    /// First header of the given kind
    pub fn header(&self, kind: HeaderKind) -> Option<&HeaderField> {
        self.headers.iter().find(|h| h.kind == kind)
    }

    /// Canonical header names in source order, duplicates included
    pub fn header_names(&self) -> impl Iterator<Item = &str> {
        self.headers.iter().map(|h| h.name.as_str())
    }

    pub fn body(&self) -> Option<&'a str> {
        self.body.map(|range| range.as_str(self.text))
    }
}

/// Request-Line = Method SP Request-URI SP SIP-Version
fn parse_request_line(text: &str, range: TextRange, line_no: usize) -> Result<TextRange, ParseError> {
    let line = range.as_str(text);
    let parts: Vec<&str> = line.splitn(3, ' ').collect();
    if parts.len() != 3 {
        return Err(ParseError::new(format!("Invalid request line: {}", line)).at(line_no, 1));
    }

    let (method, uri, version) = (parts[0], parts[1], parts[2]);
    if !is_token(method) {
        return Err(ParseError::new(format!("Invalid method: {}", method)).at(line_no, 1));
    }
    parse_uri(uri).map_err(|e| e.at(line_no, method.len() + 2))?;
    if !version.eq_ignore_ascii_case(SIP_VERSION) {
        return Err(ParseError::new(format!("Unsupported SIP version: {}", version))
            .at(line_no, method.len() + uri.len() + 3));
    }

    Ok(TextRange::new(range.start, range.start + method.len()))
}

/// Status-Line = SIP-Version SP Status-Code SP Reason-Phrase
fn parse_status_line(text: &str, range: TextRange, line_no: usize) -> Result<u16, ParseError> {
    let line = range.as_str(text);
    let mut parts = line.splitn(3, ' ');
    let version = parts.next().unwrap_or_default();
    let code = parts.next().unwrap_or_default();

    if !version.eq_ignore_ascii_case(SIP_VERSION) {
        return Err(ParseError::new(format!("Invalid status line: {}", line)).at(line_no, 1));
    }
    if code.len() != 3 || !code.bytes().all(|c| c.is_ascii_digit()) {
        return Err(ParseError::new(format!("Invalid status code: {}", code)).at(line_no, version.len() + 2));
    }

    let status = code
        .parse::<u16>()
        .map_err(|_| ParseError::new(format!("Invalid status code: {}", code)))?;
    if !(100..=699).contains(&status) {
        return Err(ParseError::new(format!("Status code {} out of range", status)).at(line_no, version.len() + 2));
    }

    Ok(status)
}

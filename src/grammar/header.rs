//! Header line parsing shared by full messages and standalone headers

use crate::error::{ParseError, ResourceType, SipCheckError, SipCheckResult};
use crate::grammar::names::{resolve, HeaderKind};
use crate::grammar::syntax::is_token;
use crate::grammar::values::check_value;
use crate::limits::ParserLimits;

/// One header after unfolding and name canonicalization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderField {
    /// Registered spelling, or the name as written for unknown headers
    pub name: String,
    pub kind: HeaderKind,
    /// Unfolded value with surrounding whitespace removed
    pub value: String,
    /// 1-based line the header starts on
    pub line: usize,
}

/// Parse a single unfolded `name: value` line.
///
/// `line` is only used for error positions.
pub fn parse_header_line(text: &str, line: usize) -> Result<HeaderField, ParseError> {
    let colon_pos = text
        .find(':')
        .ok_or_else(|| ParseError::new("No colon in header line").at(line, 1))?;

    // HCOLON allows whitespace between the name and the colon
    let name = text[..colon_pos].trim_end_matches([' ', '\t']);
    if !is_token(name) {
        return Err(ParseError::new(format!("Invalid header name: '{}'", name)).at(line, 1));
    }

    let value = text[colon_pos + 1..].trim();
    let resolved = resolve(name);

    check_value(resolved.kind, &resolved.canonical, value)
        .map_err(|e| e.at(line, colon_pos + 2).with_context(resolved.canonical.to_string()))?;

    Ok(HeaderField {
        name: resolved.canonical.into_owned(),
        kind: resolved.kind,
        value: value.to_string(),
        line,
    })
}

/// Join a header with its continuation lines, replacing each fold with one space
pub fn unfold<'a>(lines: impl IntoIterator<Item = &'a str>) -> String {
    let mut unfolded = String::new();
    for line in lines {
        if unfolded.is_empty() {
            unfolded.push_str(line);
        } else {
            unfolded.push(' ');
            unfolded.push_str(line.trim_start_matches([' ', '\t']));
        }
    }
    unfolded
}

/// Parse standalone header text such as `Call-ID: a84b4c76e66710`.
///
/// Whitespace and control characters around the header are ignored, so
/// pasted text with blank lines or indentation still parses. Continuation
/// lines are unfolded, any other extra line is an error.
pub fn parse_single_header(text: &str, limits: &ParserLimits) -> SipCheckResult<HeaderField> {
    let text = text.trim_matches(is_framing);

    if text.len() > limits.max_header_line_length {
        return Err(SipCheckError::resource_error(
            ResourceType::HeaderLine,
            text.len(),
            limits.max_header_line_length,
        ));
    }

    let lines: Vec<&str> = text
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect();

    if lines[0].trim().is_empty() {
        return Err(ParseError::new("Empty header").at(1, 1).into());
    }
    if let Some(extra) = lines[1..]
        .iter()
        .position(|line| !line.starts_with([' ', '\t']))
    {
        return Err(ParseError::new("Header text spans multiple lines")
            .at(extra + 2, 1)
            .into());
    }

    Ok(parse_header_line(&unfold(lines), 1)?)
}

fn is_framing(c: char) -> bool {
    c.is_ascii_whitespace() || c.is_ascii_control()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_header_line() {
        let field = parse_header_line("i: a84b4c76e66710", 3).unwrap();
        assert_eq!(field.name, "Call-ID");
        assert_eq!(field.kind, HeaderKind::CallId);
        assert_eq!(field.value, "a84b4c76e66710");
        assert_eq!(field.line, 3);
    }

    #[test]
    fn test_header_line_errors_carry_position() {
        let err = parse_header_line("Via SIP/2.0/UDP host", 4).unwrap_err();
        assert_eq!(err.position, Some((4, 1)));

        let err = parse_header_line("Max-Forwards: 999", 2).unwrap_err();
        assert_eq!(err.position, Some((2, 14)));
        assert_eq!(err.context.as_deref(), Some("Max-Forwards"));

        assert!(parse_header_line("Bad Name: x", 1).is_err());
        assert!(parse_header_line(": x", 1).is_err());
    }

    #[test]
    fn test_whitespace_before_colon() {
        let field = parse_header_line("Subject : lunch", 1).unwrap();
        assert_eq!(field.name, "Subject");
        assert_eq!(field.value, "lunch");
    }

    #[test]
    fn test_unfold() {
        assert_eq!(
            unfold(["Subject: I know you're there,", "     pick up the phone"]),
            "Subject: I know you're there, pick up the phone"
        );
    }

    #[test]
    fn test_single_header() {
        let limits = ParserLimits::default();
        let field = parse_single_header("Call-ID: a84b4c76e66710\r\n", &limits).unwrap();
        assert_eq!(field.name, "Call-ID");

        let field = parse_single_header("Subject: first\r\n\tsecond", &limits).unwrap();
        assert_eq!(field.value, "first second");

        let unknown = parse_single_header("X-Custom-Header: anything", &limits).unwrap();
        assert_eq!(unknown.name, "X-Custom-Header");
        assert_eq!(unknown.kind, HeaderKind::Extension);
    }

    #[test]
    fn test_single_header_surrounding_whitespace() {
        let limits = ParserLimits::default();
        for pasted in [
            "Call-ID: a84b4c76e66710\r\n\r\n",
            "  Call-ID: a84b4c76e66710",
            "\r\n\tCall-ID: a84b4c76e66710 \n\n",
        ] {
            let field = parse_single_header(pasted, &limits).unwrap();
            assert_eq!(field.name, "Call-ID");
            assert_eq!(field.value, "a84b4c76e66710");
        }

        // Interior lines still follow the folding rules
        let field = parse_single_header("\r\nSubject: first\r\n second\r\n\r\n", &limits).unwrap();
        assert_eq!(field.value, "first second");
        assert!(parse_single_header("\r\nCall-ID: a\r\nTo: <sip:b@c>\r\n", &limits).is_err());
        assert!(parse_single_header(" \r\n\t ", &limits).is_err());
    }

    #[test]
    fn test_single_header_errors() {
        let limits = ParserLimits::default();
        assert!(parse_single_header("", &limits).is_err());
        assert!(parse_single_header("Call-ID: a\r\nTo: <sip:b@c>", &limits).is_err());
        assert!(matches!(
            parse_single_header("no colon here", &limits),
            Err(SipCheckError::Parse(_))
        ));

        let tight = ParserLimits {
            max_header_line_length: 8,
            ..ParserLimits::default()
        };
        assert!(matches!(
            parse_single_header("Subject: too long for the limit", &tight),
            Err(SipCheckError::Resource { .. })
        ));
    }
}

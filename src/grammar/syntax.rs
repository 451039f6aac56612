//! Character classes and small building blocks of the RFC 3261 grammar

use crate::error::ParseError;

/// token = 1*(alphanum / "-" / "." / "!" / "%" / "*" / "_" / "+" / "`" / "'" / "~")
pub fn is_token_char(c: u8) -> bool {
    c.is_ascii_alphanumeric()
        || matches!(
            c,
            b'-' | b'.' | b'!' | b'%' | b'*' | b'_' | b'+' | b'`' | b'\'' | b'~'
        )
}

pub fn is_token(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(is_token_char)
}

/// word = 1*(token chars / "(" / ")" / "<" / ">" / ":" / "\" / DQUOTE / "/" / "[" / "]" / "?" / "{" / "}")
pub fn is_word_char(c: u8) -> bool {
    is_token_char(c)
        || matches!(
            c,
            b'(' | b')' | b'<' | b'>' | b':' | b'\\' | b'"' | b'/' | b'[' | b']' | b'?' | b'{' | b'}'
        )
}

pub fn is_word(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(is_word_char)
}

/// Check if a byte is a hex digit (0-9, A-F, a-f)
pub fn is_hex_digit(c: u8) -> bool {
    c.is_ascii_hexdigit()
}

/// unreserved = alphanum / mark
pub fn is_unreserved(c: u8) -> bool {
    c.is_ascii_alphanumeric()
        || matches!(c, b'-' | b'_' | b'.' | b'!' | b'~' | b'*' | b'\'' | b'(' | b')')
}

/// user-unreserved = "&" / "=" / "+" / "$" / "," / ";" / "?" / "/"
pub fn is_user_unreserved(c: u8) -> bool {
    matches!(c, b'&' | b'=' | b'+' | b'$' | b',' | b';' | b'?' | b'/')
}

fn is_password_char(c: u8) -> bool {
    is_unreserved(c) || matches!(c, b'&' | b'=' | b'+' | b'$' | b',')
}

/// Check a string made of allowed characters and %HH escapes
fn is_escaped_run(s: &str, allowed: impl Fn(u8) -> bool) -> bool {
    let bytes = s.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        let c = bytes[i];
        if c == b'%' {
            // Need at least 2 more characters for %HH
            if i + 2 >= bytes.len() {
                return false;
            }
            if !is_hex_digit(bytes[i + 1]) || !is_hex_digit(bytes[i + 2]) {
                return false;
            }
            i += 3;
            continue;
        }
        if !allowed(c) {
            return false;
        }
        i += 1;
    }
    true
}

/// Validate the user part of a SIP URI according to RFC 3261
pub fn is_valid_user_part(user: &str) -> bool {
    !user.is_empty() && is_escaped_run(user, |c| is_unreserved(c) || is_user_unreserved(c))
}

pub fn is_valid_password(password: &str) -> bool {
    is_escaped_run(password, is_password_char)
}

/// pname / pvalue / hname / hvalue of a SIP URI
pub fn is_uri_param_text(s: &str) -> bool {
    !s.is_empty()
        && is_escaped_run(s, |c| {
            is_unreserved(c) || matches!(c, b'[' | b']' | b'/' | b':' | b'&' | b'+' | b'$' | b'?')
        })
}

/// hostname / IPv4address / IPv6reference
pub fn is_valid_host(host: &str) -> bool {
    if let Some(inner) = host.strip_prefix('[') {
        return match inner.strip_suffix(']') {
            Some(v6) => {
                !v6.is_empty()
                    && v6.contains(':')
                    && v6.bytes().all(|c| is_hex_digit(c) || c == b':' || c == b'.')
            }
            None => false,
        };
    }

    let trimmed = host.strip_suffix('.').unwrap_or(host);
    !trimmed.is_empty()
        && trimmed.split('.').all(|label| {
            !label.is_empty()
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label.bytes().all(|c| c.is_ascii_alphanumeric() || c == b'-')
        })
}

/// Split `host[:port]`, accepting bracketed IPv6 references
pub fn split_host_port(host_port: &str) -> Result<(&str, Option<u16>), ParseError> {
    let (host, port) = if host_port.starts_with('[') {
        match host_port.find(']') {
            Some(end) => {
                let (host, rest) = host_port.split_at(end + 1);
                match rest {
                    "" => (host, None),
                    _ => match rest.strip_prefix(':') {
                        Some(port) => (host, Some(port)),
                        None => {
                            return Err(ParseError::new(format!(
                                "Unexpected text after IPv6 reference: {}",
                                host_port
                            )))
                        }
                    },
                }
            }
            None => {
                return Err(ParseError::new(format!("Unclosed IPv6 reference: {}", host_port)))
            }
        }
    } else {
        match host_port.split_once(':') {
            Some((host, port)) => (host, Some(port)),
            None => (host_port, None),
        }
    };

    if !is_valid_host(host) {
        return Err(ParseError::new(format!("Invalid host: {}", host)));
    }

    let port = match port {
        Some(port) => Some(
            port.parse::<u16>()
                .map_err(|_| ParseError::new(format!("Invalid port: {}", port)))?,
        ),
        None => None,
    };

    Ok((host, port))
}

/// quoted-string = DQUOTE *(qdtext / quoted-pair) DQUOTE
pub fn is_quoted_string(s: &str) -> bool {
    let bytes = s.as_bytes();
    if bytes.len() < 2 || bytes[0] != b'"' || bytes[bytes.len() - 1] != b'"' {
        return false;
    }
    let inner = &bytes[1..bytes.len() - 1];
    let mut i = 0;
    while i < inner.len() {
        match inner[i] {
            b'\\' => {
                if i + 1 >= inner.len() {
                    return false;
                }
                i += 2;
            }
            b'"' => return false,
            _ => i += 1,
        }
    }
    true
}

/// Split on `sep` outside of quoted strings and angle brackets
pub fn split_top_level(s: &str, sep: u8) -> Vec<&str> {
    let bytes = s.as_bytes();
    let mut parts = Vec::new();
    let mut in_quotes = false;
    let mut escaped = false;
    let mut depth = 0usize;
    let mut start = 0;

    for (i, &c) in bytes.iter().enumerate() {
        if in_quotes {
            match c {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_quotes = false,
                _ => {}
            }
            continue;
        }
        match c {
            b'"' => in_quotes = true,
            b'<' => depth += 1,
            b'>' => depth = depth.saturating_sub(1),
            _ if c == sep && depth == 0 => {
                parts.push(&s[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&s[start..]);
    parts
}

/// Find `needle` outside of quoted strings
pub fn find_unquoted(s: &str, needle: u8) -> Option<usize> {
    let mut in_quotes = false;
    let mut escaped = false;
    for (i, &c) in s.as_bytes().iter().enumerate() {
        if in_quotes {
            match c {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_quotes = false,
                _ => {}
            }
        } else if c == b'"' {
            in_quotes = true;
        } else if c == needle {
            return Some(i);
        }
    }
    None
}

/// Validate header field value for characters SIP never allows
pub fn validate_header_value(value: &str) -> Result<(), ParseError> {
    if value.contains('\r') || value.contains('\n') {
        return Err(ParseError::new("Line break inside header value"));
    }
    if value.contains('\0') {
        return Err(ParseError::new("Null byte in header value"));
    }
    Ok(())
}

/// Validate numeric header values
pub fn validate_numeric(name: &str, value: &str, min: Option<u32>, max: Option<u32>) -> Result<u32, ParseError> {
    let value = value.trim();
    if value.is_empty() || !value.bytes().all(|c| c.is_ascii_digit()) {
        return Err(ParseError::new(format!("{} must be numeric: {}", name, value)));
    }
    let num = value
        .parse::<u32>()
        .map_err(|_| ParseError::new(format!("{} value out of range: {}", name, value)))?;

    if let Some(min_val) = min {
        if num < min_val {
            return Err(ParseError::new(format!(
                "{} value {} is below minimum {}",
                name, num, min_val
            )));
        }
    }

    if let Some(max_val) = max {
        if num > max_val {
            return Err(ParseError::new(format!(
                "{} value {} exceeds maximum {}",
                name, num, max_val
            )));
        }
    }

    Ok(num)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens() {
        assert!(is_token("INVITE"));
        assert!(is_token("100rel"));
        assert!(is_token("presence.winfo"));
        assert!(!is_token(""));
        assert!(!is_token("Via:"));
        assert!(!is_token("two words"));
    }

    #[test]
    fn test_user_part() {
        assert!(is_valid_user_part("alice"));
        assert!(is_valid_user_part("+2693347248;tgrp=CTHuaweiCore3CLI*4;trunk-context=10.18.49.164"));
        assert!(is_valid_user_part("al%20ice"));
        assert!(!is_valid_user_part("al%2"));
        assert!(!is_valid_user_part("al%zzice"));
        assert!(!is_valid_user_part("bad user"));
        assert!(!is_valid_user_part(""));
    }

    #[test]
    fn test_hosts() {
        assert!(is_valid_host("biloxi.com"));
        assert!(is_valid_host("197.255.224.100"));
        assert!(is_valid_host("[2001:db8::1]"));
        assert!(is_valid_host("example.com."));
        assert!(!is_valid_host(""));
        assert!(!is_valid_host("bad_host.com"));
        assert!(!is_valid_host("[2001:db8::1"));
        assert!(!is_valid_host("-lead.com"));
    }

    #[test]
    fn test_host_port() {
        assert_eq!(split_host_port("pc33.atlanta.com").unwrap(), ("pc33.atlanta.com", None));
        assert_eq!(split_host_port("10.0.0.1:5060").unwrap(), ("10.0.0.1", Some(5060)));
        assert_eq!(split_host_port("[::1]:5061").unwrap(), ("[::1]", Some(5061)));
        assert!(split_host_port("host:99999").is_err());
        assert!(split_host_port("host:").is_err());
    }

    #[test]
    fn test_split_top_level() {
        let parts = split_top_level(r#""Doe, John" <sip:j@a.com>, <sip:b@c.com;x=1,2>"#, b',');
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0], r#""Doe, John" <sip:j@a.com>"#);
    }

    #[test]
    fn test_quoted_string() {
        assert!(is_quoted_string(r#""Alice""#));
        assert!(is_quoted_string(r#""say \"hi\"""#));
        assert!(!is_quoted_string(r#""open"#));
        assert!(!is_quoted_string(r#""a"b""#));
    }

    #[test]
    fn test_header_value_sanitizing() {
        assert!(validate_header_value("normal value").is_ok());
        assert!(validate_header_value("bad\0value").is_err());
        assert!(validate_header_value("bad\r\nvalue").is_err());
    }

    #[test]
    fn test_numeric() {
        assert_eq!(validate_numeric("Max-Forwards", "70", None, Some(255)).unwrap(), 70);
        assert!(validate_numeric("Max-Forwards", "256", None, Some(255)).is_err());
        assert!(validate_numeric("Content-Length", "-1", None, None).is_err());
        assert!(validate_numeric("Content-Length", "abc", None, None).is_err());
        assert!(validate_numeric("Content-Length", "99999999999", None, None).is_err());
    }
}

//! URI parsing for request lines and address headers

use crate::error::ParseError;
use crate::grammar::syntax::{
    is_uri_param_text, is_valid_password, is_valid_user_part, split_host_port,
};
use crate::grammar::types::Scheme;

/// A parsed URI, borrowing from the header or start line it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SipUri<'a> {
    pub scheme: Scheme,
    /// User part for sip/sips, subscriber number for tel
    pub user: Option<&'a str>,
    pub host: Option<&'a str>,
    pub port: Option<u16>,
    pub params: Vec<(&'a str, Option<&'a str>)>,
    pub headers: Option<&'a str>,
}

impl SipUri<'_> {
    fn new(scheme: Scheme) -> Self {
        Self {
            scheme,
            user: None,
            host: None,
            port: None,
            params: Vec::new(),
            headers: None,
        }
    }
}

/// scheme = ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )
fn is_valid_scheme(scheme: &str) -> bool {
    let mut bytes = scheme.bytes();
    match bytes.next() {
        Some(first) if first.is_ascii_alphabetic() => {
            bytes.all(|c| c.is_ascii_alphanumeric() || matches!(c, b'+' | b'-' | b'.'))
        }
        _ => false,
    }
}

/// Parse an absolute URI.
///
/// `sip` and `sips` URIs are checked in full, `tel` URIs for a plausible
/// subscriber number, any other scheme only for shape.
pub fn parse_uri(uri: &str) -> Result<SipUri<'_>, ParseError> {
    if uri.bytes().any(|c| c.is_ascii_whitespace() || c.is_ascii_control()) {
        return Err(ParseError::new(format!("Whitespace in URI: {}", uri)));
    }

    let colon_pos = uri
        .find(':')
        .ok_or_else(|| ParseError::new(format!("No scheme found in URI: {}", uri)))?;
    let scheme_str = &uri[..colon_pos];

    if !is_valid_scheme(scheme_str) {
        return Err(ParseError::new(format!("Invalid scheme: {}", scheme_str)));
    }
    let scheme: Scheme = scheme_str
        .parse()
        .map_err(|_| ParseError::new(format!("Invalid scheme: {}", scheme_str)))?;

    let rest = &uri[colon_pos + 1..];
    match scheme {
        Scheme::Sip | Scheme::Sips => parse_sip_uri(scheme, rest),
        Scheme::Tel => parse_tel_uri(rest),
        Scheme::Other(_) => {
            if rest.is_empty() {
                return Err(ParseError::new(format!("Empty URI after scheme: {}", uri)));
            }
            Ok(SipUri::new(scheme))
        }
    }
}

fn parse_sip_uri(scheme: Scheme, rest: &str) -> Result<SipUri<'_>, ParseError> {
    let mut uri = SipUri::new(scheme);

    // Check for user info (before @)
    let host_part = match rest.find('@') {
        Some(at_pos) => {
            let user_info = &rest[..at_pos];
            let (user, password) = match user_info.split_once(':') {
                Some((user, password)) => (user, Some(password)),
                None => (user_info, None),
            };

            if !is_valid_user_part(user) {
                return Err(ParseError::new(format!(
                    "Invalid user part contains prohibited characters: {}",
                    user
                )));
            }
            if let Some(password) = password {
                if !is_valid_password(password) {
                    return Err(ParseError::new("Invalid password in URI"));
                }
            }

            uri.user = Some(user);
            &rest[at_pos + 1..]
        }
        None => rest,
    };

    // Split by semicolon (params) or question mark (headers)
    let host_port_end = host_part.find([';', '?']).unwrap_or(host_part.len());
    let (host, port) = split_host_port(&host_part[..host_port_end])?;
    uri.host = Some(host);
    uri.port = port;

    let tail = &host_part[host_port_end..];
    let (params, headers) = match tail.find('?') {
        Some(question_pos) => (&tail[..question_pos], Some(&tail[question_pos + 1..])),
        None => (tail, None),
    };

    if let Some(params) = params.strip_prefix(';') {
        uri.params = parse_uri_params(params)?;
    }

    if let Some(headers) = headers {
        for header in headers.split('&') {
            let valid = match header.split_once('=') {
                Some((name, value)) => {
                    is_uri_param_text(name) && (value.is_empty() || is_uri_param_text(value))
                }
                None => false,
            };
            if !valid {
                return Err(ParseError::new(format!("Invalid URI header: {}", header)));
            }
        }
        uri.headers = Some(headers);
    }

    Ok(uri)
}

fn parse_tel_uri(rest: &str) -> Result<SipUri<'_>, ParseError> {
    let mut uri = SipUri::new(Scheme::Tel);

    let (number, params) = match rest.split_once(';') {
        Some((number, params)) => (number, Some(params)),
        None => (rest, None),
    };

    let valid_number = !number.is_empty()
        && number.bytes().any(|c| c.is_ascii_hexdigit())
        && number.bytes().all(|c| {
            c.is_ascii_hexdigit()
                || matches!(c, b'*' | b'#' | b'+' | b'-' | b'.' | b'(' | b')' | b'p' | b'w' | b'P' | b'W')
        });
    if !valid_number {
        return Err(ParseError::new(format!("Invalid telephone number: {}", number)));
    }
    uri.user = Some(number);

    if let Some(params) = params {
        uri.params = parse_uri_params(params)?;
    }

    Ok(uri)
}

/// Parse `;`-separated URI parameters (the leading `;` already stripped)
fn parse_uri_params(params: &str) -> Result<Vec<(&str, Option<&str>)>, ParseError> {
    let mut parsed = Vec::new();
    for param in params.split(';') {
        let (name, value) = match param.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (param, None),
        };
        if !is_uri_param_text(name) || value.is_some_and(|v| !is_uri_param_text(v)) {
            return Err(ParseError::new(format!("Invalid URI parameter: '{}'", param)));
        }
        parsed.push((name, value));
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sip_uri() {
        let uri = parse_uri("sip:alice@atlanta.com:5060;transport=tcp;lr").unwrap();
        assert_eq!(uri.scheme, Scheme::Sip);
        assert_eq!(uri.user, Some("alice"));
        assert_eq!(uri.host, Some("atlanta.com"));
        assert_eq!(uri.port, Some(5060));
        assert_eq!(uri.params, vec![("transport", Some("tcp")), ("lr", None)]);
    }

    #[test]
    fn test_parse_uri_without_user() {
        let uri = parse_uri("sips:ss2.biloxi.example.com").unwrap();
        assert_eq!(uri.scheme, Scheme::Sips);
        assert_eq!(uri.user, None);
        assert_eq!(uri.host, Some("ss2.biloxi.example.com"));
    }

    #[test]
    fn test_parse_uri_with_headers_and_password() {
        let uri = parse_uri("sip:bob:secret@biloxi.com?subject=project%20x&priority=urgent").unwrap();
        assert_eq!(uri.user, Some("bob"));
        assert_eq!(uri.headers, Some("subject=project%20x&priority=urgent"));
    }

    #[test]
    fn test_parse_tel_uri() {
        let uri = parse_uri("tel:+1-201-555-0123;phone-context=example.com").unwrap();
        assert_eq!(uri.scheme, Scheme::Tel);
        assert_eq!(uri.user, Some("+1-201-555-0123"));
        assert!(parse_uri("tel:").is_err());
        assert!(parse_uri("tel:call-me").is_err());
    }

    #[test]
    fn test_other_schemes_checked_for_shape() {
        assert!(parse_uri("urn:service:sos").is_ok());
        assert!(parse_uri("mailto:").is_err());
    }

    #[test]
    fn test_invalid_uris() {
        assert!(parse_uri("alice@atlanta.com").is_err());
        assert!(parse_uri("1sip:alice@atlanta.com").is_err());
        assert!(parse_uri("sip:bad user@atlanta.com").is_err());
        assert!(parse_uri("sip:alice@").is_err());
        assert!(parse_uri("sip:alice@atlanta.com:port").is_err());
        assert!(parse_uri("sip:alice@atlanta.com;;lr").is_err());
        assert!(parse_uri("sip:alice@atlanta.com?novalue").is_err());
    }
}

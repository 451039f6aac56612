//! Header value grammars
//!
//! Only the headers listed in [`check_value`] get a typed check. Everything
//! else is accepted as long as it is clean header text.

use crate::error::ParseError;
use crate::grammar::names::HeaderKind;
use crate::grammar::syntax::{
    find_unquoted, is_quoted_string, is_token, is_token_char, is_word, split_host_port,
    split_top_level, validate_header_value, validate_numeric,
};
use crate::grammar::uri::parse_uri;
use crate::limits::{MAX_CSEQ, MAX_FORWARDS_LIMIT};

type ValueResult<T> = Result<T, ParseError>;

/// Check a header value against the grammar of its kind.
///
/// `name` is the canonical header name and only shows up in diagnostics.
pub fn check_value(kind: HeaderKind, name: &str, value: &str) -> ValueResult<()> {
    validate_header_value(value)?;
    let value = value.trim();

    match kind {
        HeaderKind::Via => check_list(name, value, false, check_via_parm),
        HeaderKind::From
        | HeaderKind::To
        | HeaderKind::ReplyTo
        | HeaderKind::ReferTo
        | HeaderKind::ReferredBy => check_address(name, value),
        HeaderKind::Contact if value == "*" => Ok(()),
        HeaderKind::Contact => check_list(name, value, false, |v| check_address(name, v)),
        HeaderKind::Route | HeaderKind::RecordRoute | HeaderKind::Path | HeaderKind::ServiceRoute => {
            check_list(name, value, false, |v| check_route(name, v))
        }
        HeaderKind::CSeq => cseq_method(value).map(|_| ()),
        HeaderKind::CallId => check_call_id(value),
        HeaderKind::MaxForwards => {
            validate_numeric(name, value, None, Some(MAX_FORWARDS_LIMIT)).map(|_| ())
        }
        HeaderKind::ContentLength | HeaderKind::Expires | HeaderKind::MinExpires | HeaderKind::RSeq => {
            validate_numeric(name, value, None, None).map(|_| ())
        }
        HeaderKind::MinSE | HeaderKind::SessionExpires => {
            let (head, params) = split_params(value);
            validate_numeric(name, head, None, None)?;
            check_params(name, params)
        }
        HeaderKind::RAck => check_rack(value),
        HeaderKind::ContentType => check_media_type(name, value),
        HeaderKind::Accept => check_list(name, value, true, |v| check_media_type(name, v)),
        HeaderKind::Allow
        | HeaderKind::Supported
        | HeaderKind::AcceptEncoding
        | HeaderKind::AcceptLanguage => check_list(name, value, true, |v| check_token_param(name, v)),
        HeaderKind::Require
        | HeaderKind::ProxyRequire
        | HeaderKind::Unsupported
        | HeaderKind::AllowEvents
        | HeaderKind::ContentEncoding => check_list(name, value, false, |v| check_token_param(name, v)),
        HeaderKind::Event | HeaderKind::SubscriptionState => check_token_param(name, value),
        _ => Ok(()),
    }
}

/// Extract the method from a CSeq value after checking its syntax
pub fn cseq_method(value: &str) -> ValueResult<&str> {
    let mut parts = value.split_whitespace();
    let (number, method) = match (parts.next(), parts.next(), parts.next()) {
        (Some(number), Some(method), None) => (number, method),
        _ => {
            return Err(ParseError::new(format!(
                "CSeq must be a sequence number and a method: {}",
                value
            )))
        }
    };

    validate_numeric("CSeq", number, None, Some(MAX_CSEQ))?;
    if !is_token(method) {
        return Err(ParseError::new(format!("Invalid method in CSeq: {}", method)));
    }
    Ok(method)
}

/// Run `check` on every element of a comma-separated header value
fn check_list<F>(name: &str, value: &str, allow_empty: bool, check: F) -> ValueResult<()>
where
    F: Fn(&str) -> ValueResult<()>,
{
    if value.is_empty() {
        return if allow_empty {
            Ok(())
        } else {
            Err(ParseError::new(format!("{} header value is empty", name)))
        };
    }

    for element in split_top_level(value, b',') {
        let element = element.trim();
        if element.is_empty() {
            return Err(ParseError::new(format!("Empty element in {} list", name)));
        }
        check(element)?;
    }
    Ok(())
}

/// Split `head;params` at the first unquoted semicolon
fn split_params(value: &str) -> (&str, &str) {
    match find_unquoted(value, b';') {
        Some(pos) => (value[..pos].trim(), &value[pos..]),
        None => (value.trim(), ""),
    }
}

/// generic-param = token [ EQUAL gen-value ], gen-value = token / host / quoted-string
fn check_params(name: &str, params: &str) -> ValueResult<()> {
    let params = params.trim();
    if params.is_empty() {
        return Ok(());
    }
    let params = params.strip_prefix(';').ok_or_else(|| {
        ParseError::new(format!("Unexpected text in {} header: {}", name, params))
    })?;

    for param in split_top_level(params, b';') {
        let param = param.trim();
        let (key, value) = match param.split_once('=') {
            Some((key, value)) => (key.trim_end(), Some(value.trim_start())),
            None => (param, None),
        };

        if !is_token(key) {
            return Err(ParseError::new(format!(
                "Invalid parameter in {} header: '{}'",
                name, param
            )));
        }
        if let Some(value) = value {
            let valid = is_quoted_string(value)
                || (!value.is_empty()
                    && value
                        .bytes()
                        .all(|c| is_token_char(c) || matches!(c, b':' | b'[' | b']')));
            if !valid {
                return Err(ParseError::new(format!(
                    "Invalid value for parameter '{}' in {} header: {}",
                    key, name, value
                )));
            }
        }
    }
    Ok(())
}

/// via-parm = sent-protocol LWS sent-by *( SEMI via-params )
fn check_via_parm(via: &str) -> ValueResult<()> {
    let (head, params) = split_params(via);

    let parts: Vec<&str> = head.splitn(3, '/').collect();
    if parts.len() != 3 {
        return Err(ParseError::new(format!("Invalid sent-protocol in Via: {}", head)));
    }

    let protocol = parts[0].trim();
    let version = parts[1].trim();
    if !protocol.eq_ignore_ascii_case("SIP") || version != "2.0" {
        return Err(ParseError::new(format!(
            "Unsupported protocol in Via: {}/{}",
            protocol, version
        )));
    }

    let (transport, sent_by) = parts[2]
        .trim_start()
        .split_once([' ', '\t'])
        .ok_or_else(|| ParseError::new(format!("Missing sent-by in Via: {}", head)))?;
    if !is_token(transport) {
        return Err(ParseError::new(format!("Invalid transport in Via: {}", transport)));
    }
    split_host_port(sent_by.trim())?;

    check_params("Via", params)
}

/// name-addr / addr-spec followed by header parameters
fn check_address(name: &str, value: &str) -> ValueResult<()> {
    if value.is_empty() {
        return Err(ParseError::new(format!("{} header value is empty", name)));
    }

    let params = match find_unquoted(value, b'<') {
        Some(open) => {
            let display_name = value[..open].trim();
            let valid_display_name = display_name.is_empty()
                || is_quoted_string(display_name)
                || display_name.split_whitespace().all(is_token);
            if !valid_display_name {
                return Err(ParseError::new(format!(
                    "Invalid display name in {} header: {}",
                    name, display_name
                )));
            }

            let after = &value[open + 1..];
            let close = after.find('>').ok_or_else(|| {
                ParseError::new(format!("Unclosed '<' in {} header", name))
            })?;
            parse_uri(&after[..close])?;
            &after[close + 1..]
        }
        None => {
            // Without angle brackets any ';' starts the header parameters
            let (addr_spec, params) = split_params(value);
            parse_uri(addr_spec)?;
            params
        }
    };

    check_params(name, params)
}

/// route-param = name-addr *( SEMI rr-param )
fn check_route(name: &str, value: &str) -> ValueResult<()> {
    if find_unquoted(value, b'<').is_none() {
        return Err(ParseError::new(format!(
            "{} entries must use angle brackets: {}",
            name, value
        )));
    }
    check_address(name, value)
}

/// callid = word [ "@" word ]
fn check_call_id(value: &str) -> ValueResult<()> {
    let valid = match value.split_once('@') {
        Some((local, host)) => is_word(local) && is_word(host),
        None => is_word(value),
    };
    if !valid {
        return Err(ParseError::new(format!("Invalid Call-ID: {}", value)));
    }
    Ok(())
}

/// RAck = response-num LWS CSeq-num LWS Method
fn check_rack(value: &str) -> ValueResult<()> {
    let parts: Vec<&str> = value.split_whitespace().collect();
    if parts.len() != 3 {
        return Err(ParseError::new(format!(
            "RAck must be a response number, a CSeq number and a method: {}",
            value
        )));
    }
    validate_numeric("RAck", parts[0], Some(1), None)?;
    validate_numeric("RAck", parts[1], None, Some(MAX_CSEQ))?;
    if !is_token(parts[2]) {
        return Err(ParseError::new(format!("Invalid method in RAck: {}", parts[2])));
    }
    Ok(())
}

/// media-type = m-type SLASH m-subtype *( SEMI m-parameter )
fn check_media_type(name: &str, value: &str) -> ValueResult<()> {
    let (head, params) = split_params(value);
    let valid = match head.split_once('/') {
        Some((m_type, m_subtype)) => is_token(m_type.trim()) && is_token(m_subtype.trim()),
        None => false,
    };
    if !valid {
        return Err(ParseError::new(format!("Invalid media type in {} header: {}", name, head)));
    }
    check_params(name, params)
}

/// token *( SEMI generic-param )
fn check_token_param(name: &str, value: &str) -> ValueResult<()> {
    let (head, params) = split_params(value);
    if !is_token(head) {
        return Err(ParseError::new(format!("Invalid token in {} header: {}", name, head)));
    }
    check_params(name, params)
}

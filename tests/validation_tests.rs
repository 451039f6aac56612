use sipcheck::{ParserLimits, RfcIndex, Validator};

/// INVITE from the RFC 3261 Section 24.2 call flow, bare LF line endings
const INVITE: &str = "INVITE sip:bob@biloxi.com SIP/2.0
Via: SIP/2.0/UDP pc33.atlanta.com;branch=z9hG4bKnashds8
Max-Forwards: 70
To: Bob <sip:bob@biloxi.com>
From: Alice <sip:alice@atlanta.com>;tag=1928301774
Call-ID: a84b4c76e66710
CSeq: 314159 INVITE
Contact: <sip:alice@pc33.atlanta.com>
Content-Type: application/sdp
Content-Length: 142

v=0
o=alice 2890844526 2890844526 IN IP4 pc33.atlanta.com
";

const RINGING: &str = "SIP/2.0 180 Ringing\r\n\
Via: SIP/2.0/UDP server10.biloxi.com;branch=z9hG4bK4b43c2ff8.1;received=192.0.2.3\r\n\
Via: SIP/2.0/UDP bigbox3.site3.atlanta.com;branch=z9hG4bK77ef4c2312983.1;received=192.0.2.2\r\n\
Via: SIP/2.0/UDP pc33.atlanta.com;branch=z9hG4bKnashds8;received=192.0.2.1\r\n\
Record-Route: <sip:server10.biloxi.com;lr>, <sip:bigbox3.site3.atlanta.com;lr>\r\n\
To: Bob <sip:bob@biloxi.com>;tag=a6c85cf\r\n\
From: Alice <sip:alice@atlanta.com>;tag=1928301774\r\n\
Call-ID: a84b4c76e66710\r\n\
Contact: <sip:bob@192.0.2.4>\r\n\
CSeq: 314159 INVITE\r\n\
Content-Length: 0\r\n\
\r\n";

const COMPACT_OPTIONS: &str = "OPTIONS sip:carol@chicago.com SIP/2.0\r\n\
v: SIP/2.0/TCP pc33.atlanta.com;branch=z9hG4bKhjhs8ass877\r\n\
Max-Forwards: 70\r\n\
t: <sip:carol@chicago.com>\r\n\
f: Alice <sip:alice@atlanta.com>;tag=1928301774\r\n\
i: a84b4c76e66710\r\n\
CSeq: 63104 OPTIONS\r\n\
m: <sip:alice@pc33.atlanta.com>\r\n\
X-Custom-Header: anything\r\n\
l: 0\r\n\
\r\n";

#[test]
fn test_invite_is_valid() {
    let result = Validator::default().validate_message(INVITE);

    assert!(result.is_valid(), "errors: {:?}", result.errors());
    assert!(result.errors().is_empty());
    assert_eq!(result.messages()[0], "Message successfully parsed");
    assert_eq!(result.messages()[1], "Message type: Request");
    assert_eq!(result.messages()[2], "Found 9 headers in the message");

    let names: Vec<&str> = result.headers().iter().map(|h| h.canonical_name()).collect();
    assert_eq!(
        names,
        vec![
            "Via",
            "Max-Forwards",
            "To",
            "From",
            "Call-ID",
            "CSeq",
            "Contact",
            "Content-Type",
            "Content-Length"
        ]
    );
    assert!(result.headers().iter().all(|h| h.header_type() == "SIP Header"));
    assert!(result.headers().iter().all(|h| h.rfc_reference().is_some()));
}

#[test]
fn test_response_with_repeated_headers() {
    let result = Validator::default().validate_message(RINGING);

    assert!(result.is_valid(), "errors: {:?}", result.errors());
    assert_eq!(result.messages()[1], "Message type: Response");
    assert_eq!(result.headers().len(), 10);
    assert_eq!(
        result.messages()[2],
        format!("Found {} headers in the message", result.headers().len())
    );

    let vias = result
        .headers()
        .iter()
        .filter(|h| h.canonical_name() == "Via")
        .count();
    assert_eq!(vias, 3);

    let record_route = &result.headers()[3];
    assert_eq!(record_route.canonical_name(), "Record-Route");
    assert_eq!(
        record_route.rfc_reference().map(|r| r.display_text()),
        Some("RFC 3261 Section 20.30".to_string())
    );
}

#[test]
fn test_compact_forms_and_extension_headers() {
    let result = Validator::default().validate_message(COMPACT_OPTIONS);

    assert!(result.is_valid(), "errors: {:?}", result.errors());
    let summary = format!("Found {} headers in the message", result.headers().len());
    assert!(result.messages().contains(&summary));

    let names: Vec<&str> = result.headers().iter().map(|h| h.canonical_name()).collect();
    assert_eq!(names[0], "Via");
    assert_eq!(names[2], "To");
    assert_eq!(names[3], "From");
    assert_eq!(names[4], "Call-ID");
    assert_eq!(names[6], "Contact");
    assert_eq!(names[8], "Content-Length");

    let custom = &result.headers()[7];
    assert_eq!(custom.canonical_name(), "X-Custom-Header");
    assert!(custom.rfc_reference().is_none());
}

#[test]
fn test_broken_message_reports_one_parse_error() {
    let validator = Validator::default();

    for broken in [
        "this is not a SIP message",
        "INVITE sip:bob@biloxi.com HTTP/1.1\r\nVia: SIP/2.0/UDP h;branch=z9hG4bK1\r\n\r\n",
        "SIP/2.0 999 Nope\r\n\r\n",
        "INVITE sip:bob@biloxi.com SIP/2.0\r\nNo colon here\r\n\r\n",
    ] {
        let result = validator.validate_message(broken);
        assert!(!result.is_valid(), "accepted: {:?}", broken);
        assert_eq!(result.errors().len(), 1, "errors: {:?}", result.errors());
        assert!(result.errors()[0].starts_with("Parse error: "));
        assert!(result.headers().is_empty());
        assert!(result.messages().is_empty());
    }
}

#[test]
fn test_missing_mandatory_header() {
    let without_call_id = INVITE.replace("Call-ID: a84b4c76e66710\n", "");
    let result = Validator::default().validate_message(&without_call_id);
    assert!(!result.is_valid());
    assert!(result.errors()[0].contains("Call-ID"), "errors: {:?}", result.errors());

    let lenient = Validator::new(ParserLimits::lenient());
    assert!(lenient.validate_message(&without_call_id).is_valid());
}

#[test]
fn test_bare_request_needs_lenient_limits() {
    let bare = "OPTIONS sip:carol@chicago.com SIP/2.0\r\nCSeq: 1 OPTIONS\r\n\r\n";

    let strict = Validator::default().validate_message(bare);
    assert!(!strict.is_valid());
    assert!(strict.errors()[0].starts_with("Parse error: Missing required"));

    let lenient = Validator::new(ParserLimits::lenient()).validate_message(bare);
    assert!(lenient.is_valid(), "errors: {:?}", lenient.errors());
    assert_eq!(lenient.headers().len(), 1);
}

#[test]
fn test_resource_limits_are_validation_errors() {
    let limits = ParserLimits {
        max_headers: 3,
        ..ParserLimits::default()
    };
    let result = Validator::new(limits).validate_message(INVITE);
    assert!(!result.is_valid());
    assert!(
        result.errors()[0].starts_with("Validation error: "),
        "errors: {:?}",
        result.errors()
    );
}

#[test]
fn test_call_id_header() {
    let result = Validator::default().validate_header("Call-ID: a84b4c76e66710");

    assert!(result.is_valid());
    assert_eq!(
        result.messages(),
        [
            "Header successfully parsed",
            "Header type: CallId",
            "Header canonical name: Call-ID",
            "RFC Reference: RFC 3261 Section 20.8"
        ]
    );
    assert_eq!(result.headers().len(), 1);
    let rfc = result.headers()[0].rfc_reference().unwrap();
    assert_eq!(rfc.url(), "https://datatracker.ietf.org/doc/html/rfc3261#section-20.8");
}

#[test]
fn test_compact_header_resolves_to_canonical_name() {
    let result = Validator::default().validate_header("v: SIP/2.0/UDP pc33.atlanta.com;branch=z9hG4bK776asdhds\r\n");
    assert!(result.is_valid(), "errors: {:?}", result.errors());
    assert_eq!(result.headers()[0].canonical_name(), "Via");
    assert!(result
        .messages()
        .contains(&"RFC Reference: RFC 3261 Section 20.42".to_string()));
}

#[test]
fn test_unknown_header_has_no_reference() {
    let result = Validator::default().validate_header("X-Custom-Header: 42");
    assert!(result.is_valid());
    assert!(result.errors().is_empty());
    assert!(result.headers()[0].rfc_reference().is_none());
    assert_eq!(
        result.messages().last().map(String::as_str),
        Some("No RFC reference found for header: X-Custom-Header")
    );
}

#[test]
fn test_pasted_header_with_surrounding_whitespace() {
    let validator = Validator::default();
    for pasted in ["Call-ID: a84b4c76e66710\r\n\r\n", "  Call-ID: a84b4c76e66710", "\n\nCall-ID: a84b4c76e66710\n"] {
        let result = validator.validate_header(pasted);
        assert!(result.is_valid(), "errors for {:?}: {:?}", pasted, result.errors());
        assert_eq!(result.headers()[0].canonical_name(), "Call-ID");
    }
}

#[test]
fn test_invalid_header_values() {
    let validator = Validator::default();
    for bad in [
        "Max-Forwards: lots",
        "CSeq: INVITE",
        "To: bob@biloxi.com",
        "No colon at all",
        ": empty name",
    ] {
        let result = validator.validate_header(bad);
        assert!(!result.is_valid(), "accepted: {:?}", bad);
        assert_eq!(result.errors().len(), 1);
        assert!(result.errors()[0].starts_with("Parse error: "));
    }
}

#[test]
fn test_rfc_lookup_is_case_insensitive() {
    for name in ["Call-ID", "call-id", "CALL-ID", "i", "I"] {
        let rfc = RfcIndex::lookup(name).unwrap();
        assert_eq!(rfc.display_text(), "RFC 3261 Section 20.8");
    }
    assert!(RfcIndex::lookup("X-Unknown").is_none());
    assert!(RfcIndex::lookup("").is_none());
}

#[test]
fn test_result_serializes_for_clients() {
    let result = Validator::default().validate_header("Call-ID: a84b4c76e66710");
    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(json["valid"], true);
    assert_eq!(json["errors"].as_array().map(Vec::len), Some(0));
    let header = &json["headers"][0];
    assert_eq!(header["name"], "Call-ID");
    assert_eq!(header["canonicalName"], "Call-ID");
    assert_eq!(header["type"], "CallId");
    assert_eq!(header["rfcReference"]["rfc"], "RFC 3261");
    assert_eq!(header["rfcReference"]["section"], "20.8");
    assert_eq!(header["rfcReference"]["displayText"], "RFC 3261 Section 20.8");
}

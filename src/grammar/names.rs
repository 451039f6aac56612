//! Header name resolution
//!
//! Maps a header name as written on the wire to its registered spelling and to
//! the kind of value the parser expects, expanding RFC 3261 compact forms.

use std::borrow::Cow;

use strum_macros::Display;

/// The kind of a header, as far as value syntax is concerned.
///
/// The variant name is what gets reported to users as the header "type".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum HeaderKind {
    Accept,
    AcceptEncoding,
    AcceptLanguage,
    AlertInfo,
    Allow,
    AllowEvents,
    AuthenticationInfo,
    Authorization,
    CallId,
    CallInfo,
    Contact,
    ContentDisposition,
    ContentEncoding,
    ContentLanguage,
    ContentLength,
    ContentType,
    CSeq,
    Date,
    ErrorInfo,
    Event,
    Expires,
    From,
    InReplyTo,
    MaxForwards,
    MimeVersion,
    MinExpires,
    MinSE,
    Organization,
    Path,
    Priority,
    ProxyAuthenticate,
    ProxyAuthorization,
    ProxyRequire,
    RAck,
    RSeq,
    RecordRoute,
    ReferTo,
    ReferredBy,
    Replaces,
    ReplyTo,
    Require,
    RetryAfter,
    Route,
    Server,
    ServiceRoute,
    SessionExpires,
    Subject,
    SubscriptionState,
    Supported,
    Timestamp,
    To,
    Unsupported,
    UserAgent,
    Via,
    Warning,
    WwwAuthenticate,
    /// Any header without a dedicated value grammar
    Extension,
}

/// RFC 3261 Section 7.3.3 compact forms plus the ones registered later
const COMPACT_FORMS: &[(&str, &str)] = &[
    ("a", "accept-contact"),      // RFC 3841
    ("b", "referred-by"),         // RFC 3892
    ("c", "content-type"),
    ("d", "request-disposition"), // RFC 3841
    ("e", "content-encoding"),
    ("f", "from"),
    ("i", "call-id"),
    ("j", "reject-contact"),      // RFC 3841
    ("k", "supported"),
    ("l", "content-length"),
    ("m", "contact"),
    ("n", "identity-info"),       // RFC 4474
    ("o", "event"),               // RFC 6665
    ("r", "refer-to"),            // RFC 3515
    ("s", "subject"),
    ("t", "to"),
    ("u", "allow-events"),        // RFC 6665
    ("v", "via"),
    ("x", "session-expires"),     // RFC 4028
    ("y", "identity"),            // RFC 4474
];

/// (lower-case name, registered spelling, kind)
const KNOWN_HEADERS: &[(&str, &str, HeaderKind)] = &[
    ("accept", "Accept", HeaderKind::Accept),
    ("accept-contact", "Accept-Contact", HeaderKind::Extension),
    ("accept-encoding", "Accept-Encoding", HeaderKind::AcceptEncoding),
    ("accept-language", "Accept-Language", HeaderKind::AcceptLanguage),
    ("alert-info", "Alert-Info", HeaderKind::AlertInfo),
    ("allow", "Allow", HeaderKind::Allow),
    ("allow-events", "Allow-Events", HeaderKind::AllowEvents),
    ("authentication-info", "Authentication-Info", HeaderKind::AuthenticationInfo),
    ("authorization", "Authorization", HeaderKind::Authorization),
    ("call-id", "Call-ID", HeaderKind::CallId),
    ("call-info", "Call-Info", HeaderKind::CallInfo),
    ("contact", "Contact", HeaderKind::Contact),
    ("content-disposition", "Content-Disposition", HeaderKind::ContentDisposition),
    ("content-encoding", "Content-Encoding", HeaderKind::ContentEncoding),
    ("content-language", "Content-Language", HeaderKind::ContentLanguage),
    ("content-length", "Content-Length", HeaderKind::ContentLength),
    ("content-type", "Content-Type", HeaderKind::ContentType),
    ("cseq", "CSeq", HeaderKind::CSeq),
    ("date", "Date", HeaderKind::Date),
    ("error-info", "Error-Info", HeaderKind::ErrorInfo),
    ("event", "Event", HeaderKind::Event),
    ("expires", "Expires", HeaderKind::Expires),
    ("from", "From", HeaderKind::From),
    ("identity", "Identity", HeaderKind::Extension),
    ("identity-info", "Identity-Info", HeaderKind::Extension),
    ("in-reply-to", "In-Reply-To", HeaderKind::InReplyTo),
    ("max-forwards", "Max-Forwards", HeaderKind::MaxForwards),
    ("mime-version", "MIME-Version", HeaderKind::MimeVersion),
    ("min-expires", "Min-Expires", HeaderKind::MinExpires),
    ("min-se", "Min-SE", HeaderKind::MinSE),
    ("organization", "Organization", HeaderKind::Organization),
    ("p-access-network-info", "P-Access-Network-Info", HeaderKind::Extension),
    ("p-asserted-identity", "P-Asserted-Identity", HeaderKind::Extension),
    ("p-called-party-id", "P-Called-Party-ID", HeaderKind::Extension),
    ("p-charging-function-addresses", "P-Charging-Function-Addresses", HeaderKind::Extension),
    ("p-charging-vector", "P-Charging-Vector", HeaderKind::Extension),
    ("p-preferred-identity", "P-Preferred-Identity", HeaderKind::Extension),
    ("path", "Path", HeaderKind::Path),
    ("priority", "Priority", HeaderKind::Priority),
    ("proxy-authenticate", "Proxy-Authenticate", HeaderKind::ProxyAuthenticate),
    ("proxy-authorization", "Proxy-Authorization", HeaderKind::ProxyAuthorization),
    ("proxy-require", "Proxy-Require", HeaderKind::ProxyRequire),
    ("rack", "RAck", HeaderKind::RAck),
    ("record-route", "Record-Route", HeaderKind::RecordRoute),
    ("refer-to", "Refer-To", HeaderKind::ReferTo),
    ("referred-by", "Referred-By", HeaderKind::ReferredBy),
    ("reject-contact", "Reject-Contact", HeaderKind::Extension),
    ("replaces", "Replaces", HeaderKind::Replaces),
    ("reply-to", "Reply-To", HeaderKind::ReplyTo),
    ("request-disposition", "Request-Disposition", HeaderKind::Extension),
    ("require", "Require", HeaderKind::Require),
    ("retry-after", "Retry-After", HeaderKind::RetryAfter),
    ("route", "Route", HeaderKind::Route),
    ("rseq", "RSeq", HeaderKind::RSeq),
    ("server", "Server", HeaderKind::Server),
    ("service-route", "Service-Route", HeaderKind::ServiceRoute),
    ("session-expires", "Session-Expires", HeaderKind::SessionExpires),
    ("subject", "Subject", HeaderKind::Subject),
    ("subscription-state", "Subscription-State", HeaderKind::SubscriptionState),
    ("supported", "Supported", HeaderKind::Supported),
    ("timestamp", "Timestamp", HeaderKind::Timestamp),
    ("to", "To", HeaderKind::To),
    ("unsupported", "Unsupported", HeaderKind::Unsupported),
    ("user-agent", "User-Agent", HeaderKind::UserAgent),
    ("via", "Via", HeaderKind::Via),
    ("warning", "Warning", HeaderKind::Warning),
    ("www-authenticate", "WWW-Authenticate", HeaderKind::WwwAuthenticate),
];

/// Expand compact header form to full form if necessary
pub fn expand_compact(lower_name: &str) -> &str {
    COMPACT_FORMS
        .iter()
        .find(|(compact, _)| *compact == lower_name)
        .map_or(lower_name, |(_, full)| *full)
}

/// A header name after canonicalization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedName<'a> {
    pub canonical: Cow<'a, str>,
    pub kind: HeaderKind,
}

/// Resolve a wire header name to its registered spelling and value kind.
///
/// Unknown names keep the spelling they were written with.
pub fn resolve(name: &str) -> ResolvedName<'_> {
    let lower = name.to_ascii_lowercase();
    let full = expand_compact(&lower);

    match KNOWN_HEADERS.iter().find(|(known, _, _)| *known == full) {
        Some((_, canonical, kind)) => ResolvedName {
            canonical: Cow::Borrowed(*canonical),
            kind: *kind,
        },
        None => ResolvedName {
            canonical: Cow::Borrowed(name),
            kind: HeaderKind::Extension,
        },
    }
}

//! Header name to RFC section index

use std::collections::HashMap;
use std::sync::LazyLock;

use serde::ser::{Serialize, SerializeStruct, Serializer};

/// Where a header is defined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RfcReference {
    rfc: &'static str,
    section: &'static str,
    url: &'static str,
}

impl RfcReference {
    pub const fn new(rfc: &'static str, section: &'static str, url: &'static str) -> Self {
        Self { rfc, section, url }
    }

    /// e.g. "RFC 3261"
    pub fn rfc(&self) -> &'static str {
        self.rfc
    }

    pub fn section(&self) -> &'static str {
        self.section
    }

    pub fn url(&self) -> &'static str {
        self.url
    }

    /// e.g. "RFC 3261 Section 20.8"
    pub fn display_text(&self) -> String {
        format!("{} Section {}", self.rfc, self.section)
    }
}

impl Serialize for RfcReference {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("RfcReference", 4)?;
        state.serialize_field("rfc", self.rfc)?;
        state.serialize_field("section", self.section)?;
        state.serialize_field("url", self.url)?;
        state.serialize_field("displayText", &self.display_text())?;
        state.end()
    }
}

macro_rules! rfc_ref {
    ($rfc:literal, $section:literal) => {
        RfcReference::new(
            concat!("RFC ", $rfc),
            $section,
            concat!("https://datatracker.ietf.org/doc/html/rfc", $rfc, "#section-", $section),
        )
    };
}

/// Keyed by lower-case header name
const HEADER_REFERENCES: &[(&str, RfcReference)] = &[
    // RFC 3261 Section 20
    ("accept", rfc_ref!(3261, "20.1")),
    ("accept-encoding", rfc_ref!(3261, "20.2")),
    ("accept-language", rfc_ref!(3261, "20.3")),
    ("alert-info", rfc_ref!(3261, "20.4")),
    ("allow", rfc_ref!(3261, "20.5")),
    ("authentication-info", rfc_ref!(3261, "20.6")),
    ("authorization", rfc_ref!(3261, "20.7")),
    ("call-id", rfc_ref!(3261, "20.8")),
    ("call-info", rfc_ref!(3261, "20.9")),
    ("contact", rfc_ref!(3261, "20.10")),
    ("content-disposition", rfc_ref!(3261, "20.11")),
    ("content-encoding", rfc_ref!(3261, "20.12")),
    ("content-language", rfc_ref!(3261, "20.13")),
    ("content-length", rfc_ref!(3261, "20.14")),
    ("content-type", rfc_ref!(3261, "20.15")),
    ("cseq", rfc_ref!(3261, "20.16")),
    ("date", rfc_ref!(3261, "20.17")),
    ("error-info", rfc_ref!(3261, "20.18")),
    ("expires", rfc_ref!(3261, "20.19")),
    ("from", rfc_ref!(3261, "20.20")),
    ("in-reply-to", rfc_ref!(3261, "20.21")),
    ("max-forwards", rfc_ref!(3261, "20.22")),
    ("min-expires", rfc_ref!(3261, "20.23")),
    ("mime-version", rfc_ref!(3261, "20.24")),
    ("organization", rfc_ref!(3261, "20.25")),
    ("priority", rfc_ref!(3261, "20.26")),
    ("proxy-authenticate", rfc_ref!(3261, "20.27")),
    ("proxy-authorization", rfc_ref!(3261, "20.28")),
    ("proxy-require", rfc_ref!(3261, "20.29")),
    ("record-route", rfc_ref!(3261, "20.30")),
    ("reply-to", rfc_ref!(3261, "20.31")),
    ("require", rfc_ref!(3261, "20.32")),
    ("retry-after", rfc_ref!(3261, "20.33")),
    ("route", rfc_ref!(3261, "20.34")),
    ("server", rfc_ref!(3261, "20.35")),
    ("subject", rfc_ref!(3261, "20.36")),
    ("supported", rfc_ref!(3261, "20.37")),
    ("timestamp", rfc_ref!(3261, "20.38")),
    ("to", rfc_ref!(3261, "20.39")),
    ("unsupported", rfc_ref!(3261, "20.40")),
    ("user-agent", rfc_ref!(3261, "20.41")),
    ("via", rfc_ref!(3261, "20.42")),
    ("warning", rfc_ref!(3261, "20.43")),
    ("www-authenticate", rfc_ref!(3261, "20.44")),
    // Extensions
    ("session-expires", rfc_ref!(4028, "4")),
    ("min-se", rfc_ref!(4028, "4")),
    ("replaces", rfc_ref!(3891, "6.1")),
    ("referred-by", rfc_ref!(3892, "4")),
    ("refer-to", rfc_ref!(3515, "2.1")),
    ("event", rfc_ref!(6665, "8.1.1")),
    ("subscription-state", rfc_ref!(6665, "8.1.2")),
    ("allow-events", rfc_ref!(6665, "8.1.3")),
    ("rack", rfc_ref!(3262, "7.1")),
    ("rseq", rfc_ref!(3262, "7.1")),
    ("p-access-network-info", rfc_ref!(3455, "4.4")),
    ("p-called-party-id", rfc_ref!(3455, "4.1")),
    ("p-charging-function-addresses", rfc_ref!(3455, "4.6")),
    ("p-charging-vector", rfc_ref!(3455, "4.6")),
    ("service-route", rfc_ref!(3608, "6.1.1")),
    ("path", rfc_ref!(3327, "4.1")),
];

/// Compact forms that resolve to an indexed header
const COMPACT_ALIASES: &[(&str, &str)] = &[
    ("m", "contact"),
    ("f", "from"),
    ("i", "call-id"),
    ("l", "content-length"),
    ("c", "content-type"),
    ("t", "to"),
    ("v", "via"),
];

static INDEX: LazyLock<HashMap<&'static str, RfcReference>> = LazyLock::new(|| {
    let mut index: HashMap<&'static str, RfcReference> = HEADER_REFERENCES.iter().copied().collect();
    for (alias, full) in COMPACT_ALIASES {
        if let Some(reference) = index.get(full).copied() {
            index.insert(*alias, reference);
        }
    }
    index
});

/// Case-insensitive lookup of the RFC section that defines a header
pub struct RfcIndex;

impl RfcIndex {
    pub fn lookup(header_name: &str) -> Option<RfcReference> {
        INDEX.get(header_name.to_ascii_lowercase().as_str()).copied()
    }
}

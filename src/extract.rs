//! Turns parsed headers into annotated [`HeaderRecord`]s

use crate::gateway::{ParsedHeader, ParsedMessage};
use crate::result::{HeaderRecord, MESSAGE_HEADER_TYPE};
use crate::rfc_index::RfcIndex;

/// One record per header of the message, in source order
pub fn extract_from_message(message: &ParsedMessage) -> Vec<HeaderRecord> {
    message
        .header_names()
        .iter()
        .map(|name| HeaderRecord::new(name.as_str(), name.as_str(), MESSAGE_HEADER_TYPE, RfcIndex::lookup(name)))
        .collect()
}

pub fn extract_from_header(header: &ParsedHeader) -> HeaderRecord {
    HeaderRecord::new(
        header.name(),
        header.name(),
        header.kind(),
        RfcIndex::lookup(header.name()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::MessageKind;

    #[test]
    fn test_message_records_keep_order_and_duplicates() {
        let names = ["Via", "Via", "To", "X-Custom-Header"].map(String::from).to_vec();
        let message = ParsedMessage::new(MessageKind::Request, names);
        let records = extract_from_message(&message);

        assert_eq!(records.len(), 4);
        assert_eq!(records[0].name(), "Via");
        assert_eq!(records[1].canonical_name(), "Via");
        assert_eq!(records[2].header_type(), "SIP Header");
        assert_eq!(
            records[2].rfc_reference().map(|r| r.display_text()),
            Some("RFC 3261 Section 20.39".to_string())
        );
        assert!(records[3].rfc_reference().is_none());
    }

    #[test]
    fn test_header_record() {
        let record = extract_from_header(&ParsedHeader::new("Call-ID", "CallId"));
        assert_eq!(record.name(), "Call-ID");
        assert_eq!(record.canonical_name(), "Call-ID");
        assert_eq!(record.header_type(), "CallId");
        assert_eq!(record.rfc_reference().unwrap().section(), "20.8");

        let unknown = extract_from_header(&ParsedHeader::new("X-Custom-Header", "Extension"));
        assert!(unknown.rfc_reference().is_none());
    }
}

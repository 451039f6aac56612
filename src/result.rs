//! Validation results and the builder that assembles them

use serde::Serialize;

use crate::rfc_index::RfcReference;

/// Header type reported for every header enumerated from a full message
pub const MESSAGE_HEADER_TYPE: &str = "SIP Header";

/// One header observed during validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderRecord {
    name: String,
    canonical_name: String,
    #[serde(rename = "type")]
    header_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    rfc_reference: Option<RfcReference>,
}

impl HeaderRecord {
    pub fn new(
        name: impl Into<String>,
        canonical_name: impl Into<String>,
        header_type: impl Into<String>,
        rfc_reference: Option<RfcReference>,
    ) -> Self {
        Self {
            name: name.into(),
            canonical_name: canonical_name.into(),
            header_type: header_type.into(),
            rfc_reference,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn canonical_name(&self) -> &str {
        &self.canonical_name
    }

    pub fn header_type(&self) -> &str {
        &self.header_type
    }

    pub fn rfc_reference(&self) -> Option<&RfcReference> {
        self.rfc_reference.as_ref()
    }
}

/// Outcome of validating one message or header
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    valid: bool,
    messages: Vec<String>,
    errors: Vec<String>,
    headers: Vec<HeaderRecord>,
}

impl ValidationResult {
    /// A result that failed before parsing started
    pub fn rejected(error: impl Into<String>) -> Self {
        let mut builder = ResultBuilder::begin();
        builder.record_error(error);
        builder.finish()
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn headers(&self) -> &[HeaderRecord] {
        &self.headers
    }
}

/// What [`ResultBuilder::mark_parsed`] reports as parsed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseSubject {
    Message,
    Header,
}

impl ParseSubject {
    fn success_message(self) -> &'static str {
        match self {
            ParseSubject::Message => "Message successfully parsed",
            ParseSubject::Header => "Header successfully parsed",
        }
    }
}

/// Accumulates one [`ValidationResult`]
///
/// Once an error has been recorded the result stays invalid, whatever is
/// added afterwards.
#[derive(Debug)]
pub struct ResultBuilder {
    valid: bool,
    messages: Vec<String>,
    errors: Vec<String>,
    headers: Vec<HeaderRecord>,
}

impl ResultBuilder {
    pub fn begin() -> Self {
        Self {
            valid: false,
            messages: Vec::new(),
            errors: Vec::new(),
            headers: Vec::new(),
        }
    }

    pub fn mark_parsed(&mut self, subject: ParseSubject) {
        self.valid = self.errors.is_empty();
        self.messages.push(subject.success_message().to_string());
    }

    pub fn record_error(&mut self, error: impl Into<String>) {
        self.valid = false;
        self.errors.push(error.into());
    }

    pub fn add_header(&mut self, record: HeaderRecord) {
        self.headers.push(record);
    }

    /// Append "Found N headers in the message" for the headers added so far
    pub fn add_header_summary(&mut self) {
        self.messages
            .push(format!("Found {} headers in the message", self.headers.len()));
    }

    pub fn add_message(&mut self, message: impl Into<String>) {
        self.messages.push(message.into());
    }

    pub fn finish(self) -> ValidationResult {
        ValidationResult {
            valid: self.valid && self.errors.is_empty(),
            messages: self.messages,
            errors: self.errors,
            headers: self.headers,
        }
    }
}

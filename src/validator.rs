//! Validation entry points

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::{debug, instrument};

use crate::classify::{classify, MessageKind};
use crate::error::{SipCheckError, SipCheckResult};
use crate::extract::{extract_from_header, extract_from_message};
use crate::gateway::{GatewayError, SipGrammar};
use crate::grammar::GrammarEngine;
use crate::limits::ParserLimits;
use crate::normalize::normalize;
use crate::result::{ParseSubject, ResultBuilder, ValidationResult};

/// Error reported for an empty message submission
pub const MISSING_MESSAGE_TEXT: &str = "Request must include messageText";

/// Error reported for an empty header submission
pub const MISSING_HEADER_TEXT: &str = "Request must include either headerText";

/// Validates SIP messages and headers against a grammar engine
///
/// Every call is independent, so a single validator can be shared between
/// threads.
#[derive(Debug, Clone)]
pub struct Validator<G = GrammarEngine> {
    grammar: G,
}

impl Validator<GrammarEngine> {
    pub fn new(limits: ParserLimits) -> Self {
        Self::with_grammar(GrammarEngine::new(limits))
    }
}

impl Default for Validator<GrammarEngine> {
    fn default() -> Self {
        Self::new(ParserLimits::default())
    }
}

impl<G: SipGrammar> Validator<G> {
    pub fn with_grammar(grammar: G) -> Self {
        Self { grammar }
    }

    pub fn grammar(&self) -> &G {
        &self.grammar
    }

    /// Validate a complete SIP request or response
    #[instrument(name = "validate_message", skip_all, fields(len = raw.len()))]
    pub fn validate_message(&self, raw: &str) -> ValidationResult {
        if raw.is_empty() {
            debug!("rejecting empty message");
            return ValidationResult::rejected(MISSING_MESSAGE_TEXT);
        }

        let normalized = normalize(raw);
        let kind = classify(&normalized);
        let outcome = match kind {
            MessageKind::Request => self.grammar.parse_request(&normalized),
            MessageKind::Response => self.grammar.parse_response(&normalized),
        };

        let mut builder = ResultBuilder::begin();
        match outcome {
            Ok(parsed) => {
                builder.mark_parsed(ParseSubject::Message);
                builder.add_message(format!("Message type: {}", parsed.kind()));
                for record in extract_from_message(&parsed) {
                    builder.add_header(record);
                }
                builder.add_header_summary();
            }
            Err(err) => record_failure(&mut builder, err),
        }

        let result = builder.finish();
        debug!(
            kind = %kind,
            valid = result.is_valid(),
            headers = result.headers().len(),
            errors = result.errors().len(),
            "message validated"
        );
        result
    }

    /// Validate a single `name: value` header
    #[instrument(name = "validate_header", skip_all, fields(len = raw.len()))]
    pub fn validate_header(&self, raw: &str) -> ValidationResult {
        if raw.is_empty() {
            debug!("rejecting empty header");
            return ValidationResult::rejected(MISSING_HEADER_TEXT);
        }

        let mut builder = ResultBuilder::begin();
        match self.grammar.parse_header(raw) {
            Ok(parsed) => {
                builder.mark_parsed(ParseSubject::Header);
                builder.add_message(format!("Header type: {}", parsed.kind()));
                builder.add_message(format!("Header canonical name: {}", parsed.name()));

                let record = extract_from_header(&parsed);
                let reference = match record.rfc_reference() {
                    Some(rfc) => format!("RFC Reference: {}", rfc.display_text()),
                    None => format!("No RFC reference found for header: {}", parsed.name()),
                };
                builder.add_header(record);
                builder.add_message(reference);
            }
            Err(err) => record_failure(&mut builder, err),
        }

        let result = builder.finish();
        debug!(
            valid = result.is_valid(),
            errors = result.errors().len(),
            "header validated"
        );
        result
    }

    /// Validate several messages in parallel, keeping input order
    pub fn validate_messages<S>(&self, messages: &[S]) -> Vec<ValidationResult>
    where
        S: AsRef<str> + Sync,
    {
        messages
            .par_iter()
            .map(|message| self.validate_message(message.as_ref()))
            .collect()
    }
}

fn record_failure(builder: &mut ResultBuilder, err: GatewayError) {
    match err {
        GatewayError::Parse(diagnostic) => builder.record_error(format!("Parse error: {}", diagnostic)),
        GatewayError::Unexpected(diagnostic) => {
            builder.record_error(format!("Validation error: {}", diagnostic))
        }
    }
}

/// Runs batch validation on a dedicated rayon pool
pub struct BatchRunner {
    pool: ThreadPool,
}

impl BatchRunner {
    /// Build a pool with `threads` workers, or one per CPU when `threads` is 0
    pub fn new(threads: usize) -> SipCheckResult<Self> {
        let threads = if threads == 0 { num_cpus::get() } else { threads };
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("sipcheck-worker-{}", i))
            .build()
            .map_err(|e| SipCheckError::config_error(format!("cannot start worker pool: {}", e)))?;
        Ok(Self { pool })
    }

    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    pub fn run<G, S>(&self, validator: &Validator<G>, messages: &[S]) -> Vec<ValidationResult>
    where
        G: SipGrammar,
        S: AsRef<str> + Sync,
    {
        self.pool.install(|| validator.validate_messages(messages))
    }
}

//! sipcheck - SIP message and header validator
//!
//! Validates raw SIP (RFC 3261) messages and single headers, reporting
//! whether they parse and which RFC section defines each header found.
//!
//! ```
//! use sipcheck::Validator;
//!
//! let validator = Validator::default();
//! let result = validator.validate_header("Call-ID: a84b4c76e66710");
//! assert!(result.is_valid());
//! assert_eq!(result.headers()[0].canonical_name(), "Call-ID");
//! ```

pub mod api;
pub mod classify;
pub mod config;
pub mod error;
pub mod extract;
pub mod gateway;
pub mod grammar;
pub mod limits;
pub mod logging;
pub mod normalize;
pub mod result;
pub mod rfc_index;
pub mod validator;

pub use classify::{classify, MessageKind};
pub use config::Config;
pub use error::{ParseError, SipCheckError, SipCheckResult};
pub use gateway::{GatewayError, ParsedHeader, ParsedMessage, SipGrammar};
pub use grammar::GrammarEngine;
pub use limits::ParserLimits;
pub use normalize::normalize;
pub use result::{HeaderRecord, ValidationResult};
pub use rfc_index::{RfcIndex, RfcReference};
pub use validator::{BatchRunner, Validator};

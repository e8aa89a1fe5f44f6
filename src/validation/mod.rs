//! The email validation engine.
//!
//! An address goes through three stages, each usable on its own:
//! 1. [`syntax::parse`] splits it into local part and domain and checks the
//!    addressing grammar and length limits
//! 2. [`normalize::normalize`] produces the NFC / IDNA forms and detects
//!    whether SMTPUTF8 is needed
//! 3. [`dnsmx::resolve`] looks up MX (with A/AAAA fallback) and SPF records,
//!    best effort and bounded by a timeout
//!
//! [`EmailValidator`] chains the stages into a single [`ValidationResult`]
//! per address and handles batches.
//!
//! # Examples
//! ```
//! use email_validation_api::validation::{syntax, normalize};
//!
//! let parsed = syntax::parse("Pelé@exämple.com").unwrap();
//! let normalized = normalize::normalize(&parsed).unwrap();
//! assert_eq!(normalized.ascii_domain, "xn--exmple-cua.com");
//! assert!(normalized.requires_smtputf8);
//! ```

pub mod cache;
pub mod dnsmx;
mod error;
pub mod normalize;
pub mod syntax;
mod types;
pub mod validator;

pub use cache::{RecordsCache, RecordsStore, RedisStore};
pub use dnsmx::{DnsLookup, DnsResolver};
pub use error::ErrorKind;
pub use types::{
    DomainRecords, MxRecord, NormalizedAddress, ParsedAddress, ValidAddress, ValidationResult,
    Verdict,
};
pub use validator::{EmailValidator, MAX_BULK_EMAILS, ValidatorOptions};

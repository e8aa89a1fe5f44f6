use crate::validation::{ErrorKind, MxRecord, ValidAddress, ValidationResult, Verdict};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

fn default_check_deliverability() -> bool {
    true
}

/// Query string of the single-address endpoint.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ValidateEmailQuery {
    /// Address to validate
    #[param(example = "user@example.com")]
    pub email: String,
    /// Look up MX and SPF records of the domain (default `true`)
    #[serde(default = "default_check_deliverability")]
    pub check_deliverability: bool,
}

/// Query string of the bulk endpoint.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ValidationOptionsQuery {
    /// Look up MX and SPF records of each domain (default `true`)
    #[serde(default = "default_check_deliverability")]
    pub check_deliverability: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BulkEmailsRequest {
    /// At most 10 addresses
    #[schema(example = json!(["user@example.com", "not-an-email"]))]
    pub emails: Vec<String>,
}

/// A mail exchanger of the address' domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MxHost {
    pub priority: u16,
    pub host: String,
}

impl From<MxRecord> for MxHost {
    fn from(record: MxRecord) -> Self {
        Self {
            priority: record.priority,
            host: record.host,
        }
    }
}

/// Validation verdict for one address.
///
/// Everything except `is_email_valid`, `original_email` and `mx` is `null`
/// when the address is invalid; `error` is `null` when it is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct EmailValidationResponse {
    pub is_email_valid: bool,
    /// Normalized domain in Unicode
    pub domain: Option<String>,
    /// The address exactly as submitted
    pub original_email: String,
    /// Normalized local part
    pub local_part: Option<String>,
    /// Local part, when it is pure ASCII
    pub ascii_local_part: Option<String>,
    /// IDNA (punycode) form of the domain
    pub ascii_domain: Option<String>,
    /// Whether delivery needs the SMTPUTF8 extension
    pub smtputf8: Option<bool>,
    /// Mail exchangers, most preferred first; empty when unknown
    pub mx: Vec<MxHost>,
    pub spf: Option<String>,
    /// `ascii_local_part@ascii_domain`
    pub ascii_email: Option<String>,
    /// Why the address is invalid
    #[schema(example = "MALFORMED_ADDRESS")]
    pub error: Option<String>,
}

impl EmailValidationResponse {
    pub fn invalid(original_email: impl Into<String>, kind: ErrorKind) -> Self {
        Self {
            is_email_valid: false,
            domain: None,
            original_email: original_email.into(),
            local_part: None,
            ascii_local_part: None,
            ascii_domain: None,
            smtputf8: None,
            mx: Vec::new(),
            spf: None,
            ascii_email: None,
            error: Some(kind.code().to_string()),
        }
    }
}

impl From<ValidationResult> for EmailValidationResponse {
    fn from(result: ValidationResult) -> Self {
        let original_email = result.original().to_string();

        let ValidAddress {
            normalized,
            records,
            ..
        } = match result.into_verdict() {
            Verdict::Valid(valid) => valid,
            Verdict::Invalid(kind) => return Self::invalid(original_email, kind),
        };

        let ascii_email = normalized.ascii_email();
        let (mx, spf) = match records {
            Some(records) => (
                records.mx().iter().cloned().map(MxHost::from).collect(),
                records.spf().map(str::to_string),
            ),
            None => (Vec::new(), None),
        };

        Self {
            is_email_valid: true,
            domain: Some(normalized.domain),
            original_email,
            local_part: Some(normalized.local_part),
            ascii_local_part: normalized.ascii_local_part,
            ascii_domain: Some(normalized.ascii_domain),
            smtputf8: Some(normalized.requires_smtputf8),
            mx,
            spf,
            ascii_email,
            error: None,
        }
    }
}

/// Body of a rejected request (e.g. an oversized batch).
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    #[schema(example = "Max 10 emails can be validated.")]
    pub detail: String,
    #[schema(example = "BATCH_TOO_LARGE")]
    pub code: String,
}

impl ErrorResponse {
    pub fn new(detail: impl Into<String>, kind: ErrorKind) -> Self {
        Self {
            detail: detail.into(),
            code: kind.code().to_string(),
        }
    }
}

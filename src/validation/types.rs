use super::ErrorKind;
use serde::{Deserialize, Serialize};

/// An address split into its two halves, as written by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedAddress {
    pub local_part: String,
    pub domain: String,
}

impl ParsedAddress {
    pub fn new(local_part: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            local_part: local_part.into(),
            domain: domain.into(),
        }
    }

    pub fn address(&self) -> String {
        format!("{}@{}", self.local_part, self.domain)
    }
}

/// Normalized forms of a parsed address.
///
/// `ascii_local_part` is only present when the local part is pure ASCII;
/// otherwise delivering the address requires the SMTPUTF8 extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedAddress {
    /// Local part in Unicode NFC.
    pub local_part: String,
    /// Domain in its Unicode display form, lowercased.
    pub domain: String,
    pub ascii_local_part: Option<String>,
    pub ascii_domain: String,
    pub requires_smtputf8: bool,
}

impl NormalizedAddress {
    pub fn email(&self) -> String {
        format!("{}@{}", self.local_part, self.domain)
    }

    pub fn ascii_email(&self) -> Option<String> {
        self.ascii_local_part
            .as_ref()
            .map(|local| format!("{}@{}", local, self.ascii_domain))
    }
}

/// One mail exchanger; lower priority is preferred.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MxRecord {
    pub priority: u16,
    pub host: String,
}

impl MxRecord {
    pub fn new(priority: u16, host: impl Into<String>) -> Self {
        Self {
            priority,
            host: host.into(),
        }
    }
}

/// Mail-related DNS records of a domain.
///
/// The exchanger list is always sorted by ascending priority and free of
/// duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawDomainRecords")]
pub struct DomainRecords {
    mx: Vec<MxRecord>,
    spf: Option<String>,
}

/// Wire shape of [`DomainRecords`]; decoding goes through [`DomainRecords::new`].
#[derive(Deserialize)]
struct RawDomainRecords {
    mx: Vec<MxRecord>,
    spf: Option<String>,
}

impl From<RawDomainRecords> for DomainRecords {
    fn from(raw: RawDomainRecords) -> Self {
        Self::new(raw.mx, raw.spf)
    }
}

impl DomainRecords {
    pub fn new(mut mx: Vec<MxRecord>, spf: Option<String>) -> Self {
        mx.sort();
        mx.dedup();
        Self { mx, spf }
    }

    pub fn mx(&self) -> &[MxRecord] {
        &self.mx
    }

    pub fn spf(&self) -> Option<&str> {
        self.spf.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.mx.is_empty() && self.spf.is_none()
    }
}

/// Everything known about an address that passed syntax and normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidAddress {
    pub parsed: ParsedAddress,
    pub normalized: NormalizedAddress,
    pub records: Option<DomainRecords>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Valid(ValidAddress),
    Invalid(ErrorKind),
}

/// Outcome of validating one address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    original: String,
    verdict: Verdict,
}

impl ValidationResult {
    pub fn valid(
        original: impl Into<String>,
        parsed: ParsedAddress,
        normalized: NormalizedAddress,
        records: Option<DomainRecords>,
    ) -> Self {
        Self {
            original: original.into(),
            verdict: Verdict::Valid(ValidAddress {
                parsed,
                normalized,
                records,
            }),
        }
    }

    pub fn invalid(original: impl Into<String>, kind: ErrorKind) -> Self {
        Self {
            original: original.into(),
            verdict: Verdict::Invalid(kind),
        }
    }

    pub fn original(&self) -> &str {
        &self.original
    }

    pub fn verdict(&self) -> &Verdict {
        &self.verdict
    }

    pub fn into_verdict(self) -> Verdict {
        self.verdict
    }

    pub fn is_valid(&self) -> bool {
        matches!(self.verdict, Verdict::Valid(_))
    }

    pub fn parsed(&self) -> Option<&ParsedAddress> {
        match &self.verdict {
            Verdict::Valid(valid) => Some(&valid.parsed),
            Verdict::Invalid(_) => None,
        }
    }

    pub fn normalized(&self) -> Option<&NormalizedAddress> {
        match &self.verdict {
            Verdict::Valid(valid) => Some(&valid.normalized),
            Verdict::Invalid(_) => None,
        }
    }

    pub fn records(&self) -> Option<&DomainRecords> {
        match &self.verdict {
            Verdict::Valid(valid) => valid.records.as_ref(),
            Verdict::Invalid(_) => None,
        }
    }

    pub fn error(&self) -> Option<ErrorKind> {
        match self.verdict {
            Verdict::Valid(_) => None,
            Verdict::Invalid(kind) => Some(kind),
        }
    }
}

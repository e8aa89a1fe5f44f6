use super::cache::RecordsCache;
use super::dnsmx::{self, DEFAULT_DNS_TIMEOUT, DnsLookup};
use super::syntax::{self, SyntaxOptions};
use super::{DomainRecords, ErrorKind, ValidationResult, normalize::normalize};
use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;

/// Largest batch accepted by the bulk endpoints.
pub const MAX_BULK_EMAILS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatorOptions {
    pub syntax: SyntaxOptions,
    /// Budget for each individual DNS query.
    pub dns_timeout: Duration,
}

impl Default for ValidatorOptions {
    fn default() -> Self {
        Self {
            syntax: SyntaxOptions::default(),
            dns_timeout: DEFAULT_DNS_TIMEOUT,
        }
    }
}

/// Runs syntax check, normalization and (optionally) DNS resolution for
/// addresses.
///
/// Cheap to clone; clones share the DNS client and cache connection.
#[derive(Clone)]
pub struct EmailValidator {
    lookup: Arc<dyn DnsLookup>,
    cache: Option<RecordsCache>,
    options: ValidatorOptions,
}

impl EmailValidator {
    pub fn new(lookup: Arc<dyn DnsLookup>, options: ValidatorOptions) -> Self {
        Self {
            lookup,
            cache: None,
            options,
        }
    }

    pub fn with_cache(mut self, cache: RecordsCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn options(&self) -> &ValidatorOptions {
        &self.options
    }

    /// Validates one address.
    ///
    /// Syntax and encoding problems produce an invalid result. DNS problems
    /// never do: with `check_deliverability`, a domain whose lookups fail or
    /// return nothing is still valid, just without records.
    pub async fn validate(&self, address: &str, check_deliverability: bool) -> ValidationResult {
        let trimmed = address.trim();

        let parsed = match syntax::parse_with(trimmed, &self.options.syntax) {
            Ok(parsed) => parsed,
            Err(kind) => {
                tracing::debug!(address, error = %kind, "address failed syntax check");
                return ValidationResult::invalid(address, kind);
            }
        };

        let normalized = match normalize(&parsed) {
            Ok(normalized) => normalized,
            Err(kind) => {
                tracing::debug!(address, error = %kind, "address failed normalization");
                return ValidationResult::invalid(address, kind);
            }
        };

        // IDNA mapping can spell a special-use name the raw input did not.
        if !self.options.syntax.allow_special_use_domain
            && syntax::is_special_use_domain(&normalized.ascii_domain)
        {
            tracing::debug!(address, "address uses a special-use domain");
            return ValidationResult::invalid(address, ErrorKind::MalformedAddress);
        }

        let records = if check_deliverability {
            self.domain_records(&normalized.ascii_domain).await
        } else {
            None
        };

        ValidationResult::valid(address, parsed, normalized, records)
    }

    /// Validates a batch concurrently; `results[i]` belongs to `addresses[i]`.
    ///
    /// More than `limit` addresses fail the whole call with
    /// [`ErrorKind::BatchTooLarge`] before anything is validated.
    pub async fn validate_many<S>(
        &self,
        addresses: &[S],
        limit: usize,
        check_deliverability: bool,
    ) -> Result<Vec<ValidationResult>, ErrorKind>
    where
        S: AsRef<str>,
    {
        if addresses.len() > limit {
            tracing::info!(count = addresses.len(), limit, "rejecting oversized batch");
            return Err(ErrorKind::BatchTooLarge);
        }

        let results = join_all(
            addresses
                .iter()
                .map(|address| self.validate(address.as_ref(), check_deliverability)),
        )
        .await;
        Ok(results)
    }

    async fn domain_records(&self, ascii_domain: &str) -> Option<DomainRecords> {
        if let Some(cache) = &self.cache
            && let Some(records) = cache.get_records(ascii_domain).await
        {
            tracing::debug!(ascii_domain, "records cache hit");
            return non_empty(records);
        }

        let resolution =
            dnsmx::resolve_settled(self.lookup.as_ref(), ascii_domain, self.options.dns_timeout)
                .await;

        if resolution.settled
            && let Some(cache) = &self.cache
        {
            cache.set_records(ascii_domain, &resolution.records).await;
        }

        non_empty(resolution.records)
    }
}

/// Empty records carry no information; report them as absent.
fn non_empty(records: DomainRecords) -> Option<DomainRecords> {
    if records.is_empty() {
        None
    } else {
        Some(records)
    }
}

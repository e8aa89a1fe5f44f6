use super::{DomainRecords, MxRecord};
use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use trust_dns_resolver::{
    TokioAsyncResolver,
    config::{ResolverConfig, ResolverOpts},
    error::{ResolveError, ResolveErrorKind},
};

/// Per-lookup budget used when the caller does not configure one.
pub const DEFAULT_DNS_TIMEOUT: Duration = Duration::from_secs(2);

/// Why a single DNS lookup produced nothing usable.
#[derive(Debug, Error)]
pub enum DnsError {
    #[error("DNS lookup failed: {0}")]
    Lookup(#[from] ResolveError),
    #[error("DNS lookup timed out after {0:?}")]
    Timeout(Duration),
}

/// The DNS queries the resolver needs. "No such record" is an empty answer,
/// not an error.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DnsLookup: Send + Sync {
    /// MX records of `domain`. A null MX (RFC 7505) shows up as a record with
    /// an empty host.
    async fn lookup_mx(&self, domain: &str) -> Result<Vec<MxRecord>, ResolveError>;

    /// Whether `domain` has at least one A or AAAA record.
    async fn lookup_address(&self, domain: &str) -> Result<bool, ResolveError>;

    /// TXT records of `domain`, each with its character-strings concatenated.
    async fn lookup_txt(&self, domain: &str) -> Result<Vec<String>, ResolveError>;
}

/// [`DnsLookup`] backed by the trust-dns tokio resolver.
#[derive(Clone)]
pub struct DnsResolver {
    inner: TokioAsyncResolver,
}

impl DnsResolver {
    /// Resolver using the public default upstreams.
    ///
    /// Configured with:
    /// - `timeout` per request
    /// - 2 attempts
    pub fn new(timeout: Duration) -> Self {
        let opts = resolver_opts(ResolverOpts::default(), timeout);

        Self {
            inner: TokioAsyncResolver::tokio(ResolverConfig::default(), opts),
        }
    }

    /// Resolver using the host's name servers (`/etc/resolv.conf`), with the
    /// same timeout and attempts as [`DnsResolver::new`].
    pub fn from_system_conf(timeout: Duration) -> Result<Self, ResolveError> {
        let (config, opts) = trust_dns_resolver::system_conf::read_system_conf()?;
        let opts = resolver_opts(opts, timeout);

        Ok(Self {
            inner: TokioAsyncResolver::tokio(config, opts),
        })
    }
}

#[async_trait]
impl DnsLookup for DnsResolver {
    async fn lookup_mx(&self, domain: &str) -> Result<Vec<MxRecord>, ResolveError> {
        let lookup = match self.inner.mx_lookup(fqdn(domain)).await {
            Ok(lookup) => lookup,
            Err(err) if is_no_records(&err) => return Ok(Vec::new()),
            Err(err) => return Err(err),
        };

        Ok(lookup
            .iter()
            .map(|mx| {
                MxRecord::new(mx.preference(), normalize_exchange(&mx.exchange().to_utf8()))
            })
            .collect())
    }

    async fn lookup_address(&self, domain: &str) -> Result<bool, ResolveError> {
        match self.inner.lookup_ip(fqdn(domain)).await {
            Ok(lookup) => Ok(lookup.iter().next().is_some()),
            Err(err) if is_no_records(&err) => Ok(false),
            Err(err) => Err(err),
        }
    }

    async fn lookup_txt(&self, domain: &str) -> Result<Vec<String>, ResolveError> {
        let lookup = match self.inner.txt_lookup(fqdn(domain)).await {
            Ok(lookup) => lookup,
            Err(err) if is_no_records(&err) => return Ok(Vec::new()),
            Err(err) => return Err(err),
        };

        let mut records = Vec::new();
        for txt in lookup.iter() {
            let mut record = Vec::new();
            for piece in txt.txt_data() {
                record.extend_from_slice(piece);
            }
            match String::from_utf8(record) {
                Ok(record) => records.push(record),
                Err(_) => tracing::debug!(domain, "skipping TXT record that is not UTF-8"),
            }
        }
        Ok(records)
    }
}

fn resolver_opts(mut opts: ResolverOpts, timeout: Duration) -> ResolverOpts {
    opts.timeout = timeout;
    opts.attempts = 2;
    opts
}

/// Absolute query name, so resolver search domains are never appended.
fn fqdn(domain: &str) -> String {
    if domain.ends_with('.') {
        domain.to_string()
    } else {
        format!("{domain}.")
    }
}

/// NXDOMAIN and NODATA both surface as `NoRecordsFound`.
fn is_no_records(err: &ResolveError) -> bool {
    matches!(err.kind(), ResolveErrorKind::NoRecordsFound { .. })
}

pub(crate) fn normalize_exchange(exchange: &str) -> String {
    exchange.trim_end_matches('.').to_ascii_lowercase()
}

/// Records plus whether every lookup behind them completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Resolution {
    pub records: DomainRecords,
    pub settled: bool,
}

/// Looks up the mail exchangers and SPF policy of `ascii_domain`.
///
/// Best effort: a lookup that fails or exceeds `timeout` contributes nothing,
/// so the result may be empty but is never an error.
///
/// 1. MX records, sorted by priority
/// 2. Without MX records, an implicit `{0, domain}` exchanger if the domain
///    has an A/AAAA record (RFC 5321 section 5.1)
/// 3. The first TXT record starting with `v=spf1`
pub async fn resolve<L>(lookup: &L, ascii_domain: &str, timeout: Duration) -> DomainRecords
where
    L: DnsLookup + ?Sized,
{
    resolve_settled(lookup, ascii_domain, timeout).await.records
}

pub(crate) async fn resolve_settled<L>(
    lookup: &L,
    ascii_domain: &str,
    timeout: Duration,
) -> Resolution
where
    L: DnsLookup + ?Sized,
{
    let (mx, spf) = tokio::join!(
        mail_exchangers(lookup, ascii_domain, timeout),
        spf_record(lookup, ascii_domain, timeout),
    );

    let settled = mx.is_ok() && spf.is_ok();
    let mx = mx.unwrap_or_else(|err| {
        tracing::debug!(ascii_domain, error = %err, "MX resolution failed");
        Vec::new()
    });
    let spf = spf.unwrap_or_else(|err| {
        tracing::debug!(ascii_domain, error = %err, "SPF lookup failed");
        None
    });

    Resolution {
        records: DomainRecords::new(mx, spf),
        settled,
    }
}

async fn bounded<T, F>(timeout: Duration, query: F) -> Result<T, DnsError>
where
    F: Future<Output = Result<T, ResolveError>>,
{
    match tokio::time::timeout(timeout, query).await {
        Ok(result) => result.map_err(DnsError::from),
        Err(_) => Err(DnsError::Timeout(timeout)),
    }
}

async fn mail_exchangers<L>(
    lookup: &L,
    domain: &str,
    timeout: Duration,
) -> Result<Vec<MxRecord>, DnsError>
where
    L: DnsLookup + ?Sized,
{
    let records = bounded(timeout, lookup.lookup_mx(domain)).await?;

    if !records.is_empty() {
        if records.iter().all(|record| record.host.is_empty()) {
            tracing::debug!(domain, "domain publishes a null MX and accepts no mail");
            return Ok(Vec::new());
        }
        return Ok(records
            .into_iter()
            .filter(|record| !record.host.is_empty())
            .collect());
    }

    if bounded(timeout, lookup.lookup_address(domain)).await? {
        Ok(vec![MxRecord::new(0, domain)])
    } else {
        Ok(Vec::new())
    }
}

async fn spf_record<L>(
    lookup: &L,
    domain: &str,
    timeout: Duration,
) -> Result<Option<String>, DnsError>
where
    L: DnsLookup + ?Sized,
{
    let records = bounded(timeout, lookup.lookup_txt(domain)).await?;
    Ok(select_spf(domain, &records))
}

pub(crate) fn select_spf(domain: &str, records: &[String]) -> Option<String> {
    let mut candidates = records
        .iter()
        .map(|record| record.trim())
        .filter(|record| is_spf(record));

    let first = candidates.next()?.to_string();
    if candidates.next().is_some() {
        tracing::debug!(domain, "multiple SPF records published, reporting the first");
    }
    Some(first)
}

fn is_spf(record: &str) -> bool {
    const VERSION: &str = "v=spf1";
    let Some(head) = record.get(..VERSION.len()) else {
        return false;
    };
    head.eq_ignore_ascii_case(VERSION)
        && record[VERSION.len()..]
            .chars()
            .next()
            .is_none_or(|c| c == ' ')
}

use super::syntax::{MAX_DOMAIN_LEN, MAX_LABEL_LEN, is_numeric_label};
use super::{ErrorKind, NormalizedAddress, ParsedAddress};
use unicode_normalization::UnicodeNormalization;

/// Produces the normalized and ASCII-compatible forms of a parsed address.
///
/// The local part is NFC-normalized; a non-ASCII local part is reported
/// through `requires_smtputf8` rather than rejected. The domain goes through
/// UTS #46 / IDNA processing and must come out as a valid DNS hostname,
/// otherwise [`ErrorKind::InvalidDomainEncoding`] is returned.
pub fn normalize(parsed: &ParsedAddress) -> Result<NormalizedAddress, ErrorKind> {
    let local_part: String = parsed.local_part.nfc().collect();
    let (ascii_local_part, requires_smtputf8) = if local_part.is_ascii() {
        (Some(local_part.clone()), false)
    } else {
        (None, true)
    };

    let ascii_domain = to_ascii_domain(&parsed.domain)?;
    let domain = to_unicode_domain(&ascii_domain)?;

    Ok(NormalizedAddress {
        local_part,
        domain,
        ascii_local_part,
        ascii_domain,
        requires_smtputf8,
    })
}

fn to_ascii_domain(domain: &str) -> Result<String, ErrorKind> {
    let ascii = idna::domain_to_ascii(domain).map_err(|err| {
        tracing::debug!(domain, error = ?err, "IDNA conversion failed");
        ErrorKind::InvalidDomainEncoding
    })?;

    if is_hostname(&ascii) {
        Ok(ascii)
    } else {
        tracing::debug!(domain, ascii = %ascii, "IDNA output is not a valid hostname");
        Err(ErrorKind::InvalidDomainEncoding)
    }
}

fn to_unicode_domain(ascii_domain: &str) -> Result<String, ErrorKind> {
    let (unicode, result) = idna::domain_to_unicode(ascii_domain);
    result.map_err(|err| {
        tracing::debug!(ascii_domain, error = ?err, "punycode label does not decode");
        ErrorKind::InvalidDomainEncoding
    })?;
    Ok(unicode)
}

/// Letters, digits and hyphens only, within DNS length limits, and not
/// ending in an all-digit label.
fn is_hostname(ascii: &str) -> bool {
    !ascii.is_empty()
        && ascii.len() <= MAX_DOMAIN_LEN
        && !ascii.rsplit('.').next().is_some_and(is_numeric_label)
        && ascii.split('.').all(|label| {
            !label.is_empty()
                && label.len() <= MAX_LABEL_LEN
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
        })
}

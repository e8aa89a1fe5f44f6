use super::{ErrorKind, ParsedAddress};

/// RFC 5321 limit on the local part, in octets.
pub const MAX_LOCAL_PART_LEN: usize = 64;
/// RFC 1035 limit on a domain name, in octets.
pub const MAX_DOMAIN_LEN: usize = 255;
/// RFC 1035 limit on a single domain label.
pub const MAX_LABEL_LEN: usize = 63;

const ATEXT_SPECIALS: &str = "!#$%&'*+-/=?^_`{|}~";

/// Full stop plus the ideographic, fullwidth and halfwidth stops that UTS #46
/// maps onto it.
const LABEL_SEPARATORS: [char; 4] = ['.', '\u{3002}', '\u{ff0e}', '\u{ff61}'];

/// Special-use names (RFC 6761, RFC 6762, RFC 7686) that never reach a
/// public mail server, matched as the domain itself or its suffix.
pub const SPECIAL_USE_DOMAINS: [&str; 6] = ["arpa", "invalid", "local", "localhost", "onion", "test"];

/// Knobs for the address grammar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyntaxOptions {
    /// Accept domains such as `intranet` that consist of a single label.
    pub allow_single_label_domain: bool,
    /// Accept domains under [`SPECIAL_USE_DOMAINS`], such as `localhost`.
    pub allow_special_use_domain: bool,
}

/// Parses an address with the default [`SyntaxOptions`].
///
/// # Examples
/// ```
/// use email_validation_api::validation::{ErrorKind, syntax::parse};
///
/// let parsed = parse("user.name+tag@example.com").unwrap();
/// assert_eq!(parsed.local_part, "user.name+tag");
/// assert_eq!(parsed.domain, "example.com");
///
/// assert_eq!(parse("not-an-email"), Err(ErrorKind::MalformedAddress));
/// ```
pub fn parse(address: &str) -> Result<ParsedAddress, ErrorKind> {
    parse_with(address, &SyntaxOptions::default())
}

/// Splits `address` into local part and domain and checks both against the
/// addressing grammar (RFC 5322 dot-atom / quoted-string local parts, RFC 1035
/// style labels, RFC 6531 UTF-8 characters).
///
/// Labels may be separated by `.` or by the ideographic stops IDNA maps to
/// it. The last label must not be all digits, which also rules out bare IPv4
/// addresses.
///
/// Structural problems yield [`ErrorKind::MalformedAddress`]; local parts over
/// 64 octets, domains over 255 octets and labels over 63 characters yield
/// [`ErrorKind::LengthExceeded`].
pub fn parse_with(address: &str, options: &SyntaxOptions) -> Result<ParsedAddress, ErrorKind> {
    let (local_part, domain) = split_at_sign(address)?;

    if local_part.is_empty() || domain.is_empty() {
        return Err(ErrorKind::MalformedAddress);
    }
    if local_part.len() > MAX_LOCAL_PART_LEN || domain.len() > MAX_DOMAIN_LEN {
        return Err(ErrorKind::LengthExceeded);
    }

    check_local_part(local_part)?;
    check_domain(domain, options)?;

    Ok(ParsedAddress::new(local_part, domain))
}

/// Finds the single top-level `@`, skipping any inside a quoted string.
fn split_at_sign(address: &str) -> Result<(&str, &str), ErrorKind> {
    let mut in_quotes = false;
    let mut escaped = false;
    let mut split_index = None;

    for (i, c) in address.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' if in_quotes => escaped = true,
            '"' => in_quotes = !in_quotes,
            '@' if !in_quotes => {
                if split_index.replace(i).is_some() {
                    return Err(ErrorKind::MalformedAddress);
                }
            }
            _ => {}
        }
    }

    let split_index = split_index.ok_or(ErrorKind::MalformedAddress)?;
    Ok((&address[..split_index], &address[split_index + 1..]))
}

/// Local part is either a quoted string or a dot-atom (RFC 5322 section 3.4.1).
fn check_local_part(local: &str) -> Result<(), ErrorKind> {
    let valid = match local
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
    {
        Some(content) => is_valid_quoted_content(content),
        None => is_valid_dot_atom(local),
    };

    if valid {
        Ok(())
    } else {
        Err(ErrorKind::MalformedAddress)
    }
}

/// Only `\"` and `\\` escapes are allowed, and no bare quote. `""` names no
/// mailbox and is rejected.
fn is_valid_quoted_content(content: &str) -> bool {
    if content.is_empty() {
        return false;
    }
    let mut escape = false;

    for c in content.chars() {
        if c.is_control() {
            return false;
        }
        if escape {
            if !matches!(c, '\\' | '"') {
                return false;
            }
            escape = false;
        } else if c == '\\' {
            escape = true;
        } else if c == '"' {
            return false;
        }
    }
    !escape
}

fn is_valid_dot_atom(s: &str) -> bool {
    s.split('.')
        .all(|atom| !atom.is_empty() && atom.chars().all(is_atext))
}

fn is_atext(c: char) -> bool {
    c.is_ascii_alphanumeric() || ATEXT_SPECIALS.contains(c) || is_utf8_text(c)
}

/// Non-ASCII characters are accepted here and judged by IDNA / SMTPUTF8 later.
fn is_utf8_text(c: char) -> bool {
    !c.is_ascii() && !c.is_whitespace() && !c.is_control()
}

fn check_domain(domain: &str, options: &SyntaxOptions) -> Result<(), ErrorKind> {
    let labels: Vec<&str> = domain.split(LABEL_SEPARATORS).collect();

    for label in &labels {
        if label.is_empty() {
            return Err(ErrorKind::MalformedAddress);
        }
        if label.chars().count() > MAX_LABEL_LEN {
            return Err(ErrorKind::LengthExceeded);
        }
        if label.starts_with('-') || label.ends_with('-') {
            return Err(ErrorKind::MalformedAddress);
        }
        if !label
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || is_utf8_text(c))
        {
            return Err(ErrorKind::MalformedAddress);
        }
    }

    if labels.len() < 2 && !options.allow_single_label_domain {
        return Err(ErrorKind::MalformedAddress);
    }
    if labels.last().is_some_and(|tld| is_numeric_label(tld)) {
        return Err(ErrorKind::MalformedAddress);
    }
    if !options.allow_special_use_domain && is_special_use_domain(domain) {
        return Err(ErrorKind::MalformedAddress);
    }
    Ok(())
}

/// All ASCII digits. Fullwidth digits only become ASCII after IDNA mapping
/// and are caught by the normalizer.
pub(crate) fn is_numeric_label(label: &str) -> bool {
    !label.is_empty() && label.bytes().all(|b| b.is_ascii_digit())
}

/// Whether `domain` is, or lies under, one of [`SPECIAL_USE_DOMAINS`].
pub(crate) fn is_special_use_domain(domain: &str) -> bool {
    domain.rsplit(LABEL_SEPARATORS).next().is_some_and(|tld| {
        SPECIAL_USE_DOMAINS
            .iter()
            .any(|name| tld.eq_ignore_ascii_case(name))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_valid(address: &str) -> bool {
        parse(address).is_ok()
    }

    #[test]
    fn valid_standard_emails() {
        assert!(is_valid("simple@example.com"));
        assert!(is_valid("very.common@example.com"));
        assert!(is_valid("x@example.com"));
        assert!(is_valid("a.b@sub.example.co.uk"));
    }

    #[test]
    fn splits_into_parts() {
        let parsed = parse("user@example.com").unwrap();
        assert_eq!(parsed, ParsedAddress::new("user", "example.com"));
        assert_eq!(parsed.address(), "user@example.com");
    }

    #[test]
    fn valid_special_chars() {
        assert!(is_valid("!#$%&'*+-/=?^_`{}|~@example.com"));
        assert!(is_valid("\"quoted@local\"@example.com"));
        assert!(is_valid("\"escaped\\\"quote\"@example.com"));
        assert!(is_valid("\"with space\"@example.com"));
    }

    #[test]
    fn quoted_at_is_not_a_separator() {
        let parsed = parse("\"a@b\"@example.com").unwrap();
        assert_eq!(parsed.local_part, "\"a@b\"");
        assert_eq!(parsed.domain, "example.com");
    }

    #[test]
    fn valid_international() {
        assert!(is_valid("Pelé@exämple.中国"));
        assert!(is_valid("用户@例子.中国"));
        assert!(is_valid("ἀρχαῖα@δόκιμη.κπ"));
    }

    #[test]
    fn valid_edge_lengths() {
        let max_local = "a".repeat(64);
        assert!(is_valid(&format!("{}@example.com", max_local)));

        let label = "b".repeat(63);
        let domain = format!("{}.{}.{}", label, label, "c".repeat(61));
        assert!(is_valid(&format!("{}@{}", max_local, domain)));
    }

    #[test]
    fn missing_or_repeated_at_is_malformed() {
        for address in [
            "missing.example.com",
            "not-an-email",
            "a@b@example.com",
            "user@@example.com",
            "",
            "   ",
        ] {
            assert_eq!(
                parse(address),
                Err(ErrorKind::MalformedAddress),
                "{address:?}"
            );
        }
    }

    #[test]
    fn empty_halves_are_malformed() {
        assert_eq!(parse("missing@"), Err(ErrorKind::MalformedAddress));
        assert_eq!(parse("@missing.com"), Err(ErrorKind::MalformedAddress));
        assert_eq!(parse("@"), Err(ErrorKind::MalformedAddress));
    }

    #[test]
    fn length_limits() {
        let long_local = "a".repeat(65);
        assert_eq!(
            parse(&format!("{}@example.com", long_local)),
            Err(ErrorKind::LengthExceeded)
        );

        let long_label = "b".repeat(64);
        assert_eq!(
            parse(&format!("user@{}.com", long_label)),
            Err(ErrorKind::LengthExceeded)
        );

        let labels = vec!["c".repeat(63); 4].join(".");
        assert_eq!(labels.len(), 255);
        assert!(is_valid(&format!("user@{}", labels)));
        assert_eq!(
            parse(&format!("user@a{}", labels)),
            Err(ErrorKind::LengthExceeded)
        );
    }

    #[test]
    fn invalid_local_parts() {
        assert!(!is_valid("no..dots@example.com"));
        assert!(!is_valid(".leading@example.com"));
        assert!(!is_valid("trailing.@example.com"));
        assert!(!is_valid("un\"quoted@example.com"));
        assert!(!is_valid("spaces unquoted@example.com"));
        assert!(!is_valid("\"invalid\\escape\"@example.com"));
    }

    #[test]
    fn invalid_domains() {
        assert!(!is_valid("user@-hyphenstart.com"));
        assert!(!is_valid("user@hyphenend-.com"));
        assert!(!is_valid("user@.leadingdot.com"));
        assert!(!is_valid("user@double..dot.com"));
        assert!(!is_valid("user@trailingdot.com."));
        assert!(!is_valid("user@_invalidchar.com"));
        assert!(!is_valid("user@ex mple.com"));
    }

    #[test]
    fn domain_literals_are_rejected() {
        assert_eq!(parse("user@[192.168.0.1]"), Err(ErrorKind::MalformedAddress));
        assert_eq!(
            parse("user@[IPv6:2001:db8::1]"),
            Err(ErrorKind::MalformedAddress)
        );
    }

    #[test]
    fn single_label_domain_needs_opt_in() {
        assert_eq!(parse("user@intranet"), Err(ErrorKind::MalformedAddress));

        let relaxed = SyntaxOptions {
            allow_single_label_domain: true,
            ..SyntaxOptions::default()
        };
        let parsed = parse_with("user@intranet", &relaxed).unwrap();
        assert_eq!(parsed.domain, "intranet");
    }

    #[test]
    fn numeric_top_level_label_is_malformed() {
        for address in ["user@192.168.0.1", "user@example.123", "user@1.2"] {
            assert_eq!(
                parse(address),
                Err(ErrorKind::MalformedAddress),
                "{address}"
            );
        }
        assert!(is_valid("user@123.example"));
        assert!(is_valid("user@example.c0m"));
    }

    #[test]
    fn special_use_domains_are_malformed() {
        for address in [
            "a@localhost.localhost",
            "user@example.invalid",
            "user@foo.test",
            "user@printer.local",
            "user@abcdef.onion",
            "user@in-addr.arpa",
            "user@HOST.LOCALHOST",
        ] {
            assert_eq!(
                parse(address),
                Err(ErrorKind::MalformedAddress),
                "{address}"
            );
        }
        assert!(is_valid("user@localhost.example.com"));
        assert!(is_valid("user@test.com"));
    }

    #[test]
    fn special_use_domains_need_opt_in() {
        let single_label_only = SyntaxOptions {
            allow_single_label_domain: true,
            ..SyntaxOptions::default()
        };
        assert_eq!(
            parse_with("user@localhost", &single_label_only),
            Err(ErrorKind::MalformedAddress)
        );

        let relaxed = SyntaxOptions {
            allow_single_label_domain: true,
            allow_special_use_domain: true,
        };
        assert_eq!(
            parse_with("user@localhost", &relaxed).unwrap().domain,
            "localhost"
        );
        assert!(parse_with("user@example.test", &relaxed).is_ok());
    }

    #[test]
    fn ideographic_label_separators() {
        assert_eq!(parse("user@例子\u{3002}中国").unwrap().domain, "例子\u{3002}中国");
        assert!(is_valid("user@example\u{ff0e}com"));
        assert!(is_valid("user@example\u{ff61}com"));
        assert_eq!(
            parse("user@example\u{3002}\u{3002}com"),
            Err(ErrorKind::MalformedAddress)
        );
    }

    #[test]
    fn empty_quoted_local_part_is_malformed() {
        assert_eq!(parse("\"\"@example.com"), Err(ErrorKind::MalformedAddress));
        assert!(is_valid("\" \"@example.com"));
    }

    #[test]
    fn case_is_preserved() {
        let parsed = parse("User@Example.COM").unwrap();
        assert_eq!(parsed.local_part, "User");
        assert_eq!(parsed.domain, "Example.COM");
    }
}

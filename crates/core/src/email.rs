//! Email address validation and canonicalization.
//!
//! [`canonicalize`] is the syntactic check: it trims the input, lowercases
//! the domain, validates the address, and rejects domains that can never
//! receive mail. [`check_deliverability`] is the optional network check that
//! the domain publishes a mail route, asked through a [`MailDomainResolver`].

use std::time::Duration;

use async_trait::async_trait;
use hickory_resolver::error::{ResolveError, ResolveErrorKind};
use hickory_resolver::proto::op::ResponseCode;
use hickory_resolver::TokioAsyncResolver;
use validator::ValidateEmail;

use crate::error::CoreError;

/// Reserved top-level names that never route mail (RFC 6761 and friends).
const SPECIAL_USE_DOMAINS: &[&str] = &["arpa", "invalid", "local", "localhost", "onion", "test"];


/// Validate `email` and return its canonical form.
///
/// The local part is kept as typed; the domain is lowercased.
pub fn canonicalize(email: &str) -> Result<String, CoreError> {
    let trimmed = email.trim();

    let (local, domain) = trimmed
        .rsplit_once('@')
        .ok_or_else(|| invalid("The email address is not valid. It must have exactly one @-sign."))?;
    if local.is_empty() {
        return Err(invalid("There must be something before the @-sign."));
    }
    if domain.is_empty() {
        return Err(invalid("There must be something after the @-sign."));
    }
    if domain.starts_with('[') {
        return Err(invalid("A bracketed IP address after the @-sign is not allowed here."));
    }

    let domain = domain.to_lowercase();
    let candidate = format!("{local}@{domain}");
    if !candidate.as_str().validate_email() {
        return Err(invalid("The email address is not valid."));
    }

    check_globally_routable(&domain)?;
    Ok(candidate)
}

/// Return the domain part of an address that already passed [`canonicalize`].
pub fn domain_of(email: &str) -> &str {
    email.rsplit_once('@').map(|(_, domain)| domain).unwrap_or("")
}

/// What DNS says about a domain as a mail destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomainLookup {
    /// MX records, or A/AAAA records when there is no MX.
    AcceptsMail,
    /// Only null MX records (RFC 7505): the domain explicitly refuses mail.
    NullMx,
    /// NXDOMAIN.
    NotFound,
    /// The domain exists but publishes no MX, A, or AAAA records.
    NoRecords,
    /// No usable nameserver or a resolver failure. Deliverability unknown.
    Unknown,
}

/// Source of [`DomainLookup`] answers.
#[async_trait]
pub trait MailDomainResolver: Send + Sync {
    async fn lookup(&self, domain: &str) -> DomainLookup;
}

/// Resolver backed by the host's DNS configuration.
///
/// When the system configuration cannot be read every lookup is
/// [`DomainLookup::Unknown`].
pub struct SystemResolver {
    inner: Option<TokioAsyncResolver>,
}

impl SystemResolver {
    pub fn from_system_conf() -> Self {
        let inner = match TokioAsyncResolver::tokio_from_system_conf() {
            Ok(resolver) => Some(resolver),
            Err(e) => {
                tracing::warn!(error = %e, "No system DNS configuration, email deliverability is unchecked");
                None
            }
        };
        Self { inner }
    }
}

#[async_trait]
impl MailDomainResolver for SystemResolver {
    async fn lookup(&self, domain: &str) -> DomainLookup {
        let Some(resolver) = &self.inner else {
            return DomainLookup::Unknown;
        };
        // Fully qualified so search domains are never appended.
        let fqdn = format!("{domain}.");

        match resolver.mx_lookup(fqdn.as_str()).await {
            Ok(records) => {
                let mut records = records.iter().peekable();
                if records.peek().is_some() {
                    return if records.any(|mx| !mx.exchange().is_root()) {
                        DomainLookup::AcceptsMail
                    } else {
                        DomainLookup::NullMx
                    };
                }
            }
            Err(e) => match classify_failure(&e) {
                DomainLookup::NoRecords => {}
                outcome => return outcome,
            },
        }

        match resolver.lookup_ip(fqdn.as_str()).await {
            Ok(addrs) if addrs.iter().next().is_some() => DomainLookup::AcceptsMail,
            Ok(_) => DomainLookup::NoRecords,
            Err(e) => classify_failure(&e),
        }
    }
}

fn classify_failure(err: &ResolveError) -> DomainLookup {
    match err.kind() {
        ResolveErrorKind::NoRecordsFound { response_code, .. }
            if *response_code == ResponseCode::NXDomain =>
        {
            DomainLookup::NotFound
        }
        ResolveErrorKind::NoRecordsFound { .. } => DomainLookup::NoRecords,
        _ => {
            tracing::debug!(error = %err, "DNS lookup failed");
            DomainLookup::Unknown
        }
    }
}

/// Check that the domain of a canonical address can receive mail.
///
/// A missing domain, a domain without mail or address records, and a null
/// MX reject the address. A timeout or an unusable resolver is logged and
/// treated as unknown deliverability, which passes.
pub async fn check_deliverability(
    resolver: &dyn MailDomainResolver,
    domain: &str,
    timeout: Duration,
) -> Result<(), CoreError> {
    match tokio::time::timeout(timeout, resolver.lookup(domain)).await {
        Ok(DomainLookup::AcceptsMail) => Ok(()),
        Ok(DomainLookup::NotFound) => Err(CoreError::InvalidEmail(format!(
            "The domain name {domain} does not exist."
        ))),
        Ok(DomainLookup::NullMx | DomainLookup::NoRecords) => Err(undeliverable(domain)),
        Ok(DomainLookup::Unknown) => {
            tracing::warn!(domain, "Email domain deliverability unknown, accepting address");
            Ok(())
        }
        Err(_) => {
            tracing::warn!(domain, "Email domain lookup timed out, accepting address");
            Ok(())
        }
    }
}

fn check_globally_routable(domain: &str) -> Result<(), CoreError> {
    let Some((_, tld)) = domain.rsplit_once('.') else {
        return Err(invalid(
            "The part after the @-sign is not valid. It should have a period.",
        ));
    };

    if SPECIAL_USE_DOMAINS.contains(&tld) {
        return Err(invalid(
            "The part after the @-sign is a special-use or reserved name that cannot be used with email.",
        ));
    }

    if tld.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid(
            "The part after the @-sign is not valid. It is not within a valid top-level domain.",
        ));
    }

    Ok(())
}

fn invalid(reason: &str) -> CoreError {
    CoreError::InvalidEmail(reason.to_string())
}

fn undeliverable(domain: &str) -> CoreError {
    CoreError::InvalidEmail(format!("The domain name {domain} does not accept email."))
}

use std::net::{Ipv4Addr, Ipv6Addr};

use url::{Host, Url};

use super::model::{UrlRejection, UrlVerdict, ValidatedUrl};

const ALLOWED_SCHEMES: [&str; 2] = ["http", "https"];

const LOCALHOST_NAMES: [&str; 3] = ["localhost", "127.0.0.1", "::1"];

/// Substrings that mark a host name as internal. Matched anywhere in the name.
const BLOCKED_HOST_FRAGMENTS: [&str; 7] = [
    "localhost",
    "local",
    "internal",
    "private",
    ".local",
    ".internal",
    ".private",
];

/// Validate a user-supplied URL.
///
/// Rules run in order and the first failure wins:
/// 1. parse as an absolute URL
/// 2. scheme is `http` or `https`
/// 3. host is not a loopback name or address
/// 4. an IP literal host is not in a private, link-local, "this network" or
///    multicast/reserved range
/// 5. host name contains no internal-domain fragment
pub fn validate_url(input: &str) -> UrlVerdict {
    match check(input.trim()) {
        Ok(url) => UrlVerdict::Valid(ValidatedUrl::new(url)),
        Err(reason) => UrlVerdict::Invalid(reason),
    }
}

fn check(input: &str) -> Result<Url, UrlRejection> {
    let url = Url::parse(input).map_err(|_| UrlRejection::InvalidFormat)?;

    if !ALLOWED_SCHEMES.contains(&url.scheme()) {
        return Err(UrlRejection::DisallowedScheme);
    }

    let host = url.host().ok_or(UrlRejection::InvalidFormat)?;
    // Domains come back lower-cased and IDNA-encoded for special schemes.
    let hostname = host.to_string().to_ascii_lowercase();
    let bare = hostname.trim_start_matches('[').trim_end_matches(']');

    if LOCALHOST_NAMES.contains(&bare) {
        return Err(UrlRejection::Localhost);
    }

    match host {
        Host::Ipv4(addr) => check_ipv4(addr)?,
        Host::Ipv6(addr) => check_ipv6(addr)?,
        Host::Domain(_) => {}
    }

    if BLOCKED_HOST_FRAGMENTS
        .iter()
        .any(|fragment| hostname.contains(fragment))
    {
        return Err(UrlRejection::InternalDomain);
    }

    Ok(url)
}

fn check_ipv4(addr: Ipv4Addr) -> Result<(), UrlRejection> {
    let [a, b, _, _] = addr.octets();

    if a == 127 {
        return Err(UrlRejection::Localhost);
    }

    let private = a == 10
        || (a == 172 && (16..=31).contains(&b))
        || (a == 192 && b == 168)
        || (a == 169 && b == 254)
        || a == 0
        || a >= 224;

    if private {
        Err(UrlRejection::PrivateAddress)
    } else {
        Ok(())
    }
}

fn check_ipv6(addr: Ipv6Addr) -> Result<(), UrlRejection> {
    if addr.is_loopback() {
        return Err(UrlRejection::Localhost);
    }

    if let Some(mapped) = addr.to_ipv4_mapped() {
        return check_ipv4(mapped);
    }

    let first = addr.segments()[0];
    let unique_local = (first & 0xfe00) == 0xfc00;
    let link_local = (first & 0xffc0) == 0xfe80;

    if addr.is_unspecified() || addr.is_multicast() || unique_local || link_local {
        Err(UrlRejection::PrivateAddress)
    } else {
        Ok(())
    }
}

//! Normalization of user-entered URLs into bare hostnames.
//!
//! The normalized host is the unique key of a block rule. Normalization:
//!
//! - trims surrounding whitespace
//! - assumes `https://` when no `http://`/`https://` prefix is present
//! - parses with the WHATWG URL parser (hosts come back lower-cased)
//! - keeps only the hostname and strips one leading `www.`
//!
//! Ports, paths, queries and fragments are dropped because only the hostname
//! is kept.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Result, RuleError};

const WWW_PREFIX: &str = "www.";
const SCHEMES: [&str; 2] = ["http://", "https://"];

/// A normalized hostname.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Host(String);

impl Host {
    /// Normalizes raw user input into a host.
    pub fn parse(raw: &str) -> Result<Self> {
        normalize(raw).map(Self)
    }

    /// Returns the host as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive host comparison.
    ///
    /// Hosts built by [`Host::parse`] are already lower-case, but records loaded
    /// from storage may have been written by other tools.
    pub fn matches(&self, other: &Host) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }

    /// True if this is a host [`normalize`] can produce.
    ///
    /// Only one `www.` is stripped, so `www.www.example.com` is stored as
    /// `www.example.com`; a leading `www.` is accepted when the rest of the
    /// host is already normalized.
    pub fn is_normalized(&self) -> bool {
        let host = self.as_str();
        normalize(host).is_ok_and(|n| n == host)
            || normalize(&format!("{WWW_PREFIX}{host}")).is_ok_and(|n| n == host)
    }
}

impl fmt::Display for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Host {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Normalizes a raw URL or hostname into a bare hostname.
pub fn normalize(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(RuleError::EmptyUrl);
    }

    let candidate: Cow<'_, str> = if has_http_scheme(trimmed) {
        Cow::Borrowed(trimmed)
    } else {
        Cow::Owned(format!("https://{trimmed}"))
    };

    let parsed = Url::parse(&candidate)
        .map_err(|e| RuleError::InvalidUrl(format!("{trimmed}: {e}")))?;

    let hostname = parsed
        .host_str()
        .ok_or_else(|| RuleError::InvalidUrl(format!("{trimmed}: no host")))?;

    let hostname = hostname.strip_prefix(WWW_PREFIX).unwrap_or(hostname);
    if hostname.is_empty() {
        return Err(RuleError::InvalidUrl(format!("{trimmed}: empty host")));
    }

    Ok(hostname.to_string())
}

fn has_http_scheme(input: &str) -> bool {
    let bytes = input.as_bytes();
    SCHEMES.iter().any(|scheme| {
        bytes.len() >= scheme.len() && bytes[..scheme.len()].eq_ignore_ascii_case(scheme.as_bytes())
    })
}

//! Backend endpoint selection.
//!
//! A chat request goes to the primary base URL first. On a transport failure
//! it is retried exactly once against the alternate, if the plan has one.
//! The alternate is the first explicitly configured fallback URL or, for
//! local-development hosts on port 5000/5001, the other of the two ports.

use super::client_config::ChatClientConfig;
use thiserror::Error;
use url::{Host, Url};

/// Ports the local backend is commonly started on.
const LOCAL_PORT_PAIR: (u16, u16) = (5000, 5001);

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EndpointError {
    #[error("invalid base URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("base URL '{0}' must use http or https")]
    UnsupportedScheme(String),
}

/// Primary backend plus at most one alternate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointPlan {
    primary: Url,
    alternate: Option<Url>,
}

impl EndpointPlan {
    pub fn new(primary: Url, alternate: Option<Url>) -> Self {
        Self { primary, alternate }
    }

    /// Build the plan described by a client configuration.
    pub fn from_config(config: &ChatClientConfig) -> Result<Self, EndpointError> {
        let primary = parse_base_url(&config.base_url)?;

        let alternate = match config.fallback_base_urls.first() {
            Some(url) => Some(parse_base_url(url)?),
            None if config.derive_local_alternate => Self::local_alternate(&primary),
            None => None,
        };

        Ok(Self { primary, alternate })
    }

    pub fn primary(&self) -> &Url {
        &self.primary
    }

    pub fn alternate(&self) -> Option<&Url> {
        self.alternate.as_ref()
    }

    /// Base URLs in the order they should be tried.
    pub fn candidates(&self) -> Vec<&Url> {
        std::iter::once(&self.primary)
            .chain(self.alternate.as_ref())
            .collect()
    }

    /// Whether the URL points at this machine.
    pub fn is_local(url: &Url) -> bool {
        match url.host() {
            Some(Host::Domain(domain)) => domain.eq_ignore_ascii_case("localhost"),
            Some(Host::Ipv4(ip)) => ip.is_loopback() || ip.is_unspecified(),
            Some(Host::Ipv6(ip)) => ip.is_loopback(),
            None => false,
        }
    }

    /// The 5000 ↔ 5001 swap for a local-development URL.
    pub fn local_alternate(url: &Url) -> Option<Url> {
        if !Self::is_local(url) {
            return None;
        }
        let (a, b) = LOCAL_PORT_PAIR;
        let swapped = match url.port()? {
            p if p == a => b,
            p if p == b => a,
            _ => return None,
        };
        let mut alternate = url.clone();
        alternate.set_port(Some(swapped)).ok()?;
        Some(alternate)
    }
}

fn parse_base_url(raw: &str) -> Result<Url, EndpointError> {
    let url = Url::parse(raw.trim()).map_err(|e| EndpointError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        _ => Err(EndpointError::UnsupportedScheme(raw.to_string())),
    }
}

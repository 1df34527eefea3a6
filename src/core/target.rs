// src/core/target.rs

use tracing::debug;
use url::{Host, Url};

use crate::core::error::ScanError;

/// A parsed scan target.
///
/// HTTP probes work on the full URL, socket and DNS probes only need the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    url: Url,
    host: String,
}

impl Target {
    /// Parses user input into a target.
    ///
    /// Input without a scheme is treated as `https://`. Anything that is not
    /// http(s) or that has no host is rejected before a single probe runs.
    pub fn parse(input: &str) -> Result<Self, ScanError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ScanError::InvalidTarget {
                input: input.to_string(),
                reason: "empty input".to_string(),
            });
        }

        let with_scheme = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            trimmed.to_string()
        } else if let Some((scheme, _)) = trimmed.split_once("://") {
            return Err(ScanError::UnsupportedScheme { scheme: scheme.to_string() });
        } else {
            format!("https://{}", trimmed)
        };

        let url = Url::parse(&with_scheme).map_err(|e| ScanError::InvalidTarget {
            input: input.to_string(),
            reason: e.to_string(),
        })?;

        let host = match url.host() {
            Some(Host::Domain(domain)) if !domain.is_empty() => domain.to_string(),
            Some(Host::Ipv4(addr)) => addr.to_string(),
            Some(Host::Ipv6(addr)) => addr.to_string(),
            _ => return Err(ScanError::MissingHost(input.to_string())),
        };

        debug!(url = %url, host = %host, "Target resolved.");
        Ok(Self { url, host })
    }

    /// The full URL, scheme included.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// The bare host, without brackets for IPv6 literals.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Port used for the TLS handshake.
    pub fn tls_port(&self) -> u16 {
        self.url.port().unwrap_or(443)
    }

    /// The URL with `path` appended verbatim, e.g. `https://site/app` + `/.git`.
    pub fn join_path(&self, path: &str) -> String {
        format!("{}{}", self.url.as_str().trim_end_matches('/'), path)
    }

    /// The URL with one extra query parameter appended.
    pub fn with_query_param(&self, key: &str, value: &str) -> Url {
        let mut url = self.url.clone();
        url.query_pairs_mut().append_pair(key, value);
        url
    }
}

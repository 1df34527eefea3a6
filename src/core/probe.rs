// src/core/probe.rs

use std::future::Future;
use std::sync::Arc;

use serde::{Serialize, Serializer};
use strum::{Display, EnumCount, EnumIter, IntoStaticStr};

use crate::core::models::{
    CookieData, CspData, DirectoryStatus, DnsData, HeadersData, PortStatus, ProbeOutcome,
    SqlInjectionData, SslData, SubdomainStatus, XssData,
};
use crate::core::target::Target;

/// The ten probes, declared in the order a scan runs them.
///
/// The `Display` form is the human-readable step name sent with progress events.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumCount, EnumIter, IntoStaticStr,
)]
pub enum ProbeKind {
    #[strum(serialize = "SSL Check")]
    Ssl,
    #[strum(serialize = "XSS Check")]
    Xss,
    #[strum(serialize = "Security Headers Check")]
    SecurityHeaders,
    #[strum(serialize = "CSP Check")]
    Csp,
    #[strum(serialize = "Port Scan")]
    PortScan,
    #[strum(serialize = "SQL Injection Check")]
    SqlInjection,
    #[strum(serialize = "DNS Records Check")]
    Dns,
    #[strum(serialize = "Subdomain Enumeration")]
    Subdomains,
    #[strum(serialize = "Directory Scanning")]
    Directories,
    #[strum(serialize = "Cookie Security Check")]
    Cookies,
}

impl ProbeKind {
    /// Key of this probe in the progress map.
    pub fn progress_key(self) -> &'static str {
        match self {
            ProbeKind::Ssl => "sslCheck",
            ProbeKind::Xss => "xssCheck",
            ProbeKind::SecurityHeaders => "securityHeadersCheck",
            ProbeKind::Csp => "cspCheck",
            ProbeKind::PortScan => "portScanCheck",
            ProbeKind::SqlInjection => "sqlInjectionCheck",
            ProbeKind::Dns => "dnsCheck",
            ProbeKind::Subdomains => "subdomainCheck",
            ProbeKind::Directories => "directoryScanCheck",
            ProbeKind::Cookies => "cookieCheck",
        }
    }

    /// Position in the fixed probe order.
    pub fn index(self) -> usize {
        self as usize
    }
}

impl Serialize for ProbeKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let name: &'static str = self.into();
        serializer.serialize_str(name)
    }
}

/// Result of one probe, tagged by the probe that produced it.
///
/// Serialized untagged: the wire shape is the probe's own payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ProbeResult {
    Ssl(ProbeOutcome<SslData>),
    Xss(ProbeOutcome<XssData>),
    SecurityHeaders(ProbeOutcome<HeadersData>),
    Csp(ProbeOutcome<CspData>),
    PortScan(ProbeOutcome<Vec<PortStatus>>),
    SqlInjection(ProbeOutcome<SqlInjectionData>),
    Dns(DnsData),
    Subdomains(ProbeOutcome<Vec<SubdomainStatus>>),
    Directories(ProbeOutcome<Vec<DirectoryStatus>>),
    Cookies(ProbeOutcome<CookieData>),
}

impl ProbeResult {
    /// Builds the error-shaped result for `kind`.
    pub fn failure(kind: ProbeKind, message: impl Into<String>) -> Self {
        let message = message.into();
        match kind {
            ProbeKind::Ssl => ProbeResult::Ssl(ProbeOutcome::failure(message)),
            ProbeKind::Xss => ProbeResult::Xss(ProbeOutcome::failure(message)),
            ProbeKind::SecurityHeaders => ProbeResult::SecurityHeaders(ProbeOutcome::failure(message)),
            ProbeKind::Csp => ProbeResult::Csp(ProbeOutcome::failure(message)),
            ProbeKind::PortScan => ProbeResult::PortScan(ProbeOutcome::failure(message)),
            ProbeKind::SqlInjection => ProbeResult::SqlInjection(ProbeOutcome::failure(message)),
            ProbeKind::Dns => ProbeResult::Dns(DnsData { dns_records: Vec::new(), error: Some(message) }),
            ProbeKind::Subdomains => ProbeResult::Subdomains(ProbeOutcome::failure(message)),
            ProbeKind::Directories => ProbeResult::Directories(ProbeOutcome::failure(message)),
            ProbeKind::Cookies => ProbeResult::Cookies(ProbeOutcome::failure(message)),
        }
    }

    pub fn kind(&self) -> ProbeKind {
        match self {
            ProbeResult::Ssl(_) => ProbeKind::Ssl,
            ProbeResult::Xss(_) => ProbeKind::Xss,
            ProbeResult::SecurityHeaders(_) => ProbeKind::SecurityHeaders,
            ProbeResult::Csp(_) => ProbeKind::Csp,
            ProbeResult::PortScan(_) => ProbeKind::PortScan,
            ProbeResult::SqlInjection(_) => ProbeKind::SqlInjection,
            ProbeResult::Dns(_) => ProbeKind::Dns,
            ProbeResult::Subdomains(_) => ProbeKind::Subdomains,
            ProbeResult::Directories(_) => ProbeKind::Directories,
            ProbeResult::Cookies(_) => ProbeKind::Cookies,
        }
    }

    /// The error message carried by this result, if it is error-shaped.
    pub fn error(&self) -> Option<&str> {
        match self {
            ProbeResult::Ssl(o) => o.error(),
            ProbeResult::Xss(o) => o.error(),
            ProbeResult::SecurityHeaders(o) => o.error(),
            ProbeResult::Csp(o) => o.error(),
            ProbeResult::PortScan(o) => o.error(),
            ProbeResult::SqlInjection(o) => o.error(),
            ProbeResult::Dns(d) => d.error.as_deref(),
            ProbeResult::Subdomains(o) => o.error(),
            ProbeResult::Directories(o) => o.error(),
            ProbeResult::Cookies(o) => o.error(),
        }
    }
}

/// Something that can run a single probe against a target.
///
/// Implementations must always resolve to a result: failures are returned as
/// error-shaped `ProbeResult`s, never as panics.
pub trait Prober: Send + Sync {
    fn run(&self, kind: ProbeKind, target: &Target) -> impl Future<Output = ProbeResult> + Send;
}

impl<P: Prober> Prober for Arc<P> {
    fn run(&self, kind: ProbeKind, target: &Target) -> impl Future<Output = ProbeResult> + Send {
        (**self).run(kind, target)
    }
}

// src/core/scanner/mod.rs

// One module per probe family; `LiveProber` dispatches a `ProbeKind` to them.
pub mod cookie_scanner;
pub mod directory_scanner;
pub mod dns_scanner;
pub mod headers_scanner;
pub mod injection_scanner;
pub mod port_scanner;
pub mod ssl_scanner;
pub mod subdomain_scanner;

use hickory_resolver::TokioAsyncResolver;
use tracing::debug;

use crate::config::ScanSettings;
use crate::core::error::ScanError;
use crate::core::models::ProbeOutcome;
use crate::core::probe::{ProbeKind, ProbeResult, Prober};
use crate::core::target::Target;

use self::cookie_scanner::run_cookie_scan;
use self::directory_scanner::run_directory_scan;
use self::dns_scanner::{build_resolver, run_dns_scan};
use self::headers_scanner::{run_csp_scan, run_headers_scan};
use self::injection_scanner::{run_sql_injection_scan, run_xss_scan};
use self::port_scanner::run_port_scan;
use self::ssl_scanner::run_ssl_scan;
use self::subdomain_scanner::run_subdomain_scan;

/// Runs the probes against the real network.
///
/// The HTTP client and DNS resolver are built once and shared by every scan;
/// neither carries per-scan state.
#[derive(Clone)]
pub struct LiveProber {
    client: reqwest::Client,
    resolver: TokioAsyncResolver,
    settings: ScanSettings,
}

impl LiveProber {
    pub fn new(settings: ScanSettings) -> Result<Self, ScanError> {
        let client = reqwest::Client::builder()
            .user_agent(settings.user_agent.as_str())
            .timeout(settings.http_timeout)
            .connect_timeout(settings.http_timeout)
            .build()?;
        let resolver = build_resolver(settings.dns_timeout);
        Ok(Self { client, resolver, settings })
    }
}

impl Prober for LiveProber {
    async fn run(&self, kind: ProbeKind, target: &Target) -> ProbeResult {
        debug!(step = %kind, "Dispatching probe.");
        match kind {
            ProbeKind::Ssl => ProbeResult::Ssl(run_ssl_scan(target, self.settings.tls_timeout).await),
            ProbeKind::Xss => ProbeResult::Xss(run_xss_scan(&self.client, target).await),
            ProbeKind::SecurityHeaders => ProbeResult::SecurityHeaders(run_headers_scan(&self.client, target).await),
            ProbeKind::Csp => ProbeResult::Csp(run_csp_scan(&self.client, target).await),
            ProbeKind::PortScan => ProbeResult::PortScan(ProbeOutcome::Success(
                run_port_scan(target, self.settings.port_timeout).await,
            )),
            ProbeKind::SqlInjection => ProbeResult::SqlInjection(run_sql_injection_scan(&self.client, target).await),
            ProbeKind::Dns => ProbeResult::Dns(run_dns_scan(&self.resolver, target).await),
            ProbeKind::Subdomains => ProbeResult::Subdomains(ProbeOutcome::Success(
                run_subdomain_scan(&self.resolver, &self.client, target).await,
            )),
            ProbeKind::Directories => {
                ProbeResult::Directories(ProbeOutcome::Success(run_directory_scan(&self.client, target).await))
            }
            ProbeKind::Cookies => ProbeResult::Cookies(run_cookie_scan(&self.client, target).await),
        }
    }
}

// src/core/testing.rs

//! In-memory prober used by the orchestrator and transport tests.

use std::collections::HashMap;
use std::time::Duration;

use crate::core::models::*;
use crate::core::probe::{ProbeKind, ProbeResult, Prober};
use crate::core::target::Target;

/// What the scripted prober does for one probe.
#[derive(Clone)]
pub enum Script {
    Return(ProbeResult),
    Fail(&'static str),
    Panic,
    Sleep(Duration),
}

/// Answers every probe from a script; unscripted probes get a clean result.
#[derive(Clone, Default)]
pub struct ScriptedProber {
    scripts: HashMap<ProbeKind, Script>,
}

impl ScriptedProber {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, kind: ProbeKind, script: Script) -> Self {
        self.scripts.insert(kind, script);
        self
    }

    pub fn failing_everything() -> Self {
        use strum::IntoEnumIterator;
        ProbeKind::iter().fold(Self::new(), |prober, kind| prober.with(kind, Script::Fail("network unreachable")))
    }
}

impl Prober for ScriptedProber {
    async fn run(&self, kind: ProbeKind, _target: &Target) -> ProbeResult {
        match self.scripts.get(&kind) {
            Some(Script::Return(result)) => result.clone(),
            Some(Script::Fail(message)) => ProbeResult::failure(kind, *message),
            Some(Script::Panic) => panic!("scripted panic in {}", kind),
            Some(Script::Sleep(duration)) => {
                tokio::time::sleep(*duration).await;
                clean_result(kind)
            }
            None => clean_result(kind),
        }
    }
}

/// A result with no weaknesses for `kind`.
pub fn clean_result(kind: ProbeKind) -> ProbeResult {
    match kind {
        ProbeKind::Ssl => ProbeResult::Ssl(ProbeOutcome::Success(SslData { ssl_status: SslStatus::Valid, certificate: None })),
        ProbeKind::Xss => ProbeResult::Xss(ProbeOutcome::Success(XssData {
            xss_vulnerable: false,
            details: "No XSS Vulnerability Detected".to_string(),
        })),
        ProbeKind::SecurityHeaders => ProbeResult::SecurityHeaders(ProbeOutcome::Success(HeadersData {
            content_security_policy: HeaderValue::Present("default-src 'self'".to_string()),
            x_frame_options: HeaderValue::Present("DENY".to_string()),
            strict_transport_security: HeaderValue::Present("max-age=31536000".to_string()),
            x_content_type_options: HeaderValue::Present("nosniff".to_string()),
        })),
        ProbeKind::Csp => ProbeResult::Csp(ProbeOutcome::Success(CspData {
            csp_status: CspStatus::Present,
            csp_details: "default-src 'self'".to_string(),
        })),
        ProbeKind::PortScan => ProbeResult::PortScan(ProbeOutcome::Success(vec![
            PortStatus { port: 80, status: PortState::Open },
            PortStatus { port: 443, status: PortState::Open },
        ])),
        ProbeKind::SqlInjection => ProbeResult::SqlInjection(ProbeOutcome::Success(SqlInjectionData {
            sql_injection_vulnerable: false,
            details: "No SQL Injection Vulnerability Detected".to_string(),
        })),
        ProbeKind::Dns => ProbeResult::Dns(DnsData {
            dns_records: vec![DnsRecord { record_type: "A".to_string(), value: "192.0.2.1".to_string() }],
            error: None,
        }),
        ProbeKind::Subdomains => ProbeResult::Subdomains(ProbeOutcome::Success(vec![SubdomainStatus {
            subdomain: "www.example.test".to_string(),
            status: SubdomainState::UpHttps,
        }])),
        ProbeKind::Directories => ProbeResult::Directories(ProbeOutcome::Success(vec![DirectoryStatus {
            path: "/admin".to_string(),
            status: DirectoryState::NotExposed,
        }])),
        ProbeKind::Cookies => ProbeResult::Cookies(ProbeOutcome::Success(CookieData::default())),
    }
}

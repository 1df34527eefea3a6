// src/core/orchestrator.rs

use std::panic::AssertUnwindSafe;
use std::time::Duration;

use futures::FutureExt;
use strum::IntoEnumIterator;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::core::error::ScanError;
use crate::core::events::ScanEvent;
use crate::core::models::{
    CookieData, CspData, DirectoryStatus, DnsData, HeadersData, PortStatus, ProbeOutcome, ScanReport,
    SqlInjectionData, SslData, SubdomainStatus, XssData,
};
use crate::core::probe::{ProbeKind, ProbeResult, Prober};
use crate::core::progress::ProgressMap;
use crate::core::scorer::{self, ScoreCard};
use crate::core::target::Target;

/// Where a scan currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    NotStarted,
    ProbeCompleted(ProbeKind),
    Finalized,
    Failed,
    Abandoned,
}

/// What a successful scan produced, for callers that want more than the events.
#[derive(Debug, Clone)]
pub struct ScanOutcome {
    pub report: ScanReport,
    pub card: ScoreCard,
}

/// Runs the ten probes in their fixed order and reports after each one.
///
/// An orchestrator handles exactly one scan; a second `run` on the same
/// instance is refused, so every request gets a fresh progress map.
pub struct ScanOrchestrator<P> {
    prober: P,
    probe_deadline: Duration,
    state: ScanState,
    progress: ProgressMap,
    report: ReportBuilder,
}

impl<P: Prober> ScanOrchestrator<P> {
    pub fn new(prober: P, probe_deadline: Duration) -> Self {
        Self {
            prober,
            probe_deadline,
            state: ScanState::NotStarted,
            progress: ProgressMap::new(),
            report: ReportBuilder::default(),
        }
    }

    pub fn state(&self) -> ScanState {
        self.state
    }

    /// Scans `input`, sending each event to `events`.
    ///
    /// A target that cannot be parsed produces a single error event and no
    /// progress. If the receiver goes away the in-flight probe still finishes,
    /// but no further probe is started.
    pub async fn run(&mut self, input: &str, events: &mpsc::Sender<ScanEvent>) -> Result<ScanOutcome, ScanError> {
        if self.state != ScanState::NotStarted {
            warn!(state = ?self.state, "Orchestrator already used.");
            return Err(ScanError::AlreadyStarted);
        }

        let target = match Target::parse(input) {
            Ok(target) => target,
            Err(e) => {
                warn!(input, error = %e, "Rejecting scan target.");
                self.state = ScanState::Failed;
                let _ = events.send(ScanEvent::error(e.to_string())).await;
                return Err(e);
            }
        };
        info!(url = %target.url(), host = target.host(), "Starting scan.");

        for kind in ProbeKind::iter() {
            let result = self.run_probe(kind, &target).await;
            self.progress.complete(kind);
            self.state = ScanState::ProbeCompleted(kind);
            self.report.record(result.clone());

            if events.send(ScanEvent::progress(&self.progress, kind, result)).await.is_err() {
                warn!(step = %kind, "Event receiver dropped, abandoning scan.");
                self.state = ScanState::Abandoned;
                return Err(ScanError::Abandoned(kind));
            }
        }

        let report = std::mem::take(&mut self.report).build()?;
        let card = scorer::score(&report);
        info!(
            score = card.score,
            deductions = card.deductions.len(),
            probes = self.progress.completed_count(),
            "Scan finished."
        );

        self.state = ScanState::Finalized;
        if events.send(ScanEvent::finished(report.clone(), &card)).await.is_err() {
            debug!("Event receiver dropped before the final event.");
        }
        Ok(ScanOutcome { report, card })
    }

    /// Runs one probe, turning panics and deadline overruns into its error payload.
    async fn run_probe(&self, kind: ProbeKind, target: &Target) -> ProbeResult {
        debug!(step = %kind, "Running probe.");
        let guarded = AssertUnwindSafe(self.prober.run(kind, target)).catch_unwind();
        match tokio::time::timeout(self.probe_deadline, guarded).await {
            Ok(Ok(result)) if result.kind() == kind => result,
            Ok(Ok(result)) => {
                error!(step = %kind, got = %result.kind(), "Probe returned a result for another step.");
                ProbeResult::failure(kind, format!("Probe returned a result for {}", result.kind()))
            }
            Ok(Err(_)) => {
                error!(step = %kind, "Probe panicked.");
                ProbeResult::failure(kind, "Probe failed unexpectedly")
            }
            Err(_) => {
                warn!(step = %kind, deadline = ?self.probe_deadline, "Probe exceeded its deadline.");
                ProbeResult::failure(kind, format!("Probe timed out after {:?}", self.probe_deadline))
            }
        }
    }
}

/// Collects probe results until the report is complete.
#[derive(Debug, Default)]
struct ReportBuilder {
    ssl: Option<ProbeOutcome<SslData>>,
    xss: Option<ProbeOutcome<XssData>>,
    headers: Option<ProbeOutcome<HeadersData>>,
    csp: Option<ProbeOutcome<CspData>>,
    ports: Option<ProbeOutcome<Vec<PortStatus>>>,
    sql_injection: Option<ProbeOutcome<SqlInjectionData>>,
    dns: Option<DnsData>,
    subdomains: Option<ProbeOutcome<Vec<SubdomainStatus>>>,
    directories: Option<ProbeOutcome<Vec<DirectoryStatus>>>,
    cookies: Option<ProbeOutcome<CookieData>>,
}

impl ReportBuilder {
    fn record(&mut self, result: ProbeResult) {
        match result {
            ProbeResult::Ssl(r) => self.ssl = Some(r),
            ProbeResult::Xss(r) => self.xss = Some(r),
            ProbeResult::SecurityHeaders(r) => self.headers = Some(r),
            ProbeResult::Csp(r) => self.csp = Some(r),
            ProbeResult::PortScan(r) => self.ports = Some(r),
            ProbeResult::SqlInjection(r) => self.sql_injection = Some(r),
            ProbeResult::Dns(r) => self.dns = Some(r),
            ProbeResult::Subdomains(r) => self.subdomains = Some(r),
            ProbeResult::Directories(r) => self.directories = Some(r),
            ProbeResult::Cookies(r) => self.cookies = Some(r),
        }
    }

    fn build(self) -> Result<ScanReport, ScanError> {
        Ok(ScanReport {
            ssl_result: self.ssl.ok_or(ScanError::IncompleteReport(ProbeKind::Ssl))?,
            xss_result: self.xss.ok_or(ScanError::IncompleteReport(ProbeKind::Xss))?,
            headers_result: self.headers.ok_or(ScanError::IncompleteReport(ProbeKind::SecurityHeaders))?,
            csp_result: self.csp.ok_or(ScanError::IncompleteReport(ProbeKind::Csp))?,
            port_scan_result: self.ports.ok_or(ScanError::IncompleteReport(ProbeKind::PortScan))?,
            sql_injection_result: self.sql_injection.ok_or(ScanError::IncompleteReport(ProbeKind::SqlInjection))?,
            dns_result: self.dns.ok_or(ScanError::IncompleteReport(ProbeKind::Dns))?,
            subdomains_result: self.subdomains.ok_or(ScanError::IncompleteReport(ProbeKind::Subdomains))?,
            directory_result: self.directories.ok_or(ScanError::IncompleteReport(ProbeKind::Directories))?,
            cookie_result: self.cookies.ok_or(ScanError::IncompleteReport(ProbeKind::Cookies))?,
        })
    }
}

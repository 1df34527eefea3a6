// src/core/scorer.rs

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::core::knowledge_base::{FindingCategory, get_finding_detail};
use crate::core::models::{DirectoryState, ScanReport, SslStatus};

/// Points every scan starts from.
pub const BASE_SCORE: i32 = 100;

static RE_FIRST_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").unwrap());

/// Every weakness the scorer knows how to penalise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DeductionReason {
    SslInvalid,
    SslCertificateMissing,
    XssVulnerable,
    SqlInjectionVulnerable,
    CookieMissingHttpOnly,
    CookieMissingSecure,
    CookieMissingSameSite,
    DirectoryExposed,
    CspMissing,
    XFrameOptionsMissing,
    HstsMissing,
}

impl DeductionReason {
    pub fn points(self) -> i32 {
        match self {
            DeductionReason::SslInvalid | DeductionReason::SslCertificateMissing => 20,
            // Literal values, not the 15/20 some older notes mention.
            DeductionReason::XssVulnerable => 10,
            DeductionReason::SqlInjectionVulnerable => 15,
            DeductionReason::CookieMissingHttpOnly
            | DeductionReason::CookieMissingSecure
            | DeductionReason::CookieMissingSameSite => 2,
            DeductionReason::DirectoryExposed => 5,
            DeductionReason::CspMissing => 7,
            DeductionReason::XFrameOptionsMissing | DeductionReason::HstsMissing => 5,
        }
    }

    /// Knowledge base code for this reason.
    pub fn code(self) -> &'static str {
        match self {
            DeductionReason::SslInvalid => "SSL_INVALID",
            DeductionReason::SslCertificateMissing => "SSL_NO_CERTIFICATE",
            DeductionReason::XssVulnerable => "XSS_REFLECTED",
            DeductionReason::SqlInjectionVulnerable => "SQLI_ERROR_LEAK",
            DeductionReason::CookieMissingHttpOnly => "COOKIE_NO_HTTPONLY",
            DeductionReason::CookieMissingSecure => "COOKIE_NO_SECURE",
            DeductionReason::CookieMissingSameSite => "COOKIE_NO_SAMESITE",
            DeductionReason::DirectoryExposed => "DIRECTORY_EXPOSED",
            DeductionReason::CspMissing => "HEADERS_CSP_MISSING",
            DeductionReason::XFrameOptionsMissing => "HEADERS_X_FRAME_OPTIONS_MISSING",
            DeductionReason::HstsMissing => "HEADERS_HSTS_MISSING",
        }
    }
}

/// One applied penalty, with the knowledge base text a client needs to explain it.
/// `subject` names the cookie or path it applies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Deduction {
    pub code: &'static str,
    pub title: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<FindingCategory>,
    pub description: &'static str,
    pub remediation: &'static str,
    pub points: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip)]
    pub reason: DeductionReason,
}

impl Deduction {
    fn new(reason: DeductionReason, subject: Option<String>) -> Self {
        let code = reason.code();
        let detail = get_finding_detail(code);
        Self {
            code,
            title: detail.map(|f| f.title).unwrap_or(code),
            category: detail.map(|f| f.category),
            description: detail.map(|f| f.description).unwrap_or_default(),
            remediation: detail.map(|f| f.remediation).unwrap_or_default(),
            points: reason.points(),
            subject,
            reason,
        }
    }
}

/// Qualitative bucket for a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScoreRating {
    Great,
    Fair,
    Poor,
}

impl ScoreRating {
    pub fn from_score(score: i32) -> Self {
        match score {
            70.. => ScoreRating::Great,
            50..=69 => ScoreRating::Fair,
            _ => ScoreRating::Poor,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            ScoreRating::Great => "Great job!",
            ScoreRating::Fair => "Good efforts, improvement required!",
            ScoreRating::Poor => "Needs significant improvement!",
        }
    }
}

/// The score of one report together with the deductions that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreCard {
    pub score: i32,
    pub rating: ScoreRating,
    pub deductions: Vec<Deduction>,
}

impl fmt::Display for ScoreCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Security Score: {}/100", self.score)
    }
}

/// Scores a report. Pure: the same report always yields the same card.
///
/// Deductions are independent and the result is not clamped, so a bad enough
/// report goes below zero. Error-shaped probe results contribute nothing.
pub fn score(report: &ScanReport) -> ScoreCard {
    let mut deductions = Vec::new();

    if let Some(ssl) = report.ssl_result.success() {
        match ssl.ssl_status {
            SslStatus::Invalid => deductions.push(Deduction::new(DeductionReason::SslInvalid, None)),
            SslStatus::NoCertificate => {
                deductions.push(Deduction::new(DeductionReason::SslCertificateMissing, None))
            }
            SslStatus::Valid => {}
        }
    }

    if report.xss_result.success().is_some_and(|x| x.xss_vulnerable) {
        deductions.push(Deduction::new(DeductionReason::XssVulnerable, None));
    }

    if report.sql_injection_result.success().is_some_and(|s| s.sql_injection_vulnerable) {
        deductions.push(Deduction::new(DeductionReason::SqlInjectionVulnerable, None));
    }

    if let Some(cookies) = report.cookie_result.success() {
        for analysis in &cookies.cookies {
            let checks = [
                (analysis.flags.http_only, DeductionReason::CookieMissingHttpOnly),
                (analysis.flags.secure, DeductionReason::CookieMissingSecure),
                (analysis.flags.same_site, DeductionReason::CookieMissingSameSite),
            ];
            for (present, reason) in checks {
                if !present {
                    deductions.push(Deduction::new(reason, Some(analysis.cookie.clone())));
                }
            }
        }
    }

    if let Some(directories) = report.directory_result.success() {
        for dir in directories.iter().filter(|d| d.status == DirectoryState::Exposed) {
            deductions.push(Deduction::new(DeductionReason::DirectoryExposed, Some(dir.path.clone())));
        }
    }

    if let Some(headers) = report.headers_result.success() {
        if headers.content_security_policy.is_missing() {
            deductions.push(Deduction::new(DeductionReason::CspMissing, None));
        }
        if headers.x_frame_options.is_missing() {
            deductions.push(Deduction::new(DeductionReason::XFrameOptionsMissing, None));
        }
        if headers.strict_transport_security.is_missing() {
            deductions.push(Deduction::new(DeductionReason::HstsMissing, None));
        }
    }

    let score = BASE_SCORE - deductions.iter().map(|d| d.points).sum::<i32>();
    ScoreCard { score, rating: ScoreRating::from_score(score), deductions }
}

/// Recovers the number from a rendered score by taking the first run of digits.
///
/// The sign of a negative score is lost, as it is for any consumer reading
/// the string this way.
pub fn extract_score(rendered: &str) -> Option<u32> {
    RE_FIRST_NUMBER.find(rendered).and_then(|m| m.as_str().parse().ok())
}

// src/core/models.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// --- Reusable Result Types ---

/// The error payload of a probe, serialized as `{"error": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeFailure {
    pub error: String,
}

/// Terminal outcome of a probe: a success payload or an error payload.
///
/// Both are valid results. Serialized untagged, so the wire shape is either the
/// payload itself or `{"error": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProbeOutcome<T> {
    Failure(ProbeFailure),
    Success(T),
}

impl<T> ProbeOutcome<T> {
    pub fn failure(message: impl Into<String>) -> Self {
        ProbeOutcome::Failure(ProbeFailure { error: message.into() })
    }

    pub fn success(&self) -> Option<&T> {
        match self {
            ProbeOutcome::Success(data) => Some(data),
            ProbeOutcome::Failure(_) => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ProbeOutcome::Success(_) => None,
            ProbeOutcome::Failure(f) => Some(&f.error),
        }
    }
}

impl<T> From<Result<T, String>> for ProbeOutcome<T> {
    fn from(result: Result<T, String>) -> Self {
        match result {
            Ok(data) => ProbeOutcome::Success(data),
            Err(error) => ProbeOutcome::Failure(ProbeFailure { error }),
        }
    }
}

// --- SSL/TLS Models ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SslStatus {
    Valid,
    Invalid,
    #[serde(rename = "No SSL Certificate Found")]
    NoCertificate,
}

/// Details pulled out of the peer certificate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateInfo {
    pub ssl_valid_from: DateTime<Utc>,
    pub ssl_valid_to: DateTime<Utc>,
    pub ssl_subject: String,
    pub ssl_issuer: String,
    pub days_until_expiry: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SslData {
    pub ssl_status: SslStatus,
    #[serde(flatten)]
    pub certificate: Option<CertificateInfo>,
}

impl SslData {
    pub fn no_certificate() -> Self {
        Self { ssl_status: SslStatus::NoCertificate, certificate: None }
    }
}

// --- Reflected Input Models ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct XssData {
    pub xss_vulnerable: bool,
    pub details: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SqlInjectionData {
    pub sql_injection_vulnerable: bool,
    pub details: String,
}

// --- HTTP Header Models ---

/// A header value, or the `"Missing"` sentinel when the server did not send it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum HeaderValue {
    Present(String),
    Missing,
}

impl HeaderValue {
    pub fn is_missing(&self) -> bool {
        matches!(self, HeaderValue::Missing)
    }
}

impl From<String> for HeaderValue {
    fn from(value: String) -> Self {
        if value == "Missing" { HeaderValue::Missing } else { HeaderValue::Present(value) }
    }
}

impl From<HeaderValue> for String {
    fn from(value: HeaderValue) -> Self {
        match value {
            HeaderValue::Present(v) => v,
            HeaderValue::Missing => "Missing".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadersData {
    pub content_security_policy: HeaderValue,
    pub x_frame_options: HeaderValue,
    pub strict_transport_security: HeaderValue,
    pub x_content_type_options: HeaderValue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CspStatus {
    Present,
    Missing,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CspData {
    pub csp_status: CspStatus,
    pub csp_details: String,
}

// --- Network Models ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortState {
    Open,
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortStatus {
    pub port: u16,
    pub status: PortState,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsRecord {
    #[serde(rename = "type")]
    pub record_type: String,
    pub value: String,
}

/// DNS lookups never fail the probe: errors degrade to an empty list plus a note.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DnsData {
    pub dns_records: Vec<DnsRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubdomainState {
    #[serde(rename = "exists and is up (HTTPS)")]
    UpHttps,
    #[serde(rename = "exists but unreachable (HTTPS)")]
    UnreachableHttps,
    #[serde(rename = "exists and is up (HTTP)")]
    UpHttp,
    #[serde(rename = "exists but unreachable (HTTP)")]
    UnreachableHttp,
    #[serde(rename = "exists but unreachable")]
    Unreachable,
    #[serde(rename = "not found")]
    NotFound,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubdomainStatus {
    pub subdomain: String,
    pub status: SubdomainState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DirectoryState {
    #[serde(rename = "exposed")]
    Exposed,
    #[serde(rename = "not exposed")]
    NotExposed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryStatus {
    pub path: String,
    pub status: DirectoryState,
}

// --- Cookie Models ---

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CookieFlags {
    pub http_only: bool,
    pub secure: bool,
    pub same_site: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CookieAnalysis {
    pub cookie: String,
    pub flags: CookieFlags,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CookieData {
    pub cookies: Vec<CookieAnalysis>,
}

// --- Main Report ---

/// Results of all ten probes for one scan, keyed the way clients expect them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanReport {
    pub ssl_result: ProbeOutcome<SslData>,
    pub xss_result: ProbeOutcome<XssData>,
    pub headers_result: ProbeOutcome<HeadersData>,
    pub csp_result: ProbeOutcome<CspData>,
    pub port_scan_result: ProbeOutcome<Vec<PortStatus>>,
    pub sql_injection_result: ProbeOutcome<SqlInjectionData>,
    pub dns_result: DnsData,
    pub subdomains_result: ProbeOutcome<Vec<SubdomainStatus>>,
    pub directory_result: ProbeOutcome<Vec<DirectoryStatus>>,
    pub cookie_result: ProbeOutcome<CookieData>,
}

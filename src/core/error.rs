// src/core/error.rs

use thiserror::Error;

use crate::core::probe::ProbeKind;

/// Errors that abort a scan as a whole.
///
/// Anything that goes wrong inside a single probe is reported as that probe's
/// error payload instead and never shows up here.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Invalid target '{input}': {reason}")]
    InvalidTarget { input: String, reason: String },

    #[error("Unsupported URL scheme '{scheme}', only http and https can be scanned")]
    UnsupportedScheme { scheme: String },

    #[error("Target '{0}' does not contain a host")]
    MissingHost(String),

    #[error("Scan report is missing the result of {0}")]
    IncompleteReport(ProbeKind),

    #[error("Event receiver dropped after {0}, scan abandoned")]
    Abandoned(ProbeKind),

    #[error("This orchestrator has already run a scan")]
    AlreadyStarted,

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

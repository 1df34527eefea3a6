//! Static, read-only catalogue of every weakness the scorer can penalise,
//! with a human-readable explanation and remediation for each code.

use std::fmt;

use serde::{Serialize, Serializer};

/// High-level grouping of findings, used by consumers to group deductions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FindingCategory {
    Ssl,
    Injection,
    Cookies,
    Exposure,
    Http,
}

impl fmt::Display for FindingCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FindingCategory::Ssl => write!(f, "SSL/TLS Certificate"),
            FindingCategory::Injection => write!(f, "Reflected Input"),
            FindingCategory::Cookies => write!(f, "Cookie Hygiene"),
            FindingCategory::Exposure => write!(f, "Exposed Content"),
            FindingCategory::Http => write!(f, "HTTP Security Headers"),
        }
    }
}

impl Serialize for FindingCategory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Everything needed to present one finding to a user.
pub struct FindingDetail {
    /// Machine-readable identifier, matching `DeductionReason::code`.
    pub code: &'static str,
    pub title: &'static str,
    pub category: FindingCategory,
    pub description: &'static str,
    pub remediation: &'static str,
}

static FINDINGS: &[FindingDetail] = &[
    // --- SSL/TLS ---
    FindingDetail {
        code: "SSL_INVALID",
        title: "SSL Certificate Invalid",
        category: FindingCategory::Ssl,
        description: "The certificate presented by the server is outside its validity window or does not name the scanned host. Browsers will show security warnings and users may be exposed to interception.",
        remediation: "Install a certificate issued for this host name and renew it before it expires. Automate renewal (e.g. Let's Encrypt / Certbot) to avoid lapses."
    },
    FindingDetail {
        code: "SSL_NO_CERTIFICATE",
        title: "No SSL Certificate Found",
        category: FindingCategory::Ssl,
        description: "The TLS handshake completed but the server did not present a certificate, so clients cannot authenticate it.",
        remediation: "Configure the web server with a valid certificate and serve all traffic over HTTPS."
    },

    // --- Reflected input ---
    FindingDetail {
        code: "XSS_REFLECTED",
        title: "Reflected Script Payload",
        category: FindingCategory::Injection,
        description: "A script tag sent in a query parameter was echoed back verbatim in the response body. This is a strong hint of reflected cross-site scripting.",
        remediation: "Encode all user-controlled output for its HTML context and deploy a restrictive Content-Security-Policy."
    },
    FindingDetail {
        code: "SQLI_ERROR_LEAK",
        title: "Possible SQL Injection",
        category: FindingCategory::Injection,
        description: "A boolean tautology sent in a query parameter produced a response mentioning 'error' or 'syntax'. The application may be building SQL from raw input.",
        remediation: "Use parameterised queries everywhere and stop leaking database errors to clients."
    },

    // --- Cookies ---
    FindingDetail {
        code: "COOKIE_NO_HTTPONLY",
        title: "Cookie Without HttpOnly",
        category: FindingCategory::Cookies,
        description: "Scripts running in the page can read this cookie, which makes session theft through XSS trivial.",
        remediation: "Set the HttpOnly attribute on every cookie that client-side code does not need."
    },
    FindingDetail {
        code: "COOKIE_NO_SECURE",
        title: "Cookie Without Secure",
        category: FindingCategory::Cookies,
        description: "The cookie may be sent over plain HTTP, where it can be captured on the network.",
        remediation: "Set the Secure attribute so the cookie only travels over HTTPS."
    },
    FindingDetail {
        code: "COOKIE_NO_SAMESITE",
        title: "Cookie Without SameSite",
        category: FindingCategory::Cookies,
        description: "Without SameSite the browser attaches the cookie to cross-site requests, enabling cross-site request forgery.",
        remediation: "Set SameSite=Lax or SameSite=Strict unless the cookie must be sent cross-site."
    },

    // --- Exposure ---
    FindingDetail {
        code: "DIRECTORY_EXPOSED",
        title: "Sensitive Path Exposed",
        category: FindingCategory::Exposure,
        description: "A well-known sensitive path (admin panel, configuration, backup, VCS metadata or environment file) answered with HTTP 200.",
        remediation: "Remove the content from the web root or deny access to it in the web server configuration."
    },

    // --- HTTP headers ---
    FindingDetail {
        code: "HEADERS_CSP_MISSING",
        title: "CSP Header Missing",
        category: FindingCategory::Http,
        description: "Content-Security-Policy limits where scripts and other resources may load from and is the main browser-side defence against XSS.",
        remediation: "Add a Content-Security-Policy header with trusted sources for scripts, styles and other assets. Start restrictive and relax as needed."
    },
    FindingDetail {
        code: "HEADERS_X_FRAME_OPTIONS_MISSING",
        title: "X-Frame-Options Missing",
        category: FindingCategory::Http,
        description: "Without this header the site can be loaded in a hidden iframe and used for clickjacking.",
        remediation: "Add 'X-Frame-Options: DENY' or 'SAMEORIGIN'."
    },
    FindingDetail {
        code: "HEADERS_HSTS_MISSING",
        title: "HSTS Header Missing",
        category: FindingCategory::Http,
        description: "Strict-Transport-Security tells browsers to only use HTTPS for this site, preventing protocol downgrade attacks and cookie hijacking.",
        remediation: "Add 'Strict-Transport-Security: max-age=31536000; includeSubDomains'."
    },
];

/// Looks up the detail for a finding code.
pub fn get_finding_detail(code: &str) -> Option<&'static FindingDetail> {
    FINDINGS.iter().find(|f| f.code == code)
}

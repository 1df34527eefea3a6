// src/core/scanner/cookie_scanner.rs

use reqwest::header::SET_COOKIE;
use tracing::{debug, error, info};

use crate::core::models::{CookieAnalysis, CookieData, CookieFlags, ProbeOutcome};
use crate::core::target::Target;

/// Inspects every `Set-Cookie` header of the landing page.
pub async fn run_cookie_scan(client: &reqwest::Client, target: &Target) -> ProbeOutcome<CookieData> {
    info!(url = %target.url(), "Starting cookie scan.");
    let result = match client.get(target.url().as_str()).send().await.and_then(|r| r.error_for_status()) {
        Ok(response) => {
            let cookies: Vec<CookieAnalysis> = response
                .headers()
                .get_all(SET_COOKIE)
                .iter()
                .map(|value| analyze_cookie(&String::from_utf8_lossy(value.as_bytes())))
                .collect();
            info!(count = cookies.len(), "Cookie scan finished.");
            Ok(CookieData { cookies })
        }
        Err(e) => {
            error!(error = %e, "HTTP request failed for cookie scan.");
            Err(format!("HTTP request failed: {}", e))
        }
    };
    result.into()
}

/// Substring test for the three attributes, not a full attribute parser.
fn analyze_cookie(cookie: &str) -> CookieAnalysis {
    let flags = CookieFlags {
        http_only: cookie.contains("HttpOnly"),
        secure: cookie.contains("Secure"),
        same_site: cookie.contains("SameSite"),
    };
    debug!(?flags, "Cookie analysed.");
    CookieAnalysis { cookie: cookie.to_string(), flags }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_flags_present() {
        let analysis = analyze_cookie("sid=abc; Path=/; Secure; HttpOnly; SameSite=Lax");
        assert_eq!(analysis.flags, CookieFlags { http_only: true, secure: true, same_site: true });
        assert_eq!(analysis.cookie, "sid=abc; Path=/; Secure; HttpOnly; SameSite=Lax");
    }

    #[test]
    fn test_flags_are_case_sensitive_substrings() {
        let analysis = analyze_cookie("theme=dark; httponly; secure");
        assert_eq!(analysis.flags, CookieFlags::default());
    }
}

// src/core/scanner/headers_scanner.rs

use reqwest::header::HeaderMap;
use tracing::{debug, error, info, warn};

use crate::core::models::{CspData, CspStatus, HeaderValue, HeadersData, ProbeOutcome};
use crate::core::target::Target;

/// Reads one header from the response, or the `Missing` sentinel.
///
/// Non-UTF-8 values still count as present.
fn check_header(headers: &HeaderMap, name: &str) -> HeaderValue {
    debug!(header_name = name, "Checking for header.");
    match headers.get(name) {
        Some(value) => match value.to_str() {
            Ok(s) => {
                debug!(header_name = name, value = s, "Header found.");
                HeaderValue::Present(s.to_string())
            }
            Err(_) => {
                warn!(header_name = name, "Header found but contained invalid UTF-8.");
                HeaderValue::Present("[Invalid UTF-8]".to_string())
            }
        },
        None => {
            debug!(header_name = name, "Header not found.");
            HeaderValue::Missing
        }
    }
}

/// Headers of the landing page. 4xx and 5xx answers are failures, not pages to inspect.
async fn fetch_headers(client: &reqwest::Client, target: &Target) -> Result<HeaderMap, String> {
    let url = target.url().as_str();
    match client.get(url).send().await.and_then(|r| r.error_for_status()) {
        Ok(response) => {
            info!(status = %response.status(), "Received HTTP response.");
            Ok(response.headers().clone())
        }
        Err(e) => {
            error!(url = %url, error = %e, "HTTP request failed.");
            Err(format!("HTTP request failed: {}", e))
        }
    }
}

/// Reports the security headers the scorer cares about, plus X-Content-Type-Options.
pub async fn run_headers_scan(client: &reqwest::Client, target: &Target) -> ProbeOutcome<HeadersData> {
    info!(url = %target.url(), "Starting headers scan.");
    let result = fetch_headers(client, target).await.map(|headers| HeadersData {
        content_security_policy: check_header(&headers, "content-security-policy"),
        x_frame_options: check_header(&headers, "x-frame-options"),
        strict_transport_security: check_header(&headers, "strict-transport-security"),
        x_content_type_options: check_header(&headers, "x-content-type-options"),
    });
    if let Ok(data) = &result {
        let missing = [
            &data.content_security_policy,
            &data.x_frame_options,
            &data.strict_transport_security,
            &data.x_content_type_options,
        ]
        .iter()
        .filter(|h| h.is_missing())
        .count();
        info!(missing, "Headers scan finished.");
    }
    result.into()
}

/// Reports the Content-Security-Policy on its own, with the raw policy.
pub async fn run_csp_scan(client: &reqwest::Client, target: &Target) -> ProbeOutcome<CspData> {
    info!(url = %target.url(), "Starting CSP scan.");
    let result = fetch_headers(client, target).await.map(|headers| {
        match check_header(&headers, "content-security-policy") {
            HeaderValue::Present(policy) => CspData { csp_status: CspStatus::Present, csp_details: policy },
            HeaderValue::Missing => CspData {
                csp_status: CspStatus::Missing,
                csp_details: "Content Security Policy is not set.".to_string(),
            },
        }
    });
    debug!(present = result.as_ref().is_ok_and(|d| d.csp_status == CspStatus::Present), "CSP scan finished.");
    result.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue as RawValue;

    #[test]
    fn test_check_header_present_and_missing() {
        let mut headers = HeaderMap::new();
        headers.insert("x-frame-options", RawValue::from_static("DENY"));
        assert_eq!(check_header(&headers, "x-frame-options"), HeaderValue::Present("DENY".to_string()));
        assert_eq!(check_header(&headers, "strict-transport-security"), HeaderValue::Missing);
    }

    #[test]
    fn test_check_header_invalid_utf8_counts_as_present() {
        let mut headers = HeaderMap::new();
        headers.insert("content-security-policy", RawValue::from_bytes(b"default-src \xff").unwrap());
        assert_eq!(
            check_header(&headers, "content-security-policy"),
            HeaderValue::Present("[Invalid UTF-8]".to_string())
        );
    }
}

use std::time::Duration;

use sentinel_rs_scanner::config::ScanSettings;
use sentinel_rs_scanner::core::models::{CspStatus, DirectoryState, HeaderValue, ProbeOutcome};
use sentinel_rs_scanner::core::probe::{ProbeKind, ProbeResult, Prober};
use sentinel_rs_scanner::core::scanner::LiveProber;
use sentinel_rs_scanner::core::scanner::cookie_scanner::run_cookie_scan;
use sentinel_rs_scanner::core::scanner::directory_scanner::run_directory_scan;
use sentinel_rs_scanner::core::scanner::headers_scanner::{run_csp_scan, run_headers_scan};
use sentinel_rs_scanner::core::scanner::injection_scanner::{
    SQLI_PAYLOAD, XSS_PAYLOAD, run_sql_injection_scan, run_xss_scan,
};
use sentinel_rs_scanner::core::target::Target;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

fn client() -> reqwest::Client {
    reqwest::Client::builder().timeout(Duration::from_secs(5)).build().unwrap()
}

fn target_for(server: &MockServer) -> Target {
    Target::parse(&server.uri()).unwrap()
}

/// A loopback address nothing listens on.
async fn closed_target() -> Target {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    Target::parse(&format!("http://{}", addr)).unwrap()
}

#[tokio::test]
async fn test_xss_detected_when_payload_is_echoed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .and(query_param("q", XSS_PAYLOAD))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!("<p>You searched for {}</p>", XSS_PAYLOAD)))
        .mount(&mock_server)
        .await;

    let outcome = run_xss_scan(&client(), &target_for(&mock_server)).await;
    let data = outcome.success().unwrap();
    assert!(data.xss_vulnerable);
    assert_eq!(data.details, "XSS Found!");
}

#[tokio::test]
async fn test_xss_not_detected_when_payload_is_escaped() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("&lt;script&gt;alert(1)&lt;/script&gt;"))
        .mount(&mock_server)
        .await;

    let outcome = run_xss_scan(&client(), &target_for(&mock_server)).await;
    let data = outcome.success().unwrap();
    assert!(!data.xss_vulnerable);
    assert_eq!(data.details, "No XSS Vulnerability Detected");
}

#[tokio::test]
async fn test_sql_injection_flagged_on_error_text() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(query_param("q", SQLI_PAYLOAD))
        .respond_with(ResponseTemplate::new(200).set_body_string("You have an error in your SQL syntax"))
        .mount(&mock_server)
        .await;

    let outcome = run_sql_injection_scan(&client(), &target_for(&mock_server)).await;
    let data = outcome.success().unwrap();
    assert!(data.sql_injection_vulnerable);
    assert_eq!(data.details, "Potential SQL Injection Vulnerability Found!");
}

#[tokio::test]
async fn test_sql_injection_server_error_is_a_failed_check() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("You have an error in your SQL syntax"))
        .mount(&mock_server)
        .await;

    let outcome = run_sql_injection_scan(&client(), &target_for(&mock_server)).await;
    let message = outcome.error().unwrap();
    assert!(message.starts_with("HTTP request failed"), "{}", message);
}

/// A blocking firewall answers everything with 403; none of the page checks may judge that page.
#[tokio::test]
async fn test_forbidden_responses_give_error_payloads() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(403)
                .set_body_string(format!("<div class=\"error\">Forbidden {}</div>", XSS_PAYLOAD))
                .append_header("set-cookie", "waf=1; Path=/"),
        )
        .mount(&mock_server)
        .await;

    let client = client();
    let target = target_for(&mock_server);

    let headers = run_headers_scan(&client, &target).await;
    assert!(headers.error().unwrap().starts_with("HTTP request failed"));

    let csp = run_csp_scan(&client, &target).await;
    assert!(csp.error().is_some());

    let cookies = run_cookie_scan(&client, &target).await;
    assert!(cookies.error().is_some());

    let xss = run_xss_scan(&client, &target).await;
    assert!(xss.error().is_some());

    let sql = run_sql_injection_scan(&client, &target).await;
    assert!(sql.error().is_some());

    let value = serde_json::to_value(&headers).unwrap();
    assert!(value.get("contentSecurityPolicy").is_none());
}

#[tokio::test]
async fn test_headers_present_and_missing() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("X-Frame-Options", "SAMEORIGIN")
                .insert_header("Strict-Transport-Security", "max-age=63072000"),
        )
        .mount(&mock_server)
        .await;

    let outcome = run_headers_scan(&client(), &target_for(&mock_server)).await;
    let data = outcome.success().unwrap();
    assert_eq!(data.x_frame_options, HeaderValue::Present("SAMEORIGIN".to_string()));
    assert_eq!(data.strict_transport_security, HeaderValue::Present("max-age=63072000".to_string()));
    assert_eq!(data.content_security_policy, HeaderValue::Missing);
    assert_eq!(data.x_content_type_options, HeaderValue::Missing);

    let value = serde_json::to_value(data).unwrap();
    assert_eq!(value["contentSecurityPolicy"], serde_json::json!("Missing"));
}

#[tokio::test]
async fn test_csp_reported_with_policy() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).insert_header("Content-Security-Policy", "default-src 'self'"))
        .mount(&mock_server)
        .await;

    let outcome = run_csp_scan(&client(), &target_for(&mock_server)).await;
    let data = outcome.success().unwrap();
    assert_eq!(data.csp_status, CspStatus::Present);
    assert_eq!(data.csp_details, "default-src 'self'");
}

#[tokio::test]
async fn test_csp_missing_has_fixed_details() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET")).respond_with(ResponseTemplate::new(200)).mount(&mock_server).await;

    let outcome = run_csp_scan(&client(), &target_for(&mock_server)).await;
    let data = outcome.success().unwrap();
    assert_eq!(data.csp_status, CspStatus::Missing);
    assert_eq!(data.csp_details, "Content Security Policy is not set.");
}

#[tokio::test]
async fn test_cookie_flags_per_cookie() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .append_header("set-cookie", "session=abc; Secure; HttpOnly; SameSite=Strict")
                .append_header("set-cookie", "tracking=xyz; Path=/"),
        )
        .mount(&mock_server)
        .await;

    let outcome = run_cookie_scan(&client(), &target_for(&mock_server)).await;
    let cookies = &outcome.success().unwrap().cookies;
    assert_eq!(cookies.len(), 2);

    let session = cookies.iter().find(|c| c.cookie.starts_with("session=")).unwrap();
    assert!(session.flags.http_only && session.flags.secure && session.flags.same_site);

    let tracking = cookies.iter().find(|c| c.cookie.starts_with("tracking=")).unwrap();
    assert!(!tracking.flags.http_only && !tracking.flags.secure && !tracking.flags.same_site);
}

#[tokio::test]
async fn test_no_cookies_is_an_empty_list() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET")).respond_with(ResponseTemplate::new(200)).mount(&mock_server).await;

    let outcome = run_cookie_scan(&client(), &target_for(&mock_server)).await;
    let value = serde_json::to_value(&outcome).unwrap();
    assert_eq!(value, serde_json::json!({"cookies": []}));
}

#[tokio::test]
async fn test_only_paths_answering_200_are_exposed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/admin"))
        .respond_with(ResponseTemplate::new(200).set_body_string("admin panel"))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/.git"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&mock_server)
        .await;

    let results = run_directory_scan(&client(), &target_for(&mock_server)).await;
    let paths: Vec<&str> = results.iter().map(|r| r.path.as_str()).collect();
    assert_eq!(paths, vec!["/admin", "/config", "/backup", "/.git", "/.env"]);

    for result in &results {
        let expected = if result.path == "/admin" { DirectoryState::Exposed } else { DirectoryState::NotExposed };
        assert_eq!(result.status, expected, "{}", result.path);
    }
}

#[tokio::test]
async fn test_unreachable_host_gives_error_payloads() {
    let target = closed_target().await;
    let client = client();

    let xss = run_xss_scan(&client, &target).await;
    assert!(xss.error().unwrap().starts_with("HTTP request failed"));

    let headers = run_headers_scan(&client, &target).await;
    assert!(headers.error().is_some());

    let cookies = run_cookie_scan(&client, &target).await;
    assert!(matches!(cookies, ProbeOutcome::Failure(_)));

    let directories = run_directory_scan(&client, &target).await;
    assert!(directories.iter().all(|d| d.status == DirectoryState::NotExposed));
}

#[tokio::test]
async fn test_live_prober_dispatches_by_kind() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).insert_header("Content-Security-Policy", "default-src 'none'"))
        .mount(&mock_server)
        .await;

    let prober = LiveProber::new(ScanSettings::default()).unwrap();
    let target = target_for(&mock_server);

    let result = prober.run(ProbeKind::Csp, &target).await;
    assert_eq!(result.kind(), ProbeKind::Csp);
    let ProbeResult::Csp(outcome) = result else { panic!("expected a CSP result") };
    assert_eq!(outcome.success().unwrap().csp_status, CspStatus::Present);

    let result = prober.run(ProbeKind::Directories, &target).await;
    assert_eq!(result.kind(), ProbeKind::Directories);
    assert!(result.error().is_none());
}

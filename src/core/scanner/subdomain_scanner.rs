// src/core/scanner/subdomain_scanner.rs

use futures::future::join_all;
use hickory_resolver::TokioAsyncResolver;
use reqwest::StatusCode;
use tracing::{debug, info};

use crate::core::models::{SubdomainState, SubdomainStatus};
use crate::core::scanner::dns_scanner::resolves;
use crate::core::target::Target;

pub const COMMON_SUBDOMAINS: &[&str] = &["www", "admin", "mail", "dev", "test", "shop"];

/// Outcome of one HTTP attempt against a candidate.
enum Reach {
    Up,
    Answered,
    Failed,
}

/// Checks every common subdomain concurrently. Always resolves.
pub async fn run_subdomain_scan(
    resolver: &TokioAsyncResolver,
    client: &reqwest::Client,
    target: &Target,
) -> Vec<SubdomainStatus> {
    info!(host = target.host(), candidates = COMMON_SUBDOMAINS.len(), "Starting subdomain enumeration.");
    let results = join_all(
        COMMON_SUBDOMAINS
            .iter()
            .map(|prefix| check_subdomain(resolver, client, format!("{}.{}", prefix, target.host()))),
    )
    .await;
    let found = results.iter().filter(|r| r.status != SubdomainState::NotFound).count();
    info!(found, "Subdomain enumeration finished.");
    results
}

/// DNS first; if the name exists try HTTPS, then HTTP.
async fn check_subdomain(resolver: &TokioAsyncResolver, client: &reqwest::Client, subdomain: String) -> SubdomainStatus {
    if !resolves(resolver, &subdomain).await {
        debug!(subdomain = %subdomain, "Subdomain not found.");
        return SubdomainStatus { subdomain, status: SubdomainState::NotFound };
    }

    let https_url = format!("https://{}", subdomain);
    let http_url = format!("http://{}", subdomain);
    let status = reach_with_fallback(client, &https_url, &http_url).await;
    debug!(subdomain = %subdomain, status = ?status, "Subdomain checked.");
    SubdomainStatus { subdomain, status }
}

/// HTTPS first; only a failed HTTPS attempt falls back to HTTP.
async fn reach_with_fallback(client: &reqwest::Client, https_url: &str, http_url: &str) -> SubdomainState {
    match reach(client, https_url).await {
        Reach::Up => SubdomainState::UpHttps,
        Reach::Answered => SubdomainState::UnreachableHttps,
        Reach::Failed => match reach(client, http_url).await {
            Reach::Up => SubdomainState::UpHttp,
            Reach::Answered => SubdomainState::UnreachableHttp,
            Reach::Failed => SubdomainState::Unreachable,
        },
    }
}

/// 200 is up, any other status below 400 is answered, errors and 4xx/5xx fail.
async fn reach(client: &reqwest::Client, url: &str) -> Reach {
    match client.get(url).send().await {
        Ok(response) => classify(response.status()),
        Err(e) => {
            debug!(url, error = %e, "Subdomain request failed.");
            Reach::Failed
        }
    }
}

fn classify(status: StatusCode) -> Reach {
    if status == StatusCode::OK {
        Reach::Up
    } else if status.is_client_error() || status.is_server_error() {
        Reach::Failed
    } else {
        Reach::Answered
    }
}

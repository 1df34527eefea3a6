// src/core/scanner/directory_scanner.rs

use futures::future::join_all;
use reqwest::StatusCode;
use tracing::{debug, info, warn};

use crate::core::models::{DirectoryState, DirectoryStatus};
use crate::core::target::Target;

pub const COMMON_PATHS: &[&str] = &["/admin", "/config", "/backup", "/.git", "/.env"];

/// Requests every common path concurrently. Always resolves.
pub async fn run_directory_scan(client: &reqwest::Client, target: &Target) -> Vec<DirectoryStatus> {
    info!(url = %target.url(), paths = COMMON_PATHS.len(), "Starting directory scan.");
    let results = join_all(COMMON_PATHS.iter().map(|path| check_path(client, target, path))).await;
    let exposed = results.iter().filter(|r| r.status == DirectoryState::Exposed).count();
    if exposed > 0 {
        warn!(exposed, "Sensitive paths are exposed.");
    }
    info!(exposed, "Directory scan finished.");
    results
}

/// Exposed iff the path answers 200. Errors count as not exposed.
async fn check_path(client: &reqwest::Client, target: &Target, path: &str) -> DirectoryStatus {
    let url = target.join_path(path);
    let status = match client.get(&url).send().await {
        Ok(response) if response.status() == StatusCode::OK => DirectoryState::Exposed,
        Ok(response) => {
            debug!(url = %url, status = %response.status(), "Path not exposed.");
            DirectoryState::NotExposed
        }
        Err(e) => {
            debug!(url = %url, error = %e, "Path request failed.");
            DirectoryState::NotExposed
        }
    };
    DirectoryStatus { path: path.to_string(), status }
}

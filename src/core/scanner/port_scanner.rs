// src/core/scanner/port_scanner.rs

use std::time::Duration;

use futures::future::join_all;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::{debug, info, trace};

use crate::core::models::{PortState, PortStatus};
use crate::core::target::Target;

/// FTP, SSH, HTTP, HTTPS, HTTP-alt and MySQL.
pub const COMMON_PORTS: &[u16] = &[21, 22, 80, 443, 8080, 3306];

/// Probes every common port concurrently. Always resolves.
pub async fn run_port_scan(target: &Target, connect_timeout: Duration) -> Vec<PortStatus> {
    info!(host = target.host(), ports = COMMON_PORTS.len(), "Starting port scan.");
    let results = scan_ports(target.host(), COMMON_PORTS, connect_timeout).await;
    let open = results.iter().filter(|r| r.status == PortState::Open).count();
    info!(open, "Port scan finished.");
    results
}

/// Connect-scans `ports` concurrently; results keep the order of `ports`.
pub async fn scan_ports(host: &str, ports: &[u16], connect_timeout: Duration) -> Vec<PortStatus> {
    join_all(ports.iter().map(|&port| scan_port(host, port, connect_timeout))).await
}

async fn scan_port(host: &str, port: u16, connect_timeout: Duration) -> PortStatus {
    trace!(host, port, "TCP connect scan.");
    let status = match timeout(connect_timeout, TcpStream::connect((host, port))).await {
        Ok(Ok(_stream)) => {
            debug!(host, port, "Port is open.");
            PortState::Open
        }
        Ok(Err(e)) => {
            trace!(host, port, error = %e, "Port is closed.");
            PortState::Closed
        }
        Err(_) => {
            trace!(host, port, "Port timed out, reporting closed.");
            PortState::Closed
        }
    };
    PortStatus { port, status }
}

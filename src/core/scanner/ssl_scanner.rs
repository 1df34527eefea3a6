// src/core/scanner/ssl_scanner.rs

use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use chrono::{DateTime, Utc};
use native_tls::TlsConnector;
use tokio::task::spawn_blocking;
use tracing::{debug, error, info};
use x509_parser::prelude::*;

use crate::core::models::{CertificateInfo, ProbeOutcome, SslData, SslStatus};
use crate::core::target::Target;

/// Opens a TLS connection to the target and inspects the peer certificate.
///
/// The handshake accepts any certificate so that expired or mismatched ones can
/// still be inspected; validity is then judged from the certificate itself.
pub async fn run_ssl_scan(target: &Target, timeout: Duration) -> ProbeOutcome<SslData> {
    info!(host = target.host(), port = target.tls_port(), "Starting SSL/TLS scan.");
    let host = target.host().to_string();
    let port = target.tls_port();

    debug!("Spawning blocking task for TLS connection.");
    let handshake = spawn_blocking(move || perform_tls_scan(&host, port, timeout));
    let scan_result = match tokio::time::timeout(timeout.saturating_mul(2), handshake).await {
        Ok(joined) => joined.unwrap_or_else(|e| {
            error!(panic = %e, "Blocking SSL scan task panicked!");
            Err(format!("Task panicked: {}", e))
        }),
        Err(_) => {
            error!(timeout = ?timeout, "SSL scan timed out.");
            Err(format!("TLS connection timed out after {:?}", timeout))
        }
    };

    match &scan_result {
        Ok(data) => info!(status = ?data.ssl_status, "SSL/TLS scan finished."),
        Err(e) => info!(error = %e, "SSL/TLS scan finished with error."),
    }
    scan_result.into()
}

fn perform_tls_scan(host: &str, port: u16, timeout: Duration) -> Result<SslData, String> {
    debug!(host, port, "Performing TLS connection and handshake.");

    let connector = TlsConnector::builder()
        .danger_accept_invalid_certs(true)
        .danger_accept_invalid_hostnames(true)
        .build()
        .map_err(|e| {
            error!(error = %e, "Failed to create TlsConnector");
            format!("TlsConnector Error: {}", e)
        })?;

    let stream = connect_with_timeout(host, port, timeout).map_err(|e| {
        error!(error = %e, "TCP connection failed");
        format!("TCP Connection Error: {}", e)
    })?;
    stream
        .set_read_timeout(Some(timeout))
        .and_then(|_| stream.set_write_timeout(Some(timeout)))
        .map_err(|e| format!("TCP Connection Error: {}", e))?;

    debug!(host, "Performing TLS handshake.");
    let stream = connector.connect(host, stream).map_err(|e| {
        error!(error = %e, "TLS handshake failed");
        format!("TLS Handshake Error: {}", e)
    })?;

    let cert = match stream.peer_certificate() {
        Ok(Some(c)) => {
            debug!("Peer certificate found.");
            c
        }
        Ok(None) => {
            debug!("TLS connection successful, but no peer certificate provided.");
            return Ok(SslData::no_certificate());
        }
        Err(e) => {
            error!(error = %e, "Failed to retrieve peer certificate from stream");
            return Err(format!("Could not get peer certificate: {}", e));
        }
    };

    let cert_der = cert.to_der().map_err(|e| {
        error!(error = %e, "Failed to convert certificate to DER format");
        format!("Could not convert certificate to DER: {}", e)
    })?;

    let (_, x509) = parse_x509_certificate(&cert_der).map_err(|e| {
        error!(error = %e, "Failed to parse X.509 certificate");
        format!("X.509 Parse Error: {}", e)
    })?;

    info!(subject = %x509.subject(), issuer = %x509.issuer(), "Successfully parsed certificate.");

    let validity = x509.validity();
    let not_after = asn1_time_to_chrono_utc(&validity.not_after);
    let not_before = asn1_time_to_chrono_utc(&validity.not_before);
    let now = Utc::now();
    let days_until_expiry = not_after.signed_duration_since(now).num_days();

    let names = certificate_names(&x509);
    let ssl_status = certificate_status(not_before, not_after, now, &names, host);

    Ok(SslData {
        ssl_status,
        certificate: Some(CertificateInfo {
            ssl_valid_from: not_before,
            ssl_valid_to: not_after,
            ssl_subject: x509.subject().to_string(),
            ssl_issuer: x509.issuer().to_string(),
            days_until_expiry,
        }),
    })
}

/// `Valid` only while `now` is inside the validity window and one of `names` covers `host`.
fn certificate_status(
    not_before: DateTime<Utc>,
    not_after: DateTime<Utc>,
    now: DateTime<Utc>,
    names: &[String],
    host: &str,
) -> SslStatus {
    let in_window = now > not_before && now < not_after;
    let names_host = names.iter().any(|name| hostname_matches(name, host));
    debug!(in_window, names_host, "Certificate checks done.");
    if in_window && names_host { SslStatus::Valid } else { SslStatus::Invalid }
}

fn connect_with_timeout(host: &str, port: u16, timeout: Duration) -> std::io::Result<TcpStream> {
    let mut last_error = None;
    for addr in (host, port).to_socket_addrs()? {
        match TcpStream::connect_timeout(&addr, timeout) {
            Ok(stream) => return Ok(stream),
            Err(e) => {
                debug!(%addr, error = %e, "Connect attempt failed.");
                last_error = Some(e);
            }
        }
    }
    Err(last_error.unwrap_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::NotFound, "host resolved to no addresses")
    }))
}

/// DNS names from the SAN extension, or the subject CNs when there is none.
fn certificate_names(x509: &X509Certificate<'_>) -> Vec<String> {
    let mut names: Vec<String> = match x509.subject_alternative_name() {
        Ok(Some(san)) => san
            .value
            .general_names
            .iter()
            .filter_map(|name| match name {
                GeneralName::DNSName(dns) => Some(dns.to_string()),
                GeneralName::IPAddress(bytes) => ip_from_bytes(bytes),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    };
    if names.is_empty() {
        names = x509
            .subject()
            .iter_common_name()
            .filter_map(|cn| cn.as_str().ok().map(str::to_string))
            .collect();
    }
    names
}

fn ip_from_bytes(bytes: &[u8]) -> Option<String> {
    match bytes.len() {
        4 => <[u8; 4]>::try_from(bytes).ok().map(|b| std::net::Ipv4Addr::from(b).to_string()),
        16 => <[u8; 16]>::try_from(bytes).ok().map(|b| std::net::Ipv6Addr::from(b).to_string()),
        _ => None,
    }
}

/// Case-insensitive host match where a leading `*.` covers exactly one label.
fn hostname_matches(pattern: &str, host: &str) -> bool {
    let pattern = pattern.trim_end_matches('.').to_ascii_lowercase();
    let host = host.trim_end_matches('.').to_ascii_lowercase();
    match pattern.strip_prefix("*.") {
        Some(suffix) => host
            .split_once('.')
            .is_some_and(|(label, rest)| !label.is_empty() && rest == suffix),
        None => pattern == host,
    }
}

fn asn1_time_to_chrono_utc(time: &ASN1Time) -> DateTime<Utc> {
    DateTime::from_timestamp(time.timestamp(), 0).unwrap_or_default()
}

// src/core/scanner/dns_scanner.rs

use std::time::Duration;

use futures::future::join_all;
use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use hickory_resolver::error::{ResolveError, ResolveErrorKind};
use hickory_resolver::proto::op::ResponseCode;
use hickory_resolver::proto::rr::RecordType;
use hickory_resolver::TokioAsyncResolver;
use tracing::{debug, info, warn};

use crate::core::models::{DnsData, DnsRecord};
use crate::core::target::Target;

/// Record types queried in place of a single ANY query, which most resolvers refuse.
const RECORD_TYPES: &[RecordType] = &[
    RecordType::A,
    RecordType::AAAA,
    RecordType::CNAME,
    RecordType::MX,
    RecordType::NS,
    RecordType::TXT,
    RecordType::SOA,
    RecordType::CAA,
];

/// Builds the resolver shared by the DNS based probes.
pub fn build_resolver(timeout: Duration) -> TokioAsyncResolver {
    let mut opts = ResolverOpts::default();
    opts.timeout = timeout;
    opts.attempts = 1;
    TokioAsyncResolver::tokio(ResolverConfig::default(), opts)
}

/// Collects every record published for the target host.
///
/// Never fails: when nothing could be fetched the error is carried as a note
/// next to an empty record list.
pub async fn run_dns_scan(resolver: &TokioAsyncResolver, target: &Target) -> DnsData {
    let host = target.host();
    info!(host, "Starting DNS scan.");

    let lookups = join_all(RECORD_TYPES.iter().map(|&record_type| lookup_records(resolver, host, record_type))).await;

    let mut dns_records: Vec<DnsRecord> = Vec::new();
    let mut first_error: Option<String> = None;
    for lookup in lookups {
        match lookup {
            Ok(records) => {
                for record in records {
                    if !dns_records.contains(&record) {
                        dns_records.push(record);
                    }
                }
            }
            Err(e) => {
                first_error.get_or_insert(e);
            }
        }
    }

    let error = match (dns_records.is_empty(), first_error) {
        (true, Some(e)) => Some(format!("Error fetching DNS records: {}", e)),
        _ => None,
    };
    info!(count = dns_records.len(), failed = error.is_some(), "DNS scan finished.");
    DnsData { dns_records, error }
}

/// Looks up one record type. An empty answer is not an error, NXDOMAIN is.
async fn lookup_records(
    resolver: &TokioAsyncResolver,
    host: &str,
    record_type: RecordType,
) -> Result<Vec<DnsRecord>, String> {
    debug!(host, record_type = %record_type, "Looking up records.");
    match resolver.lookup(host, record_type).await {
        Ok(lookup) => {
            let records: Vec<DnsRecord> = lookup
                .iter()
                .map(|rdata| DnsRecord {
                    record_type: rdata.record_type().to_string(),
                    value: rdata.to_string(),
                })
                .collect();
            debug!(record_type = %record_type, count = records.len(), "Records found.");
            Ok(records)
        }
        Err(e) if is_no_records(&e) => {
            debug!(record_type = %record_type, "No records of this type.");
            Ok(Vec::new())
        }
        Err(e) => {
            warn!(host, record_type = %record_type, error = %e, "DNS lookup failed.");
            Err(e.to_string())
        }
    }
}

fn is_no_records(error: &ResolveError) -> bool {
    matches!(
        error.kind(),
        ResolveErrorKind::NoRecordsFound { response_code, .. } if *response_code != ResponseCode::NXDomain
    )
}

/// True when `name` resolves to at least one address.
pub async fn resolves(resolver: &TokioAsyncResolver, name: &str) -> bool {
    match resolver.lookup_ip(name).await {
        Ok(lookup) => lookup.iter().next().is_some(),
        Err(e) => {
            debug!(name, error = %e, "Address lookup failed.");
            false
        }
    }
}

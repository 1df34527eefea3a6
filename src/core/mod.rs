// src/core/mod.rs

// Everything that decides what a scan does lives under `core`; the transport
// and the binary only move events around.

/// Errors that abort a whole scan.
pub mod error;

/// The messages a scan emits, in the shape clients receive them.
pub mod events;

/// Human-readable descriptions and remediation advice for every finding the
/// scorer can report.
pub mod knowledge_base;

/// Data structures for every probe result and for the full `ScanReport`.
pub mod models;

/// Runs the probes in order and turns their results into events.
pub mod orchestrator;

/// The `ProbeKind` enumeration and the `Prober` seam.
pub mod probe;

/// Per-scan completion tracking.
pub mod progress;

/// The live probes: TLS, HTTP, TCP and DNS.
pub mod scanner;

/// Turns a report into a score and a list of deductions.
pub mod scorer;

/// Validated scan targets.
pub mod target;

#[cfg(test)]
pub(crate) mod testing;

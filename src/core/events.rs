// src/core/events.rs

use serde::Serialize;

use crate::core::models::ScanReport;
use crate::core::probe::{ProbeKind, ProbeResult};
use crate::core::progress::ProgressMap;
use crate::core::scorer::{Deduction, ScoreCard, ScoreRating};

/// Emitted once per completed probe.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressEvent {
    #[serde(rename = "final")]
    pub is_final: bool,
    pub progress_map: ProgressMap,
    pub step: ProbeKind,
    pub completed: bool,
    pub result: ProbeResult,
}

/// Emitted once, after the last probe, with the whole report and its score.
#[derive(Debug, Clone, Serialize)]
pub struct FinalEvent {
    #[serde(rename = "final")]
    pub is_final: bool,
    pub results: ScanReport,
    pub score: String,
    pub rating: ScoreRating,
    /// Verdict sentence shown next to the score.
    pub message: &'static str,
    pub deductions: Vec<Deduction>,
}

/// Emitted instead of any other event when the scan cannot start.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorEvent {
    pub error: String,
}

/// Everything a scan reports to the outside, in the shape clients receive it.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ScanEvent {
    Progress(ProgressEvent),
    Final(FinalEvent),
    Error(ErrorEvent),
}

impl ScanEvent {
    pub fn progress(progress_map: &ProgressMap, step: ProbeKind, result: ProbeResult) -> Self {
        ScanEvent::Progress(ProgressEvent {
            is_final: false,
            progress_map: progress_map.clone(),
            step,
            completed: progress_map.is_completed(step),
            result,
        })
    }

    pub fn finished(results: ScanReport, card: &ScoreCard) -> Self {
        ScanEvent::Final(FinalEvent {
            is_final: true,
            results,
            score: card.to_string(),
            rating: card.rating,
            message: card.rating.message(),
            deductions: card.deductions.clone(),
        })
    }

    pub fn error(message: impl Into<String>) -> Self {
        ScanEvent::Error(ErrorEvent { error: message.into() })
    }

    pub fn is_final(&self) -> bool {
        matches!(self, ScanEvent::Final(_))
    }

    /// True for the events after which nothing else is sent.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ScanEvent::Final(_) | ScanEvent::Error(_))
    }
}

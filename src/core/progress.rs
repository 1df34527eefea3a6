// src/core/progress.rs

use serde::ser::{Serialize, SerializeMap, Serializer};
use strum::{EnumCount, IntoEnumIterator};
use tracing::warn;

use crate::core::probe::ProbeKind;

/// Per-scan completion flags, one per probe.
///
/// Starts all false. Entries only ever flip to true, and only in probe order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressMap {
    completed: [bool; ProbeKind::COUNT],
}

impl ProgressMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `kind` as completed.
    ///
    /// Returns false, leaving the map untouched, if `kind` was already completed
    /// or if an earlier probe is still pending.
    pub fn complete(&mut self, kind: ProbeKind) -> bool {
        let index = kind.index();
        if self.completed[index] || self.completed[..index].iter().any(|done| !done) {
            warn!(step = %kind, "Rejected out-of-order progress update.");
            return false;
        }
        self.completed[index] = true;
        true
    }

    pub fn is_completed(&self, kind: ProbeKind) -> bool {
        self.completed[kind.index()]
    }

    pub fn completed_count(&self) -> usize {
        self.completed.iter().filter(|done| **done).count()
    }
}

impl Serialize for ProgressMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(ProbeKind::COUNT))?;
        for kind in ProbeKind::iter() {
            map.serialize_entry(kind.progress_key(), &self.is_completed(kind))?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_map_is_all_false() {
        let map = ProgressMap::new();
        assert_eq!(map.completed_count(), 0);
        assert!(ProbeKind::iter().all(|k| !map.is_completed(k)));
    }

    #[test]
    fn test_entries_flip_in_order() {
        let mut map = ProgressMap::new();
        assert!(map.complete(ProbeKind::Ssl));
        assert!(map.complete(ProbeKind::Xss));
        assert!(!map.complete(ProbeKind::Cookies));
        assert!(!map.complete(ProbeKind::Ssl));
        assert_eq!(map.completed_count(), 2);
    }

    #[test]
    fn test_finished_after_all_probes() {
        let mut map = ProgressMap::new();
        for kind in ProbeKind::iter() {
            assert!(map.complete(kind));
        }
        assert_eq!(map.completed_count(), ProbeKind::COUNT);
    }

    #[test]
    fn test_serializes_as_ordered_object() {
        let mut map = ProgressMap::new();
        map.complete(ProbeKind::Ssl);
        let json = serde_json::to_string(&map).unwrap();
        assert!(json.starts_with(r#"{"sslCheck":true,"xssCheck":false,"securityHeadersCheck":false"#));
        assert!(json.ends_with(r#""cookieCheck":false}"#));
    }
}

//! Evidential ancestry (spec §3, §4.4).
//!
//! A `Stamp` is the bounded set of evidence IDs a task's truth value rests
//! on, plus its occurrence/creation time. Two tasks that share an evidence
//! ID cannot be revised together (it would double-count the same
//! observation) and a derivation whose stamp would contain a duplicate
//! evidence ID is a cyclic derivation — rejected silently, not an error
//! (spec §7).

use crate::error::StampError;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_EVIDENCE_ID: AtomicU64 = AtomicU64::new(1);

fn fresh_evidence_id() -> u64 {
    NEXT_EVIDENCE_ID.fetch_add(1, Ordering::Relaxed)
}

/// Logical timestamp — a tick count from the kernel's own clock, not wall
/// time (see `time::Clock`).
pub type Instant = i64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stamp {
    evidence: Vec<u64>,
    occurrence_time: Instant,
    creation_time: Instant,
    max_length: usize,
}

impl Stamp {
    /// A fresh external input gets a new unique evidence ID (spec §4.4).
    pub fn new_input(occurrence_time: Instant, creation_time: Instant, max_length: usize) -> Self {
        Stamp { evidence: vec![fresh_evidence_id()], occurrence_time, creation_time, max_length }
    }

    /// Rebuild a stamp from previously-minted evidence ids (e.g. loading a
    /// snapshot) instead of minting fresh ones, so revision/cyclicity
    /// behave identically to before the save (spec §8 round-trip law).
    pub fn from_evidence(evidence: Vec<u64>, occurrence_time: Instant, creation_time: Instant, max_length: usize) -> Self {
        Stamp { evidence, occurrence_time, creation_time, max_length }
    }

    pub fn evidence(&self) -> &[u64] {
        &self.evidence
    }

    pub fn occurrence_time(&self) -> Instant {
        self.occurrence_time
    }

    pub fn creation_time(&self) -> Instant {
        self.creation_time
    }

    pub fn len(&self) -> usize {
        self.evidence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.evidence.is_empty()
    }

    /// True iff this stamp and `other` share any evidence ID.
    pub fn overlaps(&self, other: &Stamp) -> bool {
        self.evidence.iter().any(|id| other.evidence.contains(id))
    }

    pub fn is_disjoint(&self, other: &Stamp) -> bool {
        !self.overlaps(other)
    }

    /// True iff unioning with `other` would reintroduce a duplicate
    /// evidence ID — the cyclic-derivation guard (spec §4.4, invariant 5).
    pub fn is_cyclic(premises: &[&Stamp]) -> bool {
        let mut seen = std::collections::HashSet::new();
        for stamp in premises {
            for id in &stamp.evidence {
                if !seen.insert(*id) {
                    return true;
                }
            }
        }
        false
    }

    /// Union of evidence IDs, newest-first, truncated to `max_length` by
    /// dropping the oldest (spec §4.4). Creation time is the max (latest)
    /// of the two; occurrence time likewise.
    pub fn merge(&self, other: &Stamp) -> Result<Stamp, StampError> {
        let mut merged: Vec<u64> = self.evidence.iter().chain(other.evidence.iter()).copied().collect();
        merged.dedup();
        let max_length = self.max_length.min(other.max_length);
        if merged.len() > max_length {
            let excess = merged.len() - max_length;
            merged.drain(0..excess);
        }
        Ok(Stamp {
            evidence: merged,
            occurrence_time: self.occurrence_time.max(other.occurrence_time),
            creation_time: self.creation_time.max(other.creation_time),
            max_length,
        })
    }

    pub fn derive_from(a: &Stamp, b: &Stamp) -> Result<Stamp, StampError> {
        if Stamp::is_cyclic(&[a, b]) {
            return Err(StampError::NotDisjoint);
        }
        a.merge(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stamp_with(ids: &[u64]) -> Stamp {
        Stamp { evidence: ids.to_vec(), occurrence_time: 0, creation_time: 0, max_length: 8 }
    }

    #[test]
    fn fresh_inputs_get_unique_ids() {
        let a = Stamp::new_input(0, 0, 8);
        let b = Stamp::new_input(0, 0, 8);
        assert_ne!(a.evidence()[0], b.evidence()[0]);
    }

    #[test]
    fn disjoint_stamps_merge_cleanly() {
        let a = stamp_with(&[1, 2]);
        let b = stamp_with(&[3, 4]);
        assert!(a.is_disjoint(&b));
        let merged = a.merge(&b).unwrap();
        assert_eq!(merged.evidence(), &[1, 2, 3, 4]);
    }

    #[test]
    fn overlapping_stamps_are_cyclic() {
        let a = stamp_with(&[1, 2]);
        let b = stamp_with(&[2, 3]);
        assert!(a.overlaps(&b));
        assert!(Stamp::is_cyclic(&[&a, &b]));
        assert!(Stamp::derive_from(&a, &b).is_err());
    }

    #[test]
    fn merge_truncates_to_max_length() {
        let a = stamp_with(&[1, 2, 3]);
        let mut b = stamp_with(&[4, 5, 6]);
        b.max_length = 4;
        let merged = a.merge(&b).unwrap();
        assert_eq!(merged.len(), 4);
        assert_eq!(merged.evidence(), &[3, 4, 5, 6]);
    }
}

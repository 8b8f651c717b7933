//! Snapshot persistence, gated behind the `serde` feature (spec §6).
//!
//! A snapshot captures every concept's tables as flat, canonical-string
//! term data plus its truth/budget/stamp fields — not the live `Arc`-backed
//! `Term`/`Concept` graph, which can't derive `Serialize` without breaking
//! the interning discipline (spec §4.1). Restoring re-parses each term
//! string back through a fresh `TermStore` and replays every task through
//! `Memory::input`, relying on the same revision/choice dedup every live
//! insert goes through.

use crate::config::NarConfig;
use crate::error::PersistError;
use crate::event::EventBus;
use crate::memory::Memory;
use crate::parser;
use crate::stamp::Stamp;
use crate::task::{Punctuation, Task, TaskBuilder, Tense};
use crate::term::TermStore;
use crate::time::Clock;
use crate::truth::Truth;
use serde::{Deserialize, Serialize};

const SNAPSHOT_VERSION: &str = "1.0.0";

#[derive(Debug, Serialize, Deserialize)]
struct TaskSnapshot {
    term: String,
    punctuation: char,
    frequency: Option<f32>,
    confidence: Option<f32>,
    priority: f32,
    durability: f32,
    quality: f32,
    evidence: Vec<u64>,
    occurrence_time: i64,
    creation_time: i64,
}

#[derive(Debug, Serialize, Deserialize)]
struct ConceptSnapshot {
    activation: f32,
    beliefs: Vec<TaskSnapshot>,
    goals: Vec<TaskSnapshot>,
    questions: Vec<TaskSnapshot>,
    quests: Vec<TaskSnapshot>,
}

/// A complete, serializable snapshot of a reasoner's memory at one cycle.
#[derive(Debug, Serialize, Deserialize)]
pub struct Snapshot {
    version: String,
    cycle: u64,
    concepts: Vec<ConceptSnapshot>,
}

fn to_task_snapshot(task: &Task) -> TaskSnapshot {
    let punctuation = match task.punctuation() {
        Punctuation::Belief => '.',
        Punctuation::Goal => '!',
        Punctuation::Question => '?',
        Punctuation::Quest => '@',
        Punctuation::Command => ';',
    };
    TaskSnapshot {
        term: task.term().to_string(),
        punctuation,
        frequency: task.truth().map(Truth::frequency),
        confidence: task.truth().map(Truth::confidence),
        priority: task.budget().priority(),
        durability: task.budget().durability(),
        quality: task.budget().quality(),
        evidence: task.stamp().evidence().to_vec(),
        occurrence_time: task.stamp().occurrence_time(),
        creation_time: task.stamp().creation_time(),
    }
}

/// Build a snapshot of `memory` at the given cycle count (spec §6 "save
/// snapshot").
pub fn snapshot(memory: &Memory, cycle: u64) -> Snapshot {
    let concepts = memory
        .iter_concepts()
        .map(|(_, concept)| ConceptSnapshot {
            activation: concept.activation(),
            beliefs: concept.beliefs().tasks().into_iter().map(to_task_snapshot).collect(),
            goals: concept.goals().tasks().into_iter().map(to_task_snapshot).collect(),
            questions: concept.questions().tasks().into_iter().map(to_task_snapshot).collect(),
            quests: concept.quests().tasks().into_iter().map(to_task_snapshot).collect(),
        })
        .collect();
    Snapshot { version: SNAPSHOT_VERSION.to_string(), cycle, concepts }
}

pub fn to_json(snapshot: &Snapshot) -> Result<String, PersistError> {
    serde_json::to_string(snapshot).map_err(|e| PersistError::Corrupted(e.to_string()))
}

pub fn from_json(json: &str) -> Result<Snapshot, PersistError> {
    let snapshot: Snapshot =
        serde_json::from_str(json).map_err(|e| PersistError::Corrupted(e.to_string()))?;
    if snapshot.version != SNAPSHOT_VERSION {
        return Err(PersistError::VersionMismatch {
            expected: SNAPSHOT_VERSION,
            found: snapshot.version,
        });
    }
    Ok(snapshot)
}

fn rebuild_task(store: &mut TermStore, snap: &TaskSnapshot, stamp_max_length: usize) -> Option<Task> {
    let with_punctuation = format!("{}{}", snap.term, snap.punctuation);
    let task = parser::parse_task(store, &with_punctuation, &Clock::new(), stamp_max_length).ok()?;
    let punctuation = task.punctuation();
    let tense = Tense::Eternal;
    let truth = match (snap.frequency, snap.confidence) {
        (Some(f), Some(c)) => Some(Truth::new(f, c)),
        _ => None,
    };
    let stamp = Stamp::from_evidence(
        snap.evidence.clone(),
        snap.occurrence_time,
        snap.creation_time,
        stamp_max_length.max(snap.evidence.len()),
    );
    let budget = crate::budget::Budget::new(snap.priority, snap.durability, snap.quality);

    let mut builder = TaskBuilder::new().term(task.term().clone()).punctuation(punctuation).tense(tense).budget(budget).stamp(stamp);
    if let Some(truth) = truth {
        builder = builder.truth(truth);
    }
    builder.build().ok()
}

/// Rebuild a fresh `Memory` from a validated snapshot, replaying every
/// task through `Memory::input` so the same revision/choice dedup policy
/// a live reasoner uses also governs restoration (spec §6 "load
/// snapshot"). Returns the memory plus the cycle count it was saved at.
pub fn restore(store: &mut TermStore, config: &NarConfig, snapshot: &Snapshot) -> (Memory, u64) {
    let mut memory = Memory::new(config);
    let mut bus = EventBus::new();
    for concept in &snapshot.concepts {
        for snap in concept
            .beliefs
            .iter()
            .chain(concept.goals.iter())
            .chain(concept.questions.iter())
            .chain(concept.quests.iter())
        {
            if let Some(task) = rebuild_task(store, snap, config.stamp_max_length) {
                memory.input(task, config.truth_k, &mut bus, snapshot.cycle);
            }
        }
    }
    (memory, snapshot.cycle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventBus as Bus;
    use crate::task::{Punctuation as P, TaskBuilder as TB};

    fn belief(store: &mut TermStore, name: &str) -> Task {
        let term = store.intern_atomic(name).unwrap();
        TB::new()
            .term(term)
            .punctuation(P::Belief)
            .tense(Tense::Eternal)
            .truth(Truth::new(0.9, 0.8))
            .stamp(Stamp::new_input(0, 0, 8))
            .build()
            .unwrap()
    }

    #[test]
    fn round_trips_through_json() {
        let mut store = TermStore::new();
        let config = NarConfig::default();
        let mut memory = Memory::new(&config);
        let mut bus = Bus::new();
        let task = belief(&mut store, "cat");
        memory.input(task, 1.0, &mut bus, 0);

        let snap = snapshot(&memory, 3);
        let json = to_json(&snap).unwrap();
        let reloaded = from_json(&json).unwrap();
        assert_eq!(reloaded.cycle, 3);

        let mut store2 = TermStore::new();
        let (restored, cycle) = restore(&mut store2, &config, &reloaded);
        assert_eq!(cycle, 3);
        assert_eq!(restored.len(), memory.len());
    }

    #[test]
    fn version_mismatch_is_rejected() {
        let bad = r#"{"version":"0.0.1","cycle":0,"concepts":[]}"#;
        assert!(matches!(from_json(bad), Err(PersistError::VersionMismatch { .. })));
    }
}

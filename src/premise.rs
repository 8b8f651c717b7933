//! Stream of premise pairs sampled from memory (spec §3 PremiseSource,
//! §4.11).
//!
//! Grounded on the teacher's `nal::deriver::Premise`/`Deriver` shape (never
//! wired into the teacher's `lib.rs`): a pull-based `next()` replaces the
//! teacher's unused async-generator sketch, matching spec §9's "async
//! generator premise stream... replace with a pull-based iterator plus a
//! cancellation token."

use crate::memory::Memory;
use crate::task::Task;
use rand::Rng;

/// Per-cycle co-premise sampling strategy (spec §4.11).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Another task/belief in the same concept.
    TaskMatch,
    /// A subterm of the primary extracted as a synthesized co-premise.
    Decomposition,
    /// A belief in a neighboring concept reached via a term link.
    TermLink,
}

impl Strategy {
    /// Relative selection weight (spec §4.11 "each strategy has a priority
    /// weight; one is selected probabilistically per cycle").
    fn weight(self) -> f32 {
        match self {
            Strategy::TaskMatch => 0.5,
            Strategy::Decomposition => 0.2,
            Strategy::TermLink => 0.3,
        }
    }

    fn pick(rng: &mut impl Rng) -> Strategy {
        let all = [Strategy::TaskMatch, Strategy::Decomposition, Strategy::TermLink];
        let total: f32 = all.iter().map(|s| s.weight()).sum();
        let mut roll = rng.gen_range(0.0..total);
        for s in all {
            if roll < s.weight() {
                return s;
            }
            roll -= s.weight();
        }
        Strategy::TaskMatch
    }
}

/// A pull-based, cancellable source of `(primary, secondary)` premise
/// pairs. One pair is produced per call to [`PremiseSource::next`]; the
/// caller (`ReasoningCycle`) decides when to pull (spec §4.11, §5
/// "Suspension points").
pub struct PremiseSource {
    cancelled: bool,
}

impl PremiseSource {
    pub fn new() -> Self {
        PremiseSource { cancelled: false }
    }

    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Default source (spec §4.11): samples a concept by priority from the
    /// focus set, draws its highest-priority task as primary, then asks
    /// the active strategy for a co-premise. Returns `None` when the
    /// source is empty (suspension point) or cancelled.
    pub fn next(&mut self, memory: &mut Memory) -> Option<(Task, Task, Strategy)> {
        if self.cancelled {
            return None;
        }
        let term = memory.sample_concept_term()?;
        let primary = {
            let concept = memory.concept_of_mut(&term)?;
            let belief = concept.sample_belief().cloned();
            let chosen = match belief {
                Some(b) => Some(b),
                None => concept.sample_goal().cloned(),
            };
            match chosen {
                Some(t) => t,
                None => concept.questions().highest_priority().cloned()?,
            }
        };

        let strategy = Strategy::pick(&mut rand::thread_rng());
        let secondary = match strategy {
            Strategy::TaskMatch => memory.concept_of_mut(&term).and_then(|c| c.sample_belief().cloned()),
            Strategy::Decomposition => Some(primary.clone()),
            Strategy::TermLink => {
                // A concept with no term links (e.g. a bare atom) yields
                // no neighbor at all — that's a normal "this strategy
                // found nothing" outcome, not a reason to abandon the
                // whole premise pair; `None` here falls through to
                // `primary_fallback` below.
                let neighbor = memory
                    .concept_of_mut(&term)
                    .and_then(|c| c.sample_term_link())
                    .map(|l| l.term.clone());
                neighbor.and_then(|neighbor| {
                    // One hop usually lands on a shared-subterm hub concept
                    // (e.g. an atom) with no belief of its own; hop again
                    // through its term links to reach an actual sibling
                    // statement (spec §3 Concept: "other concepts reachable
                    // via subterm or enclosing-compound relations").
                    match memory.concept_of_mut(&neighbor).and_then(|c| c.sample_belief().cloned()) {
                        Some(belief) => Some(belief),
                        None => {
                            let far = memory
                                .concept_of_mut(&neighbor)
                                .and_then(|c| c.sample_term_link())
                                .map(|l| l.term.clone())
                                .filter(|t| t != &term);
                            far.and_then(|far| memory.concept_of_mut(&far).and_then(|c| c.sample_belief().cloned()))
                        }
                    }
                })
            }
        };

        let secondary = secondary.unwrap_or_else(|| primary_fallback(&primary));
        Some((primary, secondary, strategy))
    }
}

/// When no co-premise is available, pair the primary with itself —
/// harmless for unary rules (decomposition/conversion/contraposition),
/// which ignore the secondary slot entirely.
fn primary_fallback(primary: &Task) -> Task {
    primary.clone()
}

impl Default for PremiseSource {
    fn default() -> Self {
        PremiseSource::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NarConfig;
    use crate::event::EventBus;
    use crate::stamp::Stamp;
    use crate::task::{Punctuation, TaskBuilder, Tense};
    use crate::term::TermStore;
    use crate::truth::Truth;

    #[test]
    fn next_returns_none_on_empty_memory() {
        let config = NarConfig::default();
        let mut memory = Memory::new(&config);
        let mut source = PremiseSource::new();
        assert!(source.next(&mut memory).is_none());
    }

    #[test]
    fn next_returns_a_pair_after_input() {
        let mut store = TermStore::new();
        let config = NarConfig::default();
        let mut memory = Memory::new(&config);
        let mut bus = EventBus::new();
        let cat = store.intern_atomic("cat").unwrap();
        let task = TaskBuilder::new()
            .term(cat)
            .punctuation(Punctuation::Belief)
            .tense(Tense::Eternal)
            .truth(Truth::new(0.9, 0.8))
            .stamp(Stamp::new_input(0, 0, 8))
            .build()
            .unwrap();
        memory.input(task, 1.0, &mut bus, 0);

        let mut source = PremiseSource::new();
        assert!(source.next(&mut memory).is_some());
    }

    #[test]
    fn cancellation_stops_the_source() {
        let mut source = PremiseSource::new();
        source.cancel();
        let config = NarConfig::default();
        let mut memory = Memory::new(&config);
        assert!(source.next(&mut memory).is_none());
    }
}

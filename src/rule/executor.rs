//! Traverses the compiled discrimination tree, unifies survivors, and
//! emits derived tasks (spec §4.10).
//!
//! Per spec §7, a panic inside a rule's conclusion function is a
//! `RuleExecutionFault`: caught, published as `error.raised`, and that
//! rule's contribution is dropped without aborting the cycle.

use super::{DiscriminationTree, Rule};
use crate::budget::Budget;
use crate::event::{Event, EventBus, EventKind};
use crate::stamp::{Instant, Stamp};
use crate::task::{Punctuation, Task, TaskBuilder, Tense};
use crate::term::TermStore;
use crate::unify::{unify, Substitution};
use std::panic::{self, AssertUnwindSafe};

/// Everything a rule's conclusion function needs besides the substitution
/// and the two premise terms/truths — bundled so `execute`'s signature
/// doesn't grow every time a new ambient dependency shows up.
pub struct DerivationContext<'a> {
    pub store: &'a mut TermStore,
    pub truth_k: f32,
    pub stamp_max_length: usize,
    pub time: Instant,
    pub max_commutative_permutations: usize,
}

/// Run every rule the discrimination tree surfaces for `(primary,
/// secondary)` against both premises, collecting all derived tasks (spec
/// §4.10 steps 1-5). Patterns are assignment-sensitive (`pattern.p` vs.
/// `pattern.s`) but which sampled task is "primary" is arbitrary, so both
/// orientations are tried; when primary and secondary are the same task
/// (the unary-rule fallback) the second pass is skipped to avoid
/// double-deriving.
pub fn execute(
    rules: &[Rule],
    tree: &DiscriminationTree,
    primary: &Task,
    secondary: &Task,
    ctx: &mut DerivationContext,
    bus: &mut EventBus,
    cycle: u64,
) -> Vec<Task> {
    let mut derived = run_oriented(rules, tree, primary, secondary, ctx, bus, cycle);
    if secondary.term() != primary.term() || secondary.stamp().evidence() != primary.stamp().evidence() {
        derived.extend(run_oriented(rules, tree, secondary, primary, ctx, bus, cycle));
    }
    derived
}

fn run_oriented(
    rules: &[Rule],
    tree: &DiscriminationTree,
    primary: &Task,
    secondary: &Task,
    ctx: &mut DerivationContext,
    bus: &mut EventBus,
    cycle: u64,
) -> Vec<Task> {
    let candidates = tree.candidates(primary.term(), secondary.term());
    let mut derived = Vec::new();

    for idx in candidates {
        let rule = &rules[idx];

        let sub = match unify(&rule.pattern.p, primary.term(), &Substitution::new(), ctx.max_commutative_permutations) {
            Ok(s) => s,
            Err(_) => continue,
        };
        let sub = match unify(&rule.pattern.s, secondary.term(), &sub, ctx.max_commutative_permutations) {
            Ok(s) => s,
            Err(_) => continue,
        };

        // CyclicDerivation: silent rejection per spec §7, no event.
        if Stamp::is_cyclic(&[primary.stamp(), secondary.stamp()]) {
            continue;
        }
        let Ok(stamp) = primary.stamp().merge(secondary.stamp()) else { continue };

        let rule_ptr = rule.conclusion;
        let (pattern_p, pattern_s) = (primary.term().clone(), secondary.term().clone());
        let (pt, st) = (primary.truth().copied(), secondary.truth().copied());
        let truth_k = ctx.truth_k;
        let store = &mut *ctx.store;
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            rule_ptr(&sub, &pattern_p, &pattern_s, pt.as_ref(), st.as_ref(), store, truth_k)
        }));

        let conclusions = match outcome {
            Ok(c) => c,
            Err(_) => {
                bus.publish(
                    Event::new(EventKind::ErrorRaised, primary.term(), cycle)
                        .with_message(format!("rule '{}' panicked during conclusion", rule.id)),
                );
                continue;
            }
        };

        for (term, truth) in conclusions {
            let budget = Budget::derive(primary.budget(), secondary.budget(), rule.base_priority, term.complexity());
            let task = TaskBuilder::new()
                .term(term)
                .punctuation(Punctuation::Belief)
                .tense(Tense::Eternal)
                .truth(truth)
                .budget(budget)
                .stamp(stamp.clone())
                .build();
            if let Ok(task) = task {
                bus.publish(
                    Event::new(EventKind::Derivation, task.term(), cycle)
                        .with_truth(truth)
                        .with_budget(budget)
                        .with_stamp(task.stamp())
                        .with_message(rule.id),
                );
                derived.push(task);
            }
        }
    }

    derived
}

//! The default NAL syllogistic rule set (spec §4.2's truth-function list,
//! §8 scenarios 1-2), expressed as `Rule`s over `TermStore`-interned
//! pattern terms.
//!
//! Every rule here is a thin wrapper around one `Truth` function: the
//! pattern picks out which premise shape that function applies to, the
//! conclusion function looks up its own pattern variables' bindings and
//! builds the resulting term.

use super::{Pattern, Rule};
use crate::term::{Op, Term, TermStore};
use crate::truth::Truth;
use crate::unify::Substitution;

fn pvar(store: &mut TermStore, name: &str) -> Term {
    store.intern_variable(Op::VarPattern, name).unwrap()
}

/// Look up pattern variable `name`'s binding, falling back to the bare
/// variable itself if (for some reason) it never got bound.
fn binding(sub: &Substitution, store: &mut TermStore, name: &str) -> Term {
    let v = pvar(store, name);
    sub.get(&v).cloned().unwrap_or(v)
}

macro_rules! binary_conclusion {
    ($name:ident, $op:expr, $lhs:literal, $rhs:literal, $truth_fn:expr) => {
        fn $name(
            sub: &Substitution,
            _p: &Term,
            _s: &Term,
            pt: Option<&Truth>,
            st: Option<&Truth>,
            store: &mut TermStore,
            k: f32,
        ) -> Vec<(Term, Truth)> {
            let (Some(pt), Some(st)) = (pt, st) else { return Vec::new() };
            let Some(truth) = $truth_fn(pt, st, k) else { return Vec::new() };
            let lhs = binding(sub, store, $lhs);
            let rhs = binding(sub, store, $rhs);
            match store.intern_compound($op, vec![lhs, rhs], None) {
                Ok(term) => vec![(term, truth)],
                Err(_) => Vec::new(),
            }
        }
    };
}

binary_conclusion!(deduction_concl, Op::Inheritance, "S", "P", |a, b, _k: f32| Truth::deduction(a, b));
binary_conclusion!(abduction_concl, Op::Implication, "S", "P", |a, b, k| Truth::abduction(a, b, k));
binary_conclusion!(induction_concl, Op::Implication, "S", "P", |a, b, k| Truth::induction(a, b, k));
binary_conclusion!(comparison_concl, Op::Similarity, "S", "P", |a, b, k| Truth::comparison(a, b, k));
binary_conclusion!(analogy_concl, Op::Inheritance, "S", "P", |a, b, _k: f32| Truth::analogy(a, b));
binary_conclusion!(resemblance_concl, Op::Similarity, "S", "P", |a, b, k| Truth::resemblance(a, b, k));

fn detachment_concl(
    sub: &Substitution,
    _p: &Term,
    _s: &Term,
    pt: Option<&Truth>,
    st: Option<&Truth>,
    store: &mut TermStore,
    _k: f32,
) -> Vec<(Term, Truth)> {
    let (Some(pt), Some(st)) = (pt, st) else { return Vec::new() };
    let Some(truth) = Truth::deduction(pt, st) else { return Vec::new() };
    let consequent = binding(sub, store, "B");
    vec![(consequent, truth)]
}

fn decomposition_concl(
    sub: &Substitution,
    _p: &Term,
    _s: &Term,
    pt: Option<&Truth>,
    _st: Option<&Truth>,
    store: &mut TermStore,
    _k: f32,
) -> Vec<(Term, Truth)> {
    let Some(pt) = pt else { return Vec::new() };
    let Some(truth) = Truth::structural_deduction(pt) else { return Vec::new() };
    let a = binding(sub, store, "A");
    let b = binding(sub, store, "B");
    vec![(a, truth), (b, truth)]
}

fn contraposition_concl(
    sub: &Substitution,
    _p: &Term,
    _s: &Term,
    pt: Option<&Truth>,
    _st: Option<&Truth>,
    store: &mut TermStore,
    k: f32,
) -> Vec<(Term, Truth)> {
    let Some(pt) = pt else { return Vec::new() };
    let Some(truth) = Truth::contraposition(pt, k) else { return Vec::new() };
    let a = binding(sub, store, "A");
    let b = binding(sub, store, "B");
    let (Ok(neg_a), Ok(neg_b)) = (store.intern_compound(Op::Negation, vec![a], None), store.intern_compound(Op::Negation, vec![b], None)) else {
        return Vec::new();
    };
    match store.intern_compound(Op::Implication, vec![neg_b, neg_a], None) {
        Ok(term) => vec![(term, truth)],
        Err(_) => Vec::new(),
    }
}

fn conversion_concl(
    sub: &Substitution,
    _p: &Term,
    _s: &Term,
    pt: Option<&Truth>,
    _st: Option<&Truth>,
    store: &mut TermStore,
    k: f32,
) -> Vec<(Term, Truth)> {
    let Some(pt) = pt else { return Vec::new() };
    let Some(truth) = Truth::conversion(pt, k) else { return Vec::new() };
    let a = binding(sub, store, "A");
    let b = binding(sub, store, "B");
    match store.intern_compound(Op::Implication, vec![b, a], None) {
        Ok(term) => vec![(term, truth)],
        Err(_) => Vec::new(),
    }
}

/// The kernel's built-in syllogistic rule set: one rule per NAL truth
/// function in spec §4.2, patterned after the shared-term premise shapes
/// of classical NARS inference.
pub fn default_rules(store: &mut TermStore) -> Vec<Rule> {
    let m = pvar(store, "M");
    let p = pvar(store, "P");
    let s = pvar(store, "S");
    let a = pvar(store, "A");
    let b = pvar(store, "B");
    let wild = pvar(store, "_");

    let inh = |store: &mut TermStore, x: Term, y: Term| store.intern_compound(Op::Inheritance, vec![x, y], None).unwrap();
    let sim = |store: &mut TermStore, x: Term, y: Term| store.intern_compound(Op::Similarity, vec![x, y], None).unwrap();
    let imp = |store: &mut TermStore, x: Term, y: Term| store.intern_compound(Op::Implication, vec![x, y], None).unwrap();
    let conj = |store: &mut TermStore, x: Term, y: Term| store.intern_compound(Op::Conjunction, vec![x, y], None).unwrap();

    vec![
        Rule {
            id: "deduction",
            pattern: Pattern { p: inh(store, m.clone(), p.clone()), s: inh(store, s.clone(), m.clone()) },
            base_priority: 0.9,
            conclusion: deduction_concl,
        },
        Rule {
            id: "abduction",
            pattern: Pattern { p: inh(store, p.clone(), m.clone()), s: inh(store, s.clone(), m.clone()) },
            base_priority: 0.7,
            conclusion: abduction_concl,
        },
        Rule {
            id: "induction",
            pattern: Pattern { p: inh(store, m.clone(), p.clone()), s: inh(store, m.clone(), s.clone()) },
            base_priority: 0.7,
            conclusion: induction_concl,
        },
        Rule {
            id: "comparison",
            pattern: Pattern { p: inh(store, m.clone(), p.clone()), s: inh(store, m.clone(), s.clone()) },
            base_priority: 0.6,
            conclusion: comparison_concl,
        },
        Rule {
            id: "analogy",
            pattern: Pattern { p: inh(store, m.clone(), p.clone()), s: sim(store, s.clone(), m.clone()) },
            base_priority: 0.8,
            conclusion: analogy_concl,
        },
        Rule {
            id: "resemblance",
            pattern: Pattern { p: sim(store, m.clone(), p.clone()), s: sim(store, s.clone(), m.clone()) },
            base_priority: 0.7,
            conclusion: resemblance_concl,
        },
        Rule {
            id: "detachment",
            pattern: Pattern { p: imp(store, a.clone(), b.clone()), s: a.clone() },
            base_priority: 0.9,
            conclusion: detachment_concl,
        },
        Rule {
            id: "decomposition",
            pattern: Pattern { p: conj(store, a.clone(), b.clone()), s: wild.clone() },
            base_priority: 0.8,
            conclusion: decomposition_concl,
        },
        Rule {
            id: "contraposition",
            pattern: Pattern { p: imp(store, a.clone(), b.clone()), s: wild.clone() },
            base_priority: 0.5,
            conclusion: contraposition_concl,
        },
        Rule {
            id: "conversion",
            pattern: Pattern { p: imp(store, a, b), s: wild },
            base_priority: 0.5,
            conclusion: conversion_concl,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::{default_discriminators, execute, DerivationContext, DiscriminationTree};
    use crate::event::EventBus;
    use crate::stamp::Stamp;
    use crate::task::{Punctuation, TaskBuilder, Tense};

    fn belief(term: Term, f: f32, c: f32) -> crate::task::Task {
        TaskBuilder::new()
            .term(term)
            .punctuation(Punctuation::Belief)
            .tense(Tense::Eternal)
            .truth(Truth::new(f, c))
            .stamp(Stamp::new_input(0, 0, 8))
            .build()
            .unwrap()
    }

    #[test]
    fn deduction_scenario_from_spec() {
        let mut store = TermStore::new();
        let bird = store.intern_atomic("bird").unwrap();
        let animal = store.intern_atomic("animal").unwrap();
        let robin = store.intern_atomic("robin").unwrap();
        let bird_animal = store.intern_compound(Op::Inheritance, vec![bird.clone(), animal.clone()], None).unwrap();
        let robin_bird = store.intern_compound(Op::Inheritance, vec![robin.clone(), bird], None).unwrap();

        let primary = belief(bird_animal, 1.0, 0.9);
        let secondary = belief(robin_bird, 1.0, 0.9);

        let rules = default_rules(&mut store);
        let tree = DiscriminationTree::build(&rules, default_discriminators());
        let mut bus = EventBus::new();
        let mut ctx = DerivationContext {
            store: &mut store,
            truth_k: 1.0,
            stamp_max_length: 8,
            time: 0,
            max_commutative_permutations: 24,
        };
        let derived = execute(&rules, &tree, &secondary, &primary, &mut ctx, &mut bus, 0);
        let robin_animal_term = store.intern_compound(Op::Inheritance, vec![robin, animal], None).unwrap();
        let robin_animal = derived.iter().find(|t| t.term() == &robin_animal_term);
        let task = robin_animal.expect("expected <robin --> animal> to be derived");
        let truth = task.truth().unwrap();
        assert!((truth.frequency() - 1.0).abs() < 0.01);
        assert!((truth.confidence() - 0.81).abs() < 0.01);
    }

    #[test]
    fn detachment_scenario_from_spec() {
        let mut store = TermStore::new();
        let rain = store.intern_atomic("rain").unwrap();
        let wet = store.intern_atomic("wet").unwrap();
        let rain_wet = store.intern_compound(Op::Implication, vec![rain.clone(), wet.clone()], None).unwrap();

        let primary = belief(rain_wet, 1.0, 0.9);
        let secondary = belief(rain, 1.0, 0.9);

        let rules = default_rules(&mut store);
        let tree = DiscriminationTree::build(&rules, default_discriminators());
        let mut bus = EventBus::new();
        let mut ctx = DerivationContext {
            store: &mut store,
            truth_k: 1.0,
            stamp_max_length: 8,
            time: 0,
            max_commutative_permutations: 24,
        };
        let derived = execute(&rules, &tree, &primary, &secondary, &mut ctx, &mut bus, 0);
        assert!(derived.iter().any(|t| t.term() == &wet));
    }
}

//! Pattern unification between rule patterns and ground terms (spec §4.8).
//!
//! Rule patterns are ordinary `Term`s built with `Op::VarPattern` leaves
//! standing in for "anything here"; ground terms are whatever a task's
//! `Term` happens to be. Unification walks both trees together, binding
//! pattern variables as it goes and checking that repeat occurrences of a
//! bound variable match structurally.

use crate::error::UnifyError;
use crate::term::{Op, Term, TermStore};
use hashbrown::HashMap;

/// Pattern-variable bindings built up during one `unify` call.
#[derive(Debug, Clone, Default)]
pub struct Substitution {
    bindings: HashMap<Term, Term>,
}

impl Substitution {
    pub fn new() -> Self {
        Substitution::default()
    }

    pub fn get(&self, var: &Term) -> Option<&Term> {
        self.bindings.get(var)
    }

    pub fn bind(&mut self, var: Term, value: Term) {
        self.bindings.insert(var, value);
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }
}

fn is_pattern_var(t: &Term) -> bool {
    matches!(t.op(), Op::VarPattern | Op::VarIndep | Op::VarDep | Op::VarQuery)
}

/// True iff `needle` occurs anywhere inside `haystack` (including as
/// `haystack` itself) — the occurs-check guard (spec §4.8, invariant 7).
fn occurs(needle: &Term, haystack: &Term) -> bool {
    if needle == haystack {
        return true;
    }
    haystack.subterms().iter().any(|s| occurs(needle, s))
}

/// Unify `pattern` against `ground`, threading bindings already made by an
/// earlier call (e.g. unifying the `s` slot after the `p` slot bound some
/// of the same variables). `max_permutations` bounds the commutative
/// component search (spec §4.8, §6 `unifier.maxCommutativePermutations`).
pub fn unify(
    pattern: &Term,
    ground: &Term,
    existing: &Substitution,
    max_permutations: usize,
) -> Result<Substitution, UnifyError> {
    let mut sub = existing.clone();
    unify_into(pattern, ground, &mut sub, max_permutations)?;
    Ok(sub)
}

fn unify_into(
    pattern: &Term,
    ground: &Term,
    sub: &mut Substitution,
    max_permutations: usize,
) -> Result<(), UnifyError> {
    if is_pattern_var(pattern) {
        if let Some(bound) = sub.get(pattern).cloned() {
            return if bound == *ground { Ok(()) } else { Err(UnifyError::Mismatch) };
        }
        // Query variables may only ever be bound, never matched against an
        // unbound variable on the ground side (spec §4.8).
        if pattern.op() == Op::VarQuery && is_pattern_var(ground) && sub.get(ground).is_none() {
            return Err(UnifyError::Mismatch);
        }
        if occurs(pattern, ground) && pattern != ground {
            return Err(UnifyError::OccursCheck);
        }
        sub.bind(pattern.clone(), ground.clone());
        return Ok(());
    }

    if pattern.is_atomic() || ground.is_variable() {
        return if pattern == ground { Ok(()) } else { Err(UnifyError::Mismatch) };
    }

    if pattern.op() != ground.op() {
        return Err(UnifyError::Mismatch);
    }
    let (p_sub, g_sub) = (pattern.subterms(), ground.subterms());
    if p_sub.len() != g_sub.len() {
        return Err(UnifyError::Mismatch);
    }

    if pattern.op().is_commutative() {
        unify_commutative(p_sub, g_sub, sub, max_permutations)
    } else {
        for (p, g) in p_sub.iter().zip(g_sub.iter()) {
            unify_into(p, g, sub, max_permutations)?;
        }
        Ok(())
    }
}

/// Commutative compounds: ground components may be permuted to line up
/// with pattern components. Bounded by `max_permutations` (spec §4.8's
/// "≤ 4!" default); factorial(n) > bound is rejected outright rather than
/// silently truncated.
fn unify_commutative(
    p_sub: &[Term],
    g_sub: &[Term],
    sub: &mut Substitution,
    max_permutations: usize,
) -> Result<(), UnifyError> {
    let n = g_sub.len();
    if factorial(n) > max_permutations {
        return Err(UnifyError::PermutationBudgetExceeded);
    }
    let mut indices: Vec<usize> = (0..n).collect();
    let mut attempt = 0usize;
    loop {
        attempt += 1;
        let mut candidate = sub.clone();
        let ok = p_sub
            .iter()
            .zip(indices.iter())
            .all(|(p, &gi)| unify_into(p, &g_sub[gi], &mut candidate, max_permutations).is_ok());
        if ok {
            *sub = candidate;
            return Ok(());
        }
        if !next_permutation(&mut indices) || attempt >= max_permutations {
            return Err(UnifyError::Mismatch);
        }
    }
}

fn factorial(n: usize) -> usize {
    (1..=n).product::<usize>().max(1)
}

/// Lexicographic next permutation (classic in-place algorithm); returns
/// `false` once all permutations have been produced.
fn next_permutation(indices: &mut [usize]) -> bool {
    if indices.len() < 2 {
        return false;
    }
    let mut i = indices.len() - 1;
    while i > 0 && indices[i - 1] >= indices[i] {
        i -= 1;
    }
    if i == 0 {
        return false;
    }
    let mut j = indices.len() - 1;
    while indices[j] <= indices[i - 1] {
        j -= 1;
    }
    indices.swap(i - 1, j);
    indices[i..].reverse();
    true
}

/// Apply a substitution to build a concrete term, re-interning the result
/// so it shares identity with everything else the store has seen.
pub fn substitute(store: &mut TermStore, term: &Term, sub: &Substitution) -> Result<Term, crate::error::TermError> {
    if is_pattern_var(term) {
        if let Some(bound) = sub.get(term) {
            return Ok(bound.clone());
        }
        return Ok(term.clone());
    }
    match term.data() {
        crate::term::TermData::Atomic(_) => Ok(term.clone()),
        crate::term::TermData::Variable { .. } => Ok(term.clone()),
        crate::term::TermData::Compound { op, subterms, dt } => {
            let mut fresh = Vec::with_capacity(subterms.len());
            for s in subterms {
                fresh.push(substitute(store, s, sub)?);
            }
            store.intern_compound(*op, fresh, *dt)
        }
    }
}

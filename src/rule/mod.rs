//! Inference rules and the discrimination-tree-driven rule engine
//! (spec §3 Rule/Discrimination Node, §4.9, §4.10).
//!
//! Grounded on the teacher's unused `deriver::reaction::compiler` sketch
//! and `focus::pri_tree` (a `petgraph`-based priority tree the teacher
//! never wired up) — both discarded in favor of a purpose-built
//! discrimination tree, since neither teacher sketch matched the spec's
//! guard-then-unify contract.

pub mod builtin;
pub mod compiler;
pub mod executor;

use crate::term::Term;
use crate::truth::Truth;
use crate::unify::Substitution;

/// Two pattern slots, `p` and `s`, matched against the primary and
/// secondary premise terms respectively (spec §3 Rule).
pub struct Pattern {
    pub p: Term,
    pub s: Term,
}

/// `(substitution, primary_term, secondary_term, primary_truth,
/// secondary_truth, term_store, truth_k) -> conclusions`. Plain function
/// pointers rather than closures: every builtin rule looks its own
/// pattern variables back up through `term_store`, so none needs to
/// capture environment (spec §9's "closed enum of built-ins" guidance,
/// applied to rules instead of functors).
pub type ConclusionFn = fn(
    &Substitution,
    &Term,
    &Term,
    Option<&Truth>,
    Option<&Truth>,
    &mut crate::term::TermStore,
    f32,
) -> Vec<(Term, Truth)>;

pub struct Rule {
    pub id: &'static str,
    pub pattern: Pattern,
    pub base_priority: f32,
    pub conclusion: ConclusionFn,
}

pub use builtin::default_rules;
pub use compiler::{default_discriminators, DiscriminationTree, Discriminator, DiscriminatorValue};
pub use executor::{execute, DerivationContext};

//! Term representation in NARS.
//!
//! A term is the word or phrase a belief, goal or question is about. Terms
//! are atomic (`cat`), variable (`$x`, `#y`, `?z`) or compound (built from an
//! operator plus an ordered list of component terms, e.g. `<robin --> bird>`
//! or `(&&, a, b)`).
//!
//! Every `Term` handed out by this crate is a `TermRef` produced by
//! [`TermStore::intern`][store::TermStore]: two terms with equal structure
//! share one allocation, so equality is a pointer compare and hashing is a
//! pointer hash — see `store.rs` for the interning discipline spec §3/§4.1
//! requires.

pub mod atom;
pub mod compound;
pub mod store;
pub mod var;

use smartstring::{LazyCompact, SmartString};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

pub use store::TermStore;

pub type Name = SmartString<LazyCompact>;

/// Operator of a term. `Atom` tags a plain name; the four `Var*` variants tag
/// a variable; the rest tag a compound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Op {
    Atom,
    VarIndep,
    VarDep,
    VarQuery,
    /// Meta-variable used only inside rule patterns (§3 "Rule ... pattern
    /// has two slots, each a term-with-variables"); never appears in
    /// Narsese surface syntax.
    VarPattern,
    Inheritance,
    Similarity,
    Implication,
    Equivalence,
    Conjunction,
    Disjunction,
    Product,
    IntersectionExt,
    IntersectionInt,
    DifferenceExt,
    DifferenceInt,
    Negation,
    SetExt,
    SetInt,
}

impl Op {
    pub fn is_variable(self) -> bool {
        matches!(self, Op::VarIndep | Op::VarDep | Op::VarQuery | Op::VarPattern)
    }

    pub fn is_compound(self) -> bool {
        !self.is_variable() && self != Op::Atom
    }

    /// Operators whose component order carries no meaning; interning
    /// canonicalizes these by sorting components (spec §4.1).
    pub fn is_commutative(self) -> bool {
        matches!(
            self,
            Op::Conjunction
                | Op::Disjunction
                | Op::Similarity
                | Op::Equivalence
                | Op::IntersectionExt
                | Op::IntersectionInt
                | Op::SetExt
                | Op::SetInt
        )
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Op::Atom => "",
            Op::VarIndep => "$",
            Op::VarDep => "#",
            Op::VarQuery => "?",
            Op::VarPattern => "%",
            Op::Inheritance => "-->",
            Op::Similarity => "<->",
            Op::Implication => "==>",
            Op::Equivalence => "<=>",
            Op::Conjunction => "&&",
            Op::Disjunction => "||",
            Op::Product => "*",
            Op::IntersectionExt => "&",
            Op::IntersectionInt => "|",
            Op::DifferenceExt => "-",
            Op::DifferenceInt => "~",
            Op::Negation => "--",
            Op::SetExt => "{}",
            Op::SetInt => "[]",
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// The payload of an interned term node.
#[derive(Debug)]
pub enum TermData {
    Atomic(Name),
    Variable { kind: Op, name: Name },
    Compound { op: Op, subterms: Vec<Term>, dt: Option<i32> },
}

#[derive(Debug)]
pub struct TermNode {
    data: TermData,
    complexity: usize,
    structural_hash: u64,
}

/// A handle to an interned term. Cheap to clone (`Arc` bump); equality and
/// hashing are both pointer-based, satisfying spec §3's "equality is O(1)
/// pointer compare after construction" invariant.
#[derive(Clone)]
pub struct Term(pub(crate) Arc<TermNode>);

pub type TermRef = Term;

impl Term {
    pub fn data(&self) -> &TermData {
        &self.0.data
    }

    pub fn op(&self) -> Op {
        match &self.0.data {
            TermData::Atomic(_) => Op::Atom,
            TermData::Variable { kind, .. } => *kind,
            TermData::Compound { op, .. } => *op,
        }
    }

    pub fn complexity(&self) -> usize {
        self.0.complexity
    }

    pub fn structural_hash(&self) -> u64 {
        self.0.structural_hash
    }

    pub fn is_atomic(&self) -> bool {
        matches!(&self.0.data, TermData::Atomic(_))
    }

    pub fn is_variable(&self) -> bool {
        matches!(&self.0.data, TermData::Variable { .. })
    }

    pub fn is_compound(&self) -> bool {
        matches!(&self.0.data, TermData::Compound { .. })
    }

    pub fn subterms(&self) -> &[Term] {
        match &self.0.data {
            TermData::Compound { subterms, .. } => subterms,
            _ => &[],
        }
    }

    pub fn dt(&self) -> Option<i32> {
        match &self.0.data {
            TermData::Compound { dt, .. } => *dt,
            _ => None,
        }
    }

    pub fn variable_name(&self) -> Option<&str> {
        match &self.0.data {
            TermData::Variable { name, .. } => Some(name.as_str()),
            _ => None,
        }
    }

    pub fn atom_name(&self) -> Option<&str> {
        match &self.0.data {
            TermData::Atomic(name) => Some(name.as_str()),
            _ => None,
        }
    }

    /// Every interned subterm reachable from this term, this term included.
    /// Used by Memory to build term-link candidates.
    pub fn descend(&self, out: &mut Vec<Term>) {
        out.push(self.clone());
        for s in self.subterms() {
            s.descend(out);
        }
    }
}

impl PartialEq for Term {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Term {}

impl Hash for Term {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (Arc::as_ptr(&self.0) as usize).hash(state);
    }
}

impl fmt::Debug for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0.data {
            TermData::Atomic(name) => write!(f, "{}", name),
            TermData::Variable { name, .. } => write!(f, "{}", name),
            TermData::Compound { op, subterms, dt } => {
                compound::format(*op, subterms, *dt, f)
            }
        }
    }
}

//! `TermStore` — hash-consing interner for terms (spec §4.1).
//!
//! Every construction path goes through one of the three `intern_*` methods;
//! equal-structure terms always resolve to the same `Arc`, giving every
//! other component in the kernel pointer-equality and pointer-hashing for
//! free. Canonicalization of commutative operators happens here, once, at
//! construction time — nothing downstream needs to know an operator is
//! commutative.

use super::{compound, var, Name, Op, Term, TermData, TermNode};
use crate::error::TermError;
use hashbrown::HashMap;
use smartstring::SmartString;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

fn hash_of<T: Hash>(value: &T) -> u64 {
    let mut hasher = rustc_hash_compatible_hasher();
    value.hash(&mut hasher);
    hasher.finish()
}

/// `DefaultHasher` is good enough here: structural hashes are only ever
/// compared within one process, never persisted.
fn rustc_hash_compatible_hasher() -> std::collections::hash_map::DefaultHasher {
    std::collections::hash_map::DefaultHasher::new()
}

#[derive(Clone, PartialEq, Eq, Hash)]
struct CompoundKey {
    op: Op,
    subterms: Vec<Term>,
    dt: Option<i32>,
}

#[derive(Default)]
pub struct TermStore {
    atoms: HashMap<Name, Term>,
    variables: HashMap<(Op, Name), Term>,
    compounds: HashMap<CompoundKey, Term>,
}

impl TermStore {
    pub fn new() -> Self {
        TermStore::default()
    }

    pub fn len(&self) -> usize {
        self.atoms.len() + self.variables.len() + self.compounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn intern_atomic(&mut self, name: &str) -> Result<Term, TermError> {
        super::atom::validate_name(name)?;
        let key: Name = SmartString::from(name);
        if let Some(existing) = self.atoms.get(&key) {
            return Ok(existing.clone());
        }
        let hash = hash_of(&("atom", key.as_str()));
        let node = TermNode { data: TermData::Atomic(key.clone()), complexity: 1, structural_hash: hash };
        let term = Term(Arc::new(node));
        self.atoms.insert(key, term.clone());
        Ok(term)
    }

    pub fn intern_variable(&mut self, kind: Op, name: &str) -> Result<Term, TermError> {
        let normalized = var::normalize(kind, name)?;
        let key = (kind, normalized.clone());
        if let Some(existing) = self.variables.get(&key) {
            return Ok(existing.clone());
        }
        let hash = hash_of(&("var", kind, normalized.as_str()));
        let node = TermNode {
            data: TermData::Variable { kind, name: normalized.clone() },
            complexity: 1,
            structural_hash: hash,
        };
        let term = Term(Arc::new(node));
        self.variables.insert(key, term.clone());
        Ok(term)
    }

    pub fn intern_compound(
        &mut self,
        op: Op,
        mut subterms: Vec<Term>,
        dt: Option<i32>,
    ) -> Result<Term, TermError> {
        compound::validate_arity(op, subterms.len())?;
        if op.is_commutative() {
            subterms.sort_by(|a, b| {
                a.structural_hash()
                    .cmp(&b.structural_hash())
                    .then_with(|| a.to_string().cmp(&b.to_string()))
            });
        }
        let key = CompoundKey { op, subterms: subterms.clone(), dt };
        if let Some(existing) = self.compounds.get(&key) {
            return Ok(existing.clone());
        }
        let complexity = 1 + subterms.iter().map(Term::complexity).sum::<usize>();
        let mut hasher = rustc_hash_compatible_hasher();
        "compound".hash(&mut hasher);
        op.hash(&mut hasher);
        dt.hash(&mut hasher);
        for s in &subterms {
            s.structural_hash().hash(&mut hasher);
        }
        let structural_hash = hasher.finish();
        let node = TermNode {
            data: TermData::Compound { op, subterms: subterms.clone(), dt },
            complexity,
            structural_hash,
        };
        let term = Term(Arc::new(node));
        self.compounds.insert(key, term.clone());
        Ok(term)
    }

    /// Intern a term built elsewhere (e.g. by the parser, which constructs
    /// leaves first) bottom-up, re-running every node through this store so
    /// identity is shared with everything else the kernel has seen.
    pub fn reintern(&mut self, term: &Term) -> Result<Term, TermError> {
        match term.data() {
            TermData::Atomic(name) => self.intern_atomic(name),
            TermData::Variable { kind, name } => self.intern_variable(*kind, name),
            TermData::Compound { op, subterms, dt } => {
                let mut fresh = Vec::with_capacity(subterms.len());
                for s in subterms {
                    fresh.push(self.reintern(s)?);
                }
                self.intern_compound(*op, fresh, *dt)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn atoms_are_deduplicated() {
        let mut store = TermStore::new();
        let a = store.intern_atomic("cat").unwrap();
        let b = store.intern_atomic("cat").unwrap();
        assert_eq!(a, b);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn commutative_canonicalization_is_order_independent() {
        let mut store = TermStore::new();
        let a = store.intern_atomic("a").unwrap();
        let b = store.intern_atomic("b").unwrap();
        let ab = store.intern_compound(Op::Conjunction, vec![a.clone(), b.clone()], None).unwrap();
        let ba = store.intern_compound(Op::Conjunction, vec![b, a], None).unwrap();
        assert_eq!(ab, ba);
        assert_eq!(store.compounds.len(), 1);
    }

    #[test]
    fn non_commutative_order_matters() {
        let mut store = TermStore::new();
        let a = store.intern_atomic("a").unwrap();
        let b = store.intern_atomic("b").unwrap();
        let ab = store.intern_compound(Op::Inheritance, vec![a.clone(), b.clone()], None).unwrap();
        let ba = store.intern_compound(Op::Inheritance, vec![b, a], None).unwrap();
        assert_ne!(ab, ba);
    }

    #[test]
    fn arity_failure_is_rejected() {
        let mut store = TermStore::new();
        let a = store.intern_atomic("a").unwrap();
        assert!(store.intern_compound(Op::Inheritance, vec![a], None).is_err());
    }

    #[test]
    fn complexity_is_one_plus_sum_of_children() {
        let mut store = TermStore::new();
        let a = store.intern_atomic("a").unwrap();
        let b = store.intern_atomic("b").unwrap();
        let ab = store.intern_compound(Op::Inheritance, vec![a, b], None).unwrap();
        assert_eq!(ab.complexity(), 3);
    }
}

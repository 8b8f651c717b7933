//! Compiles a rule set into a discrimination tree guard (spec §4.9).
//!
//! The tree is a *pre-filter*: every rule reachable by unification is also
//! reachable by tree traversal (no false negatives), but traversal may
//! also surface rules that will fail unification (false positives,
//! weeded out by the executor). Default discriminators, in order: operator
//! of `p`, operator of `s`, arity of `p`, arity of `s`.

use super::Rule;
use crate::term::{Op, Term};
use hashbrown::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiscriminatorValue {
    Op(Op),
    Arity(usize),
    /// The pattern leaves this dimension unconstrained — always matched,
    /// in addition to any exact match (spec §4.9 "wildcard child `*`").
    Any,
}

pub type Discriminator = fn(&Term, &Term) -> DiscriminatorValue;

fn op_of_p(p: &Term, _s: &Term) -> DiscriminatorValue {
    if p.is_variable() {
        DiscriminatorValue::Any
    } else {
        DiscriminatorValue::Op(p.op())
    }
}

fn op_of_s(_p: &Term, s: &Term) -> DiscriminatorValue {
    if s.is_variable() {
        DiscriminatorValue::Any
    } else {
        DiscriminatorValue::Op(s.op())
    }
}

fn arity_of_p(p: &Term, _s: &Term) -> DiscriminatorValue {
    if p.is_variable() {
        DiscriminatorValue::Any
    } else {
        DiscriminatorValue::Arity(p.subterms().len())
    }
}

fn arity_of_s(_p: &Term, s: &Term) -> DiscriminatorValue {
    if s.is_variable() {
        DiscriminatorValue::Any
    } else {
        DiscriminatorValue::Arity(s.subterms().len())
    }
}

pub fn default_discriminators() -> Vec<Discriminator> {
    vec![op_of_p, op_of_s, arity_of_p, arity_of_s]
}

#[derive(Default)]
struct Node {
    children: HashMap<DiscriminatorValue, Node>,
    wildcard: Option<Box<Node>>,
    leaf_rules: Vec<usize>,
}

/// A compiled discrimination tree over a fixed rule set. Built once and
/// shared read-only by every cycle (spec §5 "Shared resources").
pub struct DiscriminationTree {
    discriminators: Vec<Discriminator>,
    root: Node,
}

impl DiscriminationTree {
    pub fn build(rules: &[Rule], discriminators: Vec<Discriminator>) -> Self {
        let mut root = Node::default();
        for (idx, rule) in rules.iter().enumerate() {
            Self::insert(&mut root, &discriminators, 0, rule, idx);
        }
        DiscriminationTree { discriminators, root }
    }

    fn insert(node: &mut Node, discs: &[Discriminator], depth: usize, rule: &Rule, idx: usize) {
        if depth == discs.len() {
            node.leaf_rules.push(idx);
            return;
        }
        let value = discs[depth](&rule.pattern.p, &rule.pattern.s);
        let child = match value {
            DiscriminatorValue::Any => node.wildcard.get_or_insert_with(|| Box::new(Node::default())).as_mut(),
            other => node.children.entry(other).or_default(),
        };
        Self::insert(child, discs, depth + 1, rule, idx);
    }

    /// Every rule index reachable by following both the exact-match and
    /// wildcard branch at each discriminator level (spec §4.9 invariant:
    /// an over-approximation, never a false negative).
    pub fn candidates(&self, p: &Term, s: &Term) -> Vec<usize> {
        let mut out = Vec::new();
        Self::collect(&self.root, &self.discriminators, 0, p, s, &mut out);
        out
    }

    fn collect(node: &Node, discs: &[Discriminator], depth: usize, p: &Term, s: &Term, out: &mut Vec<usize>) {
        if depth == discs.len() {
            out.extend_from_slice(&node.leaf_rules);
            return;
        }
        let value = discs[depth](p, s);
        if let Some(child) = node.children.get(&value) {
            Self::collect(child, discs, depth + 1, p, s, out);
        }
        if let Some(wild) = &node.wildcard {
            Self::collect(wild, discs, depth + 1, p, s, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::default_rules;
    use crate::term::TermStore;

    #[test]
    fn tree_is_a_superset_of_unifiable_rules() {
        let mut store = TermStore::new();
        let rules = default_rules(&mut store);
        let tree = DiscriminationTree::build(&rules, default_discriminators());

        let robin = store.intern_atomic("robin").unwrap();
        let bird = store.intern_atomic("bird").unwrap();
        let animal = store.intern_atomic("animal").unwrap();
        let p = store.intern_compound(Op::Inheritance, vec![robin, bird.clone()], None).unwrap();
        let s = store.intern_compound(Op::Inheritance, vec![bird, animal], None).unwrap();

        let candidates = tree.candidates(&p, &s);
        assert!(!candidates.is_empty());
        // Every inheritance/inheritance binary rule (deduction, induction,
        // abduction, comparison) must show up as a candidate.
        let ids: Vec<&str> = candidates.iter().map(|&i| rules[i].id).collect();
        assert!(ids.contains(&"deduction"));
    }

    #[test]
    fn mismatched_shape_yields_no_candidates_for_shape_specific_rules() {
        let mut store = TermStore::new();
        let rules = default_rules(&mut store);
        let tree = DiscriminationTree::build(&rules, default_discriminators());
        let a = store.intern_atomic("a").unwrap();
        let b = store.intern_atomic("b").unwrap();
        let c = store.intern_atomic("c").unwrap();
        let product = store.intern_compound(Op::Product, vec![a, b], None).unwrap();
        let candidates = tree.candidates(&product, &c);
        let ids: Vec<&str> = candidates.iter().map(|&i| rules[i].id).collect();
        assert!(!ids.contains(&"deduction"));
    }
}

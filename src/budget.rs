//! Attentional budget: priority/durability/quality (spec §3, §4.3).
//!
//! Separate from evidential `Truth` — budget governs *how much attention*
//! a task gets, not how true it is.

use ordered_float::OrderedFloat;
use std::hash::{Hash, Hasher};

#[derive(Debug, Clone, Copy)]
pub struct Budget {
    priority: OrderedFloat<f32>,
    durability: OrderedFloat<f32>,
    quality: OrderedFloat<f32>,
}

impl Budget {
    pub fn new(priority: f32, durability: f32, quality: f32) -> Self {
        Budget {
            priority: OrderedFloat(priority.clamp(0.0, 1.0)),
            durability: OrderedFloat(durability.clamp(0.0, 1.0)),
            quality: OrderedFloat(quality.clamp(0.0, 1.0)),
        }
    }

    pub fn priority(&self) -> f32 {
        self.priority.0
    }

    pub fn durability(&self) -> f32 {
        self.durability.0
    }

    pub fn quality(&self) -> f32 {
        self.quality.0
    }

    /// Priority * durability * quality — the scalar used for Bag sampling.
    pub fn value(&self) -> f32 {
        self.priority.0 * self.durability.0 * self.quality.0
    }

    /// Multiplicative decay applied to owners not selected this cycle
    /// (spec §3's "budgets decay multiplicatively on each cycle that the
    /// owner is not selected").
    pub fn decay(&self, rate: f32) -> Self {
        Budget::new(self.priority.0 * (1.0 - rate), self.durability.0, self.quality.0)
    }

    /// Pointwise max for priority, average for durability/quality — spec
    /// §4.3.
    pub fn merge(&self, other: &Budget) -> Self {
        Budget::new(
            self.priority.0.max(other.priority.0),
            (self.durability.0 + other.durability.0) / 2.0,
            (self.quality.0 + other.quality.0) / 2.0,
        )
    }

    /// Exponential decay of priority by elapsed age in cycles, moderated by
    /// durability (higher durability resists forgetting).
    pub fn forget(&self, age: u32) -> Self {
        let resistance = 0.1 + 0.9 * self.durability.0;
        let factor = resistance.powi(age as i32);
        Budget::new(self.priority.0 * factor, self.durability.0, self.quality.0)
    }

    /// Budget for a derived conclusion: priority from the premises
    /// (averaged, scaled by the rule's base priority) penalized by
    /// conclusion complexity — more complex conclusions receive lower
    /// priority (spec §4.3); durability/quality carry over as plain
    /// averages.
    pub fn derive(primary: &Budget, secondary: &Budget, rule_base_priority: f32, conclusion_complexity: usize) -> Self {
        let complexity_penalty = 1.0 / (1.0 + conclusion_complexity as f32 * 0.1);
        let p = ((primary.priority() + secondary.priority()) / 2.0) * rule_base_priority * complexity_penalty;
        let d = (primary.durability() + secondary.durability()) / 2.0;
        let q = (primary.quality() + secondary.quality()) / 2.0;
        Budget::new(p, d, q)
    }
}

impl Default for Budget {
    fn default() -> Self {
        Budget::new(0.5, 0.5, 0.5)
    }
}

impl PartialEq for Budget {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority && self.durability == other.durability && self.quality == other.quality
    }
}

impl Eq for Budget {}

impl Hash for Budget {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.priority.hash(state);
        self.durability.hash(state);
        self.quality.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_to_unit_range() {
        let b = Budget::new(1.5, -0.5, 2.0);
        assert_eq!(b.priority(), 1.0);
        assert_eq!(b.durability(), 0.0);
        assert_eq!(b.quality(), 1.0);
    }

    #[test]
    fn decay_reduces_priority_only() {
        let b = Budget::new(0.8, 0.5, 0.5);
        let decayed = b.decay(0.5);
        assert!((decayed.priority() - 0.4).abs() < 1e-6);
        assert_eq!(decayed.durability(), b.durability());
    }

    #[test]
    fn merge_is_max_priority_average_rest() {
        let a = Budget::new(0.3, 0.4, 0.6);
        let b = Budget::new(0.7, 0.8, 0.2);
        let merged = a.merge(&b);
        assert_eq!(merged.priority(), 0.7);
        assert!((merged.durability() - 0.6).abs() < 1e-6);
        assert!((merged.quality() - 0.4).abs() < 1e-6);
    }

    #[test]
    fn derive_penalizes_complex_conclusions() {
        let a = Budget::new(0.8, 0.8, 0.8);
        let simple = Budget::derive(&a, &a, 1.0, 1);
        let complex = Budget::derive(&a, &a, 1.0, 20);
        assert!(complex.priority() < simple.priority());
        assert_eq!(complex.quality(), simple.quality());
    }
}

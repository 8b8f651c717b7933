//! Priority-probabilistic bounded container (spec §3, §4.5).
//!
//! Unlike the teacher's plain capacity-bounded max-heap, this `Bag`
//! deduplicates by content key, samples probabilistically by priority
//! instead of always returning the max, and supports a pluggable eviction
//! policy — all required by spec §4.5's contract.

use indexmap::IndexMap;
use rand::Rng;
use std::hash::Hash;

/// An item stored in a Bag. `Key` is the content key used for dedup;
/// `priority()` drives both sampling weight and eviction.
pub trait BagItem {
    type Key: Eq + Hash + Clone;

    fn key(&self) -> Self::Key;
    fn priority(&self) -> f32;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EvictionPolicy {
    Priority,
    Lru,
    Fifo,
    Random,
}

struct Entry<T> {
    item: T,
    inserted_at: u64,
    last_touched: u64,
}

/// A capacity-bounded, content-keyed, priority-sampled bag.
pub struct Bag<T: BagItem> {
    entries: IndexMap<T::Key, Entry<T>>,
    capacity: usize,
    policy: EvictionPolicy,
    clock: u64,
}

impl<T: BagItem> Bag<T> {
    pub fn new(capacity: usize, policy: EvictionPolicy) -> Self {
        Bag { entries: IndexMap::with_capacity(capacity), capacity, policy, clock: 0 }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn contains(&self, key: &T::Key) -> bool {
        self.entries.contains_key(key)
    }

    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    /// Insert `item`. Returns `false` without mutation if its key is
    /// already present (spec: "if already present, returns false"). When at
    /// capacity, evicts one item by the configured policy first.
    pub fn add(&mut self, item: T) -> bool {
        let key = item.key();
        if self.entries.contains_key(&key) {
            return false;
        }
        if self.entries.len() >= self.capacity {
            self.evict_one();
        }
        let t = self.tick();
        self.entries.insert(key, Entry { item, inserted_at: t, last_touched: t });
        debug_assert!(self.entries.len() <= self.capacity);
        true
    }

    fn evict_one(&mut self) {
        let victim_index = match self.policy {
            EvictionPolicy::Priority => self
                .entries
                .values()
                .enumerate()
                .min_by(|(_, a), (_, b)| a.item.priority().partial_cmp(&b.item.priority()).unwrap())
                .map(|(i, _)| i),
            EvictionPolicy::Lru => {
                self.entries.values().enumerate().min_by_key(|(_, e)| e.last_touched).map(|(i, _)| i)
            }
            EvictionPolicy::Fifo => {
                self.entries.values().enumerate().min_by_key(|(_, e)| e.inserted_at).map(|(i, _)| i)
            }
            EvictionPolicy::Random => {
                if self.entries.is_empty() {
                    None
                } else {
                    Some(rand::thread_rng().gen_range(0..self.entries.len()))
                }
            }
        };
        if let Some(i) = victim_index {
            self.entries.shift_remove_index(i);
        }
    }

    pub fn remove(&mut self, key: &T::Key) -> Option<T> {
        self.entries.shift_remove(key).map(|e| e.item)
    }

    /// Highest-priority item, without removing it.
    pub fn peek(&self) -> Option<&T> {
        self.entries
            .values()
            .max_by(|a, b| a.item.priority().partial_cmp(&b.item.priority()).unwrap())
            .map(|e| &e.item)
    }

    /// Priority-weighted probabilistic sample. Touches the chosen entry's
    /// LRU timestamp but does not remove it.
    pub fn sample(&mut self) -> Option<&T> {
        if self.entries.is_empty() {
            return None;
        }
        let total: f32 = self.entries.values().map(|e| e.item.priority().max(1e-6)).sum();
        let mut roll = rand::thread_rng().gen_range(0.0..total);
        let mut chosen_index = self.entries.len() - 1;
        for (i, e) in self.entries.values().enumerate() {
            let w = e.item.priority().max(1e-6);
            if roll < w {
                chosen_index = i;
                break;
            }
            roll -= w;
        }
        let t = self.clock + 1;
        self.clock = t;
        self.entries.get_index_mut(chosen_index).map(|(_, entry)| {
            entry.last_touched = t;
            &entry.item
        })
    }

    /// Pull (remove) a priority-weighted sample — used by PremiseSource to
    /// take the primary task out of a task bag.
    pub fn take_sample(&mut self) -> Option<T> {
        if self.entries.is_empty() {
            return None;
        }
        let total: f32 = self.entries.values().map(|e| e.item.priority().max(1e-6)).sum();
        let mut roll = rand::thread_rng().gen_range(0.0..total);
        let mut chosen_key = None;
        for (k, e) in self.entries.iter() {
            let w = e.item.priority().max(1e-6);
            if roll < w {
                chosen_key = Some(k.clone());
                break;
            }
            roll -= w;
        }
        let key = chosen_key.or_else(|| self.entries.keys().last().cloned())?;
        self.remove(&key)
    }

    pub fn iter_by_priority(&self) -> impl Iterator<Item = &T> {
        let mut items: Vec<&T> = self.entries.values().map(|e| &e.item).collect();
        items.sort_by(|a, b| b.priority().partial_cmp(&a.priority()).unwrap());
        items.into_iter()
    }

    pub fn apply_decay(&mut self, rate: f32)
    where
        T: DecayableItem,
    {
        for entry in self.entries.values_mut() {
            entry.item.apply_decay(rate);
        }
    }
}

/// Implemented by items whose priority can be scaled in place — needed
/// because `Bag::apply_decay` mutates every stored item's priority
/// (spec §4.5).
pub trait DecayableItem {
    fn apply_decay(&mut self, rate: f32);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug)]
    struct Item {
        key: &'static str,
        priority: f32,
    }

    impl BagItem for Item {
        type Key = &'static str;
        fn key(&self) -> Self::Key {
            self.key
        }
        fn priority(&self) -> f32 {
            self.priority
        }
    }

    #[test]
    fn add_respects_capacity() {
        let mut bag: Bag<Item> = Bag::new(2, EvictionPolicy::Priority);
        assert!(bag.add(Item { key: "a", priority: 0.1 }));
        assert!(bag.add(Item { key: "b", priority: 0.9 }));
        assert!(bag.add(Item { key: "c", priority: 0.5 }));
        assert_eq!(bag.len(), 2);
        assert!(!bag.contains(&"a")); // lowest priority evicted
    }

    #[test]
    fn add_rejects_duplicate_key() {
        let mut bag: Bag<Item> = Bag::new(4, EvictionPolicy::Priority);
        assert!(bag.add(Item { key: "a", priority: 0.1 }));
        assert!(!bag.add(Item { key: "a", priority: 0.9 }));
        assert_eq!(bag.len(), 1);
    }

    #[test]
    fn peek_returns_highest_priority() {
        let mut bag: Bag<Item> = Bag::new(4, EvictionPolicy::Priority);
        bag.add(Item { key: "a", priority: 0.1 });
        bag.add(Item { key: "b", priority: 0.9 });
        assert_eq!(bag.peek().unwrap().key, "b");
    }

    #[test]
    fn capacity_invariant_holds_under_repeated_inserts() {
        let mut bag: Bag<Item> = Bag::new(3, EvictionPolicy::Priority);
        for i in 0..10 {
            bag.add(Item { key: Box::leak(i.to_string().into_boxed_str()), priority: 0.5 });
            assert!(bag.len() <= 3);
        }
    }

    #[test]
    fn fifo_policy_evicts_oldest() {
        let mut bag: Bag<Item> = Bag::new(2, EvictionPolicy::Fifo);
        bag.add(Item { key: "a", priority: 0.9 });
        bag.add(Item { key: "b", priority: 0.9 });
        bag.add(Item { key: "c", priority: 0.9 });
        assert!(!bag.contains(&"a"));
        assert!(bag.contains(&"b"));
        assert!(bag.contains(&"c"));
    }
}

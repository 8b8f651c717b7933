//! Tunable knobs for the kernel, per spec §6.
//!
//! Mirrors the teacher's pattern of clamped, validated numeric fields
//! (see `truth::Truth::new`, `task::Budget`) but collected into one
//! struct with a builder so callers configure the kernel once at
//! construction instead of threading loose parameters everywhere.

use crate::bag::EvictionPolicy;
use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq)]
pub struct NarConfig {
    pub memory_capacity: usize,
    pub concept_bag_capacity: usize,
    pub task_bag_capacity: usize,
    pub forget_policy: EvictionPolicy,
    pub max_derivation_depth: u32,
    pub max_tasks_per_cycle: usize,
    pub cpu_throttle_interval: u32,
    pub truth_k: f32,
    pub stamp_max_length: usize,
    pub unifier_max_commutative_permutations: usize,
}

impl Default for NarConfig {
    fn default() -> Self {
        NarConfig {
            memory_capacity: 10_000,
            concept_bag_capacity: 1000,
            task_bag_capacity: 1000,
            forget_policy: EvictionPolicy::Priority,
            max_derivation_depth: 10,
            max_tasks_per_cycle: 10,
            cpu_throttle_interval: 0,
            truth_k: 1.0,
            stamp_max_length: 8,
            unifier_max_commutative_permutations: 24, // 4!
        }
    }
}

impl NarConfig {
    pub fn builder() -> NarConfigBuilder {
        NarConfigBuilder::default()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.memory_capacity == 0 {
            return Err(ConfigError::MustBePositive { field: "memory.capacity", value: 0.0 });
        }
        if self.concept_bag_capacity == 0 {
            return Err(ConfigError::MustBePositive {
                field: "memory.conceptBag.capacity",
                value: 0.0,
            });
        }
        if self.task_bag_capacity == 0 {
            return Err(ConfigError::MustBePositive { field: "memory.taskBag.capacity", value: 0.0 });
        }
        if self.max_derivation_depth == 0 {
            return Err(ConfigError::MustBePositive {
                field: "cycle.maxDerivationDepth",
                value: 0.0,
            });
        }
        if self.max_tasks_per_cycle == 0 {
            return Err(ConfigError::MustBePositive { field: "cycle.maxTasksPerCycle", value: 0.0 });
        }
        if self.truth_k <= 0.0 {
            return Err(ConfigError::MustBePositive { field: "truth.k", value: self.truth_k as f64 });
        }
        if self.stamp_max_length == 0 {
            return Err(ConfigError::MustBePositive { field: "stamp.maxLength", value: 0.0 });
        }
        if self.unifier_max_commutative_permutations == 0 {
            return Err(ConfigError::MustBePositive {
                field: "unifier.maxCommutativePermutations",
                value: 0.0,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct NarConfigBuilder {
    inner: OptionalConfig,
}

#[derive(Debug, Clone, Default)]
struct OptionalConfig {
    memory_capacity: Option<usize>,
    concept_bag_capacity: Option<usize>,
    task_bag_capacity: Option<usize>,
    forget_policy: Option<EvictionPolicy>,
    max_derivation_depth: Option<u32>,
    max_tasks_per_cycle: Option<usize>,
    cpu_throttle_interval: Option<u32>,
    truth_k: Option<f32>,
    stamp_max_length: Option<usize>,
    unifier_max_commutative_permutations: Option<usize>,
}

macro_rules! setter {
    ($name:ident, $field:ident, $ty:ty) => {
        pub fn $name(mut self, value: $ty) -> Self {
            self.inner.$field = Some(value);
            self
        }
    };
}

impl NarConfigBuilder {
    setter!(memory_capacity, memory_capacity, usize);
    setter!(concept_bag_capacity, concept_bag_capacity, usize);
    setter!(task_bag_capacity, task_bag_capacity, usize);
    setter!(forget_policy, forget_policy, EvictionPolicy);
    setter!(max_derivation_depth, max_derivation_depth, u32);
    setter!(max_tasks_per_cycle, max_tasks_per_cycle, usize);
    setter!(cpu_throttle_interval, cpu_throttle_interval, u32);
    setter!(truth_k, truth_k, f32);
    setter!(stamp_max_length, stamp_max_length, usize);
    setter!(
        unifier_max_commutative_permutations,
        unifier_max_commutative_permutations,
        usize
    );

    pub fn build(self) -> Result<NarConfig, ConfigError> {
        let default = NarConfig::default();
        let cfg = NarConfig {
            memory_capacity: self.inner.memory_capacity.unwrap_or(default.memory_capacity),
            concept_bag_capacity: self
                .inner
                .concept_bag_capacity
                .unwrap_or(default.concept_bag_capacity),
            task_bag_capacity: self.inner.task_bag_capacity.unwrap_or(default.task_bag_capacity),
            forget_policy: self.inner.forget_policy.unwrap_or(default.forget_policy),
            max_derivation_depth: self
                .inner
                .max_derivation_depth
                .unwrap_or(default.max_derivation_depth),
            max_tasks_per_cycle: self
                .inner
                .max_tasks_per_cycle
                .unwrap_or(default.max_tasks_per_cycle),
            cpu_throttle_interval: self
                .inner
                .cpu_throttle_interval
                .unwrap_or(default.cpu_throttle_interval),
            truth_k: self.inner.truth_k.unwrap_or(default.truth_k),
            stamp_max_length: self.inner.stamp_max_length.unwrap_or(default.stamp_max_length),
            unifier_max_commutative_permutations: self
                .inner
                .unifier_max_commutative_permutations
                .unwrap_or(default.unifier_max_commutative_permutations),
        };
        cfg.validate()?;
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(NarConfig::default().validate().is_ok());
    }

    #[test]
    fn builder_rejects_zero_capacity() {
        let err = NarConfig::builder().memory_capacity(0).build();
        assert!(matches!(err, Err(ConfigError::MustBePositive { .. })));
    }

    #[test]
    fn builder_overrides_defaults() {
        let cfg = NarConfig::builder().truth_k(2.0).stamp_max_length(5).build().unwrap();
        assert_eq!(cfg.truth_k, 2.0);
        assert_eq!(cfg.stamp_max_length, 5);
        assert_eq!(cfg.memory_capacity, NarConfig::default().memory_capacity);
    }
}

//! Logical clock for NARS.
//!
//! The kernel never reads the wall clock: cycles advance a monotonic
//! logical counter, and tasks/stamps use `Clock::now`/`next_stamp` off of
//! that counter. See `stamp::Instant` for the timestamp type this clock
//! produces.

use crate::stamp::Instant;
use std::sync::atomic::{AtomicI64, Ordering};

/// Logical clock: current time, plus a separate evidence-stamp counter.
pub struct Clock {
    /// Current time
    now: AtomicI64,

    /// Duration of each cycle
    duration: f32,

    /// Next stamp value
    next_stamp: AtomicI64,
}

impl Clock {
    /// Create a new Clock instance
    pub fn new() -> Self {
        Clock {
            now: AtomicI64::new(0),
            duration: 1.0,
            next_stamp: AtomicI64::new(1),
        }
    }
    
    /// Get the current time
    pub fn now(&self) -> Instant {
        self.now.load(Ordering::Relaxed)
    }

    /// Get the duration of each cycle
    pub fn dur(&self) -> f32 {
        self.duration
    }

    /// Advance the time by one step and return the new time
    pub fn next(&self) -> Instant {
        self.now.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Advance the time by one step and return the new stamp
    pub fn next_stamp(&self) -> u64 {
        self.next_stamp.fetch_add(1, Ordering::Relaxed) as u64
    }

    /// Reset the time to 0
    pub fn reset(&self) {
        self.now.store(0, Ordering::Relaxed);
        self.next_stamp.store(1, Ordering::Relaxed);
    }

    /// Get relative occurrence time for a tense
    pub fn relative_occurrence(&self, tense: i64) -> Instant {
        match tense {
            t if t >= 0 => t, // Absolute time
            -1 => self.now.load(Ordering::Relaxed), // Eternal
            _ => self.now.load(Ordering::Relaxed) + tense, // Relative
        }
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_creation() {
        let time = Clock::new();
        assert_eq!(time.now(), 0);
        assert_eq!(time.dur(), 1.0);
    }

    #[test]
    fn test_time_next() {
        let time = Clock::new();
        assert_eq!(time.next(), 1);
        assert_eq!(time.now(), 1);
        assert_eq!(time.next(), 2);
        assert_eq!(time.now(), 2);
    }

    #[test]
    fn test_time_reset() {
        let time = Clock::new();
        time.next(); // Advance to 1
        assert_eq!(time.now(), 1);
        
        time.reset();
        assert_eq!(time.now(), 0);
    }

    #[test]
    fn test_next_stamp() {
        let time = Clock::new();
        let stamp1 = time.next_stamp();
        let stamp2 = time.next_stamp();
        
        assert_eq!(stamp1, 1);
        assert_eq!(stamp2, 2);
    }
    
    #[test]
    fn test_relative_occurrence() {
        let time = Clock::new();
        time.now.store(10, Ordering::Relaxed);
        
        // Absolute time
        assert_eq!(time.relative_occurrence(5), 5);
        
        // Eternal time
        assert_eq!(time.relative_occurrence(-1), 10);
        
        // Relative time
        assert_eq!(time.relative_occurrence(-2), 8);
        assert_eq!(time.relative_occurrence(2), 2);
    }
}
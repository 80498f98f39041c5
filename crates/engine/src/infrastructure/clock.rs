//! Clock and random implementations.

use crate::infrastructure::ports::{ClockPort, RandomPort};
use chrono::{DateTime, Utc};

/// System clock - uses real time.
pub struct SystemClock;

impl SystemClock {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ClockPort for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// System random - uses real randomness.
pub struct SystemRandom;

impl SystemRandom {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SystemRandom {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomPort for SystemRandom {
    fn gen_range(&self, min: i32, max: i32) -> i32 {
        use rand::Rng;
        rand::thread_rng().gen_range(min..=max)
    }
}

/// Fixed clock for testing.
#[cfg(test)]
pub struct FixedClock(pub DateTime<Utc>);

#[cfg(test)]
impl ClockPort for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Fixed random for testing.
#[cfg(test)]
pub struct FixedRandom(pub i32);

#[cfg(test)]
impl RandomPort for FixedRandom {
    fn gen_range(&self, _min: i32, _max: i32) -> i32 {
        self.0
    }
}

/// Replays a fixed sequence of draws, then repeats the last one.
#[cfg(test)]
pub struct SequenceRandom {
    values: std::sync::Mutex<std::collections::VecDeque<i32>>,
    last: std::sync::atomic::AtomicI32,
}

#[cfg(test)]
impl SequenceRandom {
    pub fn new(values: impl IntoIterator<Item = i32>) -> Self {
        Self {
            values: std::sync::Mutex::new(values.into_iter().collect()),
            last: std::sync::atomic::AtomicI32::new(1),
        }
    }
}

#[cfg(test)]
impl RandomPort for SequenceRandom {
    fn gen_range(&self, _min: i32, _max: i32) -> i32 {
        use std::sync::atomic::Ordering;
        let next = self.values.lock().unwrap().pop_front();
        match next {
            Some(value) => {
                self.last.store(value, Ordering::SeqCst);
                value
            }
            None => self.last.load(Ordering::SeqCst),
        }
    }
}

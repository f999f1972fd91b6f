//! Session id allocation.
//!
//! Ids pack epoch-milliseconds above a 16-bit sequence, allocated through
//! a single CAS loop so concurrent creates within the same millisecond
//! never collide. If a millisecond's sequence space is exhausted the state
//! rolls into the next millisecond, which keeps ids unique and strictly
//! increasing without ever spinning.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

const SEQUENCE_BITS: u32 = 16;

/// Opaque identifier of one generation session.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct SessionId(u64);

impl SessionId {
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn to_raw(self) -> u64 {
        self.0
    }
}

impl core::fmt::Display for SessionId {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl core::str::FromStr for SessionId {
    type Err = core::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u64>().map(Self)
    }
}

// Session ids travel as JSON strings, matching their path-parameter form.
impl Serialize for SessionId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

/// Process-wide session id allocator.
#[derive(Debug, Default)]
pub struct SessionIdGenerator {
    /// Packed `millis << SEQUENCE_BITS | sequence`.
    state: AtomicU64,
}

impl SessionIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&self) -> SessionId {
        loop {
            let prev = self.state.load(Ordering::Acquire);
            let now = current_millis();
            let next = if now > (prev >> SEQUENCE_BITS) {
                now << SEQUENCE_BITS
            } else {
                prev + 1
            };

            if self
                .state
                .compare_exchange(prev, next, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
            {
                return SessionId(next);
            }
        }
    }
}

fn current_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

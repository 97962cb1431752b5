//! Identifier allocation for clients and messages
//!
//! Ids look like `C1-74999` / `M1-10432`: a family prefix and a five digit
//! number in `[10000, 99999)`. The number space is small, so allocation goes
//! through a [`CollisionPolicy`] that decides what happens when a generator
//! hands back an id that is already taken.

use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

use parking_lot::Mutex;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{DeskError, Result};

const ID_MIN: u32 = 10_000;
const ID_MAX: u32 = 99_999;

/// Id family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IdPrefix {
    Client,
    Message,
}

impl IdPrefix {
    pub fn as_str(&self) -> &'static str {
        match self {
            IdPrefix::Client => "C1",
            IdPrefix::Message => "M1",
        }
    }

    /// Format a number as an id of this family
    pub fn format(&self, n: u32) -> String {
        format!("{}-{:05}", self.as_str(), n)
    }
}

impl fmt::Display for IdPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source of candidate ids.
///
/// Generators only propose; uniqueness is enforced by the store through
/// [`allocate`].
pub trait IdGenerator: Send + Sync {
    fn next(&self, prefix: IdPrefix) -> String;
}

/// Uniform random five digit ids
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomIdGenerator;

impl IdGenerator for RandomIdGenerator {
    fn next(&self, prefix: IdPrefix) -> String {
        let n = rand::thread_rng().gen_range(ID_MIN..ID_MAX);
        prefix.format(n)
    }
}

/// Monotonic counter per prefix, starting at 10000.
///
/// Wraps back to 10000 once the five digit space is used up.
#[derive(Debug, Default)]
pub struct SequentialIdGenerator {
    clients: AtomicU32,
    messages: AtomicU32,
}

impl SequentialIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next(&self, prefix: IdPrefix) -> String {
        let counter = match prefix {
            IdPrefix::Client => &self.clients,
            IdPrefix::Message => &self.messages,
        };
        let n = counter.fetch_add(1, Ordering::Relaxed) % (ID_MAX - ID_MIN);
        prefix.format(ID_MIN + n)
    }
}

/// Hands out a fixed script of ids, then falls back to a sequential counter.
///
/// Mostly useful to force collisions.
#[derive(Debug, Default)]
pub struct ScriptedIdGenerator {
    script: Mutex<VecDeque<String>>,
    fallback: SequentialIdGenerator,
}

impl ScriptedIdGenerator {
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            script: Mutex::new(ids.into_iter().map(Into::into).collect()),
            fallback: SequentialIdGenerator::new(),
        }
    }

    /// Ids left in the script
    pub fn remaining(&self) -> usize {
        self.script.lock().len()
    }
}

impl IdGenerator for ScriptedIdGenerator {
    fn next(&self, prefix: IdPrefix) -> String {
        match self.script.lock().pop_front() {
            Some(id) => id,
            None => self.fallback.next(prefix),
        }
    }
}

/// What to do when a generated id is already in use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "policy")]
pub enum CollisionPolicy {
    /// Keep the first candidate; the new record replaces the existing one.
    Overwrite,
    /// Draw again until an unused id turns up, failing after `max_attempts`.
    Retry { max_attempts: u32 },
}

impl Default for CollisionPolicy {
    fn default() -> Self {
        CollisionPolicy::Retry { max_attempts: 16 }
    }
}

/// Allocate an id of the given family under `policy`.
///
/// `is_taken` reports whether a candidate already names a stored record.
pub fn allocate(
    generator: &dyn IdGenerator,
    prefix: IdPrefix,
    policy: CollisionPolicy,
    is_taken: impl Fn(&str) -> bool,
) -> Result<String> {
    match policy {
        CollisionPolicy::Overwrite => {
            let id = generator.next(prefix);
            if is_taken(&id) {
                warn!("Id {} already in use, existing record will be replaced", id);
            }
            Ok(id)
        }
        CollisionPolicy::Retry { max_attempts } => {
            for attempt in 1..=max_attempts {
                let id = generator.next(prefix);
                if !is_taken(&id) {
                    return Ok(id);
                }
                debug!("Id {} collided (attempt {}/{})", id, attempt, max_attempts);
            }
            Err(DeskError::IdSpaceExhausted {
                prefix,
                attempts: max_attempts,
            })
        }
    }
}

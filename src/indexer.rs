//! Identity allocation for networks, neurons and connections.
//!
//! The [`Indexer`] issues unique, monotonically increasing integer keys
//! per entity category. It is an explicit, injectable service rather
//! than ambient global state, so networks can be constructed in
//! isolation with deterministic identities. Counters are atomic, which
//! makes a shared `&Indexer` safe to use from concurrent constructors.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::NetError;

/// Entity categories with independent key counters.
///
/// The set is closed; no ordering guarantee holds across categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Neuron keys, unique within a process.
    Neuron,
    /// Layer keys.
    Layer,
    /// Network keys.
    Network,
    /// Synapse keys.
    Synapse,
    /// Gate keys.
    Gate,
}

impl Category {
    /// All allocator categories.
    pub const ALL: [Self; 5] = [
        Self::Neuron,
        Self::Layer,
        Self::Network,
        Self::Synapse,
        Self::Gate,
    ];

    /// Stable lowercase name of this category.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Neuron => "neuron",
            Self::Layer => "layer",
            Self::Network => "network",
            Self::Synapse => "synapse",
            Self::Gate => "gate",
        }
    }

    const fn index(self) -> usize {
        match self {
            Self::Neuron => 0,
            Self::Layer => 1,
            Self::Network => 2,
            Self::Synapse => 3,
            Self::Gate => 4,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = NetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| NetError::InvalidCategory(s.to_owned()))
    }
}

/// Per-category counter service.
///
/// Each category starts at 0 and increases strictly by one per call to
/// [`next_id`](Self::next_id). [`reset`](Self::reset) restarts a single
/// category without touching the others.
#[derive(Debug, Default)]
pub struct Indexer {
    counters: [AtomicU64; Category::ALL.len()],
}

impl Indexer {
    /// Create an indexer with every category at 0.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the next key in the given category.
    pub fn next_id(&self, category: Category) -> u64 {
        self.counters[category.index()].fetch_add(1, Ordering::Relaxed)
    }

    /// Restart the counter of the given category at 0.
    pub fn reset(&self, category: Category) {
        self.counters[category.index()].store(0, Ordering::Relaxed);
    }
}

//! Weighted directed edges between neurons.
//!
//! Two edge kinds share one representation: *synapses* carry a source
//! neuron's current value forward within a pass, while *gates* are
//! recurrent links that resolve against a prior time step and are
//! therefore excluded from activation-order computation. Edges live in
//! per-kind arenas owned by the network; neurons hold [`EdgeId`] handles
//! rather than references, so removal can never dangle.

use std::fmt;

use slotmap::new_key_type;

new_key_type! {
    /// Arena handle for a connection.
    ///
    /// Handles are generational, so a stale id from a removed edge is
    /// detected instead of aliasing a newer edge in the same slot.
    pub struct EdgeId;
}

/// The two edge namespaces of a network.
///
/// A neuron pair may hold one synapse and one gate simultaneously; the
/// duplicate check applies within a kind only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionKind {
    /// Forward, feedforward-safe edge.
    Synapse,
    /// Recurrent, time-shifted edge.
    Gate,
}

impl fmt::Display for ConnectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Synapse => "synapse",
            Self::Gate => "gate",
        })
    }
}

/// A weighted directed edge between two neurons.
///
/// Endpoints are stored by neuron key; the edge owns neither. Which
/// kind an edge is follows from the arena that holds it.
#[derive(Debug, Clone, PartialEq)]
pub struct Connection {
    /// Key of the source neuron.
    pub from: u64,
    /// Key of the destination neuron.
    pub to: u64,
    /// Connection weight.
    pub weight: f64,
}

impl Connection {
    /// Create an edge from `from` to `to` with the given weight.
    #[must_use]
    pub const fn new(from: u64, to: u64, weight: f64) -> Self {
        Self { from, to, weight }
    }
}

impl fmt::Display for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "from {} to {} (w: {})", self.from, self.to, self.weight)
    }
}

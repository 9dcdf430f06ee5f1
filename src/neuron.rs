//! Computational nodes of a network.
//!
//! A neuron owns its bias and its activation/aggregation functions, a
//! growing history of activation values for the current pass, and
//! per-kind adjacency lists of [`EdgeId`] handles into the network's
//! connection arenas. The arithmetic of an activation step lives in the
//! network sweep, which can read other neurons' histories; the neuron
//! itself is plain state.

use std::fmt;
use std::str::FromStr;

use crate::activation::Activation;
use crate::aggregation::Aggregation;
use crate::connection::{ConnectionKind, EdgeId};
use crate::error::NetError;
use crate::indexer::{Category, Indexer};

/// Role of a neuron, fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NeuronRole {
    /// Receives one feature value per pass, bypassing activation.
    Input,
    /// Internal node.
    Hidden,
    /// Node whose latest value forms the network output.
    Output,
}

impl NeuronRole {
    /// All neuron roles.
    pub const ALL: [Self; 3] = [Self::Input, Self::Hidden, Self::Output];

    /// Stable lowercase name of this role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Input => "input",
            Self::Hidden => "hidden",
            Self::Output => "output",
        }
    }
}

impl fmt::Display for NeuronRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NeuronRole {
    type Err = NetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| NetError::InvalidNeuronType(s.to_owned()))
    }
}

/// Incoming and outgoing edge handles of one kind.
#[derive(Debug, Clone, Default)]
pub struct Adjacency {
    /// Edges whose destination is this neuron.
    pub incoming: Vec<EdgeId>,
    /// Edges whose source is this neuron.
    pub outgoing: Vec<EdgeId>,
}

/// A single neuron.
///
/// The key and role are immutable after construction; bias and the two
/// functions stay freely mutable so external topology builders can tune
/// them in place.
#[derive(Debug, Clone)]
pub struct Neuron {
    key: u64,
    role: NeuronRole,
    /// Bias added to the aggregated input.
    pub bias: f64,
    /// Activation function applied to the biased aggregate.
    pub activation: Activation,
    /// Reducer over incoming weighted values.
    pub aggregation: Aggregation,
    state: Vec<f64>,
    synapses: Adjacency,
    gates: Adjacency,
}

impl Neuron {
    /// Create a neuron with a fresh key from the indexer.
    ///
    /// Defaults: bias 0, linear activation, sum aggregation.
    #[must_use]
    pub fn new(indexer: &Indexer, role: NeuronRole) -> Self {
        Self {
            key: indexer.next_id(Category::Neuron),
            role,
            bias: 0.0,
            activation: Activation::Linear,
            aggregation: Aggregation::Sum,
            state: Vec::new(),
            synapses: Adjacency::default(),
            gates: Adjacency::default(),
        }
    }

    /// Set the bias, builder style.
    #[must_use]
    pub fn with_bias(mut self, bias: f64) -> Self {
        self.bias = bias;
        self
    }

    /// Set the activation function, builder style.
    #[must_use]
    pub fn with_activation(mut self, activation: Activation) -> Self {
        self.activation = activation;
        self
    }

    /// Set the aggregation function, builder style.
    #[must_use]
    pub fn with_aggregation(mut self, aggregation: Aggregation) -> Self {
        self.aggregation = aggregation;
        self
    }

    /// Key of this neuron, unique within its allocator's namespace.
    #[must_use]
    pub const fn key(&self) -> u64 {
        self.key
    }

    /// Role of this neuron. There is no setter.
    #[must_use]
    pub const fn role(&self) -> NeuronRole {
        self.role
    }

    /// Activation history of the current pass, oldest first.
    #[must_use]
    pub fn state(&self) -> &[f64] {
        &self.state
    }

    /// Most recent activation value, if any.
    #[must_use]
    pub fn latest(&self) -> Option<f64> {
        self.state.last().copied()
    }

    /// Clear the activation history (start of a pass).
    pub fn clear_state(&mut self) {
        self.state.clear();
    }

    pub(crate) fn push_state(&mut self, value: f64) {
        self.state.push(value);
    }

    /// Edge handles of the given kind touching this neuron.
    #[must_use]
    pub fn adjacency(&self, kind: ConnectionKind) -> &Adjacency {
        match kind {
            ConnectionKind::Synapse => &self.synapses,
            ConnectionKind::Gate => &self.gates,
        }
    }

    pub(crate) fn adjacency_mut(&mut self, kind: ConnectionKind) -> &mut Adjacency {
        match kind {
            ConnectionKind::Synapse => &mut self.synapses,
            ConnectionKind::Gate => &mut self.gates,
        }
    }
}

impl fmt::Display for Neuron {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "neuron {} ({}, bias {:.4}, {}/{}, in {}, out {})",
            self.key,
            self.role,
            self.bias,
            self.activation.name(),
            self.aggregation.name(),
            self.synapses.incoming.len(),
            self.synapses.outgoing.len(),
        )
    }
}

//! Error conditions surfaced by the network core.
//!
//! Every fallible operation in this crate reports one of these variants
//! synchronously to its direct caller. Failed operations never leave the
//! network partially mutated: the neuron map, the connection arenas, and
//! the per-neuron adjacency lists always agree.

use thiserror::Error;

use crate::connection::ConnectionKind;

/// Unified error type for all network operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NetError {
    /// A category name outside the closed allocator set was parsed.
    #[error("invalid category: {0:?}")]
    InvalidCategory(String),

    /// A neuron role name outside input/hidden/output was parsed.
    #[error("invalid neuron type: {0:?}")]
    InvalidNeuronType(String),

    /// An edge of this kind already exists between the ordered pair.
    #[error("{kind} already present from neuron {from} to neuron {to}")]
    AlreadyConnected {
        /// Which edge namespace the duplicate was found in.
        kind: ConnectionKind,
        /// Key of the source neuron.
        from: u64,
        /// Key of the destination neuron.
        to: u64,
    },

    /// A neuron with this key is already registered in the network.
    #[error("neuron {0} is already present")]
    NeuronAlreadyExists(u64),

    /// No neuron with this key is registered in the network.
    #[error("neuron {0} is not present")]
    NeuronNotFound(u64),

    /// The edge handle does not name a live connection of this kind.
    ///
    /// Typically the result of removing the same edge twice.
    #[error("no such {0} connection")]
    ConnectionNotFound(ConnectionKind),

    /// The input vector length does not match the number of input neurons.
    #[error("network requires {expected} features, {got} provided")]
    FeatureMismatch {
        /// Number of registered input neurons.
        expected: usize,
        /// Length of the feature vector that was passed.
        got: usize,
    },

    /// The forward subgraph (gates excluded) contains a cycle, so no
    /// activation order exists.
    #[error("forward topology contains a cycle; activation order is undefined")]
    CyclicTopology,
}

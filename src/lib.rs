//! # Evonet
//!
//! A neural-network substrate with arbitrary directed connectivity,
//! built for networks whose topology is assembled and rewired at
//! runtime rather than declared up front.
//!
//! ## Features
//!
//! - **Arena-Graph Model**: neurons keyed by allocator-issued ids,
//!   connections in `SlotMap` arenas with generational handles
//! - **Two Edge Kinds**: forward *synapses* drive activation order,
//!   recurrent *gates* resolve against the previous time step and never
//!   constrain ordering
//! - **Layered Execution**: activation order is derived per topology via
//!   longest-path layering over the forward subgraph, cached until the
//!   structure changes
//! - **Feedforward and Recurrent Modes**: one structure, two execution
//!   rules; recurrent networks keep full per-pass histories
//!
//! ## Quick Start
//!
//! ```rust
//! use evonet::{Activation, Indexer, Network, Neuron, NeuronRole};
//!
//! let indexer = Indexer::new();
//! let mut net = Network::feedforward(&indexer);
//!
//! let x = net.add_neuron(Neuron::new(&indexer, NeuronRole::Input))?;
//! let h = net.add_neuron(
//!     Neuron::new(&indexer, NeuronRole::Hidden).with_activation(Activation::Tanh),
//! )?;
//! let y = net.add_neuron(
//!     Neuron::new(&indexer, NeuronRole::Output).with_activation(Activation::Sigmoid),
//! )?;
//!
//! net.add_synapse(x, h, 0.5)?;
//! net.add_synapse(h, y, 1.5)?;
//!
//! let output = net.activate(&[1.0])?;
//! assert_eq!(output.len(), 1);
//! # Ok::<(), evonet::NetError>(())
//! ```
//!
//! ## Architecture
//!
//! ### Identity Allocation
//!
//! An [`Indexer`] hands out sequential ids per entity category from
//! atomic counters. It is a plain value passed by reference, not a
//! global, so independent substrates never share a namespace and tests
//! can reset freely.
//!
//! ### Ordering
//!
//! Layers are computed with Kahn's algorithm using longest-path
//! relaxation over synapses only; a cycle among synapses is reported as
//! [`NetError::CyclicTopology`] before any neuron state is touched.
//! Cycles through gates are legal by construction.
//!
//! ### Arena-Graph Model
//!
//! Connections live in flat `SlotMap` buffers and neurons hold handles,
//! never references. Stale handles from removed edges are detected
//! instead of aliasing a newer edge in the same slot.

pub mod activation;
pub mod aggregation;
pub mod connection;
pub mod error;
pub mod indexer;
pub mod layering;
pub mod network;
pub mod neuron;

// Re-exports for convenience
pub use activation::Activation;
pub use aggregation::Aggregation;
pub use connection::{Connection, ConnectionKind, EdgeId};
pub use error::NetError;
pub use indexer::{Category, Indexer};
pub use layering::Topology;
pub use network::{Network, NetworkMode};
pub use neuron::{Adjacency, Neuron, NeuronRole};

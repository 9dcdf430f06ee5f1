//! Network orchestration: topology mutation and synchronous activation.
//!
//! A [`Network`] owns its neurons and both connection arenas, computes
//! the activation-order layers lazily (cached until the topology
//! changes), and drives one synchronous pass per feature vector. Every
//! mutating operation either fully succeeds or leaves the neuron map,
//! the arenas and the adjacency lists exactly as they were.

use std::collections::BTreeMap;
use std::fmt;

use log::{debug, trace};
use slotmap::SlotMap;

use crate::connection::{Connection, ConnectionKind, EdgeId};
use crate::error::NetError;
use crate::indexer::{Category, Indexer};
use crate::layering::Topology;
use crate::neuron::{Neuron, NeuronRole};

/// Execution mode of a network.
///
/// The mode fixes how a neuron computes its value during a sweep; it is
/// chosen at construction and never changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkMode {
    /// Acyclic execution: each neuron fires once per pass, reading the
    /// single fresh value of each forward predecessor.
    Feedforward,
    /// Time-stepped execution: neurons keep a full history and consume
    /// gate-fed values from the previous step.
    Recurrent,
}

impl fmt::Display for NetworkMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Feedforward => "feedforward",
            Self::Recurrent => "recurrent",
        })
    }
}

/// A neural network with arbitrary directed topology.
///
/// Neurons are keyed by their allocator-issued id; connections live in
/// per-kind slotmap arenas and are referenced from exactly three places:
/// the arena, the source neuron's outgoing list and the destination
/// neuron's incoming list. Gate edges form a separate namespace from
/// synapses and never participate in activation ordering.
#[derive(Debug)]
pub struct Network {
    key: u64,
    mode: NetworkMode,
    neurons: BTreeMap<u64, Neuron>,
    synapses: SlotMap<EdgeId, Connection>,
    gates: SlotMap<EdgeId, Connection>,
    /// Input neuron keys in registration order; feature i feeds input i.
    input_keys: Vec<u64>,
    /// Output neuron keys in registration order; the output vector of a
    /// pass follows this order.
    output_keys: Vec<u64>,
    layers: Option<Vec<Vec<u64>>>,
}

impl Network {
    fn new(indexer: &Indexer, mode: NetworkMode) -> Self {
        Self {
            key: indexer.next_id(Category::Network),
            mode,
            neurons: BTreeMap::new(),
            synapses: SlotMap::with_key(),
            gates: SlotMap::with_key(),
            input_keys: Vec::new(),
            output_keys: Vec::new(),
            layers: None,
        }
    }

    /// Create an empty feedforward network.
    #[must_use]
    pub fn feedforward(indexer: &Indexer) -> Self {
        Self::new(indexer, NetworkMode::Feedforward)
    }

    /// Create an empty recurrent network.
    #[must_use]
    pub fn recurrent(indexer: &Indexer) -> Self {
        Self::new(indexer, NetworkMode::Recurrent)
    }

    /// Key of this network.
    #[must_use]
    pub const fn key(&self) -> u64 {
        self.key
    }

    /// Execution mode of this network.
    #[must_use]
    pub const fn mode(&self) -> NetworkMode {
        self.mode
    }

    /// Look up a neuron by key.
    #[must_use]
    pub fn neuron(&self, key: u64) -> Option<&Neuron> {
        self.neurons.get(&key)
    }

    /// Mutable access to a neuron (bias and function tuning).
    pub fn neuron_mut(&mut self, key: u64) -> Option<&mut Neuron> {
        self.neurons.get_mut(&key)
    }

    /// Iterate over all neurons in ascending key order.
    pub fn neurons(&self) -> impl Iterator<Item = &Neuron> {
        self.neurons.values()
    }

    /// Number of input neurons.
    #[must_use]
    pub fn num_inputs(&self) -> usize {
        self.input_keys.len()
    }

    /// Number of output neurons.
    #[must_use]
    pub fn num_outputs(&self) -> usize {
        self.output_keys.len()
    }

    /// Number of hidden neurons.
    #[must_use]
    pub fn num_hiddens(&self) -> usize {
        self.neurons.len() - self.input_keys.len() - self.output_keys.len()
    }

    /// Number of synapses.
    #[must_use]
    pub fn num_synapses(&self) -> usize {
        self.synapses.len()
    }

    /// Number of gates.
    #[must_use]
    pub fn num_gates(&self) -> usize {
        self.gates.len()
    }

    /// Look up a connection by kind and handle.
    #[must_use]
    pub fn connection(&self, kind: ConnectionKind, id: EdgeId) -> Option<&Connection> {
        self.arena(kind).get(id)
    }

    /// Change the weight of an existing connection.
    ///
    /// Weights do not affect activation order, so the layer cache
    /// survives this call.
    ///
    /// # Errors
    ///
    /// [`NetError::ConnectionNotFound`] if the handle is stale.
    pub fn set_weight(
        &mut self,
        kind: ConnectionKind,
        id: EdgeId,
        weight: f64,
    ) -> Result<(), NetError> {
        match self.arena_mut(kind).get_mut(id) {
            Some(conn) => {
                conn.weight = weight;
                Ok(())
            }
            None => Err(NetError::ConnectionNotFound(kind)),
        }
    }

    /// Register a neuron and return its key.
    ///
    /// # Errors
    ///
    /// [`NetError::NeuronAlreadyExists`] if the key is taken; nothing is
    /// mutated in that case.
    pub fn add_neuron(&mut self, neuron: Neuron) -> Result<u64, NetError> {
        let key = neuron.key();
        if self.neurons.contains_key(&key) {
            return Err(NetError::NeuronAlreadyExists(key));
        }
        match neuron.role() {
            NeuronRole::Input => self.input_keys.push(key),
            NeuronRole::Output => self.output_keys.push(key),
            NeuronRole::Hidden => {}
        }
        self.neurons.insert(key, neuron);
        self.layers = None;
        Ok(key)
    }

    /// Remove a neuron together with every incident synapse and gate.
    ///
    /// All three views (arena, source outgoing list, destination
    /// incoming list) of each incident edge are detached atomically.
    ///
    /// # Errors
    ///
    /// [`NetError::NeuronNotFound`] if the key is not registered.
    pub fn sub_neuron(&mut self, key: u64) -> Result<Neuron, NetError> {
        let neuron = self
            .neurons
            .remove(&key)
            .ok_or(NetError::NeuronNotFound(key))?;

        for kind in [ConnectionKind::Synapse, ConnectionKind::Gate] {
            let adjacency = neuron.adjacency(kind);
            let incident: Vec<EdgeId> = adjacency
                .outgoing
                .iter()
                .chain(adjacency.incoming.iter())
                .copied()
                .collect();
            for edge in incident {
                // A self-loop appears in both lists; the second removal
                // is a no-op.
                if let Some(conn) = self.arena_mut(kind).remove(edge) {
                    let other = if conn.from == key { conn.to } else { conn.from };
                    if let Some(endpoint) = self.neurons.get_mut(&other) {
                        let lists = endpoint.adjacency_mut(kind);
                        lists.incoming.retain(|&e| e != edge);
                        lists.outgoing.retain(|&e| e != edge);
                    }
                }
            }
        }

        self.input_keys.retain(|&k| k != key);
        self.output_keys.retain(|&k| k != key);
        self.layers = None;
        Ok(neuron)
    }

    /// Connect two neurons with a forward synapse.
    ///
    /// # Errors
    ///
    /// [`NetError::NeuronNotFound`] if either endpoint is missing,
    /// [`NetError::AlreadyConnected`] if a synapse between this ordered
    /// pair already exists. On error nothing is mutated.
    pub fn add_synapse(&mut self, from: u64, to: u64, weight: f64) -> Result<EdgeId, NetError> {
        self.connect(ConnectionKind::Synapse, from, to, weight)
    }

    /// Connect two neurons with a recurrent gate.
    ///
    /// Gates carry the destination's previous-step value and are ignored
    /// by the ordering engine; they only influence recurrent execution.
    ///
    /// # Errors
    ///
    /// Same conditions as [`add_synapse`](Self::add_synapse), within the
    /// gate namespace.
    pub fn add_gate(&mut self, from: u64, to: u64, weight: f64) -> Result<EdgeId, NetError> {
        self.connect(ConnectionKind::Gate, from, to, weight)
    }

    /// Remove a synapse.
    ///
    /// # Errors
    ///
    /// [`NetError::ConnectionNotFound`] if the handle is stale (for
    /// example, removed twice).
    pub fn sub_synapse(&mut self, id: EdgeId) -> Result<Connection, NetError> {
        self.disconnect(ConnectionKind::Synapse, id)
    }

    /// Remove a gate.
    ///
    /// # Errors
    ///
    /// [`NetError::ConnectionNotFound`] if the handle is stale.
    pub fn sub_gate(&mut self, id: EdgeId) -> Result<Connection, NetError> {
        self.disconnect(ConnectionKind::Gate, id)
    }

    /// Uniform connection factory for both edge kinds.
    fn connect(
        &mut self,
        kind: ConnectionKind,
        from: u64,
        to: u64,
        weight: f64,
    ) -> Result<EdgeId, NetError> {
        if !self.neurons.contains_key(&from) {
            return Err(NetError::NeuronNotFound(from));
        }
        if !self.neurons.contains_key(&to) {
            return Err(NetError::NeuronNotFound(to));
        }

        let arena = self.arena(kind);
        let duplicate = self.neurons[&from]
            .adjacency(kind)
            .outgoing
            .iter()
            .filter_map(|&edge| arena.get(edge))
            .any(|conn| conn.to == to);
        if duplicate {
            return Err(NetError::AlreadyConnected { kind, from, to });
        }

        let id = self.arena_mut(kind).insert(Connection::new(from, to, weight));
        if let Some(source) = self.neurons.get_mut(&from) {
            source.adjacency_mut(kind).outgoing.push(id);
        }
        if let Some(dest) = self.neurons.get_mut(&to) {
            dest.adjacency_mut(kind).incoming.push(id);
        }
        if kind == ConnectionKind::Synapse {
            self.layers = None;
        }
        Ok(id)
    }

    /// Symmetric detach: arena plus both endpoint adjacency lists.
    fn disconnect(&mut self, kind: ConnectionKind, id: EdgeId) -> Result<Connection, NetError> {
        let conn = self
            .arena_mut(kind)
            .remove(id)
            .ok_or(NetError::ConnectionNotFound(kind))?;
        if let Some(source) = self.neurons.get_mut(&conn.from) {
            source.adjacency_mut(kind).outgoing.retain(|&e| e != id);
        }
        if let Some(dest) = self.neurons.get_mut(&conn.to) {
            dest.adjacency_mut(kind).incoming.retain(|&e| e != id);
        }
        if kind == ConnectionKind::Synapse {
            self.layers = None;
        }
        Ok(conn)
    }

    fn arena(&self, kind: ConnectionKind) -> &SlotMap<EdgeId, Connection> {
        match kind {
            ConnectionKind::Synapse => &self.synapses,
            ConnectionKind::Gate => &self.gates,
        }
    }

    fn arena_mut(&mut self, kind: ConnectionKind) -> &mut SlotMap<EdgeId, Connection> {
        match kind {
            ConnectionKind::Synapse => &mut self.synapses,
            ConnectionKind::Gate => &mut self.gates,
        }
    }

    /// The activation-order partition of the current topology.
    ///
    /// Computed lazily from the forward subgraph (gates excluded) and
    /// cached until a neuron or synapse is added or removed.
    ///
    /// # Errors
    ///
    /// [`NetError::CyclicTopology`] if the forward subgraph has a cycle.
    pub fn layers(&mut self) -> Result<&[Vec<u64>], NetError> {
        self.ensure_layers()?;
        Ok(self.layers.as_deref().unwrap_or_default())
    }

    fn ensure_layers(&mut self) -> Result<(), NetError> {
        if self.layers.is_none() {
            let keys: Vec<u64> = self.neurons.keys().copied().collect();
            let edges: Vec<(u64, u64)> = self
                .synapses
                .values()
                .map(|conn| (conn.from, conn.to))
                .collect();
            let topology = Topology::new(&keys, &edges);
            let layers = topology.layers(&self.output_keys)?;
            debug!(
                "network {}: layered {} neurons into {} groups",
                self.key,
                keys.len(),
                layers.len()
            );
            self.layers = Some(layers);
        }
        Ok(())
    }

    /// Run one synchronous activation pass.
    ///
    /// Clears all histories, feeds `features` into the input neurons in
    /// registration order, sweeps the layers, and returns the latest
    /// value of every output neuron **in registration order** — this
    /// output ordering is part of the public contract.
    ///
    /// # Errors
    ///
    /// [`NetError::FeatureMismatch`] if the vector length differs from
    /// the number of input neurons, [`NetError::CyclicTopology`] if no
    /// activation order exists. Neither error mutates any history.
    pub fn activate(&mut self, features: &[f64]) -> Result<Vec<f64>, NetError> {
        if features.len() != self.input_keys.len() {
            return Err(NetError::FeatureMismatch {
                expected: self.input_keys.len(),
                got: features.len(),
            });
        }
        // Resolve the order before touching any state, so a cyclic
        // topology fails without side effects.
        self.ensure_layers()?;

        for neuron in self.neurons.values_mut() {
            neuron.clear_state();
        }
        for i in 0..features.len() {
            let key = self.input_keys[i];
            if let Some(input) = self.neurons.get_mut(&key) {
                input.push_state(features[i]);
            }
        }

        trace!("network {}: activation pass started", self.key);
        self.sweep()
    }

    /// Advance the network one more synchronous step without clearing.
    ///
    /// Input neurons keep the values fed by the last
    /// [`activate`](Self::activate); every other neuron appends one more
    /// history entry, so gate terms in a recurrent network now resolve
    /// against the previous step. On a feedforward network this merely
    /// recomputes the same values.
    ///
    /// # Errors
    ///
    /// [`NetError::CyclicTopology`] if no activation order exists.
    pub fn step(&mut self) -> Result<Vec<f64>, NetError> {
        self.ensure_layers()?;
        self.sweep()
    }

    fn sweep(&mut self) -> Result<Vec<f64>, NetError> {
        // Take the cached partition to sidestep aliasing with the
        // per-neuron state writes; it is restored before returning.
        let layers = self.layers.take().unwrap_or_default();
        for layer in &layers {
            for &key in layer {
                let role = match self.neurons.get(&key) {
                    Some(neuron) => neuron.role(),
                    None => continue,
                };
                if role == NeuronRole::Input {
                    continue;
                }
                let value = match self.mode {
                    NetworkMode::Feedforward => self.feedforward_value(key),
                    NetworkMode::Recurrent => self.recurrent_value(key),
                };
                if let Some(neuron) = self.neurons.get_mut(&key) {
                    neuron.push_state(value);
                }
            }
        }
        self.layers = Some(layers);
        Ok(self.read_outputs())
    }

    /// Feedforward rule: weighted first-entry values of fresh forward
    /// predecessors, `[0.0]` when none are live yet.
    fn feedforward_value(&self, key: u64) -> f64 {
        let Some(neuron) = self.neurons.get(&key) else {
            return 0.0;
        };

        let mut values = Vec::new();
        for &edge in &neuron.adjacency(ConnectionKind::Synapse).incoming {
            let Some(synapse) = self.synapses.get(edge) else {
                continue;
            };
            let Some(source) = self.neurons.get(&synapse.from) else {
                continue;
            };
            if let Some(&first) = source.state().first() {
                values.push(first * synapse.weight);
            }
        }
        if values.is_empty() {
            // Bias-only fallback; keeps selective aggregations defined.
            values.push(0.0);
        }

        neuron
            .activation
            .apply(neuron.aggregation.apply(&values) + neuron.bias)
    }

    /// Recurrent rule: weighted latest values of forward predecessors,
    /// plus the sum over outgoing gates of the destination's value at
    /// the step being produced. The gate term is skipped on the first
    /// activation of a pass and per-edge when the destination has not
    /// reached that step.
    fn recurrent_value(&self, key: u64) -> f64 {
        let Some(neuron) = self.neurons.get(&key) else {
            return 0.0;
        };

        let mut values = Vec::new();
        for &edge in &neuron.adjacency(ConnectionKind::Synapse).incoming {
            let Some(synapse) = self.synapses.get(edge) else {
                continue;
            };
            let Some(source) = self.neurons.get(&synapse.from) else {
                continue;
            };
            if let Some(&last) = source.state().last() {
                values.push(last * synapse.weight);
            }
        }

        let mut recurrent = 0.0;
        if let Some(step) = neuron.state().len().checked_sub(1) {
            for &edge in &neuron.adjacency(ConnectionKind::Gate).outgoing {
                let Some(gate) = self.gates.get(edge) else {
                    continue;
                };
                let Some(dest) = self.neurons.get(&gate.to) else {
                    continue;
                };
                if let Some(&past) = dest.state().get(step) {
                    recurrent += past * gate.weight;
                }
            }
        }

        if values.is_empty() {
            values.push(0.0);
        }

        neuron
            .activation
            .apply(neuron.aggregation.apply(&values) + recurrent + neuron.bias)
    }

    fn read_outputs(&self) -> Vec<f64> {
        self.output_keys
            .iter()
            .map(|key| {
                self.neurons
                    .get(key)
                    .and_then(Neuron::latest)
                    .unwrap_or(0.0)
            })
            .collect()
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "network {} ({}, {} in / {} hidden / {} out, {} synapses, {} gates)",
            self.key,
            self.mode,
            self.num_inputs(),
            self.num_hiddens(),
            self.num_outputs(),
            self.synapses.len(),
            self.gates.len(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activation::Activation;
    use crate::aggregation::Aggregation;

    /// Input -> output pair with one synapse, linear/sum everywhere.
    fn linear_pair(weight: f64) -> (Network, u64, u64) {
        let indexer = Indexer::new();
        let mut net = Network::feedforward(&indexer);
        let input = net.add_neuron(Neuron::new(&indexer, NeuronRole::Input)).unwrap();
        let output = net
            .add_neuron(Neuron::new(&indexer, NeuronRole::Output))
            .unwrap();
        net.add_synapse(input, output, weight).unwrap();
        (net, input, output)
    }

    #[test]
    fn test_linear_pair_scales_input() {
        let (mut net, _, _) = linear_pair(2.0);
        let out = net.activate(&[3.0]).unwrap();
        assert_eq!(out.len(), 1);
        assert!((out[0] - 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_sigmoid_output_at_zero() {
        let indexer = Indexer::new();
        let mut net = Network::feedforward(&indexer);
        let input = net.add_neuron(Neuron::new(&indexer, NeuronRole::Input)).unwrap();
        let output = net
            .add_neuron(Neuron::new(&indexer, NeuronRole::Output).with_activation(Activation::Sigmoid))
            .unwrap();
        net.add_synapse(input, output, 1.0).unwrap();

        let out = net.activate(&[0.0]).unwrap();
        assert!((out[0] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_duplicate_synapse_rejected_but_gate_allowed() {
        let indexer = Indexer::new();
        let mut net = Network::recurrent(&indexer);
        let a = net.add_neuron(Neuron::new(&indexer, NeuronRole::Input)).unwrap();
        let b = net.add_neuron(Neuron::new(&indexer, NeuronRole::Output)).unwrap();

        net.add_synapse(a, b, 1.0).unwrap();
        let err = net.add_synapse(a, b, 0.5).unwrap_err();
        assert_eq!(
            err,
            NetError::AlreadyConnected {
                kind: ConnectionKind::Synapse,
                from: a,
                to: b,
            }
        );

        // Same ordered pair, other kind: a distinct namespace.
        net.add_gate(a, b, 1.0).unwrap();
        let err = net.add_gate(a, b, 0.5).unwrap_err();
        assert_eq!(
            err,
            NetError::AlreadyConnected {
                kind: ConnectionKind::Gate,
                from: a,
                to: b,
            }
        );
    }

    #[test]
    fn test_reversed_pair_is_not_a_duplicate() {
        let indexer = Indexer::new();
        let mut net = Network::recurrent(&indexer);
        let a = net.add_neuron(Neuron::new(&indexer, NeuronRole::Hidden)).unwrap();
        let b = net.add_neuron(Neuron::new(&indexer, NeuronRole::Hidden)).unwrap();
        net.add_gate(a, b, 1.0).unwrap();
        net.add_gate(b, a, 1.0).unwrap();
        assert_eq!(net.num_gates(), 2);
    }

    #[test]
    fn test_add_neuron_twice_fails_without_mutation() {
        let indexer = Indexer::new();
        let mut net = Network::feedforward(&indexer);
        let neuron = Neuron::new(&indexer, NeuronRole::Input);
        let copy = neuron.clone();
        net.add_neuron(neuron).unwrap();
        let err = net.add_neuron(copy).unwrap_err();
        assert_eq!(err, NetError::NeuronAlreadyExists(0));
        assert_eq!(net.num_inputs(), 1);
    }

    #[test]
    fn test_connect_unknown_neuron_fails() {
        let indexer = Indexer::new();
        let mut net = Network::feedforward(&indexer);
        let a = net.add_neuron(Neuron::new(&indexer, NeuronRole::Input)).unwrap();
        let err = net.add_synapse(a, 99, 1.0).unwrap_err();
        assert_eq!(err, NetError::NeuronNotFound(99));
        assert_eq!(net.num_synapses(), 0);
    }

    #[test]
    fn test_sub_synapse_detaches_all_three_views() {
        let (mut net, input, output) = linear_pair(1.0);
        let id = net.neuron(input).unwrap().adjacency(ConnectionKind::Synapse).outgoing[0];

        net.sub_synapse(id).unwrap();

        assert_eq!(net.num_synapses(), 0);
        assert!(net
            .neuron(input)
            .unwrap()
            .adjacency(ConnectionKind::Synapse)
            .outgoing
            .is_empty());
        assert!(net
            .neuron(output)
            .unwrap()
            .adjacency(ConnectionKind::Synapse)
            .incoming
            .is_empty());

        // Removing the same edge again is detected, not undefined.
        let err = net.sub_synapse(id).unwrap_err();
        assert_eq!(err, NetError::ConnectionNotFound(ConnectionKind::Synapse));
    }

    #[test]
    fn test_sub_neuron_removes_incident_edges() {
        let indexer = Indexer::new();
        let mut net = Network::recurrent(&indexer);
        let a = net.add_neuron(Neuron::new(&indexer, NeuronRole::Input)).unwrap();
        let b = net.add_neuron(Neuron::new(&indexer, NeuronRole::Hidden)).unwrap();
        let c = net.add_neuron(Neuron::new(&indexer, NeuronRole::Output)).unwrap();
        net.add_synapse(a, b, 1.0).unwrap();
        net.add_synapse(b, c, 1.0).unwrap();
        net.add_gate(c, b, 1.0).unwrap();

        net.sub_neuron(b).unwrap();

        assert_eq!(net.num_synapses(), 0);
        assert_eq!(net.num_gates(), 0);
        assert!(net
            .neuron(a)
            .unwrap()
            .adjacency(ConnectionKind::Synapse)
            .outgoing
            .is_empty());
        assert!(net
            .neuron(c)
            .unwrap()
            .adjacency(ConnectionKind::Synapse)
            .incoming
            .is_empty());
        assert!(net
            .neuron(c)
            .unwrap()
            .adjacency(ConnectionKind::Gate)
            .outgoing
            .is_empty());

        let err = net.sub_neuron(b).unwrap_err();
        assert_eq!(err, NetError::NeuronNotFound(b));
    }

    #[test]
    fn test_feature_mismatch_leaves_state_untouched() {
        let (mut net, input, _) = linear_pair(1.0);
        net.activate(&[1.0]).unwrap();
        assert_eq!(net.neuron(input).unwrap().state(), &[1.0]);

        let err = net.activate(&[1.0, 2.0]).unwrap_err();
        assert_eq!(err, NetError::FeatureMismatch { expected: 1, got: 2 });
        // History from the previous pass is still intact.
        assert_eq!(net.neuron(input).unwrap().state(), &[1.0]);
    }

    #[test]
    fn test_cyclic_forward_topology_fails_activation() {
        let indexer = Indexer::new();
        let mut net = Network::feedforward(&indexer);
        let input = net.add_neuron(Neuron::new(&indexer, NeuronRole::Input)).unwrap();
        let a = net.add_neuron(Neuron::new(&indexer, NeuronRole::Hidden)).unwrap();
        let b = net.add_neuron(Neuron::new(&indexer, NeuronRole::Hidden)).unwrap();
        let output = net.add_neuron(Neuron::new(&indexer, NeuronRole::Output)).unwrap();
        net.add_synapse(input, a, 1.0).unwrap();
        net.add_synapse(a, b, 1.0).unwrap();
        net.add_synapse(b, a, 1.0).unwrap();
        net.add_synapse(b, output, 1.0).unwrap();

        assert_eq!(net.activate(&[1.0]).unwrap_err(), NetError::CyclicTopology);
    }

    #[test]
    fn test_gate_cycle_is_not_a_forward_cycle() {
        let indexer = Indexer::new();
        let mut net = Network::recurrent(&indexer);
        let input = net.add_neuron(Neuron::new(&indexer, NeuronRole::Input)).unwrap();
        let output = net.add_neuron(Neuron::new(&indexer, NeuronRole::Output)).unwrap();
        net.add_synapse(input, output, 1.0).unwrap();
        // Treated as forward, this edge would close a cycle.
        net.add_gate(output, input, 1.0).unwrap();

        let out = net.activate(&[1.0]).unwrap();
        assert!((out[0] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_activation_is_deterministic() {
        let indexer = Indexer::new();
        let mut net = Network::feedforward(&indexer);
        let i0 = net.add_neuron(Neuron::new(&indexer, NeuronRole::Input)).unwrap();
        let i1 = net.add_neuron(Neuron::new(&indexer, NeuronRole::Input)).unwrap();
        let h = net
            .add_neuron(Neuron::new(&indexer, NeuronRole::Hidden).with_activation(Activation::Tanh))
            .unwrap();
        let o = net
            .add_neuron(Neuron::new(&indexer, NeuronRole::Output).with_activation(Activation::Sigmoid))
            .unwrap();
        net.add_synapse(i0, h, 0.3).unwrap();
        net.add_synapse(i1, h, -0.7).unwrap();
        net.add_synapse(h, o, 1.9).unwrap();
        net.add_synapse(i0, o, 0.11).unwrap();

        let first = net.activate(&[0.25, -1.5]).unwrap();
        let second = net.activate(&[0.25, -1.5]).unwrap();
        assert_eq!(first, second, "identical passes must be bit-identical");
    }

    #[test]
    fn test_outputs_follow_registration_order() {
        let indexer = Indexer::new();
        let mut net = Network::feedforward(&indexer);
        let input = net.add_neuron(Neuron::new(&indexer, NeuronRole::Input)).unwrap();
        let o1 = net.add_neuron(Neuron::new(&indexer, NeuronRole::Output)).unwrap();
        let o2 = net.add_neuron(Neuron::new(&indexer, NeuronRole::Output)).unwrap();
        net.add_synapse(input, o1, 2.0).unwrap();
        net.add_synapse(input, o2, 3.0).unwrap();

        let out = net.activate(&[1.0]).unwrap();
        assert_eq!(out, vec![2.0, 3.0]);
        let _ = (o1, o2);
    }

    #[test]
    fn test_isolated_neuron_gets_bias_only_fallback() {
        let indexer = Indexer::new();
        let mut net = Network::feedforward(&indexer);
        net.add_neuron(Neuron::new(&indexer, NeuronRole::Input)).unwrap();
        let output = net
            .add_neuron(
                Neuron::new(&indexer, NeuronRole::Output)
                    .with_bias(0.25)
                    .with_aggregation(Aggregation::Max),
            )
            .unwrap();

        // No synapse at all: aggregation sees the [0.0] substitute.
        let out = net.activate(&[7.0]).unwrap();
        assert!((out[0] - 0.25).abs() < 1e-12);
        let _ = output;
    }

    #[test]
    fn test_layer_cache_is_reused_and_invalidated() {
        let indexer = Indexer::new();
        let mut net = Network::feedforward(&indexer);
        let input = net.add_neuron(Neuron::new(&indexer, NeuronRole::Input)).unwrap();
        let output = net.add_neuron(Neuron::new(&indexer, NeuronRole::Output)).unwrap();
        net.add_synapse(input, output, 1.0).unwrap();

        assert_eq!(net.layers().unwrap(), &[vec![input], vec![output]]);

        let hidden = net.add_neuron(Neuron::new(&indexer, NeuronRole::Hidden)).unwrap();
        net.add_synapse(input, hidden, 1.0).unwrap();
        net.add_synapse(hidden, output, 1.0).unwrap();

        assert_eq!(
            net.layers().unwrap(),
            &[vec![input], vec![hidden], vec![output]]
        );
    }

    #[test]
    fn test_set_weight_survives_layer_cache() {
        let (mut net, input, _) = linear_pair(1.0);
        let id = net.neuron(input).unwrap().adjacency(ConnectionKind::Synapse).outgoing[0];
        net.activate(&[1.0]).unwrap();

        net.set_weight(ConnectionKind::Synapse, id, 5.0).unwrap();
        let out = net.activate(&[2.0]).unwrap();
        assert!((out[0] - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_recurrent_gate_feeds_previous_step() {
        // A -> B synapse (w 1), B -> A gate (w 1), all linear, bias 0.
        let indexer = Indexer::new();
        let mut net = Network::recurrent(&indexer);
        let a = net.add_neuron(Neuron::new(&indexer, NeuronRole::Input)).unwrap();
        let b = net.add_neuron(Neuron::new(&indexer, NeuronRole::Output)).unwrap();
        net.add_synapse(a, b, 1.0).unwrap();
        net.add_gate(b, a, 1.0).unwrap();

        // First step: no prior history, so the gate term is zero.
        let out = net.activate(&[1.0]).unwrap();
        assert!((out[0] - 1.0).abs() < 1e-12);

        // Second step within the pass: B reads A's step-0 value through
        // the gate on top of the fresh forward contribution.
        let out = net.step().unwrap();
        assert!((out[0] - 2.0).abs() < 1e-12);
        assert_eq!(net.neuron(b).unwrap().state(), &[1.0, 2.0]);
    }

    #[test]
    fn test_display_summarizes_structure() {
        let (net, _, _) = linear_pair(1.0);
        let text = net.to_string();
        assert!(text.contains("feedforward"));
        assert!(text.contains("1 in"));
        assert!(text.contains("1 synapses"));
    }
}

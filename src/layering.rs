//! Activation-order computation over the forward subgraph.
//!
//! Given the neuron keys and the forward edges of a network, this module
//! partitions the neurons into ordered layers such that every forward
//! dependency lies in a strictly earlier layer. Gate edges never reach
//! this module: they resolve against the previous time step and cannot
//! constrain activation order.
//!
//! The graph is held in Compressed Sparse Row (CSR) form and edges are
//! sorted before construction, so the result is deterministic regardless
//! of the order in which connections were inserted.

use std::collections::VecDeque;

use crate::error::NetError;

/// CSR snapshot of a network's forward subgraph.
#[derive(Debug, Clone)]
pub struct Topology {
    node_count: usize,
    /// Neuron keys sorted ascending; position doubles as the dense index.
    idx_to_key: Vec<u64>,
    /// CSR offsets for outgoing edges. Length = node_count + 1.
    fwd_offsets: Vec<usize>,
    /// CSR targets, as dense indices.
    fwd_targets: Vec<usize>,
    /// Incoming edge count per dense index.
    in_degree: Vec<usize>,
}

impl Topology {
    /// Build a topology from neuron keys and forward edges.
    ///
    /// Edges whose endpoints are not in `keys` are ignored; the network
    /// never produces such edges, but a caller assembling edge lists by
    /// hand may.
    #[must_use]
    pub fn new(keys: &[u64], edges: &[(u64, u64)]) -> Self {
        let mut idx_to_key = keys.to_vec();
        idx_to_key.sort_unstable();
        idx_to_key.dedup();
        let node_count = idx_to_key.len();

        // Sorted edges give a deterministic CSR layout independent of
        // insertion history.
        let mut edges: Vec<(usize, usize)> = edges
            .iter()
            .filter_map(|&(from, to)| {
                match (
                    idx_to_key.binary_search(&from),
                    idx_to_key.binary_search(&to),
                ) {
                    (Ok(f), Ok(t)) => Some((f, t)),
                    _ => None,
                }
            })
            .collect();
        edges.sort_unstable();

        let mut fwd_counts = vec![0usize; node_count];
        let mut in_degree = vec![0usize; node_count];
        for &(from, to) in &edges {
            fwd_counts[from] += 1;
            in_degree[to] += 1;
        }

        let mut fwd_offsets = Vec::with_capacity(node_count + 1);
        fwd_offsets.push(0);
        for &count in &fwd_counts {
            fwd_offsets.push(fwd_offsets[fwd_offsets.len() - 1] + count);
        }

        let total_edges = fwd_offsets[node_count];
        let mut fwd_targets = vec![0usize; total_edges];
        let mut write_pos = fwd_offsets[..node_count].to_vec();
        for &(from, to) in &edges {
            fwd_targets[write_pos[from]] = to;
            write_pos[from] += 1;
        }

        Self {
            node_count,
            idx_to_key,
            fwd_offsets,
            fwd_targets,
            in_degree,
        }
    }

    /// Number of neurons in the topology.
    #[inline]
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    /// Dense index of a neuron key.
    #[inline]
    #[must_use]
    pub fn node_index(&self, key: u64) -> Option<usize> {
        self.idx_to_key.binary_search(&key).ok()
    }

    /// Iterate over forward successors of a dense index.
    #[inline]
    pub fn successors(&self, idx: usize) -> impl Iterator<Item = usize> + '_ {
        let start = self.fwd_offsets[idx];
        let end = self.fwd_offsets[idx + 1];
        self.fwd_targets[start..end].iter().copied()
    }

    /// Whether the forward subgraph contains a cycle.
    #[must_use]
    pub fn has_cycle(&self) -> bool {
        self.depths().is_err()
    }

    /// Longest-path depth of every neuron, indexed densely.
    ///
    /// Depth is the length of the longest forward-dependency chain
    /// reaching the neuron: sources sit at 0 and a node's depth exceeds
    /// the depth of *every* predecessor, which keeps diamond fan-in
    /// correct regardless of visit order (Kahn's algorithm with
    /// longest-path relaxation).
    ///
    /// # Errors
    ///
    /// [`NetError::CyclicTopology`] if the forward subgraph is not a DAG.
    pub fn depths(&self) -> Result<Vec<u32>, NetError> {
        let mut in_degree = self.in_degree.clone();
        let mut depths = vec![0u32; self.node_count];

        let mut queue: VecDeque<usize> = VecDeque::new();
        for (idx, &deg) in in_degree.iter().enumerate() {
            if deg == 0 {
                queue.push_back(idx);
            }
        }

        let mut processed = 0;
        while let Some(u) = queue.pop_front() {
            processed += 1;
            for v in self.successors(u) {
                let new_depth = depths[u].saturating_add(1);
                if new_depth > depths[v] {
                    depths[v] = new_depth;
                }

                in_degree[v] -= 1;
                if in_degree[v] == 0 {
                    queue.push_back(v);
                }
            }
        }

        if processed == self.node_count {
            Ok(depths)
        } else {
            Err(NetError::CyclicTopology)
        }
    }

    /// Partition the neurons into ordered activation layers.
    ///
    /// Layers group neurons by longest-path depth, so every forward edge
    /// spans strictly increasing layer indices and every neuron appears
    /// exactly once. Output neurons without outgoing forward edges are
    /// placed together in the terminal layer (lifting a sink can never
    /// violate a dependency); an output that feeds other neurons keeps
    /// its natural depth. Within a layer, neurons are listed in
    /// ascending key order.
    ///
    /// # Errors
    ///
    /// [`NetError::CyclicTopology`] if the forward subgraph is not a DAG.
    pub fn layers(&self, output_keys: &[u64]) -> Result<Vec<Vec<u64>>, NetError> {
        let depths = self.depths()?;
        if self.node_count == 0 {
            return Ok(Vec::new());
        }

        let mut is_output = vec![false; self.node_count];
        for &key in output_keys {
            if let Some(idx) = self.node_index(key) {
                is_output[idx] = true;
            }
        }

        // Terminal layer index: one past the deepest non-output neuron,
        // but never below an output's own natural depth (outputs chained
        // to outputs can sit deeper).
        let base = (0..self.node_count)
            .filter(|&i| !is_output[i])
            .map(|i| depths[i])
            .max();
        let max_output = (0..self.node_count)
            .filter(|&i| is_output[i])
            .map(|i| depths[i])
            .max();
        let terminal = match (base, max_output) {
            (Some(b), Some(o)) => (b + 1).max(o),
            (Some(b), None) => b,
            (None, Some(o)) => o,
            (None, None) => 0,
        };

        let mut assigned = vec![0u32; self.node_count];
        for idx in 0..self.node_count {
            let is_sink = self.fwd_offsets[idx] == self.fwd_offsets[idx + 1];
            assigned[idx] = if is_output[idx] && is_sink {
                terminal
            } else {
                depths[idx]
            };
        }

        let mut groups: Vec<Vec<u64>> = vec![Vec::new(); terminal as usize + 1];
        for (idx, &depth) in assigned.iter().enumerate() {
            groups[depth as usize].push(self.idx_to_key[idx]);
        }
        groups.retain(|group| !group.is_empty());
        Ok(groups)
    }
}

//! Benchmarks for evonet.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use evonet::{Indexer, Network, Neuron, NeuronRole, Topology};

/// Layered feedforward network: `width` neurons per hidden layer,
/// `depth` hidden layers, fully connected between adjacent layers.
fn build_dense(indexer: &Indexer, width: usize, depth: usize) -> (Network, usize) {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let mut net = Network::feedforward(indexer);

    let inputs: Vec<u64> = (0..width)
        .map(|_| net.add_neuron(Neuron::new(indexer, NeuronRole::Input)).unwrap())
        .collect();

    let mut prev = inputs;
    for _ in 0..depth {
        let layer: Vec<u64> = (0..width)
            .map(|_| net.add_neuron(Neuron::new(indexer, NeuronRole::Hidden)).unwrap())
            .collect();
        for &from in &prev {
            for &to in &layer {
                net.add_synapse(from, to, rng.random_range(-1.0..1.0)).unwrap();
            }
        }
        prev = layer;
    }

    let output = net.add_neuron(Neuron::new(indexer, NeuronRole::Output)).unwrap();
    for &from in &prev {
        net.add_synapse(from, output, rng.random_range(-1.0..1.0)).unwrap();
    }

    (net, width)
}

fn bench_layering(c: &mut Criterion) {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let node_count = 500u64;
    let keys: Vec<u64> = (0..node_count).collect();
    let mut edges = Vec::new();
    for i in 0..node_count {
        for j in (i + 1)..node_count {
            if rng.random_range(0.0..1.0) < 0.02 {
                edges.push((i, j));
            }
        }
    }

    c.bench_function("layer_500_node_dag", |b| {
        b.iter(|| {
            let topology = Topology::new(black_box(&keys), black_box(&edges));
            black_box(topology.layers(&[node_count - 1]).unwrap());
        });
    });
}

fn bench_activation(c: &mut Criterion) {
    let indexer = Indexer::new();
    let (mut net, width) = build_dense(&indexer, 16, 8);
    let features = vec![0.5; width];

    c.bench_function("activate_dense_16x8", |b| {
        b.iter(|| {
            black_box(net.activate(black_box(&features)).unwrap());
        });
    });
}

fn bench_recurrent_steps(c: &mut Criterion) {
    let indexer = Indexer::new();
    let mut net = Network::recurrent(&indexer);
    let input = net.add_neuron(Neuron::new(&indexer, NeuronRole::Input)).unwrap();
    let mut prev = input;
    for _ in 0..32 {
        let hidden = net.add_neuron(Neuron::new(&indexer, NeuronRole::Hidden)).unwrap();
        net.add_synapse(prev, hidden, 0.9).unwrap();
        net.add_gate(hidden, prev, 0.1).unwrap();
        prev = hidden;
    }
    let output = net.add_neuron(Neuron::new(&indexer, NeuronRole::Output)).unwrap();
    net.add_synapse(prev, output, 1.0).unwrap();

    c.bench_function("recurrent_chain_10_steps", |b| {
        b.iter(|| {
            net.activate(black_box(&[1.0])).unwrap();
            for _ in 0..9 {
                black_box(net.step().unwrap());
            }
        });
    });
}

criterion_group!(benches, bench_layering, bench_activation, bench_recurrent_steps);
criterion_main!(benches);

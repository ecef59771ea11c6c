//! Random and grid networks for benchmarking and property tests.
//!
//! Vertices are named by their decimal index, and every generated network
//! comes with a terminal pair whose sink is reachable from its source.

use alloc::collections::BTreeSet;
use alloc::string::ToString;
use alloc::vec::Vec;
use core::ops::RangeInclusive;

use itertools::iproduct;
use petgraph::unionfind::UnionFind;
use rand::distributions::uniform::SampleUniform;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::algo::reachability::{is_reachable, Traversal};
use crate::amount::Amount;
use crate::error::Error;
use crate::network::{FlowNetwork, Vertex};

#[derive(Clone, Debug)]
pub struct GeneratedNetwork<A> {
    pub network: FlowNetwork<A>,
    pub source: Vertex,
    pub sink: Vertex,
}

fn check_capacities<A: Amount>(capacities: &RangeInclusive<A>) -> Result<(), Error> {
    let low = *capacities.start();
    if low < A::zero() {
        return Err(Error::NegativeCapacity(low.to_string()));
    }
    Ok(())
}

/// A simple, loop-free, weakly connected digraph with `vertices` vertices and
/// at least `edges` edges (at most `vertices * (vertices - 1)`), capacities
/// drawn uniformly from `capacities`.
///
/// Panics if `capacities` is empty.
pub fn random_network<A, R>(
    rng: &mut R,
    vertices: usize,
    edges: usize,
    capacities: RangeInclusive<A>,
) -> Result<GeneratedNetwork<A>, Error>
where
    A: Amount + SampleUniform,
    R: Rng + ?Sized,
{
    if vertices < 2 {
        return Err(Error::SourceIsSink);
    }
    check_capacities(&capacities)?;
    let edges = edges.min(vertices * (vertices - 1));

    loop {
        let network = random_connected(rng, vertices, edges, &capacities)?;
        for _ in 0..vertices {
            let source = Vertex::new(rng.gen_range(0..vertices));
            let sink = Vertex::new(rng.gen_range(0..vertices));
            if source != sink && is_reachable(&network, source, sink, Traversal::Forward) {
                return Ok(GeneratedNetwork {
                    network,
                    source,
                    sink,
                });
            }
        }
        log::debug!("no reachable terminal pair found, generating a new network");
    }
}

fn random_pairs<R: Rng + ?Sized>(rng: &mut R, n: usize, m: usize) -> Vec<(usize, usize)> {
    if 2 * m > n * (n - 1) {
        // Dense: sample without rejection.
        let mut all: Vec<_> = iproduct!(0..n, 0..n).filter(|(u, v)| u != v).collect();
        all.shuffle(rng);
        all.truncate(m);
        return all;
    }

    let mut seen = BTreeSet::new();
    let mut pairs = Vec::with_capacity(m);
    while pairs.len() < m {
        let pair = (rng.gen_range(0..n), rng.gen_range(0..n));
        if pair.0 != pair.1 && seen.insert(pair) {
            pairs.push(pair);
        }
    }
    pairs
}

fn random_connected<A, R>(
    rng: &mut R,
    n: usize,
    m: usize,
    capacities: &RangeInclusive<A>,
) -> Result<FlowNetwork<A>, Error>
where
    A: Amount + SampleUniform,
    R: Rng + ?Sized,
{
    let mut pairs = random_pairs(rng, n, m);

    let mut components = UnionFind::<usize>::new(n);
    for &(u, v) in &pairs {
        components.union(u, v);
    }
    // Chain the components together; each new pair joins two components, so
    // it cannot already be present.
    for v in 1..n {
        if components.union(v - 1, v) {
            pairs.push((v - 1, v));
        }
    }

    let mut network = FlowNetwork::with_capacity(n, pairs.len());
    for i in 0..n {
        network.add_vertex(i.to_string());
    }
    for (u, v) in pairs {
        let capacity = rng.gen_range(capacities.clone());
        network.add_edge(Vertex::new(u), Vertex::new(v), capacity)?;
    }
    Ok(network)
}

/// A `size` by `size` grid whose horizontal edges point right and vertical
/// edges point down. The source is the top-left corner, the sink the
/// bottom-right one.
///
/// Panics if `capacities` is empty.
pub fn grid_network<A, R>(
    rng: &mut R,
    size: usize,
    capacities: RangeInclusive<A>,
) -> Result<GeneratedNetwork<A>, Error>
where
    A: Amount + SampleUniform,
    R: Rng + ?Sized,
{
    if size < 2 {
        return Err(Error::SourceIsSink);
    }
    check_capacities(&capacities)?;

    let at = |row: usize, col: usize| Vertex::new(row * size + col);
    let mut network = FlowNetwork::with_capacity(size * size, 2 * size * (size - 1));
    for i in 0..size * size {
        network.add_vertex(i.to_string());
    }
    for (row, col) in iproduct!(0..size, 0..size) {
        if col + 1 < size {
            network.add_edge(at(row, col), at(row, col + 1), rng.gen_range(capacities.clone()))?;
        }
        if row + 1 < size {
            network.add_edge(at(row, col), at(row + 1, col), rng.gen_range(capacities.clone()))?;
        }
    }

    Ok(GeneratedNetwork {
        network,
        source: at(0, 0),
        sink: at(size - 1, size - 1),
    })
}

use alloc::vec;
use alloc::vec::Vec;

use petgraph::graph::NodeIndex;

use crate::amount::Amount;
use crate::network::{FlowNetwork, Vertex};
use crate::residual::arcs_into;

/// Distance labels: the number of residual arcs on a shortest path to the sink.
///
/// `None` marks a vertex that cannot reach the sink at all. Such vertices are
/// never used by the solver, neither as advance targets nor when relabelling.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DistanceLabels {
    labels: Vec<Option<usize>>,
}

impl DistanceLabels {
    /// Exact labels for the current residual network.
    ///
    /// Layered breadth-first expansion from `sink`: every vertex of layer
    /// `k + 1` has a residual arc into some vertex of layer `k`.
    pub fn compute<A: Amount>(network: &FlowNetwork<A>, sink: Vertex) -> Self {
        let mut labels = vec![None; network.num_vertices()];
        labels[sink.index()] = Some(0);

        let mut layer = vec![sink];
        let mut dist = 0;
        while !layer.is_empty() {
            dist += 1;
            let mut next = Vec::new();
            for &y in &layer {
                for arc in arcs_into(network, y) {
                    let i = arc.tail(network);
                    if labels[i.index()].is_none() && arc.is_usable(network) {
                        labels[i.index()] = Some(dist);
                        next.push(i);
                    }
                }
            }
            layer = next;
        }

        log::trace!(
            "labelled {} of {} vertices",
            labels.iter().filter(|d| d.is_some()).count(),
            labels.len()
        );

        Self { labels }
    }

    pub fn get(&self, v: Vertex) -> Option<usize> {
        self.labels[v.index()]
    }

    pub fn relabel(&mut self, v: Vertex, label: usize) {
        debug_assert!(self.labels[v.index()].map_or(true, |d| d <= label));
        self.labels[v.index()] = Some(label);
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Vertex, Option<usize>)> + '_ {
        self.labels
            .iter()
            .enumerate()
            .map(|(i, &d)| (NodeIndex::new(i), d))
    }
}

use alloc::collections::VecDeque;
use alloc::vec;
use alloc::vec::Vec;

use petgraph::algo::has_path_connecting;

use crate::amount::Amount;
use crate::network::{FlowNetwork, Vertex};
use crate::residual::arcs_from;

/// Which arcs a reachability query may follow.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Traversal {
    /// Every edge in its natural direction, regardless of capacity or flow.
    Forward,
    /// Residual arcs: edges with `capacity - flow > 0`, and edges with
    /// `flow > 0` traversed backwards.
    Residual,
}

/// Returns true if `to` can be reached from `from`.
///
/// Both modes use an explicit worklist, so deep networks cannot exhaust the
/// call stack.
pub fn is_reachable<A: Amount>(
    network: &FlowNetwork<A>,
    from: Vertex,
    to: Vertex,
    traversal: Traversal,
) -> bool {
    match traversal {
        Traversal::Forward => has_path_connecting(network.as_graph(), from, to, None),
        Traversal::Residual => residual_reachable(network, from)[to.index()],
    }
}

/// Marks every vertex reachable from `from` in the residual network.
pub fn residual_reachable<A: Amount>(network: &FlowNetwork<A>, from: Vertex) -> Vec<bool> {
    let mut reached = vec![false; network.num_vertices()];
    let mut queue = VecDeque::new();

    reached[from.index()] = true;
    queue.push_back(from);

    while let Some(v) = queue.pop_front() {
        for arc in arcs_from(network, v) {
            let w = arc.head(network);
            if !reached[w.index()] && arc.is_usable(network) {
                reached[w.index()] = true;
                queue.push_back(w);
            }
        }
    }

    reached
}

/// The source side of a minimum cut: vertices still reachable from `source`
/// in the residual network once the flow is maximum.
pub fn min_cut<A: Amount>(network: &FlowNetwork<A>, source: Vertex) -> Vec<Vertex> {
    let reached = residual_reachable(network, source);
    network.vertices().filter(|v| reached[v.index()]).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_ignores_capacity_residual_does_not() {
        let mut net = FlowNetwork::new();
        let s = net.add_vertex("s");
        let a = net.add_vertex("a");
        let t = net.add_vertex("t");
        net.add_edge(s, a, 0).unwrap();
        net.add_edge(a, t, 3).unwrap();

        assert!(is_reachable(&net, s, t, Traversal::Forward));
        assert!(!is_reachable(&net, s, t, Traversal::Residual));
        assert!(!is_reachable(&net, t, s, Traversal::Forward));
    }

    #[test]
    fn residual_follows_flow_backwards() {
        let mut net = FlowNetwork::new();
        let s = net.add_vertex("s");
        let t = net.add_vertex("t");
        net.add_edge_with_flow(t, s, 2, 1).unwrap();

        assert!(!is_reachable(&net, s, t, Traversal::Forward));
        assert!(is_reachable(&net, s, t, Traversal::Residual));
    }

    #[test]
    fn long_chain_does_not_recurse() {
        let n = 200_000;
        let mut net = FlowNetwork::with_capacity(n, n - 1);
        let vertices: Vec<_> = (0..n).map(|_| net.add_vertex("")).collect();
        for w in vertices.windows(2) {
            net.add_edge(w[0], w[1], 1).unwrap();
        }
        let (first, last) = (vertices[0], vertices[n - 1]);
        assert!(is_reachable(&net, first, last, Traversal::Forward));
        assert!(is_reachable(&net, first, last, Traversal::Residual));
        assert!(!is_reachable(&net, last, first, Traversal::Forward));
    }

    #[test]
    fn cut_of_saturated_edge() {
        let mut net = FlowNetwork::new();
        let s = net.add_vertex("s");
        let a = net.add_vertex("a");
        let t = net.add_vertex("t");
        net.add_edge_with_flow(s, a, 5, 2).unwrap();
        net.add_edge_with_flow(a, t, 2, 2).unwrap();
        assert_eq!(min_cut(&net, s), vec![s, a]);
    }
}

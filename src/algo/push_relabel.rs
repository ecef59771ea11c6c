use alloc::collections::{btree_map::Entry, BTreeMap, VecDeque};
use alloc::vec::Vec;
use core::cmp::min;

use petgraph::Graph;

use crate::algo::MaxFlow;
use crate::amount::Amount;
use crate::error::Error;
use crate::network::{EdgeId, FlowNetwork, Vertex};

struct Node<Int> {
    excess: Int,
    label: usize,
}

impl<Int: Amount> Node<Int> {
    fn new() -> Node<Int> {
        Node {
            excess: Int::zero(),
            label: 0,
        }
    }
}

/// All network edges from one vertex to another, merged into a single arc.
struct Edge<Int> {
    capacity: Int,
    flow: Int,
    members: Vec<EdgeId>,
}

impl<Int: Amount> Edge<Int> {
    fn new() -> Edge<Int> {
        Edge {
            capacity: Int::zero(),
            flow: Int::zero(),
            members: Vec::new(),
        }
    }
}

type PRGraph<Int> = Graph<Node<Int>, ()>;

struct State<Int> {
    graph: PRGraph<Int>,
    // We need random access to the edges, so it is faster to store them in a
    // map rather than in `graph`.
    edges: BTreeMap<(Vertex, Vertex), Edge<Int>>,
    source: Vertex,
    target: Vertex,
    active_queue: VecDeque<Vertex>,
}

impl<Int: Amount> State<Int> {
    fn push(&mut self, u: Vertex, v: Vertex) -> Result<(), Error> {
        let new_flow = {
            let u_data = &self.graph[u];
            let e_data = &self.edges[&(u, v)];

            debug_assert!(u_data.excess > Int::zero());
            debug_assert!(u_data.label == self.graph[v].label + 1);

            min(u_data.excess, e_data.capacity - e_data.flow)
        };
        self.add_excess(u, -new_flow)?;
        self.add_excess(v, new_flow)?;
        if let Some(e) = self.edges.get_mut(&(u, v)) {
            e.flow += new_flow;
        }
        if let Some(e) = self.edges.get_mut(&(v, u)) {
            e.flow -= new_flow;
        }
        Ok(())
    }

    fn has_capacity(&self, u: Vertex, v: Vertex) -> bool {
        let e = &self.edges[&(u, v)];
        e.capacity > e.flow
    }

    fn can_push(&self, u: Vertex, v: Vertex) -> bool {
        self.has_capacity(u, v) && self.graph[u].label == self.graph[v].label + 1
    }

    fn add_excess(&mut self, u: Vertex, amount: Int) -> Result<(), Error> {
        debug_assert!(amount != Int::zero());

        // The terminals never become active: the target gobbles up its inflow
        // and the source has all the flow it wants.
        if u == self.target || u == self.source {
            return Ok(());
        }

        let node = &mut self.graph[u];
        // We should never try to push more flow than the node has available.
        debug_assert!(node.excess >= -amount);
        if node.excess == Int::zero() {
            // We weren't active before, but we are now.
            self.active_queue.push_back(u);
        }
        node.excess = node
            .excess
            .checked_add(&amount)
            .ok_or(Error::ArithmeticOverflow)?;
        Ok(())
    }

    // Keep pushing excess flow to neighbors until we can't any more.
    fn discharge(&mut self, u: Vertex) -> Result<(), Error> {
        let mut nbrs = self.graph.neighbors(u).detach();
        while self.graph[u].excess > Int::zero() {
            if let Some(v) = nbrs.next_node(&self.graph) {
                if self.can_push(u, v) {
                    self.push(u, v)?;
                }
            } else {
                self.relabel(u);
                nbrs = self.graph.neighbors(u).detach();
            }
        }
        Ok(())
    }

    fn relabel(&mut self, u: Vertex) {
        let min_nbr_label = self
            .graph
            .neighbors(u)
            .filter(|v| self.has_capacity(u, *v))
            .map(|v| self.graph[v].label)
            .min()
            .expect("bug: tried to relabel a node with no residual arcs");
        self.graph[u].label = min_nbr_label + 1;
    }

    fn new(network: &FlowNetwork<Int>, source: Vertex, target: Vertex) -> Result<Self, Error> {
        let mut pr_graph = PRGraph::with_capacity(network.num_vertices(), 2 * network.num_edges());
        let mut edges: BTreeMap<(Vertex, Vertex), Edge<Int>> = BTreeMap::new();

        // Node indices of `pr_graph` coincide with the network's vertices.
        for _ in network.vertices() {
            pr_graph.add_node(Node::new());
        }

        for e in network.edge_ids() {
            let (u, v) = network.endpoints(e);
            if u == v {
                continue;
            }
            let edge = match edges.entry((u, v)) {
                Entry::Vacant(entry) => {
                    pr_graph.add_edge(u, v, ());
                    entry.insert(Edge::new())
                }
                Entry::Occupied(entry) => entry.into_mut(),
            };
            edge.capacity = edge
                .capacity
                .checked_add(&network.capacity(e))
                .ok_or(Error::ArithmeticOverflow)?;
            edge.members.push(e);
        }

        // The algorithm requires that every edge has its reversal present.
        let pairs: Vec<_> = edges.keys().copied().collect();
        for (u, v) in pairs {
            if let Entry::Vacant(entry) = edges.entry((v, u)) {
                entry.insert(Edge::new());
                pr_graph.add_edge(v, u, ());
            }
        }

        pr_graph[source].label = pr_graph.node_count();

        let mut state = State {
            graph: pr_graph,
            edges,
            source,
            target,
            active_queue: VecDeque::new(),
        };

        // Saturate every arc out of the source.
        let mut nbrs = state.graph.neighbors(source).detach();
        while let Some(v) = nbrs.next_node(&state.graph) {
            let cap = state.edges[&(source, v)].capacity;
            if cap == Int::zero() {
                continue;
            }
            if let Some(e) = state.edges.get_mut(&(source, v)) {
                e.flow = cap;
            }
            if let Some(e) = state.edges.get_mut(&(v, source)) {
                e.flow = -cap;
            }
            state.add_excess(v, cap)?;
        }

        Ok(state)
    }

    fn run(&mut self) -> Result<(), Error> {
        while let Some(u) = self.active_queue.pop_front() {
            self.discharge(u)?;
        }
        Ok(())
    }

    /// Spread the merged arc flows back over the individual network edges.
    fn write_back(self, network: &mut FlowNetwork<Int>) {
        network.reset_flows();
        for (_, edge) in self.edges {
            let mut remaining = edge.flow;
            for e in edge.members {
                if remaining <= Int::zero() {
                    break;
                }
                let f = min(remaining, network.capacity(e));
                network.set_flow(e, f);
                remaining -= f;
            }
            debug_assert!(remaining <= Int::zero());
        }
    }
}

/// FIFO push-relabel maximum flow, used as a reference to cross-check the
/// shortest augmenting path solver.
///
/// Parallel edges are merged into one arc per ordered vertex pair while
/// solving; the resulting flow is then distributed back over the individual
/// edges, so the network ends up with an ordinary feasible maximum flow.
#[derive(Clone, Copy, Debug, Default)]
pub struct PushRelabel;

impl<A: Amount> MaxFlow<A> for PushRelabel {
    type Error = Error;

    fn max_flow(
        &mut self,
        network: &mut FlowNetwork<A>,
        source: Vertex,
        sink: Vertex,
    ) -> Result<A, Self::Error> {
        network.check_terminals(source, sink)?;

        let mut state = State::new(network, source, sink)?;
        state.run()?;
        state.write_back(network);

        network.flow_value(source)
    }
}

/// Computes a maximum flow from `source` to `sink` using the push-relabel
/// algorithm, leaving the flow on `network` and returning its value.
pub fn push_relabel_max_flow<A: Amount>(
    network: &mut FlowNetwork<A>,
    source: Vertex,
    sink: Vertex,
) -> Result<A, Error> {
    PushRelabel.max_flow(network, source, sink)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::validate::FlowValidator;

    #[test]
    fn merges_parallel_edges() {
        let mut net = FlowNetwork::new();
        let v: Vec<_> = ["s", "a", "b", "t"].iter().map(|&n| net.add_vertex(n)).collect();
        let (s, a, b, t) = (v[0], v[1], v[2], v[3]);
        net.add_edge(s, a, 3).unwrap();
        net.add_edge(s, a, 4).unwrap();
        net.add_edge(a, b, 2).unwrap();
        net.add_edge(b, a, 6).unwrap();
        net.add_edge(a, t, 3).unwrap();
        net.add_edge(b, t, 9).unwrap();
        net.add_edge(t, s, 5).unwrap();

        assert_eq!(push_relabel_max_flow(&mut net, s, t), Ok(5));
        assert_eq!(FlowValidator::check(&net, s, t), Ok(()));
    }

    #[test]
    fn excess_returns_to_source() {
        let mut net = FlowNetwork::new();
        let v: Vec<_> = ["s", "a", "dead", "t"].iter().map(|&n| net.add_vertex(n)).collect();
        net.add_edge(v[0], v[1], 10).unwrap();
        net.add_edge(v[1], v[2], 10).unwrap();
        net.add_edge(v[1], v[3], 1).unwrap();

        assert_eq!(push_relabel_max_flow(&mut net, v[0], v[3]), Ok(1));
        assert_eq!(FlowValidator::check(&net, v[0], v[3]), Ok(()));
    }

    #[test]
    fn rejects_equal_terminals() {
        let mut net = FlowNetwork::<i32>::new();
        let s = net.add_vertex("s");
        assert_eq!(PushRelabel.max_flow(&mut net, s, s), Err(Error::SourceIsSink));
    }
}

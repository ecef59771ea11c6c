//! Conversions between [`FlowNetwork`] and outside representations: flat edge
//! records (as read from or written to CSV) and petgraph graphs.
//!
//! Vertex identity is preserved in both directions: records refer to vertices
//! by name, and petgraph conversions return or keep the index correspondence.

use alloc::collections::{BTreeMap, BTreeSet};
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use petgraph::graph::DiGraph;
use petgraph::visit::{EdgeRef, IntoEdgeReferences, IntoNodeIdentifiers};
use serde::{Deserialize, Serialize};

use crate::amount::Amount;
use crate::error::Error;
use crate::network::{FlowNetwork, Vertex};

/// One edge of a network, with its endpoints given by vertex name.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Deserialize, Serialize)]
pub struct EdgeRecord<A> {
    pub source: String,
    pub target: String,
    pub capacity: A,
    #[serde(default)]
    pub flow: A,
}

impl<A: Amount> FlowNetwork<A> {
    /// Build a network from edge records, creating a vertex for every distinct
    /// name in order of first appearance.
    pub fn from_records<I>(records: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = EdgeRecord<A>>,
    {
        let mut network = Self::new();
        let mut vertices = BTreeMap::new();
        for record in records {
            let u = network.vertex_pos(&mut vertices, record.source);
            let v = network.vertex_pos(&mut vertices, record.target);
            network.add_edge_with_flow(u, v, record.capacity, record.flow)?;
        }
        Ok(network)
    }

    fn vertex_pos(&mut self, vertices: &mut BTreeMap<String, Vertex>, name: String) -> Vertex {
        if let Some(&v) = vertices.get(&name) {
            v
        } else {
            let v = self.add_vertex(name.clone());
            vertices.insert(name, v);
            v
        }
    }

    /// Export every edge as a record. Fails if two vertices share a name,
    /// since the records could not tell them apart.
    pub fn to_records(&self) -> Result<Vec<EdgeRecord<A>>, Error> {
        let mut seen = BTreeSet::new();
        if let Some(v) = self.vertices().find(|&v| !seen.insert(self.name(v))) {
            return Err(Error::DuplicateVertexName(self.name(v).to_string()));
        }

        Ok(self
            .edges()
            .map(|e| EdgeRecord {
                source: e.source_name.to_string(),
                target: e.target_name.to_string(),
                capacity: e.capacity,
                flow: e.flow,
            })
            .collect())
    }

    /// Copy any petgraph graph whose edge weights are capacities. Vertices are
    /// named by their position, and the returned map takes the graph's node
    /// ids to the new vertices.
    pub fn from_graph<G>(g: G) -> Result<(Self, BTreeMap<G::NodeId, Vertex>), Error>
    where
        G: IntoEdgeReferences<EdgeWeight = A> + IntoNodeIdentifiers,
        G::NodeId: Ord,
    {
        let mut network = Self::new();
        let mut node_map = BTreeMap::new();

        for (i, n) in g.node_identifiers().enumerate() {
            node_map.insert(n, network.add_vertex(i.to_string()));
        }
        for e in g.edge_references() {
            let u = node_map[&e.source()];
            let v = node_map[&e.target()];
            network.add_edge(u, v, *e.weight())?;
        }

        Ok((network, node_map))
    }

    /// Copy the network into a petgraph graph with identical indices, named
    /// nodes and `(capacity, flow)` edge weights.
    pub fn to_graph(&self) -> DiGraph<String, (A, A)> {
        let mut graph = DiGraph::with_capacity(self.num_vertices(), self.num_edges());
        for v in self.vertices() {
            graph.add_node(self.name(v).to_string());
        }
        for e in self.edges() {
            graph.add_edge(e.source, e.target, (e.capacity, e.flow));
        }
        graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn record(source: &str, target: &str, capacity: i32, flow: i32) -> EdgeRecord<i32> {
        EdgeRecord {
            source: source.to_string(),
            target: target.to_string(),
            capacity,
            flow,
        }
    }

    #[test]
    fn records_name_the_vertices() {
        let records = vec![
            record("s", "a", 4, 1),
            record("a", "t", 2, 1),
            record("s", "t", 3, 0),
        ];
        let net = FlowNetwork::from_records(records.clone()).unwrap();
        assert_eq!(net.num_vertices(), 3);
        assert_eq!(net.num_edges(), 3);
        assert_eq!(net.name(Vertex::new(1)), "a");
        assert_eq!(net.to_records().unwrap(), records);
    }

    #[test]
    fn records_reject_negative_capacity() {
        let records = vec![record("s", "t", -4, 0)];
        assert!(matches!(
            FlowNetwork::from_records(records),
            Err(Error::NegativeCapacity(_))
        ));
    }

    #[test]
    fn duplicate_names_cannot_be_exported() {
        let mut net = FlowNetwork::<i32>::new();
        let a = net.add_vertex("x");
        let b = net.add_vertex("x");
        net.add_edge(a, b, 1).unwrap();
        assert_eq!(
            net.to_records(),
            Err(Error::DuplicateVertexName("x".to_string()))
        );
    }

    #[test]
    fn petgraph_round_trip_keeps_indices() {
        let mut g = DiGraph::<&str, i64>::new();
        let s = g.add_node("s");
        let a = g.add_node("a");
        let t = g.add_node("t");
        g.add_edge(s, a, 5);
        g.add_edge(a, t, 7);

        let (net, map) = FlowNetwork::from_graph(&g).unwrap();
        assert_eq!(map[&s], Vertex::new(0));
        assert_eq!(map[&t], Vertex::new(2));
        assert_eq!(net.capacity(net.out_edges(map[&a]).next().unwrap()), 7);

        let back = net.to_graph();
        assert_eq!(back.node_count(), 3);
        assert_eq!(back[back.find_edge(s, a).unwrap()], (5, 0));
    }
}

//! The flow network data model.
//!
//! A [`FlowNetwork`] is a directed multigraph whose edges carry an integer
//! capacity and a mutable flow. Reverse edges are never stored: the residual
//! capacity against an edge's direction is derived from its flow (see
//! [`crate::residual`]).

use alloc::format;
use alloc::string::String;

use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;

use crate::amount::Amount;
use crate::error::Error;

/// Dense vertex identifier.
pub type Vertex = NodeIndex<u32>;

/// Dense edge identifier.
pub type EdgeId = EdgeIndex<u32>;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct VertexData {
    name: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct EdgeData<A> {
    capacity: A,
    flow: A,
}

/// Read-only view of a single edge, used for reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EdgeView<'a, A> {
    pub id: EdgeId,
    pub source: Vertex,
    pub target: Vertex,
    pub source_name: &'a str,
    pub target_name: &'a str,
    pub capacity: A,
    pub flow: A,
}

#[derive(Clone, Debug)]
pub struct FlowNetwork<A> {
    graph: DiGraph<VertexData, EdgeData<A>>,
}

impl<A> Default for FlowNetwork<A> {
    fn default() -> Self {
        Self {
            graph: DiGraph::default(),
        }
    }
}

impl<A: Amount> FlowNetwork<A> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(vertices: usize, edges: usize) -> Self {
        Self {
            graph: DiGraph::with_capacity(vertices, edges),
        }
    }

    /// Add a vertex with a display name; names are only used for diagnostics.
    pub fn add_vertex(&mut self, name: impl Into<String>) -> Vertex {
        self.graph.add_node(VertexData { name: name.into() })
    }

    /// Add an edge `u -> v` with zero initial flow.
    pub fn add_edge(&mut self, u: Vertex, v: Vertex, capacity: A) -> Result<EdgeId, Error> {
        self.add_edge_with_flow(u, v, capacity, A::zero())
    }

    /// Add an edge `u -> v` carrying a caller-supplied initial flow.
    ///
    /// The flow is not checked against the capacity; that is the validator's job.
    pub fn add_edge_with_flow(
        &mut self,
        u: Vertex,
        v: Vertex,
        capacity: A,
        flow: A,
    ) -> Result<EdgeId, Error> {
        self.check_vertex(u)?;
        self.check_vertex(v)?;
        if capacity < A::zero() {
            return Err(Error::NegativeCapacity(format!(
                "{capacity} on ({}, {})",
                self.name(u),
                self.name(v)
            )));
        }
        Ok(self.graph.add_edge(u, v, EdgeData { capacity, flow }))
    }

    pub(crate) fn as_graph(&self) -> &DiGraph<VertexData, EdgeData<A>> {
        &self.graph
    }

    pub fn contains(&self, v: Vertex) -> bool {
        v.index() < self.graph.node_count()
    }

    fn check_vertex(&self, v: Vertex) -> Result<(), Error> {
        if self.contains(v) {
            Ok(())
        } else {
            Err(Error::UnknownVertex(v.index()))
        }
    }

    /// Fail fast if `source`/`sink` cannot be used as a terminal pair.
    pub fn check_terminals(&self, source: Vertex, sink: Vertex) -> Result<(), Error> {
        self.check_vertex(source)?;
        self.check_vertex(sink)?;
        if source == sink {
            return Err(Error::SourceIsSink);
        }
        Ok(())
    }

    pub fn num_vertices(&self) -> usize {
        self.graph.node_count()
    }

    pub fn num_edges(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn vertices(&self) -> impl Iterator<Item = Vertex> {
        self.graph.node_indices()
    }

    pub fn edge_ids(&self) -> impl Iterator<Item = EdgeId> {
        self.graph.edge_indices()
    }

    pub fn out_edges(&self, v: Vertex) -> impl Iterator<Item = EdgeId> + '_ {
        self.graph
            .edges_directed(v, Direction::Outgoing)
            .map(|e| e.id())
    }

    pub fn in_edges(&self, v: Vertex) -> impl Iterator<Item = EdgeId> + '_ {
        self.graph
            .edges_directed(v, Direction::Incoming)
            .map(|e| e.id())
    }

    /// `(tail, head)` of edge `e`.
    ///
    /// Panics if `e` is not an edge of the network.
    pub fn endpoints(&self, e: EdgeId) -> (Vertex, Vertex) {
        let edge = &self.graph.raw_edges()[e.index()];
        (edge.source(), edge.target())
    }

    pub fn name(&self, v: Vertex) -> &str {
        &self.graph[v].name
    }

    pub fn vertex_by_name(&self, name: &str) -> Option<Vertex> {
        self.graph
            .node_indices()
            .find(|&v| self.graph[v].name == name)
    }

    pub fn capacity(&self, e: EdgeId) -> A {
        self.graph[e].capacity
    }

    pub fn flow(&self, e: EdgeId) -> A {
        self.graph[e].flow
    }

    pub fn set_flow(&mut self, e: EdgeId, flow: A) {
        self.graph[e].flow = flow;
    }

    /// Residual capacity along the edge: `capacity - flow`.
    pub fn residual(&self, e: EdgeId) -> A {
        let edge = &self.graph[e];
        edge.capacity - edge.flow
    }

    /// Residual capacity against the edge: the flow that can be cancelled.
    pub fn reverse_residual(&self, e: EdgeId) -> A {
        self.graph[e].flow
    }

    /// Zero every flow so the network can be solved again.
    pub fn reset_flows(&mut self) {
        self.graph
            .edge_weights_mut()
            .for_each(|e| e.flow = A::zero());
    }

    pub fn edges(&self) -> impl Iterator<Item = EdgeView<'_, A>> + '_ {
        self.graph.edge_references().map(move |e| EdgeView {
            id: e.id(),
            source: e.source(),
            target: e.target(),
            source_name: self.name(e.source()),
            target_name: self.name(e.target()),
            capacity: e.weight().capacity,
            flow: e.weight().flow,
        })
    }

    fn sum_flows(&self, mut edges: impl Iterator<Item = EdgeId>) -> Result<A, Error> {
        edges.try_fold(A::zero(), |acc, e| {
            acc.checked_add(&self.flow(e))
                .ok_or(Error::ArithmeticOverflow)
        })
    }

    /// Inflow minus outflow at `v`.
    pub fn excess(&self, v: Vertex) -> Result<A, Error> {
        let inflow = self.sum_flows(self.in_edges(v))?;
        let outflow = self.sum_flows(self.out_edges(v))?;
        inflow
            .checked_sub(&outflow)
            .ok_or(Error::ArithmeticOverflow)
    }

    /// Net flow leaving `source`, i.e. the value of the current flow.
    pub fn flow_value(&self, source: Vertex) -> Result<A, Error> {
        let inflow = self.sum_flows(self.in_edges(source))?;
        let outflow = self.sum_flows(self.out_edges(source))?;
        outflow
            .checked_sub(&inflow)
            .ok_or(Error::ArithmeticOverflow)
    }

    /// Sum of capacities of the edges leaving the vertex set `side`.
    pub fn cut_capacity(&self, side: &[bool]) -> Result<A, Error> {
        self.edge_ids()
            .filter(|&e| {
                let (u, v) = self.endpoints(e);
                side[u.index()] && !side[v.index()]
            })
            .try_fold(A::zero(), |acc, e| {
                acc.checked_add(&self.capacity(e))
                    .ok_or(Error::ArithmeticOverflow)
            })
    }
}

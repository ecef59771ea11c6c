//! Residual arcs derived on the fly from edge state.
//!
//! Every edge `u -> v` induces two residual arcs: a forward one `u -> v` with
//! capacity `capacity - flow`, and a reverse one `v -> u` with capacity `flow`.
//! Neither is stored; both are computed from the edge whenever they are used.

use crate::amount::Amount;
use crate::network::{EdgeId, FlowNetwork, Vertex};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResidualArc {
    pub edge: EdgeId,
    /// `true` if the arc follows the edge's natural direction.
    pub forward: bool,
}

impl ResidualArc {
    pub fn forward(edge: EdgeId) -> Self {
        Self {
            edge,
            forward: true,
        }
    }

    pub fn reverse(edge: EdgeId) -> Self {
        Self {
            edge,
            forward: false,
        }
    }

    pub fn tail<A: Amount>(&self, network: &FlowNetwork<A>) -> Vertex {
        let (u, v) = network.endpoints(self.edge);
        if self.forward {
            u
        } else {
            v
        }
    }

    pub fn head<A: Amount>(&self, network: &FlowNetwork<A>) -> Vertex {
        let (u, v) = network.endpoints(self.edge);
        if self.forward {
            v
        } else {
            u
        }
    }

    pub fn residual<A: Amount>(&self, network: &FlowNetwork<A>) -> A {
        if self.forward {
            network.residual(self.edge)
        } else {
            network.reverse_residual(self.edge)
        }
    }

    pub fn is_usable<A: Amount>(&self, network: &FlowNetwork<A>) -> bool {
        self.residual(network) > A::zero()
    }

    /// Send `delta` units along the arc: raises the edge flow on a forward arc,
    /// cancels flow on a reverse one.
    pub fn push<A: Amount>(&self, network: &mut FlowNetwork<A>, delta: A) {
        debug_assert!(delta <= self.residual(network));
        let flow = network.flow(self.edge);
        if self.forward {
            network.set_flow(self.edge, flow + delta);
        } else {
            network.set_flow(self.edge, flow - delta);
        }
    }
}

/// Residual arcs leaving `v`: outgoing edges first, then incoming edges
/// traversed backwards. Arcs are yielded whether or not they have capacity left.
pub fn arcs_from<A: Amount>(
    network: &FlowNetwork<A>,
    v: Vertex,
) -> impl Iterator<Item = ResidualArc> + '_ {
    network
        .out_edges(v)
        .map(ResidualArc::forward)
        .chain(network.in_edges(v).map(ResidualArc::reverse))
}

/// Residual arcs entering `v`: incoming edges first, then outgoing edges
/// traversed backwards.
pub fn arcs_into<A: Amount>(
    network: &FlowNetwork<A>,
    v: Vertex,
) -> impl Iterator<Item = ResidualArc> + '_ {
    network
        .in_edges(v)
        .map(ResidualArc::forward)
        .chain(network.out_edges(v).map(ResidualArc::reverse))
}

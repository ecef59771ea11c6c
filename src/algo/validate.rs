//! Independent certification of a maximum flow.
//!
//! A flow is a maximum `s`-`t` flow iff every edge flow lies within
//! `[0, capacity]`, every vertex other than `s` and `t` has zero excess, and
//! `t` cannot be reached from `s` in the residual network. The checks run in
//! that order and stop at the first failure.

use core::fmt;

use displaydoc::Display;

use crate::algo::reachability::{is_reachable, Traversal};
use crate::amount::Amount;
use crate::network::{FlowNetwork, Vertex};

/// The first invariant found broken by [`FlowValidator::check`].
#[derive(Clone, Debug, PartialEq, Eq, Display)]
pub enum Violation<A: fmt::Display> {
    /// Edge {edge} carries flow {flow} outside of [0, {capacity}]
    IllegalFlow { edge: usize, flow: A, capacity: A },
    /// Vertex {vertex} has non-zero excess {excess}
    NonZeroExcess { vertex: usize, excess: A },
    /// Excess of vertex {vertex} does not fit the flow type
    ExcessOverflow { vertex: usize },
    /// The sink is reachable from the source in the residual network
    AugmentingPath,
}

pub struct FlowValidator;

impl FlowValidator {
    /// Certify that the flow on `network` is a maximum `source`-`sink` flow.
    ///
    /// Panics if `source` or `sink` is not a vertex of `network`.
    pub fn check<A: Amount>(
        network: &FlowNetwork<A>,
        source: Vertex,
        sink: Vertex,
    ) -> Result<(), Violation<A>> {
        Self::check_feasible(network, source, sink)?;
        Self::check_no_augmenting_path(network, source, sink)
    }

    pub fn is_max_flow<A: Amount>(network: &FlowNetwork<A>, source: Vertex, sink: Vertex) -> bool {
        Self::check(network, source, sink).is_ok()
    }

    /// Capacity and conservation constraints only.
    pub fn check_feasible<A: Amount>(
        network: &FlowNetwork<A>,
        source: Vertex,
        sink: Vertex,
    ) -> Result<(), Violation<A>> {
        assert!(
            network.contains(source) && network.contains(sink),
            "source or sink isn't in the network"
        );
        Self::check_capacities(network)?;
        Self::check_conservation(network, source, sink)
    }

    pub fn check_capacities<A: Amount>(network: &FlowNetwork<A>) -> Result<(), Violation<A>> {
        match network
            .edges()
            .find(|e| e.flow < A::zero() || e.flow > e.capacity)
        {
            Some(e) => {
                log::debug!(
                    "illegal flow value {} on edge ({}, {}) with capacity {}",
                    e.flow,
                    e.source_name,
                    e.target_name,
                    e.capacity
                );
                Err(Violation::IllegalFlow {
                    edge: e.id.index(),
                    flow: e.flow,
                    capacity: e.capacity,
                })
            }
            None => Ok(()),
        }
    }

    pub fn check_conservation<A: Amount>(
        network: &FlowNetwork<A>,
        source: Vertex,
        sink: Vertex,
    ) -> Result<(), Violation<A>> {
        for v in network.vertices().filter(|&v| v != source && v != sink) {
            let excess = network
                .excess(v)
                .map_err(|_| Violation::ExcessOverflow { vertex: v.index() })?;
            if excess != A::zero() {
                log::debug!("vertex {} has non-zero excess {excess}", network.name(v));
                return Err(Violation::NonZeroExcess {
                    vertex: v.index(),
                    excess,
                });
            }
        }
        Ok(())
    }

    pub fn check_no_augmenting_path<A: Amount>(
        network: &FlowNetwork<A>,
        source: Vertex,
        sink: Vertex,
    ) -> Result<(), Violation<A>> {
        if is_reachable(network, source, sink, Traversal::Residual) {
            log::debug!(
                "{} is reachable from {} in the residual network",
                network.name(sink),
                network.name(source)
            );
            return Err(Violation::AugmentingPath);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use alloc::vec::Vec;

    fn diamond(flow: i32) -> (FlowNetwork<i32>, Vec<Vertex>) {
        let mut net = FlowNetwork::new();
        let v: Vec<_> = "ABCDEF".chars().map(|c| net.add_vertex(c)).collect();
        for (u, w) in [(0, 1), (1, 2), (2, 3), (3, 5), (0, 4), (4, 5)] {
            net.add_edge_with_flow(v[u], v[w], 3, flow).unwrap();
        }
        (net, v)
    }

    #[test]
    fn saturated_diamond_is_maximum() {
        let (net, v) = diamond(3);
        assert_eq!(FlowValidator::check(&net, v[0], v[5]), Ok(()));
        assert_eq!(FlowValidator::check(&net, v[0], v[5]), Ok(()));
    }

    #[test]
    fn zero_flow_has_augmenting_path() {
        let (net, v) = diamond(0);
        assert_eq!(FlowValidator::check_feasible(&net, v[0], v[5]), Ok(()));
        assert_eq!(
            FlowValidator::check(&net, v[0], v[5]),
            Err(Violation::AugmentingPath)
        );
    }

    #[test]
    fn capacity_is_checked_first() {
        let (mut net, v) = diamond(3);
        let e = net.out_edges(v[2]).next().unwrap();
        net.set_flow(e, 4);
        let violation = FlowValidator::check(&net, v[0], v[5]).unwrap_err();
        assert_eq!(
            violation,
            Violation::IllegalFlow {
                edge: e.index(),
                flow: 4,
                capacity: 3
            }
        );
        assert!(violation.to_string().contains("outside of [0, 3]"));

        net.set_flow(e, -1);
        assert!(matches!(
            FlowValidator::check(&net, v[0], v[5]),
            Err(Violation::IllegalFlow { flow: -1, .. })
        ));
    }

    #[test]
    fn conservation_is_checked() {
        let (mut net, v) = diamond(3);
        let e = net.out_edges(v[2]).next().unwrap();
        net.set_flow(e, 2);
        assert_eq!(
            FlowValidator::check(&net, v[0], v[5]),
            Err(Violation::NonZeroExcess {
                vertex: v[2].index(),
                excess: 1
            })
        );
    }

    #[test]
    fn terminals_may_have_excess() {
        let mut net = FlowNetwork::new();
        let s = net.add_vertex("s");
        let t = net.add_vertex("t");
        net.add_edge_with_flow(s, t, 2, 2).unwrap();
        assert!(FlowValidator::is_max_flow(&net, s, t));
    }
}

use core::fmt::Debug;

use crate::network::{FlowNetwork, Vertex};

pub mod distance;
pub mod observer;
pub mod push_relabel;
pub mod reachability;
pub mod sap;
pub mod validate;

/// A maximum flow algorithm that writes its flow onto the network.
pub trait MaxFlow<A> {
    type Error: Debug;

    /// Compute a maximum `source`-`sink` flow in place and return its value.
    fn max_flow(
        &mut self,
        network: &mut FlowNetwork<A>,
        source: Vertex,
        sink: Vertex,
    ) -> Result<A, Self::Error>;
}

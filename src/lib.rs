//! Maximum flow on directed, capacitated networks.
//!
//! The core is a [`ShortestAugmentingPath`] solver working on a
//! [`FlowNetwork`] without ever materialising reverse edges, and a
//! [`FlowValidator`] that certifies the result independently: capacities,
//! conservation, and the absence of an augmenting path.
//!
//! Around it sit a push-relabel reference solver used for cross-checks,
//! conversions from petgraph graphs and CSV edge records, and generators of
//! random and grid networks for benchmarking.

#![no_std]
#![deny(
    trivial_casts,
    trivial_numeric_casts,
    unused_import_braces,
    rust_2018_idioms
)]
#![forbid(unsafe_code)]

extern crate alloc;

pub mod algo;
mod amount;
mod bridge;
mod error;
pub mod generate;
mod network;
mod residual;

pub use algo::distance::DistanceLabels;
pub use algo::observer::{LogObserver, SolveObserver, SolveStats};
pub use algo::push_relabel::{push_relabel_max_flow, PushRelabel};
pub use algo::reachability::{is_reachable, min_cut, residual_reachable, Traversal};
pub use algo::sap::ShortestAugmentingPath;
pub use algo::validate::{FlowValidator, Violation};
pub use algo::MaxFlow;
pub use amount::Amount;
pub use bridge::EdgeRecord;
pub use error::Error;
pub use network::{EdgeId, EdgeView, FlowNetwork, Vertex};
pub use residual::{arcs_from, arcs_into, ResidualArc};

//! Shortest augmenting path maximum flow.
//!
//! The solver keeps exact distance labels `d` (arcs to the sink in the
//! residual network) and grows a path from the source along admissible arcs,
//! i.e. residual arcs `(i, j)` with `d[i] = d[j] + 1`:
//!
//! * **advance** along an admissible arc, and **augment** once the sink is hit;
//! * **retreat** when the current vertex has no admissible arc, after
//!   relabelling it to one more than its lowest residual neighbour.
//!
//! The loop stops once `d[source]` reaches the number of vertices, at which
//! point no augmenting path is left. Reverse arcs are simulated through edge
//! flows (see [`ResidualArc`]), so the network is never restructured.
//!
//! ```
//! use sapflow::{FlowNetwork, FlowValidator, ShortestAugmentingPath};
//!
//! let mut net = FlowNetwork::new();
//! let s = net.add_vertex("s");
//! let a = net.add_vertex("a");
//! let t = net.add_vertex("t");
//! net.add_edge(s, a, 4).unwrap();
//! net.add_edge(a, t, 3).unwrap();
//! net.add_edge(s, t, 2).unwrap();
//!
//! let value = ShortestAugmentingPath::new().run(&mut net, s, t).unwrap();
//! assert_eq!(value, 5);
//! assert!(FlowValidator::is_max_flow(&net, s, t));
//! ```

use alloc::string::ToString;
use alloc::vec;
use alloc::vec::Vec;
use core::cmp::min;

use crate::algo::distance::DistanceLabels;
use crate::algo::observer::{SolveObserver, SolveStats};
use crate::algo::reachability::{is_reachable, Traversal};
use crate::algo::validate::FlowValidator;
use crate::algo::MaxFlow;
use crate::amount::Amount;
use crate::error::Error;
use crate::network::{FlowNetwork, Vertex};
use crate::residual::{arcs_from, ResidualArc};

#[derive(Clone, Debug, Default)]
pub struct ShortestAugmentingPath<O = ()> {
    observer: O,
    warm_start: bool,
    stats: SolveStats,
}

impl ShortestAugmentingPath {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<O> ShortestAugmentingPath<O> {
    /// Replace the observer notified at every trace point.
    pub fn with_observer<P>(self, observer: P) -> ShortestAugmentingPath<P> {
        ShortestAugmentingPath {
            observer,
            warm_start: self.warm_start,
            stats: self.stats,
        }
    }

    /// Start from the flows already on the network instead of zeroing them.
    /// The initial flow must respect capacities and conservation.
    pub fn warm_start(mut self, enabled: bool) -> Self {
        self.warm_start = enabled;
        self
    }

    /// Counters of the latest run.
    pub fn stats(&self) -> SolveStats {
        self.stats
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn into_observer(self) -> O {
        self.observer
    }

    /// Compute a maximum `source`-`sink` flow in place and return its value.
    ///
    /// If `sink` cannot be reached from `source` at all, the flows are left
    /// untouched and the value is zero.
    pub fn run<A>(
        &mut self,
        network: &mut FlowNetwork<A>,
        source: Vertex,
        sink: Vertex,
    ) -> Result<A, Error>
    where
        A: Amount,
        O: SolveObserver<A>,
    {
        network.check_terminals(source, sink)?;
        self.stats = SolveStats::default();

        if !is_reachable(network, source, sink, Traversal::Forward) {
            log::debug!(
                "{} is not reachable from {}",
                network.name(sink),
                network.name(source)
            );
            return Ok(A::zero());
        }

        if self.warm_start {
            FlowValidator::check_feasible(network, source, sink)
                .map_err(|v| Error::InfeasibleInitialFlow(v.to_string()))?;
        } else {
            network.reset_flows();
        }

        let n = network.num_vertices();
        let mut labels = DistanceLabels::compute(network, sink);
        let mut pred: Vec<Option<ResidualArc>> = vec![None; n];
        let mut i = source;

        log::trace!("starting d[source] = {:?}", labels.get(source));

        while labels.get(source).map_or(false, |d| d < n) {
            self.stats.iterations += 1;
            self.observer.iteration(self.stats.iterations, i, &labels);

            match admissible_arc(network, &labels, i) {
                Some(arc) => {
                    let j = arc.head(network);
                    pred[j.index()] = Some(arc);
                    self.stats.advances += 1;
                    self.observer.advance(i, j, arc);
                    i = j;

                    if i == sink {
                        self.augment(network, &pred, source, sink)?;
                        i = source;
                    }
                }
                None => {
                    let label = relabel(network, &labels, i);
                    labels.relabel(i, label);
                    self.stats.retreats += 1;
                    self.observer.retreat(i, label);

                    if i != source {
                        i = match pred[i.index()] {
                            Some(arc) => arc.tail(network),
                            None => return Err(corrupted_path(i)),
                        };
                    }
                }
            }
        }

        let value = network.flow_value(source)?;
        log::debug!(
            "max flow {value} after {} iterations ({} advances, {} retreats, {} augmentations)",
            self.stats.iterations,
            self.stats.advances,
            self.stats.retreats,
            self.stats.augmentations
        );
        Ok(value)
    }

    /// Push the bottleneck amount along the path recorded in `pred`.
    fn augment<A>(
        &mut self,
        network: &mut FlowNetwork<A>,
        pred: &[Option<ResidualArc>],
        source: Vertex,
        sink: Vertex,
    ) -> Result<A, Error>
    where
        A: Amount,
        O: SolveObserver<A>,
    {
        let mut path = Vec::new();
        let mut delta: Option<A> = None;
        let mut v = sink;

        while v != source {
            let arc = match pred[v.index()] {
                Some(arc) if arc.head(network) == v && path.len() < pred.len() => arc,
                _ => return Err(corrupted_path(v)),
            };
            let r = arc.residual(network);
            delta = Some(delta.map_or(r, |d| min(d, r)));
            path.push(arc);
            v = arc.tail(network);
        }

        let delta = delta.ok_or_else(|| corrupted_path(sink))?;
        debug_assert!(delta > A::zero());

        for arc in &path {
            arc.push(network, delta);
        }

        self.stats.augmentations += 1;
        self.observer.augment(delta, path.len());
        Ok(delta)
    }
}

impl<A, O> MaxFlow<A> for ShortestAugmentingPath<O>
where
    A: Amount,
    O: SolveObserver<A>,
{
    type Error = Error;

    fn max_flow(
        &mut self,
        network: &mut FlowNetwork<A>,
        source: Vertex,
        sink: Vertex,
    ) -> Result<A, Self::Error> {
        self.run(network, source, sink)
    }
}

/// First admissible arc out of `i`, scanning outgoing edges before incoming ones.
fn admissible_arc<A: Amount>(
    network: &FlowNetwork<A>,
    labels: &DistanceLabels,
    i: Vertex,
) -> Option<ResidualArc> {
    let di = labels.get(i)?;
    arcs_from(network, i).find(|arc| {
        labels
            .get(arc.head(network))
            .map_or(false, |dj| di == dj + 1)
            && arc.is_usable(network)
    })
}

/// New label for `i`: one more than the lowest labelled residual neighbour,
/// or the old label plus one if there is none.
fn relabel<A: Amount>(network: &FlowNetwork<A>, labels: &DistanceLabels, i: Vertex) -> usize {
    arcs_from(network, i)
        .filter(|arc| arc.is_usable(network))
        .filter_map(|arc| labels.get(arc.head(network)))
        .min()
        .map_or_else(|| labels.get(i).unwrap_or(0) + 1, |d| d + 1)
}

fn corrupted_path(v: Vertex) -> Error {
    debug_assert!(
        false,
        "bug: vertex {} on the current path has no matching predecessor arc",
        v.index()
    );
    Error::CorruptedPath(v.index())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diamond() -> (FlowNetwork<i32>, Vec<Vertex>) {
        let mut net = FlowNetwork::new();
        let v: Vec<_> = "ABCDEF".chars().map(|c| net.add_vertex(c)).collect();
        for (u, w) in [(0, 1), (1, 2), (2, 3), (3, 5), (0, 4), (4, 5)] {
            net.add_edge(v[u], v[w], 3).unwrap();
        }
        (net, v)
    }

    #[test]
    fn diamond_saturates_both_paths() {
        let (mut net, v) = diamond();
        let mut sap = ShortestAugmentingPath::new();
        assert_eq!(sap.run(&mut net, v[0], v[5]), Ok(6));
        assert!(net.edges().all(|e| e.flow == 3));
        assert_eq!(sap.stats().augmentations, 2);
        assert!(FlowValidator::is_max_flow(&net, v[0], v[5]));
    }

    #[test]
    fn single_edge_in_one_augmentation() {
        let mut net = FlowNetwork::new();
        let s = net.add_vertex("s");
        let t = net.add_vertex("t");
        let e = net.add_edge(s, t, 17i64).unwrap();
        let mut sap = ShortestAugmentingPath::new();
        assert_eq!(sap.run(&mut net, s, t), Ok(17));
        assert_eq!(net.flow(e), 17);
        assert_eq!(sap.stats().augmentations, 1);
    }

    #[test]
    fn unreachable_sink_keeps_initial_flows() {
        let mut net = FlowNetwork::new();
        let s = net.add_vertex("s");
        let a = net.add_vertex("a");
        let t = net.add_vertex("t");
        let e = net.add_edge_with_flow(s, a, 5, 1).unwrap();
        net.add_edge(t, a, 5).unwrap();

        let mut sap = ShortestAugmentingPath::new();
        assert_eq!(sap.run(&mut net, s, t), Ok(0));
        assert_eq!(net.flow(e), 1);
        assert_eq!(sap.stats(), SolveStats::default());
    }

    #[test]
    fn zero_capacity_path_gives_zero_flow() {
        let mut net = FlowNetwork::new();
        let s = net.add_vertex("s");
        let t = net.add_vertex("t");
        net.add_edge_with_flow(s, t, 0, 4).unwrap();
        assert_eq!(ShortestAugmentingPath::new().run(&mut net, s, t), Ok(0));
        assert!(FlowValidator::is_max_flow(&net, s, t));
    }

    #[test]
    fn contract_violations_fail_before_solving() {
        let (mut net, v) = diamond();
        let mut sap = ShortestAugmentingPath::new();
        assert_eq!(sap.run(&mut net, v[0], v[0]), Err(Error::SourceIsSink));
        assert_eq!(
            sap.run(&mut net, v[0], Vertex::new(42)),
            Err(Error::UnknownVertex(42))
        );
        assert!(net.edges().all(|e| e.flow == 0));
    }

    #[test]
    fn cancels_flow_through_reverse_arcs() {
        // s -> a -> b -> t and s -> c -> b share b -> t; the second unit has to
        // reroute a's flow to a -> d -> e -> t.
        let mut net = FlowNetwork::new();
        let names = ["s", "a", "b", "c", "d", "e", "t"];
        let v: Vec<_> = names.iter().map(|&n| net.add_vertex(n)).collect();
        for (u, w) in [(0, 1), (1, 2), (2, 6), (0, 3), (3, 2), (1, 4), (4, 5), (5, 6)] {
            net.add_edge(v[u], v[w], 1).unwrap();
        }
        assert_eq!(ShortestAugmentingPath::new().run(&mut net, v[0], v[6]), Ok(2));
        assert!(FlowValidator::is_max_flow(&net, v[0], v[6]));
    }

    #[test]
    fn parallel_and_antiparallel_edges() {
        let mut net = FlowNetwork::new();
        let s = net.add_vertex("s");
        let a = net.add_vertex("a");
        let t = net.add_vertex("t");
        net.add_edge(s, a, 2).unwrap();
        net.add_edge(s, a, 0).unwrap();
        net.add_edge(s, a, 5).unwrap();
        net.add_edge(a, s, 9).unwrap();
        net.add_edge(a, t, 4).unwrap();
        net.add_edge(a, t, 4).unwrap();
        net.add_edge(t, a, 1).unwrap();
        net.add_edge(a, a, 3).unwrap();

        assert_eq!(ShortestAugmentingPath::new().run(&mut net, s, t), Ok(7));
        assert!(FlowValidator::is_max_flow(&net, s, t));
    }

    #[test]
    fn cold_start_discards_initial_flow() {
        let (mut net, v) = diamond();
        let e = net.out_edges(v[0]).next().unwrap();
        net.set_flow(e, 8);
        assert!(!FlowValidator::is_max_flow(&net, v[0], v[5]));
        assert_eq!(ShortestAugmentingPath::new().run(&mut net, v[0], v[5]), Ok(6));
        assert!(FlowValidator::is_max_flow(&net, v[0], v[5]));
    }

    #[test]
    fn warm_start_continues_from_feasible_flow() {
        let (mut net, v) = diamond();
        for e in net.edge_ids().collect::<Vec<_>>() {
            let (a, b) = net.endpoints(e);
            if [a, b].iter().all(|x| [v[0], v[4], v[5]].contains(x)) {
                net.set_flow(e, 2);
            }
        }
        let mut sap = ShortestAugmentingPath::new().warm_start(true);
        assert_eq!(sap.run(&mut net, v[0], v[5]), Ok(6));
        assert_eq!(sap.stats().augmentations, 2);
    }

    #[test]
    fn warm_start_rejects_infeasible_flow() {
        let (mut net, v) = diamond();
        let e = net.out_edges(v[1]).next().unwrap();
        net.set_flow(e, 1);
        let mut sap = ShortestAugmentingPath::new().warm_start(true);
        assert!(matches!(
            sap.run(&mut net, v[0], v[5]),
            Err(Error::InfeasibleInitialFlow(_))
        ));
        assert_eq!(net.flow(e), 1);
    }

    #[derive(Default)]
    struct Recorder {
        advances: usize,
        retreats: usize,
        deltas: Vec<i32>,
    }

    impl SolveObserver<i32> for Recorder {
        fn advance(&mut self, _from: Vertex, _to: Vertex, _arc: ResidualArc) {
            self.advances += 1;
        }

        fn retreat(&mut self, _vertex: Vertex, _new_label: usize) {
            self.retreats += 1;
        }

        fn augment(&mut self, delta: i32, _path_len: usize) {
            self.deltas.push(delta);
        }
    }

    #[test]
    fn observer_sees_every_step() {
        let (mut net, v) = diamond();
        let mut sap = ShortestAugmentingPath::new().with_observer(Recorder::default());
        assert_eq!(sap.run(&mut net, v[0], v[5]), Ok(6));
        let stats = sap.stats();
        let recorder = sap.into_observer();
        assert_eq!(recorder.deltas, vec![3, 3]);
        assert_eq!(recorder.advances, stats.advances);
        assert_eq!(recorder.retreats, stats.retreats);
    }
}

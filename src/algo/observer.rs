use core::fmt::Display;

use crate::algo::distance::DistanceLabels;
use crate::network::Vertex;
use crate::residual::ResidualArc;

/// Hooks invoked by the solver at its trace points. All methods default to
/// no-ops, and `()` is the silent observer.
pub trait SolveObserver<A> {
    fn iteration(&mut self, _iteration: usize, _current: Vertex, _labels: &DistanceLabels) {}

    fn advance(&mut self, _from: Vertex, _to: Vertex, _arc: ResidualArc) {}

    fn retreat(&mut self, _vertex: Vertex, _new_label: usize) {}

    fn augment(&mut self, _delta: A, _path_len: usize) {}
}

impl<A> SolveObserver<A> for () {}

/// Counters collected during a single solve.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SolveStats {
    pub iterations: usize,
    pub advances: usize,
    pub retreats: usize,
    pub augmentations: usize,
}

/// Writes solver progress to the `log` facade at trace level, sampling one
/// iteration out of every `period`.
#[derive(Clone, Debug)]
pub struct LogObserver {
    period: usize,
    current: usize,
}

impl LogObserver {
    pub fn every(period: usize) -> Self {
        Self {
            period: period.max(1),
            current: 0,
        }
    }

    fn sampled(&self) -> bool {
        self.current % self.period == 0
    }
}

impl Default for LogObserver {
    fn default() -> Self {
        Self::every(1000)
    }
}

impl<A: Display> SolveObserver<A> for LogObserver {
    fn iteration(&mut self, iteration: usize, current: Vertex, labels: &DistanceLabels) {
        self.current = iteration;
        if self.sampled() {
            log::trace!(
                "loop {iteration}: at {}, d = {:?}",
                current.index(),
                labels.get(current)
            );
        }
    }

    fn advance(&mut self, from: Vertex, to: Vertex, arc: ResidualArc) {
        if self.sampled() {
            let kind = if arc.forward { "edge" } else { "reverse edge" };
            log::trace!("advance {} -> {} along {kind}", from.index(), to.index());
        }
    }

    fn retreat(&mut self, vertex: Vertex, new_label: usize) {
        if self.sampled() {
            log::trace!("retreat from {}, relabelled to {new_label}", vertex.index());
        }
    }

    fn augment(&mut self, delta: A, path_len: usize) {
        log::trace!("augment {delta} along {path_len} arcs");
    }
}

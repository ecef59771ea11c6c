use alloc::string::String;

use displaydoc::Display;

#[derive(Clone, Debug, PartialEq, Eq, Display)]
pub enum Error {
    /// Invalid edge capacity {0}, expected a non-negative value
    NegativeCapacity(String),
    /// Vertex index {0} does not belong to the network
    UnknownVertex(usize),
    /// Source and sink must be distinct vertices
    SourceIsSink,
    /// Vertex name `{0}` is used more than once
    DuplicateVertexName(String),
    /// Initial flow is not feasible: {0}
    InfeasibleInitialFlow(String),
    /// Arithmetic overflow while summing flow values
    ArithmeticOverflow,
    /// Predecessor bookkeeping is inconsistent at vertex {0}
    CorruptedPath(usize),
}

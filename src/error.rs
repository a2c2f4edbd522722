use thiserror::Error;

/// Errors surfaced synchronously by graph construction, reordering and
/// scene operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ThreadArcsError {
    #[error("cycle detected while resolving depth of node {node}")]
    Cycle { node: usize },

    #[error("node {from} links to {target}, but the graph only has {len} nodes")]
    TargetOutOfRange {
        from: usize,
        target: usize,
        len: usize,
    },

    #[error("node index {index} is out of range for {len} nodes")]
    NodeOutOfRange { index: usize, len: usize },

    #[error("invalid permutation: {reason}")]
    InvalidPermutation { reason: String },

    #[error("{nodes} nodes were given with {links} adjacency entries")]
    LengthMismatch { nodes: usize, links: usize },

    #[error("option `{name}` has invalid value {value}")]
    InvalidOption { name: &'static str, value: f64 },

    #[error("the diagram has not been drawn yet")]
    NotDrawn,
}

pub type Result<T, E = ThreadArcsError> = std::result::Result<T, E>;

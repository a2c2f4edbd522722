mod depth;
mod invert;
mod reorder;

pub use depth::compute_depths;
pub use invert::{invert, revert};

use tracing::debug;

use crate::error::{Result, ThreadArcsError};

/// Side of the axis an arc bows towards.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Direction {
    #[default]
    Positive,
    Negative,
}

impl Direction {
    pub fn sign(self) -> f64 {
        match self {
            Self::Positive => 1.0,
            Self::Negative => -1.0,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Self::Positive => Self::Negative,
            Self::Negative => Self::Positive,
        }
    }

    /// Alternates by generation: even depths bow negative, odd depths positive.
    pub fn for_depth(depth: usize) -> Self {
        if depth % 2 == 0 {
            Self::Negative
        } else {
            Self::Positive
        }
    }
}

/// One outgoing link: target node index plus the side its arc is drawn on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ArcTarget {
    pub index: usize,
    pub dir: Direction,
}

impl ArcTarget {
    pub fn new(index: usize, dir: Direction) -> Self {
        Self { index, dir }
    }

    pub fn positive(index: usize) -> Self {
        Self::new(index, Direction::Positive)
    }

    /// Decodes the signed form where the magnitude is the target and the sign
    /// the direction. Zero carries no sign and reads as positive.
    pub fn from_signed(value: i64) -> Self {
        let dir = if value < 0 {
            Direction::Negative
        } else {
            Direction::Positive
        };
        Self::new(value.unsigned_abs() as usize, dir)
    }

    pub fn to_signed(self) -> i64 {
        let magnitude = self.index as i64;
        match self.dir {
            Direction::Positive => magnitude,
            Direction::Negative => -magnitude,
        }
    }
}

pub type Adjacency = Vec<Vec<ArcTarget>>;

/// Forward and inverse adjacency of a thread plus the per-node depth and
/// degree counts derived from them. Rebuilt in full whenever the order changes.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphIndex {
    adjacency: Adjacency,
    inverse: Vec<Vec<usize>>,
    depths: Vec<usize>,
    children: Vec<usize>,
    parents: Vec<usize>,
}

impl GraphIndex {
    pub fn new(adjacency: Adjacency) -> Result<Self> {
        let len = adjacency.len();
        for (from, targets) in adjacency.iter().enumerate() {
            if let Some(target) = targets.iter().find(|target| target.index >= len) {
                return Err(ThreadArcsError::TargetOutOfRange {
                    from,
                    target: target.index,
                    len,
                });
            }
        }

        let inverse = invert(&adjacency);
        let depths = compute_depths(&inverse)?;
        let children = adjacency.iter().map(Vec::len).collect();
        let parents = inverse.iter().map(Vec::len).collect();

        debug!(
            nodes = len,
            edges = adjacency.iter().map(Vec::len).sum::<usize>(),
            "graph index built"
        );

        Ok(Self {
            adjacency,
            inverse,
            depths,
            children,
            parents,
        })
    }

    pub fn from_signed(links: &[Vec<i64>]) -> Result<Self> {
        let adjacency = links
            .iter()
            .map(|targets| targets.iter().copied().map(ArcTarget::from_signed).collect())
            .collect();
        Self::new(adjacency)
    }

    /// Builds the index from parent lists, deriving forward adjacency with
    /// positive arcs. Parent order decides the order of each node's targets.
    pub fn from_parents(parents: &[Vec<usize>]) -> Result<Self> {
        let len = parents.len();
        for (child, list) in parents.iter().enumerate() {
            if let Some(&parent) = list.iter().find(|&&parent| parent >= len) {
                return Err(ThreadArcsError::TargetOutOfRange {
                    from: child,
                    target: parent,
                    len,
                });
            }
        }
        Self::new(revert(parents))
    }

    pub fn len(&self) -> usize {
        self.adjacency.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    pub fn adjacency(&self) -> &Adjacency {
        &self.adjacency
    }

    pub fn inverse(&self) -> &[Vec<usize>] {
        &self.inverse
    }

    pub fn depths(&self) -> &[usize] {
        &self.depths
    }

    pub fn depth(&self, index: usize) -> Option<usize> {
        self.depths.get(index).copied()
    }

    pub fn children(&self, index: usize) -> usize {
        self.children.get(index).copied().unwrap_or(0)
    }

    pub fn parents(&self, index: usize) -> usize {
        self.parents.get(index).copied().unwrap_or(0)
    }

    pub fn edges(&self) -> impl Iterator<Item = (usize, ArcTarget)> + '_ {
        self.adjacency
            .iter()
            .enumerate()
            .flat_map(|(from, targets)| targets.iter().map(move |&target| (from, target)))
    }

    /// Largest `|target - source|` over all edges, in index units.
    pub fn max_span(&self) -> usize {
        self.edges()
            .map(|(from, target)| from.abs_diff(target.index))
            .max()
            .unwrap_or(0)
    }

    pub fn check_node(&self, index: usize) -> Result<()> {
        if index < self.len() {
            Ok(())
        } else {
            Err(ThreadArcsError::NodeOutOfRange {
                index,
                len: self.len(),
            })
        }
    }
}

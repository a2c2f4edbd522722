use crate::error::{Result, ThreadArcsError};

use super::{ArcTarget, Direction, GraphIndex};

/// Inverse lookup of `order`: `positions[old] = new`. Fails unless `order`
/// is a bijection over `0..len`.
pub(crate) fn position_lookup(order: &[usize], len: usize) -> Result<Vec<usize>> {
    if order.len() != len {
        return Err(ThreadArcsError::InvalidPermutation {
            reason: format!("expected {len} indices, got {}", order.len()),
        });
    }

    let mut positions = vec![usize::MAX; len];
    for (new, &old) in order.iter().enumerate() {
        if old >= len {
            return Err(ThreadArcsError::InvalidPermutation {
                reason: format!("index {old} is out of range for {len} nodes"),
            });
        }
        if positions[old] != usize::MAX {
            return Err(ThreadArcsError::InvalidPermutation {
                reason: format!("index {old} appears more than once"),
            });
        }
        positions[old] = new;
    }

    Ok(positions)
}

impl GraphIndex {
    /// Re-expresses the graph in the index space given by `order`, where
    /// `order[new] = old`. Every edge is redirected by its source's depth
    /// parity so consecutive generations bow to opposite sides.
    ///
    /// Returns the rebuilt index and the `old -> new` position map.
    pub fn reorder(&self, order: &[usize]) -> Result<(GraphIndex, Vec<usize>)> {
        let positions = position_lookup(order, self.len())?;

        let adjacency = order
            .iter()
            .map(|&old| {
                let dir = Direction::for_depth(self.depths[old]);
                self.adjacency[old]
                    .iter()
                    .map(|target| ArcTarget::new(positions[target.index], dir))
                    .collect()
            })
            .collect();

        Ok((GraphIndex::new(adjacency)?, positions))
    }
}

use super::{Adjacency, ArcTarget};

/// Parent lists: `inverse[j]` holds every `i` with an edge `i -> j`, in the
/// order the edges are encountered. Targets must already be in range.
pub fn invert(adjacency: &Adjacency) -> Vec<Vec<usize>> {
    let mut inverse = vec![Vec::new(); adjacency.len()];
    for (from, targets) in adjacency.iter().enumerate() {
        for target in targets {
            inverse[target.index].push(from);
        }
    }
    inverse
}

/// Turns parent lists back into forward adjacency with positive arcs.
pub fn revert(inverse: &[Vec<usize>]) -> Adjacency {
    let mut adjacency = vec![Vec::new(); inverse.len()];
    for (child, parents) in inverse.iter().enumerate() {
        for &parent in parents {
            adjacency[parent].push(ArcTarget::positive(child));
        }
    }
    adjacency
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Direction;

    #[test]
    fn collects_parents_per_node() {
        let adjacency = vec![
            vec![ArcTarget::positive(1), ArcTarget::new(2, Direction::Negative)],
            vec![ArcTarget::positive(2)],
            vec![],
        ];
        assert_eq!(invert(&adjacency), vec![vec![], vec![0], vec![0, 1]]);
    }

    #[test]
    fn revert_undoes_invert_up_to_order() {
        let adjacency = vec![
            vec![ArcTarget::positive(2), ArcTarget::positive(1)],
            vec![ArcTarget::positive(3)],
            vec![ArcTarget::positive(3)],
            vec![],
        ];
        let mut round_trip = revert(&invert(&adjacency));
        let mut expected = adjacency.clone();
        for list in round_trip.iter_mut().chain(expected.iter_mut()) {
            list.sort_by_key(|target| target.index);
        }
        assert_eq!(round_trip, expected);
    }
}

use crate::graph::GraphIndex;

/// How [`crate::ThreadArcs::sort`] picks the new node order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SortStrategy {
    /// Explicit order of current indices: `order[new] = old`.
    Permutation(Vec<usize>),
    /// Older generations first, then nodes with more children first.
    ByGeneration,
    /// Roots to the front, each one placed ahead of the roots seen before it.
    DepthZeroFirst,
}

impl SortStrategy {
    pub fn order(&self, graph: &GraphIndex) -> Vec<usize> {
        match self {
            Self::Permutation(order) => order.clone(),
            Self::ByGeneration => by_generation(graph),
            Self::DepthZeroFirst => depth_zero_first(graph),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Permutation(_) => "permutation",
            Self::ByGeneration => "by-generation",
            Self::DepthZeroFirst => "depth-zero-first",
        }
    }
}

pub fn by_generation(graph: &GraphIndex) -> Vec<usize> {
    let mut order = (0..graph.len()).collect::<Vec<_>>();
    // `sort_by` is stable, remaining ties keep their current order.
    order.sort_by(|&a, &b| {
        graph.depths()[a]
            .cmp(&graph.depths()[b])
            .then_with(|| graph.children(b).cmp(&graph.children(a)))
    });
    order
}

/// Roots first, latest root in front, then everything else in index order.
pub fn depth_zero_first(graph: &GraphIndex) -> Vec<usize> {
    let (mut roots, rest): (Vec<usize>, Vec<usize>) =
        (0..graph.len()).partition(|&index| graph.depths()[index] == 0);
    roots.reverse();
    roots.extend(rest);
    roots
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_ties_stay_in_place() {
        let graph = GraphIndex::from_signed(&[vec![1, 2], vec![], vec![]]).unwrap();
        assert_eq!(by_generation(&graph), vec![0, 1, 2]);
    }

    #[test]
    fn generation_puts_bushier_nodes_first() {
        // 3 is a root; 1 has one child, 2 has two
        let graph = GraphIndex::from_signed(&[
            vec![],
            vec![4],
            vec![5, 6],
            vec![1, 2],
            vec![],
            vec![],
            vec![],
        ])
        .unwrap();
        assert_eq!(graph.depths(), &[0, 1, 1, 0, 2, 2, 2]);
        assert_eq!(by_generation(&graph), vec![3, 0, 2, 1, 4, 5, 6]);
    }

    #[test]
    fn later_roots_come_first() {
        let graph = GraphIndex::from_signed(&[vec![1], vec![], vec![]]).unwrap();
        assert_eq!(graph.depths(), &[0, 1, 0]);
        assert_eq!(depth_zero_first(&graph), vec![2, 0, 1]);
    }

    #[test]
    fn roots_reverse_and_the_rest_keep_index_order() {
        let graph = GraphIndex::from_signed(&[vec![3], vec![], vec![], vec![], vec![]]).unwrap();
        assert_eq!(depth_zero_first(&graph), vec![4, 2, 1, 0, 3]);
    }

    #[test]
    fn permutation_is_taken_verbatim() {
        let graph = GraphIndex::from_signed(&[vec![], vec![]]).unwrap();
        assert_eq!(
            SortStrategy::Permutation(vec![1, 0]).order(&graph),
            vec![1, 0]
        );
    }
}

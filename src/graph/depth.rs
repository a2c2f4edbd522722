use crate::error::{Result, ThreadArcsError};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mark {
    Unvisited,
    InProgress,
    Done(usize),
}

/// Depth of every node from its parent lists: 0 without parents, otherwise
/// one more than the shallowest parent. Nodes may appear in any index order.
///
/// Each node is resolved once. Meeting a node that is still being resolved
/// means the graph has a cycle and fails with [`ThreadArcsError::Cycle`].
pub fn compute_depths(inverse: &[Vec<usize>]) -> Result<Vec<usize>> {
    let len = inverse.len();
    let mut marks = vec![Mark::Unvisited; len];
    // (node, next parent to look at)
    let mut stack: Vec<(usize, usize)> = Vec::new();

    for start in 0..len {
        if marks[start] != Mark::Unvisited {
            continue;
        }

        marks[start] = Mark::InProgress;
        stack.push((start, 0));

        while let Some(top) = stack.last_mut() {
            let node = top.0;
            let parents = &inverse[node];

            if let Some(&parent) = parents.get(top.1) {
                top.1 += 1;
                if parent >= len {
                    return Err(ThreadArcsError::NodeOutOfRange { index: parent, len });
                }
                match marks[parent] {
                    Mark::Done(_) => {}
                    Mark::InProgress => return Err(ThreadArcsError::Cycle { node: parent }),
                    Mark::Unvisited => {
                        marks[parent] = Mark::InProgress;
                        stack.push((parent, 0));
                    }
                }
                continue;
            }

            let depth = parents
                .iter()
                .filter_map(|&parent| match marks[parent] {
                    Mark::Done(depth) => Some(depth),
                    _ => None,
                })
                .min()
                .map_or(0, |shallowest| shallowest + 1);
            marks[node] = Mark::Done(depth);
            stack.pop();
        }
    }

    Ok(marks
        .into_iter()
        .map(|mark| match mark {
            Mark::Done(depth) => depth,
            _ => 0,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roots_are_depth_zero() {
        assert_eq!(compute_depths(&[vec![], vec![]]).unwrap(), vec![0, 0]);
        assert_eq!(compute_depths(&[]).unwrap(), Vec::<usize>::new());
    }

    #[test]
    fn takes_shallowest_parent() {
        // 0 -> 1 -> 2 -> 3 and 0 -> 3
        let inverse = vec![vec![], vec![0], vec![1], vec![2, 0]];
        assert_eq!(compute_depths(&inverse).unwrap(), vec![0, 1, 2, 1]);
    }

    #[test]
    fn children_listed_before_parents() {
        // 2 -> 1 -> 0
        let inverse = vec![vec![1], vec![2], vec![]];
        assert_eq!(compute_depths(&inverse).unwrap(), vec![2, 1, 0]);
    }

    #[test]
    fn detects_cycles() {
        let inverse = vec![vec![2], vec![0], vec![1]];
        assert!(matches!(
            compute_depths(&inverse),
            Err(ThreadArcsError::Cycle { .. })
        ));
    }

    #[test]
    fn detects_self_loops() {
        assert_eq!(
            compute_depths(&[vec![0]]),
            Err(ThreadArcsError::Cycle { node: 0 })
        );
    }
}

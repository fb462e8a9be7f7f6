//! Best-first search in the style of
//! [pathfinding's astar function](https://docs.rs/pathfinding/latest/pathfinding/directed/astar/index.html).
//! Discovered nodes live in an insertion-ordered arena whose indices double as parent links, so
//! the path is only materialised once the goal is popped.
use fxhash::FxBuildHasher;
use indexmap::map::Entry::{Occupied, Vacant};
use indexmap::IndexMap;
use log::{debug, warn};
use num_traits::Zero;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::hash::Hash;

type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;

const NO_PARENT: usize = usize::MAX;

/// Arena entry for a discovered node.
struct SearchNode<C> {
    parent: usize,
    cost: C,
    closed: bool,
}

struct FrontierEntry<C> {
    estimated_cost: C,
    cost: C,
    sequence: usize,
    index: usize,
}

impl<C: PartialEq> Eq for FrontierEntry<C> {}

impl<C: PartialEq> PartialEq for FrontierEntry<C> {
    fn eq(&self, other: &Self) -> bool {
        self.estimated_cost.eq(&other.estimated_cost) && self.sequence == other.sequence
    }
}

impl<C: Ord> PartialOrd for FrontierEntry<C> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<C: Ord> Ord for FrontierEntry<C> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Smallest estimated cost first; among equals the entry pushed first wins, which keeps
        // the expansion order (and thus the returned path) stable.
        match other.estimated_cost.cmp(&self.estimated_cost) {
            Ordering::Equal => other.sequence.cmp(&self.sequence),
            s => s,
        }
    }
}

fn reverse_path<N, C>(nodes: &FxIndexMap<N, SearchNode<C>>, goal: usize) -> Vec<N>
where
    N: Eq + Hash + Clone,
{
    let mut path: Vec<N> = std::iter::successors(Some(goal), |&i| {
        nodes
            .get_index(i)
            .map(|(_, node)| node.parent)
            .filter(|&p| p != NO_PARENT)
    })
    .filter_map(|i| nodes.get_index(i).map(|(n, _)| n.clone()))
    .collect();
    path.reverse();
    path
}

/// Runs A* from `start` until `success` accepts a popped node, returning the path including both
/// ends and its cost. Successors are pushed in the order `successors` yields them. Nodes are
/// never expanded twice. Returns [None] once the frontier is exhausted or more than
/// `expansion_limit` nodes have been expanded.
pub fn astar<N, C, FN, IN, FH, FS>(
    start: &N,
    mut successors: FN,
    mut heuristic: FH,
    mut success: FS,
    expansion_limit: usize,
) -> Option<(Vec<N>, C)>
where
    N: Eq + Hash + Clone,
    C: Zero + Ord + Copy,
    FN: FnMut(&N) -> IN,
    IN: IntoIterator<Item = (N, C)>,
    FH: FnMut(&N) -> C,
    FS: FnMut(&N) -> bool,
{
    let mut to_see = BinaryHeap::new();
    to_see.push(FrontierEntry {
        estimated_cost: heuristic(start),
        cost: Zero::zero(),
        sequence: 0,
        index: 0,
    });
    let mut sequence = 0;
    let mut expanded = 0;
    let mut nodes: FxIndexMap<N, SearchNode<C>> = FxIndexMap::default();
    nodes.insert(
        start.clone(),
        SearchNode {
            parent: NO_PARENT,
            cost: Zero::zero(),
            closed: false,
        },
    );
    while let Some(FrontierEntry { cost, index, .. }) = to_see.pop() {
        let successors = {
            let Some((node, entry)) = nodes.get_index_mut(index) else {
                continue;
            };
            // A node may sit in the heap several times if a cheaper way to it was found after
            // it was first pushed. Only the first pop counts.
            if entry.closed || cost > entry.cost {
                continue;
            }
            entry.closed = true;
            if success(node) {
                debug!("Goal reached after expanding {} nodes", expanded);
                let path = reverse_path(&nodes, index);
                return Some((path, cost));
            }
            expanded += 1;
            if expanded > expansion_limit {
                warn!(
                    "Expansion limit of {} reached, abandoning search",
                    expansion_limit
                );
                return None;
            }
            successors(node)
        };
        for (successor, move_cost) in successors {
            let new_cost = cost + move_cost;
            let h; // heuristic(&successor)
            let n; // index for successor
            match nodes.entry(successor) {
                Vacant(e) => {
                    h = heuristic(e.key());
                    n = e.index();
                    e.insert(SearchNode {
                        parent: index,
                        cost: new_cost,
                        closed: false,
                    });
                }
                Occupied(mut e) => {
                    if !e.get().closed && e.get().cost > new_cost {
                        h = heuristic(e.key());
                        n = e.index();
                        e.insert(SearchNode {
                            parent: index,
                            cost: new_cost,
                            closed: false,
                        });
                    } else {
                        continue;
                    }
                }
            }

            sequence += 1;
            to_see.push(FrontierEntry {
                estimated_cost: new_cost + h,
                cost: new_cost,
                sequence,
                index: n,
            });
        }
    }
    debug!("Frontier exhausted after expanding {} nodes", expanded);
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Nodes on a number line, moving by one in either direction inside `0..=10`.
    fn line_successors(n: &i32) -> Vec<(i32, u32)> {
        [n - 1, n + 1]
            .into_iter()
            .filter(|m| (0..=10).contains(m))
            .map(|m| (m, 1))
            .collect()
    }

    #[test]
    fn start_is_goal() {
        let result = astar(&3, line_successors, |_| 0u32, |n| *n == 3, usize::MAX);
        assert_eq!(result, Some((vec![3], 0)));
    }

    #[test]
    fn straight_line() {
        let result = astar(
            &2,
            line_successors,
            |n| (7 - n).unsigned_abs(),
            |n| *n == 7,
            usize::MAX,
        );
        assert_eq!(result, Some((vec![2, 3, 4, 5, 6, 7], 5)));
    }

    #[test]
    fn unreachable_goal() {
        let result = astar(&2, line_successors, |_| 0u32, |n| *n == 20, usize::MAX);
        assert_eq!(result, None);
    }

    #[test]
    fn expansion_limit() {
        let result = astar(&0, line_successors, |_| 0u32, |n| *n == 10, 3);
        assert_eq!(result, None);
        let result = astar(&0, line_successors, |_| 0u32, |n| *n == 10, 10);
        assert_eq!(result.map(|(_, c)| c), Some(10));
    }

    /// Two equal-cost routes around a diamond: the successor yielded first is kept.
    #[test]
    fn ties_follow_insertion_order() {
        let diamond = |n: &char| -> Vec<(char, u32)> {
            match n {
                's' => vec![('a', 1), ('b', 1)],
                'a' | 'b' => vec![('g', 1)],
                _ => vec![],
            }
        };
        let (path, _) = astar(&'s', diamond, |_| 0u32, |n| *n == 'g', usize::MAX).unwrap();
        assert_eq!(path, vec!['s', 'a', 'g']);

        let flipped = |n: &char| -> Vec<(char, u32)> {
            match n {
                's' => vec![('b', 1), ('a', 1)],
                'a' | 'b' => vec![('g', 1)],
                _ => vec![],
            }
        };
        let (path, _) = astar(&'s', flipped, |_| 0u32, |n| *n == 'g', usize::MAX).unwrap();
        assert_eq!(path, vec!['s', 'b', 'g']);
    }

    /// A cheaper route discovered later replaces the recorded parent.
    #[test]
    fn cheaper_route_replaces_parent() {
        let graph = |n: &char| -> Vec<(char, u32)> {
            match n {
                's' => vec![('g', 10), ('a', 1)],
                'a' => vec![('g', 1)],
                _ => vec![],
            }
        };
        let result = astar(&'s', graph, |_| 0u32, |n| *n == 'g', usize::MAX);
        assert_eq!(result, Some((vec!['s', 'a', 'g'], 2)));
    }
}

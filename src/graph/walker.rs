use std::collections::{HashSet, VecDeque};
use std::hash::Hash;

use crate::error::DesignResult;

/// Breadth first walk from `root`.
///
/// `rank_children` returns the children of a vertex in the order they should be queued, and
/// `visit` is called once per reachable vertex in visiting order. A vertex reachable along
/// several paths is visited at its first discovery only.
pub fn breadth_first<N, R, V>(root: N, mut rank_children: R, mut visit: V) -> DesignResult<()>
where
    N: Clone + Eq + Hash,
    R: FnMut(&N) -> DesignResult<Vec<N>>,
    V: FnMut(&N),
{
    let mut discovered = HashSet::new();
    discovered.insert(root.clone());
    let mut queue = VecDeque::from([root]);

    while let Some(current) = queue.pop_front() {
        visit(&current);
        for child in rank_children(&current)? {
            if discovered.insert(child.clone()) {
                queue.push_back(child);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn test_children_queued_in_ranked_order() {
        let children: HashMap<u32, Vec<u32>> =
            HashMap::from([(1, vec![3, 2]), (2, vec![4]), (3, vec![4, 5]), (5, vec![1])]);
        let mut visited = vec![];
        breadth_first(
            1u32,
            |n| Ok(children.get(n).cloned().unwrap_or_default()),
            |n| visited.push(*n),
        )
        .unwrap();
        assert_eq!(vec![1, 3, 2, 4, 5], visited);
    }
}

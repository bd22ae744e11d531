use smallvec::SmallVec;
use std::{collections::VecDeque, slice::Iter};

/// A Directed Acyclic Graph (DAG).
///
/// This is the search structure of the Kirkpatrick hierarchy. A tree won't cut it because a
/// triangle of the finer level usually overlaps several triangles of the coarser level, so it
/// ends up with several parents.
///
/// It is implemented using an arena: the nodes live in a simple [`Vec`] and refer to each other
/// with [`usize`] indices. Nodes are never removed, which is exactly the case where an arena
/// shines. Node `0` is the root.
#[derive(Debug, Default, Clone)]
pub(crate) struct Dag<T> {
    arena: Vec<Node<T>>,
}

impl<T> Dag<T> {
    /// Constructs a new empty DAG.
    pub(crate) fn new() -> Self {
        Dag { arena: Vec::new() }
    }

    /// Add a new node to the DAG. Returns the index of the node.
    pub(crate) fn add(&mut self, data: T) -> usize {
        let idx = self.arena.len();
        self.arena.push(Node::new(data));
        idx
    }

    /// Returns the number of nodes in the DAG.
    pub(crate) fn count(&self) -> usize {
        self.arena.len()
    }

    /// Get a shared reference to the node with index `idx`, if it exists.
    pub(crate) fn get(&self, idx: usize) -> Option<&Node<T>> {
        self.arena.get(idx)
    }

    /// An iterator over the DAG's nodes.
    pub(crate) fn iter(&self) -> Iter<'_, Node<T>> {
        self.arena.iter()
    }

    /// Gets the given index’ corresponding entry in the DAG for in-place manipulation.
    pub(crate) fn entry(&mut self, idx: usize) -> Entry<'_, T> {
        Entry { idx, dag: self }
    }

    /// Length of the shortest path from the root to each node, indexed like the arena.
    ///
    /// Nodes that cannot be reached from the root get `None`.
    pub(crate) fn depths(&self) -> Vec<Option<usize>> {
        let mut depths = vec![None; self.arena.len()];
        if self.arena.is_empty() {
            return depths;
        }
        depths[0] = Some(0);
        let mut queue = VecDeque::from([0]);
        while let Some(idx) = queue.pop_front() {
            let depth = depths[idx].map(|d| d + 1);
            for &child in &self.arena[idx].children {
                if depths[child].is_none() {
                    depths[child] = depth;
                    queue.push_back(child);
                }
            }
        }
        depths
    }

    /// Length of the longest path starting at each node, indexed like the arena.
    pub(crate) fn heights(&self) -> Vec<usize> {
        let n = self.arena.len();
        let mut heights: Vec<Option<usize>> = vec![None; n];
        for start in 0..n {
            if heights[start].is_some() {
                continue;
            }
            let mut stack = vec![(start, false)];
            while let Some((idx, expanded)) = stack.pop() {
                if heights[idx].is_some() {
                    continue;
                }
                let children = &self.arena[idx].children;
                if expanded {
                    let height = children
                        .iter()
                        .filter_map(|&child| heights[child])
                        .map(|h| h + 1)
                        .max()
                        .unwrap_or(0);
                    heights[idx] = Some(height);
                } else {
                    stack.push((idx, true));
                    stack.extend(
                        children
                            .iter()
                            .filter(|&&child| heights[child].is_none())
                            .map(|&child| (child, false)),
                    );
                }
            }
        }
        heights.into_iter().map(|h| h.unwrap_or(0)).collect()
    }
}

/// A node of the DAG.
#[derive(Debug, Default, Clone)]
pub(crate) struct Node<T> {
    pub(crate) data: T,
    pub(crate) children: SmallVec<[usize; 4]>,
}

impl<T> Node<T> {
    fn new(data: T) -> Self {
        Node {
            data,
            children: SmallVec::new(),
        }
    }
}

/// A view into a single entry in a DAG.
pub(crate) struct Entry<'a, T> {
    idx: usize,
    dag: &'a mut Dag<T>,
}

impl<T> Entry<'_, T> {
    /// Appends an existing node to the entry's children, if both exist.
    pub(crate) fn append(&mut self, idx: usize) -> Option<usize> {
        if self.dag.get(idx).is_some() && self.dag.get(self.idx).is_some() {
            self.dag.arena[self.idx].children.push(idx);
            Some(idx)
        } else {
            None
        }
    }

    /// Modifies the entry's data in place, if it exists.
    pub(crate) fn and_modify<F>(self, f: F) -> Self
    where
        F: FnOnce(&mut T),
    {
        if let Some(node) = self.dag.arena.get_mut(self.idx) {
            f(&mut node.data);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_empty_dag() {
        let dag = Dag::<usize>::new();

        assert_eq!(dag.count(), 0);
        assert!(dag.heights().is_empty());
        assert!(dag.depths().is_empty());
    }

    #[test]
    fn create_node() {
        let node = Node::new(0);

        assert_eq!(node.children.len(), 0);
    }

    #[test]
    fn add_node_to_dag() {
        let mut dag = Dag::new();

        let idx_42 = dag.add(42);
        assert_eq!(idx_42, 0);
        assert_eq!(dag.count(), 1);
        assert_eq!(dag.depths(), [Some(0)]);

        let idx_314 = dag.add(314);
        assert_eq!(dag.entry(idx_42).append(idx_314), Some(1));
        assert_eq!(dag.count(), 2);
        assert_eq!(dag.depths(), [Some(0), Some(1)]);

        assert_eq!(dag.entry(7).append(0), None);
        assert_eq!(dag.entry(idx_42).append(7), None);
        assert_eq!(dag.count(), 2);
    }

    #[test]
    fn modify_entry() {
        let mut dag = Dag::new();
        let idx = dag.add(42);

        dag.entry(idx).and_modify(|data| *data += 1);
        dag.entry(7).and_modify(|data| *data += 1);

        assert_eq!(dag.get(idx).map(|node| node.data), Some(43));
    }

    #[test]
    fn unreachable_node_has_no_depth() {
        let mut dag = Dag::new();
        dag.add(0);
        let orphan = dag.add(1);

        assert_eq!(dag.depths()[orphan], None);
    }

    #[test]
    fn dag_iter() {
        let mut dag = Dag::new();
        dag.add(42);
        dag.add(314);

        let values: Vec<usize> = dag.iter().map(|node| node.data).collect();

        assert_eq!(&values, &[42, 314]);
    }

    #[test]
    fn heights_follow_the_longest_path() {
        //
        //    0
        //   / \
        //  1   |
        //   \  |
        //    2-+
        //    |
        //    3
        //
        let mut dag = Dag::new();
        let root = dag.add('r');
        let a = dag.add('a');
        let b = dag.add('b');
        let c = dag.add('c');
        dag.entry(root).append(a);
        dag.entry(root).append(b);
        dag.entry(a).append(b);
        dag.entry(b).append(c);

        assert_eq!(dag.heights(), vec![3, 2, 1, 0]);
        // Shortest path
        assert_eq!(dag.depths(), [Some(0), Some(1), Some(1), Some(2)]);
    }
}

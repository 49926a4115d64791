use std::collections::BTreeSet;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("Atom index {index} is out of range for a graph of {node_count} atoms")]
    IndexOutOfRange { index: usize, node_count: usize },
    #[error("Atom {0} cannot be bonded to itself")]
    SelfBond(usize),
}

/// Dense, order-preserving mapping from pre-removal to post-removal atom indices.
///
/// Built once per deletion batch. Surviving atoms keep their relative order, so
/// the new index of an atom is its old index minus the number of removed atoms
/// below it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexRemap {
    forward: Vec<Option<usize>>,
    new_len: usize,
}

impl IndexRemap {
    pub fn identity(len: usize) -> Self {
        Self {
            forward: (0..len).map(Some).collect(),
            new_len: len,
        }
    }

    /// Builds the remap for removing `removed` from a sequence of `old_len` items.
    /// Indices in `removed` that are out of range are ignored.
    pub fn from_removed(old_len: usize, removed: &BTreeSet<usize>) -> Self {
        let mut forward = Vec::with_capacity(old_len);
        let mut next = 0;
        for old in 0..old_len {
            if removed.contains(&old) {
                forward.push(None);
            } else {
                forward.push(Some(next));
                next += 1;
            }
        }
        Self {
            forward,
            new_len: next,
        }
    }

    /// New index of `old`, or `None` if it was removed or never existed.
    pub fn get(&self, old: usize) -> Option<usize> {
        self.forward.get(old).copied().flatten()
    }

    pub fn old_len(&self) -> usize {
        self.forward.len()
    }

    pub fn new_len(&self) -> usize {
        self.new_len
    }

    pub fn removed_count(&self) -> usize {
        self.old_len() - self.new_len
    }

    /// `(old, new)` pairs for every surviving index, in ascending order.
    pub fn surviving(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.forward
            .iter()
            .enumerate()
            .filter_map(|(old, new)| new.map(|new| (old, new)))
    }
}

/// Undirected bond graph over atom indices `0..node_count`.
///
/// Neighbor sets are ordered, which keeps every traversal over the graph
/// deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BondGraph {
    adjacency: Vec<BTreeSet<usize>>,
}

impl BondGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_nodes(node_count: usize) -> Self {
        Self {
            adjacency: vec![BTreeSet::new(); node_count],
        }
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(BTreeSet::len).sum::<usize>() / 2
    }

    /// Appends an unbonded node and returns its index.
    pub fn add_node(&mut self) -> usize {
        self.adjacency.push(BTreeSet::new());
        self.adjacency.len() - 1
    }

    /// Adds the bond `a`-`b`. Adding an existing bond is a no-op.
    ///
    /// # Return
    ///
    /// Returns `true` if the bond was newly inserted.
    pub fn add_edge(&mut self, a: usize, b: usize) -> Result<bool, GraphError> {
        self.check_index(a)?;
        self.check_index(b)?;
        if a == b {
            return Err(GraphError::SelfBond(a));
        }
        let inserted = self.adjacency[a].insert(b);
        self.adjacency[b].insert(a);
        Ok(inserted)
    }

    pub fn contains_edge(&self, a: usize, b: usize) -> bool {
        self.adjacency.get(a).is_some_and(|n| n.contains(&b))
    }

    /// Neighbors of `index` in ascending order; empty for an unknown index.
    pub fn neighbors(&self, index: usize) -> impl Iterator<Item = usize> + '_ {
        self.adjacency.get(index).into_iter().flatten().copied()
    }

    pub fn degree(&self, index: usize) -> usize {
        self.adjacency.get(index).map_or(0, BTreeSet::len)
    }

    /// Every bond once, as `(low, high)` pairs in ascending order.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.adjacency.iter().enumerate().flat_map(|(a, neighbors)| {
            neighbors
                .iter()
                .copied()
                .filter(move |&b| a < b)
                .map(move |b| (a, b))
        })
    }

    /// Removes `removed` nodes and relabels the survivors densely.
    ///
    /// # Return
    ///
    /// The remap that was applied; apply the same remap to any parallel data.
    pub fn remove_nodes(&mut self, removed: &BTreeSet<usize>) -> IndexRemap {
        let remap = IndexRemap::from_removed(self.node_count(), removed);
        let old = std::mem::take(&mut self.adjacency);
        self.adjacency = old
            .into_iter()
            .enumerate()
            .filter(|(index, _)| remap.get(*index).is_some())
            .map(|(_, neighbors)| {
                neighbors
                    .into_iter()
                    .filter_map(|neighbor| remap.get(neighbor))
                    .collect()
            })
            .collect();
        remap
    }

    fn check_index(&self, index: usize) -> Result<(), GraphError> {
        if index < self.node_count() {
            Ok(())
        } else {
            Err(GraphError::IndexOutOfRange {
                index,
                node_count: self.node_count(),
            })
        }
    }
}

use anyhow::{anyhow, Result};
use smallvec::SmallVec;
use std::collections::{BTreeMap, HashSet};

use crate::error::KirkpatrickError;

/// Identifier of a vertex of the planar subdivision.
///
/// Vertices are never created after the input has been read, so the id is simply the index of
/// the vertex in the augmented point set (polygon vertices first, outer triangle last).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct PointId(pub(crate) usize);

impl PointId {
    /// Index of the vertex in the augmented point set.
    pub fn index(self) -> usize {
        self.0
    }
}

/// An undirected edge, stored with its endpoints in increasing order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Segment(PointId, PointId);

impl Segment {
    pub fn new(a: PointId, b: PointId) -> Self {
        if a <= b {
            Self(a, b)
        } else {
            Self(b, a)
        }
    }

    pub fn endpoints(&self) -> [PointId; 2] {
        [self.0, self.1]
    }
}

/// An edge seen from one of its endpoints.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OutEdge {
    pub source: PointId,
    pub target: PointId,
}

/// Adjacency structure of a triangulated planar subdivision.
///
/// The map is only mutated while the hierarchy is being built. Vertices are iterated in
/// insertion order, which makes everything that depends on the iteration order (most
/// importantly the independent set selection) reproducible.
#[derive(Debug, Clone, Default)]
pub struct PlanarMap {
    adjacency: Vec<Option<SmallVec<[PointId; 8]>>>,
    sequence: Vec<u64>,
    order: BTreeMap<u64, PointId>,
    next_sequence: u64,
    edges: HashSet<Segment>,
}

impl PlanarMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a planar map from a list of triangles, inserting the vertices `0..vertex_count`
    /// first so that the iteration order is the vertex order.
    pub(crate) fn from_triangles<'a, I>(vertex_count: usize, triangles: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a [PointId; 3]>,
    {
        let mut map = Self::new();
        for idx in 0..vertex_count {
            map.add_vertex(PointId(idx));
        }
        for &[a, b, c] in triangles {
            for s in [Segment::new(a, b), Segment::new(b, c), Segment::new(c, a)] {
                map.add_edge(s)?;
            }
        }
        Ok(map)
    }

    /// Adds an isolated vertex. Returns `false` if it was already there.
    pub fn add_vertex(&mut self, p: PointId) -> bool {
        if self.contains(p) {
            return false;
        }
        if p.0 >= self.adjacency.len() {
            self.adjacency.resize(p.0 + 1, None);
            self.sequence.resize(p.0 + 1, u64::MAX);
        }
        self.adjacency[p.0] = Some(SmallVec::new());
        self.sequence[p.0] = self.next_sequence;
        self.order.insert(self.next_sequence, p);
        self.next_sequence += 1;
        true
    }

    /// Returns `true` if the vertex is in the map.
    pub fn contains(&self, p: PointId) -> bool {
        matches!(self.adjacency.get(p.0), Some(Some(_)))
    }

    /// Adds an edge, inserting its endpoints if needed.
    ///
    /// Adding an edge that is already present is a no-op and returns `Ok(false)`.
    pub fn add_edge(&mut self, s: Segment) -> Result<bool> {
        let [a, b] = s.endpoints();
        if a == b {
            return Err(anyhow!("Cannot add the degenerate edge {:?}", s));
        }
        if self.has_edge(s) {
            return Ok(false);
        }
        self.add_vertex(a);
        self.add_vertex(b);
        self.neighbors_mut(a)?.push(b);
        self.neighbors_mut(b)?.push(a);
        self.edges.insert(s);
        Ok(true)
    }

    /// Returns `true` if the edge is in the map.
    pub fn has_edge(&self, s: Segment) -> bool {
        self.edges.contains(&s)
    }

    /// Removes a vertex and all the edges incident to it.
    pub fn del_node(&mut self, p: PointId) -> Result<()> {
        let neighbors = self
            .adjacency
            .get_mut(p.0)
            .and_then(Option::take)
            .ok_or(KirkpatrickError::MissingVertex(p))?;
        for q in neighbors {
            self.edges.remove(&Segment::new(p, q));
            let adjacent = self.neighbors_mut(q)?;
            if let Some(pos) = adjacent.iter().position(|&r| r == p) {
                adjacent.swap_remove(pos);
            }
        }
        self.order.remove(&self.sequence[p.0]);
        Ok(())
    }

    /// An iterator over the vertices, in insertion order.
    pub fn points(&self) -> impl Iterator<Item = PointId> + '_ {
        self.order.values().copied()
    }

    /// The neighbors of `p`.
    pub fn adjacent(&self, p: PointId) -> Result<&[PointId]> {
        match self.adjacency.get(p.0) {
            Some(Some(neighbors)) => Ok(neighbors.as_slice()),
            _ => Err(KirkpatrickError::MissingVertex(p).into()),
        }
    }

    /// The edges incident to `p`, each directed from `p` to the neighbor.
    pub fn out_edges(&self, p: PointId) -> Result<impl Iterator<Item = OutEdge> + '_> {
        Ok(self
            .adjacent(p)?
            .iter()
            .map(move |&target| OutEdge { source: p, target }))
    }

    /// The number of neighbors of `p`.
    pub fn degree(&self, p: PointId) -> Result<usize> {
        Ok(self.adjacent(p)?.len())
    }

    pub fn vertex_count(&self) -> usize {
        self.order.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// The edges of the map, sorted.
    pub fn edges(&self) -> Vec<Segment> {
        let mut edges: Vec<_> = self.edges.iter().copied().collect();
        edges.sort_unstable();
        edges
    }

    fn neighbors_mut(&mut self, p: PointId) -> Result<&mut SmallVec<[PointId; 8]>> {
        match self.adjacency.get_mut(p.0) {
            Some(Some(neighbors)) => Ok(neighbors),
            _ => Err(KirkpatrickError::MissingVertex(p).into()),
        }
    }
}

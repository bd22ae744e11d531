use anyhow::{anyhow, Result};
use std::{collections::HashMap, fmt::Display};

use crate::dag::Dag;
use crate::error::KirkpatrickError;
use crate::geometry::triangles_overlap;
use crate::kirkpatrick::independent_set::independent_set;
use crate::kirkpatrick::retriangulation::{carve_hole, fill_hole};
use crate::kirkpatrick::triangle::{sorted, Triangle};
use crate::kirkpatrick::Config;
use crate::mesh::Mesh;
use crate::planar_map::{PlanarMap, PointId, Segment};
use crate::point_locator::PointLocator;
use crate::triangulation::TriangulationProvider;

/// Identifier of a triangle of the hierarchy. The root is always `TriangleId(0)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TriangleId(usize);

impl TriangleId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
pub(crate) struct TriangleNode {
    triangle: Triangle,
    /// Position in the list of original triangles, if this is one of them
    original: Option<usize>,
}

/// The state of the planar map at the start of a round.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub points: Vec<PointId>,
    pub edges: Vec<Segment>,
}

impl Snapshot {
    fn of(map: &PlanarMap) -> Self {
        Self {
            points: map.points().collect(),
            edges: map.edges(),
        }
    }
}

/// One round of vertex removal.
#[derive(Debug, Clone, PartialEq)]
pub struct Round {
    /// The removed vertices, in the order they were selected
    pub removed: Vec<PointId>,
    /// The planar map before the removal, if snapshots were requested
    pub snapshot: Option<Snapshot>,
}

/// Mutable state of the hierarchy while it is being built.
///
/// Triangles are interned by their sorted vertex ids, so that a triangle gets the same DAG node
/// whether it comes from the initial triangulation, a fan or a retriangulated hole.
#[derive(Debug)]
pub(crate) struct HierarchyBuilder {
    points: Vec<[f64; 2]>,
    polygon_len: usize,
    outer: [PointId; 3],
    map: PlanarMap,
    dag: Dag<TriangleNode>,
    keys: HashMap<[PointId; 3], usize>,
    originals: Vec<usize>,
}

impl HierarchyBuilder {
    /// Sets up round 0 from the initial triangulation.
    ///
    /// `points` holds the polygon vertices followed by the three outer triangle vertices.
    pub(crate) fn new(
        points: Vec<[f64; 2]>,
        polygon_len: usize,
        triangles: &[[usize; 3]],
    ) -> Result<Self> {
        if points.len() != polygon_len + 3 {
            return Err(anyhow!(
                "Expected {} points (polygon and outer triangle), got {}.",
                polygon_len + 3,
                points.len()
            ));
        }
        let outer = [
            PointId(polygon_len),
            PointId(polygon_len + 1),
            PointId(polygon_len + 2),
        ];
        let triangles: Vec<[PointId; 3]> = triangles.iter().map(|t| t.map(PointId)).collect();
        let map = PlanarMap::from_triangles(points.len(), &triangles)?;

        let mut builder = Self {
            points,
            polygon_len,
            outer,
            map,
            dag: Dag::new(),
            keys: HashMap::new(),
            originals: Vec::with_capacity(triangles.len()),
        };
        builder.intern(outer);
        for vertices in triangles {
            let idx = builder.intern(vertices);
            let position = builder.originals.len();
            builder
                .dag
                .entry(idx)
                .and_modify(|node| node.original = Some(position));
            builder.originals.push(idx);
        }
        Ok(builder)
    }

    pub(crate) fn outer_triangle(&self) -> Triangle {
        Triangle::new(self.outer, &self.points)
    }

    /// The original triangles, in the order of the initial triangulation.
    pub(crate) fn original_triangles(&self) -> Vec<Triangle> {
        self.originals
            .iter()
            .filter_map(|&idx| self.dag.get(idx))
            .map(|node| node.data.triangle)
            .collect()
    }

    /// Returns the DAG node of a triangle, adding it if it is new.
    fn intern(&mut self, vertices: [PointId; 3]) -> usize {
        let key = sorted(vertices);
        if let Some(&idx) = self.keys.get(&key) {
            return idx;
        }
        let idx = self.dag.add(TriangleNode {
            triangle: Triangle::new(vertices, &self.points),
            original: None,
        });
        self.keys.insert(key, idx);
        idx
    }

    /// Removes independent sets of vertices until only the outer triangle is left, then
    /// freezes the result.
    pub(crate) fn build<P: TriangulationProvider>(
        mut self,
        provider: &P,
        config: &Config,
    ) -> Result<Hierarchy> {
        let mut remaining = self.map.vertex_count();
        let mut rounds = Vec::new();
        while remaining > 3 {
            let snapshot = config.record_snapshots.then(|| Snapshot::of(&self.map));
            let removed = independent_set(&self.map, &self.outer, config.degree_bound)?;
            if removed.is_empty() {
                return Err(KirkpatrickError::Stalled { remaining }.into());
            }

            // The removed vertices are pairwise non-adjacent, so their holes are disjoint and
            // can all be carved before any of them is filled.
            let holes = removed
                .iter()
                .map(|&vertex| carve_hole(&mut self.map, &self.points, vertex))
                .collect::<Result<Vec<_>>>()?;

            for hole in &holes {
                let fan = hole
                    .fan
                    .iter()
                    .map(|&vertices| self.find(vertices))
                    .collect::<Result<Vec<_>>>()?;
                for vertices in fill_hole(&mut self.map, &self.points, hole, provider)? {
                    let idx = self.intern(vertices);
                    let coords = self.dag.get(idx).map(|node| node.data.triangle.coords());
                    let Some(coords) = coords else { continue };
                    for &(old_idx, old_coords) in &fan {
                        if triangles_overlap(&coords, &old_coords) {
                            let appended = self.dag.entry(idx).append(old_idx);
                            debug_assert_eq!(appended, Some(old_idx));
                        }
                    }
                }
            }

            remaining -= removed.len();
            debug_assert_eq!(remaining, self.map.vertex_count());
            tracing::debug!(
                round = rounds.len(),
                removed = removed.len(),
                remaining,
                "removed independent set"
            );
            rounds.push(Round { removed, snapshot });
        }

        let outer = self.outer_triangle();
        let hierarchy = Hierarchy {
            outer,
            points: self.points,
            polygon_len: self.polygon_len,
            dag: self.dag,
            originals: self.originals,
            planar_map: self.map,
            rounds,
        };
        tracing::info!(
            nodes = hierarchy.dag.count(),
            triangles = hierarchy.originals.len(),
            rounds = hierarchy.rounds.len(),
            depth = hierarchy.depth(),
            "hierarchy built"
        );
        Ok(hierarchy)
    }

    /// The DAG node and coordinates of a triangle that must already be in the hierarchy.
    fn find(&self, vertices: [PointId; 3]) -> Result<(usize, [[f64; 2]; 3])> {
        let idx = *self.keys.get(&sorted(vertices)).ok_or(anyhow!(
            "Triangle {:?} is not part of the hierarchy.",
            vertices
        ))?;
        let node = self
            .dag
            .get(idx)
            .ok_or(anyhow!("Node with index {} does not exist.", idx))?;
        Ok((idx, node.data.triangle.coords()))
    }
}

/// The Kirkpatrick search structure, frozen after preprocessing.
///
/// This is a layered DAG of triangles: the root is the outer triangle, each triangle points to
/// the triangles of the previous (finer) level that it overlaps, and the leaves are the
/// original triangles. A query walks down from the root, always following the first child that
/// contains the query point.
///
/// The structure is never mutated after it is built, so it can be shared between threads and
/// queried concurrently.
#[derive(Debug, Clone)]
pub struct Hierarchy {
    outer: Triangle,
    points: Vec<[f64; 2]>,
    polygon_len: usize,
    dag: Dag<TriangleNode>,
    originals: Vec<usize>,
    planar_map: PlanarMap,
    rounds: Vec<Round>,
}

impl Hierarchy {
    /// Finds the original triangle containing `point`.
    ///
    /// Points on the boundary of a triangle count as inside. When a point lies on a side
    /// shared by several children of a node, the first of them in the stored order is
    /// followed. Returns [`None`] for points outside the outer triangle and for non-finite
    /// coordinates.
    pub fn locate(&self, point: &[f64; 2]) -> Option<&Triangle> {
        self.locate_node(point)
            .and_then(|idx| self.dag.get(idx))
            .map(|node| &node.data.triangle)
    }

    fn locate_node(&self, point: &[f64; 2]) -> Option<usize> {
        if !point.iter().all(|z| z.is_finite()) || !self.outer.contains(point) {
            return None;
        }

        let mut idx = 0;
        let mut steps = 0;
        loop {
            let node = self.dag.get(idx)?;
            if node.children.is_empty() {
                break;
            }
            let next = node.children.iter().copied().find(|&child| {
                self.dag
                    .get(child)
                    .is_some_and(|child| child.data.triangle.contains(point))
            });
            match next {
                Some(child) => idx = child,
                None => {
                    tracing::warn!(?point, node = idx, "no child contains the query point");
                    return None;
                }
            }
            steps += 1;
        }
        tracing::trace!(?point, steps, "located");
        Some(idx)
    }

    /// The root of the DAG, i.e. the outer triangle.
    pub fn root(&self) -> TriangleId {
        TriangleId(0)
    }

    /// The outer triangle.
    pub fn outer_triangle(&self) -> Triangle {
        self.outer
    }

    /// The triangle of a node.
    pub fn triangle(&self, id: TriangleId) -> Option<&Triangle> {
        self.dag.get(id.0).map(|node| &node.data.triangle)
    }

    /// The children of a node, in the order a query tries them.
    pub fn children(&self, id: TriangleId) -> impl Iterator<Item = TriangleId> + '_ {
        self.dag
            .get(id.0)
            .into_iter()
            .flat_map(|node| node.children.iter().map(|&child| TriangleId(child)))
    }

    /// An iterator over all the nodes of the DAG and their triangle.
    pub fn nodes(&self) -> impl Iterator<Item = (TriangleId, &Triangle)> + '_ {
        self.dag
            .iter()
            .enumerate()
            .map(|(idx, node)| (TriangleId(idx), &node.data.triangle))
    }

    /// The position in [`Hierarchy::original_triangles`] of a leaf node.
    pub fn original_index(&self, id: TriangleId) -> Option<usize> {
        self.dag.get(id.0).and_then(|node| node.data.original)
    }

    /// The triangles of the initial triangulation.
    pub fn original_triangles(&self) -> impl Iterator<Item = &Triangle> + '_ {
        self.originals
            .iter()
            .filter_map(|&idx| self.dag.get(idx))
            .map(|node| &node.data.triangle)
    }

    /// The points of the subdivision: the polygon vertices followed by the outer triangle.
    pub fn points(&self) -> &[[f64; 2]] {
        &self.points
    }

    /// The vertices of the input polygon.
    pub fn polygon(&self) -> &[[f64; 2]] {
        &self.points[..self.polygon_len]
    }

    /// The planar map left after the last round: the outer triangle.
    pub fn planar_map(&self) -> &PlanarMap {
        &self.planar_map
    }

    /// The rounds of vertex removal, first to last.
    pub fn rounds(&self) -> &[Round] {
        &self.rounds
    }

    /// The original triangles as a [`Mesh`].
    pub fn to_mesh(&self) -> Result<Mesh> {
        let cells = self
            .original_triangles()
            .flat_map(|t| t.vertices().map(PointId::index))
            .collect();
        Mesh::new(self.points.clone(), cells)
    }

    /// Length of the longest path from the root to a leaf.
    pub fn depth(&self) -> usize {
        self.dag.heights().first().copied().unwrap_or(0)
    }

    /// Statistics of the DAG.
    pub fn stats(&self) -> Stats {
        let depths = self.dag.depths();
        let leaf_depths: Vec<_> = self
            .originals
            .iter()
            .filter_map(|&idx| depths[idx])
            .collect();
        let average_leaf_depth = if leaf_depths.is_empty() {
            0.
        } else {
            leaf_depths.iter().sum::<usize>() as f64 / leaf_depths.len() as f64
        };
        Stats {
            node_count: self.dag.count(),
            leaf_count: self.originals.len(),
            round_count: self.rounds.len(),
            depth: self.depth(),
            average_leaf_depth,
        }
    }
}

impl PointLocator for Hierarchy {
    /// Index of the containing triangle in [`Hierarchy::original_triangles`].
    type Cell = usize;

    fn locate_one(&self, point: &[f64; 2]) -> Option<usize> {
        self.locate_node(point)
            .and_then(|idx| self.original_index(TriangleId(idx)))
    }
}

/// Statistics of a [`Hierarchy`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stats {
    /// Number of triangles in the DAG
    pub node_count: usize,
    /// Number of original triangles
    pub leaf_count: usize,
    /// Number of vertex removal rounds
    pub round_count: usize,
    /// Longest path from the root to a leaf
    pub depth: usize,
    /// Average length of the shortest path from the root to each leaf
    pub average_leaf_depth: f64,
}

impl Display for Stats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "Hierarchy counts:\n\t{} triangle(s)\n\t{} original triangle(s)\n\t{} round(s)",
            self.node_count, self.leaf_count, self.round_count
        )?;
        write!(
            f,
            "Depth:\n\tmax {}\n\taverage {:.2}",
            self.depth, self.average_leaf_depth
        )
    }
}

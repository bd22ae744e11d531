use anyhow::Result;
use std::collections::HashSet;

use crate::planar_map::{PlanarMap, PointId};

/// Greedily selects vertices to remove in one round of the hierarchy construction.
///
/// The vertices are visited in the planar map's iteration order, i.e. insertion order. A vertex
/// is selected unless it is one of the `outer` vertices, a neighbor of an already selected
/// vertex, or (if a bound is given) has a degree of at least `degree_bound`. The result is an
/// independent set, maximal among the eligible vertices but not maximum.
pub(crate) fn independent_set(
    map: &PlanarMap,
    outer: &[PointId; 3],
    degree_bound: Option<usize>,
) -> Result<Vec<PointId>> {
    let mut visited: HashSet<PointId> = HashSet::new();
    let mut selected = Vec::new();
    for p in map.points() {
        if visited.contains(&p) || outer.contains(&p) {
            continue;
        }
        let neighbors = map.adjacent(p)?;
        if matches!(degree_bound, Some(bound) if neighbors.len() >= bound) {
            continue;
        }
        selected.push(p);
        visited.extend(neighbors);
    }
    Ok(selected)
}

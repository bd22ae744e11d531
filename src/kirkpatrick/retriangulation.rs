use anyhow::Result;
use itertools::Itertools;

use crate::error::KirkpatrickError;
use crate::planar_map::{PlanarMap, PointId, Segment};
use crate::triangulation::TriangulationProvider;

/// The polygonal hole left in the triangulation by the removal of a vertex.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Hole {
    /// The removed vertex
    pub(crate) vertex: PointId,
    /// The former neighbors of the vertex, sorted by angle around it
    pub(crate) ring: Vec<PointId>,
    /// The triangles that were incident to the vertex, `(vertex, ring[i - 1], ring[i])`
    pub(crate) fan: Vec<[PointId; 3]>,
}

/// Removes `vertex` from the map and returns the hole it leaves.
///
/// The fan of triangles around the vertex is recorded before the vertex (and with it all its
/// edges) is deleted.
pub(crate) fn carve_hole(
    map: &mut PlanarMap,
    points: &[[f64; 2]],
    vertex: PointId,
) -> Result<Hole> {
    let [xs, ys] = points[vertex.index()];
    let ring: Vec<PointId> = map
        .out_edges(vertex)?
        .map(|edge| {
            let [xt, yt] = points[edge.target.index()];
            (edge.target, (yt - ys).atan2(xt - xs))
        })
        .sorted_by(|(_, a), (_, b)| a.total_cmp(b))
        .map(|(target, _)| target)
        .collect();

    let n = ring.len();
    let fan = (0..n)
        .map(|i| [vertex, ring[(i + n - 1) % n], ring[i]])
        .collect();

    map.del_node(vertex)?;

    Ok(Hole { vertex, ring, fan })
}

/// Triangulates a hole and inserts the new edges in the map.
///
/// Returns the new triangles. A ring of `n` vertices must give exactly `n - 2` triangles,
/// anything else means the hole was not a simple polygon.
pub(crate) fn fill_hole<P: TriangulationProvider>(
    map: &mut PlanarMap,
    points: &[[f64; 2]],
    hole: &Hole,
    provider: &P,
) -> Result<Vec<[PointId; 3]>> {
    let n = hole.ring.len();
    let ring_coords: Vec<_> = hole.ring.iter().map(|p| points[p.index()]).collect();
    let triangles = if n < 3 {
        Vec::new()
    } else {
        provider.triangulate_ring(&ring_coords)?
    };
    if n < 3 || triangles.len() != n - 2 {
        return Err(KirkpatrickError::Retriangulation {
            vertex: hole.vertex,
            ring: n,
            triangles: triangles.len(),
        }
        .into());
    }

    let mut new_triangles = Vec::with_capacity(triangles.len());
    for [a, b, c] in triangles {
        let vertices = [hole.ring[a], hole.ring[b], hole.ring[c]];
        for (&p, &q) in vertices.iter().circular_tuple_windows() {
            map.add_edge(Segment::new(p, q))?;
        }
        new_triangles.push(vertices);
    }
    Ok(new_triangles)
}

#[cfg(test)]
mod tests {
    use crate::triangulation::Triangulator;

    use super::*;

    fn id(idx: usize) -> PointId {
        PointId(idx)
    }

    //
    //  3-------2
    //  |\     /|
    //  | \   / |
    //  |  \ /  |
    //  |   4   |
    //  |  / \  |
    //  | /   \ |
    //  |/     \|
    //  0-------1
    //
    fn square_with_center() -> Result<(Vec<[f64; 2]>, PlanarMap)> {
        let points = vec![[0., 0.], [2., 0.], [2., 2.], [0., 2.], [1., 1.]];
        let triangles = [
            [id(0), id(1), id(4)],
            [id(1), id(2), id(4)],
            [id(2), id(3), id(4)],
            [id(3), id(0), id(4)],
        ];
        let map = PlanarMap::from_triangles(5, &triangles)?;
        Ok((points, map))
    }

    #[test]
    fn ring_is_sorted_by_angle() -> Result<()> {
        let (points, mut map) = square_with_center()?;

        let hole = carve_hole(&mut map, &points, id(4))?;

        // atan2 goes from -pi to pi, so the ring starts at the bottom left corner
        assert_eq!(hole.ring, [id(0), id(1), id(2), id(3)]);
        assert_eq!(
            hole.fan,
            [
                [id(4), id(3), id(0)],
                [id(4), id(0), id(1)],
                [id(4), id(1), id(2)],
                [id(4), id(2), id(3)],
            ]
        );
        assert!(!map.contains(id(4)));
        assert_eq!(map.edge_count(), 4);

        Ok(())
    }

    #[test]
    fn filled_hole_edges_are_in_the_map() -> Result<()> {
        let (points, mut map) = square_with_center()?;
        let hole = carve_hole(&mut map, &points, id(4))?;

        let triangles = fill_hole(&mut map, &points, &hole, &Triangulator)?;

        assert_eq!(triangles.len(), 2);
        for t in &triangles {
            for (&p, &q) in t.iter().circular_tuple_windows() {
                let s = Segment::new(p, q);
                assert!(map.has_edge(s));
                // Adding it again is a no-op
                assert!(!map.add_edge(s)?);
            }
        }
        // The four sides plus one diagonal
        assert_eq!(map.edge_count(), 5);

        Ok(())
    }

    #[test]
    fn missing_vertex_cannot_be_carved() -> Result<()> {
        let (points, mut map) = square_with_center()?;
        carve_hole(&mut map, &points, id(4))?;

        assert!(carve_hole(&mut map, &points, id(4)).is_err());

        Ok(())
    }

    #[test]
    fn degenerate_hole_is_reported() -> Result<()> {
        let points = vec![[0., 0.], [1., 0.], [2., 0.]];
        let mut map = PlanarMap::new();
        map.add_edge(Segment::new(id(0), id(1)))?;
        map.add_edge(Segment::new(id(1), id(2)))?;
        let hole = carve_hole(&mut map, &points, id(1))?;

        let err = fill_hole(&mut map, &points, &hole, &Triangulator).unwrap_err();

        assert_eq!(
            err.downcast_ref::<KirkpatrickError>(),
            Some(&KirkpatrickError::Retriangulation {
                vertex: id(1),
                ring: 2,
                triangles: 0
            })
        );

        Ok(())
    }
}

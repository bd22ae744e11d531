use anyhow::Result;
use earcut::Earcut;

use crate::error::KirkpatrickError;
use crate::geometry::{cross, Point};

/// Source of the triangulations the hierarchy is built from.
///
/// Both methods return triangles as index triples into their input slice.
pub trait TriangulationProvider {
    /// Triangulates the convex hull of a set of points in general position.
    fn triangulate_point_set(&self, points: &[[f64; 2]]) -> Result<Vec<[usize; 3]>>;

    /// Triangulates the interior of a simple polygon given by its boundary ring.
    fn triangulate_ring(&self, ring: &[[f64; 2]]) -> Result<Vec<[usize; 3]>>;
}

/// Default provider: Delaunay triangulation for point sets ([`delaunator`]) and ear clipping for
/// rings ([`earcut`]).
#[derive(Debug, Default, Clone, Copy)]
pub struct Triangulator;

impl TriangulationProvider for Triangulator {
    fn triangulate_point_set(&self, points: &[[f64; 2]]) -> Result<Vec<[usize; 3]>> {
        let points: Vec<_> = points
            .iter()
            .map(|&[x, y]| delaunator::Point { x, y })
            .collect();
        let triangulation = delaunator::triangulate(&points);
        if triangulation.triangles.is_empty() {
            return Err(KirkpatrickError::DegenerateInput(
                "the points are collinear or coincident".to_string(),
            )
            .into());
        }
        Ok(triangulation
            .triangles
            .chunks_exact(3)
            .map(|t| [t[0], t[1], t[2]])
            .collect())
    }

    fn triangulate_ring(&self, ring: &[[f64; 2]]) -> Result<Vec<[usize; 3]>> {
        let data: Vec<f64> = ring.iter().flatten().copied().collect();
        let mut indices: Vec<usize> = Vec::with_capacity(3 * ring.len());
        Earcut::new().earcut(data, &[], &mut indices);
        if indices.len() / 3 + 2 == ring.len() {
            return Ok(indices
                .chunks_exact(3)
                .map(|t| [t[0], t[1], t[2]])
                .collect());
        }

        // Earcut drops the vertices lying on the segment between their two neighbors
        tracing::debug!(vertices = ring.len(), "flat vertices in ring, clipping ears");
        Ok(clip_ears(ring).unwrap_or_default())
    }
}

/// Plain ear clipping that keeps every vertex of the ring, flat ones included.
///
/// Returns [`None`] if the ring has no area or no ear can be found.
fn clip_ears(ring: &[[f64; 2]]) -> Option<Vec<[usize; 3]>> {
    if ring.len() < 3 {
        return None;
    }
    let orientation: f64 = (1..ring.len() - 1)
        .map(|i| cross(ring[0], ring[i], ring[i + 1]))
        .sum::<f64>()
        .signum();
    if orientation == 0. {
        return None;
    }

    let mut remaining: Vec<usize> = (0..ring.len()).collect();
    let mut triangles = Vec::with_capacity(ring.len() - 2);
    while remaining.len() > 3 {
        let m = remaining.len();
        let ear = (0..m).find(|&i| {
            let (a, b, c) = (remaining[(i + m - 1) % m], remaining[i], remaining[(i + 1) % m]);
            cross(ring[a], ring[b], ring[c]) * orientation > 0.
                && remaining.iter().all(|&p| {
                    p == a || p == b || p == c || !Point::from(ring[p]).in_triangle(ring[a], ring[b], ring[c])
                })
        })?;
        triangles.push([remaining[(ear + m - 1) % m], remaining[ear], remaining[(ear + 1) % m]]);
        remaining.remove(ear);
    }
    let [a, b, c] = [remaining[0], remaining[1], remaining[2]];
    if cross(ring[a], ring[b], ring[c]) == 0. {
        return None;
    }
    triangles.push([a, b, c]);
    Some(triangles)
}

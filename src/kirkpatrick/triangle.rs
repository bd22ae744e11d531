use std::hash::{Hash, Hasher};

use itertools::Itertools;

use crate::geometry::{area, Point};
use crate::planar_map::PointId;

/// A triangle of the hierarchy.
///
/// Two triangles are equal when they have the same vertices, whatever their order: identity is
/// given by the sorted vertex ids, never by the floating-point coordinates.
#[derive(Debug, Clone, Copy)]
pub struct Triangle {
    vertices: [PointId; 3],
    coords: [[f64; 2]; 3],
}

impl Triangle {
    pub(crate) fn new(vertices: [PointId; 3], points: &[[f64; 2]]) -> Self {
        let coords = vertices.map(|p| points[p.index()]);
        Self { vertices, coords }
    }

    /// The vertex ids, in the order the triangle was created with.
    pub fn vertices(&self) -> [PointId; 3] {
        self.vertices
    }

    /// The coordinates of the vertices, in the same order as [`Triangle::vertices`].
    pub fn coords(&self) -> [[f64; 2]; 3] {
        self.coords
    }

    /// The sorted vertex ids, identifying the triangle.
    pub fn key(&self) -> [PointId; 3] {
        sorted(self.vertices)
    }

    /// Returns `true` if the point lies inside the triangle or on its boundary.
    pub fn contains(&self, point: &[f64; 2]) -> bool {
        let [a, b, c] = self.coords;
        Point::from(point).in_triangle(a, b, c)
    }

    /// An iterator over the three sides of the triangle.
    pub fn segments(&self) -> impl Iterator<Item = [[f64; 2]; 2]> + '_ {
        self.coords
            .iter()
            .circular_tuple_windows()
            .map(|(&p, &q)| [p, q])
    }

    pub fn centroid(&self) -> [f64; 2] {
        let [[xa, ya], [xb, yb], [xc, yc]] = self.coords;
        [(xa + xb + xc) / 3., (ya + yb + yc) / 3.]
    }

    pub fn area(&self) -> f64 {
        area(&self.coords)
    }
}

pub(crate) fn sorted(mut vertices: [PointId; 3]) -> [PointId; 3] {
    vertices.sort_unstable();
    vertices
}

impl PartialEq for Triangle {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Triangle {}

impl Hash for Triangle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

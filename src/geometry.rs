use itertools::Itertools;
use robust::{orient2d, Coord};

/// A point of the 2D plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl From<&Point> for [f64; 2] {
    fn from(val: &Point) -> Self {
        [val.x, val.y]
    }
}

impl From<Point> for [f64; 2] {
    fn from(val: Point) -> Self {
        (&val).into()
    }
}

impl From<&[f64; 2]> for Point {
    fn from(value: &[f64; 2]) -> Self {
        Self {
            x: value[0],
            y: value[1],
        }
    }
}

impl From<[f64; 2]> for Point {
    fn from(value: [f64; 2]) -> Self {
        Self::from(&value)
    }
}

/// Positioning of a `Point` with respect to a line.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub(crate) enum Positioning {
    Left,
    On,
    Right,
}

/// Twice the signed area of the triangle `(a, b, c)`.
///
/// Positive when the triangle is counter-clockwise.
pub(crate) fn cross<T: Into<[f64; 2]>>(a: T, b: T, c: T) -> f64 {
    let [xa, ya] = a.into();
    let [xb, yb] = b.into();
    let [xc, yc] = c.into();
    (xb - xa) * (yc - ya) - (xc - xa) * (yb - ya)
}

impl Point {
    /// Tests if a point is Left|On|Right of an infinite 2D line defined by two points.
    ///
    /// The orientation is exact, so points on the line are always reported as `On`.
    pub(crate) fn position<T>(&self, p1: T, p2: T) -> Positioning
    where
        T: Into<[f64; 2]>,
    {
        let [x1, y1] = p1.into();
        let [x2, y2] = p2.into();
        let orientation = orient2d(
            Coord { x: x1, y: y1 },
            Coord { x: x2, y: y2 },
            Coord {
                x: self.x,
                y: self.y,
            },
        );
        match orientation.total_cmp(&0.) {
            std::cmp::Ordering::Greater => Positioning::Left,
            std::cmp::Ordering::Less => Positioning::Right,
            std::cmp::Ordering::Equal => Positioning::On,
        }
    }

    /// Returns `true` if the point lies inside the triangle `(a, b, c)` or on its boundary.
    ///
    /// The winding of the triangle does not matter.
    pub fn in_triangle<T>(&self, a: T, b: T, c: T) -> bool
    where
        T: Into<[f64; 2]>,
    {
        let (a, b, c) = (a.into(), b.into(), c.into());
        let sides = [
            self.position(a, b),
            self.position(b, c),
            self.position(c, a),
        ];
        let left = sides.contains(&Positioning::Left);
        let right = sides.contains(&Positioning::Right);
        !(left && right)
    }

    /// Computes the winding number for a [`Point`] in a polygon (defined by a slice of [`Point`]s).
    ///
    /// This number can be:
    /// - `0` if the [`Point`] is not inside the polygon
    /// - `> 0` if the polygon winds counter-clockwise around the [`Point`]
    /// - `< 0` if the polygon winds clockwise around the [`Point`]
    ///
    /// For more information, see <https://web.archive.org/web/20130126163405/http://geomalgorithms.com/a03-_inclusion.html>.
    pub fn wn<I>(&self, poly: I) -> isize
    where
        I: IntoIterator,
        <I as IntoIterator>::IntoIter: Clone,
        <I as IntoIterator>::IntoIter: ExactSizeIterator,
        <I as IntoIterator>::Item: Into<[f64; 2]>,
        <I as IntoIterator>::Item: Clone,
    {
        let mut wn = 0;
        for (a, b) in poly.into_iter().circular_tuple_windows() {
            let [_, ya] = a.clone().into();
            let [_, yb] = b.clone().into();
            if ya <= self.y {
                if yb > self.y && matches!(self.position(a, b), Positioning::Left) {
                    wn += 1;
                }
            } else if yb <= self.y && matches!(self.position(a, b), Positioning::Right) {
                wn -= 1;
            }
        }
        wn
    }

    /// Returns `true` if the point is inside the input polygon.
    pub fn is_inside<I>(&self, poly: I) -> bool
    where
        I: IntoIterator,
        <I as IntoIterator>::IntoIter: Clone,
        <I as IntoIterator>::IntoIter: ExactSizeIterator,
        <I as IntoIterator>::Item: Into<[f64; 2]>,
        <I as IntoIterator>::Item: Clone,
    {
        self.wn(poly) != 0
    }
}

/// Returns `true` if the closed segments `[p1, p2]` and `[q1, q2]` share at least one point.
///
/// Touching endpoints and collinear overlaps count as intersections.
pub(crate) fn segments_intersect(p1: [f64; 2], p2: [f64; 2], q1: [f64; 2], q2: [f64; 2]) -> bool {
    let d1 = Point::from(q1).position(p1, p2);
    let d2 = Point::from(q2).position(p1, p2);
    let d3 = Point::from(p1).position(q1, q2);
    let d4 = Point::from(p2).position(q1, q2);

    let straddles = |a: Positioning, b: Positioning| {
        matches!(
            (a, b),
            (Positioning::Left, Positioning::Right) | (Positioning::Right, Positioning::Left)
        )
    };
    if straddles(d1, d2) && straddles(d3, d4) {
        return true;
    }

    // Collinear cases: an endpoint lying on the other segment
    (d1 == Positioning::On && in_box(q1, p1, p2))
        || (d2 == Positioning::On && in_box(q2, p1, p2))
        || (d3 == Positioning::On && in_box(p1, q1, q2))
        || (d4 == Positioning::On && in_box(p2, q1, q2))
}

/// Whether `p` lies in the axis-aligned box spanned by `a` and `b`.
fn in_box([x, y]: [f64; 2], [xa, ya]: [f64; 2], [xb, yb]: [f64; 2]) -> bool {
    xa.min(xb) <= x && x <= xa.max(xb) && ya.min(yb) <= y && y <= ya.max(yb)
}

/// Returns `true` if any side of `t1` intersects any side of `t2`.
pub(crate) fn triangles_overlap(t1: &[[f64; 2]; 3], t2: &[[f64; 2]; 3]) -> bool {
    t1.iter()
        .circular_tuple_windows()
        .cartesian_product(t2.iter().circular_tuple_windows().collect_vec())
        .any(|((&p1, &p2), (&q1, &q2))| segments_intersect(p1, p2, q1, q2))
}

/// Area of the triangle `(a, b, c)`.
pub(crate) fn area(t: &[[f64; 2]; 3]) -> f64 {
    cross(t[0], t[1], t[2]).abs() / 2.
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positioning() {
        let p1 = Point { x: 0., y: 0. };
        let p2 = Point { x: 1., y: 1. };

        assert_eq!(
            Point { x: 0., y: 0.5 }.position(p1, p2),
            Positioning::Left
        );
        assert_eq!(Point { x: 0.5, y: 0.5 }.position(p1, p2), Positioning::On);
        assert_eq!(
            Point { x: 1., y: 0.5 }.position(p1, p2),
            Positioning::Right
        );
    }

    #[test]
    fn point_in_triangle_is_inclusive() {
        //
        //  2
        //  +
        //  |\
        //  | \
        //  |  \
        //  +---+
        //  0   1
        //
        let (a, b, c) = ([0., 0.], [1., 0.], [0., 1.]);

        assert!(Point::from([0.2, 0.2]).in_triangle(a, b, c));
        // Edges and corners
        assert!(Point::from([0.5, 0.]).in_triangle(a, b, c));
        assert!(Point::from([0.5, 0.5]).in_triangle(a, b, c));
        assert!(Point::from([0., 1.]).in_triangle(a, b, c));
        // Outside
        assert!(!Point::from([0.6, 0.6]).in_triangle(a, b, c));
        assert!(!Point::from([-0.1, 0.5]).in_triangle(a, b, c));
        // Clockwise winding gives the same answer
        assert!(Point::from([0.2, 0.2]).in_triangle(a, c, b));
        assert!(!Point::from([0.6, 0.6]).in_triangle(a, c, b));
    }

    #[test]
    fn segment_intersections() {
        // Proper crossing
        assert!(segments_intersect([0., 0.], [1., 1.], [0., 1.], [1., 0.]));
        // Shared endpoint
        assert!(segments_intersect([0., 0.], [1., 0.], [1., 0.], [1., 1.]));
        // T-junction
        assert!(segments_intersect([0., 0.], [2., 0.], [1., 0.], [1., 1.]));
        // Collinear overlap
        assert!(segments_intersect([0., 0.], [2., 0.], [1., 0.], [3., 0.]));
        // Collinear but disjoint
        assert!(!segments_intersect([0., 0.], [1., 0.], [2., 0.], [3., 0.]));
        // Parallel
        assert!(!segments_intersect([0., 0.], [1., 0.], [0., 1.], [1., 1.]));
        // Would cross if extended
        assert!(!segments_intersect([0., 0.], [1., 1.], [3., 0.], [2., 1.]));
    }

    #[test]
    fn triangle_overlap() {
        let t = [[0., 0.], [2., 0.], [0., 2.]];

        assert!(triangles_overlap(&t, &[[1., -1.], [1., 3.], [3., 1.]]));
        // Sharing a single vertex counts
        assert!(triangles_overlap(&t, &[[2., 0.], [3., 0.], [3., 1.]]));
        assert!(!triangles_overlap(&t, &[[3., 3.], [4., 3.], [3., 4.]]));
    }

    #[test]
    fn triangle_area() {
        assert_eq!(area(&[[0., 0.], [2., 0.], [0., 2.]]), 2.);
        assert_eq!(area(&[[0., 0.], [0., 2.], [2., 0.]]), 2.);
    }

    #[test]
    fn winding_number_square() {
        //
        //            2
        //
        //
        //     +------6------+
        //     |             |
        //     |             |
        //     |             |
        //     3      0      5      1
        //     |             |
        //     |             |
        //     |             |
        //     +------4------+
        //
        let poly = [[0., 0.], [1., 0.], [1., 1.], [0., 1.]];

        assert_eq!(Point::from([0.5, 0.5]).wn(poly), 1);
        assert_eq!(Point::from([1.5, 0.5]).wn(poly), 0);
        assert_eq!(Point::from([0.5, 1.5]).wn(poly), 0);
        assert_eq!(Point::from([0., 0.5]).wn(poly), 1); // Left edges are included
        assert_eq!(Point::from([0.5, 0.]).wn(poly), 1); // Bottom edges are included
        assert_eq!(Point::from([1.0, 0.5]).wn(poly), 0); // Right edges are not included
        assert_eq!(Point::from([0.5, 1.]).wn(poly), 0); // Top edges are not included
    }

    #[test]
    fn winding_number_clockwise_polygon() {
        let poly = [[0., 0.], [0., 1.], [1., 1.], [1., 0.]];

        assert_eq!(Point::from([0.5, 0.5]).wn(poly), -1);
        assert!(Point::from([0.5, 0.5]).is_inside(poly));
        assert!(!Point::from([1.5, 0.5]).is_inside(poly));
    }
}

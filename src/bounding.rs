/// Axis-aligned bounding box of the input polygon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct BoundingBox {
    pub(crate) xmin: f64,
    pub(crate) xmax: f64,
    pub(crate) ymin: f64,
    pub(crate) ymax: f64,
}

impl BoundingBox {
    /// Computes the bounding box of a set of points.
    ///
    /// Returns `None` if there are no points.
    pub(crate) fn from_points(points: &[[f64; 2]]) -> Option<Self> {
        let (&[x0, y0], rest) = points.split_first()?;
        let mut bbox = Self {
            xmin: x0,
            xmax: x0,
            ymin: y0,
            ymax: y0,
        };
        for &[x, y] in rest {
            if x < bbox.xmin {
                bbox.xmin = x;
            }
            if x > bbox.xmax {
                bbox.xmax = x;
            }
            if y < bbox.ymin {
                bbox.ymin = y;
            }
            if y > bbox.ymax {
                bbox.ymax = y;
            }
        }
        Some(bbox)
    }

    pub(crate) fn width(&self) -> f64 {
        self.xmax - self.xmin
    }

    pub(crate) fn height(&self) -> f64 {
        self.ymax - self.ymin
    }

    /// Grows the box by `margin` times its extent on every side.
    pub(crate) fn expand(&self, margin: f64) -> Self {
        let dx = self.width() * margin;
        let dy = self.height() * margin;
        Self {
            xmin: self.xmin - dx,
            xmax: self.xmax + dx,
            ymin: self.ymin - dy,
            ymax: self.ymax + dy,
        }
    }

    /// Computes an equilateral triangle resting on the bottom side of the box and containing it.
    ///
    /// With `a` the width and `b` the height of the box, the triangle has side
    /// `d = a + sqrt(4/3 * b^2)`, so that its width at the top of the box is exactly `a`.
    /// The two base vertices stick out of the box by `(d - a) / 2` on each side and the apex is
    /// centered horizontally at height `d * sqrt(3) / 2` above the bottom of the box.
    ///
    /// The vertices are returned in counter-clockwise order: bottom right, apex, bottom left.
    pub(crate) fn enclosing_triangle(&self) -> [[f64; 2]; 3] {
        let a = self.width();
        let b = self.height();
        let d = a + (4. / 3. * b * b).sqrt();
        let shift = (d - a) / 2.;
        let h = d * 3f64.sqrt() / 2.;
        [
            [self.xmax + shift, self.ymin],
            [self.xmin + a / 2., self.ymin + h],
            [self.xmin - shift, self.ymin],
        ]
    }
}

/// Outer triangle enclosing `points`, with the bounding box grown by `margin` first.
pub(crate) fn outer_triangle(points: &[[f64; 2]], margin: f64) -> Option<[[f64; 2]; 3]> {
    let bbox = BoundingBox::from_points(points)?;
    Some(bbox.expand(margin).enclosing_triangle())
}

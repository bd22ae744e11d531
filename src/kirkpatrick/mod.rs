//! Kirkpatrick's hierarchical point location.
//!
//! The input polygon is wrapped in a large outer triangle and the whole thing is triangulated.
//! Then, round after round, an independent set of low-degree vertices is removed from the
//! triangulation and the holes they leave are retriangulated. Each new triangle is linked to the
//! removed triangles it overlaps. When only the outer triangle is left we have a DAG of depth
//! *O*(log(*n*)), and locating a point is a matter of walking it down from the outer triangle
//! to one of the original triangles.
//!
//! See D. Kirkpatrick, *Optimal search in planar subdivisions*, SIAM J. Comput. 12 (1983).

mod hierarchy;
mod independent_set;
mod retriangulation;
mod triangle;

use anyhow::{anyhow, Result};

use crate::bounding::outer_triangle;
use crate::error::KirkpatrickError;
use crate::geometry::{cross, Point};
use crate::triangulation::{TriangulationProvider, Triangulator};

pub use hierarchy::{Hierarchy, Round, Snapshot, Stats, TriangleId};
pub use triangle::Triangle;

use hierarchy::HierarchyBuilder;

/// Vertices with this degree or more are not removed by default.
pub const DEFAULT_DEGREE_BOUND: usize = 8;

/// Default growth of the polygon's bounding box before the outer triangle is computed.
pub const DEFAULT_MARGIN: f64 = 0.4;

/// Parameters of the hierarchy construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    /// Vertices whose degree is at least this bound are never removed.
    ///
    /// A bound is what guarantees the logarithmic depth of the hierarchy: with a bound of 8 at
    /// least a constant fraction of the vertices is removed at every round. `None` removes
    /// vertices regardless of their degree.
    pub degree_bound: Option<usize>,
    /// Fraction of the polygon's width and height added on each side of its bounding box.
    pub margin: f64,
    /// Whether to keep a copy of the planar map at the start of every round.
    pub record_snapshots: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            degree_bound: Some(DEFAULT_DEGREE_BOUND),
            margin: DEFAULT_MARGIN,
            record_snapshots: false,
        }
    }
}

impl Config {
    /// Sets the degree at and above which vertices are never removed (`None` for no bound).
    pub fn with_degree_bound(mut self, degree_bound: Option<usize>) -> Self {
        self.degree_bound = degree_bound;
        self
    }

    /// Sets the fraction of the bounding box extent added on each side.
    pub fn with_margin(mut self, margin: f64) -> Self {
        self.margin = margin;
        self
    }

    /// Sets whether the planar map is recorded at the start of every round.
    pub fn with_snapshots(mut self, record_snapshots: bool) -> Self {
        self.record_snapshots = record_snapshots;
        self
    }
}

#[derive(Debug)]
enum Stage {
    Pending(HierarchyBuilder),
    /// Preprocessing started and did not complete
    Consumed,
    Ready(Hierarchy),
}

/// Point location in a triangulated polygon using Kirkpatrick's hierarchy.
///
/// ```
/// use kirkloc::Kirkpatrick;
///
/// let mut locator = Kirkpatrick::new(vec![[0., 0.], [2., 0.], [2., 2.], [0., 2.]])?;
/// locator.preprocess()?;
///
/// let triangle = locator.query(&[1., 1.])?.expect("The point is in the square");
/// assert!(triangle.contains(&[1., 1.]));
/// assert!(locator.query(&[100., 100.])?.is_none());
/// # Ok::<(), anyhow::Error>(())
/// ```
#[derive(Debug)]
pub struct Kirkpatrick<P = Triangulator> {
    provider: P,
    config: Config,
    polygon: Vec<[f64; 2]>,
    outer: Triangle,
    triangles: Vec<Triangle>,
    stage: Stage,
}

impl Kirkpatrick<Triangulator> {
    /// Triangulates a simple polygon, with the default configuration and triangulations.
    ///
    /// Fails if the polygon has fewer than 3 vertices, non-finite coordinates, or cannot be
    /// triangulated.
    pub fn new(polygon: Vec<[f64; 2]>) -> Result<Self> {
        Self::with_config(polygon, Config::default(), Triangulator)
    }
}

impl<P: TriangulationProvider> Kirkpatrick<P> {
    /// Triangulates a simple polygon with the given configuration and triangulation provider.
    pub fn with_config(polygon: Vec<[f64; 2]>, config: Config, provider: P) -> Result<Self> {
        if polygon.len() < 3 {
            return Err(KirkpatrickError::DegenerateInput(format!(
                "a polygon needs at least 3 vertices, got {}",
                polygon.len()
            ))
            .into());
        }
        if polygon.iter().flatten().any(|z| !z.is_finite()) {
            return Err(KirkpatrickError::DegenerateInput(
                "the polygon has non-finite coordinates".to_string(),
            )
            .into());
        }
        if !(config.margin.is_finite() && config.margin > 0.) {
            return Err(anyhow!(
                "The margin should be positive and finite, got {}.",
                config.margin
            ));
        }

        let doubled_area: f64 = (1..polygon.len() - 1)
            .map(|i| cross(polygon[0], polygon[i], polygon[i + 1]))
            .sum();
        if doubled_area == 0. {
            return Err(KirkpatrickError::DegenerateInput(
                "the polygon has no area (collinear vertices?)".to_string(),
            )
            .into());
        }

        let outer = outer_triangle(&polygon, config.margin).ok_or(
            KirkpatrickError::DegenerateInput("the polygon has no vertices".to_string()),
        )?;

        let polygon_len = polygon.len();
        let mut points = polygon.clone();
        points.extend(outer);

        let triangles = provider.triangulate_point_set(&points)?;
        let mut used = vec![false; points.len()];
        for &idx in triangles.iter().flatten() {
            let Some(flag) = used.get_mut(idx) else {
                return Err(anyhow!("Triangle vertex {} is out of bounds.", idx));
            };
            *flag = true;
        }
        if let Some(unused) = used.iter().position(|&flag| !flag) {
            return Err(KirkpatrickError::DegenerateInput(format!(
                "vertex {} is not part of the triangulation (duplicate vertex?)",
                unused
            ))
            .into());
        }

        let builder = HierarchyBuilder::new(points, polygon_len, &triangles)?;
        let outer = builder.outer_triangle();
        let triangles = builder.original_triangles();
        tracing::debug!(
            vertices = polygon_len,
            triangles = triangles.len(),
            "initial triangulation"
        );

        Ok(Self {
            provider,
            config,
            polygon,
            outer,
            triangles,
            stage: Stage::Pending(builder),
        })
    }

    /// Builds the search hierarchy.
    ///
    /// Can only be called once: the second call fails with
    /// [`KirkpatrickError::DoublePreprocess`] and leaves the structure untouched. If
    /// preprocessing itself fails, the structure cannot be preprocessed nor queried anymore.
    pub fn preprocess(&mut self) -> Result<()> {
        let builder = match std::mem::replace(&mut self.stage, Stage::Consumed) {
            Stage::Pending(builder) => builder,
            stage => {
                self.stage = stage;
                return Err(KirkpatrickError::DoublePreprocess.into());
            }
        };
        let hierarchy = builder.build(&self.provider, &self.config)?;
        self.stage = Stage::Ready(hierarchy);
        Ok(())
    }

    /// Returns `true` once [`Kirkpatrick::preprocess`] has succeeded.
    pub fn is_preprocessed(&self) -> bool {
        matches!(self.stage, Stage::Ready(_))
    }

    /// Finds the original triangle containing `point`.
    ///
    /// Returns `Ok(None)` if the point is outside the outer triangle. Points on a side shared by
    /// two triangles are assigned to the first one the descent tries.
    pub fn query(&self, point: &[f64; 2]) -> Result<Option<Triangle>> {
        Ok(self.hierarchy()?.locate(point).copied())
    }

    /// The frozen hierarchy, once preprocessed.
    pub fn hierarchy(&self) -> Result<&Hierarchy> {
        match &self.stage {
            Stage::Ready(hierarchy) => Ok(hierarchy),
            _ => Err(KirkpatrickError::QueryBeforePreprocess.into()),
        }
    }

    /// Consumes the structure and returns the frozen hierarchy, once preprocessed.
    pub fn into_hierarchy(self) -> Result<Hierarchy> {
        match self.stage {
            Stage::Ready(hierarchy) => Ok(hierarchy),
            _ => Err(KirkpatrickError::QueryBeforePreprocess.into()),
        }
    }

    /// The triangles of the initial triangulation, the leaves of the hierarchy.
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// The original triangles that lie inside the input polygon.
    ///
    /// The other ones fill the space between the polygon and the outer triangle. A triangle is
    /// considered inside when its centroid is.
    pub fn polygon_triangles(&self) -> impl Iterator<Item = &Triangle> + '_ {
        self.triangles
            .iter()
            .filter(|t| Point::from(t.centroid()).is_inside(self.polygon.iter().copied()))
    }

    /// The input polygon.
    pub fn polygon(&self) -> &[[f64; 2]] {
        &self.polygon
    }

    /// The triangle enclosing the polygon, root of the hierarchy.
    pub fn outer_triangle(&self) -> Triangle {
        self.outer
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

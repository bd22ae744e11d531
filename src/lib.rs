//! Point location in triangulated polygons with Kirkpatrick's hierarchy.
//!
//! A [`Kirkpatrick`] locator is built from a simple polygon in two steps: construction
//! triangulates the polygon together with an enclosing triangle, and
//! [`Kirkpatrick::preprocess`] builds the search hierarchy. Queries then run in
//! *O*(log(*n*)) time.
//!
//! ```
//! use kirkloc::{Kirkpatrick, PointLocator};
//!
//! let polygon = vec![[0., 0.], [4., 0.], [4., 3.], [2., 1.], [0., 3.]];
//! let mut locator = Kirkpatrick::new(polygon)?;
//! locator.preprocess()?;
//!
//! let hierarchy = locator.hierarchy()?;
//! let cells = hierarchy.locate_many(&[[1., 1.], [3., 0.5], [50., 50.]]);
//! assert!(cells[0].is_some() && cells[1].is_some());
//! assert_eq!(cells[2], None);
//! # Ok::<(), anyhow::Error>(())
//! ```

#![doc(html_root_url = "https://docs.rs/kirkloc/0.1.0")]

mod bounding;
mod dag;
mod error;
mod geometry;
mod kirkpatrick;
mod mesh;
mod planar_map;
mod point_locator;
mod triangulation;

pub use error::KirkpatrickError;
pub use geometry::Point;
pub use kirkpatrick::{
    Config, Hierarchy, Kirkpatrick, Round, Snapshot, Stats, Triangle, TriangleId,
    DEFAULT_DEGREE_BOUND, DEFAULT_MARGIN,
};
pub use mesh::Mesh;
pub use planar_map::{OutEdge, PlanarMap, PointId, Segment};
pub use point_locator::PointLocator;
pub use triangulation::{TriangulationProvider, Triangulator};

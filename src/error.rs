use crate::planar_map::PointId;

/// Errors reported by the point location structure.
///
/// Fallible functions of this crate return [`anyhow::Result`]; the underlying error can be
/// recovered with [`anyhow::Error::downcast_ref`] when the caller needs to tell the cases apart.
#[derive(Clone, Debug, thiserror::Error, PartialEq)]
pub enum KirkpatrickError {
    /// [`preprocess`](crate::Kirkpatrick::preprocess) was called a second time.
    #[error("The hierarchy has already been preprocessed")]
    DoublePreprocess,

    /// A query was issued before the hierarchy was preprocessed.
    #[error("The hierarchy must be preprocessed before it can be queried")]
    QueryBeforePreprocess,

    /// The input polygon cannot be triangulated.
    #[error("Degenerate input: {0}")]
    DegenerateInput(String),

    /// No vertex could be removed although interior vertices remain.
    #[error("No independent set found with {remaining} vertices remaining")]
    Stalled {
        /// Number of vertices still present in the planar map
        remaining: usize,
    },

    /// Ear clipping returned an unexpected number of triangles for a hole.
    #[error(
        "Retriangulating the hole of vertex {vertex:?} ({ring} ring vertices) gave {triangles} triangle(s)"
    )]
    Retriangulation {
        /// The removed vertex
        vertex: PointId,
        /// Number of vertices on the hole boundary
        ring: usize,
        /// Number of triangles returned by the triangulation provider
        triangles: usize,
    },

    /// A vertex was expected in the planar map but is not there.
    #[error("Vertex {0:?} is not in the planar map")]
    MissingVertex(PointId),
}

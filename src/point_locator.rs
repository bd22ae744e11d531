use rayon::prelude::*;

/// A trait to locate one or several query points within a triangulated subdivision.
pub trait PointLocator {
    /// What a successful query returns, typically the index of a cell.
    type Cell;

    /// Locates one query point.
    ///
    /// Returns [`None`] if the query point does not lie in any cell of the subdivision.
    fn locate_one(&self, point: &[f64; 2]) -> Option<Self::Cell>;

    /// Locates several query points.
    fn locate_many(&self, points: &[[f64; 2]]) -> Vec<Option<Self::Cell>> {
        points.iter().map(|point| self.locate_one(point)).collect()
    }

    /// Locates several query points in parallel.
    ///
    /// The results are in the same order as the query points.
    fn par_locate_many(&self, points: &[[f64; 2]]) -> Vec<Option<Self::Cell>>
    where
        Self: Sync,
        Self::Cell: Send,
    {
        points
            .par_iter()
            .map(|point| self.locate_one(point))
            .collect()
    }
}

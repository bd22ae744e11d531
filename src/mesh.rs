use anyhow::{anyhow, Result};

/// A triangle mesh: a list of points and a flat list of point indices, three per cell.
///
/// This is the exchange format for external consumers such as renderers.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    points: Vec<[f64; 2]>,
    cells: Vec<usize>,
}

impl Mesh {
    /// Creates a mesh, checking that the cells are triangles referring to existing points.
    pub fn new(points: Vec<[f64; 2]>, cells: Vec<usize>) -> Result<Self> {
        if cells.len() % 3 != 0 {
            return Err(anyhow!(
                "The number of cell indices ({}) should be a multiple of 3.",
                cells.len()
            ));
        }
        if let Some(&idx) = cells.iter().find(|&&idx| idx >= points.len()) {
            return Err(anyhow!(
                "Cell index {} is out of bounds for {} points.",
                idx,
                points.len()
            ));
        }
        Ok(Self { points, cells })
    }

    pub fn points(&self) -> &[[f64; 2]] {
        &self.points
    }

    pub fn vertex_count(&self) -> usize {
        self.points.len()
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len() / 3
    }

    /// An iterator over the cells, as triples of point indices.
    pub fn cells(&self) -> impl Iterator<Item = [usize; 3]> + '_ {
        self.cells.chunks_exact(3).map(|c| [c[0], c[1], c[2]])
    }

    /// The coordinates of the vertices of cell `idx`.
    ///
    /// # Panics
    ///
    /// Panics if there is no cell `idx`.
    pub fn cell_vertices(
        &self,
        idx: usize,
    ) -> impl Iterator<Item = &[f64; 2]> + ExactSizeIterator + Clone {
        self.cells[3 * idx..3 * idx + 3]
            .iter()
            .map(|&v| &self.points[v])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_mesh() -> Result<()> {
        let points = vec![[0., 0.], [1., 0.], [1., 1.], [0., 1.]];
        let cells = vec![0, 1, 3, 1, 2, 3];

        let mesh = Mesh::new(points, cells)?;

        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.cell_count(), 2);

        Ok(())
    }

    #[test]
    fn invalid_meshes_are_rejected() {
        let points = vec![[0., 0.], [1., 0.], [1., 1.]];

        assert!(Mesh::new(points.clone(), vec![0, 1]).is_err());
        assert!(Mesh::new(points, vec![0, 1, 3]).is_err());
    }

    #[test]
    fn iterate_over_cells() -> Result<()> {
        let points = vec![[0., 0.], [1., 0.], [1., 1.], [0., 1.]];
        let cells = vec![0, 1, 3, 1, 2, 3];
        let mesh = Mesh::new(points, cells)?;

        let mut cells = mesh.cells();

        assert_eq!(cells.next(), Some([0, 1, 3]));
        assert_eq!(cells.next(), Some([1, 2, 3]));
        assert_eq!(cells.next(), None);

        Ok(())
    }

    #[test]
    fn cell_vertices() -> Result<()> {
        let points = vec![[0., 0.], [1., 0.], [1., 1.], [0., 1.]];
        let cells = vec![0, 1, 3, 1, 2, 3];
        let mesh = Mesh::new(points, cells)?;

        let vertices: Vec<_> = mesh.cell_vertices(1).copied().collect();

        assert_eq!(vertices, [[1., 0.], [1., 1.], [0., 1.]]);

        Ok(())
    }
}

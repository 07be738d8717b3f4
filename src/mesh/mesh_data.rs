use crate::bounding_volume::Aabb;
use crate::math::{Point, Real, Vector};
use crate::mesh::Vertex;
use crate::shape::Triangle;

/// Error indicating that a [`MeshData`] is malformed.
#[derive(thiserror::Error, Copy, Clone, Debug, PartialEq, Eq)]
pub enum MeshDataError {
    /// The index buffer does not describe a list of triangles.
    #[error("the index count {0} is not a multiple of three.")]
    IndexCountNotMultipleOfThree(usize),
    /// An index references a vertex that does not exist.
    #[error("the index {index} is out of bounds (the mesh has {vertex_count} vertices).")]
    IndexOutOfBounds {
        /// The faulty index.
        index: u32,
        /// The number of vertices of the mesh.
        vertex_count: usize,
    },
}

/// A triangle list with per-vertex attributes and a material.
///
/// The triangles are counter-clockwise when seen from outside of the mesh.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct MeshData {
    /// The vertex buffer.
    pub vertices: Vec<Vertex>,
    /// The index buffer: three consecutive indices per triangle.
    pub indices: Vec<u32>,
    /// The index of the material used to render this mesh.
    pub material_index: u32,
}

impl MeshData {
    /// Creates a new mesh.
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u32>, material_index: u32) -> Self {
        MeshData {
            vertices,
            indices,
            material_index,
        }
    }

    /// An empty mesh using the given material.
    pub fn empty(material_index: u32) -> Self {
        Self::new(Vec::new(), Vec::new(), material_index)
    }

    /// Does this mesh have no triangle?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.len() < 3
    }

    /// The number of triangles of this mesh.
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// The indices of the `i`-th triangle.
    #[inline]
    pub fn triangle_indices(&self, i: usize) -> [u32; 3] {
        [
            self.indices[i * 3],
            self.indices[i * 3 + 1],
            self.indices[i * 3 + 2],
        ]
    }

    /// The `i`-th triangle.
    #[inline]
    pub fn triangle(&self, i: usize) -> Triangle {
        let [a, b, c] = self.triangle_indices(i);
        Triangle::new(
            self.vertices[a as usize].position,
            self.vertices[b as usize].position,
            self.vertices[c as usize].position,
        )
    }

    /// Iterates through all the triangles of this mesh.
    pub fn triangles(&self) -> impl ExactSizeIterator<Item = Triangle> + '_ {
        (0..self.triangle_count()).map(move |i| self.triangle(i))
    }

    /// Checks that the index buffer is a valid triangle list.
    pub fn validate(&self) -> Result<(), MeshDataError> {
        if self.indices.len() % 3 != 0 {
            return Err(MeshDataError::IndexCountNotMultipleOfThree(
                self.indices.len(),
            ));
        }

        let vertex_count = self.vertices.len();
        if let Some(index) = self.indices.iter().find(|i| **i as usize >= vertex_count) {
            return Err(MeshDataError::IndexOutOfBounds {
                index: *index,
                vertex_count,
            });
        }

        Ok(())
    }

    /// The AABB of the vertices of this mesh.
    pub fn aabb(&self) -> Aabb {
        Aabb::from_points(self.vertices.iter().map(|v| v.position))
    }

    /// The signed volume enclosed by this mesh.
    ///
    /// Only meaningful for closed meshes. Computed with the divergence theorem
    /// relative to the first vertex, which keeps the sum accurate far from the origin.
    pub fn volume(&self) -> Real {
        match self.vertices.first() {
            Some(v) => self.volume_moments(&v.position).0 / 6.0,
            None => 0.0,
        }
    }

    /// The centroid of the volume enclosed by this mesh.
    ///
    /// Falls back to the mean of the vertices for open or flat meshes.
    pub fn centroid(&self) -> Point<Real> {
        let reference = match self.vertices.first() {
            Some(v) => v.position,
            None => return Point::origin(),
        };

        let (total, weighted) = self.volume_moments(&reference);

        if total.abs() > crate::math::DEFAULT_EPSILON {
            reference + weighted / (total * 4.0)
        } else {
            let sum: Vector<Real> = self.vertices.iter().map(|v| v.position.coords).sum();
            Point::from(sum / self.vertices.len() as Real)
        }
    }

    /// Six times the signed volumes of the tetrahedra joining `reference` to every
    /// triangle, summed, along with the sum of their (unnormalized) first moments.
    ///
    /// The moments of several meshes taken about the same reference can be added
    /// up, even if the meshes are only closed together.
    pub fn volume_moments(&self, reference: &Point<Real>) -> (Real, Vector<Real>) {
        let mut weighted = Vector::zeros();
        let mut total = 0.0;
        for tri in self.triangles() {
            let a = tri.a - reference;
            let b = tri.b - reference;
            let c = tri.c - reference;
            let vol = a.dot(&b.cross(&c));
            weighted += (a + b + c) * vol;
            total += vol;
        }
        (total, weighted)
    }

    /// Translates all the vertices of this mesh.
    pub fn translate(&mut self, translation: &Vector<Real>) {
        for v in &mut self.vertices {
            v.position += translation;
        }
    }

    /// Flips the orientation of every triangle and every normal.
    pub fn flip(&mut self) {
        for tri in self.indices.chunks_exact_mut(3) {
            tri.swap(1, 2);
        }
        for v in &mut self.vertices {
            v.normal = -v.normal;
        }
    }

    /// Appends the vertices and triangles of `other` to this mesh.
    pub fn append(&mut self, other: &MeshData) {
        let base = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&other.vertices);
        self.indices.extend(other.indices.iter().map(|i| i + base));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::primitives::cuboid_mesh;

    #[test]
    fn unit_cube_volume_and_centroid() {
        let mut mesh = cuboid_mesh(&Vector::repeat(0.5), 0);
        assert_relative_eq!(mesh.volume(), 1.0, epsilon = 1.0e-5);
        assert_relative_eq!(mesh.centroid(), Point::origin(), epsilon = 1.0e-5);

        mesh.translate(&Vector::new(10.0, 0.0, 0.0));
        assert_relative_eq!(mesh.volume(), 1.0, epsilon = 1.0e-4);
        assert_relative_eq!(mesh.centroid(), Point::new(10.0, 0.0, 0.0), epsilon = 1.0e-4);
    }

    #[test]
    fn validation_errors() {
        let mut mesh = cuboid_mesh(&Vector::repeat(0.5), 0);
        assert_eq!(mesh.validate(), Ok(()));

        mesh.indices.push(0);
        assert_eq!(
            mesh.validate(),
            Err(MeshDataError::IndexCountNotMultipleOfThree(37))
        );

        mesh.indices.push(0);
        mesh.indices.push(1000);
        assert!(matches!(
            mesh.validate(),
            Err(MeshDataError::IndexOutOfBounds { index: 1000, .. })
        ));
    }

    #[test]
    fn flipping_negates_the_volume() {
        let mut mesh = cuboid_mesh(&Vector::repeat(1.0), 0);
        mesh.flip();
        assert_relative_eq!(mesh.volume(), -8.0, epsilon = 1.0e-4);
    }
}

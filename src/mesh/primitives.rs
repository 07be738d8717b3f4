//! Procedural meshes for props and tests.

use crate::math::{Point, Real, Vector, Vector2};
use crate::mesh::{MeshData, Vertex};
use na::RealField;

/// A box centered at the origin, with one quad (four vertices) per face.
pub fn cuboid_mesh(half_extents: &Vector<Real>, material_index: u32) -> MeshData {
    // (normal, u, v) with u x v = normal.
    let faces = [
        (Vector::x(), Vector::y(), Vector::z()),
        (-Vector::x(), Vector::z(), Vector::y()),
        (Vector::y(), Vector::z(), Vector::x()),
        (-Vector::y(), Vector::x(), Vector::z()),
        (Vector::z(), Vector::x(), Vector::y()),
        (-Vector::z(), Vector::y(), Vector::x()),
    ];
    let corners = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)];

    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);

    for (normal, u, v) in faces.iter() {
        let base = vertices.len() as u32;
        let center = normal.component_mul(half_extents);

        for (su, sv) in corners.iter() {
            let offset = u.component_mul(half_extents) * *su + v.component_mul(half_extents) * *sv;
            vertices.push(Vertex::new(
                Point::from(center + offset),
                *normal,
                Vector2::new((su + 1.0) / 2.0, (sv + 1.0) / 2.0),
            ));
        }

        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    MeshData::new(vertices, indices, material_index)
}

/// A UV sphere centered at the origin.
///
/// Both poles are single vertices; the seam vertices are duplicated so that
/// texture coordinates wrap.
pub fn uv_sphere_mesh(
    radius: Real,
    nsubdiv_theta: u32,
    nsubdiv_phi: u32,
    material_index: u32,
) -> MeshData {
    let ntheta = nsubdiv_theta.max(3);
    let nphi = nsubdiv_phi.max(2);
    let mut vertices = Vec::new();
    let mut indices = Vec::new();

    let north = vertices.len() as u32;
    vertices.push(Vertex::new(
        Point::new(0.0, radius, 0.0),
        Vector::y(),
        Vector2::new(0.5, 0.0),
    ));

    // Inner rings, from the north pole to the south pole.
    for j in 1..nphi {
        let phi = Real::pi() * j as Real / nphi as Real;
        for i in 0..=ntheta {
            let theta = Real::two_pi() * i as Real / ntheta as Real;
            let normal = Vector::new(phi.sin() * theta.cos(), phi.cos(), -phi.sin() * theta.sin());
            vertices.push(Vertex::new(
                Point::from(normal * radius),
                normal,
                Vector2::new(i as Real / ntheta as Real, j as Real / nphi as Real),
            ));
        }
    }

    let south = vertices.len() as u32;
    vertices.push(Vertex::new(
        Point::new(0.0, -radius, 0.0),
        -Vector::y(),
        Vector2::new(0.5, 1.0),
    ));

    let ring = |j: u32, i: u32| 1 + (j - 1) * (ntheta + 1) + i;

    for i in 0..ntheta {
        indices.extend_from_slice(&[north, ring(1, i), ring(1, i + 1)]);
    }

    for j in 1..nphi - 1 {
        for i in 0..ntheta {
            let (a, b) = (ring(j, i), ring(j, i + 1));
            let (c, d) = (ring(j + 1, i), ring(j + 1, i + 1));
            indices.extend_from_slice(&[a, c, d, a, d, b]);
        }
    }

    for i in 0..ntheta {
        indices.extend_from_slice(&[south, ring(nphi - 1, i + 1), ring(nphi - 1, i)]);
    }

    MeshData::new(vertices, indices, material_index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cuboid_faces_point_outward() {
        let mesh = cuboid_mesh(&Vector::new(1.0, 2.0, 3.0), 0);
        assert_eq!(mesh.triangle_count(), 12);
        for (i, tri) in mesh.triangles().enumerate() {
            let normal = tri.normal().unwrap();
            let vertex_normal = mesh.vertices[mesh.indices[i * 3] as usize].normal;
            assert_relative_eq!(*normal, vertex_normal, epsilon = 1.0e-6);
        }
        assert_relative_eq!(mesh.volume(), 48.0, epsilon = 1.0e-4);
    }

    #[test]
    fn sphere_is_closed_and_outward() {
        let mesh = uv_sphere_mesh(1.0, 24, 16, 0);
        assert_eq!(mesh.validate(), Ok(()));
        let volume = mesh.volume();
        // Slightly less than 4/3 pi because of the tessellation.
        assert!(volume > 3.9 && volume < 4.19, "{}", volume);
    }
}

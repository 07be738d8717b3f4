//! Triangulation of the cross-sections exposed by a cut.

use crate::math::{Point2, Real, Vector2, Vector4};
use crate::mesh::{MeshData, Vertex};
use crate::shape::Plane;
use crate::transformation::{triangulate_polygon, CutLoop};
use crate::utils;

/// How the texture coordinates of cap faces are computed.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub enum CapUvMode {
    /// Each loop is mapped to the unit square through its bounding rectangle on the
    /// plane, so a slice texture covers the cross-section regardless of its size.
    FitToLoop,
    /// The plane coordinates multiplied by `scale`.
    Planar {
        /// The number of texture repetitions per unit length.
        scale: Real,
    },
}

impl Default for CapUvMode {
    fn default() -> Self {
        CapUvMode::FitToLoop
    }
}

/// Triangulates the cut loops lying on `plane` into a single cap mesh.
///
/// The cap faces the positive side of the plane: it closes the piece lying
/// behind the plane. Flip it to close the piece in front of it.
pub fn build_cap(
    loops: &[CutLoop],
    plane: &Plane,
    uv_mode: CapUvMode,
    color: Vector4<Real>,
    material_index: u32,
) -> MeshData {
    let (tangent, binormal) = plane.basis();
    let normal = plane.normal.into_inner();
    let mut cap = MeshData::empty(material_index);

    for cut_loop in loops {
        let projected: Vec<Point2<Real>> = cut_loop
            .points
            .iter()
            .map(|p| Point2::new(p.coords.dot(&tangent), p.coords.dot(&binormal)))
            .collect();
        let triangles = triangulate_polygon(&projected);
        if triangles.is_empty() {
            continue;
        }

        let (mins, maxs) = projected.iter().fold(
            (projected[0], projected[0]),
            |(mins, maxs), p| (mins.inf(p), maxs.sup(p)),
        );
        let extents = maxs - mins;

        let base = cap.vertices.len() as u32;
        for (pt, uv_pt) in cut_loop.points.iter().zip(projected.iter()) {
            let tex_coord = match uv_mode {
                CapUvMode::FitToLoop => Vector2::new(
                    (uv_pt.x - mins.x) * utils::inv(extents.x),
                    (uv_pt.y - mins.y) * utils::inv(extents.y),
                ),
                CapUvMode::Planar { scale } => uv_pt.coords * scale,
            };
            cap.vertices.push(Vertex {
                position: plane.project_point(pt),
                normal,
                color,
                tex_coord,
            });
        }

        for tri in triangles {
            cap.indices
                .extend_from_slice(&[base + tri[0], base + tri[1], base + tri[2]]);
        }
    }

    cap
}

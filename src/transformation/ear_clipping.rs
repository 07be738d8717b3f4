//! Ear-clipping algorithm for creating a triangle mesh from a simple polygon.
//! Based on <https://github.com/ivanfratric/polypartition>.

use crate::{
    math::{Point2, Real},
    utils::{corner_direction, is_point_in_triangle, signed_area2, Orientation},
};

/// The information stored for each vertex in the ear clipping algorithm.
#[derive(Clone, Default)]
struct VertexInfo {
    /// Whether the vertex is still active i.e. it has not been clipped yet.
    is_active: bool,
    /// Whether the vertex is the tip of an ear and should be clipped.
    is_ear: bool,
    /// How small the angle of the ear is. Ears with a smaller angle are clipped first.
    pointiness: Real,
    p_prev: usize,
    p_next: usize,
}

/// Updates the fields `pointiness` and `is_ear` for a given vertex index.
///
/// Only the vertices still active can prevent a corner from being an ear.
fn update_vertex(idx: usize, infos: &mut [VertexInfo], points: &[Point2<Real>]) -> bool {
    let VertexInfo { p_prev, p_next, .. } = infos[idx];
    let p = points[idx];
    let p1 = points[p_prev];
    let p3 = points[p_next];

    let vec1 = (p1 - p).try_normalize(Real::EPSILON);
    let vec3 = (p3 - p).try_normalize(Real::EPSILON);
    let (vec1, vec3) = match (vec1, vec3) {
        (Some(v1), Some(v3)) => (v1, v3),
        // Duplicate points: clipping this vertex does not remove any area.
        _ => {
            infos[idx].pointiness = 1.0;
            infos[idx].is_ear = true;
            return true;
        }
    };

    let pointiness = vec1.dot(&vec3);
    if pointiness.is_nan() {
        return false;
    }

    // A point is considered an ear when it is convex and no other points are
    // inside the triangle spanned by it and its two neighbors.
    let mut error = false;
    let is_ear = corner_direction(&p1, &p, &p3) == Orientation::Ccw
        && (0..points.len())
            .filter(|&i| infos[i].is_active && i != p_prev && i != idx && i != p_next)
            .filter(|&i| points[i] != p1 && points[i] != p && points[i] != p3)
            .all(|i| {
                if let Some(is) = is_point_in_triangle(&points[i], &p1, &p, &p3) {
                    !is
                } else {
                    error = true;
                    true
                }
            });

    infos[idx].pointiness = pointiness;
    infos[idx].is_ear = is_ear;
    !error
}

/// Ear clipping triangulation algorithm.
///
/// The polygon must be simple and counter-clockwise. Returns `None` if no ear
/// can be found at some point, which happens for clockwise or self-intersecting
/// polygons. Otherwise exactly `vertices.len() - 2` triangles are returned,
/// all counter-clockwise.
pub fn triangulate_ear_clipping(vertices: &[Point2<Real>]) -> Option<Vec<[u32; 3]>> {
    let n_vertices = vertices.len();
    if n_vertices < 3 {
        return None;
    }

    if n_vertices == 3 {
        return if corner_direction(&vertices[0], &vertices[1], &vertices[2]) == Orientation::Cw {
            None
        } else {
            Some(vec![[0, 1, 2]])
        };
    }

    let mut vertex_info = vec![VertexInfo::default(); n_vertices];
    for (i, info) in vertex_info.iter_mut().enumerate() {
        info.is_active = true;
        info.p_prev = if i == 0 { n_vertices - 1 } else { i - 1 };
        info.p_next = if i == n_vertices - 1 { 0 } else { i + 1 };
    }

    for i in 0..n_vertices {
        if !update_vertex(i, &mut vertex_info, vertices) {
            return None;
        }
    }

    let mut output_indices = Vec::with_capacity(n_vertices - 2);

    // Each iteration clips exactly one ear, which bounds the loop.
    for i in 0..n_vertices - 3 {
        // Search through all active ears and pick out the pointiest.
        let (ear_i, _) = vertex_info
            .iter()
            .enumerate()
            .filter(|(_, info)| info.is_active && info.is_ear)
            .max_by(|(_, info1), (_, info2)| {
                info1
                    .pointiness
                    .partial_cmp(&info2.pointiness)
                    .unwrap_or(core::cmp::Ordering::Equal)
            })?;

        // Deactivate the tip of the ear.
        vertex_info[ear_i].is_active = false;

        let VertexInfo { p_prev, p_next, .. } = vertex_info[ear_i];
        output_indices.push([p_prev as u32, ear_i as u32, p_next as u32]);

        // Connect the remaining two vertices.
        vertex_info[p_prev].p_next = p_next;
        vertex_info[p_next].p_prev = p_prev;

        // Only three vertices remain and those are guaranteed to be convex so
        // there is no point in updating the remaining vertex information.
        if i == n_vertices - 4 {
            break;
        };

        if !update_vertex(p_prev, &mut vertex_info, vertices)
            || !update_vertex(p_next, &mut vertex_info, vertices)
        {
            return None;
        }
    }

    // Add the remaining triangle.
    if let Some((i, info)) = vertex_info
        .iter()
        .enumerate()
        .find(|(_, info)| info.is_active)
    {
        output_indices.push([info.p_prev as u32, i as u32, info.p_next as u32]);
    }

    Some(output_indices)
}

/// Triangulates a simple polygon of any winding.
///
/// The polygon is reversed first if it is clockwise, so the returned triangles
/// (indexing `vertices`) are always counter-clockwise. If ear clipping fails,
/// for example on self-intersecting input, a triangle fan around the first
/// vertex is returned instead. Polygons with less than three vertices produce
/// no triangle.
pub fn triangulate_polygon(vertices: &[Point2<Real>]) -> Vec<[u32; 3]> {
    let n = vertices.len();
    if n < 3 {
        return Vec::new();
    }

    let reversed = signed_area2(vertices) < 0.0;
    let ordered: Vec<Point2<Real>> = if reversed {
        vertices.iter().rev().copied().collect()
    } else {
        vertices.to_vec()
    };

    let to_original = |i: u32| if reversed { (n - 1) as u32 - i } else { i };

    match triangulate_ear_clipping(&ordered) {
        Some(triangles) => triangles
            .into_iter()
            .map(|t| [to_original(t[0]), to_original(t[1]), to_original(t[2])])
            .collect(),
        None => {
            log::debug!(
                "ear clipping failed on a polygon with {} vertices, using a triangle fan",
                n
            );
            (1..n as u32 - 1)
                .map(|i| [to_original(0), to_original(i), to_original(i + 1)])
                .collect()
        }
    }
}

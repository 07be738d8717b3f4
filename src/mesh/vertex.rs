use crate::math::{Point, Real, Vector, Vector2, Vector4};

/// A render vertex: position, normal, color and texture coordinates.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[cfg_attr(
    feature = "bytemuck-serialize",
    derive(bytemuck::Pod, bytemuck::Zeroable)
)]
#[repr(C)]
pub struct Vertex {
    /// The vertex position.
    pub position: Point<Real>,
    /// The vertex normal.
    pub normal: Vector<Real>,
    /// The RGBA vertex color.
    pub color: Vector4<Real>,
    /// The texture coordinates.
    pub tex_coord: Vector2<Real>,
}

impl Default for Vertex {
    fn default() -> Self {
        Vertex {
            position: Point::origin(),
            normal: Vector::y(),
            color: Vector4::repeat(1.0),
            tex_coord: Vector2::zeros(),
        }
    }
}

impl Vertex {
    /// Creates a white vertex.
    pub fn new(position: Point<Real>, normal: Vector<Real>, tex_coord: Vector2<Real>) -> Self {
        Vertex {
            position,
            normal,
            tex_coord,
            ..Default::default()
        }
    }

    /// Linearly interpolates every attribute between `self` (at `t = 0`) and `other` (at `t = 1`).
    ///
    /// The interpolated normal is renormalized unless it vanishes.
    pub fn interpolate(&self, other: &Vertex, t: Real) -> Vertex {
        let normal = self.normal.lerp(&other.normal, t);
        Vertex {
            position: self.position + (other.position - self.position) * t,
            normal: normal.try_normalize(crate::math::DEFAULT_EPSILON).unwrap_or(normal),
            color: self.color.lerp(&other.color, t),
            tex_coord: self.tex_coord.lerp(&other.tex_coord, t),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interpolation_midpoint() {
        let a = Vertex::new(Point::origin(), Vector::x(), Vector2::new(0.0, 0.0));
        let b = Vertex::new(Point::new(2.0, 0.0, 0.0), Vector::y(), Vector2::new(1.0, 1.0));
        let mid = a.interpolate(&b, 0.5);
        assert_relative_eq!(mid.position, Point::new(1.0, 0.0, 0.0));
        assert_relative_eq!(mid.normal.norm(), 1.0, epsilon = 1.0e-6);
        assert_relative_eq!(mid.tex_coord, Vector2::new(0.5, 0.5));
    }
}

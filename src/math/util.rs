use super::{Point2d, Vector2d};
use cgmath::prelude::*;

/// Projects a point onto a local coordinate system.
///
/// # Parameters
/// * `point` - The point to project
/// * `origin` - The origin of the coordinate system
/// * `x_axis` - The basis vector pointing in the positive x-axis.
/// * `y_axis` - The basis vector pointing in the positive y-axis.
pub fn project_local(
    point: Point2d,
    origin: Point2d,
    x_axis: Vector2d,
    y_axis: Vector2d,
) -> Point2d {
    let point = point - origin;
    Point2d::new(point.dot(x_axis), point.dot(y_axis))
}

/// Rotates a vector 90 degrees anticlockwise.
pub fn rot90(vec: Vector2d) -> Vector2d {
    Vector2d::new(-vec.y, vec.x)
}

/// The unit vector pointing along the given heading, in radians from the positive x-axis.
pub fn heading_vector(heading: f64) -> Vector2d {
    let (sin, cos) = heading.sin_cos();
    Vector2d::new(cos, sin)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn heading_vector_points_up_at_half_pi() {
        let dir = heading_vector(FRAC_PI_2);
        assert_approx_eq!(dir.x, 0.0);
        assert_approx_eq!(dir.y, 1.0);
    }

    #[test]
    fn project_onto_rotated_frame() {
        let origin = Point2d::new(1.0, 1.0);
        let x_axis = heading_vector(FRAC_PI_2);
        let local = project_local(Point2d::new(1.0, 3.0), origin, x_axis, rot90(x_axis));
        assert_approx_eq!(local.x, 2.0);
        assert_approx_eq!(local.y, 0.0);
    }
}

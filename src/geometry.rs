//! Shape intersection tests used for collision detection.

use crate::math::{heading_vector, project_local, rot90, Point2d, Vector2d};
use crate::util::Interval;
use cgmath::prelude::*;
use serde::{Deserialize, Serialize};

/// A rectangle, possibly rotated about its centre.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// The centre of the rectangle.
    pub center: Point2d,
    /// The extent along the heading axis (`x`) and perpendicular to it (`y`).
    pub size: Vector2d,
    /// The rotation of the rectangle in radians.
    pub heading: f64,
}

/// A disk, or a point when the radius is zero.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Disk {
    pub center: Point2d,
    pub radius: f64,
}

/// A shape which can be tested for overlap with other shapes.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Rect(Rect),
    Disk(Disk),
}

/// Anything occupying space in the world.
pub trait Body {
    /// The shape currently occupied by the body.
    fn shape(&self) -> Shape;

    /// Whether this body overlaps the other.
    fn overlaps<B: Body + ?Sized>(&self, other: &B) -> bool {
        self.shape().intersects(&other.shape())
    }
}

impl Rect {
    /// Creates a rectangle whose sides are aligned with the world axes.
    pub fn axis_aligned(center: Point2d, size: Vector2d) -> Self {
        Self {
            center,
            size,
            heading: 0.0,
        }
    }

    /// Creates a rectangle rotated by `heading` radians.
    pub fn oriented(center: Point2d, size: Vector2d, heading: f64) -> Self {
        Self {
            center,
            size,
            heading,
        }
    }

    /// The rectangle's two local unit axes in world space.
    pub fn axes(&self) -> [Vector2d; 2] {
        let u = heading_vector(self.heading);
        [u, rot90(u)]
    }

    /// The corners of the rectangle, anticlockwise.
    #[cfg(test)]
    fn corners(&self) -> [Point2d; 4] {
        let [u, v] = self.axes();
        let (hx, hy) = (0.5 * self.size.x, 0.5 * self.size.y);
        [(1.0, 1.0), (-1.0, 1.0), (-1.0, -1.0), (1.0, -1.0)]
            .map(|(sx, sy)| self.center + u * (sx * hx) + v * (sy * hy))
    }

    /// Projects the rectangle onto a unit axis.
    fn project(&self, axis: Vector2d) -> Interval<f64> {
        let [u, v] = self.axes();
        let radius = 0.5 * self.size.x * axis.dot(u).abs() + 0.5 * self.size.y * axis.dot(v).abs();
        Interval::disc(self.center.to_vec().dot(axis), radius)
    }

    /// The point of the rectangle closest to `point`.
    pub fn closest_point(&self, point: Point2d) -> Point2d {
        let [u, v] = self.axes();
        let local = project_local(point, self.center, u, v);
        let x = Interval::disc(0.0, 0.5 * self.size.x).clamp(local.x);
        let y = Interval::disc(0.0, 0.5 * self.size.y).clamp(local.y);
        self.center + u * x + v * y
    }

    /// Whether the point lies inside or on the boundary of the rectangle.
    pub fn contains(&self, point: Point2d) -> bool {
        let [u, v] = self.axes();
        let local = project_local(point, self.center, u, v);
        Interval::disc(0.0, 0.5 * self.size.x).contains(local.x)
            && Interval::disc(0.0, 0.5 * self.size.y).contains(local.y)
    }

    /// Separating axis test between two rectangles.
    fn intersects_rect(&self, other: &Rect) -> bool {
        self.axes()
            .into_iter()
            .chain(other.axes())
            .all(|axis| self.project(axis).overlaps(&other.project(axis)))
    }

    fn intersects_disk(&self, disk: &Disk) -> bool {
        self.closest_point(disk.center).distance(disk.center) < disk.radius
            || (disk.radius == 0.0 && self.contains(disk.center))
    }
}

impl Shape {
    /// Tests whether two shapes overlap. Shapes which only touch along an edge do not.
    pub fn intersects(&self, other: &Shape) -> bool {
        match (self, other) {
            (Shape::Rect(a), Shape::Rect(b)) => a.intersects_rect(b),
            (Shape::Rect(r), Shape::Disk(d)) | (Shape::Disk(d), Shape::Rect(r)) => {
                r.intersects_disk(d)
            }
            (Shape::Disk(a), Shape::Disk(b)) => {
                a.center.distance(b.center) < a.radius + b.radius
            }
        }
    }
}

impl From<Rect> for Shape {
    fn from(rect: Rect) -> Self {
        Shape::Rect(rect)
    }
}

impl From<Disk> for Shape {
    fn from(disk: Disk) -> Self {
        Shape::Disk(disk)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

    fn rect(x: f64, y: f64, w: f64, h: f64) -> Shape {
        Rect::axis_aligned(Point2d::new(x, y), Vector2d::new(w, h)).into()
    }

    #[test]
    fn axis_aligned_rectangles() {
        let a = rect(0.0, 0.0, 2.0, 2.0);
        assert!(a.intersects(&rect(1.5, 0.0, 2.0, 2.0)));
        assert!(!a.intersects(&rect(3.0, 0.0, 2.0, 2.0)));
        // Sharing an edge is not an overlap
        assert!(!a.intersects(&rect(2.0, 0.0, 2.0, 2.0)));
    }

    #[test]
    fn rotated_rectangle_is_separated_diagonally() {
        // A square rotated 45 degrees has its corner 1.414 from the centre along x
        let diamond: Shape =
            Rect::oriented(Point2d::new(0.0, 0.0), Vector2d::new(2.0, 2.0), FRAC_PI_4).into();
        assert!(diamond.intersects(&rect(2.0, 0.0, 1.2, 0.2)));
        assert!(!diamond.intersects(&rect(2.0, 0.0, 1.0, 0.2)));
        // Would overlap if the diamond were axis aligned
        assert!(!diamond.intersects(&rect(1.4, 1.4, 1.0, 1.0)));
        assert!(rect(0.0, 0.0, 2.0, 2.0).intersects(&rect(1.4, 1.4, 1.0, 1.0)));
    }

    #[test]
    fn heading_swaps_extents() {
        let car = Rect::oriented(Point2d::new(0.0, 0.0), Vector2d::new(4.0, 2.0), FRAC_PI_2);
        let corners = car.corners();
        let xs = corners.map(|c| c.x);
        let ys = corners.map(|c| c.y);
        assert_approx_eq!(xs.iter().cloned().fold(f64::MIN, f64::max), 1.0);
        assert_approx_eq!(ys.iter().cloned().fold(f64::MIN, f64::max), 2.0);
    }

    #[test]
    fn disk_against_rectangle() {
        let r = rect(0.0, 0.0, 2.0, 2.0);
        let near: Shape = Disk {
            center: Point2d::new(1.5, 0.0),
            radius: 0.6,
        }
        .into();
        let far: Shape = Disk {
            center: Point2d::new(1.5, 1.5),
            radius: 0.6,
        }
        .into();
        assert!(r.intersects(&near));
        assert!(near.intersects(&r));
        assert!(!r.intersects(&far));
    }

    #[test]
    fn point_inside_rectangle() {
        let point: Shape = Disk {
            center: Point2d::new(0.5, -0.5),
            radius: 0.0,
        }
        .into();
        assert!(rect(0.0, 0.0, 2.0, 2.0).intersects(&point));
        assert!(!rect(3.0, 0.0, 2.0, 2.0).intersects(&point));
    }

    #[test]
    fn disks() {
        let a = Disk {
            center: Point2d::new(0.0, 0.0),
            radius: 1.0,
        };
        let b = Disk {
            center: Point2d::new(1.5, 0.0),
            radius: 1.0,
        };
        assert!(Shape::from(a).intersects(&b.into()));
        assert!(!Shape::from(a).intersects(&Disk { radius: 0.4, ..b }.into()));
    }

    #[test]
    fn closest_point_is_clamped() {
        let r = Rect::axis_aligned(Point2d::new(0.0, 0.0), Vector2d::new(2.0, 4.0));
        let p = r.closest_point(Point2d::new(5.0, 1.0));
        assert_approx_eq!(p.x, 1.0);
        assert_approx_eq!(p.y, 1.0);
    }
}

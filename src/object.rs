use crate::geometry::{Body, Rect, Shape};
use crate::math::{Point2d, Vector2d};
use serde::{Deserialize, Serialize};

/// Whether a static object takes part in collision detection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    /// Walls, buildings and obstacles.
    Collidable,
    /// Road paint: lane markers, sidewalks, goal and start strips.
    Decorative,
}

/// A fill colour for renderers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    Gray,
    White,
    Black,
    Red,
    Blue,
}

/// An axis-aligned rectangle which never moves once placed in the world.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct StaticObject {
    /// The centre of the object.
    pub center: Point2d,
    /// The width (`x`) and height (`y`) of the object.
    pub size: Vector2d,
    pub color: Option<Color>,
    pub kind: ObjectKind,
}

impl StaticObject {
    /// A collidable building or obstacle.
    pub fn building(center: Point2d, size: Vector2d, color: Option<Color>) -> Self {
        Self {
            center,
            size,
            color,
            kind: ObjectKind::Collidable,
        }
    }

    /// A decorative painting on the road surface.
    pub fn painting(center: Point2d, size: Vector2d, color: Color) -> Self {
        Self {
            center,
            size,
            color: Some(color),
            kind: ObjectKind::Decorative,
        }
    }

    /// Whether the object takes part in collision detection.
    pub fn is_collidable(&self) -> bool {
        self.kind == ObjectKind::Collidable
    }
}

impl Body for StaticObject {
    fn shape(&self) -> Shape {
        Rect::axis_aligned(self.center, self.size).into()
    }
}

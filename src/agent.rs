use self::dynamics::{bicycle_step, KinematicState};
use crate::geometry::{Body, Rect, Shape};
use crate::math::{Point2d, Vector2d};
use serde::{Deserialize, Serialize};

mod dynamics;

/// A kinematically simulated vehicle.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Agent {
    /// The world space coordinates of the centre of the vehicle.
    center: Point2d,
    /// The heading in radians, anticlockwise from the positive x-axis. Never wrapped.
    heading: f64,
    /// The velocity in the vehicle's own frame; `x` is the forward speed in m/s.
    velocity: Vector2d,
    /// The minimum forward speed in m/s; negative values allow reversing.
    min_speed: f64,
    /// The maximum forward speed in m/s.
    max_speed: f64,
    /// Half the vehicle's length in m.
    half_len: f64,
    /// Half the vehicle's width in m.
    half_wid: f64,
    /// Constant deceleration due to rolling resistance, in m/s^2.
    friction: f64,
    /// The control input applied on the next integration.
    control: Control,
}

/// The attributes of a simulated vehicle.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentAttributes {
    /// The vehicle length in m.
    pub length: f64,
    /// The vehicle width in m.
    pub width: f64,
    /// The minimum forward speed in m/s.
    pub min_speed: f64,
    /// The maximum forward speed in m/s.
    pub max_speed: f64,
    /// Constant deceleration due to rolling resistance, in m/s^2.
    pub friction: f64,
}

impl Default for AgentAttributes {
    fn default() -> Self {
        Self {
            length: 4.0,
            width: 2.0,
            min_speed: -10.0,
            max_speed: 30.0,
            friction: 0.06,
        }
    }
}

/// A steering and acceleration command.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Control {
    /// The steering angle in radians; positive turns left.
    pub steering: f64,
    /// The requested longitudinal acceleration in m/s^2.
    pub acceleration: f64,
}

impl Agent {
    /// Creates a new vehicle at the given pose, travelling forwards at `speed`.
    pub fn new(attributes: &AgentAttributes, center: Point2d, heading: f64, speed: f64) -> Self {
        Self {
            center,
            heading,
            velocity: Vector2d::new(speed, 0.0),
            min_speed: attributes.min_speed,
            max_speed: attributes.max_speed,
            half_len: 0.5 * attributes.length,
            half_wid: 0.5 * attributes.width,
            friction: attributes.friction,
            control: Control::default(),
        }
    }

    /// The coordinates in world space of the centre of the vehicle.
    pub fn center(&self) -> Point2d {
        self.center
    }

    pub fn x(&self) -> f64 {
        self.center.x
    }

    pub fn y(&self) -> f64 {
        self.center.y
    }

    /// The heading in radians.
    pub fn heading(&self) -> f64 {
        self.heading
    }

    /// The velocity in the vehicle's own frame.
    pub fn velocity(&self) -> Vector2d {
        self.velocity
    }

    /// The forward speed in m/s.
    pub fn speed(&self) -> f64 {
        self.velocity.x
    }

    /// The minimum forward speed in m/s.
    pub fn min_speed(&self) -> f64 {
        self.min_speed
    }

    /// The maximum forward speed in m/s.
    pub fn max_speed(&self) -> f64 {
        self.max_speed
    }

    /// The vehicle's length in m.
    pub fn length(&self) -> f64 {
        2.0 * self.half_len
    }

    /// The vehicle's width in m.
    pub fn width(&self) -> f64 {
        2.0 * self.half_wid
    }

    /// The control input that will be applied on the next integration.
    pub fn control(&self) -> Control {
        self.control
    }

    /// Stores the control input for the next integration. Has no immediate effect.
    pub fn set_control(&mut self, steering: f64, acceleration: f64) {
        self.control = Control {
            steering,
            acceleration,
        };
    }

    /// Moves the vehicle to a new pose without changing its speed.
    pub fn set_pose(&mut self, center: Point2d, heading: f64) {
        self.center = center;
        self.heading = heading;
    }

    /// Sets the forward speed. The speed limits apply from the next integration.
    pub fn set_speed(&mut self, speed: f64) {
        self.velocity = Vector2d::new(speed, 0.0);
    }

    /// Integrates the vehicle's velocity, heading and position.
    ///
    /// # Parameters
    /// * `dt` - The time step in seconds
    pub(crate) fn integrate(&mut self, dt: f64) {
        let state = KinematicState {
            center: self.center,
            heading: self.heading,
            speed: self.speed(),
        };
        let next = bicycle_step(
            state,
            self.control.steering,
            self.control.acceleration - self.friction,
            self.half_len,
            (self.min_speed, self.max_speed),
            dt,
        );
        self.center = next.center;
        self.heading = next.heading;
        self.velocity = Vector2d::new(next.speed, 0.0);
    }
}

impl Body for Agent {
    fn shape(&self) -> Shape {
        Rect::oriented(
            self.center,
            Vector2d::new(self.length(), self.width()),
            self.heading,
        )
        .into()
    }
}

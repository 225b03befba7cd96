use crate::math::{heading_vector, Point2d};

/// The pose and speed of a vehicle at one instant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KinematicState {
    pub center: Point2d,
    pub heading: f64,
    pub speed: f64,
}

/// Advances a kinematic bicycle model by one time step.
///
/// The centre of mass is assumed to sit halfway between the axles, so the slip angle
/// is `atan(tan(steering) / 2)`. Speed and heading are integrated with the trapezoidal rule.
///
/// # Parameters
/// * `state` - The state at the start of the step
/// * `steering` - The front wheel steering angle in radians
/// * `acc` - The net longitudinal acceleration in m/s^2
/// * `rear_dist` - Distance from the centre of mass to the rear axle in m
/// * `speed_limits` - The minimum and maximum forward speed in m/s
/// * `dt` - The time step in s
pub fn bicycle_step(
    state: KinematicState,
    steering: f64,
    acc: f64,
    rear_dist: f64,
    speed_limits: (f64, f64),
    dt: f64,
) -> KinematicState {
    let (min_speed, max_speed) = speed_limits;
    let beta = (0.5 * steering.tan()).atan();
    let speed = (state.speed + acc * dt).clamp(min_speed, max_speed);
    let mean_speed = 0.5 * (state.speed + speed);
    let heading = state.heading + mean_speed / rear_dist * beta.sin() * dt;
    let angle = 0.5 * (state.heading + heading) + beta;
    let center = state.center + heading_vector(angle) * (mean_speed * dt);
    KinematicState {
        center,
        heading,
        speed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use std::f64::consts::FRAC_PI_2;

    fn start() -> KinematicState {
        KinematicState {
            center: Point2d::new(0.0, 0.0),
            heading: FRAC_PI_2,
            speed: 5.0,
        }
    }

    #[test]
    fn straight_line_motion() {
        let next = bicycle_step(start(), 0.0, 0.0, 2.0, (-10.0, 30.0), 0.3);
        assert_approx_eq!(next.center.x, 0.0);
        assert_approx_eq!(next.center.y, 1.5);
        assert_approx_eq!(next.heading, FRAC_PI_2);
        assert_approx_eq!(next.speed, 5.0);
    }

    #[test]
    fn trapezoidal_speed_update() {
        let next = bicycle_step(start(), 0.0, 2.0, 2.0, (-10.0, 30.0), 0.5);
        assert_approx_eq!(next.speed, 6.0);
        assert_approx_eq!(next.center.y, 2.75);
    }

    #[test]
    fn speed_is_clamped() {
        let next = bicycle_step(start(), 0.0, 100.0, 2.0, (-10.0, 30.0), 1.0);
        assert_approx_eq!(next.speed, 30.0);
        let next = bicycle_step(start(), 0.0, -100.0, 2.0, (-10.0, 30.0), 1.0);
        assert_approx_eq!(next.speed, -10.0);
    }

    #[test]
    fn positive_steering_turns_left() {
        let next = bicycle_step(start(), 0.2, 0.0, 2.0, (-10.0, 30.0), 0.3);
        assert!(next.heading > FRAC_PI_2);
        assert!(next.center.x < 0.0);
    }
}

//! Scenario configuration.
//!
//! Every field has a default which reproduces the standard obstacle course: a 60 m square
//! map with a two lane road up the middle, one obstacle in each lane and the goal at the
//! far edge. Configurations may be loaded from JSON, where missing fields take their defaults.

use crate::agent::AgentAttributes;
use crate::error::{Error, Result};
use crate::math::{Point2d, Vector2d};
use crate::scenario::Action;
use crate::util::Interval;
use serde::{Deserialize, Serialize};
use smallvec::{smallvec, SmallVec};
use std::f64::consts::{FRAC_PI_2, PI};
use std::path::Path;

/// The discrete actions available to the policy.
pub type ActionSet = SmallVec<[Action; 4]>;

/// The full description of an obstacle avoidance scenario.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    /// The map width in m.
    pub map_width: f64,
    /// The map height in m.
    pub map_height: f64,
    /// The width of each of the two lanes in m.
    pub lane_width: f64,
    /// The sidewalk width in m. Also the tolerance for reaching the goal.
    pub sidewalk_width: f64,
    /// The width of the painted centre line markers in m.
    pub lane_marker_width: f64,
    /// The length of each painted centre line marker in m.
    pub lane_marker_height: f64,
    /// The duration of a tick in s.
    pub dt: f64,
    /// The episode is terminated once this much time has been simulated, in s.
    pub horizon: f64,
    /// The obstacles; one in each lane when omitted.
    pub obstacles: Option<Vec<ObstacleConfig>>,
    /// The centre of the goal strip; the middle of the far edge when omitted.
    pub goal: Option<Point2d>,
    /// The discrete action set.
    pub actions: ActionSet,
    /// The ego vehicle template.
    pub ego: EgoConfig,
    /// Perturbations applied to the ego vehicle on every reset; none when omitted.
    pub reset_noise: Option<ResetNoise>,
}

/// A rectangular obstacle.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObstacleConfig {
    pub center: Point2d,
    /// Width (`x`) and height (`y`) in m.
    pub size: Vector2d,
}

/// The initial state of the ego vehicle.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EgoConfig {
    pub attributes: AgentAttributes,
    /// The starting position; the middle of the near edge when omitted.
    pub start: Option<Point2d>,
    /// The starting heading in radians.
    pub heading: f64,
    /// The starting forward speed in m/s.
    pub speed: f64,
}

/// Random perturbations of the ego vehicle's initial state.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResetNoise {
    /// Sample the start position uniformly from the road near the start strip.
    pub randomize_position: bool,
    /// Standard deviation of the heading perturbation in radians.
    pub heading_std: f64,
    /// Standard deviation of the speed perturbation in m/s.
    pub speed_std: f64,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            map_width: 60.0,
            map_height: 60.0,
            lane_width: 8.8,
            sidewalk_width: 2.0,
            lane_marker_width: 0.5,
            lane_marker_height: 3.8,
            dt: 0.3,
            horizon: 30.0,
            obstacles: None,
            goal: None,
            actions: smallvec![Action::TURN_LEFT, Action::TURN_RIGHT, Action::STRAIGHT],
            ego: EgoConfig::default(),
            reset_noise: None,
        }
    }
}

impl Default for EgoConfig {
    fn default() -> Self {
        Self {
            attributes: AgentAttributes::default(),
            start: None,
            heading: FRAC_PI_2,
            speed: 5.0,
        }
    }
}

impl Default for ResetNoise {
    fn default() -> Self {
        Self {
            randomize_position: true,
            heading_std: 0.1,
            speed_std: 2.0,
        }
    }
}

impl ScenarioConfig {
    /// Parses and validates a configuration from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// The width of the buildings on either side of the road, in m.
    pub fn building_width(&self) -> f64 {
        0.5 * (self.map_width
            - 2.0 * self.sidewalk_width
            - 2.0 * self.lane_width
            - self.lane_marker_width)
    }

    /// The centre of the goal strip.
    pub fn goal(&self) -> Point2d {
        self.goal
            .unwrap_or_else(|| Point2d::new(0.5 * self.map_width, self.map_height))
    }

    /// The ego vehicle's starting position, before any reset noise.
    pub fn start(&self) -> Point2d {
        self.ego
            .start
            .unwrap_or_else(|| Point2d::new(0.5 * self.map_width, 0.0))
    }

    /// The obstacles, falling back to one in the middle of each lane
    /// at one and two thirds of the way up the map.
    pub fn obstacles(&self) -> Vec<ObstacleConfig> {
        match &self.obstacles {
            Some(obstacles) => obstacles.clone(),
            None => {
                let size = Vector2d::new(self.lane_width, self.lane_marker_width);
                let mid = 0.5 * self.map_width;
                vec![
                    ObstacleConfig {
                        center: Point2d::new(mid - 0.5 * self.lane_width, self.map_height / 3.0),
                        size,
                    },
                    ObstacleConfig {
                        center: Point2d::new(
                            mid + 0.5 * self.lane_width,
                            2.0 * self.map_height / 3.0,
                        ),
                        size,
                    },
                ]
            }
        }
    }

    /// The region from which randomised start positions are drawn: the road,
    /// less a 2 m margin at each kerb, over the first tenth of the map.
    pub fn start_region(&self) -> (Interval<f64>, Interval<f64>) {
        let road_min = self.building_width() + self.sidewalk_width + 2.0;
        let road_len = 2.0 * self.lane_width + self.lane_marker_width - 4.0;
        (
            Interval::new(road_min, road_min + road_len),
            Interval::new(0.0, 0.1 * self.map_height),
        )
    }

    /// The declared bounds of each observation component.
    ///
    /// These bounds are loose and do not describe the returned observation: the third
    /// component is a speed, not an angle in `[-pi/2, pi/2]`, and the heading is unwrapped
    /// rather than confined to `[0, 2pi]`. Consumers should not clip observations to them.
    pub fn observation_bounds(&self) -> [Interval<f64>; 4] {
        [
            Interval::new(0.0, self.map_width),
            Interval::new(0.0, self.map_height),
            Interval::new(-FRAC_PI_2, FRAC_PI_2),
            Interval::new(0.0, 2.0 * PI),
        ]
    }

    /// Checks that the configuration describes a buildable scenario.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("map_width", self.map_width),
            ("map_height", self.map_height),
            ("lane_width", self.lane_width),
            ("sidewalk_width", self.sidewalk_width),
            ("lane_marker_width", self.lane_marker_width),
            ("lane_marker_height", self.lane_marker_height),
            ("dt", self.dt),
            ("horizon", self.horizon),
            ("ego.attributes.length", self.ego.attributes.length),
            ("ego.attributes.width", self.ego.attributes.width),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(config_error(format!("{name} must be positive, got {value}")));
            }
        }

        let building_width = self.building_width();
        if building_width < 0.0 {
            return Err(config_error(format!(
                "the road and sidewalks are wider than the map (building width {building_width})"
            )));
        }

        for (idx, obstacle) in self.obstacles().iter().enumerate() {
            if !(obstacle.size.x > 0.0 && obstacle.size.y > 0.0) {
                return Err(config_error(format!(
                    "obstacle {idx} must have a positive size, got {:?}",
                    obstacle.size
                )));
            }
        }

        if self.actions.is_empty() {
            return Err(config_error("the action set is empty".into()));
        }
        if let Some(action) = self
            .actions
            .iter()
            .find(|a| !(a.steering.is_finite() && a.acceleration.is_finite()))
        {
            return Err(config_error(format!("non-finite action {action:?}")));
        }

        let attrs = &self.ego.attributes;
        if !(attrs.min_speed <= attrs.max_speed) {
            return Err(config_error(format!(
                "ego min_speed {} exceeds max_speed {}",
                attrs.min_speed, attrs.max_speed
            )));
        }
        if !Interval::new(attrs.min_speed, attrs.max_speed).contains(self.ego.speed) {
            return Err(config_error(format!(
                "initial ego speed {} is outside [{}, {}]",
                self.ego.speed, attrs.min_speed, attrs.max_speed
            )));
        }

        if let Some(noise) = &self.reset_noise {
            if !(noise.heading_std >= 0.0 && noise.speed_std >= 0.0) {
                return Err(config_error(format!(
                    "reset noise deviations must be non-negative, got {noise:?}"
                )));
            }
            if noise.randomize_position && self.start_region().0.length() < 0.0 {
                return Err(config_error("the road is too narrow for random starts".into()));
            }
        }

        Ok(())
    }
}

fn config_error(msg: String) -> Error {
    Error::Configuration(msg)
}

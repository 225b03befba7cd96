//! The obstacle avoidance scenario, exposed as a Markov decision process.

use crate::agent::Agent;
use crate::config::{ResetNoise, ScenarioConfig};
use crate::error::{Error, Result};
use crate::math::Point2d;
use crate::util::Interval;
use crate::world::{World, WorldSnapshot};
use crate::AgentId;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};

mod layout;

/// The reward for colliding with a building or obstacle.
const COLLISION_REWARD: f64 = -200.0;

/// The reward for reaching the goal strip.
const GOAL_REWARD: f64 = 200.0;

/// Weight of the squared lateral deviation from the centre line.
const CENTRING_WEIGHT: f64 = 1.0 / 16.0;

/// Numerator of the reciprocal progress term.
const PROGRESS_GAIN: f64 = 60.0;

/// A steering and acceleration command drawn from the scenario's action set.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Action {
    /// Steering angle in radians; positive turns left.
    pub steering: f64,
    /// Longitudinal acceleration in m/s^2.
    pub acceleration: f64,
}

impl Action {
    pub const TURN_LEFT: Action = Action::new(0.2, 0.0);
    pub const TURN_RIGHT: Action = Action::new(-0.2, 0.0);
    pub const STRAIGHT: Action = Action::new(0.0, 0.0);

    pub const fn new(steering: f64, acceleration: f64) -> Self {
        Self {
            steering,
            acceleration,
        }
    }
}

/// What the policy observes after each step.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Observation {
    pub x: f64,
    pub y: f64,
    /// The forward speed in m/s.
    pub speed: f64,
    /// The heading in radians.
    pub heading: f64,
}

impl Observation {
    /// The observation as a vector of `(x, y, speed, heading)`.
    pub fn to_array(&self) -> [f64; 4] {
        [self.x, self.y, self.speed, self.heading]
    }
}

impl From<&Agent> for Observation {
    fn from(agent: &Agent) -> Self {
        Self {
            x: agent.x(),
            y: agent.y(),
            speed: agent.velocity().x,
            heading: agent.heading(),
        }
    }
}

/// The declared bounds of the observation vector.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ObservationSpace {
    pub bounds: [Interval<f64>; 4],
}

impl ObservationSpace {
    pub fn low(&self) -> [f64; 4] {
        self.bounds.map(|b| b.min)
    }

    pub fn high(&self) -> [f64; 4] {
        self.bounds.map(|b| b.max)
    }

    /// Whether every component of the observation lies within its declared bound.
    pub fn contains(&self, observation: &Observation) -> bool {
        self.bounds
            .iter()
            .zip(observation.to_array())
            .all(|(bound, value)| bound.contains(value))
    }
}

/// Extra diagnostic values returned alongside each step. Currently always empty.
pub type Info = serde_json::Map<String, serde_json::Value>;

/// The outcome of a call to [Scenario::step].
#[derive(Clone, Debug, PartialEq)]
pub struct StepResult {
    pub observation: Observation,
    pub reward: f64,
    pub done: bool,
    pub info: Info,
}

/// Whether an episode is in progress.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EpisodeState {
    Active,
    Terminal,
}

/// Why an episode ended, in order of precedence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    Collision,
    GoalReached,
    TimeLimit,
}

/// A car must drive up a two lane road, avoiding an obstacle in each lane,
/// and reach the goal strip at the far end of the map.
///
/// Each episode owns a fresh [World] containing the static layout and a copy
/// of the ego vehicle template. Both are replaced on [reset](Self::reset).
pub struct Scenario {
    config: ScenarioConfig,
    /// The template copied into each episode.
    init_ego: Agent,
    world: World,
    ego: AgentId,
    state: EpisodeState,
    rng: StdRng,
}

impl Scenario {
    /// Creates a scenario and starts the first episode.
    pub fn new(config: ScenarioConfig) -> Result<Self> {
        config.validate()?;
        let init_ego = Agent::new(
            &config.ego.attributes,
            config.start(),
            config.ego.heading,
            config.ego.speed,
        );
        let world = World::new(config.dt, config.map_width, config.map_height);
        let mut scenario = Self {
            config,
            init_ego,
            world,
            ego: AgentId::default(),
            state: EpisodeState::Active,
            rng: StdRng::seed_from_u64(0),
        };
        scenario.reset();
        Ok(scenario)
    }

    /// Re-seeds the random number generator used for randomised resets.
    pub fn seed(&mut self, seed: u64) -> u64 {
        self.rng = StdRng::seed_from_u64(seed);
        seed
    }

    /// Discards the current episode and starts a new one, returning the initial observation.
    pub fn reset(&mut self) -> Observation {
        self.world = layout::build_world(&self.config);
        let mut ego = self.init_ego.clone();
        if let Some(noise) = self.config.reset_noise {
            self.perturb(&mut ego, &noise);
        }
        self.ego = self.world.add_agent(ego);
        self.state = EpisodeState::Active;
        log::debug!(
            "reset: {} objects, ego at {:?} heading {:.3}",
            self.world.iter_objects().count(),
            self.ego().center(),
            self.ego().heading()
        );
        self.observation()
    }

    /// Applies an action for one tick.
    ///
    /// Fails with [Error::InvalidStateTransition] once the episode has terminated,
    /// and with [Error::InvalidAction] if the action is not in the action set.
    pub fn step(&mut self, action: Action) -> Result<StepResult> {
        if self.state == EpisodeState::Terminal {
            return Err(Error::InvalidStateTransition);
        }
        if !self.config.actions.contains(&action) {
            return Err(Error::InvalidAction {
                steering: action.steering,
                acceleration: action.acceleration,
            });
        }

        self.world
            .get_agent_mut(self.ego)
            .set_control(action.steering, action.acceleration);
        self.world.tick();

        let observation = self.observation();
        let reward = self.reward();
        let termination = self.termination();
        log::trace!(
            "t = {:.2}: {:?} -> {:?}, reward {:.3}",
            self.world.t(),
            action,
            observation,
            reward
        );
        if let Some(termination) = termination {
            log::debug!(
                "episode ended at t = {:.2}: {:?}",
                self.world.t(),
                termination
            );
            self.state = EpisodeState::Terminal;
        }

        Ok(StepResult {
            observation,
            reward,
            done: termination.is_some(),
            info: Info::new(),
        })
    }

    /// Applies the action at position `index` in the action set.
    pub fn step_index(&mut self, index: usize) -> Result<StepResult> {
        match self.config.actions.get(index) {
            Some(action) => self.step(*action),
            None => Err(Error::InvalidActionIndex {
                index,
                len: self.config.actions.len(),
            }),
        }
    }

    /// Releases the current episode. Only [reset](Self::reset) is valid afterwards.
    pub fn close(&mut self) {
        self.world.close();
        self.state = EpisodeState::Terminal;
    }

    /// The current observation.
    pub fn observation(&self) -> Observation {
        self.ego().into()
    }

    /// The reward for the current state.
    ///
    /// Collisions take precedence over reaching the goal. Otherwise the reward penalises
    /// lateral distance from the centre line and grows as the car nears the far edge.
    /// The progress term is unbounded: it is infinite when `y` equals the map height.
    /// With the default goal this point lies inside the goal strip, so it is never
    /// returned, but a relocated goal can expose it.
    pub fn reward(&self) -> f64 {
        if self.collision_exists() {
            COLLISION_REWARD
        } else if self.goal_reached() {
            GOAL_REWARD
        } else {
            let ego = self.ego();
            let lateral = ego.x() - 0.5 * self.config.map_width;
            -CENTRING_WEIGHT * lateral.powi(2)
                + PROGRESS_GAIN / (ego.y() - self.config.map_height).abs()
        }
    }

    /// Whether the ego vehicle is within a sidewalk width of the goal line.
    /// Only the `y` coordinate is considered.
    pub fn goal_reached(&self) -> bool {
        (self.config.goal().y - self.ego().y()).abs() < self.config.sidewalk_width
    }

    /// Whether the ego vehicle overlaps a building, an obstacle or another vehicle.
    pub fn collision_exists(&self) -> bool {
        self.world.agent_collides(self.ego)
    }

    /// The reason the episode should end, if any.
    pub fn termination(&self) -> Option<Termination> {
        if self.collision_exists() {
            Some(Termination::Collision)
        } else if self.goal_reached() {
            Some(Termination::GoalReached)
        } else if self.world.t() >= self.config.horizon {
            Some(Termination::TimeLimit)
        } else {
            None
        }
    }

    /// The declared observation bounds. See [ScenarioConfig::observation_bounds].
    pub fn observation_space(&self) -> ObservationSpace {
        ObservationSpace {
            bounds: self.config.observation_bounds(),
        }
    }

    /// The discrete actions accepted by [step](Self::step).
    pub fn action_space(&self) -> &[Action] {
        &self.config.actions
    }

    pub fn state(&self) -> EpisodeState {
        self.state
    }

    pub fn config(&self) -> &ScenarioConfig {
        &self.config
    }

    /// The simulated time of the current episode in s.
    pub fn t(&self) -> f64 {
        self.world.t()
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    /// The ego vehicle of the current episode.
    pub fn ego(&self) -> &Agent {
        self.world.get_agent(self.ego)
    }

    /// Mutable access to the ego vehicle, for scripted starts and tests.
    pub fn ego_mut(&mut self) -> &mut Agent {
        self.world.get_agent_mut(self.ego)
    }

    /// Copies the current episode's world into a serialisable form.
    pub fn snapshot(&self) -> WorldSnapshot {
        self.world.snapshot()
    }

    /// Applies the configured reset noise to a fresh ego vehicle.
    fn perturb(&mut self, ego: &mut Agent, noise: &ResetNoise) {
        let center = if noise.randomize_position {
            let (xs, ys) = self.config.start_region();
            Point2d::new(xs.lerp(self.rng.gen()), ys.lerp(self.rng.gen()))
        } else {
            ego.center()
        };
        let heading_noise: f64 = self.rng.sample(StandardNormal);
        let speed_noise: f64 = self.rng.sample(StandardNormal);
        ego.set_pose(center, ego.heading() + noise.heading_std * heading_noise);
        ego.set_speed(ego.speed() + noise.speed_std * speed_noise);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use std::f64::consts::FRAC_PI_2;

    fn scenario() -> Scenario {
        Scenario::new(ScenarioConfig::default()).unwrap()
    }

    #[test]
    fn initial_reward_is_pure_progress() {
        let scenario = scenario();
        assert_approx_eq!(scenario.reward(), 1.0);
    }

    #[test]
    fn shaping_penalises_lateral_offset() {
        let mut scenario = scenario();
        scenario
            .ego_mut()
            .set_pose(Point2d::new(26.0, 30.0), FRAC_PI_2);
        assert!(!scenario.collision_exists());
        assert_approx_eq!(scenario.reward(), -1.0 + 2.0);
    }

    #[test]
    fn goal_tolerance_is_strict() {
        let mut scenario = scenario();
        scenario.ego_mut().set_pose(Point2d::new(30.0, 58.0), FRAC_PI_2);
        assert!(!scenario.goal_reached());
        scenario.ego_mut().set_pose(Point2d::new(30.0, 58.01), FRAC_PI_2);
        assert!(scenario.goal_reached());
        assert_eq!(scenario.termination(), Some(Termination::GoalReached));
    }

    #[test]
    fn progress_term_is_unbounded_at_the_far_edge() {
        let config = ScenarioConfig {
            goal: Some(Point2d::new(30.0, 10.0)),
            ..Default::default()
        };
        let mut scenario = Scenario::new(config).unwrap();
        scenario.ego_mut().set_pose(Point2d::new(30.0, 60.0), FRAC_PI_2);
        assert!(!scenario.collision_exists());
        assert!(!scenario.goal_reached());
        let reward = scenario.reward();
        assert!(reward.is_infinite() && reward > 0.0);
    }

    #[test]
    fn step_index_out_of_range() {
        let mut scenario = scenario();
        assert!(matches!(
            scenario.step_index(3),
            Err(Error::InvalidActionIndex { index: 3, len: 3 })
        ));
        assert!(scenario.step_index(2).is_ok());
    }

    #[test]
    fn close_ends_the_episode() {
        let mut scenario = scenario();
        scenario.close();
        assert!(scenario.world().is_closed());
        assert!(matches!(
            scenario.step(Action::STRAIGHT),
            Err(Error::InvalidStateTransition)
        ));
        scenario.reset();
        assert_eq!(scenario.state(), EpisodeState::Active);
        assert!(scenario.step(Action::STRAIGHT).is_ok());
    }

    #[test]
    fn reset_noise_is_reproducible() {
        let config = ScenarioConfig {
            reset_noise: Some(ResetNoise::default()),
            ..Default::default()
        };
        let mut a = Scenario::new(config.clone()).unwrap();
        let mut b = Scenario::new(config).unwrap();
        a.seed(7);
        b.seed(7);
        let (obs_a, obs_b) = (a.reset(), b.reset());
        assert_eq!(obs_a, obs_b);

        let (xs, ys) = a.config().start_region();
        assert!(xs.contains(obs_a.x));
        assert!(ys.contains(obs_a.y));
        assert_ne!(obs_a.heading, FRAC_PI_2);
        assert_ne!(a.reset(), obs_a);
    }
}

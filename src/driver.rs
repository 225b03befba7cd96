//! Runs episodes of a [Scenario] under a policy and records their total rewards.

use crate::error::Result;
use crate::scenario::{Action, Observation, Scenario, Termination};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Serialize;
use std::time::Duration;

/// Chooses an action to take given the latest observation.
pub trait Policy {
    fn act(&mut self, observation: &Observation, actions: &[Action]) -> Action;
}

/// Always takes the same action.
pub struct FixedPolicy(pub Action);

impl Policy for FixedPolicy {
    fn act(&mut self, _observation: &Observation, _actions: &[Action]) -> Action {
        self.0
    }
}

/// Picks uniformly from the action set.
pub struct RandomPolicy {
    rng: StdRng,
}

impl RandomPolicy {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Policy for RandomPolicy {
    fn act(&mut self, _observation: &Observation, actions: &[Action]) -> Action {
        actions
            .choose(&mut self.rng)
            .copied()
            .unwrap_or(Action::STRAIGHT)
    }
}

/// The result of a single episode.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EpisodeSummary {
    /// The index of the episode, starting from zero.
    pub episode: usize,
    /// The number of steps taken.
    pub steps: usize,
    /// The sum of the rewards over all steps.
    pub total_reward: f64,
    /// The simulated duration of the episode in s.
    pub duration: f64,
    pub termination: Option<Termination>,
}

/// Runs a single episode from reset until the scenario reports it is done.
///
/// # Parameters
/// * `pace` - If given, sleep this long between steps so the episode can be watched
pub fn run_episode(
    scenario: &mut Scenario,
    policy: &mut dyn Policy,
    episode: usize,
    pace: Option<Duration>,
) -> Result<EpisodeSummary> {
    let mut observation = scenario.reset();
    let mut total_reward = 0.0;
    let mut steps = 0;
    loop {
        let action = policy.act(&observation, scenario.action_space());
        let step = scenario.step(action)?;
        total_reward += step.reward;
        steps += 1;
        observation = step.observation;
        if step.done {
            break;
        }
        if let Some(pace) = pace {
            std::thread::sleep(pace);
        }
    }

    let summary = EpisodeSummary {
        episode,
        steps,
        total_reward,
        duration: scenario.t(),
        termination: scenario.termination(),
    };
    scenario.close();
    log::info!(
        "episode {}: total reward {:.3} after {} steps ({:?})",
        episode,
        total_reward,
        steps,
        summary.termination
    );
    Ok(summary)
}

/// Runs `episodes` consecutive episodes.
pub fn run(
    scenario: &mut Scenario,
    policy: &mut dyn Policy,
    episodes: usize,
    pace: Option<Duration>,
) -> Result<Vec<EpisodeSummary>> {
    (0..episodes)
        .map(|episode| run_episode(scenario, policy, episode, pace))
        .collect()
}

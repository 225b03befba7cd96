//! Tests of the episode driver loop.

use assert_approx_eq::assert_approx_eq;
use obstacle_avoidance::driver::{run, run_episode, FixedPolicy, RandomPolicy};
use obstacle_avoidance::{Action, Scenario, ScenarioConfig, Termination};

#[test]
fn straight_policy_collides_every_episode() {
    let mut scenario = Scenario::new(ScenarioConfig::default()).unwrap();
    let summaries = run(&mut scenario, &mut FixedPolicy(Action::STRAIGHT), 3, None).unwrap();
    assert_eq!(summaries.len(), 3);
    for (idx, summary) in summaries.iter().enumerate() {
        assert_eq!(summary.episode, idx);
        assert_eq!(summary.termination, Some(Termination::Collision));
        assert_eq!(summary.steps, summaries[0].steps);
        assert_eq!(summary.total_reward, summaries[0].total_reward);
    }
    // The final collision penalty dominates the shaping rewards
    assert!(summaries[0].total_reward < -150.0);
}

#[test]
fn time_limit_accumulates_shaping_reward() {
    let mut config = ScenarioConfig::default();
    config.ego.speed = 0.0;
    config.ego.attributes.min_speed = 0.0;
    let mut scenario = Scenario::new(config).unwrap();
    let summary = run_episode(&mut scenario, &mut FixedPolicy(Action::STRAIGHT), 0, None).unwrap();
    assert_eq!(summary.steps, 100);
    assert_eq!(summary.termination, Some(Termination::TimeLimit));
    assert_approx_eq!(summary.total_reward, 100.0);
    assert_approx_eq!(summary.duration, 30.0);
}

#[test]
fn random_policy_is_reproducible() {
    let run_with_seed = |seed| {
        let mut scenario = Scenario::new(ScenarioConfig::default()).unwrap();
        run(&mut scenario, &mut RandomPolicy::new(seed), 4, None).unwrap()
    };
    assert_eq!(run_with_seed(3), run_with_seed(3));
}

#[test]
fn summaries_serialize_to_json() {
    let mut scenario = Scenario::new(ScenarioConfig::default()).unwrap();
    let summary = run_episode(&mut scenario, &mut FixedPolicy(Action::STRAIGHT), 0, None).unwrap();
    let json = serde_json::to_value(&summary).unwrap();
    assert_eq!(json["termination"], "collision");
    assert_eq!(json["steps"], summary.steps);
}

//! Construction of the fixed road layout.

use crate::config::ScenarioConfig;
use crate::math::{Point2d, Vector2d};
use crate::object::{Color, StaticObject};
use crate::world::World;

/// Builds a fresh world containing the scenario's static geometry, in drawing order:
/// sidewalks, centre line markers, buildings, obstacles, then the goal and start strips.
pub(crate) fn build_world(config: &ScenarioConfig) -> World {
    let (w, h) = (config.map_width, config.map_height);
    let bw = config.building_width();
    let sw = config.sidewalk_width;
    let mut world = World::new(config.dt, w, h);

    // Sidewalks are drawn beneath the buildings, protruding onto the road
    let sidewalk = Vector2d::new(bw + 2.0 * sw, h);
    world.add_object(StaticObject::painting(
        Point2d::new(w - 0.5 * bw, 0.5 * h),
        sidewalk,
        Color::Gray,
    ));
    world.add_object(StaticObject::painting(
        Point2d::new(0.5 * bw, 0.5 * h),
        sidewalk,
        Color::Gray,
    ));

    let marker = Vector2d::new(config.lane_marker_width, config.lane_marker_height);
    for y in lane_marker_positions(config) {
        world.add_object(StaticObject::painting(
            Point2d::new(0.5 * w, y),
            marker,
            Color::White,
        ));
    }

    let building = Vector2d::new(bw, h);
    world.add_object(StaticObject::building(
        Point2d::new(w - 0.5 * bw, 0.5 * h),
        building,
        None,
    ));
    world.add_object(StaticObject::building(
        Point2d::new(0.5 * bw, 0.5 * h),
        building,
        None,
    ));

    for obstacle in config.obstacles() {
        world.add_object(StaticObject::building(
            obstacle.center,
            obstacle.size,
            Some(Color::Black),
        ));
    }

    let goal = config.goal();
    let strip = Vector2d::new(2.0 * config.lane_width, 2.0 * sw);
    world.add_object(StaticObject::painting(goal, strip, Color::Red));
    world.add_object(StaticObject::painting(
        Point2d::new(goal.x, 0.0),
        strip,
        Color::Blue,
    ));

    world
}

/// The centres of the dashed centre line markers, spaced one marker apart.
fn lane_marker_positions(config: &ScenarioConfig) -> impl Iterator<Item = f64> {
    let half = 0.5 * config.lane_marker_height;
    let step = 2.0 * config.lane_marker_height;
    let end = config.map_height - half;
    (0..)
        .map(move |i| half + i as f64 * step)
        .take_while(move |y| *y < end)
}

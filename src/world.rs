use crate::agent::Agent;
use crate::geometry::Body;
use crate::object::StaticObject;
use crate::{AgentId, AgentSet, ObjectId, ObjectSet};
use serde::Serialize;

/// A bounded two dimensional world of static objects and moving agents.
///
/// Leaving the bounds is not prevented; `width` and `height` describe the map for renderers.
#[derive(Clone, Debug)]
pub struct World {
    /// The static objects, in insertion order.
    objects: ObjectSet,
    /// The agents being simulated.
    agents: AgentSet,
    /// The duration of a tick in s.
    dt: f64,
    /// The number of ticks simulated so far.
    frame: usize,
    /// The map width in m.
    width: f64,
    /// The map height in m.
    height: f64,
    /// Whether `close` has been called.
    closed: bool,
}

/// A serialisable copy of the world's contents.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WorldSnapshot {
    pub t: f64,
    pub width: f64,
    pub height: f64,
    pub objects: Vec<StaticObject>,
    pub agents: Vec<Agent>,
}

impl World {
    /// Creates an empty world at time zero.
    pub fn new(dt: f64, width: f64, height: f64) -> Self {
        Self {
            objects: ObjectSet::with_key(),
            agents: AgentSet::with_key(),
            dt,
            frame: 0,
            width,
            height,
            closed: false,
        }
    }

    /// Adds a static object to the world.
    pub fn add_object(&mut self, object: StaticObject) -> ObjectId {
        self.objects.insert(object)
    }

    /// Adds an agent to the world. It will be integrated on every tick.
    pub fn add_agent(&mut self, agent: Agent) -> AgentId {
        self.agents.insert(agent)
    }

    /// Advances the world by one tick of `dt` seconds.
    pub fn tick(&mut self) {
        for (_, agent) in &mut self.agents {
            agent.integrate(self.dt);
        }
        self.frame += 1;
    }

    /// The simulated time in s.
    pub fn t(&self) -> f64 {
        self.frame as f64 * self.dt
    }

    /// The number of ticks simulated so far.
    pub fn frame(&self) -> usize {
        self.frame
    }

    /// The duration of a tick in s.
    pub fn dt(&self) -> f64 {
        self.dt
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// Returns an iterator over all the static objects, in insertion order.
    pub fn iter_objects(&self) -> impl Iterator<Item = &StaticObject> {
        self.objects.values()
    }

    /// Returns an iterator over all the agents.
    pub fn iter_agents(&self) -> impl Iterator<Item = &Agent> {
        self.agents.values()
    }

    /// Gets a reference to the agent with the given ID.
    pub fn get_agent(&self, agent_id: AgentId) -> &Agent {
        &self.agents[agent_id]
    }

    /// Gets a mutable reference to the agent with the given ID.
    pub fn get_agent_mut(&mut self, agent_id: AgentId) -> &mut Agent {
        &mut self.agents[agent_id]
    }

    /// Whether any agent overlaps a collidable object or another agent.
    pub fn collision_exists(&self) -> bool {
        self.agents.keys().any(|id| self.agent_collides(id))
    }

    /// Whether the given agent overlaps a collidable object or another agent.
    pub fn agent_collides(&self, agent_id: AgentId) -> bool {
        let Some(agent) = self.agents.get(agent_id) else {
            return false;
        };
        let shape = agent.shape();
        let hit_object = self
            .objects
            .values()
            .filter(|object| object.is_collidable())
            .find(|object| shape.intersects(&object.shape()));
        if let Some(object) = hit_object {
            log::trace!("agent at {:?} overlaps object at {:?}", agent.center(), object.center);
            return true;
        }
        self.agents
            .iter()
            .filter(|(id, _)| *id != agent_id)
            .any(|(_, other)| agent.overlaps(other))
    }

    /// Copies the world's contents into a serialisable form.
    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            t: self.t(),
            width: self.width,
            height: self.height,
            objects: self.objects.values().copied().collect(),
            agents: self.agents.values().cloned().collect(),
        }
    }

    /// Releases the world. Its contents stay readable but it should not be ticked again.
    pub fn close(&mut self) {
        if !self.closed {
            log::debug!("closing world at t = {:.2} after {} ticks", self.t(), self.frame);
            self.closed = true;
        }
    }

    /// Whether `close` has been called.
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::AgentAttributes;
    use crate::math::{Point2d, Vector2d};
    use crate::object::Color;
    use assert_approx_eq::assert_approx_eq;
    use std::f64::consts::FRAC_PI_2;

    fn car_at(x: f64, y: f64) -> Agent {
        Agent::new(&AgentAttributes::default(), Point2d::new(x, y), FRAC_PI_2, 5.0)
    }

    #[test]
    fn time_advances_by_dt() {
        let mut world = World::new(0.3, 60.0, 60.0);
        for n in 1..=100 {
            world.tick();
            assert_eq!(world.frame(), n);
            assert_approx_eq!(world.t(), n as f64 * 0.3);
        }
        assert!(world.t() >= 30.0);
    }

    #[test]
    fn tick_integrates_agents() {
        let mut world = World::new(0.3, 60.0, 60.0);
        let id = world.add_agent(car_at(30.0, 0.0));
        world.tick();
        assert!(world.get_agent(id).y() > 1.4);
    }

    #[test]
    fn decorative_objects_do_not_collide() {
        let mut world = World::new(0.3, 60.0, 60.0);
        let id = world.add_agent(car_at(30.0, 0.0));
        world.add_object(StaticObject::painting(
            Point2d::new(30.0, 0.0),
            Vector2d::new(10.0, 10.0),
            Color::Red,
        ));
        assert!(!world.agent_collides(id));
        world.add_object(StaticObject::building(
            Point2d::new(30.0, 0.0),
            Vector2d::new(10.0, 10.0),
            None,
        ));
        assert!(world.agent_collides(id));
        assert!(world.collision_exists());
    }

    #[test]
    fn agents_collide_with_each_other() {
        let mut world = World::new(0.3, 60.0, 60.0);
        let a = world.add_agent(car_at(30.0, 0.0));
        let b = world.add_agent(car_at(31.0, 1.0));
        assert!(world.agent_collides(a));
        assert!(world.agent_collides(b));
        world.get_agent_mut(b).set_pose(Point2d::new(40.0, 10.0), 0.0);
        assert!(!world.collision_exists());
    }

    #[test]
    fn snapshot_preserves_insertion_order() {
        let mut world = World::new(0.3, 60.0, 60.0);
        for i in 0..5 {
            world.add_object(StaticObject::painting(
                Point2d::new(i as f64, 0.0),
                Vector2d::new(1.0, 1.0),
                Color::White,
            ));
        }
        let snapshot = world.snapshot();
        let xs = snapshot.objects.iter().map(|o| o.center.x).collect::<Vec<_>>();
        assert_eq!(xs, vec![0.0, 1.0, 2.0, 3.0, 4.0]);
        assert_eq!(snapshot.t, 0.0);
    }
}

pub use agent::{Agent, AgentAttributes, Control};
pub use cgmath;
pub use config::{ActionSet, EgoConfig, ObstacleConfig, ResetNoise, ScenarioConfig};
pub use error::{Error, Result};
pub use geometry::{Body, Disk, Rect, Shape};
pub use object::{Color, ObjectKind, StaticObject};
pub use scenario::{
    Action, EpisodeState, Info, Observation, ObservationSpace, Scenario, StepResult, Termination,
};
use slotmap::{new_key_type, SlotMap};
pub use util::Interval;
pub use world::{World, WorldSnapshot};

mod agent;
pub mod config;
pub mod driver;
mod error;
pub mod geometry;
pub mod math;
mod object;
mod scenario;
mod util;
mod world;

new_key_type! {
    /// Unique ID of a [StaticObject].
    pub struct ObjectId;
    /// Unique ID of an [Agent].
    pub struct AgentId;
}

type ObjectSet = SlotMap<ObjectId, StaticObject>;
type AgentSet = SlotMap<AgentId, Agent>;

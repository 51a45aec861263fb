pub mod building;
pub mod coordinate;
pub mod error;
pub mod manager;
pub mod noise;
pub mod object;
pub mod player;
pub mod registry;
pub mod resources;
pub mod scenario;
pub mod tile;
pub mod worker;
pub mod worldgen;

pub use error::{GameError, GameResult};
pub use manager::GameManager;
pub use scenario::{Scenario, ScenarioLoader};

pub mod constants;
pub mod control;
pub mod errors;
pub mod scenario;
pub mod simulation;
pub mod telemetry_system;
pub mod trajectory_system;
pub mod utils;

pub use constants::*;
pub use control::guidance::{GuidanceSystem, Phase, PhaseContext, PhaseTransition};
pub use control::planet::{Planet, PlanetId};
pub use control::propulsion::{FireOutcome, PropulsionSystem};
pub use control::rocket::{Rocket, RocketId, RocketState};
pub use errors::SimulationError;

// Re-export commonly used items from trajectory_system
pub use trajectory_system::kinematics::Body;
pub use trajectory_system::orbit::{compute_orbit, Orbit, OrbitSolution};

// Re-export commonly used items from telemetry_system
pub use telemetry_system::events::{EventLog, EventSink, SimEvent, TimedEvent, TracingSink};
pub use telemetry_system::telemetry::Telemetry;

pub use scenario::{Scenario, ScenarioConfig};
pub use simulation::{runner::Runner, world::World};

// Re-export commonly used utilities
pub use utils::{point2d::Point2D, vector2d::Vector2D};

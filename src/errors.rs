use thiserror::Error;

/// Failures detected while building a scenario. Nothing in the per-tick
/// pipeline produces one of these.
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("{entity}: mass must be positive, got {mass}")]
    InvalidMass { entity: String, mass: f64 },

    #[error("{entity}: radius must be positive, got {radius}")]
    InvalidRadius { entity: String, radius: f64 },

    #[error("{entity}: fuel speed must be positive, got {fuel_speed}")]
    InvalidFuelSpeed { entity: String, fuel_speed: f64 },

    #[error("{entity}: payload mass {payload_mass} must be non-negative and not exceed mass {mass}")]
    PayloadExceedsMass {
        entity: String,
        payload_mass: f64,
        mass: f64,
    },

    #[error("time step must be positive and finite, got {0}")]
    InvalidTimeStep(f64),

    #[error("time scale must be positive and finite, got {0}")]
    InvalidTimeScale(f64),

    #[error("duration must be non-negative and finite, got {0}")]
    InvalidDuration(f64),

    #[error("ticks per frame must be between 1 and {max}, got {ticks}")]
    InvalidTicksPerFrame { ticks: usize, max: usize },

    #[error("{entity}: unknown planet '{planet}'")]
    UnknownPlanet { entity: String, planet: String },

    #[error("{entity}: invalid placement: {reason}")]
    InvalidPlacement { entity: String, reason: String },

    #[error("{entity}: invalid phase: {reason}")]
    InvalidPhase { entity: String, reason: String },

    #[error("scenario must contain at least one planet")]
    EmptyScenario,

    #[error("unknown preset '{0}'")]
    UnknownPreset(String),

    #[error("failed to read scenario: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse scenario: {0}")]
    Parse(#[from] toml::de::Error),
}

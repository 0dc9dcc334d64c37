//! Scenario manifests: planets, rockets and their phase lists, loaded from
//! TOML and validated before the first tick.

use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::constants::{
    CORRECTION_CONVERGENCE, DEFAULT_FUEL_SPEED, DEFAULT_TARGET_ACCELERATION,
    DEFAULT_TICKS_PER_FRAME, DEFAULT_TIME_SCALE, MAX_SIMULATION_TIME, MAX_TICKS_PER_FRAME,
    TIME_STEP,
};
use crate::control::{
    guidance::Phase,
    phases::{
        Circularize, Landing, LogMessage, OrbitCorrection, OrbitalBreak, OrbitalTransfer,
        SetTimeScale, Takeoff, WaitForAlignment, WaitForHeight, WaitPolarAngle,
    },
    planet::{Planet, PlanetId},
    rocket::{Rocket, RocketId},
};
use crate::errors::SimulationError;
use crate::simulation::{runner::Runner, world::World};
use crate::trajectory_system::orbit::Orbit;
use crate::utils::{point2d::Point2D, vector2d::Vector2D};

pub const PRESETS: [&str; 3] = ["vertical_hop", "low_orbit", "moon_transfer"];

const VERTICAL_HOP: &str = include_str!("../scenarios/vertical_hop.toml");
const LOW_ORBIT: &str = include_str!("../scenarios/low_orbit.toml");
const MOON_TRANSFER: &str = include_str!("../scenarios/moon_transfer.toml");

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    /// Wall-clock seconds per frame.
    pub time_step: f64,
    pub time_scale: f64,
    pub ticks_per_frame: usize,
    /// Simulated seconds to run for.
    pub duration: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            time_step: TIME_STEP,
            time_scale: DEFAULT_TIME_SCALE,
            ticks_per_frame: DEFAULT_TICKS_PER_FRAME,
            duration: MAX_SIMULATION_TIME,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct PlanetConfig {
    pub name: String,
    pub mass: f64,
    pub radius: f64,
    #[serde(default)]
    pub position: [f64; 2],
    #[serde(default)]
    pub velocity: [f64; 2],
    #[serde(default)]
    pub rotation_angle: f64,
    #[serde(default)]
    pub angular_velocity: f64,
}

/// A rocket starts in exactly one of three ways: explicit `position`
/// (and optional `velocity`), a circular orbit at `orbit_height` above the
/// primary at polar angle `launch_angle` (default 0), or standing on the
/// primary's surface at `launch_angle`.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct RocketConfig {
    pub name: String,
    pub mass: f64,
    pub payload_mass: f64,
    #[serde(default = "default_fuel_speed")]
    pub fuel_speed: f64,
    #[serde(default = "default_target_acceleration")]
    pub target_acceleration: f64,
    pub primary: String,
    #[serde(default)]
    pub launch_angle: Option<f64>,
    #[serde(default)]
    pub orbit_height: Option<f64>,
    #[serde(default)]
    pub position: Option<[f64; 2]>,
    #[serde(default)]
    pub velocity: Option<[f64; 2]>,
    #[serde(default)]
    pub phases: Vec<PhaseConfig>,
}

fn default_fuel_speed() -> f64 {
    DEFAULT_FUEL_SPEED
}

fn default_target_acceleration() -> f64 {
    DEFAULT_TARGET_ACCELERATION
}

fn default_convergence() -> f64 {
    CORRECTION_CONVERGENCE
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PhaseConfig {
    Takeoff {
        height: f64,
    },
    WaitAboveHeight {
        height: f64,
    },
    WaitBelowHeight {
        height: f64,
    },
    WaitPolarAngle {
        angle: f64,
        epsilon: f64,
    },
    WaitAlignment {
        reference: String,
        #[serde(default)]
        phase_angle: f64,
        epsilon: f64,
        #[serde(default)]
        reparent: bool,
    },
    Circularize {
        height: f64,
    },
    OrbitalTransfer {
        /// Planet the target orbit is built around; the rocket's primary if
        /// omitted.
        #[serde(default)]
        around: Option<String>,
        perigee_height: f64,
        apogee_height: f64,
        #[serde(default)]
        argument: f64,
    },
    OrbitalBreak,
    OrbitCorrection {
        #[serde(default = "default_convergence")]
        epsilon: f64,
        #[serde(default)]
        bidirectional: bool,
    },
    Landing,
    SetTimeScale {
        value: f64,
    },
    Log {
        message: String,
    },
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ScenarioConfig {
    #[serde(default)]
    pub simulation: SimulationConfig,
    pub planets: Vec<PlanetConfig>,
    #[serde(default)]
    pub rockets: Vec<RocketConfig>,
}

/// A built world together with the stepping settings it was configured with.
#[derive(Debug)]
pub struct Scenario {
    pub world: World,
    pub settings: SimulationConfig,
}

impl Scenario {
    pub fn into_runner(self) -> Result<Runner, SimulationError> {
        Ok(Runner::new(self.world)
            .with_time_scale(self.settings.time_scale)?
            .with_ticks_per_frame(self.settings.ticks_per_frame))
    }
}

fn positive(value: f64) -> bool {
    value > 0.0 && value.is_finite()
}

fn vector(components: [f64; 2]) -> Vector2D {
    Vector2D::new(components[0], components[1])
}

fn point(components: [f64; 2]) -> Point2D {
    Point2D::new(components[0], components[1])
}

fn find_planet(planets: &[Planet], name: &str, entity: &str) -> Result<PlanetId, SimulationError> {
    planets
        .iter()
        .find(|planet| planet.name == name)
        .map(|planet| planet.id)
        .ok_or_else(|| SimulationError::UnknownPlanet {
            entity: entity.to_string(),
            planet: name.to_string(),
        })
}

fn invalid_phase(entity: &str, reason: impl Into<String>) -> SimulationError {
    SimulationError::InvalidPhase {
        entity: entity.to_string(),
        reason: reason.into(),
    }
}

impl ScenarioConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SimulationError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, SimulationError> {
        Ok(toml::from_str(contents)?)
    }

    pub fn preset(name: &str) -> Result<Self, SimulationError> {
        let contents = match name {
            "vertical_hop" => VERTICAL_HOP,
            "low_orbit" => LOW_ORBIT,
            "moon_transfer" => MOON_TRANSFER,
            other => return Err(SimulationError::UnknownPreset(other.to_string())),
        };
        Self::from_toml_str(contents)
    }

    fn validate_settings(&self) -> Result<(), SimulationError> {
        let settings = &self.simulation;
        if !positive(settings.time_step) {
            return Err(SimulationError::InvalidTimeStep(settings.time_step));
        }
        if !positive(settings.time_scale) {
            return Err(SimulationError::InvalidTimeScale(settings.time_scale));
        }
        if !(settings.duration >= 0.0 && settings.duration.is_finite()) {
            return Err(SimulationError::InvalidDuration(settings.duration));
        }
        if !(1..=MAX_TICKS_PER_FRAME).contains(&settings.ticks_per_frame) {
            return Err(SimulationError::InvalidTicksPerFrame {
                ticks: settings.ticks_per_frame,
                max: MAX_TICKS_PER_FRAME,
            });
        }
        Ok(())
    }

    fn build_planet(config: &PlanetConfig) -> Result<Planet, SimulationError> {
        if !positive(config.mass) {
            return Err(SimulationError::InvalidMass {
                entity: config.name.clone(),
                mass: config.mass,
            });
        }
        if !positive(config.radius) {
            return Err(SimulationError::InvalidRadius {
                entity: config.name.clone(),
                radius: config.radius,
            });
        }
        Ok(Planet::new(
            PlanetId(0),
            &config.name,
            config.mass,
            config.radius,
            point(config.position),
            vector(config.velocity),
        )
        .with_rotation(config.rotation_angle, config.angular_velocity))
    }

    fn build_rocket(config: &RocketConfig, planets: &[Planet]) -> Result<Rocket, SimulationError> {
        let entity = config.name.as_str();
        if !positive(config.mass) {
            return Err(SimulationError::InvalidMass {
                entity: entity.to_string(),
                mass: config.mass,
            });
        }
        if !(config.payload_mass >= 0.0 && config.payload_mass <= config.mass) {
            return Err(SimulationError::PayloadExceedsMass {
                entity: entity.to_string(),
                payload_mass: config.payload_mass,
                mass: config.mass,
            });
        }
        if !positive(config.fuel_speed) {
            return Err(SimulationError::InvalidFuelSpeed {
                entity: entity.to_string(),
                fuel_speed: config.fuel_speed,
            });
        }
        if !positive(config.target_acceleration) {
            return Err(invalid_phase(entity, "target acceleration must be positive"));
        }

        let primary_id = find_planet(planets, &config.primary, entity)?;
        let primary = &planets[primary_id.0];
        let id = RocketId(0);

        let rocket = match (config.position, config.orbit_height, config.launch_angle) {
            (Some(position), None, None) => {
                let velocity = config.velocity.map_or(primary.velocity(), vector);
                Rocket::new(
                    id,
                    entity,
                    config.mass,
                    config.payload_mass,
                    config.fuel_speed,
                    primary,
                    point(position),
                    velocity,
                )
            }
            (None, Some(height), angle) if config.velocity.is_none() => {
                if !(height >= 0.0 && height.is_finite()) {
                    return Err(SimulationError::InvalidPlacement {
                        entity: entity.to_string(),
                        reason: format!("orbit height must be non-negative, got {height}"),
                    });
                }
                let angle = angle.unwrap_or(0.0);
                let orbit = Orbit::from_heights(primary, height, height, angle);
                let (position, velocity) = orbit.perigee_state(primary);
                Rocket::new(
                    id,
                    entity,
                    config.mass,
                    config.payload_mass,
                    config.fuel_speed,
                    primary,
                    position,
                    velocity,
                )
            }
            (None, None, Some(angle)) if config.velocity.is_none() => Rocket::on_surface(
                id,
                entity,
                config.mass,
                config.payload_mass,
                config.fuel_speed,
                primary,
                angle + primary.rotation_angle,
            ),
            _ => {
                return Err(SimulationError::InvalidPlacement {
                    entity: entity.to_string(),
                    reason: "give exactly one of position, orbit_height or launch_angle \
                             (velocity only goes with position)"
                        .to_string(),
                })
            }
        };

        let phases = config
            .phases
            .iter()
            .map(|phase| Self::build_phase(phase, entity, primary_id, planets))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(rocket
            .with_target_acceleration(config.target_acceleration)
            .with_phases(phases))
    }

    fn build_phase(
        config: &PhaseConfig,
        entity: &str,
        primary: PlanetId,
        planets: &[Planet],
    ) -> Result<Box<dyn Phase>, SimulationError> {
        let non_negative = |value: f64, what: &str| {
            if value >= 0.0 && value.is_finite() {
                Ok(value)
            } else {
                Err(invalid_phase(entity, format!("{what} must be non-negative, got {value}")))
            }
        };
        let finite = |value: f64, what: &str| {
            if value.is_finite() {
                Ok(value)
            } else {
                Err(invalid_phase(entity, format!("{what} must be finite, got {value}")))
            }
        };
        let epsilon = |value: f64| {
            if positive(value) {
                Ok(value)
            } else {
                Err(invalid_phase(entity, format!("epsilon must be positive, got {value}")))
            }
        };

        let phase: Box<dyn Phase> = match config {
            PhaseConfig::Takeoff { height } => Box::new(Takeoff::new(non_negative(*height, "height")?)),
            PhaseConfig::WaitAboveHeight { height } => {
                Box::new(WaitForHeight::above(finite(*height, "height")?))
            }
            PhaseConfig::WaitBelowHeight { height } => {
                Box::new(WaitForHeight::below(finite(*height, "height")?))
            }
            PhaseConfig::WaitPolarAngle { angle, epsilon: eps } => {
                Box::new(WaitPolarAngle::new(*angle, epsilon(*eps)?))
            }
            PhaseConfig::WaitAlignment {
                reference,
                phase_angle,
                epsilon: eps,
                reparent,
            } => {
                let reference = find_planet(planets, reference, entity)?;
                let phase = WaitForAlignment::new(reference, *phase_angle, epsilon(*eps)?);
                if *reparent {
                    Box::new(phase.reparenting())
                } else {
                    Box::new(phase)
                }
            }
            PhaseConfig::Circularize { height } => {
                Box::new(Circularize::new(non_negative(*height, "height")?))
            }
            PhaseConfig::OrbitalTransfer {
                around,
                perigee_height,
                apogee_height,
                argument,
            } => {
                let around = match around {
                    Some(name) => find_planet(planets, name, entity)?,
                    None => primary,
                };
                let target = Orbit::from_heights(
                    &planets[around.0],
                    non_negative(*perigee_height, "perigee height")?,
                    non_negative(*apogee_height, "apogee height")?,
                    *argument,
                );
                Box::new(OrbitalTransfer::new(target))
            }
            PhaseConfig::OrbitalBreak => Box::new(OrbitalBreak),
            PhaseConfig::OrbitCorrection {
                epsilon: eps,
                bidirectional,
            } => {
                let eps = epsilon(*eps)?;
                if *bidirectional {
                    Box::new(OrbitCorrection::bidirectional(eps))
                } else {
                    Box::new(OrbitCorrection::new(eps))
                }
            }
            PhaseConfig::Landing => Box::new(Landing),
            PhaseConfig::SetTimeScale { value } => {
                if !positive(*value) {
                    return Err(invalid_phase(
                        entity,
                        format!("time scale must be positive, got {value}"),
                    ));
                }
                Box::new(SetTimeScale::new(*value))
            }
            PhaseConfig::Log { message } => Box::new(LogMessage::new(message.clone())),
        };
        Ok(phase)
    }

    /// Validates everything and builds the world. No tick runs before this
    /// succeeds.
    pub fn build(&self) -> Result<Scenario, SimulationError> {
        self.validate_settings()?;
        if self.planets.is_empty() {
            return Err(SimulationError::EmptyScenario);
        }

        let mut world = World::new();
        for config in &self.planets {
            world.add_planet(Self::build_planet(config)?);
        }
        for config in &self.rockets {
            let rocket = Self::build_rocket(config, world.planets())?;
            let id = world.add_rocket(rocket);
            debug!(rocket = %id, name = %config.name, phases = config.phases.len(), "rocket ready");
        }

        Ok(Scenario {
            world,
            settings: self.simulation.clone(),
        })
    }
}

// Physical Constants
pub const GRAVITATIONAL_CONSTANT: f64 = 6.67430e-11; // N⋅m²/kg²
pub const STANDARD_GRAVITY: f64 = 9.8; // m/s²

// Solar system bodies
pub const EARTH_MASS: f64 = 5.972e24; // kg
pub const EARTH_RADIUS: f64 = 6_371_000.0; // meters
pub const EARTH_ANGULAR_VELOCITY: f64 = 7.292_115e-5; // rad/s
pub const MOON_MASS: f64 = 7.346e22; // kg
pub const MOON_RADIUS: f64 = 1_737_000.0; // meters
pub const MOON_ORBIT_RADIUS: f64 = 384_400_000.0; // meters
pub const MOON_ORBIT_SPEED: f64 = 1_022.0; // m/s

// Rocket Constants
pub const DEFAULT_FUEL_SPEED: f64 = 3000.0; // m/s, effective exhaust velocity
pub const DEFAULT_TARGET_ACCELERATION: f64 = STANDARD_GRAVITY; // m/s²

// Guidance
pub const CORRECTION_BISECTION_STEPS: usize = 11;
pub const CORRECTION_CONVERGENCE: f64 = 1e-3;

// Simulation Parameters
pub const TIME_STEP: f64 = 1.0; // s
pub const DEFAULT_TIME_SCALE: f64 = 10.0;
pub const DEFAULT_TICKS_PER_FRAME: usize = 1;
pub const MAX_TICKS_PER_FRAME: usize = 2048;
pub const MAX_SIMULATION_TIME: f64 = 86400.0; // s

//! Δv-budgeted burns. Each tick delivers at most `target_acceleration·Δt` of
//! the remaining Δv; the phase ends on the tick the remainder fits the cap.

use std::f64::consts::FRAC_PI_2;

use crate::control::{
    guidance::{Phase, PhaseContext, PhaseTransition},
    rocket::Rocket,
};
use crate::telemetry_system::events::SimEvent;
use crate::trajectory_system::orbit::{Orbit, OrbitSolution};

use super::primary_of;

fn delta_v_cap(rocket: &Rocket, delta_time: f64) -> f64 {
    rocket.target_acceleration * delta_time
}

/// Δv actually delivered this tick for a signed remaining `required`. The
/// magnitude is capped in both directions.
fn capped_delta_v(rocket: &Rocket, required: f64, delta_time: f64) -> f64 {
    required.signum() * required.abs().min(delta_v_cap(rocket, delta_time))
}

/// True once the remainder fits in a single tick.
fn fits_in_tick(rocket: &Rocket, required: f64, delta_time: f64) -> bool {
    required.abs() <= delta_v_cap(rocket, delta_time)
}

/// Tangential burn to circular speed at `target_height`.
#[derive(Debug, Clone, PartialEq)]
pub struct Circularize {
    pub target_height: f64,
}

impl Circularize {
    pub fn new(target_height: f64) -> Self {
        Circularize { target_height }
    }
}

impl Phase for Circularize {
    fn name(&self) -> &'static str {
        "circularize"
    }

    fn decide(
        &self,
        rocket: &mut Rocket,
        ctx: &mut PhaseContext<'_>,
        delta_time: f64,
    ) -> PhaseTransition {
        let Some(planet) = primary_of(rocket, ctx) else {
            return PhaseTransition::Continue;
        };
        let Some(prograde) = rocket
            .position_vector(planet)
            .rotate(FRAC_PI_2)
            .try_normalize()
        else {
            return PhaseTransition::Continue;
        };

        let target_speed = planet.circular_velocity(self.target_height);
        let required = target_speed - rocket.relative_velocity(planet).magnitude();
        let delivered = capped_delta_v(rocket, required, delta_time);
        let mass = rocket.mass();
        let mut thrust = prograde * (mass * delivered / delta_time);

        if rocket.height(planet) < self.target_height {
            // hold altitude, scaled down by the mass this tick's burn will use
            let lift = -rocket.gravity_to(planet);
            let burnt = rocket
                .propulsion
                .calculate_fuel_consumption((thrust + lift).magnitude(), delta_time);
            thrust += lift * ((mass - burnt) / mass);
        }

        rocket.fire_engine(thrust, delta_time);
        if fits_in_tick(rocket, required, delta_time) {
            PhaseTransition::Complete
        } else {
            PhaseTransition::Continue
        }
    }
}

/// Burn along the relative velocity until the speed matches the perigee
/// speed of `target` (prograde to raise, retrograde to lower).
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitalTransfer {
    pub target: Orbit,
}

impl OrbitalTransfer {
    pub fn new(target: Orbit) -> Self {
        OrbitalTransfer { target }
    }

    /// Speed at the target's perigee around a primary with parameter `mu`.
    pub fn target_speed(&self, mu: f64) -> f64 {
        let perigee = self.target.perigee_distance;
        let apogee = 2.0 * self.target.semi_major_axis - perigee;
        (2.0 * mu * apogee / (perigee * (perigee + apogee))).sqrt()
    }
}

impl Phase for OrbitalTransfer {
    fn name(&self) -> &'static str {
        "orbital_transfer"
    }

    fn decide(
        &self,
        rocket: &mut Rocket,
        ctx: &mut PhaseContext<'_>,
        delta_time: f64,
    ) -> PhaseTransition {
        let Some(planet) = primary_of(rocket, ctx) else {
            return PhaseTransition::Continue;
        };
        let velocity = rocket.relative_velocity(planet);
        let Some(heading) = velocity.try_normalize() else {
            return PhaseTransition::Continue;
        };

        let required = self.target_speed(planet.gravitational_parameter()) - velocity.magnitude();
        let delivered = capped_delta_v(rocket, required, delta_time);
        let thrust = heading * (rocket.mass() * delivered / delta_time);

        rocket.fire_engine(thrust, delta_time);
        if fits_in_tick(rocket, required, delta_time) {
            PhaseTransition::Complete
        } else {
            PhaseTransition::Continue
        }
    }
}

/// Retrograde braking while the trajectory around the primary is open.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OrbitalBreak;

impl Phase for OrbitalBreak {
    fn name(&self) -> &'static str {
        "orbital_break"
    }

    fn decide(
        &self,
        rocket: &mut Rocket,
        ctx: &mut PhaseContext<'_>,
        delta_time: f64,
    ) -> PhaseTransition {
        let Some(planet) = primary_of(rocket, ctx) else {
            return PhaseTransition::Continue;
        };
        match rocket.orbit(planet) {
            OrbitSolution::Closed(orbit) => {
                ctx.emit(SimEvent::RequestLog {
                    message: format!(
                        "{} captured by {} with eccentricity {:.4}",
                        rocket.name, planet.name, orbit.eccentricity
                    ),
                });
                PhaseTransition::Complete
            }
            OrbitSolution::Open { .. } => {
                if let Some(heading) = rocket.relative_velocity(planet).try_normalize() {
                    let thrust = -heading * (rocket.mass() * rocket.target_acceleration);
                    rocket.fire_engine(thrust, delta_time);
                }
                PhaseTransition::Continue
            }
            OrbitSolution::Degenerate => PhaseTransition::Continue,
        }
    }
}

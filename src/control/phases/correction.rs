use crate::constants::CORRECTION_BISECTION_STEPS;
use crate::control::{
    guidance::{Phase, PhaseContext, PhaseTransition},
    planet::Planet,
    rocket::Rocket,
};
use crate::telemetry_system::events::SimEvent;
use crate::trajectory_system::orbit::{compute_orbit_from_state, Orbit, OrbitSolution};
use crate::utils::vector2d::Vector2D;

use super::primary_of;

/// Radial trim burn that shrinks the apogee/perigee spread.
///
/// Each tick a full-strength inward burn is scaled by a coefficient found by
/// bisection: a trial coefficient is kept as the new lower bound when a
/// one-tick lookahead shows the spread does not grow, otherwise it becomes the
/// upper bound. The phase ends once the coefficient falls below `epsilon`,
/// i.e. no burn helps any more.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitCorrection {
    pub epsilon: f64,
    lower_bound: f64,
}

impl OrbitCorrection {
    /// Searches coefficients in [0, 1] (inward burns only).
    pub fn new(epsilon: f64) -> Self {
        OrbitCorrection {
            epsilon,
            lower_bound: 0.0,
        }
    }

    /// Searches coefficients in [−1, 1] so outward burns are possible too.
    pub fn bidirectional(epsilon: f64) -> Self {
        OrbitCorrection {
            epsilon,
            lower_bound: -1.0,
        }
    }

    pub fn lower_bound(&self) -> f64 {
        self.lower_bound
    }

    /// Full-strength correction: inward, at the rocket's target acceleration.
    /// `None` when the rocket sits on the primary's center.
    pub fn correction_thrust(rocket: &Rocket, planet: &Planet) -> Option<Vector2D> {
        let radial = rocket.position_vector(planet).try_normalize()?;
        Some(-radial * (rocket.mass() * rocket.target_acceleration))
    }

    /// Apogee-minus-perigee distance after one tick with `thrust` applied, or
    /// `None` if the predicted trajectory is not closed.
    fn predicted_spread(
        rocket: &Rocket,
        planet: &Planet,
        thrust: Vector2D,
        delta_time: f64,
    ) -> Option<f64> {
        let burnt = rocket
            .propulsion
            .calculate_fuel_consumption(thrust.magnitude(), delta_time);
        let mass = rocket.mass() - burnt;
        let acceleration = (rocket.gravity_to(planet) + thrust) / mass;
        let (position, velocity) = rocket.body.predict(acceleration, delta_time);
        compute_orbit_from_state(planet, position, velocity)
            .closed()
            .map(|orbit| orbit.apogee_distance - orbit.perigee_distance)
    }

    /// Bisection over the correction coefficient. Always returns a value in
    /// `[lower_bound, 1]`.
    pub fn search_coefficient(
        &self,
        rocket: &Rocket,
        planet: &Planet,
        current: &Orbit,
        correction: Vector2D,
        delta_time: f64,
    ) -> f64 {
        let spread = current.apogee_distance - current.perigee_distance;
        let (mut low, mut high) = (self.lower_bound, 1.0);
        let mut coefficient = 0.5;

        for _ in 0..CORRECTION_BISECTION_STEPS {
            let improves = Self::predicted_spread(rocket, planet, correction * coefficient, delta_time)
                .is_some_and(|next| next <= spread);
            if improves {
                low = coefficient;
            } else {
                high = coefficient;
            }
            coefficient = (low + high) / 2.0;
        }
        coefficient
    }
}

impl Phase for OrbitCorrection {
    fn name(&self) -> &'static str {
        "orbit_correction"
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
        let current = match rocket.orbit(planet) {
            OrbitSolution::Closed(orbit) => orbit,
            OrbitSolution::Open { .. } => {
                ctx.emit(SimEvent::RequestLog {
                    message: format!("{} is not in a closed orbit, correction skipped", rocket.name),
                });
                return PhaseTransition::Complete;
            }
            OrbitSolution::Degenerate => return PhaseTransition::Continue,
        };
        let Some(correction) = Self::correction_thrust(rocket, planet) else {
            return PhaseTransition::Continue;
        };

        let coefficient = self.search_coefficient(rocket, planet, &current, correction, delta_time);
        tracing::trace!(rocket = %rocket.id, coefficient, "orbit correction");
        rocket.fire_engine(correction * coefficient, delta_time);

        if coefficient.abs() < self.epsilon {
            PhaseTransition::Complete
        } else {
            PhaseTransition::Continue
        }
    }
}

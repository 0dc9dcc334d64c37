use crate::control::{
    guidance::{Phase, PhaseContext, PhaseTransition},
    rocket::Rocket,
};

use super::primary_of;

/// Suicide-burn descent: every tick, thrust along the radial axis hard enough
/// to null the takeoff-axis velocity exactly at zero height.
///
/// The phase ends (and the rocket free-falls the last stretch) on the first
/// tick whose one-step lookahead climbs instead of descending. That flare
/// check runs every tick, not only on entry.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Landing;

impl Phase for Landing {
    fn name(&self) -> &'static str {
        "landing"
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
        let height = rocket.height(planet);
        if height <= 0.0 {
            return PhaseTransition::Complete;
        }
        let Some(radial) = rocket.position_vector(planet).try_normalize() else {
            return PhaseTransition::Continue;
        };

        let takeoff_velocity = rocket.takeoff_velocity(planet);
        let deceleration = takeoff_velocity.magnitude_squared() / (2.0 * height);
        let gravity = rocket.gravity_to(planet);
        let thrust = radial * (rocket.mass() * deceleration + gravity.magnitude());

        let acceleration = (gravity + thrust) / rocket.mass();
        let lookahead = rocket.body.position
            + takeoff_velocity * delta_time
            + acceleration * (delta_time.powi(2) / 2.0);
        let climbing = planet.position().distance_to(&lookahead) > rocket.absolute_height(planet);

        rocket.fire_engine(thrust, delta_time);
        if climbing {
            PhaseTransition::Complete
        } else {
            PhaseTransition::Continue
        }
    }
}

//! Guidance phase strategies. Each phase owns its completion predicate; the
//! stack in [`super::guidance`] only applies the transitions they return.

pub mod ascent;
pub mod commands;
pub mod correction;
pub mod landing;
pub mod maneuver;
pub mod waiting;

pub use ascent::Takeoff;
pub use commands::{LogMessage, SetTimeScale};
pub use correction::OrbitCorrection;
pub use landing::Landing;
pub use maneuver::{Circularize, OrbitalBreak, OrbitalTransfer};
pub use waiting::{HeightCondition, WaitForAlignment, WaitForHeight, WaitPolarAngle};

use super::{guidance::PhaseContext, planet::Planet, rocket::Rocket};

/// The rocket's current primary. Scenario validation guarantees it exists;
/// a missing one makes the phase sit the tick out.
pub(crate) fn primary_of<'a>(rocket: &Rocket, ctx: &PhaseContext<'a>) -> Option<&'a Planet> {
    let planet = ctx.planet(rocket.primary());
    if planet.is_none() {
        tracing::warn!(rocket = %rocket.id, primary = %rocket.primary(), "primary planet missing");
    }
    planet
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::constants::{EARTH_MASS, EARTH_RADIUS};
    use crate::control::guidance::{Phase, PhaseContext, PhaseTransition};
    use crate::control::planet::{Planet, PlanetId};
    use crate::control::rocket::{Rocket, RocketId};
    use crate::telemetry_system::events::EventLog;
    use crate::utils::{point2d::Point2D, vector2d::Vector2D};

    pub fn earth() -> Planet {
        Planet::new(
            PlanetId(0),
            "Earth",
            EARTH_MASS,
            EARTH_RADIUS,
            Point2D::ORIGIN,
            Vector2D::ZERO,
        )
    }

    pub fn rocket_at(planet: &Planet, position: Point2D, velocity: Vector2D) -> Rocket {
        Rocket::new(RocketId(0), "test", 10_000.0, 1_000.0, 3000.0, planet, position, velocity)
    }

    /// Runs one decision of `phase` with the rocket's forces reset first.
    pub fn decide_once(
        phase: &dyn Phase,
        rocket: &mut Rocket,
        planets: &[Planet],
        log: &mut EventLog,
        delta_time: f64,
    ) -> PhaseTransition {
        rocket.body.reset_force();
        rocket.propulsion.reset();
        let mut ctx = PhaseContext::new(planets, 0.0, log);
        phase.decide(rocket, &mut ctx, delta_time)
    }
}

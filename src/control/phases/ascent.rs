use crate::control::{
    guidance::{Phase, PhaseContext, PhaseTransition},
    rocket::Rocket,
};
use crate::trajectory_system::orbit::OrbitSolution;

use super::primary_of;

/// Vertical ascent at the rocket's target acceleration (on top of cancelling
/// gravity) until the projected apogee reaches `target_height`.
#[derive(Debug, Clone, PartialEq)]
pub struct Takeoff {
    pub target_height: f64,
}

impl Takeoff {
    pub fn new(target_height: f64) -> Self {
        Takeoff { target_height }
    }
}

impl Phase for Takeoff {
    fn name(&self) -> &'static str {
        "takeoff"
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

        let reached = match rocket.orbit(planet) {
            OrbitSolution::Closed(orbit) => orbit.apogee_height >= self.target_height,
            // already on an escape trajectory: every height is reachable
            OrbitSolution::Open { .. } => true,
            OrbitSolution::Degenerate => false,
        };
        if reached {
            return PhaseTransition::Complete;
        }

        let Some(radial) = rocket.position_vector(planet).try_normalize() else {
            return PhaseTransition::Continue;
        };
        let thrust = radial * (rocket.mass() * rocket.target_acceleration) - rocket.gravity_to(planet);
        rocket.fire_engine(thrust, delta_time);
        PhaseTransition::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::phases::test_support::{decide_once, earth};
    use crate::control::rocket::RocketId;
    use crate::telemetry_system::events::EventLog;
    use approx::assert_relative_eq;

    #[test]
    fn test_zero_target_completes_on_the_pad() {
        let planets = vec![earth()];
        let mut rocket =
            Rocket::on_surface(RocketId(0), "r", 10_000.0, 1_000.0, 3000.0, &planets[0], 0.0);
        let mut log = EventLog::new();

        let transition = decide_once(&Takeoff::new(0.0), &mut rocket, &planets, &mut log, 1.0);
        assert!(matches!(transition, PhaseTransition::Complete));
        assert_eq!(rocket.propulsion.get_thrust(), 0.0);
    }

    #[test]
    fn test_thrust_cancels_gravity_and_adds_target_acceleration() {
        let planets = vec![earth()];
        let mut rocket =
            Rocket::on_surface(RocketId(0), "r", 10_000.0, 1_000.0, 3000.0, &planets[0], 0.0);
        let mut log = EventLog::new();
        let gravity = rocket.gravity_to(&planets[0]);

        let transition =
            decide_once(&Takeoff::new(200_000.0), &mut rocket, &planets, &mut log, 1.0);
        assert!(matches!(transition, PhaseTransition::Continue));

        // engine force plus the gravity the world will add
        let net = rocket.body.force + gravity;
        let mass_before = 10_000.0;
        assert_relative_eq!(net.x, mass_before * 9.8, max_relative = 1e-9);
        assert_relative_eq!(net.y, 0.0, epsilon = 1e-6);
        assert!(rocket.mass() < mass_before);
    }

    #[test]
    fn test_without_fuel_the_phase_keeps_waiting() {
        let planets = vec![earth()];
        let mut rocket =
            Rocket::on_surface(RocketId(0), "r", 1_000.0, 1_000.0, 3000.0, &planets[0], 0.0);
        let mut log = EventLog::new();

        let transition =
            decide_once(&Takeoff::new(200_000.0), &mut rocket, &planets, &mut log, 1.0);
        assert!(matches!(transition, PhaseTransition::Continue));
        assert!(rocket.propulsion.is_out_of_fuel());
        assert_eq!(rocket.mass(), 1_000.0);
    }
}

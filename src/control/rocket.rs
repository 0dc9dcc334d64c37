use std::fmt;

use crate::{
    constants::DEFAULT_TARGET_ACCELERATION,
    trajectory_system::{
        gravity::gravity_force,
        kinematics::Body,
        orbit::{compute_orbit, OrbitSolution},
    },
    utils::{point2d::Point2D, vector2d::Vector2D},
};

use super::{
    guidance::{GuidanceSystem, Phase},
    planet::{Planet, PlanetId},
    propulsion::{FireOutcome, PropulsionSystem},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RocketId(pub usize);

impl fmt::Display for RocketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rocket#{}", self.0)
    }
}

#[derive(PartialEq, Debug, Clone, Copy)]
pub enum RocketState {
    /// At least one guidance phase is pending.
    Guided,
    /// Guidance stack is empty; gravity only.
    Coasting,
    /// Hit a planet and was taken out of the world.
    Crashed,
}

/// A body with an engine, a payload floor and a guidance stack.
///
/// A rocket always has exactly one primary planet. Only phases built for it
/// (alignment waits) change the primary, through [`Rocket::reparent`].
#[derive(Debug)]
pub struct Rocket {
    pub id: RocketId,
    pub name: String,
    pub body: Body,
    /// Mass that can never be burnt.
    pub payload_mass: f64,
    /// Acceleration that thrusting phases aim for, and cap each tick at.
    pub target_acceleration: f64,
    pub propulsion: PropulsionSystem,
    pub guidance: GuidanceSystem,
    pub state: RocketState,
    primary: PlanetId,
    exhaustion_reported: bool,
}

impl Rocket {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: RocketId,
        name: &str,
        mass: f64,
        payload_mass: f64,
        fuel_speed: f64,
        primary: &Planet,
        position: Point2D,
        velocity: Vector2D,
    ) -> Self {
        Rocket {
            id,
            name: name.to_string(),
            body: Body::new(mass, position, velocity),
            payload_mass,
            target_acceleration: DEFAULT_TARGET_ACCELERATION,
            propulsion: PropulsionSystem::new(fuel_speed),
            guidance: GuidanceSystem::default(),
            state: RocketState::Coasting,
            primary: primary.id,
            exhaustion_reported: false,
        }
    }

    /// Rocket standing on `primary`'s surface at absolute polar angle
    /// `polar_angle`, moving with the rotating surface.
    pub fn on_surface(
        id: RocketId,
        name: &str,
        mass: f64,
        payload_mass: f64,
        fuel_speed: f64,
        primary: &Planet,
        polar_angle: f64,
    ) -> Self {
        // keep the pad clear of rounding so it does not register as an impact
        let distance = primary.radius * (1.0 + 1e-12);
        let position = primary.position() + Vector2D::from_polar(polar_angle, distance);
        let velocity = primary.velocity() + primary.surface_velocity_at(polar_angle);
        Rocket::new(
            id,
            name,
            mass,
            payload_mass,
            fuel_speed,
            primary,
            position,
            velocity,
        )
    }

    pub fn with_target_acceleration(mut self, target_acceleration: f64) -> Self {
        self.target_acceleration = target_acceleration;
        self
    }

    pub fn with_phases(mut self, phases: Vec<Box<dyn Phase>>) -> Self {
        self.guidance = GuidanceSystem::new(phases);
        self.refresh_state();
        self
    }

    pub fn primary(&self) -> PlanetId {
        self.primary
    }

    /// Switches the reference planet. Returns the previous primary.
    pub(crate) fn reparent(&mut self, primary: PlanetId) -> PlanetId {
        std::mem::replace(&mut self.primary, primary)
    }

    pub fn mass(&self) -> f64 {
        self.body.mass
    }

    /// Requests `thrust` newtons for this tick. The force is added only if the
    /// burn leaves at least the payload mass; otherwise nothing changes.
    pub fn fire_engine(&mut self, thrust: Vector2D, delta_time: f64) -> FireOutcome {
        let outcome =
            self.propulsion
                .fire(&mut self.body.mass, self.payload_mass, thrust, delta_time);
        if outcome.is_fired() {
            self.body.apply_force(thrust);
        }
        outcome
    }

    /// True exactly once: the first time a burn was refused.
    pub(crate) fn take_exhaustion_notice(&mut self) -> bool {
        if self.propulsion.is_out_of_fuel() && !self.exhaustion_reported {
            self.exhaustion_reported = true;
            true
        } else {
            false
        }
    }

    pub(crate) fn refresh_state(&mut self) {
        if self.state != RocketState::Crashed {
            self.state = if self.guidance.is_idle() {
                RocketState::Coasting
            } else {
                RocketState::Guided
            };
        }
    }

    /// Vector from the planet's center to the rocket.
    pub fn position_vector(&self, planet: &Planet) -> Vector2D {
        planet.position().vector_to(&self.body.position)
    }

    pub fn relative_velocity(&self, planet: &Planet) -> Vector2D {
        self.body.velocity - planet.velocity()
    }

    /// Radial component of the velocity relative to `planet`.
    pub fn takeoff_velocity(&self, planet: &Planet) -> Vector2D {
        match self.position_vector(planet).try_normalize() {
            Some(radial) => radial * radial.dot(&self.relative_velocity(planet)),
            None => Vector2D::ZERO,
        }
    }

    /// Distance from the planet's center.
    pub fn absolute_height(&self, planet: &Planet) -> f64 {
        planet.position().distance_to(&self.body.position)
    }

    pub fn height(&self, planet: &Planet) -> f64 {
        planet.altitude_of(&self.body.position)
    }

    pub fn polar_angle(&self, planet: &Planet) -> f64 {
        planet.polar_angle_of(&self.body.position)
    }

    /// Gravity pull of `planet` on this rocket.
    pub fn gravity_to(&self, planet: &Planet) -> Vector2D {
        gravity_force(&self.body, &planet.body)
    }

    pub fn orbit(&self, planet: &Planet) -> OrbitSolution {
        compute_orbit(planet, &self.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{EARTH_MASS, EARTH_RADIUS};
    use approx::assert_relative_eq;
    use rand::{rngs::StdRng, Rng, SeedableRng};
    use std::f64::consts::FRAC_PI_2;

    fn earth() -> Planet {
        Planet::new(
            PlanetId(0),
            "Earth",
            EARTH_MASS,
            EARTH_RADIUS,
            Point2D::ORIGIN,
            Vector2D::ZERO,
        )
    }

    #[test]
    fn test_on_surface_moves_with_rotation() {
        let earth = earth().with_rotation(0.0, 1.0e-4);
        let rocket = Rocket::on_surface(RocketId(0), "r", 1000.0, 100.0, 3000.0, &earth, FRAC_PI_2);

        assert_relative_eq!(rocket.height(&earth), 0.0, epsilon = 1e-3);
        assert!(rocket.height(&earth) >= 0.0);
        assert_relative_eq!(rocket.body.velocity.x, -EARTH_RADIUS * 1.0e-4, max_relative = 1e-9);
        assert_relative_eq!(rocket.polar_angle(&earth), FRAC_PI_2, epsilon = 1e-12);
    }

    #[test]
    fn test_fire_engine_adds_force_and_burns_fuel() {
        let earth = earth();
        let mut rocket = Rocket::on_surface(RocketId(0), "r", 1000.0, 100.0, 1000.0, &earth, 0.0);

        let outcome = rocket.fire_engine(Vector2D::new(2000.0, 0.0), 0.5);
        assert_eq!(outcome, FireOutcome::Fired { fuel_consumed: 1.0 });
        assert_relative_eq!(rocket.mass(), 999.0);
        assert_eq!(rocket.body.force, Vector2D::new(2000.0, 0.0));
    }

    #[test]
    fn test_exhaustion_leaves_force_untouched_and_is_reported_once() {
        let earth = earth();
        let mut rocket = Rocket::on_surface(RocketId(0), "r", 100.5, 100.0, 1000.0, &earth, 0.0);

        assert_eq!(
            rocket.fire_engine(Vector2D::new(0.0, 1000.0), 1.0),
            FireOutcome::Exhausted
        );
        assert_eq!(rocket.body.force, Vector2D::ZERO);
        assert!(rocket.take_exhaustion_notice());
        assert!(!rocket.take_exhaustion_notice());
    }

    #[test]
    fn test_mass_never_drops_below_payload() {
        let earth = earth();
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..50 {
            let payload = rng.gen_range(0.0..500.0);
            let mass = payload + rng.gen_range(0.0..500.0);
            let mut rocket =
                Rocket::on_surface(RocketId(0), "r", mass, payload, rng.gen_range(100.0..5000.0), &earth, 0.0);

            for _ in 0..200 {
                let thrust = Vector2D::from_polar(
                    rng.gen_range(0.0..std::f64::consts::TAU),
                    rng.gen_range(0.0..50_000.0),
                );
                let delta_time = rng.gen_range(0.0..5.0);
                rocket.fire_engine(thrust, delta_time);
                assert!(
                    rocket.mass() >= payload,
                    "mass {} fell below payload {}",
                    rocket.mass(),
                    payload
                );
            }
        }
    }

    #[test]
    fn test_takeoff_velocity_is_radial_component() {
        let earth = earth();
        let mut rocket = Rocket::on_surface(RocketId(0), "r", 1000.0, 100.0, 3000.0, &earth, 0.0);
        rocket.body.velocity = Vector2D::new(30.0, 400.0);

        let radial = rocket.takeoff_velocity(&earth);
        assert_relative_eq!(radial.x, 30.0, epsilon = 1e-9);
        assert_relative_eq!(radial.y, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_reparent_returns_previous_primary() {
        let earth = earth();
        let mut rocket = Rocket::on_surface(RocketId(0), "r", 1000.0, 100.0, 3000.0, &earth, 0.0);
        assert_eq!(rocket.reparent(PlanetId(3)), PlanetId(0));
        assert_eq!(rocket.primary(), PlanetId(3));
    }
}

//! The body roster and the per-tick pipeline.
//!
//! A tick always runs: reset forces, accumulate gravity over every pair,
//! guidance decisions, collision check, integrate. Gravity reads one consistent
//! snapshot of positions because nothing moves until the final stage.

use tracing::{debug, info};

use crate::control::{
    guidance::PhaseContext,
    planet::{Planet, PlanetId},
    rocket::{Rocket, RocketId, RocketState},
};
use crate::telemetry_system::events::{EventSink, SimEvent};
use crate::trajectory_system::{
    collision::check_impact,
    gravity::accumulate_gravity,
    kinematics::Body,
    orbit::OrbitSolution,
};

#[derive(Debug, Default)]
pub struct World {
    planets: Vec<Planet>,
    rockets: Vec<Rocket>,
    crashed: Vec<Rocket>,
    next_rocket: usize,
    time: f64,
}

impl World {
    pub fn new() -> Self {
        World::default()
    }

    /// Adds a planet and returns its id. The planet's own id is overwritten.
    pub fn add_planet(&mut self, mut planet: Planet) -> PlanetId {
        let id = PlanetId(self.planets.len());
        planet.id = id;
        self.planets.push(planet);
        id
    }

    /// Adds a rocket and returns its id. The rocket's own id is overwritten.
    pub fn add_rocket(&mut self, mut rocket: Rocket) -> RocketId {
        let id = RocketId(self.next_rocket);
        self.next_rocket += 1;
        rocket.id = id;
        self.rockets.push(rocket);
        id
    }

    pub fn planets(&self) -> &[Planet] {
        &self.planets
    }

    pub fn planet(&self, id: PlanetId) -> Option<&Planet> {
        self.planets.get(id.0)
    }

    /// Rockets still flying.
    pub fn rockets(&self) -> &[Rocket] {
        &self.rockets
    }

    pub fn rocket(&self, id: RocketId) -> Option<&Rocket> {
        self.rockets.iter().find(|rocket| rocket.id == id)
    }

    pub fn rocket_mut(&mut self, id: RocketId) -> Option<&mut Rocket> {
        self.rockets.iter_mut().find(|rocket| rocket.id == id)
    }

    /// Rockets removed by an impact, in the order they crashed.
    pub fn crashed(&self) -> &[Rocket] {
        &self.crashed
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    /// Orbit of a flying rocket around its current primary.
    pub fn orbit_of(&self, id: RocketId) -> Option<OrbitSolution> {
        let rocket = self.rocket(id)?;
        let primary = self.planet(rocket.primary())?;
        Some(rocket.orbit(primary))
    }

    /// Advances the world by one tick of `delta_time` seconds.
    pub fn step(&mut self, delta_time: f64, events: &mut dyn EventSink) {
        for rocket in &mut self.rockets {
            rocket.body.reset_force();
            rocket.propulsion.reset();
        }
        for planet in &mut self.planets {
            planet.body.reset_force();
        }

        {
            let mut bodies = self.bodies_mut();
            accumulate_gravity(&mut bodies);
        }

        self.run_guidance(delta_time, events);
        self.resolve_impacts(events);

        for body in self.bodies_mut() {
            body.integrate(delta_time);
        }
        for planet in &mut self.planets {
            planet.rotate(delta_time);
        }
        self.time += delta_time;
    }

    fn bodies_mut(&mut self) -> Vec<&mut Body> {
        self.planets
            .iter_mut()
            .map(|planet| &mut planet.body)
            .chain(self.rockets.iter_mut().map(|rocket| &mut rocket.body))
            .collect()
    }

    fn run_guidance(&mut self, delta_time: f64, events: &mut dyn EventSink) {
        for rocket in &mut self.rockets {
            let mut ctx = PhaseContext::new(&self.planets, self.time, &mut *events);
            rocket.make_decision(&mut ctx, delta_time);

            if rocket.take_exhaustion_notice() {
                ctx.emit(SimEvent::FuelExhausted { rocket: rocket.id });
            }
            let previous = rocket.state;
            rocket.refresh_state();
            if rocket.state != previous {
                debug!(rocket = %rocket.id, from = ?previous, to = ?rocket.state, "rocket state changed");
            }
        }
    }

    fn resolve_impacts(&mut self, events: &mut dyn EventSink) {
        let mut index = 0;
        while index < self.rockets.len() {
            let impact = self
                .planets
                .iter()
                .find_map(|planet| check_impact(planet, &self.rockets[index]));
            match impact {
                Some(event) => {
                    let mut rocket = self.rockets.remove(index);
                    rocket.state = RocketState::Crashed;
                    info!(rocket = %rocket.id, name = %rocket.name, "rocket removed after impact");
                    events.emit(self.time, event);
                    self.crashed.push(rocket);
                }
                None => index += 1,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{EARTH_MASS, EARTH_RADIUS, MOON_MASS, MOON_ORBIT_RADIUS, MOON_RADIUS};
    use crate::control::phases::{Takeoff, WaitForHeight};
    use crate::telemetry_system::events::EventLog;
    use crate::utils::{point2d::Point2D, vector2d::Vector2D};
    use approx::{assert_abs_diff_eq, assert_relative_eq};

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

    fn momentum(world: &World) -> Vector2D {
        world
            .planets()
            .iter()
            .map(|p| p.velocity() * p.mass())
            .chain(world.rockets().iter().map(|r| r.body.velocity * r.mass()))
            .sum()
    }

    #[test]
    fn test_free_bodies_conserve_momentum() {
        let mut world = World::new();
        world.add_planet(earth());
        world.add_planet(Planet::new(
            PlanetId(0),
            "Moon",
            MOON_MASS,
            MOON_RADIUS,
            Point2D::new(MOON_ORBIT_RADIUS, 0.0),
            Vector2D::new(0.0, 1022.0),
        ));
        let before = momentum(&world);

        let mut log = EventLog::new();
        for _ in 0..100 {
            world.step(10.0, &mut log);
        }

        let after = momentum(&world);
        let scale = MOON_MASS * 1022.0;
        assert_abs_diff_eq!(after.x, before.x, epsilon = scale * 1e-9);
        assert_abs_diff_eq!(after.y, before.y, epsilon = scale * 1e-9);
        assert_relative_eq!(world.time(), 1000.0);
        assert!(log.is_empty());
    }

    #[test]
    fn test_add_assigns_ids_in_order() {
        let mut world = World::new();
        let earth_id = world.add_planet(earth());
        let rocket = Rocket::on_surface(RocketId(9), "a", 10.0, 1.0, 3000.0, &world.planets()[0], 0.0);
        let first = world.add_rocket(rocket);
        let rocket = Rocket::on_surface(RocketId(9), "b", 10.0, 1.0, 3000.0, &world.planets()[0], 1.0);
        let second = world.add_rocket(rocket);

        assert_eq!(earth_id, PlanetId(0));
        assert_eq!((first, second), (RocketId(0), RocketId(1)));
        assert_eq!(world.rocket(second).map(|r| r.name.as_str()), Some("b"));
        assert!(world.orbit_of(first).is_some());
    }

    #[test]
    fn test_falling_rocket_is_removed_with_one_impact() {
        let mut world = World::new();
        world.add_planet(earth());
        let rocket = Rocket::new(
            RocketId(0),
            "faller",
            10.0,
            1.0,
            3000.0,
            &world.planets()[0],
            Point2D::new(EARTH_RADIUS + 50.0, 0.0),
            Vector2D::new(-100.0, 0.0),
        );
        let id = world.add_rocket(rocket);

        let mut log = EventLog::new();
        for _ in 0..5 {
            world.step(1.0, &mut log);
        }

        assert!(world.rocket(id).is_none());
        assert_eq!(world.crashed().len(), 1);
        assert_eq!(world.crashed()[0].state, RocketState::Crashed);
        assert_eq!(log.impacts().count(), 1);
    }

    #[test]
    fn test_guided_rocket_becomes_coasting() {
        let mut world = World::new();
        world.add_planet(earth());
        let distance = EARTH_RADIUS + 400_000.0;
        let speed = world.planets()[0].circular_velocity(400_000.0);
        let rocket = Rocket::new(
            RocketId(0),
            "r",
            10_000.0,
            1_000.0,
            3000.0,
            &world.planets()[0],
            Point2D::new(distance, 0.0),
            Vector2D::new(0.0, speed),
        )
        .with_phases(vec![Box::new(Takeoff::new(0.0)), Box::new(WaitForHeight::below(1e9))]);
        let id = world.add_rocket(rocket);
        assert_eq!(world.rocket(id).map(|r| r.state), Some(RocketState::Guided));

        let mut log = EventLog::new();
        world.step(1.0, &mut log);
        world.step(1.0, &mut log);

        assert_eq!(world.rocket(id).map(|r| r.state), Some(RocketState::Coasting));
        assert_eq!(log.completed_phases(id), vec!["takeoff", "wait_below_height"]);
    }

    #[test]
    fn test_exhaustion_is_reported_once() {
        let mut world = World::new();
        world.add_planet(earth());
        // no propellant at all
        let rocket = Rocket::on_surface(RocketId(0), "dry", 1_000.0, 1_000.0, 3000.0, &world.planets()[0], 0.0)
            .with_phases(vec![Box::new(Takeoff::new(1e5))]);
        world.add_rocket(rocket);

        let mut log = EventLog::new();
        for _ in 0..3 {
            world.step(1.0, &mut log);
        }

        let exhausted = log
            .events()
            .iter()
            .filter(|e| matches!(e.event, SimEvent::FuelExhausted { .. }))
            .count();
        assert_eq!(exhausted, 1);
    }
}

use crate::control::{planet::Planet, rocket::Rocket};
use crate::telemetry_system::events::SimEvent;
use crate::utils::vector2d::normalize_angle;

/// Impact of `rocket` on `planet`, if the rocket is strictly inside it.
///
/// The reported angle is measured in the planet's rotating frame and the
/// speed is relative to the moving surface at the impact point.
pub fn check_impact(planet: &Planet, rocket: &Rocket) -> Option<SimEvent> {
    if rocket.absolute_height(planet) >= planet.radius {
        return None;
    }

    let polar_angle = rocket.polar_angle(planet);
    let surface_velocity = planet.surface_velocity_at(polar_angle);
    let impact_speed = (rocket.relative_velocity(planet) - surface_velocity).magnitude();

    Some(SimEvent::Impact {
        planet: planet.id,
        rocket: rocket.id,
        impact_angle: normalize_angle(polar_angle - planet.rotation_angle),
        impact_speed,
    })
}

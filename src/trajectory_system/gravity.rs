use crate::constants::GRAVITATIONAL_CONSTANT;
use crate::utils::vector2d::Vector2D;

use super::kinematics::Body;

/// Newtonian pull exerted on `body` by `attractor`, pointing from `body`
/// towards `attractor`. Coincident bodies exert no force on each other.
pub fn gravity_force(body: &Body, attractor: &Body) -> Vector2D {
    let displacement = body.position.vector_to(&attractor.position);
    let distance_squared = displacement.magnitude_squared();
    match displacement.try_normalize() {
        Some(direction) => {
            direction * (GRAVITATIONAL_CONSTANT * body.mass * attractor.mass / distance_squared)
        }
        None => Vector2D::ZERO,
    }
}

/// Gravitational acceleration `attractor` imparts on any mass at `body`'s
/// position.
pub fn gravity_acceleration(body: &Body, attractor: &Body) -> Vector2D {
    gravity_force(body, attractor) / body.mass
}

/// Adds the mutual gravity of every unordered pair to the bodies' accumulated
/// forces. Forces must already be reset for the tick, and no body may be
/// integrated before this returns.
pub fn accumulate_gravity(bodies: &mut [&mut Body]) {
    for i in 0..bodies.len() {
        let (head, tail) = bodies.split_at_mut(i + 1);
        let body = &mut head[i];
        for other in tail.iter_mut() {
            let force = gravity_force(body, other);
            body.force += force;
            other.force -= force;
        }
    }
}

use std::fmt;

use crate::constants::GRAVITATIONAL_CONSTANT;
use crate::trajectory_system::kinematics::Body;
use crate::utils::{
    point2d::Point2D,
    vector2d::{normalize_angle, Vector2D},
};

/// Index of a planet in the world roster. Planets are never removed, so an id
/// stays valid for the whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlanetId(pub usize);

impl fmt::Display for PlanetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "planet#{}", self.0)
    }
}

#[derive(Clone, Debug)]
pub struct Planet {
    pub id: PlanetId,
    pub name: String,
    pub body: Body,
    pub radius: f64,
    /// Rotation of the surface, in [0, 2π).
    pub rotation_angle: f64,
    /// rad/s, counter-clockwise positive.
    pub angular_velocity: f64,
}

impl Planet {
    pub fn new(
        id: PlanetId,
        name: &str,
        mass: f64,
        radius: f64,
        position: Point2D,
        velocity: Vector2D,
    ) -> Self {
        Planet {
            id,
            name: name.to_string(),
            body: Body::new(mass, position, velocity),
            radius,
            rotation_angle: 0.0,
            angular_velocity: 0.0,
        }
    }

    pub fn with_rotation(mut self, rotation_angle: f64, angular_velocity: f64) -> Self {
        self.rotation_angle = normalize_angle(rotation_angle);
        self.angular_velocity = angular_velocity;
        self
    }

    pub fn mass(&self) -> f64 {
        self.body.mass
    }

    pub fn position(&self) -> Point2D {
        self.body.position
    }

    pub fn velocity(&self) -> Vector2D {
        self.body.velocity
    }

    pub fn gravitational_parameter(&self) -> f64 {
        GRAVITATIONAL_CONSTANT * self.body.mass
    }

    pub fn escape_velocity(&self, altitude: f64) -> f64 {
        let distance = self.radius + altitude;
        (2.0 * self.gravitational_parameter() / distance).sqrt()
    }

    /// Speed of a circular orbit at `altitude`.
    pub fn circular_velocity(&self, altitude: f64) -> f64 {
        (self.gravitational_parameter() / (self.radius + altitude)).sqrt()
    }

    /// Velocity of the surface point at absolute polar angle `angle`, relative
    /// to the planet's center.
    pub fn surface_velocity_at(&self, angle: f64) -> Vector2D {
        Vector2D::new(-angle.sin(), angle.cos()) * (self.angular_velocity * self.radius)
    }

    /// Polar angle of `point` as seen from the planet's center.
    pub fn polar_angle_of(&self, point: &Point2D) -> f64 {
        self.body.position.vector_to(point).angle()
    }

    pub fn altitude_of(&self, point: &Point2D) -> f64 {
        self.body.position.distance_to(point) - self.radius
    }

    pub fn rotate(&mut self, delta_time: f64) {
        self.rotation_angle = normalize_angle(self.rotation_angle + self.angular_velocity * delta_time);
    }
}

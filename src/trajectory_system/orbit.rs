//! Classical orbital elements derived from an instantaneous state vector.
//!
//! An [`Orbit`] is a read-only snapshot relative to one primary planet. It is
//! never stored on a body; callers recompute it whenever they need it.

use std::f64::consts::{FRAC_PI_2, TAU};

use crate::control::planet::{Planet, PlanetId};
use crate::utils::{point2d::Point2D, vector2d::Vector2D};

use super::kinematics::Body;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orbit {
    pub primary: PlanetId,
    /// μ = G·M of the primary.
    pub gravitational_parameter: f64,
    pub primary_radius: f64,
    pub eccentricity: f64,
    pub semi_major_axis: f64,
    pub perigee_distance: f64,
    pub apogee_distance: f64,
    pub perigee_height: f64,
    pub apogee_height: f64,
    /// Polar angle of the perigee, in [0, 2π).
    pub argument: f64,
}

/// Outcome of an orbit query. Only a bound (elliptical) trajectory yields an
/// [`Orbit`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OrbitSolution {
    Closed(Orbit),
    /// Parabolic or hyperbolic trajectory: specific energy is not negative.
    Open { specific_energy: f64 },
    /// The body sits exactly on the primary's center.
    Degenerate,
}

impl OrbitSolution {
    pub fn closed(self) -> Option<Orbit> {
        match self {
            OrbitSolution::Closed(orbit) => Some(orbit),
            _ => None,
        }
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, OrbitSolution::Closed(_))
    }
}

/// Orbit of `body` around `primary`, from their relative position and velocity.
pub fn compute_orbit(primary: &Planet, body: &Body) -> OrbitSolution {
    let r = primary.body.position.vector_to(&body.position);
    let v = body.velocity - primary.body.velocity;
    solve(primary, r, v)
}

/// Same as [`compute_orbit`] for a state vector that does not belong to a
/// [`Body`] (lookahead predictions).
pub fn compute_orbit_from_state(
    primary: &Planet,
    position: Point2D,
    velocity: Vector2D,
) -> OrbitSolution {
    let r = primary.body.position.vector_to(&position);
    let v = velocity - primary.body.velocity;
    solve(primary, r, v)
}

fn solve(primary: &Planet, r: Vector2D, v: Vector2D) -> OrbitSolution {
    let mu = primary.gravitational_parameter();
    let distance = r.magnitude();
    if distance == 0.0 {
        return OrbitSolution::Degenerate;
    }

    let specific_energy = v.magnitude_squared() / 2.0 - mu / distance;
    if specific_energy >= 0.0 || !specific_energy.is_finite() {
        return OrbitSolution::Open { specific_energy };
    }

    let semi_major_axis = -mu / (2.0 * specific_energy);
    let angular_momentum = r.cross(&v);
    let eccentricity_vector = v.cross_scalar(angular_momentum / mu) - r / distance;
    let eccentricity =
        (1.0 + 2.0 * specific_energy * angular_momentum.powi(2) / mu.powi(2)).max(0.0).sqrt();

    OrbitSolution::Closed(Orbit::with_elements(
        primary,
        semi_major_axis,
        eccentricity,
        eccentricity_vector.angle(),
    ))
}

impl Orbit {
    fn with_elements(
        primary: &Planet,
        semi_major_axis: f64,
        eccentricity: f64,
        argument: f64,
    ) -> Self {
        let perigee_distance = semi_major_axis * (1.0 - eccentricity);
        let apogee_distance = semi_major_axis * (1.0 + eccentricity);
        Orbit {
            primary: primary.id,
            gravitational_parameter: primary.gravitational_parameter(),
            primary_radius: primary.radius,
            eccentricity,
            semi_major_axis,
            perigee_distance,
            apogee_distance,
            perigee_height: perigee_distance - primary.radius,
            apogee_height: apogee_distance - primary.radius,
            argument,
        }
    }

    /// Target orbit around `primary` with the given apsis distances (measured
    /// from the primary's center) and perigee direction.
    pub fn from_apsides(
        primary: &Planet,
        perigee_distance: f64,
        apogee_distance: f64,
        argument: f64,
    ) -> Self {
        let (perigee, apogee) = if perigee_distance <= apogee_distance {
            (perigee_distance, apogee_distance)
        } else {
            (apogee_distance, perigee_distance)
        };
        let semi_major_axis = (perigee + apogee) / 2.0;
        let eccentricity = (apogee - perigee) / (apogee + perigee);
        let mut orbit = Orbit::with_elements(primary, semi_major_axis, eccentricity, argument);
        orbit.argument = argument.rem_euclid(TAU);
        orbit
    }

    /// Same as [`Orbit::from_apsides`] with apsis heights above the surface.
    pub fn from_heights(
        primary: &Planet,
        perigee_height: f64,
        apogee_height: f64,
        argument: f64,
    ) -> Self {
        Orbit::from_apsides(
            primary,
            primary.radius + perigee_height,
            primary.radius + apogee_height,
            argument,
        )
    }

    /// Orbital speed at `distance` from the primary's center (vis-viva).
    pub fn speed_at(&self, distance: f64) -> f64 {
        (self.gravitational_parameter * (2.0 / distance - 1.0 / self.semi_major_axis)).sqrt()
    }

    pub fn period(&self) -> f64 {
        TAU * (self.semi_major_axis.powi(3) / self.gravitational_parameter).sqrt()
    }

    /// Absolute position and velocity of a prograde (counter-clockwise) body
    /// at perigee, given the primary's current state.
    pub fn perigee_state(&self, primary: &Planet) -> (Point2D, Vector2D) {
        let speed = self.speed_at(self.perigee_distance);
        let position =
            primary.body.position + Vector2D::from_polar(self.argument, self.perigee_distance);
        let velocity = primary.body.velocity + Vector2D::from_polar(self.argument + FRAC_PI_2, speed);
        (position, velocity)
    }

    /// Absolute position and velocity of a prograde body at apogee.
    pub fn apogee_state(&self, primary: &Planet) -> (Point2D, Vector2D) {
        let speed = self.speed_at(self.apogee_distance);
        let angle = self.argument + std::f64::consts::PI;
        let position = primary.body.position + Vector2D::from_polar(angle, self.apogee_distance);
        let velocity = primary.body.velocity + Vector2D::from_polar(angle + FRAC_PI_2, speed);
        (position, velocity)
    }
}

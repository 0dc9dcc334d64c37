use crate::utils::{point2d::Point2D, vector2d::Vector2D};

/// Mutable physical state of anything that feels gravity.
///
/// `force` is the net force accumulated during the current tick. It is reset
/// exactly once per tick, before gravity and engine thrust are summed into it.
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub mass: f64,
    pub position: Point2D,
    pub velocity: Vector2D,
    pub force: Vector2D,
}

impl Body {
    pub fn new(mass: f64, position: Point2D, velocity: Vector2D) -> Self {
        Body {
            mass,
            position,
            velocity,
            force: Vector2D::ZERO,
        }
    }

    pub fn reset_force(&mut self) {
        self.force = Vector2D::ZERO;
    }

    pub fn apply_force(&mut self, force: Vector2D) {
        self.force += force;
    }

    pub fn acceleration(&self) -> Vector2D {
        self.force / self.mass
    }

    /// Advances position and velocity by one tick under the accumulated force:
    /// `x += v·Δt + ½·a·Δt²`, then `v += a·Δt`.
    pub fn integrate(&mut self, delta_time: f64) {
        let acceleration = self.acceleration();
        let (position, velocity) = self.predict(acceleration, delta_time);
        self.position = position;
        self.velocity = velocity;
    }

    /// Position and velocity one tick ahead under `acceleration`, without
    /// mutating the body. Guidance phases use this for lookahead.
    pub fn predict(&self, acceleration: Vector2D, delta_time: f64) -> (Point2D, Vector2D) {
        let position = self.position
            + self.velocity * delta_time
            + acceleration * (delta_time.powi(2) / 2.0);
        let velocity = self.velocity + acceleration * delta_time;
        (position, velocity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_body_initial_state() {
        let body = Body::new(10.0, Point2D::new(0.0, 100.0), Vector2D::new(1.0, 0.0));
        assert_eq!(body.force, Vector2D::ZERO);
        assert_eq!(body.velocity.magnitude(), 1.0);
    }

    #[test]
    fn test_free_body_moves_in_straight_line() {
        let mut body = Body::new(1.0, Point2D::ORIGIN, Vector2D::new(2.0, -1.0));
        for _ in 0..10 {
            body.reset_force();
            body.integrate(0.5);
        }
        assert_relative_eq!(body.position.x, 10.0, epsilon = 1e-12);
        assert_relative_eq!(body.position.y, -5.0, epsilon = 1e-12);
        assert_eq!(body.velocity, Vector2D::new(2.0, -1.0));
    }

    #[test]
    fn test_constant_force_matches_kinematics() {
        let mut body = Body::new(2.0, Point2D::ORIGIN, Vector2D::ZERO);
        let delta_time = 0.1;
        for _ in 0..100 {
            body.reset_force();
            body.apply_force(Vector2D::new(0.0, 4.0));
            body.integrate(delta_time);
        }
        // a = 2 m/s² for 10 s; the scheme is exact for constant acceleration
        assert_relative_eq!(body.velocity.y, 20.0, epsilon = 1e-9);
        assert_relative_eq!(body.position.y, 100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_forces_accumulate_until_reset() {
        let mut body = Body::new(1.0, Point2D::ORIGIN, Vector2D::ZERO);
        body.apply_force(Vector2D::new(1.0, 0.0));
        body.apply_force(Vector2D::new(0.0, 1.0));
        assert_eq!(body.acceleration(), Vector2D::new(1.0, 1.0));
        body.reset_force();
        assert_eq!(body.acceleration(), Vector2D::ZERO);
    }

    #[test]
    fn test_predict_does_not_mutate() {
        let body = Body::new(1.0, Point2D::ORIGIN, Vector2D::new(1.0, 0.0));
        let (position, velocity) = body.predict(Vector2D::new(0.0, 2.0), 1.0);
        assert_eq!(position, Point2D::new(1.0, 1.0));
        assert_eq!(velocity, Vector2D::new(1.0, 2.0));
        assert_eq!(body.position, Point2D::ORIGIN);
    }
}

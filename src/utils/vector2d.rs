use std::f64::consts::TAU;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

/// Displacement, velocity or force in the simulation plane.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector2D {
    pub x: f64,
    pub y: f64,
}

impl Vector2D {
    pub const ZERO: Vector2D = Vector2D { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Vector2D { x, y }
    }

    /// Vector of length `magnitude` pointing at polar `angle` (radians).
    pub fn from_polar(angle: f64, magnitude: f64) -> Self {
        Vector2D::new(magnitude * angle.cos(), magnitude * angle.sin())
    }

    pub fn magnitude(&self) -> f64 {
        (self.x.powi(2) + self.y.powi(2)).sqrt()
    }

    pub fn magnitude_squared(&self) -> f64 {
        self.x.powi(2) + self.y.powi(2)
    }

    /// Unit vector in the same direction, or `None` for a zero (or non-finite)
    /// vector.
    pub fn try_normalize(&self) -> Option<Self> {
        let mag = self.magnitude();
        if mag == 0.0 || !mag.is_finite() {
            None
        } else {
            Some(Vector2D::new(self.x / mag, self.y / mag))
        }
    }

    /// Unit vector in the same direction. The zero vector stays zero.
    pub fn normalize(&self) -> Self {
        self.try_normalize().unwrap_or(*self)
    }

    pub fn dot(&self, other: &Vector2D) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// z component of the 3-D cross product of the two in-plane vectors.
    pub fn cross(&self, other: &Vector2D) -> f64 {
        self.x * other.y - self.y * other.x
    }

    /// Cross product with a vector of length `z` along the plane normal.
    pub fn cross_scalar(&self, z: f64) -> Self {
        Vector2D::new(self.y * z, -self.x * z)
    }

    pub fn rotate(&self, angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        Vector2D::new(self.x * cos - self.y * sin, self.x * sin + self.y * cos)
    }

    /// Polar angle in [0, 2π).
    pub fn angle(&self) -> f64 {
        normalize_angle(self.y.atan2(self.x))
    }
}

/// Wraps an angle into [0, 2π).
pub fn normalize_angle(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

/// Shortest unsigned arc between two angles, in [0, π].
pub fn angular_distance(a: f64, b: f64) -> f64 {
    let diff = normalize_angle(a - b);
    diff.min(TAU - diff)
}

impl Sum for Vector2D {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Vector2D::ZERO, |a, b| a + b)
    }
}

impl Add for Vector2D {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Vector2D::new(self.x + other.x, self.y + other.y)
    }
}

impl AddAssign for Vector2D {
    fn add_assign(&mut self, other: Self) {
        self.x += other.x;
        self.y += other.y;
    }
}

impl Sub for Vector2D {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Vector2D::new(self.x - other.x, self.y - other.y)
    }
}

impl SubAssign for Vector2D {
    fn sub_assign(&mut self, other: Self) {
        self.x -= other.x;
        self.y -= other.y;
    }
}

impl Mul<f64> for Vector2D {
    type Output = Self;

    fn mul(self, scalar: f64) -> Self {
        Vector2D::new(self.x * scalar, self.y * scalar)
    }
}

impl Mul<Vector2D> for f64 {
    type Output = Vector2D;

    fn mul(self, vector: Vector2D) -> Vector2D {
        Vector2D::new(self * vector.x, self * vector.y)
    }
}

impl Div<f64> for Vector2D {
    type Output = Self;

    fn div(self, scalar: f64) -> Self {
        Vector2D::new(self.x / scalar, self.y / scalar)
    }
}

impl Neg for Vector2D {
    type Output = Self;

    fn neg(self) -> Self {
        Vector2D::new(-self.x, -self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_rotate_quarter_turn() {
        let rotated = Vector2D::new(1.0, 0.0).rotate(FRAC_PI_2);
        assert_relative_eq!(rotated.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(rotated.y, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_angle_is_normalized() {
        assert_relative_eq!(Vector2D::new(0.0, -1.0).angle(), 1.5 * PI, epsilon = 1e-12);
        assert_relative_eq!(Vector2D::new(-1.0, 0.0).angle(), PI, epsilon = 1e-12);
        assert_eq!(Vector2D::new(1.0, 0.0).angle(), 0.0);
    }

    #[test]
    fn test_from_polar_matches_angle_and_magnitude() {
        let v = Vector2D::from_polar(2.5, 4.0);
        assert_relative_eq!(v.magnitude(), 4.0, epsilon = 1e-12);
        assert_relative_eq!(v.angle(), 2.5, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_vector_normalization_is_guarded() {
        assert!(Vector2D::ZERO.try_normalize().is_none());
        assert_eq!(Vector2D::ZERO.normalize(), Vector2D::ZERO);
        let unit = Vector2D::new(3.0, 4.0).normalize();
        assert_relative_eq!(unit.magnitude(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_cross_products() {
        let r = Vector2D::new(2.0, 0.0);
        let v = Vector2D::new(0.0, 3.0);
        assert_eq!(r.cross(&v), 6.0);
        assert_eq!(v.cross(&r), -6.0);
        // (0, 3, 0) x (0, 0, 2) = (6, 0, 0)
        assert_eq!(v.cross_scalar(2.0), Vector2D::new(6.0, 0.0));
    }

    #[test]
    fn test_angular_distance_wraps() {
        assert_relative_eq!(angular_distance(0.1, TAU - 0.1), 0.2, epsilon = 1e-12);
        assert_relative_eq!(angular_distance(PI, 0.0), PI, epsilon = 1e-12);
    }

    #[test]
    fn test_accumulate_in_place() {
        let mut force = Vector2D::ZERO;
        force += Vector2D::new(1.0, 2.0);
        force -= Vector2D::new(0.5, 0.5);
        assert_eq!(force, Vector2D::new(0.5, 1.5));
    }
}

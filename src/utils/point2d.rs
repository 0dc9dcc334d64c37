use std::ops::{Add, Sub};

use super::vector2d::Vector2D;

/// Position in the simulation plane. Kept apart from [`Vector2D`] so positions
/// and displacements cannot be mixed up.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub const ORIGIN: Point2D = Point2D { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Point2D { x, y }
    }

    /// Displacement from `self` to `other`.
    pub fn vector_to(&self, other: &Point2D) -> Vector2D {
        Vector2D::new(other.x - self.x, other.y - self.y)
    }

    pub fn distance_to(&self, other: &Point2D) -> f64 {
        self.vector_to(other).magnitude()
    }

    pub fn translate(&self, offset: Vector2D) -> Self {
        Point2D::new(self.x + offset.x, self.y + offset.y)
    }
}

impl Add<Vector2D> for Point2D {
    type Output = Point2D;

    fn add(self, offset: Vector2D) -> Point2D {
        self.translate(offset)
    }
}

impl Sub<Vector2D> for Point2D {
    type Output = Point2D;

    fn sub(self, offset: Vector2D) -> Point2D {
        self.translate(-offset)
    }
}

impl Sub for Point2D {
    type Output = Vector2D;

    fn sub(self, origin: Point2D) -> Vector2D {
        origin.vector_to(&self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difference_is_a_vector() {
        let a = Point2D::new(1.0, 1.0);
        let b = Point2D::new(4.0, 5.0);
        assert_eq!(a.vector_to(&b), Vector2D::new(3.0, 4.0));
        assert_eq!(b - a, Vector2D::new(3.0, 4.0));
        assert_eq!(a.distance_to(&b), 5.0);
    }

    #[test]
    fn test_translation() {
        let p = Point2D::new(1.0, 2.0) + Vector2D::new(0.5, -1.0);
        assert_eq!(p, Point2D::new(1.5, 1.0));
        assert_eq!(p - Vector2D::new(0.5, -1.0), Point2D::new(1.0, 2.0));
    }
}

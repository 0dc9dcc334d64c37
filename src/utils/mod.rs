pub mod point2d;
pub mod vector2d;

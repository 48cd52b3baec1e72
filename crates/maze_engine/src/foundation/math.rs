//! Math utilities and types
//!
//! Provides the vector, quaternion and rigid-transform types shared by the
//! collision core and the scene builder.

pub use nalgebra::{Quaternion, Unit, Vector3};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// Quaternion type for rotations
pub type Quat = Unit<Quaternion<f32>>;

/// Rigid transform: rotation followed by translation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Position in 3D space
    pub position: Vec3,

    /// Rotation quaternion
    pub rotation: Quat,
}

impl Transform {
    /// Create a transform with position and rotation
    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    /// Create a transform whose rotation is given by Euler angles in degrees,
    /// applied about X, then Y, then Z.
    pub fn from_position_euler_degrees(position: Vec3, degrees: Vec3) -> Self {
        let rotation = Quat::from_euler_angles(
            utils::deg_to_rad(degrees.x),
            utils::deg_to_rad(degrees.y),
            utils::deg_to_rad(degrees.z),
        );
        Self { position, rotation }
    }

    /// Apply this transform to a point
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.position + self.rotation * point
    }
}

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;
}

/// Math utility functions
pub mod utils {
    use super::{constants, Vec3};

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }

    /// Convert a plain coordinate triple (as stored in config files) to a vector
    pub fn vec3_from_array(values: [f32; 3]) -> Vec3 {
        Vec3::new(values[0], values[1], values[2])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const EPSILON: f32 = 1e-5;

    #[test]
    fn test_euler_degrees_quarter_turn_about_z() {
        let t = Transform::from_position_euler_degrees(Vec3::zeros(), Vec3::new(0.0, 0.0, 90.0));
        let rotated = t.transform_point(Vec3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(rotated, Vec3::new(0.0, 1.0, 0.0), epsilon = EPSILON);
    }

    #[test]
    fn test_translation_applies_after_rotation() {
        let quarter_x = Vec3::new(90.0, 0.0, 0.0);
        let rotation = Transform::from_position_euler_degrees(Vec3::zeros(), quarter_x).rotation;
        let t = Transform::from_position_rotation(Vec3::new(0.5, 0.0, -0.5), rotation);
        let moved = t.transform_point(Vec3::new(0.0, 1.0, 0.0));
        assert_relative_eq!(moved, Vec3::new(0.5, 0.0, 0.5), epsilon = EPSILON);
    }

    #[test]
    fn test_angle_conversions() {
        assert_relative_eq!(utils::deg_to_rad(180.0), constants::PI, epsilon = EPSILON);
        assert_relative_eq!(utils::deg_to_rad(90.0), constants::PI / 2.0, epsilon = EPSILON);
    }
}

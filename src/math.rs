//! Vector and quaternion math for component transforms
//!
//! Deliberately minimal: these types carry spatial data between the text
//! format and the typed model, they do not power a renderer. Rotations are
//! quaternions stored in wire order (x, y, z, w).

use serde::{Deserialize, Serialize};

/// Tolerance for treating a quaternion as unit length
pub const UNIT_EPSILON: f32 = 1e-4;

/// 3D vector (component positions)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 0.0 };

    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// True if no component is NaN or infinite
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// Rotation quaternion in wire order (x, y, z, w)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quat {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Quat {
    /// No rotation
    pub const IDENTITY: Quat = Quat { x: 0.0, y: 0.0, z: 0.0, w: 1.0 };

    pub fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    pub fn dot(self, other: Quat) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z + self.w * other.w
    }

    pub fn length(self) -> f32 {
        self.dot(self).sqrt()
    }

    /// Scale to unit length. A zero quaternion normalizes to identity.
    pub fn normalize(self) -> Quat {
        let l = self.length();
        if l == 0.0 {
            return Quat::IDENTITY;
        }
        Quat {
            x: self.x / l,
            y: self.y / l,
            z: self.z / l,
            w: self.w / l,
        }
    }

    /// True if the length is 1 within [`UNIT_EPSILON`]
    pub fn is_normalized(self) -> bool {
        self.is_finite() && (self.length() - 1.0).abs() <= UNIT_EPSILON
    }

    /// True if no component is NaN or infinite
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite() && self.w.is_finite()
    }
}

impl Default for Quat {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_is_normalized() {
        assert!(Quat::IDENTITY.is_normalized());
        assert!((Quat::IDENTITY.length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_normalize() {
        let q = Quat::new(0.0, 2.0, 0.0, 0.0);
        let n = q.normalize();
        assert!(n.is_normalized());
        assert!((n.y - 1.0).abs() < 1e-6);

        // Zero quaternion falls back to identity
        let z = Quat::new(0.0, 0.0, 0.0, 0.0).normalize();
        assert_eq!(z, Quat::IDENTITY);
    }

    #[test]
    fn test_is_normalized_rejects_drift() {
        assert!(!Quat::new(0.0, 0.0, 0.0, 1.01).is_normalized());
        assert!(!Quat::new(0.0, 0.0, 0.0, f32::NAN).is_normalized());
        // Half-angle rotation around Z, still unit length
        let half = std::f32::consts::FRAC_1_SQRT_2;
        assert!(Quat::new(0.0, 0.0, half, half).is_normalized());
    }

    #[test]
    fn test_vec3_finite() {
        assert!(Vec3::new(1.0, -2.0, 3.5).is_finite());
        assert!(!Vec3::new(f32::INFINITY, 0.0, 0.0).is_finite());
        assert!(!Vec3::new(0.0, f32::NAN, 0.0).is_finite());
    }
}

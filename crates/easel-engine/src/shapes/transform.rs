use glam::{EulerRot, Mat4, Vec3};

/// Position, rotation and scale of a shape, each held as its own matrix.
///
/// The world matrix applies scale first, then rotation, then translation.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform {
    pub position: Mat4,
    pub rotation: Mat4,
    pub scale: Mat4,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        position: Mat4::IDENTITY,
        rotation: Mat4::IDENTITY,
        scale: Mat4::IDENTITY,
    };

    /// Identity rotation and scale, translated to `(x, y)`.
    #[inline]
    pub fn at(x: f32, y: f32) -> Self {
        Self {
            position: Mat4::from_translation(Vec3::new(x, y, 0.0)),
            ..Self::IDENTITY
        }
    }

    #[inline]
    pub fn set_position(&mut self, position: Vec3) {
        self.position = Mat4::from_translation(position);
    }

    /// Euler angles in radians, applied about X, then Y, then Z.
    #[inline]
    pub fn set_rotation(&mut self, rotation: Vec3) {
        self.rotation = rotation_matrix(rotation);
    }

    #[inline]
    pub fn set_scale(&mut self, scale: Vec3) {
        self.scale = Mat4::from_scale(scale);
    }

    /// Combined world matrix.
    #[inline]
    pub fn world(&self) -> Mat4 {
        self.position * self.rotation * self.scale
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Rotation about X, then Y, then Z (radians).
pub fn rotation_matrix(rotation: Vec3) -> Mat4 {
    Mat4::from_euler(EulerRot::ZYX, rotation.z, rotation.y, rotation.x)
}

/// Translation part of `m`.
#[inline]
pub fn position_of(m: Mat4) -> Vec3 {
    m.w_axis.truncate()
}

/// Euler angles (radians, X/Y/Z) of the rotation in `m`.
///
/// Scale is divided out first, so any combined world matrix works.
pub fn rotation_of(m: Mat4) -> Vec3 {
    let (_, rotation, _) = m.to_scale_rotation_translation();
    let (z, y, x) = rotation.to_euler(EulerRot::ZYX);
    Vec3::new(x, y, z)
}

/// Length of each basis axis of `m`.
#[inline]
pub fn scale_of(m: Mat4) -> Vec3 {
    Vec3::new(
        m.x_axis.truncate().length(),
        m.y_axis.truncate().length(),
        m.z_axis.truncate().length(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).abs().max_element() < 1e-5
    }

    #[test]
    fn world_scales_then_rotates_then_translates() {
        let mut t = Transform::at(100.0, 50.0);
        t.set_scale(Vec3::new(2.0, 2.0, 1.0));
        t.set_rotation(Vec3::new(0.0, 0.0, FRAC_PI_2));

        // (1, 0) -> scaled (2, 0) -> rotated (0, 2) -> translated (100, 52)
        let p = t.world().transform_point3(Vec3::new(1.0, 0.0, 0.0));
        assert!(approx(p, Vec3::new(100.0, 52.0, 0.0)), "{p:?}");
    }

    #[test]
    fn rotation_applies_all_three_axes() {
        let r = rotation_matrix(Vec3::new(0.3, 0.0, 0.0));
        assert_ne!(r, Mat4::IDENTITY);
        let r = rotation_matrix(Vec3::new(0.0, 0.3, 0.0));
        assert_ne!(r, Mat4::IDENTITY);
    }

    #[test]
    fn rotation_order_is_x_then_y_then_z() {
        let angles = Vec3::new(0.4, -0.2, 0.9);
        let expected = Mat4::from_rotation_z(angles.z)
            * Mat4::from_rotation_y(angles.y)
            * Mat4::from_rotation_x(angles.x);
        assert!(rotation_matrix(angles).abs_diff_eq(expected, 1e-6));
    }

    #[test]
    fn decomposes_world_matrix() {
        let mut t = Transform::at(12.0, -7.0);
        t.set_rotation(Vec3::new(0.1, 0.2, 0.3));
        t.set_scale(Vec3::new(3.0, 0.5, 1.0));
        let world = t.world();

        assert!(approx(position_of(world), Vec3::new(12.0, -7.0, 0.0)));
        assert!(approx(rotation_of(world), Vec3::new(0.1, 0.2, 0.3)));
        assert!(approx(scale_of(world), Vec3::new(3.0, 0.5, 1.0)));
    }

    #[test]
    fn identity_decomposes_to_zero_rotation_and_unit_scale() {
        let m = Transform::IDENTITY.world();
        assert!(approx(position_of(m), Vec3::ZERO));
        assert!(approx(rotation_of(m), Vec3::ZERO));
        assert!(approx(scale_of(m), Vec3::ONE));
    }
}

//! Per-instance model transforms.

use glam::{Mat4, Vec3};

/// Animated rotation shared by every instance of a scene.
///
/// The rotation angle of instance `i` at elapsed time `t` seconds is
/// `base_angle_step_deg * i + t * angular_speed_deg`, in degrees; the axis
/// is normalized once at construction (rotating about an unnormalized axis
/// shears the geometry).
#[derive(Debug, Clone, Copy)]
pub struct SpinAnimation {
    axis: Vec3,
    base_angle_step_deg: f32,
    angular_speed_deg: f32,
}

impl SpinAnimation {
    pub fn new(axis: Vec3, base_angle_step_deg: f32, angular_speed_deg: f32) -> Self {
        // A zero axis has no meaningful rotation; fall back to +Y.
        let axis = axis.try_normalize().unwrap_or(Vec3::Y);
        Self {
            axis,
            base_angle_step_deg,
            angular_speed_deg,
        }
    }

    pub fn axis(&self) -> Vec3 {
        self.axis
    }

    /// Rotation angle in degrees for one instance at one point in time.
    /// Pure: identical inputs always produce identical results.
    pub fn angle_degrees(&self, index: u32, elapsed_secs: f32) -> f32 {
        self.base_angle_step_deg * index as f32 + elapsed_secs * self.angular_speed_deg
    }

    /// Model matrix for one instance: translation to its base position
    /// composed after the animated rotation, so the rotation applies in
    /// object space first.
    pub fn model_matrix(&self, position: Vec3, index: u32, elapsed_secs: f32) -> Mat4 {
        let angle = self.angle_degrees(index, elapsed_secs).to_radians();
        Mat4::from_translation(position) * Mat4::from_axis_angle(self.axis, angle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn angles_step_per_instance_at_time_zero() {
        let animation = SpinAnimation::new(Vec3::new(1.0, 0.3, 0.5), 20.0, 50.0);
        assert_eq!(animation.angle_degrees(0, 0.0), 0.0);
        assert_eq!(animation.angle_degrees(1, 0.0), 20.0);
        assert_eq!(animation.angle_degrees(9, 0.0), 180.0);
    }

    #[test]
    fn angle_advances_with_time() {
        let animation = SpinAnimation::new(Vec3::Y, 20.0, 50.0);
        assert!((animation.angle_degrees(2, 1.5) - (40.0 + 75.0)).abs() < 1e-6);
    }

    #[test]
    fn axis_is_normalized() {
        let animation = SpinAnimation::new(Vec3::new(1.0, 0.3, 0.5), 20.0, 50.0);
        assert!((animation.axis().length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn zero_axis_falls_back_to_y() {
        let animation = SpinAnimation::new(Vec3::ZERO, 0.0, 0.0);
        assert_eq!(animation.axis(), Vec3::Y);
    }

    #[test]
    fn model_matrix_is_deterministic() {
        let animation = SpinAnimation::new(Vec3::new(0.5, 1.0, 0.0), 20.0, 50.0);
        let position = Vec3::new(2.0, 5.0, -15.0);
        let first = animation.model_matrix(position, 3, 2.25);
        let second = animation.model_matrix(position, 3, 2.25);
        assert_eq!(first.to_cols_array(), second.to_cols_array());
    }

    #[test]
    fn rotation_applies_before_translation() {
        // 90 degrees about +Y carries +Z onto +X; the translation then
        // moves the rotated point.
        let animation = SpinAnimation::new(Vec3::Y, 90.0, 0.0);
        let model = animation.model_matrix(Vec3::new(10.0, 0.0, 0.0), 1, 0.0);
        let moved = model.transform_point3(Vec3::Z);
        assert!((moved - Vec3::new(11.0, 0.0, 0.0)).length() < 1e-5);
    }
}

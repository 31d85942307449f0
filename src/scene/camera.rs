//! Stand-in camera: a fixed pull-back view and a perspective projection.

use glam::{Mat4, Vec3};

use crate::HarnessConfig;

/// Produces the view and projection matrices for a frame.
///
/// The view is a translation moving the scene backward along -Z by a fixed
/// distance; the projection is a perspective matrix from a fixed vertical
/// field of view, aspect ratio and clip planes. Both are instance-invariant
/// within a frame.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub distance: f32,
    pub fov_y_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn new(distance: f32, fov_y_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            distance,
            fov_y_degrees,
            aspect,
            near,
            far,
        }
    }

    pub fn from_config(config: &HarnessConfig) -> Self {
        Self::new(
            config.camera_distance,
            config.fov_y_degrees,
            config.aspect(),
            config.near,
            config.far,
        )
    }

    /// View matrix pulling the scene back along -Z.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_translation(Vec3::new(0.0, 0.0, -self.distance))
    }

    /// Perspective projection for GL clip space.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh_gl(
            self.fov_y_degrees.to_radians(),
            self.aspect,
            self.near,
            self.far,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    fn camera() -> Camera {
        Camera::new(3.0, 45.0, 800.0 / 640.0, 0.1, 100.0)
    }

    #[test]
    fn view_pulls_scene_backward() {
        let view = camera().view_matrix();
        let origin = view.transform_point3(Vec3::ZERO);
        assert!((origin - Vec3::new(0.0, 0.0, -3.0)).length() < 1e-6);
    }

    #[test]
    fn composition_is_projection_view_model() {
        let camera = camera();
        let model = Mat4::from_translation(Vec3::new(0.3, -0.2, 0.5))
            * Mat4::from_axis_angle(Vec3::Y, 0.7);
        let view = camera.view_matrix();
        let projection = camera.projection_matrix();

        let position = Vec4::new(0.25, -0.5, 0.75, 1.0);
        let composed = (projection * view * model) * position;
        let chained = projection * (view * (model * position));

        for i in 0..4 {
            assert!((composed[i] - chained[i]).abs() < 1e-5);
        }
    }

    #[test]
    fn projection_maps_near_plane_to_negative_unit_depth() {
        let camera = camera();
        let projection = camera.projection_matrix();
        let on_near = projection.project_point3(Vec3::new(0.0, 0.0, -camera.near));
        assert!((on_near.z + 1.0).abs() < 1e-5);
    }
}

// camera.rs - perspective projection and the orbiting eye placement

use glam::{Mat4, Vec3};

/// Distance from the origin at which the eye orbits each frame.
pub const ORBIT_RADIUS: f32 = 100.0;

const NEAR_PLANE: f32 = 1.0;
const FAR_PLANE: f32 = 1100.0;

/// Perspective camera parameters. The eye position is not stored; it is
/// derived from the look direction on every frame.
pub struct Camera {
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn new(fov: f32, width: u32, height: u32) -> Self {
        let mut camera = Self {
            fov,
            aspect: 1.0,
            near: NEAR_PLANE,
            far: FAR_PLANE,
        };
        camera.set_viewport(width, height);
        camera
    }

    /// Recompute the aspect ratio for a new viewport. Zero-sized viewports
    /// (minimized window) keep the previous aspect.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    /// Projection matrix for the current parameters. The stored fov is left
    /// untouched; tan(fov/2) hits a singularity at 180 degrees, so the value
    /// fed to the matrix is kept clear of it.
    pub fn projection(&self) -> Mat4 {
        let fov = self.fov.clamp(1.0, 179.9);
        Mat4::perspective_rh(fov.to_radians(), self.aspect, self.near, self.far)
    }

    /// View matrix for a look direction given in degrees: the eye sits on the
    /// orbit sphere and looks back at the origin.
    pub fn view(&self, lon: f32, lat: f32) -> Mat4 {
        Mat4::look_at_rh(eye_position(lon, lat), Vec3::ZERO, Vec3::Y)
    }

    pub fn view_proj(&self, lon: f32, lat: f32) -> Mat4 {
        self.projection() * self.view(lon, lat)
    }
}

/// Spherical-to-Cartesian conversion of the look direction:
/// phi = radians(90 - lat), theta = radians(lon).
pub fn eye_position(lon: f32, lat: f32) -> Vec3 {
    // straight-up/down directions collapse against the fixed up vector
    let lat = lat.clamp(-89.9, 89.9);
    let phi = (90.0 - lat).to_radians();
    let theta = lon.to_radians();
    Vec3::new(
        ORBIT_RADIUS * phi.sin() * theta.cos(),
        ORBIT_RADIUS * phi.cos(),
        ORBIT_RADIUS * phi.sin() * theta.sin(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resize_updates_aspect_and_nothing_else() {
        let mut camera = Camera::new(60.0, 800, 600);
        assert_eq!(camera.aspect, 800.0 / 600.0);

        camera.set_viewport(400, 300);
        assert_eq!(camera.aspect, 400.0 / 300.0);
        assert_eq!(camera.fov, 60.0);
        assert_eq!(camera.near, NEAR_PLANE);
        assert_eq!(camera.far, FAR_PLANE);
    }

    #[test]
    fn resize_is_idempotent() {
        let mut camera = Camera::new(60.0, 800, 600);
        camera.set_viewport(1024, 768);
        let first = camera.projection().to_cols_array();
        camera.set_viewport(1024, 768);
        let second = camera.projection().to_cols_array();
        assert_eq!(first, second);
    }

    #[test]
    fn zero_viewport_keeps_previous_aspect() {
        let mut camera = Camera::new(60.0, 800, 600);
        camera.set_viewport(0, 0);
        assert_eq!(camera.aspect, 800.0 / 600.0);
    }

    #[test]
    fn eye_follows_the_spherical_conversion() {
        let eye = eye_position(0.0, 0.0);
        assert!((eye - Vec3::new(ORBIT_RADIUS, 0.0, 0.0)).length() < 1e-3);

        let eye = eye_position(90.0, 30.0);
        let phi = (90.0f32 - 30.0).to_radians();
        let theta = 90.0f32.to_radians();
        assert!((eye.x - ORBIT_RADIUS * phi.sin() * theta.cos()).abs() < 1e-3);
        assert!((eye.y - ORBIT_RADIUS * phi.cos()).abs() < 1e-3);
        assert!((eye.z - ORBIT_RADIUS * phi.sin() * theta.sin()).abs() < 1e-3);
    }

    #[test]
    fn eye_stays_on_the_orbit_sphere() {
        for (lon, lat) in [(0.0, 0.0), (90.0, 45.0), (-135.0, -30.0), (720.0, 10.0)] {
            let eye = eye_position(lon, lat);
            assert!((eye.length() - ORBIT_RADIUS).abs() < 1e-2);
        }
    }

    #[test]
    fn view_looks_at_the_origin() {
        let camera = Camera::new(60.0, 800, 600);
        let origin_in_view = camera.view(37.0, 12.0).transform_point3(Vec3::ZERO);
        // the origin lands on the camera's forward axis, one orbit radius out
        assert!(origin_in_view.x.abs() < 1e-3);
        assert!(origin_in_view.y.abs() < 1e-3);
        assert!((origin_in_view.z + ORBIT_RADIUS).abs() < 1e-2);
    }

    #[test]
    fn extreme_fov_still_yields_finite_projection() {
        let mut camera = Camera::new(60.0, 800, 600);
        camera.fov = -40.0;
        assert!(camera.projection().to_cols_array().iter().all(|v| v.is_finite()));
        camera.fov = 400.0;
        assert!(camera.projection().to_cols_array().iter().all(|v| v.is_finite()));
    }
}

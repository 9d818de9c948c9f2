use glam::{Mat4, Vec3, Vec4Swizzles};
use xrview_common::Ray;

// Zoom bounds.
const MIN_RADIUS: f32 = 0.5;
const MAX_RADIUS: f32 = 80.0;
// Just under 90 degrees.
const MAX_ELEVATION: f32 = std::f32::consts::FRAC_PI_2 - 0.01;

/// Desktop orbit camera circling a target point.
///
/// Azimuth is measured around +Y from +Z toward +X; elevation is the angle
/// above the ground plane.
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    pub target: Vec3,
    pub azimuth: f32,
    pub elevation: f32,
    pub radius: f32,
    pub lens: Lens,
    pub sensitivity: f32,
    pub zoom_speed: f32,
}

/// Perspective projection parameters shared by the orbit and headset views.
#[derive(Debug, Clone, Copy)]
pub struct Lens {
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Lens {
    fn default() -> Self {
        Self {
            fov: 60.0_f32.to_radians(),
            aspect: 16.0 / 9.0,
            near: 0.05,
            far: 500.0,
        }
    }
}

impl Lens {
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far)
    }
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            target: Vec3::new(0.0, 1.0, 0.0),
            azimuth: 0.0,
            elevation: 30.0_f32.to_radians(),
            radius: 14.0,
            lens: Lens::default(),
            sensitivity: 0.005,
            zoom_speed: 0.8,
        }
    }
}

impl OrbitCamera {
    pub fn eye(&self) -> Vec3 {
        self.target
            + self.radius
                * Vec3::new(
                    self.elevation.cos() * self.azimuth.sin(),
                    self.elevation.sin(),
                    self.elevation.cos() * self.azimuth.cos(),
                )
    }

    pub fn forward(&self) -> Vec3 {
        (self.target - self.eye()).normalize()
    }

    /// Drag by a mouse delta in pixels.
    pub fn orbit(&mut self, dx: f32, dy: f32) {
        self.azimuth -= dx * self.sensitivity;
        self.elevation =
            (self.elevation + dy * self.sensitivity).clamp(-MAX_ELEVATION, MAX_ELEVATION);
    }

    /// Positive `delta` zooms in.
    pub fn zoom(&mut self, delta: f32) {
        self.radius = (self.radius - delta * self.zoom_speed).clamp(MIN_RADIUS, MAX_RADIUS);
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye(), self.target, Vec3::Y)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.lens.projection_matrix() * self.view_matrix()
    }
}

/// World-space ray through a window pixel, for picking.
pub fn screen_ray(view_projection: Mat4, x: f32, y: f32, width: f32, height: f32) -> Ray {
    let ndc_x = 2.0 * x / width.max(1.0) - 1.0;
    let ndc_y = 1.0 - 2.0 * y / height.max(1.0);
    let inv = view_projection.inverse();
    let unproject = |z: f32| {
        let p = inv * glam::Vec4::new(ndc_x, ndc_y, z, 1.0);
        p.xyz() / p.w
    };
    let near = unproject(0.0);
    let far = unproject(1.0);
    Ray::new(near, far - near)
}

use glam::{Mat4, Vec3};
use xrview_common::{ObjectId, Pose};
use xrview_scene::Scene;

/// Camera/view configuration for rendering.
#[derive(Debug, Clone, Copy)]
pub struct RenderView {
    /// Camera position in world space.
    pub eye: Vec3,
    /// Point the camera is looking at.
    pub target: Vec3,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    /// Currently selected object, highlighted by renderers that can.
    pub selected: Option<ObjectId>,
}

impl Default for RenderView {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 6.0, 10.0),
            target: Vec3::ZERO,
            fov_degrees: 60.0,
            selected: None,
        }
    }
}

impl RenderView {
    /// View looking along a pose's forward axis, e.g. a headset camera.
    pub fn from_pose(pose: &Pose, fov_degrees: f32) -> Self {
        Self {
            eye: pose.position,
            target: pose.position + pose.forward(),
            fov_degrees,
            selected: None,
        }
    }

    /// World-to-view matrix. Looking straight up or down swaps the up
    /// vector to -Z so the basis stays finite.
    pub fn view_matrix(&self) -> Mat4 {
        let dir = (self.target - self.eye).normalize_or_zero();
        let up = if dir.dot(Vec3::Y).abs() > 0.999 {
            Vec3::NEG_Z
        } else {
            Vec3::Y
        };
        Mat4::look_at_rh(self.eye, self.target, up)
    }
}

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// The renderer reads the scene and a view configuration, then produces
/// output. It never mutates the scene.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame from the given scene and view.
    fn render(&self, scene: &Scene, view: &RenderView) -> Self::Output;
}

/// Produces a human-readable listing of the scene.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, scene: &Scene, view: &RenderView) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "=== Scene (objects={}, ambient={:.2}) ===\n",
            scene.len(),
            scene.ambient
        ));
        out.push_str(&format!(
            "Camera: eye=({:.1}, {:.1}, {:.1}) target=({:.1}, {:.1}, {:.1}) fov={:.0}\n",
            view.eye.x,
            view.eye.y,
            view.eye.z,
            view.target.x,
            view.target.y,
            view.target.z,
            view.fov_degrees
        ));

        for (id, object) in scene.objects() {
            let p = object.transform.position;
            let marker = if view.selected == Some(*id) { '*' } else { ' ' };
            out.push_str(&format!(
                "{marker} [{}] {:<12} pos=({:.2}, {:.2}, {:.2})\n",
                id.short(),
                object.name,
                p.x,
                p.y,
                p.z
            ));
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;
    use xrview_scene::SceneObject;

    #[test]
    fn debug_renderer_empty_scene() {
        let scene = Scene::new();
        let renderer = DebugTextRenderer::new();
        let output = renderer.render(&scene, &RenderView::default());

        assert!(output.contains("objects=0"));
        assert!(output.contains("fov=60"));
    }

    #[test]
    fn debug_renderer_marks_selection() {
        let mut scene = Scene::new();
        let id = scene.add(SceneObject::cube("Crate", Vec3::new(1.0, 2.0, 3.0), 1.0, [1.0; 4]));
        scene.add(SceneObject::cube("Other", Vec3::ZERO, 1.0, [1.0; 4]));

        let view = RenderView {
            selected: Some(id),
            ..Default::default()
        };
        let output = DebugTextRenderer::new().render(&scene, &view);

        assert!(output.contains("objects=2"));
        assert!(output.contains("pos=(1.00, 2.00, 3.00)"));
        let selected_line = output.lines().find(|l| l.contains("Crate")).unwrap();
        assert!(selected_line.starts_with('*'));
    }

    #[test]
    fn view_from_pose_looks_forward() {
        let pose = Pose::new(Vec3::new(0.0, 1.6, 0.0), Quat::IDENTITY);
        let view = RenderView::from_pose(&pose, 90.0);
        assert_eq!(view.target, Vec3::new(0.0, 1.6, -1.0));
        let eye = view.view_matrix().transform_point3(pose.position);
        assert!(eye.length() < 1e-5);
    }

    #[test]
    fn view_straight_up_or_down_stays_finite() {
        for pitch in [std::f32::consts::FRAC_PI_2, -std::f32::consts::FRAC_PI_2] {
            let pose = Pose::new(Vec3::new(0.0, 1.6, 0.0), Quat::from_rotation_x(pitch));
            let view = RenderView::from_pose(&pose, 60.0).view_matrix();
            assert!(view.is_finite(), "pitch {pitch}: {view:?}");
            let eye = view.transform_point3(pose.position);
            assert!(eye.length() < 1e-5);
        }
    }
}

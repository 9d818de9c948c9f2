use egui::Context as EguiContext;
use glam::{Mat4, Vec3};
use std::collections::HashSet;
use winit::keyboard::KeyCode;
use xrview_common::{Handedness, ObjectId};
use xrview_input::{EmulatorButtons, HeadsetEmulator, XrFrame};
use xrview_locomotion::{Locomotion, NavConfig, PinchMode};
use xrview_render_wgpu::{Lens, Marker, OrbitCamera, screen_ray};
use xrview_scene::Scene;

// Presses that move less than this many pixels count as clicks.
const CLICK_SLOP: f32 = 4.0;

const RIG_COLOR: [f32; 4] = [0.2, 0.8, 0.9, 1.0];
const HEAD_COLOR: [f32; 4] = [0.9, 0.9, 0.9, 1.0];
const HAND_COLOR: [f32; 4] = [0.95, 0.6, 0.3, 1.0];
const PINCH_COLOR: [f32; 4] = [0.3, 1.0, 0.4, 1.0];
const LOCK_COLOR: [f32; 4] = [1.0, 0.3, 0.9, 1.0];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    Orbit,
    Xr,
}

/// Everything the viewer needs between frames, independent of the GPU.
pub struct AppState {
    pub scene: Scene,
    pub camera: OrbitCamera,
    pub emulator: HeadsetEmulator,
    pub locomotion: Locomotion,
    pub mode: ViewMode,
    pub selected: Option<ObjectId>,
    pub show_panel: bool,
    /// Last emulated frame, in tracking space.
    frame: XrFrame,
    keys_held: HashSet<KeyCode>,
    pub looking: bool,
    cursor: Option<(f32, f32)>,
    press: Option<(f32, f32)>,
    drag_distance: f32,
}

impl AppState {
    pub fn new(config: NavConfig) -> Self {
        Self {
            scene: Scene::demo(),
            camera: OrbitCamera::default(),
            emulator: HeadsetEmulator::new(),
            locomotion: Locomotion::new(config),
            mode: ViewMode::Orbit,
            selected: None,
            show_panel: true,
            frame: XrFrame::default(),
            keys_held: HashSet::new(),
            looking: false,
            cursor: None,
            press: None,
            drag_distance: 0.0,
        }
    }

    pub fn buttons(&self) -> EmulatorButtons {
        let held = |k| self.keys_held.contains(&k);
        EmulatorButtons {
            forward: held(KeyCode::KeyW),
            back: held(KeyCode::KeyS),
            left: held(KeyCode::KeyA),
            right: held(KeyCode::KeyD),
            pinch_left: held(KeyCode::KeyQ),
            pinch_right: held(KeyCode::KeyE),
            swing_left: held(KeyCode::KeyJ),
            swing_right: held(KeyCode::KeyL),
        }
    }

    /// Per-frame update. Locomotion only runs in XR mode.
    pub fn update(&mut self, dt: f32) {
        if self.mode != ViewMode::Xr {
            return;
        }
        self.frame = self.emulator.frame(&self.buttons());
        self.locomotion.step(&self.frame, dt);
    }

    pub fn handle_key(&mut self, key: KeyCode, pressed: bool) {
        if !pressed {
            self.keys_held.remove(&key);
            return;
        }
        // Ignore key repeat for toggles.
        if !self.keys_held.insert(key) {
            return;
        }

        match key {
            KeyCode::KeyV => {
                self.mode = match self.mode {
                    ViewMode::Orbit => ViewMode::Xr,
                    ViewMode::Xr => ViewMode::Orbit,
                };
                tracing::info!(mode = ?self.mode, "view mode");
            }
            KeyCode::KeyH => {
                self.emulator.hand_tracking = !self.emulator.hand_tracking;
                tracing::info!(hand_tracking = self.emulator.hand_tracking, "emulated input");
            }
            KeyCode::KeyG => {
                let next = match self.locomotion.config().pinch_mode {
                    PinchMode::Step => PinchMode::Gesture,
                    PinchMode::Gesture => PinchMode::Step,
                };
                self.locomotion.set_pinch_mode(next);
            }
            KeyCode::KeyR => {
                self.locomotion.rig = Default::default();
                tracing::info!("rig reset");
            }
            KeyCode::F1 => self.show_panel = !self.show_panel,
            KeyCode::Escape => self.selected = None,
            _ => {}
        }
    }

    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        match self.mode {
            ViewMode::Orbit => {
                let mut camera = self.camera.clone();
                camera.lens.aspect = aspect;
                camera.view_projection()
            }
            ViewMode::Xr => {
                let lens = Lens {
                    aspect,
                    ..self.camera.lens
                };
                let head = self.emulator.head_pose();
                lens.projection_matrix() * self.locomotion.rig.view_matrix(&head)
            }
        }
    }

    pub fn press(&mut self) {
        self.press = self.cursor;
        self.drag_distance = 0.0;
    }

    pub fn cursor_moved(&mut self, x: f32, y: f32) {
        if let (Some((px, py)), Some(_)) = (self.cursor, self.press) {
            let (dx, dy) = (x - px, y - py);
            self.drag_distance += (dx * dx + dy * dy).sqrt();
            if self.mode == ViewMode::Orbit {
                self.camera.orbit(dx, dy);
            }
        }
        self.cursor = Some((x, y));
    }

    /// Left button released: a click without drag picks under the cursor.
    pub fn release(&mut self, width: f32, height: f32) {
        let pressed = self.press.take();
        if pressed.is_none() || self.drag_distance > CLICK_SLOP {
            return;
        }
        let Some((x, y)) = self.cursor else {
            return;
        };
        let ray = screen_ray(self.view_projection(width / height.max(1.0)), x, y, width, height);
        self.selected = self.scene.pick(&ray).map(|hit| {
            tracing::debug!(id = %hit.id.short(), distance = hit.distance, "picked");
            hit.id
        });
    }

    pub fn mouse_look(&mut self, dx: f32, dy: f32) {
        if self.looking && self.mode == ViewMode::Xr {
            self.emulator.look(dx, dy);
        }
    }

    /// Debug boxes for the rig, the head (outside XR view) and the hands.
    pub fn markers(&self) -> Vec<Marker> {
        let rig = self.locomotion.rig;
        let mut markers = vec![Marker {
            position: rig.position + Vec3::Y * 0.02,
            rotation: rig.orientation(),
            half_extents: Vec3::new(0.25, 0.02, 0.35),
            color: RIG_COLOR,
        }];
        if self.mode == ViewMode::Orbit {
            let head = rig.head_world(&self.emulator.head_pose());
            markers.push(Marker {
                rotation: head.orientation,
                ..Marker::cube(head.position, 0.25, HEAD_COLOR)
            });
        }

        let world = self.frame.to_world(&rig.pose());
        let lock = self.locomotion.tracker().lock();
        for side in [Handedness::Left, Handedness::Right] {
            let Some(hand) = self.locomotion.hands().get(side) else {
                continue;
            };
            let Some(source) = world.sources.get(hand.source_index) else {
                continue;
            };
            let position = source
                .hand
                .map(|h| h.index_tip)
                .or(source.target_ray.map(|p| p.position));
            let Some(position) = position else {
                continue;
            };
            let color = if lock == Some(side) {
                LOCK_COLOR
            } else if hand.is_pinching {
                PINCH_COLOR
            } else {
                HAND_COLOR
            };
            markers.push(Marker::cube(position, 0.06, color));
        }
        markers
    }

    pub fn draw_ui(&mut self, ctx: &EguiContext) {
        if !self.show_panel {
            return;
        }

        egui::SidePanel::left("locomotion")
            .default_width(260.0)
            .show(ctx, |ui| {
                ui.heading("xrview");
                ui.separator();
                ui.label(format!("View: {:?}  (V)", self.mode));
                ui.label(format!(
                    "Input: {}  (H)",
                    if self.emulator.hand_tracking {
                        "hand tracking"
                    } else {
                        "controllers"
                    }
                ));
                ui.label(format!(
                    "Pinch mode: {:?}  (G)",
                    self.locomotion.config().pinch_mode
                ));

                ui.separator();
                ui.heading("Rig");
                let rig = self.locomotion.rig;
                ui.label(format!(
                    "Position: ({:.2}, {:.2}, {:.2})",
                    rig.position.x, rig.position.y, rig.position.z
                ));
                ui.label(format!("Yaw: {:.1} deg", rig.yaw.to_degrees()));
                let motion = self.locomotion.last_motion();
                ui.label(format!("Motion: {}", motion.mode.name()));
                ui.label(format!(
                    "Delta: ({:.3}, {:.3}, {:.3}) yaw {:.3}",
                    motion.translation.x, motion.translation.y, motion.translation.z, motion.yaw
                ));
                if let Some(side) = self.locomotion.tracker().lock() {
                    ui.label(format!("Gesture lock: {}", side.as_str()));
                }
                if ui.button("Reset rig (R)").clicked() {
                    self.locomotion.rig = Default::default();
                }

                ui.separator();
                ui.heading("Selection");
                match self.selected.and_then(|id| self.scene.get(id)) {
                    Some(object) => {
                        let p = object.transform.position;
                        ui.label(&object.name);
                        ui.label(format!("At ({:.2}, {:.2}, {:.2})", p.x, p.y, p.z));
                    }
                    None => {
                        ui.label("Nothing selected");
                    }
                }

                ui.separator();
                ui.small("Orbit: LMB drag, wheel, click to pick");
                ui.small("XR: RMB look | WASD stick | Q/E pinch | J/L swing");
            });
    }
}

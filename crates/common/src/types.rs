use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for an object in the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(pub Uuid);

impl ObjectId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// First eight hex digits, for logs and UI labels.
    pub fn short(&self) -> String {
        self.0.to_string()[..8].to_string()
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

/// Spatial transform: position, rotation, scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }
}

/// Which hand an input source is held in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Handedness {
    Left,
    Right,
}

impl Handedness {
    pub fn other(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

/// Position + orientation, without scale. Forward is -Z.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vec3,
    pub orientation: Quat,
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
        }
    }
}

impl Pose {
    pub fn new(position: Vec3, orientation: Quat) -> Self {
        Self {
            position,
            orientation,
        }
    }

    pub fn forward(&self) -> Vec3 {
        self.orientation * Vec3::NEG_Z
    }

    pub fn right(&self) -> Vec3 {
        self.orientation * Vec3::X
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.orientation, self.position)
    }

    /// The ray this pose points along.
    pub fn ray(&self) -> Ray {
        Ray::new(self.position, self.forward())
    }

    /// Map a point from this pose's local space into the parent space.
    pub fn transform_point(&self, local: Vec3) -> Vec3 {
        self.position + self.orientation * local
    }

    /// Express a pose given in this pose's local space in the parent space.
    pub fn compose(&self, local: &Pose) -> Pose {
        Pose {
            position: self.transform_point(local.position),
            orientation: (self.orientation * local.orientation).normalize(),
        }
    }

    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.orientation.is_finite()
    }
}

/// A ray in 3D space. The direction is normalized on construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Project a direction onto the ground plane (Y = 0) and normalize it.
///
/// Returns `None` for directions that are (nearly) vertical.
pub fn flatten_direction(v: Vec3) -> Option<Vec3> {
    let flat = Vec3::new(v.x, 0.0, v.z);
    if flat.length_squared() < 1e-8 {
        None
    } else {
        Some(flat.normalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_id_uniqueness() {
        let a = ObjectId::new();
        let b = ObjectId::new();
        assert_ne!(a, b);
        assert_eq!(a.short().len(), 8);
    }

    #[test]
    fn transform_default_is_identity() {
        let t = Transform::default();
        assert_eq!(t.position, Vec3::ZERO);
        assert_eq!(t.rotation, Quat::IDENTITY);
        assert_eq!(t.scale, Vec3::ONE);
        assert_eq!(t.matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn pose_forward_is_negative_z() {
        let p = Pose::default();
        assert_eq!(p.forward(), Vec3::NEG_Z);
        assert_eq!(p.right(), Vec3::X);
    }

    #[test]
    fn pose_forward_follows_yaw() {
        let p = Pose::new(Vec3::ZERO, Quat::from_rotation_y(std::f32::consts::FRAC_PI_2));
        // Turning left by 90 degrees faces -X.
        assert!((p.forward() - Vec3::NEG_X).length() < 1e-6);
    }

    #[test]
    fn compose_applies_parent_yaw_and_offset() {
        let parent = Pose::new(
            Vec3::new(1.0, 0.0, 0.0),
            Quat::from_rotation_y(std::f32::consts::PI),
        );
        let child = parent.compose(&Pose::new(Vec3::new(0.0, 1.6, -1.0), Quat::IDENTITY));
        assert!((child.position - Vec3::new(1.0, 1.6, 1.0)).length() < 1e-5);
        assert!((child.forward() - Vec3::Z).length() < 1e-5);
    }

    #[test]
    fn flatten_drops_vertical_component() {
        let f = flatten_direction(Vec3::new(0.0, -0.5, -0.5)).unwrap();
        assert!((f - Vec3::NEG_Z).length() < 1e-6);
        assert!(flatten_direction(Vec3::Y).is_none());
    }

    #[test]
    fn handedness_serializes_lowercase() {
        let json = serde_json::to_string(&Handedness::Left).unwrap();
        assert_eq!(json, "\"left\"");
        assert_eq!(Handedness::Left.other(), Handedness::Right);
    }

    #[test]
    fn ray_direction_is_normalized() {
        let r = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -4.0));
        assert_eq!(r.direction, Vec3::NEG_Z);
        assert_eq!(r.at(2.0), Vec3::new(0.0, 0.0, -2.0));
    }
}

use glam::{Quat, Vec3};
use std::collections::BTreeMap;
use xrview_common::{ObjectId, Transform};

/// A box-shaped object in the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    pub name: String,
    pub transform: Transform,
    /// Half size along each local axis, before `transform.scale`.
    pub half_extents: Vec3,
    pub color: [f32; 4],
    pub pickable: bool,
}

impl SceneObject {
    pub fn cube(name: impl Into<String>, position: Vec3, size: f32, color: [f32; 4]) -> Self {
        Self {
            name: name.into(),
            transform: Transform::from_position(position),
            half_extents: Vec3::splat(size * 0.5),
            color,
            pickable: true,
        }
    }

    /// Half extents with the transform's scale applied.
    pub fn scaled_half_extents(&self) -> Vec3 {
        self.half_extents * self.transform.scale.abs()
    }
}

/// Sun-style light. `direction` points from the surface toward the light.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    pub direction: Vec3,
    pub intensity: f32,
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self {
            direction: Vec3::new(0.3, 1.0, 0.5).normalize(),
            intensity: 0.7,
        }
    }
}

/// The viewer's scene graph: a flat set of boxes plus lighting.
///
/// BTreeMap keeps iteration order stable between frames.
#[derive(Debug, Clone)]
pub struct Scene {
    objects: BTreeMap<ObjectId, SceneObject>,
    pub ambient: f32,
    pub sun: DirectionalLight,
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            objects: BTreeMap::new(),
            ambient: 0.3,
            sun: DirectionalLight::default(),
        }
    }
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// A small gallery: a ring of pillars around the origin and a few crates
    /// ahead of the starting position.
    pub fn demo() -> Self {
        let mut scene = Self::new();

        let ring = 8;
        for i in 0..ring {
            let angle = i as f32 / ring as f32 * std::f32::consts::TAU;
            let position = Vec3::new(angle.sin() * 8.0, 1.5, angle.cos() * 8.0);
            let mut pillar = SceneObject::cube(
                format!("Pillar {}", i + 1),
                position,
                1.0,
                [0.75, 0.72, 0.65, 1.0],
            );
            pillar.transform.scale = Vec3::new(0.6, 3.0, 0.6);
            pillar.transform.rotation = Quat::from_rotation_y(angle);
            scene.add(pillar);
        }

        scene.add(SceneObject::cube(
            "Red Crate",
            Vec3::new(-1.5, 0.5, -4.0),
            1.0,
            [0.85, 0.25, 0.2, 1.0],
        ));
        scene.add(SceneObject::cube(
            "Green Crate",
            Vec3::new(0.0, 0.5, -5.0),
            1.0,
            [0.3, 0.75, 0.35, 1.0],
        ));
        scene.add(SceneObject::cube(
            "Blue Crate",
            Vec3::new(1.5, 0.5, -4.0),
            1.0,
            [0.25, 0.45, 0.9, 1.0],
        ));

        let mut plinth = SceneObject::cube("Plinth", Vec3::new(0.0, 0.1, 0.0), 1.0, [0.4, 0.4, 0.45, 1.0]);
        plinth.half_extents = Vec3::new(1.5, 0.1, 1.5);
        plinth.pickable = false;
        scene.add(plinth);

        scene
    }

    pub fn add(&mut self, object: SceneObject) -> ObjectId {
        let id = ObjectId::new();
        tracing::trace!(id = %id.short(), name = %object.name, "scene object added");
        self.objects.insert(id, object);
        id
    }

    pub fn remove(&mut self, id: ObjectId) -> Option<SceneObject> {
        self.objects.remove(&id)
    }

    pub fn get(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.get(&id)
    }

    pub fn objects(&self) -> &BTreeMap<ObjectId, SceneObject> {
        &self.objects
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn find_by_name(&self, name: &str) -> Option<ObjectId> {
        self.objects
            .iter()
            .find(|(_, o)| o.name == name)
            .map(|(id, _)| *id)
    }
}

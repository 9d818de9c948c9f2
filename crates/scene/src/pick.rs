use glam::Vec3;
use xrview_common::{ObjectId, Ray};

use crate::scene::{Scene, SceneObject};

/// Nearest intersection of a ray with a pickable object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickHit {
    pub id: ObjectId,
    pub distance: f32,
    pub point: Vec3,
}

impl Scene {
    /// Closest pickable object hit by `ray`, if any.
    pub fn pick(&self, ray: &Ray) -> Option<PickHit> {
        if ray.direction == Vec3::ZERO {
            return None;
        }
        self.objects()
            .iter()
            .filter(|(_, o)| o.pickable)
            .filter_map(|(id, o)| {
                ray_box_distance(ray, o).map(|distance| PickHit {
                    id: *id,
                    distance,
                    point: ray.at(distance),
                })
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }
}

/// Slab test in the object's local frame. Rays starting inside hit at 0.
fn ray_box_distance(ray: &Ray, object: &SceneObject) -> Option<f32> {
    let inv_rot = object.transform.rotation.inverse();
    let origin = inv_rot * (ray.origin - object.transform.position);
    let dir = inv_rot * ray.direction;
    let half = object.scaled_half_extents();

    let mut t_min = f32::NEG_INFINITY;
    let mut t_max = f32::INFINITY;
    for axis in 0..3 {
        let (o, d, h) = (origin[axis], dir[axis], half[axis]);
        if d.abs() < 1e-8 {
            // Parallel to this slab.
            if o < -h || o > h {
                return None;
            }
            continue;
        }
        let t1 = (-h - o) / d;
        let t2 = (h - o) / d;
        t_min = t_min.max(t1.min(t2));
        t_max = t_max.min(t1.max(t2));
        if t_min > t_max {
            return None;
        }
    }

    if t_max < 0.0 {
        None
    } else {
        Some(t_min.max(0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;

    fn scene_with(objects: Vec<SceneObject>) -> (Scene, Vec<ObjectId>) {
        let mut s = Scene::new();
        let ids = objects.into_iter().map(|o| s.add(o)).collect();
        (s, ids)
    }

    #[test]
    fn picks_nearest_box() {
        let (scene, ids) = scene_with(vec![
            SceneObject::cube("far", Vec3::new(0.0, 0.0, -10.0), 1.0, [1.0; 4]),
            SceneObject::cube("near", Vec3::new(0.0, 0.0, -4.0), 1.0, [1.0; 4]),
        ]);
        let hit = scene.pick(&Ray::new(Vec3::ZERO, Vec3::NEG_Z)).unwrap();
        assert_eq!(hit.id, ids[1]);
        assert!((hit.distance - 3.5).abs() < 1e-5);
        assert!((hit.point - Vec3::new(0.0, 0.0, -3.5)).length() < 1e-5);
    }

    #[test]
    fn misses_return_none() {
        let (scene, _) = scene_with(vec![SceneObject::cube(
            "side",
            Vec3::new(5.0, 0.0, -4.0),
            1.0,
            [1.0; 4],
        )]);
        assert!(scene.pick(&Ray::new(Vec3::ZERO, Vec3::NEG_Z)).is_none());
        // Behind the ray origin.
        assert!(scene.pick(&Ray::new(Vec3::new(5.0, 0.0, 0.0), Vec3::Z)).is_none());
    }

    #[test]
    fn rotation_and_scale_are_respected() {
        let mut slab = SceneObject::cube("slab", Vec3::new(0.0, 0.0, -5.0), 1.0, [1.0; 4]);
        slab.transform.scale = Vec3::new(4.0, 1.0, 1.0);
        slab.transform.rotation = Quat::from_rotation_y(std::f32::consts::FRAC_PI_2);
        let (scene, _) = scene_with(vec![slab]);

        // Rotated a quarter turn, the long side runs along Z: near face at z = -3.
        let hit = scene.pick(&Ray::new(Vec3::ZERO, Vec3::NEG_Z)).unwrap();
        assert!((hit.distance - 3.0).abs() < 1e-4);
        // And it is only 1 wide along X now.
        assert!(scene.pick(&Ray::new(Vec3::new(1.0, 0.0, 0.0), Vec3::NEG_Z)).is_none());
    }

    #[test]
    fn non_pickable_objects_are_ignored() {
        let mut floor = SceneObject::cube("floor", Vec3::new(0.0, 0.0, -4.0), 1.0, [1.0; 4]);
        floor.pickable = false;
        let (scene, _) = scene_with(vec![floor]);
        assert!(scene.pick(&Ray::new(Vec3::ZERO, Vec3::NEG_Z)).is_none());
    }

    #[test]
    fn ray_inside_box_hits_at_zero() {
        let (scene, ids) = scene_with(vec![SceneObject::cube("room", Vec3::ZERO, 4.0, [1.0; 4])]);
        let hit = scene.pick(&Ray::new(Vec3::ZERO, Vec3::X)).unwrap();
        assert_eq!(hit.id, ids[0]);
        assert_eq!(hit.distance, 0.0);
    }
}

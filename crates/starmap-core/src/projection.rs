//! Camera projection between world space and screen pixels

use glam::{Mat4, Vec3, Vec4};

/// A perspective camera as seen by the projector
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraView {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view in radians
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl CameraView {
    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect.max(f32::EPSILON), self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection() * self.view()
    }

    /// Unit vector the camera is looking along
    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize_or_zero()
    }

    /// Project a world point into pixel coordinates (y grows downward)
    pub fn world_to_screen(&self, world: Vec3, width: f32, height: f32) -> ScreenPoint {
        let clip = self.view_projection() * world.extend(1.0);
        let behind_camera = clip.w <= 0.0;
        let w = if clip.w.abs() <= f32::EPSILON { f32::EPSILON } else { clip.w };
        let ndc_x = clip.x / w;
        let ndc_y = clip.y / w;

        ScreenPoint {
            x: (ndc_x * 0.5 + 0.5) * width,
            y: (-ndc_y * 0.5 + 0.5) * height,
            facing: self.forward().dot(world.normalize_or_zero()),
            behind_camera,
        }
    }

    /// Build a world-space ray through a pixel
    pub fn screen_to_ray(&self, x: f32, y: f32, width: f32, height: f32) -> Ray {
        let ndc_x = x / width.max(1.0) * 2.0 - 1.0;
        let ndc_y = -(y / height.max(1.0) * 2.0 - 1.0);
        let inverse = self.view_projection().inverse();
        let near = unproject(inverse, Vec4::new(ndc_x, ndc_y, 0.0, 1.0));
        let far = unproject(inverse, Vec4::new(ndc_x, ndc_y, 1.0, 1.0));
        Ray {
            origin: near,
            direction: (far - near).normalize_or_zero(),
        }
    }
}

fn unproject(inverse: Mat4, ndc: Vec4) -> Vec3 {
    let world = inverse * ndc;
    world.truncate() / world.w
}

/// Result of projecting a world point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
    /// Dot of the camera forward vector with the point's radial normal
    pub facing: f32,
    pub behind_camera: bool,
}

impl ScreenPoint {
    /// Whether the point sits on the far side of the globe from the camera
    pub fn facing_away(&self, threshold: f32) -> bool {
        self.facing > threshold
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Distance along the ray and squared miss distance of the closest approach to `point`
    pub fn closest_approach(&self, point: Vec3) -> (f32, f32) {
        let t = (point - self.origin).dot(self.direction);
        let closest = self.origin + self.direction * t;
        (t, (closest - point).length_squared())
    }
}

/// Pick the nearest candidate within `radius` of the ray and in front of it
pub fn pick_nearest<K, I>(ray: &Ray, candidates: I, radius: f32) -> Option<K>
where
    I: IntoIterator<Item = (K, Vec3)>,
{
    let mut closest: Option<(f32, K)> = None;

    for (key, position) in candidates {
        let (t, distance_sq) = ray.closest_approach(position);
        if t < 0.0 || distance_sq >= radius * radius {
            continue;
        }
        if closest.as_ref().is_none_or(|(best, _)| t < *best) {
            closest = Some((t, key));
        }
    }

    closest.map(|(_, key)| key)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view() -> CameraView {
        CameraView {
            position: Vec3::new(0.0, 1.0, 7.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov_y: 45f32.to_radians(),
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 100.0,
        }
    }

    #[test]
    fn test_view_axis_projects_to_center() {
        let camera = view();
        let p = camera.world_to_screen(camera.target, 1600.0, 900.0);
        assert!((p.x - 800.0).abs() < 1e-2);
        assert!((p.y - 450.0).abs() < 1e-2);
        assert!(!p.behind_camera);
    }

    #[test]
    fn test_screen_center_ray_roundtrip() {
        let camera = view();
        let ray = camera.screen_to_ray(800.0, 450.0, 1600.0, 900.0);
        assert!(ray.direction.abs_diff_eq(camera.forward(), 1e-4));

        // A point further along the centre ray projects back to the centre
        let point = ray.origin + ray.direction * 5.0;
        let p = camera.world_to_screen(point, 1600.0, 900.0);
        assert!((p.x - 800.0).abs() < 1e-2);
        assert!((p.y - 450.0).abs() < 1e-2);
    }

    #[test]
    fn test_y_axis_flips() {
        let camera = view();
        let above = camera.world_to_screen(Vec3::new(0.0, 1.0, 0.0), 1600.0, 900.0);
        assert!(above.y < 450.0);
        let right = camera.world_to_screen(Vec3::new(1.0, 0.0, 0.0), 1600.0, 900.0);
        assert!(right.x > 800.0);
    }

    #[test]
    fn test_far_side_faces_away() {
        let camera = view();
        let near_side = camera.world_to_screen(Vec3::new(0.0, 0.0, 1.8), 100.0, 100.0);
        let far_side = camera.world_to_screen(Vec3::new(0.0, 0.0, -1.8), 100.0, 100.0);
        assert!(!near_side.facing_away(0.2));
        assert!(far_side.facing_away(0.2));
    }

    #[test]
    fn test_behind_camera() {
        let camera = view();
        let p = camera.world_to_screen(Vec3::new(0.0, 1.0, 20.0), 100.0, 100.0);
        assert!(p.behind_camera);
    }

    #[test]
    fn test_pick_nearest_prefers_closest() {
        let ray = Ray {
            origin: Vec3::new(0.0, 0.0, 10.0),
            direction: Vec3::NEG_Z,
        };
        let candidates = vec![
            ("far", Vec3::new(0.0, 0.0, -1.0)),
            ("near", Vec3::new(0.05, 0.0, 1.0)),
            ("miss", Vec3::new(1.0, 0.0, 2.0)),
            ("behind", Vec3::new(0.0, 0.0, 12.0)),
        ];
        assert_eq!(pick_nearest(&ray, candidates, 0.1), Some("near"));
    }

    #[test]
    fn test_pick_nothing() {
        let ray = Ray {
            origin: Vec3::ZERO,
            direction: Vec3::X,
        };
        assert_eq!(pick_nearest(&ray, vec![(1, Vec3::Y)], 0.1), None);
    }
}

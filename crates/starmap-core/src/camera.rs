//! Camera director - idle rotation, orbit input and cancellable fly-to

use glam::{Quat, Vec3};
use tracing::debug;

use crate::config::{CameraConfig, LayoutMode};
use crate::projection::CameraView;
use crate::tween::{Easing, Lerp, Tween};

/// Camera position plus the point it looks at
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub target: Vec3,
}

impl CameraPose {
    pub fn new(position: Vec3, target: Vec3) -> Self {
        Self { position, target }
    }
}

impl Lerp for CameraPose {
    fn lerp(self, end: Self, t: f32) -> Self {
        Self {
            position: self.position.lerp(end.position, t),
            target: self.target.lerp(end.target, t),
        }
    }
}

/// Owns the single scene camera and every write to its pose
#[derive(Debug, Clone)]
pub struct CameraDirector {
    pose: CameraPose,
    fly: Option<Tween<CameraPose>>,
    orbit_enabled: bool,
    fov_y: f32,
    aspect: f32,
    near: f32,
    far: f32,
    min_polar: f32,
    max_polar: f32,
}

impl CameraDirector {
    pub fn new(pose: CameraPose, config: &CameraConfig) -> Self {
        Self {
            pose,
            fly: None,
            orbit_enabled: true,
            fov_y: config.fov_degrees.to_radians(),
            aspect: 16.0 / 9.0,
            near: config.near,
            far: config.far,
            min_polar: config.min_polar,
            max_polar: config.max_polar,
        }
    }

    pub fn pose(&self) -> CameraPose {
        self.pose
    }

    pub fn is_flying(&self) -> bool {
        self.fly.is_some()
    }

    /// Destination of the in-flight animation, if any
    pub fn fly_target(&self) -> Option<CameraPose> {
        self.fly.map(|t| t.end)
    }

    pub fn orbit_enabled(&self) -> bool {
        self.orbit_enabled
    }

    pub fn view(&self) -> CameraView {
        CameraView {
            position: self.pose.position,
            target: self.pose.target,
            up: Vec3::Y,
            fov_y: self.fov_y,
            aspect: self.aspect,
            near: self.near,
            far: self.far,
        }
    }

    /// Update the aspect ratio without touching any animation
    pub fn resize(&mut self, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 {
            self.aspect = width / height;
        }
    }

    /// Replace any in-flight fly with a new one starting from the current pose.
    /// Orbit input stays disabled until the fly completes or is cancelled.
    pub fn fly_to(&mut self, target: CameraPose, duration_ms: f64, now_ms: f64) {
        if self.fly.is_some() {
            debug!("Replacing in-flight camera animation");
        }
        self.fly = Some(Tween::new(
            self.pose,
            target,
            now_ms,
            duration_ms,
            Easing::EaseInOutCubic,
        ));
        self.orbit_enabled = false;
    }

    /// Drop the in-flight fly where it is and hand control back to the user
    pub fn cancel(&mut self) {
        if self.fly.take().is_some() {
            self.orbit_enabled = true;
        }
    }

    /// Advance the fly animation. Returns true on the frame it completes.
    pub fn tick(&mut self, now_ms: f64) -> bool {
        let Some(fly) = self.fly else {
            return false;
        };
        self.pose = fly.sample(now_ms);
        if fly.is_finished(now_ms) {
            self.fly = None;
            self.orbit_enabled = true;
            return true;
        }
        false
    }

    /// Rotate the camera around the vertical axis through its target
    pub fn idle_rotate(&mut self, delta_angle: f32) {
        let rotation = Quat::from_rotation_y(delta_angle);
        let offset = self.pose.position - self.pose.target;
        self.pose.position = self.pose.target + rotation * offset;
    }

    /// Apply a user drag around the target. Ignored while flying.
    pub fn orbit(&mut self, delta_azimuth: f32, delta_polar: f32) {
        if !self.orbit_enabled {
            return;
        }
        let offset = self.pose.position - self.pose.target;
        let radius = offset.length();
        if radius <= f32::EPSILON {
            return;
        }
        let polar = (offset.y / radius).clamp(-1.0, 1.0).acos();
        let azimuth = offset.x.atan2(offset.z);
        let polar = (polar + delta_polar).clamp(self.min_polar, self.max_polar);
        let azimuth = azimuth + delta_azimuth;
        self.pose.position = self.pose.target
            + Vec3::new(
                radius * polar.sin() * azimuth.sin(),
                radius * polar.cos(),
                radius * polar.sin() * azimuth.cos(),
            );
    }
}

/// Fixed overview pose
pub fn overview_pose(config: &CameraConfig) -> CameraPose {
    CameraPose::new(Vec3::from_array(config.overview_position), Vec3::ZERO)
}

/// Pose framing a mission marker
pub fn mission_pose(position: Vec3, mode: LayoutMode, config: &CameraConfig) -> CameraPose {
    match mode {
        LayoutMode::Globe => {
            let mut eye = position.normalize_or_zero() * config.distance;
            eye.y += config.lift;
            CameraPose::new(eye, Vec3::ZERO)
        }
        LayoutMode::Galaxy => CameraPose::new(
            position + Vec3::from_array(config.mission_offset),
            position,
        ),
    }
}

/// Pose above and behind a sector centre, looking at it
pub fn sector_pose(center: Vec3, config: &CameraConfig) -> CameraPose {
    CameraPose::new(center + Vec3::from_array(config.sector_offset), center)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn director() -> CameraDirector {
        let config = CameraConfig::default();
        CameraDirector::new(CameraPose::new(Vec3::new(0.0, 1.0, 7.0), Vec3::ZERO), &config)
    }

    #[test]
    fn test_fly_reaches_target_exactly_once() {
        let mut camera = director();
        let target = CameraPose::new(Vec3::new(7.0, 0.6, 0.0), Vec3::ZERO);
        camera.fly_to(target, 1200.0, 0.0);
        assert!(camera.is_flying());
        assert!(!camera.orbit_enabled());

        assert!(!camera.tick(600.0));
        assert!(camera.is_flying());
        assert!(camera.tick(1200.0));
        assert!(!camera.tick(1300.0));
        assert_eq!(camera.pose(), target);
        assert!(camera.orbit_enabled());
    }

    #[test]
    fn test_new_fly_replaces_previous() {
        let mut camera = director();
        let a = CameraPose::new(Vec3::new(-7.0, 0.0, 0.0), Vec3::ZERO);
        let b = CameraPose::new(Vec3::new(7.0, 2.0, 0.0), Vec3::Y);
        camera.fly_to(a, 1000.0, 0.0);
        camera.tick(300.0);
        camera.fly_to(b, 1000.0, 300.0);
        assert_eq!(camera.fly_target(), Some(b));

        let mut t = 300.0;
        while camera.is_flying() {
            t += 16.0;
            camera.tick(t);
        }
        assert_eq!(camera.pose(), b);
        assert_ne!(camera.pose(), a);
    }

    #[test]
    fn test_cancel_reenables_orbit() {
        let mut camera = director();
        camera.fly_to(CameraPose::new(Vec3::X * 7.0, Vec3::ZERO), 1000.0, 0.0);
        camera.cancel();
        assert!(!camera.is_flying());
        assert!(camera.orbit_enabled());
    }

    #[test]
    fn test_orbit_ignored_while_flying() {
        let mut camera = director();
        camera.fly_to(CameraPose::new(Vec3::X * 7.0, Vec3::ZERO), 1000.0, 0.0);
        let before = camera.pose();
        camera.orbit(0.5, 0.1);
        assert_eq!(camera.pose(), before);
    }

    #[test]
    fn test_orbit_clamps_polar() {
        let mut camera = director();
        camera.orbit(0.0, -10.0);
        let offset = camera.pose().position;
        let polar = (offset.y / offset.length()).acos();
        assert!((polar - std::f32::consts::PI * 0.2).abs() < 1e-4);
        assert!((offset.length() - Vec3::new(0.0, 1.0, 7.0).length()).abs() < 1e-4);
    }

    #[test]
    fn test_idle_rotate_keeps_distance() {
        let mut camera = director();
        let before = camera.pose().position.length();
        camera.idle_rotate(0.5);
        assert!((camera.pose().position.length() - before).abs() < 1e-4);
        assert!((camera.pose().position.y - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_resize_keeps_animation() {
        let mut camera = director();
        camera.fly_to(CameraPose::new(Vec3::X * 7.0, Vec3::ZERO), 1000.0, 0.0);
        camera.resize(800.0, 400.0);
        assert!(camera.is_flying());
        assert_eq!(camera.view().aspect, 2.0);
    }

    #[test]
    fn test_globe_mission_pose() {
        let config = CameraConfig::default();
        let pose = mission_pose(Vec3::new(1.84, 0.0, 0.0), LayoutMode::Globe, &config);
        assert!(pose.position.abs_diff_eq(Vec3::new(7.0, 0.6, 0.0), 1e-5));
        assert_eq!(pose.target, Vec3::ZERO);
    }
}

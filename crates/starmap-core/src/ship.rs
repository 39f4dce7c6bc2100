//! Mascot ship - idle bobbing, cancellable fly-to, and facing logic

use glam::{Mat3, Quat, Vec3};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use crate::config::{LayoutMode, ShipConfig};
use crate::coords::spherical_to_cartesian;
use crate::tween::{Easing, Tween};

/// Ship name used until (or unless) a name list is loaded
pub const FALLBACK_NAME: &str = "UNNAMED";

#[derive(Debug, Clone)]
pub struct ShipAnimator {
    name: String,
    mode: LayoutMode,
    /// Position without the idle bob applied
    anchor: Vec3,
    orientation: Quat,
    fly: Option<Tween<Vec3>>,
    bob_amplitude: f32,
    bob_speed: f32,
    bob_offset: Vec3,
}

impl ShipAnimator {
    pub fn new(name: String, home: Vec3, mode: LayoutMode, config: &ShipConfig) -> Self {
        let up = local_up(mode, home);
        Self {
            name,
            mode,
            anchor: home,
            orientation: look_rotation(tangent_forward(up), up),
            fly: None,
            bob_amplitude: config.bob_amplitude,
            bob_speed: config.bob_speed,
            bob_offset: Vec3::ZERO,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rename(&mut self, name: String) {
        self.name = name;
    }

    /// Rendered position, including the idle bob
    pub fn position(&self) -> Vec3 {
        self.anchor + self.bob_offset
    }

    pub fn anchor(&self) -> Vec3 {
        self.anchor
    }

    pub fn orientation(&self) -> Quat {
        self.orientation
    }

    pub fn is_flying(&self) -> bool {
        self.fly.is_some()
    }

    pub fn fly_target(&self) -> Option<Vec3> {
        self.fly.map(|t| t.end)
    }

    /// Replace any in-flight fly with a new one from the current anchor
    pub fn fly_to(&mut self, target: Vec3, duration_ms: f64, now_ms: f64) {
        if self.fly.is_some() {
            debug!("Replacing in-flight ship animation");
        }
        self.fly = Some(Tween::new(
            self.anchor,
            target,
            now_ms,
            duration_ms,
            Easing::EaseInOutCubic,
        ));
    }

    /// Advance the fly animation and the idle bob. Returns true on arrival.
    pub fn tick(&mut self, now_ms: f64, clock: f32) -> bool {
        let mut arrived = false;
        if let Some(fly) = self.fly {
            let previous = self.anchor;
            self.anchor = self.sample_fly(&fly, now_ms);
            let up = local_up(self.mode, self.anchor);
            let travel = self.anchor - previous;
            let forward = match self.mode {
                // Along the great circle toward the destination, upright on the surface
                LayoutMode::Globe => travel - up * up.dot(travel),
                LayoutMode::Galaxy => travel,
            };
            if forward.length_squared() > 1e-10 {
                self.orientation = look_rotation(forward, up);
            }
            if fly.is_finished(now_ms) {
                self.fly = None;
                arrived = true;
            }
        }

        let up = local_up(self.mode, self.anchor);
        self.bob_offset = up * (clock * self.bob_speed).sin() * self.bob_amplitude;
        arrived
    }
}

impl ShipAnimator {
    fn sample_fly(&self, fly: &Tween<Vec3>, now_ms: f64) -> Vec3 {
        match self.mode {
            LayoutMode::Galaxy => fly.sample(now_ms),
            LayoutMode::Globe => {
                if fly.is_finished(now_ms) {
                    return fly.end;
                }
                let t = fly.easing.apply(fly.progress(now_ms));
                arc_lerp(fly.start, fly.end, t)
            }
        }
    }
}

/// Interpolate direction along the great circle and radius linearly, so a
/// path between two points above a sphere never dips toward its centre.
/// Antipodal endpoints take an arbitrary but fixed great circle.
pub fn arc_lerp(start: Vec3, end: Vec3, t: f32) -> Vec3 {
    let start_radius = start.length();
    let end_radius = end.length();
    if start_radius <= f32::EPSILON || end_radius <= f32::EPSILON {
        return start.lerp(end, t);
    }
    let from = start / start_radius;
    let to = end / end_radius;
    let angle = from.dot(to).clamp(-1.0, 1.0).acos();
    let axis = from.cross(to);
    let axis = if axis.length_squared() > 1e-10 {
        axis.normalize()
    } else {
        from.any_orthonormal_vector()
    };
    let direction = Quat::from_axis_angle(axis, angle * t) * from;
    direction * (start_radius + (end_radius - start_radius) * t)
}

/// Pick the ship name once from the provided list
pub fn choose_name<R: Rng + ?Sized>(names: &[String], rng: &mut R) -> String {
    names
        .choose(rng)
        .cloned()
        .unwrap_or_else(|| FALLBACK_NAME.to_string())
}

/// Default hover position for the given layout
pub fn home_position(mode: LayoutMode, config: &ShipConfig, globe_radius: f32) -> Vec3 {
    match mode {
        LayoutMode::Globe => {
            let [lat, lon] = config.home_lat_lon;
            spherical_to_cartesian(lat, lon, globe_radius + config.altitude)
        }
        LayoutMode::Galaxy => Vec3::from_array(config.home),
    }
}

/// Where the ship parks when visiting a point
pub fn park_position(mode: LayoutMode, point: Vec3, config: &ShipConfig) -> Vec3 {
    point + local_up(mode, point) * config.park_height
}

/// Radial up on the globe, world up in the galaxy
pub fn local_up(mode: LayoutMode, position: Vec3) -> Vec3 {
    match mode {
        LayoutMode::Globe => {
            let n = position.normalize_or_zero();
            if n == Vec3::ZERO { Vec3::Y } else { n }
        }
        LayoutMode::Galaxy => Vec3::Y,
    }
}

fn tangent_forward(up: Vec3) -> Vec3 {
    let candidate = Vec3::Z - up * up.dot(Vec3::Z);
    if candidate.length_squared() > 1e-6 {
        candidate
    } else {
        up.any_orthonormal_vector()
    }
}

/// Rotation taking local -Z to `forward` and local +Y as close to `up` as possible
pub fn look_rotation(forward: Vec3, up: Vec3) -> Quat {
    let back = -forward.normalize_or_zero();
    if back == Vec3::ZERO {
        return Quat::IDENTITY;
    }
    let mut right = up.cross(back);
    if right.length_squared() <= 1e-8 {
        right = back.any_orthonormal_vector();
    }
    let right = right.normalize();
    let up = back.cross(right);
    Quat::from_mat3(&Mat3::from_cols(right, up, back))
}

//! Domain coordinates to world positions

use glam::Vec3;
use std::f32::consts::{PI, TAU};

/// Map a latitude/longitude in degrees onto a sphere of the given radius.
///
/// Y is up. The poles (lat = ±90) land on the Y axis regardless of longitude.
pub fn spherical_to_cartesian(lat: f32, lon: f32, radius: f32) -> Vec3 {
    let phi = (90.0 - lat).to_radians();
    let theta = (lon + 180.0).to_radians();
    Vec3::new(
        -radius * phi.sin() * theta.cos(),
        radius * phi.cos(),
        radius * phi.sin() * theta.sin(),
    )
}

/// Inverse of [`spherical_to_cartesian`], returning (lat, lon) in degrees
pub fn cartesian_to_spherical(position: Vec3) -> (f32, f32) {
    let radius = position.length();
    if radius <= f32::EPSILON {
        return (0.0, 0.0);
    }
    let lat = 90.0 - (position.y / radius).clamp(-1.0, 1.0).acos().to_degrees();
    let theta = position.z.atan2(-position.x);
    let mut lon = theta.to_degrees() - 180.0;
    if lon < -180.0 {
        lon += 360.0;
    }
    (lat, lon)
}

/// Stable 32-bit polynomial rolling hash (`h = h * 31 + c`) over UTF-16 units
pub fn hash_id(id: &str) -> i32 {
    id.encode_utf16()
        .fold(0i32, |hash, unit| hash.wrapping_mul(31).wrapping_add(unit as i32))
}

/// Reproducible (angle, radius) inside a disk of `usable_radius`.
///
/// Radius is never below a quarter of the disk so planets don't pile up on
/// the sector centre.
pub fn hash_to_angle_and_radius(id: &str, usable_radius: f32) -> (f32, f32) {
    let hash = hash_id(id).unsigned_abs();
    let angle = (hash % 3600) as f32 / 3600.0 * TAU;
    let spread = ((hash / 3600) % 1000) as f32 / 1000.0;
    let radius = usable_radius * (0.25 + 0.75 * spread.sqrt());
    (angle, radius)
}

/// Centre of sector `index` out of `count`, evenly spaced on a ring.
///
/// Index 0 points down -Z, away from a default camera sitting on +Z.
pub fn ring_position(index: usize, count: usize, ring_radius: f32) -> Vec3 {
    if count == 0 {
        return Vec3::ZERO;
    }
    let angle = PI + index as f32 * TAU / count as f32;
    Vec3::new(ring_radius * angle.sin(), 0.0, ring_radius * angle.cos())
}

/// Scatter position of a mission inside its sector
pub fn scatter_in_sector(id: &str, center: Vec3, usable_radius: f32) -> Vec3 {
    let (angle, radius) = hash_to_angle_and_radius(id, usable_radius);
    // Small vertical wobble derived from the same hash keeps the disk from looking flat
    let wobble = ((hash_id(id).unsigned_abs() % 97) as f32 / 97.0 - 0.5) * usable_radius * 0.2;
    center + Vec3::new(angle.cos() * radius, wobble, angle.sin() * radius)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spherical_magnitude() {
        let r = 1.8;
        for lat in (-90..=90).step_by(15) {
            for lon in (-180..=180).step_by(20) {
                let v = spherical_to_cartesian(lat as f32, lon as f32, r);
                assert!((v.length() - r).abs() < 1e-4, "lat={lat} lon={lon} len={}", v.length());
            }
        }
    }

    #[test]
    fn test_poles_ignore_longitude() {
        for lon in [-180.0, -45.0, 0.0, 90.0, 180.0] {
            let north = spherical_to_cartesian(90.0, lon, 2.0);
            assert!(north.abs_diff_eq(Vec3::new(0.0, 2.0, 0.0), 1e-5));
            let south = spherical_to_cartesian(-90.0, lon, 2.0);
            assert!(south.abs_diff_eq(Vec3::new(0.0, -2.0, 0.0), 1e-5));
        }
    }

    #[test]
    fn test_lat_lon_roundtrip() {
        for (lat, lon) in [(10.0, 20.0), (-35.0, 135.0), (50.0, -100.0), (0.0, 0.0)] {
            let (lat2, lon2) = cartesian_to_spherical(spherical_to_cartesian(lat, lon, 3.0));
            assert!((lat - lat2).abs() < 1e-3);
            assert!((lon - lon2).abs() < 1e-3);
        }
    }

    #[test]
    fn test_hash_is_stable() {
        // Same values as the browser string hash
        assert_eq!(hash_id(""), 0);
        assert_eq!(hash_id("a"), 97);
        assert_eq!(hash_id("ab"), 97 * 31 + 98);
        assert_eq!(hash_id("about"), hash_id("about"));
        assert_ne!(hash_id("about"), hash_id("abouT"));
    }

    #[test]
    fn test_hash_scatter_stays_in_disk() {
        for id in ["m1", "project-omega", "homelab", "contact", "x"] {
            let (angle, radius) = hash_to_angle_and_radius(id, 1.2);
            assert!((0.0..TAU).contains(&angle));
            assert!(radius >= 0.3 - 1e-6 && radius <= 1.2 + 1e-6);
        }
    }

    #[test]
    fn test_ring_layout_order() {
        let first = ring_position(0, 4, 6.0);
        assert!(first.abs_diff_eq(Vec3::new(0.0, 0.0, -6.0), 1e-4));
        let second = ring_position(1, 4, 6.0);
        assert!(second.abs_diff_eq(Vec3::new(-6.0, 0.0, 0.0), 1e-4));
        for i in 0..4 {
            assert!((ring_position(i, 4, 6.0).length() - 6.0).abs() < 1e-4);
        }
    }
}

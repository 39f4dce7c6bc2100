//! Per-marker visual state
//!
//! Every marker is either idling (a shared low-amplitude glitch flicker) or
//! selected (a smooth pulse in the accent colour). At most one marker is
//! selected at any time. Both modes are driven by the scene's animation clock
//! rather than wall-clock time, so pausing rendering keeps phases in sync.

use glam::Vec3;

use crate::types::MissionId;

/// Idle marker colour (#00f0ff)
pub const IDLE_COLOR: [f32; 3] = [0.0, 0.941, 1.0];
/// Selected marker colour (#ff6b35)
pub const SELECTED_COLOR: [f32; 3] = [1.0, 0.42, 0.208];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VisualMode {
    #[default]
    Idle,
    Selected,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarkerVisual {
    pub mission: MissionId,
    pub position: Vec3,
    pub mode: VisualMode,
    /// Per-marker phase offset so the ensemble doesn't pulse in lockstep
    pub phase: f32,
}

/// What the renderer should draw for one marker this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerSample {
    pub scale: f32,
    pub intensity: f32,
    pub color: [f32; 3],
}

#[derive(Debug, Clone, Default)]
pub struct MarkerSet {
    markers: Vec<MarkerVisual>,
}

impl MarkerSet {
    pub fn new<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (MissionId, Vec3)>,
    {
        let markers = entries
            .into_iter()
            .enumerate()
            .map(|(i, (mission, position))| MarkerVisual {
                mission,
                position,
                mode: VisualMode::Idle,
                phase: i as f32 * 1.2,
            })
            .collect();
        Self { markers }
    }

    pub fn iter(&self) -> impl Iterator<Item = &MarkerVisual> {
        self.markers.iter()
    }

    pub fn get(&self, id: &MissionId) -> Option<&MarkerVisual> {
        self.markers.iter().find(|m| &m.mission == id)
    }

    pub fn is_selected(&self, id: &MissionId) -> bool {
        self.get(id).is_some_and(|m| m.mode == VisualMode::Selected)
    }

    pub fn selected(&self) -> Option<&MissionId> {
        self.markers
            .iter()
            .find(|m| m.mode == VisualMode::Selected)
            .map(|m| &m.mission)
    }

    pub fn selected_count(&self) -> usize {
        self.markers.iter().filter(|m| m.mode == VisualMode::Selected).count()
    }

    /// Select exactly `id`, reverting every other marker to idle.
    /// `None` (or an unknown id) leaves every marker idle.
    pub fn select_exclusive(&mut self, id: Option<&MissionId>) {
        for marker in &mut self.markers {
            marker.mode = if Some(&marker.mission) == id {
                VisualMode::Selected
            } else {
                VisualMode::Idle
            };
        }
    }

    pub fn sample(&self, id: &MissionId, clock: f32) -> Option<MarkerSample> {
        self.get(id).map(|m| sample_visual(m.mode, m.phase, clock))
    }
}

/// Evaluate the visual formula for one marker
pub fn sample_visual(mode: VisualMode, phase: f32, clock: f32) -> MarkerSample {
    match mode {
        VisualMode::Idle => {
            let pulse = (clock * 2.0 + phase).sin() * 0.2;
            // Quantized time so the flicker jumps instead of sliding
            let step = (clock * 12.0).floor();
            let noise = glitch_noise(step + phase * 7.0);
            let jitter = if noise > 0.9 { (noise - 0.9) * 1.5 } else { 0.0 };
            MarkerSample {
                scale: 1.0 + pulse + jitter,
                intensity: 0.55 + 0.45 * glitch_noise(step * 0.37 + phase),
                color: IDLE_COLOR,
            }
        }
        VisualMode::Selected => {
            let pulse = (clock * 4.0).sin() * 0.5 + 0.5;
            MarkerSample {
                scale: 1.3 + pulse * 0.35,
                intensity: 0.8 + pulse * 0.2,
                color: SELECTED_COLOR,
            }
        }
    }
}

/// Cheap deterministic hash noise in [0, 1)
fn glitch_noise(x: f32) -> f32 {
    ((x * 12.9898).sin() * 43_758.547).fract().abs()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set() -> MarkerSet {
        MarkerSet::new(vec![
            (MissionId::from("a"), Vec3::X),
            (MissionId::from("b"), Vec3::Y),
            (MissionId::from("c"), Vec3::Z),
        ])
    }

    #[test]
    fn test_selection_is_exclusive() {
        let mut markers = set();
        markers.select_exclusive(Some(&"a".into()));
        markers.select_exclusive(Some(&"c".into()));
        assert_eq!(markers.selected_count(), 1);
        assert!(markers.is_selected(&"c".into()));
        assert!(!markers.is_selected(&"a".into()));

        markers.select_exclusive(None);
        assert_eq!(markers.selected_count(), 0);
    }

    #[test]
    fn test_unknown_selection_clears() {
        let mut markers = set();
        markers.select_exclusive(Some(&"a".into()));
        markers.select_exclusive(Some(&"zzz".into()));
        assert_eq!(markers.selected_count(), 0);
    }

    #[test]
    fn test_sample_depends_only_on_clock() {
        let markers = set();
        let a = markers.sample(&"b".into(), 3.25).unwrap();
        let b = markers.sample(&"b".into(), 3.25).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_modes_are_distinct() {
        for i in 0..50 {
            let clock = i as f32 * 0.173;
            let idle = sample_visual(VisualMode::Idle, 0.0, clock);
            let selected = sample_visual(VisualMode::Selected, 0.0, clock);
            assert_eq!(idle.color, IDLE_COLOR);
            assert_eq!(selected.color, SELECTED_COLOR);
            assert!((0.55..=1.0).contains(&idle.intensity));
            assert!(selected.scale >= 1.3);
        }
    }

    #[test]
    fn test_noise_range() {
        for i in 0..200 {
            let n = glitch_noise(i as f32 * 0.731);
            assert!((0.0..1.0).contains(&n));
        }
    }
}

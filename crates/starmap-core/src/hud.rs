//! HUD projector - screen placement and visibility of overlay labels

use chrono::{DateTime, Utc};
use glam::Vec3;

use crate::config::HudConfig;
use crate::projection::CameraView;
use crate::tween::{Easing, Tween};
use crate::types::{MissionId, SectorId};

/// Viewport-dependent layout used for panel occlusion
#[derive(Debug, Clone, PartialEq)]
pub struct HudLayout {
    pub screen_width: f32,
    pub screen_height: f32,
    pub is_mobile: bool,
    pub panel_fraction: f32,
    mobile_width: f32,
}

impl HudLayout {
    pub fn new(config: &HudConfig) -> Self {
        let mut layout = Self {
            screen_width: 1920.0,
            screen_height: 1080.0,
            is_mobile: false,
            panel_fraction: config.panel_fraction,
            mobile_width: config.mobile_width,
        };
        layout.update_for_screen(1920.0, 1080.0);
        layout
    }

    pub fn update_for_screen(&mut self, width: f32, height: f32) {
        self.screen_width = width;
        self.screen_height = height;
        self.is_mobile = width < self.mobile_width || (width < height && width < 600.0);
    }

    /// Left edge of the side panel in pixels
    pub fn panel_left(&self) -> f32 {
        self.screen_width * (1.0 - self.panel_fraction)
    }

    pub fn panel_width(&self) -> f32 {
        self.screen_width * self.panel_fraction
    }

    /// Whether a point sits under the side panel (desktop only)
    pub fn under_panel(&self, x: f32, panel_open: bool) -> bool {
        panel_open && !self.is_mobile && x >= self.panel_left()
    }
}

/// Identifies which overlay element a placement belongs to
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OverlayKey {
    Mission(MissionId),
    Sector(SectorId),
    Ship,
}

/// Pixel placement of one overlay element for this frame
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayPlacement {
    pub key: OverlayKey,
    pub x: f32,
    pub y: f32,
    pub hidden: bool,
}

/// A 3D anchor the projector should place an overlay for
#[derive(Debug, Clone, PartialEq)]
pub struct TrackedAnchor {
    pub key: OverlayKey,
    pub position: Vec3,
    /// Label suppressed by navigation state regardless of geometry
    pub suppressed: bool,
}

/// Per-frame inputs shared by every anchor
#[derive(Debug, Clone, Copy)]
pub struct ProjectionContext<'a> {
    pub camera: &'a CameraView,
    pub layout: &'a HudLayout,
    /// Whether back-facing points (far side of the globe) are occluded
    pub occlude_back_faces: bool,
    pub occlusion_threshold: f32,
    pub panel_open: bool,
}

/// Project every anchor and compute its hidden flag
pub fn project_overlays<'a, I>(anchors: I, ctx: ProjectionContext<'_>) -> Vec<OverlayPlacement>
where
    I: IntoIterator<Item = &'a TrackedAnchor>,
{
    anchors
        .into_iter()
        .map(|anchor| {
            let point = ctx.camera.world_to_screen(
                anchor.position,
                ctx.layout.screen_width,
                ctx.layout.screen_height,
            );
            let back_facing =
                ctx.occlude_back_faces && point.facing_away(ctx.occlusion_threshold);
            let hidden = anchor.suppressed
                || point.behind_camera
                || back_facing
                || ctx.layout.under_panel(point.x, ctx.panel_open);
            OverlayPlacement {
                key: anchor.key.clone(),
                x: point.x,
                y: point.y,
                hidden,
            }
        })
        .collect()
}

/// Animated "LAT / LON" readout in the HUD corner
#[derive(Debug, Clone)]
pub struct CoordinateReadout {
    current: (f32, f32),
    tween: Option<Tween<(f32, f32)>>,
    duration_ms: f64,
}

impl CoordinateReadout {
    pub fn new(duration_ms: f64) -> Self {
        Self {
            current: (0.0, 0.0),
            tween: None,
            duration_ms,
        }
    }

    /// Start animating toward a new coordinate, cancelling any running animation
    pub fn animate_to(&mut self, lat: f32, lon: f32, now_ms: f64) {
        self.tween = Some(Tween::new(
            self.current,
            (lat, lon),
            now_ms,
            self.duration_ms,
            Easing::EaseInOutCubic,
        ));
    }

    pub fn tick(&mut self, now_ms: f64) {
        if let Some(tween) = self.tween {
            self.current = tween.sample(now_ms);
            if tween.is_finished(now_ms) {
                self.tween = None;
            }
        }
    }

    pub fn is_animating(&self) -> bool {
        self.tween.is_some()
    }

    pub fn value(&self) -> (f32, f32) {
        self.current
    }

    pub fn text(&self) -> String {
        format!("LAT {:.2} / LON {:.2}", self.current.0, self.current.1)
    }
}

/// HUD date line, e.g. `2026.10.17 // 14:05 UTC`
pub fn date_line(now: DateTime<Utc>) -> String {
    now.format("%Y.%m.%d // %H:%M UTC").to_string()
}

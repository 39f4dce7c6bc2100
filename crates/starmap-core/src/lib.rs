//! Starmap Core - Mission catalog, projection math, and navigation
//!
//! This crate provides the renderer-independent parts of the Starmap
//! mission globe/galaxy:
//! - Mission and mission type records, merged into a catalog with sectors
//! - Coordinate mapping and camera projection (world <-> screen)
//! - Cancellable tweens driving the camera and the mascot ship
//! - Per-marker visual state (idle glitch vs. selected pulse)
//! - HUD overlay projection with occlusion
//! - The navigation state machine that ties everything together

pub mod camera;
pub mod catalog;
pub mod config;
pub mod coords;
pub mod hud;
pub mod marker;
pub mod navigation;
pub mod projection;
pub mod ship;
pub mod tween;
pub mod types;

pub use glam;

pub use camera::{CameraDirector, CameraPose};
pub use catalog::{Catalog, CatalogError, Sector};
pub use config::{ConfigError, LayoutMode, StarmapConfig};
pub use hud::{CoordinateReadout, HudLayout, OverlayKey, OverlayPlacement};
pub use marker::{MarkerSample, MarkerSet, VisualMode};
pub use navigation::{
    DetailField, DetailPayload, Effect, FieldValue, NavEvent, NavigationState, Navigator, PickTarget,
    ViewMode,
};
pub use projection::{CameraView, Ray, ScreenPoint};
pub use ship::ShipAnimator;
pub use tween::{Easing, Tween};
pub use types::{CatalogMission, Mission, MissionId, MissionType, SectorId};

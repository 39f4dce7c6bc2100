//! Configuration loading with defaults for every field

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),
}

/// Which spatial layout the missions are placed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutMode {
    /// Markers on a sphere at their lat/lon, single navigation level
    Globe,
    /// Markers scattered inside per-type sectors on a ring
    #[default]
    Galaxy,
}

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StarmapConfig {
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default)]
    pub globe: GlobeConfig,
    #[serde(default)]
    pub galaxy: GalaxyConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub ship: ShipConfig,
    #[serde(default)]
    pub hud: HudConfig,
    #[serde(default)]
    pub data: DataConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    #[serde(default)]
    pub mode: LayoutMode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobeConfig {
    #[serde(default = "default_globe_radius")]
    pub radius: f32,
    /// Height of markers above the surface
    #[serde(default = "default_marker_altitude")]
    pub marker_altitude: f32,
    #[serde(default = "default_marker_size")]
    pub marker_size: f32,
    /// Extra height of HUD label anchors above the markers
    #[serde(default = "default_label_altitude")]
    pub label_altitude: f32,
}

impl Default for GlobeConfig {
    fn default() -> Self {
        Self {
            radius: default_globe_radius(),
            marker_altitude: default_marker_altitude(),
            marker_size: default_marker_size(),
            label_altitude: default_label_altitude(),
        }
    }
}

fn default_globe_radius() -> f32 {
    1.8
}

fn default_marker_altitude() -> f32 {
    0.04
}

fn default_marker_size() -> f32 {
    0.07
}

fn default_label_altitude() -> f32 {
    0.2
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GalaxyConfig {
    /// Radius of the ring the sector centres sit on
    #[serde(default = "default_ring_radius")]
    pub ring_radius: f32,
    /// Radius of a single sector disk
    #[serde(default = "default_sector_radius")]
    pub sector_radius: f32,
    /// Fraction of the sector radius missions may be scattered in
    #[serde(default = "default_usable_fraction")]
    pub usable_fraction: f32,
    /// Opacity multiplier for sectors that are not focused
    #[serde(default = "default_dim_fraction")]
    pub dim_fraction: f32,
    #[serde(default = "default_sector_opacity")]
    pub sector_opacity: f32,
    #[serde(default = "default_planet_size")]
    pub planet_size: f32,
}

impl Default for GalaxyConfig {
    fn default() -> Self {
        Self {
            ring_radius: default_ring_radius(),
            sector_radius: default_sector_radius(),
            usable_fraction: default_usable_fraction(),
            dim_fraction: default_dim_fraction(),
            sector_opacity: default_sector_opacity(),
            planet_size: default_planet_size(),
        }
    }
}

impl GalaxyConfig {
    pub fn usable_radius(&self) -> f32 {
        self.sector_radius * self.usable_fraction
    }
}

fn default_ring_radius() -> f32 {
    6.0
}

fn default_sector_radius() -> f32 {
    1.6
}

fn default_usable_fraction() -> f32 {
    0.8
}

fn default_dim_fraction() -> f32 {
    0.12
}

fn default_sector_opacity() -> f32 {
    0.35
}

fn default_planet_size() -> f32 {
    0.12
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraConfig {
    /// Vertical field of view in degrees
    #[serde(default = "default_fov")]
    pub fov_degrees: f32,
    #[serde(default = "default_near")]
    pub near: f32,
    #[serde(default = "default_far")]
    pub far: f32,
    /// Distance from the globe centre when framing a mission
    #[serde(default = "default_camera_distance")]
    pub distance: f32,
    /// Upward offset applied when flying to a globe mission
    #[serde(default = "default_lift")]
    pub lift: f32,
    /// Overview camera position
    #[serde(default = "default_overview_position")]
    pub overview_position: [f32; 3],
    /// Offset from a sector centre when focusing it
    #[serde(default = "default_sector_offset")]
    pub sector_offset: [f32; 3],
    /// Offset from a planet when opening a galaxy mission
    #[serde(default = "default_mission_offset")]
    pub mission_offset: [f32; 3],
    #[serde(default = "default_fly_duration")]
    pub fly_duration_ms: f64,
    /// Idle auto-rotation in radians per second
    #[serde(default = "default_auto_rotate")]
    pub auto_rotate_speed: f32,
    #[serde(default = "default_min_polar")]
    pub min_polar: f32,
    #[serde(default = "default_max_polar")]
    pub max_polar: f32,
    #[serde(default = "default_sensitivity")]
    pub sensitivity: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: default_fov(),
            near: default_near(),
            far: default_far(),
            distance: default_camera_distance(),
            lift: default_lift(),
            overview_position: default_overview_position(),
            sector_offset: default_sector_offset(),
            mission_offset: default_mission_offset(),
            fly_duration_ms: default_fly_duration(),
            auto_rotate_speed: default_auto_rotate(),
            min_polar: default_min_polar(),
            max_polar: default_max_polar(),
            sensitivity: default_sensitivity(),
        }
    }
}

fn default_fov() -> f32 {
    45.0
}

fn default_near() -> f32 {
    0.1
}

fn default_far() -> f32 {
    200.0
}

fn default_camera_distance() -> f32 {
    7.0
}

fn default_lift() -> f32 {
    0.6
}

fn default_overview_position() -> [f32; 3] {
    [0.0, 6.0, 14.0]
}

fn default_sector_offset() -> [f32; 3] {
    [0.0, 2.2, 4.2]
}

fn default_mission_offset() -> [f32; 3] {
    [0.0, 0.5, 1.4]
}

fn default_fly_duration() -> f64 {
    1200.0
}

fn default_auto_rotate() -> f32 {
    // 0.0006 rad per frame at 60 fps
    0.036
}

fn default_min_polar() -> f32 {
    std::f32::consts::PI * 0.2
}

fn default_max_polar() -> f32 {
    std::f32::consts::PI * 0.8
}

fn default_sensitivity() -> f32 {
    0.005
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipConfig {
    /// Hover position when nothing is focused (galaxy layout)
    #[serde(default = "default_ship_home")]
    pub home: [f32; 3],
    /// Hover altitude above the globe surface (globe layout)
    #[serde(default = "default_ship_altitude")]
    pub altitude: f32,
    /// Lat/lon of the hover point on the globe
    #[serde(default = "default_ship_home_latlon")]
    pub home_lat_lon: [f32; 2],
    #[serde(default = "default_bob_amplitude")]
    pub bob_amplitude: f32,
    #[serde(default = "default_bob_speed")]
    pub bob_speed: f32,
    #[serde(default = "default_ship_fly_duration")]
    pub fly_duration_ms: f64,
    /// Height above a target the ship parks at
    #[serde(default = "default_park_height")]
    pub park_height: f32,
}

impl Default for ShipConfig {
    fn default() -> Self {
        Self {
            home: default_ship_home(),
            altitude: default_ship_altitude(),
            home_lat_lon: default_ship_home_latlon(),
            bob_amplitude: default_bob_amplitude(),
            bob_speed: default_bob_speed(),
            fly_duration_ms: default_ship_fly_duration(),
            park_height: default_park_height(),
        }
    }
}

fn default_ship_home() -> [f32; 3] {
    [0.0, 1.2, 0.0]
}

fn default_ship_altitude() -> f32 {
    0.45
}

fn default_ship_home_latlon() -> [f32; 2] {
    [20.0, 0.0]
}

fn default_bob_amplitude() -> f32 {
    0.05
}

fn default_bob_speed() -> f32 {
    2.0
}

fn default_ship_fly_duration() -> f64 {
    1500.0
}

fn default_park_height() -> f32 {
    0.35
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HudConfig {
    /// Dot product above which a point counts as facing away from the camera
    #[serde(default = "default_occlusion_threshold")]
    pub occlusion_threshold: f32,
    /// Fraction of the viewport width covered by the detail panel
    #[serde(default = "default_panel_fraction")]
    pub panel_fraction: f32,
    #[serde(default = "default_mobile_width")]
    pub mobile_width: f32,
    #[serde(default = "default_coord_duration")]
    pub coord_duration_ms: f64,
    #[serde(default = "default_standby_label")]
    pub standby_label: String,
    /// Mission opened automatically once the catalog loads
    #[serde(default)]
    pub initial_mission: Option<String>,
    /// How long the onboarding hint stays up
    #[serde(default = "default_hint_duration")]
    pub hint_duration_secs: f32,
}

impl Default for HudConfig {
    fn default() -> Self {
        Self {
            occlusion_threshold: default_occlusion_threshold(),
            panel_fraction: default_panel_fraction(),
            mobile_width: default_mobile_width(),
            coord_duration_ms: default_coord_duration(),
            standby_label: default_standby_label(),
            initial_mission: None,
            hint_duration_secs: default_hint_duration(),
        }
    }
}

fn default_occlusion_threshold() -> f32 {
    0.2
}

fn default_panel_fraction() -> f32 {
    0.3
}

fn default_mobile_width() -> f32 {
    800.0
}

fn default_coord_duration() -> f64 {
    800.0
}

fn default_standby_label() -> String {
    "SYSTEM STANDBY".to_string()
}

fn default_hint_duration() -> f32 {
    6.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_missions_path")]
    pub missions: String,
    #[serde(default = "default_types_path")]
    pub mission_types: String,
    #[serde(default = "default_ship_names_path")]
    pub ship_names: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            missions: default_missions_path(),
            mission_types: default_types_path(),
            ship_names: default_ship_names_path(),
        }
    }
}

fn default_missions_path() -> String {
    "data/missions.json".to_string()
}

fn default_types_path() -> String {
    "data/mission_types.json".to_string()
}

fn default_ship_names_path() -> String {
    "data/ship_names.json".to_string()
}

impl StarmapConfig {
    /// Parse configuration from a TOML string
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Load configuration from file, falling back to defaults when it is absent
pub fn load_config(path: &Path) -> Result<StarmapConfig, ConfigError> {
    if path.exists() {
        let content = std::fs::read_to_string(path)?;
        let config = StarmapConfig::from_toml(&content)?;
        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    } else {
        info!(
            path = %path.display(),
            "Configuration file not found, using defaults"
        );
        Ok(StarmapConfig::default())
    }
}

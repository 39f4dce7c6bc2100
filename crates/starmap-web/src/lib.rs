//! Starmap Web - WebGPU-powered mission galaxy frontend
//!
//! In the browser the data files are fetched over HTTP. Native builds read
//! them from the local `data/` directory.

mod app;
mod loader;

pub use app::run;
pub use loader::{load_from_dir, LoaderPlugin};

use starmap_core::{LayoutMode, MissionId, NavEvent, StarmapConfig};
use starmap_scene::ExternalCommands;
use std::sync::OnceLock;
use wasm_bindgen::prelude::*;

static COMMANDS: OnceLock<ExternalCommands> = OnceLock::new();

/// Command queue shared with page scripts
pub fn external_commands() -> ExternalCommands {
    COMMANDS.get_or_init(ExternalCommands::default).clone()
}

/// Open a mission from page script (e.g. a "view project" link).
/// Commands sent before the data has loaded are applied once it arrives.
#[wasm_bindgen]
pub fn select_mission(id: String) {
    external_commands().push(NavEvent::SelectMission(MissionId::new(id)));
}

/// Return to the galaxy overview from page script
#[wasm_bindgen]
pub fn return_to_overview() {
    external_commands().push(NavEvent::ReturnToOverview);
}

/// Entry point for WASM module
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn main() {
    // Set panic hook for better error messages
    console_error_panic_hook::set_once();

    // Initialize logging with filtering to reduce wgpu noise
    tracing_wasm::set_as_global_default_with_config(
        tracing_wasm::WASMLayerConfigBuilder::new()
            .set_max_level(tracing::Level::WARN)
            .build(),
    );

    let params = page_parameters();
    let layout = params.as_ref().and_then(|p| p.get("layout"));
    let mission = params.as_ref().and_then(|p| p.get("mission"));
    let config = browser_config(layout.as_deref(), mission);

    app::run(config, external_commands(), String::new());
}

/// Read `?layout=` and `?mission=` from the page URL
#[cfg(target_arch = "wasm32")]
fn page_parameters() -> Option<web_sys::UrlSearchParams> {
    let href = web_sys::window()?.location().href().ok()?;
    let url = web_sys::Url::new(&href).ok()?;
    Some(url.search_params())
}

/// Mission opened on page load unless `?mission=` names another
pub const LANDING_MISSION: &str = "about";

/// Configuration for the browser build, with page parameters applied
pub fn browser_config(layout: Option<&str>, mission: Option<String>) -> StarmapConfig {
    let mut config = StarmapConfig::default();
    match layout {
        Some("globe") => config.layout.mode = LayoutMode::Globe,
        Some("galaxy") => config.layout.mode = LayoutMode::Galaxy,
        Some(other) => tracing::warn!(layout = other, "Unknown layout parameter"),
        None => {}
    }
    config.hud.initial_mission = Some(mission.unwrap_or_else(|| LANDING_MISSION.to_string()));
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_browser_config_opens_landing_mission() {
        let config = browser_config(None, None);
        assert_eq!(config.hud.initial_mission.as_deref(), Some("about"));
        assert_eq!(config.layout.mode, LayoutMode::Galaxy);
    }

    #[test]
    fn test_browser_config_page_parameters() {
        let config = browser_config(Some("globe"), Some("contact".to_string()));
        assert_eq!(config.hud.initial_mission.as_deref(), Some("contact"));
        assert_eq!(config.layout.mode, LayoutMode::Globe);

        let config = browser_config(Some("spiral"), None);
        assert_eq!(config.layout.mode, LayoutMode::Galaxy);
    }
}

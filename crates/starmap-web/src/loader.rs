//! Startup loading of the mission data files
//!
//! The three files are requested together and handed to the scene through
//! `PendingData`; each one fails independently.

use bevy::prelude::*;
use starmap_core::config::DataConfig;
use starmap_core::{CatalogError, StarmapConfig};
use starmap_scene::{PendingData, StarmapData};
use std::path::Path;

pub struct LoaderPlugin {
    pub config: StarmapConfig,
    /// Directory (native) or URL prefix (browser) the data paths are relative to
    pub base: String,
}

#[derive(Resource, Clone)]
struct DataSources {
    base: String,
    data: DataConfig,
}

impl Plugin for LoaderPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(DataSources {
            base: self.base.clone(),
            data: self.config.data.clone(),
        })
        .add_systems(Startup, start_loading);
    }
}

/// Read the data files relative to `root`
pub fn load_from_dir(root: &Path, data: &DataConfig) -> StarmapData {
    let read = |file: &str| -> Result<String, CatalogError> {
        Ok(std::fs::read_to_string(root.join(file))?)
    };
    StarmapData::from_texts(
        read(&data.missions),
        read(&data.mission_types),
        read(&data.ship_names),
    )
}

#[cfg(not(target_arch = "wasm32"))]
fn start_loading(sources: Res<DataSources>, pending: Res<PendingData>) {
    let root = Path::new(&sources.base);
    tracing::info!(root = %root.display(), "Loading mission data from disk");
    pending.deliver(load_from_dir(root, &sources.data));
}

#[cfg(target_arch = "wasm32")]
fn start_loading(sources: Res<DataSources>, pending: Res<PendingData>) {
    use wasm_bindgen_futures::spawn_local;

    let pending = pending.clone();
    let DataSources { base, data } = sources.clone();

    spawn_local(async move {
        let (missions, mission_types, ship_names) = futures_util::join!(
            fetch_text(format!("{}{}", base, data.missions)),
            fetch_text(format!("{}{}", base, data.mission_types)),
            fetch_text(format!("{}{}", base, data.ship_names)),
        );
        pending.deliver(StarmapData::from_texts(missions, mission_types, ship_names));
    });
}

#[cfg(target_arch = "wasm32")]
async fn fetch_text(url: String) -> Result<String, CatalogError> {
    tracing::info!("Fetching {}", url);
    let response = gloo_net::http::Request::get(&url)
        .send()
        .await
        .map_err(|e| CatalogError::FetchError(e.to_string()))?;
    if !response.ok() {
        return Err(CatalogError::FetchError(format!(
            "{} returned HTTP {}",
            url,
            response.status()
        )));
    }
    response
        .text()
        .await
        .map_err(|e| CatalogError::FetchError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_from_dir_reads_all_files() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("data")).unwrap();
        std::fs::write(
            dir.path().join("data/missions.json"),
            r#"[{"id":"m1","type":"ops","lat":1,"lon":2}]"#,
        )
        .unwrap();
        std::fs::write(
            dir.path().join("data/mission_types.json"),
            r#"[{"id":"ops","name":"Operations"}]"#,
        )
        .unwrap();
        std::fs::write(dir.path().join("data/ship_names.json"), r#"["Nomad"]"#).unwrap();

        let data = load_from_dir(dir.path(), &DataConfig::default());
        assert_eq!(data.missions.unwrap().len(), 1);
        assert_eq!(data.mission_types.unwrap()[0].name, "Operations");
        assert_eq!(data.ship_names.unwrap(), vec!["Nomad".to_string()]);
    }

    #[test]
    fn test_missing_file_fails_alone() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("data")).unwrap();
        std::fs::write(dir.path().join("data/missions.json"), "[]").unwrap();
        std::fs::write(dir.path().join("data/mission_types.json"), "[]").unwrap();

        let data = load_from_dir(dir.path(), &DataConfig::default());
        assert!(data.missions.is_ok());
        assert!(data.mission_types.is_ok());
        assert!(matches!(data.ship_names, Err(CatalogError::IoError(_))));
    }
}

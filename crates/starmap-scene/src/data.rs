//! Hand-off points between async loaders / external callers and the ECS world

use bevy::prelude::*;
use starmap_core::catalog::{parse_mission_types, parse_missions, parse_ship_names};
use starmap_core::ship::choose_name;
use starmap_core::{Catalog, CatalogError, Mission, MissionType, NavEvent};
use std::sync::{Arc, Mutex};

use crate::{now_ms, Starmap, StarmapSet};

/// Everything fetched at startup. Each file fails independently.
#[derive(Debug)]
pub struct StarmapData {
    pub missions: Result<Vec<Mission>, CatalogError>,
    pub mission_types: Result<Vec<MissionType>, CatalogError>,
    pub ship_names: Result<Vec<String>, CatalogError>,
}

impl StarmapData {
    /// Parse raw file bodies, keeping per-file failures
    pub fn from_texts(
        missions: Result<String, CatalogError>,
        mission_types: Result<String, CatalogError>,
        ship_names: Result<String, CatalogError>,
    ) -> Self {
        Self {
            missions: missions.and_then(|text| parse_missions(&text)),
            mission_types: mission_types.and_then(|text| parse_mission_types(&text)),
            ship_names: ship_names.and_then(|text| parse_ship_names(&text)),
        }
    }
}

/// Data delivered by an async fetch, waiting to be applied on the next frame
#[derive(Resource, Default, Clone)]
pub struct PendingData(pub Arc<Mutex<Option<StarmapData>>>);

impl PendingData {
    pub fn deliver(&self, data: StarmapData) {
        match self.0.lock() {
            Ok(mut slot) => *slot = Some(data),
            Err(e) => tracing::error!("Failed to deliver mission data: {}", e),
        }
    }
}

/// Navigation events queued from outside the ECS (e.g. page links)
#[derive(Resource, Default, Clone)]
pub struct ExternalCommands(pub Arc<Mutex<Vec<NavEvent>>>);

impl ExternalCommands {
    pub fn push(&self, event: NavEvent) {
        if let Ok(mut queue) = self.0.lock() {
            queue.push(event);
        }
    }

    fn drain(&self) -> Vec<NavEvent> {
        self.0
            .lock()
            .map(|mut queue| std::mem::take(&mut *queue))
            .unwrap_or_default()
    }
}

/// Sent once the catalog has been installed into the navigator
#[derive(Message)]
pub struct CatalogReady;

#[derive(Resource, Default)]
pub struct CatalogStatus {
    pub loaded: bool,
}

pub struct DataPlugin;

impl Plugin for DataPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PendingData>()
            .init_resource::<ExternalCommands>()
            .init_resource::<CatalogStatus>()
            .add_message::<CatalogReady>()
            .add_systems(
                Update,
                (apply_loaded_data, drain_external_commands)
                    .chain()
                    .in_set(StarmapSet::Data),
            );
    }
}

fn apply_loaded_data(
    pending: Res<PendingData>,
    mut starmap: ResMut<Starmap>,
    mut status: ResMut<CatalogStatus>,
    mut ready: MessageWriter<CatalogReady>,
    time: Res<Time>,
) {
    let Some(data) = pending.0.lock().ok().and_then(|mut slot| slot.take()) else {
        return;
    };

    let catalog = Catalog::load_or_empty(data.missions, data.mission_types, starmap.config());
    let names = data.ship_names.unwrap_or_else(|e| {
        tracing::warn!("Failed to load ship names: {}", e);
        Vec::new()
    });
    let name = choose_name(&names, &mut rand::thread_rng());
    tracing::info!(ship = %name, "Ship name chosen");

    starmap.set_ship_name(name);
    starmap.load_catalog(catalog, now_ms(&time));
    status.loaded = true;
    ready.write(CatalogReady);
}

fn drain_external_commands(
    commands: Res<ExternalCommands>,
    mut starmap: ResMut<Starmap>,
    status: Res<CatalogStatus>,
    time: Res<Time>,
) {
    // Hold queued commands until there is a catalog to apply them to
    if !status.loaded {
        return;
    }
    for event in commands.drain() {
        tracing::debug!(event = ?event, "External navigation command");
        starmap.dispatch(event, now_ms(&time));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_texts_keeps_partial_failures() {
        let data = StarmapData::from_texts(
            Ok(r#"[{"id":"m1","type":"ops","lat":1,"lon":2}]"#.to_string()),
            Err(CatalogError::FetchError("HTTP 404".to_string())),
            Ok("not json".to_string()),
        );
        assert_eq!(data.missions.unwrap().len(), 1);
        assert!(data.mission_types.is_err());
        assert!(data.ship_names.is_err());
    }

    #[test]
    fn test_external_commands_drain_once() {
        let commands = ExternalCommands::default();
        commands.push(NavEvent::SelectMission("m1".into()));
        commands.clone().push(NavEvent::Escape);
        assert_eq!(commands.drain().len(), 2);
        assert!(commands.drain().is_empty());
    }
}

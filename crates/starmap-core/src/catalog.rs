//! Mission catalog - merges missions with their types and lays out sectors
//!
//! The catalog is built once per session from the loaded data files. Any
//! failure to load or parse either file leaves the catalog empty instead of
//! propagating, so the navigation layer always has something to work with.

use glam::Vec3;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::config::{LayoutMode, StarmapConfig};
use crate::coords::{ring_position, scatter_in_sector, spherical_to_cartesian};
use crate::types::{CatalogMission, Mission, MissionId, MissionType, SectorId};

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read data file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse data file: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Fetch failed: {0}")]
    FetchError(String),
}

/// Spatial grouping of all missions sharing a type (galaxy layout)
#[derive(Debug, Clone, PartialEq)]
pub struct Sector {
    pub id: SectorId,
    pub name: String,
    pub description: String,
    pub icon: String,
    /// Position in the ring order, which is the order types were supplied in
    pub index: usize,
    pub center: Vec3,
    pub missions: Vec<MissionId>,
    /// Current display opacity
    pub opacity: f32,
    /// Opacity captured the first time any sector was focused
    pub recorded_opacity: Option<f32>,
}

/// The merged, immutable mission catalog plus per-sector display state
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    missions: Vec<CatalogMission>,
    index: HashMap<MissionId, usize>,
    sectors: Vec<Sector>,
    sector_index: HashMap<SectorId, usize>,
}

impl Catalog {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge missions with their types and compute marker placement.
    ///
    /// Missions referencing a type that is not in `types` get a placeholder
    /// "Unknown" type and their own sector after the known ones.
    pub fn build(missions: Vec<Mission>, types: Vec<MissionType>, config: &StarmapConfig) -> Self {
        let mut known: HashSet<SectorId> = HashSet::with_capacity(types.len());
        let mut all_types = Vec::with_capacity(types.len());
        for mission_type in types {
            if known.insert(mission_type.id.clone()) {
                all_types.push(mission_type);
            } else {
                warn!(mission_type = %mission_type.id, "Duplicate mission type id, keeping the first");
            }
        }
        for mission in &missions {
            if known.insert(mission.mission_type.clone()) {
                warn!(
                    mission = %mission.id,
                    mission_type = %mission.mission_type,
                    "Mission references unknown type"
                );
                all_types.push(MissionType::unknown(mission.mission_type.clone()));
            }
        }

        let count = all_types.len();
        let mut sectors: Vec<Sector> = all_types
            .iter()
            .enumerate()
            .map(|(index, t)| Sector {
                id: t.id.clone(),
                name: t.name.clone(),
                description: t.description.clone(),
                icon: t.icon.clone(),
                index,
                center: ring_position(index, count, config.galaxy.ring_radius),
                missions: Vec::new(),
                opacity: config.galaxy.sector_opacity,
                recorded_opacity: None,
            })
            .collect();
        let sector_index: HashMap<SectorId, usize> = sectors
            .iter()
            .map(|s| (s.id.clone(), s.index))
            .collect();

        let mut merged = Vec::with_capacity(missions.len());
        let mut index = HashMap::with_capacity(missions.len());
        for mission in missions {
            if index.contains_key(&mission.id) {
                warn!(mission = %mission.id, "Duplicate mission id, keeping the first");
                continue;
            }
            let Some(&sector_idx) = sector_index.get(&mission.mission_type) else {
                continue;
            };
            let position = match config.layout.mode {
                LayoutMode::Globe => spherical_to_cartesian(
                    mission.lat,
                    mission.lon,
                    config.globe.radius + config.globe.marker_altitude,
                ),
                LayoutMode::Galaxy => scatter_in_sector(
                    mission.id.as_str(),
                    sectors[sector_idx].center,
                    config.galaxy.usable_radius(),
                ),
            };
            sectors[sector_idx].missions.push(mission.id.clone());
            index.insert(mission.id.clone(), merged.len());
            merged.push(CatalogMission::merge(mission, &all_types[sector_idx], position));
        }

        info!(
            missions = merged.len(),
            sectors = sectors.len(),
            "Mission catalog built"
        );

        Self {
            missions: merged,
            index,
            sectors,
            sector_index,
        }
    }

    /// Build from fetch results, degrading to an empty catalog on any failure
    pub fn load_or_empty(
        missions: Result<Vec<Mission>, CatalogError>,
        types: Result<Vec<MissionType>, CatalogError>,
        config: &StarmapConfig,
    ) -> Self {
        match (missions, types) {
            (Ok(missions), Ok(types)) => Self::build(missions, types, config),
            (missions, types) => {
                if let Err(e) = missions {
                    error!("Failed to load missions: {}", e);
                }
                if let Err(e) = types {
                    error!("Failed to load mission types: {}", e);
                }
                Self::empty()
            }
        }
    }

    /// Load both data files from disk (static-file fallback)
    pub fn from_files(missions: &Path, types: &Path, config: &StarmapConfig) -> Self {
        Self::load_or_empty(read_json(missions), read_json(types), config)
    }

    pub fn is_empty(&self) -> bool {
        self.missions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.missions.len()
    }

    pub fn missions(&self) -> &[CatalogMission] {
        &self.missions
    }

    pub fn mission(&self, id: &MissionId) -> Option<&CatalogMission> {
        self.index.get(id).map(|&i| &self.missions[i])
    }

    pub fn position_of(&self, id: &MissionId) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Mission `offset` steps away from `id` in catalog order, wrapping around
    pub fn neighbor(&self, id: &MissionId, offset: isize) -> Option<&CatalogMission> {
        let current = self.position_of(id)? as isize;
        let len = self.missions.len() as isize;
        let next = (current + offset).rem_euclid(len);
        self.missions.get(next as usize)
    }

    pub fn sectors(&self) -> &[Sector] {
        &self.sectors
    }

    pub fn sector(&self, id: &SectorId) -> Option<&Sector> {
        self.sector_index.get(id).map(|&i| &self.sectors[i])
    }

    pub fn sectors_mut(&mut self) -> &mut [Sector] {
        &mut self.sectors
    }

    pub fn missions_in<'a>(&'a self, sector: &'a SectorId) -> impl Iterator<Item = &'a CatalogMission> + 'a {
        self.missions.iter().filter(move |m| m.sector() == sector)
    }
}

pub fn parse_missions(json: &str) -> Result<Vec<Mission>, CatalogError> {
    Ok(serde_json::from_str(json)?)
}

pub fn parse_mission_types(json: &str) -> Result<Vec<MissionType>, CatalogError> {
    Ok(serde_json::from_str(json)?)
}

pub fn parse_ship_names(json: &str) -> Result<Vec<String>, CatalogError> {
    Ok(serde_json::from_str(json)?)
}

/// Read and parse a JSON data file
pub fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, CatalogError> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

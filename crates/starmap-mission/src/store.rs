//! Reading, checking and appending to the mission data files

use anyhow::{bail, Context, Result};
use rand::Rng;
use starmap_core::catalog::read_json;
use starmap_core::types::DEFAULT_LINK_TEXT;
use starmap_core::{CatalogError, Mission, MissionId, MissionType, SectorId};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

/// Random placement avoids the polar caps and the ocean-heavy far east/west
const RANDOM_LAT: (f64, f64) = (-50.0, 60.0);
const RANDOM_LON: (f64, f64) = (-140.0, 160.0);

/// The pair of files making up a mission data set
#[derive(Debug, Clone)]
pub struct DataFiles {
    pub missions: PathBuf,
    pub mission_types: PathBuf,
}

impl DataFiles {
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            missions: dir.join("missions.json"),
            mission_types: dir.join("mission_types.json"),
        }
    }

    pub fn load_types(&self) -> Result<Vec<MissionType>> {
        read_json(&self.mission_types)
            .with_context(|| format!("reading {}", self.mission_types.display()))
    }

    /// Missions on disk; a missing file is an empty list
    pub fn load_missions(&self) -> Result<Vec<Mission>> {
        match read_json::<Vec<Mission>>(&self.missions) {
            Ok(missions) => Ok(missions),
            Err(CatalogError::IoError(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(path = %self.missions.display(), "Missions file not found, starting fresh");
                Ok(Vec::new())
            }
            Err(e) => Err(e).with_context(|| format!("reading {}", self.missions.display())),
        }
    }

    /// Write pretty JSON with a trailing newline, then confirm it parses back
    pub fn save_missions(&self, missions: &[Mission]) -> Result<()> {
        if let Some(parent) = self.missions.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut content = serde_json::to_string_pretty(missions)?;
        content.push('\n');
        std::fs::write(&self.missions, content)
            .with_context(|| format!("writing {}", self.missions.display()))?;

        let written: Vec<Mission> = read_json(&self.missions)
            .with_context(|| format!("{} is corrupted after write", self.missions.display()))?;
        if written.len() != missions.len() {
            bail!("{} is corrupted after write", self.missions.display());
        }
        Ok(())
    }
}

/// Fields supplied for a new mission; anything left out gets a default
#[derive(Debug, Clone, Default)]
pub struct NewMission {
    pub id: String,
    pub mission_type: String,
    pub name: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub link: Option<String>,
    pub link_text: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

impl NewMission {
    /// Resolve defaults and coordinates into a mission entry
    pub fn build<R: Rng + ?Sized>(self, rng: &mut R) -> Result<Mission> {
        let id = self.id.trim().to_string();
        if id.is_empty() {
            bail!("mission id is required");
        }
        let (lat, lon) = match (self.lat, self.lon) {
            (None, None) => random_coords(rng),
            (Some(lat), Some(lon)) => (lat, lon),
            _ => bail!("provide both --lat and --lon, or neither for random placement"),
        };

        let name = non_empty(self.name).unwrap_or_else(|| id.clone());
        let title = non_empty(self.title).unwrap_or_else(|| name.clone());
        let link_text = non_empty(self.link_text).unwrap_or_else(|| DEFAULT_LINK_TEXT.to_string());

        Ok(Mission {
            id: MissionId::new(id),
            name,
            title,
            mission_type: SectorId::new(self.mission_type.trim()),
            lat: lat as f32,
            lon: lon as f32,
            link: self.link.unwrap_or_default(),
            link_text: Some(link_text),
            description: non_empty(self.description),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Random coordinates rounded to 4 decimals
pub fn random_coords<R: Rng + ?Sized>(rng: &mut R) -> (f64, f64) {
    let lat = rng.gen_range(RANDOM_LAT.0..=RANDOM_LAT.1);
    let lon = rng.gen_range(RANDOM_LON.0..=RANDOM_LON.1);
    (round4(lat), round4(lon))
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// Append a mission to the data set, rejecting duplicate ids and unknown types
pub fn add_mission<R: Rng + ?Sized>(files: &DataFiles, new: NewMission, rng: &mut R) -> Result<Mission> {
    let types = files.load_types()?;
    if types.is_empty() {
        bail!("{} lists no mission types", files.mission_types.display());
    }
    let mut missions = files.load_missions()?;

    let mission = new.build(rng)?;
    if missions.iter().any(|m| m.id == mission.id) {
        bail!("mission id '{}' already exists", mission.id);
    }
    if !types.iter().any(|t| t.id == mission.mission_type) {
        let known: Vec<&str> = types.iter().map(|t| t.id.as_str()).collect();
        bail!(
            "invalid type '{}', must be one of: {}",
            mission.mission_type,
            known.join(", ")
        );
    }

    missions.push(mission.clone());
    files.save_missions(&missions)?;
    info!(mission = %mission.id, total = missions.len(), "Mission deployed");
    Ok(mission)
}

/// A consistency problem found in the data files
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DataProblem {
    #[error("duplicate mission id '{0}'")]
    DuplicateMission(MissionId),
    #[error("duplicate mission type '{0}'")]
    DuplicateType(SectorId),
    #[error("mission '{mission}' references unknown type '{mission_type}'")]
    UnknownType { mission: MissionId, mission_type: SectorId },
    #[error("mission '{mission}' has latitude {lat} outside [-90, 90]")]
    LatitudeOutOfRange { mission: MissionId, lat: f32 },
    #[error("mission '{mission}' has longitude {lon} outside [-180, 180]")]
    LongitudeOutOfRange { mission: MissionId, lon: f32 },
}

/// Every problem in the data set, in file order
pub fn validate(missions: &[Mission], types: &[MissionType]) -> Vec<DataProblem> {
    let mut problems = Vec::new();

    let mut type_ids = HashSet::new();
    for mission_type in types {
        if !type_ids.insert(&mission_type.id) {
            problems.push(DataProblem::DuplicateType(mission_type.id.clone()));
        }
    }

    let mut seen = HashSet::new();
    for mission in missions {
        if !seen.insert(&mission.id) {
            problems.push(DataProblem::DuplicateMission(mission.id.clone()));
        }
        if !type_ids.contains(&mission.mission_type) {
            problems.push(DataProblem::UnknownType {
                mission: mission.id.clone(),
                mission_type: mission.mission_type.clone(),
            });
        }
        if !(-90.0..=90.0).contains(&mission.lat) {
            problems.push(DataProblem::LatitudeOutOfRange {
                mission: mission.id.clone(),
                lat: mission.lat,
            });
        }
        if !(-180.0..=180.0).contains(&mission.lon) {
            problems.push(DataProblem::LongitudeOutOfRange {
                mission: mission.id.clone(),
                lon: mission.lon,
            });
        }
    }

    problems
}

/// Missions grouped by type in type order; missions with an unknown type
/// come last under their own type id
pub fn group_by_type<'a>(
    missions: &'a [Mission],
    types: &'a [MissionType],
) -> Vec<(String, Vec<&'a Mission>)> {
    let mut groups: Vec<(String, Vec<&Mission>)> = types
        .iter()
        .map(|t| {
            let members = missions.iter().filter(|m| m.mission_type == t.id).collect();
            (t.name.clone(), members)
        })
        .collect();

    let known: HashSet<&SectorId> = types.iter().map(|t| &t.id).collect();
    for mission in missions.iter().filter(|m| !known.contains(&m.mission_type)) {
        let label = mission.mission_type.to_string();
        match groups.iter_mut().find(|(name, _)| *name == label) {
            Some((_, members)) => members.push(mission),
            None => groups.push((label, vec![mission])),
        }
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use tempfile::TempDir;

    const TYPES: &str = r#"[
        {"id":"ops","name":"Operations"},
        {"id":"research","name":"Research"}
    ]"#;

    fn data_dir() -> (TempDir, DataFiles) {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("mission_types.json"), TYPES).unwrap();
        let files = DataFiles::in_dir(dir.path());
        (dir, files)
    }

    fn new_mission(id: &str, mission_type: &str) -> NewMission {
        NewMission {
            id: id.to_string(),
            mission_type: mission_type.to_string(),
            lat: Some(10.0),
            lon: Some(20.0),
            ..Default::default()
        }
    }

    #[test]
    fn test_add_fills_defaults() {
        let (_dir, files) = data_dir();
        let mut rng = StdRng::seed_from_u64(7);
        let mission = add_mission(&files, new_mission("omega", "ops"), &mut rng).unwrap();

        assert_eq!(mission.name, "omega");
        assert_eq!(mission.title, "omega");
        assert_eq!(mission.link_text.as_deref(), Some(DEFAULT_LINK_TEXT));
        assert!(mission.description.is_none());

        let content = std::fs::read_to_string(&files.missions).unwrap();
        assert!(content.ends_with("}\n]\n"));
        assert_eq!(files.load_missions().unwrap(), vec![mission]);
    }

    #[test]
    fn test_add_rejects_duplicate_id() {
        let (_dir, files) = data_dir();
        let mut rng = StdRng::seed_from_u64(7);
        add_mission(&files, new_mission("omega", "ops"), &mut rng).unwrap();
        let err = add_mission(&files, new_mission("omega", "research"), &mut rng).unwrap_err();
        assert!(err.to_string().contains("already exists"));
        assert_eq!(files.load_missions().unwrap().len(), 1);
    }

    #[test]
    fn test_add_rejects_unknown_type() {
        let (_dir, files) = data_dir();
        let mut rng = StdRng::seed_from_u64(7);
        let err = add_mission(&files, new_mission("omega", "sales"), &mut rng).unwrap_err();
        assert!(err.to_string().contains("ops, research"));
        assert!(!files.missions.exists());
    }

    #[test]
    fn test_add_refuses_corrupt_missions_file() {
        let (_dir, files) = data_dir();
        std::fs::write(&files.missions, "[{").unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        assert!(add_mission(&files, new_mission("omega", "ops"), &mut rng).is_err());
        assert_eq!(std::fs::read_to_string(&files.missions).unwrap(), "[{");
    }

    #[test]
    fn test_random_coords_in_range() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..200 {
            let (lat, lon) = random_coords(&mut rng);
            assert!((-50.0..=60.0).contains(&lat));
            assert!((-140.0..=160.0).contains(&lon));
            assert_eq!(round4(lat), lat);
        }
    }

    #[test]
    fn test_single_coordinate_is_an_error() {
        let mut rng = StdRng::seed_from_u64(1);
        let new = NewMission {
            lat: Some(10.0),
            lon: None,
            ..new_mission("omega", "ops")
        };
        assert!(new.build(&mut rng).is_err());
    }

    #[test]
    fn test_validate_reports_problems() {
        let types: Vec<MissionType> = serde_json::from_str(TYPES).unwrap();
        let missions: Vec<Mission> = serde_json::from_str(
            r#"[
                {"id":"a","type":"ops","lat":0,"lon":0},
                {"id":"a","type":"ops","lat":0,"lon":0},
                {"id":"b","type":"sales","lat":95,"lon":-200}
            ]"#,
        )
        .unwrap();

        let problems = validate(&missions, &types);
        assert_eq!(problems.len(), 4);
        assert_eq!(problems[0], DataProblem::DuplicateMission(MissionId::new("a")));
        assert!(matches!(problems[1], DataProblem::UnknownType { .. }));
        assert!(matches!(problems[2], DataProblem::LatitudeOutOfRange { .. }));
        assert!(matches!(problems[3], DataProblem::LongitudeOutOfRange { .. }));
    }

    #[test]
    fn test_group_by_type_keeps_type_order() {
        let types: Vec<MissionType> = serde_json::from_str(TYPES).unwrap();
        let missions: Vec<Mission> = serde_json::from_str(
            r#"[
                {"id":"r1","type":"research"},
                {"id":"x1","type":"sales"},
                {"id":"o1","type":"ops"}
            ]"#,
        )
        .unwrap();

        let groups = group_by_type(&missions, &types);
        let names: Vec<&str> = groups.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, vec!["Operations", "Research", "sales"]);
        assert_eq!(groups[0].1[0].id.as_str(), "o1");
    }
}

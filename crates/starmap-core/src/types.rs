//! Mission and mission type records as delivered by the data files

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Link button label used when a mission does not provide its own
pub const DEFAULT_LINK_TEXT: &str = "INITIATE PROTOCOL";

/// Unique identifier for a mission
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MissionId(pub String);

impl MissionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MissionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for MissionId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Identifier of a sector, which is always the id of a mission type
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectorId(pub String);

impl SectorId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SectorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SectorId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Static reference data describing a category of missions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionType {
    pub id: SectorId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
}

impl MissionType {
    /// Placeholder used for missions referencing a type that is not loaded
    pub fn unknown(id: SectorId) -> Self {
        Self {
            id,
            name: "Unknown".to_string(),
            description: String::new(),
            icon: String::new(),
        }
    }
}

/// A mission entry as stored in `missions.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mission {
    pub id: MissionId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(rename = "type")]
    pub mission_type: SectorId,
    #[serde(default)]
    pub lat: f32,
    #[serde(default)]
    pub lon: f32,
    #[serde(default)]
    pub link: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Mission {
    /// Label for the mission's action link
    pub fn link_label(&self) -> &str {
        match self.link_text.as_deref() {
            Some(text) if !text.is_empty() => text,
            _ => DEFAULT_LINK_TEXT,
        }
    }
}

/// A mission after catalog construction, with its type metadata copied in
/// and its marker placement resolved
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogMission {
    pub mission: Mission,
    pub icon: String,
    pub type_name: String,
    pub type_desc: String,
    pub position: Vec3,
}

impl CatalogMission {
    pub fn merge(mission: Mission, mission_type: &MissionType, position: Vec3) -> Self {
        Self {
            icon: mission_type.icon.clone(),
            type_name: mission_type.name.clone(),
            type_desc: mission_type.description.clone(),
            position,
            mission,
        }
    }

    pub fn id(&self) -> &MissionId {
        &self.mission.id
    }

    pub fn sector(&self) -> &SectorId {
        &self.mission.mission_type
    }
}

use crate::prelude::{StageResult, VesselId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Course mark; the ordered list of waypoints defines the course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "lon")]
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Waypoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            name: None,
        }
    }

    pub fn named(latitude: f64, longitude: f64, name: impl Into<String>) -> Self {
        Self {
            latitude,
            longitude,
            name: Some(name.into()),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Course {
    #[serde(default)]
    pub nodes: Vec<Waypoint>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    pub id: u64,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    pub id: VesselId,
    pub name: String,
    #[serde(default)]
    pub tags: Vec<u64>,
}

/// Race metadata: course, class tags and entered boats.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RaceSetup {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course: Option<Course>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub teams: Vec<Team>,
}

/// Boats grouped under one class tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceClass {
    pub name: String,
    pub id: u64,
    pub boats: Vec<VesselId>,
}

/// Normalised lookup key for a class tag name, e.g. "IRC Zero" becomes "irc0".
pub fn class_key(tag_name: &str) -> String {
    let compact: String = tag_name
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    compact.replacen("zero", "0", 1)
}

impl RaceSetup {
    pub fn waypoints(&self) -> &[Waypoint] {
        self.course
            .as_ref()
            .map(|course| course.nodes.as_slice())
            .unwrap_or(&[])
    }

    /// Classes keyed by [`class_key`], boats in team-name order.
    pub fn classes(&self) -> BTreeMap<String, RaceClass> {
        let mut classes: BTreeMap<String, RaceClass> = self
            .tags
            .iter()
            .filter(|tag| !tag.name.is_empty())
            .map(|tag| {
                (
                    class_key(&tag.name),
                    RaceClass {
                        name: tag.name.clone(),
                        id: tag.id,
                        boats: Vec::new(),
                    },
                )
            })
            .collect();

        for team in self.teams_by_name() {
            for class in classes.values_mut() {
                if team.tags.contains(&class.id) {
                    class.boats.push(team.id);
                }
            }
        }
        classes
    }

    pub fn boat_name(&self, id: VesselId) -> String {
        self.teams
            .iter()
            .find(|team| team.id == id)
            .map(|team| team.name.clone())
            .unwrap_or_else(|| format!("Boat {}", id))
    }

    pub fn teams_by_name(&self) -> Vec<&Team> {
        let mut teams: Vec<&Team> = self.teams.iter().collect();
        teams.sort_by(|a, b| a.name.cmp(&b.name));
        teams
    }
}

/// Decodes the contents of a race setup file.
pub fn parse_race_setup_json(contents: &str) -> StageResult<RaceSetup> {
    Ok(serde_json::from_str(contents)?)
}

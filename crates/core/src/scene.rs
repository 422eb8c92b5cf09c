//! Scene module - the fixed catalog of repairable buildings

use std::collections::BTreeSet;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::types::{Building, BuildingId, ScenePosition, MAX_BUILDINGS};

/// The reference scene, in percent of the scene size.
const REFERENCE_BUILDINGS: [(u32, f32, f32); 8] = [
    (1, 15.0, 50.0),
    (2, 30.0, 45.0),
    (3, 45.0, 48.0),
    (4, 60.0, 45.0),
    (5, 75.0, 50.0),
    (6, 85.0, 60.0),
    (7, 50.0, 65.0),
    (8, 25.0, 60.0),
];

#[derive(Debug, Deserialize)]
struct SceneFile {
    buildings: Vec<BuildingRecord>,
}

#[derive(Debug, Deserialize)]
struct BuildingRecord {
    id: u32,
    x: f32,
    y: f32,
}

/// Buildings on the scene, in catalog order
///
/// The order is the one a renderer lists them in, so "building N" in a menu
/// refers to `buildings()[N - 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    buildings: Vec<Building>,
}

impl Scene {
    pub fn new(buildings: Vec<Building>) -> Result<Self, ConfigError> {
        if buildings.is_empty() {
            return Err(ConfigError::NoBuildings);
        }
        if buildings.len() > MAX_BUILDINGS {
            return Err(ConfigError::TooManyBuildings {
                found: buildings.len(),
                max: MAX_BUILDINGS,
            });
        }

        let mut ids = BTreeSet::new();
        for b in &buildings {
            if !ids.insert(b.id) {
                return Err(ConfigError::DuplicateBuildingId(b.id));
            }
            if !b.position.is_normalized() {
                return Err(ConfigError::PositionOutOfRange { id: b.id });
            }
        }

        Ok(Self { buildings })
    }

    /// Parse a `{ "buildings": [{ "id", "x", "y" }] }` document.
    ///
    /// The unit is decided once per document: if any coordinate is above 1,
    /// every coordinate is read as a percentage.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let file: SceneFile = serde_json::from_str(json)?;
        let scale = if file.buildings.iter().any(|r| r.x > 1.0 || r.y > 1.0) {
            100.0
        } else {
            1.0
        };
        let buildings = file
            .buildings
            .into_iter()
            .map(|r| Building {
                id: BuildingId(r.id),
                position: ScenePosition::new(r.x / scale, r.y / scale),
            })
            .collect();
        Self::new(buildings)
    }

    /// The eight-building scene the game ships with.
    pub fn reference() -> Self {
        let buildings = REFERENCE_BUILDINGS
            .iter()
            .map(|&(id, x, y)| Building::new(id, x / 100.0, y / 100.0))
            .collect();
        Self { buildings }
    }

    pub fn len(&self) -> usize {
        self.buildings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buildings.is_empty()
    }

    pub fn buildings(&self) -> &[Building] {
        &self.buildings
    }

    pub fn get(&self, id: BuildingId) -> Option<&Building> {
        self.buildings.iter().find(|b| b.id == id)
    }

    pub fn contains(&self, id: BuildingId) -> bool {
        self.get(id).is_some()
    }

    /// Building at a zero-based catalog position
    pub fn nth(&self, n: usize) -> Option<&Building> {
        self.buildings.get(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_scene_passes_validation() {
        let scene = Scene::reference();
        assert_eq!(scene.len(), 8);
        assert!(Scene::new(scene.buildings().to_vec()).is_ok());
        assert_eq!(scene.nth(0).map(|b| b.id), Some(BuildingId(1)));
        assert_eq!(scene.nth(7).map(|b| b.id), Some(BuildingId(8)));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let buildings = vec![Building::new(1, 0.1, 0.1), Building::new(1, 0.2, 0.2)];
        assert!(matches!(
            Scene::new(buildings),
            Err(ConfigError::DuplicateBuildingId(BuildingId(1)))
        ));
    }

    #[test]
    fn rejects_empty_scene() {
        assert!(matches!(Scene::new(Vec::new()), Err(ConfigError::NoBuildings)));
    }

    #[test]
    fn percent_coordinates_are_normalized() {
        let scene =
            Scene::from_json_str(r#"{"buildings":[{"id":9,"x":50,"y":25},{"id":10,"x":0.5,"y":0.5}]}"#)
                .unwrap();
        let b = scene.get(BuildingId(9)).unwrap();
        assert!((b.position.x - 0.5).abs() < f32::EPSILON);
        assert!((b.position.y - 0.25).abs() < f32::EPSILON);
        assert!(scene.contains(BuildingId(10)));
        assert!(!scene.contains(BuildingId(11)));
    }

    #[test]
    fn small_values_in_percent_document_stay_percent() {
        let scene = Scene::from_json_str(
            r#"{"buildings":[{"id":1,"x":1,"y":50},{"id":2,"x":0.5,"y":40}]}"#,
        )
        .unwrap();
        let a = scene.get(BuildingId(1)).unwrap();
        assert!((a.position.x - 0.01).abs() < 1e-6);
        assert!((a.position.y - 0.5).abs() < 1e-6);
        let b = scene.get(BuildingId(2)).unwrap();
        assert!((b.position.x - 0.005).abs() < 1e-6);
        assert!((b.position.y - 0.4).abs() < 1e-6);
    }

    #[test]
    fn normalized_document_is_taken_as_is() {
        let scene = Scene::from_json_str(
            r#"{"buildings":[{"id":1,"x":1,"y":0.5},{"id":2,"x":0,"y":0.25}]}"#,
        )
        .unwrap();
        let a = scene.get(BuildingId(1)).unwrap();
        assert!((a.position.x - 1.0).abs() < 1e-6);
        assert!((a.position.y - 0.5).abs() < 1e-6);
    }

    #[test]
    fn rejects_more_buildings_than_digit_keys() {
        let nine: Vec<_> = (1..=9).map(|id| Building::new(id, 0.1, 0.1)).collect();
        assert!(Scene::new(nine.clone()).is_ok());

        let mut ten = nine;
        ten.push(Building::new(10, 0.2, 0.2));
        assert!(matches!(
            Scene::new(ten),
            Err(ConfigError::TooManyBuildings { found: 10, max: 9 })
        ));
    }

    #[test]
    fn rejects_out_of_range_positions() {
        let res = Scene::from_json_str(r#"{"buildings":[{"id":1,"x":150,"y":20}]}"#);
        assert!(matches!(
            res,
            Err(ConfigError::PositionOutOfRange { id: BuildingId(1) })
        ));
    }
}

//! Level layout - the arena's starting configuration
//!
//! A layout is loaded once from JSON and rebuilt into the world on every
//! reload, so a reload always starts from the same spawn points and scenery.

use hecs::World;
use serde::{Deserialize, Serialize};
use std::path::Path;

use rlgl_logic::config::ConfigError;

use crate::components::*;

fn default_spawn_tags() -> Vec<String> {
    vec!["Spawnpoint".to_string()]
}

/// A spawn location authored in the level.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpawnPointDef {
    #[serde(default)]
    pub name: String,
    pub position: Vec3,
    #[serde(default = "default_spawn_tags")]
    pub tags: Vec<String>,
}

/// Static box-shaped scenery.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ObstacleDef {
    #[serde(default)]
    pub name: String,
    pub center: Vec3,
    pub half_extents: Vec3,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LevelLayout {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub spawn_points: Vec<SpawnPointDef>,
    #[serde(default)]
    pub obstacles: Vec<ObstacleDef>,
}

impl LevelLayout {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let layout: LevelLayout = serde_json::from_str(json)?;
        layout.validate()?;
        Ok(layout)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Obstacles need a positive extent on every axis. An empty spawn list
    /// is allowed; the round simply never starts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (i, o) in self.obstacles.iter().enumerate() {
            let e = o.half_extents;
            if !(e.x > 0.0 && e.y > 0.0 && e.z > 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "obstacle #{} '{}' has non-positive half extents {:?}",
                    i, o.name, e
                )));
            }
        }
        Ok(())
    }

    /// Spawn markers and scenery into `world`, in authoring order.
    pub fn build(&self, world: &mut World) {
        let mut order = 0;
        for sp in &self.spawn_points {
            world.spawn((
                Position(sp.position),
                Tags(sp.tags.clone()),
                Name(sp.name.clone()),
                LevelOrder(order),
            ));
            order += 1;
        }
        for o in &self.obstacles {
            world.spawn((
                Position(o.center),
                Body::scenery(o.half_extents),
                Tags(o.tags.clone()),
                Name(o.name.clone()),
                LevelOrder(order),
            ));
            order += 1;
        }
        log::debug!(
            "Built level '{}': {} spawn points, {} obstacles",
            self.name,
            self.spawn_points.len(),
            self.obstacles.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_default_tags() {
        let layout = LevelLayout::from_json(
            r#"{
                "name": "tiny",
                "spawn_points": [{ "position": { "x": 0.0, "y": 0.0, "z": 100.0 } }],
                "obstacles": [{
                    "name": "wall",
                    "center": { "x": 0.0, "y": 500.0, "z": 100.0 },
                    "half_extents": { "x": 500.0, "y": 25.0, "z": 200.0 }
                }]
            }"#,
        )
        .expect("valid layout");
        assert_eq!(layout.spawn_points[0].tags, vec!["Spawnpoint".to_string()]);
        assert_eq!(layout.obstacles.len(), 1);
    }

    #[test]
    fn test_rejects_flat_obstacle() {
        let err = LevelLayout::from_json(
            r#"{ "obstacles": [{
                "center": { "x": 0.0, "y": 0.0, "z": 0.0 },
                "half_extents": { "x": 1.0, "y": 0.0, "z": 1.0 }
            }] }"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_build_spawns_markers_and_scenery() {
        let layout = LevelLayout {
            name: "t".into(),
            spawn_points: vec![SpawnPointDef {
                name: "a".into(),
                position: Vec3::new(1.0, 2.0, 3.0),
                tags: default_spawn_tags(),
            }],
            obstacles: vec![ObstacleDef {
                name: "box".into(),
                center: Vec3::ZERO,
                half_extents: Vec3::new(1.0, 1.0, 1.0),
                tags: vec![],
            }],
        };
        let mut world = World::new();
        layout.build(&mut world);

        assert_eq!(world.query::<&Tags>().iter().count(), 2);
        assert_eq!(world.query::<&Body>().iter().count(), 1);
    }
}

//! Generation parameters.
//!
//! Everything a run needs besides the seed lives in [`DungeonConfig`]. The
//! struct deserializes from JSON with every field optional, so a config file
//! only has to name the values it overrides.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::corridor::CorridorShape;
use crate::error::{DungeonError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DungeonConfig {
    pub width: usize,
    pub height: usize,

    pub room_min_size: u32,
    pub room_max_size: u32,
    /// Minimum empty buffer between a room and its leaf boundary
    pub room_wall_border: u32,
    pub room_ugly_rejection: bool,
    pub room_max_ratio: f32,
    pub max_room_retries: u32,

    pub max_depth: u32,
    /// Percent chance (0-100) that a non-root node stops subdividing
    pub chance_stop: u32,
    pub slice_tries: u32,

    pub corridor_width: u32,
    pub corridor_shape: CorridorShape,
}

impl Default for DungeonConfig {
    fn default() -> Self {
        Self {
            width: DUNGEON_DEFAULT_WIDTH,
            height: DUNGEON_DEFAULT_HEIGHT,
            room_min_size: ROOM_DEFAULT_MIN_SIZE,
            room_max_size: ROOM_DEFAULT_MAX_SIZE,
            room_wall_border: ROOM_DEFAULT_WALL_BORDER,
            room_ugly_rejection: ROOM_DEFAULT_UGLY_REJECTION,
            room_max_ratio: ROOM_DEFAULT_MAX_RATIO,
            max_room_retries: ROOM_DEFAULT_MAX_RETRIES,
            max_depth: PARTITION_DEFAULT_MAX_DEPTH,
            chance_stop: PARTITION_DEFAULT_CHANCE_STOP,
            slice_tries: PARTITION_DEFAULT_SLICE_TRIES,
            corridor_width: CORRIDOR_DEFAULT_WIDTH,
            corridor_shape: CorridorShape::default(),
        }
    }
}

impl DungeonConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|source| DungeonError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Smallest leaf edge that can still host a room.
    pub fn min_leaf_size(&self) -> u32 {
        self.room_min_size + 2 * self.room_wall_border
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(DungeonError::InvalidConfig(msg));

        if self.width == 0 || self.height == 0 {
            return invalid(format!("map size {}x{} is empty", self.width, self.height));
        }
        if self.room_min_size == 0 {
            return invalid("room_min_size must be at least 1".into());
        }
        if self.room_min_size > self.room_max_size {
            return invalid(format!(
                "room_min_size {} exceeds room_max_size {}",
                self.room_min_size, self.room_max_size
            ));
        }
        if !(self.room_max_ratio >= 1.0) {
            return invalid(format!("room_max_ratio {} is below 1", self.room_max_ratio));
        }
        if self.corridor_width == 0 {
            return invalid("corridor_width must be at least 1".into());
        }
        if self.max_room_retries == 0 {
            return invalid("max_room_retries must be at least 1".into());
        }
        if self.chance_stop > 100 {
            return invalid(format!("chance_stop {} is not a percentage", self.chance_stop));
        }
        let min_leaf = self.min_leaf_size() as usize;
        if self.width < min_leaf || self.height < min_leaf {
            return invalid(format!(
                "map size {}x{} cannot hold a room of {} tiles with a border of {}",
                self.width, self.height, self.room_min_size, self.room_wall_border
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(DungeonConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = DungeonConfig::from_json_str(r#"{ "width": 32, "corridor_width": 1 }"#).unwrap();
        assert_eq!(config.width, 32);
        assert_eq!(config.corridor_width, 1);
        assert_eq!(config.height, DUNGEON_DEFAULT_HEIGHT);
        assert_eq!(config.corridor_shape, CorridorShape::Reference);
    }

    #[test]
    fn test_corridor_shape_from_json() {
        let config = DungeonConfig::from_json_str(r#"{ "corridor_shape": "mirrored" }"#).unwrap();
        assert_eq!(config.corridor_shape, CorridorShape::Mirrored);
    }

    #[test]
    fn test_rejects_inverted_room_sizes() {
        let config = DungeonConfig {
            room_min_size: 10,
            room_max_size: 4,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(DungeonError::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_map_too_small_for_a_room() {
        let config = DungeonConfig {
            width: 5,
            height: 5,
            room_min_size: 4,
            room_wall_border: 1,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_nan_ratio() {
        let config = DungeonConfig {
            room_max_ratio: f32::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_json_is_a_parse_error() {
        let err = DungeonConfig::from_json_str("{ width: ").unwrap_err();
        assert!(matches!(err, DungeonError::ConfigParse(_)));
    }
}

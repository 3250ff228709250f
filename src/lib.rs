//! Procedural dungeon levels on a tile grid.
//!
//! A run partitions the map with a quadtree, carves one room per leaf, links
//! sibling regions with L-shaped corridors, then resolves walls, border walls
//! and doors from tile adjacency. Everything is driven by a single seed, so
//! the same seed and [`DungeonConfig`] always produce the same [`Dungeon`].

pub mod aabb;
pub mod config;
pub mod constants;
pub mod corridor;
pub mod doors;
pub mod error;
pub mod export;
pub mod generator;
pub mod grid;
pub mod partition;
pub mod room;
pub mod shape;
pub mod tile;
pub mod walls;

pub use config::DungeonConfig;
pub use corridor::CorridorShape;
pub use error::{DungeonError, Result};
pub use export::PngCheckpoints;
pub use generator::{Checkpoint, CheckpointSink, Dungeon, DungeonGenerator, Stage};
pub use grid::Grid;
pub use partition::{NodeId, QuadTree, SpacePartition};
pub use room::{Room, RoomId};
pub use tile::{Tile, TileKind};

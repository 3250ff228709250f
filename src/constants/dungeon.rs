//! Dungeon generation defaults.

/// Default dungeon width in tiles
pub const DUNGEON_DEFAULT_WIDTH: usize = 64;
/// Default dungeon height in tiles
pub const DUNGEON_DEFAULT_HEIGHT: usize = 64;

/// Largest room edge, in tiles
pub const ROOM_DEFAULT_MAX_SIZE: u32 = 24;
/// Smallest room edge, in tiles
pub const ROOM_DEFAULT_MIN_SIZE: u32 = 4;
/// Empty buffer kept between a room and the edge of its leaf region
pub const ROOM_DEFAULT_WALL_BORDER: u32 = 1;
/// Reject rooms that are too elongated
pub const ROOM_DEFAULT_UGLY_REJECTION: bool = true;
/// Largest accepted width/height (or height/width) ratio
pub const ROOM_DEFAULT_MAX_RATIO: f32 = 5.0;
/// Attempts per leaf before the leaf is left without a room
pub const ROOM_DEFAULT_MAX_RETRIES: u32 = 100;

/// Deepest quadtree subdivision
pub const PARTITION_DEFAULT_MAX_DEPTH: u32 = 10;
/// Percent chance that a non-root node stops subdividing
pub const PARTITION_DEFAULT_CHANCE_STOP: u32 = 5;
/// Attempts at finding a slice point that leaves every child big enough
pub const PARTITION_DEFAULT_SLICE_TRIES: u32 = 10;

/// Corridor band width in tiles
pub const CORRIDOR_DEFAULT_WIDTH: u32 = 2;

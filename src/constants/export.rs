//! Debug raster palette (RGBA).

pub const COLOR_EMPTY: [u8; 4] = [0, 0, 0, 255];
pub const COLOR_ROOM: [u8; 4] = [255, 255, 255, 255];
pub const COLOR_CORRIDOR: [u8; 4] = [128, 128, 128, 255];
pub const COLOR_WALL: [u8; 4] = [0, 0, 255, 255];
pub const COLOR_DOOR: [u8; 4] = [139, 90, 43, 255];
/// Outline drawn around each partition leaf
pub const COLOR_ZONE_EDGE: [u8; 4] = [255, 0, 0, 255];
/// Fill for the interior of partition leaves
pub const COLOR_ZONE_FILL: [u8; 4] = [32, 32, 32, 255];

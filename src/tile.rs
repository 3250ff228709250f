use serde::{Deserialize, Serialize};

use crate::room::RoomId;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    #[default]
    Empty,
    Room,
    Corridor,
    Wall,
    WallCorner,
    Door,
}

impl TileKind {
    /// Passable while walls are being resolved. Doors do not exist yet at
    /// that point, so only carved floor counts.
    pub fn is_carved(&self) -> bool {
        matches!(self, TileKind::Room | TileKind::Corridor)
    }

    /// Passable in the finished level.
    pub fn is_walkable(&self) -> bool {
        matches!(self, TileKind::Room | TileKind::Corridor | TileKind::Door)
    }

    /// Anything that renders as a solid piece of wall, door frames included.
    pub fn is_wall_like(&self) -> bool {
        matches!(self, TileKind::Wall | TileKind::WallCorner | TileKind::Door)
    }

    pub fn glyph(&self) -> char {
        match self {
            TileKind::Empty => ' ',
            TileKind::Room => '.',
            TileKind::Corridor => ',',
            TileKind::Wall => '#',
            TileKind::WallCorner => '+',
            TileKind::Door => 'D',
        }
    }
}

/// One grid cell. `room` is set exactly when `kind` is [`TileKind::Room`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    kind: TileKind,
    room: Option<RoomId>,
}

impl Tile {
    pub const EMPTY: Tile = Tile {
        kind: TileKind::Empty,
        room: None,
    };

    pub fn kind(&self) -> TileKind {
        self.kind
    }

    pub fn room(&self) -> Option<RoomId> {
        self.room
    }

    pub(crate) fn carve_room(&mut self, room: RoomId) {
        self.kind = TileKind::Room;
        self.room = Some(room);
    }

    /// Changes the kind of a tile to anything but `Room`, dropping any owner.
    pub(crate) fn set_kind(&mut self, kind: TileKind) {
        debug_assert_ne!(kind, TileKind::Room, "room tiles are carved, not set");
        self.kind = kind;
        self.room = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_passability_by_stage() {
        assert!(TileKind::Room.is_carved());
        assert!(TileKind::Corridor.is_carved());
        assert!(!TileKind::Door.is_carved());
        assert!(TileKind::Door.is_walkable());
        assert!(!TileKind::Wall.is_walkable());
        assert!(!TileKind::Empty.is_walkable());
    }

    #[test]
    fn test_leaving_room_kind_drops_owner() {
        let mut tile = Tile::EMPTY;
        tile.carve_room(RoomId(3));
        assert_eq!(tile.room(), Some(RoomId(3)));
        tile.set_kind(TileKind::Wall);
        assert_eq!(tile.kind(), TileKind::Wall);
        assert_eq!(tile.room(), None);
    }
}

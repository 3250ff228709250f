use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{DungeonError, Result};
use crate::room::RoomId;
use crate::tile::{Tile, TileKind};

/// The tile map, indexed `(x, y)` with `0 <= x < width`, `0 <= y < height`.
///
/// `get`/`kind_at` return `None` off the map and are what the passes use for
/// neighbor probes. The `Result`-returning accessors are the checked contract
/// for callers that expect their coordinates to be on the map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    width: usize,
    height: usize,
    tiles: Vec<Tile>,
}

impl Grid {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            tiles: vec![Tile::EMPTY; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Set every tile back to `Empty`.
    pub fn reset(&mut self) {
        self.tiles.fill(Tile::EMPTY);
    }

    fn get_index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some(y as usize * self.width + x as usize)
    }

    fn checked_index(&self, x: i32, y: i32) -> Result<usize> {
        self.get_index(x, y).ok_or(DungeonError::OutOfRange {
            x,
            y,
            width: self.width,
            height: self.height,
        })
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        self.get_index(x, y).is_some()
    }

    pub fn get(&self, x: i32, y: i32) -> Option<&Tile> {
        self.get_index(x, y).map(|idx| &self.tiles[idx])
    }

    pub fn kind_at(&self, x: i32, y: i32) -> Option<TileKind> {
        self.get(x, y).map(Tile::kind)
    }

    pub fn tile(&self, x: i32, y: i32) -> Result<&Tile> {
        let idx = self.checked_index(x, y)?;
        Ok(&self.tiles[idx])
    }

    pub fn kind(&self, x: i32, y: i32) -> Result<TileKind> {
        self.tile(x, y).map(Tile::kind)
    }

    pub fn is_empty(&self, x: i32, y: i32) -> Result<bool> {
        Ok(self.kind(x, y)? == TileKind::Empty)
    }

    /// Carved floor (`Room` or `Corridor`), the passability walls are built from.
    pub fn is_passable(&self, x: i32, y: i32) -> Result<bool> {
        Ok(self.kind(x, y)?.is_carved())
    }

    /// `Room`, `Corridor` or `Door`, the passability of a finished level.
    pub fn is_walkable(&self, x: i32, y: i32) -> Result<bool> {
        Ok(self.kind(x, y)?.is_walkable())
    }

    /// Overwrite a tile's kind. Room tiles can only be produced by
    /// [`Grid::dig_room`], which records the owning room.
    pub fn set_kind(&mut self, x: i32, y: i32, kind: TileKind) -> Result<()> {
        if kind == TileKind::Room {
            return Err(DungeonError::RoomKindRequiresOwner { x, y });
        }
        let idx = self.checked_index(x, y)?;
        self.tiles[idx].set_kind(kind);
        Ok(())
    }

    /// Unchecked-bounds variant used inside the passes: off-map writes are ignored.
    pub(crate) fn put(&mut self, x: i32, y: i32, kind: TileKind) {
        if let Some(idx) = self.get_index(x, y) {
            self.tiles[idx].set_kind(kind);
        }
    }

    /// Dig the inclusive tile rectangle `[x0, x1] × [y0, y1]` as floor of `room`.
    ///
    /// Reversed bounds are swapped and the rectangle is clipped to the map one
    /// cell at a time; a rectangle entirely off the map digs nothing. Returns
    /// the positions that were dug, row by row.
    pub fn dig_room(&mut self, room: RoomId, x0: i32, y0: i32, x1: i32, y1: i32) -> Vec<(i32, i32)> {
        let (left, right) = (x0.min(x1), x0.max(x1));
        let (bottom, top) = (y0.min(y1), y0.max(y1));

        let left = left.max(0);
        let bottom = bottom.max(0);
        let right = right.min(self.width as i32 - 1);
        let top = top.min(self.height as i32 - 1);

        let mut dug = Vec::new();
        for y in bottom..=top {
            for x in left..=right {
                if let Some(idx) = self.get_index(x, y) {
                    self.tiles[idx].carve_room(room);
                    dug.push((x, y));
                }
            }
        }
        dug
    }

    /// Mark one cell as corridor unless it already belongs to a room.
    /// Off-map cells are skipped.
    pub fn dig_corridor(&mut self, x: i32, y: i32) {
        if let Some(idx) = self.get_index(x, y) {
            if self.tiles[idx].kind() != TileKind::Room {
                self.tiles[idx].set_kind(TileKind::Corridor);
            }
        }
    }

    /// All tiles with their coordinates, row by row from `y = 0`.
    pub fn iter(&self) -> impl Iterator<Item = (i32, i32, &Tile)> + '_ {
        self.tiles.iter().enumerate().map(move |(idx, tile)| {
            ((idx % self.width) as i32, (idx / self.width) as i32, tile)
        })
    }

    pub fn count(&self, kind: TileKind) -> usize {
        self.tiles.iter().filter(|t| t.kind() == kind).count()
    }

    /// Whether (x, y) lies on the outermost ring of the map.
    pub fn on_border(&self, x: i32, y: i32) -> bool {
        self.in_bounds(x, y)
            && (x == 0 || y == 0 || x == self.width as i32 - 1 || y == self.height as i32 - 1)
    }

    /// One line per row, `1` for walkable tiles and `0` otherwise.
    pub fn walkable_mask(&self) -> String {
        let mut out = String::with_capacity((self.width + 1) * self.height);
        for row in self.tiles.chunks(self.width.max(1)) {
            out.extend(row.iter().map(|t| if t.kind().is_walkable() { '1' } else { '0' }));
            out.push('\n');
        }
        out
    }
}

impl fmt::Display for Grid {
    /// ASCII picture with the highest row first, so north is up.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.tiles.chunks(self.width.max(1)).rev() {
            let line: String = row.iter().map(|t| t.kind().glyph()).collect();
            writeln!(f, "{}", line.trim_end())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_grid_is_empty() {
        let grid = Grid::new(6, 4);
        assert_eq!(grid.count(TileKind::Empty), 24);
        assert!(grid.is_empty(5, 3).unwrap());
    }

    #[test]
    fn test_checked_access_out_of_range() {
        let grid = Grid::new(4, 4);
        assert!(matches!(
            grid.kind(4, 0),
            Err(DungeonError::OutOfRange { x: 4, y: 0, .. })
        ));
        assert!(grid.is_passable(-1, 2).is_err());
        assert!(grid.get(0, 4).is_none());
    }

    #[test]
    fn test_set_kind_refuses_room() {
        let mut grid = Grid::new(3, 3);
        assert!(matches!(
            grid.set_kind(1, 1, TileKind::Room),
            Err(DungeonError::RoomKindRequiresOwner { .. })
        ));
        grid.set_kind(1, 1, TileKind::Wall).unwrap();
        assert_eq!(grid.kind(1, 1).unwrap(), TileKind::Wall);
    }

    #[test]
    fn test_dig_room_swaps_and_clips() {
        let mut grid = Grid::new(5, 5);
        let dug = grid.dig_room(RoomId(0), 6, 3, 3, -2);
        // x clipped to 3..=4, y clipped to 0..=3
        assert_eq!(dug.len(), 2 * 4);
        assert_eq!(grid.count(TileKind::Room), 8);
        assert_eq!(grid.get(4, 0).unwrap().room(), Some(RoomId(0)));
        assert_eq!(grid.kind_at(2, 0), Some(TileKind::Empty));
    }

    #[test]
    fn test_dig_room_fully_off_map_is_noop() {
        let mut grid = Grid::new(5, 5);
        assert!(grid.dig_room(RoomId(0), 7, 7, 9, 9).is_empty());
        assert_eq!(grid.count(TileKind::Room), 0);
    }

    #[test]
    fn test_corridor_never_overwrites_room() {
        let mut grid = Grid::new(3, 1);
        grid.dig_room(RoomId(0), 1, 0, 1, 0);
        for x in -1..4 {
            grid.dig_corridor(x, 0);
        }
        assert_eq!(grid.kind_at(0, 0), Some(TileKind::Corridor));
        assert_eq!(grid.kind_at(1, 0), Some(TileKind::Room));
        assert_eq!(grid.kind_at(2, 0), Some(TileKind::Corridor));
    }

    #[test]
    fn test_walkable_includes_doors() {
        let mut grid = Grid::new(4, 1);
        grid.dig_room(RoomId(0), 0, 0, 0, 0);
        grid.put(1, 0, TileKind::Door);
        grid.put(2, 0, TileKind::Wall);
        assert!(grid.is_walkable(0, 0).unwrap());
        assert!(grid.is_walkable(1, 0).unwrap());
        assert!(!grid.is_passable(1, 0).unwrap());
        assert!(!grid.is_walkable(2, 0).unwrap());
        assert!(!grid.is_walkable(3, 0).unwrap());
        assert!(grid.is_walkable(4, 0).is_err());
    }

    #[test]
    fn test_on_border() {
        let grid = Grid::new(4, 3);
        assert!(grid.on_border(0, 1));
        assert!(grid.on_border(3, 1));
        assert!(grid.on_border(2, 2));
        assert!(!grid.on_border(1, 1));
        assert!(!grid.on_border(4, 0));
    }

    #[test]
    fn test_display_puts_north_first() {
        let mut grid = Grid::new(2, 2);
        grid.put(0, 1, TileKind::Wall);
        assert_eq!(grid.to_string(), "#\n\n");
        assert_eq!(grid.walkable_mask(), "00\n00\n");
    }
}

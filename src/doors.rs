//! Door placement where corridors meet rooms.
//!
//! Detection marks corridor tiles squeezed between walls that lead straight
//! from a corridor into a room. Correction then takes back the doors that do
//! not sit in a real gap: corridors grazing along a room, and doors whose
//! surroundings no longer form the pattern they were detected with.

use log::debug;

use crate::grid::Grid;
use crate::tile::TileKind;

/// The four orthogonal neighbors of a tile; `None` off the map.
struct Neighbors {
    north: Option<TileKind>,
    south: Option<TileKind>,
    east: Option<TileKind>,
    west: Option<TileKind>,
}

impl Neighbors {
    fn of(grid: &Grid, x: i32, y: i32) -> Self {
        Self {
            north: grid.kind_at(x, y + 1),
            south: grid.kind_at(x, y - 1),
            east: grid.kind_at(x + 1, y),
            west: grid.kind_at(x - 1, y),
        }
    }

    fn wall_north_or_south(&self) -> bool {
        self.north == Some(TileKind::Wall) || self.south == Some(TileKind::Wall)
    }

    fn wall_east_or_west(&self) -> bool {
        self.east == Some(TileKind::Wall) || self.west == Some(TileKind::Wall)
    }

    fn corridor_north_or_south(&self) -> bool {
        self.north == Some(TileKind::Corridor) || self.south == Some(TileKind::Corridor)
    }

    fn corridor_east_or_west(&self) -> bool {
        self.east == Some(TileKind::Corridor) || self.west == Some(TileKind::Corridor)
    }

    /// Room on one side of the vertical axis, corridor on the other.
    fn room_across_north_south(&self) -> bool {
        room_opposite_corridor(self.north, self.south)
    }

    fn room_across_east_west(&self) -> bool {
        room_opposite_corridor(self.east, self.west)
    }

    fn is_doorway(&self) -> bool {
        (self.wall_north_or_south() && self.room_across_east_west())
            || (self.wall_east_or_west() && self.room_across_north_south())
    }

    fn is_grazing(&self) -> bool {
        (self.room_across_north_south() && self.corridor_east_or_west())
            || (self.room_across_east_west() && self.corridor_north_or_south())
    }
}

fn room_opposite_corridor(a: Option<TileKind>, b: Option<TileKind>) -> bool {
    matches!(
        (a, b),
        (Some(TileKind::Room), Some(TileKind::Corridor)) | (Some(TileKind::Corridor), Some(TileKind::Room))
    )
}

/// Interior tiles, row by row. The outer ring is walled off before doors are
/// placed, so it never holds corridor.
fn interior(grid: &Grid) -> impl Iterator<Item = (i32, i32)> {
    let w = grid.width() as i32;
    let h = grid.height() as i32;
    (1..h - 1).flat_map(move |y| (1..w - 1).map(move |x| (x, y)))
}

/// Detect doors, then correct the false positives.
pub fn generate_doors(grid: &mut Grid) {
    puffin::profile_function!();

    let detected = detect_doors(grid);
    let reverted = correct_doors(grid);
    debug!(
        "placed {} doors ({detected} detected, {reverted} reverted)",
        grid.count(TileKind::Door)
    );
}

/// Turn corridor tiles that form a doorway into `Door`.
///
/// Tiles are updated as the scan goes, so a new door is no longer corridor
/// for the tiles visited after it.
pub fn detect_doors(grid: &mut Grid) -> usize {
    let mut detected = 0;
    for (x, y) in interior(grid) {
        if grid.kind_at(x, y) != Some(TileKind::Corridor) {
            continue;
        }
        if Neighbors::of(grid, x, y).is_doorway() {
            grid.put(x, y, TileKind::Door);
            detected += 1;
        }
    }
    detected
}

/// Revert doors that graze a room or no longer sit in a doorway, repeating
/// until nothing changes. Returns how many doors were reverted.
pub fn correct_doors(grid: &mut Grid) -> usize {
    let mut reverted = 0;
    loop {
        let mut changed = 0;
        for (x, y) in interior(grid) {
            if grid.kind_at(x, y) != Some(TileKind::Door) {
                continue;
            }
            let n = Neighbors::of(grid, x, y);
            if n.is_grazing() || !n.is_doorway() {
                grid.put(x, y, TileKind::Corridor);
                changed += 1;
            }
        }
        if changed == 0 {
            return reverted;
        }
        reverted += changed;
    }
}

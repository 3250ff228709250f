//! Wall placement from tile adjacency.

use log::debug;

use crate::grid::Grid;
use crate::tile::TileKind;

const ORTHOGONAL: [(i32, i32); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];

/// Diagonal directions; a corner looks at the two orthogonal neighbors
/// `(dx, 0)` and `(0, dy)` and the diagonal `(dx, dy)` between them.
const DIAGONALS: [(i32, i32); 4] = [(-1, -1), (1, -1), (-1, 1), (1, 1)];

/// Classify walls, then inner wall corners.
///
/// The corner pass reads the wall layout of the whole map, so it only starts
/// once every wall is placed.
pub fn generate_walls(grid: &mut Grid) {
    puffin::profile_function!();

    let walls = place_walls(grid);
    let corners = place_wall_corners(grid);
    debug!("placed {walls} walls and {corners} wall corners");
}

/// Every non-carved tile touching carved floor on a side becomes `Wall`.
pub fn place_walls(grid: &mut Grid) -> usize {
    let mut walls = Vec::new();
    for (x, y, tile) in grid.iter() {
        if tile.kind().is_carved() {
            continue;
        }
        let touches_floor = ORTHOGONAL
            .iter()
            .any(|&(dx, dy)| grid.kind_at(x + dx, y + dy).is_some_and(|k| k.is_carved()));
        if touches_floor {
            walls.push((x, y));
        }
    }

    for &(x, y) in &walls {
        grid.put(x, y, TileKind::Wall);
    }
    walls.len()
}

fn is_inner_corner(grid: &Grid, x: i32, y: i32) -> bool {
    let is_wall = |x: i32, y: i32| grid.kind_at(x, y) == Some(TileKind::Wall);

    DIAGONALS.iter().any(|&(dx, dy)| {
        grid.in_bounds(x + dx, y + dy)
            && is_wall(x + dx, y)
            && is_wall(x, y + dy)
            && !is_wall(x + dx, y + dy)
    })
}

/// Every `Empty` tile closing an L of walls whose inside diagonal is open
/// becomes `WallCorner`.
pub fn place_wall_corners(grid: &mut Grid) -> usize {
    let corners: Vec<(i32, i32)> = grid
        .iter()
        .filter(|(x, y, tile)| tile.kind() == TileKind::Empty && is_inner_corner(grid, *x, *y))
        .map(|(x, y, _)| (x, y))
        .collect();

    for &(x, y) in &corners {
        grid.put(x, y, TileKind::WallCorner);
    }
    corners.len()
}

/// Close the outer ring of the map.
///
/// Any ring tile that is not `Empty` becomes `Wall`. Once the whole ring is
/// walled, a ring wall whose neighbor pointing into the map is wall-like
/// becomes `WallCorner`, which covers the map's own corners. Needed when
/// rooms are allowed to touch the map edge.
pub fn repair_borders(grid: &mut Grid) {
    puffin::profile_function!();

    let ring: Vec<(i32, i32)> = grid
        .iter()
        .filter(|(x, y, tile)| grid.on_border(*x, *y) && tile.kind() != TileKind::Empty)
        .map(|(x, y, _)| (x, y))
        .collect();
    for &(x, y) in &ring {
        grid.put(x, y, TileKind::Wall);
    }

    let corners: Vec<(i32, i32)> = ring
        .iter()
        .copied()
        .filter(|&(x, y)| faces_wall_inward(grid, x, y))
        .collect();
    for &(x, y) in &corners {
        grid.put(x, y, TileKind::WallCorner);
    }
    debug!("walled {} border tiles, {} as corners", ring.len(), corners.len());
}

fn faces_wall_inward(grid: &Grid, x: i32, y: i32) -> bool {
    let w = grid.width() as i32;
    let h = grid.height() as i32;
    let inward = [
        (x == 0, (1, 0)),
        (y == 0, (0, 1)),
        (x == w - 1, (-1, 0)),
        (y == h - 1, (0, -1)),
    ];
    inward.iter().any(|&(edge, (dx, dy))| {
        edge && grid.kind_at(x + dx, y + dy).is_some_and(|k| k.is_wall_like())
    })
}

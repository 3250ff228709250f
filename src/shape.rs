//! Shape hints for turning finished tiles into geometry.
//!
//! A wall tile flanked by walls on one axis and open on the other is a thin
//! segment running along that axis; anything else is a full block. Mesh
//! builders read these instead of re-deriving adjacency themselves.

use serde::{Deserialize, Serialize};

use crate::grid::Grid;
use crate::tile::TileKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Shape {
    /// Fills the whole tile
    Block,
    /// Thin segment running east-west
    AlongX,
    /// Thin segment running north-south
    AlongY,
}

/// Segment direction from wall-like neighbors. Tiles on the map edge have
/// no pair of neighbors on the edge-crossing axis and stay blocks here.
fn segment(grid: &Grid, x: i32, y: i32) -> Shape {
    let wall_like = |dx: i32, dy: i32| grid.kind_at(x + dx, y + dy).map(|k| k.is_wall_like());

    let (east, west) = (wall_like(1, 0), wall_like(-1, 0));
    let (north, south) = (wall_like(0, 1), wall_like(0, -1));

    let x_interior = east.is_some() && west.is_some();
    let y_interior = north.is_some() && south.is_some();
    let solid = |side: Option<bool>| side == Some(true);
    let open = |side: Option<bool>| side == Some(false);

    let mut shape = Shape::Block;
    if x_interior && y_interior && solid(east) && solid(west) && open(north) && open(south) {
        shape = Shape::AlongX;
    }
    if x_interior && y_interior && solid(north) && solid(south) && open(east) && open(west) {
        shape = Shape::AlongY;
    }
    shape
}

/// Shape of a `Wall` or `WallCorner` tile; `None` for anything else.
///
/// Plain walls on the map's outer ring always run along the edge.
pub fn wall_shape(grid: &Grid, x: i32, y: i32) -> Option<Shape> {
    let kind = grid.kind_at(x, y)?;
    if !matches!(kind, TileKind::Wall | TileKind::WallCorner) {
        return None;
    }

    let mut shape = segment(grid, x, y);
    if kind == TileKind::Wall {
        let (w, h) = (grid.width() as i32, grid.height() as i32);
        if x == 0 || x == w - 1 {
            shape = Shape::AlongY;
        }
        if y == 0 || y == h - 1 {
            shape = Shape::AlongX;
        }
    }
    Some(shape)
}

/// Shape of a `Door` tile: a thin panel when it sits in a straight wall.
pub fn door_shape(grid: &Grid, x: i32, y: i32) -> Option<Shape> {
    if grid.kind_at(x, y)? != TileKind::Door {
        return None;
    }
    Some(segment(grid, x, y))
}

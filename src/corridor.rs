//! L-shaped corridor digging.

use serde::{Deserialize, Serialize};

use crate::aabb::Xy;
use crate::grid::Grid;

/// How the horizontal leg is dug when the path runs toward smaller x.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CorridorShape {
    /// The leg collapses to the single row `row2`, whatever the width.
    /// Matches the layouts produced by earlier versions of the generator.
    #[default]
    Reference,
    /// The leg is `width` rows tall in both directions.
    Mirrored,
}

/// Everything a partition needs to dig its corridors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CorridorSettings {
    pub width: u32,
    pub shape: CorridorShape,
}

/// Dig a two-leg corridor from `p1` to `p2`, each rounded to the nearest tile.
///
/// The vertical leg runs along column `col1` from `row1` to `row2`, then the
/// horizontal leg runs along row `row2` from `col1` to `col2`. Each leg is a
/// band `width` tiles thick growing toward +x / +y. Room tiles are never
/// overwritten and off-map cells are skipped.
pub fn dig_path(grid: &mut Grid, p1: Xy, p2: Xy, settings: CorridorSettings) {
    puffin::profile_function!();

    let (col1, row1) = p1.to_tile();
    let (col2, row2) = p2.to_tile();
    let width = settings.width as i32;

    let (row_lo, row_hi) = (row1.min(row2), row1.max(row2));
    for col in col1..col1 + width {
        for row in row_lo..=row_hi {
            grid.dig_corridor(col, row);
        }
    }

    if col1 <= col2 {
        for row in row2..row2 + width {
            for col in col1..=col2 {
                grid.dig_corridor(col, row);
            }
        }
    } else {
        for row in row2..row2 + width {
            let row = match settings.shape {
                CorridorShape::Reference => row2,
                CorridorShape::Mirrored => row,
            };
            for col in col2..=col1 {
                grid.dig_corridor(col, row);
            }
        }
    }
}

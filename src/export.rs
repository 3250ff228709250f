//! PNG snapshots of a run, one pixel per tile, north up.

use std::fs;
use std::path::{Path, PathBuf};

use image::{Rgba, RgbaImage};
use log::info;

use crate::constants::*;
use crate::error::{DungeonError, Result};
use crate::generator::{Checkpoint, CheckpointSink, Dungeon};
use crate::grid::Grid;
use crate::partition::{QuadTree, SpacePartition};
use crate::tile::TileKind;

fn tile_color(kind: TileKind) -> [u8; 4] {
    match kind {
        TileKind::Empty => COLOR_EMPTY,
        TileKind::Room => COLOR_ROOM,
        TileKind::Corridor => COLOR_CORRIDOR,
        TileKind::Wall | TileKind::WallCorner => COLOR_WALL,
        TileKind::Door => COLOR_DOOR,
    }
}

/// Image rows run top-down, grid rows bottom-up.
fn pixel_row(height: usize, y: i32) -> u32 {
    (height as i32 - 1 - y) as u32
}

pub fn render_grid(grid: &Grid) -> RgbaImage {
    let mut img = RgbaImage::new(grid.width() as u32, grid.height() as u32);
    for (x, y, tile) in grid.iter() {
        img.put_pixel(x as u32, pixel_row(grid.height(), y), Rgba(tile_color(tile.kind())));
    }
    img
}

/// Leaf regions filled, with their edge tiles outlined.
pub fn render_partition(partition: &QuadTree, width: usize, height: usize) -> RgbaImage {
    let mut img = RgbaImage::from_pixel(width as u32, height as u32, Rgba(COLOR_EMPTY));
    for leaf in partition.leaves() {
        let b = partition.node(leaf).boundary;
        let (l, r, bottom, t) = (b.left_tile(), b.right_tile(), b.bottom_tile(), b.top_tile());
        for y in bottom.max(0)..t.min(height as i32) {
            for x in l.max(0)..r.min(width as i32) {
                let edge = x == l || x == r - 1 || y == bottom || y == t - 1;
                let color = if edge { COLOR_ZONE_EDGE } else { COLOR_ZONE_FILL };
                img.put_pixel(x as u32, pixel_row(height, y), Rgba(color));
            }
        }
    }
    img
}

/// Writes `<dir>/<seed>_<checkpoint>.png` at every checkpoint.
pub struct PngCheckpoints {
    dir: PathBuf,
}

impl PngCheckpoints {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, seed: u64, checkpoint: Checkpoint) -> PathBuf {
        self.dir.join(format!("{seed}_{}.png", checkpoint.name()))
    }
}

fn save(img: &RgbaImage, path: &Path) -> Result<()> {
    img.save(path).map_err(|source| DungeonError::Image {
        path: path.to_path_buf(),
        source,
    })
}

impl CheckpointSink for PngCheckpoints {
    fn checkpoint(&mut self, checkpoint: Checkpoint, dungeon: &Dungeon) -> Result<()> {
        puffin::profile_function!();

        fs::create_dir_all(&self.dir).map_err(|source| DungeonError::Io {
            path: self.dir.clone(),
            source,
        })?;

        let img = match checkpoint {
            Checkpoint::Partition => {
                render_partition(&dungeon.partition, dungeon.grid.width(), dungeon.grid.height())
            }
            _ => render_grid(&dungeon.grid),
        };
        let path = self.path_for(dungeon.seed, checkpoint);
        save(&img, &path)?;
        info!("wrote {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DungeonConfig;
    use crate::generator::DungeonGenerator;

    #[test]
    fn test_grid_render_puts_north_up() {
        let mut grid = Grid::new(3, 2);
        grid.put(0, 1, TileKind::Wall);
        grid.put(2, 0, TileKind::Corridor);
        let img = render_grid(&grid);
        assert_eq!(img.dimensions(), (3, 2));
        assert_eq!(img.get_pixel(0, 0), &Rgba(COLOR_WALL));
        assert_eq!(img.get_pixel(2, 1), &Rgba(COLOR_CORRIDOR));
        assert_eq!(img.get_pixel(1, 1), &Rgba(COLOR_EMPTY));
    }

    #[test]
    fn test_partition_render_outlines_leaves() {
        let mut tree = QuadTree::new(10, 10);
        tree.split(tree.root(), 5, 5);
        let img = render_partition(&tree, 10, 10);
        assert_eq!(img.get_pixel(0, 0), &Rgba(COLOR_ZONE_EDGE));
        assert_eq!(img.get_pixel(4, 2), &Rgba(COLOR_ZONE_EDGE));
        assert_eq!(img.get_pixel(5, 2), &Rgba(COLOR_ZONE_EDGE));
        assert_eq!(img.get_pixel(2, 2), &Rgba(COLOR_ZONE_FILL));
    }

    #[test]
    fn test_checkpoints_written_per_stage() {
        let dir = std::env::temp_dir().join(format!("quadtree-dungeon-export-{}", std::process::id()));
        let mut sink = PngCheckpoints::new(&dir);
        let mut generator = DungeonGenerator::new(DungeonConfig::default()).unwrap();
        generator.generate_with(42, &mut sink).unwrap();

        for checkpoint in [
            Checkpoint::Partition,
            Checkpoint::Rooms,
            Checkpoint::Corridors,
            Checkpoint::Walls,
        ] {
            let path = sink.path_for(42, checkpoint);
            let img = image::open(&path).unwrap().into_rgba8();
            assert_eq!(img.dimensions(), (64, 64));
        }
        let _ = fs::remove_dir_all(&dir);
    }
}

//! The generation pipeline.
//!
//! A run walks a fixed sequence of stages, each one relying on everything the
//! previous stages produced:
//!
//! ```text
//! Reset -> PartitionBuilt -> RoomsCarved -> CorridorsCarved
//!       -> WallsResolved -> BordersRepaired -> DoorsResolved -> Done
//! ```
//!
//! There is no way back except a full [`DungeonGenerator::reset`]. A failed
//! run leaves the generator reset rather than holding a half-built level.

use log::{debug, info};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use crate::config::DungeonConfig;
use crate::corridor::CorridorSettings;
use crate::doors::generate_doors;
use crate::error::Result;
use crate::grid::Grid;
use crate::partition::{NodeId, QuadTree, SpacePartition};
use crate::room::{Room, RoomCarver, RoomId};
use crate::tile::Tile;
use crate::walls::{generate_walls, repair_borders};

/// The RNG driving a run. Seeded per run so a seed always yields the same level.
pub type DungeonRng = ChaCha8Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Stage {
    Reset,
    PartitionBuilt,
    RoomsCarved,
    CorridorsCarved,
    WallsResolved,
    BordersRepaired,
    DoorsResolved,
    Done,
}

impl Stage {
    pub fn next(self) -> Option<Stage> {
        match self {
            Stage::Reset => Some(Stage::PartitionBuilt),
            Stage::PartitionBuilt => Some(Stage::RoomsCarved),
            Stage::RoomsCarved => Some(Stage::CorridorsCarved),
            Stage::CorridorsCarved => Some(Stage::WallsResolved),
            Stage::WallsResolved => Some(Stage::BordersRepaired),
            Stage::BordersRepaired => Some(Stage::DoorsResolved),
            Stage::DoorsResolved => Some(Stage::Done),
            Stage::Done => None,
        }
    }

    /// The debug checkpoint reached when entering this stage, if any.
    pub fn checkpoint(self) -> Option<Checkpoint> {
        match self {
            Stage::PartitionBuilt => Some(Checkpoint::Partition),
            Stage::RoomsCarved => Some(Checkpoint::Rooms),
            Stage::CorridorsCarved => Some(Checkpoint::Corridors),
            Stage::Done => Some(Checkpoint::Walls),
            _ => None,
        }
    }
}

/// Named points in a run where the level can be inspected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Checkpoint {
    Partition,
    Rooms,
    Corridors,
    /// The finished level, walls and doors included
    Walls,
}

impl Checkpoint {
    pub fn name(self) -> &'static str {
        match self {
            Checkpoint::Partition => "quadtree",
            Checkpoint::Rooms => "rooms",
            Checkpoint::Corridors => "corridors",
            Checkpoint::Walls => "walls",
        }
    }
}

/// Read-only observer of a run, called at every [`Checkpoint`].
pub trait CheckpointSink {
    fn checkpoint(&mut self, checkpoint: Checkpoint, dungeon: &Dungeon) -> Result<()>;
}

/// Sink that ignores every checkpoint.
pub struct NoCheckpoints;

impl CheckpointSink for NoCheckpoints {
    fn checkpoint(&mut self, _checkpoint: Checkpoint, _dungeon: &Dungeon) -> Result<()> {
        Ok(())
    }
}

/// Output of a run: the tile map, its rooms and the partition they came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dungeon {
    pub seed: u64,
    pub grid: Grid,
    pub rooms: Vec<Room>,
    pub partition: QuadTree,
}

impl Dungeon {
    fn empty(config: &DungeonConfig, seed: u64) -> Self {
        Self {
            seed,
            grid: Grid::new(config.width, config.height),
            rooms: Vec::new(),
            partition: QuadTree::new(config.width, config.height),
        }
    }

    /// Tile at (x, y), `None` off the map.
    pub fn tile_at(&self, x: i32, y: i32) -> Option<&Tile> {
        self.grid.get(x, y)
    }

    pub fn room(&self, id: RoomId) -> Option<&Room> {
        self.rooms.get(id.0)
    }

    /// The room owning the tile at (x, y).
    pub fn room_at(&self, x: i32, y: i32) -> Option<&Room> {
        self.tile_at(x, y)?.room().and_then(|id| self.room(id))
    }

    /// Positions of every tile inside partition leaf `leaf`.
    pub fn zone_tiles(&self, leaf: NodeId) -> impl Iterator<Item = (i32, i32)> + '_ {
        let b = self.partition.node(leaf).boundary;
        let x0 = b.left_tile().max(0);
        let x1 = b.right_tile().min(self.grid.width() as i32);
        let y0 = b.bottom_tile().max(0);
        let y1 = b.top_tile().min(self.grid.height() as i32);
        (y0..y1).flat_map(move |y| (x0..x1).map(move |x| (x, y)))
    }

    /// A random walkable tile away from the map edge.
    pub fn random_passable_position(&self, rng: &mut impl Rng) -> Option<(i32, i32)> {
        let candidates: Vec<(i32, i32)> = self
            .grid
            .iter()
            .filter(|(x, y, tile)| tile.kind().is_walkable() && !self.grid.on_border(*x, *y))
            .map(|(x, y, _)| (x, y))
            .collect();
        candidates.choose(rng).copied()
    }

    pub fn log_rooms(&self) {
        info!("Rooms: {}", self.rooms.len());
        for room in &self.rooms {
            debug!("    Room{} ({} tiles)", room.id.0, room.tiles.len());
        }
    }
}

/// Runs the pipeline. Owns the level being built for the whole run.
pub struct DungeonGenerator {
    config: DungeonConfig,
    stage: Stage,
    rng: DungeonRng,
    dungeon: Dungeon,
}

impl DungeonGenerator {
    pub fn new(config: DungeonConfig) -> Result<Self> {
        config.validate()?;
        let dungeon = Dungeon::empty(&config, 0);
        Ok(Self {
            config,
            stage: Stage::Reset,
            rng: DungeonRng::seed_from_u64(0),
            dungeon,
        })
    }

    pub fn config(&self) -> &DungeonConfig {
        &self.config
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn dungeon(&self) -> &Dungeon {
        &self.dungeon
    }

    pub fn into_dungeon(self) -> Dungeon {
        self.dungeon
    }

    /// Empty the grid, drop rooms and partition, and reseed.
    pub fn reset(&mut self, seed: u64) {
        self.dungeon.seed = seed;
        self.dungeon.grid.reset();
        self.dungeon.rooms.clear();
        self.dungeon.partition = QuadTree::new(self.config.width, self.config.height);
        self.rng = DungeonRng::seed_from_u64(seed);
        self.stage = Stage::Reset;
    }

    /// Run the next pass and return the stage reached. Does nothing once `Done`.
    pub fn step(&mut self) -> Stage {
        let Some(next) = self.stage.next() else {
            return self.stage;
        };

        let dungeon = &mut self.dungeon;
        match next {
            Stage::PartitionBuilt => {
                info!("Generating quadtree");
                dungeon.partition.grow(&self.config, &mut self.rng);
            }
            Stage::RoomsCarved => {
                info!("Generating rooms");
                dungeon.rooms =
                    RoomCarver::new(&self.config).carve_all(&mut dungeon.grid, &mut dungeon.partition, &mut self.rng);
            }
            Stage::CorridorsCarved => {
                info!("Generating corridors");
                let settings = CorridorSettings {
                    width: self.config.corridor_width,
                    shape: self.config.corridor_shape,
                };
                dungeon.partition.carve_corridors(&mut dungeon.grid, &dungeon.rooms, settings);
            }
            Stage::WallsResolved => {
                info!("Generating walls");
                generate_walls(&mut dungeon.grid);
            }
            Stage::BordersRepaired => {
                info!("Fixing walls on map borders");
                repair_borders(&mut dungeon.grid);
            }
            Stage::DoorsResolved => {
                info!("Generating doors");
                generate_doors(&mut dungeon.grid);
            }
            Stage::Done | Stage::Reset => {}
        }

        self.stage = next;
        next
    }

    /// Build a complete level for `seed`.
    pub fn generate(&mut self, seed: u64) -> Result<&Dungeon> {
        self.generate_with(seed, &mut NoCheckpoints)
    }

    /// Build a complete level for `seed`, showing `sink` every checkpoint.
    ///
    /// If the sink fails the run is abandoned and the generator is reset.
    pub fn generate_with(&mut self, seed: u64, sink: &mut dyn CheckpointSink) -> Result<&Dungeon> {
        puffin::profile_function!();

        self.reset(seed);
        while self.stage != Stage::Done {
            let stage = self.step();
            if let Some(checkpoint) = stage.checkpoint() {
                if let Err(err) = sink.checkpoint(checkpoint, &self.dungeon) {
                    self.reset(seed);
                    return Err(err);
                }
            }
        }
        Ok(&self.dungeon)
    }
}

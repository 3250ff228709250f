//! Room placement inside partition leaves.

use log::{debug, warn};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::aabb::{Aabb, Xy};
use crate::config::DungeonConfig;
use crate::grid::Grid;
use crate::partition::{NodeId, SpacePartition};

/// Index of a room in the generator's room list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoomId(pub usize);

/// A carved room. Created once per leaf and never changed afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    pub boundary: Aabb,
    /// The partition leaf the room was carved in
    pub leaf: NodeId,
    /// Tiles dug for this room, row by row
    pub tiles: Vec<(i32, i32)>,
}

impl Room {
    pub fn center(&self) -> Xy {
        self.boundary.center
    }
}

/// Places one rectangular room per leaf region.
pub struct RoomCarver<'a> {
    config: &'a DungeonConfig,
}

impl<'a> RoomCarver<'a> {
    pub fn new(config: &'a DungeonConfig) -> Self {
        Self { config }
    }

    /// Carve a room in every leaf, depth-first in NW, NE, SW, SE order, and
    /// link each room to its leaf. Leaves that cannot fit a room stay empty.
    pub fn carve_all<P: SpacePartition>(
        &self,
        grid: &mut Grid,
        partition: &mut P,
        rng: &mut impl Rng,
    ) -> Vec<Room> {
        puffin::profile_function!();

        let mut rooms = Vec::new();
        for leaf in partition.leaves() {
            let boundary = partition.node(leaf).boundary;
            match self.carve_room(grid, RoomId(rooms.len()), leaf, &boundary, rng) {
                Some(room) => {
                    partition.assign_room(leaf, room.id);
                    rooms.push(room);
                }
                None => warn!(
                    "leaf {:?} could not fit a room after {} attempts",
                    leaf, self.config.max_room_retries
                ),
            }
        }
        rooms
    }

    /// Pick a room for `leaf_boundary` and dig it into the grid.
    pub fn carve_room(
        &self,
        grid: &mut Grid,
        id: RoomId,
        leaf: NodeId,
        leaf_boundary: &Aabb,
        rng: &mut impl Rng,
    ) -> Option<Room> {
        let boundary = self.plan_room(leaf_boundary, rng)?;
        let tiles = grid.dig_room(
            id,
            boundary.left_tile(),
            boundary.bottom_tile(),
            boundary.right_tile() - 1,
            boundary.top_tile() - 1,
        );
        debug!("room {} in leaf {:?}: {} tiles", id.0, leaf, tiles.len());

        Some(Room {
            id,
            boundary,
            leaf,
            tiles,
        })
    }

    /// Sample room boundaries until one passes, or give up after
    /// `max_room_retries` attempts.
    pub fn plan_room(&self, leaf_boundary: &Aabb, rng: &mut impl Rng) -> Option<Aabb> {
        (0..self.config.max_room_retries).find_map(|_| self.sample_room(leaf_boundary, rng))
    }

    /// One placement attempt. `None` when the leaf is too small or the
    /// sampled shape is rejected as too elongated.
    fn sample_room(&self, leaf: &Aabb, rng: &mut impl Rng) -> Option<Aabb> {
        let border = self.config.room_wall_border as f32;
        let min_half = self.config.room_min_size as f32 / 2.0;
        let max_half = self.config.room_max_size as f32 / 2.0;

        let center = Xy::new(
            sample(rng, leaf.left() + border + min_half, leaf.right() - min_half - border)?,
            sample(rng, leaf.bottom() + border + min_half, leaf.top() - min_half - border)?,
        );

        let allowed_x = (leaf.right() - center.x - border)
            .min(center.x - leaf.left() - border)
            .min(max_half);
        let allowed_y = (leaf.top() - center.y - border)
            .min(center.y - leaf.bottom() - border)
            .min(max_half);

        let half = Xy::new(
            sample(rng, min_half, allowed_x)?,
            sample(rng, min_half, allowed_y)?,
        );

        if self.config.room_ugly_rejection {
            let ratio = half.x / half.y;
            let max_ratio = self.config.room_max_ratio;
            if ratio > max_ratio || ratio < 1.0 / max_ratio {
                return None;
            }
        }

        Some(Aabb::new(center, half))
    }
}

/// Uniform sample from `[lo, hi]`, or `None` if the range is empty.
fn sample(rng: &mut impl Rng, lo: f32, hi: f32) -> Option<f32> {
    if !(lo <= hi) {
        return None;
    }
    if lo == hi {
        return Some(lo);
    }
    Some(rng.gen_range(lo..=hi))
}

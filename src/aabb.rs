//! Continuous geometry shared by partition regions and rooms.

use serde::{Deserialize, Serialize};

/// A point or extent in continuous map space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Xy {
    pub x: f32,
    pub y: f32,
}

impl Xy {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Nearest tile index, halves rounding to the even neighbor.
    pub fn to_tile(self) -> (i32, i32) {
        (self.x.round_ties_even() as i32, self.y.round_ties_even() as i32)
    }
}

/// Axis-aligned box stored as center and half-extent.
///
/// `top` is the larger y. Tile accessors floor the low edges and ceil the
/// high edges, so `left_tile()..right_tile()` is the half-open column range
/// the box touches.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub center: Xy,
    pub half: Xy,
}

impl Aabb {
    pub const fn new(center: Xy, half: Xy) -> Self {
        Self { center, half }
    }

    /// Box covering tiles `[x, x + width) × [y, y + height)`.
    pub fn from_tiles(x: i32, y: i32, width: i32, height: i32) -> Self {
        let half = Xy::new(width as f32 / 2.0, height as f32 / 2.0);
        Self {
            center: Xy::new(x as f32 + half.x, y as f32 + half.y),
            half,
        }
    }

    pub fn left(&self) -> f32 {
        self.center.x - self.half.x
    }

    pub fn right(&self) -> f32 {
        self.center.x + self.half.x
    }

    pub fn bottom(&self) -> f32 {
        self.center.y - self.half.y
    }

    pub fn top(&self) -> f32 {
        self.center.y + self.half.y
    }

    pub fn left_tile(&self) -> i32 {
        self.left().floor() as i32
    }

    pub fn right_tile(&self) -> i32 {
        self.right().ceil() as i32
    }

    pub fn bottom_tile(&self) -> i32 {
        self.bottom().floor() as i32
    }

    pub fn top_tile(&self) -> i32 {
        self.top().ceil() as i32
    }

    pub fn width(&self) -> f32 {
        self.half.x * 2.0
    }

    pub fn height(&self) -> f32 {
        self.half.y * 2.0
    }

    /// Whether the tile at (x, y) lies inside the box's tile range.
    pub fn contains_tile(&self, x: i32, y: i32) -> bool {
        x >= self.left_tile() && x < self.right_tile() && y >= self.bottom_tile() && y < self.top_tile()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges() {
        let b = Aabb::new(Xy::new(5.0, 4.0), Xy::new(2.0, 1.5));
        assert_eq!(b.left(), 3.0);
        assert_eq!(b.right(), 7.0);
        assert_eq!(b.bottom(), 2.5);
        assert_eq!(b.top(), 5.5);
    }

    #[test]
    fn test_tile_accessors_floor_and_ceil() {
        let b = Aabb::new(Xy::new(3.4, 3.4), Xy::new(2.0, 2.0));
        assert_eq!(b.left_tile(), 1);
        assert_eq!(b.right_tile(), 6);
        assert_eq!(b.bottom_tile(), 1);
        assert_eq!(b.top_tile(), 6);
    }

    #[test]
    fn test_from_tiles_round_trips_tile_range() {
        let b = Aabb::from_tiles(8, 16, 24, 8);
        assert_eq!((b.left_tile(), b.right_tile()), (8, 32));
        assert_eq!((b.bottom_tile(), b.top_tile()), (16, 24));
        assert!(b.contains_tile(8, 16));
        assert!(!b.contains_tile(32, 16));
    }

    #[test]
    fn test_xy_to_tile_rounds() {
        assert_eq!(Xy::new(2.5, 3.49).to_tile(), (2, 3));
        assert_eq!(Xy::new(3.5, 4.51).to_tile(), (4, 5));
        assert_eq!(Xy::new(-0.5, 0.5).to_tile(), (0, 0));
    }
}

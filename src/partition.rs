//! Recursive space partition feeding the room and corridor passes.
//!
//! The passes only talk to the partition through [`SpacePartition`]. The
//! bundled [`QuadTree`] stores its nodes in an arena addressed by [`NodeId`];
//! rooms point at their leaf and leaves at their room by index, so there are
//! no back-pointers to keep alive.

use log::{debug, warn};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::aabb::{Aabb, Xy};
use crate::config::DungeonConfig;
use crate::corridor::{dig_path, CorridorSettings};
use crate::grid::Grid;
use crate::room::{Room, RoomId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub usize);

/// Child slots of an inner node, in visiting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quadrant {
    NorthWest = 0,
    NorthEast = 1,
    SouthWest = 2,
    SouthEast = 3,
}

/// Sibling pairs joined by a corridor. Together they connect all four children.
const CONNECTED_SIBLINGS: [(Quadrant, Quadrant); 3] = [
    (Quadrant::NorthWest, Quadrant::NorthEast),
    (Quadrant::SouthWest, Quadrant::SouthEast),
    (Quadrant::NorthWest, Quadrant::SouthWest),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartitionNode {
    pub boundary: Aabb,
    pub depth: u32,
    /// NW, NE, SW, SE
    pub children: Option<[NodeId; 4]>,
    pub room: Option<RoomId>,
}

impl PartitionNode {
    fn new(boundary: Aabb, depth: u32) -> Self {
        Self {
            boundary,
            depth,
            children: None,
            room: None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    pub fn child(&self, quadrant: Quadrant) -> Option<NodeId> {
        self.children.map(|c| c[quadrant as usize])
    }
}

/// What the generator needs from a space partition.
pub trait SpacePartition {
    fn root(&self) -> NodeId;

    fn node(&self, id: NodeId) -> &PartitionNode;

    /// Leaves in depth-first order, children visited NW, NE, SW, SE.
    fn leaves(&self) -> Vec<NodeId>;

    fn assign_room(&mut self, leaf: NodeId, room: RoomId);

    /// Subdivide from the current leaves using the partition parameters of `config`.
    fn grow(&mut self, config: &DungeonConfig, rng: &mut impl Rng);

    /// Dig corridors linking the rooms of sibling regions.
    fn carve_corridors(&self, grid: &mut Grid, rooms: &[Room], settings: CorridorSettings);
}

/// Quadtree whose inner nodes are sliced at a random point into four
/// tile-aligned children. North is the larger y.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuadTree {
    nodes: Vec<PartitionNode>,
}

impl QuadTree {
    /// A single leaf covering a `width × height` map.
    pub fn new(width: usize, height: usize) -> Self {
        let root = PartitionNode::new(Aabb::from_tiles(0, 0, width as i32, height as i32), 0);
        Self { nodes: vec![root] }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &PartitionNode)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    /// Slice leaf `id` at tile `(sx, sy)` into four children and return them.
    ///
    /// The slice point must lie strictly inside the leaf's tile range.
    pub fn split(&mut self, id: NodeId, sx: i32, sy: i32) -> [NodeId; 4] {
        let parent = &self.nodes[id.0];
        debug_assert!(parent.is_leaf(), "only leaves can be split");
        let b = parent.boundary;
        let depth = parent.depth + 1;
        let (l, r, bottom, t) = (b.left_tile(), b.right_tile(), b.bottom_tile(), b.top_tile());

        let regions = [
            Aabb::from_tiles(l, sy, sx - l, t - sy),
            Aabb::from_tiles(sx, sy, r - sx, t - sy),
            Aabb::from_tiles(l, bottom, sx - l, sy - bottom),
            Aabb::from_tiles(sx, bottom, r - sx, sy - bottom),
        ];

        let first = self.nodes.len();
        self.nodes
            .extend(regions.into_iter().map(|region| PartitionNode::new(region, depth)));
        let children = [NodeId(first), NodeId(first + 1), NodeId(first + 2), NodeId(first + 3)];
        self.nodes[id.0].children = Some(children);
        children
    }

    fn grow_node(&mut self, id: NodeId, config: &DungeonConfig, rng: &mut impl Rng) {
        let node = &self.nodes[id.0];
        if node.depth >= config.max_depth {
            return;
        }
        if node.depth > 0 && rng.gen_range(0..100) < config.chance_stop {
            return;
        }

        let b = node.boundary;
        let (l, r, bottom, t) = (b.left_tile(), b.right_tile(), b.bottom_tile(), b.top_tile());
        let min = config.min_leaf_size() as i32;
        if r - l < 2 * min || t - bottom < 2 * min {
            return;
        }

        for _ in 0..config.slice_tries {
            let sx = rng.gen_range(l + 1..r);
            let sy = rng.gen_range(bottom + 1..t);
            if sx - l < min || r - sx < min || sy - bottom < min || t - sy < min {
                continue;
            }

            let children = self.split(id, sx, sy);
            for child in children {
                self.grow_node(child, config, rng);
            }
            return;
        }
    }

    /// Center of the first room found depth-first below `id`.
    pub fn anchor(&self, id: NodeId, rooms: &[Room]) -> Option<Xy> {
        let node = &self.nodes[id.0];
        if let Some(room) = node.room {
            return rooms.get(room.0).map(Room::center);
        }
        node.children?
            .iter()
            .find_map(|&child| self.anchor(child, rooms))
    }

    fn connect(&self, id: NodeId, grid: &mut Grid, rooms: &[Room], settings: CorridorSettings) {
        let node = &self.nodes[id.0];
        let Some(children) = node.children else {
            return;
        };

        for child in children {
            self.connect(child, grid, rooms, settings);
        }

        for (a, b) in CONNECTED_SIBLINGS {
            let (a, b) = (children[a as usize], children[b as usize]);
            match (self.anchor(a, rooms), self.anchor(b, rooms)) {
                (Some(from), Some(to)) => dig_path(grid, from, to, settings),
                _ => warn!("no room to connect between {:?} and {:?}", a, b),
            }
        }
    }

    /// The leaf whose region contains tile (x, y).
    pub fn leaf_containing(&self, x: i32, y: i32) -> Option<NodeId> {
        let mut id = self.root();
        if !self.nodes[id.0].boundary.contains_tile(x, y) {
            return None;
        }
        while let Some(children) = self.nodes[id.0].children {
            id = children
                .into_iter()
                .find(|c| self.nodes[c.0].boundary.contains_tile(x, y))?;
        }
        Some(id)
    }
}

impl SpacePartition for QuadTree {
    fn root(&self) -> NodeId {
        NodeId(0)
    }

    fn node(&self, id: NodeId) -> &PartitionNode {
        &self.nodes[id.0]
    }

    fn leaves(&self) -> Vec<NodeId> {
        let mut leaves = Vec::new();
        let mut stack = vec![self.root()];
        while let Some(id) = stack.pop() {
            match self.nodes[id.0].children {
                Some(children) => stack.extend(children.into_iter().rev()),
                None => leaves.push(id),
            }
        }
        leaves
    }

    fn assign_room(&mut self, leaf: NodeId, room: RoomId) {
        self.nodes[leaf.0].room = Some(room);
    }

    fn grow(&mut self, config: &DungeonConfig, rng: &mut impl Rng) {
        puffin::profile_function!();

        for leaf in self.leaves() {
            self.grow_node(leaf, config, rng);
        }
        debug!("partition has {} nodes, {} leaves", self.len(), self.leaves().len());
    }

    fn carve_corridors(&self, grid: &mut Grid, rooms: &[Room], settings: CorridorSettings) {
        puffin::profile_function!();

        self.connect(self.root(), grid, rooms, settings);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corridor::CorridorShape;
    use crate::tile::TileKind;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn room_at(id: usize, leaf: NodeId, x: f32, y: f32) -> Room {
        Room {
            id: RoomId(id),
            boundary: Aabb::new(Xy::new(x, y), Xy::new(1.0, 1.0)),
            leaf,
            tiles: Vec::new(),
        }
    }

    #[test]
    fn test_new_tree_is_single_leaf() {
        let tree = QuadTree::new(64, 32);
        assert_eq!(tree.leaves(), vec![tree.root()]);
        assert_eq!(tree.node(tree.root()).boundary, Aabb::from_tiles(0, 0, 64, 32));
    }

    #[test]
    fn test_split_produces_quadrants_in_order() {
        let mut tree = QuadTree::new(20, 10);
        let [nw, ne, sw, se] = tree.split(tree.root(), 12, 4);
        assert_eq!(tree.node(nw).boundary, Aabb::from_tiles(0, 4, 12, 6));
        assert_eq!(tree.node(ne).boundary, Aabb::from_tiles(12, 4, 8, 6));
        assert_eq!(tree.node(sw).boundary, Aabb::from_tiles(0, 0, 12, 4));
        assert_eq!(tree.node(se).boundary, Aabb::from_tiles(12, 0, 8, 4));
        assert_eq!(tree.node(tree.root()).child(Quadrant::SouthEast), Some(se));
        assert_eq!(tree.leaves(), vec![nw, ne, sw, se]);
    }

    #[test]
    fn test_leaves_are_depth_first() {
        let mut tree = QuadTree::new(40, 40);
        let [nw, ne, sw, se] = tree.split(tree.root(), 20, 20);
        let [a, b, c, d] = tree.split(nw, 10, 30);
        assert_eq!(tree.leaves(), vec![a, b, c, d, ne, sw, se]);
    }

    #[test]
    fn test_grown_leaves_tile_the_map() {
        let config = DungeonConfig::default();
        let mut tree = QuadTree::new(64, 64);
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        tree.grow(&config, &mut rng);

        let min = config.min_leaf_size() as f32;
        let mut covered = vec![0u8; 64 * 64];
        for leaf in tree.leaves() {
            let b = tree.node(leaf).boundary;
            assert!(b.width() >= min && b.height() >= min);
            assert!(tree.node(leaf).depth <= config.max_depth);
            for y in b.bottom_tile()..b.top_tile() {
                for x in b.left_tile()..b.right_tile() {
                    covered[(y * 64 + x) as usize] += 1;
                }
            }
        }
        assert!(covered.iter().all(|&c| c == 1));
        assert!(tree.leaves().len() > 1);
    }

    #[test]
    fn test_nodes_record_depth_and_children() {
        let mut tree = QuadTree::new(40, 40);
        let children = tree.split(tree.root(), 20, 20);
        tree.split(children[1], 30, 30);

        let nodes: Vec<_> = tree.nodes().collect();
        assert_eq!(nodes.len(), tree.len());
        assert_eq!(nodes[0].0, tree.root());
        assert_eq!(nodes[0].1.children, Some(children));
        let depths: Vec<u32> = nodes.iter().map(|(_, n)| n.depth).collect();
        assert_eq!(depths, vec![0, 1, 1, 1, 1, 2, 2, 2, 2]);
        assert_eq!(nodes.iter().filter(|(_, n)| n.is_leaf()).count(), tree.leaves().len());
    }

    #[test]
    fn test_max_depth_zero_never_splits() {
        let config = DungeonConfig {
            max_depth: 0,
            ..Default::default()
        };
        let mut tree = QuadTree::new(64, 64);
        tree.grow(&config, &mut ChaCha8Rng::seed_from_u64(0));
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_leaf_containing() {
        let mut tree = QuadTree::new(20, 10);
        let [nw, _, _, se] = tree.split(tree.root(), 12, 4);
        assert_eq!(tree.leaf_containing(0, 9), Some(nw));
        assert_eq!(tree.leaf_containing(12, 3), Some(se));
        assert_eq!(tree.leaf_containing(20, 3), None);
    }

    #[test]
    fn test_anchor_prefers_first_room_depth_first() {
        let mut tree = QuadTree::new(40, 40);
        let [nw, ne, _, _] = tree.split(tree.root(), 20, 20);
        tree.assign_room(ne, RoomId(0));
        let rooms = vec![room_at(0, ne, 30.0, 30.0)];
        assert_eq!(tree.anchor(nw, &rooms), None);
        assert_eq!(tree.anchor(tree.root(), &rooms), Some(Xy::new(30.0, 30.0)));
    }

    #[test]
    fn test_corridors_join_sibling_rooms() {
        let mut tree = QuadTree::new(40, 40);
        let children = tree.split(tree.root(), 20, 20);
        let centers = [(10.0, 30.0), (30.0, 30.0), (10.0, 10.0), (30.0, 10.0)];
        let mut rooms = Vec::new();
        for (i, (&leaf, &(x, y))) in children.iter().zip(centers.iter()).enumerate() {
            tree.assign_room(leaf, RoomId(i));
            rooms.push(room_at(i, leaf, x, y));
        }

        let mut grid = Grid::new(40, 40);
        let settings = CorridorSettings {
            width: 1,
            shape: CorridorShape::Reference,
        };
        tree.carve_corridors(&mut grid, &rooms, settings);

        // NW-NE along row 30, SW-SE along row 10, NW-SW down column 10
        for x in 10..=30 {
            assert_eq!(grid.kind_at(x, 30), Some(TileKind::Corridor));
            assert_eq!(grid.kind_at(x, 10), Some(TileKind::Corridor));
        }
        for y in 10..=30 {
            assert_eq!(grid.kind_at(10, y), Some(TileKind::Corridor));
        }
        assert_eq!(grid.kind_at(30, 20), Some(TileKind::Empty));
    }
}

//! Routing polygons down a partition tree into per-leaf pools.

use crate::bsp::node::{Child, Node};
use crate::mesh::plane::{BACK, COPLANAR, FRONT};
use crate::mesh::polygon::Polygon;

/// Output buckets of one clipping run, one per leaf.
#[derive(Debug, Clone, Default)]
pub struct ClipPools {
    pools: Vec<Vec<Polygon>>,
}

impl ClipPools {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty every pool and size the set for `leaf_count` leaves, keeping
    /// allocations from earlier runs.
    pub fn reset(&mut self, leaf_count: usize) {
        for pool in &mut self.pools {
            pool.clear();
        }
        self.pools.resize_with(leaf_count, Vec::new);
    }

    pub fn add(&mut self, leaf: usize, polygon: Polygon) {
        self.pools[leaf].push(polygon);
    }

    /// Number of leaf pools.
    pub fn len(&self) -> usize {
        self.pools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }

    pub fn pool(&self, leaf: usize) -> &[Polygon] {
        &self.pools[leaf]
    }

    /// Pools in leaf order.
    pub fn iter(&self) -> impl Iterator<Item = &[Polygon]> {
        self.pools.iter().map(Vec::as_slice)
    }

    pub fn polygon_count(&self) -> usize {
        self.pools.iter().map(Vec::len).sum()
    }
}

impl Node {
    /// Send `polygon` to the side(s) of this node's plane it lies on.
    ///
    /// Coplanar polygons go to the front. Spanning polygons are split and each
    /// half continues separately; halves rejected by the split are dropped.
    pub fn clip_polygon(&self, polygon: Polygon, pools: &mut ClipPools) {
        let (front, back) = match polygon.classify(&self.plane) {
            FRONT | COPLANAR => (Some(polygon), None),
            BACK => (None, Some(polygon)),
            _ => polygon.split(&self.plane),
        };

        if let Some(front) = front {
            self.front.route(front, pools);
        }
        if let Some(back) = back {
            self.back.route(back, pools);
        }
    }
}

impl Child {
    fn route(&self, polygon: Polygon, pools: &mut ClipPools) {
        if polygon.vertex_count() < 3 {
            return;
        }
        match self {
            Child::Node(node) => node.clip_polygon(polygon, pools),
            Child::Leaf(leaf) => pools.add(*leaf, polygon),
        }
    }
}

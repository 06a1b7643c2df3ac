//! Uniform-grid spatial index over placed nodes.
//!
//! Buckets are keyed by `(floor(x/cell), floor(y/cell))` and hold the
//! entity together with its position and owner, so radius queries never
//! touch the world. A query scans only the 3x3 bucket neighborhood around
//! the query point, which covers every candidate as long as the radius
//! stays within the bucket size. The graph mirrors every node mutation
//! into this index in the same call.

use std::collections::HashMap;

use hecs::Entity;
use meshfront_logic::kinds::Faction;

#[derive(Debug, Clone, Copy)]
struct SpatialEntry {
    entity: Entity,
    x: f32,
    y: f32,
    owner: Faction,
}

/// Grid-bucketed index answering radius queries in O(occupants of 9 buckets).
#[derive(Debug)]
pub struct SpatialIndex {
    cell_size: f32,
    buckets: HashMap<(i32, i32), Vec<SpatialEntry>>,
}

impl SpatialIndex {
    /// `cell_size` must be at least the largest radius ever queried.
    pub fn new(cell_size: f32) -> Self {
        assert!(cell_size > 0.0, "spatial cell size must be positive");
        Self {
            cell_size,
            buckets: HashMap::new(),
        }
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    fn key(&self, x: f32, y: f32) -> (i32, i32) {
        (
            (x / self.cell_size).floor() as i32,
            (y / self.cell_size).floor() as i32,
        )
    }

    /// Register a node at its position.
    pub fn insert(&mut self, entity: Entity, x: f32, y: f32, owner: Faction) {
        self.buckets
            .entry(self.key(x, y))
            .or_default()
            .push(SpatialEntry { entity, x, y, owner });
    }

    /// Drop a node. `x`/`y` must be the position it was registered under.
    pub fn remove(&mut self, entity: Entity, x: f32, y: f32) {
        let key = self.key(x, y);
        if let Some(bucket) = self.buckets.get_mut(&key) {
            bucket.retain(|e| e.entity != entity);
            if bucket.is_empty() {
                self.buckets.remove(&key);
            }
        }
    }

    /// Update a node's recorded position. Stays within the same bucket when
    /// the key is unchanged; otherwise moves the entry.
    pub fn relocate(&mut self, entity: Entity, old_x: f32, old_y: f32, new_x: f32, new_y: f32) {
        let old_key = self.key(old_x, old_y);
        let new_key = self.key(new_x, new_y);
        if old_key == new_key {
            if let Some(bucket) = self.buckets.get_mut(&old_key) {
                if let Some(entry) = bucket.iter_mut().find(|e| e.entity == entity) {
                    entry.x = new_x;
                    entry.y = new_y;
                }
            }
            return;
        }
        let Some(bucket) = self.buckets.get_mut(&old_key) else {
            return;
        };
        let Some(pos) = bucket.iter().position(|e| e.entity == entity) else {
            return;
        };
        let mut entry = bucket.swap_remove(pos);
        if bucket.is_empty() {
            self.buckets.remove(&old_key);
        }
        entry.x = new_x;
        entry.y = new_y;
        self.buckets.entry(new_key).or_default().push(entry);
    }

    /// Every node within `radius` of the point, Euclidean, optionally
    /// filtered by owner. `radius` must not exceed the bucket size.
    pub fn query(&self, x: f32, y: f32, radius: f32, owner: Option<Faction>) -> Vec<Entity> {
        debug_assert!(
            radius <= self.cell_size,
            "query radius {radius} exceeds bucket size {}",
            self.cell_size
        );
        let (kc, kr) = self.key(x, y);
        let r2 = radius * radius;
        let mut found = Vec::new();
        for dc in -1..=1 {
            for dr in -1..=1 {
                let Some(bucket) = self.buckets.get(&(kc + dc, kr + dr)) else {
                    continue;
                };
                for e in bucket {
                    if let Some(want) = owner {
                        if e.owner != want {
                            continue;
                        }
                    }
                    let dx = e.x - x;
                    let dy = e.y - y;
                    if dx * dx + dy * dy <= r2 {
                        found.push(e.entity);
                    }
                }
            }
        }
        found
    }

    /// Total registered nodes.
    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

//! The fixed-grid strategy: a uniform grid of cells keyed by integer
//! `(gx, gy)`, each backed by a [`crate::cell_list`].

use std::collections::HashMap;
use std::hash::Hash;

use fnv::{FnvHashMap, FnvHashSet};

use crate::cell_list::{Cell, NodeArena, NodeHandle};
use crate::geometry::{cell_rect, Aabb, CellRect};
use crate::strategy::{Strategy, StrategyStats};

/// Default cell size used when a config doesn't specify one.
pub const DEFAULT_CELL_SIZE: u32 = 32;

/// One registered object's bookkeeping: its current bbox and the handle of
/// every node it owns, one per occupied cell.
struct ObjectEntry {
    bbox: Aabb,
    /// `(cell key, node handle)` pairs, one per cell the object currently
    /// occupies. Kept as a flat `Vec` rather than a set: membership is
    /// small (typically 1-4 cells) and insertion order doubles as the
    /// removal order.
    nodes: Vec<((i32, i32), NodeHandle)>,
}

/// A uniform grid of cells over a sparse `HashMap<(i32, i32), Cell>`, the
/// one concrete [`Strategy`] this crate ships.
pub struct FixedGridStrategy<Id: Copy + Eq + Hash> {
    cell_size: u32,
    cells: HashMap<(i32, i32), Cell>,
    arena: NodeArena<Id>,
    objects: FnvHashMap<Id, ObjectEntry>,
}

impl<Id: Copy + Eq + Hash> std::fmt::Debug for FixedGridStrategy<Id> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FixedGridStrategy")
            .field("cell_size", &self.cell_size)
            .field("cell_count", &self.cells.len())
            .field("object_count", &self.objects.len())
            .finish()
    }
}

impl<Id: Copy + Eq + Hash> FixedGridStrategy<Id> {
    /// Builds an empty grid with the given cell side length.
    ///
    /// # Panics
    /// Panics if `cell_size` is zero.
    pub fn new(cell_size: u32) -> Self {
        assert!(cell_size > 0, "cell_size must be positive");
        Self {
            cell_size,
            cells: HashMap::new(),
            arena: NodeArena::new(),
            objects: FnvHashMap::default(),
        }
    }

    fn rect_of(&self, bbox: &Aabb) -> CellRect {
        cell_rect(bbox, self.cell_size as i32)
    }

    /// Inserts `object`'s nodes into every cell of `rect`, recording the
    /// handles in `out`.
    fn fan_out(&mut self, object: Id, bbox: Aabb, rect: CellRect, out: &mut Vec<((i32, i32), NodeHandle)>) {
        for key in rect.iter() {
            let cell = self.cells.entry(key).or_default();
            let handle = self.arena.insert_at_end(cell, object, bbox);
            out.push((key, handle));
        }
    }

    /// Removes every node in `nodes` from its owning cell, dropping any
    /// cell that becomes empty.
    fn detach_all(&mut self, nodes: &[((i32, i32), NodeHandle)]) {
        for &(key, handle) in nodes {
            if let Some(cell) = self.cells.get_mut(&key) {
                self.arena.remove(cell, handle);
                if cell.is_empty() {
                    self.cells.remove(&key);
                }
            }
        }
    }
}

impl<Id: Copy + Eq + Hash> Strategy<Id> for FixedGridStrategy<Id> {
    fn add(&mut self, object: Id, bbox: Aabb) {
        let rect = self.rect_of(&bbox);
        let mut nodes = Vec::with_capacity(
            ((rect.gx1 - rect.gx0 + 1) * (rect.gy1 - rect.gy0 + 1)).max(1) as usize,
        );
        self.fan_out(object, bbox, rect, &mut nodes);
        self.objects.insert(object, ObjectEntry { bbox, nodes });
    }

    fn update(&mut self, object: Id, bbox: Aabb) {
        let new_rect = self.rect_of(&bbox);

        // Read the old rect first, then decide between the in-place path
        // (same footprint) and the full remove+add cycle.
        let old_rect = {
            let entry = self.objects.get(&object).expect("object must be present");
            self.rect_of(&entry.bbox)
        };

        if old_rect == new_rect {
            let entry = self.objects.get_mut(&object).expect("object must be present");
            entry.bbox = bbox;
            for &(_, handle) in &entry.nodes {
                self.arena.set_bbox(handle, bbox);
            }
            return;
        }

        let old_nodes = std::mem::take(&mut self.objects.get_mut(&object).unwrap().nodes);
        self.detach_all(&old_nodes);

        let mut new_nodes = Vec::new();
        self.fan_out(object, bbox, new_rect, &mut new_nodes);

        let entry = self.objects.get_mut(&object).expect("object must be present");
        entry.bbox = bbox;
        entry.nodes = new_nodes;
    }

    fn remove(&mut self, object: Id) {
        let entry = self.objects.remove(&object).expect("object must be present");
        self.detach_all(&entry.nodes);
    }

    fn query_region(&self, query: &Aabb, filter: Option<&dyn Fn(Id) -> bool>) -> Vec<Id> {
        let rect = self.rect_of(query);

        if rect.is_single_cell() {
            let mut out = Vec::new();
            if let Some(cell) = self.cells.get(&(rect.gx0, rect.gy0)) {
                self.arena.traverse_forward(cell, |_, node| {
                    if filter.map_or(true, |f| f(node.object)) {
                        out.push(node.object);
                    }
                    true
                });
            }
            return out;
        }

        let mut visited: FnvHashSet<Id> = FnvHashSet::default();
        let mut out = Vec::new();
        for key in rect.iter() {
            let Some(cell) = self.cells.get(&key) else {
                continue;
            };
            self.arena.traverse_forward(cell, |_, node| {
                if visited.insert(node.object) && filter.map_or(true, |f| f(node.object)) {
                    out.push(node.object);
                }
                true
            });
        }
        out
    }

    fn get_bbox(&self, object: Id) -> Aabb {
        self.objects
            .get(&object)
            .expect("object must be present")
            .bbox
    }

    fn contains(&self, object: Id) -> bool {
        self.objects.contains_key(&object)
    }

    fn clear(&mut self) {
        self.cells.clear();
        self.objects.clear();
        self.arena = NodeArena::new();
    }

    fn stats(&self) -> StrategyStats {
        StrategyStats {
            object_count: self.objects.len(),
            cell_count: self.cells.len(),
            cell_size: self.cell_size,
            total_memberships: self.cells.values().map(Cell::size).sum(),
            max_cell_occupancy: self.cells.values().map(Cell::size).max().unwrap_or(0),
        }
    }

    fn name(&self) -> &'static str {
        "fixed_grid"
    }

    fn description(&self) -> &'static str {
        "Uniform grid of fixed-size cells, each a doubly linked list of object records"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> FixedGridStrategy<u32> {
        FixedGridStrategy::new(32)
    }

    fn ids(mut v: Vec<u32>) -> Vec<u32> {
        v.sort_unstable();
        v
    }

    #[test]
    fn uniqueness_across_cells() {
        let mut g = grid();
        g.add(1, Aabb::new(30.0, 30.0, 10.0, 10.0));

        assert_eq!(
            ids(g.query_region(&Aabb::new(25.0, 25.0, 20.0, 20.0), None)),
            vec![1]
        );
        assert_eq!(
            ids(g.query_region(&Aabb::new(35.0, 35.0, 20.0, 20.0), None)),
            vec![1]
        );
        assert_eq!(
            ids(g.query_region(&Aabb::new(0.0, 0.0, 100.0, 100.0), None)),
            vec![1]
        );
        assert_eq!(g.stats().object_count, 1);
    }

    #[test]
    fn move_within_same_cell_footprint() {
        let mut g = grid();
        g.add(1, Aabb::new(10.0, 10.0, 8.0, 8.0));
        g.update(1, Aabb::new(15.0, 20.0, 8.0, 8.0));

        assert_eq!(
            ids(g.query_region(&Aabb::new(0.0, 0.0, 32.0, 32.0), None)),
            vec![1]
        );
        assert_eq!(g.get_bbox(1), Aabb::new(15.0, 20.0, 8.0, 8.0));
        assert_eq!(g.stats().cell_count, 1);
    }

    #[test]
    fn move_across_cells() {
        let mut g = grid();
        g.add(1, Aabb::new(10.0, 10.0, 8.0, 8.0));
        g.update(1, Aabb::new(100.0, 100.0, 8.0, 8.0));

        assert_eq!(
            g.query_region(&Aabb::new(0.0, 0.0, 50.0, 50.0), None),
            Vec::<u32>::new()
        );
        assert_eq!(
            ids(g.query_region(&Aabb::new(95.0, 95.0, 20.0, 20.0), None)),
            vec![1]
        );
        assert_eq!(g.stats().cell_count, 1);
    }

    #[test]
    fn removal_of_last_node_drops_cell() {
        let mut g = grid();
        g.add(1, Aabb::new(0.0, 0.0, 8.0, 8.0));
        assert_eq!(g.stats().cell_count, 1);

        g.remove(1);
        assert_eq!(g.stats().cell_count, 0);
        assert_eq!(g.stats().object_count, 0);
    }

    #[test]
    fn filter_in_query() {
        let mut g = grid();
        g.add(1, Aabb::new(10.0, 10.0, 8.0, 8.0)); // "enemy"
        g.add(2, Aabb::new(15.0, 15.0, 8.0, 8.0)); // "player"

        let result = g.query_region(&Aabb::new(0.0, 0.0, 50.0, 50.0), Some(&|id: u32| id == 1));
        assert_eq!(result, vec![1]);
    }

    #[test]
    fn deduplicates_objects_spanning_many_cells() {
        let mut g = grid();
        g.add(1, Aabb::new(30.0, 30.0, 40.0, 40.0)); // spans a 2x2+ cell footprint
        let result = g.query_region(&Aabb::new(0.0, 0.0, 200.0, 200.0), None);
        assert_eq!(result, vec![1]);
    }

    #[test]
    fn round_trip_add_remove_restores_empty_grid() {
        let mut g = grid();
        g.add(1, Aabb::new(5.0, 5.0, 5.0, 5.0));
        g.remove(1);

        let empty = grid();
        assert_eq!(g.stats().object_count, empty.stats().object_count);
        assert_eq!(g.stats().cell_count, empty.stats().cell_count);
    }

    #[test]
    fn boundary_point_at_corner_occupies_single_cell() {
        let mut g = grid();
        g.add(1, Aabb::new(32.0, 32.0, 0.0, 0.0));
        assert_eq!(g.stats().cell_count, 1);
        assert_eq!(
            ids(g.query_region(&Aabb::new(32.0, 32.0, 1.0, 1.0), None)),
            vec![1]
        );
        assert_eq!(
            g.query_region(&Aabb::new(0.0, 0.0, 32.0, 32.0), None),
            Vec::<u32>::new()
        );
    }

    #[test]
    fn membership_coherence_matches_cell_rect() {
        let mut g = grid();
        g.add(1, Aabb::new(-10.0, -10.0, 20.0, 20.0));
        let rect = g.rect_of(&g.get_bbox(1));
        let entry = &g.objects[&1];
        assert_eq!(entry.nodes.len(), rect.iter().count());
        for &(key, _) in &entry.nodes {
            assert!(rect.iter().any(|k| k == key));
        }
    }
}

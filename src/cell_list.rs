//! The doubly linked list of object records used inside a single grid cell.
//!
//! The list is intrusive and arena-backed: every [`Node`] lives in a single
//! [`slotmap::SlotMap`] owned by the strategy, and the list itself only
//! stores [`NodeHandle`] indices into that arena. This gives O(1) removal
//! given a handle without invalidating any other handle.

use slotmap::{new_key_type, SlotMap};

use crate::geometry::Aabb;

new_key_type! {
    /// A stable reference to one (object, cell) membership record.
    ///
    /// Once [`NodeArena::remove`] consumes a handle, using it again is a
    /// programmer error; `SlotMap`'s generational keys turn that into a
    /// `None` lookup rather than undefined behavior.
    pub struct NodeHandle;
}

/// One (object, cell) membership record.
pub struct Node<Id> {
    pub object: Id,
    pub bbox: Aabb,
    prev: Option<NodeHandle>,
    next: Option<NodeHandle>,
}

/// Head/tail/size bookkeeping for one cell's list. The actual [`Node`]s live
/// in the owning [`NodeArena`]; a `Cell` only holds the endpoints.
#[derive(Default)]
pub struct Cell {
    head: Option<NodeHandle>,
    tail: Option<NodeHandle>,
    size: usize,
}

impl Cell {
    /// Number of nodes currently in this cell. O(1).
    pub fn size(&self) -> usize {
        self.size
    }

    /// `true` if the cell has no nodes. O(1).
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }
}

/// Owns every [`Node`] for every cell of a strategy, and provides the
/// primitive doubly linked list operations cells are built from.
#[derive(Default)]
pub struct NodeArena<Id> {
    nodes: SlotMap<NodeHandle, Node<Id>>,
}

impl<Id: Copy> NodeArena<Id> {
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
        }
    }

    /// Appends a new node to the end of `cell`'s list. O(1).
    pub fn insert_at_end(&mut self, cell: &mut Cell, object: Id, bbox: Aabb) -> NodeHandle {
        let handle = self.nodes.insert(Node {
            object,
            bbox,
            prev: cell.tail,
            next: None,
        });

        match cell.tail {
            Some(old_tail) => {
                self.nodes[old_tail].next = Some(handle);
            }
            None => {
                cell.head = Some(handle);
            }
        }
        cell.tail = Some(handle);
        cell.size += 1;

        handle
    }

    /// Detaches `handle` from `cell`'s list and frees its slot. O(1). The
    /// caller guarantees `handle` still refers to a live node in `cell`.
    pub fn remove(&mut self, cell: &mut Cell, handle: NodeHandle) {
        let Node { prev, next, .. } = self
            .nodes
            .remove(handle)
            .expect("cell_list::remove called with a stale NodeHandle");

        match prev {
            Some(p) => self.nodes[p].next = next,
            None => cell.head = next,
        }
        match next {
            Some(n) => self.nodes[n].prev = prev,
            None => cell.tail = prev,
        }
        cell.size -= 1;
    }

    /// Overwrites the cached bbox on `handle`'s node, used by the in-place
    /// update path when an object's cell rectangle hasn't changed.
    pub fn set_bbox(&mut self, handle: NodeHandle, bbox: Aabb) {
        self.nodes[handle].bbox = bbox;
    }

    pub fn object(&self, handle: NodeHandle) -> Id {
        self.nodes[handle].object
    }

    /// Forward traversal from `cell`'s head. `visitor` returning `false`
    /// stops the traversal early. O(size).
    pub fn traverse_forward(&self, cell: &Cell, mut visitor: impl FnMut(NodeHandle, &Node<Id>) -> bool) {
        let mut cur = cell.head;
        while let Some(handle) = cur {
            let node = &self.nodes[handle];
            if !visitor(handle, node) {
                return;
            }
            cur = node.next;
        }
    }

    /// Backward traversal from `cell`'s tail. `visitor` returning `false`
    /// stops the traversal early. O(size).
    pub fn traverse_backward(&self, cell: &Cell, mut visitor: impl FnMut(NodeHandle, &Node<Id>) -> bool) {
        let mut cur = cell.tail;
        while let Some(handle) = cur {
            let node = &self.nodes[handle];
            if !visitor(handle, node) {
                return;
            }
            cur = node.prev;
        }
    }

    /// Clears every node belonging to `cell`. O(size).
    pub fn clear(&mut self, cell: &mut Cell) {
        let mut cur = cell.head;
        while let Some(handle) = cur {
            cur = self.nodes[handle].next;
            self.nodes.remove(handle);
        }
        cell.head = None;
        cell.tail = None;
        cell.size = 0;
    }

    /// Linear search for the node in `cell` whose object is `object`.
    /// O(size); only used on rarely-exercised paths, never in the hot
    /// insert/update/remove loop.
    pub fn find(&self, cell: &Cell, object: Id) -> Option<NodeHandle>
    where
        Id: PartialEq,
    {
        let mut found = None;
        self.traverse_forward(cell, |handle, node| {
            if node.object == object {
                found = Some(handle);
                false
            } else {
                true
            }
        });
        found
    }

    #[cfg(test)]
    pub fn total_nodes(&self) -> usize {
        self.nodes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bbox() -> Aabb {
        Aabb::new(0.0, 0.0, 1.0, 1.0)
    }

    #[test]
    fn insert_and_traverse_forward_and_backward() {
        let mut arena: NodeArena<u32> = NodeArena::new();
        let mut cell = Cell::default();

        let a = arena.insert_at_end(&mut cell, 1, bbox());
        let b = arena.insert_at_end(&mut cell, 2, bbox());
        let c = arena.insert_at_end(&mut cell, 3, bbox());

        assert_eq!(cell.size(), 3);

        let mut forward = vec![];
        arena.traverse_forward(&cell, |_, n| {
            forward.push(n.object);
            true
        });
        assert_eq!(forward, vec![1, 2, 3]);

        let mut backward = vec![];
        arena.traverse_backward(&cell, |_, n| {
            backward.push(n.object);
            true
        });
        assert_eq!(backward, vec![3, 2, 1]);

        assert_eq!(arena.find(&cell, 2), Some(b));
        let _ = (a, c);
    }

    #[test]
    fn remove_from_middle_keeps_list_consistent() {
        let mut arena: NodeArena<u32> = NodeArena::new();
        let mut cell = Cell::default();

        let a = arena.insert_at_end(&mut cell, 1, bbox());
        let b = arena.insert_at_end(&mut cell, 2, bbox());
        let c = arena.insert_at_end(&mut cell, 3, bbox());

        arena.remove(&mut cell, b);
        assert_eq!(cell.size(), 2);

        let mut forward = vec![];
        arena.traverse_forward(&cell, |_, n| {
            forward.push(n.object);
            true
        });
        assert_eq!(forward, vec![1, 3]);

        arena.remove(&mut cell, a);
        arena.remove(&mut cell, c);
        assert!(cell.is_empty());
    }

    #[test]
    fn early_termination_stops_traversal() {
        let mut arena: NodeArena<u32> = NodeArena::new();
        let mut cell = Cell::default();
        arena.insert_at_end(&mut cell, 1, bbox());
        arena.insert_at_end(&mut cell, 2, bbox());
        arena.insert_at_end(&mut cell, 3, bbox());

        let mut seen = vec![];
        arena.traverse_forward(&cell, |_, n| {
            seen.push(n.object);
            n.object != 2
        });
        assert_eq!(seen, vec![1, 2]);
    }

    #[test]
    fn clear_frees_every_node() {
        let mut arena: NodeArena<u32> = NodeArena::new();
        let mut cell = Cell::default();
        arena.insert_at_end(&mut cell, 1, bbox());
        arena.insert_at_end(&mut cell, 2, bbox());

        arena.clear(&mut cell);
        assert!(cell.is_empty());
        assert_eq!(cell.size(), 0);
        assert_eq!(arena.total_nodes(), 0);
    }
}

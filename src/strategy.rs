//! The strategy contract every partitioning backend implements, plus its
//! capability descriptor.
//!
//! Only one strategy ships in this crate ([`crate::grid::FixedGridStrategy`]),
//! but the trait is written so that a quadtree, spatial hash, or other
//! backend could be added later without changing [`crate::Locustron`]'s
//! public API. Objects are addressed by host-supplied identity rather than
//! by an owned slot.

use std::hash::Hash;

use crate::errors::LocustronError;
use crate::geometry::Aabb;

/// Stable, aggregate counters a strategy exposes about its own state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StrategyStats {
    /// Number of currently registered objects.
    pub object_count: usize,
    /// Number of non-empty cells currently present in the grid.
    pub cell_count: usize,
    /// The configured cell size.
    pub cell_size: u32,
    /// Sum of every cell's node count (an object spanning k cells
    /// contributes k to this total).
    pub total_memberships: usize,
    /// The largest number of nodes any single cell currently holds.
    pub max_cell_occupancy: usize,
}

/// Descriptive metadata returned by `Locustron::get_strategy_info`.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StrategyInfo {
    /// The strategy's registered name, e.g. `"fixed_grid"`.
    pub name: &'static str,
    /// A short human-readable description.
    pub description: &'static str,
    /// How many objects the strategy currently holds.
    pub object_count: usize,
    /// The configuration the strategy was constructed with.
    pub config: crate::config::StrategyConfig,
    /// The aggregate statistics of [`StrategyStats`].
    pub statistics: StrategyStats,
}

/// A pluggable 2D spatial partitioning backend.
///
/// Every method validates nothing itself; [`crate::Locustron`] performs all
/// pre-checks before delegating, so a strategy may assume its arguments are
/// already well-formed and that every precondition it documents holds.
pub trait Strategy<Id: Copy + Eq + Hash>: std::fmt::Debug {
    /// Registers `object` at `bbox`. The caller guarantees `object` is not
    /// already present.
    fn add(&mut self, object: Id, bbox: Aabb);

    /// Replaces the bbox of an already-registered `object`. The caller
    /// guarantees `object` is present.
    fn update(&mut self, object: Id, bbox: Aabb);

    /// Removes an already-registered `object`. The caller guarantees
    /// `object` is present.
    fn remove(&mut self, object: Id);

    /// Returns every distinct identity whose cell rectangle intersects
    /// `query`'s cell rectangle, optionally narrowed by `filter`.
    fn query_region(&self, query: &Aabb, filter: Option<&dyn Fn(Id) -> bool>) -> Vec<Id>;

    /// The current bbox of an already-registered `object`. The caller
    /// guarantees `object` is present.
    fn get_bbox(&self, object: Id) -> Aabb;

    /// `true` if `object` is currently registered.
    fn contains(&self, object: Id) -> bool;

    /// Drops every registered object and every cell.
    fn clear(&mut self);

    /// Aggregate statistics about the strategy's current state.
    fn stats(&self) -> StrategyStats;

    /// This strategy's registered name, e.g. `"fixed_grid"`.
    fn name(&self) -> &'static str;

    /// A short human-readable description, surfaced by `get_strategy_info`.
    fn description(&self) -> &'static str;
}

/// Builds the error for a strategy name `Locustron::new`/`by_name` doesn't
/// recognize.
pub(crate) fn unknown_strategy(name: &str) -> LocustronError {
    LocustronError::UnknownStrategy(name.to_string())
}

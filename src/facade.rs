//! The strategy-agnostic spatial-index façade.

use std::hash::Hash;

use crate::config::StrategyConfig;
use crate::errors::{invalid_input, invariant_violation, LocustronError};
use crate::geometry::Aabb;
use crate::grid::FixedGridStrategy;
use crate::strategy::{unknown_strategy, Strategy, StrategyInfo};

/// A thin, strategy-agnostic wrapper that owns exactly one strategy
/// instance, validates every input, enforces identity uniqueness, and
/// tracks the total registered-object count.
///
/// `Id` is the host-supplied stable identity type: it must be
/// `Copy + Eq + Hash` so it can key the strategy's identity-hash object
/// table, but otherwise carries no meaning to this crate.
pub struct Locustron<Id: Copy + Eq + Hash> {
    strategy: Box<dyn Strategy<Id>>,
    config: StrategyConfig,
    count: usize,
}

impl<Id: Copy + Eq + Hash> std::fmt::Debug for Locustron<Id> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Locustron")
            .field("strategy", &self.strategy.name())
            .field("count", &self.count)
            .finish()
    }
}

impl<Id: Copy + Eq + Hash> Locustron<Id> {
    /// Builds a new façade over the strategy named by `config`. Only
    /// `"fixed_grid"` is implemented by this crate, so construction through
    /// this path never fails in practice; `new` stays fallible since a future
    /// backend may reject an otherwise-valid config.
    pub fn new(config: StrategyConfig) -> Result<Self, LocustronError> {
        let strategy: Box<dyn Strategy<Id>> = match config {
            StrategyConfig::FixedGrid(grid_config) => {
                if grid_config.cell_size == 0 {
                    return Err(invalid_input("cell_size must be positive"));
                }
                Box::new(FixedGridStrategy::new(grid_config.cell_size))
            }
        };

        log::debug!(
            "locustron: created strategy \"{}\" ({})",
            strategy.name(),
            strategy.description()
        );

        Ok(Self {
            strategy,
            config,
            count: 0,
        })
    }

    /// Builds a façade by strategy name, for callers that resolve the
    /// strategy dynamically (e.g. from a config file).
    pub fn by_name(name: &str, grid_config: crate::config::GridConfig) -> Result<Self, LocustronError> {
        match name {
            "fixed_grid" => Self::new(StrategyConfig::FixedGrid(grid_config)),
            other => Err(unknown_strategy(other)),
        }
    }

    /// The legacy constructor form: a bare `cell_size`, defaulting to the
    /// fixed-grid strategy. Infallible because the strategy is hard-coded
    /// and any `u32` is a valid cell size once coerced away from zero.
    pub fn with_cell_size(cell_size: u32) -> Self {
        let cell_size = cell_size.max(1);
        Self::new(StrategyConfig::FixedGrid(crate::config::GridConfig { cell_size }))
            .expect("fixed_grid with a positive cell_size never fails to construct")
    }

    /// Registers `object` at the given bbox.
    pub fn add(&mut self, object: Id, x: f32, y: f32, w: f32, h: f32) -> Result<Id, LocustronError> {
        let bbox = Aabb::new(x, y, w, h);
        if !bbox.is_valid() {
            return Err(invalid_input(format!(
                "non-finite or negative-extent bbox ({x}, {y}, {w}, {h})"
            )));
        }
        if self.strategy.contains(object) {
            return Err(LocustronError::DuplicateRegistration);
        }

        self.strategy.add(object, bbox);
        self.count += 1;
        Ok(object)
    }

    /// Replaces the bbox of a registered object. Omitted `w`/`h` retain the
    /// object's current size.
    pub fn update(
        &mut self,
        object: Id,
        x: f32,
        y: f32,
        w: Option<f32>,
        h: Option<f32>,
    ) -> Result<(), LocustronError> {
        if !self.strategy.contains(object) {
            return Err(LocustronError::UnknownObject);
        }

        let current = self.strategy.get_bbox(object);
        let bbox = Aabb::new(x, y, w.unwrap_or(current.w), h.unwrap_or(current.h));
        if !bbox.is_valid() {
            return Err(invalid_input(format!(
                "non-finite or negative-extent bbox ({}, {}, {}, {})",
                bbox.x, bbox.y, bbox.w, bbox.h
            )));
        }

        self.strategy.update(object, bbox);
        Ok(())
    }

    /// Removes a registered object and all of its node handles.
    pub fn remove(&mut self, object: Id) -> Result<(), LocustronError> {
        if !self.strategy.contains(object) {
            return Err(LocustronError::UnknownObject);
        }
        self.strategy.remove(object);
        self.count = self
            .count
            .checked_sub(1)
            .ok_or_else(|| invariant_violation("count underflowed on remove"))?;
        Ok(())
    }

    /// Returns every registered object whose cell rectangle intersects the
    /// query's cell rectangle, optionally narrowed by `filter`. Order is
    /// unspecified.
    pub fn query(
        &self,
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        filter: Option<&dyn Fn(Id) -> bool>,
    ) -> Result<Vec<Id>, LocustronError> {
        if !x.is_finite() || !y.is_finite() || !w.is_finite() || !h.is_finite() {
            return Err(invalid_input("query coordinates must be finite"));
        }
        if w <= 0.0 || h <= 0.0 {
            return Err(LocustronError::InvalidExtent { w, h });
        }

        let bbox = Aabb::new(x, y, w, h);
        Ok(self.strategy.query_region(&bbox, filter))
    }

    /// Returns the current bbox of a registered object, as `(x, y, w, h)`.
    pub fn get_bbox(&self, object: Id) -> Result<(f32, f32, f32, f32), LocustronError> {
        if !self.strategy.contains(object) {
            return Err(LocustronError::UnknownObject);
        }
        let bbox = self.strategy.get_bbox(object);
        Ok((bbox.x, bbox.y, bbox.w, bbox.h))
    }

    /// Number of currently registered objects.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Empties the index; all node handles are invalidated.
    pub fn clear(&mut self) {
        log::trace!("locustron: clearing {} objects", self.count);
        self.strategy.clear();
        self.count = 0;
    }

    /// `{name, description, object_count, config, statistics}`.
    pub fn get_strategy_info(&self) -> StrategyInfo {
        StrategyInfo {
            name: self.strategy.name(),
            description: self.strategy.description(),
            object_count: self.count,
            config: self.config,
            statistics: self.strategy.stats(),
        }
    }
}

//! Viewport culling helper: a bolt-on adapter that turns a viewport
//! rectangle into a `query` call.

use std::hash::Hash;

use crate::config::ViewportConfig;
use crate::errors::LocustronError;
use crate::facade::Locustron;

/// Cumulative statistics refreshed on every `get_visible_objects` call.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ViewportStats {
    /// `facade.count()` as of the last `get_visible_objects` call.
    pub total_objects: usize,
    /// Size of the last query's result set.
    pub visible_objects: usize,
    /// `total_objects - visible_objects`.
    pub culled_objects: usize,
    /// `visible_objects / max(total_objects, 1)`.
    pub cull_ratio: f32,
    /// Number of `get_visible_objects`/`is_potentially_visible` calls made
    /// so far.
    pub query_count: u64,
}

/// A non-owning adapter that narrows a [`Locustron`] query to a viewport
/// rectangle, inflated by a symmetric cull margin to absorb slight
/// frame-to-frame viewport drift without popping.
pub struct ViewportCuller<'a, Id: Copy + Eq + Hash> {
    facade: &'a Locustron<Id>,
    config: ViewportConfig,
    stats: ViewportStats,
}

impl<'a, Id: Copy + Eq + Hash> ViewportCuller<'a, Id> {
    /// Builds a helper bound to `facade`, with zeroed stats.
    pub fn new(facade: &'a Locustron<Id>, config: ViewportConfig) -> Self {
        Self {
            facade,
            config,
            stats: ViewportStats::default(),
        }
    }

    /// Updates the viewport in place. Omitted `w`/`h` retain the current
    /// extent.
    pub fn update_viewport(&mut self, x: f32, y: f32, w: Option<f32>, h: Option<f32>) {
        self.config.x = x;
        self.config.y = y;
        if let Some(w) = w {
            self.config.w = w;
        }
        if let Some(h) = h {
            self.config.h = h;
        }
    }

    fn expanded_query_rect(&self) -> (f32, f32, f32, f32) {
        let m = self.config.cull_margin;
        (
            self.config.x - m,
            self.config.y - m,
            self.config.w + 2.0 * m,
            self.config.h + 2.0 * m,
        )
    }

    /// Issues a single expanded-viewport query, refreshes the cumulative
    /// statistics, and returns the visible set.
    pub fn get_visible_objects(
        &mut self,
        filter: Option<&dyn Fn(Id) -> bool>,
    ) -> Result<Vec<Id>, LocustronError> {
        let (x, y, w, h) = self.expanded_query_rect();
        let result = self.facade.query(x, y, w, h, filter)?;

        let total = self.facade.count();
        let visible = result.len();
        self.stats = ViewportStats {
            total_objects: total,
            visible_objects: visible,
            culled_objects: total.saturating_sub(visible),
            cull_ratio: visible as f32 / (total.max(1) as f32),
            query_count: self.stats.query_count + 1,
        };

        Ok(result)
    }

    /// One-shot check of whether `object` is in the expanded viewport's
    /// query result.
    pub fn is_potentially_visible(&mut self, object: Id) -> Result<bool, LocustronError>
    where
        Id: PartialEq,
    {
        let result = self.get_visible_objects(None)?;
        Ok(result.contains(&object))
    }

    /// Accessor for the cumulative statistics.
    pub fn get_stats(&self) -> ViewportStats {
        self.stats
    }

    /// Accessor for the current viewport configuration.
    pub fn get_viewport(&self) -> ViewportConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GridConfig, StrategyConfig};

    #[test]
    fn viewport_helper_over_a_10x10_grid() {
        let mut facade: Locustron<u32> =
            Locustron::new(StrategyConfig::FixedGrid(GridConfig { cell_size: 32 })).unwrap();

        let mut id = 0u32;
        for ix in 0..10 {
            for iy in 0..10 {
                let x = ix as f32 * 100.0 - 500.0;
                let y = iy as f32 * 100.0 - 500.0;
                facade.add(id, x, y, 10.0, 10.0).unwrap();
                id += 1;
            }
        }
        assert_eq!(facade.count(), 100);

        let mut viewport = ViewportCuller::new(
            &facade,
            ViewportConfig {
                x: 400.0,
                y: 300.0,
                w: 400.0,
                h: 300.0,
                cull_margin: 32.0,
            },
        );

        let visible = viewport.get_visible_objects(None).unwrap();
        let stats = viewport.get_stats();

        assert_eq!(stats.total_objects, 100);
        assert_eq!(stats.visible_objects, visible.len());
        assert_eq!(stats.visible_objects + stats.culled_objects, 100);
        assert_eq!(stats.query_count, 1);
    }

    #[test]
    fn update_viewport_retains_extent_when_omitted() {
        let facade: Locustron<u32> = Locustron::with_cell_size(32);
        let mut viewport = ViewportCuller::new(&facade, ViewportConfig::default());

        viewport.update_viewport(10.0, 20.0, None, None);
        let v = viewport.get_viewport();
        assert_eq!((v.x, v.y), (10.0, 20.0));
        assert_eq!((v.w, v.h), (400.0, 300.0));
    }

    #[test]
    fn convenience_factory_uses_higher_cull_margin() {
        let config = ViewportConfig::convenience();
        assert_eq!(config.cull_margin, 64.0);
    }

    #[test]
    fn is_potentially_visible_reflects_query_result() {
        let mut facade: Locustron<u32> = Locustron::with_cell_size(32);
        facade.add(1, 0.0, 0.0, 5.0, 5.0).unwrap();
        facade.add(2, 10_000.0, 10_000.0, 5.0, 5.0).unwrap();

        let mut viewport = ViewportCuller::new(
            &facade,
            ViewportConfig {
                x: 0.0,
                y: 0.0,
                w: 50.0,
                h: 50.0,
                cull_margin: 0.0,
            },
        );

        assert!(viewport.is_potentially_visible(1).unwrap());
        assert!(!viewport.is_potentially_visible(2).unwrap());
    }
}

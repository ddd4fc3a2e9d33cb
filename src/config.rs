//! Configuration types for the façade and the viewport helper.

/// Configuration for the fixed-grid strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridConfig {
    /// Side length of a grid cell. Must be positive.
    pub cell_size: u32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            cell_size: crate::grid::DEFAULT_CELL_SIZE,
        }
    }
}

/// Selects which strategy `Locustron::new` constructs. Only `FixedGrid` is
/// implemented by this crate; the enum exists so a future strategy can be
/// added without breaking the façade's public API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StrategyConfig {
    /// The uniform grid strategy.
    FixedGrid(GridConfig),
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self::FixedGrid(GridConfig::default())
    }
}

impl StrategyConfig {
    /// The name this config resolves to, used for `unknown-strategy` error
    /// messages and `get_strategy_info`.
    pub fn strategy_name(&self) -> &'static str {
        match self {
            StrategyConfig::FixedGrid(_) => "fixed_grid",
        }
    }
}

/// Configuration for a [`crate::viewport::ViewportCuller`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ViewportConfig {
    /// Viewport top-left x.
    pub x: f32,
    /// Viewport top-left y.
    pub y: f32,
    /// Viewport width.
    pub w: f32,
    /// Viewport height.
    pub h: f32,
    /// Symmetric expansion applied to the viewport before querying.
    pub cull_margin: f32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            w: 400.0,
            h: 300.0,
            cull_margin: 32.0,
        }
    }
}

impl ViewportConfig {
    /// The higher-margin convenience form (`cull_margin = 64` instead of
    /// the default 32).
    pub fn convenience() -> Self {
        Self {
            cull_margin: 64.0,
            ..Self::default()
        }
    }
}

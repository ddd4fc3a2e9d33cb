//!
//! `locustron` is a 2D spatial partitioning library for axis-aligned
//! bounding boxes (AABBs), targeted at interactive/game workloads that
//! insert, move, and query thousands of objects every frame.
//!
//! [`Locustron`] is the strategy-agnostic façade: it owns one partitioning
//! strategy and exposes `add`/`update`/`remove`/`query`/`get_bbox`/`count`/
//! `clear`. The only strategy shipped is [`grid::FixedGridStrategy`], a
//! uniform grid whose cells are arena-backed doubly linked lists
//! ([`cell_list`]). [`viewport::ViewportCuller`] is a bolt-on helper that
//! turns a scrolling viewport rectangle into repeated `query` calls.
//!
//! # Example
//! ```rust
//! use locustron::Locustron;
//!
//! let mut index: Locustron<u32> = Locustron::with_cell_size(32);
//! index.add(1, 30.0, 30.0, 10.0, 10.0).unwrap();
//!
//! let hits = index.query(25.0, 25.0, 20.0, 20.0, None).unwrap();
//! assert_eq!(hits, vec![1]);
//! ```

pub mod cell_list;
pub mod config;
pub mod errors;
pub mod facade;
pub mod geometry;
pub mod grid;
pub mod strategy;
pub mod viewport;

pub use config::{GridConfig, StrategyConfig, ViewportConfig};
pub use errors::LocustronError;
pub use facade::Locustron;
pub use geometry::Aabb;
pub use grid::FixedGridStrategy;
pub use strategy::{Strategy, StrategyInfo, StrategyStats};
pub use viewport::{ViewportCuller, ViewportStats};

//! hydrograph-rs: chart-geometry core for hydrograph time series.
//!
//! This crate derives the pure-value outputs a hydrograph UI renders from:
//! calendar-aligned time-axis ticks, padded value domains with symlog
//! handling, synthesized value-axis ticks, and approval/mask line segments.
//! Rendering, data fetching, and store wiring are left to the embedding
//! application.

pub mod core;
pub mod derive;
pub mod error;
pub mod telemetry;

pub use derive::{FrameCache, FrameRequest, HydrographFrame, derive_frame};
pub use error::{ChartError, ChartResult};

pub mod domain;
pub mod scale;
pub mod segments;
pub mod time_ticks;
pub mod types;
pub mod y_ticks;

pub use domain::{compute_y_domain, extend_domain};
pub use scale::{ScaleMode, ValueScale};
pub use segments::{
    DataMask, LineSegment, MAX_LINE_POINT_GAP_MS, PointClass, classify_into_segments,
};
pub use time_ticks::{CalendarZone, TimeLabelPattern, TimeTickSet, generate_time_ticks};
pub use types::{Layout, Observation};
pub use y_ticks::{YTickFormat, YTickSet, additional_tick_marks, compute_y_ticks, nice_ticks};

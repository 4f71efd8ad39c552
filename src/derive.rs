//! Derived render frames and their explicit caches.
//!
//! Upstream state bindings are modeled as a pipeline of pure functions:
//! callers pass explicit inputs plus a data version, and invalidation is an
//! explicit call rather than an implicit subscription side effect.

use std::sync::Arc;

use indexmap::IndexMap;
use ordered_float::OrderedFloat;
use serde::Serialize;
use tracing::debug;

use crate::core::{
    CalendarZone, Layout, LineSegment, Observation, ScaleMode, TimeTickSet, ValueScale, YTickSet,
    classify_into_segments, compute_y_domain, compute_y_ticks, generate_time_ticks,
};
use crate::error::{ChartError, ChartResult};

/// Inputs for one derived frame.
#[derive(Debug, Clone, Copy)]
pub struct FrameRequest<'a> {
    pub series_list: &'a [&'a [Observation]],
    pub start_ms: i64,
    pub end_ms: i64,
    pub zone: CalendarZone,
    pub symlog: bool,
    pub layout: Layout,
}

/// Everything a rendering layer needs for one hydrograph draw pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HydrographFrame {
    pub time_ticks: TimeTickSet,
    pub y_domain: (f64, f64),
    pub y_ticks: YTickSet,
    pub scale: ValueScale,
    /// Per-series segment lists, aligned with the request's `series_list`.
    pub segments: Vec<Vec<LineSegment>>,
}

impl HydrographFrame {
    /// Serializes the frame for golden tests and debugging sessions.
    pub fn snapshot_json_pretty(&self) -> ChartResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Derives a complete frame from explicit inputs.
///
/// A domain that collapses to zero width (an all-zero series) cannot back a
/// scale and is reported as invalid data.
pub fn derive_frame(request: &FrameRequest<'_>) -> ChartResult<HydrographFrame> {
    derive_frame_inner(request, None)
}

fn derive_frame_inner(
    request: &FrameRequest<'_>,
    y_tick_cache: Option<&mut YTickCache>,
) -> ChartResult<HydrographFrame> {
    if !request.layout.is_valid() {
        return Err(ChartError::InvalidLayout {
            width: request.layout.width,
            height: request.layout.height,
        });
    }

    let time_ticks = generate_time_ticks(request.start_ms, request.end_ms, request.zone)?;
    let y_domain = compute_y_domain(request.series_list, request.symlog);
    let y_ticks = match y_tick_cache {
        Some(cache) => cache.ticks(y_domain, request.symlog),
        None => compute_y_ticks(y_domain, request.symlog),
    };
    let mode = if request.symlog {
        ScaleMode::Symlog
    } else {
        ScaleMode::Linear
    };
    let scale = ValueScale::new(y_domain.0, y_domain.1, mode)?;
    let segments = request
        .series_list
        .iter()
        .map(|series| classify_into_segments(series))
        .collect();

    Ok(HydrographFrame {
        time_ticks,
        y_domain,
        y_ticks,
        scale,
        segments,
    })
}

/// Runtime metrics exposed by the derived caches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub size: usize,
}

/// Structurally hashable identity of a derived frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameKey {
    pub data_version: u64,
    pub start_ms: i64,
    pub end_ms: i64,
    pub zone: CalendarZone,
    pub symlog: bool,
    pub layout: Layout,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct YTickKey {
    lo: OrderedFloat<f64>,
    hi: OrderedFloat<f64>,
    symlog: bool,
}

/// Bounded value-axis tick cache keyed by the padded domain.
#[derive(Debug, Default)]
pub struct YTickCache {
    entries: IndexMap<YTickKey, YTickSet>,
    hits: u64,
    misses: u64,
}

impl YTickCache {
    const MAX_ENTRIES: usize = 256;

    pub fn ticks(&mut self, domain: (f64, f64), symlog: bool) -> YTickSet {
        let key = YTickKey {
            lo: OrderedFloat(domain.0),
            hi: OrderedFloat(domain.1),
            symlog,
        };
        if let Some(ticks) = self.entries.get(&key) {
            self.hits = self.hits.saturating_add(1);
            return ticks.clone();
        }

        self.misses = self.misses.saturating_add(1);
        let ticks = compute_y_ticks(domain, symlog);
        if self.entries.len() >= Self::MAX_ENTRIES {
            self.entries.shift_remove_index(0);
        }
        self.entries.insert(key, ticks.clone());
        ticks
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            size: self.entries.len(),
        }
    }
}

/// Bounded frame cache with insertion-order (oldest-first) eviction.
///
/// Keys carry the caller's data version; bumping the version and calling
/// [`FrameCache::retain_version`] is the whole invalidation story.
#[derive(Debug, Default)]
pub struct FrameCache {
    entries: IndexMap<FrameKey, Arc<HydrographFrame>>,
    y_ticks: YTickCache,
    hits: u64,
    misses: u64,
}

impl FrameCache {
    const MAX_ENTRIES: usize = 64;

    /// Returns the cached frame for this version and request, deriving and
    /// storing it on a miss.
    pub fn frame(
        &mut self,
        data_version: u64,
        request: &FrameRequest<'_>,
    ) -> ChartResult<Arc<HydrographFrame>> {
        let key = FrameKey {
            data_version,
            start_ms: request.start_ms,
            end_ms: request.end_ms,
            zone: request.zone,
            symlog: request.symlog,
            layout: request.layout,
        };

        if let Some(frame) = self.entries.get(&key) {
            self.hits = self.hits.saturating_add(1);
            return Ok(Arc::clone(frame));
        }

        self.misses = self.misses.saturating_add(1);
        debug!(
            data_version,
            start_ms = request.start_ms,
            end_ms = request.end_ms,
            "frame cache miss; deriving frame"
        );
        let frame = Arc::new(derive_frame_inner(request, Some(&mut self.y_ticks))?);
        if self.entries.len() >= Self::MAX_ENTRIES {
            self.entries.shift_remove_index(0);
        }
        self.entries.insert(key, Arc::clone(&frame));
        Ok(frame)
    }

    /// Drops every entry derived from a different data version.
    pub fn retain_version(&mut self, data_version: u64) {
        self.entries
            .retain(|key, _| key.data_version == data_version);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.y_ticks.clear();
    }

    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            size: self.entries.len(),
        }
    }

    #[must_use]
    pub fn y_tick_stats(&self) -> CacheStats {
        self.y_ticks.stats()
    }
}

use crate::core::types::Observation;

/// Fraction of the raw span added to each end of the value domain.
const DOMAIN_PADDING_RATIO: f64 = 0.2;

/// Fallback domain when no series carries a finite value.
const EMPTY_DOMAIN: (f64, f64) = (0.0, 1.0);

/// Computes a padded value-axis domain across one or more series.
///
/// Streamflow spans orders of magnitude; parameters on the symlog allowlist
/// additionally get their lower bound floored to a power of 10 so log
/// gridlines stay aligned. For non-negative data the padded lower bound is
/// clamped to zero.
#[must_use]
pub fn compute_y_domain(series_list: &[&[Observation]], symlog: bool) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;

    for series in series_list {
        let Some((series_min, series_max)) = series_extent(series) else {
            continue;
        };
        min = min.min(series_min);
        max = max.max(series_max);
    }

    if !min.is_finite() || !max.is_finite() {
        return EMPTY_DOMAIN;
    }

    extend_domain((min, max), symlog)
}

/// Raw extent of one series, widened when it collapses to a single value.
///
/// The widening is value-proportional, so an all-zero series yields a
/// zero-width `(0, 0)` extent; callers must tolerate that edge case.
fn series_extent(series: &[Observation]) -> Option<(f64, f64)> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;

    for observation in series {
        let Some(value) = observation.finite_value() else {
            continue;
        };
        min = min.min(value);
        max = max.max(value);
    }

    if !min.is_finite() || !max.is_finite() {
        return None;
    }

    if min == max {
        let low = min - min / 2.0;
        let high = min + min / 2.0;
        return Some((low.min(high), low.max(high)));
    }

    Some((min, max))
}

/// Pads a raw `[min, max]` domain by 20% of its span on each end.
///
/// With `symlog` and a non-negative domain the lower bound becomes the
/// largest power of 10 at or below the raw minimum instead of the padded
/// value. A domain that was non-negative before padding never dips below
/// zero afterwards.
#[must_use]
pub fn extend_domain(domain: (f64, f64), symlog: bool) -> (f64, f64) {
    let (raw_min, raw_max) = domain;
    let padding = (raw_max - raw_min) * DOMAIN_PADDING_RATIO;
    let non_negative = raw_min >= 0.0 && raw_max >= 0.0;

    let mut lower = if symlog && non_negative && raw_min > 0.0 {
        10_f64.powf(raw_min.log10().floor())
    } else {
        raw_min - padding
    };
    let upper = raw_max + padding;

    if non_negative {
        lower = lower.max(0.0);
    }

    (lower, upper)
}

#[cfg(test)]
mod tests {
    use super::extend_domain;

    #[test]
    fn symlog_floor_lands_on_power_of_ten() {
        assert_eq!(extend_domain((50.0, 1000.0), true), (10.0, 1190.0));
    }

    #[test]
    fn negative_domain_skips_symlog_floor() {
        let (lower, upper) = extend_domain((-5.0, 5.0), true);
        assert!((lower - (-7.0)).abs() <= 1e-12);
        assert!((upper - 7.0).abs() <= 1e-12);
    }

    #[test]
    fn zero_minimum_does_not_produce_infinite_floor() {
        let (lower, upper) = extend_domain((0.0, 100.0), true);
        assert_eq!(lower, 0.0);
        assert!((upper - 120.0).abs() <= 1e-12);
    }
}

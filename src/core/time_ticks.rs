use std::fmt;
use std::str::FromStr;

use chrono::{
    DateTime, Datelike, Days, Local, LocalResult, Months, NaiveDate, NaiveDateTime, TimeZone,
    Timelike, Utc,
};
use chrono_tz::Tz;
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{ChartError, ChartResult};

/// Calendar zone used for all start-of-unit boundary computations.
///
/// The `"local"` sentinel defers to the host's local zone; everything else
/// must be a valid IANA identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CalendarZone {
    Named(Tz),
    HostLocal,
}

impl CalendarZone {
    pub const LOCAL_SENTINEL: &'static str = "local";

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Named(tz) => tz.name(),
            Self::HostLocal => Self::LOCAL_SENTINEL,
        }
    }
}

impl FromStr for CalendarZone {
    type Err = ChartError;

    fn from_str(value: &str) -> ChartResult<Self> {
        if value == Self::LOCAL_SENTINEL {
            return Ok(Self::HostLocal);
        }
        Tz::from_str(value)
            .map(Self::Named)
            .map_err(|_| ChartError::UnknownTimeZone(value.to_owned()))
    }
}

impl fmt::Display for CalendarZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for CalendarZone {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for CalendarZone {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(D::Error::custom)
    }
}

/// Display pattern paired with a generated tick sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeLabelPattern {
    /// `Mar 02 13:45`
    MonthDayTime,
    /// `Mar 02`
    MonthDay,
    /// `Mar 2019`
    MonthYear,
    /// `2019`
    Year,
}

impl TimeLabelPattern {
    #[must_use]
    fn strftime(self) -> &'static str {
        match self {
            Self::MonthDayTime => "%b %d %H:%M",
            Self::MonthDay => "%b %d",
            Self::MonthYear => "%b %Y",
            Self::Year => "%Y",
        }
    }
}

/// Ordered time-axis tick instants plus their label pattern.
///
/// Ticks are ascending epoch milliseconds with no duplicates, all inside
/// `[start, end)` of the generating interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeTickSet {
    pub ticks: Vec<i64>,
    pub pattern: TimeLabelPattern,
    zone: CalendarZone,
}

impl TimeTickSet {
    #[must_use]
    pub fn zone(&self) -> CalendarZone {
        self.zone
    }

    /// Formats an instant with this tick set's pattern in its calendar zone.
    #[must_use]
    pub fn label(&self, instant_ms: i64) -> String {
        let Some(utc) = DateTime::<Utc>::from_timestamp_millis(instant_ms) else {
            return "invalid".to_owned();
        };
        let pattern = self.pattern.strftime();
        match self.zone {
            CalendarZone::Named(tz) => utc.with_timezone(&tz).format(pattern).to_string(),
            CalendarZone::HostLocal => utc.with_timezone(&Local).format(pattern).to_string(),
        }
    }

    /// Formats every tick in order.
    #[must_use]
    pub fn labels(&self) -> Vec<String> {
        self.ticks.iter().map(|tick| self.label(*tick)).collect()
    }
}

/// Calendar unit used when snapping evenly spread candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SnapUnit {
    Minute,
    Hour,
    Year,
}

/// Tick placement rule selected by the interval classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TickStrategy {
    /// `count` evenly spaced interior candidates, each snapped down to a
    /// calendar-unit boundary.
    Spread { count: u32, snap: SnapUnit },
    /// Every `every` days starting `offset_days` after start-of-day(start).
    DayStep { every: u64, offset_days: u64 },
    /// Every `every` months starting `offset_months` after start-of-month(start).
    MonthStep { every: u32, offset_months: u32 },
    /// Every `every` years starting `offset_years` after start-of-year(start).
    YearStep { every: i32, offset_years: i32 },
}

/// Interval length expressed in each unit the classifier branches on.
///
/// Hours/days/weeks are raw-duration fractions; months and years are
/// calendar-aware relative to the zone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct IntervalSpan {
    pub(crate) hours: f64,
    pub(crate) days: f64,
    pub(crate) weeks: f64,
    pub(crate) months: f64,
    pub(crate) years: f64,
}

/// Selects exactly one tick placement rule for an interval length.
///
/// Branches are evaluated in fixed priority order; the first match wins.
pub(crate) fn resolve_tick_strategy(span: IntervalSpan) -> (TickStrategy, TimeLabelPattern) {
    use TickStrategy::{DayStep, MonthStep, Spread, YearStep};

    if span.hours <= 4.0 {
        (
            Spread {
                count: 4,
                snap: SnapUnit::Minute,
            },
            TimeLabelPattern::MonthDayTime,
        )
    } else if span.days <= 3.0 {
        (
            Spread {
                count: 4,
                snap: SnapUnit::Hour,
            },
            TimeLabelPattern::MonthDayTime,
        )
    } else if span.days <= 8.0 {
        (
            DayStep {
                every: 1,
                offset_days: 1,
            },
            TimeLabelPattern::MonthDay,
        )
    } else if span.days <= 15.0 {
        (
            DayStep {
                every: 2,
                offset_days: 1,
            },
            TimeLabelPattern::MonthDay,
        )
    } else if span.days <= 29.0 {
        (
            DayStep {
                every: 4,
                offset_days: 1,
            },
            TimeLabelPattern::MonthDay,
        )
    } else if span.weeks <= 8.0 {
        (
            DayStep {
                every: 7,
                offset_days: 3,
            },
            TimeLabelPattern::MonthDay,
        )
    } else if span.weeks <= 15.0 {
        (
            DayStep {
                every: 14,
                offset_days: 7,
            },
            TimeLabelPattern::MonthDay,
        )
    } else if span.months <= 8.0 {
        (
            MonthStep {
                every: 1,
                offset_months: 1,
            },
            TimeLabelPattern::MonthYear,
        )
    } else if span.months <= 15.0 {
        (
            MonthStep {
                every: 2,
                offset_months: 1,
            },
            TimeLabelPattern::MonthYear,
        )
    } else if span.months <= 29.0 {
        (
            MonthStep {
                every: 4,
                offset_months: 2,
            },
            TimeLabelPattern::MonthYear,
        )
    } else if span.months <= 43.0 {
        (
            MonthStep {
                every: 6,
                offset_months: 3,
            },
            TimeLabelPattern::MonthYear,
        )
    } else if span.years <= 8.0 {
        (
            YearStep {
                every: 1,
                offset_years: 1,
            },
            TimeLabelPattern::Year,
        )
    } else {
        (
            Spread {
                count: 7,
                snap: SnapUnit::Year,
            },
            TimeLabelPattern::Year,
        )
    }
}

/// Generates time-axis ticks for `[start_ms, end_ms)` in a calendar zone.
///
/// Tick density stays readable (roughly 4 to 10 ticks) from minutes up to
/// multiple decades, and every tick is snapped to a calendar boundary so
/// labels stay meaningful.
pub fn generate_time_ticks(
    start_ms: i64,
    end_ms: i64,
    zone: CalendarZone,
) -> ChartResult<TimeTickSet> {
    if start_ms >= end_ms {
        return Err(ChartError::InvalidInterval { start_ms, end_ms });
    }

    match zone {
        CalendarZone::Named(tz) => build_tick_set(start_ms, end_ms, &tz, zone),
        CalendarZone::HostLocal => build_tick_set(start_ms, end_ms, &Local, zone),
    }
}

fn build_tick_set<Z: TimeZone>(
    start_ms: i64,
    end_ms: i64,
    tz: &Z,
    zone: CalendarZone,
) -> ChartResult<TimeTickSet> {
    let start = zoned_from_millis(start_ms, tz)?;
    let end = zoned_from_millis(end_ms, tz)?;
    let span = interval_span(start_ms, end_ms, &start, &end);
    let (strategy, pattern) = resolve_tick_strategy(span);

    let ticks = match strategy {
        TickStrategy::Spread { count, snap } => {
            spread_ticks(start_ms, end_ms, tz, count, snap)?
        }
        TickStrategy::DayStep { every, offset_days } => {
            day_step_ticks(&start, end_ms, tz, every, offset_days)
        }
        TickStrategy::MonthStep {
            every,
            offset_months,
        } => month_step_ticks(&start, end_ms, tz, every, offset_months),
        TickStrategy::YearStep {
            every,
            offset_years,
        } => year_step_ticks(&start, end_ms, tz, every, offset_years),
    };

    Ok(TimeTickSet {
        ticks,
        pattern,
        zone,
    })
}

fn interval_span<Z: TimeZone>(
    start_ms: i64,
    end_ms: i64,
    start: &DateTime<Z>,
    end: &DateTime<Z>,
) -> IntervalSpan {
    let hours = (end_ms - start_ms) as f64 / 3_600_000.0;
    let days = hours / 24.0;
    let weeks = days / 7.0;
    let months = month_span(start, end);
    let years = months / 12.0;
    IntervalSpan {
        hours,
        days,
        weeks,
        months,
        years,
    }
}

/// Calendar-aware fractional month count between two zoned instants.
fn month_span<Z: TimeZone>(start: &DateTime<Z>, end: &DateTime<Z>) -> f64 {
    let mut whole = i64::from(end.year() - start.year()) * 12
        + i64::from(end.month() as i32 - start.month() as i32);
    if whole < 0 {
        whole = 0;
    }

    let mut anchor = shift_months(start, whole);
    if anchor > *end && whole > 0 {
        whole -= 1;
        anchor = shift_months(start, whole);
    }
    let next = shift_months(&anchor, 1);

    let month_ms = next.timestamp_millis() - anchor.timestamp_millis();
    let rest_ms = end.timestamp_millis() - anchor.timestamp_millis();
    let fraction = if month_ms > 0 {
        (rest_ms as f64 / month_ms as f64).clamp(0.0, 1.0)
    } else {
        0.0
    };

    whole as f64 + fraction
}

fn shift_months<Z: TimeZone>(instant: &DateTime<Z>, months: i64) -> DateTime<Z> {
    let naive = instant.naive_local();
    let shifted = if months >= 0 {
        naive.checked_add_months(Months::new(months as u32))
    } else {
        naive.checked_sub_months(Months::new(months.unsigned_abs() as u32))
    };
    match shifted {
        Some(shifted) => resolve_local(shifted, &instant.timezone()),
        None => instant.clone(),
    }
}

fn spread_ticks<Z: TimeZone>(
    start_ms: i64,
    end_ms: i64,
    tz: &Z,
    count: u32,
    snap: SnapUnit,
) -> ChartResult<Vec<i64>> {
    let span = end_ms - start_ms;
    let slots = i64::from(count) + 1;
    let mut ticks: Vec<i64> = Vec::with_capacity(count as usize);

    for index in 1..=i64::from(count) {
        let candidate_ms = start_ms + span * index / slots;
        let candidate = zoned_from_millis(candidate_ms, tz)?;
        let snapped = match snap {
            SnapUnit::Minute => start_of_minute(&candidate),
            SnapUnit::Hour => start_of_hour(&candidate),
            SnapUnit::Year => start_of_year(&candidate),
        };
        let tick_ms = snapped.timestamp_millis();
        if tick_ms < start_ms || tick_ms >= end_ms {
            continue;
        }
        if ticks.last() != Some(&tick_ms) {
            ticks.push(tick_ms);
        }
    }

    Ok(ticks)
}

fn day_step_ticks<Z: TimeZone>(
    start: &DateTime<Z>,
    end_ms: i64,
    tz: &Z,
    every: u64,
    offset_days: u64,
) -> Vec<i64> {
    let base_date = start.date_naive();
    let mut ticks = Vec::new();
    let mut day_offset = offset_days;

    loop {
        let Some(date) = base_date.checked_add_days(Days::new(day_offset)) else {
            break;
        };
        let tick_ms = midnight_millis(date, tz);
        if tick_ms >= end_ms {
            break;
        }
        ticks.push(tick_ms);
        day_offset += every;
    }

    ticks
}

fn month_step_ticks<Z: TimeZone>(
    start: &DateTime<Z>,
    end_ms: i64,
    tz: &Z,
    every: u32,
    offset_months: u32,
) -> Vec<i64> {
    let Some(base) = NaiveDate::from_ymd_opt(start.year(), start.month(), 1) else {
        return Vec::new();
    };
    let mut ticks = Vec::new();
    let mut month_offset = offset_months;

    loop {
        let Some(date) = base.checked_add_months(Months::new(month_offset)) else {
            break;
        };
        let tick_ms = midnight_millis(date, tz);
        if tick_ms >= end_ms {
            break;
        }
        ticks.push(tick_ms);
        month_offset += every;
    }

    ticks
}

fn year_step_ticks<Z: TimeZone>(
    start: &DateTime<Z>,
    end_ms: i64,
    tz: &Z,
    every: i32,
    offset_years: i32,
) -> Vec<i64> {
    let mut ticks = Vec::new();
    let mut year = start.year() + offset_years;

    loop {
        let Some(date) = NaiveDate::from_ymd_opt(year, 1, 1) else {
            break;
        };
        let tick_ms = midnight_millis(date, tz);
        if tick_ms >= end_ms {
            break;
        }
        ticks.push(tick_ms);
        year += every;
    }

    ticks
}

fn zoned_from_millis<Z: TimeZone>(millis: i64, tz: &Z) -> ChartResult<DateTime<Z>> {
    let utc = DateTime::<Utc>::from_timestamp_millis(millis).ok_or_else(|| {
        ChartError::InvalidData(format!("instant {millis}ms is outside the representable range"))
    })?;
    Ok(utc.with_timezone(tz))
}

fn start_of_minute<Z: TimeZone>(instant: &DateTime<Z>) -> DateTime<Z> {
    let naive = instant.naive_local();
    let floored = naive
        .with_second(0)
        .and_then(|n| n.with_nanosecond(0))
        .unwrap_or(naive);
    resolve_local(floored, &instant.timezone())
}

fn start_of_hour<Z: TimeZone>(instant: &DateTime<Z>) -> DateTime<Z> {
    let naive = instant.naive_local();
    let floored = naive
        .with_minute(0)
        .and_then(|n| n.with_second(0))
        .and_then(|n| n.with_nanosecond(0))
        .unwrap_or(naive);
    resolve_local(floored, &instant.timezone())
}

fn start_of_year<Z: TimeZone>(instant: &DateTime<Z>) -> DateTime<Z> {
    match NaiveDate::from_ymd_opt(instant.year(), 1, 1) {
        Some(date) => resolve_local(
            date.and_hms_opt(0, 0, 0).unwrap_or(instant.naive_local()),
            &instant.timezone(),
        ),
        None => instant.clone(),
    }
}

fn midnight_millis<Z: TimeZone>(date: NaiveDate, tz: &Z) -> i64 {
    match date.and_hms_opt(0, 0, 0) {
        Some(naive) => resolve_local(naive, tz).timestamp_millis(),
        None => i64::MAX,
    }
}

/// Resolves a naive local datetime against a zone, taking the earliest valid
/// instant for DST-ambiguous wall times and probing forward across DST gaps.
fn resolve_local<Z: TimeZone>(naive: NaiveDateTime, tz: &Z) -> DateTime<Z> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(instant) => instant,
        LocalResult::Ambiguous(earliest, _) => earliest,
        LocalResult::None => {
            // Midnight (or another snapped boundary) can fall inside a DST
            // gap in a handful of zones; the gap never exceeds a few hours.
            for probe_hours in 1..=4 {
                let probe = naive + chrono::Duration::hours(probe_hours);
                if let Some(instant) = tz.from_local_datetime(&probe).earliest() {
                    return instant;
                }
            }
            tz.from_utc_datetime(&naive)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{IntervalSpan, SnapUnit, TickStrategy, TimeLabelPattern, resolve_tick_strategy};

    fn span_of_hours(hours: f64) -> IntervalSpan {
        let days = hours / 24.0;
        IntervalSpan {
            hours,
            days,
            weeks: days / 7.0,
            months: days / 30.4375,
            years: days / 365.25,
        }
    }

    #[test]
    fn classifier_picks_minute_spread_for_short_intervals() {
        let (strategy, pattern) = resolve_tick_strategy(span_of_hours(3.5));
        assert_eq!(
            strategy,
            TickStrategy::Spread {
                count: 4,
                snap: SnapUnit::Minute
            }
        );
        assert_eq!(pattern, TimeLabelPattern::MonthDayTime);
    }

    #[test]
    fn classifier_picks_hour_spread_up_to_three_days() {
        let (strategy, _) = resolve_tick_strategy(span_of_hours(71.0));
        assert_eq!(
            strategy,
            TickStrategy::Spread {
                count: 4,
                snap: SnapUnit::Hour
            }
        );
    }

    #[test]
    fn classifier_steps_days_with_widening_stride() {
        let (one_day, _) = resolve_tick_strategy(span_of_hours(24.0 * 7.0));
        let (two_day, _) = resolve_tick_strategy(span_of_hours(24.0 * 14.0));
        let (four_day, _) = resolve_tick_strategy(span_of_hours(24.0 * 28.0));
        assert_eq!(
            one_day,
            TickStrategy::DayStep {
                every: 1,
                offset_days: 1
            }
        );
        assert_eq!(
            two_day,
            TickStrategy::DayStep {
                every: 2,
                offset_days: 1
            }
        );
        assert_eq!(
            four_day,
            TickStrategy::DayStep {
                every: 4,
                offset_days: 1
            }
        );
    }

    #[test]
    fn classifier_steps_weeks_then_months_then_years() {
        let (weekly, _) = resolve_tick_strategy(span_of_hours(24.0 * 7.0 * 6.0));
        let (biweekly, _) = resolve_tick_strategy(span_of_hours(24.0 * 7.0 * 12.0));
        let (monthly, monthly_pattern) = resolve_tick_strategy(span_of_hours(24.0 * 30.0 * 6.0));
        let (yearly, yearly_pattern) = resolve_tick_strategy(span_of_hours(24.0 * 365.25 * 5.0));
        assert_eq!(
            weekly,
            TickStrategy::DayStep {
                every: 7,
                offset_days: 3
            }
        );
        assert_eq!(
            biweekly,
            TickStrategy::DayStep {
                every: 14,
                offset_days: 7
            }
        );
        assert_eq!(
            monthly,
            TickStrategy::MonthStep {
                every: 1,
                offset_months: 1
            }
        );
        assert_eq!(monthly_pattern, TimeLabelPattern::MonthYear);
        assert_eq!(
            yearly,
            TickStrategy::YearStep {
                every: 1,
                offset_years: 1
            }
        );
        assert_eq!(yearly_pattern, TimeLabelPattern::Year);
    }

    #[test]
    fn classifier_spreads_seven_year_ticks_beyond_eight_years() {
        let (strategy, _) = resolve_tick_strategy(span_of_hours(24.0 * 365.25 * 12.0));
        assert_eq!(
            strategy,
            TickStrategy::Spread {
                count: 7,
                snap: SnapUnit::Year
            }
        );
    }
}

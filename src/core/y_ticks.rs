use serde::{Deserialize, Serialize};

/// Baseline tick count requested from the nice-number generator.
const BASELINE_TICK_COUNT: usize = 5;

/// Label format shared by every tick on the value axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum YTickFormat {
    /// All tick values are whole numbers; no decimal places.
    Integer,
    /// At least one fractional tick; two decimal places everywhere.
    TwoDecimal,
}

impl YTickFormat {
    #[must_use]
    pub fn label(self, value: f64) -> String {
        if !value.is_finite() {
            return "nan".to_owned();
        }
        match self {
            Self::Integer => format!("{value:.0}"),
            Self::TwoDecimal => format!("{value:.2}"),
        }
    }
}

/// Value-axis tick values plus their shared label format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YTickSet {
    pub values: Vec<f64>,
    pub format: YTickFormat,
}

impl YTickSet {
    #[must_use]
    pub fn labels(&self) -> Vec<String> {
        self.values
            .iter()
            .map(|value| self.format.label(*value))
            .collect()
    }
}

/// Derives value-axis ticks for a padded domain.
///
/// The baseline is a plain nice-number sequence. On a symlog scale that
/// sequence leaves geometrically widening gaps near the origin, so synthetic
/// intermediate ticks are injected to restore even gridline density.
#[must_use]
pub fn compute_y_ticks(domain: (f64, f64), symlog: bool) -> YTickSet {
    let mut values = nice_ticks(domain.0, domain.1, BASELINE_TICK_COUNT);
    if symlog {
        values = additional_tick_marks(&values);
    }

    let format = if values
        .iter()
        .all(|value| value.is_finite() && value.fract() == 0.0)
    {
        YTickFormat::Integer
    } else {
        YTickFormat::TwoDecimal
    };

    YTickSet { values, format }
}

/// Standard 1/2/5 x 10^k nice-number tick sequence across `[lo, hi]`.
#[must_use]
pub fn nice_ticks(lo: f64, hi: f64, count: usize) -> Vec<f64> {
    if !lo.is_finite() || !hi.is_finite() || count == 0 {
        return Vec::new();
    }
    if lo == hi {
        return vec![lo];
    }

    let (lo, hi) = if lo < hi { (lo, hi) } else { (hi, lo) };
    let step = tick_increment(lo, hi, count);
    if !step.is_finite() || step <= 0.0 {
        return vec![lo];
    }

    let first = (lo / step).ceil();
    let last = (hi / step).floor();
    let mut ticks = Vec::new();
    let mut index = first;
    while index <= last {
        ticks.push(index * step);
        index += 1.0;
    }
    ticks
}

fn tick_increment(lo: f64, hi: f64, count: usize) -> f64 {
    let step = (hi - lo) / count.max(1) as f64;
    let power = step.log10().floor();
    let error = step / 10_f64.powf(power);

    let factor = if error >= 50_f64.sqrt() {
        10.0
    } else if error >= 10_f64.sqrt() {
        5.0
    } else if error >= 2_f64.sqrt() {
        2.0
    } else {
        1.0
    };

    factor * 10_f64.powf(power)
}

/// Injects synthetic intermediate ticks ahead of a symlog baseline set.
///
/// Starting from the smallest-magnitude tick (the least-negative value is
/// the comparison point when negatives exist), the magnitude is repeatedly
/// ceiling-halved until it drops to 2, each step rounded up to a resolution
/// matching its own magnitude. The synthesized set is mirrored to negative
/// when the baseline contains negatives and prepended to the input.
#[must_use]
pub fn additional_tick_marks(tick_values: &[f64]) -> Vec<f64> {
    let Some(lowest_magnitude) = lowest_absolute_tick(tick_values) else {
        return tick_values.to_vec();
    };

    let mut synthesized: Vec<f64> = Vec::new();
    let mut magnitude = lowest_magnitude;
    while magnitude > 2.0 {
        magnitude = round_up_to_tick_resolution((magnitude / 2.0).ceil());
        if !synthesized.contains(&magnitude) {
            synthesized.push(magnitude);
        }
    }

    let has_negatives = tick_values.iter().any(|value| *value < 0.0);
    let mut combined = Vec::with_capacity(synthesized.len() * 2 + tick_values.len());
    if has_negatives {
        combined.extend(synthesized.iter().map(|value| -value));
    }
    combined.extend(synthesized.iter().copied());
    combined.extend_from_slice(tick_values);
    combined
}

/// Smallest-magnitude comparison point for symlog tick synthesis.
///
/// When negatives exist the least-negative value (closest to zero) is used;
/// otherwise the smallest positive magnitude.
fn lowest_absolute_tick(tick_values: &[f64]) -> Option<f64> {
    let finite = tick_values.iter().copied().filter(|value| value.is_finite());

    let negatives_max = finite
        .clone()
        .filter(|value| *value < 0.0)
        .fold(None::<f64>, |best, value| match best {
            Some(best) => Some(best.max(value)),
            None => Some(value),
        });

    if let Some(least_negative) = negatives_max {
        return Some(least_negative.abs());
    }

    finite
        .filter(|value| *value > 0.0)
        .fold(None::<f64>, |best, value| match best {
            Some(best) => Some(best.min(value)),
            None => Some(value),
        })
}

/// Rounds a synthesized tick up to a magnitude-appropriate resolution.
fn round_up_to_tick_resolution(value: f64) -> f64 {
    if value > 1000.0 {
        (value / 1000.0).ceil() * 1000.0
    } else if value > 100.0 {
        (value / 100.0).ceil() * 100.0
    } else if value > 25.0 {
        (value / 5.0).ceil() * 5.0
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::{additional_tick_marks, lowest_absolute_tick, nice_ticks};

    #[test]
    fn nice_ticks_use_one_two_five_steps() {
        let ticks = nice_ticks(0.0, 100.0, 5);
        assert_eq!(ticks, vec![0.0, 20.0, 40.0, 60.0, 80.0, 100.0]);
    }

    #[test]
    fn nice_ticks_stay_inside_the_domain() {
        let ticks = nice_ticks(10.0, 1190.0, 5);
        assert!(!ticks.is_empty());
        assert!(ticks.iter().all(|tick| *tick >= 10.0 && *tick <= 1190.0));
    }

    #[test]
    fn halving_chain_matches_reference_sequence() {
        let result = additional_tick_marks(&[-1000.0, -100.0, -50.0, 50.0, 100.0, 1000.0]);
        assert_eq!(
            result,
            vec![
                -25.0, -13.0, -7.0, -4.0, -2.0, 25.0, 13.0, 7.0, 4.0, 2.0, -1000.0, -100.0, -50.0,
                50.0, 100.0, 1000.0
            ]
        );
    }

    #[test]
    fn comparison_point_prefers_least_negative_value() {
        assert_eq!(lowest_absolute_tick(&[-50.0, -10.0, 100.0]), Some(10.0));
        assert_eq!(lowest_absolute_tick(&[5.0, 40.0]), Some(5.0));
        assert_eq!(lowest_absolute_tick(&[]), None);
    }

    #[test]
    fn no_synthesis_at_or_below_two() {
        assert_eq!(additional_tick_marks(&[2.0, 4.0]), vec![2.0, 4.0]);
    }

    #[test]
    fn large_magnitudes_round_to_coarse_resolutions() {
        // 5000 halves to 2500 and rounds up to the next thousand.
        let result = additional_tick_marks(&[5000.0, 10_000.0]);
        assert_eq!(result[0], 3000.0);
        assert!(result.windows(2).take(4).all(|pair| pair[0] > pair[1]));
    }
}

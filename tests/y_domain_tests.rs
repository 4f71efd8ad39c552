use approx::assert_relative_eq;
use hydrograph_rs::core::{Observation, compute_y_domain, extend_domain};

fn obs(value: f64) -> Observation {
    Observation::new(0, Some(value), Vec::new())
}

#[test]
fn symlog_domain_floors_lower_bound_to_power_of_ten() {
    let series = vec![obs(50.0), obs(1000.0)];
    let domain = compute_y_domain(&[&series], true);
    assert_relative_eq!(domain.0, 10.0);
    assert_relative_eq!(domain.1, 1190.0);
}

#[test]
fn non_finite_values_are_filtered_before_extent() {
    let series = vec![
        obs(f64::NEG_INFINITY),
        obs(f64::NAN),
        obs(1.0),
        obs(2.0),
        obs(3.0),
        obs(f64::INFINITY),
    ];
    let domain = compute_y_domain(&[&series], false);
    assert_relative_eq!(domain.0, 0.6);
    assert_relative_eq!(domain.1, 3.4);
}

#[test]
fn masked_points_do_not_contribute_values() {
    let series = vec![
        Observation::new(0, None, vec!["ice".to_owned()]),
        obs(10.0),
        obs(20.0),
    ];
    let domain = compute_y_domain(&[&series], false);
    assert_relative_eq!(domain.0, 8.0);
    assert_relative_eq!(domain.1, 22.0);
}

#[test]
fn empty_input_defaults_to_unit_domain() {
    assert_eq!(compute_y_domain(&[], false), (0.0, 1.0));

    let empty: Vec<Observation> = Vec::new();
    assert_eq!(compute_y_domain(&[&empty], false), (0.0, 1.0));

    let all_masked = vec![Observation::new(0, None, vec!["ice".to_owned()])];
    assert_eq!(compute_y_domain(&[&all_masked], true), (0.0, 1.0));
}

#[test]
fn single_value_series_is_widened_proportionally() {
    let series = vec![obs(100.0), obs(100.0)];
    let domain = compute_y_domain(&[&series], false);
    // Raw extent becomes [50, 150]; padding adds 20% of that span each way,
    // and the non-negative lower bound stays clamped at >= 0.
    assert_relative_eq!(domain.0, 30.0);
    assert_relative_eq!(domain.1, 170.0);
}

#[test]
fn all_zero_series_collapses_to_zero_width() {
    let series = vec![obs(0.0), obs(0.0)];
    assert_eq!(compute_y_domain(&[&series], false), (0.0, 0.0));
}

#[test]
fn multiple_series_extents_are_unioned() {
    let low = vec![obs(1.0), obs(2.0)];
    let high = vec![obs(90.0), obs(110.0)];
    let domain = compute_y_domain(&[&low, &high], false);
    assert!(domain.0 <= 1.0);
    assert!(domain.1 >= 110.0);
}

#[test]
fn padding_never_pushes_non_negative_domain_below_zero() {
    let (lower, _) = extend_domain((1.0, 100.0), false);
    assert!(lower >= 0.0);

    let (lower, upper) = extend_domain((-10.0, 100.0), false);
    assert!(lower < -10.0);
    assert!(upper > 100.0);
}

#[test]
fn extended_domain_contains_raw_domain() {
    for (lo, hi) in [(0.5, 2.0), (-40.0, -3.0), (10.0, 10_000.0), (-1.0, 1.0)] {
        let (out_lo, out_hi) = extend_domain((lo, hi), false);
        assert!(out_lo <= lo || (lo >= 0.0 && out_lo >= 0.0));
        assert!(out_hi >= hi);
    }
}

// File: crates/chart-core/tests/scales.rs
// Purpose: Band, linear and time scale behavior used by the chart builders.

use chart_core::axis::{band_ticks, ticks};
use chart_core::scale::{extent, zero_baseline};
use chart_core::{BandScale, LinearScale, TimeScale};
use chrono::{TimeZone, Utc};

#[test]
fn band_scale_splits_range_evenly() {
    let x = BandScale::new(["a", "b", "c"], [0.0, 300.0]);
    assert_eq!(x.step(), 100.0);
    assert_eq!(x.bandwidth(), 100.0);
    assert_eq!(x.position(&"a"), Some(0.0));
    assert_eq!(x.position(&"b"), Some(100.0));
    assert_eq!(x.position(&"c"), Some(200.0));
    assert_eq!(x.center(&"b"), Some(150.0));
}

#[test]
fn band_scale_inner_padding_keeps_equal_bands_inside_range() {
    let x = BandScale::new(["a", "b", "c"], [0.0, 300.0]).padding_inner(0.5);
    assert!((x.step() - 120.0).abs() < 1e-9);
    assert!((x.bandwidth() - 60.0).abs() < 1e-9);
    let starts: Vec<f64> = ["a", "b", "c"].iter().filter_map(|v| x.position(v)).collect();
    assert_eq!(starts.len(), 3);
    for w in starts.windows(2) {
        // band i + bandwidth <= band i+1
        assert!(w[0] + x.bandwidth() <= w[1] + 1e-9);
        assert!((w[1] - w[0] - x.step()).abs() < 1e-9);
    }
    assert!(starts[0] >= -1e-9);
    assert!(starts[2] + x.bandwidth() <= 300.0 + 1e-9);
}

#[test]
fn band_scale_align_shifts_the_leftover_space() {
    let left = BandScale::new(["a", "b"], [0.0, 100.0]).padding_outer(1.0).align(0.0);
    assert_eq!(left.position(&"a"), Some(0.0));
    assert_eq!(left.position(&"b"), Some(25.0));
    let right = left.align(1.0);
    assert_eq!(right.position(&"a"), Some(50.0));
    assert_eq!(right.position(&"b"), Some(75.0));
}

#[test]
fn band_scale_outer_padding_centres_the_bands() {
    let x = BandScale::new(["a", "b", "c"], [0.0, 300.0]).padding(0.5);
    let first = x.position(&"a").unwrap();
    let last_end = x.position(&"c").unwrap() + x.bandwidth();
    assert!(first > 0.0);
    assert!((first - (300.0 - last_end)).abs() < 1e-9);
}

#[test]
fn band_scale_reversed_range_flips_order() {
    let x = BandScale::new(["a", "b", "c"], [300.0, 0.0]);
    assert_eq!(x.position(&"a"), Some(200.0));
    assert_eq!(x.position(&"c"), Some(0.0));
}

#[test]
fn band_scale_rounding_snaps_to_pixels() {
    let x = BandScale::new(["a", "b", "c"], [0.0, 320.0]).round(true);
    assert_eq!(x.step(), 106.0);
    assert_eq!(x.bandwidth(), 106.0);
    assert_eq!(x.position(&"a"), Some(1.0));
    assert_eq!(x.position(&"c"), Some(213.0));
}

#[test]
fn band_scale_unknown_and_empty() {
    let x = BandScale::new(["a"], [0.0, 100.0]);
    assert_eq!(x.position(&"zzz"), None);

    let empty = BandScale::new(Vec::<&str>::new(), [0.0, 100.0]);
    assert_eq!(empty.bandwidth(), 0.0);
    assert_eq!(empty.position_at(0), None);
}

#[test]
fn band_ticks_follow_requested_values_and_format() {
    let x = BandScale::new([0, 1, 2], [0.0, 300.0]);
    let names = ["Fatal", "Serious", "Uninjured"];
    let fmt = move |v: &i32| names[*v as usize].to_string();
    let t = band_ticks(&x, Some(&[2, 0, 9][..]), Some(&fmt as &dyn Fn(&i32) -> String));
    assert_eq!(t.len(), 2);
    assert_eq!(t[0].label, "Uninjured");
    assert_eq!(t[0].position, 250.0);
    assert_eq!(t[1].label, "Fatal");
}

#[test]
fn zero_baseline_and_extent() {
    assert_eq!(zero_baseline([3.0, 7.0, f64::NAN, 5.0]), [0.0, 7.0]);
    assert_eq!(zero_baseline(Vec::new()), [0.0, 0.0]);
    assert_eq!(extent([3.0, -1.0, 8.0]), Some([-1.0, 8.0]));
    assert_eq!(extent(Vec::new()), None);
}

#[test]
fn linear_scale_maps_and_labels_ticks() {
    let y = LinearScale::new([0.0, 20.0], [370.0, 30.0]);
    assert_eq!(y.map(0.0), 370.0);
    assert_eq!(y.map(20.0), 30.0);
    assert_eq!(y.map(10.0), 200.0);
    assert!((y.invert(200.0) - 10.0).abs() < 1e-9);

    let t = ticks(&y, 4.0);
    let labels: Vec<&str> = t.iter().map(|t| t.label.as_str()).collect();
    assert_eq!(labels, ["0", "5", "10", "15", "20"]);

    let big = LinearScale::new([0.0, 2500.0], [0.0, 100.0]);
    let labels: Vec<String> = ticks(&big, 5.0).into_iter().map(|t| t.label).collect();
    assert_eq!(labels, ["0", "500", "1,000", "1,500", "2,000", "2,500"]);
}

#[test]
fn linear_scale_degenerate_domain_maps_to_middle() {
    let s = LinearScale::new([5.0, 5.0], [0.0, 100.0]);
    assert_eq!(s.map(5.0), 50.0);
    assert_eq!(s.ticks(10.0), vec![5.0]);
}

#[test]
fn time_scale_picks_calendar_ticks() {
    let start = Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap();
    let stop = Utc.with_ymd_and_hms(2010, 1, 1, 0, 0, 0).unwrap();
    let x = TimeScale::new([start, stop], [0.0, 500.0]);
    assert_eq!(x.map(start), 0.0);
    assert_eq!(x.map(stop), 500.0);

    let t = ticks(&x, 5.0);
    let labels: Vec<&str> = t.iter().map(|t| t.label.as_str()).collect();
    assert_eq!(labels, ["2000", "2002", "2004", "2006", "2008", "2010"]);
}

#[test]
fn time_scale_nice_extends_to_boundaries() {
    let start = Utc.with_ymd_and_hms(2019, 3, 14, 10, 0, 0).unwrap();
    let stop = Utc.with_ymd_and_hms(2021, 9, 2, 0, 0, 0).unwrap();
    let x = TimeScale::new([start, stop], [0.0, 600.0]).nice(3.0);
    let [d0, d1] = x.domain_millis();
    assert_eq!(d0 as i64, Utc.with_ymd_and_hms(2019, 1, 1, 0, 0, 0).unwrap().timestamp_millis());
    assert_eq!(d1 as i64, Utc.with_ymd_and_hms(2022, 1, 1, 0, 0, 0).unwrap().timestamp_millis());
}

//! Unit tests for peak-window curves.

use ridestats::metrics::{
    DurationSet, NormalizedPowerCurveCalculator, PeakWindowCurve, PowerCurveCalculator,
    WindowMetric,
};

/// Metric that rewards the easiest window, to exercise the generic engine.
struct Easiest;

impl WindowMetric for Easiest {
    fn metric(window_average: f64) -> f64 {
        -window_average
    }
}

#[test]
fn test_plateau_records_first_qualifying_window() {
    let mut curve = PowerCurveCalculator::new(DurationSet::new(&[1, 4]).unwrap());
    for power in [150.0, 150.0, 320.0, 320.0, 320.0, 320.0, 320.0, 320.0, 150.0] {
        curve.add(power).unwrap();
    }

    let one_sec = curve.peak_for(1).unwrap();
    assert_eq!(one_sec.value, 320.0);
    assert_eq!(one_sec.offset, 2);

    let four_sec = curve.peak_for(4).unwrap();
    assert_eq!(four_sec.value, 320.0);
    assert_eq!(four_sec.offset, 2);
}

#[test]
fn test_custom_metric_tracks_easiest_window() {
    let mut curve: PeakWindowCurve<Easiest> = PeakWindowCurve::new(DurationSet::new(&[3]).unwrap());
    for power in [200.0, 210.0, 90.0, 80.0, 85.0, 220.0] {
        curve.add(power).unwrap();
    }

    let peak = curve.peak_for(3).unwrap();
    assert_eq!(peak.value, -85.0);
    assert_eq!(peak.offset, 2);
}

#[test]
fn test_durations_preserve_caller_order() {
    let curve = PowerCurveCalculator::new(DurationSet::new(&[60, 5, 300]).unwrap());
    assert_eq!(curve.durations().as_slice(), &[60, 5, 300]);
    assert_eq!(curve.peaks().len(), 3);
    assert_eq!(curve.average_power(), None);
}

#[test]
fn test_normalized_power_curve_peak_at_or_above_average_power() {
    let durations = DurationSet::new(&[120]).unwrap();
    let mut np_curve = NormalizedPowerCurveCalculator::new(durations.clone(), 30).unwrap();
    let mut power_curve = PowerCurveCalculator::new(durations);

    for i in 0..600u32 {
        let power = if (i / 20) % 2 == 0 { 380.0 } else { 120.0 };
        np_curve.add(power).unwrap();
        power_curve.add(power).unwrap();
    }

    let np = np_curve.peak_for(120).unwrap().value;
    let average = power_curve.peak_for(120).unwrap().value;
    assert!(np >= average, "NP {} should not be below average {}", np, average);
}

#[test]
fn test_reset_then_resume_keeps_best_windows() {
    let durations = DurationSet::new(&[10]).unwrap();
    let mut np_curve = NormalizedPowerCurveCalculator::new(durations, 30).unwrap();

    for _ in 0..60 {
        np_curve.add(300.0).unwrap();
    }
    let best = np_curve.peak_for(10).unwrap();

    np_curve.reset();
    for _ in 0..60 {
        np_curve.add(200.0).unwrap();
    }

    assert_eq!(np_curve.peak_for(10), Some(best));
    assert_eq!(np_curve.sample_count(), 60);
}

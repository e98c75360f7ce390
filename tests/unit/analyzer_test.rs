//! Unit tests for segment resets across the activity analyzer.

use ridestats::activity::{ActivityAnalyzer, ActivityRecord, SensorSample};
use ridestats::config::AnalysisConfig;

fn config() -> AnalysisConfig {
    let mut config = AnalysisConfig::default();
    config.ftp = 200.0;
    config.power_curve_durations = vec![10, 60];
    config.normalized_power_durations = vec![30];
    config.heart_rate_durations = vec![20];
    config.efficiency.durations = vec![20];
    config
}

fn ride(power: f64, heart_rate: f64, seconds: usize) -> Vec<ActivityRecord> {
    vec![ActivityRecord::Sample(SensorSample::new(power, heart_rate)); seconds]
}

#[test]
fn test_lifetime_averages_span_reset() {
    let mut analyzer = ActivityAnalyzer::new(&config()).unwrap();

    let mut records = ride(300.0, 160.0, 100);
    records.push(ActivityRecord::TimerStop);
    records.extend(ride(100.0, 120.0, 100));
    analyzer.process_all(&records).unwrap();

    let summary = analyzer.summary();
    assert_eq!(summary.segments, 2);
    assert_eq!(summary.ticks, 200);
    assert_eq!(summary.average_power, Some(200.0));
    assert_eq!(summary.average_heart_rate, Some(140.0));
}

#[test]
fn test_best_records_survive_reset() {
    let mut analyzer = ActivityAnalyzer::new(&config()).unwrap();

    analyzer.process_all(&ride(300.0, 160.0, 100)).unwrap();
    let before = analyzer.summary();

    analyzer.process(&ActivityRecord::TimerStop).unwrap();
    analyzer.process_all(&ride(100.0, 120.0, 100)).unwrap();
    let after = analyzer.summary();

    assert_eq!(after.power_curve, before.power_curve);
    assert_eq!(after.normalized_power_curve, before.normalized_power_curve);
    assert_eq!(after.efficiency, before.efficiency);

    // Both segments are perfectly steady; the earlier window keeps the record
    assert_eq!(after.heart_rate_stability, before.heart_rate_stability);
}

#[test]
fn test_windows_do_not_straddle_reset() {
    let mut analyzer = ActivityAnalyzer::new(&config()).unwrap();

    analyzer.process_all(&ride(100.0, 120.0, 55)).unwrap();
    analyzer.process(&ActivityRecord::TimerStop).unwrap();
    analyzer.process_all(&ride(400.0, 150.0, 9)).unwrap();

    let summary = analyzer.summary();
    let ten_sec = summary.power_curve[0];
    assert_eq!(ten_sec.duration_secs, 10);
    assert_eq!(ten_sec.peak_watts, Some(100.0));

    // 64 power samples overall, but never 60 in one segment
    assert_eq!(summary.power_curve[1].peak_watts, None);
}

#[test]
fn test_power_statistics_ignore_reset() {
    let mut with_stop = ActivityAnalyzer::new(&config()).unwrap();
    let mut without_stop = ActivityAnalyzer::new(&config()).unwrap();

    let first = ride(250.0, 150.0, 90);
    let second = ride(150.0, 130.0, 90);

    with_stop.process_all(&first).unwrap();
    with_stop.process(&ActivityRecord::TimerStop).unwrap();
    with_stop.process_all(&second).unwrap();

    without_stop.process_all(&first).unwrap();
    without_stop.process_all(&second).unwrap();

    let a = with_stop.summary();
    let b = without_stop.summary();
    assert_eq!(a.normalized_power, b.normalized_power);
    assert_eq!(a.training_stress_score, b.training_stress_score);
}

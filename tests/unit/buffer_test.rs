//! Unit tests for the ring sample buffer and shared window sums.

use ridestats::metrics::{DurationSet, MetricsError, RingSampleBuffer, WindowSums};

#[test]
fn test_newest_and_oldest_offsets_for_many_capacities() {
    for capacity in 1..=12usize {
        let mut buffer = RingSampleBuffer::new(capacity);

        for n in 1..=capacity * 4 {
            buffer.add(n as f64);
            assert_eq!(buffer.read_negative_offset(0), Ok(n as f64));

            if n >= capacity {
                let expected = (n + 1 - capacity) as f64;
                assert_eq!(buffer.read_negative_offset(capacity - 1), Ok(expected));
            }
        }
    }
}

#[test]
fn test_out_of_range_for_every_state() {
    let mut buffer = RingSampleBuffer::new(4);
    for n in 0..10 {
        assert_eq!(
            buffer.read_negative_offset(4),
            Err(MetricsError::OutOfRange {
                offset: 4,
                capacity: 4
            })
        );
        buffer.add(n as f64);
    }
}

#[test]
fn test_overwrite_oldest_slot() {
    let mut buffer = RingSampleBuffer::new(10);
    for i in 0..10 {
        buffer.add(i as f64);
    }
    assert_eq!(buffer.read_negative_offset(9), Ok(0.0));
    assert!(buffer.read_negative_offset(10).is_err());

    buffer.add(42.0);
    assert_eq!(buffer.elements()[0], 42.0);
    assert_eq!(buffer.elements()[1], 1.0);
    assert_eq!(buffer.current_element(), 42.0);
}

#[test]
fn test_window_sums_against_brute_force() {
    let durations = [2u32, 5, 9];
    let mut sums = WindowSums::new(DurationSet::new(&durations).unwrap());
    let samples: Vec<f64> = (0..120u32).map(|i| f64::from((i * 97 + 13) % 251)).collect();

    for (n, &value) in samples.iter().enumerate() {
        sums.push(value).unwrap();

        for (index, &duration) in durations.iter().enumerate() {
            let len = (duration as usize).min(n + 1);
            let expected: f64 = samples[n + 1 - len..=n].iter().sum();
            assert_eq!(sums.sum(index), expected);

            let average = sums.average(index);
            if n + 1 >= duration as usize {
                assert_eq!(average, Some(expected / f64::from(duration)));
            } else {
                assert_eq!(average, None);
            }
        }
    }
}

//! Unit tests for decoding FIT activity content.
//!
//! Activities are assembled in memory with a minimal FIT writer so the
//! decoder sees real definition and data messages.

use ridestats::activity::{fit, ActivityAnalyzer, ActivityRecord, SensorSample};
use ridestats::config::AnalysisConfig;

/// Seconds between the Unix epoch and the FIT epoch (1989-12-31T00:00:00Z)
const FIT_EPOCH_OFFSET: i64 = 631_065_600;

const MESG_RECORD: u16 = 20;
const MESG_EVENT: u16 = 21;

const BASE_ENUM: u8 = 0x00;
const BASE_UINT8: u8 = 0x02;
const BASE_UINT16: u8 = 0x84;
const BASE_UINT32: u8 = 0x86;

const EVENT_TIMER: u8 = 0;
const EVENT_TYPE_START: u8 = 0;
const EVENT_TYPE_STOP_ALL: u8 = 4;

const LOCAL_RECORD: u8 = 0;
const LOCAL_EVENT: u8 = 1;

/// Minimal little-endian FIT writer.
struct FitBuilder {
    data: Vec<u8>,
}

impl FitBuilder {
    fn new() -> Self {
        let mut builder = Self { data: Vec::new() };
        builder.define(
            LOCAL_RECORD,
            MESG_RECORD,
            &[(253, 4, BASE_UINT32), (3, 1, BASE_UINT8), (7, 2, BASE_UINT16)],
        );
        builder.define(
            LOCAL_EVENT,
            MESG_EVENT,
            &[(253, 4, BASE_UINT32), (0, 1, BASE_ENUM), (1, 1, BASE_ENUM)],
        );
        builder
    }

    fn define(&mut self, local: u8, global: u16, fields: &[(u8, u8, u8)]) {
        self.data.push(0x40 | local);
        self.data.push(0); // reserved
        self.data.push(0); // little endian
        self.data.extend_from_slice(&global.to_le_bytes());
        self.data.push(fields.len() as u8);
        for (number, size, base_type) in fields {
            self.data.extend_from_slice(&[*number, *size, *base_type]);
        }
    }

    fn record(mut self, timestamp: u32, heart_rate: u8, power: u16) -> Self {
        self.data.push(LOCAL_RECORD);
        self.data.extend_from_slice(&timestamp.to_le_bytes());
        self.data.push(heart_rate);
        self.data.extend_from_slice(&power.to_le_bytes());
        self
    }

    fn event(mut self, timestamp: u32, event: u8, event_type: u8) -> Self {
        self.data.push(LOCAL_EVENT);
        self.data.extend_from_slice(&timestamp.to_le_bytes());
        self.data.push(event);
        self.data.push(event_type);
        self
    }

    fn finish(self) -> Vec<u8> {
        let mut file = Vec::with_capacity(14 + self.data.len() + 2);
        file.push(14);
        file.push(0x20);
        file.extend_from_slice(&2132u16.to_le_bytes());
        file.extend_from_slice(&(self.data.len() as u32).to_le_bytes());
        file.extend_from_slice(b".FIT");
        // Zero header CRC: the file CRC then covers the header as well
        file.extend_from_slice(&0u16.to_le_bytes());
        file.extend_from_slice(&self.data);

        let crc = fit_crc(&file);
        file.extend_from_slice(&crc.to_le_bytes());
        file
    }
}

fn fit_crc(data: &[u8]) -> u16 {
    const TABLE: [u16; 16] = [
        0x0000, 0xCC01, 0xD801, 0x1400, 0xF001, 0x3C00, 0x2800, 0xE401, 0xA001, 0x6C00, 0x7800,
        0xB401, 0x5000, 0x9C01, 0x8801, 0x4400,
    ];

    data.iter().fold(0u16, |crc, byte| {
        let tmp = TABLE[(crc & 0xF) as usize];
        let crc = ((crc >> 4) & 0x0FFF) ^ tmp ^ TABLE[(byte & 0xF) as usize];
        let tmp = TABLE[(crc & 0xF) as usize];
        ((crc >> 4) & 0x0FFF) ^ tmp ^ TABLE[((byte >> 4) & 0xF) as usize]
    })
}

fn sample_activity() -> Vec<u8> {
    FitBuilder::new()
        .event(1_000_000_000, EVENT_TIMER, EVENT_TYPE_START)
        .record(1_000_000_000, 140, 200)
        .record(1_000_000_001, 142, 210)
        .event(1_000_000_002, EVENT_TIMER, EVENT_TYPE_STOP_ALL)
        .event(1_000_000_060, EVENT_TIMER, EVENT_TYPE_START)
        // 0xFF is the FIT invalid marker for uint8: heart rate missing
        .record(1_000_000_060, 0xFF, 180)
        .finish()
}

#[test]
fn test_records_and_timer_stop_decoded_in_order() {
    let activity = fit::decode(&sample_activity()).unwrap();

    assert_eq!(
        activity.records,
        vec![
            ActivityRecord::Sample(SensorSample::new(200.0, 140.0)),
            ActivityRecord::Sample(SensorSample::new(210.0, 142.0)),
            ActivityRecord::TimerStop,
            ActivityRecord::Sample(SensorSample::power_only(180.0)),
        ]
    );
}

#[test]
fn test_start_time_from_first_record() {
    let activity = fit::decode(&sample_activity()).unwrap();

    let start = activity.start_time.unwrap();
    assert_eq!(start.timestamp(), FIT_EPOCH_OFFSET + 1_000_000_000);
}

#[test]
fn test_timer_start_events_ignored() {
    let content = FitBuilder::new()
        .event(1_000_000_000, EVENT_TIMER, EVENT_TYPE_START)
        .record(1_000_000_000, 120, 150)
        .finish();

    let activity = fit::decode(&content).unwrap();
    assert_eq!(activity.records.len(), 1);
    assert!(!activity.records[0].is_timer_stop());
}

#[test]
fn test_events_without_records_rejected() {
    let content = FitBuilder::new()
        .event(1_000_000_000, EVENT_TIMER, EVENT_TYPE_START)
        .finish();

    assert!(fit::decode(&content).is_err());
}

#[test]
fn test_decoded_stop_splits_segments() {
    let activity = fit::decode(&sample_activity()).unwrap();

    let mut analyzer = ActivityAnalyzer::new(&AnalysisConfig::default()).unwrap();
    analyzer.process_all(&activity.records).unwrap();
    analyzer.set_start_time(activity.start_time);

    let summary = analyzer.summary();
    assert_eq!(summary.segments, 2);
    assert_eq!(summary.ticks, 3);
    assert_eq!(summary.power_samples, 3);
    assert_eq!(summary.heart_rate_samples, 2);
    assert_eq!(summary.start_time, activity.start_time);
}

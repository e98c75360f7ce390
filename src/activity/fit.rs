//! FIT activity decoder.

use super::{ActivityError, ActivityRecord, DecodedActivity, SensorSample};
use chrono::{DateTime, Utc};
use fitparser::profile::MesgNum;
use fitparser::Value;
use std::path::Path;

/// FIT `event` enum value for the timer.
const EVENT_TIMER: u8 = 0;
/// FIT `event_type` enum values that stop the timer.
const EVENT_TYPE_STOP: u8 = 1;
const EVENT_TYPE_STOP_ALL: u8 = 4;

/// Read and decode a FIT file.
pub fn decode_file(path: &Path) -> Result<DecodedActivity, ActivityError> {
    let content = std::fs::read(path)?;
    decode(&content)
}

/// Decode FIT content into activity records.
pub fn decode(content: &[u8]) -> Result<DecodedActivity, ActivityError> {
    let fit_data = fitparser::from_bytes(content)
        .map_err(|e| ActivityError::ParseError(format!("FIT parse error: {}", e)))?;

    let mut activity = DecodedActivity::default();
    let mut stops = 0usize;

    for message in fit_data {
        match message.kind() {
            MesgNum::Record => {
                let mut sample = SensorSample::default();

                for field in message.fields() {
                    match field.name() {
                        "power" => sample.power = numeric(field.value()),
                        "heart_rate" => sample.heart_rate = numeric(field.value()),
                        "timestamp" if activity.start_time.is_none() => {
                            if let Value::Timestamp(t) = field.value() {
                                let start: DateTime<Utc> = (*t).into();
                                activity.start_time = Some(start);
                            }
                        }
                        _ => {}
                    }
                }

                activity.records.push(ActivityRecord::Sample(sample));
            }
            MesgNum::Event => {
                let mut is_timer = false;
                let mut is_stop = false;

                for field in message.fields() {
                    match field.name() {
                        "event" => is_timer = enum_is(field.value(), &["timer"], &[EVENT_TIMER]),
                        "event_type" => {
                            is_stop = enum_is(
                                field.value(),
                                &["stop", "stop_all"],
                                &[EVENT_TYPE_STOP, EVENT_TYPE_STOP_ALL],
                            )
                        }
                        _ => {}
                    }
                }

                if is_timer && is_stop {
                    activity.records.push(ActivityRecord::TimerStop);
                    stops += 1;
                }
            }
            _ => {}
        }
    }

    if activity.records.is_empty() {
        return Err(ActivityError::InvalidFormat(
            "No record messages found in FIT file".to_string(),
        ));
    }

    tracing::debug!(
        records = activity.records.len(),
        stops,
        "Decoded FIT activity"
    );
    Ok(activity)
}

/// Numeric value of a field, ignoring non-numeric encodings.
fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::UInt8(v) | Value::UInt8z(v) | Value::Byte(v) => Some(f64::from(*v)),
        Value::UInt16(v) | Value::UInt16z(v) => Some(f64::from(*v)),
        Value::UInt32(v) | Value::UInt32z(v) => Some(f64::from(*v)),
        Value::SInt8(v) => Some(f64::from(*v)),
        Value::SInt16(v) => Some(f64::from(*v)),
        Value::SInt32(v) => Some(f64::from(*v)),
        Value::Float32(v) => Some(f64::from(*v)),
        Value::Float64(v) => Some(*v),
        _ => None,
    }
}

/// Match an enum field given either its profile name or raw code.
fn enum_is(value: &Value, names: &[&str], codes: &[u8]) -> bool {
    match value {
        Value::String(name) => names.contains(&name.as_str()),
        Value::Enum(code) | Value::UInt8(code) => codes.contains(code),
        _ => false,
    }
}

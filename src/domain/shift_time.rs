use crate::domain::models::ShiftType;
use chrono::{Local, NaiveTime, Timelike};

/// Classify a wall-clock time into a shift: [08:00,17:00) is Day,
/// [17:00,23:00) is Evening, everything else (wrapping midnight) is Night.
/// Only used to pre-select the default shift type in the capture form; it
/// never gates or validates stored data.
pub fn classify(time: NaiveTime) -> ShiftType {
    match time.hour() {
        8..=16 => ShiftType::Day,
        17..=22 => ShiftType::Evening,
        _ => ShiftType::Night,
    }
}

pub fn current_shift() -> ShiftType {
    classify(Local::now().time())
}

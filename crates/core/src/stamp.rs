#![forbid(unsafe_code)]

use crate::sequence::SequenceValue;

/// Calendar fields for one stamp. Validation happens here so that rendering
/// is infallible.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StampTime {
    year: i32,
    month: u8,
    day: u8,
    hour: u8,
    minute: u8,
    second: u8,
}

impl StampTime {
    /// Fallback for callers that must always produce some stamp.
    pub const UNIX_EPOCH: StampTime = StampTime {
        year: 1970,
        month: 1,
        day: 1,
        hour: 0,
        minute: 0,
        second: 0,
    };

    pub fn try_new(
        year: i32,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: u8,
    ) -> Result<Self, StampTimeError> {
        // Year is capped so the date component is always exactly 8 digits.
        if !(0..=9999).contains(&year) {
            return Err(StampTimeError::YearOutOfRange);
        }
        if !(1..=12).contains(&month) {
            return Err(StampTimeError::MonthOutOfRange);
        }
        if !(1..=31).contains(&day) {
            return Err(StampTimeError::DayOutOfRange);
        }
        if hour >= 24 {
            return Err(StampTimeError::HourOutOfRange);
        }
        if minute >= 60 {
            return Err(StampTimeError::MinuteOutOfRange);
        }
        if second >= 60 {
            return Err(StampTimeError::SecondOutOfRange);
        }
        Ok(Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StampTimeError {
    YearOutOfRange,
    MonthOutOfRange,
    DayOutOfRange,
    HourOutOfRange,
    MinuteOutOfRange,
    SecondOutOfRange,
}

impl StampTimeError {
    pub fn message(&self) -> &'static str {
        match self {
            Self::YearOutOfRange => "year must be within 0..=9999",
            Self::MonthOutOfRange => "month must be within 1..=12",
            Self::DayOutOfRange => "day must be within 1..=31",
            Self::HourOutOfRange => "hour must be within 0..=23",
            Self::MinuteOutOfRange => "minute must be within 0..=59",
            Self::SecondOutOfRange => "second must be within 0..=59",
        }
    }
}

/// Renders the clipboard/display stamp: `yyyyMMdd-HHmmss-<sequence>`.
///
/// The timestamp component is always 15 characters; the sequence component is
/// plain decimal with no leading zeros. Pure and deterministic: both inputs
/// arrive from the caller, there is no clock read here.
pub fn render(time: &StampTime, sequence: SequenceValue) -> String {
    format!(
        "{:04}{:02}{:02}-{:02}{:02}{:02}-{}",
        time.year, time.month, time.day, time.hour, time.minute, time.second, sequence
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stamp_time_validation() {
        assert_eq!(
            StampTime::try_new(10_000, 1, 1, 0, 0, 0).unwrap_err(),
            StampTimeError::YearOutOfRange
        );
        assert_eq!(
            StampTime::try_new(2023, 0, 1, 0, 0, 0).unwrap_err(),
            StampTimeError::MonthOutOfRange
        );
        assert_eq!(
            StampTime::try_new(2023, 13, 1, 0, 0, 0).unwrap_err(),
            StampTimeError::MonthOutOfRange
        );
        assert_eq!(
            StampTime::try_new(2023, 1, 32, 0, 0, 0).unwrap_err(),
            StampTimeError::DayOutOfRange
        );
        assert_eq!(
            StampTime::try_new(2023, 1, 1, 24, 0, 0).unwrap_err(),
            StampTimeError::HourOutOfRange
        );
        assert_eq!(
            StampTime::try_new(2023, 1, 1, 0, 60, 0).unwrap_err(),
            StampTimeError::MinuteOutOfRange
        );
        assert_eq!(
            StampTime::try_new(2023, 1, 1, 0, 0, 60).unwrap_err(),
            StampTimeError::SecondOutOfRange
        );
        assert!(StampTime::try_new(2023, 10, 27, 14, 30, 5).is_ok());
    }

    #[test]
    fn render_matches_contract() {
        let time = StampTime::try_new(2023, 10, 27, 14, 30, 5).unwrap();
        let sequence = SequenceValue::try_new(1).unwrap();
        assert_eq!(render(&time, sequence), "20231027-143005-1");
    }

    #[test]
    fn render_zero_pads_every_timestamp_field() {
        let time = StampTime::try_new(900, 1, 2, 3, 4, 5).unwrap();
        let sequence = SequenceValue::try_new(12).unwrap();
        assert_eq!(render(&time, sequence), "09000102-030405-12");
    }

    #[test]
    fn render_is_pure() {
        let time = StampTime::try_new(2024, 12, 31, 23, 59, 59).unwrap();
        let sequence = SequenceValue::try_new(100).unwrap();
        assert_eq!(render(&time, sequence), render(&time, sequence));
    }

    #[test]
    fn timestamp_component_is_fifteen_chars() {
        let time = StampTime::try_new(1, 1, 1, 0, 0, 0).unwrap();
        let sequence = SequenceValue::try_new(9).unwrap();
        let stamp = render(&time, sequence);
        assert_eq!(stamp.len(), 15 + 1 + 1);
        assert_eq!(&stamp[..15], "00010101-000000");
    }
}

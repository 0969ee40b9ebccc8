#![forbid(unsafe_code)]

use seq_core::stamp::StampTime;
use time::OffsetDateTime;

/// Current wall clock (UTC) as stamp calendar fields. This is the only clock
/// read in the program; everything downstream takes the timestamp as an
/// argument.
pub fn now_stamp_time() -> StampTime {
    stamp_time_from(OffsetDateTime::now_utc())
}

fn stamp_time_from(dt: OffsetDateTime) -> StampTime {
    StampTime::try_new(
        dt.year(),
        u8::from(dt.month()),
        dt.day(),
        dt.hour(),
        dt.minute(),
        dt.second(),
    )
    .unwrap_or(StampTime::UNIX_EPOCH)
}

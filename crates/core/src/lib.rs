#![forbid(unsafe_code)]

pub mod sequence;
pub mod stamp;

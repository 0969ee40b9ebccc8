#![forbid(unsafe_code)]

mod store;

pub use store::{CounterStore, StoreError};

#![forbid(unsafe_code)]

pub mod chunk;
pub mod model;
pub mod time;

pub use time::Clock;

//! Authentication provider boundary

pub mod ports;

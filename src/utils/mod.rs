//! Utility Module
//!
//! - [`Timer`]: frame clock supplying the simulation delta time

pub mod time;

pub use time::Timer;

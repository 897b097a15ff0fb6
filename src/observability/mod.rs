//! Observability utilities.
//!
//! A markdown turn logger the orchestrator writes through when attached.

pub mod logger;

pub use logger::Logger;

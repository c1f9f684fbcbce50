//! Library powering the deal desk: configuration, telemetry, and the
//! scoring workflow that turns raw deal measurements into a classified,
//! routable score.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;

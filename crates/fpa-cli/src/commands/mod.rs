pub mod bench;
pub mod completions;
pub mod discover;
pub mod optimize;
pub mod taps;
pub mod telemetry;

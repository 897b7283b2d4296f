//! CLI command handlers. Each command is in its own file.

mod direct;
mod execute;
mod hls;
mod run;

pub use direct::run_direct;
pub use hls::run_hls;
pub use run::run_manifest;

#[cfg(test)]
pub(crate) use execute::{describe_event, engine_for};

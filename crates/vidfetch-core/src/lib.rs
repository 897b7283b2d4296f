pub mod config;
pub mod logging;

pub mod direct;
pub mod error;
pub mod fetch_head;
pub mod hls;
pub mod http;
pub mod job;
pub mod outcome;
pub mod scheduler;
pub mod throttle;
pub mod url_model;

pub use error::DownloadError;
pub use job::{DownloadJob, JobKind, Language};
pub use outcome::Completion;

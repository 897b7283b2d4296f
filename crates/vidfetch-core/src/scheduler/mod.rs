//! Batch scheduler.
//!
//! Partitions the ordered job list into fixed-size batches, runs each batch's
//! jobs concurrently under an evenly split bandwidth budget and waits for the
//! whole batch before starting the next.

mod batch;
mod budget;
mod dispatch;
mod progress;
mod run;

pub use batch::partition;
pub use budget::{limiter_for_job, per_job_rate};
pub use dispatch::{Engine, JobRunner};
pub use progress::{JobOutcome, RunReport, SchedulerEvent};
pub use run::{run_batches, BatchSettings};

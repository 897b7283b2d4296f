//! Partitioning of the ordered job list into fixed-size batches.

use crate::job::DownloadJob;

/// Splits `jobs` into consecutive batches of at most `batch_size`, keeping order.
pub fn partition(jobs: Vec<DownloadJob>, batch_size: usize) -> Vec<Vec<DownloadJob>> {
    let batch_size = batch_size.max(1);
    let mut batches = Vec::with_capacity(jobs.len().div_ceil(batch_size));
    let mut current = Vec::with_capacity(batch_size);
    for job in jobs {
        current.push(job);
        if current.len() == batch_size {
            batches.push(std::mem::replace(&mut current, Vec::with_capacity(batch_size)));
        }
    }
    if !current.is_empty() {
        batches.push(current);
    }
    batches
}

use anyhow::{anyhow, Result};
use log::warn;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::fmt;

/// Worker pool with a fixed number of threads (at least one)
pub fn thread_pool(num_threads: usize) -> Result<ThreadPool> {
    ThreadPoolBuilder::new()
        .num_threads(num_threads.max(1))
        .build()
        .map_err(|e| anyhow!("Error when creating the worker pool: {}", e))
}

/// A task of a batch that failed, with the identity of the task
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TaskFailure {
    pub task: String,
    pub message: String,
}

impl fmt::Display for TaskFailure {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.task, self.message)
    }
}

/// Keep the successful results in order, log and store the failures
pub fn split_failures<T, I>(results: I, failures: &mut Vec<TaskFailure>) -> Vec<T>
where
    I: IntoIterator<Item = (String, Result<T>)>,
{
    let mut successes = Vec::new();
    for (task, result) in results {
        match result {
            Ok(x) => successes.push(x),
            Err(e) => {
                let failure = TaskFailure {
                    task,
                    message: format!("{:#}", e),
                };
                warn!("Task failed, {}", failure);
                failures.push(failure);
            }
        }
    }
    successes
}

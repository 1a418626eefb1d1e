use crate::{
    config::{Policy, SimConfig},
    core::{Pid, Task, Ticks},
    error::InputError,
};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

fn default_priority() -> u8 {
    1
}

/// Immutable process descriptor supplied by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Process {
    pub pid: Pid,
    pub arrival_time: Ticks,
    pub burst_time: Ticks,
    pub priority: u8,
}

impl Process {
    pub fn new(pid: Pid, arrival_time: Ticks, burst_time: Ticks, priority: u8) -> Self {
        Self {
            pid,
            arrival_time,
            burst_time,
            priority,
        }
    }
}

/// A process as entered by a user, before ids are handed out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ProcessEntry {
    pub arrival_time: Ticks,
    pub burst_time: Ticks,
    #[serde(default = "default_priority")]
    pub priority: u8,
}

/// Number entries 1..=N in entry order.
pub fn number_entries(entries: impl IntoIterator<Item = ProcessEntry>) -> Vec<Process> {
    entries
        .into_iter()
        .zip(1..)
        .map(|(entry, pid)| Process::new(pid, entry.arrival_time, entry.burst_time, entry.priority))
        .collect()
}

/// Per-process outcome of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProcessResult {
    pub pid: Pid,
    pub arrival_time: Ticks,
    pub burst_time: Ticks,
    pub priority: u8,
    /// First time the process was given the CPU.
    pub start_time: Ticks,
    pub completion_time: Ticks,
    pub turnaround_time: Ticks,
    pub waiting_time: Ticks,
    pub response_time: Ticks,
}

impl ProcessResult {
    /// Build the result of a completed task. `None` if the task never ran to
    /// completion.
    pub(crate) fn from_task(task: &Task) -> Option<Self> {
        let start_time = task.first_run?;
        let completion_time = task.completion_time?;
        let turnaround_time = completion_time.checked_sub(task.arrival_time)?;
        Some(Self {
            pid: task.pid,
            arrival_time: task.arrival_time,
            burst_time: task.burst_time,
            priority: task.priority,
            start_time,
            completion_time,
            turnaround_time,
            waiting_time: turnaround_time.checked_sub(task.burst_time)?,
            response_time: start_time.checked_sub(task.arrival_time)?,
        })
    }
}

/// Reject input the engine cannot simulate. Runs before any run state
/// exists, so a failure never yields partial results.
pub fn validate(
    processes: &[Process],
    policy: Policy,
    config: &SimConfig,
) -> Result<(), InputError> {
    if processes.is_empty() {
        return Err(InputError::NoProcesses);
    }

    if policy == Policy::RoundRobin && config.time_quantum.is_none_or(|q| q == 0) {
        return Err(InputError::MissingQuantum);
    }

    let mut seen = FxHashSet::default();
    for p in processes {
        if p.pid == 0 {
            return Err(InputError::ZeroPid);
        }
        if !seen.insert(p.pid) {
            return Err(InputError::DuplicatePid { pid: p.pid });
        }
        if p.burst_time == 0 {
            return Err(InputError::ZeroBurst { pid: p.pid });
        }
        if policy.uses_priority() && !config.priority_range.contains(&p.priority) {
            return Err(InputError::PriorityOutOfRange {
                pid: p.pid,
                priority: p.priority,
                min: *config.priority_range.start(),
                max: *config.priority_range.end(),
            });
        }
    }

    Ok(())
}

use crate::core::{Pid, Ticks};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    NoProcesses,
    ZeroPid,
    DuplicatePid {
        pid: Pid,
    },
    ZeroBurst {
        pid: Pid,
    },
    PriorityOutOfRange {
        pid: Pid,
        priority: u8,
        min: u8,
        max: u8,
    },
    // Round Robin without a quantum, or with a quantum of zero
    MissingQuantum,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimError {
    InvalidInput(InputError),
    /// Internal consistency fault: the CPU cannot make progress although
    /// unfinished processes remain.
    UnreachableState {
        now: Ticks,
        unfinished: usize,
    },
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            InputError::NoProcesses => write!(f, "process list is empty"),
            InputError::ZeroPid => write!(f, "process ids must be positive"),
            InputError::DuplicatePid { pid } => write!(f, "process id {pid} is not unique"),
            InputError::ZeroBurst { pid } => {
                write!(f, "process {pid} has a burst time of zero")
            }
            InputError::PriorityOutOfRange {
                pid,
                priority,
                min,
                max,
            } => write!(
                f,
                "process {pid} has priority {priority}, outside {min}..={max}"
            ),
            InputError::MissingQuantum => {
                write!(f, "round robin needs a time quantum of at least 1")
            }
        }
    }
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SimError::InvalidInput(err) => write!(f, "invalid input: {err}"),
            SimError::UnreachableState { now, unfinished } => write!(
                f,
                "scheduler stalled at t={now} with {unfinished} unfinished processes"
            ),
        }
    }
}

impl std::error::Error for InputError {}

impl std::error::Error for SimError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimError::InvalidInput(err) => Some(err),
            SimError::UnreachableState { .. } => None,
        }
    }
}

impl From<InputError> for SimError {
    fn from(err: InputError) -> Self {
        SimError::InvalidInput(err)
    }
}

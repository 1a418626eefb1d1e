pub mod config;
pub mod core;
pub mod error;
pub mod scheduler;
pub mod sim;
pub mod stats;

pub use config::{Policy, PriorityConvention, SimConfig};
pub use error::{InputError, SimError};
pub use scheduler::Scheduler;
pub use sim::{GanttBlock, Process, ProcessResult, Schedule, Timeline, simulate};
pub use stats::Stats;

pub mod driver;
pub mod event;
pub mod observer;
pub mod state;

pub use driver::{SchedCore, SliceOutcome};
pub use event::SchedCoreEvent;
pub use state::{CpuState, Dsq, DsqId, Pid, Rank, RunCtx, Task, TaskId, TaskState, Ticks};

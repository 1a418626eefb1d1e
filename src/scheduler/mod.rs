pub mod fifo;
pub mod ljf;
pub mod lrtf;
pub mod priority;
pub mod rr;
pub mod sjf;
pub mod srtf;

use crate::{
    config::{Policy, SimConfig},
    core::{
        Pid, Rank,
        state::{DsqId, RunCtx, TaskId},
    },
};
pub use fifo::FcfsScheduler;
pub use ljf::LjfScheduler;
pub use lrtf::LrtfScheduler;
pub use priority::{PreemptivePriorityScheduler, PriorityScheduler};
pub use rr::RoundRobinScheduler;
pub use sjf::SjfScheduler;
pub use srtf::SrtfScheduler;

#[derive(Debug, PartialEq, Eq)]
pub enum DispatchError {
    NoRunnableTask,
}

/// A selection rule plugged into the core driver.
///
/// `enqueue` is called whenever a task becomes runnable: on arrival, and
/// again after a slice ends with work left. `dispatch` is called when the
/// CPU and the shared DSQs are empty and must move one task onto the
/// CPU-local DSQ, or report that nothing is runnable. How long the task then
/// runs is decided by the core from [`Policy::timing`].
pub trait Scheduler {
    const POLICY: Policy;

    fn init(ctx: &mut RunCtx, config: &SimConfig) -> Self;

    fn enqueue(&mut self, ctx: &mut RunCtx, task: TaskId);

    fn dispatch(&mut self, _ctx: &mut RunCtx) -> Result<(), DispatchError> {
        Err(DispatchError::NoRunnableTask)
    }
}

// Shared by every scheduler that orders its own priority DSQ
fn dispatch_lowest_rank(ctx: &mut RunCtx, priq: DsqId) -> Result<(), DispatchError> {
    if ctx.dsq_move_to_local(priq) {
        Ok(())
    } else {
        Err(DispatchError::NoRunnableTask)
    }
}

fn pid_key(pid: Pid) -> i64 {
    i64::from(pid)
}

// Ticks comfortably fit i64 for any tractable simulation
fn ticks_key(ticks: u64) -> i64 {
    i64::try_from(ticks).unwrap_or(i64::MAX)
}

use super::{Policy, RunCtx, Scheduler, SimConfig, TaskId};

/// Round robin over the global FIFO. The core hands each dispatched task
/// `min(quantum, remaining)` ticks and admits arrivals from the slice
/// window before requeueing the task, so a preempted task always lands
/// behind processes that showed up while it ran.
pub struct RoundRobinScheduler;

impl Scheduler for RoundRobinScheduler {
    const POLICY: Policy = Policy::RoundRobin;

    fn init(_ctx: &mut RunCtx, _config: &SimConfig) -> Self {
        Self
    }

    fn enqueue(&mut self, ctx: &mut RunCtx, task: TaskId) {
        let dsq = ctx.global_dsq();
        ctx.dsq_push_fifo(dsq, task);
    }
}

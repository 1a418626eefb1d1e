use super::{Policy, RunCtx, Scheduler, SimConfig, TaskId};

/// First come, first served. Arrivals are admitted in (arrival, pid) order,
/// so the global FIFO already holds the FCFS order.
pub struct FcfsScheduler;

impl Scheduler for FcfsScheduler {
    const POLICY: Policy = Policy::Fcfs;

    fn init(_ctx: &mut RunCtx, _config: &SimConfig) -> Self {
        Self
    }

    fn enqueue(&mut self, ctx: &mut RunCtx, task: TaskId) {
        let dsq = ctx.global_dsq();
        ctx.dsq_push_fifo(dsq, task);
    }
}

use super::{
    DispatchError, Policy, Rank, RunCtx, Scheduler, SimConfig, TaskId, dispatch_lowest_rank,
    pid_key, ticks_key,
};
use crate::core::DsqId;

/// Longest remaining time first, unit-stepped like SRTF. Among equal
/// remaining times the lowest pid wins.
pub struct LrtfScheduler {
    ready: DsqId,
}

impl Scheduler for LrtfScheduler {
    const POLICY: Policy = Policy::Lrtf;

    fn init(ctx: &mut RunCtx, _config: &SimConfig) -> Self {
        Self {
            ready: ctx.create_dsq_priq(),
        }
    }

    fn enqueue(&mut self, ctx: &mut RunCtx, task: TaskId) {
        let t = ctx.task(task);
        let rank = Rank(-ticks_key(t.remaining_time), pid_key(t.pid), 0);
        ctx.dsq_push_priq(self.ready, task, rank);
    }

    fn dispatch(&mut self, ctx: &mut RunCtx) -> Result<(), DispatchError> {
        dispatch_lowest_rank(ctx, self.ready)
    }
}

use super::{
    DispatchError, Policy, Rank, RunCtx, Scheduler, SimConfig, TaskId, dispatch_lowest_rank,
    pid_key, ticks_key,
};
use crate::core::DsqId;

/// Shortest remaining time first. The core runs one tick at a time and
/// requeues the running task after every tick, so the whole ready set
/// (running task included) competes again each tick. Ties go to the lowest
/// pid.
pub struct SrtfScheduler {
    ready: DsqId,
}

impl Scheduler for SrtfScheduler {
    const POLICY: Policy = Policy::Srtf;

    fn init(ctx: &mut RunCtx, _config: &SimConfig) -> Self {
        Self {
            ready: ctx.create_dsq_priq(),
        }
    }

    fn enqueue(&mut self, ctx: &mut RunCtx, task: TaskId) {
        let t = ctx.task(task);
        let rank = Rank(ticks_key(t.remaining_time), pid_key(t.pid), 0);
        ctx.dsq_push_priq(self.ready, task, rank);
    }

    fn dispatch(&mut self, ctx: &mut RunCtx) -> Result<(), DispatchError> {
        dispatch_lowest_rank(ctx, self.ready)
    }
}

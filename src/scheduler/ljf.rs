use super::{
    DispatchError, Policy, Rank, RunCtx, Scheduler, SimConfig, TaskId, dispatch_lowest_rank,
    pid_key, ticks_key,
};
use crate::core::DsqId;

/// Longest job first, non-preemptive. Ties: earlier arrival, then lower pid.
pub struct LjfScheduler {
    ready: DsqId,
}

impl Scheduler for LjfScheduler {
    const POLICY: Policy = Policy::Ljf;

    fn init(ctx: &mut RunCtx, _config: &SimConfig) -> Self {
        Self {
            ready: ctx.create_dsq_priq(),
        }
    }

    fn enqueue(&mut self, ctx: &mut RunCtx, task: TaskId) {
        let t = ctx.task(task);
        let rank = Rank(
            -ticks_key(t.burst_time),
            ticks_key(t.arrival_time),
            pid_key(t.pid),
        );
        ctx.dsq_push_priq(self.ready, task, rank);
    }

    fn dispatch(&mut self, ctx: &mut RunCtx) -> Result<(), DispatchError> {
        dispatch_lowest_rank(ctx, self.ready)
    }
}

#[cfg(test)]
mod tests {
    use super::super::testutil::*;
    use crate::config::{Policy, SimConfig};

    #[test]
    fn longest_ready_job_goes_next() {
        let schedule = run(
            &procs(&[(0, 7), (2, 4), (4, 1), (5, 4)]),
            Policy::Ljf,
            &SimConfig::default(),
        );
        assert_eq!(
            blocks(&schedule),
            vec![(1, 0, 7), (2, 7, 11), (4, 11, 15), (3, 15, 16)]
        );
    }

    #[test]
    fn only_ready_jobs_compete() {
        // P2 is longer but has not arrived when the CPU frees up at t=0
        let schedule = run(&procs(&[(0, 2), (1, 9), (0, 3)]), Policy::Ljf, &SimConfig::default());
        assert_eq!(blocks(&schedule), vec![(3, 0, 3), (2, 3, 12), (1, 12, 14)]);
    }
}

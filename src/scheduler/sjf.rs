use super::{
    DispatchError, Policy, Rank, RunCtx, Scheduler, SimConfig, TaskId, dispatch_lowest_rank,
    pid_key, ticks_key,
};
use crate::core::DsqId;

/// Shortest job first, non-preemptive. Ties: earlier arrival, then lower pid.
pub struct SjfScheduler {
    ready: DsqId,
}

impl Scheduler for SjfScheduler {
    const POLICY: Policy = Policy::Sjf;

    fn init(ctx: &mut RunCtx, _config: &SimConfig) -> Self {
        Self {
            ready: ctx.create_dsq_priq(),
        }
    }

    fn enqueue(&mut self, ctx: &mut RunCtx, task: TaskId) {
        let t = ctx.task(task);
        let rank = Rank(
            ticks_key(t.burst_time),
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
    fn shortest_ready_job_goes_next() {
        let schedule = run(
            &procs(&[(0, 7), (2, 4), (4, 1), (5, 4)]),
            Policy::Sjf,
            &SimConfig::default(),
        );
        assert_eq!(
            blocks(&schedule),
            vec![(1, 0, 7), (3, 7, 8), (2, 8, 12), (4, 12, 16)]
        );
        let waits: Vec<_> = schedule.results.iter().map(|r| (r.pid, r.waiting_time)).collect();
        assert_eq!(waits, vec![(1, 0), (3, 3), (2, 6), (4, 7)]);
    }

    #[test]
    fn does_not_preempt_running_job() {
        let schedule = run(&procs(&[(0, 6), (1, 1)]), Policy::Sjf, &SimConfig::default());
        assert_eq!(blocks(&schedule), vec![(1, 0, 6), (2, 6, 7)]);
    }

    #[test]
    fn equal_bursts_prefer_earlier_arrival() {
        let schedule = run(
            &procs(&[(0, 2), (2, 3), (1, 3)]),
            Policy::Sjf,
            &SimConfig::default(),
        );
        assert_eq!(blocks(&schedule), vec![(1, 0, 2), (3, 2, 5), (2, 5, 8)]);
    }
}

use super::{
    DispatchError, Policy, Rank, RunCtx, Scheduler, SimConfig, TaskId, dispatch_lowest_rank,
    pid_key, ticks_key,
};
use crate::{config::PriorityConvention, core::DsqId};

/// Non-preemptive priority. Ties: earlier arrival, then lower pid.
pub struct PriorityScheduler {
    ready: DsqId,
    convention: PriorityConvention,
}

impl Scheduler for PriorityScheduler {
    const POLICY: Policy = Policy::PriorityNonPreemptive;

    fn init(ctx: &mut RunCtx, config: &SimConfig) -> Self {
        Self {
            ready: ctx.create_dsq_priq(),
            convention: config.priority_convention,
        }
    }

    fn enqueue(&mut self, ctx: &mut RunCtx, task: TaskId) {
        let t = ctx.task(task);
        let rank = Rank(
            self.convention.rank(t.priority),
            ticks_key(t.arrival_time),
            pid_key(t.pid),
        );
        ctx.dsq_push_priq(self.ready, task, rank);
    }

    fn dispatch(&mut self, ctx: &mut RunCtx) -> Result<(), DispatchError> {
        dispatch_lowest_rank(ctx, self.ready)
    }
}

/// Preemptive priority, re-evaluated every tick. A strictly better priority
/// takes the CPU at the next tick boundary; equal priorities go to the
/// lowest pid.
pub struct PreemptivePriorityScheduler {
    ready: DsqId,
    convention: PriorityConvention,
}

impl Scheduler for PreemptivePriorityScheduler {
    const POLICY: Policy = Policy::PriorityPreemptive;

    fn init(ctx: &mut RunCtx, config: &SimConfig) -> Self {
        Self {
            ready: ctx.create_dsq_priq(),
            convention: config.priority_convention,
        }
    }

    fn enqueue(&mut self, ctx: &mut RunCtx, task: TaskId) {
        let t = ctx.task(task);
        let rank = Rank(self.convention.rank(t.priority), pid_key(t.pid), 0);
        ctx.dsq_push_priq(self.ready, task, rank);
    }

    fn dispatch(&mut self, ctx: &mut RunCtx) -> Result<(), DispatchError> {
        dispatch_lowest_rank(ctx, self.ready)
    }
}

#[cfg(test)]
mod tests {
    use super::super::testutil::*;
    use crate::config::{Policy, PriorityConvention, SimConfig};

    const SET: [(u64, u64, u8); 4] = [(0, 4, 2), (1, 3, 1), (2, 1, 3), (3, 2, 1)];

    #[test]
    fn non_preemptive_low_number_is_high() {
        let schedule = run(
            &procs_prio(&SET),
            Policy::PriorityNonPreemptive,
            &SimConfig::default(),
        );
        assert_eq!(
            blocks(&schedule),
            vec![(1, 0, 4), (2, 4, 7), (4, 7, 9), (3, 9, 10)]
        );
    }

    #[test]
    fn non_preemptive_high_number_is_high() {
        let config = SimConfig::default().with_convention(PriorityConvention::HighNumberIsHigh);
        let schedule = run(&procs_prio(&SET), Policy::PriorityNonPreemptive, &config);
        assert_eq!(
            blocks(&schedule),
            vec![(1, 0, 4), (3, 4, 5), (2, 5, 8), (4, 8, 10)]
        );
    }

    #[test]
    fn preemptive_takes_over_on_better_arrival() {
        let schedule = run(
            &procs_prio(&SET),
            Policy::PriorityPreemptive,
            &SimConfig::default(),
        );
        assert_eq!(
            blocks(&schedule),
            vec![(1, 0, 1), (2, 1, 4), (4, 4, 6), (1, 6, 9), (3, 9, 10)]
        );
        assert_eq!(schedule.context_switches(), 1);
        assert_eq!(schedule.result(1).map(|r| r.response_time), Some(0));
        assert_eq!(schedule.result(3).map(|r| r.response_time), Some(7));
    }

    #[test]
    fn starved_process_still_finishes() {
        // A long low-priority job behind a steady stream of urgent ones
        let mut spec = vec![(0, 5, 5)];
        spec.extend((0..40).map(|t| (t, 1, 1)));
        let schedule = run(
            &procs_prio(&spec),
            Policy::PriorityPreemptive,
            &SimConfig::default(),
        );
        assert_eq!(schedule.results.len(), 41);
        let starved = schedule.result(1).expect("pid 1 completes");
        assert_eq!(starved.start_time, 40);
        assert_eq!(starved.completion_time, 45);
        assert_eq!(schedule.results.last().map(|r| r.pid), Some(1));
    }
}

use super::{
    process::{Process, ProcessResult, validate},
    timeline::Timeline,
};
use crate::{
    config::{Policy, SimConfig},
    core::{
        SchedCoreEvent, SliceOutcome,
        driver::SchedCore,
        state::{Pid, TaskId, Ticks},
    },
    error::SimError,
    scheduler::{
        FcfsScheduler, LjfScheduler, LrtfScheduler, PreemptivePriorityScheduler,
        PriorityScheduler, RoundRobinScheduler, Scheduler, SjfScheduler, SrtfScheduler,
    },
};
use log::{info, trace};
use serde::Serialize;

/// Output of one run: per-process results in completion order and the Gantt
/// timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Schedule {
    pub policy: Policy,
    pub results: Vec<ProcessResult>,
    pub timeline: Timeline,
}

impl Schedule {
    pub fn result(&self, pid: Pid) -> Option<&ProcessResult> {
        self.results.iter().find(|r| r.pid == pid)
    }

    pub fn execution_order(&self) -> Vec<Pid> {
        self.timeline.execution_order()
    }

    pub fn makespan(&self) -> Ticks {
        self.timeline.end()
    }

    pub fn context_switches(&self) -> usize {
        self.timeline.context_switches()
    }
}

pub struct Sim<S: Scheduler> {
    pub core: SchedCore<S>,
    // Tasks sorted by (arrival, pid); admitted front to back
    arrivals: Vec<TaskId>,
    arrival_cursor: usize,
    completion_order: Vec<TaskId>,
    timeline: Timeline,
}

impl<S: Scheduler> Sim<S> {
    /// Build a run over `processes`. Input must already be validated.
    pub fn new(processes: &[Process], config: &SimConfig) -> Self {
        let mut core = SchedCore::<S>::new(config);
        for p in processes {
            core.ctx.create_task(p.pid, p.arrival_time, p.burst_time, p.priority);
        }

        let mut arrivals: Vec<TaskId> = (0..processes.len()).collect();
        arrivals.sort_by_key(|&task| {
            let t = core.ctx.task(task);
            (t.arrival_time, t.pid)
        });

        Self {
            core,
            arrivals,
            arrival_cursor: 0,
            completion_order: Vec::with_capacity(processes.len()),
            timeline: Timeline::new(),
        }
    }

    /// Advance the run by one slice (or one idle tick) and return the events
    /// it produced.
    pub fn step(&mut self) -> Result<Vec<SchedCoreEvent>, SimError> {
        self.handle_arrivals();
        let arrivals_pending = self.arrival_cursor < self.arrivals.len();
        let outcome = self.core.tick()?;
        // Arrivals during the slice queue up ahead of the preempted task
        self.handle_arrivals();

        match outcome {
            SliceOutcome::Idle => {
                // Idle with everything admitted means a task went missing
                if !arrivals_pending {
                    return Err(SimError::UnreachableState {
                        now: self.core.now(),
                        unfinished: self.core.ctx.unfinished(),
                    });
                }
            }
            SliceOutcome::Completed(task) => self.completion_order.push(task),
            SliceOutcome::Expired(task) => self.core.requeue_task(task),
        }

        let events = self.core.ctx.take_events();
        for event in &events {
            trace!("t={} {:?}", self.core.now(), event);
            if let SchedCoreEvent::TaskRan { task, start, end } = *event {
                self.timeline.push(self.core.ctx.task(task).pid, start, end);
            }
        }
        Ok(events)
    }

    fn handle_arrivals(&mut self) {
        let now = self.core.now();
        while let Some(&task) = self.arrivals.get(self.arrival_cursor) {
            // Contiguous, since arrivals are sorted
            if self.core.ctx.task(task).arrival_time > now {
                break;
            }
            self.core.wake_task(task);
            self.arrival_cursor += 1;
        }
    }

    pub fn all_completed(&self) -> bool {
        self.core.ctx.all_completed()
    }

    /// Step until every process has completed.
    pub fn run(mut self) -> Result<Schedule, SimError> {
        while !self.all_completed() {
            self.step()?;
        }

        let results = self
            .completion_order
            .iter()
            .map(|&task| {
                ProcessResult::from_task(self.core.ctx.task(task)).ok_or(
                    SimError::UnreachableState {
                        now: self.core.now(),
                        unfinished: self.core.ctx.unfinished(),
                    },
                )
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Schedule {
            policy: S::POLICY,
            results,
            timeline: self.timeline,
        })
    }
}

/// Simulate `processes` under `policy`. Pure: the input is never mutated and
/// identical input always yields an identical schedule.
pub fn simulate(
    processes: &[Process],
    policy: Policy,
    config: &SimConfig,
) -> Result<Schedule, SimError> {
    validate(processes, policy, config)?;
    info!("simulating {policy} over {} processes", processes.len());

    match policy {
        Policy::Fcfs => Sim::<FcfsScheduler>::new(processes, config).run(),
        Policy::Sjf => Sim::<SjfScheduler>::new(processes, config).run(),
        Policy::Srtf => Sim::<SrtfScheduler>::new(processes, config).run(),
        Policy::Ljf => Sim::<LjfScheduler>::new(processes, config).run(),
        Policy::Lrtf => Sim::<LrtfScheduler>::new(processes, config).run(),
        Policy::RoundRobin => Sim::<RoundRobinScheduler>::new(processes, config).run(),
        Policy::PriorityNonPreemptive => Sim::<PriorityScheduler>::new(processes, config).run(),
        Policy::PriorityPreemptive => {
            Sim::<PreemptivePriorityScheduler>::new(processes, config).run()
        }
    }
}

/// Run every policy over the same input. Round Robin is skipped when no
/// quantum is configured.
pub fn compare_policies(
    processes: &[Process],
    config: &SimConfig,
) -> Result<Vec<Schedule>, SimError> {
    Policy::ALL
        .into_iter()
        .filter(|&policy| policy != Policy::RoundRobin || config.time_quantum.is_some())
        .map(|policy| simulate(processes, policy, config))
        .collect()
}

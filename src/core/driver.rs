use super::{
    event::SchedCoreEvent,
    observer::Observer,
    state::{RunCtx, TaskId, Ticks},
};
use crate::{
    config::{SimConfig, Timing},
    error::SimError,
    scheduler::{DispatchError, Scheduler},
};
use log::debug;

/// What happened to the CPU during one [`SchedCore::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SliceOutcome {
    // Nothing was runnable; the clock moved one tick
    Idle,
    Completed(TaskId),
    // Slice used up with work left; the caller must requeue the task
    Expired(TaskId),
}

pub struct SchedCore<S: Scheduler> {
    pub ctx: RunCtx,
    pub scheduler: S,
    quantum: Ticks,
    observer: Observer,
}

impl<S: Scheduler> SchedCore<S> {
    pub fn new(config: &SimConfig) -> Self {
        let mut ctx = RunCtx::new();
        let scheduler = S::init(&mut ctx, config);
        Self {
            ctx,
            scheduler,
            // Validation guarantees a quantum whenever the policy needs one
            quantum: config.time_quantum.unwrap_or(1).max(1),
            observer: Observer::new(),
        }
    }

    /// Dispatch if the CPU is free, then run the current task for its whole
    /// slice in one jump.
    pub fn tick(&mut self) -> Result<SliceOutcome, SimError> {
        if self.ctx.cpu_is_idle() {
            self.try_schedule_cpu();
        }

        let Some(task_id) = self.ctx.cpu.current else {
            let now = self.ctx.now;
            debug!("t={now} cpu idle");
            self.ctx.emit(SchedCoreEvent::CpuIdle { at: now });
            self.ctx.advance_time(1);
            self.observer.observe(&self.ctx);
            return Ok(SliceOutcome::Idle);
        };

        let task = self.ctx.task(task_id);
        let slice = task
            .allocated_timeslice
            .ok_or(SimError::UnreachableState {
                now: self.ctx.now,
                unfinished: self.ctx.unfinished(),
            })?;
        let run = slice.min(task.remaining_time);
        let start = self.ctx.now;

        self.ctx.advance_time(run);
        let end = self.ctx.now;
        let task = self.ctx.task_mut(task_id);
        task.remaining_time -= run;
        let completed = task.remaining_time == 0;
        self.ctx.emit(SchedCoreEvent::TaskRan {
            task: task_id,
            start,
            end,
        });
        self.ctx.clear_cpu();

        let outcome = if completed {
            debug!("t={end} task {task_id} completed");
            self.ctx.mark_completed(task_id, end);
            SliceOutcome::Completed(task_id)
        } else {
            SliceOutcome::Expired(task_id)
        };

        self.observer.observe(&self.ctx);
        Ok(outcome)
    }

    fn try_schedule_cpu(&mut self) {
        if let Some(task) = self.ctx.dsq_pop(self.ctx.local_dsq()) {
            self.run_task(task);
            return;
        }

        if let Some(task) = self.ctx.dsq_pop(self.ctx.global_dsq()) {
            self.run_task(task);
            return;
        }

        if let Err(DispatchError::NoRunnableTask) = self.scheduler.dispatch(&mut self.ctx) {
            // Scheduler left CPU idle.
            return;
        }

        if let Some(task) = self.ctx.dsq_pop(self.ctx.local_dsq()) {
            self.run_task(task);
        }
    }

    fn run_task(&mut self, task_id: TaskId) {
        let remaining = self.ctx.task(task_id).remaining_time;
        let slice = match S::POLICY.timing() {
            Timing::RunToCompletion => remaining,
            Timing::UnitStep => 1,
            Timing::Quantum => self.quantum.min(remaining),
        };
        debug!("t={} dispatch task {task_id} for {slice}", self.ctx.now);
        self.ctx.set_running(task_id, slice);
    }

    /// A task's arrival time has been reached.
    pub fn wake_task(&mut self, task: TaskId) {
        self.ctx.mark_runnable(task);
        self.scheduler.enqueue(&mut self.ctx, task);
    }

    /// Give an expired task back to the scheduler.
    pub fn requeue_task(&mut self, task: TaskId) {
        self.ctx.mark_runnable(task);
        self.scheduler.enqueue(&mut self.ctx, task);
    }

    pub fn now(&self) -> Ticks {
        self.ctx.now
    }

    pub fn observer(&self) -> &Observer {
        &self.observer
    }
}

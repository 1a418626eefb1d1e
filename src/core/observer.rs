use super::state::{RunCtx, TaskState};

/// Checks run-state invariants after every core step. All checks are
/// `debug_assert!`s; release builds only count steps.
#[derive(Debug, Default)]
pub struct Observer {
    step: u64,
}

impl Observer {
    pub fn new() -> Self {
        Self { step: 0 }
    }

    pub fn steps(&self) -> u64 {
        self.step
    }

    pub fn observe(&mut self, ctx: &RunCtx) {
        self.step += 1;

        if let Some(task_id) = ctx.cpu.current {
            debug_assert_eq!(
                ctx.task(task_id).state,
                TaskState::Running,
                "cpu.current task {task_id} must be Running"
            );
        }

        let mut completed = 0;
        for task in &ctx.tasks {
            debug_assert!(
                task.remaining_time <= task.burst_time,
                "Task {} has {} ticks left of a {} tick burst",
                task.id,
                task.remaining_time,
                task.burst_time
            );
            if let Some(first_run) = task.first_run {
                debug_assert!(
                    first_run >= task.arrival_time,
                    "Task {} ran at {first_run} before arriving at {}",
                    task.id,
                    task.arrival_time
                );
            }
            if task.state == TaskState::Completed {
                completed += 1;
                debug_assert_eq!(task.remaining_time, 0);
                debug_assert!(
                    task.completion_time.is_some(),
                    "Completed task {} has no completion time",
                    task.id
                );
            }
        }
        debug_assert_eq!(completed, ctx.completed, "Completed count out of sync");

        for (&task_id, &dsq_id) in &ctx.task_to_dsq {
            let task = ctx.task(task_id);
            debug_assert_eq!(
                task.state,
                TaskState::Runnable,
                "Task {task_id} in DSQ {dsq_id:?} must be Runnable"
            );
            if let Some(dsq) = ctx.dsqs.get(dsq_id) {
                debug_assert!(
                    dsq.contains(task_id),
                    "task_to_dsq claims task {task_id} in DSQ {dsq_id:?}, but queue does not contain it"
                );
            } else {
                debug_assert!(false, "task_to_dsq references unknown DSQ {dsq_id:?}");
            }
        }
    }
}

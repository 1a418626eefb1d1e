use crate::core::{TaskId, TaskState, Ticks};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchedCoreEvent {
    TaskStateChange {
        task: TaskId,
        from: TaskState,
        to: TaskState,
    },
    CpuCurrentChange {
        from: Option<TaskId>,
        to: Option<TaskId>,
    },
    // Task held the CPU over [start, end)
    TaskRan {
        task: TaskId,
        start: Ticks,
        end: Ticks,
    },
    // Nothing runnable at `at`; the clock moves one tick
    CpuIdle {
        at: Ticks,
    },
}

use super::event::SchedCoreEvent;
use keyed_priority_queue::KeyedPriorityQueue;
use rustc_hash::FxHashMap;
use slotmap::{SlotMap, new_key_type};
use std::{cmp::Ordering, collections::VecDeque};

// Index into Task Vec
pub type TaskId = usize;
// User-visible process id, 1..=N
pub type Pid = u32;
pub type Ticks = u64;
new_key_type! {
    pub struct DsqId;
}

/// Dispatch order key for priority DSQs: compared lexicographically, the
/// smallest rank is dispatched first.
#[derive(PartialEq, Eq, Hash, Debug, Copy, Clone)]
pub struct Rank(pub i64, pub i64, pub i64);

// KeyedPriorityQueue is a max-heap, so we need to flip-flop Rank's Ord
impl PartialOrd for Rank {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Rank {
    fn cmp(&self, other: &Self) -> Ordering {
        (other.0, other.1, other.2).cmp(&(self.0, self.1, self.2))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    // Arrival time not reached yet
    Pending,
    Runnable,
    Running,
    Completed,
}

/// Per-run mutable state of one process.
#[derive(Debug, Clone)]
pub struct Task {
    pub id: TaskId,
    pub pid: Pid,
    pub arrival_time: Ticks,
    pub burst_time: Ticks,
    pub priority: u8,
    pub state: TaskState,
    pub remaining_time: Ticks,
    pub first_run: Option<Ticks>,
    pub completion_time: Option<Ticks>,
    pub allocated_timeslice: Option<Ticks>,
}

#[derive(Debug, Default)]
pub struct CpuState {
    pub current: Option<TaskId>,
}

#[derive(Debug)]
pub enum Dsq {
    Fifo {
        tasks: VecDeque<TaskId>,
    },
    Priq {
        tasks: KeyedPriorityQueue<TaskId, Rank>,
    },
}

impl Dsq {
    pub fn new_fifo() -> Self {
        Self::Fifo {
            tasks: VecDeque::new(),
        }
    }

    pub fn new_priq() -> Self {
        Self::Priq {
            tasks: KeyedPriorityQueue::new(),
        }
    }

    pub fn contains(&self, task_id: TaskId) -> bool {
        match self {
            Self::Fifo { tasks } => tasks.contains(&task_id),
            Self::Priq { tasks } => tasks.get_priority(&task_id).is_some(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Fifo { tasks } => tasks.len(),
            Self::Priq { tasks } => tasks.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Everything one simulation run mutates. Never shared between runs.
#[derive(Debug)]
pub struct RunCtx {
    pub now: Ticks,
    pub cpu: CpuState,
    pub tasks: Vec<Task>,
    pub dsqs: SlotMap<DsqId, Dsq>,
    pub task_to_dsq: FxHashMap<TaskId, DsqId>,
    pub global_dsq_id: DsqId,
    pub local_dsq_id: DsqId,
    pub completed: usize,
    events: Vec<SchedCoreEvent>,
}

impl Default for RunCtx {
    fn default() -> Self {
        Self::new()
    }
}

impl RunCtx {
    pub fn new() -> Self {
        let mut dsqs = SlotMap::with_capacity_and_key(2);
        let global_dsq_id = dsqs.insert(Dsq::new_fifo());
        let local_dsq_id = dsqs.insert(Dsq::new_fifo());

        Self {
            now: 0,
            cpu: CpuState::default(),
            tasks: Vec::new(),
            dsqs,
            task_to_dsq: FxHashMap::default(),
            global_dsq_id,
            local_dsq_id,
            completed: 0,
            events: Vec::new(),
        }
    }

    pub fn create_task(
        &mut self,
        pid: Pid,
        arrival_time: Ticks,
        burst_time: Ticks,
        priority: u8,
    ) -> TaskId {
        let id = self.tasks.len();
        self.tasks.push(Task {
            id,
            pid,
            arrival_time,
            burst_time,
            priority,
            state: TaskState::Pending,
            remaining_time: burst_time,
            first_run: None,
            completion_time: None,
            allocated_timeslice: None,
        });
        id
    }

    pub fn advance_time(&mut self, delta: Ticks) {
        self.now = self.now.saturating_add(delta);
    }

    pub fn create_dsq_priq(&mut self) -> DsqId {
        self.dsqs.insert(Dsq::new_priq())
    }

    fn dsq_push(&mut self, dsq_id: DsqId, task_id: TaskId, rank: Option<Rank>) {
        assert!(
            !self.task_to_dsq.contains_key(&task_id),
            "Task {task_id} already present in some DSQ"
        );
        debug_assert_eq!(
            self.task(task_id).state,
            TaskState::Runnable,
            "Task {task_id} must be Runnable when enqueued"
        );

        let dsq = self.dsqs.get_mut(dsq_id).expect("Unknown DSQ");
        match dsq {
            Dsq::Fifo { tasks } => tasks.push_back(task_id),
            Dsq::Priq { tasks } => {
                tasks.push(
                    task_id,
                    rank.expect("Attempted to push to a priority DSQ with no rank"),
                );
            }
        };

        self.task_to_dsq.insert(task_id, dsq_id);
    }

    pub fn dsq_push_fifo(&mut self, dsq_id: DsqId, task_id: TaskId) {
        self.dsq_push(dsq_id, task_id, None);
    }

    pub fn dsq_push_priq(&mut self, dsq_id: DsqId, task_id: TaskId, rank: Rank) {
        self.dsq_push(dsq_id, task_id, Some(rank));
    }

    pub fn dsq_pop(&mut self, dsq_id: DsqId) -> Option<TaskId> {
        let dsq = self.dsqs.get_mut(dsq_id)?;
        let task = match dsq {
            Dsq::Fifo { tasks } => tasks.pop_front(),
            Dsq::Priq { tasks } => tasks.pop().map(|(task, _)| task),
        }?;

        let removed = self.task_to_dsq.remove(&task);
        debug_assert!(removed.is_some(), "Task {task} missing DSQ membership");

        Some(task)
    }

    /// Move the head of `dsq_id` onto the CPU-local DSQ. Returns false if
    /// `dsq_id` was empty.
    pub fn dsq_move_to_local(&mut self, dsq_id: DsqId) -> bool {
        match self.dsq_pop(dsq_id) {
            Some(task) => {
                self.dsq_push_fifo(self.local_dsq(), task);
                true
            }
            None => false,
        }
    }

    pub fn dsq_len(&self, dsq_id: DsqId) -> usize {
        self.dsqs.get(dsq_id).map_or(0, Dsq::len)
    }

    pub fn task_in_any_dsq(&self, task_id: TaskId) -> bool {
        self.task_to_dsq.contains_key(&task_id)
    }

    pub fn task(&self, task_id: TaskId) -> &Task {
        &self.tasks[task_id]
    }

    pub fn task_mut(&mut self, task_id: TaskId) -> &mut Task {
        &mut self.tasks[task_id]
    }

    pub fn global_dsq(&self) -> DsqId {
        self.global_dsq_id
    }

    pub fn local_dsq(&self) -> DsqId {
        self.local_dsq_id
    }

    pub fn cpu_is_idle(&self) -> bool {
        self.cpu.current.is_none()
    }

    pub fn all_completed(&self) -> bool {
        self.completed == self.tasks.len()
    }

    pub fn unfinished(&self) -> usize {
        self.tasks.len() - self.completed
    }

    fn set_state(&mut self, task_id: TaskId, to: TaskState) {
        let task = self.task_mut(task_id);
        let from = task.state;
        task.state = to;
        self.emit(SchedCoreEvent::TaskStateChange {
            task: task_id,
            from,
            to,
        });
    }

    pub fn mark_runnable(&mut self, task_id: TaskId) {
        debug_assert!(
            self.task(task_id).state != TaskState::Completed,
            "Completed task {task_id} cannot be runnable"
        );
        self.set_state(task_id, TaskState::Runnable);
    }

    pub fn mark_completed(&mut self, task_id: TaskId, completion_time: Ticks) {
        debug_assert!(
            !self.task_to_dsq.contains_key(&task_id),
            "Completing task {task_id} that is still enqueued"
        );
        debug_assert!(
            self.task(task_id).state == TaskState::Running,
            "Task {task_id} must have been running before marked complete"
        );

        self.set_state(task_id, TaskState::Completed);
        let task = self.task_mut(task_id);
        task.remaining_time = 0;
        task.allocated_timeslice = None;
        task.completion_time = Some(completion_time);
        self.completed += 1;
    }

    /// Put `task_id` on the CPU with `slice` ticks to run. The first call
    /// for a task records its response point.
    pub fn set_running(&mut self, task_id: TaskId, slice: Ticks) {
        debug_assert!(
            !self.task_to_dsq.contains_key(&task_id),
            "Running task {task_id} must not be enqueued"
        );
        debug_assert!(self.cpu.current.is_none(), "CPU already running a task");

        let now = self.now;
        let task = self.task_mut(task_id);
        task.allocated_timeslice = Some(slice);
        task.first_run.get_or_insert(now);

        self.set_state(task_id, TaskState::Running);
        self.cpu.current = Some(task_id);
        self.emit(SchedCoreEvent::CpuCurrentChange {
            from: None,
            to: Some(task_id),
        });
    }

    pub fn clear_cpu(&mut self) {
        let from = self.cpu.current.take();
        if from.is_some() {
            self.emit(SchedCoreEvent::CpuCurrentChange { from, to: None });
        }
    }

    pub fn emit(&mut self, event: SchedCoreEvent) {
        self.events.push(event);
    }

    pub fn take_events(&mut self) -> Vec<SchedCoreEvent> {
        std::mem::take(&mut self.events)
    }
}

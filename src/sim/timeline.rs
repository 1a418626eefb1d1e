use crate::core::{Pid, Ticks};
use rustc_hash::FxHashSet;
use serde::{Serialize, Serializer, ser::SerializeStruct};

/// A contiguous interval during which one process held the CPU.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GanttBlock {
    pub pid: Pid,
    pub start: Ticks,
    pub end: Ticks,
}

impl GanttBlock {
    pub fn duration(&self) -> Ticks {
        self.end - self.start
    }
}

// Derived duration is written out next to start and end
impl Serialize for GanttBlock {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut block = serializer.serialize_struct("GanttBlock", 4)?;
        block.serialize_field("pid", &self.pid)?;
        block.serialize_field("start", &self.start)?;
        block.serialize_field("end", &self.end)?;
        block.serialize_field("duration", &self.duration())?;
        block.end()
    }
}

/// Append-only Gantt sequence. Gaps between blocks are idle CPU time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Timeline {
    blocks: Vec<GanttBlock>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `pid` ran over `[start, end)`. A run that directly
    /// continues the previous block of the same pid extends it.
    pub fn push(&mut self, pid: Pid, start: Ticks, end: Ticks) {
        debug_assert!(end > start, "empty run for pid {pid} at {start}");
        if let Some(last) = self.blocks.last_mut() {
            debug_assert!(last.end <= start, "run for pid {pid} overlaps previous block");
            if last.pid == pid && last.end == start {
                last.end = end;
                return;
            }
        }
        self.blocks.push(GanttBlock { pid, start, end });
    }

    pub fn blocks(&self) -> &[GanttBlock] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// End of the last block, i.e. the schedule length.
    pub fn end(&self) -> Ticks {
        self.blocks.last().map_or(0, |b| b.end)
    }

    pub fn busy_time(&self) -> Ticks {
        self.blocks.iter().map(GanttBlock::duration).sum()
    }

    pub fn idle_time(&self) -> Ticks {
        self.end() - self.busy_time()
    }

    /// Total CPU time handed to `pid` across all of its blocks.
    pub fn allocated(&self, pid: Pid) -> Ticks {
        self.blocks
            .iter()
            .filter(|b| b.pid == pid)
            .map(GanttBlock::duration)
            .sum()
    }

    /// Every block beyond the first one per process is a resumption after
    /// preemption.
    pub fn context_switches(&self) -> usize {
        let distinct: FxHashSet<Pid> = self.blocks.iter().map(|b| b.pid).collect();
        self.blocks.len() - distinct.len()
    }

    pub fn execution_order(&self) -> Vec<Pid> {
        self.blocks.iter().map(|b| b.pid).collect()
    }
}

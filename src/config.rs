use crate::core::Ticks;
use serde::{Deserialize, Serialize};
use std::{fmt, ops::RangeInclusive};

pub const DEFAULT_PRIORITY_RANGE: RangeInclusive<u8> = 1..=5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Policy {
    Fcfs,
    Sjf,
    Srtf,
    Ljf,
    Lrtf,
    RoundRobin,
    PriorityNonPreemptive,
    PriorityPreemptive,
}

/// How long a dispatched task holds the CPU before the core asks the
/// scheduler again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timing {
    /// Slice is the task's whole remaining time.
    RunToCompletion,
    /// Slice is a single tick; selection is re-evaluated every tick.
    UnitStep,
    /// Slice is `min(quantum, remaining)`.
    Quantum,
}

impl Policy {
    pub const ALL: [Policy; 8] = [
        Policy::Fcfs,
        Policy::Sjf,
        Policy::Srtf,
        Policy::Ljf,
        Policy::Lrtf,
        Policy::RoundRobin,
        Policy::PriorityNonPreemptive,
        Policy::PriorityPreemptive,
    ];

    pub fn timing(&self) -> Timing {
        match self {
            Policy::Fcfs | Policy::Sjf | Policy::Ljf | Policy::PriorityNonPreemptive => {
                Timing::RunToCompletion
            }
            Policy::Srtf | Policy::Lrtf | Policy::PriorityPreemptive => Timing::UnitStep,
            Policy::RoundRobin => Timing::Quantum,
        }
    }

    pub fn is_preemptive(&self) -> bool {
        self.timing() != Timing::RunToCompletion
    }

    pub fn uses_priority(&self) -> bool {
        matches!(
            self,
            Policy::PriorityNonPreemptive | Policy::PriorityPreemptive
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            Policy::Fcfs => "FCFS",
            Policy::Sjf => "SJF",
            Policy::Srtf => "SRTF",
            Policy::Ljf => "LJF",
            Policy::Lrtf => "LRTF",
            Policy::RoundRobin => "Round Robin",
            Policy::PriorityNonPreemptive => "Priority (non-preemptive)",
            Policy::PriorityPreemptive => "Priority (preemptive)",
        }
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which end of the priority range wins. Run-wide, never per process.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriorityConvention {
    #[default]
    LowNumberIsHigh,
    HighNumberIsHigh,
}

impl PriorityConvention {
    /// Map a priority onto an ascending rank: the smaller rank runs first.
    pub fn rank(&self, priority: u8) -> i64 {
        match self {
            PriorityConvention::LowNumberIsHigh => i64::from(priority),
            PriorityConvention::HighNumberIsHigh => -i64::from(priority),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimConfig {
    /// Required by Round Robin, ignored otherwise.
    pub time_quantum: Option<Ticks>,
    pub priority_convention: PriorityConvention,
    pub priority_range: RangeInclusive<u8>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            time_quantum: None,
            priority_convention: PriorityConvention::default(),
            priority_range: DEFAULT_PRIORITY_RANGE,
        }
    }
}

impl SimConfig {
    pub fn with_quantum(mut self, quantum: Ticks) -> Self {
        self.time_quantum = Some(quantum);
        self
    }

    pub fn with_convention(mut self, convention: PriorityConvention) -> Self {
        self.priority_convention = convention;
        self
    }

    pub fn with_priority_range(mut self, range: RangeInclusive<u8>) -> Self {
        self.priority_range = range;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timing_classes() {
        assert_eq!(Policy::Fcfs.timing(), Timing::RunToCompletion);
        assert_eq!(Policy::PriorityNonPreemptive.timing(), Timing::RunToCompletion);
        assert_eq!(Policy::Srtf.timing(), Timing::UnitStep);
        assert_eq!(Policy::PriorityPreemptive.timing(), Timing::UnitStep);
        assert_eq!(Policy::RoundRobin.timing(), Timing::Quantum);
        assert_eq!(
            Policy::ALL.iter().filter(|p| p.is_preemptive()).count(),
            4
        );
    }

    #[test]
    fn convention_ranks() {
        let low = PriorityConvention::LowNumberIsHigh;
        let high = PriorityConvention::HighNumberIsHigh;
        assert!(low.rank(1) < low.rank(5));
        assert!(high.rank(5) < high.rank(1));
    }
}

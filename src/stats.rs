use crate::sim::Schedule;
use average::{Estimate, Mean};
use serde::Serialize;

/// Aggregate figures derived from a finished [`Schedule`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stats {
    pub avg_waiting_time: f64,
    pub avg_turnaround_time: f64,
    pub avg_response_time: f64,
    /// Processes completed per tick: `N / max(completion_time)`.
    pub throughput: f64,
    pub context_switches: usize,
    pub busy_time: u64,
    pub idle_time: u64,
    /// Busy share of the whole schedule, 0.0..=1.0.
    pub cpu_utilization: f64,
}

impl Stats {
    pub fn from_schedule(schedule: &Schedule) -> Self {
        let results = &schedule.results;
        let last_completion = results
            .iter()
            .map(|r| r.completion_time)
            .max()
            .unwrap_or(0);
        let busy_time = schedule.timeline.busy_time();
        let makespan = schedule.makespan();

        Self {
            avg_waiting_time: avg(results.iter().map(|r| r.waiting_time as f64)),
            avg_turnaround_time: avg(results.iter().map(|r| r.turnaround_time as f64)),
            avg_response_time: avg(results.iter().map(|r| r.response_time as f64)),
            throughput: ratio(results.len() as f64, last_completion as f64),
            context_switches: schedule.context_switches(),
            busy_time,
            idle_time: schedule.timeline.idle_time(),
            cpu_utilization: ratio(busy_time as f64, makespan as f64),
        }
    }
}

impl From<&Schedule> for Stats {
    fn from(schedule: &Schedule) -> Self {
        Self::from_schedule(schedule)
    }
}

fn avg(iter: impl Iterator<Item = f64>) -> f64 {
    let mean = iter.collect::<Mean>();
    if mean.is_empty() { 0.0 } else { mean.estimate() }
}

fn ratio(num: f64, den: f64) -> f64 {
    if den == 0.0 { 0.0 } else { num / den }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Policy, Process, SimConfig, simulate};

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn fcfs_figures() {
        let input = [Process::new(1, 0, 5, 1), Process::new(2, 1, 3, 1)];
        let schedule = simulate(&input, Policy::Fcfs, &SimConfig::default()).expect("valid");
        let stats = Stats::from(&schedule);
        assert!(close(stats.avg_waiting_time, 2.0));
        assert!(close(stats.avg_turnaround_time, 6.0));
        assert!(close(stats.avg_response_time, 2.0));
        assert!(close(stats.throughput, 0.25));
        assert_eq!(stats.context_switches, 0);
        assert!(close(stats.cpu_utilization, 1.0));
    }

    #[test]
    fn idle_time_lowers_utilization() {
        let input = [Process::new(1, 2, 3, 1), Process::new(2, 10, 1, 1)];
        let schedule = simulate(&input, Policy::Fcfs, &SimConfig::default()).expect("valid");
        let stats = Stats::from_schedule(&schedule);
        assert_eq!(stats.busy_time, 4);
        // Leading idle ticks before the first arrival count too
        assert_eq!(stats.idle_time, 7);
        assert!(close(stats.cpu_utilization, 4.0 / 11.0));
        assert!(close(stats.throughput, 2.0 / 11.0));
    }

    #[test]
    fn srtf_textbook_average_wait() {
        let input = [
            Process::new(1, 0, 8, 1),
            Process::new(2, 1, 4, 1),
            Process::new(3, 2, 9, 1),
            Process::new(4, 3, 5, 1),
        ];
        let schedule = simulate(&input, Policy::Srtf, &SimConfig::default()).expect("valid");
        let stats = Stats::from_schedule(&schedule);
        assert!(close(stats.avg_waiting_time, 6.5));
        assert!(close(stats.avg_response_time, 4.25));
        assert_eq!(stats.context_switches, 1);
    }
}

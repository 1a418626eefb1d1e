use super::process::Process;
use crate::core::{Pid, Ticks};
use rand::prelude::*;

/// Shape of a generated workload: one Bernoulli trial per tick decides
/// whether a process arrives, a second one whether it is short or long.
#[derive(Debug, Clone)]
pub struct BernoulliParams {
    pub ticks: Ticks,
    pub p_arrival: f64,
    pub p_short: f64,
    pub short_ticks: Ticks,
    pub long_ticks: Ticks,
    pub max_priority: u8,
    pub max_processes: usize,
}

impl Default for BernoulliParams {
    fn default() -> Self {
        Self {
            ticks: 20,
            p_arrival: 0.4,
            p_short: 0.5,
            short_ticks: 2,
            long_ticks: 7,
            max_priority: 5,
            max_processes: 10,
        }
    }
}

pub fn bernoulli_workload(params: &BernoulliParams, seed: u64) -> Vec<Process> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut processes = Vec::new();

    for t in 0..params.ticks {
        if processes.len() >= params.max_processes {
            break;
        }
        if rng.random::<f64>() < params.p_arrival {
            let burst_time = if rng.random::<f64>() < params.p_short {
                params.short_ticks
            } else {
                params.long_ticks
            };

            processes.push(Process {
                pid: processes.len() as Pid + 1,
                arrival_time: t,
                burst_time: burst_time.max(1),
                priority: rng.random_range(1..=params.max_priority.max(1)),
            });
        }
    }

    // Never hand back an empty workload
    if processes.is_empty() {
        processes.push(Process::new(1, 0, params.long_ticks.max(1), 1));
    }

    processes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_workload() {
        let params = BernoulliParams::default();
        assert_eq!(bernoulli_workload(&params, 7), bernoulli_workload(&params, 7));
    }

    #[test]
    fn respects_bounds() {
        let params = BernoulliParams {
            ticks: 200,
            p_arrival: 0.9,
            max_processes: 8,
            ..BernoulliParams::default()
        };
        let workload = bernoulli_workload(&params, 3);
        assert!(workload.len() <= 8);
        for (i, p) in workload.iter().enumerate() {
            assert_eq!(p.pid as usize, i + 1);
            assert!(p.burst_time == 2 || p.burst_time == 7);
            assert!((1..=5).contains(&p.priority));
        }
    }

    #[test]
    fn never_empty() {
        let params = BernoulliParams {
            p_arrival: 0.0,
            ..BernoulliParams::default()
        };
        assert_eq!(bernoulli_workload(&params, 1).len(), 1);
    }
}

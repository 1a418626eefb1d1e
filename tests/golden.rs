use cpusim::{Policy, Process, PriorityConvention, Schedule, SimConfig, Stats, simulate};

fn procs(spec: &[(u64, u64, u8)]) -> Vec<Process> {
    spec.iter()
        .zip(1..)
        .map(|(&(arrival, burst, prio), pid)| Process::new(pid, arrival, burst, prio))
        .collect()
}

fn blocks(schedule: &Schedule) -> Vec<(u32, u64, u64)> {
    schedule
        .timeline
        .blocks()
        .iter()
        .map(|b| (b.pid, b.start, b.end))
        .collect()
}

#[test]
fn fcfs_two_processes() {
    let schedule = simulate(
        &procs(&[(0, 5, 1), (1, 3, 1)]),
        Policy::Fcfs,
        &SimConfig::default(),
    )
    .unwrap();
    let p1 = schedule.result(1).unwrap();
    let p2 = schedule.result(2).unwrap();
    assert_eq!((p1.completion_time, p1.waiting_time), (5, 0));
    assert_eq!((p2.completion_time, p2.waiting_time), (8, 4));
}

#[test]
fn srtf_textbook_instance() {
    let schedule = simulate(
        &procs(&[(0, 8, 1), (1, 4, 1), (2, 9, 1), (3, 5, 1)]),
        Policy::Srtf,
        &SimConfig::default(),
    )
    .unwrap();
    assert_eq!(blocks(&schedule)[0], (1, 0, 1));
    assert_eq!(blocks(&schedule)[1], (2, 1, 5));
    let stats = Stats::from_schedule(&schedule);
    assert!((stats.avg_waiting_time - 6.5).abs() < 1e-9);
    let order: Vec<_> = schedule.results.iter().map(|r| r.pid).collect();
    assert_eq!(order, vec![2, 4, 1, 3]);
}

#[test]
fn round_robin_quantum_two() {
    let input = procs(&[(0, 5, 1), (1, 3, 1)]);
    let schedule = simulate(
        &input,
        Policy::RoundRobin,
        &SimConfig::default().with_quantum(2),
    )
    .unwrap();
    assert_eq!(blocks(&schedule)[0], (1, 0, 2));
    assert_eq!(blocks(&schedule)[1], (2, 2, 4));
    for p in &input {
        assert_eq!(schedule.timeline.allocated(p.pid), p.burst_time);
    }
}

#[test]
fn priority_conventions_mirror_each_other() {
    let low = procs(&[(0, 3, 1), (0, 3, 5)]);
    let high = procs(&[(0, 3, 5), (0, 3, 1)]);
    for policy in [Policy::PriorityNonPreemptive, Policy::PriorityPreemptive] {
        let a = simulate(&low, policy, &SimConfig::default()).unwrap();
        let b = simulate(
            &high,
            policy,
            &SimConfig::default().with_convention(PriorityConvention::HighNumberIsHigh),
        )
        .unwrap();
        assert_eq!(blocks(&a), blocks(&b));
        assert_eq!(a.execution_order(), vec![1, 2]);
    }
}

#[test]
fn json_report_shape() {
    let schedule = simulate(
        &procs(&[(0, 2, 1)]),
        Policy::Fcfs,
        &SimConfig::default(),
    )
    .unwrap();
    let value = serde_json::to_value(&schedule).unwrap();
    assert_eq!(value["policy"], "Fcfs");
    assert_eq!(value["results"][0]["completion_time"], 2);
    assert_eq!(value["timeline"]["blocks"][0]["end"], 2);
    assert_eq!(value["timeline"]["blocks"][0]["duration"], 2);
}

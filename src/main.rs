use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, ValueEnum};
use cpusim::{
    Policy, PriorityConvention, Process, Schedule, SimConfig, Stats,
    sim::{BernoulliParams, ProcessEntry, bernoulli_workload, compare_policies, number_entries},
    simulate,
};
use log::info;
use serde::Serialize;
use std::{fs, path::PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PolicyOpt {
    Fcfs,
    Sjf,
    Srtf,
    Ljf,
    Lrtf,
    Rr,
    /// Non-preemptive priority
    Npp,
    /// Preemptive priority
    Pp,
    /// Every policy over the same workload
    All,
}

impl PolicyOpt {
    fn policy(self) -> Option<Policy> {
        match self {
            PolicyOpt::Fcfs => Some(Policy::Fcfs),
            PolicyOpt::Sjf => Some(Policy::Sjf),
            PolicyOpt::Srtf => Some(Policy::Srtf),
            PolicyOpt::Ljf => Some(Policy::Ljf),
            PolicyOpt::Lrtf => Some(Policy::Lrtf),
            PolicyOpt::Rr => Some(Policy::RoundRobin),
            PolicyOpt::Npp => Some(Policy::PriorityNonPreemptive),
            PolicyOpt::Pp => Some(Policy::PriorityPreemptive),
            PolicyOpt::All => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ConventionOpt {
    /// 1 is the highest priority
    Low,
    /// 5 is the highest priority
    High,
}

/// cpusim: simulate classical CPU scheduling policies over a static set of
/// CPU-bound processes and report the Gantt timeline and statistics.
#[derive(Debug, Parser)]
struct Opts {
    /// Scheduling policy.
    #[clap(long, value_enum, default_value = "fcfs")]
    policy: PolicyOpt,

    /// Round Robin time quantum in ticks.
    #[clap(short = 'q', long, env = "CPUSIM_QUANTUM")]
    quantum: Option<u64>,

    /// Which end of the priority range wins.
    #[clap(long, value_enum, default_value = "low")]
    priority_convention: ConventionOpt,

    /// Process as ARRIVAL:BURST[:PRIORITY]. Repeat for more processes; ids
    /// are assigned 1..N in the order given.
    #[clap(short = 'p', long = "process", value_parser = parse_entry)]
    processes: Vec<ProcessEntry>,

    /// JSON file holding an array of {arrival_time, burst_time, priority}.
    #[clap(short = 'w', long, conflicts_with = "processes")]
    workload: Option<PathBuf>,

    /// Generate N random processes instead of reading them.
    #[clap(long, conflicts_with_all = ["processes", "workload"])]
    random: Option<usize>,

    /// Seed for --random.
    #[clap(long, default_value = "0")]
    seed: u64,

    /// Print results as JSON instead of tables.
    #[clap(long, action = clap::ArgAction::SetTrue)]
    json: bool,

    /// Enable verbose output. Specify multiple times to increase verbosity.
    #[clap(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn parse_entry(s: &str) -> Result<ProcessEntry> {
    let fields: Vec<&str> = s.split(':').collect();
    if !(2..=3).contains(&fields.len()) {
        bail!("expected ARRIVAL:BURST[:PRIORITY], got {s:?}");
    }
    let arrival_time = fields[0]
        .trim()
        .parse()
        .with_context(|| format!("invalid arrival time in {s:?}"))?;
    let burst_time = fields[1]
        .trim()
        .parse()
        .with_context(|| format!("invalid burst time in {s:?}"))?;
    let priority = match fields.get(2) {
        Some(p) => p
            .trim()
            .parse()
            .with_context(|| format!("invalid priority in {s:?}"))?,
        None => 1,
    };
    Ok(ProcessEntry {
        arrival_time,
        burst_time,
        priority,
    })
}

fn load_workload(opts: &Opts) -> Result<Vec<Process>> {
    if let Some(count) = opts.random {
        let params = BernoulliParams {
            ticks: (count as u64).saturating_mul(3),
            max_processes: count,
            ..BernoulliParams::default()
        };
        return Ok(bernoulli_workload(&params, opts.seed));
    }

    if let Some(path) = &opts.workload {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read workload {}", path.display()))?;
        let entries: Vec<ProcessEntry> = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse workload {}", path.display()))?;
        return Ok(number_entries(entries));
    }

    if opts.processes.is_empty() {
        return Err(anyhow!(
            "no processes given; use --process, --workload or --random"
        ));
    }
    Ok(number_entries(opts.processes.iter().copied()))
}

#[derive(Serialize)]
struct Report<'a> {
    schedule: &'a Schedule,
    stats: Stats,
}

fn print_schedule(schedule: &Schedule) {
    let stats = Stats::from_schedule(schedule);

    println!("== {} ==", schedule.policy);
    println!(
        "{:>4} {:>7} {:>5} {:>4} {:>5} {:>10} {:>10} {:>7} {:>8}",
        "pid", "arrival", "burst", "prio", "start", "completion", "turnaround", "waiting", "response"
    );
    for r in &schedule.results {
        println!(
            "{:>4} {:>7} {:>5} {:>4} {:>5} {:>10} {:>10} {:>7} {:>8}",
            format!("P{}", r.pid),
            r.arrival_time,
            r.burst_time,
            r.priority,
            r.start_time,
            r.completion_time,
            r.turnaround_time,
            r.waiting_time,
            r.response_time
        );
    }

    let gantt: Vec<String> = schedule
        .timeline
        .blocks()
        .iter()
        .map(|b| format!("[{}-{} P{}]", b.start, b.end, b.pid))
        .collect();
    println!("Gantt: {}", gantt.join(" "));
    println!(
        "Avg waiting {:.2} | avg turnaround {:.2} | avg response {:.2}",
        stats.avg_waiting_time, stats.avg_turnaround_time, stats.avg_response_time
    );
    println!(
        "Throughput {:.2} processes/tick | context switches {} | CPU utilization {:.1}%",
        stats.throughput,
        stats.context_switches,
        stats.cpu_utilization * 100.0
    );
    println!();
}

fn main() -> Result<()> {
    let opts = Opts::parse();

    let llv = match opts.verbose {
        0 => simplelog::LevelFilter::Info,
        1 => simplelog::LevelFilter::Debug,
        _ => simplelog::LevelFilter::Trace,
    };
    let mut lcfg = simplelog::ConfigBuilder::new();
    lcfg.set_time_level(simplelog::LevelFilter::Error)
        .set_location_level(simplelog::LevelFilter::Off)
        .set_target_level(simplelog::LevelFilter::Off)
        .set_thread_level(simplelog::LevelFilter::Off);
    simplelog::TermLogger::init(
        llv,
        lcfg.build(),
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Auto,
    )?;

    let processes = load_workload(&opts)?;
    info!("loaded {} processes", processes.len());

    let mut config = SimConfig::default().with_convention(match opts.priority_convention {
        ConventionOpt::Low => PriorityConvention::LowNumberIsHigh,
        ConventionOpt::High => PriorityConvention::HighNumberIsHigh,
    });
    if let Some(quantum) = opts.quantum {
        config = config.with_quantum(quantum);
    }

    let schedules = match opts.policy.policy() {
        Some(policy) => vec![simulate(&processes, policy, &config)?],
        None => compare_policies(&processes, &config)?,
    };

    if opts.json {
        let reports: Vec<Report> = schedules
            .iter()
            .map(|schedule| Report {
                schedule,
                stats: Stats::from_schedule(schedule),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for schedule in &schedules {
            print_schedule(schedule);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(args: &[&str]) -> Opts {
        Opts::try_parse_from(std::iter::once("cpusim").chain(args.iter().copied())).unwrap()
    }

    fn write_workload(name: &str, text: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("cpusim-{}-{name}.json", std::process::id()));
        fs::write(&path, text).unwrap();
        path
    }

    #[test]
    fn entry_priority_is_optional() {
        let entry = parse_entry("2:5").unwrap();
        assert_eq!((entry.arrival_time, entry.burst_time, entry.priority), (2, 5, 1));
        let entry = parse_entry(" 0 : 3 : 4 ").unwrap();
        assert_eq!((entry.arrival_time, entry.burst_time, entry.priority), (0, 3, 4));
    }

    #[test]
    fn malformed_entries_are_rejected() {
        for bad in ["", "4", "1:2:3:4", "a:2", "1:b", "1:2:high", "-1:3", "1:-3", "1:2:300"] {
            assert!(parse_entry(bad).is_err(), "{bad:?} should not parse");
        }
    }

    #[test]
    fn process_flags_are_numbered_in_order() {
        let processes = load_workload(&opts(&["-p", "3:2", "-p", "0:4:2"])).unwrap();
        assert_eq!(
            processes,
            vec![Process::new(1, 3, 2, 1), Process::new(2, 0, 4, 2)]
        );
    }

    #[test]
    fn no_input_is_an_error() {
        assert!(load_workload(&opts(&[])).is_err());
    }

    #[test]
    fn random_workload_honors_seed() {
        let a = load_workload(&opts(&["--random", "5", "--seed", "7"])).unwrap();
        let b = load_workload(&opts(&["--random", "5", "--seed", "7"])).unwrap();
        assert!(!a.is_empty() && a.len() <= 5);
        assert_eq!(a, b);
    }

    #[test]
    fn workload_file_is_read() {
        let path = write_workload(
            "ok",
            r#"[{"arrival_time": 0, "burst_time": 3}, {"arrival_time": 1, "burst_time": 2, "priority": 3}]"#,
        );
        let processes = load_workload(&opts(&["-w", path.to_str().unwrap()])).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(
            processes,
            vec![Process::new(1, 0, 3, 1), Process::new(2, 1, 2, 3)]
        );
    }

    #[test]
    fn negative_workload_value_fails_to_parse() {
        let path = write_workload("neg", r#"[{"arrival_time": -1, "burst_time": 3}]"#);
        let result = load_workload(&opts(&["-w", path.to_str().unwrap()]));
        fs::remove_file(&path).unwrap();
        assert!(result.is_err());
    }

    #[test]
    fn missing_workload_file_fails() {
        let path = std::env::temp_dir().join("cpusim-does-not-exist.json");
        assert!(load_workload(&opts(&["-w", path.to_str().unwrap()])).is_err());
    }
}

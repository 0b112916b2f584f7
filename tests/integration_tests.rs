//! Tests de integración para el simulador de planificación de CPU

use std::io::Write;
use std::num::NonZeroU32;

use cpu_scheduler_sim::{
    config, ArrivalMode, ProcessLoader, ProcessSpec, SchedulingAlgorithm, Simulation,
    StatisticsReporter,
};

fn round_robin(quantum: u32) -> SchedulingAlgorithm {
    SchedulingAlgorithm::round_robin(NonZeroU32::new(quantum).unwrap())
}

fn all_algorithms() -> Vec<SchedulingAlgorithm> {
    vec![
        SchedulingAlgorithm::fcfs(),
        SchedulingAlgorithm::sjf(),
        round_robin(1),
        round_robin(2),
        round_robin(4),
    ]
}

fn mixed_workload() -> Vec<ProcessSpec> {
    vec![
        ProcessSpec::new(1, 0, 7),
        ProcessSpec::new(2, 2, 4),
        ProcessSpec::new(3, 4, 1),
        ProcessSpec::new(4, 5, 4),
        ProcessSpec::new(5, 5, 0),
        ProcessSpec::new(6, 20, 3),
    ]
}

#[test]
fn test_every_algorithm_completes_with_consistent_timers() {
    for algorithm in all_algorithms() {
        let mut simulation = Simulation::new(mixed_workload()).unwrap();
        let outcome = simulation.run(algorithm).unwrap();

        // Un evento por cada tick de CPU consumido
        let total_burst: u64 = mixed_workload().iter().map(|p| p.burst_time).sum();
        assert_eq!(outcome.events.len() as u64, total_burst, "{}", algorithm);
        assert_eq!(outcome.total_ticks, total_burst + outcome.idle_ticks);

        for process in simulation.table().iter() {
            assert_eq!(process.remaining_burst(), 0);
            assert_eq!(
                process.turnaround_time(),
                process.wait_time() + process.burst_time(),
                "{}: P{}",
                algorithm,
                process.id()
            );
            assert!(process.turnaround_time() >= process.wait_time());
        }
    }
}

#[test]
fn test_at_most_one_process_per_tick() {
    for algorithm in all_algorithms() {
        let mut simulation = Simulation::new(mixed_workload()).unwrap();
        let outcome = simulation.run(algorithm).unwrap();
        let ticks: Vec<u64> = outcome.events.iter().map(|e| e.tick).collect();
        let mut sorted = ticks.clone();
        sorted.dedup();
        assert_eq!(ticks, sorted, "{}", algorithm);
    }
}

#[test]
fn test_reset_and_rerun_is_identical() {
    let mut simulation = Simulation::new(mixed_workload()).unwrap();
    let reporter = StatisticsReporter::new();

    for algorithm in all_algorithms() {
        let first = simulation.run(algorithm).unwrap();
        let first_csv = reporter.generate_csv_report(&simulation.report().unwrap());

        simulation.reset();
        let second = simulation.run(algorithm).unwrap();
        let second_csv = reporter.generate_csv_report(&simulation.report().unwrap());

        assert_eq!(first, second);
        assert_eq!(first_csv, second_csv);
    }
}

#[test]
fn test_sjf_minimizes_average_wait() {
    let mut simulation = Simulation::new(mixed_workload()).unwrap();

    simulation.run(SchedulingAlgorithm::fcfs()).unwrap();
    let fcfs = simulation.report().unwrap();
    simulation.run(SchedulingAlgorithm::sjf()).unwrap();
    let sjf = simulation.report().unwrap();

    assert!(sjf.average_wait_time.unwrap() <= fcfs.average_wait_time.unwrap());
}

#[test]
fn test_large_quantum_behaves_like_fcfs() {
    let specs = vec![
        ProcessSpec::new(1, 0, 3),
        ProcessSpec::new(2, 1, 2),
        ProcessSpec::new(3, 2, 4),
    ];
    let mut simulation = Simulation::new(specs).unwrap();

    let fcfs = simulation.run(SchedulingAlgorithm::fcfs()).unwrap();
    let rr = simulation.run(round_robin(100)).unwrap();

    let order = |o: &cpu_scheduler_sim::RunOutcome| -> Vec<(u64, u32)> {
        o.events.iter().map(|e| (e.tick, e.process_id)).collect()
    };
    assert_eq!(order(&fcfs), order(&rr));
}

#[test]
fn test_empty_input_yields_empty_report() {
    let specs = ProcessLoader::new().parse_str("").unwrap();
    let mut simulation = Simulation::new(specs).unwrap();
    for algorithm in all_algorithms() {
        let outcome = simulation.run(algorithm).unwrap();
        assert!(outcome.events.is_empty());

        let report = simulation.report().unwrap();
        assert!(report.processes.is_empty());
        assert_eq!(report.average_wait_time, None);
        assert_eq!(report.average_turnaround_time, None);
    }
}

#[test]
fn test_end_to_end_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "Process,Burst,Arrival").unwrap();
    writeln!(file, "P1,5,1").unwrap();
    writeln!(file, "P2,3,2").unwrap();

    let specs = ProcessLoader::new().load_file(file.path()).unwrap();
    let mut simulation = Simulation::new(specs).unwrap();
    let outcome = simulation.run(SchedulingAlgorithm::fcfs()).unwrap();

    let trace: Vec<String> = outcome.events.iter().map(config::format_tick_line).collect();
    assert_eq!(trace.len(), 8);
    assert_eq!(trace[0], "T1 : P1 - Ráfaga restante 4, Espera 0, Turnaround 1");
    assert_eq!(trace[7], "T8 : P2 - Ráfaga restante 0, Espera 4, Turnaround 7");

    let report = simulation.report().unwrap();
    let text = StatisticsReporter::new().generate_report(&report);
    assert!(text.contains("Tiempo promedio de espera: 2.0"));
    assert!(text.contains("Tiempo promedio de turnaround: 6.0"));
}

#[test]
fn test_arrival_from_id_compatibility() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "P0,3").unwrap();
    writeln!(file, "P1,2").unwrap();
    writeln!(file, "P2,1").unwrap();

    let specs = ProcessLoader::new()
        .with_arrival_mode(ArrivalMode::FromId)
        .load_file(file.path())
        .unwrap();
    let mut simulation = Simulation::new(specs).unwrap();
    simulation.run(SchedulingAlgorithm::fcfs()).unwrap();

    let report = simulation.report().unwrap();
    let waits: Vec<u64> = report.processes.iter().map(|p| p.wait_time).collect();
    // P0 corre 0-2, P1 llega en 1 y corre 3-4, P2 llega en 2 y corre en 5
    assert_eq!(waits, vec![0, 2, 3]);
}

//! Ejemplo básico de uso del simulador de planificación de CPU

use cpu_scheduler_sim::{
    config, ProcessSpec, SchedulingAlgorithm, Simulation, SimulationReport, StatisticsReporter,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Ejemplo: Uso Básico del Simulador ===\n");

    let workload = vec![
        ProcessSpec::new(1, 0, 8),
        ProcessSpec::new(2, 1, 4),
        ProcessSpec::new(3, 2, 9),
        ProcessSpec::new(4, 3, 5),
    ];
    let mut simulation = Simulation::new(workload)?;
    let reporter = StatisticsReporter::new();

    let algorithms = [
        SchedulingAlgorithm::fcfs(),
        SchedulingAlgorithm::sjf(),
        SchedulingAlgorithm::round_robin(config::DEFAULT_QUANTUM),
    ];

    let mut results: Vec<(SchedulingAlgorithm, SimulationReport)> = Vec::new();
    for (i, algorithm) in algorithms.iter().enumerate() {
        println!("{}. Ejecutando simulación con {}...", i + 1, algorithm.description());
        let outcome = simulation.run(*algorithm)?;
        for event in outcome.events.iter().take(5) {
            println!("   {}", config::format_tick_line(event));
        }
        println!("   ... ({} ticks en total)", outcome.total_ticks);

        let report = simulation.report()?;
        println!("{}", reporter.generate_report(&report));
        results.push((*algorithm, report));
    }

    // Comparación de resultados
    println!("\n=== Comparación de Algoritmos ===");
    println!("| Algoritmo        | Espera promedio | Turnaround promedio |");
    println!("|------------------|-----------------|---------------------|");
    for (algorithm, report) in &results {
        println!(
            "| {:<16} | {:>15} | {:>19} |",
            algorithm.to_string(),
            StatisticsReporter::format_average(report.average_wait_time),
            StatisticsReporter::format_average(report.average_turnaround_time)
        );
    }

    Ok(())
}

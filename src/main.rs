//! Línea de comandos del simulador de planificación de CPU.
//!
//! ```text
//! cpu-scheduler -f procesos.txt
//! cpu-scheduler -s procesos.txt --format csv
//! cpu-scheduler -r 2 procesos.txt --arrival-from-id
//! ```

use std::num::NonZeroU32;
use std::path::PathBuf;

use clap::{ArgGroup, Parser, ValueEnum};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use cpu_scheduler_sim::{
    config, ArrivalMode, ConfigError, ProcessLoader, RunOutcome, SchedulingAlgorithm, Simulation,
    SimulationConfig, SimulationReport, StatisticsReporter,
};

#[derive(Parser)]
#[command(name = "cpu-scheduler")]
#[command(about = "Simulador de planificación de CPU (FCFS, SJF y Round Robin)")]
#[command(version)]
#[command(group(
    ArgGroup::new("algorithm")
        .required(true)
        .args(["fcfs", "sjf", "round_robin"])
))]
struct Cli {
    /// First-Come First-Served
    #[arg(short = 'f', long)]
    fcfs: bool,

    /// Shortest Job First (preemptivo, por ráfaga restante)
    #[arg(short = 's', long)]
    sjf: bool,

    /// Round Robin con el quantum indicado (en ticks)
    #[arg(
        short = 'r',
        long = "round-robin",
        value_name = "QUANTUM",
        allow_negative_numbers = true,
        value_parser = parse_quantum
    )]
    round_robin: Option<NonZeroU32>,

    /// Archivo de procesos (una línea `P<id>,<ráfaga>[,<llegada>]` por proceso)
    input: PathBuf,

    /// Usa el identificador del proceso como tiempo de llegada
    #[arg(long)]
    arrival_from_id: bool,

    /// Formato del reporte final
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// No imprime la traza tick a tick
    #[arg(short, long)]
    quiet: bool,

    /// Aborta la simulación si supera esta cantidad de ticks
    #[arg(long)]
    tick_limit: Option<u64>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Csv,
    Json,
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    outcome: &'a RunOutcome,
    report: &'a SimulationReport,
}

fn parse_quantum(s: &str) -> Result<NonZeroU32, String> {
    let value: i64 = s
        .trim()
        .parse()
        .map_err(|_| format!("Quantum inválido: {}", s))?;
    SchedulingAlgorithm::round_robin_checked(value)
        .map_err(|e| e.to_string())?
        .quantum()
        .ok_or_else(|| ConfigError::MissingQuantum.to_string())
}

impl Cli {
    fn algorithm(&self) -> SchedulingAlgorithm {
        match (self.fcfs, self.sjf, self.round_robin) {
            (true, _, _) => SchedulingAlgorithm::fcfs(),
            (_, true, _) => SchedulingAlgorithm::sjf(),
            (_, _, Some(quantum)) => SchedulingAlgorithm::round_robin(quantum),
            // el grupo `algorithm` exige uno de los tres
            (false, false, None) => SchedulingAlgorithm::fcfs(),
        }
    }

    fn arrival_mode(&self) -> ArrivalMode {
        if self.arrival_from_id {
            ArrivalMode::FromId
        } else {
            ArrivalMode::Explicit
        }
    }
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", message);
    std::process::exit(1);
}

fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let algorithm = cli.algorithm();
    let specs = ProcessLoader::new()
        .with_arrival_mode(cli.arrival_mode())
        .load_file(&cli.input)
        .unwrap_or_else(|e| fail(e));

    let mut simulation = Simulation::new(specs).unwrap_or_else(|e| fail(e));
    let mut sim_config = SimulationConfig::new(algorithm);
    if let Some(limit) = cli.tick_limit {
        sim_config = sim_config.with_tick_limit(limit);
    }

    let print_ticks = cli.format == OutputFormat::Text && !cli.quiet;
    if print_ticks {
        println!("{}", algorithm.description());
    }

    let outcome = simulation
        .run_observed(&sim_config, |event| {
            if print_ticks {
                println!("{}", config::format_tick_line(event));
            }
        })
        .unwrap_or_else(|e| fail(e));

    let reporter = StatisticsReporter::new();
    let report = simulation.report().unwrap_or_else(|e| fail(e));

    match cli.format {
        OutputFormat::Text => print!("{}", reporter.generate_report(&report)),
        OutputFormat::Csv => print!("{}", reporter.generate_csv_report(&report)),
        OutputFormat::Json => {
            let output = JsonOutput {
                outcome: &outcome,
                report: &report,
            };
            let json = serde_json::to_string_pretty(&output).unwrap_or_else(|e| fail(e));
            println!("{}", json);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_quantum() {
        assert_eq!(parse_quantum("3"), Ok(NonZeroU32::new(3).unwrap()));
        assert!(parse_quantum("0").is_err());
        assert!(parse_quantum("-2").is_err());
        assert!(parse_quantum("dos").is_err());
    }

    #[test]
    fn test_cli_algorithm_selection() {
        let cli = Cli::try_parse_from(["cpu-scheduler", "-r", "2", "procesos.txt"]).unwrap();
        assert_eq!(
            cli.algorithm(),
            SchedulingAlgorithm::round_robin(NonZeroU32::new(2).unwrap())
        );

        let cli = Cli::try_parse_from(["cpu-scheduler", "-s", "procesos.txt"]).unwrap();
        assert_eq!(cli.algorithm(), SchedulingAlgorithm::sjf());
        assert_eq!(cli.arrival_mode(), ArrivalMode::Explicit);
    }

    #[test]
    fn test_cli_rejects_invalid_configuration() {
        // Sin algoritmo
        assert!(Cli::try_parse_from(["cpu-scheduler", "procesos.txt"]).is_err());
        // Dos algoritmos a la vez
        assert!(Cli::try_parse_from(["cpu-scheduler", "-f", "-s", "procesos.txt"]).is_err());
        // Quantum no positivo
        assert!(Cli::try_parse_from(["cpu-scheduler", "-r", "0", "procesos.txt"]).is_err());
        assert!(Cli::try_parse_from(["cpu-scheduler", "-r", "-1", "procesos.txt"]).is_err());
        // Round Robin sin quantum
        assert!(Cli::try_parse_from(["cpu-scheduler", "-r"]).is_err());
    }
}

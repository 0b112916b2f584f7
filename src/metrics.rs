//! # Módulo de Métricas y Reportes
//!
//! Este módulo calcula las estadísticas finales de espera y turnaround a
//! partir del estado de la tabla al terminar una corrida, y genera los
//! reportes en texto, CSV y JSON.

use serde::Serialize;

use crate::error::SimulationError;
use crate::process::{ProcessState, ProcessTable, Tick};

/// Métricas finales de un proceso.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessStatistics {
    pub process_id: u32,
    pub arrival_time: Tick,
    pub burst_time: Tick,
    /// Ticks que el proceso estuvo elegible sin ocupar la CPU
    pub wait_time: Tick,
    /// `wait_time + burst_time`
    pub turnaround_time: Tick,
    /// Tick en el que el proceso terminó su ráfaga
    pub completion_time: Tick,
}

/// Métricas agregadas de una corrida.
///
/// Con cero procesos los promedios y el throughput quedan en `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationReport {
    /// Métricas individuales en orden de carga
    pub processes: Vec<ProcessStatistics>,
    pub average_wait_time: Option<f64>,
    pub average_turnaround_time: Option<f64>,
    /// Orden de finalización: primero los de ráfaga 0, luego por tick de
    /// finalización
    pub completion_order: Vec<u32>,
    /// Tick en el que terminó el último proceso que ocupó la CPU
    pub makespan: Tick,
    /// Procesos completados por tick
    pub throughput: Option<f64>,
}

/// Calculadora de estadísticas y generador de reportes.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatisticsReporter;

impl StatisticsReporter {
    /// Crea un generador de reportes.
    pub fn new() -> Self {
        Self
    }

    /// Calcula las métricas finales de un proceso.
    ///
    /// # Returns
    ///
    /// `None` si el proceso todavía no terminó su ráfaga.
    pub fn process_statistics(&self, process: &ProcessState) -> Option<ProcessStatistics> {
        if !process.is_complete() {
            return None;
        }

        let turnaround_time = process.wait_time() + process.burst_time();
        debug_assert_eq!(
            turnaround_time,
            process.turnaround_time(),
            "turnaround acumulado inconsistente para P{}",
            process.id()
        );

        Some(ProcessStatistics {
            process_id: process.id(),
            arrival_time: process.arrival_time(),
            burst_time: process.burst_time(),
            wait_time: process.wait_time(),
            turnaround_time,
            completion_time: process.completion_time()?,
        })
    }

    /// Calcula el reporte completo sobre una tabla ya simulada.
    ///
    /// # Errors
    ///
    /// `SimulationError::IncompleteProcess` si algún proceso no terminó.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cpu_scheduler_sim::{ProcessTable, StatisticsReporter};
    ///
    /// let report = StatisticsReporter::new()
    ///     .summarize(&ProcessTable::default())
    ///     .unwrap();
    /// assert!(report.processes.is_empty());
    /// assert_eq!(report.average_wait_time, None);
    /// ```
    pub fn summarize(&self, table: &ProcessTable) -> Result<SimulationReport, SimulationError> {
        let processes = table
            .iter()
            .map(|p| {
                self.process_statistics(p)
                    .ok_or(SimulationError::IncompleteProcess(p.id()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let count = processes.len();
        let (average_wait_time, average_turnaround_time) = if count > 0 {
            let total_wait: Tick = processes.iter().map(|p| p.wait_time).sum();
            let total_turnaround: Tick = processes.iter().map(|p| p.turnaround_time).sum();
            (
                Some(total_wait as f64 / count as f64),
                Some(total_turnaround as f64 / count as f64),
            )
        } else {
            (None, None)
        };

        // Los procesos con ráfaga 0 terminan al cargarse: van primero, en
        // orden de carga, y no extienden el makespan.
        let mut order: Vec<(Tick, usize, u32)> = processes
            .iter()
            .enumerate()
            .map(|(index, p)| (executed_completion(p), index, p.process_id))
            .collect();
        order.sort_unstable();
        let completion_order = order.into_iter().map(|(_, _, id)| id).collect();

        let makespan = processes.iter().map(executed_completion).max().unwrap_or(0);
        let throughput = if makespan > 0 {
            Some(count as f64 / makespan as f64)
        } else {
            None
        };

        Ok(SimulationReport {
            processes,
            average_wait_time,
            average_turnaround_time,
            completion_order,
            makespan,
            throughput,
        })
    }

    /// Genera el reporte de texto con las métricas por proceso y los
    /// promedios.
    pub fn generate_report(&self, report: &SimulationReport) -> String {
        let mut out = String::new();

        out.push_str("\n=== REPORTE DE RESULTADOS ===\n\n");
        if report.processes.is_empty() {
            out.push_str("No hay procesos que reportar.\n");
            return out;
        }

        out.push_str(&format!(
            "{:^8} {:^10} {:^10} {:^10} {:^12} {:^12}\n",
            "Proceso", "Llegada", "Ráfaga", "Espera", "Turnaround", "Fin"
        ));
        out.push_str(&format!("{}\n", "-".repeat(67)));

        for p in &report.processes {
            out.push_str(&format!(
                "{:^8} {:^10} {:^10} {:^10} {:^12} {:^12}\n",
                format!("P{}", p.process_id),
                p.arrival_time,
                p.burst_time,
                p.wait_time,
                p.turnaround_time,
                p.completion_time,
            ));
        }

        out.push_str("\n=== ESTADÍSTICAS RESUMIDAS ===\n");
        out.push_str(&format!("Procesos completados: {}\n", report.processes.len()));
        out.push_str(&format!(
            "Tiempo promedio de espera: {}\n",
            Self::format_average(report.average_wait_time)
        ));
        out.push_str(&format!(
            "Tiempo promedio de turnaround: {}\n",
            Self::format_average(report.average_turnaround_time)
        ));
        out.push_str(&format!("Makespan: {} ticks\n", report.makespan));
        if let Some(throughput) = report.throughput {
            out.push_str(&format!("Throughput: {:.3} procesos/tick\n", throughput));
        }
        out.push_str(&format!(
            "Orden de finalización: {:?}\n",
            report.completion_order
        ));

        out
    }

    /// Genera las métricas por proceso en formato CSV.
    pub fn generate_csv_report(&self, report: &SimulationReport) -> String {
        let mut csv = String::from("ProcessID,Arrival,Burst,Wait,Turnaround,Completion\n");
        for p in &report.processes {
            csv.push_str(&format!(
                "{},{},{},{},{},{}\n",
                p.process_id,
                p.arrival_time,
                p.burst_time,
                p.wait_time,
                p.turnaround_time,
                p.completion_time
            ));
        }
        csv
    }

    /// Serializa el reporte completo como JSON.
    pub fn generate_json_report(&self, report: &SimulationReport) -> serde_json::Result<String> {
        serde_json::to_string_pretty(report)
    }

    /// Formatea un promedio con un decimal, o `N/A` si no hay procesos.
    pub fn format_average(average: Option<f64>) -> String {
        match average {
            Some(value) => format!("{:.1}", value),
            None => "N/A".to_string(),
        }
    }
}

/// Tick de finalización de un proceso que ocupó la CPU; 0 para los de
/// ráfaga 0.
fn executed_completion(stats: &ProcessStatistics) -> Tick {
    if stats.burst_time == 0 {
        0
    } else {
        stats.completion_time
    }
}

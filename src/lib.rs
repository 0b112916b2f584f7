//! # Simulador de Planificación de CPU
//!
//! Esta biblioteca simula la planificación de procesos en una CPU bajo tres
//! algoritmos: FCFS (First-Come First-Served), SJF (Shortest Job First,
//! recalculado en cada tick) y Round Robin con quantum fijo. El reloj
//! simulado avanza de a un tick y, al terminar, se reportan los tiempos de
//! espera y turnaround por proceso y en promedio.
//!
//! No ejecuta cargas reales: solo modela sus tiempos.
//!
//! ## Estructura del proyecto
//!
//! - `process`: Estado de cada proceso y la tabla que los agrupa
//! - `ready_queue`: Cola circular de listos usada por Round Robin
//! - `scheduler`: Algoritmos y sus políticas de selección por tick
//! - `simulation`: Ciclo de ticks compartido por los tres algoritmos
//! - `metrics`: Cálculo y reporte de estadísticas
//! - `loader`: Lectura del archivo de procesos
//! - `error`: Tipos de error

pub mod error;
pub mod loader;
pub mod metrics;
pub mod process;
pub mod ready_queue;
pub mod scheduler;
pub mod simulation;

// Re-exportar las estructuras principales para facilitar su uso
pub use error::{ConfigError, LoadError, SimulationError};
pub use loader::{ArrivalMode, ProcessLoader};
pub use metrics::{ProcessStatistics, SimulationReport, StatisticsReporter};
pub use process::{ProcessHandle, ProcessSpec, ProcessState, ProcessTable, Tick};
pub use ready_queue::ReadyQueue;
pub use scheduler::SchedulingAlgorithm;
pub use simulation::{RunOutcome, Simulation, SimulationConfig, TickEvent};

/// Configuración por defecto del simulador
pub mod config {
    use std::num::NonZeroU32;

    use crate::simulation::TickEvent;

    /// Quantum por defecto para Round Robin (en ticks)
    pub const DEFAULT_QUANTUM: NonZeroU32 = match NonZeroU32::new(2) {
        Some(quantum) => quantum,
        None => panic!("el quantum por defecto debe ser positivo"),
    };

    /// Formatea un evento de tick como una línea de la traza de ejecución.
    ///
    /// ```rust
    /// use cpu_scheduler_sim::{config, TickEvent};
    ///
    /// let event = TickEvent {
    ///     tick: 3,
    ///     process_id: 2,
    ///     remaining_burst: 1,
    ///     wait_time: 0,
    ///     turnaround_time: 2,
    /// };
    /// assert_eq!(
    ///     config::format_tick_line(&event),
    ///     "T3 : P2 - Ráfaga restante 1, Espera 0, Turnaround 2"
    /// );
    /// ```
    pub fn format_tick_line(event: &TickEvent) -> String {
        format!(
            "T{} : P{} - Ráfaga restante {}, Espera {}, Turnaround {}",
            event.tick,
            event.process_id,
            event.remaining_burst,
            event.wait_time,
            event.turnaround_time
        )
    }
}

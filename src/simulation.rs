//! # Módulo de Simulación Principal
//!
//! Este módulo contiene el ciclo de ticks compartido por los tres
//! algoritmos. En cada tick:
//!
//! 1. La política del algoritmo elige a lo sumo un proceso.
//! 2. Si hay proceso elegido, se ejecuta durante el tick: su ráfaga
//!    restante baja en uno y se cobra el tick a todos los procesos
//!    elegibles (turnaround para todos, espera para los que no corren).
//! 3. El reloj avanza en uno, haya habido ejecución o no.
//!
//! El ciclo termina cuando todos los procesos completaron su ráfaga.
//!
//! La [`Simulation`] es dueña de su tabla de procesos y la modifica a
//! través de `&mut self`, así que no puede observarse desde fuera mientras
//! corre. Simulaciones independientes pueden correr en hilos distintos.

use serde::Serialize;

use crate::error::SimulationError;
use crate::metrics::{SimulationReport, StatisticsReporter};
use crate::process::{ProcessSpec, ProcessTable, Tick};
use crate::scheduler::{SchedulingAlgorithm, Selector};

/// Configuración de una corrida.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SimulationConfig {
    /// Algoritmo de planificación
    pub algorithm: SchedulingAlgorithm,
    /// Máximo de ticks permitidos antes de abortar la corrida
    pub tick_limit: Option<Tick>,
}

impl SimulationConfig {
    /// Crea una configuración sin límite de ticks.
    ///
    /// # Arguments
    ///
    /// * `algorithm` - Algoritmo con el que se correrá la simulación
    pub fn new(algorithm: SchedulingAlgorithm) -> Self {
        Self {
            algorithm,
            tick_limit: None,
        }
    }

    /// Fija un límite de ticks para la corrida.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cpu_scheduler_sim::{SchedulingAlgorithm, SimulationConfig};
    ///
    /// let config = SimulationConfig::new(SchedulingAlgorithm::sjf()).with_tick_limit(100);
    /// assert_eq!(config.tick_limit, Some(100));
    /// ```
    pub fn with_tick_limit(mut self, limit: Tick) -> Self {
        self.tick_limit = Some(limit);
        self
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self::new(SchedulingAlgorithm::fcfs())
    }
}

/// Evento emitido por cada tick en el que un proceso ocupa la CPU.
///
/// Los valores corresponden al estado del proceso al terminar el tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TickEvent {
    pub tick: Tick,
    pub process_id: u32,
    pub remaining_burst: Tick,
    pub wait_time: Tick,
    pub turnaround_time: Tick,
}

/// Resultado de una corrida completa.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunOutcome {
    pub algorithm: SchedulingAlgorithm,
    /// Eventos en orden de tick
    pub events: Vec<TickEvent>,
    /// Identificadores en el orden en que terminaron su ráfaga
    pub completion_order: Vec<u32>,
    /// Ticks transcurridos hasta que todos terminaron
    pub total_ticks: Tick,
    /// Ticks sin ningún proceso en CPU
    pub idle_ticks: Tick,
}

/// Contexto de simulación: tabla de procesos y reloj.
#[derive(Debug, Clone)]
pub struct Simulation {
    table: ProcessTable,
    clock: Tick,
    reporter: StatisticsReporter,
}

impl Simulation {
    /// Crea una simulación a partir de los descriptores cargados.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cpu_scheduler_sim::{ProcessSpec, SchedulingAlgorithm, Simulation};
    ///
    /// let mut simulation = Simulation::new(vec![
    ///     ProcessSpec::new(1, 0, 8),
    ///     ProcessSpec::new(2, 3, 2),
    /// ]).unwrap();
    /// let outcome = simulation.run(SchedulingAlgorithm::sjf()).unwrap();
    /// assert_eq!(outcome.completion_order, vec![2, 1]);
    /// ```
    pub fn new<I>(specs: I) -> Result<Self, SimulationError>
    where
        I: IntoIterator<Item = ProcessSpec>,
    {
        Ok(Self::from_table(ProcessTable::new(specs)?))
    }

    /// Crea una simulación sobre una tabla ya construida.
    ///
    /// La tabla se restaura al iniciar cada corrida.
    pub fn from_table(table: ProcessTable) -> Self {
        Self {
            table,
            clock: 0,
            reporter: StatisticsReporter::new(),
        }
    }

    /// Tabla de procesos con el estado de la última corrida.
    pub fn table(&self) -> &ProcessTable {
        &self.table
    }

    /// Tick actual del reloj (el total de ticks tras una corrida).
    pub fn clock(&self) -> Tick {
        self.clock
    }

    /// Restaura la tabla y el reloj para volver a simular la misma entrada.
    pub fn reset(&mut self) {
        self.table.reset_all();
        self.clock = 0;
    }

    /// Ejecuta el algoritmo hasta que todos los procesos terminen.
    pub fn run(&mut self, algorithm: SchedulingAlgorithm) -> Result<RunOutcome, SimulationError> {
        self.run_with(&SimulationConfig::new(algorithm))
    }

    /// Igual que [`Simulation::run`], pero con límite de ticks opcional.
    ///
    /// # Errors
    ///
    /// `SimulationError::TickLimitExceeded` si la corrida supera el límite.
    pub fn run_with(&mut self, config: &SimulationConfig) -> Result<RunOutcome, SimulationError> {
        self.run_observed(config, |_| {})
    }

    /// Ejecuta la simulación entregando cada evento a `observer` apenas
    /// ocurre.
    ///
    /// La tabla se restaura antes de empezar, de modo que correr dos veces
    /// sobre la misma entrada produce exactamente los mismos eventos.
    ///
    /// # Errors
    ///
    /// `SimulationError::TickLimitExceeded` si hay un límite configurado y
    /// el reloj lo alcanza con procesos pendientes.
    pub fn run_observed<F>(
        &mut self,
        config: &SimulationConfig,
        mut observer: F,
    ) -> Result<RunOutcome, SimulationError>
    where
        F: FnMut(&TickEvent),
    {
        self.reset();
        let mut selector = Selector::new(config.algorithm, &self.table);
        let mut events = Vec::new();
        // Los de ráfaga 0 ya terminaron al cargarse
        let mut completion_order: Vec<u32> = self
            .table
            .iter()
            .filter(|p| p.burst_time() == 0)
            .map(|p| p.id())
            .collect();
        let mut idle_ticks: Tick = 0;

        tracing::info!(
            algorithm = %config.algorithm,
            processes = self.table.len(),
            "Iniciando simulación"
        );

        while !self.table.all_complete() {
            if let Some(limit) = config.tick_limit {
                if self.clock >= limit {
                    return Err(SimulationError::TickLimitExceeded {
                        limit,
                        pending: self.table.pending(),
                    });
                }
            }

            let tick = self.clock;
            match selector.select(&mut self.table, tick) {
                Some(handle) => {
                    self.table.execute(handle, tick);
                    selector.after_execute(&self.table, handle);

                    let process = self.table.state(handle);
                    let event = TickEvent {
                        tick,
                        process_id: process.id(),
                        remaining_burst: process.remaining_burst(),
                        wait_time: process.wait_time(),
                        turnaround_time: process.turnaround_time(),
                    };
                    tracing::debug!(
                        tick,
                        process = event.process_id,
                        remaining = event.remaining_burst,
                        "Tick ejecutado"
                    );
                    if process.is_complete() {
                        completion_order.push(process.id());
                    }
                    observer(&event);
                    events.push(event);
                }
                None => {
                    tracing::trace!(tick, "Tick ocioso");
                    idle_ticks += 1;
                }
            }
            self.clock += 1;
        }

        tracing::info!(
            algorithm = %config.algorithm,
            total_ticks = self.clock,
            idle_ticks,
            "Simulación completada"
        );

        Ok(RunOutcome {
            algorithm: config.algorithm,
            events,
            completion_order,
            total_ticks: self.clock,
            idle_ticks,
        })
    }

    /// Genera el reporte de estadísticas sobre el estado final de la tabla.
    pub fn report(&self) -> Result<SimulationReport, SimulationError> {
        self.reporter.summarize(&self.table)
    }
}

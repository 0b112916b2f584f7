//! # Módulo de Procesos
//!
//! Este módulo define los procesos que atraviesan la simulación: el
//! descriptor que entrega el cargador, el estado mutable de cada proceso
//! y la tabla que los agrupa.
//!
//! La tabla es dueña de todos los estados. La cola de listos y los
//! algoritmos solo guardan [`ProcessHandle`]s (índices en la tabla).

use std::collections::HashSet;

use serde::Serialize;

use crate::error::SimulationError;

/// Unidad discreta de tiempo simulado.
pub type Tick = u64;

/// Descriptor de un proceso tal como lo entrega el cargador.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProcessSpec {
    /// Identificador único del proceso
    pub id: u32,
    /// Tick en el que el proceso pasa a ser elegible
    pub arrival_time: Tick,
    /// Ticks de CPU que requiere el proceso
    pub burst_time: Tick,
}

impl ProcessSpec {
    /// Crea un nuevo descriptor.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cpu_scheduler_sim::ProcessSpec;
    ///
    /// let spec = ProcessSpec::new(1, 0, 5);
    /// assert_eq!(spec.burst_time, 5);
    /// ```
    pub fn new(id: u32, arrival_time: Tick, burst_time: Tick) -> Self {
        Self {
            id,
            arrival_time,
            burst_time,
        }
    }
}

/// Referencia a un proceso dentro de una [`ProcessTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
///
/// Solo la tabla crea handles (ver [`ProcessTable::handles`]).
pub struct ProcessHandle(usize);

/// Estado de simulación de un proceso.
///
/// Se crea con `remaining_burst = burst_time` y los temporizadores en cero.
/// Los algoritmos lo modifican tick a tick hasta que `remaining_burst`
/// llega a cero; a partir de ese momento ya no cambia.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessState {
    id: u32,
    arrival_time: Tick,
    burst_time: Tick,
    remaining_burst: Tick,
    wait_time: Tick,
    turnaround_time: Tick,
    completion_time: Option<Tick>,
    in_queue: bool,
}

impl ProcessState {
    /// Crea el estado inicial a partir de un descriptor.
    ///
    /// Un proceso con ráfaga cero queda completado en su tick de llegada.
    pub fn new(spec: ProcessSpec) -> Self {
        let mut state = Self {
            id: spec.id,
            arrival_time: spec.arrival_time,
            burst_time: spec.burst_time,
            remaining_burst: 0,
            wait_time: 0,
            turnaround_time: 0,
            completion_time: None,
            in_queue: false,
        };
        state.reset();
        state
    }

    /// Identificador del proceso.
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Tick en el que el proceso pasa a ser elegible.
    pub fn arrival_time(&self) -> Tick {
        self.arrival_time
    }

    /// Ráfaga total requerida, en ticks.
    pub fn burst_time(&self) -> Tick {
        self.burst_time
    }

    /// Ticks de CPU que todavía le faltan al proceso.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cpu_scheduler_sim::{ProcessSpec, ProcessState};
    ///
    /// let state = ProcessState::new(ProcessSpec::new(1, 0, 4));
    /// assert_eq!(state.remaining_burst(), 4);
    /// ```
    pub fn remaining_burst(&self) -> Tick {
        self.remaining_burst
    }

    /// Ticks acumulados en los que el proceso estuvo elegible sin ocupar
    /// la CPU.
    pub fn wait_time(&self) -> Tick {
        self.wait_time
    }

    /// Ticks acumulados desde que el proceso llegó.
    ///
    /// # Returns
    ///
    /// Al terminar la corrida vale `wait_time() + burst_time()`.
    pub fn turnaround_time(&self) -> Tick {
        self.turnaround_time
    }

    /// Tick en el que terminó el proceso (`None` si sigue pendiente).
    pub fn completion_time(&self) -> Option<Tick> {
        self.completion_time
    }

    /// Indica si el proceso está actualmente en la cola de listos.
    pub fn in_queue(&self) -> bool {
        self.in_queue
    }

    /// `true` cuando la ráfaga restante llegó a cero.
    pub fn is_complete(&self) -> bool {
        self.remaining_burst == 0
    }

    /// Un proceso es elegible en `tick` si ya llegó y no ha terminado.
    pub fn is_eligible(&self, tick: Tick) -> bool {
        self.arrival_time <= tick && self.remaining_burst > 0
    }

    /// Restaura el estado inicial del proceso.
    pub fn reset(&mut self) {
        self.remaining_burst = self.burst_time;
        self.wait_time = 0;
        self.turnaround_time = 0;
        self.in_queue = false;
        self.completion_time = if self.burst_time == 0 {
            Some(self.arrival_time)
        } else {
            None
        };
    }

    pub(crate) fn set_in_queue(&mut self, in_queue: bool) {
        self.in_queue = in_queue;
    }

    /// Consume un tick de CPU. El llamador garantiza que el proceso es elegible.
    fn run_one_tick(&mut self, tick: Tick) {
        debug_assert!(self.remaining_burst > 0, "P{} ya había terminado", self.id);
        self.remaining_burst -= 1;
        if self.remaining_burst == 0 {
            self.completion_time = Some(tick + 1);
        }
    }
}

/// Tabla de procesos de una simulación.
///
/// Conserva el orden de carga, que es el orden estable usado por los
/// recorridos de FCFS y SJF.
#[derive(Debug, Clone, Default)]
pub struct ProcessTable {
    processes: Vec<ProcessState>,
}

impl ProcessTable {
    /// Construye la tabla validando que los identificadores sean únicos.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cpu_scheduler_sim::{ProcessSpec, ProcessTable};
    ///
    /// let table = ProcessTable::new(vec![
    ///     ProcessSpec::new(1, 0, 3),
    ///     ProcessSpec::new(2, 1, 2),
    /// ]).unwrap();
    /// assert_eq!(table.len(), 2);
    /// assert!(!table.all_complete());
    /// ```
    pub fn new<I>(specs: I) -> Result<Self, SimulationError>
    where
        I: IntoIterator<Item = ProcessSpec>,
    {
        let mut seen = HashSet::new();
        let mut processes = Vec::new();
        for spec in specs {
            if !seen.insert(spec.id) {
                return Err(SimulationError::DuplicateProcessId(spec.id));
            }
            processes.push(ProcessState::new(spec));
        }
        Ok(Self { processes })
    }

    /// Cantidad de procesos cargados.
    pub fn len(&self) -> usize {
        self.processes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }

    /// Obtiene el estado de un proceso.
    ///
    /// # Arguments
    ///
    /// * `handle` - Handle obtenido de esta misma tabla
    ///
    /// # Returns
    ///
    /// `None` si el handle no corresponde a ningún proceso de la tabla
    /// (por ejemplo, si proviene de otra tabla más grande).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cpu_scheduler_sim::{ProcessSpec, ProcessTable};
    ///
    /// let table = ProcessTable::new(vec![ProcessSpec::new(7, 0, 3)]).unwrap();
    /// let handle = table.handles().next().unwrap();
    /// assert_eq!(table.get(handle).map(|p| p.id()), Some(7));
    /// ```
    pub fn get(&self, handle: ProcessHandle) -> Option<&ProcessState> {
        self.processes.get(handle.0)
    }

    /// Acceso interno para handles que la propia tabla entregó al selector.
    pub(crate) fn state(&self, handle: ProcessHandle) -> &ProcessState {
        &self.processes[handle.0]
    }

    pub(crate) fn get_mut(&mut self, handle: ProcessHandle) -> Option<&mut ProcessState> {
        self.processes.get_mut(handle.0)
    }

    /// Busca un proceso por su identificador.
    pub fn find(&self, id: u32) -> Option<&ProcessState> {
        self.processes.iter().find(|p| p.id == id)
    }

    /// Recorre los procesos en orden de carga.
    pub fn iter(&self) -> impl Iterator<Item = &ProcessState> {
        self.processes.iter()
    }

    /// Handles de todos los procesos, en orden de carga.
    pub fn handles(&self) -> impl Iterator<Item = ProcessHandle> {
        (0..self.processes.len()).map(ProcessHandle)
    }

    /// Restaura todos los procesos a su estado inicial.
    pub fn reset_all(&mut self) {
        for process in &mut self.processes {
            process.reset();
        }
    }

    /// `true` si todos los procesos terminaron. Una tabla vacía está completa.
    pub fn all_complete(&self) -> bool {
        self.processes.iter().all(ProcessState::is_complete)
    }

    /// Cantidad de procesos que aún no terminan.
    pub fn pending(&self) -> usize {
        self.processes.iter().filter(|p| !p.is_complete()).count()
    }

    /// Primer proceso elegible en orden de carga.
    pub fn first_eligible(&self, tick: Tick) -> Option<ProcessHandle> {
        self.processes
            .iter()
            .position(|p| p.is_eligible(tick))
            .map(ProcessHandle)
    }

    /// Proceso elegible con menor ráfaga restante; los empates los gana
    /// el primero en orden de carga.
    pub fn shortest_remaining(&self, tick: Tick) -> Option<ProcessHandle> {
        let mut shortest: Option<(usize, Tick)> = None;
        for (index, process) in self.processes.iter().enumerate() {
            if !process.is_eligible(tick) {
                continue;
            }
            match shortest {
                Some((_, best)) if process.remaining_burst >= best => {}
                _ => shortest = Some((index, process.remaining_burst)),
            }
        }
        shortest.map(|(index, _)| ProcessHandle(index))
    }

    /// Procesos cuyo tiempo de llegada es exactamente `tick`.
    pub fn arrivals_at(&self, tick: Tick) -> impl Iterator<Item = ProcessHandle> + '_ {
        self.processes
            .iter()
            .enumerate()
            .filter(move |(_, p)| p.arrival_time == tick)
            .map(|(index, _)| ProcessHandle(index))
    }

    /// Ejecuta `running` durante `tick` y cobra el tick a todos los elegibles.
    ///
    /// La elegibilidad se evalúa al inicio del tick: el proceso en ejecución
    /// suma turnaround (también en su último tick) y los demás elegibles
    /// suman espera y turnaround.
    pub(crate) fn execute(&mut self, running: ProcessHandle, tick: Tick) {
        for (index, process) in self.processes.iter_mut().enumerate() {
            if !process.is_eligible(tick) {
                continue;
            }
            if index != running.0 {
                process.wait_time += 1;
            }
            process.turnaround_time += 1;
        }
        self.processes[running.0].run_one_tick(tick);
    }
}

//! # Módulo de Algoritmos de Planificación
//!
//! Este módulo define los algoritmos disponibles y la política de selección
//! que cada uno aplica en cada tick. Los tres comparten el mismo ciclo de
//! simulación (ver [`crate::simulation`]); lo único que cambia entre ellos
//! es cómo eligen el proceso que ocupa la CPU.

use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;

use serde::Serialize;

use crate::error::ConfigError;
use crate::process::{ProcessHandle, ProcessTable, Tick};
use crate::ready_queue::ReadyQueue;

/// Algoritmos de planificación disponibles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum SchedulingAlgorithm {
    /// First-Come First-Served: en cada tick se elige el primer proceso
    /// elegible en orden de carga.
    ///
    /// Como ese proceso sigue primero hasta terminar, nunca es desplazado.
    Fcfs,

    /// Shortest Job First recalculado en cada tick.
    ///
    /// Compara la ráfaga *restante*, por lo que en la práctica es
    /// Shortest-Remaining-Time-First: un proceso corto que llega desplaza
    /// de inmediato al que está en ejecución. Los empates los gana el
    /// proceso cargado primero.
    Sjf,

    /// Round Robin: cada proceso recibe a lo sumo `quantum` ticks seguidos
    /// antes de volver al final de la cola de listos.
    RoundRobin {
        /// Máximo de ticks consecutivos por turno
        quantum: NonZeroU32,
    },
}

impl SchedulingAlgorithm {
    /// Crea un algoritmo First-Come First-Served.
    pub fn fcfs() -> Self {
        Self::Fcfs
    }

    /// Crea un algoritmo Shortest Job First preemptivo.
    pub fn sjf() -> Self {
        Self::Sjf
    }

    /// Crea un algoritmo Round Robin con el quantum especificado.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use std::num::NonZeroU32;
    /// use cpu_scheduler_sim::SchedulingAlgorithm;
    ///
    /// let quantum = NonZeroU32::new(2).unwrap();
    /// let algorithm = SchedulingAlgorithm::round_robin(quantum);
    /// assert_eq!(algorithm.quantum(), Some(quantum));
    /// ```
    pub fn round_robin(quantum: NonZeroU32) -> Self {
        Self::RoundRobin { quantum }
    }

    /// Crea un Round Robin a partir de un quantum sin validar.
    ///
    /// # Errors
    ///
    /// `ConfigError::InvalidQuantum` si el quantum es cero, negativo o no
    /// cabe en un `u32`.
    pub fn round_robin_checked(quantum: i64) -> Result<Self, ConfigError> {
        u32::try_from(quantum)
            .ok()
            .and_then(NonZeroU32::new)
            .map(Self::round_robin)
            .ok_or_else(|| ConfigError::InvalidQuantum(quantum.to_string()))
    }

    /// Determina si el algoritmo puede desplazar al proceso en ejecución.
    ///
    /// ```rust
    /// use cpu_scheduler_sim::SchedulingAlgorithm;
    ///
    /// assert!(!SchedulingAlgorithm::fcfs().is_preemptive());
    /// assert!(SchedulingAlgorithm::sjf().is_preemptive());
    /// ```
    pub fn is_preemptive(&self) -> bool {
        match self {
            Self::Fcfs => false,
            Self::Sjf | Self::RoundRobin { .. } => true,
        }
    }

    /// Obtiene el quantum configurado, si el algoritmo es Round Robin.
    pub fn quantum(&self) -> Option<NonZeroU32> {
        match self {
            Self::RoundRobin { quantum } => Some(*quantum),
            _ => None,
        }
    }

    /// Descripción legible del algoritmo y sus parámetros.
    pub fn description(&self) -> String {
        match self {
            Self::Fcfs => "First-Come First-Served (no preemptivo)".to_string(),
            Self::Sjf => "Shortest Job First (preemptivo, ráfaga restante)".to_string(),
            Self::RoundRobin { quantum } => {
                format!("Round Robin preemptivo (quantum: {} ticks)", quantum)
            }
        }
    }
}

impl fmt::Display for SchedulingAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fcfs => write!(f, "FCFS"),
            Self::Sjf => write!(f, "SJF"),
            Self::RoundRobin { quantum } => write!(f, "RR (quantum {})", quantum),
        }
    }
}

impl FromStr for SchedulingAlgorithm {
    type Err = ConfigError;

    /// Acepta `fcfs`, `sjf`, `rr:<q>` y `round-robin:<q>` (sin distinguir
    /// mayúsculas).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        match lower.as_str() {
            "fcfs" | "f" => Ok(Self::Fcfs),
            "sjf" | "s" => Ok(Self::Sjf),
            "rr" | "round-robin" | "r" => Err(ConfigError::MissingQuantum),
            other => {
                let quantum = other
                    .strip_prefix("rr:")
                    .or_else(|| other.strip_prefix("round-robin:"))
                    .ok_or_else(|| ConfigError::UnknownAlgorithm(s.to_string()))?;
                let value: i64 = quantum
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidQuantum(quantum.to_string()))?;
                Self::round_robin_checked(value)
            }
        }
    }
}

/// Política de selección de un algoritmo, con el estado que arrastra
/// entre ticks.
#[derive(Debug, Clone)]
pub(crate) enum Selector {
    Fcfs,
    Sjf,
    RoundRobin(RoundRobinState),
}

/// Estado de Round Robin: proceso en CPU, ticks usados de su quantum y
/// cola de listos.
#[derive(Debug, Clone)]
pub(crate) struct RoundRobinState {
    quantum: u32,
    queue: ReadyQueue,
    current: Option<ProcessHandle>,
    time_in_quantum: u32,
}

impl Selector {
    pub(crate) fn new(algorithm: SchedulingAlgorithm, table: &ProcessTable) -> Self {
        match algorithm {
            SchedulingAlgorithm::Fcfs => Self::Fcfs,
            SchedulingAlgorithm::Sjf => Self::Sjf,
            SchedulingAlgorithm::RoundRobin { quantum } => Self::RoundRobin(RoundRobinState {
                quantum: quantum.get(),
                queue: ReadyQueue::for_table(table),
                current: None,
                time_in_quantum: 0,
            }),
        }
    }

    /// Elige el proceso que se ejecuta en `tick`, o `None` si el tick
    /// queda ocioso.
    pub(crate) fn select(&mut self, table: &mut ProcessTable, tick: Tick) -> Option<ProcessHandle> {
        match self {
            Self::Fcfs => table.first_eligible(tick),
            Self::Sjf => table.shortest_remaining(tick),
            Self::RoundRobin(state) => state.select(table, tick),
        }
    }

    /// Se invoca después de ejecutar `handle` durante un tick.
    pub(crate) fn after_execute(&mut self, table: &ProcessTable, handle: ProcessHandle) {
        if let Self::RoundRobin(state) = self {
            state.time_in_quantum += 1;
            if table.state(handle).is_complete() {
                state.current = None;
            }
        }
    }
}

impl RoundRobinState {
    fn select(&mut self, table: &mut ProcessTable, tick: Tick) -> Option<ProcessHandle> {
        // Las llegadas entran a la cola antes que el proceso desplazado
        let arrivals: Vec<ProcessHandle> = table.arrivals_at(tick).collect();
        for handle in arrivals {
            self.queue.enqueue(table, handle);
        }

        let must_switch = match self.current {
            None => true,
            Some(current) => {
                self.time_in_quantum == self.quantum || table.state(current).is_complete()
            }
        };

        if must_switch {
            if let Some(current) = self.current {
                if !table.state(current).is_complete() {
                    tracing::trace!(
                        tick,
                        process = table.state(current).id(),
                        "Quantum agotado, vuelve al final de la cola"
                    );
                    self.queue.enqueue(table, current);
                }
            }
            self.current = self.queue.dequeue(table);
            self.time_in_quantum = 0;
        }

        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::ProcessSpec;

    fn quantum(q: u32) -> NonZeroU32 {
        NonZeroU32::new(q).unwrap()
    }

    #[test]
    fn test_algorithm_creation() {
        assert_eq!(SchedulingAlgorithm::fcfs(), SchedulingAlgorithm::Fcfs);
        assert_eq!(SchedulingAlgorithm::sjf(), SchedulingAlgorithm::Sjf);
        assert_eq!(
            SchedulingAlgorithm::round_robin(quantum(3)),
            SchedulingAlgorithm::RoundRobin { quantum: quantum(3) }
        );
        assert_eq!(SchedulingAlgorithm::fcfs().quantum(), None);
    }

    #[test]
    fn test_round_robin_checked_rejects_non_positive() {
        assert!(SchedulingAlgorithm::round_robin_checked(2).is_ok());
        assert_eq!(
            SchedulingAlgorithm::round_robin_checked(0),
            Err(ConfigError::InvalidQuantum("0".to_string()))
        );
        assert_eq!(
            SchedulingAlgorithm::round_robin_checked(-4),
            Err(ConfigError::InvalidQuantum("-4".to_string()))
        );
    }

    #[test]
    fn test_from_str() {
        assert_eq!("FCFS".parse::<SchedulingAlgorithm>(), Ok(SchedulingAlgorithm::Fcfs));
        assert_eq!("sjf".parse::<SchedulingAlgorithm>(), Ok(SchedulingAlgorithm::Sjf));
        assert_eq!(
            "rr:4".parse::<SchedulingAlgorithm>(),
            Ok(SchedulingAlgorithm::round_robin(quantum(4)))
        );
        assert_eq!(
            "round-robin: 2".parse::<SchedulingAlgorithm>(),
            Ok(SchedulingAlgorithm::round_robin(quantum(2)))
        );
        assert_eq!(
            "rr".parse::<SchedulingAlgorithm>(),
            Err(ConfigError::MissingQuantum)
        );
        assert_eq!(
            "rr:0".parse::<SchedulingAlgorithm>(),
            Err(ConfigError::InvalidQuantum("0".to_string()))
        );
        assert_eq!(
            "rr:x".parse::<SchedulingAlgorithm>(),
            Err(ConfigError::InvalidQuantum("x".to_string()))
        );
        assert_eq!(
            "lottery".parse::<SchedulingAlgorithm>(),
            Err(ConfigError::UnknownAlgorithm("lottery".to_string()))
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", SchedulingAlgorithm::fcfs()), "FCFS");
        assert_eq!(format!("{}", SchedulingAlgorithm::sjf()), "SJF");
        assert_eq!(
            format!("{}", SchedulingAlgorithm::round_robin(quantum(2))),
            "RR (quantum 2)"
        );
        assert!(SchedulingAlgorithm::sjf().description().contains("restante"));
    }

    #[test]
    fn test_round_robin_rotation() {
        let mut table = ProcessTable::new(vec![
            ProcessSpec::new(1, 0, 3),
            ProcessSpec::new(2, 0, 3),
        ])
        .unwrap();
        let h: Vec<_> = table.handles().collect();
        let mut selector = Selector::new(SchedulingAlgorithm::round_robin(quantum(1)), &table);

        let mut picked = Vec::new();
        for tick in 0..4 {
            let handle = selector.select(&mut table, tick).unwrap();
            table.execute(handle, tick);
            selector.after_execute(&table, handle);
            picked.push(handle);
        }
        assert_eq!(picked, vec![h[0], h[1], h[0], h[1]]);
    }

    #[test]
    fn test_round_robin_idle_until_arrival() {
        let mut table = ProcessTable::new(vec![ProcessSpec::new(1, 2, 1)]).unwrap();
        let mut selector = Selector::new(SchedulingAlgorithm::round_robin(quantum(2)), &table);
        assert_eq!(selector.select(&mut table, 0), None);
        assert_eq!(selector.select(&mut table, 1), None);
        assert!(selector.select(&mut table, 2).is_some());
    }
}

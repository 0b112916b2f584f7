//! Tipos de error del simulador.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::process::Tick;

/// Errores de configuración detectados antes de iniciar la simulación.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// El selector de algoritmo no corresponde a ningún algoritmo conocido.
    #[error("Algoritmo desconocido: {0}")]
    UnknownAlgorithm(String),

    /// Round Robin requiere un quantum.
    #[error("Round Robin requiere un quantum")]
    MissingQuantum,

    /// El quantum no es un entero positivo.
    #[error("Quantum inválido: {0} (debe ser > 0)")]
    InvalidQuantum(String),
}

/// Errores al cargar el archivo de procesos.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("No se pudo leer el archivo {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Línea {line}: identificador de proceso fuera de rango '{token}'")]
    InvalidId { line: usize, token: String },

    #[error("Línea {line}: falta la ráfaga del proceso P{id}")]
    MissingBurst { line: usize, id: u32 },

    #[error("Línea {line}: ráfaga inválida '{token}'")]
    InvalidBurst { line: usize, token: String },

    #[error("Línea {line}: la ráfaga no puede ser negativa ({value})")]
    NegativeBurst { line: usize, value: i64 },

    #[error("Línea {line}: tiempo de llegada inválido '{token}'")]
    InvalidArrival { line: usize, token: String },

    #[error("Línea {line}: el proceso P{id} ya fue definido")]
    DuplicateId { line: usize, id: u32 },
}

/// Errores de la simulación propiamente dicha.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimulationError {
    /// Dos descriptores comparten identificador.
    #[error("Identificador de proceso duplicado: P{0}")]
    DuplicateProcessId(u32),

    /// Se alcanzó el límite de ticks configurado con procesos pendientes.
    #[error("Se alcanzó el límite de {limit} ticks con {pending} procesos pendientes")]
    TickLimitExceeded { limit: Tick, pending: usize },

    /// Se pidió un reporte sobre un proceso que no terminó.
    #[error("El proceso P{0} no ha terminado")]
    IncompleteProcess(u32),
}

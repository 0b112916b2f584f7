//! # Cargador de Procesos
//!
//! Lee el archivo de entrada y produce los descriptores de proceso.
//!
//! Cada línea describe un proceso: `P<id>,<ráfaga>[,<llegada>]`. Las líneas
//! cuyo primer campo no es `P<dígitos>` (encabezados, comentarios, líneas
//! vacías) se ignoran.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::error::LoadError;
use crate::process::{ProcessSpec, Tick};

/// Origen del tiempo de llegada de cada proceso.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ArrivalMode {
    /// Se lee del tercer campo de la línea; si falta, el proceso llega en 0.
    #[default]
    Explicit,
    /// Modo de compatibilidad: la llegada es igual al identificador.
    FromId,
}

/// Convierte el contenido de un archivo de entrada en descriptores.
#[derive(Clone, Copy, Debug, Default)]
pub struct ProcessLoader {
    arrival_mode: ArrivalMode,
}

impl ProcessLoader {
    /// Crea un cargador que lee la llegada del tercer campo.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cambia el origen del tiempo de llegada.
    ///
    /// # Arguments
    ///
    /// * `mode` - `ArrivalMode::FromId` reproduce el formato antiguo, donde
    ///   la llegada es el identificador del proceso
    pub fn with_arrival_mode(mut self, mode: ArrivalMode) -> Self {
        self.arrival_mode = mode;
        self
    }

    /// Lee y parsea el archivo en `path`.
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<Vec<ProcessSpec>, LoadError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let specs = self.parse_str(&contents)?;
        tracing::info!(
            path = %path.display(),
            processes = specs.len(),
            "Archivo de procesos cargado"
        );
        Ok(specs)
    }

    /// Parsea el contenido completo de un archivo de entrada.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cpu_scheduler_sim::{ProcessLoader, ProcessSpec};
    ///
    /// let specs = ProcessLoader::new().parse_str("P1,5,1\nP2,3,2\n").unwrap();
    /// assert_eq!(specs, vec![ProcessSpec::new(1, 1, 5), ProcessSpec::new(2, 2, 3)]);
    /// ```
    pub fn parse_str(&self, contents: &str) -> Result<Vec<ProcessSpec>, LoadError> {
        let mut seen = HashSet::new();
        let mut specs = Vec::new();

        for (index, line) in contents.lines().enumerate() {
            let line_no = index + 1;
            let Some(spec) = self.parse_line(line_no, line)? else {
                continue;
            };
            if !seen.insert(spec.id) {
                return Err(LoadError::DuplicateId {
                    line: line_no,
                    id: spec.id,
                });
            }
            tracing::debug!(
                id = spec.id,
                arrival = spec.arrival_time,
                burst = spec.burst_time,
                "Proceso cargado"
            );
            specs.push(spec);
        }

        Ok(specs)
    }

    /// Parsea una línea. Retorna `Ok(None)` si la línea no describe un
    /// proceso.
    pub fn parse_line(&self, line_no: usize, line: &str) -> Result<Option<ProcessSpec>, LoadError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let mut fields = line.split(',').map(str::trim);
        let Some(id_token) = fields.next().filter(|field| is_process_id(field)) else {
            tracing::warn!(line = line_no, content = line, "Línea ignorada");
            return Ok(None);
        };
        let id: u32 = id_token[1..].parse().map_err(|_| LoadError::InvalidId {
            line: line_no,
            token: id_token.to_string(),
        })?;

        let burst_token = match fields.next() {
            Some(token) if !token.is_empty() => token,
            _ => return Err(LoadError::MissingBurst { line: line_no, id }),
        };
        let burst: i64 = burst_token.parse().map_err(|_| LoadError::InvalidBurst {
            line: line_no,
            token: burst_token.to_string(),
        })?;
        let burst_time = Tick::try_from(burst).map_err(|_| LoadError::NegativeBurst {
            line: line_no,
            value: burst,
        })?;

        let arrival_token = fields.next().filter(|token| !token.is_empty());
        let arrival_time = match self.arrival_mode {
            ArrivalMode::FromId => {
                if arrival_token.is_some() {
                    tracing::warn!(
                        line = line_no,
                        "Llegada explícita ignorada: la llegada se toma del identificador"
                    );
                }
                Tick::from(id)
            }
            ArrivalMode::Explicit => match arrival_token {
                Some(token) => token.parse().map_err(|_| LoadError::InvalidArrival {
                    line: line_no,
                    token: token.to_string(),
                })?,
                None => 0,
            },
        };

        Ok(Some(ProcessSpec::new(id, arrival_time, burst_time)))
    }
}

/// Indica si el campo tiene la forma `P<dígitos>`.
fn is_process_id(field: &str) -> bool {
    field
        .strip_prefix('P')
        .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tracing_test::traced_test;

    #[test]
    fn test_parse_explicit_arrivals() {
        let specs = ProcessLoader::new()
            .parse_str("P1,5,1\n  P2 , 3 , 2 \nP3,4\n")
            .unwrap();
        assert_eq!(
            specs,
            vec![
                ProcessSpec::new(1, 1, 5),
                ProcessSpec::new(2, 2, 3),
                ProcessSpec::new(3, 0, 4),
            ]
        );
    }

    #[test]
    fn test_arrival_from_id_mode() {
        let loader = ProcessLoader::new().with_arrival_mode(ArrivalMode::FromId);
        let specs = loader.parse_str("P0,3\nP1,2\nP4,1,9\n").unwrap();
        assert_eq!(
            specs,
            vec![
                ProcessSpec::new(0, 0, 3),
                ProcessSpec::new(1, 1, 2),
                ProcessSpec::new(4, 4, 1),
            ]
        );
    }

    #[traced_test]
    #[test]
    fn test_header_and_blank_lines_skipped() {
        let specs = ProcessLoader::new()
            .parse_str("Process,Burst\n\n# comentario\nP1,2\n")
            .unwrap();
        assert_eq!(specs, vec![ProcessSpec::new(1, 0, 2)]);
        assert!(logs_contain("Línea ignorada"));
    }

    #[test]
    fn test_zero_burst_accepted() {
        let specs = ProcessLoader::new().parse_str("P1,0").unwrap();
        assert_eq!(specs, vec![ProcessSpec::new(1, 0, 0)]);
    }

    #[test]
    fn test_invalid_lines_rejected() {
        let loader = ProcessLoader::new();

        assert!(matches!(
            loader.parse_str("P1,5\nP2\n"),
            Err(LoadError::MissingBurst { line: 2, id: 2 })
        ));
        assert!(matches!(
            loader.parse_str("P1,abc"),
            Err(LoadError::InvalidBurst { line: 1, .. })
        ));
        assert!(matches!(
            loader.parse_str("P1,-3"),
            Err(LoadError::NegativeBurst { line: 1, value: -3 })
        ));
        assert!(matches!(
            loader.parse_str("P1,3,-1"),
            Err(LoadError::InvalidArrival { line: 1, .. })
        ));
        assert!(matches!(
            loader.parse_str("P1,2\nP99999999999,5\n"),
            Err(LoadError::InvalidId { line: 2, .. })
        ));
        assert!(matches!(
            loader.parse_str("P1,3\nP1,4"),
            Err(LoadError::DuplicateId { line: 2, id: 1 })
        ));
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "P1,5,1").unwrap();
        writeln!(file, "P2,3,2").unwrap();

        let specs = ProcessLoader::new().load_file(file.path()).unwrap();
        assert_eq!(specs.len(), 2);
    }

    #[test]
    fn test_missing_file() {
        let err = ProcessLoader::new()
            .load_file("/no/existe/procesos.txt")
            .unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
        assert!(err.to_string().contains("/no/existe/procesos.txt"));
    }
}

//! # Cola de Listos
//!
//! Cola circular FIFO de capacidad fija usada por Round Robin. Guarda
//! [`ProcessHandle`]s; los estados pertenecen a la [`ProcessTable`], que
//! también lleva la marca `in_queue` que impide encolar dos veces.

use crate::process::{ProcessHandle, ProcessTable};

/// Cola acotada de procesos listos.
///
/// La capacidad se fija al crearla y debe ser al menos la cantidad de
/// procesos de la tabla; como cada proceso aparece a lo sumo una vez,
/// con ese tamaño la cola nunca se llena.
#[derive(Debug, Clone)]
pub struct ReadyQueue {
    slots: Vec<Option<ProcessHandle>>,
    head: usize,
    len: usize,
}

impl ReadyQueue {
    /// Crea una cola vacía con la capacidad indicada.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity],
            head: 0,
            len: 0,
        }
    }

    /// Crea una cola dimensionada para todos los procesos de `table`.
    pub fn for_table(table: &ProcessTable) -> Self {
        Self::with_capacity(table.len())
    }

    /// Cantidad máxima de procesos que admite la cola.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Cantidad de procesos encolados.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Agrega `handle` al final de la cola.
    ///
    /// No hace nada si el proceso ya está en la cola, si ya terminó, si
    /// el handle no pertenece a `table` o si la cola está llena.
    ///
    /// # Returns
    ///
    /// `true` solo si el proceso fue encolado.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cpu_scheduler_sim::{ProcessSpec, ProcessTable, ReadyQueue};
    ///
    /// let mut table = ProcessTable::new(vec![ProcessSpec::new(1, 0, 3)]).unwrap();
    /// let mut queue = ReadyQueue::for_table(&table);
    /// let p1 = table.handles().next().unwrap();
    ///
    /// assert!(queue.enqueue(&mut table, p1));
    /// assert!(!queue.enqueue(&mut table, p1));
    /// assert_eq!(queue.len(), 1);
    /// ```
    pub fn enqueue(&mut self, table: &mut ProcessTable, handle: ProcessHandle) -> bool {
        let Some(process) = table.get_mut(handle) else {
            return false;
        };
        if process.in_queue() || process.is_complete() {
            return false;
        }
        debug_assert!(
            !self.contains(handle),
            "P{} en la cola sin marca in_queue",
            process.id()
        );
        if self.len == self.capacity() {
            tracing::warn!(
                process = process.id(),
                capacity = self.capacity(),
                "Cola de listos llena, proceso descartado"
            );
            return false;
        }

        let tail = (self.head + self.len) % self.capacity();
        self.slots[tail] = Some(handle);
        self.len += 1;
        process.set_in_queue(true);
        true
    }

    /// Retira el proceso al frente de la cola, o `None` si está vacía.
    pub fn dequeue(&mut self, table: &mut ProcessTable) -> Option<ProcessHandle> {
        if self.is_empty() {
            return None;
        }

        let handle = self.slots[self.head].take()?;
        self.head = (self.head + 1) % self.capacity();
        self.len -= 1;
        if let Some(process) = table.get_mut(handle) {
            process.set_in_queue(false);
        }
        Some(handle)
    }

    /// Recorre la cola del frente al final sin modificarla.
    pub fn iter(&self) -> impl Iterator<Item = ProcessHandle> + '_ {
        (0..self.len).filter_map(move |offset| self.slots[(self.head + offset) % self.capacity()])
    }

    /// Indica si `handle` está en la cola.
    pub fn contains(&self, handle: ProcessHandle) -> bool {
        self.iter().any(|queued| queued == handle)
    }
}

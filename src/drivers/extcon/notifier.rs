//! Notifier chain de eventos de cabo.
//!
//! A lista é protegida por `spin::Mutex` e NUNCA é tocada de contexto de
//! interrupção. Na entrega, os listeners do cabo são copiados para fora do
//! lock antes de serem chamados: um listener pode cancelar a própria
//! inscrição (ou inscrever outro) sem deadlock.

use alloc::sync::Arc;
use alloc::vec::Vec;
use core::sync::atomic::{AtomicU32, Ordering};

use spin::Mutex;

use super::{Cable, CableEvent, CableListener, ListenerId, NotifyResult};
use crate::sys::Errno;

struct Entry {
    id: ListenerId,
    cable: Cable,
    listener: Arc<dyn CableListener>,
}

/// Lista ordenada de listeners por cabo
pub struct NotifierChain {
    entries: Mutex<Vec<Entry>>,
    next_id: AtomicU32,
}

impl NotifierChain {
    pub const fn new() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            next_id: AtomicU32::new(1),
        }
    }

    /// Adiciona listener ao final da cadeia de `cable`
    pub fn register(&self, cable: Cable, listener: Arc<dyn CableListener>) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.entries.lock().push(Entry {
            id,
            cable,
            listener,
        });
        crate::ktrace!("(EXTCON) Listener registrado id=", id.0);
        id
    }

    /// Remove listener. `ENOENT` se o id não existe.
    pub fn unregister(&self, id: ListenerId) -> Result<(), Errno> {
        let mut entries = self.entries.lock();
        let pos = entries
            .iter()
            .position(|e| e.id == id)
            .ok_or(Errno::ENOENT)?;
        entries.remove(pos);
        crate::ktrace!("(EXTCON) Listener removido id=", id.0);
        Ok(())
    }

    /// Número de listeners inscritos em `cable`
    pub fn count(&self, cable: Cable) -> usize {
        self.entries.lock().iter().filter(|e| e.cable == cable).count()
    }

    /// Entrega `event` aos listeners do cabo, em ordem de inscrição.
    ///
    /// Retorna quantos listeners foram chamados.
    pub fn call_chain(&self, event: CableEvent) -> usize {
        let targets: Vec<Arc<dyn CableListener>> = self
            .entries
            .lock()
            .iter()
            .filter(|e| e.cable == event.cable)
            .map(|e| e.listener.clone())
            .collect();

        let mut called = 0;
        for listener in targets {
            called += 1;
            if listener.on_cable_event(event) == NotifyResult::Stop {
                break;
            }
        }
        called
    }
}

impl Default for NotifierChain {
    fn default() -> Self {
        Self::new()
    }
}

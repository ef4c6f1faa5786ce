//! Fornecedor extcon em software.
//!
//! Mantém o estado dos cabos suportados e uma fila limitada de eventos
//! pendentes. O lado produtor (`set_state`) pode rodar em contexto de
//! interrupção: só grava o estado e enfileira. O lado consumidor
//! (`dispatch`) drena a fila e chama a notifier chain fora de qualquer lock.

use alloc::sync::Arc;
use core::sync::atomic::{AtomicBool, AtomicU32, AtomicU8, Ordering};

use super::notifier::NotifierChain;
use super::{Cable, CableDetector, CableEvent, CableListener, ListenerId};
use crate::klib::Ring;
use crate::sync::Spinlock;
use crate::sys::Errno;

/// Profundidade da fila de eventos pendentes
pub const PENDING_EVENTS: usize = 16;

const STATE_DETACHED: u8 = 0;
const STATE_ATTACHED: u8 = 1;
const STATE_UNKNOWN: u8 = 2;

/// Dispositivo extcon
pub struct ExtconDev {
    name: &'static str,
    supported: [bool; 2],
    available: AtomicBool,
    state: [AtomicU8; 2],
    chain: NotifierChain,
    pending: Spinlock<Ring<CableEvent, PENDING_EVENTS>>,
    overflows: AtomicU32,
}

impl ExtconDev {
    /// Cria fornecedor pronto, com todos os cabos de `cables` desconectados.
    pub fn new(name: &'static str, cables: &[Cable]) -> Self {
        let mut supported = [false; 2];
        for cable in cables {
            supported[cable.index()] = true;
        }
        Self {
            name,
            supported,
            available: AtomicBool::new(true),
            state: [
                AtomicU8::new(STATE_DETACHED),
                AtomicU8::new(STATE_DETACHED),
            ],
            chain: NotifierChain::new(),
            pending: Spinlock::new(Ring::new()),
            overflows: AtomicU32::new(0),
        }
    }

    /// Fornecedor referenciado pela configuração mas cujo driver ainda
    /// não fez bind: inscrições retornam `EPROBE_DEFER` até `bind()`.
    pub fn unavailable(name: &'static str, cables: &[Cable]) -> Self {
        let dev = Self::new(name, cables);
        dev.available.store(false, Ordering::Release);
        dev
    }

    /// Marca o fornecedor como pronto
    pub fn bind(&self) {
        self.available.store(true, Ordering::Release);
        crate::kdebug!("(EXTCON) Fornecedor pronto");
    }

    fn check(&self, cable: Cable) -> Result<(), Errno> {
        if self.supported[cable.index()] {
            Ok(())
        } else {
            Err(Errno::EINVAL)
        }
    }

    /// Atualiza o estado de `cable`. Seguro em contexto de IRQ.
    ///
    /// Retorna `true` se houve transição (e um evento foi enfileirado).
    pub fn set_state(&self, cable: Cable, attached: bool) -> Result<bool, Errno> {
        self.check(cable)?;
        let new = if attached {
            STATE_ATTACHED
        } else {
            STATE_DETACHED
        };
        let old = self.state[cable.index()].swap(new, Ordering::AcqRel);
        if old == new {
            return Ok(false);
        }

        let event = CableEvent { cable, attached };
        if self.pending.lock().push(event).is_err() {
            // Já existem eventos na fila: o consumidor vai reler o estado
            // atual ao processá-los, então descartar este não perde a transição.
            let n = self.overflows.fetch_add(1, Ordering::Relaxed) + 1;
            crate::kwarn!("(EXTCON) Fila de eventos cheia, overflows=", n);
        }
        Ok(true)
    }

    /// Marca `cable` como sem leitura válida (sem gerar evento)
    pub fn set_unknown(&self, cable: Cable) -> Result<(), Errno> {
        self.check(cable)?;
        self.state[cable.index()].store(STATE_UNKNOWN, Ordering::Release);
        Ok(())
    }

    /// Drena a fila, entregando cada evento à notifier chain.
    ///
    /// Retorna quantos eventos foram entregues.
    pub fn dispatch(&self) -> usize {
        let mut delivered = 0;
        loop {
            // Lock liberado antes de chamar listeners
            let next = self.pending.lock().pop();
            let Some(event) = next else { break };
            self.chain.call_chain(event);
            delivered += 1;
        }
        delivered
    }

    /// `set_state` seguido de `dispatch` (produtor em contexto de thread)
    pub fn set_state_sync(&self, cable: Cable, attached: bool) -> Result<bool, Errno> {
        let changed = self.set_state(cable, attached)?;
        if changed {
            self.dispatch();
        }
        Ok(changed)
    }

    /// Eventos aguardando `dispatch`
    pub fn pending(&self) -> usize {
        self.pending.lock().len()
    }

    /// Eventos descartados por fila cheia
    pub fn overflows(&self) -> u32 {
        self.overflows.load(Ordering::Relaxed)
    }

    /// Listeners inscritos em `cable`
    pub fn listeners(&self, cable: Cable) -> usize {
        self.chain.count(cable)
    }
}

impl CableDetector for ExtconDev {
    fn name(&self) -> &'static str {
        self.name
    }

    fn get_state(&self, cable: Cable) -> Result<bool, Errno> {
        self.check(cable)?;
        match self.state[cable.index()].load(Ordering::Acquire) {
            STATE_ATTACHED => Ok(true),
            STATE_DETACHED => Ok(false),
            _ => Err(Errno::EIO),
        }
    }

    fn register(
        &self,
        cable: Cable,
        listener: Arc<dyn CableListener>,
    ) -> Result<ListenerId, Errno> {
        if !self.available.load(Ordering::Acquire) {
            return Err(Errno::EPROBE_DEFER);
        }
        self.check(cable)?;
        Ok(self.chain.register(cable, listener))
    }

    fn unregister(&self, id: ListenerId) -> Result<(), Errno> {
        self.chain.unregister(id)
    }
}

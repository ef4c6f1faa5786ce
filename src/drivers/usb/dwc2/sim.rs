//! Modelo simulado dos registradores DWC2.
//!
//! Reproduz o que o DRD observa do hardware real:
//! - ASESVLD/BSESVLD refletem o override quando habilitado
//!   (xSESVLD = xVALOEN && xVALOVAL), senão os "pinos" simulados.
//! - GINTSTS.CURMOD segue o modo forçado em GUSBCFG, e cada troca
//!   efetiva de modo levanta CONIDSTSCHNG.
//! - GINTSTS é write-1-to-clear.
//!
//! Toda escrita é registrada, na ordem, para os testes verificarem
//! idempotência e sequência de ações. Escritas feitas com interrupções
//! locais habilitadas são contadas à parte.

use alloc::sync::Arc;
use alloc::vec::Vec;

use spin::Mutex;

use super::regs::{Dctl, Gintsts, Gotgctl, Gusbcfg, RegisterIo, DCTL, GINTMSK, GINTSTS, GOTGCTL, GUSBCFG};
use crate::arch::{Cpu, CpuOps};

/// Uma escrita observada
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegWrite {
    pub offset: usize,
    pub value: u32,
}

struct SimState {
    gotgctl: u32,
    gusbcfg: u32,
    gintsts: u32,
    gintmsk: u32,
    dctl: u32,
    /// Sessões vindas dos pinos (sem override)
    pin_avalid: bool,
    pin_bvalid: bool,
    /// Pino ID aterrado (A-device) quando não há modo forçado
    id_grounded: bool,
    writes: Vec<RegWrite>,
    /// Escritas feitas fora do lock irqsave
    unmasked_writes: usize,
}

impl SimState {
    fn cur_host(&self) -> bool {
        let cfg = Gusbcfg::from_bits_retain(self.gusbcfg);
        if cfg.contains(Gusbcfg::FORCEHOSTMODE) {
            true
        } else if cfg.contains(Gusbcfg::FORCEDEVMODE) {
            false
        } else {
            self.id_grounded
        }
    }

    fn gotgctl(&self) -> u32 {
        let stored = Gotgctl::from_bits_retain(self.gotgctl);
        let mut value = stored - (Gotgctl::ASESVLD | Gotgctl::BSESVLD | Gotgctl::CONID_B);

        let avalid = if stored.contains(Gotgctl::AVALOEN) {
            stored.contains(Gotgctl::AVALOVAL)
        } else {
            self.pin_avalid
        };
        let bvalid = if stored.contains(Gotgctl::BVALOEN) {
            stored.contains(Gotgctl::BVALOVAL)
        } else {
            self.pin_bvalid
        };
        value.set(Gotgctl::ASESVLD, avalid);
        value.set(Gotgctl::BSESVLD, bvalid);
        value.set(Gotgctl::CONID_B, !self.cur_host());
        value.bits()
    }

    fn gintsts(&self) -> u32 {
        let mut value = Gintsts::from_bits_retain(self.gintsts);
        value.set(Gintsts::CURMODE_HOST, self.cur_host());
        value.bits()
    }
}

/// Registradores simulados. Clones compartilham o mesmo estado.
#[derive(Clone)]
pub struct SimRegs {
    state: Arc<Mutex<SimState>>,
}

impl SimRegs {
    /// Núcleo recém-saído de reset: sem overrides, sem modo forçado,
    /// device conectado (SFTDISCON limpo), pino ID flutuando (B-device).
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(SimState {
                gotgctl: 0,
                gusbcfg: 0,
                gintsts: 0,
                gintmsk: 0,
                dctl: 0,
                pin_avalid: false,
                pin_bvalid: false,
                id_grounded: false,
                writes: Vec::new(),
                unmasked_writes: 0,
            })),
        }
    }

    /// Esquece as escritas registradas até aqui
    pub fn clear_log(&self) {
        let mut s = self.state.lock();
        s.writes.clear();
        s.unmasked_writes = 0;
    }

    /// Escritas registradas, em ordem
    pub fn writes(&self) -> Vec<RegWrite> {
        self.state.lock().writes.clone()
    }

    /// Escritas em um registrador específico
    pub fn writes_to(&self, offset: usize) -> Vec<u32> {
        self.state
            .lock()
            .writes
            .iter()
            .filter(|w| w.offset == offset)
            .map(|w| w.value)
            .collect()
    }

    /// Leitura sem registrar (visão do hardware)
    pub fn peek(&self, offset: usize) -> u32 {
        self.read32(offset)
    }

    pub fn gotgctl(&self) -> Gotgctl {
        Gotgctl::from_bits_retain(self.peek(GOTGCTL))
    }

    pub fn gusbcfg(&self) -> Gusbcfg {
        Gusbcfg::from_bits_retain(self.peek(GUSBCFG))
    }

    pub fn soft_disconnected(&self) -> bool {
        Dctl::from_bits_retain(self.peek(DCTL)).contains(Dctl::SFTDISCON)
    }

    pub fn conid_irq_pending(&self) -> bool {
        Gintsts::from_bits_retain(self.peek(GINTSTS)).contains(Gintsts::CONIDSTSCHNG)
    }

    pub fn conid_irq_enabled(&self) -> bool {
        Gintsts::from_bits_retain(self.peek(GINTMSK)).contains(Gintsts::CONIDSTSCHNG)
    }

    /// Simula perda de contexto (ex: power gating em suspend)
    pub fn power_loss(&self) {
        let mut s = self.state.lock();
        s.gotgctl = 0;
        s.gusbcfg = 0;
        s.dctl = 0;
    }

    /// Escritas feitas com IRQ local habilitada
    pub fn unmasked_writes(&self) -> usize {
        self.state.lock().unmasked_writes
    }

    /// Simula sessões vindas dos pinos (valem onde o override está desligado)
    pub fn set_pin_sessions(&self, avalid: bool, bvalid: bool) {
        let mut s = self.state.lock();
        s.pin_avalid = avalid;
        s.pin_bvalid = bvalid;
    }

    /// Simula o estado do pino ID
    pub fn set_id_grounded(&self, grounded: bool) {
        self.state.lock().id_grounded = grounded;
    }

    /// Pré-carrega um registrador sem registrar escrita
    pub fn preload(&self, offset: usize, value: u32) {
        let mut s = self.state.lock();
        match offset {
            GOTGCTL => s.gotgctl = value,
            GUSBCFG => s.gusbcfg = value,
            GINTSTS => s.gintsts = value,
            GINTMSK => s.gintmsk = value,
            DCTL => s.dctl = value,
            _ => {}
        }
    }
}

impl Default for SimRegs {
    fn default() -> Self {
        Self::new()
    }
}

impl RegisterIo for SimRegs {
    fn read32(&self, offset: usize) -> u32 {
        let s = self.state.lock();
        match offset {
            GOTGCTL => s.gotgctl(),
            GUSBCFG => s.gusbcfg,
            GINTSTS => s.gintsts(),
            GINTMSK => s.gintmsk,
            DCTL => s.dctl,
            _ => 0,
        }
    }

    fn write32(&mut self, offset: usize, value: u32) {
        let mut s = self.state.lock();
        s.writes.push(RegWrite { offset, value });
        if Cpu::are_interrupts_enabled() {
            s.unmasked_writes += 1;
        }
        match offset {
            GOTGCTL => {
                // Bits de status são somente leitura
                let ro = Gotgctl::ASESVLD | Gotgctl::BSESVLD | Gotgctl::CONID_B;
                s.gotgctl = (Gotgctl::from_bits_retain(value) - ro).bits();
            }
            GUSBCFG => {
                let was_host = s.cur_host();
                s.gusbcfg = value;
                if s.cur_host() != was_host {
                    s.gintsts |= Gintsts::CONIDSTSCHNG.bits();
                }
            }
            GINTSTS => s.gintsts &= !(value & Gintsts::CONIDSTSCHNG.bits()),
            GINTMSK => s.gintmsk = value,
            DCTL => s.dctl = value,
            _ => {}
        }
    }
}

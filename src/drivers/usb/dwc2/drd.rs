//! # DWC2 Dual-Role (DRD) - Árbitro de Sessão
//!
//! Reconcilia o estado do fornecedor de cabo (extcon) com o papel
//! configurado do controlador, aplicando o mínimo de overrides em GOTGCTL
//! e de trocas de modo para convergir ao papel correto.
//!
//! ## Passe de reconciliação
//!
//! ```text
//! ler cabos (erro = desconectado)
//!   │
//!   ├─ cabo fora do dr_mode ............ Irrelevant  (sem lock)
//!   ├─ nenhum cabo + test mode ......... TestModeSkip (sem lock)
//!   │
//!   └─ lock irqsave do controlador
//!        ├─ host    → sessão A (+ força host se OTG)
//!        ├─ device  → sessão B (+ força device se OTG, soft-connect)
//!        └─ nenhum  → limpa A/B (soft-disconnect antes se peripheral),
//!                     reaplica dr_mode
//! ```
//!
//! Cabo host tem prioridade: com os dois conectados só a sessão A é tratada.
//! Cada passe relê o hardware, então um evento perdido ou reordenado é
//! corrigido pelo próximo. Nada é re-tentado aqui.

use alloc::sync::{Arc, Weak};
use core::sync::atomic::{AtomicU32, AtomicU8, Ordering};

use spin::Mutex;

use super::core::{Dwc2Core, Hsotg};
use super::error::{DrdError, DrdResult};
use super::params::DrMode;
use super::regs::RegisterIo;
use crate::drivers::extcon::{
    Cable, CableDetector, CableEvent, CableListener, ListenerId, NotifyResult,
};

/// Estado da máquina de sessão
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SessionState {
    /// Nenhum passe aplicou mudança ainda
    Undetermined = 0,
    /// Sessão A válida, host forçado (se OTG)
    HostForced = 1,
    /// Sessão B válida, device forçado (se OTG)
    PeripheralForced = 2,
    /// Sem sessão, modo do boot reaplicado
    DefaultForced = 3,
}

impl SessionState {
    fn from_u8(v: u8) -> Self {
        match v {
            1 => SessionState::HostForced,
            2 => SessionState::PeripheralForced,
            3 => SessionState::DefaultForced,
            _ => SessionState::Undetermined,
        }
    }
}

/// Leitura dos dois cabos
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CableSnapshot {
    pub host: bool,
    pub device: bool,
}

/// Resultado de um passe de reconciliação
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// Cabo incompatível com o dr_mode; nada tocado
    Irrelevant,
    /// Núcleo em test mode e nenhum cabo; nada tocado
    TestModeSkip,
    /// Hardware já no estado alvo; nenhuma escrita
    AlreadySatisfied,
    /// Overrides aplicados; novo estado
    Applied(SessionState),
}

/// Árbitro DRD de um controlador
pub struct DrdArbiter<R: RegisterIo + 'static> {
    hsotg: Arc<Hsotg<R>>,
    edev: Arc<dyn CableDetector>,
    listeners: Mutex<[Option<ListenerId>; 2]>,
    state: AtomicU8,
    passes: AtomicU32,
}

/// Adaptador inscrito no extcon.
///
/// Guarda só uma referência fraca: o fornecedor não mantém o árbitro vivo.
struct DrdNotifier<R: RegisterIo + 'static> {
    drd: Weak<DrdArbiter<R>>,
}

impl<R: RegisterIo + 'static> CableListener for DrdNotifier<R> {
    fn on_cable_event(&self, event: CableEvent) -> NotifyResult {
        match self.drd.upgrade() {
            Some(drd) => drd.on_cable_event(event),
            None => NotifyResult::Done,
        }
    }
}

impl<R: RegisterIo + 'static> DrdArbiter<R> {
    /// Liga o árbitro ao controlador.
    ///
    /// Sem fornecedor de cabo o DRD fica inerte (`Ok(None)`): o papel vem
    /// de outro mecanismo (pino ID, dr_mode fixo).
    pub fn initialize(
        hsotg: Arc<Hsotg<R>>,
        edev: Option<Arc<dyn CableDetector>>,
    ) -> DrdResult<Option<Arc<Self>>> {
        let Some(edev) = edev else {
            crate::kdebug!("(DRD) Sem extcon, DRD inerte");
            return Ok(None);
        };

        let drd = Arc::new(Self {
            hsotg,
            edev,
            listeners: Mutex::new([None, None]),
            state: AtomicU8::new(SessionState::Undetermined as u8),
            passes: AtomicU32::new(0),
        });

        for cable in Cable::ALL {
            let listener: Arc<dyn CableListener> = Arc::new(DrdNotifier {
                drd: Arc::downgrade(&drd),
            });
            // Em erro, o Drop de `drd` cancela o que já foi inscrito
            let id = drd.edev.register(cable, listener).map_err(|e| {
                if e.is_retry_later() {
                    crate::kdebug!("(DRD) Extcon indisponível, adiando probe");
                    DrdError::RetryLater(e)
                } else {
                    crate::kerror!("(DRD) Falha ao inscrever no extcon, errno=", e as i32);
                    DrdError::Registration(e)
                }
            })?;
            drd.listeners.lock()[cable.index()] = Some(id);
        }

        // Hardware só é tocado depois das duas inscrições
        {
            let mut core = drd.hsotg.lock();
            core.ovr_init();
            let host = match core.dr_mode() {
                DrMode::Host => true,
                DrMode::Peripheral => false,
                DrMode::Otg => core.is_host_mode(),
            };
            core.force_mode(host);
        }

        drd.reconcile();
        crate::kinfo!("(DRD) Inicializado, extcon ativo");
        Ok(Some(drd))
    }

    /// Ponto de entrada de eventos de cabo. Sempre reconhece o evento.
    pub fn on_cable_event(&self, event: CableEvent) -> NotifyResult {
        crate::ktrace!("(DRD) Evento de cabo, attached=", event.attached);
        self.reconcile();
        NotifyResult::Ok
    }

    /// Lê os dois cabos. Falha de leitura conta como desconectado.
    pub fn read_cables(&self) -> CableSnapshot {
        CableSnapshot {
            host: self.read_cable(Cable::Host),
            device: self.read_cable(Cable::Device),
        }
    }

    fn read_cable(&self, cable: Cable) -> bool {
        match self.edev.get_state(cable) {
            Ok(state) => state,
            Err(e) => {
                crate::kwarn!("(DRD) Leitura de cabo falhou, errno=", e as i32);
                false
            }
        }
    }

    /// Um passe completo de reconciliação
    pub fn reconcile(&self) -> ReconcileOutcome {
        self.passes.fetch_add(1, Ordering::Relaxed);
        let cables = self.read_cables();
        let dr_mode = self.hsotg.dr_mode();

        // Sessão fora do dr_mode
        if (cables.host && dr_mode == DrMode::Peripheral)
            || (cables.device && dr_mode == DrMode::Host)
        {
            crate::kdebug!("(DRD) Cabo incompatível com dr_mode, ignorado");
            return ReconcileOutcome::Irrelevant;
        }

        // Não perturbar núcleo em test mode
        if !cables.host && !cables.device && self.hsotg.test_mode() {
            crate::kdebug!("(DRD) Núcleo em test mode, sessão mantida");
            return ReconcileOutcome::TestModeSkip;
        }

        let outcome = {
            let mut core = self.hsotg.lock();
            if cables.host {
                Self::assert_a_session(&mut core)
            } else if cables.device {
                Self::assert_b_session(&mut core)
            } else {
                Self::clear_sessions(&mut core)
            }
        };

        if let ReconcileOutcome::Applied(state) = outcome {
            self.state.store(state as u8, Ordering::Release);
            match state {
                SessionState::HostForced => crate::kinfo!("(DRD) Sessão A válida"),
                SessionState::PeripheralForced => crate::kinfo!("(DRD) Sessão B válida"),
                _ => crate::kinfo!("(DRD) Sem sessão"),
            }
        }
        outcome
    }

    fn assert_a_session(core: &mut Dwc2Core<R>) -> ReconcileOutcome {
        if core.ovr_avalid(true).is_err() {
            return ReconcileOutcome::AlreadySatisfied;
        }
        if core.dr_mode() == DrMode::Otg {
            // Levanta Connector ID Status Change no núcleo
            core.force_mode(true);
        }
        ReconcileOutcome::Applied(SessionState::HostForced)
    }

    fn assert_b_session(core: &mut Dwc2Core<R>) -> ReconcileOutcome {
        if core.ovr_bvalid(true).is_err() {
            return ReconcileOutcome::AlreadySatisfied;
        }
        if core.dr_mode() == DrMode::Otg {
            core.force_mode(false);
        }
        // Override não liga o pull-up sozinho
        core.core_connect();
        ReconcileOutcome::Applied(SessionState::PeripheralForced)
    }

    fn clear_sessions(core: &mut Dwc2Core<R>) -> ReconcileOutcome {
        let (avalid, bvalid) = core.session_valid();
        if !avalid && !bvalid {
            return ReconcileOutcome::AlreadySatisfied;
        }
        if core.dr_mode() == DrMode::Peripheral {
            // Barramento quieto antes de derrubar a sessão
            core.core_disconnect();
        }
        if core.ovr_clear().is_err() {
            return ReconcileOutcome::AlreadySatisfied;
        }
        core.force_dr_mode();
        ReconcileOutcome::Applied(SessionState::DefaultForced)
    }

    /// Último estado aplicado
    pub fn state(&self) -> SessionState {
        SessionState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Passes executados desde a inicialização
    pub fn passes(&self) -> u32 {
        self.passes.load(Ordering::Relaxed)
    }

    pub fn hsotg(&self) -> &Arc<Hsotg<R>> {
        &self.hsotg
    }

    /// Mascara e reconhece CONIDSTSCHNG: overrides podem se perder no
    /// suspend e não devem virar troca de papel espúria.
    pub fn suspend(&self) {
        let mut core = self.hsotg.lock();
        core.set_conid_irq(false);
        core.ack_conid_irq();
        crate::kdebug!("(DRD) Suspend");
    }

    /// Restaura a última sessão, reconhece/desmascara CONIDSTSCHNG e
    /// reconcilia contra o estado atual dos cabos.
    pub fn resume(&self) {
        let state = self.state();
        {
            let mut core = self.hsotg.lock();
            // Contexto pode ter se perdido: overrides do zero antes de reafirmar
            core.ovr_init();
            match state {
                SessionState::HostForced => {
                    let _ = core.ovr_avalid(true);
                    if core.dr_mode() == DrMode::Otg {
                        core.force_mode(true);
                    }
                }
                SessionState::PeripheralForced => {
                    let _ = core.ovr_bvalid(true);
                    if core.dr_mode() == DrMode::Otg {
                        core.force_mode(false);
                    }
                    core.core_connect();
                }
                SessionState::DefaultForced | SessionState::Undetermined => {
                    core.force_dr_mode();
                }
            }
            core.ack_conid_irq();
            core.set_conid_irq(true);
        }
        crate::kdebug!("(DRD) Resume, sessão restaurada=", state as u8);

        // Cabo pode ter mudado com o sistema suspenso
        self.reconcile();
    }

    /// Cancela as inscrições no extcon (detach do driver)
    pub fn exit(&self) {
        let mut listeners = self.listeners.lock();
        for slot in listeners.iter_mut() {
            if let Some(id) = slot.take() {
                if let Err(e) = self.edev.unregister(id) {
                    crate::kwarn!("(DRD) Falha ao cancelar listener, errno=", e as i32);
                }
            }
        }
    }
}

impl<R: RegisterIo + 'static> Drop for DrdArbiter<R> {
    fn drop(&mut self) {
        self.exit();
    }
}

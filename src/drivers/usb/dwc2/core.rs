//! Núcleo DWC2: operações de registrador usadas pelo DRD.
//!
//! `Dwc2Core` não tem lock próprio: quem o acessa é `Hsotg`, que o guarda
//! atrás do lock irqsave do controlador (o mesmo que o handler de IRQ usa).

use core::sync::atomic::{AtomicBool, Ordering};

use super::params::{DrMode, Dwc2Params};
use super::regs::{Dctl, Gintsts, Gotgctl, Gusbcfg, RegisterIo, DCTL, GINTMSK, GINTSTS, GOTGCTL, GUSBCFG};
use crate::sync::{Spinlock, SpinlockGuard};
use crate::sys::Errno;

/// Acesso aos registradores do núcleo
pub struct Dwc2Core<R: RegisterIo> {
    regs: R,
    params: Dwc2Params,
}

impl<R: RegisterIo> Dwc2Core<R> {
    pub fn new(regs: R, params: Dwc2Params) -> Self {
        Self { regs, params }
    }

    pub fn params(&self) -> &Dwc2Params {
        &self.params
    }

    pub fn dr_mode(&self) -> DrMode {
        self.params.dr_mode
    }

    // =========================================================================
    // GOTGCTL
    // =========================================================================

    pub fn read_gotgctl(&self) -> Gotgctl {
        Gotgctl::from_bits_retain(self.regs.read32(GOTGCTL))
    }

    pub fn write_gotgctl(&mut self, value: Gotgctl) {
        crate::ktrace!("(DWC2) GOTGCTL <- ", value.bits());
        self.regs.write32(GOTGCTL, value.bits());
    }

    /// Sessões válidas vistas pelo hardware: (A, B)
    pub fn session_valid(&self) -> (bool, bool) {
        let gotgctl = self.read_gotgctl();
        (
            gotgctl.contains(Gotgctl::ASESVLD),
            gotgctl.contains(Gotgctl::BSESVLD),
        )
    }

    /// Liga todos os overrides com valores "sem sessão".
    pub fn ovr_init(&mut self) {
        let mut gotgctl = self.read_gotgctl();
        self.enable_overrides(&mut gotgctl);
        gotgctl.remove(Gotgctl::OVR_VALUE);
        self.write_gotgctl(gotgctl);
    }

    /// Todos os enables de override (A, B e VBUS) mais o bypass de debounce.
    ///
    /// Sessão sem enable segue o pino.
    fn enable_overrides(&self, gotgctl: &mut Gotgctl) {
        *gotgctl |= Gotgctl::OVR_ENABLE;
        if self.params.debounce_bypass {
            *gotgctl |= Gotgctl::DBNCE_FLTR_BYPASS;
        }
    }

    /// Override da sessão A.
    ///
    /// `EALREADY` se o hardware já reporta o estado pedido (nada escrito).
    pub fn ovr_avalid(&mut self, valid: bool) -> Result<(), Errno> {
        let mut gotgctl = self.read_gotgctl();

        if valid == gotgctl.contains(Gotgctl::ASESVLD) {
            return Err(Errno::EALREADY);
        }

        self.enable_overrides(&mut gotgctl);
        gotgctl.remove(Gotgctl::BVALOVAL);
        if valid {
            gotgctl |= Gotgctl::AVALOVAL | Gotgctl::VBVALOVAL;
        } else {
            gotgctl.remove(Gotgctl::AVALOVAL | Gotgctl::VBVALOVAL);
        }
        self.write_gotgctl(gotgctl);
        Ok(())
    }

    /// Override da sessão B. Mesmas regras de `ovr_avalid`.
    pub fn ovr_bvalid(&mut self, valid: bool) -> Result<(), Errno> {
        let mut gotgctl = self.read_gotgctl();

        if valid == gotgctl.contains(Gotgctl::BSESVLD) {
            return Err(Errno::EALREADY);
        }

        self.enable_overrides(&mut gotgctl);
        gotgctl.remove(Gotgctl::AVALOVAL);
        if valid {
            gotgctl |= Gotgctl::BVALOVAL | Gotgctl::VBVALOVAL;
        } else {
            gotgctl.remove(Gotgctl::BVALOVAL | Gotgctl::VBVALOVAL);
        }
        self.write_gotgctl(gotgctl);
        Ok(())
    }

    /// Derruba as duas sessões de uma vez.
    ///
    /// `EALREADY` se nenhuma das duas estava válida.
    pub fn ovr_clear(&mut self) -> Result<(), Errno> {
        let mut gotgctl = self.read_gotgctl();

        if !gotgctl.intersects(Gotgctl::ASESVLD | Gotgctl::BSESVLD) {
            return Err(Errno::EALREADY);
        }

        self.enable_overrides(&mut gotgctl);
        gotgctl.remove(Gotgctl::OVR_VALUE);
        self.write_gotgctl(gotgctl);
        Ok(())
    }

    // =========================================================================
    // MODO (GUSBCFG / GINTSTS)
    // =========================================================================

    /// Modo atual do núcleo (GINTSTS.CURMOD)
    pub fn is_host_mode(&self) -> bool {
        Gintsts::from_bits_retain(self.regs.read32(GINTSTS)).contains(Gintsts::CURMODE_HOST)
    }

    /// Força o núcleo para host (`true`) ou device (`false`).
    ///
    /// Recusa (retorna `false`) forçar um modo que contradiz um `dr_mode`
    /// fixo. A troca gera Connector ID Status Change dentro do núcleo; não
    /// esperamos por ela aqui.
    pub fn force_mode(&mut self, host: bool) -> bool {
        match (host, self.params.dr_mode) {
            (true, DrMode::Peripheral) | (false, DrMode::Host) => {
                crate::kwarn!("(DWC2) Modo forçado contradiz dr_mode, host=", host);
                return false;
            }
            _ => {}
        }

        let mut gusbcfg = Gusbcfg::from_bits_retain(self.regs.read32(GUSBCFG));
        if host {
            gusbcfg.remove(Gusbcfg::FORCEDEVMODE);
            gusbcfg.insert(Gusbcfg::FORCEHOSTMODE);
        } else {
            gusbcfg.remove(Gusbcfg::FORCEHOSTMODE);
            gusbcfg.insert(Gusbcfg::FORCEDEVMODE);
        }
        crate::ktrace!("(DWC2) GUSBCFG <- ", gusbcfg.bits());
        self.regs.write32(GUSBCFG, gusbcfg.bits());
        true
    }

    /// Remove qualquer modo forçado (volta a seguir o pino ID)
    pub fn clear_force_mode(&mut self) {
        let mut gusbcfg = Gusbcfg::from_bits_retain(self.regs.read32(GUSBCFG));
        gusbcfg.remove(Gusbcfg::FORCEHOSTMODE | Gusbcfg::FORCEDEVMODE);
        crate::ktrace!("(DWC2) GUSBCFG <- ", gusbcfg.bits());
        self.regs.write32(GUSBCFG, gusbcfg.bits());
    }

    /// Reaplica o modo configurado no boot
    pub fn force_dr_mode(&mut self) {
        match self.params.dr_mode {
            DrMode::Host => {
                self.force_mode(true);
            }
            DrMode::Peripheral => {
                self.force_mode(false);
            }
            DrMode::Otg => self.clear_force_mode(),
        }
    }

    // =========================================================================
    // SOFT CONNECT (DCTL)
    // =========================================================================

    /// Liga o pull-up D+ (limpa DCTL.SFTDISCON)
    pub fn core_connect(&mut self) {
        let mut dctl = Dctl::from_bits_retain(self.regs.read32(DCTL));
        dctl.remove(Dctl::SFTDISCON);
        self.regs.write32(DCTL, dctl.bits());
    }

    /// Desliga o pull-up D+ (seta DCTL.SFTDISCON)
    pub fn core_disconnect(&mut self) {
        let mut dctl = Dctl::from_bits_retain(self.regs.read32(DCTL));
        dctl.insert(Dctl::SFTDISCON);
        self.regs.write32(DCTL, dctl.bits());
    }

    // =========================================================================
    // IRQ DE TROCA DE CONECTOR
    // =========================================================================

    /// Mascara (`false`) ou desmascara (`true`) GINTMSK.CONIDSTSCHNG
    pub fn set_conid_irq(&mut self, enabled: bool) {
        let mut gintmsk = Gintsts::from_bits_retain(self.regs.read32(GINTMSK));
        gintmsk.set(Gintsts::CONIDSTSCHNG, enabled);
        self.regs.write32(GINTMSK, gintmsk.bits());
    }

    /// Reconhece um CONIDSTSCHNG pendente. Retorna se havia um.
    pub fn ack_conid_irq(&mut self) -> bool {
        let gintsts = Gintsts::from_bits_retain(self.regs.read32(GINTSTS));
        if !gintsts.contains(Gintsts::CONIDSTSCHNG) {
            return false;
        }
        // W1C
        self.regs.write32(GINTSTS, Gintsts::CONIDSTSCHNG.bits());
        true
    }
}

/// Controlador DWC2: núcleo + lock do controlador + estado de teste.
///
/// Compartilhado (via `Arc`) entre o driver de plataforma, o handler de
/// IRQ e o árbitro DRD.
pub struct Hsotg<R: RegisterIo> {
    core: Spinlock<Dwc2Core<R>>,
    dr_mode: DrMode,
    test_mode: AtomicBool,
}

impl<R: RegisterIo> Hsotg<R> {
    pub fn new(regs: R, params: Dwc2Params) -> Self {
        Self {
            core: Spinlock::new(Dwc2Core::new(regs, params)),
            dr_mode: params.dr_mode,
            test_mode: AtomicBool::new(false),
        }
    }

    /// Toma o lock do controlador (irqsave)
    pub fn lock(&self) -> SpinlockGuard<'_, Dwc2Core<R>> {
        self.core.lock()
    }

    /// `dr_mode` é imutável: lido sem lock
    pub fn dr_mode(&self) -> DrMode {
        self.dr_mode
    }

    pub fn test_mode(&self) -> bool {
        self.test_mode.load(Ordering::Acquire)
    }

    /// Entra/sai de test mode (debugfs, compliance)
    pub fn set_test_mode(&self, on: bool) {
        self.test_mode.store(on, Ordering::Release);
        crate::kdebug!("(DWC2) Test mode=", on);
    }

    /// Parte do handler de IRQ do controlador que trata troca de conector.
    ///
    /// Retorna `true` se havia CONIDSTSCHNG pendente.
    pub fn handle_conid_irq(&self) -> bool {
        let mut core = self.lock();
        if !core.ack_conid_irq() {
            return false;
        }
        crate::kdebug!("(DWC2) Troca de conector, host=", core.is_host_mode());
        true
    }
}

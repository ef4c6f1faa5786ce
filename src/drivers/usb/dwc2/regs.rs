//! Registradores do núcleo DWC2 usados pelo DRD.
//!
//! Apenas o subconjunto necessário para override de sessão, forçar modo
//! e soft-connect. Offsets em bytes a partir da base do controlador.

use core::ptr::NonNull;

use bitflags::bitflags;
use volatile::VolatilePtr;

/// OTG Control and Status
pub const GOTGCTL: usize = 0x000;
/// USB Configuration
pub const GUSBCFG: usize = 0x00C;
/// Interrupt Status
pub const GINTSTS: usize = 0x014;
/// Interrupt Mask
pub const GINTMSK: usize = 0x018;
/// Device Control
pub const DCTL: usize = 0x804;

/// Tamanho da janela MMIO mapeada
pub const DWC2_MMIO_SIZE: usize = 0x1000;

bitflags! {
    /// GOTGCTL
    #[repr(transparent)]
    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    pub struct Gotgctl: u32 {
        const SESREQSCS = 1 << 0;
        const SESREQ = 1 << 1;
        const VBVALOEN = 1 << 2;
        const VBVALOVAL = 1 << 3;
        const AVALOEN = 1 << 4;
        const AVALOVAL = 1 << 5;
        const BVALOEN = 1 << 6;
        const BVALOVAL = 1 << 7;
        const HSTNEGSCS = 1 << 8;
        const HNPREQ = 1 << 9;
        const HSTSETHNPEN = 1 << 10;
        const DEVHNPEN = 1 << 11;
        const DBNCE_FLTR_BYPASS = 1 << 15;
        const CONID_B = 1 << 16;
        const DBNC_SHORT = 1 << 17;
        const ASESVLD = 1 << 18;
        const BSESVLD = 1 << 19;
        const OTGVER = 1 << 20;
        const CHIRPEN = 1 << 27;
    }
}

impl Gotgctl {
    /// Bits de habilitação de override
    pub const OVR_ENABLE: Self = Self::AVALOEN
        .union(Self::BVALOEN)
        .union(Self::VBVALOEN);

    /// Bits de valor de override
    pub const OVR_VALUE: Self = Self::AVALOVAL
        .union(Self::BVALOVAL)
        .union(Self::VBVALOVAL);
}

bitflags! {
    /// GUSBCFG (apenas bits de forçar modo)
    #[repr(transparent)]
    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    pub struct Gusbcfg: u32 {
        const FORCEHOSTMODE = 1 << 29;
        const FORCEDEVMODE = 1 << 30;
    }
}

bitflags! {
    /// GINTSTS / GINTMSK
    #[repr(transparent)]
    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    pub struct Gintsts: u32 {
        const CURMODE_HOST = 1 << 0;
        const CONIDSTSCHNG = 1 << 28;
    }
}

bitflags! {
    /// DCTL (apenas soft-disconnect)
    #[repr(transparent)]
    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    pub struct Dctl: u32 {
        const SFTDISCON = 1 << 1;
    }
}

/// Acesso de 32 bits ao bloco de registradores.
///
/// Separado do núcleo para que o mesmo código rode sobre MMIO real ou
/// sobre um modelo simulado.
pub trait RegisterIo: Send {
    fn read32(&self, offset: usize) -> u32;
    fn write32(&mut self, offset: usize, value: u32);
}

/// Registradores mapeados em memória
pub struct MmioRegs {
    base: NonNull<u32>,
}

// SAFETY: O bloco MMIO pertence exclusivamente a este objeto; o acesso é
// serializado pelo lock do controlador.
unsafe impl Send for MmioRegs {}

impl MmioRegs {
    /// # Safety
    ///
    /// `base` deve apontar para `DWC2_MMIO_SIZE` bytes de registradores DWC2
    /// mapeados como device memory, válidos e exclusivos por toda a vida do objeto.
    pub unsafe fn new(base: NonNull<u32>) -> Self {
        Self { base }
    }

    fn reg(&self, offset: usize) -> VolatilePtr<'_, u32> {
        debug_assert!(offset % 4 == 0 && offset < DWC2_MMIO_SIZE);
        // SAFETY: offset dentro da janela garantida por `new`
        unsafe { VolatilePtr::new(self.base.add(offset / 4)) }
    }
}

impl RegisterIo for MmioRegs {
    #[inline]
    fn read32(&self, offset: usize) -> u32 {
        self.reg(offset).read()
    }

    #[inline]
    fn write32(&mut self, offset: usize, value: u32) {
        self.reg(offset).write(value)
    }
}

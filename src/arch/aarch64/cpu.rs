//! Implementação aarch64 das operações de CPU (HAL).
//!
//! Controle de interrupções via PSTATE.DAIF. Apenas o bit I (IRQ) é
//! mascarado; FIQ/SError ficam como o firmware deixou.
//!
//! # Segurança
//! Assume execução em EL1.

use crate::arch::traits::cpu::{CpuOps, IrqFlags};
use core::arch::asm;

/// DAIF.I (bit 7)
const DAIF_IRQ: u64 = 1 << 7;

pub struct Arm64Cpu;

impl Arm64Cpu {
    #[inline]
    fn read_daif() -> u64 {
        let daif: u64;
        // SAFETY: Leitura de DAIF não tem efeitos colaterais em EL1
        unsafe {
            asm!("mrs {}, daif", out(reg) daif, options(nomem, nostack, preserves_flags));
        }
        daif
    }
}

impl CpuOps for Arm64Cpu {
    #[inline]
    fn disable_interrupts() {
        // SAFETY: Mascara IRQ; requer EL1
        unsafe {
            asm!("msr daifset, #2", options(nomem, nostack, preserves_flags));
        }
    }

    #[inline]
    fn enable_interrupts() {
        // SAFETY: Desmascara IRQ; pode causar preempção imediata
        unsafe {
            asm!("msr daifclr, #2", options(nomem, nostack, preserves_flags));
        }
    }

    #[inline]
    fn are_interrupts_enabled() -> bool {
        Self::read_daif() & DAIF_IRQ == 0
    }

    #[inline]
    fn local_irq_save() -> IrqFlags {
        let flags = IrqFlags(Self::read_daif());
        Self::disable_interrupts();
        flags
    }

    #[inline]
    fn local_irq_restore(flags: IrqFlags) {
        if flags.0 & DAIF_IRQ == 0 {
            Self::enable_interrupts();
        }
    }
}

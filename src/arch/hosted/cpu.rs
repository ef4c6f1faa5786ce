//! CPU emulada para builds hosted.

use crate::arch::traits::cpu::{CpuOps, IrqFlags};

// Sob `cargo test` cada thread de teste é uma "CPU" com seu próprio IF.
#[cfg(test)]
std::thread_local! {
    static IRQ_ENABLED: core::cell::Cell<bool> = const { core::cell::Cell::new(true) };
}

#[cfg(test)]
fn irq_enabled() -> bool {
    IRQ_ENABLED.with(|f| f.get())
}

#[cfg(test)]
fn set_irq_enabled(on: bool) {
    IRQ_ENABLED.with(|f| f.set(on));
}

#[cfg(not(test))]
static IRQ_ENABLED: core::sync::atomic::AtomicBool = core::sync::atomic::AtomicBool::new(true);

#[cfg(not(test))]
fn irq_enabled() -> bool {
    IRQ_ENABLED.load(core::sync::atomic::Ordering::Relaxed)
}

#[cfg(not(test))]
fn set_irq_enabled(on: bool) {
    IRQ_ENABLED.store(on, core::sync::atomic::Ordering::Relaxed);
}

pub struct HostedCpu;

impl CpuOps for HostedCpu {
    fn disable_interrupts() {
        set_irq_enabled(false);
    }

    fn enable_interrupts() {
        set_irq_enabled(true);
    }

    fn are_interrupts_enabled() -> bool {
        irq_enabled()
    }

    fn local_irq_save() -> IrqFlags {
        let flags = IrqFlags(irq_enabled() as u64);
        set_irq_enabled(false);
        flags
    }

    fn local_irq_restore(flags: IrqFlags) {
        set_irq_enabled(flags.0 != 0);
    }
}

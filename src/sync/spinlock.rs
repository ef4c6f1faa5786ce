//! Spinlock - bloqueio com busy-wait e interrupções mascaradas

use core::cell::UnsafeCell;
use core::ops::{Deref, DerefMut};
use core::sync::atomic::{AtomicBool, Ordering};

use crate::arch::{Cpu, CpuOps, IrqFlags};

/// Spinlock irqsave - usa busy-wait, NÃO pode dormir
///
/// Equivale a `spin_lock_irqsave`/`spin_unlock_irqrestore`: o estado de
/// interrupções da CPU local é salvo e mascarado antes de girar, e
/// restaurado exatamente como estava quando o guard sai de escopo.
///
/// # Quando usar
///
/// - Seções críticas MUITO curtas
/// - Dados também acessados de handlers de interrupção
///
/// # Quando NÃO usar
///
/// - Seções que podem demorar ou dormir
pub struct Spinlock<T> {
    locked: AtomicBool,
    data: UnsafeCell<T>,
}

// SAFETY: Spinlock protege acesso com lock atômico
unsafe impl<T: Send> Send for Spinlock<T> {}
unsafe impl<T: Send> Sync for Spinlock<T> {}

impl<T> Spinlock<T> {
    /// Cria novo spinlock
    pub const fn new(data: T) -> Self {
        Self {
            locked: AtomicBool::new(false),
            data: UnsafeCell::new(data),
        }
    }

    /// Adquire o lock
    pub fn lock(&self) -> SpinlockGuard<'_, T> {
        // Mascarar interrupções antes de adquirir
        let flags = Cpu::local_irq_save();

        while self
            .locked
            .compare_exchange_weak(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            core::hint::spin_loop();
        }

        SpinlockGuard { lock: self, flags }
    }

    /// Tenta adquirir sem bloquear
    pub fn try_lock(&self) -> Option<SpinlockGuard<'_, T>> {
        let flags = Cpu::local_irq_save();

        if self
            .locked
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_ok()
        {
            Some(SpinlockGuard { lock: self, flags })
        } else {
            // Não conseguiu, restaurar interrupções
            Cpu::local_irq_restore(flags);
            None
        }
    }

    /// Verifica se o lock está tomado (apenas diagnóstico)
    pub fn is_locked(&self) -> bool {
        self.locked.load(Ordering::Relaxed)
    }
}

/// Guard do spinlock - libera ao sair do escopo
pub struct SpinlockGuard<'a, T> {
    lock: &'a Spinlock<T>,
    flags: IrqFlags,
}

impl<T> Deref for SpinlockGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        // SAFETY: Lock está adquirido
        unsafe { &*self.lock.data.get() }
    }
}

impl<T> DerefMut for SpinlockGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        // SAFETY: Lock está adquirido
        unsafe { &mut *self.lock.data.get() }
    }
}

impl<T> Drop for SpinlockGuard<'_, T> {
    fn drop(&mut self) {
        self.lock.locked.store(false, Ordering::Release);
        Cpu::local_irq_restore(self.flags);
    }
}

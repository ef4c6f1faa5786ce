//! Testes de Sincronização
//!
//! Validam a semântica irqsave do `Spinlock`: interrupções mascaradas
//! enquanto o guard vive e restauradas exatamente como estavam.

use crate::arch::{Cpu, CpuOps};
use crate::klib::test_framework::{run_test_suite, SuiteReport, TestCase, TestResult};
use crate::sync::Spinlock;

/// Casos de teste de sync
const SYNC_TESTS: &[TestCase] = &[
    TestCase::new("spinlock_masks_irq", test_spinlock_masks_irq),
    TestCase::new("spinlock_keeps_irq_off", test_spinlock_keeps_irq_off),
    TestCase::new("spinlock_try_lock", test_spinlock_try_lock),
];

/// Executa todos os testes de sync
pub fn run_sync_tests() -> SuiteReport {
    run_test_suite("Sync", SYNC_TESTS)
}

fn test_spinlock_masks_irq() -> TestResult {
    let saved = Cpu::local_irq_save();
    Cpu::enable_interrupts();

    let lock = Spinlock::new(0u32);
    let masked = {
        let mut guard = lock.lock();
        *guard += 1;
        !Cpu::are_interrupts_enabled()
    };
    let restored = Cpu::are_interrupts_enabled();

    Cpu::local_irq_restore(saved);
    crate::kassert!(masked, "(Sync) IRQ habilitada com lock tomado");
    crate::kassert!(restored, "(Sync) IRQ não restaurada no unlock");
    TestResult::Passed
}

fn test_spinlock_keeps_irq_off() -> TestResult {
    let saved = Cpu::local_irq_save();

    let lock = Spinlock::new(());
    drop(lock.lock());
    let still_off = !Cpu::are_interrupts_enabled();

    Cpu::local_irq_restore(saved);
    crate::kassert!(still_off, "(Sync) unlock habilitou IRQ que estava desligada");
    TestResult::Passed
}

fn test_spinlock_try_lock() -> TestResult {
    let lock = Spinlock::new(5u8);
    {
        let _held = lock.lock();
        crate::kassert!(lock.is_locked(), "(Sync) lock não marcado");
        crate::kassert!(lock.try_lock().is_none(), "(Sync) try_lock com lock tomado");
    }
    crate::kassert!(!lock.is_locked(), "(Sync) lock não liberado");
    match lock.try_lock() {
        Some(guard) => crate::kassert!(*guard == 5, "(Sync) dado corrompido"),
        None => return TestResult::Failed,
    }
    TestResult::Passed
}

crate::host_tests!(
    test_spinlock_masks_irq,
    test_spinlock_keeps_irq_off,
    test_spinlock_try_lock,
);

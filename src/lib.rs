//! DWC2 Dual-Role Library.
//!
//! Árbitro de sessão USB2 dual-role (A/B) para o controlador DWC2 do
//! i.MX8, escrito para ser linkado por um kernel `no_std`.
//!
//! O kernel hospedeiro fornece:
//! - um alocador global (`Arc`/`Vec` usados no registry de listeners);
//! - um `LogSink` (opcional) via `drivers::serial::set_sink`;
//! - o mapeamento MMIO do controlador.

#![cfg_attr(not(test), no_std)]

extern crate alloc;

// --- Módulos de Baixo Nível ---
pub mod arch; // HAL (controle de interrupções)
pub mod drivers; // extcon, dwc2, serial

// --- Infraestrutura ---
pub mod core; // Logging
pub mod klib; // Ring, framework de testes
pub mod sync; // Spinlock irqsave
pub mod sys; // Errno

pub use crate::drivers::extcon::{Cable, CableDetector, ExtconDev};
pub use crate::drivers::usb::dwc2::{DrMode, DrdArbiter, Dwc2Driver, Hsotg, SessionState};

/// Executa todas as suites de self-test. Retorna `true` se nenhuma falhou.
#[cfg(feature = "self_test")]
pub fn run_self_tests() -> bool {
    let reports = [
        crate::sync::test::run_sync_tests(),
        crate::klib::test::run_klib_tests(),
        crate::drivers::test::run_driver_tests(),
    ];
    reports.iter().all(|r| r.ok())
}

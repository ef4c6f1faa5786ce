//! # Synchronization Primitives
//!
//! ## Hierarquia de Uso
//!
//! ```text
//! Spinlock     → Lock do controlador (irqsave, compartilhado com o IRQ handler)
//! spin::Mutex  → Estruturas nunca tocadas em contexto de IRQ
//! ```
//!
//! ## Regras
//!
//! - **Spinlock**: Nunca dormir segurando. Nunca chamar listeners segurando.

/// Spinlock irqsave (busy-wait, não dorme)
pub mod spinlock;

#[cfg(any(test, feature = "self_test"))]
pub mod test;

pub use spinlock::{Spinlock, SpinlockGuard};

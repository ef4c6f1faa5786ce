//! # Hardware Abstraction Layer (HAL)
//!
//! O módulo `arch` é a **única** ponte entre a lógica do árbitro e a CPU real.
//! Hoje a única coisa que a biblioteca precisa da CPU é mascarar interrupções
//! locais enquanto segura o lock do controlador (`spin_lock_irqsave`).
//!
//! ## Seleção de Plataforma
//! - `aarch64` + `target_os = "none"`: i.MX8 bare-metal, DAIF real.
//! - Qualquer outro alvo: `hosted`, IF emulado (testes no host).

pub mod traits;

#[cfg(all(target_arch = "aarch64", target_os = "none"))]
pub mod aarch64;

#[cfg(all(target_arch = "aarch64", target_os = "none"))]
pub use aarch64 as platform;

#[cfg(not(all(target_arch = "aarch64", target_os = "none")))]
pub mod hosted;

#[cfg(not(all(target_arch = "aarch64", target_os = "none")))]
pub use hosted as platform;

// Re-exports globais
pub use platform::Cpu;
pub use traits::*;

//! # DWC2 - Synopsys DesignWare HS OTG
//!
//! Somente a parte dual-role do driver: override de sessão A/B a partir
//! de um fornecedor de cabo externo, e o binding de plataforma mínimo para
//! ligá-la. O núcleo host/gadget (filas, endpoints, HCD) não vive aqui.
//!
//! | Arquivo       | Conteúdo                                   |
//! |---------------|--------------------------------------------|
//! | `regs.rs`     | Offsets, bitfields, acesso MMIO            |
//! | `core.rs`     | Operações de registrador + lock do núcleo  |
//! | `params.rs`   | `dr_mode` e parâmetros do probe            |
//! | `drd.rs`      | Árbitro de sessão                          |
//! | `platform.rs` | `Driver` (probe/remove/suspend/resume)     |

pub mod core;
pub mod drd;
pub mod error;
pub mod params;
pub mod platform;
pub mod regs;

#[cfg(any(test, feature = "self_test"))]
pub mod sim;


pub use self::core::{Dwc2Core, Hsotg};
pub use drd::{CableSnapshot, DrdArbiter, ReconcileOutcome, SessionState};
pub use error::{DrdError, DrdResult};
pub use params::{DrMode, Dwc2Params};
pub use platform::{Dwc2Driver, Dwc2Instance};
pub use regs::{MmioRegs, RegisterIo};

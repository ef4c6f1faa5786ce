//! # Driver Layer
//!
//! ```text
//! ┌──────────────────────┐   eventos    ┌──────────────────────┐
//! │ extcon (cabo)        │ ───────────► │ usb::dwc2::drd       │
//! │ Type-C / GPIO / PHY  │ ◄─────────── │ árbitro de sessão    │
//! └──────────────────────┘  get_state   └──────────┬───────────┘
//!                                                  │ lock irqsave
//!                                       ┌──────────▼───────────┐
//!                                       │ usb::dwc2::core      │
//!                                       │ GOTGCTL/GUSBCFG/DCTL │
//!                                       └──────────────────────┘
//! ```

pub mod base; // Device/Driver
pub mod extcon; // Fornecedores de estado de cabo
pub mod serial; // Backend de log
pub mod usb; // DWC2

#[cfg(any(test, feature = "self_test"))]
pub mod test;

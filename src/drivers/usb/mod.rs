//! Drivers USB
//!
//! # Drivers
//! - DWC2 (USB 2.0 HS OTG), parte dual-role

pub mod dwc2;

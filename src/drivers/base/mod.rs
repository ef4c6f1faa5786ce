//! Modelo de Drivers Base

pub mod device;
pub mod driver;

pub use device::{Device, DeviceId, MmioResource, PropValue, Property};
pub use driver::{DeviceType, Driver, DriverError};

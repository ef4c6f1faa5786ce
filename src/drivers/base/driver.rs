//! Trait base para drivers

use super::device::Device;
use crate::sys::Errno;

/// Tipo de dispositivo
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DeviceType {
    Bus,
    Unknown,
}

/// Erro de driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverError {
    NotFound,
    InitFailed,
    /// Dependência ainda não pronta: o driver core deve tentar de novo
    ProbeDefer,
    InvalidConfig,
    NoResource,
}

impl DriverError {
    pub fn to_errno(self) -> Errno {
        match self {
            DriverError::NotFound => Errno::ENODEV,
            DriverError::InitFailed => Errno::EIO,
            DriverError::ProbeDefer => Errno::EPROBE_DEFER,
            DriverError::InvalidConfig => Errno::EINVAL,
            DriverError::NoResource => Errno::ENXIO,
        }
    }
}

/// Trait que todo driver deve implementar
pub trait Driver: Send + Sync {
    /// Nome do driver
    fn name(&self) -> &'static str;

    /// Tipo de dispositivo
    fn device_type(&self) -> DeviceType;

    /// Chamado quando dispositivo é detectado
    fn probe(&self, dev: &mut Device) -> Result<(), DriverError>;

    /// Chamado quando dispositivo é removido
    fn remove(&self, dev: &mut Device) -> Result<(), DriverError>;

    /// Chamado durante suspend
    fn suspend(&self, _dev: &mut Device) -> Result<(), DriverError> {
        Ok(())
    }

    /// Chamado durante resume
    fn resume(&self, _dev: &mut Device) -> Result<(), DriverError> {
        Ok(())
    }
}

//! Abstração de dispositivo

use alloc::sync::Arc;

use super::driver::DeviceType;
use crate::drivers::extcon::CableDetector;

/// ID de dispositivo
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceId(pub u64);

/// Valor de propriedade de configuração (device tree)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropValue {
    Str(&'static str),
    Flag,
}

/// Propriedade nomeada
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Property {
    pub name: &'static str,
    pub value: PropValue,
}

impl Property {
    pub const fn str(name: &'static str, value: &'static str) -> Self {
        Self {
            name,
            value: PropValue::Str(value),
        }
    }

    pub const fn flag(name: &'static str) -> Self {
        Self {
            name,
            value: PropValue::Flag,
        }
    }
}

/// Janela MMIO do dispositivo
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MmioResource {
    pub base: usize,
    pub size: usize,
}

/// Representação de um dispositivo
pub struct Device {
    pub id: DeviceId,
    pub device_type: DeviceType,
    pub mmio: Option<MmioResource>,
    pub properties: &'static [Property],
    /// Fornecedor de cabo referenciado pela configuração (`extcon = <&...>`)
    pub extcon: Option<Arc<dyn CableDetector>>,
}

impl Device {
    pub fn new(id: DeviceId) -> Self {
        Self {
            id,
            device_type: DeviceType::Unknown,
            mmio: None,
            properties: &[],
            extcon: None,
        }
    }

    /// Propriedade string, se existir
    pub fn property_str(&self, name: &str) -> Option<&'static str> {
        self.properties.iter().find_map(|p| match p.value {
            PropValue::Str(s) if p.name == name => Some(s),
            _ => None,
        })
    }

    /// Propriedade booleana (presença)
    pub fn property_flag(&self, name: &str) -> bool {
        self.properties.iter().any(|p| p.name == name)
    }
}

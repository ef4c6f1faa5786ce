//! Parâmetros de configuração do controlador.
//!
//! Vêm das propriedades do dispositivo (device tree). Fixos após o probe.

use super::error::{DrdError, DrdResult};

/// Papel dual-role configurado no boot (`dr_mode`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrMode {
    /// Apenas host
    Host,
    /// Apenas peripheral (gadget)
    Peripheral,
    /// Dual-role, papel decidido em tempo de execução
    Otg,
}

impl DrMode {
    /// Converte o valor da propriedade `dr_mode`.
    ///
    /// Ausente = `Otg`, como o controlador sai de reset.
    pub fn from_property(value: Option<&str>) -> DrdResult<Self> {
        match value {
            None | Some("otg") => Ok(DrMode::Otg),
            Some("host") => Ok(DrMode::Host),
            Some("peripheral") => Ok(DrMode::Peripheral),
            Some(_) => Err(DrdError::InvalidConfig),
        }
    }
}

/// Parâmetros do núcleo DWC2 relevantes para o DRD
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dwc2Params {
    pub dr_mode: DrMode,
    /// Bypass do filtro de debounce de sessão (o override já é "limpo")
    pub debounce_bypass: bool,
}

impl Dwc2Params {
    pub const fn new(dr_mode: DrMode) -> Self {
        Self {
            dr_mode,
            debounce_bypass: true,
        }
    }
}

impl Default for Dwc2Params {
    fn default() -> Self {
        Self::new(DrMode::Otg)
    }
}

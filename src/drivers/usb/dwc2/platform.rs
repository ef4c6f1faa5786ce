//! Driver de plataforma DWC2 (parte dual-role).
//!
//! `probe` monta o controlador a partir da configuração do dispositivo e
//! liga o árbitro DRD; `remove` desfaz as inscrições; `suspend`/`resume`
//! repassam ao DRD.

use alloc::boxed::Box;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::ptr::NonNull;

use spin::Mutex;

use super::core::Hsotg;
use super::drd::DrdArbiter;
use super::error::DrdError;
use super::params::{DrMode, Dwc2Params};
use super::regs::{MmioRegs, RegisterIo, DWC2_MMIO_SIZE};
use crate::drivers::base::{Device, DeviceId, DeviceType, Driver, DriverError};

/// Fábrica de acesso a registradores para um dispositivo
pub type RegsFactory<R> = Box<dyn Fn(&Device) -> Result<R, DriverError> + Send + Sync>;

/// Instância ligada a um dispositivo
pub struct Dwc2Instance<R: RegisterIo + 'static> {
    pub hsotg: Arc<Hsotg<R>>,
    pub drd: Option<Arc<DrdArbiter<R>>>,
}

impl<R: RegisterIo + 'static> Clone for Dwc2Instance<R> {
    fn clone(&self) -> Self {
        Self {
            hsotg: self.hsotg.clone(),
            drd: self.drd.clone(),
        }
    }
}

/// Driver DWC2
pub struct Dwc2Driver<R: RegisterIo + 'static> {
    map_regs: RegsFactory<R>,
    bound: Mutex<Vec<(DeviceId, Dwc2Instance<R>)>>,
}

impl Dwc2Driver<MmioRegs> {
    /// Driver sobre MMIO real, usando o recurso do dispositivo.
    ///
    /// A janela já deve estar mapeada (identidade ou HHDM) no endereço
    /// informado em `Device::mmio`.
    pub fn mmio() -> Self {
        Self::new(Box::new(|dev: &Device| {
            let res = dev.mmio.ok_or(DriverError::NoResource)?;
            if res.size < DWC2_MMIO_SIZE {
                return Err(DriverError::NoResource);
            }
            let base = NonNull::new(res.base as *mut u32).ok_or(DriverError::NoResource)?;
            // SAFETY: recurso descrito pela plataforma e exclusivo deste dispositivo
            Ok(unsafe { MmioRegs::new(base) })
        }))
    }
}

impl<R: RegisterIo + 'static> Dwc2Driver<R> {
    pub fn new(map_regs: RegsFactory<R>) -> Self {
        Self {
            map_regs,
            bound: Mutex::new(Vec::new()),
        }
    }

    /// Lê `dr_mode` das propriedades do dispositivo
    pub fn params_from_device(dev: &Device) -> Result<Dwc2Params, DrdError> {
        let dr_mode = DrMode::from_property(dev.property_str("dr_mode"))?;
        let mut params = Dwc2Params::new(dr_mode);
        if dev.property_flag("snps,no-debounce-bypass") {
            params.debounce_bypass = false;
        }
        Ok(params)
    }

    /// Instância ligada a `id`
    pub fn instance(&self, id: DeviceId) -> Option<Dwc2Instance<R>> {
        self.bound
            .lock()
            .iter()
            .find(|(dev_id, _)| *dev_id == id)
            .map(|(_, inst)| inst.clone())
    }

    /// Handler de IRQ do controlador (apenas troca de conector)
    pub fn handle_irq(&self, id: DeviceId) -> bool {
        match self.instance(id) {
            Some(inst) => inst.hsotg.handle_conid_irq(),
            None => false,
        }
    }
}

fn to_driver_error(e: DrdError) -> DriverError {
    match e {
        DrdError::RetryLater(_) => DriverError::ProbeDefer,
        DrdError::InvalidConfig => DriverError::InvalidConfig,
        DrdError::NoResource => DriverError::NoResource,
        DrdError::Registration(_) => DriverError::InitFailed,
    }
}

impl<R: RegisterIo + 'static> Driver for Dwc2Driver<R> {
    fn name(&self) -> &'static str {
        "dwc2"
    }

    fn device_type(&self) -> DeviceType {
        DeviceType::Bus
    }

    fn probe(&self, dev: &mut Device) -> Result<(), DriverError> {
        if self.instance(dev.id).is_some() {
            return Err(DriverError::InitFailed);
        }

        let params = Self::params_from_device(dev).map_err(|e| {
            crate::kerror!("(DWC2) Propriedade dr_mode inválida");
            to_driver_error(e)
        })?;
        let regs = (self.map_regs)(dev)?;
        let hsotg = Arc::new(Hsotg::new(regs, params));

        let drd = DrdArbiter::initialize(hsotg.clone(), dev.extcon.clone())
            .map_err(to_driver_error)?;

        self.bound.lock().push((dev.id, Dwc2Instance { hsotg, drd }));
        dev.device_type = self.device_type();
        crate::kok!("(DWC2) Probe concluído");
        Ok(())
    }

    fn remove(&self, dev: &mut Device) -> Result<(), DriverError> {
        let inst = {
            let mut bound = self.bound.lock();
            let pos = bound
                .iter()
                .position(|(id, _)| *id == dev.id)
                .ok_or(DriverError::NotFound)?;
            bound.remove(pos).1
        };
        if let Some(drd) = inst.drd {
            drd.exit();
        }
        crate::kdebug!("(DWC2) Removido, id=", dev.id.0);
        Ok(())
    }

    fn suspend(&self, dev: &mut Device) -> Result<(), DriverError> {
        let inst = self.instance(dev.id).ok_or(DriverError::NotFound)?;
        if let Some(drd) = inst.drd {
            drd.suspend();
        }
        Ok(())
    }

    fn resume(&self, dev: &mut Device) -> Result<(), DriverError> {
        let inst = self.instance(dev.id).ok_or(DriverError::NotFound)?;
        if let Some(drd) = inst.drd {
            drd.resume();
        }
        Ok(())
    }
}

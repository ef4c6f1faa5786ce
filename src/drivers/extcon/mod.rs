//! # Extcon - Detecção de Cabo Externo
//!
//! Abstração do "fornecedor de estado de cabo": um chip de Type-C, um GPIO
//! de ID/VBUS ou o próprio PHY. O consumidor (ex: o árbitro DRD do DWC2)
//! consulta estados e se inscreve para ser avisado de mudanças.
//!
//! ## Canais
//!
//! | Cabo          | Significado                       |
//! |---------------|-----------------------------------|
//! | `Cable::Host` | Cabo de host (ID aterrado, A)     |
//! | `Cable::Device` | Cabo de device (VBUS de host, B) |
//!
//! ## Entrega de eventos
//!
//! Eventos são entregues de contexto não especificado (thread de IRQ,
//! workqueue, chamada síncrona de configuração). Listeners não podem
//! dormir e não devem assumir ordem entre cabos diferentes.

use alloc::sync::Arc;

use crate::sys::Errno;

pub mod device;
pub mod notifier;

#[cfg(any(test, feature = "self_test"))]
pub mod test;

pub use device::ExtconDev;
pub use notifier::NotifierChain;

/// Canal de cabo
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cable {
    /// EXTCON_USB_HOST
    Host,
    /// EXTCON_USB
    Device,
}

impl Cable {
    pub const ALL: [Cable; 2] = [Cable::Host, Cable::Device];

    pub const fn index(self) -> usize {
        match self {
            Cable::Host => 0,
            Cable::Device => 1,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Cable::Host => "USB-HOST",
            Cable::Device => "USB",
        }
    }
}

/// Notificação de mudança de estado.
///
/// O payload é informativo; consumidores devem reler o estado atual.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CableEvent {
    pub cable: Cable,
    pub attached: bool,
}

/// Resposta de um listener (semântica de notifier chain)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyResult {
    /// Não interessado
    Done,
    /// Tratado, continuar a cadeia
    Ok,
    /// Tratado, interromper a cadeia
    Stop,
}

/// Identificador de inscrição, usado para cancelar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenerId(pub u32);

/// Observador de eventos de cabo
pub trait CableListener: Send + Sync {
    fn on_cable_event(&self, event: CableEvent) -> NotifyResult;
}

/// Fornecedor de estado de cabo
pub trait CableDetector: Send + Sync {
    /// Nome do fornecedor (para logs)
    fn name(&self) -> &'static str;

    /// Estado atual do cabo.
    ///
    /// `Ok(true)` conectado, `Ok(false)` desconectado, `Err` desconhecido
    /// (cabo não suportado ou fornecedor sem leitura válida).
    fn get_state(&self, cable: Cable) -> Result<bool, Errno>;

    /// Inscreve `listener` nos eventos de `cable`.
    ///
    /// `EPROBE_DEFER` indica que o fornecedor ainda não está pronto.
    fn register(&self, cable: Cable, listener: Arc<dyn CableListener>)
        -> Result<ListenerId, Errno>;

    /// Cancela uma inscrição
    fn unregister(&self, id: ListenerId) -> Result<(), Errno>;
}

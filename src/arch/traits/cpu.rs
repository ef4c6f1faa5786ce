//! Interface Abstrata de CPU (HAL).
//! Define as operações que qualquer arquitetura deve implementar para que
//! as primitivas de `sync` possam mascarar interrupções locais.

/// Estado de interrupções salvo por `local_irq_save`.
///
/// Opaco para o resto da biblioteca: só faz sentido devolvê-lo a
/// `local_irq_restore` na mesma CPU.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IrqFlags(pub(crate) u64);

pub trait CpuOps {
    /// Desabilita interrupções locais.
    fn disable_interrupts();

    /// Habilita interrupções locais.
    fn enable_interrupts();

    /// Verifica se as interrupções estão habilitadas.
    fn are_interrupts_enabled() -> bool;

    /// Salva o estado atual e desabilita interrupções (irqsave).
    fn local_irq_save() -> IrqFlags;

    /// Restaura exatamente o estado salvo por `local_irq_save`.
    fn local_irq_restore(flags: IrqFlags);
}

//! Plataforma "hosted": builds fora do bare-metal (testes no host, CI).
//!
//! Não existe controlador de interrupções; o estado IF é emulado para que
//! `Spinlock` mantenha a mesma semântica irqsave observável.

pub mod cpu;

pub use cpu::HostedCpu as Cpu;

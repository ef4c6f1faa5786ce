//! Suporte aarch64 bare-metal (i.MX8, Cortex-A53/A72).

pub mod cpu;

pub use cpu::Arm64Cpu as Cpu;

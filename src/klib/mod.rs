//! Kernel Library (KLib).
//!
//! Utilitários agnósticos de hardware para uso interno da biblioteca.

pub mod ring;
pub mod test_framework;


pub use ring::Ring;

//! System Definitions.
//!
//! Contém os tipos que definem a interface entre a biblioteca e o kernel hospedeiro.

pub mod error;

pub use error::Errno;

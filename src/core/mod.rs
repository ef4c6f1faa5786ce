//! Infraestrutura comum: logging.

pub mod logging;

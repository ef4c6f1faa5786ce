//! # Standard Error Codes (Errno)
//!
//! Códigos de erro trocados entre a biblioteca e o kernel que a hospeda.
//! Segue a numeração do Linux para que `probe` possa devolver o mesmo
//! código que o driver core espera (em especial `EPROBE_DEFER`).

#[allow(non_camel_case_types)]
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Errno {
    ENOENT = 2,  // No such file or directory
    EIO = 5,     // I/O error
    ENXIO = 6,   // No such device or address
    EAGAIN = 11, // Try again
    ENODEV = 19, // No such device
    EINVAL = 22, // Invalid argument
    EALREADY = 114, // Operation already in progress

    // Internos do driver core (nunca vistos pelo userspace)
    EPROBE_DEFER = 517, // Driver requests probe retry
}

impl Errno {
    /// "Tente de novo mais tarde": o fornecedor ainda não existe.
    pub fn is_retry_later(self) -> bool {
        matches!(self, Errno::EPROBE_DEFER | Errno::EAGAIN)
    }

    /// Nome curto para logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Errno::ENOENT => "ENOENT",
            Errno::EIO => "EIO",
            Errno::ENXIO => "ENXIO",
            Errno::EAGAIN => "EAGAIN",
            Errno::ENODEV => "ENODEV",
            Errno::EINVAL => "EINVAL",
            Errno::EALREADY => "EALREADY",
            Errno::EPROBE_DEFER => "EPROBE_DEFER",
        }
    }
}

impl core::fmt::Display for Errno {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

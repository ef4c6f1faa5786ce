// =============================================================================
// SERIAL LOG BACKEND - ZERO OVERHEAD
// =============================================================================
//
// Backend serial para o logging da biblioteca.
//
// ARQUITETURA:
// A biblioteca não é dona da UART da placa. O kernel que a linka registra
// um `LogSink` uma única vez durante o early-boot e todas as macros de log
// (kinfo!, kdebug!, ...) escrevem através dele.
//
// - SEM core::fmt - Apenas bytes, strings e hex
// - SEM alocação
// - SEM sink registrado = logs descartados silenciosamente
//
// FUNÇÕES DISPONÍVEIS:
// - emit(byte)       : Envia um byte
// - emit_str(s)      : Envia string
// - emit_hex(v)      : Envia u64 em hexadecimal
// - emit_nl()        : Envia newline (\r\n)
//
// NOTA IMPORTANTE:
// O sink NÃO garante exclusão mútua entre CPUs. Em ambiente SMP,
// os logs podem se intercalar. Isso é aceitável para debugging.
//
// =============================================================================

use core::ptr::NonNull;

use spin::Once;
use volatile::VolatilePtr;

/// Destino dos bytes de log.
///
/// Implementações devem ser chamáveis de contexto de interrupção: nada de
/// dormir, nada de alocar.
pub trait LogSink: Sync {
    fn put(&self, byte: u8);
}

static SINK: Once<&'static dyn LogSink> = Once::new();

/// Registra o sink global de log.
///
/// Retorna `false` se já havia um sink registrado (o primeiro vence).
pub fn set_sink(sink: &'static dyn LogSink) -> bool {
    let mut installed = false;
    SINK.call_once(|| {
        installed = true;
        sink
    });
    installed
}

// =============================================================================
// FUNÇÕES DE ESCRITA - CORE
// =============================================================================

/// Envia um único byte para o sink.
#[inline(always)]
pub fn emit(byte: u8) {
    if let Some(sink) = SINK.get() {
        sink.put(byte);
    }
}

/// Envia uma string para o sink.
#[inline(never)]
pub fn emit_str(s: &str) {
    if let Some(sink) = SINK.get() {
        for &b in s.as_bytes() {
            sink.put(b);
        }
    }
}

/// Envia uma nova linha (CRLF).
#[inline(never)]
pub fn emit_nl() {
    emit(b'\r');
    emit(b'\n');
}

// =============================================================================
// FUNÇÕES DE ESCRITA - FORMATAÇÃO NUMÉRICA
// =============================================================================

/// Envia um valor u64 em formato hexadecimal.
///
/// Formato de saída: 0x0123456789ABCDEF (sempre 18 caracteres)
#[inline(never)]
pub fn emit_hex(value: u64) {
    emit(b'0');
    emit(b'x');
    let mut shift = 60i32;
    while shift >= 0 {
        let nibble = ((value >> shift) & 0xF) as u8;
        emit(if nibble < 10 {
            b'0' + nibble
        } else {
            b'A' + (nibble - 10)
        });
        shift -= 4;
    }
}

// =============================================================================
// LPUART32 (i.MX8) - SINK MMIO
// =============================================================================

// Offsets dos registradores (bytes)
const LPUART_STAT: usize = 0x14;
const LPUART_DATA: usize = 0x1C;

// STAT.TDRE: Transmit Data Register Empty
const STAT_TDRE: u32 = 1 << 23;

/// Console LPUART32 já configurado pelo bootloader (baud, pinmux, clock).
///
/// Apenas transmite: espera TDRE e escreve em DATA.
pub struct Lpuart {
    base: NonNull<u32>,
}

// SAFETY: Acesso é apenas MMIO volátil; o hardware serializa os bytes.
unsafe impl Send for Lpuart {}
unsafe impl Sync for Lpuart {}

impl Lpuart {
    /// # Safety
    ///
    /// `base` deve apontar para o bloco de registradores de uma LPUART32
    /// mapeado como device memory e válido por toda a vida do objeto.
    pub const unsafe fn new(base: NonNull<u32>) -> Self {
        Self { base }
    }

    fn reg(&self, offset: usize) -> VolatilePtr<'_, u32> {
        // SAFETY: offset dentro do bloco, garantido pelo contrato de `new`
        unsafe { VolatilePtr::new(self.base.add(offset / 4)) }
    }
}

impl LogSink for Lpuart {
    fn put(&self, byte: u8) {
        // Espera o buffer de transmissão ficar vazio
        while self.reg(LPUART_STAT).read() & STAT_TDRE == 0 {
            core::hint::spin_loop();
        }
        self.reg(LPUART_DATA).write(byte as u32);
    }
}

// =============================================================================
// SINK DE TESTE (HOST)
// =============================================================================

#[cfg(test)]
mod host_sink {
    use std::cell::RefCell;
    use std::string::String;
    use std::vec::Vec;

    std::thread_local! {
        static LINE: RefCell<Vec<u8>> = const { RefCell::new(Vec::new()) };
    }

    /// Junta bytes por linha e escreve no stderr capturado pelo harness.
    pub struct StderrSink;

    impl super::LogSink for StderrSink {
        fn put(&self, byte: u8) {
            if byte == b'\r' {
                return;
            }
            LINE.with(|line| {
                let mut line = line.borrow_mut();
                line.push(byte);
                if byte == b'\n' {
                    std::eprint!("{}", String::from_utf8_lossy(&line));
                    line.clear();
                }
            });
        }
    }

    pub static STDERR_SINK: StderrSink = StderrSink;

    pub fn pending() -> usize {
        LINE.with(|line| line.borrow().len())
    }
}

/// Liga os logs ao stderr do `cargo test` (exibido quando o teste falha).
#[cfg(test)]
pub fn install_test_sink() {
    let _ = set_sink(&host_sink::STDERR_SINK);
}

/// Bytes da linha corrente ainda não enviados ao stderr (thread atual)
#[cfg(test)]
pub fn test_sink_pending() -> usize {
    host_sink::pending()
}

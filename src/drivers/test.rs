//! Testes de Drivers
//!
//! Agrega as suites de extcon e DWC2 e valida o sink LPUART sobre
//! memória comum no lugar do MMIO.

use core::ptr::NonNull;

use crate::drivers::serial::{LogSink, Lpuart};
use crate::klib::test_framework::{run_test_suite, SuiteReport, TestCase, TestResult};

const SERIAL_TESTS: &[TestCase] = &[TestCase::new("lpuart_transmit", test_lpuart_transmit)];

/// Executa todos os testes de drivers
pub fn run_driver_tests() -> SuiteReport {
    let reports = [
        run_test_suite("Serial", SERIAL_TESTS),
        crate::drivers::extcon::test::run_extcon_tests(),
        crate::drivers::usb::dwc2::test::run_drd_tests(),
    ];

    let mut total = SuiteReport::default();
    for r in reports {
        total.passed += r.passed;
        total.failed += r.failed;
        total.skipped += r.skipped;
    }
    total
}

fn test_lpuart_transmit() -> TestResult {
    // STAT (0x14) com TDRE setado, DATA em 0x1C
    let mut regs = [0u32; 8];
    regs[0x14 / 4] = 1 << 23;

    let Some(base) = NonNull::new(regs.as_mut_ptr()) else {
        return TestResult::Failed;
    };
    // SAFETY: `regs` cobre o bloco inteiro e vive até o fim do teste
    let uart = unsafe { Lpuart::new(base) };
    uart.put(b'A');
    uart.put(b'\n');

    // SAFETY: leitura volátil do mesmo buffer, sem outro acesso concorrente
    let data = unsafe { core::ptr::read_volatile(base.as_ptr().add(0x1C / 4)) };
    crate::kassert!(data == b'\n' as u32, "(Serial) último byte não chegou em DATA");
    TestResult::Passed
}

crate::host_tests!(test_lpuart_transmit);

/// Mensagens de `kassert!` chegam ao stderr nos testes de host.
#[cfg(test)]
mod log_sink {
    use crate::drivers::serial::{self, emit_str, install_test_sink, test_sink_pending};
    use crate::klib::test_framework::TestResult;

    fn failing_case() -> TestResult {
        crate::kassert!(1 + 1 == 3, "(Serial) falha esperada");
        TestResult::Passed
    }

    #[test]
    fn kassert_message_reaches_sink() {
        install_test_sink();
        // Já existe um sink: o segundo registro é recusado
        assert!(!serial::set_sink(&NULL_SINK));

        emit_str("parcial");
        assert_eq!(test_sink_pending(), "parcial".len());
        serial::emit_nl();
        assert_eq!(test_sink_pending(), 0);

        assert_eq!(failing_case(), TestResult::Failed);
        assert_eq!(test_sink_pending(), 0);
    }

    struct NullSink;

    impl serial::LogSink for NullSink {
        fn put(&self, _byte: u8) {}
    }

    static NULL_SINK: NullSink = NullSink;
}

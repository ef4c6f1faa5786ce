//! Framework de testes da biblioteca
//!
//! As suites rodam de dois jeitos:
//! - No boot do kernel, com a feature `self_test` (`run_test_suite`).
//! - No host, via `cargo test`: cada `TestCase` também ganha um `#[test]`.

/// Resultado de teste
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestResult {
    Passed,
    Failed,
    Skipped,
}

/// Um caso de teste
pub struct TestCase {
    pub name: &'static str,
    pub func: fn() -> TestResult,
}

impl TestCase {
    pub const fn new(name: &'static str, func: fn() -> TestResult) -> Self {
        Self { name, func }
    }
}

/// Totais de uma suite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SuiteReport {
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl SuiteReport {
    pub fn ok(&self) -> bool {
        self.failed == 0
    }
}

/// Executa suite de testes
pub fn run_test_suite(name: &str, tests: &[TestCase]) -> SuiteReport {
    crate::drivers::serial::emit_str(crate::core::logging::P_INFO);
    crate::drivers::serial::emit_str("=== Suite: ");
    crate::drivers::serial::emit_str(name);
    crate::drivers::serial::emit_nl();

    let mut report = SuiteReport::default();

    for test in tests {
        match (test.func)() {
            TestResult::Passed => {
                report_line("\x1b[32m[PASS]\x1b[0m ", test.name);
                report.passed += 1;
            }
            TestResult::Failed => {
                report_line("\x1b[1;31m[FAIL]\x1b[0m ", test.name);
                report.failed += 1;
            }
            TestResult::Skipped => {
                report_line("\x1b[1;33m[SKIP]\x1b[0m ", test.name);
                report.skipped += 1;
            }
        }
    }

    crate::kinfo!("Resultados: passed=", report.passed);
    if report.failed != 0 {
        crate::kerror!("Resultados: failed=", report.failed);
    }
    report
}

fn report_line(tag: &str, name: &str) {
    crate::drivers::serial::emit_str(tag);
    crate::drivers::serial::emit_str(name);
    crate::drivers::serial::emit_nl();
}

/// Falha o teste (retornando `TestResult::Failed`) se a condição for falsa.
#[macro_export]
macro_rules! kassert {
    ($cond:expr, $msg:expr) => {
        if !$cond {
            $crate::kerror!($msg);
            return $crate::klib::test_framework::TestResult::Failed;
        }
    };
}

/// Gera um `#[test]` de host para cada caso da suite.
///
/// ```rust
/// crate::host_tests!(test_ring_fifo, test_ring_full);
/// ```
#[macro_export]
macro_rules! host_tests {
    ($($name:ident),* $(,)?) => {
    };
}

//! Testes do extcon

use alloc::sync::Arc;
use alloc::vec::Vec;
use core::sync::atomic::{AtomicU32, Ordering};

use spin::Mutex;

use super::device::PENDING_EVENTS;
use super::{Cable, CableDetector, CableEvent, CableListener, ExtconDev, ListenerId, NotifyResult};
use crate::klib::test_framework::{run_test_suite, SuiteReport, TestCase, TestResult};
use crate::sys::Errno;

/// Casos de teste do extcon
const EXTCON_TESTS: &[TestCase] = &[
    TestCase::new("state_transitions", test_state_transitions),
    TestCase::new("unsupported_and_unknown", test_unsupported_and_unknown),
    TestCase::new("dispatch_in_order", test_dispatch_in_order),
    TestCase::new("per_cable_chains", test_per_cable_chains),
    TestCase::new("stop_halts_chain", test_stop_halts_chain),
    TestCase::new("queue_overflow", test_queue_overflow),
    TestCase::new("unavailable_defers", test_unavailable_defers),
    TestCase::new("unregister_from_callback", test_unregister_from_callback),
];

/// Executa todos os testes do extcon
pub fn run_extcon_tests() -> SuiteReport {
    run_test_suite("Extcon", EXTCON_TESTS)
}

/// Listener que grava o que recebeu
struct Recorder {
    seen: Mutex<Vec<CableEvent>>,
    reply: NotifyResult,
}

impl Recorder {
    fn new(reply: NotifyResult) -> Arc<Self> {
        Arc::new(Self {
            seen: Mutex::new(Vec::new()),
            reply,
        })
    }

    fn seen(&self) -> Vec<CableEvent> {
        self.seen.lock().clone()
    }
}

impl CableListener for Recorder {
    fn on_cable_event(&self, event: CableEvent) -> NotifyResult {
        self.seen.lock().push(event);
        self.reply
    }
}

fn test_state_transitions() -> TestResult {
    let edev = ExtconDev::new("gpio-usb", &Cable::ALL);
    crate::kassert!(edev.get_state(Cable::Host) == Ok(false), "(Extcon) estado inicial");

    crate::kassert!(edev.set_state(Cable::Host, true) == Ok(true), "(Extcon) transição não vista");
    crate::kassert!(edev.set_state(Cable::Host, true) == Ok(false), "(Extcon) mesmo estado gerou transição");
    crate::kassert!(edev.pending() == 1, "(Extcon) um evento por transição física");
    crate::kassert!(edev.get_state(Cable::Host) == Ok(true), "(Extcon) estado não gravado");
    crate::kassert!(edev.get_state(Cable::Device) == Ok(false), "(Extcon) cabo vizinho alterado");
    TestResult::Passed
}

fn test_unsupported_and_unknown() -> TestResult {
    let edev = ExtconDev::new("vbus-only", &[Cable::Device]);
    crate::kassert!(edev.get_state(Cable::Host) == Err(Errno::EINVAL), "(Extcon) cabo não suportado lido");
    crate::kassert!(edev.set_state(Cable::Host, true) == Err(Errno::EINVAL), "(Extcon) cabo não suportado gravado");

    let _ = edev.set_state(Cable::Device, true);
    let _ = edev.set_unknown(Cable::Device);
    crate::kassert!(edev.get_state(Cable::Device) == Err(Errno::EIO), "(Extcon) estado desconhecido");
    TestResult::Passed
}

fn test_dispatch_in_order() -> TestResult {
    let edev = ExtconDev::new("gpio-usb", &Cable::ALL);
    let rec = Recorder::new(NotifyResult::Ok);
    let _ = edev.register(Cable::Host, rec.clone());

    let _ = edev.set_state(Cable::Host, true);
    let _ = edev.set_state(Cable::Host, false);
    crate::kassert!(rec.seen().is_empty(), "(Extcon) entrega antes do dispatch");

    crate::kassert!(edev.dispatch() == 2, "(Extcon) dispatch não drenou a fila");
    let seen = rec.seen();
    crate::kassert!(seen.len() == 2, "(Extcon) eventos perdidos");
    crate::kassert!(seen[0].attached && !seen[1].attached, "(Extcon) ordem trocada");
    crate::kassert!(edev.pending() == 0, "(Extcon) fila não vazia");
    TestResult::Passed
}

fn test_per_cable_chains() -> TestResult {
    let edev = ExtconDev::new("typec", &Cable::ALL);
    let host = Recorder::new(NotifyResult::Ok);
    let dev = Recorder::new(NotifyResult::Ok);
    let _ = edev.register(Cable::Host, host.clone());
    let _ = edev.register(Cable::Device, dev.clone());

    let _ = edev.set_state_sync(Cable::Device, true);
    crate::kassert!(host.seen().is_empty(), "(Extcon) evento no cabo errado");
    crate::kassert!(dev.seen().len() == 1, "(Extcon) evento não entregue");
    crate::kassert!(edev.listeners(Cable::Host) == 1, "(Extcon) contagem de listeners");
    TestResult::Passed
}

fn test_stop_halts_chain() -> TestResult {
    let edev = ExtconDev::new("typec", &Cable::ALL);
    let first = Recorder::new(NotifyResult::Stop);
    let second = Recorder::new(NotifyResult::Ok);
    let _ = edev.register(Cable::Host, first.clone());
    let _ = edev.register(Cable::Host, second.clone());

    let _ = edev.set_state_sync(Cable::Host, true);
    crate::kassert!(first.seen().len() == 1, "(Extcon) primeiro listener não chamado");
    crate::kassert!(second.seen().is_empty(), "(Extcon) Stop não interrompeu a cadeia");
    TestResult::Passed
}

fn test_queue_overflow() -> TestResult {
    let edev = ExtconDev::new("noisy", &Cable::ALL);
    let rec = Recorder::new(NotifyResult::Ok);
    let _ = edev.register(Cable::Device, rec.clone());

    let transitions = PENDING_EVENTS + 4;
    for i in 0..transitions {
        let _ = edev.set_state(Cable::Device, i % 2 == 0);
    }
    crate::kassert!(edev.pending() == PENDING_EVENTS, "(Extcon) fila passou do limite");
    crate::kassert!(edev.overflows() == 4, "(Extcon) overflows não contados");
    crate::kassert!(edev.dispatch() == PENDING_EVENTS, "(Extcon) dispatch incompleto");
    crate::kassert!(rec.seen().len() == PENDING_EVENTS, "(Extcon) entrega incompleta");
    TestResult::Passed
}

fn test_unavailable_defers() -> TestResult {
    let edev = ExtconDev::unavailable("late-phy", &Cable::ALL);
    let rec = Recorder::new(NotifyResult::Ok);
    let res = edev.register(Cable::Host, rec.clone());
    crate::kassert!(res == Err(Errno::EPROBE_DEFER), "(Extcon) inscrição antes do bind");

    edev.bind();
    crate::kassert!(edev.register(Cable::Host, rec).is_ok(), "(Extcon) inscrição após bind");
    crate::kassert!(edev.unregister(ListenerId(999)) == Err(Errno::ENOENT), "(Extcon) id inexistente");
    TestResult::Passed
}

/// Listener que cancela a própria inscrição no primeiro evento
struct OneShot {
    edev: Arc<ExtconDev>,
    id: Mutex<Option<ListenerId>>,
    calls: AtomicU32,
}

impl CableListener for OneShot {
    fn on_cable_event(&self, _event: CableEvent) -> NotifyResult {
        self.calls.fetch_add(1, Ordering::Relaxed);
        if let Some(id) = self.id.lock().take() {
            let _ = self.edev.unregister(id);
        }
        NotifyResult::Ok
    }
}

fn test_unregister_from_callback() -> TestResult {
    let edev = Arc::new(ExtconDev::new("typec", &Cable::ALL));
    let one = Arc::new(OneShot {
        edev: edev.clone(),
        id: Mutex::new(None),
        calls: AtomicU32::new(0),
    });
    let id = match edev.register(Cable::Host, one.clone()) {
        Ok(id) => id,
        Err(_) => return TestResult::Failed,
    };
    *one.id.lock() = Some(id);

    let _ = edev.set_state_sync(Cable::Host, true);
    let _ = edev.set_state_sync(Cable::Host, false);
    crate::kassert!(one.calls.load(Ordering::Relaxed) == 1, "(Extcon) listener chamado após cancelar");
    crate::kassert!(edev.listeners(Cable::Host) == 0, "(Extcon) inscrição não removida");
    TestResult::Passed
}

crate::host_tests!(
    test_state_transitions,
    test_unsupported_and_unknown,
    test_dispatch_in_order,
    test_per_cable_chains,
    test_stop_halts_chain,
    test_queue_overflow,
    test_unavailable_defers,
    test_unregister_from_callback,
);

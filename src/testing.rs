//! In-memory serial ports for unit tests.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

type Wire = Rc<RefCell<VecDeque<u8>>>;

#[derive(Debug)]
pub(crate) struct TestPort {
    rx: Wire,
    tx: Wire,
    pub(crate) written: Vec<u8>,
    pub(crate) flushes: usize,
    pub(crate) fail_reads: bool,
    pub(crate) fail_writes: bool,
    /// Writes and flushes report `WouldBlock` forever.
    pub(crate) stall_writes: bool,
    pub(crate) write_attempts: usize,
    drops: Rc<Cell<usize>>,
}

impl TestPort {
    pub(crate) fn new() -> TestPort {
        TestPort::with_wires(Wire::default(), Wire::default())
    }

    /// Two ports wired back to back: what one writes, the other reads.
    pub(crate) fn pair() -> (TestPort, TestPort) {
        let a_to_b = Wire::default();
        let b_to_a = Wire::default();
        (
            TestPort::with_wires(b_to_a.clone(), a_to_b.clone()),
            TestPort::with_wires(a_to_b, b_to_a),
        )
    }

    fn with_wires(rx: Wire, tx: Wire) -> TestPort {
        TestPort {
            rx,
            tx,
            written: Vec::new(),
            flushes: 0,
            fail_reads: false,
            fail_writes: false,
            stall_writes: false,
            write_attempts: 0,
            drops: Rc::new(Cell::new(0)),
        }
    }

    /// Queue bytes as if they had arrived on the wire.
    pub(crate) fn feed(&mut self, bytes: &[u8]) {
        self.rx.borrow_mut().extend(bytes.iter().copied());
    }

    pub(crate) fn pending(&self) -> usize {
        self.rx.borrow().len()
    }

    /// Shared counter bumped when this port is dropped.
    pub(crate) fn drop_count(&self) -> Rc<Cell<usize>> {
        self.drops.clone()
    }
}

impl Drop for TestPort {
    fn drop(&mut self) {
        self.drops.set(self.drops.get() + 1);
    }
}

impl embedded_hal::serial::Read<u8> for TestPort {
    type Error = ();

    fn read(&mut self) -> nb::Result<u8, Self::Error> {
        if self.fail_reads {
            return Err(nb::Error::Other(()));
        }
        match self.rx.borrow_mut().pop_front() {
            Some(b) => Ok(b),
            None => Err(nb::Error::WouldBlock),
        }
    }
}

impl embedded_hal::serial::Write<u8> for TestPort {
    type Error = ();

    fn write(&mut self, byte: u8) -> nb::Result<(), Self::Error> {
        self.write_attempts += 1;
        if self.stall_writes {
            return Err(nb::Error::WouldBlock);
        }
        if self.fail_writes {
            return Err(nb::Error::Other(()));
        }
        self.written.push(byte);
        self.tx.borrow_mut().push_back(byte);
        Ok(())
    }

    fn flush(&mut self) -> nb::Result<(), Self::Error> {
        if self.stall_writes {
            return Err(nb::Error::WouldBlock);
        }
        self.flushes += 1;
        Ok(())
    }
}

thread_local! {
    static LINES: RefCell<Vec<String>> = RefCell::new(Vec::new());
}

/// Keeps log messages per test thread, so tests running in parallel only
/// see their own lines.
struct ThreadLog;

impl log::Log for ThreadLog {
    fn enabled(&self, _: &log::Metadata) -> bool {
        true
    }

    fn log(&self, record: &log::Record) {
        let line = format!("{}: {}", record.level(), record.args());
        LINES.with(|lines| lines.borrow_mut().push(line));
    }

    fn flush(&self) {}
}

static THREAD_LOG: ThreadLog = ThreadLog;

/// Run `f` and return what it logged, as `LEVEL: message` lines.
pub(crate) fn capture_logs<R>(f: impl FnOnce() -> R) -> (R, Vec<String>) {
    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(|| {
        let _ = log::set_logger(&THREAD_LOG);
        log::set_max_level(log::LevelFilter::Trace);
    });
    LINES.with(|lines| lines.borrow_mut().clear());
    let result = f();
    let lines = LINES.with(|lines| lines.borrow_mut().drain(..).collect());
    (result, lines)
}

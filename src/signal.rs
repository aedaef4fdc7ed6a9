//! Interrupt handling.

use std::io;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use signal_hook::consts::{SIGINT, SIGTERM};

/// Exit status for interrupt-driven termination.
pub const INTERRUPT_STATUS: i32 = 0;

/// Flag raised on the first SIGINT or SIGTERM. A second signal while the
/// flag is already set terminates the process at once with status 0, the
/// same status as an orderly interrupt; the OS releases the port.
pub fn shutdown_flag() -> io::Result<Arc<AtomicBool>> {
    let flag = Arc::new(AtomicBool::new(false));
    for signal in [SIGINT, SIGTERM] {
        // Order matters: the conditional shutdown must see the flag before it is set.
        signal_hook::flag::register_conditional_shutdown(
            signal,
            INTERRUPT_STATUS,
            Arc::clone(&flag),
        )?;
        signal_hook::flag::register(signal, Arc::clone(&flag))?;
    }
    Ok(flag)
}

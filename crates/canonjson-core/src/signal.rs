use std::sync::atomic::{AtomicBool, Ordering};

/// Exit status used when a second Ctrl-C aborts the process.
pub const EXIT_CODE_INTERRUPTED: i32 = 130;

static SHUTDOWN_REQUESTED: AtomicBool = AtomicBool::new(false);

/// First Ctrl-C asks the batch to stop after the current file; a second one exits.
pub fn install_signal_handler() {
    let _ = ctrlc::set_handler(move || {
        if let Some(code) = handle_interrupt(&SHUTDOWN_REQUESTED) {
            std::process::exit(code);
        }
        eprintln!("\nshutdown requested, finishing current file...");
    });
}

/// Record an interrupt in `flag`. Returns the exit code once the flag was
/// already set.
fn handle_interrupt(flag: &AtomicBool) -> Option<i32> {
    flag.swap(true, Ordering::SeqCst)
        .then_some(EXIT_CODE_INTERRUPTED)
}

pub fn shutdown_requested() -> bool {
    SHUTDOWN_REQUESTED.load(Ordering::SeqCst)
}

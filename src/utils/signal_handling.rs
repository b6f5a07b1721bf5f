//! Records SIGINT/SIGTERM so that long searches can stop between two solver invocations.

use std::sync::atomic::{AtomicBool, Ordering};

use log::warn;

static RECEIVED_CTRL_C: AtomicBool = AtomicBool::new(false);

/// Installs the handler; repeated calls keep the first handler
pub fn initialize() {
    if let Err(e) = ctrlc::set_handler(|| {
        RECEIVED_CTRL_C.store(true, Ordering::SeqCst);
    }) {
        warn!("Cannot install signal handler: {e}");
    }
}

pub fn received_ctrl_c() -> bool {
    RECEIVED_CTRL_C.load(Ordering::SeqCst)
}

use crate::system::FAREWELL;
use std::sync::Once;
use std::thread;
use tracing::{debug, warn};

static INSTALL: Once = Once::new();

/// Start a thread that prints the farewell and exits the process on Ctrl-C.
///
/// Only the first call installs the listener. The process may terminate while a
/// command handler is still running.
pub fn install_interrupt_listener() {
    INSTALL.call_once(|| {
        let spawned = thread::Builder::new()
            .name("interrupt-listener".to_string())
            .spawn(listen);
        if let Err(err) = spawned {
            warn!(%err, "could not start interrupt listener");
        }
    });
}

fn listen() {
    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            warn!(%err, "could not build runtime for interrupt listener");
            return;
        }
    };

    match runtime.block_on(tokio::signal::ctrl_c()) {
        Ok(()) => {
            debug!("interrupt received");
            println!("\n{}", FAREWELL);
            std::process::exit(0);
        }
        Err(err) => warn!(%err, "failed to listen for interrupt"),
    }
}

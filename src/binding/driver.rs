//! Blocking event loop for hosts that dedicate a thread to the binding.

use crossbeam_channel::{at, never, select, Receiver};
use tracing::debug;

use super::UrlHashBinding;

impl UrlHashBinding {
    /// Process events until `shutdown` receives a message or disconnects.
    ///
    /// Every tree notification, hash change, remote completion and timer
    /// expiry is handled as its own turn on the calling thread. Deadlines are
    /// taken as wall-clock instants, so the binding should use the system
    /// clock. On exit any armed write is cancelled, not flushed.
    pub fn run(&mut self, shutdown: &Receiver<()>) {
        let tree_changes = self.tree_changes.receiver.clone();
        let nav_events = self.nav_events.receiver.clone();
        let completions = self.remote.completions().clone();

        loop {
            let timer = match self.debouncer.deadline() {
                Some(deadline) => at(deadline),
                None => never(),
            };

            select! {
                recv(shutdown) -> _ => break,
                recv(tree_changes) -> msg => match msg {
                    Ok(_) => self.on_state_changed(),
                    Err(_) => break,
                },
                recv(nav_events) -> msg => match msg {
                    Ok(_) => {
                        self.update_from_url_hash();
                    }
                    Err(_) => break,
                },
                recv(completions) -> msg => {
                    if let Ok(completion) = msg {
                        self.remote.finish(completion, self.tree.as_ref());
                    }
                },
                recv(timer) -> _ => {
                    self.debouncer.cancel();
                    self.update_url_hash();
                },
            }
        }

        debug!(write_pending = self.debouncer.is_armed(), "Binding loop stopped");
        self.cancel_pending();
    }
}

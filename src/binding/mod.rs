//! Bidirectional binding between a state tree and the URL fragment.
//!
//! Two paths share the [`EchoGuard`]:
//! - **Outbound**: tree change -> debounce -> serialize -> compare with the
//!   guard -> replace the URL only if the text changed.
//! - **Inbound**: hash change (or an explicit call at startup) -> classify
//!   the fragment -> decode -> apply to the tree.
//!
//! The guard keeps each path from echoing the other: an inbound fragment
//! identical to our own last write is skipped, and an outbound cycle whose
//! tree generation was already written does nothing.
//!
//! All methods run on one logical timeline (`&mut self`). The only
//! background work is a remote load, whose result comes back through
//! [`poll`](UrlHashBinding::poll) or [`run`](UrlHashBinding::run).

mod driver;
mod guard;

pub use guard::EchoGuard;

use crate::cell::ErrorCell;
use crate::codec::{
    canonical_fragment, classify, decode_component, parse_object, parse_url_safe_object,
    EncodedState, FragmentForm,
};
use crate::config::BindingConfig;
use crate::debounce::{Clock, Debouncer, SystemClock};
use crate::error::{ErrorKind, Result, UrlSyncError};
use crate::location::{query_param, strip_query_param, Navigation};
use crate::notify::Subscription;
use crate::remote::RemoteLoader;
use crate::tree::StateTree;
use crate::types::{Generation, NavigationEvent};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// Result of one outbound cycle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OutboundOutcome {
    /// The tree generation was already written.
    Unchanged,
    /// The tree changed but serializes to the text already in the URL.
    GenerationOnly,
    /// The URL fragment was replaced with this body (without `#`).
    Written(String),
}

/// Result of one inbound cycle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InboundOutcome {
    /// Standard form: the tree was reset and restored.
    Replaced,
    /// Legacy `+` form: the state was merged into the tree.
    Merged,
    /// The fragment is our own last write.
    Echo,
    /// A remote load for this URL was started.
    RemotePending(String),
    /// The cycle failed; the error is in the error cell.
    Failed(ErrorKind),
}

/// Keeps a [`StateTree`] and the document URL fragment in sync.
pub struct UrlHashBinding {
    tree: Arc<dyn StateTree>,
    navigation: Arc<dyn Navigation>,
    remote: RemoteLoader,
    config: BindingConfig,
    clock: Arc<dyn Clock>,
    guard: EchoGuard,
    parse_error: Arc<ErrorCell>,
    debouncer: Debouncer,
    tree_changes: Subscription<Generation>,
    nav_events: Subscription<NavigationEvent>,
}

impl UrlHashBinding {
    /// Create a binding and subscribe to tree and navigation changes.
    ///
    /// The URL is not read until [`update_from_url_hash`](Self::update_from_url_hash)
    /// is called, which hosts do once at startup.
    pub fn new(
        tree: Arc<dyn StateTree>,
        navigation: Arc<dyn Navigation>,
        remote: RemoteLoader,
        config: BindingConfig,
    ) -> Self {
        let tree_changes = tree.subscribe(config.channel_capacity);
        let nav_events = navigation.subscribe(config.channel_capacity);
        let debouncer = Debouncer::new(config.update_delay());

        Self {
            tree,
            navigation,
            remote,
            config,
            clock: Arc::new(SystemClock),
            guard: EchoGuard::new(),
            parse_error: Arc::new(ErrorCell::new()),
            debouncer,
            tree_changes,
            nav_events,
        }
    }

    /// Use `clock` for debounce deadlines instead of the system clock.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &BindingConfig {
        &self.config
    }

    /// Cell holding the last inbound failure.
    pub fn parse_error(&self) -> &Arc<ErrorCell> {
        &self.parse_error
    }

    /// The guard's recorded text and generation.
    pub fn last_written(&self) -> (Option<&str>, Option<Generation>) {
        (self.guard.text(), self.guard.generation())
    }

    pub fn pending_remote_loads(&self) -> usize {
        self.remote.pending()
    }

    /// Deadline of the armed outbound write, if any.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.debouncer.deadline()
    }

    pub fn is_write_pending(&self) -> bool {
        self.debouncer.is_armed()
    }

    // --- Outbound ---

    /// Schedule an outbound cycle after the debounce window.
    pub fn on_state_changed(&mut self) {
        self.debouncer.trigger(self.clock.now());
    }

    /// Cancel a scheduled outbound cycle without running it.
    pub fn cancel_pending(&mut self) {
        self.debouncer.cancel();
    }

    /// Write the tree's state to the URL fragment if it changed.
    pub fn update_url_hash(&mut self) -> OutboundOutcome {
        let snapshot = self.tree.snapshot();

        self.strip_legacy_query_param();

        if self.guard.generation_matches(snapshot.generation) {
            return OutboundOutcome::Unchanged;
        }

        let encoded = EncodedState::from_value(&snapshot.value);

        if self.guard.is_echo(&encoded.json) {
            debug!(generation = %snapshot.generation, "State text unchanged, URL left as is");
            self.guard.refresh_generation(snapshot.generation);
            return OutboundOutcome::GenerationOnly;
        }

        let body = encoded.fragment_body();
        self.navigation.replace_fragment(&body);
        debug!(
            generation = %snapshot.generation,
            bytes = body.len(),
            "Wrote state to URL hash"
        );
        self.guard.record(encoded.json, snapshot.generation);
        OutboundOutcome::Written(body)
    }

    fn strip_legacy_query_param(&self) {
        let url = self.navigation.current_url();
        if let Some(stripped) = strip_query_param(&url, &self.config.legacy_query_param) {
            debug!(param = %self.config.legacy_query_param, "Removed legacy query parameter");
            self.navigation.replace_url(&stripped);
        }
    }

    // --- Inbound ---

    /// Read the URL and apply its state to the tree.
    ///
    /// Failures are not returned: they set the error cell, which any
    /// successful cycle clears.
    pub fn update_from_url_hash(&mut self) -> InboundOutcome {
        match self.apply_url_hash() {
            Ok(outcome) => {
                self.parse_error.clear();
                outcome
            }
            Err(e) => {
                warn!(error = %e, "Failed to parse URL hash");
                let kind = e.kind();
                self.parse_error.set(e);
                InboundOutcome::Failed(kind)
            }
        }
    }

    fn apply_url_hash(&mut self) -> Result<InboundOutcome> {
        let location = self.navigation.current_url();

        // The redirect parameter is never removed, so while it stays in the
        // URL it wins over the literal fragment on every inbound cycle.
        let (fragment, redirected) =
            match query_param(&location, &self.config.redirect_query_param) {
                Some(value) if value.starts_with('#') => (value, true),
                Some(value) => (format!("#{}", value), true),
                None => {
                    let fragment = match location.fragment() {
                        Some(f) => format!("#{}", f),
                        None => String::new(),
                    };
                    let canonical =
                        canonical_fragment(&fragment, self.config.default_fragment.as_deref());
                    (canonical.to_string(), false)
                }
            };

        let form = classify(&fragment);
        debug!(%form, redirected, "Classified URL hash");

        match form {
            FragmentForm::Remote { url, .. } => {
                self.remote.start(url);
                Ok(InboundOutcome::RemotePending(url.to_string()))
            }
            FragmentForm::Additive { payload } => {
                let text = decode_payload(payload, redirected)?;
                let state = parse_url_safe_object(&text)?;
                self.tree.restore_state(&state)?;
                self.guard.clear();
                Ok(InboundOutcome::Merged)
            }
            FragmentForm::Standard { payload } => {
                let text = decode_payload(payload, redirected)?;
                if self.guard.is_echo(&text) {
                    return Ok(InboundOutcome::Echo);
                }
                let state = parse_object(&text)?;
                self.tree.reset();
                self.tree.restore_state(&state)?;
                let generation = self.tree.snapshot().generation;
                self.guard.record(text, generation);
                Ok(InboundOutcome::Replaced)
            }
            FragmentForm::Malformed => Err(UrlSyncError::MalformedFragment(format!(
                "URL hash is expected to be of the form \"#!{{...}}\" or \"#!+{{...}}\", got {:?}",
                fragment
            ))),
        }
    }

    // --- Event turns ---

    /// Run one turn: take pending notifications, apply finished remote loads,
    /// then fire the outbound write if its deadline passed.
    pub fn poll(&mut self) {
        if !self.tree_changes.drain().is_empty() {
            self.on_state_changed();
        }

        // Each inbound cycle reads the current URL, so one covers a burst.
        if !self.nav_events.drain().is_empty() {
            self.update_from_url_hash();
        }

        while let Ok(completion) = self.remote.completions().try_recv() {
            self.remote.finish(completion, self.tree.as_ref());
        }

        // Inbound and remote application notify the tree's subscribers.
        if !self.tree_changes.drain().is_empty() {
            self.on_state_changed();
        }

        if self.debouncer.fire_if_due(self.clock.now()) {
            self.update_url_hash();
        }
    }
}

impl Drop for UrlHashBinding {
    fn drop(&mut self) {
        self.debouncer.cancel();
        self.tree.unsubscribe(&self.tree_changes);
        self.navigation.unsubscribe(&self.nav_events);
    }
}

/// Percent-decode once, or twice when the fragment came through an
/// identity-provider redirect, which adds a layer of escaping.
fn decode_payload(payload: &str, redirected: bool) -> Result<String> {
    let once = decode_component(payload)?;
    if redirected {
        decode_component(&once)
    } else {
        Ok(once)
    }
}

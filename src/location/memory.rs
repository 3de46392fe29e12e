//! In-memory navigation for headless hosts and tests.

use crate::error::Result;
use crate::notify::{ChangeNotifier, Subscription};
use crate::types::NavigationEvent;
use parking_lot::RwLock;
use std::collections::VecDeque;
use url::Url;

use super::Navigation;

/// Most recent replacements kept by [`MemoryNavigation::replacements`].
pub const REPLACEMENT_LOG_LIMIT: usize = 64;

struct ReplacementLog {
    recent: VecDeque<Url>,
    total: usize,
}

/// Navigation backed by an owned URL.
///
/// [`navigate`](Self::navigate) plays the role of the user (typing, pasting,
/// back/forward) and emits a hash-change event. URL replacements made through
/// the [`Navigation`] trait are logged but emit nothing. The log keeps the
/// last [`REPLACEMENT_LOG_LIMIT`] URLs and a running count.
pub struct MemoryNavigation {
    url: RwLock<Url>,
    replacements: RwLock<ReplacementLog>,
    notifier: ChangeNotifier<NavigationEvent>,
}

impl MemoryNavigation {
    pub fn new(href: &str) -> Result<Self> {
        Ok(Self {
            url: RwLock::new(Url::parse(href)?),
            replacements: RwLock::new(ReplacementLog {
                recent: VecDeque::new(),
                total: 0,
            }),
            notifier: ChangeNotifier::new(),
        })
    }

    /// Navigate to `href` and emit a hash-change event.
    pub fn navigate(&self, href: &str) -> Result<()> {
        let url = Url::parse(href)?;
        *self.url.write() = url;
        self.fire_hash_change();
        Ok(())
    }

    /// Navigate to a fragment on the current document. `fragment` may include its `#`.
    pub fn navigate_fragment(&self, fragment: &str) {
        {
            let mut url = self.url.write();
            url.set_fragment(Some(fragment.strip_prefix('#').unwrap_or(fragment)));
        }
        self.fire_hash_change();
    }

    /// Emit a hash-change event for the current URL without changing it.
    pub fn fire_hash_change(&self) {
        let href = self.url.read().to_string();
        self.notifier.notify(NavigationEvent::HashChange { href });
    }

    pub fn href(&self) -> String {
        self.url.read().to_string()
    }

    /// Recent URLs written through [`Navigation::replace_url`], oldest first.
    pub fn replacements(&self) -> Vec<Url> {
        self.replacements.read().recent.iter().cloned().collect()
    }

    /// Total replacements, including ones dropped from the log.
    pub fn replacement_count(&self) -> usize {
        self.replacements.read().total
    }
}

impl Navigation for MemoryNavigation {
    fn current_url(&self) -> Url {
        self.url.read().clone()
    }

    fn replace_url(&self, url: &Url) {
        *self.url.write() = url.clone();
        let mut log = self.replacements.write();
        if log.recent.len() == REPLACEMENT_LOG_LIMIT {
            log.recent.pop_front();
        }
        log.recent.push_back(url.clone());
        log.total += 1;
    }

    fn subscribe(&self, capacity: usize) -> Subscription<NavigationEvent> {
        self.notifier.subscribe(capacity)
    }

    fn unsubscribe(&self, subscription: &Subscription<NavigationEvent>) {
        self.notifier.unsubscribe(subscription.id);
    }
}

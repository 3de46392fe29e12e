//! Navigation facade over the document location.
//!
//! The binding never touches a global location. It reads and replaces the
//! URL through [`Navigation`], and learns about external changes from the
//! facade's event subscription.

mod memory;

pub use memory::{MemoryNavigation, REPLACEMENT_LOG_LIMIT};

use crate::notify::Subscription;
use crate::types::NavigationEvent;
use url::Url;

/// Access to the document URL.
pub trait Navigation: Send + Sync {
    fn current_url(&self) -> Url;

    /// Replace the URL without creating a history entry or reloading.
    /// Does not emit a [`NavigationEvent`].
    fn replace_url(&self, url: &Url);

    /// Subscribe to hash changes made outside the binding.
    fn subscribe(&self, capacity: usize) -> Subscription<NavigationEvent>;

    fn unsubscribe(&self, subscription: &Subscription<NavigationEvent>);

    /// The fragment including its `#`, or `""` when the URL has none.
    fn current_fragment(&self) -> String {
        match self.current_url().fragment() {
            Some(fragment) => format!("#{}", fragment),
            None => String::new(),
        }
    }

    /// The raw query string without its `?`, or `""`.
    fn current_query(&self) -> String {
        self.current_url().query().unwrap_or_default().to_string()
    }

    /// Replace only the fragment. `body` excludes the `#`.
    fn replace_fragment(&self, body: &str) {
        let mut url = self.current_url();
        url.set_fragment(Some(body));
        self.replace_url(&url);
    }
}

/// First value of query parameter `name`, form-urlencoded decoded.
pub fn query_param(url: &Url, name: &str) -> Option<String> {
    url.query_pairs()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}

/// `url` with every `name` parameter removed, or `None` if it had none.
pub fn strip_query_param(url: &Url, name: &str) -> Option<Url> {
    let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
    if !pairs.iter().any(|(key, _)| key == name) {
        return None;
    }

    let kept: Vec<&(String, String)> = pairs.iter().filter(|(key, _)| key != name).collect();
    let mut stripped = url.clone();
    if kept.is_empty() {
        stripped.set_query(None);
    } else {
        stripped
            .query_pairs_mut()
            .clear()
            .extend_pairs(kept.iter().map(|(k, v)| (k.as_str(), v.as_str())));
    }
    Some(stripped)
}

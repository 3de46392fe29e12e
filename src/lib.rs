//! # URL Hash Binding
//!
//! Keeps an observable JSON state tree and the document URL fragment in
//! sync, so application state can be shared, bookmarked and restored from a
//! URL, and external URL changes update the running application.
//!
//! ## Core Concepts
//!
//! - **Fragment forms**: `#!<json>` (replace), `#!+<json>` (legacy merge),
//!   `#!<scheme>://<url>` (remote state), and the empty forms
//! - **Outbound sync**: debounced writes of the tree to the fragment
//! - **Inbound sync**: hash changes classified, decoded and applied
//! - **Echo guard**: last written text + generation, so neither path
//!   re-triggers the other
//!
//! ## Example
//!
//! ```ignore
//! use url_hash_binding::*;
//!
//! let tree = Arc::new(JsonStateTree::new());
//! let navigation = Arc::new(MemoryNavigation::new("https://app/#!%7B%22zoom%22:2%7D")?);
//! let remote = RemoteLoader::new(
//!     Arc::new(StandardResolver),
//!     Arc::new(FnFetcher(|target: &ResolvedUrl| fetch_text(&target.url))),
//!     Arc::new(TracingStatus),
//! );
//!
//! let mut binding = UrlHashBinding::new(tree.clone(), navigation, remote, BindingConfig::default());
//! binding.update_from_url_hash();
//! assert_eq!(tree.get("zoom"), Some(json!(2)));
//!
//! tree.set("zoom", json!(3));
//! binding.poll(); // writes `#!%7B%22zoom%22:3%7D` once the debounce window passes
//! ```

pub mod binding;
pub mod cell;
pub mod codec;
pub mod config;
pub mod debounce;
pub mod error;
pub mod location;
pub mod notify;
pub mod remote;
pub mod tree;
pub mod types;

// Re-exports
pub use binding::{EchoGuard, InboundOutcome, OutboundOutcome, UrlHashBinding};
pub use cell::ErrorCell;
pub use codec::{
    canonical_fragment, classify, decode_component, encode_fragment, parse_object,
    parse_url_safe_object, url_safe_to_json, verify_object, EncodedState, FragmentForm,
    EMPTY_STATE_FRAGMENT,
};
pub use config::BindingConfig;
pub use debounce::{Clock, Debouncer, ManualClock, SystemClock};
pub use error::{ErrorKind, Result, UrlSyncError};
pub use location::{
    query_param, strip_query_param, MemoryNavigation, Navigation, REPLACEMENT_LOG_LIMIT,
};
pub use notify::{ChangeNotifier, Subscription, SubscriptionId};
pub use remote::{
    FnFetcher, RecordingStatus, RemoteCompletion, RemoteFetcher, RemoteLoader,
    StandardResolver, StaticCredentialsResolver, StatusEvent, StatusReporter, TracingStatus,
    UrlResolver,
};
pub use tree::{JsonStateTree, StateTree, StateValidator};
pub use types::*;

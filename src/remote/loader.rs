//! Background loading of remote state documents.

use crate::codec::parse_object;
use crate::error::{Result, UrlSyncError};
use crate::tree::StateTree;
use crossbeam_channel::{unbounded, Receiver, Sender};
use serde_json::{Map, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use tracing::debug;

use super::{RemoteFetcher, StatusReporter, UrlResolver};

/// Outcome of one remote load, delivered back to the binding's timeline.
#[derive(Debug)]
pub struct RemoteCompletion {
    /// URL as it appeared in the fragment.
    pub source: String,
    pub result: Result<Map<String, Value>>,
}

/// Starts remote loads on worker threads and applies their results.
///
/// Loads are never cancelled. A load superseded by a later fragment change
/// still applies when it completes.
pub struct RemoteLoader {
    resolver: Arc<dyn UrlResolver>,
    fetcher: Arc<dyn RemoteFetcher>,
    status: Arc<dyn StatusReporter>,
    sender: Sender<RemoteCompletion>,
    receiver: Receiver<RemoteCompletion>,
    pending: Arc<AtomicUsize>,
}

impl RemoteLoader {
    pub fn new(
        resolver: Arc<dyn UrlResolver>,
        fetcher: Arc<dyn RemoteFetcher>,
        status: Arc<dyn StatusReporter>,
    ) -> Self {
        let (sender, receiver) = unbounded();
        Self {
            resolver,
            fetcher,
            status,
            sender,
            receiver,
            pending: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Begin loading `source`. Resolution happens now; the fetch runs on a
    /// worker thread.
    pub fn start(&self, source: &str) {
        self.status.loading(source);

        let target = match self.resolver.resolve(source) {
            Ok(target) => target,
            Err(e) => {
                self.status.failed(source, &e);
                return;
            }
        };

        let fetcher = Arc::clone(&self.fetcher);
        let sender = self.sender.clone();
        let source_owned = source.to_string();
        self.pending.fetch_add(1, Ordering::SeqCst);

        let spawned = thread::Builder::new()
            .name("url-hash-remote".to_string())
            .spawn(move || {
                let result = fetcher
                    .fetch(&target)
                    .and_then(|body| parse_object(&body));
                // Receiver lives as long as the loader; a send error means
                // the binding is gone and the result has nowhere to go.
                let _ = sender.send(RemoteCompletion {
                    source: source_owned,
                    result,
                });
            });

        if let Err(e) = spawned {
            self.pending.fetch_sub(1, Ordering::SeqCst);
            self.status.failed(
                source,
                &UrlSyncError::RemoteLoad(format!("could not start fetch: {}", e)),
            );
        }
    }

    /// Channel on which completions arrive.
    pub fn completions(&self) -> &Receiver<RemoteCompletion> {
        &self.receiver
    }

    /// Loads started but not yet finished.
    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }

    /// Apply a completion to `tree` (reset, then restore) and report the outcome.
    pub fn finish(&self, completion: RemoteCompletion, tree: &dyn StateTree) {
        self.pending.fetch_sub(1, Ordering::SeqCst);

        let RemoteCompletion { source, result } = completion;
        let applied = result.and_then(|state| {
            tree.reset();
            tree.restore_state(&state)
        });

        match applied {
            Ok(()) => {
                debug!(url = %source, "Applied remote state");
                self.status.loaded(&source);
            }
            Err(e) => self.status.failed(&source, &e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::{FnFetcher, RecordingStatus, StandardResolver, StatusEvent};
    use crate::tree::JsonStateTree;
    use crate::types::ResolvedUrl;
    use serde_json::json;
    use std::time::Duration;

    fn loader_with(
        fetch: impl Fn(&ResolvedUrl) -> Result<String> + Send + Sync + 'static,
    ) -> (RemoteLoader, Arc<RecordingStatus>) {
        let status = Arc::new(RecordingStatus::new());
        let loader = RemoteLoader::new(
            Arc::new(StandardResolver),
            Arc::new(FnFetcher(fetch)),
            status.clone(),
        );
        (loader, status)
    }

    #[test]
    fn test_load_and_apply() {
        let (loader, status) = loader_with(|target| {
            assert_eq!(target.url, "https://storage.googleapis.com/b/s.json");
            Ok(r#"{"layers":[1]}"#.to_string())
        });
        let tree = JsonStateTree::new();
        tree.set("stale", json!(true));

        loader.start("gs://b/s.json");
        let completion = loader
            .completions()
            .recv_timeout(Duration::from_secs(5))
            .unwrap();
        assert_eq!(loader.pending(), 1);
        loader.finish(completion, &tree);

        assert_eq!(loader.pending(), 0);
        assert_eq!(tree.snapshot().value, json!({"layers": [1]}));
        assert_eq!(
            status.events(),
            vec![
                StatusEvent::Loading("gs://b/s.json".to_string()),
                StatusEvent::Loaded("gs://b/s.json".to_string()),
            ]
        );
    }

    #[test]
    fn test_non_object_leaves_tree_untouched() {
        let (loader, status) = loader_with(|_| Ok("[1,2,3]".to_string()));
        let tree = JsonStateTree::new();
        tree.set("keep", json!(1));

        loader.start("https://host/state.json");
        let completion = loader
            .completions()
            .recv_timeout(Duration::from_secs(5))
            .unwrap();
        loader.finish(completion, &tree);

        assert_eq!(tree.snapshot().value, json!({"keep": 1}));
        assert!(matches!(
            status.events().last(),
            Some(StatusEvent::Failed(_, UrlSyncError::Shape(_)))
        ));
    }

    #[test]
    fn test_resolve_failure_reported_without_fetch() {
        let (loader, status) = loader_with(|_| panic!("must not fetch"));

        loader.start("gs://");
        assert_eq!(loader.pending(), 0);
        assert!(matches!(
            status.events().last(),
            Some(StatusEvent::Failed(_, UrlSyncError::RemoteLoad(_)))
        ));
    }

    #[test]
    fn test_fetch_error_reported() {
        let (loader, status) =
            loader_with(|_| Err(UrlSyncError::RemoteLoad("404 Not Found".to_string())));
        let tree = JsonStateTree::new();

        loader.start("https://host/missing.json");
        let completion = loader
            .completions()
            .recv_timeout(Duration::from_secs(5))
            .unwrap();
        loader.finish(completion, &tree);

        assert_eq!(
            status.events().last(),
            Some(&StatusEvent::Failed(
                "https://host/missing.json".to_string(),
                UrlSyncError::RemoteLoad("404 Not Found".to_string())
            ))
        );
    }
}

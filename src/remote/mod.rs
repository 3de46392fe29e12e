//! Remote state references (`#!<scheme>://<url>`).
//!
//! Loading a remote state involves three collaborators:
//! - [`UrlResolver`] maps the URL in the fragment to a fetchable URL plus
//!   credentials.
//! - [`RemoteFetcher`] performs the (blocking) fetch off the binding's
//!   timeline.
//! - [`StatusReporter`] receives progress and failures. Remote failures are
//!   reported here, never through the binding's error cell.

mod loader;
mod status;

pub use loader::{RemoteCompletion, RemoteLoader};
pub use status::{RecordingStatus, StatusEvent, StatusReporter, TracingStatus};

use crate::error::{Result, UrlSyncError};
use crate::types::{Credentials, ResolvedUrl};

/// Resolves a state URL to something a fetcher can request.
pub trait UrlResolver: Send + Sync {
    fn resolve(&self, url: &str) -> Result<ResolvedUrl>;
}

/// Fetches the text body of a resolved URL.
pub trait RemoteFetcher: Send + Sync {
    fn fetch(&self, target: &ResolvedUrl) -> Result<String>;
}

/// Host for `gs://` URLs.
const GCS_HOST: &str = "https://storage.googleapis.com";

/// Default resolver: rewrites `gs://bucket/path` to its public HTTPS endpoint
/// and passes other URLs through unchanged, without credentials.
#[derive(Clone, Copy, Debug, Default)]
pub struct StandardResolver;

impl UrlResolver for StandardResolver {
    fn resolve(&self, url: &str) -> Result<ResolvedUrl> {
        if let Some(rest) = url.strip_prefix("gs://") {
            if rest.is_empty() || rest.starts_with('/') {
                return Err(UrlSyncError::RemoteLoad(format!(
                    "missing bucket in {:?}",
                    url
                )));
            }
            return Ok(ResolvedUrl::anonymous(format!("{}/{}", GCS_HOST, rest)));
        }
        Ok(ResolvedUrl::anonymous(url))
    }
}

/// Wraps a resolver and attaches a fixed bearer token.
pub struct StaticCredentialsResolver<R> {
    inner: R,
    token: String,
}

impl<R: UrlResolver> StaticCredentialsResolver<R> {
    pub fn new(inner: R, token: impl Into<String>) -> Self {
        Self {
            inner,
            token: token.into(),
        }
    }
}

impl<R: UrlResolver> UrlResolver for StaticCredentialsResolver<R> {
    fn resolve(&self, url: &str) -> Result<ResolvedUrl> {
        let mut resolved = self.inner.resolve(url)?;
        resolved.credentials = Credentials::Bearer(self.token.clone());
        Ok(resolved)
    }
}

/// Adapts a closure into a [`RemoteFetcher`].
pub struct FnFetcher<F>(pub F);

impl<F> RemoteFetcher for FnFetcher<F>
where
    F: Fn(&ResolvedUrl) -> Result<String> + Send + Sync,
{
    fn fetch(&self, target: &ResolvedUrl) -> Result<String> {
        (self.0)(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_resolver_rewrites_gs() {
        let resolved = StandardResolver.resolve("gs://bucket/dir/state.json").unwrap();
        assert_eq!(resolved.url, "https://storage.googleapis.com/bucket/dir/state.json");
        assert_eq!(resolved.credentials, Credentials::None);
    }

    #[test]
    fn test_standard_resolver_passthrough() {
        let resolved = StandardResolver.resolve("https://host/state.json").unwrap();
        assert_eq!(resolved.url, "https://host/state.json");
    }

    #[test]
    fn test_standard_resolver_rejects_missing_bucket() {
        assert!(matches!(
            StandardResolver.resolve("gs://"),
            Err(UrlSyncError::RemoteLoad(_))
        ));
    }

    #[test]
    fn test_static_credentials() {
        let resolver = StaticCredentialsResolver::new(StandardResolver, "tok");
        let resolved = resolver.resolve("gs://b/x").unwrap();
        assert_eq!(resolved.credentials, Credentials::Bearer("tok".to_string()));
    }
}

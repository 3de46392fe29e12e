//! Core types shared by the binding and its collaborators.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Monotonically increasing tag for each distinct value of a state tree.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct Generation(pub u64);

impl fmt::Debug for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Gen({})", self.0)
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Generation {
    pub fn next(self) -> Self {
        Generation(self.0 + 1)
    }
}

/// A state tree value paired with the generation it was read at.
#[derive(Clone, Debug, PartialEq)]
pub struct TreeSnapshot {
    pub value: serde_json::Value,
    pub generation: Generation,
}

/// Credentials attached to a resolved remote URL.
#[derive(Clone, PartialEq, Eq, Default)]
pub enum Credentials {
    #[default]
    None,
    /// OAuth-style bearer token.
    Bearer(String),
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::None => write!(f, "Credentials::None"),
            Credentials::Bearer(_) => write!(f, "Credentials::Bearer(..)"),
        }
    }
}

/// A remote state URL after scheme resolution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedUrl {
    /// URL the fetcher should request.
    pub url: String,
    pub credentials: Credentials,
}

impl ResolvedUrl {
    pub fn anonymous(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            credentials: Credentials::None,
        }
    }
}

/// Events emitted by a navigation facade.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NavigationEvent {
    /// The document URL's fragment changed outside of the binding.
    HashChange { href: String },
}

//! Classification of raw fragments into their encoding forms.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// Fragment used when the URL carries no state.
pub const EMPTY_STATE_FRAGMENT: &str = "#!{}";

/// A URL scheme immediately after `#!`.
static REMOTE_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#!([a-z][a-z\d+\-.]*)://").expect("static pattern")
});

/// The shape of a fragment, checked in priority order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FragmentForm<'a> {
    /// `#!<scheme>://<url>`: state lives in a remote JSON document.
    Remote { url: &'a str, scheme: &'a str },
    /// `#!+<payload>`: legacy form, merged into the current state.
    Additive { payload: &'a str },
    /// `#!<payload>`: full replacement of the state.
    Standard { payload: &'a str },
    Malformed,
}

impl FragmentForm<'_> {
    pub fn name(&self) -> &'static str {
        match self {
            FragmentForm::Remote { .. } => "remote",
            FragmentForm::Additive { .. } => "additive",
            FragmentForm::Standard { .. } => "standard",
            FragmentForm::Malformed => "malformed",
        }
    }
}

impl fmt::Display for FragmentForm<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Classify a fragment (including its leading `#`).
pub fn classify(fragment: &str) -> FragmentForm<'_> {
    if let Some(caps) = REMOTE_REFERENCE.captures(fragment) {
        if let Some(scheme) = caps.get(1) {
            return FragmentForm::Remote {
                url: &fragment[2..],
                scheme: scheme.as_str(),
            };
        }
    }
    if let Some(payload) = fragment.strip_prefix("#!+") {
        return FragmentForm::Additive { payload };
    }
    if let Some(payload) = fragment.strip_prefix("#!") {
        return FragmentForm::Standard { payload };
    }
    FragmentForm::Malformed
}

/// Map the empty forms (`""`, `"#"`, `"#!"`) to `default`, or to
/// [`EMPTY_STATE_FRAGMENT`] when no default is configured.
pub fn canonical_fragment<'a>(fragment: &'a str, default: Option<&'a str>) -> &'a str {
    match fragment {
        "" | "#" | "#!" => default.unwrap_or(EMPTY_STATE_FRAGMENT),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_remote() {
        assert_eq!(
            classify("#!https://host/state.json"),
            FragmentForm::Remote {
                url: "https://host/state.json",
                scheme: "https"
            }
        );
        assert!(matches!(
            classify("#!gs://bucket/state.json"),
            FragmentForm::Remote { scheme: "gs", .. }
        ));
        assert!(matches!(
            classify("#!s3+http://x/y"),
            FragmentForm::Remote { scheme: "s3+http", .. }
        ));
    }

    #[test]
    fn test_remote_takes_priority_over_standard() {
        // Without the scheme pattern this would be a standard payload
        assert_eq!(classify("#!file:///tmp/a.json").name(), "remote");
        assert_eq!(classify("#!{\"url\":\"https://x\"}").name(), "standard");
    }

    #[test]
    fn test_scheme_must_start_lowercase_letter() {
        assert_eq!(classify("#!1http://x").name(), "standard");
        assert_eq!(classify("#!HTTP://x").name(), "standard");
    }

    #[test]
    fn test_classify_additive_and_standard() {
        assert_eq!(
            classify("#!+{'a':1}"),
            FragmentForm::Additive { payload: "{'a':1}" }
        );
        assert_eq!(
            classify("#!%7B%7D"),
            FragmentForm::Standard { payload: "%7B%7D" }
        );
    }

    #[test]
    fn test_classify_malformed() {
        assert_eq!(classify("#not-a-bang-form"), FragmentForm::Malformed);
        assert_eq!(classify("{}"), FragmentForm::Malformed);
    }

    #[test]
    fn test_canonical_fragment() {
        for empty in ["", "#", "#!"] {
            assert_eq!(canonical_fragment(empty, None), "#!{}");
            assert_eq!(canonical_fragment(empty, Some("#!{\"a\":1}")), "#!{\"a\":1}");
        }
        assert_eq!(canonical_fragment("#!{\"b\":2}", None), "#!{\"b\":2}");
    }
}

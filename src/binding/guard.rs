//! Feedback-loop guard between the outbound and inbound paths.

use crate::types::Generation;

/// The last state text confirmed written to (or read from) the URL, and the
/// tree generation it corresponds to.
///
/// Both fields are set together by [`record`](Self::record) and cleared
/// together by [`clear`](Self::clear). Only a write that found the text
/// unchanged moves the generation alone.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EchoGuard {
    text: Option<String>,
    generation: Option<Generation>,
}

impl EchoGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, text: String, generation: Generation) {
        self.text = Some(text);
        self.generation = Some(generation);
    }

    pub fn clear(&mut self) {
        self.text = None;
        self.generation = None;
    }

    /// True if `text` is exactly what was last recorded.
    pub fn is_echo(&self, text: &str) -> bool {
        self.text.as_deref() == Some(text)
    }

    pub fn generation_matches(&self, generation: Generation) -> bool {
        self.generation == Some(generation)
    }

    /// Move the generation forward while keeping the recorded text.
    pub fn refresh_generation(&mut self, generation: Generation) {
        if self.text.is_some() {
            self.generation = Some(generation);
        }
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn generation(&self) -> Option<Generation> {
        self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_match() {
        let mut guard = EchoGuard::new();
        assert!(!guard.is_echo("{}"));
        assert!(!guard.generation_matches(Generation(0)));

        guard.record("{\"a\":1}".to_string(), Generation(3));
        assert!(guard.is_echo("{\"a\":1}"));
        assert!(!guard.is_echo("{\"a\":2}"));
        assert!(guard.generation_matches(Generation(3)));
    }

    #[test]
    fn test_clear_resets_both() {
        let mut guard = EchoGuard::new();
        guard.record("{}".to_string(), Generation(1));
        guard.clear();
        assert_eq!(guard, EchoGuard::default());
    }

    #[test]
    fn test_refresh_requires_text() {
        let mut guard = EchoGuard::new();
        guard.refresh_generation(Generation(5));
        assert_eq!(guard.generation(), None);

        guard.record("{}".to_string(), Generation(1));
        guard.refresh_generation(Generation(5));
        assert_eq!(guard.generation(), Some(Generation(5)));
        assert_eq!(guard.text(), Some("{}"));
    }
}

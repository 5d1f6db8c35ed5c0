//! NLP capability layer: sentence segmentation and named-entity recognition.
//!
//! The parser never depends on a concrete model. It receives an
//! [`NlpCapability`] and asks it for sentences and entity spans; tests pass
//! deterministic stubs, the CLI passes [`RuleBasedNlp`].

mod rules;

pub use rules::RuleBasedNlp;

/// An entity span reported by an NLP capability.
///
/// `start` and `end` are character offsets into the analysed text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntitySpan {
    pub text: String,
    pub label: String,
    pub start: usize,
    pub end: usize,
}

/// Injected sentence segmentation and entity recognition.
///
/// Both operations are pure: the same text always yields the same output.
pub trait NlpCapability {
    /// Split `text` into sentences, in order.
    fn segment_sentences(&self, text: &str) -> Vec<String>;

    /// Report entity spans found in `text`, in order of appearance.
    fn extract_entities(&self, text: &str) -> Vec<EntitySpan>;
}

impl<T: NlpCapability + ?Sized> NlpCapability for &T {
    fn segment_sentences(&self, text: &str) -> Vec<String> {
        (**self).segment_sentences(text)
    }

    fn extract_entities(&self, text: &str) -> Vec<EntitySpan> {
        (**self).extract_entities(text)
    }
}

impl<T: NlpCapability + ?Sized> NlpCapability for Box<T> {
    fn segment_sentences(&self, text: &str) -> Vec<String> {
        (**self).segment_sentences(text)
    }

    fn extract_entities(&self, text: &str) -> Vec<EntitySpan> {
        (**self).extract_entities(text)
    }
}

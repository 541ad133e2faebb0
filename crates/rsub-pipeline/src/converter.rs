//! Document conversion.

/// Element-wise document transform.
///
/// Output has the same length and order as the input.
pub trait Converter {
    fn convert(&self, documents: &[String]) -> Vec<String>;
}

/// Replaces every non-overlapping occurrence of a literal with another.
///
/// Matching is plain substring search, scanned left to right. An empty
/// search literal matches before every character and at the end, so
/// `"abc"` with replacement `"-"` becomes `"-a-b-c-"` and an empty document
/// becomes `"-"`.
#[derive(Debug, Clone, Default)]
pub struct ReplaceConverter {
    search: String,
    replace: String,
}

impl ReplaceConverter {
    #[must_use]
    pub fn new(search: impl Into<String>, replace: impl Into<String>) -> Self {
        Self {
            search: search.into(),
            replace: replace.into(),
        }
    }

    /// Apply the rule to a single document.
    #[must_use]
    pub fn apply(&self, text: &str) -> String {
        text.replace(&self.search, &self.replace)
    }
}

impl Converter for ReplaceConverter {
    fn convert(&self, documents: &[String]) -> Vec<String> {
        documents.iter().map(|doc| self.apply(doc)).collect()
    }
}

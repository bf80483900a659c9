use lazy_static::lazy_static;
use regex::RegexSet;
use std::collections::BTreeSet;
use std::sync::Arc;

use super::experience::{detect_experience_level, ExperienceLevel};
use super::vocabulary::{categorize_skills, SkillCategories, SkillVocabulary};

lazy_static! {
    static ref BUILTIN: SkillExtractor =
        SkillExtractor::new(SkillVocabulary::builtin()).expect("built-in vocabulary compiles");
}

/// Keyword classifier over a fixed vocabulary.
///
/// Every term becomes one case-insensitive pattern anchored on word boundaries,
/// so `java` does not match inside `javascript`. Matches are mapped through
/// the alias table and returned deduplicated and sorted.
#[derive(Clone)]
pub struct SkillExtractor {
    inner: Arc<Inner>,
}

struct Inner {
    vocabulary: SkillVocabulary,
    patterns: RegexSet,
    /// Canonical skill for each pattern, by index.
    canonical: Vec<String>,
}

impl SkillExtractor {
    pub fn new(vocabulary: SkillVocabulary) -> Result<Self, regex::Error> {
        let terms: Vec<&str> = vocabulary.terms().collect();
        let patterns = RegexSet::new(terms.iter().map(|term| term_pattern(term)))?;
        let canonical = terms
            .iter()
            .map(|term| vocabulary.canonical(term).to_string())
            .collect();

        Ok(Self {
            inner: Arc::new(Inner {
                vocabulary,
                patterns,
                canonical,
            }),
        })
    }

    /// Extractor over the built-in vocabulary (compiled once per process).
    pub fn builtin() -> Self {
        BUILTIN.clone()
    }

    pub fn vocabulary(&self) -> &SkillVocabulary {
        &self.inner.vocabulary
    }

    /// Canonical skills mentioned in `text`, sorted and deduplicated.
    pub fn extract_skills(&self, text: &str) -> Vec<String> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        let lower = text.to_lowercase();
        self.inner
            .patterns
            .matches(&lower)
            .into_iter()
            .map(|index| self.inner.canonical[index].as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(String::from)
            .collect()
    }

    pub fn detect_experience_level(&self, title: &str, description: &str) -> ExperienceLevel {
        detect_experience_level(title, description)
    }

    pub fn categorize<S: AsRef<str>>(&self, skills: &[S]) -> SkillCategories {
        categorize_skills(&self.inner.vocabulary, skills)
    }
}

impl std::fmt::Debug for SkillExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SkillExtractor")
            .field("vocabulary_version", &self.inner.vocabulary.version())
            .field("terms", &self.inner.canonical.len())
            .finish()
    }
}

/// Word boundaries only where the term starts or ends with a word character,
/// so `c++`, `c#` and `.net` can still match.
fn term_pattern(term: &str) -> String {
    let is_word = |c: char| c.is_alphanumeric() || c == '_';
    let lead = if term.chars().next().is_some_and(is_word) { r"\b" } else { "" };
    let trail = if term.chars().last().is_some_and(is_word) { r"\b" } else { "" };
    format!("(?i){lead}{}{trail}", regex::escape(term))
}

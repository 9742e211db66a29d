//! Phrase sequence for the typewriter rotation.

use tracing::warn;

/// Role titles shown by the hero section when no phrases are configured.
pub const DEFAULT_PHRASES: [&str; 4] = [
    "Desenvolvedor Full Stack",
    "Criador de Experiências",
    "Solucionador de Problemas",
    "Inovador Digital",
];

/// Ordered, immutable, non-empty list of phrases.
///
/// Indexed cyclically. Character positions count Unicode scalar values so
/// a prefix never splits a multi-byte character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhraseSequence {
    phrases: Vec<String>,
}

impl PhraseSequence {
    /// Builds a sequence from the given phrases.
    ///
    /// An empty input falls back to a single empty phrase so the cyclic
    /// index never divides by zero.
    #[must_use]
    pub fn new<I, S>(phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut phrases: Vec<String> = phrases.into_iter().map(Into::into).collect();
        if phrases.is_empty() {
            warn!("no typewriter phrases configured; falling back to a single empty phrase");
            phrases.push(String::new());
        }
        Self { phrases }
    }

    /// Number of phrases (always at least one).
    #[must_use]
    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    /// Always `false`; kept for API symmetry with collections.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }

    /// Phrase at `index`, wrapping around the sequence.
    #[must_use]
    pub fn get(&self, index: usize) -> &str {
        &self.phrases[index % self.phrases.len()]
    }

    /// Index of the phrase following `index`.
    #[must_use]
    pub fn next_index(&self, index: usize) -> usize {
        (index + 1) % self.phrases.len()
    }

    /// Iterates the phrases in order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.phrases.iter().map(String::as_str)
    }
}

impl Default for PhraseSequence {
    fn default() -> Self {
        Self::new(DEFAULT_PHRASES)
    }
}

/// Number of characters in `phrase`.
#[must_use]
pub fn char_len(phrase: &str) -> usize {
    phrase.chars().count()
}

/// First `chars` characters of `phrase`.
///
/// Saturates at the full phrase.
#[must_use]
pub fn prefix(phrase: &str, chars: usize) -> &str {
    let end = phrase
        .char_indices()
        .nth(chars)
        .map_or(phrase.len(), |(idx, _)| idx);
    &phrase[..end]
}

//! Config types for building a matcher from a dictionary file.
//!
//! [`NgramConfig`] is the serde-deserializable form of a dictionary. Entries
//! are validated then inserted in order, so the first entry for a given token
//! list wins, exactly as with repeated [`NgramMatcher::insert`] calls.
//!
//! ```yaml
//! ngrams:
//!   - tokens: [programming, language]
//!     value: programming language
//!   - tokens: [Python]
//!     value: Python
//! ```

use serde::Deserialize;

use crate::{NgramError, NgramMatcher, MAX_NGRAM_TOKENS};

/// Configuration for an [`NgramMatcher`].
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "V: Deserialize<'de>"))]
pub struct NgramConfig<V> {
    /// Dictionary entries, applied in order.
    pub ngrams: Vec<NgramEntryConfig<V>>,
}

/// One dictionary entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "V: Deserialize<'de>"))]
pub struct NgramEntryConfig<V> {
    /// The token sequence to match.
    pub tokens: Vec<String>,
    /// Payload reported when the sequence matches.
    pub value: V,
}

impl<V> NgramConfig<V> {
    /// Check every entry without building anything.
    ///
    /// # Errors
    ///
    /// Returns the first problem found: an entry with no tokens, an empty
    /// token, or more than [`MAX_NGRAM_TOKENS`] tokens.
    pub fn validate(&self) -> Result<(), NgramError> {
        self.ngrams
            .iter()
            .enumerate()
            .try_for_each(|(index, entry)| entry.validate(index))
    }

    /// Parse a config from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`NgramError::InvalidConfig`] if the JSON does not describe a
    /// config. Entries are not validated here; see [`validate`](Self::validate).
    #[cfg(feature = "config")]
    pub fn from_json(json: &str) -> Result<Self, NgramError>
    where
        V: serde::de::DeserializeOwned,
    {
        serde_json::from_str(json).map_err(|e| NgramError::InvalidConfig {
            source: e.to_string(),
        })
    }
}

impl<V> NgramEntryConfig<V> {
    fn validate(&self, index: usize) -> Result<(), NgramError> {
        if self.tokens.is_empty() {
            return Err(NgramError::EmptyNgram { index });
        }
        if self.tokens.len() > MAX_NGRAM_TOKENS {
            return Err(NgramError::NgramTooLong {
                index,
                len: self.tokens.len(),
                max: MAX_NGRAM_TOKENS,
            });
        }
        if let Some(position) = self.tokens.iter().position(String::is_empty) {
            return Err(NgramError::EmptyToken { index, position });
        }
        Ok(())
    }
}

impl<V> NgramMatcher<V> {
    /// Build a matcher from a validated config.
    ///
    /// # Errors
    ///
    /// Returns an error if any entry fails [`NgramConfig::validate`]. Nothing
    /// is built in that case.
    pub fn from_config(config: NgramConfig<V>) -> Result<Self, NgramError> {
        config.validate()?;

        let entries = config.ngrams.len();
        let matcher: Self = config
            .ngrams
            .into_iter()
            .map(|entry| (entry.tokens, entry.value))
            .collect();

        tracing::debug!(
            entries,
            ngrams = matcher.len(),
            duplicates = entries - matcher.len(),
            "loaded ngram config"
        );
        Ok(matcher)
    }
}

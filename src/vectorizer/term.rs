use core::str;
use std::collections::HashMap;

use ahash::RandomState;
use serde::{Deserialize, Serialize};

/// TermFrequency struct
/// Manages the raw occurrence count of each term (unigram or bigram)
/// in one document or query.
///
/// # Examples
/// ```
/// use cbf_recommender::TermFrequency;
/// let mut term_freq = TermFrequency::new();
/// term_freq.add_term("term1");
/// term_freq.add_term("term2");
/// term_freq.add_term("term1");
///
/// assert_eq!(term_freq.term_count("term1"), 2);
/// assert_eq!(term_freq.term_sum(), 3);
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct TermFrequency {
    term_count: HashMap<String, u64, RandomState>,
    total_term_count: u64,
}

/// Implementation for adding terms
impl TermFrequency {
    /// Create a new TermFrequency
    pub fn new() -> Self {
        TermFrequency {
            term_count: HashMap::with_hasher(RandomState::new()),
            total_term_count: 0,
        }
    }

    /// Add a term
    ///
    /// # Arguments
    /// * `term` - term to add
    #[inline]
    pub fn add_term(&mut self, term: &str) -> &mut Self {
        if let Some(count) = self.term_count.get_mut(term) {
            *count += 1;
        } else {
            self.term_count.insert(term.to_string(), 1);
        }
        self.total_term_count += 1;
        self
    }

    /// Add multiple terms
    ///
    /// # Arguments
    /// * `terms` - Slice of terms to add
    #[inline]
    pub fn add_terms<T>(&mut self, terms: &[T]) -> &mut Self
    where
        T: AsRef<str>,
    {
        for term in terms {
            self.add_term(term.as_ref());
        }
        self
    }

    /// Add the word n-grams of one field.
    /// n-grams never cross the field boundary.
    ///
    /// # Arguments
    /// * `tokens` - normalized tokens of the field
    /// * `ngram_range` - (min n, max n), inclusive
    pub fn add_ngrams<T>(&mut self, tokens: &[T], ngram_range: (usize, usize)) -> &mut Self
    where
        T: AsRef<str>,
    {
        let (lo, hi) = ngram_range;
        for n in lo.max(1)..=hi {
            if n == 1 {
                self.add_terms(tokens);
                continue;
            }
            for window in tokens.windows(n) {
                let gram = window.iter().map(|t| t.as_ref()).collect::<Vec<&str>>().join(" ");
                self.add_term(&gram);
            }
        }
        self
    }
}

/// Implementation for retrieving information from TermFrequency
impl TermFrequency {
    /// Get iterator over all terms and their counts
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.term_count.iter().map(|(term, &count)| (term.as_str(), count))
    }

    /// Get the total count of all terms
    #[inline]
    pub fn term_sum(&self) -> u64 {
        self.total_term_count
    }

    /// Get the occurrence count for a specific term
    ///
    /// # Arguments
    /// * `term` - term
    ///
    /// # Returns
    /// * `u64` - Occurrence count for the term
    #[inline]
    pub fn term_count(&self, term: &str) -> u64 {
        *self.term_count.get(term).unwrap_or(&0)
    }

    /// Check if a term exists
    #[inline]
    pub fn contains_term(&self, term: &str) -> bool {
        self.term_count.contains_key(term)
    }

    /// Get the number of unique terms
    #[inline]
    pub fn term_num(&self) -> usize {
        self.term_count.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.term_count.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_terms() {
        let mut tf = TermFrequency::new();
        tf.add_terms(&["cat", "dog", "cat"]);
        assert_eq!(tf.term_count("cat"), 2);
        assert_eq!(tf.term_count("bird"), 0);
        assert_eq!(tf.term_sum(), 3);
        assert_eq!(tf.term_num(), 2);
        assert!(tf.contains_term("dog"));
    }

    #[test]
    fn ngrams_stay_inside_fields() {
        let mut tf = TermFrequency::new();
        tf.add_ngrams(&["cat", "dog"], (1, 2));
        tf.add_ngrams(&["cat", "dog"], (1, 2));
        assert_eq!(tf.term_count("cat"), 2);
        assert_eq!(tf.term_count("dog"), 2);
        assert_eq!(tf.term_count("cat dog"), 2);
        assert_eq!(tf.term_count("dog cat"), 0);
    }

    #[test]
    fn ngram_range_bounds() {
        let tokens = ["machine", "learning", "model"];
        let mut uni = TermFrequency::new();
        uni.add_ngrams(&tokens, (1, 1));
        assert_eq!(uni.term_num(), 3);

        let mut bi = TermFrequency::new();
        bi.add_ngrams(&tokens, (2, 2));
        assert_eq!(bi.term_num(), 2);
        assert!(bi.contains_term("machine learning"));
        assert!(bi.contains_term("learning model"));

        let mut short = TermFrequency::new();
        short.add_ngrams(&["single"], (2, 3));
        assert!(short.is_empty());
    }
}

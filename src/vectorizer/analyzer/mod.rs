pub mod lemma;
pub mod stopwords;

use std::sync::Arc;

use regex::Regex;

use crate::config::NormalizerConfig;
use crate::vectorizer::analyzer::{lemma::{Lemmatizer, RuleLemmatizer}, stopwords::StopWords};

/// TextNormalizer
/// Deterministic text to token stream transform.
///
/// Pipeline:
/// 1. lowercase
/// 2. strip URLs and email-like substrings
/// 3. replace everything outside `[a-zA-Z\s]` with a space
/// 4. collapse whitespace
/// 5. tokenize
/// 6. drop stop words and short tokens
/// 7. lemmatize (a rejected token passes through unchanged)
/// 8. drop stop words and short tokens again
///
/// Every step is total, and `normalize(normalize(x)) == normalize(x)`.
///
/// # Examples
/// ```
/// use cbf_recommender::TextNormalizer;
/// let normalizer = TextNormalizer::new();
/// assert_eq!(
///     normalizer.normalize("The Neural Networks of 2024, https://x.org"),
///     "neural network"
/// );
/// ```
#[derive(Clone)]
pub struct TextNormalizer {
    url_email: Regex,
    non_alpha: Regex,
    stop_words: StopWords,
    lemmatizer: Arc<dyn Lemmatizer>,
    min_token_len: usize,
}

impl std::fmt::Debug for TextNormalizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextNormalizer")
            .field("stop_words", &self.stop_words.len())
            .field("min_token_len", &self.min_token_len)
            .finish()
    }
}

impl TextNormalizer {
    /// Normalizer with the built-in stop words and lemmatizer
    pub fn new() -> Self {
        Self::with_config(&NormalizerConfig::default())
    }

    pub fn with_config(config: &NormalizerConfig) -> Self {
        Self::with_lemmatizer(config, Arc::new(RuleLemmatizer::new()))
    }

    /// Use a custom lemmatizer.
    /// It must return fixed points to keep `normalize` idempotent.
    pub fn with_lemmatizer(config: &NormalizerConfig, lemmatizer: Arc<dyn Lemmatizer>) -> Self {
        Self {
            url_email: build_regex(r"https?\S*|www\S*|\S+@\S+"),
            non_alpha: build_regex(r"[^a-zA-Z\s]"),
            stop_words: StopWords::with_extra(&config.extra_stop_words),
            lemmatizer,
            min_token_len: config.min_token_len.max(1),
        }
    }

    #[inline]
    fn keep(&self, token: &str) -> bool {
        token.len() >= self.min_token_len && !self.stop_words.contains(token)
    }

    /// Normalize text into a single space separated token string
    pub fn normalize(&self, text: &str) -> String {
        self.tokens(text).join(" ")
    }

    /// Normalize text into tokens
    ///
    /// # Arguments
    /// * `text` - any text, malformed input degrades to fewer tokens
    ///
    /// # Returns
    /// * `Vec<String>` - surviving lemmatized tokens, in text order
    pub fn tokens(&self, text: &str) -> Vec<String> {
        if text.trim().is_empty() {
            return Vec::new();
        }
        let lowered = text.to_lowercase();
        let stripped = self.url_email.replace_all(&lowered, " ");
        let letters = self.non_alpha.replace_all(&stripped, " ");

        letters
            .split_whitespace()
            .filter(|t| self.keep(t))
            .map(|t| match self.lemmatizer.lemmatize(t) {
                Ok(lemma) => lemma.into_owned(),
                Err(e) => {
                    tracing::trace!("lemmatizer rejected {:?}: {}", t, e);
                    t.to_string()
                }
            })
            .filter(|t| self.keep(t))
            .collect()
    }

    /// Is `token` a stop word of this normalizer
    pub fn is_stop_word(&self, token: &str) -> bool {
        self.stop_words.contains(token)
    }

    /// Shortest token this normalizer keeps
    #[inline]
    pub fn min_token_len(&self) -> usize {
        self.min_token_len
    }
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

/// The patterns are compile-time constants
fn build_regex(pattern: &str) -> Regex {
    match Regex::new(pattern) {
        Ok(re) => re,
        Err(e) => panic!("invalid built-in pattern {pattern}: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// tiny deterministic PRNG (xorshift32)
    struct Rng(u32);
    impl Rng {
        fn next_u32(&mut self) -> u32 {
            let mut x = self.0;
            x ^= x << 13;
            x ^= x >> 17;
            x ^= x << 5;
            self.0 = x;
            x
        }
    }

    #[test]
    fn strips_noise_and_stop_words() {
        let n = TextNormalizer::new();
        assert_eq!(
            n.normalize("Deep Learning for NLP: a survey, doi 10.1000/12345 et al."),
            "deep learning nlp survey"
        );
        assert_eq!(
            n.normalize("Contact me at someone@example.com or www.site.org today"),
            "contact today"
        );
        assert_eq!(
            n.normalize("Analisis sentimen dengan metode yang baru"),
            "analisis sentimen metode"
        );
    }

    #[test]
    fn lemmatizes_and_refilters() {
        let n = TextNormalizer::new();
        assert_eq!(n.normalize("Classes of Networks and Studies"), "class network study");
        // "others" survives the first filter, its lemma "other" does not
        assert_eq!(n.normalize("others"), "");
    }

    #[test]
    fn empty_and_degenerate_inputs() {
        let n = TextNormalizer::new();
        assert_eq!(n.normalize(""), "");
        assert_eq!(n.normalize("   \t\n"), "");
        assert_eq!(n.normalize("12345 !!! ?? a an"), "");
        assert_eq!(n.normalize("ÜBER straße naïve"), "ber stra");
    }

    #[test]
    fn extra_stop_words_apply() {
        let config = NormalizerConfig {
            extra_stop_words: vec!["survey".into()],
            ..NormalizerConfig::default()
        };
        let n = TextNormalizer::with_config(&config);
        assert_eq!(n.normalize("A survey of graph methods"), "graph method");
    }

    #[test]
    fn normalize_is_idempotent() {
        let n = TextNormalizer::new();
        let fixed = [
            "The Quick Brown Foxes jumped over https://example.com/a?b=c lazy dogs!!",
            "Machine-learning classification of 3D point-clouds (CVPR'21), pp. 10-20",
            "analyses of criterias, lenses & biases; ÉTUDES des séries",
            "httpfoo www bar@baz classes glasses processes",
            "Penelitian ini adalah tentang jaringan syaraf tiruan",
        ];
        for text in fixed {
            let once = n.normalize(text);
            assert_eq!(n.normalize(&once), once, "input: {text}");
        }

        let alphabet: Vec<char> = "abcdeilnorstuy sS.-@:/1é".chars().collect();
        let mut rng = Rng(0x9E37_79B9);
        for _ in 0..500 {
            let len = (rng.next_u32() % 60) as usize;
            let text: String = (0..len)
                .map(|_| alphabet[(rng.next_u32() as usize) % alphabet.len()])
                .collect();
            let once = n.normalize(&text);
            assert_eq!(n.normalize(&once), once, "input: {text:?}");
        }
    }
}

use std::borrow::Cow;

use ahash::AHashMap;

use crate::error::LemmatizeError;

/// Reduces a token to its dictionary form.
///
/// Implementations must return fixed points:
/// `lemmatize(lemmatize(t)) == lemmatize(t)`.
/// The normalizer relies on this for its own idempotence.
pub trait Lemmatizer: Send + Sync {
    /// # Arguments
    /// * `token` - lowercase alphabetic token
    ///
    /// # Returns
    /// * `Cow<str>` - base form, borrowed when unchanged
    fn lemmatize<'a>(&self, token: &'a str) -> Result<Cow<'a, str>, LemmatizeError>;
}

/// Irregular plurals and words the suffix rules would damage.
/// Every value is itself a fixed point of the rules or a key mapping to itself.
const IRREGULAR: &[(&str, &str)] = &[
    ("children", "child"),
    ("men", "man"),
    ("women", "woman"),
    ("feet", "foot"),
    ("teeth", "tooth"),
    ("geese", "goose"),
    ("mice", "mouse"),
    ("analyses", "analysis"),
    ("diagnoses", "diagnosis"),
    ("hypotheses", "hypothesis"),
    ("syntheses", "synthesis"),
    ("theses", "thesis"),
    ("crises", "crisis"),
    ("axes", "axis"),
    ("criteria", "criterion"),
    ("phenomena", "phenomenon"),
    ("indices", "index"),
    ("matrices", "matrix"),
    ("vertices", "vertex"),
    ("appendices", "appendix"),
    ("caches", "cache"),
    ("niches", "niche"),
    ("movies", "movie"),
    ("cookies", "cookie"),
    ("lenses", "lens"),
    ("biases", "bias"),
    // unchanged
    ("lens", "lens"),
    ("bias", "bias"),
    ("atlas", "atlas"),
    ("canvas", "canvas"),
    ("alias", "alias"),
    ("series", "series"),
    ("species", "species"),
    ("news", "news"),
    ("always", "always"),
    ("perhaps", "perhaps"),
    ("whereas", "whereas"),
    ("towards", "towards"),
    ("afterwards", "afterwards"),
    ("sometimes", "sometimes"),
    ("besides", "besides"),
    ("physics", "physics"),
    ("mathematics", "mathematics"),
    ("economics", "economics"),
    ("linguistics", "linguistics"),
    ("robotics", "robotics"),
];

/// Endings of singular words that look plural
const PROTECTED: &[&str] = &["ss", "us", "is"];

/// Rule based English noun lemmatizer
#[derive(Debug, Clone)]
pub struct RuleLemmatizer {
    irregular: AHashMap<&'static str, &'static str>,
}

impl RuleLemmatizer {
    pub fn new() -> Self {
        Self {
            irregular: IRREGULAR.iter().copied().collect(),
        }
    }

    fn apply_rules(token: &str) -> Cow<'_, str> {
        if token.len() < 4
            || !token.ends_with('s')
            || PROTECTED.iter().any(|p| token.ends_with(p))
        {
            return Cow::Borrowed(token);
        }
        if token.len() >= 5 {
            if let Some(stem) = token.strip_suffix("ies") {
                return Cow::Owned(format!("{stem}y"));
            }
        }
        if token.ends_with("sses")
            || token.ends_with("xes")
            || token.ends_with("ches")
            || token.ends_with("shes")
        {
            return Cow::Borrowed(&token[..token.len() - 2]);
        }
        Cow::Borrowed(&token[..token.len() - 1])
    }
}

impl Default for RuleLemmatizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Lemmatizer for RuleLemmatizer {
    fn lemmatize<'a>(&self, token: &'a str) -> Result<Cow<'a, str>, LemmatizeError> {
        if token.is_empty() {
            return Err(LemmatizeError::Empty);
        }
        if !token.bytes().all(|b| b.is_ascii_lowercase()) {
            return Err(LemmatizeError::NonAlphabetic(token.to_string()));
        }
        if let Some(base) = self.irregular.get(token) {
            return Ok(Cow::Borrowed(*base));
        }
        let candidate = Self::apply_rules(token);
        match self.irregular.get(candidate.as_ref()) {
            Some(base) => Ok(Cow::Borrowed(*base)),
            None => Ok(candidate),
        }
    }
}

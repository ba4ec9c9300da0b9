use ahash::AHashMap;

use crate::vectorizer::term::TermFrequency;

/// Document frequency statistics of one corpus snapshot.
/// It does not store document text, it only manages:
/// - The number of documents
/// - The number of documents in which each term appears
/// - The total count of each term across the corpus
///
/// Used as the base data for IDF calculation and feature selection.
/// Built once per fit and never updated afterwards.
#[derive(Debug, Clone, Default)]
pub struct CorpusStats {
    doc_num: u64,
    doc_freq: AHashMap<Box<str>, u64>,
    total_count: AHashMap<Box<str>, u64>,
}

impl CorpusStats {
    /// Create a new instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from per-document term frequencies
    pub fn from_documents(docs: &[TermFrequency]) -> Self {
        let mut stats = Self::new();
        for doc in docs {
            stats.add_doc(doc);
        }
        stats
    }

    /// Add a document's terms
    pub fn add_doc(&mut self, doc: &TermFrequency) {
        self.doc_num += 1;
        for (term, count) in doc.iter() {
            if let Some(df) = self.doc_freq.get_mut(term) {
                *df += 1;
            } else {
                self.doc_freq.insert(term.into(), 1);
            }
            *self.total_count.entry(term.into()).or_insert(0) += count;
        }
    }

    /// Get the number of documents in the corpus
    #[inline]
    pub fn get_doc_num(&self) -> u64 {
        self.doc_num
    }

    /// Get the number of documents containing `term`
    #[inline]
    pub fn get_term_count(&self, term: &str) -> u64 {
        self.doc_freq.get(term).copied().unwrap_or(0)
    }

    /// Get the total occurrences of `term` across the corpus
    #[inline]
    pub fn get_total_count(&self, term: &str) -> u64 {
        self.total_count.get(term).copied().unwrap_or(0)
    }

    /// Get the current vocabulary size (number of unique terms)
    #[inline]
    pub fn vocab_size(&self) -> usize {
        self.doc_freq.len()
    }

    /// Iterate (term, document frequency)
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.doc_freq.iter().map(|(t, &df)| (t.as_ref(), df))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_documents_not_occurrences() {
        let mut a = TermFrequency::new();
        a.add_terms(&["rust", "rust", "fast"]);
        let mut b = TermFrequency::new();
        b.add_terms(&["rust", "safe"]);
        let stats = CorpusStats::from_documents(&[a, b, TermFrequency::new()]);

        assert_eq!(stats.get_doc_num(), 3);
        assert_eq!(stats.get_term_count("rust"), 2);
        assert_eq!(stats.get_total_count("rust"), 3);
        assert_eq!(stats.get_term_count("fast"), 1);
        assert_eq!(stats.get_term_count("slow"), 0);
        assert_eq!(stats.vocab_size(), 3);
    }
}

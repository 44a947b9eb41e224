//! Movie feature documents and TF-IDF vectorization.
//!
//! Each movie becomes a bag of terms: genres repeated three times, title
//! tokens twice, overview tokens once, and a `lang_<code>` token. The
//! catalog is then vectorized into L2-normalized TF-IDF rows over unigrams
//! and bigrams, with English stop words removed before bigrams are formed.

use std::collections::{HashMap, HashSet};

use crate::models::Movie;

use super::similarity::SparseVector;

const GENRE_REPEAT: usize = 3;
const TITLE_REPEAT: usize = 2;

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum TfidfError {
    /// Every document was empty or contained only stop words
    #[error("empty vocabulary; documents contain only stop words or no tokens")]
    EmptyVocabulary,
}

pub const ENGLISH_STOP_WORDS: &[&str] = &[
    "a", "about", "above", "across", "after", "afterwards", "again", "against", "all", "almost",
    "alone", "along", "already", "also", "although", "always", "am", "among", "amongst", "an",
    "and", "another", "any", "anyhow", "anyone", "anything", "anyway", "anywhere", "are",
    "around", "as", "at", "back", "be", "became", "because", "become", "becomes", "becoming",
    "been", "before", "beforehand", "behind", "being", "below", "beside", "besides", "between",
    "beyond", "both", "but", "by", "can", "cannot", "could", "did", "do", "does", "done", "down",
    "due", "during", "each", "eg", "either", "else", "elsewhere", "enough", "etc", "even",
    "ever", "every", "everyone", "everything", "everywhere", "except", "few", "for", "former",
    "formerly", "from", "further", "had", "has", "have", "he", "hence", "her", "here",
    "hereafter", "hereby", "herein", "hers", "herself", "him", "himself", "his", "how",
    "however", "ie", "if", "in", "indeed", "into", "is", "it", "its", "itself", "just", "last",
    "latter", "least", "less", "ltd", "made", "many", "may", "me", "meanwhile", "might", "mine",
    "more", "moreover", "most", "mostly", "much", "must", "my", "myself", "namely", "neither",
    "never", "nevertheless", "next", "no", "nobody", "none", "nor", "not", "nothing", "now",
    "nowhere", "of", "off", "often", "on", "once", "one", "only", "onto", "or", "other",
    "others", "otherwise", "our", "ours", "ourselves", "out", "over", "own", "per", "perhaps",
    "please", "rather", "re", "same", "seem", "seemed", "seeming", "seems", "several", "she",
    "should", "since", "so", "some", "somehow", "someone", "something", "sometime",
    "sometimes", "somewhere", "still", "such", "than", "that", "the", "their", "them",
    "themselves", "then", "thence", "there", "thereafter", "thereby", "therefore", "therein",
    "these", "they", "this", "those", "though", "through", "throughout", "thru", "thus", "to",
    "together", "too", "toward", "towards", "under", "until", "up", "upon", "us", "very", "via",
    "was", "we", "well", "were", "what", "whatever", "when", "whence", "whenever", "where",
    "whereafter", "whereas", "whereby", "wherein", "whereupon", "wherever", "whether", "which",
    "while", "who", "whoever", "whole", "whom", "whose", "why", "will", "with", "within",
    "without", "would", "yet", "you", "your", "yours", "yourself", "yourselves",
];

/// Builds the feature document for one movie
pub fn feature_document(movie: &Movie) -> String {
    let mut parts: Vec<String> = Vec::new();

    for _ in 0..GENRE_REPEAT {
        parts.extend(movie.genres.iter().cloned());
    }

    let title_words: Vec<String> = movie
        .title
        .to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect();
    for _ in 0..TITLE_REPEAT {
        parts.extend(title_words.iter().cloned());
    }

    if let Some(overview) = movie.overview.as_deref() {
        parts.extend(overview.to_lowercase().split_whitespace().map(str::to_string));
    }

    if let Some(language) = movie.original_language.as_deref() {
        parts.push(format!("lang_{}", language));
    }

    parts.join(" ")
}

/// Lowercase runs of word characters, at least two characters long
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|token| token.chars().count() >= 2)
        .map(str::to_string)
        .collect()
}

/// Stateless TF-IDF vectorizer, refit on every call
#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    max_features: usize,
    stop_words: HashSet<&'static str>,
}

impl TfidfVectorizer {
    pub fn new(max_features: usize) -> Self {
        Self {
            max_features,
            stop_words: ENGLISH_STOP_WORDS.iter().copied().collect(),
        }
    }

    /// Unigrams and bigrams of a document after stop-word removal
    fn terms(&self, document: &str) -> Vec<String> {
        let tokens: Vec<String> = tokenize(document)
            .into_iter()
            .filter(|token| !self.stop_words.contains(token.as_str()))
            .collect();

        let mut terms = tokens.clone();
        terms.extend(tokens.windows(2).map(|pair| pair.join(" ")));
        terms
    }

    /// Learns the vocabulary from `documents` and returns one unit-length
    /// TF-IDF row per document.
    ///
    /// `idf(t) = ln((1 + n) / (1 + df(t))) + 1`, term frequency is the raw count.
    pub fn fit_transform<S: AsRef<str>>(
        &self,
        documents: &[S],
    ) -> Result<Vec<SparseVector>, TfidfError> {
        let document_terms: Vec<Vec<String>> =
            documents.iter().map(|doc| self.terms(doc.as_ref())).collect();

        let mut term_freq: HashMap<&str, usize> = HashMap::new();
        let mut doc_freq: HashMap<&str, usize> = HashMap::new();
        for terms in &document_terms {
            let mut seen: HashSet<&str> = HashSet::new();
            for term in terms {
                *term_freq.entry(term.as_str()).or_insert(0) += 1;
                if seen.insert(term.as_str()) {
                    *doc_freq.entry(term.as_str()).or_insert(0) += 1;
                }
            }
        }

        if term_freq.is_empty() {
            return Err(TfidfError::EmptyVocabulary);
        }

        let mut ranked: Vec<(&str, usize)> = term_freq.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked.truncate(self.max_features);

        let mut kept: Vec<&str> = ranked.into_iter().map(|(term, _)| term).collect();
        kept.sort_unstable();
        let vocabulary: HashMap<&str, usize> =
            kept.iter().enumerate().map(|(index, term)| (*term, index)).collect();

        let n = documents.len() as f64;
        let idf: Vec<f64> = kept
            .iter()
            .map(|term| {
                let df = doc_freq.get(term).copied().unwrap_or(0) as f64;
                ((1.0 + n) / (1.0 + df)).ln() + 1.0
            })
            .collect();

        let rows = document_terms
            .iter()
            .map(|terms| {
                let entries: Vec<(usize, f64)> = terms
                    .iter()
                    .filter_map(|term| vocabulary.get(term.as_str()))
                    .map(|&index| (index, idf[index]))
                    .collect();
                let mut row = SparseVector::from_entries(entries);
                row.normalize();
                row
            })
            .collect();

        Ok(rows)
    }
}

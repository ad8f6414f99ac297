//! Literal snippet search over a single text blob
//!
//! Serves "find it in the file I sent earlier" lookups against the
//! session's retained attachment text. Not semantic and not ranked: every
//! case-insensitive literal occurrence of the query (or of its informative
//! words) is reported as a snippet of the surrounding original text.

use crate::config::SearchConfig;
use ahash::AHashSet;
use regex::{Regex, RegexBuilder};
use tracing::{debug, warn};

/// Term-based literal searcher with snippet extraction
pub struct TextSearcher {
    stop_words: AHashSet<String>,
    min_term_chars: usize,
    word_pattern: Regex,
}

impl TextSearcher {
    pub fn new(config: &SearchConfig) -> Self {
        Self {
            stop_words: config.search_stop_words(),
            min_term_chars: config.min_term_chars,
            // \w is Unicode-aware, so accented Portuguese words stay whole
            word_pattern: Regex::new(r"\w+").expect("static pattern"),
        }
    }

    /// Find every occurrence of the query terms in `haystack` and return
    /// deduplicated snippets of `radius` characters around each match
    pub fn search(&self, haystack: &str, query: &str, radius: usize) -> Vec<String> {
        if haystack.is_empty() || query.trim().is_empty() {
            return Vec::new();
        }

        let terms = self.terms(query);
        debug!("Direct search terms: {:?}", terms);

        let mut seen: AHashSet<String> = AHashSet::new();
        let mut snippets = Vec::new();

        for term in &terms {
            // The term is literal text; escape it so regex metacharacters
            // in user queries ("R$", "art. 5º") cannot break the pattern
            let pattern = match RegexBuilder::new(&regex::escape(term))
                .case_insensitive(true)
                .build()
            {
                Ok(pattern) => pattern,
                Err(e) => {
                    warn!("Unmatchable search term {:?}: {}", term, e);
                    continue;
                }
            };

            for m in pattern.find_iter(haystack) {
                let snippet = clip_snippet(haystack, m.start(), m.end(), radius);
                if seen.insert(snippet.clone()) {
                    snippets.push(snippet);
                }
            }
        }

        snippets
    }

    /// The full trimmed query plus its case-folded informative words
    fn terms(&self, query: &str) -> Vec<String> {
        let mut unique: AHashSet<String> = AHashSet::new();
        let mut terms = Vec::new();

        let full = query.trim().to_string();
        if unique.insert(full.clone()) {
            terms.push(full);
        }

        let folded = query.to_lowercase();
        for word in self.word_pattern.find_iter(&folded) {
            let word = word.as_str();
            if word.chars().count() <= self.min_term_chars {
                continue;
            }
            if self.stop_words.contains(word) {
                continue;
            }
            if unique.insert(word.to_string()) {
                terms.push(word.to_string());
            }
        }

        terms
    }
}

/// Slice `radius` characters either side of the match out of the original
/// text, marking clipped edges with an ellipsis
fn clip_snippet(haystack: &str, start: usize, end: usize, radius: usize) -> String {
    let from = if radius == 0 {
        start
    } else {
        haystack[..start]
            .char_indices()
            .rev()
            .take(radius)
            .last()
            .map(|(i, _)| i)
            .unwrap_or(0)
    };
    let to = haystack[end..]
        .char_indices()
        .nth(radius)
        .map(|(i, _)| end + i)
        .unwrap_or(haystack.len());

    let mut snippet = String::new();
    if from > 0 {
        snippet.push_str("...");
    }
    snippet.push_str(&haystack[from..to]);
    if to < haystack.len() {
        snippet.push_str("...");
    }
    snippet
}

impl SearchConfig {
    /// Stop words as a case-folded lookup set
    pub fn search_stop_words(&self) -> AHashSet<String> {
        self.stop_words
            .iter()
            .map(|word| word.to_lowercase())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn searcher() -> TextSearcher {
        TextSearcher::new(&Config::default().search)
    }

    #[test]
    fn test_literal_match_with_boundaries() {
        let snippets = searcher().search("O nome é João Silva.", "João", 5);
        assert_eq!(snippets, vec!["...me é João Silv..."]);
    }

    #[test]
    fn test_no_match() {
        let snippets = searcher().search("texto qualquer", "xyz123", 150);
        assert!(snippets.is_empty());
    }

    #[test]
    fn test_special_characters_do_not_panic() {
        let snippets = searcher().search("Preço: R$ 10,00", "R$", 5);
        assert_eq!(snippets.len(), 1);
        assert!(snippets[0].contains("R$"));
    }

    #[test]
    fn test_empty_inputs() {
        assert!(searcher().search("", "algo", 10).is_empty());
        assert!(searcher().search("algo", "", 10).is_empty());
        assert!(searcher().search("algo", "   ", 10).is_empty());
    }

    #[test]
    fn test_case_insensitive_preserves_original_casing() {
        let snippets = searcher().search("ALVARÁ de funcionamento", "alvará", 100);
        assert_eq!(snippets.len(), 1);
        assert!(snippets[0].contains("ALVARÁ"));
    }

    #[test]
    fn test_snippet_covers_whole_text_without_ellipsis() {
        let snippets = searcher().search("contrato social", "contrato", 100);
        assert_eq!(snippets, vec!["contrato social"]);
    }

    #[test]
    fn test_multi_word_query_matches_individual_words() {
        let haystack = "A certidão fica pronta em cinco dias. O protocolo é gratuito.";
        // The full phrase never occurs, but its informative words do
        let snippets = searcher().search(haystack, "certidão protocolo", 8);
        assert_eq!(snippets.len(), 2);
    }

    #[test]
    fn test_stop_words_not_searched_alone() {
        // "de" and "do" are stop words and too short; "lista" is a stop
        // word by configuration. None may match on their own.
        let haystack = "apenas palavras de ligação do texto e uma lista";
        let snippets = searcher().search(haystack, "lista de presença do evento", 10);

        // "presença" and "evento" are absent, "lista de presença do evento"
        // is absent, so nothing but non-stop words could match
        assert!(snippets.is_empty());
    }

    #[test]
    fn test_overlapping_matches_dedup() {
        let haystack = "multa multa multa";
        let snippets = searcher().search(haystack, "multa", 300);
        // All three occurrences clip to the identical full-text snippet
        assert_eq!(snippets.len(), 1);
    }

    #[test]
    fn test_ellipsis_only_on_clipped_sides() {
        let haystack = "início do documento com um final distante daqui";
        let snippets = searcher().search(haystack, "início", 10);
        assert_eq!(snippets.len(), 1);
        assert!(!snippets[0].starts_with("..."));
        assert!(snippets[0].ends_with("..."));
    }

    #[test]
    fn test_multibyte_radius_is_char_counted() {
        let haystack = "ããããã alvo ééééé";
        let snippets = searcher().search(haystack, "alvo", 2);
        assert_eq!(snippets, vec!["...ã alvo é..."]);
    }
}

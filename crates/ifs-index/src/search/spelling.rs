//! Spelling correction against the indexed vocabulary.
//!
//! Words are looked up in the unstemmed `spelling` field. A word whose
//! analyzed form never occurs there is replaced by the closest indexed term,
//! found by streaming the term dictionary through a Levenshtein automaton.
//! Candidates rank by edit distance, then by document frequency.

use std::{
    cmp::Reverse,
    collections::{HashMap, hash_map::Entry},
    str,
};

use levenshtein_automata::{Distance, LevenshteinAutomatonBuilder, SINK_STATE};
use tantivy::{
    Searcher, Term,
    schema::Field,
    tokenizer::{TextAnalyzer, TokenStream},
};
use tantivy_fst::Automaton;
use tracing::debug;

use crate::{IndexError, analyzer::build_words_analyzer};

/// Largest edit distance the corrector will search.
pub const MAX_FUZZY_DISTANCE: u8 = 2;

/// Query words that are never corrected.
const OPERATORS: [&str; 4] = ["AND", "OR", "NOT", "TO"];

/// Wrapper that implements `tantivy_fst::Automaton` for `levenshtein_automata::DFA`.
struct LevenshteinDfa(levenshtein_automata::DFA);

impl Automaton for LevenshteinDfa {
    type State = u32;

    fn start(&self) -> Self::State {
        self.0.initial_state()
    }

    fn is_match(&self, state: &Self::State) -> bool {
        matches!(self.0.distance(*state), Distance::Exact(_))
    }

    fn can_match(&self, state: &Self::State) -> bool {
        *state != SINK_STATE
    }

    fn accept(&self, state: &Self::State, byte: u8) -> Self::State {
        self.0.transition(*state, byte)
    }
}

/// Suggests corrections for misspelled query words.
pub struct SpellingCorrector {
    /// Automaton builder, `None` when correction is disabled.
    builder: Option<LevenshteinAutomatonBuilder>,
    /// Analyzer matching the `spelling` field.
    analyzer: TextAnalyzer,
    /// Field holding the vocabulary.
    field: Field,
}

impl SpellingCorrector {
    /// Creates a corrector over `field` allowing up to `max_distance` edits.
    ///
    /// Distances above [`MAX_FUZZY_DISTANCE`] are clamped; zero disables
    /// correction.
    pub fn new(field: Field, max_distance: u8) -> Self {
        let distance = max_distance.min(MAX_FUZZY_DISTANCE);
        Self {
            builder: (distance > 0).then(|| LevenshteinAutomatonBuilder::new(distance, true)),
            analyzer: build_words_analyzer(),
            field,
        }
    }

    /// Returns `text` with every unknown word replaced by its best candidate.
    ///
    /// Field-qualified clauses and boolean operators are left untouched, as
    /// is all punctuation and whitespace. Words with no candidate stay as
    /// written.
    pub fn correct(&self, searcher: &Searcher, text: &str) -> Result<String, IndexError> {
        let mut corrected = String::with_capacity(text.len());
        for chunk in text.split_inclusive(char::is_whitespace) {
            let word = chunk.trim_end();
            if word.contains(':') || OPERATORS.contains(&word) {
                corrected.push_str(chunk);
                continue;
            }
            self.correct_chunk(searcher, chunk, &mut corrected)?;
        }
        Ok(corrected)
    }

    /// Corrects each alphanumeric run in `chunk`, copying everything else.
    fn correct_chunk(
        &self,
        searcher: &Searcher,
        chunk: &str,
        out: &mut String,
    ) -> Result<(), IndexError> {
        let mut run_start = None;
        for (idx, ch) in chunk.char_indices() {
            match (ch.is_alphanumeric(), run_start) {
                (true, None) => run_start = Some(idx),
                (false, Some(start)) => {
                    out.push_str(&self.correct_word(searcher, &chunk[start..idx])?);
                    out.push(ch);
                    run_start = None;
                }
                (false, None) => out.push(ch),
                (true, Some(_)) => {}
            }
        }
        if let Some(start) = run_start {
            out.push_str(&self.correct_word(searcher, &chunk[start..])?);
        }
        Ok(())
    }

    /// Returns the best replacement for one word, or the word itself.
    fn correct_word(&self, searcher: &Searcher, word: &str) -> Result<String, IndexError> {
        let Some(builder) = &self.builder else {
            return Ok(word.to_string());
        };
        let Some(token) = self.analyze(word) else {
            return Ok(word.to_string());
        };

        let term = Term::from_field_text(self.field, &token);
        if searcher
            .doc_freq(&term)
            .map_err(|e| IndexError::search(&e))?
            > 0
        {
            return Ok(word.to_string());
        }

        let best = self.candidates(searcher, builder, &token)?.into_iter().min_by_key(
            |(candidate, (distance, freq))| (*distance, Reverse(*freq), candidate.clone()),
        );

        Ok(match best {
            Some((candidate, _)) => {
                debug!(word, candidate = %candidate, "spelling candidate");
                candidate
            }
            None => word.to_string(),
        })
    }

    /// Collects indexed terms within range of `token`, with their distance
    /// and summed document frequency.
    fn candidates(
        &self,
        searcher: &Searcher,
        builder: &LevenshteinAutomatonBuilder,
        token: &str,
    ) -> Result<HashMap<String, (u8, u64)>, IndexError> {
        let scorer = builder.build_dfa(token);
        let mut found: HashMap<String, (u8, u64)> = HashMap::new();

        for segment_reader in searcher.segment_readers() {
            let inverted_index = segment_reader
                .inverted_index(self.field)
                .map_err(|e| IndexError::search(&e))?;
            let dfa = LevenshteinDfa(builder.build_dfa(token));
            let mut stream = inverted_index.terms().search(dfa).into_stream()?;

            while stream.advance() {
                let Ok(candidate) = str::from_utf8(stream.key()) else {
                    continue;
                };
                let Distance::Exact(distance) = scorer.eval(candidate) else {
                    continue;
                };
                let doc_freq = u64::from(stream.value().doc_freq);
                match found.entry(candidate.to_string()) {
                    Entry::Occupied(mut entry) => entry.get_mut().1 += doc_freq,
                    Entry::Vacant(entry) => {
                        entry.insert((distance, doc_freq));
                    }
                }
            }
        }

        Ok(found)
    }

    /// Runs the words analyzer, returning the single token for a word.
    fn analyze(&self, word: &str) -> Option<String> {
        let mut analyzer = self.analyzer.clone();
        let mut stream = analyzer.token_stream(word);
        stream.next().map(|token| token.text.clone())
    }
}

//! Text analysis pipelines for the ifsearch index.
//!
//! Two analyzers are registered with every index:
//! - `ifs_text` for the searchable description: `SimpleTokenizer`, `LowerCaser`,
//!   `RemoveLongFilter`, `AsciiFoldingFilter`, then a language `Stemmer`.
//! - `ifs_words` for the spelling dictionary: the same pipeline without
//!   stemming, so suggestions are real words.
//!
//! The stemmer language comes from the `stemmer` setting in `.ifsearch.toml`.

use ifs_config::STEMMER_LANGUAGES;
use tantivy::{
    Index,
    tokenizer::{
        AsciiFoldingFilter, Language, LowerCaser, RemoveLongFilter, SimpleTokenizer, Stemmer,
        TextAnalyzer,
    },
};

use crate::IndexError;

/// Name of the stemming analyzer registered with Tantivy.
pub const TEXT_TOKENIZER: &str = "ifs_text";

/// Name of the non-stemming analyzer registered with Tantivy.
pub const WORDS_TOKENIZER: &str = "ifs_words";

/// Maximum token length in bytes before filtering.
const MAX_TOKEN_LENGTH: usize = 40;

/// Parses a stemmer language string into a Tantivy `Language`.
///
/// Accepts the names in [`STEMMER_LANGUAGES`], in any case. Returns an error
/// for anything else.
pub fn parse_language(name: &str) -> Result<Language, IndexError> {
    let name = name.to_lowercase();
    if !STEMMER_LANGUAGES.contains(&name.as_str()) {
        return Err(IndexError::InvalidLanguage(name));
    }
    match name.as_str() {
        "arabic" => Ok(Language::Arabic),
        "danish" => Ok(Language::Danish),
        "dutch" => Ok(Language::Dutch),
        "english" => Ok(Language::English),
        "finnish" => Ok(Language::Finnish),
        "french" => Ok(Language::French),
        "german" => Ok(Language::German),
        "greek" => Ok(Language::Greek),
        "hungarian" => Ok(Language::Hungarian),
        "italian" => Ok(Language::Italian),
        "norwegian" => Ok(Language::Norwegian),
        "portuguese" => Ok(Language::Portuguese),
        "romanian" => Ok(Language::Romanian),
        "russian" => Ok(Language::Russian),
        "spanish" => Ok(Language::Spanish),
        "swedish" => Ok(Language::Swedish),
        "tamil" => Ok(Language::Tamil),
        "turkish" => Ok(Language::Turkish),
        other => Err(IndexError::InvalidLanguage(other.to_string())),
    }
}

/// Builds the stemming analyzer for description text.
pub fn build_text_analyzer(language: Language) -> TextAnalyzer {
    TextAnalyzer::builder(SimpleTokenizer::default())
        .filter(LowerCaser)
        .filter(RemoveLongFilter::limit(MAX_TOKEN_LENGTH))
        .filter(AsciiFoldingFilter)
        .filter(Stemmer::new(language))
        .build()
}

/// Builds the word analyzer used for the spelling dictionary.
pub fn build_words_analyzer() -> TextAnalyzer {
    TextAnalyzer::builder(SimpleTokenizer::default())
        .filter(LowerCaser)
        .filter(RemoveLongFilter::limit(MAX_TOKEN_LENGTH))
        .filter(AsciiFoldingFilter)
        .build()
}

/// Registers both analyzers with an index.
///
/// Must run before documents are added or queries are parsed, since the
/// schema refers to the analyzers by name.
pub fn register_analyzers(index: &Index, language: Language) {
    let tokenizers = index.tokenizers();
    tokenizers.register(TEXT_TOKENIZER, build_text_analyzer(language));
    tokenizers.register(WORDS_TOKENIZER, build_words_analyzer());
}

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Characters Keras strips by default before splitting into words.
pub const DEFAULT_FILTERS: &str = "!\"#$%&()*+,-./:;<=>?@[\\]^_`{|}~\t\n";

#[derive(Debug, Error)]
pub enum VocabularyError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid tokenizer json: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("malformed tokenizer: {0}")]
    Malformed(String),
}

/// Word → id table exported from a Keras `Tokenizer`.
///
/// Reproduces `texts_to_sequences` exactly, including its handling of
/// `num_words` and the optional OOV token.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    word_index: HashMap<String, i64>,
    num_words: Option<usize>,
    oov_index: Option<i64>,
    filters: String,
    lower: bool,
    split: String,
    char_level: bool,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TokenizerFile {
    Keras { config: TokenizerConfig },
    Flat(TokenizerConfig),
}

#[derive(Deserialize)]
struct TokenizerConfig {
    #[serde(default)]
    num_words: Option<usize>,
    #[serde(default = "default_filters")]
    filters: String,
    #[serde(default = "default_true")]
    lower: bool,
    #[serde(default = "default_split")]
    split: String,
    #[serde(default)]
    char_level: bool,
    #[serde(default)]
    oov_token: Option<String>,
    word_index: WordIndex,
}

/// `Tokenizer.to_json()` stores `word_index` as a JSON document inside a string.
#[derive(Deserialize)]
#[serde(untagged)]
enum WordIndex {
    Map(HashMap<String, i64>),
    Encoded(String),
}

fn default_filters() -> String {
    DEFAULT_FILTERS.to_string()
}

fn default_true() -> bool {
    true
}

fn default_split() -> String {
    " ".to_string()
}

fn word_limit(num_words: Option<usize>) -> Option<usize> {
    num_words.filter(|&n| n > 0)
}

fn lookup_oov(word_index: &HashMap<String, i64>, token: &str) -> Result<i64, VocabularyError> {
    word_index.get(token).copied().ok_or_else(|| {
        VocabularyError::Malformed(format!("oov token `{token}` missing from word_index"))
    })
}

impl Vocabulary {
    /// Builds a vocabulary with Keras defaults around an existing index.
    pub fn from_word_index(word_index: HashMap<String, i64>) -> Self {
        Self {
            word_index,
            num_words: None,
            oov_index: None,
            filters: default_filters(),
            lower: true,
            split: default_split(),
            char_level: false,
        }
    }

    /// Keeps only ids below `num_words`. `0` means no limit, as in Keras.
    pub fn with_num_words(mut self, num_words: usize) -> Self {
        self.num_words = word_limit(Some(num_words));
        self
    }

    /// Registers `token` as the OOV marker. It must already be in the index.
    pub fn with_oov_token(mut self, token: &str) -> Result<Self, VocabularyError> {
        self.oov_index = Some(lookup_oov(&self.word_index, token)?);
        Ok(self)
    }

    pub fn from_file(path: &Path) -> Result<Self, VocabularyError> {
        let raw = fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, VocabularyError> {
        let config = match serde_json::from_str::<TokenizerFile>(raw)? {
            TokenizerFile::Keras { config } | TokenizerFile::Flat(config) => config,
        };

        let word_index = match config.word_index {
            WordIndex::Map(map) => map,
            WordIndex::Encoded(encoded) => serde_json::from_str(&encoded)?,
        };
        if word_index.is_empty() {
            return Err(VocabularyError::Malformed("word_index is empty".into()));
        }

        let oov_index = match &config.oov_token {
            Some(token) => Some(lookup_oov(&word_index, token)?),
            None => None,
        };

        Ok(Self {
            word_index,
            num_words: word_limit(config.num_words),
            oov_index,
            filters: config.filters,
            lower: config.lower,
            split: config.split,
            char_level: config.char_level,
        })
    }

    pub fn len(&self) -> usize {
        self.word_index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.word_index.is_empty()
    }

    /// Maps `text` to token ids. Unknown words become the OOV id when one is
    /// configured and are dropped otherwise.
    pub fn texts_to_sequence(&self, text: &str) -> Vec<i64> {
        let text = if self.lower {
            text.to_lowercase()
        } else {
            text.to_string()
        };

        if self.char_level {
            let mut buf = [0u8; 4];
            return text
                .chars()
                .filter_map(|c| self.lookup(c.encode_utf8(&mut buf)))
                .collect();
        }

        self.words(&text)
            .into_iter()
            .filter_map(|word| self.lookup(&word))
            .collect()
    }

    fn words(&self, text: &str) -> Vec<String> {
        let translated: String = text
            .chars()
            .map(|c| {
                if self.filters.contains(c) {
                    self.split.clone()
                } else {
                    c.to_string()
                }
            })
            .collect();

        if self.split.is_empty() {
            return translated.split_whitespace().map(str::to_string).collect();
        }
        translated
            .split(self.split.as_str())
            .filter(|w| !w.is_empty())
            .map(str::to_string)
            .collect()
    }

    fn lookup(&self, word: &str) -> Option<i64> {
        match self.word_index.get(word) {
            Some(&id) => match self.num_words {
                Some(limit) if id >= limit as i64 => self.oov_index,
                _ => Some(id),
            },
            None => self.oov_index,
        }
    }
}

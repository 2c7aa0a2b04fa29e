//! Text normalization, tokenization and padding.

mod vocab;

pub use vocab::{DEFAULT_FILTERS, Vocabulary, VocabularyError};

/// Which end of a sequence padding or truncation applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Pre,
    Post,
}

/// Whitespace as the cleaning rules see it: Unicode `White_Space` plus the
/// ASCII information separators U+001C..=U+001F.
///
/// The separators survive cleaning and stay inside a token, so
/// `"pad\u{1c}thai"` does not collapse into `"padthai"`.
pub fn is_text_space(c: char) -> bool {
    c.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&c)
}

fn trim_text_space(text: &str) -> &str {
    text.trim_matches(is_text_space)
}

fn keep_letters_and_space(c: &char) -> bool {
    c.is_ascii_alphabetic() || is_text_space(*c)
}

/// Cleaning used by the sentiment pipeline: drop everything outside
/// `[A-Za-z]` and whitespace, then lowercase and trim.
pub fn clean_review_text(text: &str) -> String {
    let kept: String = text.chars().filter(keep_letters_and_space).collect();
    trim_text_space(&kept.to_lowercase()).to_string()
}

/// Cleaning used by the text-to-food pipeline: lowercase first, then drop
/// everything outside `[A-Za-z]` and whitespace, then trim.
///
/// Lowercasing before filtering keeps letters whose lowercase form is ASCII
/// (the Kelvin sign becomes `k`), so this is not interchangeable with
/// [`clean_review_text`].
pub fn clean_query_text(text: &str) -> String {
    let kept: String = text
        .to_lowercase()
        .chars()
        .filter(keep_letters_and_space)
        .collect();
    trim_text_space(&kept).to_string()
}

/// Forces `seq` to exactly `len` ids, padding with `0`.
pub fn pad_sequence(seq: &[i64], len: usize, padding: Side, truncating: Side) -> Vec<i64> {
    let kept = if seq.len() > len {
        match truncating {
            Side::Pre => &seq[seq.len() - len..],
            Side::Post => &seq[..len],
        }
    } else {
        seq
    };

    let fill = len - kept.len();
    let mut out = Vec::with_capacity(len);
    if padding == Side::Pre {
        out.extend(std::iter::repeat_n(0, fill));
    }
    out.extend_from_slice(kept);
    if padding == Side::Post {
        out.extend(std::iter::repeat_n(0, fill));
    }
    out
}

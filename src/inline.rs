//! Inline-furigana annotations like `甲(こう)` or `振(ふ)り` are collapsed
//! into private-use-area placeholder characters before morphological
//! analysis, so the analyzer cannot re-split the annotated run. The table is
//! scoped to one transliteration call; tokens are never persisted.

use std::collections::HashMap;

use log::warn;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// `漢字(かな)おくり` with fullwidth or halfwidth parentheses. The reading is
/// a katakana run or a hiragana run (plus ー), the tail is optional okurigana.
static INLINE_FURIGANA: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\p{Han}+)[(（]([\p{Katakana}ー]+|[\p{Hiragana}ー]+)[)）](\p{Hiragana}*)")
        .expect("inline furigana pattern")
});

const PUA_FIRST: u32 = 0xE000;
const PUA_LAST: u32 = 0xF8FF;

/// True for codepoints in the Basic Multilingual Plane private use area,
/// where placeholder tokens are minted.
pub(crate) fn is_placeholder(c: char) -> bool {
    (PUA_FIRST..=PUA_LAST).contains(&(c as u32))
}

/// One tokenized inline annotation: the kanji run, its reading, and the
/// trailing okurigana.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct InlineToken {
    pub kanji: String,
    pub kana: String,
    pub okurigana: String,
}

/// Call-scoped table of placeholder tokens. Built once per transliteration
/// call; the next call starts over from U+E000.
#[derive(Debug, Default)]
pub(crate) struct TokenTable {
    tokens: HashMap<char, InlineToken>,
}

impl TokenTable {
    /// Replace every inline-furigana annotation in `text` with a fresh
    /// placeholder character and return the rewritten text together with
    /// the completed table.
    pub fn tokenize(text: &str) -> (String, TokenTable) {
        let mut tokens = HashMap::new();
        let mut next = PUA_FIRST;
        let replaced = INLINE_FURIGANA.replace_all(text, |caps: &Captures| {
            let placeholder = match char::from_u32(next) {
                Some(c) if next <= PUA_LAST => c,
                _ => {
                    // Table exhausted; leave the annotation as-is.
                    warn!("inline furigana table exhausted at U+{:04X}", next);
                    return caps[0].to_string();
                }
            };
            next += 1;
            tokens.insert(
                placeholder,
                InlineToken {
                    kanji: caps[1].to_string(),
                    kana: caps[2].to_string(),
                    okurigana: caps[3].to_string(),
                },
            );
            placeholder.to_string()
        });
        (replaced.into_owned(), TokenTable { tokens })
    }

    pub fn get(&self, placeholder: char) -> Option<&InlineToken> {
        let token = self.tokens.get(&placeholder);
        if token.is_none() {
            warn!(
                "placeholder U+{:04X} not found in the token table",
                placeholder as u32
            );
        }
        token
    }
}

//! Lyrics transliteration engine: language detection, Japanese furigana
//! alignment and Chinese pinyin annotation, rendered as per-line documents
//! of `(surface, reading)` units for plain, karaoke, and typing displays.

use std::sync::Arc;

use jieba_rs::Jieba;
use serde::{Deserialize, Serialize};

pub mod align;
pub mod analyzer;
pub mod error;
mod inline;
mod ja;
pub mod kana;
pub mod mapping;
pub mod script;
pub mod segmenter;
mod zh;

pub use crate::error::TransliterateError;
pub use crate::script::{get_language, Language};

use crate::analyzer::{MecabAnalyzer, MorphologicalAnalyzer};
use crate::mapping::{FuriganaMappingStore, MemoryMappingStore};
use crate::segmenter::{PassthroughSegmenter, PhraseSegmenter};

/// Smallest output element: a surface string with its reading. A plain unit
/// carries its surface as the reading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    pub surface: String,
    pub reading: String,
}

impl Unit {
    pub fn new(surface: impl Into<String>, reading: impl Into<String>) -> Self {
        Unit {
            surface: surface.into(),
            reading: reading.into(),
        }
    }

    pub fn plain(surface: impl Into<String>) -> Self {
        let surface = surface.into();
        Unit {
            reading: surface.clone(),
            surface,
        }
    }

    /// True when the unit needs no annotation.
    pub fn is_plain(&self) -> bool {
        self.surface == self.reading
    }
}

/// One input line, as a sequence of units.
pub type Line = Vec<Unit>;

/// The annotated form of a whole text, one entry per input line.
pub type Document = Vec<Line>;

/// Display mode, controlling unit granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Word-level units for inline reading aids.
    #[default]
    Plain,
    /// Fine-grained units aligned for ruby display.
    Karaoke,
    /// Input beats sized for typing games.
    Typing,
}

/// A caller-supplied reading for a grapheme range of one line,
/// `[left_index, right_index)` in grapheme-cluster positions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FuriganaLabel {
    pub content: String,
    pub left_index: usize,
    pub right_index: usize,
}

/// Options for [`Transliterator::segmented_transliteration`].
#[derive(Debug, Clone, Default)]
pub struct SegmentedOptions {
    /// Skip detection and force a language.
    pub language: Option<Language>,
    pub mode: Mode,
    /// Per-line explicit readings; when any line has labels, morphological
    /// analysis is bypassed for the whole call.
    pub furigana: Option<Vec<Vec<FuriganaLabel>>>,
}

/// The engine. Owns the jieba dictionary and the injected collaborators:
/// a morphological analyzer, a phrase segmenter, and a furigana correction
/// store.
pub struct Transliterator {
    jieba: Arc<Jieba>,
    analyzer: Box<dyn MorphologicalAnalyzer>,
    segmenter: Box<dyn PhraseSegmenter>,
    store: Box<dyn FuriganaMappingStore>,
}

impl Transliterator {
    /// Engine with the stock collaborators: a `mecab` subprocess for
    /// Japanese analysis, no extra phrase breaks, and an in-memory
    /// correction store.
    pub fn new() -> Self {
        Self::with_components(
            Box::new(MecabAnalyzer::new()),
            Box::new(PassthroughSegmenter),
            Box::new(MemoryMappingStore::new()),
        )
    }

    pub fn with_components(
        analyzer: Box<dyn MorphologicalAnalyzer>,
        segmenter: Box<dyn PhraseSegmenter>,
        store: Box<dyn FuriganaMappingStore>,
    ) -> Self {
        Transliterator {
            jieba: Arc::new(Jieba::new()),
            analyzer,
            segmenter,
            store,
        }
    }

    /// Annotate `text` into a [`Document`]. Lines map one-to-one onto input
    /// lines; concatenating the unit surfaces of a line reproduces that
    /// line.
    pub fn segmented_transliteration(
        &self,
        text: &str,
        options: &SegmentedOptions,
    ) -> Result<Document, TransliterateError> {
        let language = options.language.unwrap_or_else(|| get_language(text));
        match language {
            Language::Ja => ja::transliterate_ja(
                text,
                options.mode,
                options.furigana.as_deref(),
                self.analyzer.as_ref(),
                self.segmenter.as_ref(),
                self.store.as_ref(),
            ),
            Language::Zh => Ok(zh::transliterate_zh(&self.jieba, text, options.mode)),
            Language::En => Ok(text.split('\n').map(|v| vec![Unit::plain(v)]).collect()),
        }
    }

    /// Whole-text phonetic transcription: hiragana for Japanese, pinyin for
    /// Chinese (space-separated words), the input verbatim otherwise.
    pub fn transliterate(
        &self,
        text: &str,
        language: Option<Language>,
    ) -> Result<String, TransliterateError> {
        let language = language.unwrap_or_else(|| get_language(text));
        let options = SegmentedOptions {
            language: Some(language),
            mode: Mode::Plain,
            furigana: None,
        };
        match language {
            Language::Ja => {
                let doc = self.segmented_transliteration(text, &options)?;
                Ok(doc
                    .iter()
                    .map(|line| line.iter().map(|u| u.reading.as_str()).collect::<String>())
                    .collect::<Vec<_>>()
                    .join("\n"))
            }
            Language::Zh => {
                let doc = self.segmented_transliteration(text, &options)?;
                Ok(doc
                    .iter()
                    .map(|line| {
                        line.iter()
                            .map(|u| u.reading.as_str())
                            .collect::<Vec<_>>()
                            .join(" ")
                    })
                    .collect::<Vec<_>>()
                    .join("\n"))
            }
            Language::En => Ok(text.to_string()),
        }
    }
}

impl Default for Transliterator {
    fn default() -> Self {
        Transliterator::new()
    }
}

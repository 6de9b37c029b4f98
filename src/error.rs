use thiserror::Error;

/// Errors surfaced by a transliteration call. A call either yields a full
/// document or one of these; partial documents are never returned.
#[derive(Debug, Error)]
pub enum TransliterateError {
    /// The external morphological analyzer failed or produced output the
    /// engine cannot reconcile with the input (e.g. wrong line-break count).
    #[error("morphological analysis failed: {0}")]
    AnalysisFailure(String),

    /// The external phrase boundary segmenter failed.
    #[error("phrase segmentation failed: {0}")]
    SegmentationFailure(String),

    /// A caller-supplied furigana label does not fit its line.
    #[error("furigana label out of bounds on line {line}: [{left}, {right}) over {len} clusters")]
    InvalidFuriganaLabel {
        line: usize,
        left: usize,
        right: usize,
        len: usize,
    },

    /// The furigana mapping store failed to read or persist a row.
    #[error("furigana mapping store error: {0}")]
    Store(String),
}

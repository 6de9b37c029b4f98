use lyrics_translit_rs::analyzer::{Morpheme, MorphologicalAnalyzer};
use lyrics_translit_rs::error::TransliterateError;
use lyrics_translit_rs::mapping::{FuriganaMapping, FuriganaMappingStore, MemoryMappingStore};
use lyrics_translit_rs::segmenter::{PassthroughSegmenter, PhraseSegmenter};
use lyrics_translit_rs::{
    FuriganaLabel, Language, Mode, SegmentedOptions, Transliterator, Unit,
};

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// Canned analyzer: replays scripted morphemes for known inputs.
    struct FakeAnalyzer {
        responses: HashMap<String, Vec<Morpheme>>,
    }

    impl FakeAnalyzer {
        fn new(responses: &[(&str, Vec<Morpheme>)]) -> Self {
            FakeAnalyzer {
                responses: responses
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.clone()))
                    .collect(),
            }
        }
    }

    impl MorphologicalAnalyzer for FakeAnalyzer {
        fn analyze(&self, text: &str) -> Result<Vec<Morpheme>, TransliterateError> {
            self.responses
                .get(text)
                .cloned()
                .ok_or_else(|| TransliterateError::AnalysisFailure(format!("no script for {text}")))
        }
    }

    /// Segmenter that inserts a break after every span close.
    struct BreakAfterSpans;

    impl PhraseSegmenter for BreakAfterSpans {
        fn insert_breaks(&self, markup: &str) -> Result<String, TransliterateError> {
            Ok(markup.replace("</span>", "</span>\u{200B}"))
        }
    }

    fn engine(analyzer: FakeAnalyzer) -> Transliterator {
        let _ = env_logger::builder().is_test(true).try_init();
        Transliterator::with_components(
            Box::new(analyzer),
            Box::new(PassthroughSegmenter),
            Box::new(MemoryMappingStore::new()),
        )
    }

    fn options(mode: Mode) -> SegmentedOptions {
        SegmentedOptions {
            language: None,
            mode,
            furigana: None,
        }
    }

    #[test]
    fn plain_japanese_document() {
        let engine = engine(FakeAnalyzer::new(&[(
            "初音ミク",
            vec![Morpheme::word("初音ミク", Some("ハツネミク"))],
        )]));
        let doc = engine
            .segmented_transliteration("初音ミク", &options(Mode::Plain))
            .unwrap();
        assert_eq!(doc, vec![vec![Unit::new("初音ミク", "はつねみく")]]);
    }

    #[test]
    fn transliterate_joins_line_readings() {
        let engine = engine(FakeAnalyzer::new(&[(
            "夢を\n歌う",
            vec![
                Morpheme::word("夢", Some("ユメ")),
                Morpheme::word("を", None),
                Morpheme::line_break(),
                Morpheme::word("歌う", Some("ウタウ")),
            ],
        )]));
        assert_eq!(
            engine.transliterate("夢を\n歌う", None).unwrap(),
            "ゆめを\nうたう"
        );
    }

    #[test]
    fn karaoke_aligns_and_records_pairs() {
        let store = MemoryMappingStore::new();
        let row = FuriganaMapping {
            text: "初音".into(),
            furigana: "はつね".into(),
            segmented_text: Some("初,音".into()),
            segmented_furigana: Some("はつ,ね".into()),
        };
        store.upsert(&row).unwrap();
        let engine = Transliterator::with_components(
            Box::new(FakeAnalyzer::new(&[(
                "初音ミク",
                vec![Morpheme::word("初音ミク", Some("ハツネミク"))],
            )])),
            Box::new(PassthroughSegmenter),
            Box::new(store),
        );
        let doc = engine
            .segmented_transliteration("初音ミク", &options(Mode::Karaoke))
            .unwrap();
        assert_eq!(
            doc,
            vec![vec![
                Unit::new("初", "はつ"),
                Unit::new("音", "ね"),
                Unit::plain("ミク"),
            ]]
        );
    }

    #[test]
    fn karaoke_creates_rows_for_unseen_pairs() {
        let engine = engine(FakeAnalyzer::new(&[(
            "初音",
            vec![Morpheme::word("初音", Some("ハツネ"))],
        )]));
        // First pass has no curated row, so the pair stays whole.
        let doc = engine
            .segmented_transliteration("初音", &options(Mode::Karaoke))
            .unwrap();
        assert_eq!(doc, vec![vec![Unit::new("初音", "はつね")]]);
        // The same call is idempotent.
        let again = engine
            .segmented_transliteration("初音", &options(Mode::Karaoke))
            .unwrap();
        assert_eq!(doc, again);
    }

    #[test]
    fn typing_units_rebuild_each_line() {
        let text = "夢を見る";
        let engine = Transliterator::with_components(
            Box::new(FakeAnalyzer::new(&[(
                text,
                vec![
                    Morpheme::word("夢", Some("ユメ")),
                    Morpheme::word("を", None),
                    Morpheme::word("見る", Some("ミル")),
                ],
            )])),
            Box::new(BreakAfterSpans),
            Box::new(MemoryMappingStore::new()),
        );
        let doc = engine
            .segmented_transliteration(text, &options(Mode::Typing))
            .unwrap();
        let rebuilt: String = doc[0].iter().map(|u| u.surface.as_str()).collect();
        assert_eq!(rebuilt, text);
        for unit in &doc[0] {
            assert!(!unit.surface.contains('\u{200B}'));
            assert!(!unit.reading.contains('\u{200B}'));
        }
    }

    #[test]
    fn explicit_furigana_labels_shape_the_output() {
        let engine = engine(FakeAnalyzer::new(&[]));
        let doc = engine
            .segmented_transliteration(
                "歌声",
                &SegmentedOptions {
                    language: Some(Language::Ja),
                    mode: Mode::Karaoke,
                    furigana: Some(vec![vec![FuriganaLabel {
                        content: "うたごえ".into(),
                        left_index: 0,
                        right_index: 2,
                    }]]),
                },
            )
            .unwrap();
        assert_eq!(doc, vec![vec![Unit::new("歌声", "うたごえ")]]);
    }

    #[test]
    fn invalid_label_is_rejected() {
        let engine = engine(FakeAnalyzer::new(&[]));
        let err = engine
            .segmented_transliteration(
                "歌",
                &SegmentedOptions {
                    language: Some(Language::Ja),
                    mode: Mode::Plain,
                    furigana: Some(vec![vec![FuriganaLabel {
                        content: "うた".into(),
                        left_index: 2,
                        right_index: 1,
                    }]]),
                },
            )
            .unwrap_err();
        assert!(matches!(
            err,
            TransliterateError::InvalidFuriganaLabel { .. }
        ));
    }

    #[test]
    fn pure_han_text_routes_to_chinese() {
        let engine = engine(FakeAnalyzer::new(&[]));
        let doc = engine
            .segmented_transliteration("中文", &options(Mode::Plain))
            .unwrap();
        assert_eq!(doc, vec![vec![Unit::new("中文", "zhōngwén")]]);
    }

    #[test]
    fn chinese_transliteration_joins_with_spaces() {
        let engine = engine(FakeAnalyzer::new(&[]));
        let out = engine
            .transliterate("你好\n世界", Some(Language::Zh))
            .unwrap();
        assert_eq!(out, "nǐhǎo\nshìjiè");
    }

    #[test]
    fn latin_text_passes_through() {
        let engine = engine(FakeAnalyzer::new(&[]));
        let doc = engine
            .segmented_transliteration("hello\nworld", &options(Mode::Plain))
            .unwrap();
        assert_eq!(
            doc,
            vec![vec![Unit::plain("hello")], vec![Unit::plain("world")]]
        );
        assert_eq!(engine.transliterate("hello", None).unwrap(), "hello");
    }

    #[test]
    fn analyzer_failures_fail_the_call() {
        let engine = engine(FakeAnalyzer::new(&[]));
        let err = engine
            .segmented_transliteration("かな", &options(Mode::Plain))
            .unwrap_err();
        assert!(matches!(err, TransliterateError::AnalysisFailure(_)));
    }
}

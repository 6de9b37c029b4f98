//! Japanese transliteration pipeline: explicit-furigana grouping, and the
//! analyzer-driven plain/karaoke/typing formatters.

use unicode_segmentation::UnicodeSegmentation;

use crate::align::{furigana_separator, split_edge_whitespace, Run};
use crate::analyzer::{Morpheme, MorphologicalAnalyzer};
use crate::error::TransliterateError;
use crate::inline::{is_placeholder, TokenTable};
use crate::kana::kana_to_hira;
use crate::mapping::{apply_mapping, FuriganaMappingStore, MappingCache};
use crate::script::{has_han, has_japanese};
use crate::segmenter::{decode_ruby_spans, encode_ruby_spans, PhraseSegmenter};
use crate::{Document, FuriganaLabel, Line, Mode, Unit};

pub(crate) fn transliterate_ja(
    text: &str,
    mode: Mode,
    furigana: Option<&[Vec<FuriganaLabel>]>,
    analyzer: &dyn MorphologicalAnalyzer,
    segmenter: &dyn PhraseSegmenter,
    store: &dyn FuriganaMappingStore,
) -> Result<Document, TransliterateError> {
    let has_labels = furigana.map_or(false, |lines| lines.iter().any(|l| !l.is_empty()));
    if has_labels {
        let labels = furigana.unwrap_or_default();
        validate_labels(text, labels)?;
        return Ok(explicit_document(text, mode, labels));
    }

    // Protect inline 漢字(かな) annotations from the analyzer.
    let (tokenized, table) = TokenTable::tokenize(text);
    let morphemes = analyzer.analyze(&tokenized)?;
    let lines = group_lines(&morphemes);
    let expected = text.split('\n').count();
    if lines.len() != expected {
        return Err(TransliterateError::AnalysisFailure(format!(
            "analyzer produced {} lines for {} input lines",
            lines.len(),
            expected
        )));
    }

    let mut cache = MappingCache::new();
    let mut document = Vec::with_capacity(lines.len());
    for words in &lines {
        let line = match mode {
            Mode::Plain => plain_line(words, &table),
            Mode::Karaoke => karaoke_line(words, &table, store, &mut cache)?,
            Mode::Typing => typing_line(words, &table, segmenter)?,
        };
        document.push(line);
    }
    Ok(document)
}

fn group_lines(morphemes: &[Morpheme]) -> Vec<Vec<&Morpheme>> {
    let mut lines: Vec<Vec<&Morpheme>> = vec![Vec::new()];
    for m in morphemes {
        if m.is_line_break {
            lines.push(Vec::new());
        } else if let Some(line) = lines.last_mut() {
            line.push(m);
        }
    }
    lines
}

fn validate_labels(text: &str, labels: &[Vec<FuriganaLabel>]) -> Result<(), TransliterateError> {
    for (idx, base) in text.split('\n').enumerate() {
        let Some(line_labels) = labels.get(idx) else {
            continue;
        };
        let len = base.graphemes(true).count();
        let mut ptr = 0;
        for label in line_labels {
            if label.left_index < ptr || label.left_index > label.right_index || label.right_index > len
            {
                return Err(TransliterateError::InvalidFuriganaLabel {
                    line: idx,
                    left: label.left_index,
                    right: label.right_index,
                    len,
                });
            }
            ptr = label.right_index;
        }
    }
    Ok(())
}

/// Build the per-line groupings from caller-supplied labels. Replaces
/// morphological analysis entirely for the call.
fn explicit_document(text: &str, mode: Mode, labels: &[Vec<FuriganaLabel>]) -> Document {
    text.split('\n')
        .enumerate()
        .map(|(idx, base)| {
            let Some(line_labels) = labels.get(idx) else {
                return vec![Unit::plain(base)];
            };
            let graphemes: Vec<&str> = base.graphemes(true).collect();
            let mut runs: Vec<Run> = Vec::new();
            let mut ptr = 0;
            for label in line_labels {
                if label.left_index > ptr {
                    runs.push(Run::Literal(graphemes[ptr..label.left_index].concat()));
                }
                runs.push(Run::Ruby(
                    graphemes[label.left_index..label.right_index].concat(),
                    label.content.clone(),
                ));
                ptr = label.right_index;
            }
            if ptr < graphemes.len() {
                runs.push(Run::Literal(graphemes[ptr..].concat()));
            }

            match mode {
                Mode::Typing => merge_typing_runs(&runs),
                Mode::Karaoke | Mode::Plain => runs
                    .into_iter()
                    .map(|run| match run {
                        Run::Literal(s) => Unit::plain(s),
                        Run::Ruby(s, r) => Unit::new(s, r),
                    })
                    .collect(),
            }
        })
        .collect()
}

/// Typing beats: a new unit starts on the transition from a plain run to a
/// ruby run; everything else extends the current unit.
fn merge_typing_runs(runs: &[Run]) -> Line {
    let mut units: Vec<Unit> = Vec::new();
    let mut prev_was_literal = false;
    for run in runs {
        let ruby_after_literal = matches!(run, Run::Ruby(..)) && prev_was_literal;
        match units.last_mut() {
            Some(last) if !ruby_after_literal => match run {
                Run::Literal(s) => {
                    last.surface.push_str(s);
                    last.reading.push_str(s);
                }
                Run::Ruby(s, r) => {
                    last.surface.push_str(s);
                    last.reading.push_str(r);
                }
            },
            _ => units.push(match run {
                Run::Literal(s) => Unit::plain(s.clone()),
                Run::Ruby(s, r) => Unit::new(s.clone(), r.clone()),
            }),
        }
        prev_was_literal = matches!(run, Run::Literal(_));
    }
    units
}

fn plain_line(words: &[&Morpheme], table: &TokenTable) -> Line {
    words
        .iter()
        .map(|x| {
            if x.surface.chars().any(is_placeholder) {
                let mut unit = Unit::new("", "");
                for c in x.surface.chars() {
                    if let Some(token) = table.get(c) {
                        unit.surface.push_str(&token.kanji);
                        unit.surface.push_str(&token.okurigana);
                        unit.reading.push_str(&token.kana);
                        unit.reading.push_str(&token.okurigana);
                    }
                }
                unit
            } else if has_japanese(&x.surface) || has_han(&x.surface) {
                let mut reading = x.effective_reading().to_string();
                // The analyzer strips leading whitespace from readings;
                // restore it so surface and reading stay in step.
                let lead: String = x
                    .surface
                    .chars()
                    .take_while(|c| c.is_whitespace())
                    .collect();
                if !lead.is_empty() && !reading.starts_with(char::is_whitespace) {
                    reading = format!("{lead}{reading}");
                }
                Unit::new(x.surface.clone(), kana_to_hira(&reading))
            } else {
                Unit::plain(x.surface.clone())
            }
        })
        .collect()
}

fn karaoke_line(
    words: &[&Morpheme],
    table: &TokenTable,
    store: &dyn FuriganaMappingStore,
    cache: &mut MappingCache,
) -> Result<Line, TransliterateError> {
    // Per-word fine-grained runs first.
    let mut runs: Vec<Run> = Vec::new();
    for x in words {
        if x.surface.chars().any(is_placeholder) {
            for c in x.surface.chars() {
                if let Some(token) = table.get(c) {
                    runs.push(Run::Ruby(token.kanji.clone(), token.kana.clone()));
                    if !token.okurigana.is_empty() {
                        runs.push(Run::Literal(token.okurigana.clone()));
                    }
                }
            }
        } else if has_japanese(&x.surface) || has_han(&x.surface) {
            let hira = kana_to_hira(x.effective_reading());
            if hira == x.surface {
                runs.push(Run::Literal(x.surface.clone()));
            } else {
                for run in furigana_separator(&x.surface, &hira) {
                    runs.extend(apply_mapping(run, store, cache)?);
                }
            }
        } else {
            runs.push(Run::Literal(x.surface.clone()));
        }
    }

    // Join adjacent plain runs across word boundaries.
    let mut units: Vec<Unit> = Vec::new();
    for run in runs {
        match run {
            Run::Literal(s) => match units.last_mut() {
                Some(last) if last.is_plain() => {
                    last.surface.push_str(&s);
                    last.reading.push_str(&s);
                }
                _ => units.push(Unit::plain(s)),
            },
            Run::Ruby(s, r) => units.push(Unit::new(s, r)),
        }
    }

    Ok(normalize_whitespace(units))
}

/// Whitespace must never render inside a ruby span: pull leading/trailing
/// runs out of each unit into plain units of their own (left spaces merge
/// into a preceding plain unit when possible).
fn normalize_whitespace(units: Vec<Unit>) -> Line {
    let mut normalized: Vec<Unit> = Vec::new();
    for unit in units {
        let (text_l, text_c, text_r) = split_edge_whitespace(&unit.surface);
        let (ruby_l, ruby_c, ruby_r) = split_edge_whitespace(&unit.reading);
        if !text_l.is_empty() || !ruby_l.is_empty() {
            let space = if text_l.is_empty() {
                Unit::plain(ruby_l)
            } else if ruby_l.is_empty() {
                Unit::plain(text_l)
            } else {
                Unit::new(text_l, ruby_l)
            };
            match normalized.last_mut() {
                Some(last) if last.is_plain() => {
                    last.surface.push_str(&space.surface);
                    last.reading.push_str(&space.reading);
                }
                _ => normalized.push(space),
            }
        }
        if !text_c.is_empty() || !ruby_c.is_empty() {
            normalized.push(Unit::new(text_c, ruby_c));
        }
        if !text_r.is_empty() || !ruby_r.is_empty() {
            if text_r.is_empty() {
                normalized.push(Unit::plain(ruby_r));
            } else if ruby_r.is_empty() {
                normalized.push(Unit::plain(text_r));
            } else {
                normalized.push(Unit::new(text_r, ruby_r));
            }
        }
    }
    normalized
}

fn typing_line(
    words: &[&Morpheme],
    table: &TokenTable,
    segmenter: &dyn PhraseSegmenter,
) -> Result<Line, TransliterateError> {
    if words.is_empty() {
        return Ok(Vec::new());
    }
    let mut units: Vec<Unit> = Vec::new();
    let mut pending = Unit::new("", "");
    let flush = |units: &mut Vec<Unit>, pending: &mut Unit| {
        if !pending.surface.is_empty() && !pending.reading.is_empty() {
            units.push(std::mem::replace(pending, Unit::new("", "")));
        }
    };
    for x in words {
        if x.surface.chars().any(is_placeholder) {
            flush(&mut units, &mut pending);
            for c in x.surface.chars() {
                if let Some(token) = table.get(c) {
                    units.push(Unit::new(token.kanji.clone(), token.kana.clone()));
                    if !token.okurigana.is_empty() {
                        units.push(Unit::plain(token.okurigana.clone()));
                    }
                }
            }
        } else {
            flush(&mut units, &mut pending);
            pending.surface.push_str(&x.surface);
            pending
                .reading
                .push_str(&kana_to_hira(x.effective_reading()));
        }
    }
    if !pending.surface.is_empty() || !pending.reading.is_empty() {
        units.push(pending);
    }

    // Let the external segmenter pick wrap points, then rebuild the units.
    let markup = encode_ruby_spans(&units);
    let segmented = segmenter.insert_breaks(&markup)?;
    decode_ruby_spans(&segmented)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::MemoryMappingStore;
    use crate::segmenter::PassthroughSegmenter;

    struct StaticAnalyzer(Vec<Morpheme>);

    impl MorphologicalAnalyzer for StaticAnalyzer {
        fn analyze(&self, _text: &str) -> Result<Vec<Morpheme>, TransliterateError> {
            Ok(self.0.clone())
        }
    }

    fn run(
        text: &str,
        mode: Mode,
        morphemes: Vec<Morpheme>,
    ) -> Result<Document, TransliterateError> {
        let analyzer = StaticAnalyzer(morphemes);
        let store = MemoryMappingStore::new();
        transliterate_ja(text, mode, None, &analyzer, &PassthroughSegmenter, &store)
    }

    #[test]
    fn plain_mode_folds_readings() {
        let doc = run(
            "初音ミク",
            Mode::Plain,
            vec![Morpheme::word("初音ミク", Some("ハツネミク"))],
        )
        .unwrap();
        assert_eq!(doc, vec![vec![Unit::new("初音ミク", "はつねみく")]]);
    }

    #[test]
    fn plain_mode_keeps_latin_words_verbatim() {
        let doc = run(
            "hello 世界",
            Mode::Plain,
            vec![
                Morpheme::word("hello", None),
                Morpheme::word(" ", None),
                Morpheme::word("世界", Some("セカイ")),
            ],
        )
        .unwrap();
        assert_eq!(
            doc,
            vec![vec![
                Unit::plain("hello"),
                Unit::plain(" "),
                Unit::new("世界", "せかい"),
            ]]
        );
    }

    #[test]
    fn line_breaks_rebuild_the_document() {
        let doc = run(
            "歌\n声",
            Mode::Plain,
            vec![
                Morpheme::word("歌", Some("ウタ")),
                Morpheme::line_break(),
                Morpheme::word("声", Some("コエ")),
            ],
        )
        .unwrap();
        assert_eq!(
            doc,
            vec![
                vec![Unit::new("歌", "うた")],
                vec![Unit::new("声", "こえ")],
            ]
        );
    }

    #[test]
    fn missing_line_break_is_an_analysis_failure() {
        let err = run(
            "歌\n声",
            Mode::Plain,
            vec![Morpheme::word("歌声", Some("ウタゴエ"))],
        )
        .unwrap_err();
        assert!(matches!(err, TransliterateError::AnalysisFailure(_)));
    }

    #[test]
    fn karaoke_mode_aligns_okurigana() {
        let doc = run(
            "食べる",
            Mode::Karaoke,
            vec![Morpheme::word("食べる", Some("タベル"))],
        )
        .unwrap();
        assert_eq!(
            doc,
            vec![vec![Unit::new("食", "た"), Unit::plain("べる")]]
        );
    }

    #[test]
    fn karaoke_merges_adjacent_plain_words() {
        let doc = run(
            "きっと届く",
            Mode::Karaoke,
            vec![
                Morpheme::word("きっと", Some("キット")),
                Morpheme::word("届く", Some("トドク")),
            ],
        )
        .unwrap();
        assert_eq!(
            doc,
            vec![vec![
                Unit::plain("きっと"),
                Unit::new("届", "とど"),
                Unit::plain("く"),
            ]]
        );
    }

    #[test]
    fn karaoke_pulls_whitespace_out_of_ruby_units() {
        let doc = run(
            " 夢",
            Mode::Karaoke,
            vec![Morpheme::word(" 夢", Some("ユメ"))],
        )
        .unwrap();
        assert_eq!(
            doc,
            vec![vec![Unit::plain(" "), Unit::new("夢", "ゆめ")]]
        );
    }

    #[test]
    fn typing_mode_surfaces_reconstruct_the_line() {
        let text = "夢を食べたい";
        let doc = run(
            text,
            Mode::Typing,
            vec![
                Morpheme::word("夢", Some("ユメ")),
                Morpheme::word("を", None),
                Morpheme::word("食べ", Some("タベ")),
                Morpheme::word("たい", Some("タイ")),
            ],
        )
        .unwrap();
        let rebuilt: String = doc[0].iter().map(|u| u.surface.as_str()).collect();
        assert_eq!(rebuilt, text);
        for u in &doc[0] {
            assert!(!u.surface.contains('\u{200B}'));
            assert!(!u.reading.contains('\u{200B}'));
        }
    }

    #[test]
    fn inline_furigana_expands_in_plain_mode() {
        let analyzer = StaticAnalyzer(vec![Morpheme::word("\u{E000}", None)]);
        let store = MemoryMappingStore::new();
        let doc = transliterate_ja(
            "翔(か)ける",
            Mode::Plain,
            None,
            &analyzer,
            &PassthroughSegmenter,
            &store,
        )
        .unwrap();
        assert_eq!(doc, vec![vec![Unit::new("翔ける", "かける")]]);
    }

    #[test]
    fn inline_furigana_expands_in_typing_mode() {
        let analyzer = StaticAnalyzer(vec![Morpheme::word("\u{E000}", None)]);
        let store = MemoryMappingStore::new();
        let doc = transliterate_ja(
            "翔(か)ける",
            Mode::Typing,
            None,
            &analyzer,
            &PassthroughSegmenter,
            &store,
        )
        .unwrap();
        assert_eq!(
            doc,
            vec![vec![Unit::new("翔", "か"), Unit::plain("ける")]]
        );
    }

    #[test]
    fn explicit_labels_bypass_analysis() {
        let labels = vec![vec![FuriganaLabel {
            content: "うた".into(),
            left_index: 0,
            right_index: 1,
        }]];
        // The analyzer would fail loudly if it were consulted.
        struct PanicAnalyzer;
        impl MorphologicalAnalyzer for PanicAnalyzer {
            fn analyze(&self, _: &str) -> Result<Vec<Morpheme>, TransliterateError> {
                Err(TransliterateError::AnalysisFailure("not expected".into()))
            }
        }
        let store = MemoryMappingStore::new();
        let doc = transliterate_ja(
            "歌える",
            Mode::Plain,
            Some(&labels),
            &PanicAnalyzer,
            &PassthroughSegmenter,
            &store,
        )
        .unwrap();
        assert_eq!(
            doc,
            vec![vec![Unit::new("歌", "うた"), Unit::plain("える")]]
        );
    }

    #[test]
    fn explicit_labels_merge_typing_beats() {
        let labels = vec![vec![
            FuriganaLabel {
                content: "うた".into(),
                left_index: 0,
                right_index: 1,
            },
            FuriganaLabel {
                content: "こえ".into(),
                left_index: 1,
                right_index: 2,
            },
        ]];
        let analyzer = StaticAnalyzer(vec![]);
        let store = MemoryMappingStore::new();
        let doc = transliterate_ja(
            "歌声だ",
            Mode::Typing,
            Some(&labels),
            &analyzer,
            &PassthroughSegmenter,
            &store,
        )
        .unwrap();
        // Adjacent ruby runs merge; the trailing plain run extends the beat.
        assert_eq!(doc, vec![vec![Unit::new("歌声だ", "うたこえだ")]]);
    }

    #[test]
    fn out_of_bounds_label_is_rejected_before_processing() {
        let labels = vec![vec![FuriganaLabel {
            content: "うた".into(),
            left_index: 0,
            right_index: 5,
        }]];
        let analyzer = StaticAnalyzer(vec![]);
        let store = MemoryMappingStore::new();
        let err = transliterate_ja(
            "歌",
            Mode::Plain,
            Some(&labels),
            &analyzer,
            &PassthroughSegmenter,
            &store,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            TransliterateError::InvalidFuriganaLabel { line: 0, .. }
        ));
    }
}

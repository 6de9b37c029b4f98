//! Chinese transliteration: jieba word segmentation plus per-character
//! pinyin lookup. No external process is involved, so this path is
//! infallible; characters without a pinyin reading fall back to themselves.

use jieba_rs::Jieba;
use pinyin::ToPinyin;

use crate::{Document, Line, Mode, Unit};

#[derive(Clone, Copy)]
enum Style {
    /// Diacritic tone marks (zhōng), for display.
    Tone,
    /// Bare ASCII syllables (zhong), for typing input.
    Flat,
}

fn syllable(c: char, style: Style) -> Option<&'static str> {
    c.to_pinyin().map(|p| match style {
        Style::Tone => p.with_tone(),
        Style::Flat => p.plain(),
    })
}

/// Per-word syllable list: one entry per Han character, with maximal runs of
/// non-Han characters kept together as single entries.
fn syllables(word: &str, style: Style) -> Vec<String> {
    let mut out = Vec::new();
    let mut pending = String::new();
    for c in word.chars() {
        match syllable(c, style) {
            Some(s) => {
                if !pending.is_empty() {
                    out.push(std::mem::take(&mut pending));
                }
                out.push(s.to_string());
            }
            None => pending.push(c),
        }
    }
    if !pending.is_empty() {
        out.push(pending);
    }
    out
}

pub(crate) fn transliterate_zh(jieba: &Jieba, text: &str, mode: Mode) -> Document {
    let words = jieba.cut(text, true);

    // Rebuild line structure: newline tokens advance the current line.
    let mut lines: Vec<Vec<&str>> = vec![Vec::new()];
    for word in words {
        let breaks = word.matches('\n').count();
        if breaks > 0 {
            for _ in 0..breaks {
                lines.push(Vec::new());
            }
        } else if let Some(line) = lines.last_mut() {
            line.push(word);
        }
    }

    lines
        .iter()
        .map(|line| match mode {
            Mode::Plain => line
                .iter()
                .map(|word| Unit::new(*word, syllables(word, Style::Tone).concat()))
                .collect(),
            Mode::Typing => line
                .iter()
                .map(|word| Unit::new(*word, syllables(word, Style::Flat).join("'")))
                .collect(),
            Mode::Karaoke => karaoke_line(line),
        })
        .collect()
}

/// Karaoke wants per-character ruby where possible. Words the dictionary
/// fully covers split into one unit per character; words with no readings at
/// all stay plain (and merge with their plain neighbours); partially covered
/// words keep word granularity.
fn karaoke_line(words: &[&str]) -> Line {
    let mut units: Vec<Unit> = Vec::new();
    let push = |units: &mut Vec<Unit>, unit: Unit| {
        match units.last_mut() {
            Some(last) if unit.is_plain() && last.is_plain() => {
                last.surface.push_str(&unit.surface);
                last.reading.push_str(&unit.reading);
            }
            _ => units.push(unit),
        }
    };
    for word in words {
        let per_char: Vec<(char, Option<&'static str>)> = word
            .chars()
            .map(|c| (c, syllable(c, Style::Tone)))
            .collect();
        if per_char.iter().all(|(_, p)| p.is_none()) {
            push(&mut units, Unit::plain(*word));
        } else if per_char.iter().all(|(_, p)| p.is_some()) {
            for (c, p) in per_char {
                push(
                    &mut units,
                    Unit::new(c.to_string(), p.unwrap_or_default().to_string()),
                );
            }
        } else {
            push(
                &mut units,
                Unit::new(*word, syllables(word, Style::Tone).join(" ")),
            );
        }
    }
    units
}

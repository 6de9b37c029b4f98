//! Regex-driven alignment of a mixed kanji/kana surface against its full
//! hiragana reading. Each maximal Han run in the surface becomes a capture
//! group matching a hiragana run in the reading; literal text in between
//! pins the match.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::kana::kana_to_hira;

static HAN_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\p{Han}+").expect("han run pattern"));

/// One item of an alignment: literal text rendered as-is, or a surface run
/// carrying a ruby reading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Run {
    Literal(String),
    Ruby(String, String),
}

impl Run {
    /// Surface text of the run.
    pub fn surface(&self) -> &str {
        match self {
            Run::Literal(s) => s,
            Run::Ruby(s, _) => s,
        }
    }
}

/// Build the alignment pattern for a mixed surface: Han runs become
/// `(\p{Hiragana}+)` capture groups, everything else is matched literally.
/// Pure function, split out so the pattern construction can be fuzzed on its
/// own.
pub fn alignment_pattern(mixed: &str) -> String {
    let folded = kana_to_hira(mixed);
    let mut pattern = String::with_capacity(folded.len() * 2);
    let mut last = 0;
    for m in HAN_RUN.find_iter(&folded) {
        pattern.push_str(&regex::escape(&folded[last..m.start()]));
        pattern.push_str(r"(\p{Hiragana}+)");
        last = m.end();
    }
    pattern.push_str(&regex::escape(&folded[last..]));
    pattern
}

pub(crate) fn split_edge_whitespace(text: &str) -> (&str, &str, &str) {
    let trimmed_start = text.trim_start();
    let pre = &text[..text.len() - trimmed_start.len()];
    let core = trimmed_start.trim_end();
    let post = &trimmed_start[core.len()..];
    (pre, core, post)
}

/// Split a mixed surface into literal and ruby-bearing runs against its full
/// reading (already folded to hiragana). Never fails: when the reading
/// cannot be aligned, the whole pair degrades to a single ruby run.
pub fn furigana_separator(mixed: &str, kana: &str) -> Vec<Run> {
    // The reading comes without the surface's surrounding whitespace; pad it
    // back so literal sections line up.
    let (pre, _, post) = split_edge_whitespace(mixed);
    let kana = format!("{pre}{kana}{post}");

    let pattern = match Regex::new(&alignment_pattern(mixed)) {
        Ok(p) => p,
        Err(_) => return vec![Run::Ruby(mixed.to_string(), kana)],
    };
    let caps = match pattern.captures(&kana) {
        Some(caps) => caps,
        None => return vec![Run::Ruby(mixed.to_string(), kana)],
    };

    let mut runs = Vec::new();
    let mut group = 1;
    let mut last = 0;
    let push_literal = |runs: &mut Vec<Run>, text: &str| {
        if !text.is_empty() {
            runs.push(Run::Literal(text.to_string()));
        }
    };
    for m in HAN_RUN.find_iter(mixed) {
        push_literal(&mut runs, &mixed[last..m.start()]);
        let section = m.as_str();
        let reading = caps
            .get(group)
            .map(|g| g.as_str())
            .unwrap_or_default()
            .to_string();
        group += 1;
        if kana_to_hira(section) == reading {
            runs.push(Run::Literal(section.to_string()));
        } else {
            runs.push(Run::Ruby(section.to_string(), reading));
        }
        last = m.end();
    }
    push_literal(&mut runs, &mixed[last..]);
    runs
}

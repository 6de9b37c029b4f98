//! Kana utilities: katakana folding, romaji-to-hiragana conversion over a
//! static decision tree, and the reverse table-driven rendering.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

/// Fold katakana into hiragana. Every codepoint in `[U+30A1, U+30F6]` is
/// shifted down by 0x60; everything else passes through unchanged.
pub fn kana_to_hira(input: &str) -> String {
    input
        .chars()
        .map(|c| {
            if ('\u{30A1}'..='\u{30F6}').contains(&c) {
                char::from_u32(c as u32 - 0x60).unwrap_or(c)
            } else {
                c
            }
        })
        .collect()
}

enum KanaNode {
    Leaf(&'static str),
    Branch(&'static [(char, KanaNode)]),
}

use KanaNode::{Branch, Leaf};

/// Consonant/vowel decision tree for romaji input. Derived from the
/// Hepburn/wapuro conventions; every lowercase letter and `-` is a root edge.
static KANA_TREE: &[(char, KanaNode)] = &[
    ('-', Leaf("ー")),
    ('a', Leaf("あ")),
    ('i', Leaf("い")),
    ('u', Leaf("う")),
    ('e', Leaf("え")),
    ('o', Leaf("お")),
    (
        'k',
        Branch(&[
            ('a', Leaf("か")),
            ('i', Leaf("き")),
            ('u', Leaf("く")),
            ('e', Leaf("け")),
            ('o', Leaf("こ")),
            (
                'y',
                Branch(&[
                    ('a', Leaf("きゃ")),
                    ('i', Leaf("きぃ")),
                    ('u', Leaf("きゅ")),
                    ('e', Leaf("きぇ")),
                    ('o', Leaf("きょ")),
                ]),
            ),
            (
                'w',
                Branch(&[
                    ('a', Leaf("くぁ")),
                    ('i', Leaf("くぃ")),
                    ('u', Leaf("くぅ")),
                    ('e', Leaf("くぇ")),
                    ('o', Leaf("くぉ")),
                ]),
            ),
        ]),
    ),
    (
        's',
        Branch(&[
            ('a', Leaf("さ")),
            ('i', Leaf("し")),
            ('u', Leaf("す")),
            ('e', Leaf("せ")),
            ('o', Leaf("そ")),
            (
                'h',
                Branch(&[
                    ('a', Leaf("しゃ")),
                    ('i', Leaf("し")),
                    ('u', Leaf("しゅ")),
                    ('e', Leaf("しぇ")),
                    ('o', Leaf("しょ")),
                ]),
            ),
            (
                'y',
                Branch(&[
                    ('a', Leaf("しゃ")),
                    ('i', Leaf("しぃ")),
                    ('u', Leaf("しゅ")),
                    ('e', Leaf("しぇ")),
                    ('o', Leaf("しょ")),
                ]),
            ),
        ]),
    ),
    (
        't',
        Branch(&[
            ('a', Leaf("た")),
            ('i', Leaf("ち")),
            ('u', Leaf("つ")),
            ('e', Leaf("て")),
            ('o', Leaf("と")),
            (
                'h',
                Branch(&[
                    ('a', Leaf("てゃ")),
                    ('i', Leaf("てぃ")),
                    ('u', Leaf("てゅ")),
                    ('e', Leaf("てぇ")),
                    ('o', Leaf("てょ")),
                ]),
            ),
            (
                'y',
                Branch(&[
                    ('a', Leaf("ちゃ")),
                    ('i', Leaf("ちぃ")),
                    ('u', Leaf("ちゅ")),
                    ('e', Leaf("ちぇ")),
                    ('o', Leaf("ちょ")),
                ]),
            ),
            (
                's',
                Branch(&[
                    ('a', Leaf("つぁ")),
                    ('i', Leaf("つぃ")),
                    ('u', Leaf("つ")),
                    ('e', Leaf("つぇ")),
                    ('o', Leaf("つぉ")),
                ]),
            ),
            (
                'w',
                Branch(&[
                    ('a', Leaf("とぁ")),
                    ('i', Leaf("とぃ")),
                    ('u', Leaf("とぅ")),
                    ('e', Leaf("とぇ")),
                    ('o', Leaf("とぉ")),
                ]),
            ),
        ]),
    ),
    (
        'c',
        Branch(&[
            ('a', Leaf("か")),
            ('i', Leaf("し")),
            ('u', Leaf("く")),
            ('e', Leaf("せ")),
            ('o', Leaf("こ")),
            (
                'h',
                Branch(&[
                    ('a', Leaf("ちゃ")),
                    ('i', Leaf("ち")),
                    ('u', Leaf("ちゅ")),
                    ('e', Leaf("ちぇ")),
                    ('o', Leaf("ちょ")),
                ]),
            ),
            (
                'y',
                Branch(&[
                    ('a', Leaf("ちゃ")),
                    ('i', Leaf("ちぃ")),
                    ('u', Leaf("ちゅ")),
                    ('e', Leaf("ちぇ")),
                    ('o', Leaf("ちょ")),
                ]),
            ),
        ]),
    ),
    (
        'q',
        Branch(&[
            ('a', Leaf("くぁ")),
            ('i', Leaf("くぃ")),
            ('u', Leaf("く")),
            ('e', Leaf("くぇ")),
            ('o', Leaf("くぉ")),
        ]),
    ),
    (
        'n',
        Branch(&[
            ('a', Leaf("な")),
            ('i', Leaf("に")),
            ('u', Leaf("ぬ")),
            ('e', Leaf("ね")),
            ('o', Leaf("の")),
            ('n', Leaf("ん")),
            (
                'y',
                Branch(&[
                    ('a', Leaf("にゃ")),
                    ('i', Leaf("にぃ")),
                    ('u', Leaf("にゅ")),
                    ('e', Leaf("にぇ")),
                    ('o', Leaf("にょ")),
                ]),
            ),
        ]),
    ),
    (
        'h',
        Branch(&[
            ('a', Leaf("は")),
            ('i', Leaf("ひ")),
            ('u', Leaf("ふ")),
            ('e', Leaf("へ")),
            ('o', Leaf("ほ")),
            (
                'y',
                Branch(&[
                    ('a', Leaf("ひゃ")),
                    ('i', Leaf("ひぃ")),
                    ('u', Leaf("ひゅ")),
                    ('e', Leaf("ひぇ")),
                    ('o', Leaf("ひょ")),
                ]),
            ),
            (
                'w',
                Branch(&[
                    ('a', Leaf("うぁ")),
                    ('i', Leaf("うぃ")),
                    ('e', Leaf("うぇ")),
                    ('o', Leaf("うぉ")),
                ]),
            ),
        ]),
    ),
    (
        'f',
        Branch(&[
            ('a', Leaf("ふぁ")),
            ('i', Leaf("ふぃ")),
            ('u', Leaf("ふ")),
            ('e', Leaf("ふぇ")),
            ('o', Leaf("ふぉ")),
            (
                'y',
                Branch(&[('a', Leaf("ふゃ")), ('u', Leaf("ふゅ")), ('o', Leaf("ふょ"))]),
            ),
        ]),
    ),
    (
        'm',
        Branch(&[
            ('a', Leaf("ま")),
            ('i', Leaf("み")),
            ('u', Leaf("む")),
            ('e', Leaf("め")),
            ('o', Leaf("も")),
            (
                'y',
                Branch(&[
                    ('a', Leaf("みゃ")),
                    ('i', Leaf("みぃ")),
                    ('u', Leaf("みゅ")),
                    ('e', Leaf("みぇ")),
                    ('o', Leaf("みょ")),
                ]),
            ),
        ]),
    ),
    (
        'y',
        Branch(&[
            ('a', Leaf("や")),
            ('u', Leaf("ゆ")),
            ('e', Leaf("いぇ")),
            ('o', Leaf("よ")),
        ]),
    ),
    (
        'r',
        Branch(&[
            ('a', Leaf("ら")),
            ('i', Leaf("り")),
            ('u', Leaf("る")),
            ('e', Leaf("れ")),
            ('o', Leaf("ろ")),
            (
                'y',
                Branch(&[
                    ('a', Leaf("りゃ")),
                    ('i', Leaf("りぃ")),
                    ('u', Leaf("りゅ")),
                    ('e', Leaf("りぇ")),
                    ('o', Leaf("りょ")),
                ]),
            ),
        ]),
    ),
    (
        'w',
        Branch(&[
            ('a', Leaf("わ")),
            ('i', Leaf("うぃ")),
            ('u', Leaf("う")),
            ('e', Leaf("うぇ")),
            ('o', Leaf("を")),
            (
                'h',
                Branch(&[
                    ('a', Leaf("うぁ")),
                    ('i', Leaf("うぃ")),
                    ('u', Leaf("う")),
                    ('e', Leaf("うぇ")),
                    ('o', Leaf("うぉ")),
                ]),
            ),
            ('y', Branch(&[('i', Leaf("ゐ")), ('e', Leaf("ゑ"))])),
        ]),
    ),
    (
        'g',
        Branch(&[
            ('a', Leaf("が")),
            ('i', Leaf("ぎ")),
            ('u', Leaf("ぐ")),
            ('e', Leaf("げ")),
            ('o', Leaf("ご")),
            (
                'y',
                Branch(&[
                    ('a', Leaf("ぎゃ")),
                    ('i', Leaf("ぎぃ")),
                    ('u', Leaf("ぎゅ")),
                    ('e', Leaf("ぎぇ")),
                    ('o', Leaf("ぎょ")),
                ]),
            ),
            (
                'w',
                Branch(&[
                    ('a', Leaf("ぐぁ")),
                    ('i', Leaf("ぐぃ")),
                    ('u', Leaf("ぐぅ")),
                    ('e', Leaf("ぐぇ")),
                    ('o', Leaf("ぐぉ")),
                ]),
            ),
        ]),
    ),
    (
        'z',
        Branch(&[
            ('a', Leaf("ざ")),
            ('i', Leaf("じ")),
            ('u', Leaf("ず")),
            ('e', Leaf("ぜ")),
            ('o', Leaf("ぞ")),
            (
                'y',
                Branch(&[
                    ('a', Leaf("じゃ")),
                    ('i', Leaf("じぃ")),
                    ('u', Leaf("じゅ")),
                    ('e', Leaf("じぇ")),
                    ('o', Leaf("じょ")),
                ]),
            ),
        ]),
    ),
    (
        'j',
        Branch(&[
            ('a', Leaf("じゃ")),
            ('i', Leaf("じ")),
            ('u', Leaf("じゅ")),
            ('e', Leaf("じぇ")),
            ('o', Leaf("じょ")),
            (
                'y',
                Branch(&[
                    ('a', Leaf("じゃ")),
                    ('i', Leaf("じぃ")),
                    ('u', Leaf("じゅ")),
                    ('e', Leaf("じぇ")),
                    ('o', Leaf("じょ")),
                ]),
            ),
        ]),
    ),
    (
        'd',
        Branch(&[
            ('a', Leaf("だ")),
            ('i', Leaf("ぢ")),
            ('u', Leaf("づ")),
            ('e', Leaf("で")),
            ('o', Leaf("ど")),
            (
                'h',
                Branch(&[
                    ('a', Leaf("でゃ")),
                    ('i', Leaf("でぃ")),
                    ('u', Leaf("でゅ")),
                    ('e', Leaf("でぇ")),
                    ('o', Leaf("でょ")),
                ]),
            ),
            (
                'y',
                Branch(&[
                    ('a', Leaf("ぢゃ")),
                    ('i', Leaf("ぢぃ")),
                    ('u', Leaf("ぢゅ")),
                    ('e', Leaf("ぢぇ")),
                    ('o', Leaf("ぢょ")),
                ]),
            ),
            (
                'w',
                Branch(&[
                    ('a', Leaf("どぁ")),
                    ('i', Leaf("どぃ")),
                    ('u', Leaf("どぅ")),
                    ('e', Leaf("どぇ")),
                    ('o', Leaf("どぉ")),
                ]),
            ),
        ]),
    ),
    (
        'b',
        Branch(&[
            ('a', Leaf("ば")),
            ('i', Leaf("び")),
            ('u', Leaf("ぶ")),
            ('e', Leaf("べ")),
            ('o', Leaf("ぼ")),
            (
                'y',
                Branch(&[
                    ('a', Leaf("びゃ")),
                    ('i', Leaf("びぃ")),
                    ('u', Leaf("びゅ")),
                    ('e', Leaf("びぇ")),
                    ('o', Leaf("びょ")),
                ]),
            ),
        ]),
    ),
    (
        'v',
        Branch(&[
            ('a', Leaf("ゔぁ")),
            ('i', Leaf("ゔぃ")),
            ('u', Leaf("ゔ")),
            ('e', Leaf("ゔぇ")),
            ('o', Leaf("ゔぉ")),
            (
                'y',
                Branch(&[
                    ('a', Leaf("ゔゃ")),
                    ('i', Leaf("ゔぃ")),
                    ('u', Leaf("ゔゅ")),
                    ('e', Leaf("ゔぇ")),
                    ('o', Leaf("ゔょ")),
                ]),
            ),
        ]),
    ),
    (
        'p',
        Branch(&[
            ('a', Leaf("ぱ")),
            ('i', Leaf("ぴ")),
            ('u', Leaf("ぷ")),
            ('e', Leaf("ぺ")),
            ('o', Leaf("ぽ")),
            (
                'y',
                Branch(&[
                    ('a', Leaf("ぴゃ")),
                    ('i', Leaf("ぴぃ")),
                    ('u', Leaf("ぴゅ")),
                    ('e', Leaf("ぴぇ")),
                    ('o', Leaf("ぴょ")),
                ]),
            ),
        ]),
    ),
    (
        'x',
        Branch(&[
            ('a', Leaf("ぁ")),
            ('i', Leaf("ぃ")),
            ('u', Leaf("ぅ")),
            ('e', Leaf("ぇ")),
            ('o', Leaf("ぉ")),
            (
                'y',
                Branch(&[
                    ('a', Leaf("ゃ")),
                    ('i', Leaf("ぃ")),
                    ('u', Leaf("ゅ")),
                    ('e', Leaf("ぇ")),
                    ('o', Leaf("ょ")),
                ]),
            ),
            (
                't',
                Branch(&[('u', Leaf("っ")), ('s', Branch(&[('u', Leaf("っ"))]))]),
            ),
            ('w', Branch(&[('a', Leaf("ゎ"))])),
            ('n', Leaf("ん")),
            ('k', Branch(&[('a', Leaf("ゕ")), ('e', Leaf("ゖ"))])),
        ]),
    ),
    (
        'l',
        Branch(&[
            ('a', Leaf("ぁ")),
            ('i', Leaf("ぃ")),
            ('u', Leaf("ぅ")),
            ('e', Leaf("ぇ")),
            ('o', Leaf("ぉ")),
            (
                'y',
                Branch(&[
                    ('a', Leaf("ゃ")),
                    ('i', Leaf("ぃ")),
                    ('u', Leaf("ゅ")),
                    ('e', Leaf("ぇ")),
                    ('o', Leaf("ょ")),
                ]),
            ),
            (
                't',
                Branch(&[('u', Leaf("っ")), ('s', Branch(&[('u', Leaf("っ"))]))]),
            ),
            ('w', Branch(&[('a', Leaf("ゎ"))])),
            ('k', Branch(&[('a', Leaf("ゕ")), ('e', Leaf("ゖ"))])),
        ]),
    ),
];

fn lookup<'a>(node: &'a [(char, KanaNode)], c: char) -> Option<&'a KanaNode> {
    node.iter().find(|(k, _)| *k == c).map(|(_, v)| v)
}

fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'i' | 'u' | 'e' | 'o')
}

/// Convert ASCII romanization to hiragana with a greedy longest-match walk
/// over [`KANA_TREE`]. Macron vowels become `vowel + "-"` before the walk.
/// Consonant doubling emits a sokuon, a broken `n` path emits `ん`, and
/// characters outside `[a-z-]` are passed through literally after the
/// pending buffer is flushed. Pure: same input, same output.
pub fn roma_to_hira(input: &str) -> String {
    let mut roma = String::with_capacity(input.len());
    for c in input.to_lowercase().chars() {
        match c {
            'ā' => roma.push_str("a-"),
            'ī' => roma.push_str("i-"),
            'ū' => roma.push_str("u-"),
            'ē' => roma.push_str("e-"),
            'ō' => roma.push_str("o-"),
            _ => roma.push(c),
        }
    }

    let chars: Vec<char> = roma.chars().collect();
    let mut result = String::new();
    let mut pending = String::new();
    let mut node = KANA_TREE;
    let mut at_root = true;
    let mut index = 0;

    while index < chars.len() {
        let c = chars[index];
        if c.is_ascii_lowercase() || c == '-' {
            let prev = index.checked_sub(1).map(|i| chars[i]);
            let next = chars.get(index + 1).copied();
            if let Some(entry) = lookup(node, c) {
                match entry {
                    KanaNode::Leaf(kana) => {
                        result.push_str(kana);
                        pending.clear();
                        node = KANA_TREE;
                        at_root = true;
                        // A second `n` followed by a vowel starts the next
                        // syllable: re-process it from the root instead of
                        // letting the emitted ん consume it.
                        if prev == Some('n') && c == 'n' && next.map_or(false, is_vowel) {
                            continue;
                        }
                    }
                    KanaNode::Branch(children) => {
                        pending.push(c);
                        node = children;
                        at_root = false;
                    }
                }
                index += 1;
                continue;
            }
            // The character cannot extend the current path.
            if let Some(p) = prev {
                if p == 'n' || p == c || (p == 't' && c == 'c') {
                    result.push_str(if p == 'n' { "ん" } else { "っ" });
                    pending.clear();
                }
            }
            if !at_root {
                if pending == "n" {
                    result.push_str("ん");
                } else {
                    result.push_str(&pending);
                }
                pending.clear();
                node = KANA_TREE;
                at_root = true;
                continue;
            }
        }
        // Literal emission, flushing the buffer first.
        if pending == "n" {
            result.push_str("ん");
        } else {
            result.push_str(&pending);
        }
        result.push(c);
        pending.clear();
        node = KANA_TREE;
        at_root = true;
        index += 1;
    }

    if pending == "n" {
        result.push_str("ん");
    } else {
        result.push_str(&pending);
    }
    result
}

/// Hiragana (digraph first) to wapuro romaji. The reverse rendering used by
/// the furigana/romaji matching screens.
static HIRA_TO_ROMA_TABLE: &[(&str, &str)] = &[
    ("いぇ", "ye"),
    ("うぁ", "wha"),
    ("うぃ", "wi"),
    ("うぇ", "we"),
    ("うぉ", "who"),
    ("ゔぁ", "va"),
    ("ゔぃ", "vi"),
    ("ゔぇ", "ve"),
    ("ゔぉ", "vo"),
    ("ゔゃ", "vya"),
    ("ゔゅ", "vyu"),
    ("ゔょ", "vyo"),
    ("きゃ", "kya"),
    ("きぃ", "kyi"),
    ("きゅ", "kyu"),
    ("きぇ", "kye"),
    ("きょ", "kyo"),
    ("ぎゃ", "gya"),
    ("ぎぃ", "gyi"),
    ("ぎゅ", "gyu"),
    ("ぎぇ", "gye"),
    ("ぎょ", "gyo"),
    ("くぁ", "kwa"),
    ("くぃ", "kwi"),
    ("くぅ", "kwu"),
    ("くぇ", "kwe"),
    ("くぉ", "kwo"),
    ("ぐぁ", "gwa"),
    ("ぐぃ", "gwi"),
    ("ぐぅ", "gwu"),
    ("ぐぇ", "gwe"),
    ("ぐぉ", "gwo"),
    ("しゃ", "sha"),
    ("しぃ", "syi"),
    ("しゅ", "shu"),
    ("しぇ", "she"),
    ("しょ", "sho"),
    ("じゃ", "ja"),
    ("じぃ", "jyi"),
    ("じゅ", "ju"),
    ("じぇ", "je"),
    ("じょ", "jo"),
    ("ちゃ", "cha"),
    ("ちぃ", "cyi"),
    ("ちゅ", "chu"),
    ("ちぇ", "che"),
    ("ちょ", "cho"),
    ("ぢゃ", "dya"),
    ("ぢぃ", "dyi"),
    ("ぢゅ", "dyu"),
    ("ぢぇ", "dye"),
    ("ぢょ", "dyo"),
    ("つぁ", "tsa"),
    ("つぃ", "tsi"),
    ("つぇ", "tse"),
    ("つぉ", "tso"),
    ("てゃ", "tha"),
    ("てぃ", "thi"),
    ("てゅ", "thu"),
    ("てぇ", "the"),
    ("てょ", "tho"),
    ("でゃ", "dha"),
    ("でぃ", "di"),
    ("でゅ", "dhu"),
    ("でぇ", "dhe"),
    ("でょ", "dho"),
    ("とぁ", "twa"),
    ("とぃ", "twi"),
    ("とぅ", "twu"),
    ("とぇ", "twe"),
    ("とぉ", "two"),
    ("どぁ", "dwa"),
    ("どぃ", "dwi"),
    ("どぅ", "dwu"),
    ("どぇ", "dwe"),
    ("どぉ", "dwo"),
    ("にゃ", "nya"),
    ("にぃ", "nyi"),
    ("にゅ", "nyu"),
    ("にぇ", "nye"),
    ("にょ", "nyo"),
    ("ひゃ", "hya"),
    ("ひぃ", "hyi"),
    ("ひゅ", "hyu"),
    ("ひぇ", "hye"),
    ("ひょ", "hyo"),
    ("ぴゃ", "pya"),
    ("ぴぃ", "pyi"),
    ("ぴゅ", "pyu"),
    ("ぴぇ", "pye"),
    ("ぴょ", "pyo"),
    ("びゃ", "bya"),
    ("びぃ", "byi"),
    ("びぇ", "bye"),
    ("びゅ", "byu"),
    ("びょ", "byo"),
    ("ふぁ", "fa"),
    ("ふぃ", "fi"),
    ("ふぇ", "fe"),
    ("ふぉ", "fo"),
    ("ふゃ", "fya"),
    ("ふゅ", "fyu"),
    ("ふょ", "fyo"),
    ("みゃ", "mya"),
    ("みぃ", "myi"),
    ("みゅ", "myu"),
    ("みぇ", "mye"),
    ("みょ", "myo"),
    ("りゃ", "rya"),
    ("りぃ", "ryi"),
    ("りゅ", "ryu"),
    ("りぇ", "rye"),
    ("りょ", "ryo"),
    ("あ", "a"),
    ("い", "i"),
    ("う", "u"),
    ("え", "e"),
    ("お", "o"),
    ("か", "ka"),
    ("き", "ki"),
    ("く", "ku"),
    ("け", "ke"),
    ("こ", "ko"),
    ("さ", "sa"),
    ("し", "shi"),
    ("す", "su"),
    ("せ", "se"),
    ("そ", "so"),
    ("た", "ta"),
    ("ち", "chi"),
    ("つ", "tsu"),
    ("て", "te"),
    ("と", "to"),
    ("な", "na"),
    ("に", "ni"),
    ("ぬ", "nu"),
    ("ね", "ne"),
    ("の", "no"),
    ("は", "ha"),
    ("ひ", "hi"),
    ("ふ", "fu"),
    ("へ", "he"),
    ("ほ", "ho"),
    ("ま", "ma"),
    ("み", "mi"),
    ("む", "mu"),
    ("め", "me"),
    ("も", "mo"),
    ("や", "ya"),
    ("ゆ", "yu"),
    ("よ", "yo"),
    ("ら", "ra"),
    ("り", "ri"),
    ("る", "ru"),
    ("れ", "re"),
    ("ろ", "ro"),
    ("わ", "wa"),
    ("を", "wo"),
    ("ん", "n "),
    ("が", "ga"),
    ("ぎ", "gi"),
    ("ぐ", "gu"),
    ("げ", "ge"),
    ("ご", "go"),
    ("ざ", "za"),
    ("じ", "ji"),
    ("ず", "zu"),
    ("ぜ", "ze"),
    ("ぞ", "zo"),
    ("だ", "da"),
    ("ぢ", "di"),
    ("づ", "du"),
    ("で", "de"),
    ("ど", "do"),
    ("ば", "ba"),
    ("び", "bi"),
    ("ぶ", "bu"),
    ("べ", "be"),
    ("ぼ", "bo"),
    ("ぱ", "pa"),
    ("ぴ", "pi"),
    ("ぷ", "pu"),
    ("ぺ", "pe"),
    ("ぽ", "po"),
    ("ぁ", "xa"),
    ("ぃ", "xi"),
    ("ぅ", "xu"),
    ("ぇ", "xe"),
    ("ぉ", "xo"),
    ("ゃ", "xya"),
    ("ゅ", "xyu"),
    ("ょ", "xyo"),
    ("ゎ", "xwa"),
    ("ゕ", "xka"),
    ("ゖ", "xke"),
    ("ゔ", "vu"),
    ("ゐ", "wyi"),
    ("ゑ", "wye"),
];

static HIRA_TO_ROMA_MAP: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| HIRA_TO_ROMA_TABLE.iter().copied().collect());

static SOKUON_DOUBLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"っ([bcdfghjklmpqrstvwxyz])").expect("sokuon pattern"));
static PROLONGED: Lazy<Regex> = Lazy::new(|| Regex::new(r"([aiueo])ー").expect("prolong pattern"));

/// Render hiragana as romaji: digraphs first, then the sokuon doubles the
/// following consonant, the prolonged-sound mark doubles the vowel, and any
/// stranded っ becomes `xtu`.
pub fn hira_to_roma(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut roma = String::new();
    let mut index = 0;
    while index < chars.len() {
        if index + 1 < chars.len() {
            let two: String = chars[index..index + 2].iter().collect();
            if let Some(r) = HIRA_TO_ROMA_MAP.get(two.as_str()) {
                roma.push_str(r);
                index += 2;
                continue;
            }
        }
        let one: String = chars[index].to_string();
        match HIRA_TO_ROMA_MAP.get(one.as_str()) {
            Some(r) => roma.push_str(r),
            None => roma.push_str(&one),
        }
        index += 1;
    }
    let roma = SOKUON_DOUBLE.replace_all(&roma, "$1$1");
    let roma = PROLONGED.replace_all(&roma, "$1$1");
    roma.replace('っ', "xtu")
}

use once_cell::sync::Lazy;
use regex::Regex;

/// Marks and kanji that appear (almost) exclusively in modern Japanese
/// orthography. Simplified-Japanese character forms in this list separate
/// Japanese text from Chinese text that shares the Han script.
const JA_ONLY_CHARS: &str = "゛゜゠ーｰ〱〲〳〴〵・･㍻㍼㍽㍾㍿増楽薬霊塡犠渓著雑祖猟槇祉栄畳福込帰朗鉱獣砕呉響碑捗僧繊粋瀬繁層厳隠変頬剰拠剤斎専琢廃匂巣転黒社舗蔵伝歩鋳餠愼験抜読猪廊郞曽仮駅譲欄酔桟済気斉囲択経乗満穀難錬嘆戻醸虜寛銭様歳毎奨艶帯侮挙逸署器両釈節墨挿従権憎嬢都倹豊戦庁謁卑歓駆観揺徴悪徳壌団暑営娯弾渇恵祝縁枠勤隣対漢謹検卽摂類視発緖壊拡粛掲涙穏総圏拝沢贈圧浄顔仏図陥歴亀壱梅眞煮闘髪円扱塩騒懐覚敏軽峠戸頼荘黙晩諸継蛍遅逓祥練喩応悩姫険齢撃聴覧痩値鉄禍塀続勉臭鶏辺縄悔絵郷捜懲者鬪海児実薫亜渚歯駄渋弐広姉巻剣証塁単顕価禎祐突穂暦払栃訳渉県労麺糸焼勲神舎縦賓髄丼暁桜滝脳稲勧鎭祈売";

static JA_ONLY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"[\p{{Hiragana}}\p{{Katakana}}{}]",
        JA_ONLY_CHARS
    ))
    .expect("ja-only pattern")
});

static HAN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\p{Han}").expect("han pattern"));

/// Language of a piece of lyric text, as decided by [`get_language`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    Ja,
    Zh,
    En,
}

/// Classify text by Unicode ranges. Order matters: kana or Japanese-only
/// kanji wins over the general Han test, so mixed kanji/kana lyrics come out
/// as Japanese. Anything without CJK content (including empty input) is `En`.
pub fn get_language(text: &str) -> Language {
    if JA_ONLY.is_match(text) {
        Language::Ja
    } else if HAN.is_match(text) {
        Language::Zh
    } else {
        Language::En
    }
}

/// True if the text contains any character the Japanese classifier keys on.
pub(crate) fn has_japanese(text: &str) -> bool {
    JA_ONLY.is_match(text)
}

/// True if the text contains any Han character.
pub(crate) fn has_han(text: &str) -> bool {
    HAN.is_match(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kana_is_japanese() {
        assert_eq!(get_language("こんにちは"), Language::Ja);
        assert_eq!(get_language("ハツネミク"), Language::Ja);
    }

    #[test]
    fn han_without_kana_is_chinese() {
        assert_eq!(get_language("你好"), Language::Zh);
        assert_eq!(get_language("天空之城"), Language::Zh);
    }

    #[test]
    fn japanese_only_kanji_wins_over_han() {
        // 楽 is a simplified-Japanese form; the text has no kana at all.
        assert_eq!(get_language("音楽"), Language::Ja);
    }

    #[test]
    fn plain_text_is_english() {
        assert_eq!(get_language("hello"), Language::En);
        assert_eq!(get_language(""), Language::En);
        assert_eq!(get_language("123 !?"), Language::En);
    }
}

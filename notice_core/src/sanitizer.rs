//! Text cleansing for names and chat messages.
//!
//! Names end up in both channels, so they are reduced to printable ASCII. Free text
//! bound for the external platform keeps its Unicode; free text bound for the in-game
//! broadcast has emoji translated to ASCII and everything the game font cannot draw
//! removed.

use lazy_static::lazy_static;
use regex::{Captures, Regex};

/// Placeholder for a victim or player name that sanitizes to nothing.
pub const UNKNOWN_PLAYER: &str = "Player";

/// Placeholder for a killer or weapon that is missing or sanitizes to nothing.
pub const UNKNOWN_KILLER: &str = "Unknown";

lazy_static! {
    /// `<:name:123>`, `<a:name:123>`, `<:name:>` and bare `<name>` custom emoji
    /// markup. A bare name must start with a letter, so `<3` is left alone.
    static ref CUSTOM_EMOJI: Regex =
        Regex::new(r"<(?:a?:([A-Za-z0-9_~]+):\d*|([A-Za-z_][A-Za-z0-9_~]*))>")
            .expect("custom emoji pattern");
}

/// Unicode emoji with an ASCII stand-in. Sequences with a variation selector come
/// before their bare form.
const EMOJI_TABLE: &[(&str, &str)] = &[
    ("\u{2764}\u{FE0F}", "<3"),
    ("\u{2764}", "<3"),
    ("\u{1F494}", "</3"),
    ("\u{2639}\u{FE0F}", ":("),
    ("\u{2639}", ":("),
    ("\u{2620}\u{FE0F}", "x_x"),
    ("\u{2620}", "x_x"),
    ("\u{1F600}", ":D"),
    ("\u{1F603}", ":D"),
    ("\u{1F604}", ":D"),
    ("\u{1F601}", ":D"),
    ("\u{1F602}", ":'D"),
    ("\u{1F923}", "xD"),
    ("\u{1F606}", "xD"),
    ("\u{1F60A}", ":)"),
    ("\u{1F642}", ":)"),
    ("\u{1F609}", ";)"),
    ("\u{1F610}", ":|"),
    ("\u{1F61B}", ":P"),
    ("\u{1F61C}", ";P"),
    ("\u{1F62E}", ":O"),
    ("\u{1F631}", "D:"),
    ("\u{1F60E}", "B)"),
    ("\u{1F622}", ":'("),
    ("\u{1F62D}", ":'("),
    ("\u{1F61E}", ":("),
    ("\u{1F641}", ":("),
    ("\u{1F620}", ">:("),
    ("\u{1F621}", ">:("),
    ("\u{1F914}", "(hmm)"),
    ("\u{1F634}", "(zzz)"),
    ("\u{1F44D}", "(ok)"),
    ("\u{1F44E}", "(no)"),
    ("\u{1F44B}", "o/"),
    ("\u{1F389}", "\\o/"),
    ("\u{1F525}", "(fire)"),
    ("\u{1F480}", "x_x"),
];

/// Symbol and dingbat blocks the game font has no glyphs for.
const STRIPPED_BMP_RANGES: &[(u32, u32)] = &[
    (0x2300, 0x23FF), // Miscellaneous Technical
    (0x2600, 0x27BF), // Miscellaneous Symbols, Dingbats
    (0x2B00, 0x2BFF), // Miscellaneous Symbols and Arrows
];

fn is_invisible(c: char) -> bool {
    matches!(
        c,
        '\u{FE00}'..='\u{FE0F}' | '\u{200B}'..='\u{200D}' | '\u{2060}' | '\u{FEFF}'
    )
}

fn in_stripped_block(c: char) -> bool {
    let code = c as u32;
    STRIPPED_BMP_RANGES
        .iter()
        .any(|(start, end)| (*start..=*end).contains(&code))
}

/// Reduce a display name to printable ASCII, falling back to `"Player"`.
pub fn sanitize_name(raw: &str) -> String {
    sanitize_name_or(raw, UNKNOWN_PLAYER)
}

/// Reduce a killer or weapon name to printable ASCII, falling back to `"Unknown"`.
pub fn sanitize_killer_name(raw: &str) -> String {
    sanitize_name_or(raw, UNKNOWN_KILLER)
}

/// Keep printable ASCII (0x20-0x7E) and trim. `@` would trigger mentions on the
/// external platform, so it is folded to `a` first.
pub fn sanitize_name_or(raw: &str, placeholder: &str) -> String {
    let cleaned: String = raw
        .chars()
        .map(|c| if c == '@' { 'a' } else { c })
        .filter(|c| (' '..='~').contains(c))
        .collect();
    let trimmed = cleaned.trim();

    if trimmed.is_empty() {
        log::debug!("name {:?} sanitized to nothing, using {:?}", raw, placeholder);
        placeholder.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Strip control characters (0x00-0x1F, 0x7F) and keep everything else.
pub fn sanitize_for_external_channel(raw: &str) -> String {
    raw.chars()
        .filter(|c| !matches!(*c, '\u{0}'..='\u{1F}' | '\u{7F}'))
        .collect()
}

/// Make text safe for the in-game broadcast.
///
/// Order matters: custom emoji markup and known emoji become ASCII before the
/// remaining astral and symbol code points are dropped.
pub fn sanitize_for_local_channel(raw: &str) -> String {
    let mut text = CUSTOM_EMOJI
        .replace_all(raw, |caps: &Captures| {
            let name = caps.get(1).or_else(|| caps.get(2)).map_or("", |m| m.as_str());
            format!(":{}:", name)
        })
        .into_owned();

    for (emoji, ascii) in EMOJI_TABLE {
        if text.contains(emoji) {
            text = text.replace(emoji, ascii);
        }
    }

    let text: String = text
        .chars()
        .filter(|c| (*c as u32) <= 0xFFFF)
        .filter(|c| !in_stripped_block(*c))
        .filter(|c| !is_invisible(*c))
        .collect();

    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_name_folds_at_and_drops_emoji() {
        assert_eq!(sanitize_name("Pl@yer_99\u{1F600}"), "Player_99");
    }

    #[test]
    fn test_sanitize_name_placeholder() {
        assert_eq!(sanitize_name("\u{1F480}\u{1F480}\u{1F480}"), "Player");
        assert_eq!(sanitize_name("   "), "Player");
        assert_eq!(sanitize_name(""), "Player");
        assert_eq!(sanitize_killer_name("\u{1F480}"), "Unknown");
    }

    #[test]
    fn test_sanitize_name_strips_controls_and_trims() {
        assert_eq!(sanitize_name("  Nova\u{7}\t\n "), "Nova");
        assert_eq!(sanitize_name("Jos\u{E9} Silva"), "Jos Silva");
        assert_eq!(sanitize_name("[RAID] Drone-7"), "[RAID] Drone-7");
    }

    #[test]
    fn test_external_channel_keeps_unicode() {
        assert_eq!(
            sanitize_for_external_channel("Привет\u{0}\n мир \u{1F600}\u{7F}"),
            "Привет мир \u{1F600}"
        );
    }

    #[test]
    fn test_local_channel_custom_emoji_markup() {
        assert_eq!(
            sanitize_for_local_channel("gg <:pepe:123456> and <a:party:42>"),
            "gg :pepe: and :party:"
        );
    }

    #[test]
    fn test_local_channel_bare_emoji_markup() {
        assert_eq!(sanitize_for_local_channel("gg <pepe> wp"), "gg :pepe: wp");
        assert_eq!(sanitize_for_local_channel("i <3 this <3>"), "i <3 this <3>");
        assert_eq!(sanitize_for_local_channel("sad \u{1F494}"), "sad </3");
    }

    #[test]
    fn test_local_channel_translates_known_emoji() {
        assert_eq!(sanitize_for_local_channel("nice \u{1F600}"), "nice :D");
        assert_eq!(sanitize_for_local_channel("\u{1F44D} done"), "(ok) done");
        assert_eq!(sanitize_for_local_channel("love \u{2764}\u{FE0F}"), "love <3");
    }

    #[test]
    fn test_local_channel_drops_untranslated_symbols() {
        // Unmapped astral emoji, a dingbat, a variation selector and a zero-width joiner.
        assert_eq!(
            sanitize_for_local_channel("a\u{1F9A9} b\u{2702} c\u{FE0F}\u{200D}d"),
            "a b cd"
        );
    }

    #[test]
    fn test_local_channel_collapses_whitespace() {
        assert_eq!(
            sanitize_for_local_channel("  lots \u{1F9A9}   of\t\tspace  "),
            "lots of space"
        );
    }

    #[test]
    fn test_local_channel_keeps_plain_unicode_text() {
        assert_eq!(sanitize_for_local_channel("Grüße aus Köln"), "Grüße aus Köln");
    }
}

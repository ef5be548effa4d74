//! Pure text normalization primitives shared by all rules.
//!
//! Every function here is total: any input string produces an output, nothing panics.

use unicode_normalization::UnicodeNormalization;

/// Code points removed by [`strip_invisible`] in addition to all control characters.
///
/// Zero-width characters, the byte-order mark, soft hyphen, and directional formatting marks.
pub const INVISIBLE_CHARS: &[char] = &[
    '\u{00AD}', // soft hyphen
    '\u{180E}', // mongolian vowel separator
    '\u{200B}', // zero width space
    '\u{200C}', // zero width non-joiner
    '\u{200D}', // zero width joiner
    '\u{200E}', // left-to-right mark
    '\u{200F}', // right-to-left mark
    '\u{202A}', // left-to-right embedding
    '\u{202B}', // right-to-left embedding
    '\u{202C}', // pop directional formatting
    '\u{202D}', // left-to-right override
    '\u{202E}', // right-to-left override
    '\u{2060}', // word joiner
    '\u{2066}', // left-to-right isolate
    '\u{2067}', // right-to-left isolate
    '\u{2068}', // first strong isolate
    '\u{2069}', // pop directional isolate
    '\u{FEFF}', // byte-order mark / zero width no-break space
];

/// Whether `ch` is removed by [`strip_invisible`].
pub fn is_invisible(ch: char) -> bool {
    ch.is_control() || INVISIBLE_CHARS.contains(&ch)
}

/// Remove leading and trailing whitespace.
///
/// Invisible characters sitting at the edges are trimmed together with the whitespace around
/// them, so `"\u{200B} a"` trims to `"a"` rather than leaving `" a"` behind once the zero-width
/// space is stripped.
pub fn trim(s: &str) -> &str {
    s.trim_matches(|c: char| c.is_whitespace() || is_invisible(c))
}

/// Remove zero-width and other non-printing code points, keeping visible characters in order.
pub fn strip_invisible(s: &str) -> String {
    s.chars().filter(|&c| !is_invisible(c)).collect()
}

/// Canonical composition (NFC), so a base letter followed by a combining mark becomes the
/// precomposed character.
pub fn nfc(s: &str) -> String {
    s.nfc().collect()
}

/// The cleanup every rule starts from: trim → strip invisible → NFC.
///
/// Composition runs after stripping so that a combining mark separated from its base by a
/// zero-width character still composes, and a second pass finds nothing left to change.
pub fn clean(raw: &str) -> String {
    nfc(&strip_invisible(trim(raw)))
}

/// Locale-independent Unicode lowercasing.
pub fn lower(s: &str) -> String {
    s.to_lowercase()
}

/// The fixed email composition: trim → strip invisible → lowercase, composed to NFC.
///
/// NFC is applied last because lowercasing can turn a non-composable sequence into a
/// composable one (`H\u{331}` → `h\u{331}` → `ẖ`).
pub fn normalize_email(raw: &str) -> String {
    nfc(&lower(&strip_invisible(trim(raw))))
}

/// Keep only ASCII digits.
pub fn digits_only(s: &str) -> String {
    s.chars().filter(char::is_ascii_digit).collect()
}

//! Canonical text normalization applied before segmentation and phonemization.

use unicode_normalization::UnicodeNormalization;

/// Returns `true` for the characters kept by [`normalize`]: printable ASCII plus
/// the ASCII whitespace controls (tab, newline, carriage return, vertical tab,
/// form feed).
fn is_printable(c: char) -> bool {
    matches!(c, ' '..='~' | '\t' | '\n' | '\r' | '\u{0B}' | '\u{0C}')
}

/// Normalize raw text for the phonemizer.
///
/// Curly single and double quotes become straight ones and an em dash becomes
/// `" - "`. The text is then decomposed (NFD) and every character outside the
/// printable ASCII range is dropped, so accented Latin letters keep their base
/// letter and lose the combining mark.
///
/// # Examples
///
/// ```
/// use spoken_ipa::text::normalize;
///
/// assert_eq!(normalize("caf\u{e9}"), "cafe");
/// assert_eq!(normalize("\u{201c}Hi\u{201d}\u{2014}there"), "\"Hi\" - there");
/// ```
pub fn normalize(text: &str) -> String {
    let folded = text
        .replace(['\u{2018}', '\u{2019}'], "'")
        .replace(['\u{201C}', '\u{201D}'], "\"")
        .replace('\u{2014}', " - ");
    folded.nfd().filter(|&c| is_printable(c)).collect()
}

//! Locale-independent comparison helpers. Only ASCII letters are folded.

use std::cmp::Ordering;

/// Three-way comparison with `a..=z` folded to upper case.
///
/// Bytes are compared as unsigned values, a strict prefix sorts first and a
/// NUL byte ends the string.
///
/// ```
/// use std::cmp::Ordering;
/// use quirks_strutil::compare_ordinal;
///
/// assert_eq!(compare_ordinal("Data/Sound.ogg", "data/sound.OGG"), Ordering::Equal);
/// assert_eq!(compare_ordinal("abc", "abcd"), Ordering::Less);
/// ```
pub fn compare_ordinal(a: &str, b: &str) -> Ordering {
    folded(a).cmp(folded(b))
}

fn folded(s: &str) -> impl Iterator<Item = u8> + '_ {
    s.bytes()
        .take_while(|&c| c != 0)
        .map(|c| c.to_ascii_uppercase())
}

/// ASCII lower-casing; every other character is left as is.
pub fn lower(s: &str) -> String {
    s.to_ascii_lowercase()
}

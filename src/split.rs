//! Rightmost-match path decomposition.
//!
//! Every function here returns sub-slices of its input. The separator and dot
//! scans look at the whole string, so `extract_file_ext("a.b/c")` is `"b/c"`.

use crate::is_separator;

#[inline]
fn rfind_separator(path: &str) -> Option<usize> {
    path.rfind(is_separator)
}

/// Splits `src` at its last separator, which belongs to neither half.
///
/// ```
/// use quirks_strutil::split;
///
/// assert_eq!(split(r"data\sounds/click.ogg"), (r"data\sounds", "click.ogg"));
/// assert_eq!(split("click.ogg"), ("", "click.ogg"));
/// ```
pub fn split(src: &str) -> (&str, &str) {
    match rfind_separator(src) {
        Some(i) => (&src[..i], &src[i + 1..]),
        None => ("", src),
    }
}

/// Splits `src` at its last `.`, which stays with the extension.
pub fn split_ext(src: &str) -> (&str, &str) {
    match src.rfind('.') {
        Some(i) => src.split_at(i),
        None => (src, ""),
    }
}

pub fn extract_file_name(path: &str) -> &str {
    match rfind_separator(path) {
        Some(i) => &path[i + 1..],
        None => path,
    }
}

pub fn extract_base_file_name(name: &str) -> &str {
    split_ext(name).0
}

/// The part after the last `.`, without the dot.
pub fn extract_file_ext(name: &str) -> &str {
    match name.rfind('.') {
        Some(i) => &name[i + 1..],
        None => "",
    }
}

/// Everything up to and including the last separator.
pub fn extract_folder(path: &str) -> &str {
    match rfind_separator(path) {
        Some(i) => &path[..i + 1],
        None => "",
    }
}

//! Lexical path normalization.
//!
//! Separators are unified to `/`, `.` segments are dropped and `..` segments
//! pop the previous real segment. A `..` that has nothing left to pop is kept
//! for relative paths and dropped for absolute ones, since nothing sits above
//! the root.
//!
//! Protocol prefixes such as `rom://abc` are not recognized; they go through
//! the same rules and come out as `rom:/abc`.

use crate::{components, is_separator, Component};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("BufferTooSmall {{ required = {required}, capacity = {capacity} }}")]
    BufferTooSmall { required: usize, capacity: usize },
}

/// Output stack of a normalization pass.
///
/// Retained `..` segments always sit at the bottom of `segments`, `parents`
/// counts them.
#[derive(Debug, Default, Clone)]
struct Resolved<'a> {
    absolute: bool,
    segments: Vec<&'a str>,
    parents: usize,
    trailing_sep: bool,
}

impl<'a> Resolved<'a> {
    fn new(src: &'a str) -> Self {
        let mut resolved = Resolved {
            trailing_sep: src.ends_with(is_separator),
            ..Default::default()
        };
        resolved.extend(components(src));
        resolved
    }

    fn push(&mut self, comp: Component<'a>) {
        match comp {
            Component::RootDir => self.absolute = true,
            Component::CurDir => (),
            Component::ParentDir => {
                if self.segments.len() > self.parents {
                    self.segments.pop();
                } else if !self.absolute {
                    self.segments.push(Component::ParentDir.as_str());
                    self.parents += 1;
                }
            }
            Component::Normal(segment) => self.segments.push(segment),
        }
    }

    /// The rendered path, as consecutive string pieces.
    fn pieces(&self) -> impl Iterator<Item = &'a str> + '_ {
        let root: Option<&'a str> = self.absolute.then_some("/");
        let body = self
            .segments
            .iter()
            .enumerate()
            .flat_map(|(i, segment)| -> [&'a str; 2] {
                [if i == 0 { "" } else { "/" }, *segment]
            });
        // a bare root already ends with its separator
        let trailing: Option<&'a str> =
            (self.trailing_sep && !self.segments.is_empty()).then_some("/");
        root.into_iter().chain(body).chain(trailing)
    }

    fn rendered_len(&self) -> usize {
        self.pieces().map(str::len).sum()
    }
}

impl<'a> Extend<Component<'a>> for Resolved<'a> {
    fn extend<I: IntoIterator<Item = Component<'a>>>(&mut self, iter: I) {
        iter.into_iter().for_each(move |c| self.push(c));
    }

    #[cfg(rust_comp_feature = "unstable_features")]
    #[inline]
    fn extend_one(&mut self, c: Component<'a>) {
        self.push(c);
    }
}

/// Returns the canonical form of `src`.
///
/// ```
/// use quirks_strutil::normalize;
///
/// assert_eq!(normalize(r"a/b/..\//..///\/../c\\/"), "../c/");
/// assert_eq!(normalize("/../"), "/");
/// ```
pub fn normalize(src: &str) -> String {
    let resolved = Resolved::new(src);
    let mut out = String::with_capacity(resolved.rendered_len());
    out.extend(resolved.pieces());
    out
}

/// Writes the canonical form of `src` into `dest` and returns the number of
/// bytes written.
///
/// `dest` is left untouched when it cannot hold the whole result.
pub fn normalize_into(src: &str, dest: &mut [u8]) -> Result<usize, NormalizeError> {
    let resolved = Resolved::new(src);
    let required = resolved.rendered_len();
    if required > dest.len() {
        return Err(NormalizeError::BufferTooSmall {
            required,
            capacity: dest.len(),
        });
    }

    let mut written = 0;
    for piece in resolved.pieces() {
        dest[written..written + piece.len()].copy_from_slice(piece.as_bytes());
        written += piece.len();
    }
    Ok(written)
}

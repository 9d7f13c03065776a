#![cfg_attr(rust_comp_feature = "unstable_features", feature(extend_one))]
//! Lexical path normalization and small text utilities.
//!
//! Paths are plain strings where `/` and `\` are interchangeable separators.
//! Nothing in this crate touches the filesystem.

pub mod color;
pub mod normalize;
pub mod ordinal;
pub mod split;
pub mod wide;

use std::{fmt, iter::FusedIterator};

pub use color::{color_to_hex, hex_to_color, Color, ParseColorError};
pub use normalize::{normalize, normalize_into, NormalizeError};
pub use ordinal::{compare_ordinal, lower};
pub use split::{
    extract_base_file_name, extract_file_ext, extract_file_name, extract_folder, split, split_ext,
};
pub use wide::{
    utf8_to_wide, wide_to_utf8, Direction, PlatformTranscoder, TextCodec, Transcoder, WideChar,
};

#[inline]
pub fn is_separator(c: char) -> bool {
    c == '/' || c == '\\'
}

#[inline]
fn is_sep_byte(b: u8) -> bool {
    b == b'/' || b == b'\\'
}

#[derive(Debug, PartialEq, Clone, PartialOrd, Copy)]
enum State {
    StartDir = 0,
    Body = 1,
    Done = 2,
}

/// A single lexical piece of a path.
///
/// Empty segments produced by repeated separators are never yielded.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum Component<'a> {
    RootDir,
    CurDir,
    ParentDir,
    Normal(&'a str),
}

impl<'a> Component<'a> {
    pub fn as_str(self) -> &'a str {
        match self {
            Component::RootDir => "/",
            Component::CurDir => ".",
            Component::ParentDir => "..",
            Component::Normal(segment) => segment,
        }
    }
}

impl AsRef<str> for Component<'_> {
    #[inline]
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Iterator over the [`Component`]s of a path string, from either end.
#[derive(Clone)]
pub struct Components<'a> {
    path: &'a str,
    has_root: bool,
    front: State,
    back: State,
}

/// Splits `path` into its lexical components.
pub fn components(path: &str) -> Components<'_> {
    Components {
        path,
        has_root: path.as_bytes().first().is_some_and(|b| is_sep_byte(*b)),
        front: State::StartDir,
        back: State::Body,
    }
}

impl fmt::Debug for Components<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Components")
            .field(&self.clone().collect::<Vec<_>>())
            .finish()
    }
}

impl<'a> Components<'a> {
    /// The part of the path that has not been consumed yet.
    pub fn as_str(&self) -> &'a str {
        self.path
    }

    #[inline]
    pub fn has_root(&self) -> bool {
        self.has_root
    }

    #[inline]
    fn len_before_body(&self) -> usize {
        if self.front <= State::StartDir && self.has_root {
            1
        } else {
            0
        }
    }

    #[inline]
    fn finished(&self) -> bool {
        self.front == State::Done || self.back == State::Done || self.front > self.back
    }

    fn parse_single_component<'b>(&self, comp: &'b str) -> Option<Component<'b>> {
        match comp {
            "" => None,
            "." => Some(Component::CurDir),
            ".." => Some(Component::ParentDir),
            _ => Some(Component::Normal(comp)),
        }
    }

    fn parse_next_component(&self) -> (usize, Option<Component<'a>>) {
        debug_assert!(self.front == State::Body);
        let (extra, comp) = match self.path.bytes().position(is_sep_byte) {
            None => (0, self.path),
            Some(i) => (1, &self.path[..i]),
        };
        (comp.len() + extra, self.parse_single_component(comp))
    }

    fn parse_next_component_back(&self) -> (usize, Option<Component<'a>>) {
        debug_assert!(self.back == State::Body);
        let start = self.len_before_body();
        let (extra, comp) = match self.path[start..].bytes().rposition(is_sep_byte) {
            None => (0, &self.path[start..]),
            Some(i) => (1, &self.path[start + i + 1..]),
        };
        (comp.len() + extra, self.parse_single_component(comp))
    }
}

impl<'a> Iterator for Components<'a> {
    type Item = Component<'a>;

    fn next(&mut self) -> Option<Component<'a>> {
        while !self.finished() {
            match self.front {
                State::StartDir => {
                    self.front = State::Body;
                    if self.has_root {
                        debug_assert!(!self.path.is_empty());
                        self.path = &self.path[1..];
                        return Some(Component::RootDir);
                    }
                }
                State::Body if !self.path.is_empty() => {
                    let (size, comp) = self.parse_next_component();
                    self.path = &self.path[size..];
                    if comp.is_some() {
                        return comp;
                    }
                }
                State::Body => {
                    self.front = State::Done;
                }
                State::Done => unreachable!(),
            }
        }
        None
    }
}

impl<'a> DoubleEndedIterator for Components<'a> {
    fn next_back(&mut self) -> Option<Component<'a>> {
        while !self.finished() {
            match self.back {
                State::Body if self.path.len() > self.len_before_body() => {
                    let (size, comp) = self.parse_next_component_back();
                    self.path = &self.path[..self.path.len() - size];
                    if comp.is_some() {
                        return comp;
                    }
                }
                State::Body => {
                    self.back = State::StartDir;
                }
                State::StartDir => {
                    self.back = State::Done;
                    if self.has_root {
                        self.path = &self.path[..self.path.len() - 1];
                        return Some(Component::RootDir);
                    }
                }
                State::Done => unreachable!(),
            }
        }
        None
    }
}

impl FusedIterator for Components<'_> {}

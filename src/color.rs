//! Packed RGBA colors and their hex form.
//!
//! [`hex_to_color`] is lenient: it reads whatever hex prefix the string has
//! and never fails. [`Color::from_str`] is the strict variant.

use std::{fmt, str::FromStr};

use nom::{
    bytes::complete::{tag_no_case, take_while_m_n},
    character::complete::{hex_digit0, multispace0},
    combinator::opt,
    sequence::preceded,
    IResult, Parser,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::from_rgba(0xffffffff);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Color { r, g, b, a }
    }

    /// Unpacks `0xRRGGBBAA`.
    pub const fn from_rgba(rgba: u32) -> Self {
        let [r, g, b, a] = rgba.to_be_bytes();
        Color { r, g, b, a }
    }

    /// Packs into `0xRRGGBBAA`.
    pub const fn rgba(self) -> u32 {
        u32::from_be_bytes([self.r, self.g, self.b, self.a])
    }

    fn from_hex_digits(value: u32, digits: usize) -> Self {
        if digits == 6 {
            Color::from_rgba((value << 8) | 0xff)
        } else {
            Color::from_rgba(value)
        }
    }
}

impl From<u32> for Color {
    #[inline]
    fn from(rgba: u32) -> Self {
        Color::from_rgba(rgba)
    }
}

impl From<Color> for u32 {
    #[inline]
    fn from(color: Color) -> Self {
        color.rgba()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseColorError {
    #[error("InvalidLength {{ len = {len} }}")]
    InvalidLength { len: usize },
    #[error("InvalidDigit {{ position = {position} }}")]
    InvalidDigit { position: usize },
}

impl FromStr for Color {
    type Err = ParseColorError;

    /// Accepts exactly 6 (`rrggbb`, opaque) or 8 (`rrggbbaa`) hex digits.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 6 && s.len() != 8 {
            return Err(ParseColorError::InvalidLength { len: s.len() });
        }
        let (rest, digits) = hex_digit0::<_, nom::error::Error<&str>>(s)
            .map_err(|_| ParseColorError::InvalidDigit { position: 0 })?;
        if !rest.is_empty() {
            return Err(ParseColorError::InvalidDigit {
                position: digits.len(),
            });
        }
        let value = u32::from_str_radix(digits, 16)
            .map_err(|_| ParseColorError::InvalidDigit { position: 0 })?;
        Ok(Color::from_hex_digits(value, digits.len()))
    }
}

/// Leading whitespace and a `0x` prefix are skipped, then at most 8 hex
/// digits are taken. Whatever follows is ignored.
fn lenient_hex(input: &str) -> IResult<&str, &str> {
    preceded(
        (multispace0, opt(tag_no_case("0x"))),
        take_while_m_n(0, 8, |c: char| c.is_ascii_hexdigit()),
    )
    .parse(input)
}

/// Parses `rrggbb` or `rrggbbaa`.
///
/// Strings shorter than 6 bytes give [`Color::WHITE`]. A 6 byte string gets
/// an opaque alpha; any longer string is taken as the literal packed value.
/// Nothing is rejected: a string without hex digits reads as zero.
///
/// ```
/// use quirks_strutil::{hex_to_color, Color};
///
/// assert_eq!(hex_to_color("ff0000"), Color::new(0xff, 0, 0, 0xff));
/// assert_eq!(hex_to_color("fff"), Color::WHITE);
/// ```
pub fn hex_to_color(s: &str) -> Color {
    if s.len() < 6 {
        return Color::WHITE;
    }
    let value = match lenient_hex(s) {
        Ok((_, digits)) => u32::from_str_radix(digits, 16).unwrap_or(0),
        Err(_) => 0,
    };
    Color::from_hex_digits(value, s.len())
}

/// Always 8 lowercase hex digits, `rrggbbaa`.
pub fn color_to_hex(color: Color) -> String {
    color.to_string()
}

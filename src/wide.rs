//! UTF-8 ⇄ wide string transcoding.
//!
//! The primary path goes through a [`Transcoder`]. When it fails the codec
//! falls back to a simple converter that only understands the 1, 2 and 3 byte
//! UTF-8 forms. Code points above U+FFFF do not survive the fallback; a lead
//! byte of a 4-byte sequence is read as if it started a 3-byte one.
//!
//! Inputs are treated like C strings: they end at the first NUL unit.

use std::{
    fmt,
    sync::atomic::{AtomicBool, Ordering},
};

/// Platform `wchar_t`.
#[cfg(windows)]
pub type WideChar = u16;
#[cfg(not(windows))]
pub type WideChar = u32;

/// A converter the codec tries before its own simple fallback.
///
/// Returning `None` is an expected outcome, not an error.
pub trait Transcoder {
    fn decode(&self, utf8: &[u8]) -> Option<Vec<WideChar>>;
    fn encode(&self, wide: &[WideChar]) -> Option<Vec<u8>>;
}

/// Strict conversions from the standard library. Fails on malformed input,
/// such as invalid UTF-8 or unpaired surrogates.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlatformTranscoder;

impl Transcoder for PlatformTranscoder {
    fn decode(&self, utf8: &[u8]) -> Option<Vec<WideChar>> {
        let s = std::str::from_utf8(utf8).ok()?;
        #[cfg(windows)]
        let wide = s.encode_utf16().collect();
        #[cfg(not(windows))]
        let wide = s.chars().map(WideChar::from).collect();
        Some(wide)
    }

    fn encode(&self, wide: &[WideChar]) -> Option<Vec<u8>> {
        #[cfg(windows)]
        let s = String::from_utf16(wide).ok()?;
        #[cfg(not(windows))]
        let s = wide
            .iter()
            .map(|&unit| char::from_u32(unit))
            .collect::<Option<String>>()?;
        Some(s.into_bytes())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Decode,
    Encode,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Decode => f.write_str("utf8 to wide"),
            Direction::Encode => f.write_str("wide to utf8"),
        }
    }
}

/// Transcoder plus the warn-once state of its fallback paths.
pub struct TextCodec<T = PlatformTranscoder> {
    transcoder: T,
    decode_degraded: AtomicBool,
    encode_degraded: AtomicBool,
}

impl TextCodec {
    pub const fn platform() -> Self {
        TextCodec::new(PlatformTranscoder)
    }
}

impl<T> TextCodec<T> {
    pub const fn new(transcoder: T) -> Self {
        TextCodec {
            transcoder,
            decode_degraded: AtomicBool::new(false),
            encode_degraded: AtomicBool::new(false),
        }
    }

    #[inline]
    fn flag(&self, direction: Direction) -> &AtomicBool {
        match direction {
            Direction::Decode => &self.decode_degraded,
            Direction::Encode => &self.encode_degraded,
        }
    }

    /// Whether the fallback has been used in `direction` since construction.
    pub fn is_degraded(&self, direction: Direction) -> bool {
        self.flag(direction).load(Ordering::Relaxed)
    }

    /// Sets the degraded flag; true only for the call that flipped it.
    fn mark_degraded(&self, direction: Direction) -> bool {
        let flag = self.flag(direction);
        !flag.load(Ordering::Relaxed) && !flag.swap(true, Ordering::Relaxed)
    }

    fn note_degraded(&self, direction: Direction) {
        if !self.mark_degraded(direction) {
            return;
        }
        #[cfg(feature = "tracing")]
        tracing::warn!(
            %direction,
            "platform transcoder failed, using the simple codec; code points above U+FFFF are not preserved"
        );
    }
}

impl<T: Transcoder> TextCodec<T> {
    pub fn decode(&self, utf8: &[u8]) -> Vec<WideChar> {
        let utf8 = until_nul(utf8);
        if utf8.is_empty() {
            return Vec::new();
        }
        match self.transcoder.decode(utf8) {
            Some(wide) => wide,
            None => {
                self.note_degraded(Direction::Decode);
                decode_simple(utf8)
            }
        }
    }

    pub fn encode(&self, wide: &[WideChar]) -> Vec<u8> {
        let wide = until_nul(wide);
        if wide.is_empty() {
            return Vec::new();
        }
        match self.transcoder.encode(wide) {
            Some(utf8) => utf8,
            None => {
                self.note_degraded(Direction::Encode);
                encode_simple(wide)
            }
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for TextCodec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextCodec")
            .field("transcoder", &self.transcoder)
            .field("decode_degraded", &self.decode_degraded)
            .field("encode_degraded", &self.encode_degraded)
            .finish()
    }
}

static PLATFORM_CODEC: TextCodec = TextCodec::platform();

/// Decodes `utf8` with the process-wide platform codec.
pub fn utf8_to_wide(utf8: &[u8]) -> Vec<WideChar> {
    PLATFORM_CODEC.decode(utf8)
}

/// Encodes `wide` with the process-wide platform codec.
pub fn wide_to_utf8(wide: &[WideChar]) -> Vec<u8> {
    PLATFORM_CODEC.encode(wide)
}

fn until_nul<T: Copy + Default + PartialEq>(s: &[T]) -> &[T] {
    match s.iter().position(|unit| *unit == T::default()) {
        Some(end) => &s[..end],
        None => s,
    }
}

#[inline]
fn sequence_len(lead: u8) -> usize {
    if lead & 0xE0 == 0xE0 {
        3
    } else if lead & 0xC0 == 0xC0 {
        2
    } else {
        1
    }
}

/// A truncated sequence at the end of the input is dropped.
fn decode_simple(utf8: &[u8]) -> Vec<WideChar> {
    let mut wide = Vec::with_capacity(utf8.len());
    let mut rest = utf8;
    while let Some(&lead) = rest.first() {
        let len = sequence_len(lead);
        let Some(seq) = rest.get(..len) else {
            break;
        };
        let code = match len {
            3 => {
                (u32::from(seq[0] & 0x0F) << 12)
                    | (u32::from(seq[1] & 0x3F) << 6)
                    | u32::from(seq[2] & 0x3F)
            }
            2 => (u32::from(seq[0] & 0x1F) << 6) | u32::from(seq[1] & 0x3F),
            _ => u32::from(seq[0]),
        };
        // at most 16 bits, fits either width
        wide.push(code as WideChar);
        rest = &rest[len..];
    }
    wide
}

/// Only the low 16 bits of each unit are encoded.
fn encode_simple(wide: &[WideChar]) -> Vec<u8> {
    let mut utf8 = Vec::with_capacity(wide.len() * 3);
    for &unit in wide {
        let code = u32::from(unit) & 0xFFFF;
        if code < 0x80 {
            utf8.push(code as u8);
        } else if code < 0x800 {
            utf8.push(0xC0 | (code >> 6) as u8);
            utf8.push(0x80 | (code & 0x3F) as u8);
        } else {
            utf8.push(0xE0 | (code >> 12) as u8);
            utf8.push(0x80 | ((code >> 6) & 0x3F) as u8);
            utf8.push(0x80 | (code & 0x3F) as u8);
        }
    }
    utf8
}

#[cfg(test)]
mod tests {
    use std::{
        sync::{atomic::AtomicUsize, Barrier},
        thread,
    };

    use pretty_assertions::assert_eq;

    use super::*;

    struct Unavailable;

    impl Transcoder for Unavailable {
        fn decode(&self, _: &[u8]) -> Option<Vec<WideChar>> {
            None
        }

        fn encode(&self, _: &[WideChar]) -> Option<Vec<u8>> {
            None
        }
    }

    fn wide(s: &str) -> Vec<WideChar> {
        #[cfg(windows)]
        let wide = s.encode_utf16().collect();
        #[cfg(not(windows))]
        let wide = s.chars().map(WideChar::from).collect();
        wide
    }

    #[test]
    fn test_platform_round_trip() {
        let text = "Grüße, 世界! 😀";
        let decoded = utf8_to_wide(text.as_bytes());
        assert_eq!(decoded, wide(text));
        assert_eq!(wide_to_utf8(&decoded), text.as_bytes());
    }

    #[test]
    fn test_empty_and_nul_terminated() {
        assert!(utf8_to_wide(b"").is_empty());
        assert!(wide_to_utf8(&[]).is_empty());
        assert_eq!(utf8_to_wide(b"ab\0cd"), wide("ab"));
        assert_eq!(wide_to_utf8(&[0x41, 0, 0x42]), b"A");

        let codec = TextCodec::new(Unavailable);
        assert!(codec.decode(b"\0abc").is_empty());
        assert!(!codec.is_degraded(Direction::Decode));
    }

    #[test]
    fn test_fallback_handles_three_byte_forms() {
        let codec = TextCodec::new(Unavailable);
        let text = "héllo €ñ";
        let decoded = codec.decode(text.as_bytes());
        assert_eq!(decoded, wide(text));
        assert_eq!(codec.encode(&decoded), text.as_bytes());
        assert!(codec.is_degraded(Direction::Decode));
        assert!(codec.is_degraded(Direction::Encode));
    }

    #[test]
    fn test_fallback_does_not_handle_four_byte_forms() {
        let codec = TextCodec::new(Unavailable);
        // F0 9F 98 80 is read as a 3-byte form followed by a stray 0x80
        let decoded = codec.decode("😀".as_bytes());
        assert_eq!(decoded, vec![0x07D8, 0x80]);

        let encoded = codec.encode(&[0x1F600 as WideChar]);
        assert_eq!(encoded, "\u{F600}".as_bytes());
    }

    #[test]
    fn test_fallback_drops_truncated_tail() {
        let codec = TextCodec::new(Unavailable);
        assert_eq!(codec.decode(&[b'a', 0xE2, 0x82]), wide("a"));
        assert_eq!(codec.decode(&[0xC3]), Vec::<WideChar>::new());
    }

    #[test]
    fn test_malformed_input_falls_back() {
        let codec = TextCodec::platform();
        // a lone surrogate is rejected by the strict path
        let encoded = codec.encode(&[0x61, 0xD800]);
        assert_eq!(encoded, vec![0x61, 0xED, 0xA0, 0x80]);
        assert!(codec.is_degraded(Direction::Encode));

        assert_eq!(codec.decode(&encoded), vec![0x61, 0xD800]);
        assert!(codec.is_degraded(Direction::Decode));
    }

    #[test]
    fn test_degraded_flags_are_per_direction() {
        let codec = TextCodec::new(Unavailable);
        codec.encode(&wide("x"));
        assert!(codec.is_degraded(Direction::Encode));
        assert!(!codec.is_degraded(Direction::Decode));
    }

    #[cfg(feature = "tracing")]
    #[test]
    #[tracing_test::traced_test]
    fn test_warns_once_per_direction() {
        let codec = TextCodec::new(Unavailable);
        for _ in 0..3 {
            codec.decode(b"abc");
            codec.encode(&wide("abc"));
        }

        assert!(logs_contain("simple codec"));
        logs_assert(one_warning_per_direction);
    }

    #[cfg(feature = "tracing")]
    fn one_warning_per_direction(lines: &[&str]) -> Result<(), String> {
        let count = |direction: &str| {
            lines
                .iter()
                .filter(|line| line.contains("simple codec") && line.contains(direction))
                .count()
        };
        match (count("utf8 to wide"), count("wide to utf8")) {
            (1, 1) => Ok(()),
            (decode, encode) => Err(format!(
                "expected one warning per direction, got {decode} decode and {encode} encode"
            )),
        }
    }

    #[test]
    fn test_concurrent_first_use_flips_flag_once() {
        const THREADS: usize = 8;
        let codec = TextCodec::new(Unavailable);
        let barrier = Barrier::new(THREADS);
        let claimed = AtomicUsize::new(0);
        thread::scope(|s| {
            for _ in 0..THREADS {
                s.spawn(|| {
                    barrier.wait();
                    if codec.mark_degraded(Direction::Decode) {
                        claimed.fetch_add(1, Ordering::Relaxed);
                    }
                });
            }
        });
        assert_eq!(claimed.load(Ordering::Relaxed), 1);
        assert!(codec.is_degraded(Direction::Decode));
        assert!(!codec.is_degraded(Direction::Encode));
    }

    #[cfg(feature = "tracing")]
    #[test]
    #[tracing_test::traced_test]
    fn test_concurrent_first_use_warns_once() {
        const THREADS: usize = 8;
        let codec = TextCodec::new(Unavailable);
        let barrier = Barrier::new(THREADS);
        let span = tracing::Span::current();
        thread::scope(|s| {
            for _ in 0..THREADS {
                s.spawn(|| {
                    let _entered = span.enter();
                    barrier.wait();
                    assert_eq!(codec.decode(b"abc"), wide("abc"));
                    assert_eq!(codec.encode(&wide("abc")), b"abc");
                });
            }
        });
        logs_assert(one_warning_per_direction);
    }

    #[cfg(feature = "tracing")]
    #[test]
    #[tracing_test::traced_test]
    fn test_platform_success_does_not_warn() {
        let codec = TextCodec::platform();
        codec.decode("ok".as_bytes());
        codec.encode(&wide("ok"));
        assert!(!logs_contain("simple codec"));
    }
}

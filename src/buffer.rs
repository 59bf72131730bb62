//! Growable text buffer with a reserve-before-write discipline
//!
//! `TextBuffer` accumulates the textual rendering of an evaluation run
//! (characters, strings, formatted numbers) in one contiguous heap
//! allocation, then converts it into a null-terminated string for the FFI
//! boundary with a single destructive `consume`.
//!
//! Every write path reserves its worst-case byte count *before* formatting,
//! so the append after the reservation can never reallocate (or overrun a
//! fixed-size destination when the bytes are later copied across the
//! boundary). The order matters: reserve first, format second.

use std::ffi::CString;
use thiserror::Error;

/// Byte length of `u32::MAX` in decimal ("4294967295").
const U32_TEXT_MAX: usize = 10;
/// Byte length of `u64::MAX` in decimal ("18446744073709551615").
const U64_TEXT_MAX: usize = 20;
/// Longest shortest-round-trip rendering of an f64
/// ("-1.7976931348623157e308"), also used for the f32 path.
const FLOAT_TEXT_MAX: usize = 24;

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// Buffer errors.
#[derive(Debug, Error)]
pub enum BufferError {
    #[error("failed to reserve {requested} additional bytes")]
    Alloc { requested: usize },

    #[error("buffer contains an interior NUL byte at offset {offset}")]
    InteriorNul { offset: usize },
}

/// Result type for buffer operations.
pub type BufferResult<T> = Result<T, BufferError>;

/// Growable byte buffer for rendering evaluation output.
///
/// Holds `length <= capacity` at all times; a failed write appends nothing.
/// Consuming moves the buffer, so use-after-consume and double-consume do
/// not compile.
#[derive(Debug, Default)]
pub struct TextBuffer {
    bytes: Vec<u8>,
}

impl TextBuffer {
    /// Create an empty buffer with no allocation.
    pub fn new() -> Self {
        Self { bytes: Vec::new() }
    }

    /// Create a buffer with `reserved` bytes of capacity up front.
    ///
    /// `reserved = 0` allocates nothing; the first write allocates.
    pub fn with_capacity(reserved: usize) -> BufferResult<Self> {
        let mut buf = Self::new();
        if reserved > 0 {
            buf.ensure_additional(reserved)?;
        }
        Ok(buf)
    }

    /// Number of bytes written so far.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// True if nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Total allocated byte slots.
    pub fn capacity(&self) -> usize {
        self.bytes.capacity()
    }

    /// The bytes written so far, without a terminator.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Guarantee headroom for at least `amount` more bytes.
    ///
    /// No-op when the headroom already exists. On growth the new capacity is
    /// at least `max(capacity * 2, len + amount)`; doubling keeps repeated
    /// appends amortized O(1) per byte. Growing from zero capacity reserves
    /// the requested amount. Allocation failure is reported here and never
    /// appends partial data.
    pub fn ensure_additional(&mut self, amount: usize) -> BufferResult<()> {
        let required = self.bytes.len().saturating_add(amount);
        if required <= self.bytes.capacity() {
            return Ok(());
        }
        let target = required.max(self.bytes.capacity().saturating_mul(2));
        self.bytes
            .try_reserve_exact(target - self.bytes.len())
            .map_err(|_| BufferError::Alloc { requested: amount })
    }

    /// Append a single byte.
    pub fn write_byte(&mut self, byte: u8) -> BufferResult<()> {
        self.ensure_additional(1)?;
        self.bytes.push(byte);
        Ok(())
    }

    /// Append the bytes of `text` (no terminator is stored).
    pub fn write_str(&mut self, text: &str) -> BufferResult<()> {
        self.ensure_additional(text.len())?;
        self.bytes.extend_from_slice(text.as_bytes());
        Ok(())
    }

    /// Append `value` in decimal.
    pub fn write_u32(&mut self, value: u32) -> BufferResult<()> {
        self.ensure_additional(U32_TEXT_MAX)?;
        let mut digits = itoa::Buffer::new();
        self.bytes.extend_from_slice(digits.format(value).as_bytes());
        Ok(())
    }

    /// Append `value` as `x`-prefixed lowercase hexadecimal, e.g. `xff`.
    ///
    /// Reserves the same 10-byte worst case as the decimal path even though
    /// hex needs at most 9 bytes; the uniform reservation keeps the headroom
    /// contract identical across the u32 writers.
    pub fn write_u32_hex(&mut self, value: u32) -> BufferResult<()> {
        self.ensure_additional(U32_TEXT_MAX)?;
        self.bytes.push(b'x');
        let mut scratch = [0u8; 8];
        let mut at = scratch.len();
        let mut rest = value;
        loop {
            at -= 1;
            scratch[at] = HEX_DIGITS[(rest & 0xf) as usize];
            rest >>= 4;
            if rest == 0 {
                break;
            }
        }
        self.bytes.extend_from_slice(&scratch[at..]);
        Ok(())
    }

    /// Append `value` in decimal.
    pub fn write_u64(&mut self, value: u64) -> BufferResult<()> {
        self.ensure_additional(U64_TEXT_MAX)?;
        let mut digits = itoa::Buffer::new();
        self.bytes.extend_from_slice(digits.format(value).as_bytes());
        Ok(())
    }

    /// Append the shortest round-trip decimal rendering of `value`.
    pub fn write_f32(&mut self, value: f32) -> BufferResult<()> {
        self.ensure_additional(FLOAT_TEXT_MAX)?;
        let mut digits = ryu::Buffer::new();
        self.bytes.extend_from_slice(digits.format(value).as_bytes());
        Ok(())
    }

    /// Append the shortest round-trip decimal rendering of `value`.
    ///
    /// The 24-byte reservation covers the longest possible f64 rendering
    /// including sign and exponent; the f32 path reserves the same amount.
    pub fn write_f64(&mut self, value: f64) -> BufferResult<()> {
        self.ensure_additional(FLOAT_TEXT_MAX)?;
        let mut digits = ryu::Buffer::new();
        self.bytes.extend_from_slice(digits.format(value).as_bytes());
        Ok(())
    }

    /// Destructively convert the accumulated bytes into an independently
    /// owned, null-terminated string.
    ///
    /// An untouched buffer consumes to the empty C string. A buffer holding
    /// an interior NUL byte (possible via `write_byte(0)`) is rejected
    /// instead of silently truncating at the NUL.
    pub fn consume(self) -> BufferResult<CString> {
        CString::new(self.bytes).map_err(|err| BufferError::InteriorNul {
            offset: err.nul_position(),
        })
    }

    /// Drop the accumulated text without rendering a C string.
    pub fn discard(self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn consumed(buf: TextBuffer) -> String {
        buf.consume().unwrap().into_string().unwrap()
    }

    #[test]
    fn test_length_tracks_writes() {
        let mut buf = TextBuffer::new();
        buf.write_str("abc").unwrap();
        assert_eq!(buf.len(), 3);
        buf.write_byte(b'!').unwrap();
        assert_eq!(buf.len(), 4);
        buf.write_u32(1234).unwrap();
        assert_eq!(buf.len(), 8);
        buf.write_u64(7).unwrap();
        assert_eq!(buf.len(), 9);
        assert!(buf.capacity() >= buf.len());
    }

    #[test]
    fn test_growth_doubles() {
        let mut buf = TextBuffer::with_capacity(4).unwrap();
        buf.write_str("abcd").unwrap();
        let before = buf.capacity();
        buf.ensure_additional(1).unwrap();
        assert!(buf.capacity() >= before * 2);
        assert!(buf.capacity() >= buf.len() + 1);
    }

    #[test]
    fn test_growth_covers_large_request() {
        let mut buf = TextBuffer::with_capacity(4).unwrap();
        buf.write_str("ab").unwrap();
        buf.ensure_additional(100).unwrap();
        assert!(buf.capacity() >= 102);
        assert_eq!(buf.as_bytes(), b"ab");
    }

    #[test]
    fn test_ensure_is_noop_with_headroom() {
        let mut buf = TextBuffer::with_capacity(64).unwrap();
        let before = buf.capacity();
        buf.ensure_additional(16).unwrap();
        assert_eq!(buf.capacity(), before);
    }

    #[test]
    fn test_string_roundtrip() {
        let mut buf = TextBuffer::new();
        buf.write_str("(λx.x) applied 42 times").unwrap();
        assert_eq!(consumed(buf), "(λx.x) applied 42 times");
    }

    #[test]
    fn test_u32_max() {
        let mut buf = TextBuffer::new();
        buf.write_u32(u32::MAX).unwrap();
        assert_eq!(consumed(buf), "4294967295");
    }

    #[test]
    fn test_u32_hex() {
        let mut buf = TextBuffer::new();
        buf.write_u32_hex(255).unwrap();
        assert_eq!(consumed(buf), "xff");
    }

    #[test]
    fn test_u32_hex_zero_and_max() {
        let mut buf = TextBuffer::new();
        buf.write_u32_hex(0).unwrap();
        buf.write_byte(b' ').unwrap();
        buf.write_u32_hex(u32::MAX).unwrap();
        assert_eq!(consumed(buf), "x0 xffffffff");
    }

    #[test]
    fn test_u64_max() {
        let mut buf = TextBuffer::new();
        buf.write_u64(u64::MAX).unwrap();
        assert_eq!(consumed(buf), "18446744073709551615");
    }

    #[test]
    fn test_floats_render_shortest() {
        let mut buf = TextBuffer::new();
        buf.write_f32(0.25).unwrap();
        buf.write_byte(b' ').unwrap();
        buf.write_f64(1.5).unwrap();
        assert_eq!(consumed(buf), "0.25 1.5");
    }

    #[test]
    fn test_float_extremes_fit_reservation() {
        let mut digits = ryu::Buffer::new();
        assert!(digits.format(f64::MIN).len() <= FLOAT_TEXT_MAX);
        let mut digits = ryu::Buffer::new();
        assert!(digits.format(f64::MAX).len() <= FLOAT_TEXT_MAX);
        let mut buf = TextBuffer::with_capacity(0).unwrap();
        buf.write_f64(f64::MIN).unwrap();
        assert_eq!(consumed(buf), "-1.7976931348623157e308");
    }

    #[test]
    fn test_empty_consume_is_empty_string() {
        let buf = TextBuffer::new();
        let out = buf.consume().unwrap();
        assert_eq!(out.as_bytes(), b"");
    }

    #[test]
    fn test_writes_from_zero_capacity() {
        let mut buf = TextBuffer::with_capacity(0).unwrap();
        assert_eq!(buf.capacity(), 0);
        buf.write_u64(u64::MAX).unwrap();
        assert_eq!(consumed(buf), "18446744073709551615");
    }

    #[test]
    fn test_interleaved_order() {
        let mut buf = TextBuffer::new();
        buf.write_str("a").unwrap();
        buf.write_u32(1).unwrap();
        buf.write_str("b").unwrap();
        assert_eq!(consumed(buf), "a1b");
    }

    #[test]
    fn test_interior_nul_is_rejected() {
        let mut buf = TextBuffer::new();
        buf.write_str("ok").unwrap();
        buf.write_byte(0).unwrap();
        match buf.consume() {
            Err(BufferError::InteriorNul { offset }) => assert_eq!(offset, 2),
            other => panic!("expected InteriorNul, got {:?}", other),
        }
    }

    #[test]
    fn test_discard_produces_nothing() {
        let mut buf = TextBuffer::new();
        buf.write_str("scratch").unwrap();
        buf.discard();
    }
}

//! Bitstream codec.
//!
//! Converts a message into the ordered bits written to a carrier, and packs
//! recovered bits back into bytes. Bytes are always expanded
//! most-significant-bit first.
//!
//! Two framings are supported:
//! - [`Framing::Terminator`]: `message ++ "#####END#####"`. The carrier stores
//!   no length; extraction stops at the first terminator occurrence.
//! - [`Framing::LengthPrefixed`]: `u32 big-endian length ++ message`. Any
//!   payload round-trips byte for byte, including one containing the
//!   terminator.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::TERMINATOR;

/// Size of the length header used by [`Framing::LengthPrefixed`].
pub const LENGTH_PREFIX_BYTES: usize = 4;

/// How a message is delimited inside the bitstream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Framing {
    /// Message followed by [`TERMINATOR`].
    #[default]
    Terminator,
    /// 4-byte big-endian length header followed by the message.
    LengthPrefixed,
}

impl Framing {
    /// Number of bytes the framing adds around the message.
    pub fn overhead(self) -> usize {
        match self {
            Self::Terminator => TERMINATOR.len(),
            Self::LengthPrefixed => LENGTH_PREFIX_BYTES,
        }
    }
}

impl fmt::Display for Framing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Terminator => write!(f, "terminator"),
            Self::LengthPrefixed => write!(f, "length-prefixed"),
        }
    }
}

impl FromStr for Framing {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "terminator" | "end" => Ok(Self::Terminator),
            "length-prefixed" | "length" => Ok(Self::LengthPrefixed),
            other => Err(format!(
                "Unknown framing: {}. Use: terminator or length-prefixed",
                other
            )),
        }
    }
}

/// Iterator expanding bytes into bits, MSB first.
///
/// Each yielded item is `0` or `1`.
#[derive(Debug, Clone)]
pub struct Bits<I> {
    bytes: I,
    current: u8,
    remaining: u8,
}

impl<I: Iterator<Item = u8>> Bits<I> {
    pub fn new<T: IntoIterator<IntoIter = I>>(bytes: T) -> Self {
        Self {
            bytes: bytes.into_iter(),
            current: 0,
            remaining: 0,
        }
    }
}

impl<I: Iterator<Item = u8>> Iterator for Bits<I> {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        if self.remaining == 0 {
            self.current = self.bytes.next()?;
            self.remaining = 8;
        }
        self.remaining -= 1;
        Some((self.current >> self.remaining) & 1)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let (lo, hi) = self.bytes.size_hint();
        let pending = self.remaining as usize;
        (
            lo.saturating_mul(8).saturating_add(pending),
            hi.and_then(|h| h.checked_mul(8)?.checked_add(pending)),
        )
    }
}

/// Iterator packing bits (MSB first) back into bytes.
///
/// Only the lowest bit of each input item is used. A trailing group of
/// fewer than 8 bits is discarded.
#[derive(Debug, Clone)]
pub struct Packed<I> {
    bits: I,
}

impl<I: Iterator<Item = u8>> Packed<I> {
    pub fn new<T: IntoIterator<IntoIter = I>>(bits: T) -> Self {
        Self {
            bits: bits.into_iter(),
        }
    }
}

impl<I: Iterator<Item = u8>> Iterator for Packed<I> {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        let mut byte = 0u8;
        for _ in 0..8 {
            byte = (byte << 1) | (self.bits.next()? & 1);
        }
        Some(byte)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let (lo, hi) = self.bits.size_hint();
        (lo / 8, hi.map(|h| h / 8))
    }
}

/// Bytes written to the carrier for `message` under `framing`, in order.
///
/// Callers must run [`crate::codec::capacity::check_message`] first: it
/// rejects length-prefixed messages above `u32::MAX` bytes.
pub(crate) fn framed_bytes(message: &[u8], framing: Framing) -> impl Iterator<Item = u8> + '_ {
    let prefix = match framing {
        Framing::LengthPrefixed => Some((message.len() as u32).to_be_bytes()),
        Framing::Terminator => None,
    };
    let suffix: &'static [u8] = match framing {
        Framing::Terminator => TERMINATOR,
        Framing::LengthPrefixed => &[],
    };

    prefix
        .into_iter()
        .flatten()
        .chain(message.iter().copied())
        .chain(suffix.iter().copied())
}

/// Bitstream for `message` under `framing`, without materializing it.
pub(crate) fn framed_bits(message: &[u8], framing: Framing) -> Bits<impl Iterator<Item = u8> + '_> {
    Bits::new(framed_bytes(message, framing))
}

/// Encodes `message ++ TERMINATOR` into a flat bit vector.
pub fn encode(message: &[u8]) -> Vec<u8> {
    framed_bits(message, Framing::Terminator).collect()
}

/// Packs bits into bytes, ignoring a trailing partial byte.
pub fn decode(bits: &[u8]) -> Vec<u8> {
    Packed::new(bits.iter().copied()).collect()
}

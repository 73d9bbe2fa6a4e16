//! LSB embedding and extraction engine.
//!
//! Works on any [`Carrier`]: the engine owns the bit policy, the carrier
//! only supplies the element order. For the `i`-th bit of the framed
//! bitstream the `i`-th element becomes `(element & !1) | bit`; every later
//! element is left untouched.

use tracing::{debug, trace};

use super::bitstream::{framed_bits, Framing, Packed, LENGTH_PREFIX_BYTES};
use super::capacity::{check_message, framed_bit_len};
use super::carrier::{Carrier, CarrierMut, LsbElement};
use super::error::StegoError;
use crate::TERMINATOR;

/// Outcome of a successful embed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmbedReport {
    /// Number of elements whose LSB was written.
    pub bits_written: usize,
    /// Total addressable elements in the carrier.
    pub capacity: usize,
}

impl EmbedReport {
    /// Elements left untouched after the payload.
    pub fn remaining(&self) -> usize {
        self.capacity - self.bits_written
    }
}

/// Embeds `message` followed by the terminator.
pub fn embed<C>(carrier: &mut C, message: &[u8]) -> Result<EmbedReport, StegoError>
where
    C: CarrierMut + ?Sized,
{
    embed_with(carrier, message, Framing::Terminator)
}

/// Embeds `message` using `framing`.
///
/// All or nothing: on [`StegoError::CapacityExceeded`] the carrier is not
/// modified.
pub fn embed_with<C>(
    carrier: &mut C,
    message: &[u8],
    framing: Framing,
) -> Result<EmbedReport, StegoError>
where
    C: CarrierMut + ?Sized,
{
    let capacity = carrier.element_count();
    let needed = check_message(message, framing, capacity)?;

    let mut bits_written = 0;
    for (element, bit) in carrier.elements_mut().zip(framed_bits(message, framing)) {
        *element = element.with_lsb(bit);
        bits_written += 1;
    }
    debug_assert_eq!(bits_written, needed);

    debug!(
        bits_written,
        capacity,
        %framing,
        message_len = message.len(),
        "embedded message"
    );
    Ok(EmbedReport {
        bits_written,
        capacity,
    })
}

/// Extracts a terminator-framed message.
pub fn extract<C>(carrier: &C) -> Result<Vec<u8>, StegoError>
where
    C: Carrier + ?Sized,
{
    extract_with(carrier, Framing::Terminator)
}

/// Extracts a message framed with `framing`.
///
/// Returns [`StegoError::NoMessageFound`] when no terminator occurs, or when
/// a length header points past the end of the carrier.
pub fn extract_with<C>(carrier: &C, framing: Framing) -> Result<Vec<u8>, StegoError>
where
    C: Carrier + ?Sized,
{
    let bytes = Packed::new(carrier.elements().map(LsbElement::lsb));
    match framing {
        Framing::Terminator => scan_for_terminator(bytes),
        Framing::LengthPrefixed => read_length_prefixed(bytes, carrier.element_count()),
    }
}

fn scan_for_terminator(bytes: impl Iterator<Item = u8>) -> Result<Vec<u8>, StegoError> {
    let mut message = Vec::new();
    for byte in bytes {
        message.push(byte);
        if message.ends_with(TERMINATOR) {
            message.truncate(message.len() - TERMINATOR.len());
            debug!(message_len = message.len(), "terminator found");
            return Ok(message);
        }
    }
    trace!(scanned = message.len(), "no terminator in carrier");
    Err(StegoError::NoMessageFound)
}

fn read_length_prefixed(
    mut bytes: impl Iterator<Item = u8>,
    capacity: usize,
) -> Result<Vec<u8>, StegoError> {
    let mut header = [0u8; LENGTH_PREFIX_BYTES];
    for slot in header.iter_mut() {
        *slot = bytes.next().ok_or(StegoError::NoMessageFound)?;
    }
    let len = u32::from_be_bytes(header) as usize;

    if framed_bit_len(len, Framing::LengthPrefixed) > capacity {
        trace!(len, capacity, "length header exceeds carrier");
        return Err(StegoError::NoMessageFound);
    }

    let message: Vec<u8> = bytes.take(len).collect();
    debug!(message_len = message.len(), "length-prefixed message read");
    Ok(message)
}

//! Capacity model.
//!
//! One message bit is stored per addressable carrier element, so a carrier
//! with `n` elements holds a bitstream of at most `n` bits.

use tracing::debug;

use super::bitstream::Framing;
use super::error::StegoError;

/// Bitstream length (in bits) for a message of `message_len` bytes.
///
/// Saturates instead of overflowing so that absurd lengths always fail the
/// capacity check.
pub fn framed_bit_len(message_len: usize, framing: Framing) -> usize {
    message_len
        .saturating_add(framing.overhead())
        .saturating_mul(8)
}

/// Largest message (in bytes) that fits in `element_count` elements.
pub fn max_message_len(element_count: usize, framing: Framing) -> usize {
    (element_count / 8).saturating_sub(framing.overhead())
}

/// Fails with [`StegoError::CapacityExceeded`] when `bit_len` bits do not fit
/// in `element_count` elements.
pub fn check(bit_len: usize, element_count: usize) -> Result<(), StegoError> {
    debug!(bit_len, element_count, "capacity check");
    if bit_len > element_count {
        return Err(StegoError::CapacityExceeded {
            needed: bit_len,
            available: element_count,
        });
    }
    Ok(())
}

/// Checks that `message` framed with `framing` fits in `element_count`.
///
/// Length-prefixed messages must also fit the 32-bit header.
pub fn check_message(
    message: &[u8],
    framing: Framing,
    element_count: usize,
) -> Result<usize, StegoError> {
    let bit_len = framed_bit_len(message.len(), framing);
    if framing == Framing::LengthPrefixed && u32::try_from(message.len()).is_err() {
        return Err(StegoError::CapacityExceeded {
            needed: bit_len,
            available: element_count,
        });
    }
    check(bit_len, element_count)?;
    Ok(bit_len)
}

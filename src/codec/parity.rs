//! Parity entry points.
//!
//! The parity scheme sets each element's parity (even = 0, odd = 1) to the
//! message bit. For a single bit per element the parity *is* the LSB, so
//! these functions are an intentional alias of [`super::lsb`]: same element
//! order, same element updates, same framing. Carriers written by one can be
//! read by the other.

use super::bitstream::Framing;
use super::carrier::{Carrier, CarrierMut};
use super::error::StegoError;
use super::lsb::{self, EmbedReport};

/// Embeds `message` by forcing element parity, terminator framed.
pub fn embed<C>(carrier: &mut C, message: &[u8]) -> Result<EmbedReport, StegoError>
where
    C: CarrierMut + ?Sized,
{
    embed_with(carrier, message, Framing::Terminator)
}

pub fn embed_with<C>(
    carrier: &mut C,
    message: &[u8],
    framing: Framing,
) -> Result<EmbedReport, StegoError>
where
    C: CarrierMut + ?Sized,
{
    lsb::embed_with(carrier, message, framing)
}

/// Reads element parities back into a terminator-framed message.
pub fn extract<C>(carrier: &C) -> Result<Vec<u8>, StegoError>
where
    C: Carrier + ?Sized,
{
    extract_with(carrier, Framing::Terminator)
}

pub fn extract_with<C>(carrier: &C, framing: Framing) -> Result<Vec<u8>, StegoError>
where
    C: Carrier + ?Sized,
{
    lsb::extract_with(carrier, framing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::carrier::PixelBuffer;

    fn gradient(pixels: usize) -> Vec<u8> {
        (0..pixels * 3).map(|i| (i * 37 % 256) as u8).collect()
    }

    #[test]
    fn test_parity_matches_lsb() {
        let mut by_lsb = PixelBuffer::new(gradient(300), 3).unwrap();
        let mut by_parity = by_lsb.clone();

        lsb::embed(&mut by_lsb, b"same bits").unwrap();
        embed(&mut by_parity, b"same bits").unwrap();

        assert_eq!(by_lsb, by_parity);
    }

    #[test]
    fn test_cross_extraction() {
        let mut pixels = PixelBuffer::new(gradient(300), 3).unwrap();
        embed(&mut pixels, b"parity").unwrap();
        assert_eq!(lsb::extract(&pixels).unwrap(), b"parity");

        let mut pixels = PixelBuffer::new(gradient(300), 3).unwrap();
        lsb::embed(&mut pixels, b"lsb").unwrap();
        assert_eq!(extract(&pixels).unwrap(), b"lsb");
    }

    #[test]
    fn test_parity_capacity_exceeded() {
        let mut pixels = PixelBuffer::new(gradient(4), 3).unwrap();
        assert!(matches!(
            embed(&mut pixels, b"x"),
            Err(StegoError::CapacityExceeded {
                needed: 112,
                available: 12
            })
        ));
    }
}

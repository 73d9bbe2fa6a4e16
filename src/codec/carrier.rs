//! Addressable element views over decoded carriers.
//!
//! The embedding engine only needs to walk a carrier's elements in a fixed
//! order. Each carrier shape supplies that order:
//! - audio: sample index `0..n`
//! - image: pixel index, then channel R, G, B (alpha skipped)
//! - video: frame, row, column, channel R, G, B

use super::error::StegoError;

/// An integer element whose least significant bit can carry one message bit.
pub trait LsbElement: Copy {
    /// Returns the element's LSB as `0` or `1`.
    fn lsb(self) -> u8;

    /// Returns the element with its LSB replaced by `bit & 1`.
    fn with_lsb(self, bit: u8) -> Self;
}

impl LsbElement for u8 {
    fn lsb(self) -> u8 {
        self & 1
    }

    fn with_lsb(self, bit: u8) -> Self {
        (self & !1) | (bit & 1)
    }
}

impl LsbElement for i16 {
    fn lsb(self) -> u8 {
        (self & 1) as u8
    }

    fn with_lsb(self, bit: u8) -> Self {
        (self & !1) | i16::from(bit & 1)
    }
}

/// Read access to a carrier's elements in canonical order.
pub trait Carrier {
    type Element: LsbElement;

    /// Number of addressable elements (the carrier's capacity in bits).
    fn element_count(&self) -> usize;

    /// Elements in canonical enumeration order.
    fn elements(&self) -> impl Iterator<Item = Self::Element> + '_;
}

/// Write access to a carrier's elements, in the same order as
/// [`Carrier::elements`].
pub trait CarrierMut: Carrier {
    fn elements_mut(&mut self) -> impl Iterator<Item = &mut Self::Element> + '_;
}

/// Number of colour channels the engine addresses per pixel.
pub const RGB_CHANNELS: usize = 3;

impl Carrier for [i16] {
    type Element = i16;

    fn element_count(&self) -> usize {
        self.len()
    }

    fn elements(&self) -> impl Iterator<Item = i16> + '_ {
        self.iter().copied()
    }
}

impl CarrierMut for [i16] {
    fn elements_mut(&mut self) -> impl Iterator<Item = &mut i16> + '_ {
        self.iter_mut()
    }
}

fn check_pixel_layout(len: usize, channels: usize) -> Result<(), StegoError> {
    if !(RGB_CHANNELS..=RGB_CHANNELS + 1).contains(&channels) {
        return Err(StegoError::UnsupportedFormat(format!(
            "expected 3 (RGB) or 4 (RGBA) channels per pixel, got {}",
            channels
        )));
    }
    if len % channels != 0 {
        return Err(StegoError::UnsupportedFormat(format!(
            "pixel buffer of {} bytes is not a whole number of {}-channel pixels",
            len, channels
        )));
    }
    Ok(())
}

/// Interleaved 8-bit pixel data (`RGBRGB...` or `RGBARGBA...`).
///
/// Only the first three channels of every pixel are addressed; alpha passes
/// through unmodified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer<B> {
    data: B,
    channels: usize,
}

impl<B: AsRef<[u8]>> PixelBuffer<B> {
    /// Wraps `data` as pixels of `channels` interleaved channels.
    pub fn new(data: B, channels: usize) -> Result<Self, StegoError> {
        check_pixel_layout(data.as_ref().len(), channels)?;
        Ok(Self { data, channels })
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn pixel_count(&self) -> usize {
        self.data.as_ref().len() / self.channels
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.data.as_ref()
    }

    pub fn into_inner(self) -> B {
        self.data
    }
}

impl<B: AsRef<[u8]>> Carrier for PixelBuffer<B> {
    type Element = u8;

    fn element_count(&self) -> usize {
        self.pixel_count() * RGB_CHANNELS
    }

    fn elements(&self) -> impl Iterator<Item = u8> + '_ {
        self.data
            .as_ref()
            .chunks_exact(self.channels)
            .flat_map(|px| px.iter().take(RGB_CHANNELS).copied())
    }
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> CarrierMut for PixelBuffer<B> {
    fn elements_mut(&mut self) -> impl Iterator<Item = &mut u8> + '_ {
        let channels = self.channels;
        self.data
            .as_mut()
            .chunks_exact_mut(channels)
            .flat_map(|px| px.iter_mut().take(RGB_CHANNELS))
    }
}

/// One decoded video frame: a row-major `(row, column, channel)` grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    width: u32,
    height: u32,
    pixels: PixelBuffer<Vec<u8>>,
}

impl Frame {
    /// Builds a frame, checking that `data` holds exactly
    /// `width * height` pixels of `channels` channels.
    pub fn new(width: u32, height: u32, channels: usize, data: Vec<u8>) -> Result<Self, StegoError> {
        let expected = (width as usize) * (height as usize) * channels;
        if data.len() != expected {
            return Err(StegoError::UnsupportedFormat(format!(
                "frame {}x{}x{} needs {} bytes, got {}",
                width,
                height,
                channels,
                expected,
                data.len()
            )));
        }
        let pixels = PixelBuffer::new(data, channels)?;
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> usize {
        self.pixels.channels()
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.pixels.as_bytes()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.pixels.into_inner()
    }
}

impl Carrier for [Frame] {
    type Element = u8;

    fn element_count(&self) -> usize {
        self.iter().map(|f| f.pixels.element_count()).sum()
    }

    fn elements(&self) -> impl Iterator<Item = u8> + '_ {
        self.iter().flat_map(|f| f.pixels.elements())
    }
}

impl CarrierMut for [Frame] {
    fn elements_mut(&mut self) -> impl Iterator<Item = &mut u8> + '_ {
        self.iter_mut().flat_map(|f| f.pixels.elements_mut())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_i16_lsb_handles_negative_samples() {
        assert_eq!((-1i16).lsb(), 1);
        assert_eq!((-1i16).with_lsb(0), -2);
        assert_eq!((-2i16).with_lsb(1), -1);
        assert_eq!(i16::MIN.with_lsb(1), i16::MIN + 1);
        assert_eq!(i16::MAX.with_lsb(0), i16::MAX - 1);
    }

    #[test]
    fn test_u8_with_lsb() {
        assert_eq!(0xFFu8.with_lsb(0), 0xFE);
        assert_eq!(0x00u8.with_lsb(1), 0x01);
        assert_eq!(0x10u8.with_lsb(3), 0x11);
    }

    #[test]
    fn test_rgba_skips_alpha() {
        let data = vec![1, 2, 3, 200, 4, 5, 6, 201];
        let pixels = PixelBuffer::new(data, 4).unwrap();
        assert_eq!(pixels.element_count(), 6);
        assert_eq!(pixels.elements().collect::<Vec<_>>(), vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_pixel_layout_rejected() {
        assert!(matches!(
            PixelBuffer::new(vec![0u8; 4], 2),
            Err(StegoError::UnsupportedFormat(_))
        ));
        assert!(matches!(
            PixelBuffer::new(vec![0u8; 7], 3),
            Err(StegoError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_frame_size_mismatch() {
        assert!(Frame::new(2, 2, 3, vec![0u8; 11]).is_err());
        assert!(Frame::new(2, 2, 3, vec![0u8; 12]).is_ok());
    }

    #[test]
    fn test_frames_enumerate_in_order() {
        let frames = vec![
            Frame::new(1, 1, 3, vec![1, 2, 3]).unwrap(),
            Frame::new(1, 1, 3, vec![4, 5, 6]).unwrap(),
        ];
        assert_eq!(frames.element_count(), 6);
        assert_eq!(frames.elements().collect::<Vec<_>>(), vec![1, 2, 3, 4, 5, 6]);
    }
}

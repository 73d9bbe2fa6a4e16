//! LSB (Least Significant Bit) steganography for images.
//!
//! Hides data in the least significant bits of pixel color values.
//! Supports PNG and BMP images (lossless formats only).
//!
//! Pixels are walked row by row; within each pixel the R, G and B channels
//! each carry one bit. Alpha is never touched.

use image::{DynamicImage, GenericImageView, ImageFormat};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::io::Cursor;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, warn};

use crate::codec::carrier::RGB_CHANNELS;
use crate::codec::{
    capacity, lsb, parity, Carrier, CarrierMut, EmbedReport, Framing, PixelBuffer, StegoError,
};

/// Errors that can occur during image steganography.
#[derive(Error, Debug)]
pub enum ImageStegoError {
    #[error(transparent)]
    Codec(#[from] StegoError),

    #[error("Image load error: {0}")]
    ImageLoadError(String),

    #[error("Image save error: {0}")]
    ImageSaveError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ImageStegoError {
    /// True when extraction ran but found no hidden data.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Codec(e) if e.is_not_found())
    }
}

/// Embedding entry point used for image carriers.
///
/// Both write the same bits; see [`crate::codec::parity`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImageTechnique {
    #[default]
    Lsb,
    Parity,
}

impl ImageTechnique {
    pub fn embed<C>(self, carrier: &mut C, data: &[u8], framing: Framing) -> Result<EmbedReport, StegoError>
    where
        C: CarrierMut + ?Sized,
    {
        match self {
            Self::Lsb => lsb::embed_with(carrier, data, framing),
            Self::Parity => parity::embed_with(carrier, data, framing),
        }
    }

    pub fn extract<C>(self, carrier: &C, framing: Framing) -> Result<Vec<u8>, StegoError>
    where
        C: Carrier + ?Sized,
    {
        match self {
            Self::Lsb => lsb::extract_with(carrier, framing),
            Self::Parity => parity::extract_with(carrier, framing),
        }
    }
}

impl fmt::Display for ImageTechnique {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lsb => write!(f, "lsb"),
            Self::Parity => write!(f, "parity"),
        }
    }
}

impl FromStr for ImageTechnique {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lsb" => Ok(Self::Lsb),
            "parity" => Ok(Self::Parity),
            other => Err(format!("Unknown image technique: {}. Use: lsb or parity", other)),
        }
    }
}

/// Image steganography handler.
pub struct ImageStego {
    image: DynamicImage,
}

impl ImageStego {
    /// Creates a new ImageStego from a file path.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ImageStegoError> {
        let image = image::open(path).map_err(|e| ImageStegoError::ImageLoadError(e.to_string()))?;
        Ok(Self { image })
    }

    /// Creates a new ImageStego from bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ImageStegoError> {
        let image = image::load_from_memory(bytes)
            .map_err(|e| ImageStegoError::ImageLoadError(e.to_string()))?;
        Ok(Self { image })
    }

    /// Creates a new ImageStego from a DynamicImage.
    pub fn from_image(image: DynamicImage) -> Self {
        Self { image }
    }

    /// Number of addressable elements: 3 per pixel.
    pub fn element_count(&self) -> usize {
        let (width, height) = self.image.dimensions();
        (width as usize) * (height as usize) * RGB_CHANNELS
    }

    /// Returns the capacity in bytes that can be hidden in this image.
    pub fn capacity(&self, framing: Framing) -> usize {
        capacity::max_message_len(self.element_count(), framing)
    }

    /// Hides data in the image.
    ///
    /// # Arguments
    /// * `data` - The data to hide
    /// * `technique` - Which entry point writes the bits
    /// * `framing` - How the end of the data is marked
    ///
    /// # Returns
    /// A new image with the data hidden inside. RGB and RGBA images keep
    /// their layout; other color types come back as RGB8 or RGBA8.
    pub fn hide(
        &self,
        data: &[u8],
        technique: ImageTechnique,
        framing: Framing,
    ) -> Result<(DynamicImage, EmbedReport), ImageStegoError> {
        let mut output = normalize(&self.image).into_owned();
        let report = {
            let mut pixels = pixel_view_mut(&mut output)?;
            technique.embed(&mut pixels, data, framing)?
        };

        debug!(%technique, bits = report.bits_written, "image carrier written");
        Ok((output, report))
    }

    /// Extracts hidden data from the image.
    pub fn extract(&self, technique: ImageTechnique, framing: Framing) -> Result<Vec<u8>, ImageStegoError> {
        let image = normalize(&self.image);
        let pixels = pixel_view(&image)?;
        Ok(technique.extract(&pixels, framing)?)
    }

    /// Saves the image to a file.
    ///
    /// BMP paths are written as BMP; anything else is written as PNG so the
    /// hidden bits survive.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ImageStegoError> {
        let path = path.as_ref();
        let format = match ImageFormat::from_path(path) {
            Ok(ImageFormat::Bmp) => ImageFormat::Bmp,
            Ok(ImageFormat::Png) => ImageFormat::Png,
            _ => {
                warn!(path = %path.display(), "output is not PNG or BMP, writing PNG data");
                ImageFormat::Png
            }
        };
        self.image
            .save_with_format(path, format)
            .map_err(|e| ImageStegoError::ImageSaveError(e.to_string()))
    }

    /// Returns the image as PNG bytes.
    pub fn to_png_bytes(&self) -> Result<Vec<u8>, ImageStegoError> {
        let mut bytes = Vec::new();
        self.image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .map_err(|e| ImageStegoError::ImageSaveError(e.to_string()))?;
        Ok(bytes)
    }

    /// Returns a reference to the underlying image.
    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    /// Consumes self and returns the underlying image.
    pub fn into_image(self) -> DynamicImage {
        self.image
    }
}

/// Brings any color type to 8-bit RGB or RGBA.
fn normalize(image: &DynamicImage) -> Cow<'_, DynamicImage> {
    match image {
        DynamicImage::ImageRgb8(_) | DynamicImage::ImageRgba8(_) => Cow::Borrowed(image),
        other if other.color().has_alpha() => {
            warn!(color = ?other.color(), "converting image to RGBA8");
            Cow::Owned(DynamicImage::ImageRgba8(other.to_rgba8()))
        }
        other => {
            warn!(color = ?other.color(), "converting image to RGB8");
            Cow::Owned(DynamicImage::ImageRgb8(other.to_rgb8()))
        }
    }
}

fn pixel_view(image: &DynamicImage) -> Result<PixelBuffer<&[u8]>, StegoError> {
    match image {
        DynamicImage::ImageRgb8(buf) => PixelBuffer::new(buf.as_raw().as_slice(), 3),
        DynamicImage::ImageRgba8(buf) => PixelBuffer::new(buf.as_raw().as_slice(), 4),
        other => Err(StegoError::UnsupportedFormat(format!("{:?} pixels", other.color()))),
    }
}

fn pixel_view_mut(image: &mut DynamicImage) -> Result<PixelBuffer<&mut [u8]>, StegoError> {
    match image {
        DynamicImage::ImageRgb8(buf) => PixelBuffer::new(&mut **buf, 3),
        DynamicImage::ImageRgba8(buf) => PixelBuffer::new(&mut **buf, 4),
        other => Err(StegoError::UnsupportedFormat(format!("{:?} pixels", other.color()))),
    }
}

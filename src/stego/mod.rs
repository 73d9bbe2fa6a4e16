//! Carrier I/O adapters.
//!
//! Supports:
//! - Image LSB / parity steganography (PNG, BMP)
//! - Audio LSB steganography (WAV, 16-bit PCM)
//! - Video LSB steganography (directories of PNG/BMP frames)
//!
//! Each adapter decodes its container into a view from [`crate::codec`],
//! runs the codec, and re-encodes losslessly.

pub mod audio;
pub mod image;
pub mod video;

pub use audio::{AudioStego, AudioStegoError};
pub use image::{ImageStego, ImageStegoError, ImageTechnique};
pub use video::{VideoStego, VideoStegoError};

use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// The kind of cover medium a path holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarrierKind {
    Audio,
    Image,
    Video,
    Text,
}

impl CarrierKind {
    /// Guesses the kind from a path: directories are frame sequences,
    /// files go by extension.
    pub fn detect(path: &Path) -> Option<Self> {
        if path.is_dir() {
            return Some(Self::Video);
        }
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "wav" | "wave" => Some(Self::Audio),
            "png" | "bmp" => Some(Self::Image),
            "html" | "htm" | "xhtml" | "txt" => Some(Self::Text),
            _ => None,
        }
    }
}

impl fmt::Display for CarrierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Audio => write!(f, "audio"),
            Self::Image => write!(f, "image"),
            Self::Video => write!(f, "video"),
            Self::Text => write!(f, "text"),
        }
    }
}

impl FromStr for CarrierKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "audio" | "wav" => Ok(Self::Audio),
            "image" | "png" | "bmp" => Ok(Self::Image),
            "video" | "frames" => Ok(Self::Video),
            "text" | "html" => Ok(Self::Text),
            other => Err(format!(
                "Unknown carrier kind: {}. Use: audio, image, video, or text",
                other
            )),
        }
    }
}

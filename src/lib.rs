//! # stegtools - LSB and markup steganography
//!
//! Hides a message inside a cover carrier and recovers it exactly:
//! 16-bit PCM audio, PNG/BMP images, video frame sequences, and HTML
//! documents.
//!
//! ## Overview
//!
//! - The message is framed (terminator or length prefix) and expanded into
//!   bits, most significant bit first
//! - Each bit overwrites the least significant bit of one carrier element
//!   (an audio sample, or an R/G/B channel value)
//! - Elements are visited in a fixed order, so extraction walks them the
//!   same way and reads the bits back
//! - HTML carriers instead hold the message in a comment or a hidden `div`
//!
//! There is no encryption: anyone who knows the scheme can read the message.
//!
//! ## Example Usage
//!
//! ```rust
//! use stegtools::codec;
//!
//! let mut samples = vec![0i16; 400];
//! codec::embed(&mut samples[..], b"HI").unwrap();
//! assert_eq!(codec::extract(&samples[..]).unwrap(), b"HI");
//! ```
//!
//! ## Modules
//!
//! - [`codec`]: bitstream framing, capacity checks, the LSB engine
//! - [`stego`]: WAV, image and frame-directory adapters
//! - [`markup`]: HTML comment and hidden-marker insertion
//! - [`config`]: persistent defaults

/// Reserved byte sequence marking the end of a terminator-framed message.
pub const TERMINATOR: &[u8] = b"#####END#####";

pub mod codec;
pub mod config;
pub mod markup;
pub mod stego;

// Re-export commonly used types at the crate root
pub use codec::{EmbedReport, Framing, StegoError};
pub use config::{ConfigError, StegConfig};
pub use markup::{MarkupError, MarkupTechnique};
pub use stego::{
    AudioStego, AudioStegoError, CarrierKind, ImageStego, ImageStegoError, ImageTechnique,
    VideoStego, VideoStegoError,
};

//! Steganographic codec.
//!
//! Carrier-agnostic core: bitstream framing, capacity checks, and the LSB
//! engine. Nothing in here touches files or container formats; the adapters
//! in [`crate::stego`] decode carriers into the views defined in [`carrier`].

pub mod bitstream;
pub mod capacity;
pub mod carrier;
pub mod error;
pub mod lsb;
pub mod parity;

pub use bitstream::{decode, encode, Framing};
pub use capacity::{framed_bit_len, max_message_len};
pub use carrier::{Carrier, CarrierMut, Frame, LsbElement, PixelBuffer};
pub use error::StegoError;
pub use lsb::{embed, embed_with, extract, extract_with, EmbedReport};

//! Capacity command - report how much a carrier can hold.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use stegtools::{AudioStego, CarrierKind, Framing, ImageStego, StegConfig, VideoStego};

use super::{CommandExecutor, Settings};

/// Show how many message bytes fit in a carrier.
#[derive(Args, Debug)]
pub struct CapacityCommand {
    /// Path to the carrier file or frame directory
    #[arg(short, long)]
    pub carrier: PathBuf,

    /// Carrier kind: audio, image, video, or text (guessed from the path by default)
    #[arg(long)]
    pub kind: Option<String>,
}

impl CommandExecutor for CapacityCommand {
    fn execute(&self, config: &StegConfig) -> Result<()> {
        let settings = Settings::resolve(&self.carrier, self.kind.as_deref(), None, None, config)?;
        let carrier = &self.carrier;

        let elements = match settings.kind {
            CarrierKind::Audio => AudioStego::from_file(carrier)
                .with_context(|| format!("Failed to load audio carrier {}", carrier.display()))?
                .sample_count(),
            CarrierKind::Image => ImageStego::from_file(carrier)
                .with_context(|| format!("Failed to load image carrier {}", carrier.display()))?
                .element_count(),
            CarrierKind::Video => VideoStego::from_dir(carrier, config.video_fps)
                .with_context(|| format!("Failed to load frames from {}", carrier.display()))?
                .element_count(),
            CarrierKind::Text => {
                println!("Carrier Capacity: {}", carrier.display());
                println!("  Kind: text");
                println!("  Capacity: unbounded (the document grows to fit)");
                return Ok(());
            }
        };

        println!("Carrier Capacity: {}", carrier.display());
        println!("  Kind: {}", settings.kind);
        println!("  Addressable elements: {} (1 bit each)", elements);
        for framing in [Framing::Terminator, Framing::LengthPrefixed] {
            println!(
                "  Max message ({} framing): {} bytes",
                framing,
                stegtools::codec::max_message_len(elements, framing)
            );
        }

        Ok(())
    }
}

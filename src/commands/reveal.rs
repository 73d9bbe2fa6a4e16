//! Reveal command - recover a hidden message from a carrier.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use stegtools::{AudioStego, CarrierKind, ImageStego, StegConfig, VideoStego};

use super::{CommandExecutor, Settings};

/// Recover a hidden message from a carrier.
///
/// Finding no message is not an error: the command reports it and exits
/// successfully.
///
/// Use -o/--output to write raw bytes to a file (required for binary data).
/// Without -o, output is printed as text (lossy UTF-8 conversion).
#[derive(Args, Debug)]
pub struct RevealCommand {
    /// Path to the carrier file or frame directory
    #[arg(short, long)]
    pub carrier: PathBuf,

    /// Carrier kind: audio, image, video, or text (guessed from the path by default)
    #[arg(long)]
    pub kind: Option<String>,

    /// Technique: lsb or parity for images, comment or marker for text
    #[arg(short, long)]
    pub technique: Option<String>,

    /// Message framing for audio, image and video: terminator or length-prefixed
    #[arg(long)]
    pub framing: Option<String>,

    /// Output file for the recovered bytes
    /// If not specified, prints the message to stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl CommandExecutor for RevealCommand {
    fn execute(&self, config: &StegConfig) -> Result<()> {
        let settings = Settings::resolve(
            &self.carrier,
            self.kind.as_deref(),
            self.technique.as_deref(),
            self.framing.as_deref(),
            config,
        )?;
        info!(kind = %settings.kind, carrier = %self.carrier.display(), "revealing message");

        let Some(data) = self.extract(&settings, config)? else {
            eprintln!("No hidden message found!");
            return Ok(());
        };

        match &self.output {
            Some(path) => {
                fs::write(path, &data)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                println!("Hidden message written to: {}", path.display());
                println!("  Size: {} bytes", data.len());
            }
            None => println!("{}", String::from_utf8_lossy(&data)),
        }

        Ok(())
    }
}

impl RevealCommand {
    /// Recovered bytes, or `None` when the carrier holds no message.
    fn extract(&self, settings: &Settings, config: &StegConfig) -> Result<Option<Vec<u8>>> {
        let carrier = &self.carrier;
        let data = match settings.kind {
            CarrierKind::Audio => {
                let audio = AudioStego::from_file(carrier)
                    .with_context(|| format!("Failed to load audio carrier {}", carrier.display()))?;
                match audio.extract(settings.framing) {
                    Err(e) if e.is_not_found() => None,
                    other => Some(other.context("Failed to extract from audio")?),
                }
            }
            CarrierKind::Image => {
                let stego = ImageStego::from_file(carrier)
                    .with_context(|| format!("Failed to load image carrier {}", carrier.display()))?;
                match stego.extract(settings.image_technique, settings.framing) {
                    Err(e) if e.is_not_found() => None,
                    other => Some(other.context("Failed to extract from image")?),
                }
            }
            CarrierKind::Video => {
                let video = VideoStego::from_dir(carrier, config.video_fps)
                    .with_context(|| format!("Failed to load frames from {}", carrier.display()))?;
                match video.extract(settings.framing) {
                    Err(e) if e.is_not_found() => None,
                    other => Some(other.context("Failed to extract from video frames")?),
                }
            }
            CarrierKind::Text => {
                let document = fs::read_to_string(carrier)
                    .with_context(|| format!("Failed to read document {}", carrier.display()))?;
                settings
                    .markup_technique
                    .extract(&document)
                    .ok()
                    .map(String::into_bytes)
            }
        };
        Ok(data)
    }
}

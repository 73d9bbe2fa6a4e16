//! Hide command - embed a message into a carrier.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use stegtools::{AudioStego, CarrierKind, EmbedReport, ImageStego, StegConfig, VideoStego};

use super::{CommandExecutor, Settings};

/// Hide a message inside a carrier.
///
/// The carrier can be:
/// - a 16-bit PCM WAV file
/// - a PNG or BMP image
/// - a directory of PNG/BMP video frames
/// - an HTML or text document
///
/// The stego carrier is written to --output; the input is never modified.
#[derive(Args, Debug)]
pub struct HideCommand {
    /// Path to the carrier file or frame directory
    #[arg(short, long)]
    pub carrier: PathBuf,

    /// Where to write the carrier with the hidden message
    #[arg(short, long)]
    pub output: PathBuf,

    /// Text message to hide (mutually exclusive with --file)
    #[arg(short, long, conflicts_with = "file")]
    pub message: Option<String>,

    /// File whose raw bytes are hidden (mutually exclusive with --message)
    #[arg(short, long, conflicts_with = "message")]
    pub file: Option<PathBuf>,

    /// Carrier kind: audio, image, video, or text (guessed from the path by default)
    #[arg(long)]
    pub kind: Option<String>,

    /// Technique: lsb or parity for images, comment or marker for text
    #[arg(short, long)]
    pub technique: Option<String>,

    /// Message framing for audio, image and video: terminator or length-prefixed
    #[arg(long)]
    pub framing: Option<String>,
}

impl CommandExecutor for HideCommand {
    fn execute(&self, config: &StegConfig) -> Result<()> {
        let settings = Settings::resolve(
            &self.carrier,
            self.kind.as_deref(),
            self.technique.as_deref(),
            self.framing.as_deref(),
            config,
        )?;
        let message = self.read_message()?;
        info!(kind = %settings.kind, bytes = message.len(), "hiding message");

        let report = match settings.kind {
            CarrierKind::Audio => self.hide_in_audio(&message, &settings)?,
            CarrierKind::Image => self.hide_in_image(&message, &settings)?,
            CarrierKind::Video => self.hide_in_video(&message, &settings, config)?,
            CarrierKind::Text => {
                self.hide_in_text(message, &settings)?;
                None
            }
        };

        println!("Message hidden successfully in {}", self.output.display());
        if let Some(report) = report {
            println!(
                "  Elements written: {} of {} ({} framing)",
                report.bits_written, report.capacity, settings.framing
            );
        }

        Ok(())
    }
}

impl HideCommand {
    /// Message bytes from --message, --file, or stdin.
    fn read_message(&self) -> Result<Vec<u8>> {
        if let Some(m) = &self.message {
            return Ok(m.as_bytes().to_vec());
        }
        if let Some(path) = &self.file {
            return fs::read(path)
                .with_context(|| format!("Failed to read message file {}", path.display()));
        }

        eprintln!("Reading message from stdin (Ctrl+D to finish):");
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read message from stdin")?;
        Ok(buffer.trim().as_bytes().to_vec())
    }

    fn hide_in_audio(&self, message: &[u8], settings: &Settings) -> Result<Option<EmbedReport>> {
        let audio = AudioStego::from_file(&self.carrier)
            .with_context(|| format!("Failed to load audio carrier {}", self.carrier.display()))?;
        let (hidden, report) = audio
            .hide(message, settings.framing)
            .context("Failed to hide message in audio")?;
        hidden
            .save(&self.output)
            .with_context(|| format!("Failed to write {}", self.output.display()))?;
        Ok(Some(report))
    }

    fn hide_in_image(&self, message: &[u8], settings: &Settings) -> Result<Option<EmbedReport>> {
        let stego = ImageStego::from_file(&self.carrier)
            .with_context(|| format!("Failed to load image carrier {}", self.carrier.display()))?;
        let (hidden, report) = stego
            .hide(message, settings.image_technique, settings.framing)
            .context("Failed to hide message in image")?;
        ImageStego::from_image(hidden)
            .save(&self.output)
            .with_context(|| format!("Failed to write {}", self.output.display()))?;
        Ok(Some(report))
    }

    fn hide_in_video(
        &self,
        message: &[u8],
        settings: &Settings,
        config: &StegConfig,
    ) -> Result<Option<EmbedReport>> {
        let video = VideoStego::from_dir(&self.carrier, config.video_fps)
            .with_context(|| format!("Failed to load frames from {}", self.carrier.display()))?;
        let (hidden, report) = video
            .hide(message, settings.framing)
            .context("Failed to hide message in video frames")?;
        hidden
            .save_dir(&self.output)
            .with_context(|| format!("Failed to write frames to {}", self.output.display()))?;
        Ok(Some(report))
    }

    fn hide_in_text(&self, message: Vec<u8>, settings: &Settings) -> Result<()> {
        let document = fs::read_to_string(&self.carrier)
            .with_context(|| format!("Failed to read document {}", self.carrier.display()))?;
        let message =
            String::from_utf8(message).context("Text carriers can only hide UTF-8 messages")?;
        let stego = settings.markup_technique.insert(&document, &message);
        fs::write(&self.output, stego)
            .with_context(|| format!("Failed to write {}", self.output.display()))?;
        Ok(())
    }
}

//! Command module - Strategy pattern for CLI commands.
//!
//! Each command is a separate module implementing the `CommandExecutor` trait.

mod capacity;
mod hide;
mod reveal;

pub use capacity::CapacityCommand;
pub use hide::HideCommand;
pub use reveal::RevealCommand;

use std::path::Path;

use anyhow::{Context, Result};
use tracing::warn;

use stegtools::{CarrierKind, Framing, ImageTechnique, MarkupTechnique, StegConfig};

/// Trait for command execution - Strategy pattern.
///
/// Each command struct holds its parsed arguments and implements
/// this trait to define its execution logic.
pub trait CommandExecutor {
    /// Executes the command with its parsed arguments and loaded defaults.
    fn execute(&self, config: &StegConfig) -> Result<()>;
}

/// Settings shared by every carrier command, after applying flags over
/// config.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Settings {
    pub kind: CarrierKind,
    pub framing: Framing,
    pub image_technique: ImageTechnique,
    pub markup_technique: MarkupTechnique,
}

impl Settings {
    pub fn resolve(
        carrier: &Path,
        kind: Option<&str>,
        technique: Option<&str>,
        framing: Option<&str>,
        config: &StegConfig,
    ) -> Result<Self> {
        let kind = match kind {
            Some(k) => k.parse::<CarrierKind>().map_err(anyhow::Error::msg)?,
            None => CarrierKind::detect(carrier).with_context(|| {
                format!(
                    "Cannot tell carrier kind of {}; pass --kind audio|image|video|text",
                    carrier.display()
                )
            })?,
        };

        let framing = match framing {
            Some(f) => f.parse::<Framing>().map_err(anyhow::Error::msg)?,
            None => config.framing,
        };

        let mut image_technique = config.image_technique;
        let mut markup_technique = config.markup_technique;
        if let Some(t) = technique {
            match kind {
                CarrierKind::Image => {
                    image_technique = t.parse().map_err(anyhow::Error::msg)?;
                }
                CarrierKind::Text => {
                    markup_technique = t.parse().map_err(anyhow::Error::msg)?;
                }
                CarrierKind::Audio | CarrierKind::Video => {
                    warn!(technique = t, %kind, "technique ignored for this carrier kind");
                }
            }
        }

        Ok(Self {
            kind,
            framing,
            image_technique,
            markup_technique,
        })
    }
}

//! Text-markup steganography.
//!
//! Hides a message in a document's structure instead of its bits. Capacity is
//! unbounded: the document grows to fit.

pub mod html;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub use html::{extract_via_comment, extract_via_marker, insert_via_comment, insert_via_marker};

/// Errors that can occur during markup steganography.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MarkupError {
    #[error("No hidden message found in {technique} wrappers")]
    NotFound { technique: &'static str },
}

/// Which wrapper carries the message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MarkupTechnique {
    /// HTML comment appended at the end.
    #[default]
    Comment,
    /// Hidden `div` before `</body>`.
    Marker,
}

impl MarkupTechnique {
    pub fn insert(self, document: &str, message: &str) -> String {
        match self {
            Self::Comment => insert_via_comment(document, message),
            Self::Marker => insert_via_marker(document, message),
        }
    }

    pub fn extract(self, document: &str) -> Result<String, MarkupError> {
        match self {
            Self::Comment => extract_via_comment(document),
            Self::Marker => extract_via_marker(document),
        }
    }
}

impl fmt::Display for MarkupTechnique {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Comment => write!(f, "comment"),
            Self::Marker => write!(f, "marker"),
        }
    }
}

impl FromStr for MarkupTechnique {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "comment" => Ok(Self::Comment),
            "marker" | "invisible" => Ok(Self::Marker),
            other => Err(format!("Unknown markup technique: {}. Use: comment or marker", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_technique_dispatch() {
        for technique in [MarkupTechnique::Comment, MarkupTechnique::Marker] {
            let doc = technique.insert("<body></body>", "msg");
            assert_eq!(technique.extract(&doc).unwrap(), "msg");
        }
    }

    #[test]
    fn test_technique_parse() {
        assert_eq!("INVISIBLE".parse::<MarkupTechnique>(), Ok(MarkupTechnique::Marker));
        assert!("whitespace".parse::<MarkupTechnique>().is_err());
    }
}

//! Error types for the steganographic codec.

use thiserror::Error;

/// Errors that can occur while embedding into or extracting from a carrier.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StegoError {
    /// The framed message needs more elements than the carrier has.
    /// Raised before any element is touched.
    #[error("Message too large for carrier: need {needed} elements, have {available}")]
    CapacityExceeded { needed: usize, available: usize },

    /// The carrier layout does not match what the scheme expects.
    #[error("Unsupported carrier format: {0}")]
    UnsupportedFormat(String),

    /// Extraction ran over the carrier without finding a framed message.
    #[error("No hidden message found")]
    NoMessageFound,
}

impl StegoError {
    /// Returns true for the negative-result case of extraction.
    ///
    /// Callers usually report this to the user instead of treating it
    /// as a failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NoMessageFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_not_found() {
        assert!(StegoError::NoMessageFound.is_not_found());
        assert!(!StegoError::CapacityExceeded {
            needed: 2,
            available: 1
        }
        .is_not_found());
    }

    #[test]
    fn test_capacity_message() {
        let err = StegoError::CapacityExceeded {
            needed: 120,
            available: 100,
        };
        assert_eq!(
            err.to_string(),
            "Message too large for carrier: need 120 elements, have 100"
        );
    }
}

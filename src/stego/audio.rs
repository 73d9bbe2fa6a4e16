//! LSB steganography for audio files.
//!
//! Hides data in the least significant bits of audio samples.
//! Supports WAV files (uncompressed 16-bit PCM).
//!
//! Each message bit goes into one sample, in interleaved sample order across
//! all channels.

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use std::io::{Cursor, Read, Seek};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

use crate::codec::{self, capacity, EmbedReport, Framing, StegoError};

/// Errors that can occur during audio steganography.
#[derive(Error, Debug)]
pub enum AudioStegoError {
    #[error(transparent)]
    Codec(#[from] StegoError),

    #[error("Audio load error: {0}")]
    AudioLoadError(String),

    #[error("Audio save error: {0}")]
    AudioSaveError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl AudioStegoError {
    /// True when extraction ran but found no hidden data.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Codec(e) if e.is_not_found())
    }
}

/// Audio steganography handler.
#[derive(Debug, Clone)]
pub struct AudioStego {
    /// Audio specification (sample rate, channels, etc.)
    spec: WavSpec,
    /// Audio samples (16-bit signed integers)
    samples: Vec<i16>,
}

impl AudioStego {
    /// Creates a new AudioStego from a file path.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, AudioStegoError> {
        let reader = WavReader::open(path)
            .map_err(|e| AudioStegoError::AudioLoadError(e.to_string()))?;

        Self::from_reader(reader)
    }

    /// Creates a new AudioStego from bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, AudioStegoError> {
        let cursor = Cursor::new(bytes);
        let reader = WavReader::new(cursor)
            .map_err(|e| AudioStegoError::AudioLoadError(e.to_string()))?;

        Self::from_reader(reader)
    }

    /// Creates an AudioStego from already decoded samples.
    pub fn from_samples(spec: WavSpec, samples: Vec<i16>) -> Result<Self, AudioStegoError> {
        check_spec(&spec)?;
        Ok(Self { spec, samples })
    }

    /// Creates AudioStego from a WavReader.
    fn from_reader<R: Read + Seek>(reader: WavReader<R>) -> Result<Self, AudioStegoError> {
        let spec = reader.spec();
        check_spec(&spec)?;

        let samples: Vec<i16> = reader
            .into_samples::<i16>()
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| AudioStegoError::AudioLoadError(e.to_string()))?;

        debug!(
            samples = samples.len(),
            channels = spec.channels,
            sample_rate = spec.sample_rate,
            "loaded WAV carrier"
        );
        Ok(Self { spec, samples })
    }

    /// Returns the largest message (in bytes) that fits with `framing`.
    pub fn capacity(&self, framing: Framing) -> usize {
        capacity::max_message_len(self.samples.len(), framing)
    }

    /// Returns the duration in seconds.
    pub fn duration_secs(&self) -> f64 {
        let total_samples = self.samples.len() / self.spec.channels as usize;
        total_samples as f64 / self.spec.sample_rate as f64
    }

    /// Hides data in the audio using LSB steganography.
    ///
    /// # Arguments
    /// * `data` - The data to hide
    /// * `framing` - How the end of the data is marked
    ///
    /// # Returns
    /// A new AudioStego with the data hidden inside, and the embed report.
    pub fn hide(&self, data: &[u8], framing: Framing) -> Result<(Self, EmbedReport), AudioStegoError> {
        let mut new_samples = self.samples.clone();
        let report = codec::embed_with(&mut new_samples[..], data, framing)?;

        Ok((
            Self {
                spec: self.spec,
                samples: new_samples,
            },
            report,
        ))
    }

    /// Extracts hidden data from the audio.
    pub fn extract(&self, framing: Framing) -> Result<Vec<u8>, AudioStegoError> {
        Ok(codec::extract_with(&self.samples[..], framing)?)
    }

    /// Saves the audio to a WAV file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), AudioStegoError> {
        let mut writer = WavWriter::create(path, self.spec)
            .map_err(|e| AudioStegoError::AudioSaveError(e.to_string()))?;

        for sample in &self.samples {
            writer
                .write_sample(*sample)
                .map_err(|e| AudioStegoError::AudioSaveError(e.to_string()))?;
        }

        writer
            .finalize()
            .map_err(|e| AudioStegoError::AudioSaveError(e.to_string()))?;

        Ok(())
    }

    /// Returns the audio as WAV bytes.
    pub fn to_wav_bytes(&self) -> Result<Vec<u8>, AudioStegoError> {
        let mut bytes = Vec::new();
        {
            let cursor = Cursor::new(&mut bytes);
            let mut writer = WavWriter::new(cursor, self.spec)
                .map_err(|e| AudioStegoError::AudioSaveError(e.to_string()))?;

            for sample in &self.samples {
                writer
                    .write_sample(*sample)
                    .map_err(|e| AudioStegoError::AudioSaveError(e.to_string()))?;
            }

            writer
                .finalize()
                .map_err(|e| AudioStegoError::AudioSaveError(e.to_string()))?;
        }
        Ok(bytes)
    }

    /// Returns the audio specification.
    pub fn spec(&self) -> &WavSpec {
        &self.spec
    }

    /// Returns the number of samples (the carrier's capacity in bits).
    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    pub fn samples(&self) -> &[i16] {
        &self.samples
    }
}

/// Only 16-bit integer PCM with at least one channel is supported.
fn check_spec(spec: &WavSpec) -> Result<(), StegoError> {
    if spec.channels == 0 || spec.sample_rate == 0 {
        return Err(StegoError::UnsupportedFormat(format!(
            "WAV needs at least one channel and a non-zero sample rate, got {} channels at {} Hz",
            spec.channels, spec.sample_rate
        )));
    }
    if spec.sample_format != SampleFormat::Int || spec.bits_per_sample != 16 {
        return Err(StegoError::UnsupportedFormat(format!(
            "Only 16-bit PCM WAV is supported, got {} bits {:?}",
            spec.bits_per_sample, spec.sample_format
        )));
    }
    Ok(())
}

/// Creates a simple test WAV audio.
#[cfg(test)]
fn create_test_audio(sample_count: usize) -> AudioStego {
    let spec = WavSpec {
        channels: 1,
        sample_rate: 44100,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    // Generate a simple sine wave
    let samples: Vec<i16> = (0..sample_count)
        .map(|i| {
            let t = i as f64 / 44100.0;
            let freq = 440.0; // A4 note
            (f64::sin(2.0 * std::f64::consts::PI * freq * t) * 16000.0) as i16
        })
        .collect();

    AudioStego { spec, samples }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity() {
        let audio = create_test_audio(10000);
        // 10000 samples / 8 bits per byte - 13 bytes terminator = 1237 bytes
        assert_eq!(audio.capacity(Framing::Terminator), 1237);
        assert_eq!(audio.capacity(Framing::LengthPrefixed), 1246);
    }

    #[test]
    fn test_hide_and_extract_small() {
        let audio = create_test_audio(10000);
        let data = b"Hello, audio steganography!";

        let (hidden, _) = audio.hide(data, Framing::Terminator).unwrap();
        let extracted = hidden.extract(Framing::Terminator).unwrap();

        assert_eq!(extracted, data);
    }

    #[test]
    fn test_hide_leaves_original_intact() {
        let audio = create_test_audio(2000);
        let (hidden, report) = audio.hide(b"copy", Framing::Terminator).unwrap();

        assert_eq!(report.capacity, 2000);
        assert!(matches!(
            audio.extract(Framing::Terminator),
            Err(AudioStegoError::Codec(StegoError::NoMessageFound))
        ));
        assert_eq!(
            &hidden.samples()[report.bits_written..],
            &audio.samples()[report.bits_written..]
        );
    }

    #[test]
    fn test_hide_and_extract_length_prefixed() {
        let audio = create_test_audio(100000);
        let data: Vec<u8> = (0..5000).map(|i| (i % 256) as u8).collect();

        let (hidden, _) = audio.hide(&data, Framing::LengthPrefixed).unwrap();
        let extracted = hidden.extract(Framing::LengthPrefixed).unwrap();

        assert_eq!(extracted, data);
    }

    #[test]
    fn test_audio_too_short() {
        let audio = create_test_audio(100);

        let result = audio.hide(b"HI", Framing::Terminator);
        assert!(matches!(
            result,
            Err(AudioStegoError::Codec(StegoError::CapacityExceeded {
                needed: 120,
                available: 100
            }))
        ));
    }

    #[test]
    fn test_unsupported_format() {
        let spec = WavSpec {
            channels: 2,
            sample_rate: 48000,
            bits_per_sample: 24,
            sample_format: SampleFormat::Int,
        };
        let result = AudioStego::from_samples(spec, vec![0; 16]);
        assert!(matches!(
            result,
            Err(AudioStegoError::Codec(StegoError::UnsupportedFormat(_)))
        ));

        // zero channels or a zero sample rate would break duration_secs
        let no_channels = WavSpec {
            channels: 0,
            bits_per_sample: 16,
            ..spec
        };
        assert!(matches!(
            AudioStego::from_samples(no_channels, vec![0; 16]),
            Err(AudioStegoError::Codec(StegoError::UnsupportedFormat(_)))
        ));

        let no_rate = WavSpec {
            sample_rate: 0,
            bits_per_sample: 16,
            ..spec
        };
        assert!(matches!(
            AudioStego::from_samples(no_rate, vec![0; 16]),
            Err(AudioStegoError::Codec(StegoError::UnsupportedFormat(_)))
        ));
    }

    #[test]
    fn test_wav_roundtrip() {
        let audio = create_test_audio(10000);
        let data = b"Test WAV roundtrip";

        let (hidden, _) = audio.hide(data, Framing::Terminator).unwrap();

        // Convert to WAV bytes and back
        let wav_bytes = hidden.to_wav_bytes().unwrap();
        let loaded = AudioStego::from_bytes(&wav_bytes).unwrap();
        let extracted = loaded.extract(Framing::Terminator).unwrap();

        assert_eq!(extracted, data);
    }

    #[test]
    fn test_duration() {
        let audio = create_test_audio(22050);
        assert!((audio.duration_secs() - 0.5).abs() < 1e-9);
    }
}

//! LSB steganography for video frame sequences.
//!
//! A video is handled as an ordered list of decoded RGB frames. Bits are
//! written frame by frame, then row, column and channel, all ascending.
//!
//! On disk a video is a directory of lossless frames (`frame_000000.png`,
//! `frame_000001.png`, ...) read in file-name order, plus an optional
//! `video.toml` manifest holding the playback frame rate. Muxing the frames
//! into a container is left to external tools; lossy codecs destroy the
//! hidden bits.

use image::{DynamicImage, RgbImage, RgbaImage};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

use crate::codec::{self, capacity, Carrier, EmbedReport, Frame, Framing, StegoError};

/// Output frame rate used when no manifest says otherwise.
pub const DEFAULT_FPS: u32 = 30;

/// Name of the manifest written next to the frames.
pub const MANIFEST_FILE: &str = "video.toml";

/// Errors that can occur during video steganography.
#[derive(Error, Debug)]
pub enum VideoStegoError {
    #[error(transparent)]
    Codec(#[from] StegoError),

    #[error("Frame load error: {0}")]
    FrameLoadError(String),

    #[error("Frame save error: {0}")]
    FrameSaveError(String),

    #[error("Manifest error: {0}")]
    ManifestError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl VideoStegoError {
    /// True when extraction ran but found no hidden data.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Codec(e) if e.is_not_found())
    }
}

/// Metadata stored beside a frame directory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VideoManifest {
    pub fps: u32,
    pub frame_count: usize,
}

/// Video steganography handler.
#[derive(Debug, Clone)]
pub struct VideoStego {
    frames: Vec<Frame>,
    fps: u32,
}

impl VideoStego {
    /// Creates a VideoStego from decoded frames.
    ///
    /// All frames must share width, height and channel count.
    pub fn from_frames(frames: Vec<Frame>, fps: u32) -> Result<Self, VideoStegoError> {
        if let Some(first) = frames.first() {
            let shape = (first.width(), first.height(), first.channels());
            if let Some((index, other)) = frames
                .iter()
                .enumerate()
                .find(|(_, f)| (f.width(), f.height(), f.channels()) != shape)
            {
                return Err(StegoError::UnsupportedFormat(format!(
                    "frame {} is {}x{}x{}, expected {}x{}x{}",
                    index,
                    other.width(),
                    other.height(),
                    other.channels(),
                    shape.0,
                    shape.1,
                    shape.2
                ))
                .into());
            }
        }
        Ok(Self { frames, fps })
    }

    /// Creates a VideoStego from images, converting each to RGB8.
    pub fn from_images(images: Vec<DynamicImage>, fps: u32) -> Result<Self, VideoStegoError> {
        let frames = images
            .into_iter()
            .map(|image| {
                let rgb = match image {
                    DynamicImage::ImageRgb8(buf) => buf,
                    other => {
                        warn!(color = ?other.color(), "converting frame to RGB8");
                        other.to_rgb8()
                    }
                };
                let (width, height) = rgb.dimensions();
                Frame::new(width, height, 3, rgb.into_raw())
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::from_frames(frames, fps)
    }

    /// Loads every PNG/BMP frame in `dir`, sorted by file name.
    ///
    /// The frame rate comes from the directory's manifest, or `default_fps`
    /// when there is none.
    pub fn from_dir<P: AsRef<Path>>(dir: P, default_fps: u32) -> Result<Self, VideoStegoError> {
        let dir = dir.as_ref();
        let paths = frame_paths(dir)?;

        let images = paths
            .iter()
            .map(|path| {
                image::open(path).map_err(|e| {
                    VideoStegoError::FrameLoadError(format!("{}: {}", path.display(), e))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let fps = match read_manifest(dir)? {
            Some(manifest) => {
                if manifest.frame_count != images.len() {
                    warn!(
                        expected = manifest.frame_count,
                        found = images.len(),
                        "manifest frame count does not match frames on disk"
                    );
                }
                manifest.fps
            }
            None => default_fps,
        };

        debug!(frames = images.len(), fps, dir = %dir.display(), "loaded frame directory");
        Self::from_images(images, fps)
    }

    /// Number of addressable elements across all frames.
    pub fn element_count(&self) -> usize {
        self.frames[..].element_count()
    }

    /// Returns the capacity in bytes that can be hidden in this video.
    pub fn capacity(&self, framing: Framing) -> usize {
        capacity::max_message_len(self.element_count(), framing)
    }

    /// Hides data across the frames.
    ///
    /// # Returns
    /// A new VideoStego with the data hidden inside, and the embed report.
    pub fn hide(&self, data: &[u8], framing: Framing) -> Result<(Self, EmbedReport), VideoStegoError> {
        let mut frames = self.frames.clone();
        let report = codec::embed_with(&mut frames[..], data, framing)?;

        Ok((
            Self {
                frames,
                fps: self.fps,
            },
            report,
        ))
    }

    /// Extracts hidden data from the frames.
    pub fn extract(&self, framing: Framing) -> Result<Vec<u8>, VideoStegoError> {
        Ok(codec::extract_with(&self.frames[..], framing)?)
    }

    /// Writes frames as PNG files plus the manifest into `dir`.
    pub fn save_dir<P: AsRef<Path>>(&self, dir: P) -> Result<(), VideoStegoError> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;

        for (index, frame) in self.frames.iter().enumerate() {
            let path = dir.join(frame_file_name(index));
            frame_image(frame)?
                .save_with_format(&path, image::ImageFormat::Png)
                .map_err(|e| VideoStegoError::FrameSaveError(format!("{}: {}", path.display(), e)))?;
        }

        let manifest = VideoManifest {
            fps: self.fps,
            frame_count: self.frames.len(),
        };
        let content = toml::to_string_pretty(&manifest)
            .map_err(|e| VideoStegoError::ManifestError(e.to_string()))?;
        fs::write(dir.join(MANIFEST_FILE), content)?;

        debug!(frames = self.frames.len(), dir = %dir.display(), "saved frame directory");
        Ok(())
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }
}

/// File name for the frame at `index`.
pub fn frame_file_name(index: usize) -> String {
    format!("frame_{:06}.png", index)
}

fn frame_paths(dir: &Path) -> Result<Vec<PathBuf>, VideoStegoError> {
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| matches!(ext.to_lowercase().as_str(), "png" | "bmp"))
                .unwrap_or(false)
        })
        .collect();
    paths.sort();
    Ok(paths)
}

fn read_manifest(dir: &Path) -> Result<Option<VideoManifest>, VideoStegoError> {
    let path = dir.join(MANIFEST_FILE);
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&path)?;
    let manifest =
        toml::from_str(&content).map_err(|e| VideoStegoError::ManifestError(e.to_string()))?;
    Ok(Some(manifest))
}

fn frame_image(frame: &Frame) -> Result<DynamicImage, VideoStegoError> {
    let (width, height) = (frame.width(), frame.height());
    let data = frame.as_bytes().to_vec();
    let image = match frame.channels() {
        3 => RgbImage::from_raw(width, height, data).map(DynamicImage::ImageRgb8),
        4 => RgbaImage::from_raw(width, height, data).map(DynamicImage::ImageRgba8),
        _ => None,
    };
    image.ok_or_else(|| {
        VideoStegoError::FrameSaveError(format!(
            "cannot build {}x{} image from {}-channel frame",
            width,
            height,
            frame.channels()
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};

    fn create_test_video(frames: usize, width: u32, height: u32) -> VideoStego {
        let images = (0..frames)
            .map(|n| {
                DynamicImage::ImageRgb8(ImageBuffer::from_fn(width, height, |x, y| {
                    Rgb([
                        ((x * 13 + n as u32) % 256) as u8,
                        ((y * 7) % 256) as u8,
                        ((x * y + 3) % 256) as u8,
                    ])
                }))
            })
            .collect();
        VideoStego::from_images(images, DEFAULT_FPS).unwrap()
    }

    #[test]
    fn test_capacity_counts_all_channels() {
        let video = create_test_video(4, 16, 8);
        assert_eq!(video.element_count(), 4 * 16 * 8 * 3);
        assert_eq!(video.capacity(Framing::Terminator), 1536 / 8 - 13);
    }

    #[test]
    fn test_hide_spans_frames() {
        // one 4x4 frame is 48 elements, far less than the message
        let video = create_test_video(10, 4, 4);
        let (hidden, report) = video.hide(b"span", Framing::Terminator).unwrap();
        assert_eq!(report.bits_written, 17 * 8);

        assert_ne!(hidden.frames()[2], video.frames()[2]);
        assert_eq!(hidden.frames()[9], video.frames()[9]);
        assert_eq!(hidden.extract(Framing::Terminator).unwrap(), b"span");
    }

    #[test]
    fn test_video_too_small() {
        let video = create_test_video(1, 2, 2);
        assert!(matches!(
            video.hide(b"x", Framing::Terminator),
            Err(VideoStegoError::Codec(StegoError::CapacityExceeded {
                available: 12,
                ..
            }))
        ));
    }

    #[test]
    fn test_mismatched_frames_rejected() {
        let frames = vec![
            Frame::new(2, 2, 3, vec![0; 12]).unwrap(),
            Frame::new(3, 2, 3, vec![0; 18]).unwrap(),
        ];
        assert!(matches!(
            VideoStego::from_frames(frames, DEFAULT_FPS),
            Err(VideoStegoError::Codec(StegoError::UnsupportedFormat(_)))
        ));
    }

    #[test]
    fn test_frame_dir_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let video = create_test_video(3, 20, 10);
        let (hidden, _) = video.hide(b"frames on disk", Framing::Terminator).unwrap();

        hidden.save_dir(dir.path()).unwrap();
        assert!(dir.path().join("frame_000002.png").exists());

        let loaded = VideoStego::from_dir(dir.path(), 12).unwrap();
        assert_eq!(loaded.frame_count(), 3);
        assert_eq!(loaded.fps(), DEFAULT_FPS);
        assert_eq!(loaded.extract(Framing::Terminator).unwrap(), b"frames on disk");
    }

    #[test]
    fn test_manifest_fps_is_read() {
        let dir = tempfile::tempdir().unwrap();
        let video = VideoStego {
            fps: 24,
            ..create_test_video(2, 8, 8)
        };
        video.save_dir(dir.path()).unwrap();

        let loaded = VideoStego::from_dir(dir.path(), 12).unwrap();
        assert_eq!(loaded.fps(), 24);
    }

    #[test]
    fn test_default_fps_without_manifest() {
        let dir = tempfile::tempdir().unwrap();
        create_test_video(2, 8, 8).save_dir(dir.path()).unwrap();
        fs::remove_file(dir.path().join(MANIFEST_FILE)).unwrap();

        let loaded = VideoStego::from_dir(dir.path(), 12).unwrap();
        assert_eq!(loaded.fps(), 12);
        assert_eq!(loaded.frame_count(), 2);
    }

    #[test]
    fn test_stale_manifest_count_still_loads() {
        let dir = tempfile::tempdir().unwrap();
        create_test_video(2, 8, 8).save_dir(dir.path()).unwrap();

        let stale = VideoManifest {
            fps: 25,
            frame_count: 7,
        };
        fs::write(
            dir.path().join(MANIFEST_FILE),
            toml::to_string_pretty(&stale).unwrap(),
        )
        .unwrap();

        let loaded = VideoStego::from_dir(dir.path(), 12).unwrap();
        assert_eq!(loaded.frame_count(), 2);
        assert_eq!(loaded.fps(), 25);
    }

    #[test]
    fn test_frame_file_name() {
        assert_eq!(frame_file_name(0), "frame_000000.png");
        assert_eq!(frame_file_name(1234), "frame_001234.png");
    }
}

//! Video generation request types.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when a duration value is not one of the allowed clips lengths.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid duration {0}s (allowed: 5, 8, 10, 15)")]
pub struct DurationError(pub u32);

/// Target clip duration in seconds.
///
/// Providers only accept a fixed set of clip lengths, so the duration is
/// enumerated rather than free-form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum VideoDuration {
    Secs5,
    Secs8,
    Secs10,
    Secs15,
}

impl VideoDuration {
    /// All durations the pipeline understands.
    pub const ALL: [VideoDuration; 4] = [
        VideoDuration::Secs5,
        VideoDuration::Secs8,
        VideoDuration::Secs10,
        VideoDuration::Secs15,
    ];

    /// Duration in whole seconds.
    pub fn as_secs(self) -> u32 {
        match self {
            VideoDuration::Secs5 => 5,
            VideoDuration::Secs8 => 8,
            VideoDuration::Secs10 => 10,
            VideoDuration::Secs15 => 15,
        }
    }
}

impl TryFrom<u32> for VideoDuration {
    type Error = DurationError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            5 => Ok(VideoDuration::Secs5),
            8 => Ok(VideoDuration::Secs8),
            10 => Ok(VideoDuration::Secs10),
            15 => Ok(VideoDuration::Secs15),
            other => Err(DurationError(other)),
        }
    }
}

impl From<VideoDuration> for u32 {
    fn from(value: VideoDuration) -> Self {
        value.as_secs()
    }
}

impl fmt::Display for VideoDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.as_secs())
    }
}

/// Supported output resolutions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoResolution {
    #[default]
    #[serde(rename = "720p")]
    Hd720p,
    #[serde(rename = "1080p")]
    Fhd1080p,
}

impl fmt::Display for VideoResolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VideoResolution::Hd720p => write!(f, "720p"),
            VideoResolution::Fhd1080p => write!(f, "1080p"),
        }
    }
}

/// Supported aspect ratios.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AspectRatio {
    #[default]
    #[serde(rename = "16:9")]
    Landscape16x9,
    #[serde(rename = "9:16")]
    Portrait9x16,
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AspectRatio::Landscape16x9 => write!(f, "16:9"),
            AspectRatio::Portrait9x16 => write!(f, "9:16"),
        }
    }
}

/// Generation quality tier (speed/cost trade-off).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityTier {
    /// Cheaper and faster model variant
    #[default]
    Fast,
    /// Slower, higher-quality model variant
    Quality,
}

/// Request to generate a video clip from a text prompt.
///
/// Immutable once submitted to a provider; build it up-front with the
/// `with_*` setters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Scene description fed to the text-to-video model
    pub prompt: String,
    /// Target clip duration
    pub duration: VideoDuration,
    /// Output resolution
    #[serde(default)]
    pub resolution: VideoResolution,
    /// Output aspect ratio
    #[serde(default)]
    pub aspect_ratio: AspectRatio,
    /// Quality tier
    #[serde(default)]
    pub quality: QualityTier,
    /// Whether to generate audio alongside the video
    #[serde(default = "default_with_audio")]
    pub with_audio: bool,
}

fn default_with_audio() -> bool {
    true
}

impl GenerationRequest {
    /// Create a request with default resolution, aspect ratio and quality.
    pub fn new(prompt: impl Into<String>, duration: VideoDuration) -> Self {
        Self {
            prompt: prompt.into(),
            duration,
            resolution: VideoResolution::default(),
            aspect_ratio: AspectRatio::default(),
            quality: QualityTier::default(),
            with_audio: true,
        }
    }

    /// Set the output resolution.
    pub fn with_resolution(mut self, resolution: VideoResolution) -> Self {
        self.resolution = resolution;
        self
    }

    /// Set the aspect ratio.
    pub fn with_aspect_ratio(mut self, aspect_ratio: AspectRatio) -> Self {
        self.aspect_ratio = aspect_ratio;
        self
    }

    /// Set the quality tier.
    pub fn with_quality(mut self, quality: QualityTier) -> Self {
        self.quality = quality;
        self
    }

    /// Enable or disable audio generation.
    pub fn with_audio(mut self, with_audio: bool) -> Self {
        self.with_audio = with_audio;
        self
    }
}

//! Export request for the rendering backend.
//!
//! The engine does not render; it hands the backend the ordered edit list
//! (asset, window start, window length) plus output settings. Times are sent
//! as decimal strings with millisecond precision, which is what the backend
//! parses.

use std::fmt;

use scenecut_core::{FrameRate, RationalTime, Result, ScenecutError};
use serde::{Deserialize, Serialize, Serializer};

use crate::state::ClipsState;

// ── Settings ────────────────────────────────────────────────────

/// Output video codec, sent by display name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum VideoCodec {
    #[default]
    Default,
    #[serde(rename = "H.264 (AVC)")]
    H264,
    #[serde(rename = "H.265 (HEVC)")]
    H265,
    #[serde(rename = "VP9")]
    Vp9,
    #[serde(rename = "AV1")]
    Av1,
}

/// Output audio codec, sent by display name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AudioCodec {
    #[default]
    Default,
    #[serde(rename = "AAC")]
    Aac,
    #[serde(rename = "Opus")]
    Opus,
    #[serde(rename = "Vorbis")]
    Vorbis,
    #[serde(rename = "MP3")]
    Mp3,
}

/// Output frame size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    /// Equirectangular 4K, the default for 360° training footage.
    pub const UHD_360: Self = Self {
        width: 3840,
        height: 1920,
    };
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Output settings sent alongside the edit list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportSettings {
    /// Title of the exported video
    pub name: String,
    #[serde(serialize_with = "display_string")]
    pub resolution: Resolution,
    #[serde(serialize_with = "fps_string")]
    pub frame_rate: FrameRate,
    pub video_codec: VideoCodec,
    pub audio_codec: AudioCodec,
    /// Bitrate such as "8M", or "Default"
    pub video_bitrate: String,
    pub audio_bitrate: String,
}

impl ExportSettings {
    /// Default settings under the given title.
    pub fn titled(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            resolution: Resolution::UHD_360,
            frame_rate: FrameRate::FPS_30,
            video_codec: VideoCodec::Default,
            audio_codec: AudioCodec::Default,
            video_bitrate: "Default".into(),
            audio_bitrate: "Default".into(),
        }
    }
}

fn display_string<T: fmt::Display, S: Serializer>(value: &T, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

fn fps_string<S: Serializer>(rate: &FrameRate, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    let fps = rate.to_fps_f64();
    if (fps - fps.round()).abs() < 0.001 {
        serializer.collect_str(&format_args!("{}", fps.round() as u32))
    } else {
        serializer.collect_str(&format_args!("{:.2}", fps))
    }
}

// ── Edit list ───────────────────────────────────────────────────

/// One clip of the edit list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportEdit {
    pub asset_id: String,
    /// Storage path of the source media
    pub path: String,
    #[serde(serialize_with = "millis_string")]
    pub start_time: RationalTime,
    #[serde(serialize_with = "millis_string")]
    pub duration: RationalTime,
}

fn millis_string<S: Serializer>(time: &RationalTime, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_str(&format_args!("{:.3}", time.to_seconds_f64()))
}

/// Ordered edit list of a snapshot.
pub fn edit_list(state: &ClipsState) -> Vec<ExportEdit> {
    state
        .clips()
        .values()
        .map(|clip| ExportEdit {
            asset_id: clip.asset.id.clone(),
            path: clip.asset.path.clone(),
            start_time: clip.start_time,
            duration: clip.duration,
        })
        .collect()
}

/// Request body for the export endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRequest {
    pub edits: Vec<ExportEdit>,
    pub settings: ExportSettings,
}

impl ExportRequest {
    /// Build the request for a snapshot. An empty timeline has nothing to
    /// render and is rejected.
    pub fn new(state: &ClipsState, settings: ExportSettings) -> Result<Self> {
        if state.is_empty() {
            return Err(ScenecutError::InvalidParameter(
                "cannot export an empty timeline".into(),
            ));
        }
        Ok(Self {
            edits: edit_list(state),
            settings,
        })
    }

    /// Total length of the rendered output.
    pub fn duration(&self) -> RationalTime {
        self.edits.iter().map(|edit| edit.duration).sum()
    }

    /// Serialize to JSON bytes.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        serde_json::to_vec_pretty(self)
            .map_err(|e| ScenecutError::Serialization(format!("Failed to serialize export: {}", e)))
    }
}

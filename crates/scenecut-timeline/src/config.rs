//! Editor configuration.
//!
//! Read from JSON with per-field defaults, so a partial file such as
//! `{"undo_states": 20}` is valid.

use scenecut_core::editor_limits::{CLIP_UNDO_STATES, MINIMUM_CLIP_LENGTH};
use scenecut_core::time::seconds;
use scenecut_core::{RationalTime, Result, ScenecutError};
use serde::{Deserialize, Serialize};

/// Limits applied by the reducer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Shortest clip an edit may produce, in seconds (default: 0.1).
    #[serde(with = "seconds")]
    pub minimum_clip_length: RationalTime,
    /// Undo depth (default: 50).
    pub undo_states: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            minimum_clip_length: MINIMUM_CLIP_LENGTH,
            undo_states: CLIP_UNDO_STATES,
        }
    }
}

impl EditorConfig {
    /// Serialize to JSON bytes.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        serde_json::to_vec_pretty(self)
            .map_err(|e| ScenecutError::Serialization(format!("Failed to serialize config: {}", e)))
    }

    /// Deserialize from JSON bytes and validate.
    pub fn from_json(data: &[u8]) -> Result<Self> {
        let config: Self = serde_json::from_slice(data)
            .map_err(|e| ScenecutError::Serialization(format!("Invalid editor config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file path.
    pub fn load_from_file(path: &std::path::Path) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::from_json(&data)
    }

    /// Reject limits the reducer cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.minimum_clip_length <= RationalTime::ZERO {
            return Err(ScenecutError::InvalidParameter(format!(
                "minimum_clip_length must be positive, got {}",
                self.minimum_clip_length
            )));
        }
        Ok(())
    }
}

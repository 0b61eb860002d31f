//! Clip types for the timeline.

use std::sync::Arc;

use scenecut_core::time::seconds;
use scenecut_core::{RationalTime, TimeRange};
use serde::{Deserialize, Serialize};

use crate::error::{EditError, EditResult};

/// A media asset resolved by the asset catalog.
///
/// The engine never changes an asset; clips share it read-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    /// Catalog identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Storage path of the media file
    pub path: String,
    /// Storage path of the thumbnail, if one was generated
    #[serde(default)]
    pub thumbnail_path: Option<String>,
    /// Full length of the media
    #[serde(with = "seconds")]
    pub duration: RationalTime,
}

impl Asset {
    /// Create an asset reference without a thumbnail.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        path: impl Into<String>,
        duration: RationalTime,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            path: path.into(),
            thumbnail_path: None,
            duration,
        }
    }

    /// Attach a thumbnail path.
    pub fn with_thumbnail(mut self, path: impl Into<String>) -> Self {
        self.thumbnail_path = Some(path.into());
        self
    }

    /// URL the asset service serves this asset's thumbnail from.
    pub fn thumbnail_url(&self) -> Option<String> {
        self.thumbnail_path
            .as_ref()
            .map(|_| format!("/api/asset/{}/thumbnail", self.id))
    }
}

/// A trimmed window of an asset placed on the timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clip {
    /// Source media
    pub asset: Arc<Asset>,
    /// Offset into the asset where playback begins
    #[serde(with = "seconds")]
    pub start_time: RationalTime,
    /// Length of the asset window used
    #[serde(with = "seconds")]
    pub duration: RationalTime,
}

impl Clip {
    /// A clip covering the whole asset.
    pub fn new(asset: Arc<Asset>) -> Self {
        let duration = asset.duration;
        Self {
            asset,
            start_time: RationalTime::ZERO,
            duration,
        }
    }

    /// A clip covering `[start_time, start_time + duration)` of the asset.
    pub fn with_window(
        asset: Arc<Asset>,
        start_time: RationalTime,
        duration: RationalTime,
    ) -> EditResult<Self> {
        let clip = Self {
            asset,
            start_time,
            duration,
        };
        clip.validate(RationalTime::ZERO)?;
        Ok(clip)
    }

    /// Check the window against the asset and a minimum length.
    pub fn validate(&self, minimum: RationalTime) -> EditResult<()> {
        if self.start_time.is_negative() {
            return Err(EditError::InvalidClip(format!(
                "start time {} is negative",
                self.start_time
            )));
        }
        if self.duration <= RationalTime::ZERO || self.duration < minimum {
            return Err(EditError::InvalidClip(format!(
                "duration {} is shorter than {}",
                self.duration, minimum
            )));
        }
        if self.end_time() > self.asset.duration {
            return Err(EditError::InvalidClip(format!(
                "window ends at {} but asset '{}' is only {} long",
                self.end_time(),
                self.asset.id,
                self.asset.duration
            )));
        }
        Ok(())
    }

    /// Asset time where the clip stops.
    pub fn end_time(&self) -> RationalTime {
        self.start_time + self.duration
    }

    /// The asset window as a range.
    pub fn source_range(&self) -> TimeRange {
        TimeRange::new(self.start_time, self.duration)
    }

    /// Cut the clip `offset` into its duration.
    ///
    /// The two halves are contiguous in the asset: the first covers
    /// `start..start+offset`, the second `start+offset..end`. Returns `None`
    /// unless `0 < offset < duration`.
    pub fn split_at(&self, offset: RationalTime) -> Option<(Clip, Clip)> {
        if offset <= RationalTime::ZERO || offset >= self.duration {
            return None;
        }
        let first = Self {
            asset: Arc::clone(&self.asset),
            start_time: self.start_time,
            duration: offset,
        };
        let second = Self {
            asset: Arc::clone(&self.asset),
            start_time: self.start_time + offset,
            duration: self.duration - offset,
        };
        Some((first, second))
    }

    /// Join with the clip that follows it, undoing a split. Only clips of
    /// the same asset whose windows touch can be merged.
    pub fn merged_with(&self, next: &Clip) -> Option<Clip> {
        if self.asset.id != next.asset.id || self.end_time() != next.start_time {
            return None;
        }
        Some(Self {
            asset: Arc::clone(&self.asset),
            start_time: self.start_time,
            duration: self.duration + next.duration,
        })
    }

    /// The same asset with a new window.
    pub fn trimmed(&self, start_time: RationalTime, duration: RationalTime) -> EditResult<Clip> {
        Self::with_window(Arc::clone(&self.asset), start_time, duration)
    }

    /// Thumbnail URL of the underlying asset.
    pub fn thumbnail_url(&self) -> Option<String> {
        self.asset.thumbnail_url()
    }
}

//! Edit scripts.
//!
//! A script names its assets once and then lists edit steps. Steps address
//! clips by their current timeline position; each is resolved against the
//! live state into a [`ClipAction`] right before it is dispatched.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use scenecut_core::time::seconds;
use scenecut_core::RationalTime;
use scenecut_timeline::{
    Asset, AudioCodec, Clip, ClipAction, EditorConfig, EditorSession, EditorState, ExportSettings,
    NodeId, NodeIds, VideoCodec,
};
use serde::Deserialize;
use tracing::{info, warn};

/// A replayable edit script.
#[derive(Debug, Clone, Deserialize)]
pub struct EditScript {
    #[serde(default)]
    pub config: EditorConfig,
    #[serde(default)]
    pub export: ExportOptions,
    pub assets: Vec<Asset>,
    pub steps: Vec<Step>,
}

/// Output options for the export request.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    pub title: String,
    pub video_codec: VideoCodec,
    pub audio_codec: AudioCodec,
    pub video_bitrate: Option<String>,
    pub audio_bitrate: Option<String>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            title: "Untitled".into(),
            video_codec: VideoCodec::Default,
            audio_codec: AudioCodec::Default,
            video_bitrate: None,
            audio_bitrate: None,
        }
    }
}

impl ExportOptions {
    pub fn settings(&self) -> ExportSettings {
        let mut settings = ExportSettings::titled(self.title.clone());
        settings.video_codec = self.video_codec;
        settings.audio_codec = self.audio_codec;
        if let Some(rate) = &self.video_bitrate {
            settings.video_bitrate = rate.clone();
        }
        if let Some(rate) = &self.audio_bitrate {
            settings.audio_bitrate = rate.clone();
        }
        settings
    }
}

/// One script step. Clip positions are zero-based.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    /// Append a window of a named asset. Missing bounds cover the rest of
    /// the asset.
    Append {
        asset: String,
        start: Option<f64>,
        duration: Option<f64>,
    },
    Insert {
        index: usize,
        asset: String,
        start: Option<f64>,
        duration: Option<f64>,
    },
    Remove {
        index: usize,
    },
    Move {
        from: usize,
        to: usize,
    },
    Split {
        #[serde(with = "seconds")]
        time: RationalTime,
    },
    Select {
        index: usize,
    },
    ClearSelection,
    /// Delete clips at the given positions, or the selection.
    Delete {
        #[serde(default)]
        indices: Option<Vec<usize>>,
    },
    /// Duplicate clips at the given positions, or the selection.
    Duplicate {
        #[serde(default)]
        indices: Option<Vec<usize>>,
    },
    Trim {
        index: usize,
        #[serde(with = "seconds")]
        start: RationalTime,
        #[serde(with = "seconds")]
        duration: RationalTime,
    },
    Undo,
    Redo,
}

/// Result of replaying a script.
#[derive(Debug)]
pub struct Replay {
    pub session: EditorSession,
    pub applied: usize,
    pub rejected: usize,
}

impl EditScript {
    pub fn from_json(data: &[u8]) -> Result<Self> {
        serde_json::from_slice(data).context("invalid edit script")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        let script = Self::from_json(&data).with_context(|| format!("parsing {}", path.display()))?;
        script.config.validate()?;
        Ok(script)
    }

    /// Run every step through a fresh session.
    ///
    /// Edits the reducer rejects are logged and skipped, like an editor UI
    /// ignoring an impossible action. Steps that cannot be turned into an
    /// action at all abort the replay: unknown asset names, clip windows
    /// outside their asset, and positions past the end of the timeline.
    pub fn replay(&self) -> Result<Replay> {
        let assets: HashMap<&str, Arc<Asset>> = self
            .assets
            .iter()
            .map(|asset| (asset.id.as_str(), Arc::new(asset.clone())))
            .collect();

        let mut session = EditorSession::new(self.config.clone());
        let (mut applied, mut rejected) = (0, 0);

        for (n, step) in self.steps.iter().enumerate() {
            let action = resolve(step, session.state(), &assets).with_context(|| format!("step {n}"))?;
            match session.dispatch(action) {
                Ok(_) => applied += 1,
                Err(err) => {
                    warn!(step = n, error = %err, "step skipped");
                    rejected += 1;
                }
            }
        }

        info!(
            applied,
            rejected,
            clips = session.state().clips().len(),
            duration = %session.state().total_duration(),
            "script replayed"
        );
        Ok(Replay {
            session,
            applied,
            rejected,
        })
    }
}

fn clip_from(
    assets: &HashMap<&str, Arc<Asset>>,
    name: &str,
    start: Option<f64>,
    duration: Option<f64>,
) -> Result<Clip> {
    let asset = assets
        .get(name)
        .ok_or_else(|| anyhow!("unknown asset '{name}'"))?;
    let start = match start {
        Some(secs) => seconds_from(secs)?,
        None => RationalTime::ZERO,
    };
    let duration = match duration {
        Some(secs) => seconds_from(secs)?,
        None => asset.duration - start,
    };
    Ok(Clip::with_window(Arc::clone(asset), start, duration)?)
}

fn seconds_from(secs: f64) -> Result<RationalTime> {
    RationalTime::from_seconds_f64(secs).ok_or_else(|| anyhow!("{secs} seconds is out of range"))
}

/// Node at a position of the current timeline.
fn node_at(state: &EditorState, index: usize) -> Result<NodeId> {
    state.clips().node_at(index).ok_or_else(|| {
        anyhow!(
            "no clip at position {index} (timeline has {})",
            state.clips().len()
        )
    })
}

fn nodes_at(state: &EditorState, indices: Option<&[usize]>) -> Result<Option<NodeIds>> {
    indices
        .map(|indices| indices.iter().map(|&i| node_at(state, i)).collect())
        .transpose()
}

fn resolve(step: &Step, state: &EditorState, assets: &HashMap<&str, Arc<Asset>>) -> Result<ClipAction> {
    Ok(match step {
        Step::Append {
            asset,
            start,
            duration,
        } => ClipAction::AppendClip {
            clip: clip_from(assets, asset, *start, *duration)?,
        },
        Step::Insert {
            index,
            asset,
            start,
            duration,
        } => ClipAction::InsertClip {
            index: *index,
            clip: clip_from(assets, asset, *start, *duration)?,
        },
        Step::Remove { index } => ClipAction::RemoveClip { index: *index },
        Step::Move { from, to } => ClipAction::MoveClip {
            old_index: *from,
            new_index: *to,
        },
        Step::Split { time } => ClipAction::SplitClip { time: *time },
        Step::Select { index } => ClipAction::SelectClip {
            id: node_at(state, *index)?,
        },
        Step::ClearSelection => ClipAction::ClearSelection,
        Step::Delete { indices } => ClipAction::DeleteClips {
            ids: nodes_at(state, indices.as_deref())?,
        },
        Step::Duplicate { indices } => ClipAction::DuplicateClips {
            ids: nodes_at(state, indices.as_deref())?,
        },
        Step::Trim {
            index,
            start,
            duration,
        } => ClipAction::TrimClip {
            id: node_at(state, *index)?,
            start_time: *start,
            duration: *duration,
        },
        Step::Undo => ClipAction::Undo,
        Step::Redo => ClipAction::Redo,
    })
}

//! Scenecut Timeline - Clip timeline engine
//!
//! Implements the editing core of the video editor:
//! - An ordered clip collection with stable node identity
//! - Time-indexed seek, split, delete and duplicate
//! - A pure action reducer with bounded undo/redo
//! - Export request assembly for the rendering backend

pub mod action;
pub mod clip;
pub mod config;
pub mod error;
pub mod export;
pub mod history;
pub mod list;
mod reducer;
pub mod selection;
pub mod session;
pub mod state;

pub use action::{ClipAction, NodeIds};
pub use clip::{Asset, Clip};
pub use config::EditorConfig;
pub use error::{EditError, EditResult, HistoryDirection};
pub use export::{AudioCodec, ExportEdit, ExportRequest, ExportSettings, Resolution, VideoCodec};
pub use history::History;
pub use list::{NodeId, OrderedList};
pub use reducer::reduce;
pub use selection::Selection;
pub use session::EditorSession;
pub use state::{ClipsState, EditorState, SeekHit, VisibleClip};

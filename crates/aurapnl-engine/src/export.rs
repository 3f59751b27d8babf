//! JSON frame export for the renderer.
//!
//! The whole timeline is written as a single document: run metadata up
//! front, then one snapshot per frame in order. Renderers index `frames`
//! directly and clamp past the end themselves.

use std::path::Path;

use aurapnl_core::{Timeline, TimelineSummary};
use aurapnl_types::{Canvas, Snapshot};
use serde::Serialize;
use tracing::info;

use crate::error::EngineError;

/// The exported document.
#[derive(Debug, Serialize)]
pub struct FrameExport<'a> {
    /// Playback rate the frames were simulated for.
    pub fps: u32,
    /// Index of the last frame.
    pub final_frame: u32,
    /// Canvas the positions refer to.
    pub canvas: Canvas,
    /// Headline numbers for the run.
    pub summary: TimelineSummary,
    /// Every snapshot, in frame order.
    pub frames: Vec<&'a Snapshot>,
}

impl<'a> FrameExport<'a> {
    /// Borrow every snapshot of `timeline` into an export document.
    pub fn new(timeline: &'a Timeline, fps: u32) -> Self {
        Self {
            fps,
            final_frame: timeline.final_frame(),
            canvas: timeline.world().canvas,
            summary: timeline.summary(),
            frames: timeline.snapshots().collect(),
        }
    }
}

/// Serialize `timeline` to JSON at `path`. Returns the number of bytes
/// written.
///
/// # Errors
///
/// Returns [`EngineError::Export`] if serialization fails or
/// [`EngineError::Io`] if the file cannot be written.
pub async fn write_frames(path: &Path, timeline: &Timeline, fps: u32) -> Result<usize, EngineError> {
    let bytes = serde_json::to_vec(&FrameExport::new(timeline, fps))?;
    tokio::fs::write(path, &bytes)
        .await
        .map_err(|source| EngineError::Io {
            path: path.display().to_string(),
            source,
        })?;
    info!(
        path = %path.display(),
        frames = timeline.len(),
        bytes = bytes.len(),
        "Frames exported"
    );
    Ok(bytes.len())
}

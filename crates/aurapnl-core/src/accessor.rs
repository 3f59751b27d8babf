//! Random-access lookup into a built timeline.
//!
//! A [`FrameAccessor`] is a cheap, cloneable, read-only handle. Lookups
//! never recompute anything and never fail for non-negative frames: any
//! frame past the end returns the final snapshot (hold-last-frame), which
//! is what export padding relies on.

use std::sync::Arc;

use aurapnl_types::Snapshot;

/// Errors from frame lookups.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccessError {
    /// A negative frame index was requested.
    #[error("frame index {requested} is negative")]
    NegativeFrame {
        /// The offending index.
        requested: i64,
    },
}

/// Read-only view over every snapshot of a timeline.
///
/// The final snapshot is stored apart from the leading ones so the
/// hold-last-frame fallback is always available without a runtime check.
#[derive(Debug, Clone)]
pub struct FrameAccessor {
    /// Snapshots for frames `0..final_frame`.
    leading: Arc<[Snapshot]>,
    /// The snapshot for `final_frame`.
    last: Arc<Snapshot>,
}

impl FrameAccessor {
    pub(crate) const fn new(leading: Arc<[Snapshot]>, last: Arc<Snapshot>) -> Self {
        Self { leading, last }
    }

    /// The snapshot for `frame`, or the final snapshot when `frame` is past
    /// the end.
    pub fn get(&self, frame: u32) -> &Snapshot {
        usize::try_from(frame)
            .ok()
            .and_then(|index| self.leading.get(index))
            .unwrap_or(&*self.last)
    }

    /// Like [`FrameAccessor::get`], for callers holding signed indices.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::NegativeFrame`] if `frame < 0`.
    pub fn try_get(&self, frame: i64) -> Result<&Snapshot, AccessError> {
        if frame < 0 {
            return Err(AccessError::NegativeFrame { requested: frame });
        }
        Ok(u32::try_from(frame).map_or(&*self.last, |index| self.get(index)))
    }

    /// The final snapshot.
    pub fn last(&self) -> &Snapshot {
        &self.last
    }

    /// Index of the final simulated frame.
    pub fn final_frame(&self) -> u32 {
        self.last.frame
    }

    /// Number of snapshots (`final_frame + 1`).
    pub fn len(&self) -> usize {
        self.leading.len().saturating_add(1)
    }

    /// Always `false`: a timeline holds at least one snapshot.
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// All snapshots in frame order.
    pub fn snapshots(&self) -> impl Iterator<Item = &Snapshot> + '_ {
        self.leading.iter().chain(std::iter::once(&*self.last))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::arithmetic_side_effects)]
mod tests {
    use super::*;

    fn snapshot(frame: u32) -> Snapshot {
        Snapshot {
            frame,
            agents: Vec::new(),
            tokens: Vec::new(),
            rewards: Vec::new(),
        }
    }

    fn accessor(final_frame: u32) -> FrameAccessor {
        let leading: Vec<Snapshot> = (0..final_frame).map(snapshot).collect();
        FrameAccessor::new(leading.into(), Arc::new(snapshot(final_frame)))
    }

    #[test]
    fn get_returns_exact_frame_in_range() {
        let frames = accessor(5);
        for i in 0..=5 {
            assert_eq!(frames.get(i).frame, i);
        }
    }

    #[test]
    fn get_holds_last_frame_past_the_end() {
        let frames = accessor(5);
        assert_eq!(frames.get(6), frames.get(5));
        assert_eq!(frames.get(55), frames.last());
        assert_eq!(frames.get(u32::MAX).frame, 5);
    }

    #[test]
    fn try_get_rejects_negative_frames() {
        let frames = accessor(3);
        assert_eq!(
            frames.try_get(-1),
            Err(AccessError::NegativeFrame { requested: -1 })
        );
        assert_eq!(frames.try_get(2).unwrap().frame, 2);
        assert_eq!(frames.try_get(i64::MAX).unwrap().frame, 3);
    }

    #[test]
    fn len_and_iteration_cover_every_frame() {
        let frames = accessor(4);
        assert_eq!(frames.len(), 5);
        assert!(!frames.is_empty());
        let order: Vec<u32> = frames.snapshots().map(|s| s.frame).collect();
        assert_eq!(order, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn clones_share_storage() {
        let frames = accessor(2);
        let copy = frames.clone();
        assert!(std::ptr::eq(frames.last(), copy.last()));
    }

    #[test]
    fn accessor_is_shareable_across_threads() {
        let frames = accessor(10);
        let handles: Vec<_> = (0..4)
            .map(|offset| {
                let frames = frames.clone();
                std::thread::spawn(move || {
                    (0..20).rev().map(|i| frames.get(i + offset).frame).sum::<u32>()
                })
            })
            .collect();
        let totals: Vec<u32> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        // Frames above 10 clamp to 10.
        assert_eq!(totals[0], (0..=10).sum::<u32>() + 9 * 10);
    }
}

use std::collections::VecDeque;

use crate::types::{NodeRecord, RangeRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(u64);

/// Source of per-frame callbacks (an animation-frame queue in a UI host).
pub trait FrameScheduler {
    fn request_frame(&mut self) -> FrameHandle;
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// Frame queue driven explicitly by the host loop.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next_id: u64,
    pending: VecDeque<FrameHandle>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Pop the oldest requested frame, if any.
    pub fn next_frame(&mut self) -> Option<FrameHandle> {
        self.pending.pop_front()
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        let handle = FrameHandle(self.next_id);
        self.next_id += 1;
        self.pending.push_back(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.pending.retain(|&h| h != handle);
    }
}

/// First node whose `[start - leeway, end]` window contains `time`.
pub fn active_node_at(nodes: &[NodeRecord], time: f64, leeway: f64) -> Option<&NodeRecord> {
    nodes.iter().find(|n| n.is_active_at(time, leeway))
}

/// Word-level variant of [`active_node_at`].
pub fn active_range_at(
    nodes: &[NodeRecord],
    time: f64,
    leeway: f64,
) -> Option<(&NodeRecord, &RangeRecord)> {
    nodes.iter().find_map(|node| {
        node.ranges
            .iter()
            .find(|r| match (r.start, r.end) {
                (Some(start), Some(end)) => time >= start - leeway && time <= end,
                _ => false,
            })
            .map(|r| (node, r))
    })
}

#[derive(Debug, Clone, PartialEq)]
pub enum FrameOutcome {
    /// Polled while playing; the active node did not change.
    Unchanged,
    /// Polled while playing; the active node is now this one (or none).
    Changed(Option<String>),
    /// Playback was not running, so polling ended.
    Stopped,
    /// The handle was cancelled or belongs to someone else.
    Stale,
}

/// Frame-paced poll of the playback clock against aligned nodes.
///
/// Keeps at most one outstanding frame request. Media elements give no
/// word-level timing events, so the active node is recomputed every frame.
#[derive(Debug, Clone)]
pub struct PositionTracker {
    leeway: f64,
    pending: Option<FrameHandle>,
    active: Option<String>,
}

impl PositionTracker {
    pub fn new(leeway: f64) -> Self {
        Self {
            leeway,
            pending: None,
            active: None,
        }
    }

    pub fn leeway(&self) -> f64 {
        self.leeway
    }

    pub fn is_running(&self) -> bool {
        self.pending.is_some()
    }

    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn start(&mut self, scheduler: &mut dyn FrameScheduler) {
        if self.pending.is_none() {
            self.pending = Some(scheduler.request_frame());
        }
    }

    pub fn stop(&mut self, scheduler: &mut dyn FrameScheduler) {
        if let Some(handle) = self.pending.take() {
            scheduler.cancel_frame(handle);
        }
    }

    pub fn clear_active(&mut self) {
        self.active = None;
    }

    pub fn on_frame(
        &mut self,
        handle: FrameHandle,
        nodes: &[NodeRecord],
        current_time: f64,
        playing: bool,
        scheduler: &mut dyn FrameScheduler,
    ) -> FrameOutcome {
        if self.pending != Some(handle) {
            return FrameOutcome::Stale;
        }
        self.pending = None;
        if !playing {
            return FrameOutcome::Stopped;
        }

        let next = active_node_at(nodes, current_time, self.leeway).map(|n| n.id.clone());
        self.pending = Some(scheduler.request_frame());
        if next == self.active {
            return FrameOutcome::Unchanged;
        }
        self.active = next.clone();
        FrameOutcome::Changed(next)
    }
}

//! clock - Frame clock with start/stop and update stride
//!
//! The clock does not own a scheduler. Whoever drives the field (display
//! sync, a timer, a test loop) calls `advance` once per frame with a
//! monotonic timestamp; the clock answers whether this frame should step.

use log::info;

/// What a single frame should do.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Frame {
    /// Clock is stopped; do nothing and request no further frames.
    Stopped,
    /// Running, but throttled by the update stride.
    Skipped,
    /// Update and draw.
    Step,
}

#[derive(Debug, Clone)]
pub struct FrameClock {
    requested: bool,
    visible: bool,
    frozen: bool,
    running: bool,
    ticks: u64,
    steps: u64,
    now_ms: u64,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            requested: false,
            visible: true,
            frozen: false,
            running: false,
            ticks: 0,
            steps: 0,
            now_ms: 0,
        }
    }

    /// Ask the clock to run. It only actually runs while the document is
    /// visible and motion is not frozen.
    pub fn start(&mut self) {
        self.requested = true;
        self.sync();
    }

    pub fn stop(&mut self) {
        self.requested = false;
        self.sync();
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
        self.sync();
    }

    pub fn set_frozen(&mut self, frozen: bool) {
        self.frozen = frozen;
        self.sync();
    }

    fn sync(&mut self) {
        let running = self.requested && self.visible && !self.frozen;
        if running != self.running {
            self.running = running;
            info!(
                "frame clock {} (visible={}, frozen={})",
                if running { "started" } else { "stopped" },
                self.visible,
                self.frozen
            );
        }
    }

    /// Account for one display frame at `now_ms`.
    pub fn advance(&mut self, now_ms: u64, stride: u32) -> Frame {
        self.now_ms = self.now_ms.max(now_ms);
        if !self.running {
            return Frame::Stopped;
        }
        let tick = self.ticks;
        self.ticks += 1;
        if tick % u64::from(stride.max(1)) != 0 {
            return Frame::Skipped;
        }
        self.steps += 1;
        Frame::Step
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Latest timestamp seen, in milliseconds.
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }
}

//! Per-job progress reporting and cancellation.
//!
//! Each extraction request carries its own [`JobContext`] through the call
//! chain, so concurrent jobs cannot trample each other's progress counters
//! or cancellation flags. Progress is advisory: the engine reports a
//! best-effort fraction in `[0.0, 1.0]` per phase and callers must not
//! assume monotonicity across phases.

use std::sync::atomic::{AtomicBool, Ordering};

pub trait ProgressSink: Send + Sync {
    fn on_progress(&self, phase: &str, percent: f32);
}

/// A sink that discards all progress updates.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn on_progress(&self, _phase: &str, _percent: f32) {}
}

/// Cooperative cancellation flag, checked by the engine between samples.
#[derive(Debug, Default)]
pub struct CancelToken {
    cancelled: AtomicBool,
}

impl CancelToken {
    pub const fn new() -> CancelToken {
        CancelToken {
            cancelled: AtomicBool::new(false),
        }
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// Everything one running job needs to signal outward.
#[derive(Clone, Copy)]
pub struct JobContext<'a> {
    pub progress: &'a dyn ProgressSink,
    pub cancel: &'a CancelToken,
}

impl<'a> JobContext<'a> {
    pub fn new(progress: &'a dyn ProgressSink, cancel: &'a CancelToken) -> JobContext<'a> {
        JobContext { progress, cancel }
    }

    /// A context that never reports and never cancels, for synchronous
    /// one-shot callers.
    pub fn detached() -> JobContext<'static> {
        static NO_PROGRESS: NoProgress = NoProgress;
        static NEVER_CANCELLED: CancelToken = CancelToken::new();
        JobContext {
            progress: &NO_PROGRESS,
            cancel: &NEVER_CANCELLED,
        }
    }
}

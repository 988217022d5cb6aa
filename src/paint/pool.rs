use std::time::{Duration, Instant};

use crate::foundation::error::ShotframeResult;
use crate::paint::canvas::Canvas;

/// Pool configuration for off-screen canvases.
#[derive(Debug, Clone, Copy)]
pub struct CanvasPoolOpts {
    /// Maximum number of idle canvases retained.
    pub max_idle: usize,
    /// Idle canvases older than this are dropped on the next acquire or [`CanvasPool::evict_idle`].
    pub idle_timeout: Duration,
}

impl Default for CanvasPoolOpts {
    fn default() -> Self {
        Self {
            max_idle: 5,
            idle_timeout: Duration::from_secs(30),
        }
    }
}

/// Counters describing pool activity.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CanvasPoolStats {
    /// Canvases currently idle in the pool.
    pub idle: usize,
    /// Canvases created because the pool was empty.
    pub allocated: u64,
    /// Acquisitions served from the pool.
    pub reused: u64,
    /// Releases dropped because the pool was full.
    pub dropped_on_release: u64,
    /// Idle canvases dropped by eviction.
    pub evicted: u64,
}

struct Idle {
    canvas: Canvas,
    since: Instant,
}

/// Bounded pool of reusable off-screen canvases.
///
/// An explicit object owned by the caller. Released canvases are reset to 0×0 with a fresh
/// drawing state before they are stored, so an acquired canvas never carries stale dimensions.
pub struct CanvasPool {
    opts: CanvasPoolOpts,
    stats: CanvasPoolStats,
    idle: Vec<Idle>,
}

impl Default for CanvasPool {
    fn default() -> Self {
        Self::new(CanvasPoolOpts::default())
    }
}

impl std::fmt::Debug for CanvasPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CanvasPool")
            .field("opts", &self.opts)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

impl CanvasPool {
    /// Create an empty pool.
    pub fn new(opts: CanvasPoolOpts) -> Self {
        Self {
            opts,
            stats: CanvasPoolStats::default(),
            idle: Vec::new(),
        }
    }

    /// Snapshot of the pool counters.
    pub fn stats(&self) -> CanvasPoolStats {
        CanvasPoolStats {
            idle: self.idle.len(),
            ..self.stats.clone()
        }
    }

    /// Take a canvas sized to `width`×`height`, cleared and with a fresh drawing state.
    ///
    /// Expired idle canvases are evicted first, so a pool that is only ever acquired from and
    /// released to still honours `idle_timeout`.
    pub fn acquire(&mut self, width: u32, height: u32) -> ShotframeResult<Canvas> {
        self.acquire_at(width, height, Instant::now())
    }

    pub(crate) fn acquire_at(
        &mut self,
        width: u32,
        height: u32,
        now: Instant,
    ) -> ShotframeResult<Canvas> {
        self.evict_idle(now);
        let mut canvas = match self.idle.pop() {
            Some(entry) => {
                self.stats.reused = self.stats.reused.saturating_add(1);
                entry.canvas
            }
            None => {
                self.stats.allocated = self.stats.allocated.saturating_add(1);
                Canvas::new(0, 0)?
            }
        };
        canvas.resize(width, height)?;
        Ok(canvas)
    }

    /// Return a canvas to the pool.
    pub fn release(&mut self, canvas: Canvas) {
        self.release_at(canvas, Instant::now());
    }

    pub(crate) fn release_at(&mut self, mut canvas: Canvas, now: Instant) {
        if self.idle.len() >= self.opts.max_idle {
            self.stats.dropped_on_release = self.stats.dropped_on_release.saturating_add(1);
            return;
        }
        if canvas.resize(0, 0).is_err() {
            self.stats.dropped_on_release = self.stats.dropped_on_release.saturating_add(1);
            return;
        }
        self.idle.push(Idle { canvas, since: now });
    }

    /// Drop idle canvases released more than `idle_timeout` before `now`. Returns how many were
    /// dropped.
    pub fn evict_idle(&mut self, now: Instant) -> usize {
        let timeout = self.opts.idle_timeout;
        let before = self.idle.len();
        self.idle
            .retain(|entry| now.saturating_duration_since(entry.since) < timeout);
        let evicted = before - self.idle.len();
        if evicted > 0 {
            tracing::debug!(evicted, "evicted idle canvases");
        }
        self.stats.evicted = self.stats.evicted.saturating_add(evicted as u64);
        evicted
    }
}

#[cfg(test)]
#[path = "../../tests/unit/paint/pool.rs"]
mod tests;

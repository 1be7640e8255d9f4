//! Loop-wrapping carousel positioner.
//!
//! Drives a continuously scrolling strip of items (categories, featured
//! products, posts) that appears infinite: the source list is laid out
//! three times in a row and the pixel offset is normalized back into the
//! middle copy whenever it crosses a copy boundary, so the wrap is never
//! visible. The owner drives [`tick`](CarouselPositioner::tick) on a fixed
//! interval and forwards pointer events; dropping the positioner is the
//! whole teardown.

use std::time::{Duration, Instant};

/// Motion defaults. Tuning happens here so every carousel updates
/// consistently.
pub mod motion {
    /// Tick cadence the owner is expected to drive, in milliseconds.
    pub const TICK_INTERVAL_MS: u64 = 20;
    /// Pixels travelled per tick while auto-scrolling.
    pub const SPEED_PX_PER_TICK: f64 = 1.0;
    /// Pause after a drag ends before auto-scroll resumes, in milliseconds.
    pub const DRAG_COOLDOWN_MS: u64 = 2000;
    /// Copies of the source list laid out side by side. Three guarantees a
    /// full neighbour copy on each side of the viewport at all offsets.
    pub const COPIES: usize = 3;
}

/// Positioning state for one carousel.
#[derive(Debug, Clone)]
pub struct CarouselPositioner {
    item_count: usize,
    /// Pixel width of one full unduplicated set.
    set_width: f64,
    /// Horizontal translation applied to the strip. Always normalized back
    /// into `(-2*set_width, -set_width]` — the middle copy.
    offset: f64,
    speed: f64,
    paused: bool,
    dragging: bool,
    drag_start_x: f64,
    drag_prev_offset: f64,
    resume_at: Option<Instant>,
    cooldown: Duration,
}

impl CarouselPositioner {
    /// Start a carousel over `item_count` items, each `item_width` pixels
    /// wide with `gap` pixels between items. The viewport parks at the
    /// start of the second copy so both neighbours exist.
    pub fn start(item_count: usize, item_width: f64, gap: f64) -> Self {
        let set_width = (item_width + gap) * item_count as f64;
        Self {
            item_count,
            set_width,
            offset: -set_width,
            speed: motion::SPEED_PX_PER_TICK,
            paused: false,
            dragging: false,
            drag_start_x: 0.0,
            drag_prev_offset: 0.0,
            resume_at: None,
            cooldown: Duration::from_millis(motion::DRAG_COOLDOWN_MS),
        }
    }

    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = speed;
        self
    }

    pub fn with_cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown = cooldown;
        self
    }

    /// Advance one frame. No-op while paused or dragging.
    pub fn tick(&mut self, now: Instant) {
        if let Some(resume_at) = self.resume_at {
            if now >= resume_at {
                self.paused = false;
                self.resume_at = None;
            }
        }
        if self.paused || self.dragging || self.set_width <= 0.0 {
            return;
        }
        self.offset -= self.speed;
        self.normalize();
    }

    pub fn drag_start(&mut self, x: f64) {
        self.paused = true;
        self.resume_at = None;
        self.dragging = true;
        self.drag_start_x = x;
        self.drag_prev_offset = self.offset;
    }

    pub fn drag_move(&mut self, x: f64) {
        if !self.dragging {
            return;
        }
        self.offset = self.drag_prev_offset + (x - self.drag_start_x);
    }

    /// End the drag; auto-scroll resumes after the cool-down. A drag that
    /// overshot past a full copy boundary on either side snaps back to the
    /// parking offset — anything shorter re-normalizes seamlessly.
    pub fn drag_end(&mut self, now: Instant) {
        if !self.dragging {
            return;
        }
        self.dragging = false;
        self.resume_at = Some(now + self.cooldown);

        if self.offset > 0.0 || self.offset < -3.0 * self.set_width {
            self.offset = -self.set_width;
        } else {
            self.normalize();
        }
    }

    /// Wrap the offset back into the middle copy. The strip repeats with
    /// period `set_width`, so shifting by whole set widths is invisible.
    fn normalize(&mut self) {
        if self.set_width <= 0.0 {
            return;
        }
        while self.offset.abs() >= 2.0 * self.set_width {
            self.offset += self.set_width;
        }
        while self.offset > -self.set_width {
            self.offset -= self.set_width;
        }
    }

    /// Current horizontal translation to apply to the strip.
    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn set_width(&self) -> f64 {
        self.set_width
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Number of rendered slots (source list duplicated).
    pub fn display_len(&self) -> usize {
        self.item_count * motion::COPIES
    }

    /// Source item index for a rendered slot.
    pub fn display_index(&self, slot: usize) -> usize {
        if self.item_count == 0 {
            return 0;
        }
        slot % self.item_count
    }
}

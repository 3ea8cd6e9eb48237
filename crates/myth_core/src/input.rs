//! Per-tick input snapshot.
//!
//! The platform layer feeds raw events in; systems only read. Call
//! [`InputState::begin_frame`] once per tick after the systems ran so that
//! edge presses and deltas do not leak into the next tick.

/// Logical simulation key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Move away from the camera.
    Forward,
    /// Move toward the camera.
    Back,
    /// Strafe left.
    Left,
    /// Strafe right.
    Right,
    /// Double move speed while held.
    Sprint,
    /// Jump (edge triggered).
    Jump,
}

impl Key {
    #[inline]
    const fn mask(self) -> u8 {
        1 << self as u8
    }
}

/// Input state for the current tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputState {
    /// Keys currently held.
    keys_down: u8,
    /// Keys that went down this tick.
    keys_pressed: u8,
    /// Accumulated mouse motion (x, y) this tick.
    mouse_delta: (f32, f32),
    /// Accumulated vertical scroll this tick.
    scroll_delta: f32,
    /// Mouse drives the camera only while captured.
    mouse_captured: bool,
}

impl InputState {
    /// Creates a new empty input state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears per-tick state (edges and deltas). Held keys persist.
    pub fn begin_frame(&mut self) {
        self.keys_pressed = 0;
        self.mouse_delta = (0.0, 0.0);
        self.scroll_delta = 0.0;
    }

    /// Records a key press. Repeats while held do not re-trigger the edge.
    pub fn key_down(&mut self, key: Key) {
        if self.keys_down & key.mask() == 0 {
            self.keys_pressed |= key.mask();
        }
        self.keys_down |= key.mask();
    }

    /// Records a key release.
    pub fn key_up(&mut self, key: Key) {
        self.keys_down &= !key.mask();
    }

    /// Records mouse motion.
    pub fn mouse_motion(&mut self, dx: f32, dy: f32) {
        self.mouse_delta.0 += dx;
        self.mouse_delta.1 += dy;
    }

    /// Records scroll input.
    pub fn scroll(&mut self, dy: f32) {
        self.scroll_delta += dy;
    }

    /// Captures or releases the mouse.
    pub fn set_mouse_captured(&mut self, captured: bool) {
        self.mouse_captured = captured;
    }

    /// Returns true while `key` is held.
    #[inline]
    #[must_use]
    pub const fn is_held(&self, key: Key) -> bool {
        self.keys_down & key.mask() != 0
    }

    /// Returns true if `key` went down this tick.
    #[inline]
    #[must_use]
    pub const fn was_pressed(&self, key: Key) -> bool {
        self.keys_pressed & key.mask() != 0
    }

    /// Mouse motion accumulated this tick.
    #[inline]
    #[must_use]
    pub const fn mouse_delta(&self) -> (f32, f32) {
        self.mouse_delta
    }

    /// Scroll accumulated this tick.
    #[inline]
    #[must_use]
    pub const fn scroll_delta(&self) -> f32 {
        self.scroll_delta
    }

    /// Whether the mouse is captured.
    #[inline]
    #[must_use]
    pub const fn mouse_captured(&self) -> bool {
        self.mouse_captured
    }

    /// Snapshot with `keys` held (and freshly pressed).
    #[must_use]
    pub fn holding(keys: &[Key]) -> Self {
        let mut input = Self::new();
        for &key in keys {
            input.key_down(key);
        }
        input
    }
}

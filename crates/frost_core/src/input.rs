//! Input state tracking with both edge-triggered and level-triggered queries.
//!
//! - **Level-triggered (held):** `is_held(key)` returns true every frame the key
//!   is physically down. Used for continuous actions like walking and turning.
//!
//! - **Edge-triggered (just_pressed / just_released):** These are true only during
//!   the frame the transition happened. They are cleared by `end_frame()`, which
//!   the main loop calls only after at least one fixed simulation step has consumed
//!   them. This prevents a press from being silently lost on a frame that has zero
//!   simulation steps (when the accumulator hasn't built up enough time).
//!
//! Mouse motion and wheel input accumulate into per-frame deltas
//! (`take_drag_delta` / `take_scroll_delta`) so the orbit camera consumes each
//! pixel of drag exactly once regardless of how many `CursorMoved` events a
//! frame delivered.

use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    Escape,
    Space,
    F3,
    W,
    A,
    S,
    D,
    Z,
    X,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseBtn {
    Left,
    Right,
    Middle,
}

pub struct InputState {
    held: HashSet<Key>,
    just_pressed: HashSet<Key>,
    just_released: HashSet<Key>,

    mouse_held: HashSet<MouseBtn>,
    mouse_just_pressed: HashSet<MouseBtn>,
    mouse_just_released: HashSet<MouseBtn>,

    pub mouse_position: (f64, f64),
    drag_delta: (f64, f64),
    scroll_delta: f32,
}

impl InputState {
    pub fn new() -> Self {
        Self {
            held: HashSet::new(),
            just_pressed: HashSet::new(),
            just_released: HashSet::new(),
            mouse_held: HashSet::new(),
            mouse_just_pressed: HashSet::new(),
            mouse_just_released: HashSet::new(),
            mouse_position: (0.0, 0.0),
            drag_delta: (0.0, 0.0),
            scroll_delta: 0.0,
        }
    }

    pub fn key_down(&mut self, key: Key) {
        if self.held.insert(key) {
            self.just_pressed.insert(key);
        }
    }

    pub fn key_up(&mut self, key: Key) {
        if self.held.remove(&key) {
            self.just_released.insert(key);
        }
    }

    pub fn mouse_down(&mut self, btn: MouseBtn) {
        if self.mouse_held.insert(btn) {
            self.mouse_just_pressed.insert(btn);
        }
    }

    pub fn mouse_up(&mut self, btn: MouseBtn) {
        if self.mouse_held.remove(&btn) {
            self.mouse_just_released.insert(btn);
        }
    }

    /// Record a cursor move. Motion widens the pending drag delta only while
    /// the left button is held; position is tracked unconditionally.
    pub fn cursor_moved(&mut self, x: f64, y: f64) {
        if self.is_mouse_held(MouseBtn::Left) {
            self.drag_delta.0 += x - self.mouse_position.0;
            self.drag_delta.1 += y - self.mouse_position.1;
        }
        self.mouse_position = (x, y);
    }

    pub fn scrolled(&mut self, amount: f32) {
        self.scroll_delta += amount;
    }

    /// Consume the drag accumulated since the last call.
    pub fn take_drag_delta(&mut self) -> (f64, f64) {
        std::mem::take(&mut self.drag_delta)
    }

    /// Consume the wheel scroll accumulated since the last call.
    pub fn take_scroll_delta(&mut self) -> f32 {
        std::mem::take(&mut self.scroll_delta)
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    pub fn is_just_pressed(&self, key: Key) -> bool {
        self.just_pressed.contains(&key)
    }

    pub fn is_just_released(&self, key: Key) -> bool {
        self.just_released.contains(&key)
    }

    pub fn is_mouse_held(&self, btn: MouseBtn) -> bool {
        self.mouse_held.contains(&btn)
    }

    pub fn is_mouse_just_pressed(&self, btn: MouseBtn) -> bool {
        self.mouse_just_pressed.contains(&btn)
    }

    pub fn is_mouse_just_released(&self, btn: MouseBtn) -> bool {
        self.mouse_just_released.contains(&btn)
    }

    pub fn end_frame(&mut self) {
        self.just_pressed.clear();
        self.just_released.clear();
        self.mouse_just_pressed.clear();
        self.mouse_just_released.clear();
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

use glam::Vec2;
use sketchbook_input::{Action, ActionState, KeyBindings};
use sketchbook_render::Sketch;
use std::collections::BTreeSet;
use winit::event::MouseScrollDelta;
use winit::keyboard::KeyCode;

/// Pixels of trackpad scroll that count as one wheel notch.
const PIXELS_PER_NOTCH: f32 = 50.0;

/// Frame time beyond this is dropped so a stall does not replay as a burst.
const MAX_FRAME_SECONDS: f64 = 0.1;

/// Fixed-rate tick scheduler fed with wall-clock frame times.
#[derive(Debug, Clone)]
pub struct FixedStep {
    interval: f64,
    accumulator: f64,
}

impl FixedStep {
    pub fn new(interval: f64) -> Self {
        Self {
            interval,
            accumulator: 0.0,
        }
    }

    pub fn interval(&self) -> f64 {
        self.interval
    }

    /// Add `elapsed` seconds and return how many ticks are due.
    pub fn advance(&mut self, elapsed: f64) -> u32 {
        self.accumulator += elapsed.clamp(0.0, MAX_FRAME_SECONDS);
        let mut ticks = 0;
        while self.accumulator >= self.interval {
            self.accumulator -= self.interval;
            ticks += 1;
        }
        ticks
    }
}

/// Name a physical key the way bindings spell it, e.g. `KeyW` or `ArrowUp`.
pub fn key_name(key: KeyCode) -> String {
    format!("{key:?}")
}

/// Scroll wheel or trackpad motion as zoom steps; positive zooms in.
pub fn scroll_steps(delta: MouseScrollDelta) -> f32 {
    match delta {
        MouseScrollDelta::LineDelta(_, y) => y,
        MouseScrollDelta::PixelDelta(p) => p.y as f32 / PIXELS_PER_NOTCH,
    }
}

/// Keyboard and pointer state routed into the active sketch.
#[derive(Debug, Default)]
pub struct Controls {
    pub bindings: KeyBindings,
    pub held: ActionState,
    /// Bound keys currently down, so an action shared by several keys
    /// stays held until the last of them is released.
    keys_down: BTreeSet<String>,
    dragging: bool,
    cursor: Option<Vec2>,
}

impl Controls {
    pub fn new(bindings: KeyBindings) -> Self {
        Self {
            bindings,
            ..Self::default()
        }
    }

    /// Apply a key transition. Returns the bound action, if any.
    ///
    /// A fresh press is also delivered to the sketch as a one-shot action;
    /// auto-repeat presses are ignored.
    pub fn key(&mut self, key: KeyCode, pressed: bool, sketch: &mut dyn Sketch) -> Option<Action> {
        let name = key_name(key);
        let action = self.bindings.action_for(&name)?;
        if pressed {
            self.keys_down.insert(name);
            if self.held.press(action) {
                sketch.on_action(action);
            }
        } else {
            self.keys_down.remove(&name);
            let still_down = self
                .bindings
                .keys_for(action)
                .into_iter()
                .any(|k| self.keys_down.contains(k));
            if !still_down {
                self.held.release(action);
            }
        }
        Some(action)
    }

    pub fn set_dragging(&mut self, dragging: bool) {
        self.dragging = dragging;
    }

    /// Track the cursor; while dragging, movement orbits the camera.
    pub fn cursor_moved(&mut self, position: Vec2, sketch: &mut dyn Sketch) {
        if let (true, Some(last)) = (self.dragging, self.cursor) {
            let delta = position - last;
            if delta != Vec2::ZERO {
                sketch.on_action(Action::Orbit(delta));
            }
        }
        self.cursor = Some(position);
    }

    pub fn scroll(&mut self, delta: MouseScrollDelta, sketch: &mut dyn Sketch) {
        let steps = scroll_steps(delta);
        if steps != 0.0 {
            sketch.on_action(Action::Zoom(steps));
        }
    }

    /// Drop held keys, e.g. when the window loses focus.
    pub fn release_all(&mut self) {
        self.held.clear();
        self.keys_down.clear();
        self.dragging = false;
    }
}

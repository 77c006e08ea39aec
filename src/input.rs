//! Viewer input.
//!
//! Collects winit window events into per-frame [`Action`]s and camera deltas,
//! and stands in for the gesture tracker: the cursor height is read as hand
//! openness (top of the window fully open, bottom a closed fist) and the
//! cursor position as the hand position.

use std::collections::HashSet;

use glam::Vec2;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use crate::signal::GestureSnapshot;

/// Discrete commands triggered by a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    NextShape,
    PrevShape,
    ToggleMode,
    CycleColor,
    TogglePause,
    Quit,
}

/// Key bindings.
pub fn action_for(key: KeyCode) -> Option<Action> {
    match key {
        KeyCode::ArrowRight => Some(Action::NextShape),
        KeyCode::ArrowLeft => Some(Action::PrevShape),
        KeyCode::KeyM => Some(Action::ToggleMode),
        KeyCode::KeyC => Some(Action::CycleColor),
        KeyCode::Space => Some(Action::TogglePause),
        KeyCode::Escape => Some(Action::Quit),
        _ => None,
    }
}

/// Map a cursor position in pixels to a gesture snapshot.
pub fn simulated_gesture(cursor: Vec2, window: Vec2) -> GestureSnapshot {
    if window.x <= 0.0 || window.y <= 0.0 {
        return GestureSnapshot::default();
    }
    let position = cursor / window;
    GestureSnapshot::new(1.0 - position.y, position)
}

/// Keyboard and mouse state for the viewer window.
#[derive(Debug, Default)]
pub struct Input {
    keys_held: HashSet<KeyCode>,
    actions: Vec<Action>,
    cursor: Vec2,
    window: Vec2,
    dragging: bool,
    drag_delta: Vec2,
    scroll_delta: f32,
}

impl Input {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_window_size(&mut self, width: u32, height: u32) {
        self.window = Vec2::new(width as f32, height as f32);
    }

    /// Actions triggered since the last call.
    pub fn take_actions(&mut self) -> Vec<Action> {
        std::mem::take(&mut self.actions)
    }

    /// Mouse drag since the last call, in pixels.
    pub fn take_drag(&mut self) -> Vec2 {
        std::mem::take(&mut self.drag_delta)
    }

    /// Scroll since the last call; positive is up/forward.
    pub fn take_scroll(&mut self) -> f32 {
        std::mem::take(&mut self.scroll_delta)
    }

    /// The cursor read as a hand.
    pub fn gesture(&self) -> GestureSnapshot {
        simulated_gesture(self.cursor, self.window)
    }

    pub fn handle_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key) = event.physical_key {
                    match event.state {
                        ElementState::Pressed => {
                            // held keys repeat; only the first press counts
                            if self.keys_held.insert(key) {
                                self.actions.extend(action_for(key));
                            }
                        }
                        ElementState::Released => {
                            self.keys_held.remove(&key);
                        }
                    }
                }
            }

            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                self.dragging = *state == ElementState::Pressed;
            }

            WindowEvent::CursorMoved { position, .. } => {
                let next = Vec2::new(position.x as f32, position.y as f32);
                if self.dragging {
                    self.drag_delta += next - self.cursor;
                }
                self.cursor = next;
            }

            WindowEvent::MouseWheel { delta, .. } => {
                self.scroll_delta += match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 100.0,
                };
            }

            WindowEvent::Resized(size) => self.set_window_size(size.width, size.height),

            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bindings() {
        assert_eq!(action_for(KeyCode::ArrowRight), Some(Action::NextShape));
        assert_eq!(action_for(KeyCode::KeyM), Some(Action::ToggleMode));
        assert_eq!(action_for(KeyCode::KeyC), Some(Action::CycleColor));
        assert_eq!(action_for(KeyCode::KeyQ), None);
    }

    #[test]
    fn test_cursor_height_is_openness() {
        let window = Vec2::new(800.0, 600.0);
        let top = simulated_gesture(Vec2::new(400.0, 0.0), window);
        let bottom = simulated_gesture(Vec2::new(400.0, 600.0), window);

        assert_eq!(top.value, 1.0);
        assert!(top.is_open);
        assert_eq!(bottom.value, 0.0);
        assert_eq!(top.position, Vec2::new(0.5, 0.0));
    }

    #[test]
    fn test_no_window_means_closed_hand() {
        assert_eq!(simulated_gesture(Vec2::new(10.0, 10.0), Vec2::ZERO), GestureSnapshot::default());
    }

    #[test]
    fn test_deltas_reset_after_take() {
        let mut input = Input::new();
        input.scroll_delta = 2.0;
        input.actions.push(Action::Quit);

        assert_eq!(input.take_scroll(), 2.0);
        assert_eq!(input.take_scroll(), 0.0);
        assert_eq!(input.take_actions(), vec![Action::Quit]);
        assert!(input.take_actions().is_empty());
    }
}

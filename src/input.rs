use glam::Vec2;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Mouse state sampled once per frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameInput {
    /// Cursor position in window pixels, top-left origin.
    pub mouse_pos: Vec2,
    /// Buttons held down this frame.
    pub buttons: Vec<MouseButton>,
    /// New window size, when the window was resized this frame.
    pub resized: Option<(u32, u32)>,
}

impl FrameInput {
    /// Input with the cursor at `pos` and nothing pressed.
    pub fn hover(pos: Vec2) -> Self {
        Self {
            mouse_pos: pos,
            ..Default::default()
        }
    }

    /// Input with the left button held at `pos`.
    pub fn left_click(pos: Vec2) -> Self {
        Self {
            mouse_pos: pos,
            buttons: vec![MouseButton::Left],
            resized: None,
        }
    }

    pub fn is_down(&self, button: MouseButton) -> bool {
        self.buttons.contains(&button)
    }
}

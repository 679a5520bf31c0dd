//! Input events for canvas interaction.
//!
//! Coordinates are canvas-local pixels; the host subtracts the canvas
//! origin before forwarding events.

use serde::{Deserialize, Serialize};

/// Phase of a touch event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TouchPhase {
    /// Touch started (finger down).
    Start,
    /// Touch moved (finger dragging).
    Move,
    /// Touch ended (finger up).
    End,
    /// Touch cancelled by the platform.
    Cancel,
}

/// A single touch point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchPoint {
    /// Touch identifier (for multi-touch).
    pub id: u32,
    /// X position in canvas coordinates.
    pub x: f64,
    /// Y position in canvas coordinates.
    pub y: f64,
}

/// A touch event with one or more touch points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TouchEvent {
    /// Phase of this touch event.
    pub phase: TouchPhase,
    /// All current touch points.
    pub touches: Vec<TouchPoint>,
    /// Timestamp in milliseconds since canvas start.
    pub timestamp_ms: u64,
}

impl TouchEvent {
    /// Create a new touch event.
    #[must_use]
    pub fn new(phase: TouchPhase, touches: Vec<TouchPoint>, timestamp_ms: u64) -> Self {
        Self {
            phase,
            touches,
            timestamp_ms,
        }
    }

    /// Single-finger touch event at `(x, y)`.
    #[must_use]
    pub fn single(phase: TouchPhase, x: f64, y: f64) -> Self {
        Self::new(phase, vec![TouchPoint { id: 0, x, y }], 0)
    }

    /// Get the primary (first) touch point.
    #[must_use]
    pub fn primary_touch(&self) -> Option<&TouchPoint> {
        self.touches.first()
    }

    /// Check if this is a multi-touch event.
    #[must_use]
    pub fn is_multi_touch(&self) -> bool {
        self.touches.len() > 1
    }
}

/// Phase of a mouse pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerPhase {
    /// Button pressed.
    Down,
    /// Pointer moved.
    Move,
    /// Button released.
    Up,
}

/// Keyboard modifiers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct KeyModifiers {
    /// Shift key pressed.
    pub shift: bool,
    /// Control key pressed.
    pub ctrl: bool,
    /// Alt/Option key pressed.
    pub alt: bool,
    /// Meta/Command key pressed.
    pub meta: bool,
}

/// All input events the canvas can receive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum InputEvent {
    /// Raw touch event.
    Touch(TouchEvent),

    /// Pointer (mouse) event.
    Pointer {
        /// Phase of the event.
        phase: PointerPhase,
        /// X coordinate.
        x: f64,
        /// Y coordinate.
        y: f64,
        /// Mouse button (0 = left, 1 = middle, 2 = right).
        button: u8,
    },

    /// Keyboard event.
    Key {
        /// Key name as reported by the platform (`"Enter"`, `"Delete"`, ...).
        key: String,
        /// Whether the key is pressed.
        pressed: bool,
        /// Active modifier keys.
        modifiers: KeyModifiers,
    },
}

impl InputEvent {
    /// Left-button pointer event.
    #[must_use]
    pub fn pointer(phase: PointerPhase, x: f64, y: f64) -> Self {
        Self::Pointer {
            phase,
            x,
            y,
            button: 0,
        }
    }

    /// Key press without modifiers.
    #[must_use]
    pub fn key_press(key: &str) -> Self {
        Self::Key {
            key: key.to_string(),
            pressed: true,
            modifiers: KeyModifiers::default(),
        }
    }
}

/// Commands the canvas understands from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    /// Open the config editor on the selection.
    Edit,
    /// Delete the selection.
    Delete,
}

impl KeyCommand {
    /// Map a platform key name to a command.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "Enter" => Some(Self::Edit),
            "Delete" | "Backspace" => Some(Self::Delete),
            _ => None,
        }
    }
}

/// What the host should do with the native event after dispatch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventResponse {
    /// The canvas consumed the event.
    pub handled: bool,
    /// Suppress the platform default (scroll, zoom, text entry).
    pub prevent_default: bool,
}

impl EventResponse {
    /// The event was not used.
    pub const IGNORED: Self = Self {
        handled: false,
        prevent_default: false,
    };

    /// The event was used; platform default may still run.
    pub const HANDLED: Self = Self {
        handled: true,
        prevent_default: false,
    };

    /// The event was used and the platform default must not run.
    pub const CONSUMED: Self = Self {
        handled: true,
        prevent_default: true,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_commands() {
        assert_eq!(KeyCommand::from_key("Enter"), Some(KeyCommand::Edit));
        assert_eq!(KeyCommand::from_key("Delete"), Some(KeyCommand::Delete));
        assert_eq!(KeyCommand::from_key("Backspace"), Some(KeyCommand::Delete));
        assert_eq!(KeyCommand::from_key("a"), None);
    }

    #[test]
    fn test_touch_event_serde_shape() {
        let event = InputEvent::Touch(TouchEvent::single(TouchPhase::Move, 3.0, 4.0));
        let json = serde_json::to_value(&event).expect("serialize");
        assert_eq!(json["type"], "Touch");
        assert_eq!(json["data"]["phase"], "move");
    }
}

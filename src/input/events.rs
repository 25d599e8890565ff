//! Input event types delivered by the host environment.

/// Mouse button identification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    /// Left mouse button (primary drawing button)
    Left,
    /// Right mouse button
    Right,
    /// Middle mouse button
    Middle,
}

/// Mouse buttons reported held during a motion event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ButtonState {
    /// Left (primary) button held
    pub left: bool,
    /// Right button held
    pub right: bool,
    /// Middle button held
    pub middle: bool,
}

impl ButtonState {
    /// Button state with only the primary (left) button held.
    pub fn primary() -> Self {
        Self {
            left: true,
            ..Self::default()
        }
    }
}

/// One changed contact within a multi-touch event.
///
/// `identifier` comes from the host and selects the pen slot; the host must
/// keep it stable for the lifetime of the contact. `force` is the normalized
/// contact pressure (0-1) where the hardware reports it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Touch {
    /// Host-assigned contact identifier
    pub identifier: u32,
    /// Contact X position in client pixels
    pub client_x: f64,
    /// Contact Y position in client pixels
    pub client_y: f64,
    /// Normalized contact force, when supported
    pub force: Option<f64>,
}

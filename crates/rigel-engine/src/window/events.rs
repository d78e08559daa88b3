use winit::event::{ElementState, MouseButton as WinitMouseButton, WindowEvent as WinitEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Keyboard key identifier.
///
/// Intentionally minimal; platform keycodes without a variant here surface as
/// [`Key::Unknown`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Key {
    Escape,
    Enter,
    Tab,
    Backspace,
    Space,

    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,

    Shift,
    Control,
    Alt,
    Meta,

    // Letters
    A, B, C, D, E, F, G, H, I, J, K, L, M,
    N, O, P, Q, R, S, T, U, V, W, X, Y, Z,

    // Digits
    Digit0, Digit1, Digit2, Digit3, Digit4,
    Digit5, Digit6, Digit7, Digit8, Digit9,

    /// Platform-dependent key not yet represented here.
    Unknown,
}

/// Pressed/released state shared by keys and mouse buttons.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ButtonState {
    Pressed,
    Released,
}

/// Mouse button identifier.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Back,
    Forward,
    Other(u16),
}

/// Engine-level window event.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum WindowEvent {
    CloseRequested,
    Key { key: Key, state: ButtonState },
    MouseButton { button: MouseButton, state: ButtonState },
    MouseMotion { x: f32, y: f32 },
    Resized { width: u32, height: u32 },
}

/// Translates a winit `WindowEvent` into an engine [`WindowEvent`].
///
/// Returns `None` for events the engine does not model.
pub fn translate_winit_event(event: &WinitEvent) -> Option<WindowEvent> {
    match event {
        WinitEvent::CloseRequested => Some(WindowEvent::CloseRequested),

        WinitEvent::Resized(size) => Some(WindowEvent::Resized {
            width: size.width,
            height: size.height,
        }),

        WinitEvent::CursorMoved { position, .. } => Some(WindowEvent::MouseMotion {
            x: position.x as f32,
            y: position.y as f32,
        }),

        WinitEvent::MouseInput { state, button, .. } => Some(WindowEvent::MouseButton {
            button: map_mouse_button(*button),
            state: map_state(*state),
        }),

        WinitEvent::KeyboardInput { event, .. } => Some(WindowEvent::Key {
            key: map_key(event.physical_key),
            state: map_state(event.state),
        }),

        _ => None,
    }
}

fn map_state(state: ElementState) -> ButtonState {
    match state {
        ElementState::Pressed => ButtonState::Pressed,
        ElementState::Released => ButtonState::Released,
    }
}

fn map_mouse_button(b: WinitMouseButton) -> MouseButton {
    match b {
        WinitMouseButton::Left => MouseButton::Left,
        WinitMouseButton::Right => MouseButton::Right,
        WinitMouseButton::Middle => MouseButton::Middle,
        WinitMouseButton::Back => MouseButton::Back,
        WinitMouseButton::Forward => MouseButton::Forward,
        WinitMouseButton::Other(n) => MouseButton::Other(n),
    }
}

fn map_key(key: PhysicalKey) -> Key {
    let code = match key {
        PhysicalKey::Code(code) => code,
        PhysicalKey::Unidentified(_) => return Key::Unknown,
    };

    match code {
        KeyCode::Escape => Key::Escape,
        KeyCode::Enter => Key::Enter,
        KeyCode::Tab => Key::Tab,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Space => Key::Space,

        KeyCode::ArrowUp => Key::ArrowUp,
        KeyCode::ArrowDown => Key::ArrowDown,
        KeyCode::ArrowLeft => Key::ArrowLeft,
        KeyCode::ArrowRight => Key::ArrowRight,

        KeyCode::ShiftLeft | KeyCode::ShiftRight => Key::Shift,
        KeyCode::ControlLeft | KeyCode::ControlRight => Key::Control,
        KeyCode::AltLeft | KeyCode::AltRight => Key::Alt,
        KeyCode::SuperLeft | KeyCode::SuperRight => Key::Meta,

        KeyCode::KeyA => Key::A,
        KeyCode::KeyB => Key::B,
        KeyCode::KeyC => Key::C,
        KeyCode::KeyD => Key::D,
        KeyCode::KeyE => Key::E,
        KeyCode::KeyF => Key::F,
        KeyCode::KeyG => Key::G,
        KeyCode::KeyH => Key::H,
        KeyCode::KeyI => Key::I,
        KeyCode::KeyJ => Key::J,
        KeyCode::KeyK => Key::K,
        KeyCode::KeyL => Key::L,
        KeyCode::KeyM => Key::M,
        KeyCode::KeyN => Key::N,
        KeyCode::KeyO => Key::O,
        KeyCode::KeyP => Key::P,
        KeyCode::KeyQ => Key::Q,
        KeyCode::KeyR => Key::R,
        KeyCode::KeyS => Key::S,
        KeyCode::KeyT => Key::T,
        KeyCode::KeyU => Key::U,
        KeyCode::KeyV => Key::V,
        KeyCode::KeyW => Key::W,
        KeyCode::KeyX => Key::X,
        KeyCode::KeyY => Key::Y,
        KeyCode::KeyZ => Key::Z,

        KeyCode::Digit0 => Key::Digit0,
        KeyCode::Digit1 => Key::Digit1,
        KeyCode::Digit2 => Key::Digit2,
        KeyCode::Digit3 => Key::Digit3,
        KeyCode::Digit4 => Key::Digit4,
        KeyCode::Digit5 => Key::Digit5,
        KeyCode::Digit6 => Key::Digit6,
        KeyCode::Digit7 => Key::Digit7,
        KeyCode::Digit8 => Key::Digit8,
        KeyCode::Digit9 => Key::Digit9,

        _ => Key::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::PhysicalSize;

    #[test]
    fn close_and_resize_translate() {
        assert_eq!(
            translate_winit_event(&WinitEvent::CloseRequested),
            Some(WindowEvent::CloseRequested)
        );
        assert_eq!(
            translate_winit_event(&WinitEvent::Resized(PhysicalSize::new(640, 480))),
            Some(WindowEvent::Resized { width: 640, height: 480 })
        );
    }

    #[test]
    fn modifier_keys_collapse_left_right() {
        assert_eq!(map_key(PhysicalKey::Code(KeyCode::ShiftLeft)), Key::Shift);
        assert_eq!(map_key(PhysicalKey::Code(KeyCode::ShiftRight)), Key::Shift);
    }
}

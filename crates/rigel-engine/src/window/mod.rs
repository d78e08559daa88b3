//! Window collaborator boundary.
//!
//! The engine never creates windows. The embedder owns the event loop and
//! hands the engine (a) a native handle its GL-context plumbing can target and
//! (b) a stream of [`WindowEvent`]s translated from the platform.

mod events;

pub use events::{
    ButtonState, Key, MouseButton, WindowEvent, translate_winit_event,
};

use raw_window_handle::{HasDisplayHandle, HasWindowHandle};

/// A window the platform GL-context plumbing can attach to.
///
/// Blanket-implemented for anything exposing raw window/display handles,
/// including `winit::window::Window`.
pub trait NativeWindow: HasWindowHandle + HasDisplayHandle {}

impl<T: HasWindowHandle + HasDisplayHandle + ?Sized> NativeWindow for T {}

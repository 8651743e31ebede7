//! The winit window adapter.
//!
//! A thin shim satisfying the scene's adapter contract: it owns the window
//! and event loop, translates winit events into the scene's event
//! vocabulary and drives `render()` on redraw. Other toolkits can adapt a
//! scene the same way by forwarding their events through the same entry
//! points.

use std::sync::Arc;

use pollster::FutureExt;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::{ElementState, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use mathplot_core::{Action, Key, MathplotError, Modifiers, MouseButton, Result};
use mathplot_render::RenderEngine;

use crate::visual::Visual;

/// The windowed application: a scene plus its window and engine.
pub struct App {
    window: Option<Arc<Window>>,
    engine: Option<RenderEngine>,
    /// The scene being driven.
    pub visual: Visual,
    modifiers: Modifiers,
    exit_on_any_key: bool,
}

impl App {
    /// Wraps a scene for the event loop.
    #[must_use]
    pub fn new(visual: Visual) -> Self {
        Self {
            window: None,
            engine: None,
            visual,
            modifiers: Modifiers::NONE,
            exit_on_any_key: false,
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        let attributes = Window::default_attributes()
            .with_title(self.visual.title.clone())
            .with_inner_size(LogicalSize::new(self.visual.window_w, self.visual.window_h));
        let window = match event_loop.create_window(attributes) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                log::error!("window creation failed: {e}");
                event_loop.exit();
                return;
            }
        };
        self.visual.pixel_ratio = window.scale_factor() as f32;
        match RenderEngine::new_windowed(window.clone()).block_on() {
            Ok(engine) => {
                self.engine = Some(engine);
                window.request_redraw();
                self.window = Some(window);
            }
            Err(e) => {
                log::error!("render engine init failed: {e}");
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                self.visual.on_close_request();
                if self.visual.ready_to_finish() {
                    event_loop.exit();
                }
            }
            WindowEvent::Resized(size) => {
                self.visual.on_resize(size.width, size.height);
                if let Some(engine) = &mut self.engine {
                    engine.resize(size.width, size.height);
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.visual
                    .on_cursor_move(position.x as f32, position.y as f32);
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let button = match button {
                    winit::event::MouseButton::Left => MouseButton::Left,
                    winit::event::MouseButton::Right => MouseButton::Right,
                    _ => MouseButton::Unhandled,
                };
                let action = match state {
                    ElementState::Pressed => Action::Press,
                    ElementState::Released => Action::Release,
                };
                self.visual.on_mouse_button(button, action, self.modifiers);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let (dx, dy) = match delta {
                    MouseScrollDelta::LineDelta(x, y) => (x, y),
                    MouseScrollDelta::PixelDelta(p) => (p.x as f32 / 50.0, p.y as f32 / 50.0),
                };
                self.visual.on_scroll(dx, dy);
            }
            WindowEvent::ModifiersChanged(mods) => {
                let state = mods.state();
                self.modifiers = Modifiers {
                    shift: state.shift_key(),
                    control: state.control_key(),
                    alt: state.alt_key(),
                    superkey: state.super_key(),
                };
            }
            WindowEvent::KeyboardInput { event, .. } => {
                let key = map_key(event.physical_key);
                let action = match (event.state, event.repeat) {
                    (ElementState::Pressed, false) => Action::Press,
                    (ElementState::Pressed, true) => Action::Repeat,
                    (ElementState::Released, _) => Action::Release,
                };
                self.visual.on_key(key, action, self.modifiers);
                if self.exit_on_any_key && action == Action::Press {
                    event_loop.exit();
                }
                if self.visual.ready_to_finish() {
                    event_loop.exit();
                }
            }
            WindowEvent::RedrawRequested => {
                let Some(engine) = &mut self.engine else {
                    return;
                };
                if let Some(path) = self.visual.pending_snapshot.take() {
                    match self.visual.snapshot(engine, &path, false) {
                        Ok((w, h)) => log::info!("snapshot {path} ({w}x{h})"),
                        Err(e) => log::error!("snapshot failed: {e}"),
                    }
                }
                if let Err(e) = self.visual.render(engine) {
                    log::error!("render failed: {e}");
                }
                if self.visual.ready_to_finish() {
                    event_loop.exit();
                } else if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }
}

/// Runs the blocking event loop until the scene signals quit or the window
/// closes; returns the scene.
pub fn keep_open(visual: Visual) -> Result<Visual> {
    run(App::new(visual))
}

/// As [`keep_open`], but any key press also ends the loop. Used by demo
/// programs that show a result and wait.
pub fn pause_open(visual: Visual) -> Result<Visual> {
    let mut app = App::new(visual);
    app.exit_on_any_key = true;
    run(app)
}

fn run(mut app: App) -> Result<Visual> {
    let event_loop = EventLoop::new()
        .map_err(|e| MathplotError::RenderError(format!("event loop: {e}")))?;
    event_loop
        .run_app(&mut app)
        .map_err(|e| MathplotError::RenderError(format!("event loop: {e}")))?;
    Ok(app.visual)
}

/// Maps a winit physical key to the scene's key vocabulary.
#[allow(clippy::too_many_lines)]
#[must_use]
pub fn map_key(physical: PhysicalKey) -> Key {
    let PhysicalKey::Code(code) = physical else {
        return Key::Unknown;
    };
    match code {
        KeyCode::Space => Key::Space,
        KeyCode::Quote => Key::Apostrophe,
        KeyCode::Comma => Key::Comma,
        KeyCode::Minus => Key::Minus,
        KeyCode::Period => Key::Period,
        KeyCode::Slash => Key::Slash,
        KeyCode::Digit0 => Key::Num0,
        KeyCode::Digit1 => Key::Num1,
        KeyCode::Digit2 => Key::Num2,
        KeyCode::Digit3 => Key::Num3,
        KeyCode::Digit4 => Key::Num4,
        KeyCode::Digit5 => Key::Num5,
        KeyCode::Digit6 => Key::Num6,
        KeyCode::Digit7 => Key::Num7,
        KeyCode::Digit8 => Key::Num8,
        KeyCode::Digit9 => Key::Num9,
        KeyCode::Semicolon => Key::Semicolon,
        KeyCode::Equal => Key::Equal,
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
        KeyCode::BracketLeft => Key::LeftBracket,
        KeyCode::Backslash => Key::Backslash,
        KeyCode::BracketRight => Key::RightBracket,
        KeyCode::Backquote => Key::GraveAccent,
        KeyCode::Escape => Key::Escape,
        KeyCode::Enter => Key::Enter,
        KeyCode::Tab => Key::Tab,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Insert => Key::Insert,
        KeyCode::Delete => Key::Delete,
        KeyCode::ArrowRight => Key::Right,
        KeyCode::ArrowLeft => Key::Left,
        KeyCode::ArrowDown => Key::Down,
        KeyCode::ArrowUp => Key::Up,
        KeyCode::PageUp => Key::PageUp,
        KeyCode::PageDown => Key::PageDown,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::CapsLock => Key::CapsLock,
        KeyCode::ScrollLock => Key::ScrollLock,
        KeyCode::NumLock => Key::NumLock,
        KeyCode::PrintScreen => Key::PrintScreen,
        KeyCode::Pause => Key::Pause,
        KeyCode::F1 => Key::F1,
        KeyCode::F2 => Key::F2,
        KeyCode::F3 => Key::F3,
        KeyCode::F4 => Key::F4,
        KeyCode::F5 => Key::F5,
        KeyCode::F6 => Key::F6,
        KeyCode::F7 => Key::F7,
        KeyCode::F8 => Key::F8,
        KeyCode::F9 => Key::F9,
        KeyCode::F10 => Key::F10,
        KeyCode::F11 => Key::F11,
        KeyCode::F12 => Key::F12,
        KeyCode::F13 => Key::F13,
        KeyCode::F14 => Key::F14,
        KeyCode::F15 => Key::F15,
        KeyCode::F16 => Key::F16,
        KeyCode::F17 => Key::F17,
        KeyCode::F18 => Key::F18,
        KeyCode::F19 => Key::F19,
        KeyCode::F20 => Key::F20,
        KeyCode::F21 => Key::F21,
        KeyCode::F22 => Key::F22,
        KeyCode::F23 => Key::F23,
        KeyCode::F24 => Key::F24,
        KeyCode::Numpad0 => Key::Kp0,
        KeyCode::Numpad1 => Key::Kp1,
        KeyCode::Numpad2 => Key::Kp2,
        KeyCode::Numpad3 => Key::Kp3,
        KeyCode::Numpad4 => Key::Kp4,
        KeyCode::Numpad5 => Key::Kp5,
        KeyCode::Numpad6 => Key::Kp6,
        KeyCode::Numpad7 => Key::Kp7,
        KeyCode::Numpad8 => Key::Kp8,
        KeyCode::Numpad9 => Key::Kp9,
        KeyCode::NumpadDecimal => Key::KpDecimal,
        KeyCode::NumpadDivide => Key::KpDivide,
        KeyCode::NumpadMultiply => Key::KpMultiply,
        KeyCode::NumpadSubtract => Key::KpSubtract,
        KeyCode::NumpadAdd => Key::KpAdd,
        KeyCode::NumpadEnter => Key::KpEnter,
        KeyCode::NumpadEqual => Key::KpEqual,
        KeyCode::ShiftLeft => Key::LeftShift,
        KeyCode::ControlLeft => Key::LeftControl,
        KeyCode::AltLeft => Key::LeftAlt,
        KeyCode::SuperLeft => Key::LeftSuper,
        KeyCode::ShiftRight => Key::RightShift,
        KeyCode::ControlRight => Key::RightControl,
        KeyCode::AltRight => Key::RightAlt,
        KeyCode::SuperRight => Key::RightSuper,
        KeyCode::ContextMenu => Key::Menu,
        _ => Key::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_map_covers_bindings() {
        assert_eq!(map_key(PhysicalKey::Code(KeyCode::KeyQ)), Key::Q);
        assert_eq!(map_key(PhysicalKey::Code(KeyCode::F10)), Key::F10);
        assert_eq!(map_key(PhysicalKey::Code(KeyCode::BracketLeft)), Key::LeftBracket);
        assert_eq!(map_key(PhysicalKey::Code(KeyCode::ArrowUp)), Key::Up);
        assert_eq!(map_key(PhysicalKey::Code(KeyCode::NumpadAdd)), Key::KpAdd);
    }
}

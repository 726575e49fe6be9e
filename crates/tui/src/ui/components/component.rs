//! Component system for the Formwork TUI.
//!
//! Components are self-contained UI elements: they keep their own local UI
//! state (hit-test areas, scroll offsets), read and mutate the shared
//! [`App`], and report anything effectful back as [`Effect`]s instead of
//! performing it.

use anyhow::Result;
use crossterm::event::{KeyEvent, MouseEvent};
use ratatui::{Frame, layout::Rect, text::Span};

use crate::app::{App, Effect, Msg};

/// A UI element with its own state and behavior.
///
/// # Lifecycle
///
/// 1. `init()` runs once after construction.
/// 2. Input arrives through `handle_key_events()` / `handle_mouse_events()`.
/// 3. Runtime messages arrive through `handle_message()`.
/// 4. `render()` draws into the given area every frame.
pub(crate) trait Component {
    fn init(&mut self) -> Result<()> {
        Ok(())
    }

    /// React to a runtime message.
    fn handle_message(&mut self, _app: &mut App, _msg: Msg) -> Vec<Effect> {
        Vec::new()
    }

    /// Handle a key while this component has focus.
    fn handle_key_events(&mut self, _app: &mut App, _key: KeyEvent) -> Vec<Effect> {
        Vec::new()
    }

    /// Handle a mouse event. Components hit-test against the areas they
    /// recorded during the last `render`.
    fn handle_mouse_events(&mut self, _app: &mut App, _mouse: MouseEvent) -> Vec<Effect> {
        Vec::new()
    }

    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App);

    /// Key hints shown in the status bar while this component is active.
    fn get_hint_spans(&self, _app: &App) -> Vec<Span<'static>> {
        Vec::new()
    }
}
